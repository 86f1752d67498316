//! `tide ask`: run one question through the pipeline.

use tide_config::TideConfig;

use crate::bootstrap;
use crate::cli::AskArgs;
use crate::output;

pub async fn handle(args: &AskArgs, config: &TideConfig) -> anyhow::Result<()> {
    let pipeline = bootstrap::build_pipeline(config)?;
    let answer = pipeline.answer(&args.question).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print!("{}", output::render_answer(&answer));
    }
    Ok(())
}
