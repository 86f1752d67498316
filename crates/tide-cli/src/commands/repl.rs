//! `tide repl`: interactive question loop.
//!
//! Mirrors the original assistant's terminal session: a prompt per
//! question, per-question failures reported without killing the session,
//! and an empty line to exit.

use std::io::Write;

use tide_config::TideConfig;

use crate::bootstrap;
use crate::output;

pub async fn handle(config: &TideConfig) -> anyhow::Result<()> {
    let pipeline = bootstrap::build_pipeline(config)?;

    println!("Connected to the workforce data lake.");
    println!("Ask about the labour force, wages, job postings, permits, scholarships or students.");
    println!("Press Enter on an empty line to exit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("Q> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF
            println!("\nGoodbye.");
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            println!("Goodbye.");
            break;
        }

        let answer = pipeline.answer(question).await;
        println!("\n{}", output::render_answer(&answer));
    }
    Ok(())
}
