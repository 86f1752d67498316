//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tide",
    version,
    about = "Ask analytical questions of the workforce data lake"
)]
pub struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer one question and print the result.
    Ask(AskArgs),
    /// List the tables and columns the lake currently exposes.
    Tables(TablesArgs),
    /// Interactive question session; an empty line exits.
    Repl,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question, e.g. "average salary by year for tech roles".
    pub question: String,

    /// Emit the raw answer envelope as JSON instead of formatted text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TablesArgs {
    /// Emit the catalog as JSON.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_parses_question_and_flags() {
        let cli = Cli::try_parse_from(["tide", "ask", "--json", "top employers?"]).unwrap();
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.question, "top employers?");
                assert!(args.json);
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["tide", "-q", "-v", "tables"]).is_err());
    }

    #[test]
    fn repl_takes_no_arguments() {
        let cli = Cli::try_parse_from(["tide", "repl"]).unwrap();
        assert!(matches!(cli.command, Commands::Repl));
    }
}
