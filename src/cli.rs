use clap::Parser;

/// smart-commit: generate a conventional commit message for pending changes,
/// review it, then stage, commit, and optionally push
#[derive(Parser, Debug)]
#[command(name = "smart-commit", about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// API key for the remote model (or set GEMINI_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// commit message to use verbatim, skipping generation and review
    #[arg(short, long)]
    pub message: Option<String>,

    /// stage all changes without asking
    #[arg(short = 'a', long)]
    pub auto_stage: bool,

    /// push to the remote after committing
    #[arg(short = 'p', long)]
    pub push: bool,

    /// report what would be done without doing it
    #[arg(long)]
    pub dry_run: bool,

    /// print the prompt sent to the model
    #[arg(long)]
    pub debug_prompt: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
