use crate::cli::Cli;
use crate::constants::CREDENTIAL_ENV;

/// per-invocation configuration, collected once from the CLI and the
/// environment; read-only for the rest of the run
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunConfig {
    pub auto_stage: bool,
    pub auto_push: bool,
    pub dry_run: bool,
    /// explicit commit message; bypasses generation and review entirely
    pub message: Option<String>,
    /// remote model credential; absence means immediate local fallback
    pub credential: Option<String>,
    pub show_prompt: bool,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let credential = cli
            .api_key
            .or_else(|| std::env::var(CREDENTIAL_ENV).ok())
            .filter(|key| !key.trim().is_empty());

        RunConfig {
            auto_stage: cli.auto_stage,
            auto_push: cli.push,
            dry_run: cli.dry_run,
            message: cli.message.filter(|m| !m.trim().is_empty()),
            credential,
            show_prompt: cli.debug_prompt,
        }
    }
}
