use crate::config::toml_config::DEFAULT_TIMEOUT_SECONDS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "drone-query")]
#[command(about = "Submit free-text queries to the drone analysis service and browse the results")]
pub struct CliConfig {
    /// Analysis service endpoint
    #[arg(long, default_value = "http://127.0.0.1:8000/process-query/")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Optional TOML configuration file; overrides --endpoint and --timeout-seconds
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// One-shot query; without it an interactive prompt is started
    pub query: Option<String>,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        if let Some(query) = &self.query {
            validation::validate_non_empty_string("query", query)?;
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}
