use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default Groq API base URL used when `GROQ_BASE_URL` is not set.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat-completion model used for call analysis.
pub const DEFAULT_GROQ_MODEL: &str = "gemma2-9b-it";

/// Default location of the CSV log, relative to the working directory.
pub const DEFAULT_ANALYSIS_LOG_PATH: &str = "call_analysis.csv";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl fmt::Display for RustEnvParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected one of development, production, staging")
    }
}

impl std::error::Error for RustEnvParseError {}

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The API key to use when calling the Groq chat-completion API.
    /// When absent the server still starts, but every analysis request fails with a 500.
    #[arg(long, env)]
    groq_api_key: Option<String>,

    /// The base URL of the Groq API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GROQ_BASE_URL)]
    groq_base_url: String,

    /// The model identifier sent with every chat-completion request.
    #[arg(long, env, default_value = DEFAULT_GROQ_MODEL)]
    groq_model: String,

    /// Path of the append-only CSV file that records every analyzed call.
    #[arg(long, env, default_value = DEFAULT_ANALYSIS_LOG_PATH)]
    analysis_log_path: PathBuf,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 5000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .try_map(|s| s.parse::<LevelFilter>().map_err(|e| e.to_string())),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .try_map(|s| s.parse::<RustEnv>()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Builds a Config from an explicit argument list instead of the process arguments.
    /// The first item is the binary name. Environment variables still apply.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Config::try_parse_from(args)
    }

    /// Returns the Groq API key, treating an empty or blank value as absent.
    pub fn groq_api_key(&self) -> Option<&str> {
        self.groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn set_groq_api_key(mut self, groq_api_key: Option<String>) -> Self {
        self.groq_api_key = groq_api_key;
        self
    }

    /// Returns the Groq API base URL.
    pub fn groq_base_url(&self) -> &str {
        &self.groq_base_url
    }

    pub fn groq_model(&self) -> &str {
        &self.groq_model
    }

    pub fn analysis_log_path(&self) -> &Path {
        &self.analysis_log_path
    }

    pub fn set_analysis_log_path(mut self, analysis_log_path: PathBuf) -> Self {
        self.analysis_log_path = analysis_log_path;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
