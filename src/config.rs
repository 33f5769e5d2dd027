use anyhow::Context;
use serde::Deserialize;
use std::{env, path::Path, path::PathBuf, time::Duration};

use crate::{cli::FetchArgs, source::Source};

pub const FILE_NAME: &str = "svgfetch.toml";
pub const USER_AGENT_VAR: &str = "SVGFETCH_USER_AGENT";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config).context("Failed to parse config file")?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchSettings {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub system_fonts: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: None,
            system_fonts: true,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The environment wins over the config file.
    pub fn user_agent(&self) -> Option<String> {
        env::var(USER_AGENT_VAR).ok().or_else(|| self.user_agent.clone())
    }
}

impl From<&FetchArgs> for FetchSettings {
    fn from(args: &FetchArgs) -> Self {
        Self {
            user_agent: None,
            timeout_secs: args.timeout,
            system_fonts: !args.no_system_fonts,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Job {
    pub source: Source,
    pub output: PathBuf,
    pub width: Option<f32>,
    pub height: Option<f32>,
}
