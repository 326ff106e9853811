use std::{net::SocketAddr, path::Path};

use clap::Parser;
use config::{builder::DefaultState, ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_BASE_URL: &str = "https://www.home24.de";
const DEFAULT_LLM_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "google/gemini-flash-1.5";

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Path to the local configuration TOML file.
    #[arg(short, value_name = "CONFIG_PATH")]
    pub config: Option<std::path::PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Web {
    #[serde(deserialize_with = "deserialize_socket_addr")]
    pub address: SocketAddr,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Upstream {
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Llm {
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub web: Web,
    pub upstream: Upstream,
    pub llm: Llm,
}

impl Settings {
    /// Load settings, with sane defaults for every key. The API key is
    /// not a setting; it comes from the `OPENROUTER_KEY` environment
    /// variable.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::<DefaultState>::default()
            .set_default("web.address", DEFAULT_ADDR)?
            .set_default("upstream.base_url", DEFAULT_BASE_URL)?
            .set_default("llm.api_url", DEFAULT_LLM_API_URL)?
            .set_default("llm.model", DEFAULT_LLM_MODEL)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }
}

fn deserialize_socket_addr<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_key() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.web.address.port(), 8000);
        assert_eq!(settings.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.llm.model, DEFAULT_LLM_MODEL);
    }
}
