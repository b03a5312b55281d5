use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::constants::{MAINNET_GENESIS_CHALLENGE, TESTNET11_GENESIS_CHALLENGE};
use crate::common::types::{Error, Hash, IntoErr};
use crate::runner::DEFAULT_MAX_COST;

/// Which chain signatures are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet11,
}

impl Network {
    /// Appended to every AGG_SIG_ME message on this network.
    pub fn agg_sig_me_additional_data(&self) -> Hash {
        match self {
            Network::Mainnet => MAINNET_GENESIS_CHALLENGE.clone(),
            Network::Testnet11 => TESTNET11_GENESIS_CHALLENGE.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub listen: String,
    /// TOML manifest naming the template hex files.
    pub templates: PathBuf,
    pub max_cost: u64,
    pub request_timeout_secs: u64,
    pub network: Network,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            listen: "127.0.0.1:5800".to_string(),
            templates: PathBuf::from("resources/templates.toml"),
            max_cost: DEFAULT_MAX_COST,
            request_timeout_secs: 30,
            network: Network::Mainnet,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(text: &str) -> Result<AnalyzerConfig, Error> {
        toml::from_str(text).into_gen()
    }

    pub fn load(path: &Path) -> Result<AnalyzerConfig, Error> {
        let text = read_to_string(path).map_err(|e| {
            Error::StrErr(format!("Error reading {}: {e:?}", path.display()))
        })?;
        AnalyzerConfig::from_toml_str(&text)
    }
}
