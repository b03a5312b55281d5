use std::path::{Path, PathBuf};

use crate::common::constants::{MAINNET_GENESIS_CHALLENGE, TESTNET11_GENESIS_CHALLENGE};
use crate::config::{AnalyzerConfig, Network};
use crate::runner::DEFAULT_MAX_COST;

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config = AnalyzerConfig::from_toml_str("network = \"testnet11\"\n").expect("parse");
    assert_eq!(config.network, Network::Testnet11);
    assert_eq!(config.max_cost, DEFAULT_MAX_COST);
    assert_eq!(config.templates, PathBuf::from("resources/templates.toml"));
}

#[test]
fn test_config_rejects_unknown_network() {
    assert!(AnalyzerConfig::from_toml_str("network = \"moonnet\"\n").is_err());
}

#[test]
fn test_sample_config_loads() {
    let config = AnalyzerConfig::load(Path::new("analyzer.toml")).expect("load");
    assert_eq!(config, AnalyzerConfig::default());
}

#[test]
fn test_network_additional_data() {
    assert_eq!(
        Network::Mainnet.agg_sig_me_additional_data(),
        MAINNET_GENESIS_CHALLENGE.clone()
    );
    assert_eq!(
        Network::Testnet11.agg_sig_me_additional_data().to_hex(),
        "37a90eb5185a9c4439a91ddc98bbadce7b4feba060d50116a067de66bf236615"
    );
    assert_eq!(
        TESTNET11_GENESIS_CHALLENGE.to_hex(),
        Network::Testnet11.agg_sig_me_additional_data().to_hex()
    );
}
