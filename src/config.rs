


use std::time::Duration;
use log::info;
use serde::{Serialize, Deserialize};
use web3::types::Address;
use balancereq::BlockscoutIndexer;
use compliancereq::KycViewerOracle;
use crate::constants::{KINTO_CHAIN_ID, KINTO_RPC_ENDPOINT, KINTO_EXPLORER_ENDPOINT, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::error::ConfigError;


#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Env{
    pub chain_id: u64,
    pub rpc_endpoint: String,
    pub blockscout_endpoint: String,
    pub kyc_viewer_address: Address,
    pub app_address: Address,
    pub http_timeout: Duration,
}

impl Env{

    /// Loads `.env` when present, then reads the process environment.
    pub fn get_vars() -> Result<Self, ConfigError>{
        dotenv::dotenv().ok();
        let env = Self::from_lookup(|name| std::env::var(name).ok())?;
        info!("loaded {} config for chain {} | rpc: {} | explorer: {}", crate::constants::APP_NAME, env.chain_id, env.rpc_endpoint, env.blockscout_endpoint);
        Ok(env)
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where L: Fn(&str) -> Option<String>{

        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let chain_id = match var("KINTO_CHAIN_ID"){
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid{
                name: "KINTO_CHAIN_ID", value: value.clone(), reason: e.to_string()
            })?,
            None => KINTO_CHAIN_ID
        };

        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS"){
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid{
                name: "HTTP_TIMEOUT_SECS", value: value.clone(), reason: e.to_string()
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS
        };

        Ok(
            Self{
                chain_id,
                rpc_endpoint: var("KINTO_RPC_ENDPOINT").unwrap_or(KINTO_RPC_ENDPOINT.to_string()),
                blockscout_endpoint: var("BLOCKSCOUT_API_ENDPOINT").unwrap_or(KINTO_EXPLORER_ENDPOINT.to_string()),
                kyc_viewer_address: required_address("KYC_VIEWER_ADDRESS", var("KYC_VIEWER_ADDRESS"))?,
                app_address: required_address("KINTO_APP_ADDRESS", var("KINTO_APP_ADDRESS"))?,
                http_timeout: Duration::from_secs(http_timeout_secs),
            }
        )
    }

    pub fn blockscout_indexer(&self) -> Result<BlockscoutIndexer, ConfigError>{
        BlockscoutIndexer::new(&self.blockscout_endpoint, self.http_timeout)
            .map_err(|e| ConfigError::Collaborator(e.to_string()))
    }

    pub fn kyc_viewer_oracle(&self) -> Result<KycViewerOracle, ConfigError>{
        KycViewerOracle::new(&self.rpc_endpoint, self.kyc_viewer_address, self.http_timeout)
            .map_err(|e| ConfigError::Collaborator(e.to_string()))
    }

}

fn required_address(name: &'static str, value: Option<String>) -> Result<Address, ConfigError>{
    let Some(value) = value else{
        return Err(ConfigError::Missing(name));
    };
    match transferreq::parse_address(value.trim()){
        Some(address) => Ok(address),
        None => Err(ConfigError::Invalid{ name, value, reason: "expected 0x followed by 40 hex digits".to_string() })
    }
}
