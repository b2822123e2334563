


pub const APP_NAME: &str = "KycTransfer";

/* kinto mainnet, the chain the wallet sessions live on */
pub const KINTO_CHAIN_ID: u64 = 7887;
pub const KINTO_RPC_ENDPOINT: &str = "https://rpc.kinto-rpc.com";
pub const KINTO_EXPLORER_ENDPOINT: &str = "https://explorer.kinto.xyz";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

pub static NOT_CONNECTED: &str = "No Wallet Session Is Connected";
pub static SUBMISSION_IN_FLIGHT: &str = "A Transfer Is Already Being Submitted";
pub static DISCONNECTED_WHILE_CONNECTING: &str = "Session Was Disconnected While Connecting";
pub static COLLABORATOR_PANICKED: &str = "Collaborator Panicked";
