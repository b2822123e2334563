


/*
    the smart contract wallet session is an external collaborator, key custody
    and signing happen on the wallet side; we only ask it for the connected
    account and hand it fully encoded calls
*/


use serde::{Serialize, Deserialize};
use web3::types::{Address, H256};
use transferreq::{EncodedCall, compress_address};


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo{
    pub wallet_address: Address,
    pub app_key: Address,
}

impl AccountInfo{

    pub fn display_wallet(&self) -> String{
        compress_address(&self.wallet_address)
    }

    pub fn display_app_key(&self) -> String{
        compress_address(&self.app_key)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Receipt{
    pub hash: H256,
}

/// Opaque failure reported by the wallet session.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SessionError(pub String);

#[async_trait::async_trait]
pub trait WalletSession: Send + Sync{
    async fn connect(&self) -> Result<AccountInfo, SessionError>;
    async fn create_new_wallet(&self) -> Result<(), SessionError>;
    async fn send_transaction(&self, calls: Vec<EncodedCall>) -> Result<Receipt, SessionError>;
}
