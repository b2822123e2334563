


use std::time::Duration;
use log::{error, info};
use serde::{Serialize, Deserialize};
use web3::types::Address;
use crate::{BalanceIndexer, IndexerError, RawTokenBalance};


pub const ERC20_TOKEN_TYPE: &str = "ERC-20";
pub const NO_TOKENS_FOUND: &str = "No tokens found";


#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BlockscoutTokenListResponse{
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/* ----------------------------------------------------------- */
/*     blockscout etherscan-compatible account tokenlist api    */
/* ----------------------------------------------------------- */
// https://docs.blockscout.com/devs/apis/rpc/account#get-list-of-tokens-owned-by-address
pub struct BlockscoutIndexer{
    client: reqwest::Client,
    endpoint: String,
}

impl BlockscoutIndexer{

    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, IndexerError>{

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IndexerError::Request(e.to_string()))?;

        Ok(
            Self{
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
            }
        )
    }

    pub fn tokenlist_url(&self, address: Address) -> String{
        format!("{}/api?module=account&action=tokenlist&address=0x{}", self.endpoint, hex_address(address))
    }

}

fn hex_address(address: Address) -> String{
    address.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
}

#[async_trait::async_trait]
impl BalanceIndexer for BlockscoutIndexer{

    async fn get_balances(&self, address: Address) -> Result<Vec<RawTokenBalance>, IndexerError>{

        let endpoint = self.tokenlist_url(address);
        info!(" ---> 🔎 fetching token list from {}", endpoint);

        let response = self.client
            .get(endpoint.as_str())
            .send()
            .await
            .map_err(|e| IndexerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success(){
            error!("blockscout responded with {}", status);
            return Err(IndexerError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IndexerError::Request(e.to_string()))?;

        parse_token_list(&body)
    }

}

/*
    keeps only the fungible holdings, tokenlist also returns the nfts of the
    account; entries without a type are kept since older explorers omit it
*/
pub fn parse_token_list(body: &[u8]) -> Result<Vec<RawTokenBalance>, IndexerError>{

    let response = match serde_json::from_slice::<BlockscoutTokenListResponse>(body){
        Ok(response) => response,
        Err(e) => {
            /* log the raw body, it's usually an html error page from the explorer */
            let body_str = String::from_utf8_lossy(body);
            error!("serde decoding blockscout response error: {}", body_str);
            return Err(IndexerError::Decode(e.to_string()));
        }
    };

    if response.status != "1"{
        if response.message.starts_with(NO_TOKENS_FOUND){
            return Ok(vec![]);
        }
        return Err(IndexerError::Rejected(response.message));
    }

    let entries = match response.result{
        Some(result) => serde_json::from_value::<Vec<RawTokenBalance>>(result)
            .map_err(|e| IndexerError::Decode(e.to_string()))?,
        None => vec![]
    };

    Ok(
        entries
            .into_iter()
            .filter(|entry| match entry.token_type.as_deref(){
                Some(kind) => kind == ERC20_TOKEN_TYPE,
                None => true
            })
            .collect()
    )
}



#[cfg(test)]
mod tests{

    use super::*;
    use std::str::FromStr;

    #[test]
    fn keeps_erc20_entries_only(){
        let body = br#"{
            "message": "OK",
            "status": "1",
            "result": [
                {"balance": "2000000", "contractAddress": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789", "decimals": "6", "name": "USD Coin", "symbol": "USDC", "type": "ERC-20"},
                {"balance": "1", "contractAddress": "0x1111111111111111111111111111111111111111", "decimals": "", "name": "Kinto Badge", "symbol": "BADGE", "type": "ERC-721"},
                {"balance": 5, "contractAddress": "0x2222222222222222222222222222222222222222", "decimals": 18, "name": "Kinto", "symbol": "K"}
            ]
        }"#;

        let entries = parse_token_list(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].symbol.as_deref(), Some("USDC"));
        assert_eq!(entries[0].decimals, serde_json::json!("6"));
        assert_eq!(entries[1].decimals, serde_json::json!(18));
        assert_eq!(entries[1].token_type, None);
    }

    #[test]
    fn no_tokens_found_is_an_empty_list(){
        let body = br#"{"message": "No tokens found", "result": [], "status": "0"}"#;
        assert_eq!(parse_token_list(body).unwrap(), vec![]);
    }

    #[test]
    fn other_rejections_are_errors(){
        let body = br#"{"message": "Invalid address format", "result": null, "status": "0"}"#;
        assert_eq!(
            parse_token_list(body),
            Err(IndexerError::Rejected("Invalid address format".to_string()))
        );
    }

    #[test]
    fn garbage_body_is_a_decode_error(){
        let result = parse_token_list(b"<html>bad gateway</html>");
        assert!(matches!(result, Err(IndexerError::Decode(_))));
    }

    #[test]
    fn tokenlist_url_uses_lowercase_hex(){
        let indexer = BlockscoutIndexer::new("https://explorer.kinto.xyz/", Duration::from_secs(5)).unwrap();
        let address = Address::from_str("0xABCDabcdABCDabcdABCDabcdABCDabcdABCDabcd").unwrap();
        assert_eq!(
            indexer.tokenlist_url(address),
            "https://explorer.kinto.xyz/api?module=account&action=tokenlist&address=0xabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd"
        );
    }

}
