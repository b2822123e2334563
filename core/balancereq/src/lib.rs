


/*   ------------------------------------------------------------------------------------------------
    | fungible token holdings of the connected account, the indexer hands us whatever it has
    | indexed (decimals and balances may come back as json numbers or numeric strings) and the
    | aggregator turns that into a transfer-ready list:
    |    🪙 every holding carries a parsed contract address
    |    🔢 decimals are normalized into an integer before any scaling happens
    |    💰 balances are kept as U256 base units, never as floats
    |
*/


use std::sync::Arc;
use std::str::FromStr;
use log::{info, warn};
use serde::{Serialize, Deserialize};
use web3::types::{Address, U256};

pub mod blockscout;
pub use blockscout::BlockscoutIndexer;


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance{
    pub contract_address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub balance: U256, // base units
}

impl TokenBalance{

    pub fn formatted_balance(&self) -> String{
        format_balance(self.balance, self.decimals)
    }
}

/// A holding as the indexer reports it, before normalization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenBalance{
    pub contract_address: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: serde_json::Value,
    #[serde(default)]
    pub balance: serde_json::Value,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexerError{
    #[error("indexer request failed: {0}")]
    Request(String),
    #[error("indexer responded with http status {0}")]
    Status(u16),
    #[error("indexer rejected the query: {0}")]
    Rejected(String),
    #[error("can't decode indexer response: {0}")]
    Decode(String),
}

#[async_trait::async_trait]
pub trait BalanceIndexer: Send + Sync{
    async fn get_balances(&self, address: Address) -> Result<Vec<RawTokenBalance>, IndexerError>;
}


pub struct BalanceAggregator{
    indexer: Arc<dyn BalanceIndexer>,
}

impl BalanceAggregator{

    pub fn new(indexer: Arc<dyn BalanceIndexer>) -> Self{
        Self{ indexer }
    }

    /*
        one indexer call per invocation, no pagination and no retries, a failed
        call goes straight back to the caller since an empty list would look
        exactly like an account without any holdings
    */
    pub async fn aggregate(&self, account: Address) -> Result<Vec<TokenBalance>, IndexerError>{

        let raw_balances = self.indexer.get_balances(account).await?;
        let fetched = raw_balances.len();

        let balances = raw_balances
            .into_iter()
            .filter_map(normalize)
            .collect::<Vec<TokenBalance>>();

        info!(" ---> 🪙 aggregated {} of {} indexed holdings for {:?}", balances.len(), fetched, account);

        Ok(balances)
    }

}

/// Returns `None` for holdings that can't be used for a transfer.
pub fn normalize(raw: RawTokenBalance) -> Option<TokenBalance>{

    let Ok(contract_address) = Address::from_str(raw.contract_address.trim()) else{
        warn!("dropping holding with invalid contract address {:?}", raw.contract_address);
        return None;
    };

    let Some(decimals) = parse_decimals(&raw.decimals) else{
        warn!("dropping holding {:?} with invalid decimals {}", contract_address, raw.decimals);
        return None;
    };

    let Some(balance) = parse_balance(&raw.balance) else{
        warn!("dropping holding {:?} with invalid balance {}", contract_address, raw.balance);
        return None;
    };

    Some(
        TokenBalance{
            contract_address,
            symbol: raw.symbol.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            decimals,
            balance,
        }
    )
}

fn numeric_text(value: &serde_json::Value) -> Option<String>{
    match value{
        serde_json::Value::String(text) => Some(text.trim().to_string()),
        serde_json::Value::Number(number) if number.is_u64() => Some(number.to_string()),
        _ => None
    }
}

pub fn parse_decimals(value: &serde_json::Value) -> Option<u8>{
    numeric_text(value)?.parse::<u8>().ok()
}

pub fn parse_balance(value: &serde_json::Value) -> Option<U256>{
    let text = numeric_text(value)?;
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()){
        return None;
    }
    U256::from_dec_str(&text).ok()
}

/*
    renders balance / 10^decimals with plain digit arithmetic on the decimal
    string of the U256, so the output is exact for any balance and decimals
*/
pub fn format_balance(balance: U256, decimals: u8) -> String{

    let decimals = decimals as usize;
    let digits = balance.to_string();
    if decimals == 0{
        return digits;
    }

    let padded = if digits.len() <= decimals{
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else{
        digits
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty(){
        integer.to_string()
    } else{
        format!("{}.{}", integer, fraction)
    }
}



#[cfg(test)]
mod tests{

    use super::*;
    use serde_json::json;

    struct FixedIndexer(Result<Vec<RawTokenBalance>, IndexerError>);

    #[async_trait::async_trait]
    impl BalanceIndexer for FixedIndexer{
        async fn get_balances(&self, _address: Address) -> Result<Vec<RawTokenBalance>, IndexerError>{
            self.0.clone()
        }
    }

    fn raw(contract: &str, symbol: &str, decimals: serde_json::Value, balance: serde_json::Value) -> RawTokenBalance{
        RawTokenBalance{
            contract_address: contract.to_string(),
            symbol: Some(symbol.to_string()),
            name: None,
            decimals,
            balance,
            token_type: Some("ERC-20".to_string()),
        }
    }

    const USDC: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";

    #[test]
    fn formats_exact_decimal_strings(){
        assert_eq!(format_balance(U256::from(2_000_000u64), 6), "2");
        assert_eq!(format_balance(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_balance(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_balance(U256::zero(), 8), "0");
        assert_eq!(format_balance(U256::from(12345u64), 0), "12345");
        assert_eq!(format_balance(U256::from(100_000_001u64), 8), "1.00000001");
    }

    #[test]
    fn formatting_keeps_integer_part_before_fraction_for_large_balances(){
        let huge = U256::exp10(30) + U256::from(123u64);
        for decimals in [0u8, 6, 8, 18]{
            let rendered = format_balance(huge, decimals);
            let digits: String = rendered.chars().filter(|c| *c != '.').collect();
            let expected = huge.to_string();
            assert!(expected.starts_with(digits.trim_end_matches('0')));
            let integer = rendered.split('.').next().unwrap();
            assert_eq!(integer.len(), 31 - decimals as usize);
        }
        assert_eq!(format_balance(huge, 18), "1000000000000.000000000000000123");
    }

    #[test]
    fn decimals_accept_numbers_and_numeric_strings(){
        assert_eq!(parse_decimals(&json!("6")), Some(6));
        assert_eq!(parse_decimals(&json!(18)), Some(18));
        assert_eq!(parse_decimals(&json!(" 8 ")), Some(8));
        assert_eq!(parse_decimals(&json!("")), None);
        assert_eq!(parse_decimals(&json!("-1")), None);
        assert_eq!(parse_decimals(&json!("6.5")), None);
        assert_eq!(parse_decimals(&json!(null)), None);
    }

    #[test]
    fn balances_parse_beyond_u64(){
        assert_eq!(parse_balance(&json!("1000000000000000000000000000000")), Some(U256::exp10(30)));
        assert_eq!(parse_balance(&json!(2000000)), Some(U256::from(2_000_000u64)));
        assert_eq!(parse_balance(&json!("1e6")), None);
        assert_eq!(parse_balance(&json!("-5")), None);
    }

    #[tokio::test]
    async fn aggregate_normalizes_and_drops_unusable_holdings(){
        let indexer = FixedIndexer(Ok(vec![
            raw(USDC, "USDC", json!("6"), json!("2000000")),
            raw("0x1234", "BAD", json!("18"), json!("1")),
            raw(USDC, "NODEC", json!(""), json!("1")),
        ]));
        let aggregator = BalanceAggregator::new(Arc::new(indexer));
        let balances = aggregator.aggregate(Address::zero()).await.unwrap();

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].symbol, "USDC");
        assert_eq!(balances[0].decimals, 6);
        assert_eq!(balances[0].balance, U256::from(2_000_000u64));
        assert_eq!(balances[0].formatted_balance(), "2");
    }

    #[tokio::test]
    async fn aggregate_propagates_indexer_failure(){
        let indexer = FixedIndexer(Err(IndexerError::Status(503)));
        let aggregator = BalanceAggregator::new(Arc::new(indexer));
        let result = aggregator.aggregate(Address::zero()).await;
        assert_eq!(result, Err(IndexerError::Status(503)));
    }

}
