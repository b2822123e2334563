


use web3::types::Address;


/// `0x` followed by 40 hex digits.
pub const ADDRESS_HEX_LEN: usize = 42;


/*
    strict parsing of user typed addresses: the exact length boundary is what
    decides whether a recipient is complete, so no trimming and no prefix-less
    forms; checksum casing isn't enforced
*/
pub fn parse_address(input: &str) -> Option<Address>{

    if input.len() != ADDRESS_HEX_LEN{
        return None;
    }

    let digits = input.strip_prefix("0x")?;
    let bytes = hex::decode(digits).ok()?;
    if bytes.len() != 20{
        return None;
    }

    Some(Address::from_slice(&bytes))
}

pub fn is_complete_address(input: &str) -> bool{
    parse_address(input).is_some()
}

pub fn address_hex(address: &Address) -> String{
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// `0x12345678...90abcdef12` style rendering used by the wallet panel.
pub fn compress_address(address: &Address) -> String{
    let full = address_hex(address);
    format!("{}...{}", &full[..10], &full[full.len() - 10..])
}



#[cfg(test)]
mod tests{

    use super::*;

    const RECIPIENT: &str = "0x14A1EC9b43c270a61cDD89B6CbdD985935D897fE";

    #[test]
    fn parses_mixed_case_addresses(){
        let address = parse_address(RECIPIENT).unwrap();
        assert_eq!(address_hex(&address), RECIPIENT.to_lowercase());
    }

    #[test]
    fn rejects_incomplete_or_malformed_input(){
        assert_eq!(parse_address(""), None);
        assert_eq!(parse_address("0x14A1EC9b43c270a61cDD89B6CbdD985935D897f"), None);
        assert_eq!(parse_address("0x14A1EC9b43c270a61cDD89B6CbdD985935D897fEE"), None);
        assert_eq!(parse_address("0x14A1EC9b43c270a61cDD89B6CbdD985935D897fZ"), None);
        assert_eq!(parse_address("0014A1EC9b43c270a61cDD89B6CbdD985935D897fE"), None);
        assert_eq!(parse_address(" 0x14A1EC9b43c270a61cDD89B6CbdD985935D897f"), None);
        assert!(!is_complete_address("0x14A1"));
        assert!(is_complete_address(RECIPIENT));
    }

    #[test]
    fn compresses_to_head_and_tail(){
        let address = parse_address(RECIPIENT).unwrap();
        assert_eq!(compress_address(&address), "0x14a1ec9b...5935d897fe");
    }

}
