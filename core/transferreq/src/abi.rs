


use web3::ethabi::{self, ParamType, Token};
use web3::types::{Address, U256};


pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// First four bytes of keccak256("transfer(address,uint256)").
pub fn transfer_selector() -> [u8; 4]{
    ethabi::short_signature("transfer", &[ParamType::Address, ParamType::Uint(256)])
}

pub fn encode_transfer(recipient: Address, amount: U256) -> Vec<u8>{
    let mut data = transfer_selector().to_vec();
    data.extend(ethabi::encode(&[Token::Address(recipient), Token::Uint(amount)]));
    data
}
