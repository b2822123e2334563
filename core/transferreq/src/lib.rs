


/*   ------------------------------------------------------------------------------------------------
    | turns the user's (token, recipient, amount) draft into an erc20 transfer call that the
    | wallet session can submit as is. building is pure, no io happens in here and the same
    | draft always gives back the same call or the same validation error. preconditions are
    | checked in order and the first failing one wins:
    |    🪙 a token must be selected
    |    📮 the recipient must be a complete 20 bytes hex address
    |    💵 the amount must be a positive decimal that scales to at least one base unit
    |
*/


use log::debug;
use serde::{Serialize, Deserialize};
use web3::types::{Address, U256};
use balancereq::TokenBalance;

pub mod abi;
pub mod address;
pub mod amount;

pub use address::{parse_address, is_complete_address, compress_address, ADDRESS_HEX_LEN};
use amount::{scale_amount, ScaleError};


/// In-progress user input, incomplete states are normal here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDraft{
    pub selected_token: Option<TokenBalance>,
    pub recipient_address: Option<String>,
    pub amount: Option<String>,
}

impl TransferDraft{

    pub fn recipient(&self) -> Option<&str>{
        self.recipient_address.as_deref().filter(|r| !r.is_empty())
    }

    pub fn amount(&self) -> Option<&str>{
        self.amount.as_deref().filter(|a| !a.is_empty())
    }

    /// Whether every field is filled in, valid or not.
    pub fn is_complete(&self) -> bool{
        self.selected_token.is_some() && self.recipient().is_some() && self.amount().is_some()
    }

    pub fn clear(&mut self){
        *self = Self::default();
    }

}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall{
    pub to: Address,
    pub data: Vec<u8>,
    pub value: U256,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField{
    Token,
    Recipient,
    Amount,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError{
    #[error("no token selected")]
    MissingToken,
    #[error("recipient address is missing")]
    MissingRecipient,
    #[error("recipient {0:?} is not a 20 bytes hex address")]
    InvalidRecipient(String),
    #[error("transfer amount is missing")]
    MissingAmount,
    #[error("transfer amount {0:?} is not a positive decimal number")]
    InvalidAmount(String),
    #[error("transfer amount {0:?} is smaller than one base unit of the token")]
    AmountTooSmall(String),
    #[error("transfer amount {0:?} doesn't fit in uint256")]
    AmountOverflow(String),
}

impl ValidationError{

    pub fn field(&self) -> DraftField{
        match self{
            ValidationError::MissingToken => DraftField::Token,
            ValidationError::MissingRecipient | ValidationError::InvalidRecipient(_) => DraftField::Recipient,
            ValidationError::MissingAmount
            | ValidationError::InvalidAmount(_)
            | ValidationError::AmountTooSmall(_)
            | ValidationError::AmountOverflow(_) => DraftField::Amount,
        }
    }
}


#[derive(Debug, Clone, Copy, Default)]
pub struct TransferRequestBuilder;

impl TransferRequestBuilder{

    pub fn build(&self, draft: &TransferDraft) -> Result<EncodedCall, ValidationError>{

        let Some(token) = draft.selected_token.as_ref() else{
            return Err(ValidationError::MissingToken);
        };

        let Some(recipient_input) = draft.recipient() else{
            return Err(ValidationError::MissingRecipient);
        };
        let Some(recipient) = parse_address(recipient_input) else{
            return Err(ValidationError::InvalidRecipient(recipient_input.to_string()));
        };

        let Some(amount_input) = draft.amount() else{
            return Err(ValidationError::MissingAmount);
        };
        let amount = scale_amount(amount_input, token.decimals)
            .map_err(|e| match e{
                ScaleError::NotADecimal | ScaleError::NotPositive => ValidationError::InvalidAmount(amount_input.to_string()),
                ScaleError::BelowOneBaseUnit => ValidationError::AmountTooSmall(amount_input.to_string()),
                ScaleError::Overflow => ValidationError::AmountOverflow(amount_input.to_string()),
            })?;

        debug!("encoding transfer of {} {} base units to {:?}", amount, token.symbol, recipient);

        Ok(
            EncodedCall{
                to: token.contract_address,
                data: abi::encode_transfer(recipient, amount),
                value: U256::zero(),
            }
        )
    }

}



#[cfg(test)]
mod tests{

    use super::*;

    const RECIPIENT: &str = "0x14A1EC9b43c270a61cDD89B6CbdD985935D897fE";

    fn usdc() -> TokenBalance{
        TokenBalance{
            contract_address: Address::from_low_u64_be(0xc0ffee),
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            decimals: 6,
            balance: U256::from(2_000_000u64),
        }
    }

    fn draft(token: Option<TokenBalance>, recipient: &str, amount: &str) -> TransferDraft{
        TransferDraft{
            selected_token: token,
            recipient_address: Some(recipient.to_string()),
            amount: Some(amount.to_string()),
        }
    }

    #[test]
    fn builds_a_zero_value_transfer_to_the_token_contract(){
        let call = TransferRequestBuilder.build(&draft(Some(usdc()), RECIPIENT, "1.5")).unwrap();
        assert_eq!(call.to, Address::from_low_u64_be(0xc0ffee));
        assert_eq!(call.value, U256::zero());
        assert_eq!(
            call.data,
            abi::encode_transfer(parse_address(RECIPIENT).unwrap(), U256::from(1_500_000u64))
        );
    }

    #[test]
    fn building_is_deterministic(){
        let ok = draft(Some(usdc()), RECIPIENT, "2");
        assert_eq!(TransferRequestBuilder.build(&ok), TransferRequestBuilder.build(&ok));

        let bad = draft(Some(usdc()), "0x123", "2");
        assert_eq!(TransferRequestBuilder.build(&bad), TransferRequestBuilder.build(&bad));
    }

    #[test]
    fn first_failing_precondition_wins(){
        let empty = TransferDraft::default();
        assert_eq!(TransferRequestBuilder.build(&empty), Err(ValidationError::MissingToken));

        let no_token = draft(None, "0x123", "abc");
        assert_eq!(TransferRequestBuilder.build(&no_token).unwrap_err().field(), DraftField::Token);

        let bad_recipient = draft(Some(usdc()), "0x123", "abc");
        assert_eq!(
            TransferRequestBuilder.build(&bad_recipient),
            Err(ValidationError::InvalidRecipient("0x123".to_string()))
        );

        let no_recipient = draft(Some(usdc()), "", "1");
        assert_eq!(TransferRequestBuilder.build(&no_recipient), Err(ValidationError::MissingRecipient));

        let no_amount = draft(Some(usdc()), RECIPIENT, "");
        assert_eq!(TransferRequestBuilder.build(&no_amount), Err(ValidationError::MissingAmount));
    }

    #[test]
    fn amount_errors_point_at_the_amount_field(){
        for (amount, expected) in [
            ("abc", ValidationError::InvalidAmount("abc".to_string())),
            ("0", ValidationError::InvalidAmount("0".to_string())),
            ("0.0000001", ValidationError::AmountTooSmall("0.0000001".to_string())),
        ]{
            let result = TransferRequestBuilder.build(&draft(Some(usdc()), RECIPIENT, amount));
            assert_eq!(result, Err(expected));
            assert_eq!(result.unwrap_err().field(), DraftField::Amount);
        }
    }

    #[test]
    fn draft_completeness_ignores_empty_strings(){
        let mut draft = draft(Some(usdc()), RECIPIENT, "");
        assert!(!draft.is_complete());
        draft.amount = Some("1".to_string());
        assert!(draft.is_complete());
        draft.clear();
        assert_eq!(draft, TransferDraft::default());
    }

}
