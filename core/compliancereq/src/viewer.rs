


use std::time::Duration;
use log::{debug, error};
use web3::Web3;
use web3::transports::Http;
use web3::ethabi::{self, ParamType, Token};
use web3::types::{Address, Bytes, CallRequest};
use crate::{ComplianceOracle, OracleError, RawAttestation};


/*
    read-only views exposed by the kyc viewer contract, every one of them
    takes the subject address; the flags come back as bool and the country
    as a uint16 iso numeric code where 0 means unset
*/
pub const IS_INDIVIDUAL: &str = "isIndividual";
pub const IS_COMPANY: &str = "isCompany";
pub const IS_KYC: &str = "isKYC";
pub const IS_SANCTIONS_SAFE: &str = "isSanctionsSafe";
pub const GET_COUNTRY: &str = "getCountry";


pub struct KycViewerOracle{
    web3: Web3<Http>,
    viewer: Address,
    timeout: Duration,
}

impl KycViewerOracle{

    pub fn new(rpc_endpoint: &str, viewer: Address, timeout: Duration) -> Result<Self, OracleError>{

        let transport = Http::new(rpc_endpoint)
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        Ok(
            Self{
                web3: Web3::new(transport),
                viewer,
                timeout,
            }
        )
    }

    async fn call(&self, function: &str, subject: Address) -> Result<Vec<u8>, OracleError>{

        let request = CallRequest{
            to: Some(self.viewer),
            data: Some(Bytes(encode_query(function, subject))),
            ..Default::default()
        };

        let pending = self.web3.eth().call(request, None);
        let Ok(result) = tokio::time::timeout(self.timeout, pending).await else{
            return Err(OracleError::Unreachable(format!("{} timed out after {:?}", function, self.timeout)));
        };

        match result{
            Ok(returned) => {
                debug!("{}({:?}) returned {} bytes", function, subject, returned.0.len());
                Ok(returned.0)
            },
            Err(web3::Error::Rpc(rpc)) => Err(classify_rpc_message(&rpc.message)),
            Err(web3::Error::Decoder(reason)) | Err(web3::Error::InvalidResponse(reason)) => {
                error!("kyc viewer {} returned an invalid response: {}", function, reason);
                Err(OracleError::Malformed(reason))
            },
            Err(e) => Err(OracleError::Unreachable(e.to_string()))
        }
    }

    async fn query_flag(&self, function: &str, subject: Address) -> Result<bool, OracleError>{
        let returned = self.call(function, subject).await?;
        decode_flag(&returned)
    }

    async fn query_country(&self, subject: Address) -> Result<String, OracleError>{
        let returned = self.call(GET_COUNTRY, subject).await?;
        decode_country(&returned)
    }

}

#[async_trait::async_trait]
impl ComplianceOracle for KycViewerOracle{

    async fn get_compliance_info(&self, address: Address) -> Result<RawAttestation, OracleError>{

        let (is_individual, is_corporate, is_kyc, is_sanctions_safe, country) = futures::try_join!(
            self.query_flag(IS_INDIVIDUAL, address),
            self.query_flag(IS_COMPANY, address),
            self.query_flag(IS_KYC, address),
            self.query_flag(IS_SANCTIONS_SAFE, address),
            self.query_country(address),
        )?;

        Ok(
            RawAttestation{
                is_individual,
                is_corporate,
                is_kyc,
                is_sanctions_safe,
                country,
            }
        )
    }

}

pub fn encode_query(function: &str, subject: Address) -> Vec<u8>{
    let mut data = ethabi::short_signature(function, &[ParamType::Address]).to_vec();
    data.extend(ethabi::encode(&[Token::Address(subject)]));
    data
}

/// A revert means the viewer has no record for the address.
pub fn classify_rpc_message(message: &str) -> OracleError{
    if message.to_lowercase().contains("revert"){
        OracleError::NotFound
    } else{
        OracleError::Unreachable(message.to_string())
    }
}

pub fn decode_flag(returned: &[u8]) -> Result<bool, OracleError>{
    let tokens = ethabi::decode(&[ParamType::Bool], returned)
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    match tokens.as_slice(){
        [Token::Bool(flag)] => Ok(*flag),
        other => Err(OracleError::Malformed(format!("expected a bool, got {:?}", other)))
    }
}

pub fn decode_country(returned: &[u8]) -> Result<String, OracleError>{
    let tokens = ethabi::decode(&[ParamType::Uint(16)], returned)
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    match tokens.as_slice(){
        [Token::Uint(code)] => Ok(code.to_string()),
        other => Err(OracleError::Malformed(format!("expected a uint16, got {:?}", other)))
    }
}
