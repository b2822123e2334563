


/*   ------------------------------------------------------------------------------------------------
    | compliance attestations (kyc and sanctions screening) for any evm address, the resolver
    | doesn't care whether the address is the connected wallet or a recipient typed by the
    | user, both go through the same path. a failed lookup is an expected per-address outcome
    | and is returned as a ComplianceResolutionError value, it never panics across this crate.
    |
*/


use std::sync::Arc;
use log::{info, warn};
use serde::{Serialize, Deserialize};
use web3::types::Address;

pub mod viewer;
pub use viewer::KycViewerOracle;


pub const UNKNOWN_COUNTRY_CODE: &str = "0";


/// Attestation fields exactly as the oracle reports them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttestation{
    pub is_individual: bool,
    pub is_corporate: bool,
    pub is_kyc: bool,
    pub is_sanctions_safe: bool,
    pub country: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError{
    #[error("address has no attestation")]
    NotFound,
    #[error("{0}")]
    Unreachable(String),
    #[error("{0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait ComplianceOracle: Send + Sync{
    async fn get_compliance_info(&self, address: Address) -> Result<RawAttestation, OracleError>;
}


#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceInfo{
    pub is_individual: bool,
    pub is_corporate: bool,
    pub is_kyc: bool,
    pub is_sanctions_safe: bool,
    pub country_code: String, // iso 3166 numeric, "0" or empty means unknown
}

impl ComplianceInfo{

    /// `None` when the attestation leaves the country unset.
    pub fn known_country_code(&self) -> Option<&str>{
        let code = self.country_code.trim();
        if code.is_empty() || code.trim_start_matches('0').is_empty(){
            None
        } else{
            Some(code)
        }
    }
}

impl From<RawAttestation> for ComplianceInfo{
    fn from(raw: RawAttestation) -> Self{
        Self{
            is_individual: raw.is_individual,
            is_corporate: raw.is_corporate,
            is_kyc: raw.is_kyc,
            is_sanctions_safe: raw.is_sanctions_safe,
            country_code: raw.country.trim().to_string(),
        }
    }
}

#[derive(thiserror::Error, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ComplianceResolutionError{
    #[error("address is not registered")]
    NotRegistered,
    #[error("compliance oracle unreachable: {0}")]
    OracleUnreachable(String),
    #[error("malformed compliance attestation: {0}")]
    MalformedResponse(String),
}

impl ComplianceResolutionError{

    pub fn reason(&self) -> String{
        self.to_string()
    }
}

impl From<OracleError> for ComplianceResolutionError{
    fn from(error: OracleError) -> Self{
        match error{
            OracleError::NotFound => ComplianceResolutionError::NotRegistered,
            OracleError::Unreachable(reason) => ComplianceResolutionError::OracleUnreachable(reason),
            OracleError::Malformed(reason) => ComplianceResolutionError::MalformedResponse(reason),
        }
    }
}


pub struct ComplianceResolver{
    oracle: Arc<dyn ComplianceOracle>,
}

impl ComplianceResolver{

    pub fn new(oracle: Arc<dyn ComplianceOracle>) -> Self{
        Self{ oracle }
    }

    pub async fn resolve(&self, address: Address) -> Result<ComplianceInfo, ComplianceResolutionError>{

        match self.oracle.get_compliance_info(address).await{
            Ok(raw) => {
                info!(" ---> 🆔 resolved compliance for {:?} | kyc: {} | sanctions safe: {}", address, raw.is_kyc, raw.is_sanctions_safe);
                Ok(ComplianceInfo::from(raw))
            },
            Err(e) => {
                warn!("compliance resolution failed for {:?}: {}", address, e);
                Err(ComplianceResolutionError::from(e))
            }
        }
    }

}
