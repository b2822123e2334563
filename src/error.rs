


/*
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
        TRANSFER COORDINATOR ERROR TAXONOMY
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=

   every collaborator failure is converted into one of these at the
   coordinator boundary, compliance lookups are the exception since an
   unregistered address is an expected outcome and lives in the view state
   as a ComplianceResolutionError instead
*/


use transferreq::ValidationError;
use crate::constants::{NOT_CONNECTED, SUBMISSION_IN_FLIGHT};


#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError{
    #[error("wallet connection failed: {0}")]
    Connection(String),
    #[error("balance aggregation failed: {0}")]
    Aggregation(String),
    #[error("invalid transfer: {0}")]
    Validation(#[from] ValidationError),
    #[error("transfer submission failed: {0}")]
    Submission(String),
    #[error("{}", NOT_CONNECTED)]
    NotConnected,
    #[error("{}", SUBMISSION_IN_FLIGHT)]
    SubmissionInFlight,
}

impl CoordinatorError{

    /// User input problems are recoverable locally and never shown as system failures.
    pub fn is_user_error(&self) -> bool{
        matches!(self, CoordinatorError::Validation(_))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError{
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid{
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("can't build collaborator: {0}")]
    Collaborator(String),
}
