


use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use web3::types::Address;
use balancereq::TokenBalance;
use compliancereq::{ComplianceInfo, ComplianceResolutionError};
use transferreq::TransferDraft;
use crate::session::{AccountInfo, Receipt};


/*   ------------------------------------------------------------------------------------------------
    | everything the ui renders, a snapshot is cloned out of the coordinator on every read.
    | values are only ever replaced wholesale (balances list, compliance records), never patched
    |
*/
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ViewState{
    pub phase: Phase,
    pub account: Option<AccountInfo>,
    pub balances: BalancesView,
    pub own_compliance: ComplianceView,
    pub recipient_compliance: RecipientComplianceView,
    pub draft: TransferDraft,
    pub submission: SubmissionState,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase{
    #[default]
    Disconnected,
    Connected,
    Submitting,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus{
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BalancesView{
    pub tokens: Vec<TokenBalance>,
    pub status: LoadStatus,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum ComplianceView{
    #[default]
    Idle,
    Loading,
    Resolved(ComplianceInfo),
    Unresolved(ComplianceResolutionError),
}

impl From<Result<ComplianceInfo, ComplianceResolutionError>> for ComplianceView{
    fn from(outcome: Result<ComplianceInfo, ComplianceResolutionError>) -> Self{
        match outcome{
            Ok(info) => ComplianceView::Resolved(info),
            Err(e) => ComplianceView::Unresolved(e),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientComplianceView{
    pub address: Option<Address>, // the complete address the status belongs to
    pub status: ComplianceView,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState{
    #[default]
    Idle,
    Submitted(Receipt),
    Failed(String),
}
