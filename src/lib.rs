


/*
    compliance aware token transfers for smart contract wallets: aggregate the
    erc20 holdings of the connected account, resolve kyc and sanctions
    attestations for the sender and any recipient, and submit a transfer once
    the user's draft validates.

    the heavy lifting lives in the core crates:
        balancereq      -> BalanceAggregator, blockscout indexer, balance formatting
        compliancereq   -> ComplianceResolver, kyc viewer oracle
        transferreq     -> TransferRequestBuilder, address and amount parsing, erc20 abi
    and this crate owns the orchestration and the state the ui renders.
*/


pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod session;
pub mod state;

pub use config::Env;
pub use coordinator::{ConnectOutcome, TransferCoordinator};
pub use error::{ConfigError, CoordinatorError};
pub use session::{AccountInfo, Receipt, SessionError, WalletSession};
pub use state::{BalancesView, ComplianceView, LoadStatus, Phase, RecipientComplianceView, SubmissionState, ViewState};

pub use balancereq::{format_balance, BalanceAggregator, BalanceIndexer, BlockscoutIndexer, IndexerError, RawTokenBalance, TokenBalance};
pub use compliancereq::{ComplianceInfo, ComplianceOracle, ComplianceResolutionError, ComplianceResolver, KycViewerOracle, OracleError, RawAttestation};
pub use transferreq::{DraftField, EncodedCall, TransferDraft, TransferRequestBuilder, ValidationError};


/// Installs `env_logger` with an `info` default, `RUST_LOG` overrides it.
pub fn init_logging(){
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
