


/*   ------------------------------------------------------------------------------------------------
    | the transfer coordinator drives: connect -> load balances + own compliance -> recipient
    | compliance on every complete recipient -> build + send -> refresh balances -> reset draft
    |
    | all async steps interleave on the caller's runtime, the view state sits behind a mutex
    | that is never held across a collaborator call. independently triggered loads are tagged
    | with a sequence number (and the session epoch) when they start and their result is only
    | applied if nothing newer has been issued since, so a slow stale response can't overwrite
    | fresher state.
    |
*/


use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::sync::Mutex;
use web3::types::Address;
use balancereq::{BalanceAggregator, BalanceIndexer, TokenBalance};
use compliancereq::{ComplianceInfo, ComplianceOracle, ComplianceResolutionError, ComplianceResolver};
use transferreq::{parse_address, TransferRequestBuilder};
use crate::config::Env;
use crate::constants::{COLLABORATOR_PANICKED, DISCONNECTED_WHILE_CONNECTING};
use crate::error::{ConfigError, CoordinatorError};
use crate::session::{AccountInfo, Receipt, WalletSession};
use crate::state::{ComplianceView, LoadStatus, Phase, RecipientComplianceView, SubmissionState, ViewState};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome{
    Connected(AccountInfo),
    AlreadyConnected(AccountInfo), // cached session, the wallet wasn't asked again
    InFlight, // another connect hasn't settled yet
}

#[derive(Default)]
struct Inner{
    view: ViewState,
    epoch: u64, // bumped on disconnect
    connecting: bool,
    balances_seq: u64,
    own_compliance_seq: u64,
    recipient_seq: u64,
}

pub struct TransferCoordinator{
    session: Arc<dyn WalletSession>,
    aggregator: BalanceAggregator,
    resolver: ComplianceResolver,
    builder: TransferRequestBuilder,
    inner: Mutex<Inner>,
}

impl TransferCoordinator{

    pub fn new(
        session: Arc<dyn WalletSession>,
        indexer: Arc<dyn BalanceIndexer>,
        oracle: Arc<dyn ComplianceOracle>
    ) -> Self{
        Self{
            session,
            aggregator: BalanceAggregator::new(indexer),
            resolver: ComplianceResolver::new(oracle),
            builder: TransferRequestBuilder,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Wires the blockscout indexer and the kyc viewer oracle described by `env`.
    pub fn from_env(env: &Env, session: Arc<dyn WalletSession>) -> Result<Self, ConfigError>{
        let indexer = env.blockscout_indexer()?;
        let oracle = env.kyc_viewer_oracle()?;
        Ok(Self::new(session, Arc::new(indexer), Arc::new(oracle)))
    }

    pub async fn view(&self) -> ViewState{
        self.inner.lock().await.view.clone()
    }

    pub async fn can_submit(&self) -> bool{
        let inner = self.inner.lock().await;
        inner.view.phase == Phase::Connected && inner.view.draft.is_complete()
    }

    /*
        "make sure a session exists", safe to call on every refresh of the
        embedding ui: a cached account short-circuits and a connect that is
        still pending turns the call into a no-op
    */
    pub async fn connect(&self) -> Result<ConnectOutcome, CoordinatorError>{

        let epoch = {
            let mut inner = self.inner.lock().await;
            if let Some(account) = &inner.view.account{
                debug!("already connected as {:?}", account.wallet_address);
                return Ok(ConnectOutcome::AlreadyConnected(account.clone()));
            }
            if inner.connecting{
                return Ok(ConnectOutcome::InFlight);
            }
            inner.connecting = true;
            inner.epoch
        };

        let outcome = match shield(self.session.connect()).await{
            Ok(Ok(account)) => Ok(account),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic),
        };

        let (account, balances_seq, own_compliance_seq) = {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch{
                warn!("dropping connect result, session was disconnected meanwhile");
                return Err(CoordinatorError::Connection(DISCONNECTED_WHILE_CONNECTING.to_string()));
            }
            inner.connecting = false;

            let account = match outcome{
                Ok(account) => account,
                Err(reason) => {
                    error!("😵 wallet connect failed: {}", reason);
                    inner.view.phase = Phase::Disconnected;
                    return Err(CoordinatorError::Connection(reason));
                }
            };

            info!(" ---> 🔌 connected wallet {} with app key {}", account.display_wallet(), account.display_app_key());
            inner.view.account = Some(account.clone());
            inner.view.phase = Phase::Connected;
            inner.view.balances.status = LoadStatus::Loading;
            inner.view.own_compliance = ComplianceView::Loading;
            inner.balances_seq += 1;
            inner.own_compliance_seq += 1;
            (account, inner.balances_seq, inner.own_compliance_seq)
        };

        /* these two race, neither waits on the other and their failures stay separate */
        let address = account.wallet_address;
        let _ = tokio::join!(
            self.load_balances(epoch, balances_seq, address),
            self.load_own_compliance(epoch, own_compliance_seq, address),
        );

        Ok(ConnectOutcome::Connected(account))
    }

    /// Creates a wallet through the session and then connects to it.
    pub async fn login(&self) -> Result<ConnectOutcome, CoordinatorError>{

        let created = match shield(self.session.create_new_wallet()).await{
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic),
        };
        if let Err(reason) = created{
            error!("😵 wallet login/signup failed: {}", reason);
            return Err(CoordinatorError::Connection(reason));
        }

        self.connect().await
    }

    pub async fn disconnect(&self){
        let mut inner = self.inner.lock().await;
        let next_epoch = inner.epoch + 1;
        *inner = Inner{
            epoch: next_epoch,
            balances_seq: inner.balances_seq,
            own_compliance_seq: inner.own_compliance_seq,
            recipient_seq: inner.recipient_seq + 1,
            ..Default::default()
        };
        info!(" ---> 🔌 wallet session cleared");
    }

    pub async fn refresh_balances(&self) -> Result<(), CoordinatorError>{

        let (epoch, seq, address) = {
            let mut inner = self.inner.lock().await;
            let Some(account) = &inner.view.account else{
                return Err(CoordinatorError::NotConnected);
            };
            let address = account.wallet_address;
            inner.balances_seq += 1;
            inner.view.balances.status = LoadStatus::Loading;
            (inner.epoch, inner.balances_seq, address)
        };

        self.load_balances(epoch, seq, address).await
    }

    pub async fn refresh_own_compliance(&self) -> Result<(), CoordinatorError>{

        let (epoch, seq, address) = {
            let mut inner = self.inner.lock().await;
            let Some(account) = &inner.view.account else{
                return Err(CoordinatorError::NotConnected);
            };
            let address = account.wallet_address;
            inner.own_compliance_seq += 1;
            inner.view.own_compliance = ComplianceView::Loading;
            (inner.epoch, inner.own_compliance_seq, address)
        };

        self.load_own_compliance(epoch, seq, address).await;
        Ok(())
    }

    async fn load_balances(&self, epoch: u64, seq: u64, address: Address) -> Result<(), CoordinatorError>{

        let outcome = match shield(self.aggregator.aggregate(address)).await{
            Ok(Ok(tokens)) => Ok(tokens),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic),
        };

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch || inner.balances_seq != seq{
            debug!("discarding stale balances #{} for {:?}", seq, address);
            return Ok(());
        }

        match outcome{
            Ok(tokens) => {
                inner.view.balances.tokens = tokens;
                inner.view.balances.status = LoadStatus::Ready;
                inner.view.balances.refreshed_at = Some(chrono::Utc::now());
                Ok(())
            },
            Err(reason) => {
                /* the previous list stays on screen next to the failure marker */
                error!("💸 balance aggregation failed for {:?}: {}", address, reason);
                inner.view.balances.status = LoadStatus::Failed(reason.clone());
                Err(CoordinatorError::Aggregation(reason))
            }
        }
    }

    async fn load_own_compliance(&self, epoch: u64, seq: u64, address: Address){

        let outcome = self.resolve(address).await;

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch || inner.own_compliance_seq != seq{
            debug!("discarding stale own compliance #{} for {:?}", seq, address);
            return;
        }
        inner.view.own_compliance = ComplianceView::from(outcome);
    }

    async fn resolve(&self, address: Address) -> Result<ComplianceInfo, ComplianceResolutionError>{
        match shield(self.resolver.resolve(address)).await{
            Ok(outcome) => outcome,
            Err(panic) => Err(ComplianceResolutionError::OracleUnreachable(panic)),
        }
    }

    /*
        recipient field edits: only a syntactically complete address triggers
        a resolution, anything else resets the recipient status to idle and
        invalidates whatever lookup is still in flight. re-entering the same
        complete address doesn't resolve it again unless the last lookup failed.
        the draft is frozen while a transfer is being submitted
    */
    pub async fn set_recipient(&self, input: &str) -> Result<(), CoordinatorError>{

        let ticket = {
            let mut inner = self.inner.lock().await;
            if inner.view.phase == Phase::Submitting{
                return Err(CoordinatorError::SubmissionInFlight);
            }
            inner.view.draft.recipient_address = if input.is_empty(){ None } else{ Some(input.to_string()) };

            match parse_address(input){
                None => {
                    if inner.view.recipient_compliance != RecipientComplianceView::default(){
                        inner.recipient_seq += 1;
                        inner.view.recipient_compliance = RecipientComplianceView::default();
                    }
                    None
                },
                /* a failed lookup for the same address is retried on re-entry */
                Some(address) if inner.view.recipient_compliance.address == Some(address)
                    && matches!(inner.view.recipient_compliance.status, ComplianceView::Loading | ComplianceView::Resolved(_)) => None,
                Some(address) => {
                    inner.recipient_seq += 1;
                    inner.view.recipient_compliance = RecipientComplianceView{
                        address: Some(address),
                        status: ComplianceView::Loading,
                    };
                    Some((inner.recipient_seq, address))
                }
            }
        };

        let Some((seq, address)) = ticket else{
            return Ok(());
        };

        let outcome = self.resolve(address).await;

        let mut inner = self.inner.lock().await;
        if inner.recipient_seq != seq{
            debug!("discarding stale recipient compliance #{} for {:?}", seq, address);
            return Ok(());
        }
        inner.view.recipient_compliance.status = ComplianceView::from(outcome);
        Ok(())
    }

    /// Selects the first holding with `symbol`, or clears the selection.
    pub async fn select_token(&self, symbol: &str) -> Result<Option<TokenBalance>, CoordinatorError>{
        let mut inner = self.inner.lock().await;
        if inner.view.phase == Phase::Submitting{
            return Err(CoordinatorError::SubmissionInFlight);
        }
        let token = inner.view.balances.tokens
            .iter()
            .find(|token| token.symbol == symbol)
            .cloned();
        inner.view.draft.selected_token = token.clone();
        Ok(token)
    }

    pub async fn set_amount(&self, amount: &str) -> Result<(), CoordinatorError>{
        let mut inner = self.inner.lock().await;
        if inner.view.phase == Phase::Submitting{
            return Err(CoordinatorError::SubmissionInFlight);
        }
        inner.view.draft.amount = if amount.is_empty(){ None } else{ Some(amount.to_string()) };
        Ok(())
    }

    /*
        one submission at a time; on success the draft is cleared and the
        balances are fetched again, on failure the draft is kept so the user
        can retry without typing everything again
    */
    pub async fn submit(&self) -> Result<Receipt, CoordinatorError>{

        let (epoch, call, symbol) = {
            let mut inner = self.inner.lock().await;
            if inner.view.phase == Phase::Submitting{
                warn!("transfer already in flight, ignoring submit");
                return Err(CoordinatorError::SubmissionInFlight);
            }
            if inner.view.account.is_none(){
                return Err(CoordinatorError::NotConnected);
            }
            let call = match self.builder.build(&inner.view.draft){
                Ok(call) => call,
                Err(e) => {
                    info!("transfer rejected on {:?}: {}", e.field(), e);
                    return Err(e.into());
                }
            };
            let symbol = inner.view.draft.selected_token
                .as_ref()
                .map(|token| token.symbol.clone())
                .unwrap_or_default();
            inner.view.phase = Phase::Submitting;
            (inner.epoch, call, symbol)
        };

        info!(" ---> 📤 sending {} transfer through token contract {:?}", symbol, call.to);
        let outcome = match shield(self.session.send_transaction(vec![call])).await{
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic),
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch{
                /* disconnected mid flight, the view was already reset */
                return outcome.map_err(CoordinatorError::Submission);
            }
            inner.view.phase = Phase::Connected;

            match &outcome{
                Ok(receipt) => {
                    info!(" ---> ✅ transfer sent {:?}", receipt.hash);
                    inner.view.submission = SubmissionState::Submitted(receipt.clone());
                    inner.view.draft.clear();
                    inner.recipient_seq += 1;
                    inner.view.recipient_compliance = RecipientComplianceView::default();
                },
                Err(reason) => {
                    error!("😵 failed to transfer token: {}", reason);
                    inner.view.submission = SubmissionState::Failed(reason.clone());
                    return Err(CoordinatorError::Submission(reason.clone()));
                }
            }
        }

        if let Err(e) = self.refresh_balances().await{
            warn!("post transfer balance refresh failed: {}", e);
        }

        outcome.map_err(CoordinatorError::Submission)
    }

}

/* catches a panicking collaborator future and turns it into a failure reason */
async fn shield<F: Future>(future: F) -> Result<F::Output, String>{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            let reason = panic.downcast_ref::<&str>().map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            format!("{}: {}", COLLABORATOR_PANICKED, reason)
        })
}
