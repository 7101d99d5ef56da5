//! ContractBridge: the actions behind each UI trigger.
//!
//! Every action follows the same chain: ask the wallet for the active account,
//! issue one remote call signed by it, log the outcome. Failures are logged once
//! with the action's label and returned to the caller; nothing is retried.

use serde_json::Value;

use crate::config::BridgeConfig;
use crate::console::{ActionLog, BrowserConsole};
use crate::dispatch::ActionRequest;
use crate::error::BridgeError;
use crate::proposal::{HiddenInstruction, ProposalId, ProposalRequest};
use crate::provider::{AccountId, Clock, RemoteContract, SystemClock, WalletProvider};

/// What a successful action produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Initialized,
    Transferred,
    ProposalCreated(ProposalId),
    BallotCast,
    Executed,
    Assets(i64),
}

pub struct ContractBridge<P, C, L = BrowserConsole, K = SystemClock> {
    config: BridgeConfig,
    provider: P,
    contract: C,
    log: L,
    clock: K,
}

impl<P, C> ContractBridge<P, C>
where
    P: WalletProvider,
    C: RemoteContract,
{
    pub fn new(config: BridgeConfig, provider: P, contract: C) -> Self {
        ContractBridge {
            config,
            provider,
            contract,
            log: BrowserConsole,
            clock: SystemClock,
        }
    }
}

impl<P, C, L, K> ContractBridge<P, C, L, K>
where
    P: WalletProvider,
    C: RemoteContract,
    L: ActionLog,
    K: Clock,
{
    pub fn with_log<L2: ActionLog>(self, log: L2) -> ContractBridge<P, C, L2, K> {
        ContractBridge {
            config: self.config,
            provider: self.provider,
            contract: self.contract,
            log,
            clock: self.clock,
        }
    }

    pub fn with_clock<K2: Clock>(self, clock: K2) -> ContractBridge<P, C, L, K2> {
        ContractBridge {
            config: self.config,
            provider: self.provider,
            contract: self.contract,
            log: self.log,
            clock,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// First account the wallet authorizes. Fetched anew on every call.
    pub async fn request_active_account(&self) -> Result<AccountId, BridgeError> {
        let accounts = self.provider.request_accounts().await?;
        accounts.into_iter().next().ok_or(BridgeError::NoAccountAuthorized(None))
    }

    pub async fn initialize(&self) -> Result<(), BridgeError> {
        self.run(ActionRequest::Initialize).await.map(|_| ())
    }

    /// Forwards `amount` and `recipient` untouched; the contract does any validation.
    pub async fn transfer_assets(&self, amount: i32, recipient: &str) -> Result<(), BridgeError> {
        self.run(ActionRequest::TransferAssets {
            amount,
            recipient: recipient.to_string(),
        })
        .await
        .map(|_| ())
    }

    pub async fn create_proposal(
        &self,
        instructions: Vec<HiddenInstruction>,
    ) -> Result<ProposalId, BridgeError> {
        match self.run(ActionRequest::CreateProposal { instructions }).await? {
            ActionOutcome::ProposalCreated(id) => Ok(id),
            other => Err(BridgeError::Serialization(format!(
                "unexpected outcome for proposal: {:?}",
                other
            ))),
        }
    }

    pub async fn cast_ballot(&self, prop_id: u32) -> Result<(), BridgeError> {
        self.run(ActionRequest::CastBallot { prop_id }).await.map(|_| ())
    }

    pub async fn attempt_execution(&self, prop_id: u32) -> Result<(), BridgeError> {
        self.run(ActionRequest::AttemptExecution { prop_id }).await.map(|_| ())
    }

    pub async fn check_user_assets(&self, owner: &AccountId) -> Result<i64, BridgeError> {
        self.run_assets(ActionRequest::CheckUserAssets { owner: owner.clone() }).await
    }

    pub async fn total_assets(&self) -> Result<i64, BridgeError> {
        self.run_assets(ActionRequest::TotalAssets).await
    }

    async fn run_assets(&self, request: ActionRequest) -> Result<i64, BridgeError> {
        match self.run(request).await? {
            ActionOutcome::Assets(n) => Ok(n),
            other => Err(BridgeError::Serialization(format!(
                "unexpected outcome for asset query: {:?}",
                other
            ))),
        }
    }

    /// Execute any action. Failures are logged as "Error <label>: <err>" and returned.
    pub async fn run(&self, request: ActionRequest) -> Result<ActionOutcome, BridgeError> {
        let kind = request.kind();
        match self.execute(request).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.log
                    .error(&format!("Error {}: {}", kind.failure_label(), err));
                Err(err)
            }
        }
    }

    async fn execute(&self, request: ActionRequest) -> Result<ActionOutcome, BridgeError> {
        let kind = request.kind();
        let method = kind.method();
        let from = if kind.needs_account() {
            Some(self.request_active_account().await?)
        } else {
            None
        };
        let signer = || from.as_ref().ok_or(BridgeError::NoAccountAuthorized(None));

        match request {
            ActionRequest::Initialize => {
                self.contract.send(method, Vec::new(), signer()?).await?;
                Ok(ActionOutcome::Initialized)
            }
            ActionRequest::TransferAssets { amount, recipient } => {
                let args = vec![Value::from(amount), Value::from(recipient)];
                self.contract.send(method, args, signer()?).await?;
                Ok(ActionOutcome::Transferred)
            }
            ActionRequest::CreateProposal { instructions } => {
                let proposal = ProposalRequest::new(self.clock.now_unix_secs(), instructions);
                let digest = proposal.digest()?;
                let record = serde_json::to_value(&proposal)?;
                let returned = self
                    .contract
                    .send(method, vec![record], signer()?)
                    .await
                    .map_err(|e| match e {
                        BridgeError::RemoteCall { method, message } => BridgeError::RemoteCall {
                            method,
                            message: format!("{} (proposal {})", message, &digest[..16]),
                        },
                        other => other,
                    })?;
                let id = ProposalId::from_remote(&returned);
                self.log.info(&format!("Proposal ID: {}", id));
                Ok(ActionOutcome::ProposalCreated(id))
            }
            ActionRequest::CastBallot { prop_id } => {
                self.contract.send(method, vec![Value::from(prop_id)], signer()?).await?;
                Ok(ActionOutcome::BallotCast)
            }
            ActionRequest::AttemptExecution { prop_id } => {
                self.contract.send(method, vec![Value::from(prop_id)], signer()?).await?;
                Ok(ActionOutcome::Executed)
            }
            ActionRequest::CheckUserAssets { owner } => {
                let value = self.contract.call(method, vec![Value::from(owner.0)]).await?;
                Ok(ActionOutcome::Assets(parse_asset_count(method, &value)?))
            }
            ActionRequest::TotalAssets => {
                let value = self.contract.call(method, Vec::new()).await?;
                Ok(ActionOutcome::Assets(parse_asset_count(method, &value)?))
            }
        }
    }
}

/// Asset counts come back as a number or, from some providers, a decimal string.
fn parse_asset_count(method: &str, value: &Value) -> Result<i64, BridgeError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(f))
                    .map(|f| f as i64)
            })
            .ok_or_else(|| BridgeError::remote(method, format!("non-integer asset count {}", n))),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| BridgeError::remote(method, format!("non-integer asset count {:?}", s))),
        other => Err(BridgeError::remote(method, format!("unexpected asset count {}", other))),
    }
}
