//! Command dispatch: maps UI element ids and action names onto bridge actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{BridgeConfig, TransferDefaults};
use crate::error::BridgeError;
use crate::provider::AccountId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Initialize,
    TransferAssets,
    CreateProposal,
    CastBallot,
    AttemptExecution,
    CheckUserAssets,
    TotalAssets,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Initialize,
        ActionKind::TransferAssets,
        ActionKind::CreateProposal,
        ActionKind::CastBallot,
        ActionKind::AttemptExecution,
        ActionKind::CheckUserAssets,
        ActionKind::TotalAssets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Initialize => "initialize",
            ActionKind::TransferAssets => "transferAssets",
            ActionKind::CreateProposal => "createProposal",
            ActionKind::CastBallot => "castBallot",
            ActionKind::AttemptExecution => "attemptExecution",
            ActionKind::CheckUserAssets => "checkUserAssets",
            ActionKind::TotalAssets => "totalAssets",
        }
    }

    /// Contract method the action invokes.
    pub fn method(self) -> &'static str {
        match self {
            ActionKind::Initialize => "initialize",
            ActionKind::TransferAssets => "transfer_hidden_assets",
            ActionKind::CreateProposal => "create_secret_proposal",
            ActionKind::CastBallot => "cast_secret_ballot",
            ActionKind::AttemptExecution => "attempt_execution",
            ActionKind::CheckUserAssets => "check_user_assets",
            ActionKind::TotalAssets => "total_concealed_assets",
        }
    }

    /// Used in "Error <label>: ..." console lines.
    pub fn failure_label(self) -> &'static str {
        match self {
            ActionKind::Initialize => "initializing contract",
            ActionKind::TransferAssets => "transferring assets",
            ActionKind::CreateProposal => "creating proposal",
            ActionKind::CastBallot => "casting ballot",
            ActionKind::AttemptExecution => "executing proposal",
            ActionKind::CheckUserAssets => "checking user assets",
            ActionKind::TotalAssets => "reading total assets",
        }
    }

    /// Read-only actions skip the account request.
    pub fn needs_account(self) -> bool {
        !matches!(self, ActionKind::CheckUserAssets | ActionKind::TotalAssets)
    }
}

/// A fully parameterized action, ready for `ContractBridge::run`.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionRequest {
    Initialize,
    TransferAssets { amount: i32, recipient: String },
    CreateProposal { instructions: Vec<crate::proposal::HiddenInstruction> },
    CastBallot { prop_id: u32 },
    AttemptExecution { prop_id: u32 },
    CheckUserAssets { owner: AccountId },
    TotalAssets,
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Initialize => ActionKind::Initialize,
            ActionRequest::TransferAssets { .. } => ActionKind::TransferAssets,
            ActionRequest::CreateProposal { .. } => ActionKind::CreateProposal,
            ActionRequest::CastBallot { .. } => ActionKind::CastBallot,
            ActionRequest::AttemptExecution { .. } => ActionKind::AttemptExecution,
            ActionRequest::CheckUserAssets { .. } => ActionKind::CheckUserAssets,
            ActionRequest::TotalAssets => ActionKind::TotalAssets,
        }
    }
}

/// Lookup table from element ids and action names to actions.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    by_element: BTreeMap<String, ActionKind>,
    by_name: BTreeMap<&'static str, ActionKind>,
    transfer: TransferDefaults,
}

impl DispatchTable {
    pub fn from_config(config: &BridgeConfig) -> DispatchTable {
        let by_element = config
            .bindings
            .iter()
            .map(|b| (b.element_id.clone(), b.action))
            .collect();
        let by_name = ActionKind::ALL.iter().map(|k| (k.name(), *k)).collect();
        DispatchTable {
            by_element,
            by_name,
            transfer: config.transfer.clone(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<ActionKind, BridgeError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| BridgeError::UnknownAction(name.to_string()))
    }

    pub fn resolve_element(&self, element_id: &str) -> Result<ActionKind, BridgeError> {
        self.by_element
            .get(element_id)
            .copied()
            .ok_or_else(|| BridgeError::UnknownAction(element_id.to_string()))
    }

    /// Ids of the elements that trigger an action.
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.by_element.keys().map(String::as_str)
    }

    /// Request a trigger fires when it carries no parameters of its own.
    /// Actions that need a proposal id or an owner have no default.
    pub fn default_request(&self, kind: ActionKind) -> Result<ActionRequest, BridgeError> {
        match kind {
            ActionKind::Initialize => Ok(ActionRequest::Initialize),
            ActionKind::TransferAssets => Ok(ActionRequest::TransferAssets {
                amount: self.transfer.amount,
                recipient: self.transfer.recipient.clone(),
            }),
            ActionKind::CreateProposal => Ok(ActionRequest::CreateProposal {
                instructions: Vec::new(),
            }),
            ActionKind::TotalAssets => Ok(ActionRequest::TotalAssets),
            other => Err(BridgeError::Config(format!(
                "action `{}` needs parameters and cannot be bound to a plain trigger",
                other.name()
            ))),
        }
    }
}
