//! Bridge configuration: where the contract lives and what each trigger sends.
//!
//! Loaded once from JSON and handed to the bridge at construction; nothing here
//! is read from ambient globals.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::ActionKind;
use crate::error::BridgeError;

/// Immutable reference to the deployed contract: address plus its interface descriptor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Endpoint {
    address: String,
    #[serde(default)]
    abi: Value,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, abi: Value) -> Endpoint {
        Endpoint { address: address.into(), abi }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn abi(&self) -> &Value {
        &self.abi
    }
}

/// One UI trigger element bound to one action.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ButtonBinding {
    pub element_id: String,
    pub action: ActionKind,
}

/// Parameters the transfer button sends when clicked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferDefaults {
    pub amount: i32,
    pub recipient: String,
}

impl Default for TransferDefaults {
    fn default() -> Self {
        TransferDefaults {
            amount: 10,
            recipient: "RECIPIENT_ADDRESS".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BridgeConfig {
    pub endpoint: Endpoint,
    #[serde(default = "default_bindings")]
    pub bindings: Vec<ButtonBinding>,
    #[serde(default)]
    pub transfer: TransferDefaults,
}

fn default_bindings() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding {
            element_id: "initializeButton".into(),
            action: ActionKind::Initialize,
        },
        ButtonBinding {
            element_id: "transferAssetsButton".into(),
            action: ActionKind::TransferAssets,
        },
        ButtonBinding {
            element_id: "createProposalButton".into(),
            action: ActionKind::CreateProposal,
        },
    ]
}

impl BridgeConfig {
    pub fn new(endpoint: Endpoint) -> BridgeConfig {
        BridgeConfig {
            endpoint,
            bindings: default_bindings(),
            transfer: TransferDefaults::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<BridgeConfig, BridgeError> {
        let config: BridgeConfig = serde_json::from_str(json)
            .map_err(|e| BridgeError::Config(format!("invalid config JSON: {}", e)))?;
        if config.endpoint.address.trim().is_empty() {
            return Err(BridgeError::Config("endpoint.address is empty".into()));
        }
        Ok(config)
    }
}
