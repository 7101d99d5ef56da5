//! Secret proposals: the record sent to `create_secret_proposal`.
//!
//! Field names match the contract's `ClassifiedProposal` / `HiddenInstruction`
//! so the record serializes straight into the call arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::BridgeError;

/// Voting window granted to every new proposal.
pub const PROPOSAL_WINDOW_SECS: u64 = 3600 * 24 * 7;

/// One call the contract runs, in order, once the proposal passes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HiddenInstruction {
    pub contract_id: String, // hex, 32 bytes
    pub function_name: String,
    pub arguments: Vec<Value>,
}

impl HiddenInstruction {
    pub fn new(contract_id: [u8; 32], function_name: &str, arguments: Vec<Value>) -> Self {
        HiddenInstruction {
            contract_id: hex::encode(contract_id),
            function_name: function_name.to_string(),
            arguments,
        }
    }

    /// Instruction that moves hidden assets when executed by the DAO contract itself.
    pub fn transfer(contract_id: [u8; 32], amount: i32, recipient: &str) -> Self {
        Self::new(
            contract_id,
            "transfer_hidden_assets",
            vec![Value::from(amount), Value::from(recipient)],
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProposalRequest {
    pub total_votes: i32,
    pub deadline: u64, // unix seconds
    pub instructions: Vec<HiddenInstruction>,
}

impl ProposalRequest {
    /// Fresh proposal: no votes, deadline one week after `now`.
    pub fn new(now_unix_secs: u64, instructions: Vec<HiddenInstruction>) -> Self {
        ProposalRequest {
            total_votes: 0,
            deadline: now_unix_secs + PROPOSAL_WINDOW_SECS,
            instructions,
        }
    }

    /// hex(SHA-256(canonical JSON)). Ties together the log lines of one submission.
    pub fn digest(&self) -> Result<String, BridgeError> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Identifier yielded by the remote `create_secret_proposal` call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProposalId(pub String);

impl ProposalId {
    pub fn from_remote(value: &Value) -> ProposalId {
        match value {
            Value::String(s) => ProposalId(s.clone()),
            Value::Number(n) => ProposalId(n.to_string()),
            other => ProposalId(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_window_is_one_week() {
        assert_eq!(PROPOSAL_WINDOW_SECS, 604_800);
    }

    #[test]
    fn test_new_proposal_has_zero_votes_and_week_deadline() {
        let p = ProposalRequest::new(1_700_000_000, Vec::new());
        assert_eq!(p.total_votes, 0);
        assert_eq!(p.deadline, 1_700_604_800);
        assert!(p.instructions.is_empty());
    }

    #[test]
    fn test_serializes_with_contract_field_names() {
        let p = ProposalRequest::new(0, Vec::new());
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({ "total_votes": 0, "deadline": 604_800, "instructions": [] })
        );
    }

    #[test]
    fn test_transfer_instruction() {
        let ix = HiddenInstruction::transfer([0xab; 32], 5, "GBOB");
        assert_eq!(ix.contract_id.len(), 64);
        assert!(ix.contract_id.starts_with("abab"));
        assert_eq!(ix.function_name, "transfer_hidden_assets");
        assert_eq!(ix.arguments, vec![json!(5), json!("GBOB")]);
    }

    #[test]
    fn test_digest_is_deterministic_and_content_sensitive() {
        let a = ProposalRequest::new(10, Vec::new());
        let b = ProposalRequest::new(11, Vec::new());
        let digest = a.digest().unwrap();
        assert_eq!(digest, a.clone().digest().unwrap());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, b.digest().unwrap());
    }

    #[test]
    fn test_proposal_id_from_remote_values() {
        assert_eq!(ProposalId::from_remote(&json!("42")).to_string(), "42");
        assert_eq!(ProposalId::from_remote(&json!(42)).to_string(), "42");
        assert_eq!(
            ProposalId::from_remote(&json!({ "id": 1 })).to_string(),
            r#"{"id":1}"#
        );
    }
}
