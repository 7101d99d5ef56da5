//! Boundaries the bridge talks through: the wallet provider, the remote contract, and the clock.
//!
//! Futures here are driven by the browser event loop and are never `Send`.
#![allow(async_fn_in_trait)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Address string handed out by the wallet provider.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Injected wallet: grants access to the user's accounts.
pub trait WalletProvider {
    /// Ordered list of authorized accounts. Denial is an `Err`.
    async fn request_accounts(&self) -> Result<Vec<AccountId>, BridgeError>;
}

/// Deployed contract reached through the provider.
pub trait RemoteContract {
    /// State-changing call signed by `from`.
    async fn send(&self, method: &str, args: Vec<Value>, from: &AccountId) -> Result<Value, BridgeError>;

    /// Read-only call.
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError>;
}

pub trait Clock {
    fn now_unix_secs(&self) -> u64;
}

/// Wall clock: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_unix_secs(&self) -> u64 {
        (js_sys::Date::now() / 1000.0).floor() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_unix_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2023() {
        assert!(SystemClock.now_unix_secs() > 1_700_000_000);
    }

    #[test]
    fn test_account_id_display() {
        assert_eq!(AccountId("GALICE".into()).to_string(), "GALICE");
    }
}
