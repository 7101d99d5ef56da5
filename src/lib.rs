pub mod bridge;
pub mod browser;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod proposal;
pub mod provider;

#[cfg(test)]
mod testing;

pub use bridge::{ActionOutcome, ContractBridge};
pub use browser::{BridgeApp, Web3Contract, Web3Provider};
pub use config::{BridgeConfig, Endpoint};
pub use dispatch::{ActionKind, ActionRequest, DispatchTable};
pub use error::BridgeError;
pub use proposal::{HiddenInstruction, ProposalId, ProposalRequest, PROPOSAL_WINDOW_SECS};
pub use provider::{AccountId, Clock, RemoteContract, SystemClock, WalletProvider};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called once from JS).
#[wasm_bindgen(start)]
pub fn init() {
    // Panics reach the browser console when built with `debug`.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
