//! In-memory wallet, contract, log and clock for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::console::ActionLog;
use crate::error::BridgeError;
use crate::provider::{AccountId, Clock, RemoteContract, WalletProvider};

#[derive(Clone)]
pub struct MockProvider {
    accounts: Rc<RefCell<Result<Vec<AccountId>, String>>>,
    requests: Rc<Cell<usize>>,
}

impl MockProvider {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        MockProvider {
            accounts: Rc::new(RefCell::new(Ok(to_accounts(accounts)))),
            requests: Rc::new(Cell::new(0)),
        }
    }

    pub fn denied(reason: &str) -> Self {
        MockProvider {
            accounts: Rc::new(RefCell::new(Err(reason.to_string()))),
            requests: Rc::new(Cell::new(0)),
        }
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.borrow_mut() = Ok(to_accounts(accounts));
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

fn to_accounts(accounts: &[&str]) -> Vec<AccountId> {
    accounts.iter().map(|a| AccountId(a.to_string())).collect()
}

impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<AccountId>, BridgeError> {
        self.requests.set(self.requests.get() + 1);
        self.accounts.borrow().clone().map_err(BridgeError::denied)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: Vec<Value>,
    pub from: Option<String>,
}

#[derive(Clone)]
pub struct MockContract {
    reply: Result<Value, String>,
    calls: Rc<RefCell<Vec<RecordedCall>>>,
}

impl MockContract {
    pub fn ok(reply: Value) -> Self {
        MockContract {
            reply: Ok(reply),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        MockContract {
            reply: Err(message.to_string()),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn respond(&self, method: &str, args: Vec<Value>, from: Option<&AccountId>) -> Result<Value, BridgeError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: method.to_string(),
            args,
            from: from.map(|a| a.0.clone()),
        });
        self.reply
            .clone()
            .map_err(|message| BridgeError::remote(method, message))
    }
}

impl RemoteContract for MockContract {
    async fn send(&self, method: &str, args: Vec<Value>, from: &AccountId) -> Result<Value, BridgeError> {
        self.respond(method, args, Some(from))
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        self.respond(method, args, None)
    }
}

#[derive(Clone, Default)]
pub struct RecordingLog {
    infos: Rc<RefCell<Vec<String>>>,
    errors: Rc<RefCell<Vec<String>>>,
}

impl RecordingLog {
    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl ActionLog for RecordingLog {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

#[derive(Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> u64 {
        self.0
    }
}
