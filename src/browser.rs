//! Browser side: web3-backed wallet and contract, and the `BridgeApp` class exported to JS.
//!
//! Values cross the boundary as JSON-compatible JS values so the contract sees plain
//! objects and arrays, never `Map`s.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

use crate::bridge::{ActionOutcome, ContractBridge};
use crate::config::{BridgeConfig, Endpoint};
use crate::console::{ActionLog, BrowserConsole};
use crate::dispatch::{ActionRequest, DispatchTable};
use crate::error::{describe_js_error, BridgeError};
use crate::proposal::HiddenInstruction;
use crate::provider::{AccountId, RemoteContract, WalletProvider};

fn to_js(value: &Value) -> Result<JsValue, BridgeError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Receipts may carry values serde can't read (BigInt); fall back to their debug text.
fn from_js(value: &JsValue) -> Value {
    if value.is_undefined() {
        return Value::Null;
    }
    serde_wasm_bindgen::from_value(value.clone())
        .unwrap_or_else(|_| Value::String(describe_js_error(value)))
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

fn get_function(target: &JsValue, key: &str) -> Result<Function, JsValue> {
    get(target, key)?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("`{}` is not a function", key)))
}

/// Await anything promise-like (web3 returns PromiEvents, which are thenables).
async fn settle(pending: JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(&pending)).await
}

// ── Wallet provider ───────────────────────────────────────────────────

/// Account access through `web3.eth.requestAccounts()`.
pub struct Web3Provider {
    web3: JsValue,
}

impl Web3Provider {
    pub fn new(web3: JsValue) -> Web3Provider {
        Web3Provider { web3 }
    }
}

impl WalletProvider for Web3Provider {
    async fn request_accounts(&self) -> Result<Vec<AccountId>, BridgeError> {
        let denied = |e: JsValue| BridgeError::denied(describe_js_error(&e));
        let eth = get(&self.web3, "eth").map_err(denied)?;
        let request = get_function(&eth, "requestAccounts").map_err(denied)?;
        let pending = request.call0(&eth).map_err(denied)?;
        let accounts = settle(pending).await.map_err(denied)?;
        let accounts: Vec<String> = serde_wasm_bindgen::from_value(accounts)?;
        Ok(accounts.into_iter().map(AccountId).collect())
    }
}

// ── Remote contract ───────────────────────────────────────────────────

/// `new web3.eth.Contract(abi, address)` built from the configured endpoint.
pub struct Web3Contract {
    contract: JsValue,
}

impl Web3Contract {
    pub fn new(web3: &JsValue, endpoint: &Endpoint) -> Result<Web3Contract, BridgeError> {
        let config_err = |e: JsValue| BridgeError::Config(describe_js_error(&e));
        let eth = get(web3, "eth").map_err(config_err)?;
        let constructor = get_function(&eth, "Contract").map_err(config_err)?;
        let args = Array::of2(&to_js(endpoint.abi())?, &JsValue::from_str(endpoint.address()));
        let contract = Reflect::construct(&constructor, &args).map_err(config_err)?;
        Ok(Web3Contract { contract })
    }

    /// `contract.methods[method](...args)`: the unsent transaction object.
    fn prepare(&self, method: &str, args: &[Value]) -> Result<JsValue, BridgeError> {
        let rejected = |e: JsValue| BridgeError::remote(method, describe_js_error(&e));
        let methods = get(&self.contract, "methods").map_err(rejected)?;
        let build = get_function(&methods, method).map_err(rejected)?;
        let js_args = Array::new();
        for arg in args {
            js_args.push(&to_js(arg)?);
        }
        build.apply(&methods, &js_args).map_err(rejected)
    }

    async fn submit(&self, method: &str, tx: JsValue, verb: &str, options: &JsValue) -> Result<Value, BridgeError> {
        let rejected = |e: JsValue| BridgeError::remote(method, describe_js_error(&e));
        let submit = get_function(&tx, verb).map_err(rejected)?;
        let pending = submit.call1(&tx, options).map_err(rejected)?;
        let result = settle(pending).await.map_err(rejected)?;
        Ok(from_js(&result))
    }
}

impl RemoteContract for Web3Contract {
    async fn send(&self, method: &str, args: Vec<Value>, from: &AccountId) -> Result<Value, BridgeError> {
        let tx = self.prepare(method, &args)?;
        let options = Object::new();
        Reflect::set(&options, &"from".into(), &JsValue::from_str(from.as_str()))
            .map_err(|e| BridgeError::remote(method, describe_js_error(&e)))?;
        self.submit(method, tx, "send", &options.into()).await
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        let tx = self.prepare(method, &args)?;
        self.submit(method, tx, "call", &JsValue::UNDEFINED).await
    }
}

// ── JS-facing app ─────────────────────────────────────────────────────

type BrowserBridge = ContractBridge<Web3Provider, Web3Contract>;

fn outcome_to_js(outcome: ActionOutcome) -> JsValue {
    match outcome {
        ActionOutcome::ProposalCreated(id) => JsValue::from_str(&id.0),
        ActionOutcome::Assets(n) => JsValue::from_f64(n as f64),
        _ => JsValue::UNDEFINED,
    }
}

/// The bridge as seen from page scripts: one Promise-returning method per action.
#[wasm_bindgen]
pub struct BridgeApp {
    bridge: Rc<BrowserBridge>,
    table: DispatchTable,
}

#[wasm_bindgen]
impl BridgeApp {
    #[wasm_bindgen(constructor)]
    pub fn new(web3: JsValue, config_json: &str) -> Result<BridgeApp, JsValue> {
        let config = BridgeConfig::from_json_str(config_json)?;
        let contract = Web3Contract::new(&web3, &config.endpoint)?;
        let table = DispatchTable::from_config(&config);
        let bridge = ContractBridge::new(config, Web3Provider::new(web3), contract);
        Ok(BridgeApp {
            bridge: Rc::new(bridge),
            table,
        })
    }

    #[wasm_bindgen(getter, js_name = "contractAddress")]
    pub fn contract_address(&self) -> String {
        self.bridge.config().endpoint.address().to_string()
    }

    pub fn initialize(&self) -> Promise {
        self.spawn(ActionRequest::Initialize)
    }

    #[wasm_bindgen(js_name = "transferAssets")]
    pub fn transfer_assets(&self, amount: i32, recipient: String) -> Promise {
        self.spawn(ActionRequest::TransferAssets { amount, recipient })
    }

    /// `instructions` may be omitted; otherwise an array of `{contract_id, function_name, arguments}`.
    #[wasm_bindgen(js_name = "createProposal")]
    pub fn create_proposal(&self, instructions: JsValue) -> Result<Promise, JsValue> {
        let instructions: Vec<HiddenInstruction> = if instructions.is_undefined() || instructions.is_null() {
            Vec::new()
        } else {
            serde_wasm_bindgen::from_value(instructions).map_err(BridgeError::from)?
        };
        Ok(self.spawn(ActionRequest::CreateProposal { instructions }))
    }

    #[wasm_bindgen(js_name = "castBallot")]
    pub fn cast_ballot(&self, prop_id: u32) -> Promise {
        self.spawn(ActionRequest::CastBallot { prop_id })
    }

    #[wasm_bindgen(js_name = "attemptExecution")]
    pub fn attempt_execution(&self, prop_id: u32) -> Promise {
        self.spawn(ActionRequest::AttemptExecution { prop_id })
    }

    #[wasm_bindgen(js_name = "checkUserAssets")]
    pub fn check_user_assets(&self, owner: String) -> Promise {
        self.spawn(ActionRequest::CheckUserAssets { owner: AccountId(owner) })
    }

    #[wasm_bindgen(js_name = "totalAssets")]
    pub fn total_assets(&self) -> Promise {
        self.spawn(ActionRequest::TotalAssets)
    }

    /// Run an action by name with its configured default parameters.
    pub fn dispatch(&self, name: &str) -> Result<Promise, JsValue> {
        let kind = self.table.resolve(name)?;
        let request = self.table.default_request(kind)?;
        Ok(self.spawn(request))
    }

    /// Attach click listeners for every configured binding. Returns how many were attached.
    #[wasm_bindgen(js_name = "bindButtons")]
    pub fn bind_buttons(&self) -> Result<u32, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| BridgeError::Config("no document to bind buttons in".into()))?;

        let mut bound = 0;
        for element_id in self.table.element_ids() {
            let kind = self.table.resolve_element(element_id)?;
            let Some(element) = document.get_element_by_id(element_id) else {
                BrowserConsole.error(&format!("No element #{} for action {}", element_id, kind.name()));
                continue;
            };
            let request = match self.table.default_request(kind) {
                Ok(request) => request,
                Err(err) => {
                    BrowserConsole.error(&format!("Cannot bind #{}: {}", element_id, err));
                    continue;
                }
            };

            let bridge = self.bridge.clone();
            let on_click = Closure::<dyn FnMut()>::new(move || {
                let bridge = bridge.clone();
                let request = request.clone();
                // Failures are already on the console.
                spawn_local(async move {
                    let _ = bridge.run(request).await;
                });
            });
            element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
            bound += 1;
        }
        Ok(bound)
    }
}

impl BridgeApp {
    fn spawn(&self, request: ActionRequest) -> Promise {
        let bridge = self.bridge.clone();
        future_to_promise(async move {
            bridge
                .run(request)
                .await
                .map(outcome_to_js)
                .map_err(JsValue::from)
        })
    }
}
