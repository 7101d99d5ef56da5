//! Console output for action results and failures.

use web_sys::console;

/// Where actions report what happened.
pub trait ActionLog {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// `console.log` / `console.error` in the browser; stdout / stderr on native targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserConsole;

impl ActionLog for BrowserConsole {
    fn info(&self, message: &str) {
        if cfg!(target_arch = "wasm32") {
            console::log_1(&message.into());
        } else {
            println!("{}", message);
        }
    }

    fn error(&self, message: &str) {
        if cfg!(target_arch = "wasm32") {
            console::error_1(&message.into());
        } else {
            eprintln!("{}", message);
        }
    }
}
