//! Tauri Command Wrappers
//!
//! Frontend bindings to backend commands, organized by domain.

mod pantry;
mod config;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::models::CommandError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "core"])]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "__TAURI__", "event"])]
    async fn listen(event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> Result<JsValue, JsValue>;
}

// Re-export all public items
pub use pantry::*;
pub use config::*;

/// Invoke `cmd` with serialized `args` and decode the reply.
///
/// A rejected invoke carries the backend's `CommandError`.
async fn call<A, R>(cmd: &str, args: Option<&A>) -> Result<R, CommandError>
where
    A: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let js_args = match args {
        Some(a) => serde_wasm_bindgen::to_value(a).map_err(|e| CommandError::local(e.to_string()))?,
        None => JsValue::NULL,
    };
    match invoke(cmd, js_args).await {
        Ok(value) => serde_wasm_bindgen::from_value(value).map_err(|e| CommandError::local(e.to_string())),
        Err(err) => Err(decode_error(err)),
    }
}

fn decode_error(err: JsValue) -> CommandError {
    if let Ok(e) = serde_wasm_bindgen::from_value::<CommandError>(err.clone()) {
        return e;
    }
    match err.as_string() {
        Some(msg) => CommandError::local(msg),
        None => CommandError::local(format!("{:?}", err)),
    }
}

/// Subscribe to a backend event for the lifetime of the page.
/// The handler receives the event payload.
pub async fn on_event<F>(event: &str, mut handler: F) -> Result<(), CommandError>
where
    F: FnMut(JsValue) + 'static,
{
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |ev: JsValue| {
        let payload = js_sys::Reflect::get(&ev, &JsValue::from_str("payload")).unwrap_or(JsValue::NULL);
        handler(payload);
    });
    listen(event, &closure).await.map_err(decode_error)?;
    closure.forget();
    Ok(())
}

