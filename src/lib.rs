/// Storage Inspector - Chrome Extension for viewing and editing a page's local storage
/// Built with Rust + WASM + Yew

mod bridge;
mod client;
mod config;
mod display;
mod domain;
mod error;
mod host;
mod messages;
mod operations;
mod snapshot;
mod storage;
mod store;
pub mod ui;

pub use error::InspectorError;
pub use messages::{BridgeRequest, BridgeResponse};
pub use snapshot::StorageSnapshot;
pub use store::{KeyValueStore, PageStorage};

use wasm_bindgen::prelude::*;

// Set up panic hook and logging for both the popup and the content script
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(config::log_config());
}

// Re-export hostname extraction for JavaScript access
#[wasm_bindgen]
pub fn extract_hostname(url: &str) -> String {
    domain::extract_hostname(url).unwrap_or_default()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Serve storage requests from the page this content script is injected into
#[wasm_bindgen]
pub fn start_bridge() -> Result<(), JsValue> {
    bridge::install().map_err(|e| {
        log::error!("Failed to start storage bridge: {}", e);
        JsValue::from_str(&e.to_string())
    })
}
