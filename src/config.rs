/// Compile-time settings for the inspector and the bridge

/// Key under which the bridge keeps visited domains in `chrome.storage.local`
pub const INSPECTED_DOMAINS_KEY: &str = "inspectedDomains";

/// How long a notice stays on screen
pub const NOTICE_DURATION_MS: i32 = 3000;

/// Prefix of downloaded export files
pub const EXPORT_FILE_PREFIX: &str = "local-storage";

pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to clear ALL local storage for this domain? This action cannot be undone.";

/// Logger settings: verbose in debug builds, quieter in release
pub fn log_config() -> wasm_logger::Config {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::Config::new(level)
}
