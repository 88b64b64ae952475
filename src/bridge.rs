/// Content-script side: serves storage requests for the page it runs in
use crate::config::INSPECTED_DOMAINS_KEY;
use crate::domain::is_same_domain;
use crate::error::InspectorError;
use crate::host;
use crate::messages::{BridgeRequest, BridgeResponse};
use crate::snapshot::StorageSnapshot;
use crate::storage::InspectedDomains;
use crate::store::{KeyValueStore, PageStorage};
use log::{debug, error, info, warn};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Storage operations for one page, refused for any domain that isn't the page's own
pub struct StorageBridge<S> {
    hostname: String,
    store: S,
}

impl<S: KeyValueStore> StorageBridge<S> {
    pub fn new(hostname: impl Into<String>, store: S) -> Self {
        StorageBridge {
            hostname: hostname.into(),
            store,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    fn authorize(&self, domain: &str) -> Result<(), InspectorError> {
        if is_same_domain(&self.hostname, domain) {
            Ok(())
        } else {
            warn!("Refusing storage access for {} from page {}", domain, self.hostname);
            Err(InspectorError::CrossDomainDenied)
        }
    }

    pub fn get(&self, domain: &str) -> Result<StorageSnapshot, InspectorError> {
        self.authorize(domain)?;
        self.store.entries()
    }

    pub fn clear(&self, domain: &str) -> Result<(), InspectorError> {
        self.authorize(domain)?;
        self.store.clear()
    }

    pub fn delete(&self, domain: &str, key: &str) -> Result<(), InspectorError> {
        self.authorize(domain)?;
        self.store.remove_item(key)
    }

    pub fn set(&self, domain: &str, key: &str, value: &str) -> Result<(), InspectorError> {
        self.authorize(domain)?;
        self.store.set_item(key, value)
    }

    /// Answer a storage request; failures become `{success: false, error}`
    ///
    /// `inspectDomain` always succeeds here: the log lives in extension storage
    /// and is written by the runtime listener, not by the page store.
    pub fn handle(&self, request: &BridgeRequest) -> BridgeResponse {
        debug!("Bridge handling {} for {}", request.action(), request.domain());

        match request {
            BridgeRequest::GetLocalStorage { domain } => self.get(domain).into(),
            BridgeRequest::ClearLocalStorage { domain } => self.clear(domain).into(),
            BridgeRequest::DeleteStorageItem { domain, key } => self.delete(domain, key).into(),
            BridgeRequest::SetStorageItem { domain, key, value } => {
                self.set(domain, key, value).into()
            }
            BridgeRequest::InspectDomain { .. } => BridgeResponse::ok(),
        }
    }
}

/// Add `domain` to the persisted inspected-domains log if it isn't there yet
async fn record_inspected_domain(domain: &str) -> Result<(), InspectorError> {
    let mut log: InspectedDomains = host::load_extension_storage(INSPECTED_DOMAINS_KEY).await?;
    if log.record(domain) {
        host::save_extension_storage(&log).await?;
        debug!("Recorded inspected domain {}", domain);
    }
    Ok(())
}

async fn dispatch(bridge: &StorageBridge<PageStorage>, request: BridgeRequest) -> BridgeResponse {
    if let BridgeRequest::InspectDomain { domain } = &request {
        if let Err(e) = record_inspected_domain(domain).await {
            warn!("Failed to record inspected domain {}: {}", domain, e);
        }
    }
    bridge.handle(&request)
}

/// Install the `chrome.runtime.onMessage` listener for this page
///
/// The listener is installed even when the page denies storage access, so
/// storage requests get the access error back and `inspectDomain` is still
/// recorded.
pub fn install() -> Result<(), InspectorError> {
    let hostname = web_sys::window()
        .ok_or(InspectorError::NoInspectablePage)?
        .location()
        .hostname()
        .map_err(InspectorError::store)?;
    let bridge = Rc::new(StorageBridge::new(hostname, PageStorage::local()));
    info!("Storage bridge listening for {}", bridge.hostname());

    let listener = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| {
            // Messages meant for other listeners are left unanswered
            let request: BridgeRequest = match host::from_js(message) {
                Ok(request) => request,
                Err(_) => return false,
            };

            let bridge = bridge.clone();
            spawn_local(async move {
                let response = dispatch(&bridge, request).await;
                match host::to_js(&response) {
                    Ok(reply) => {
                        if let Err(e) = send_response.call1(&JsValue::NULL, &reply) {
                            error!("Failed to send bridge response: {:?}", e);
                        }
                    }
                    Err(e) => error!("Failed to serialize bridge response: {}", e),
                }
            });
            true
        },
    );

    host::add_message_listener(listener);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn bridge_with(entries: &[(&str, &str)]) -> StorageBridge<MemoryStore> {
        let snapshot: StorageSnapshot = entries.iter().copied().collect();
        StorageBridge::new("www.example.com", MemoryStore::with_entries(snapshot))
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let bridge = bridge_with(&[]);
        let pairs = [("plain", "value"), ("json", "{\"x\":2}"), ("empty", ""), ("unicode", "héllo 世界")];

        for (key, value) in pairs {
            bridge.set("example.com", key, value).unwrap();
        }

        let snapshot = bridge.get("example.com").unwrap();
        for (key, value) in pairs {
            assert_eq!(snapshot.get(key), Some(value));
        }
    }

    #[test]
    fn test_clear_then_get_is_empty() {
        let bridge = bridge_with(&[("a", "1"), ("b", "2")]);

        bridge.clear("www.example.com").unwrap();

        assert!(bridge.get("www.example.com").unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_one_entry() {
        let bridge = bridge_with(&[("a", "1"), ("b", "2")]);

        bridge.delete("example.com", "a").unwrap();

        let snapshot = bridge.get("example.com").unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("b"), Some("2"));
    }

    #[test]
    fn test_cross_domain_get_is_refused() {
        let bridge = bridge_with(&[("a", "1")]);

        let response = bridge.handle(&BridgeRequest::GetLocalStorage {
            domain: "github.com".to_string(),
        });

        assert!(!response.success);
        assert_eq!(response.data, None);
        assert_eq!(response.error.as_deref(), Some("Cross-domain access not implemented"));
    }

    #[test]
    fn test_cross_domain_writes_leave_store_untouched() {
        let bridge = bridge_with(&[("a", "1")]);

        assert_eq!(bridge.set("github.com", "a", "2"), Err(InspectorError::CrossDomainDenied));
        assert_eq!(bridge.delete("github.com", "a"), Err(InspectorError::CrossDomainDenied));
        assert_eq!(bridge.clear("github.com"), Err(InspectorError::CrossDomainDenied));

        assert_eq!(bridge.get("example.com").unwrap().get("a"), Some("1"));
    }

    #[test]
    fn test_handle_get_returns_data() {
        let bridge = bridge_with(&[("a", "1"), ("b", "{\"x\":2}")]);

        let response = bridge.handle(&BridgeRequest::GetLocalStorage {
            domain: "www.example.com".to_string(),
        });

        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get("b"), Some("{\"x\":2}"));
    }

    #[test]
    fn test_handle_write_requests() {
        let bridge = bridge_with(&[("a", "1")]);

        let set = bridge.handle(&BridgeRequest::SetStorageItem {
            domain: "example.com".to_string(),
            key: "b".to_string(),
            value: "2".to_string(),
        });
        assert_eq!(set, BridgeResponse::ok());

        let delete = bridge.handle(&BridgeRequest::DeleteStorageItem {
            domain: "example.com".to_string(),
            key: "a".to_string(),
        });
        assert_eq!(delete, BridgeResponse::ok());

        let snapshot = bridge.get("example.com").unwrap();
        assert_eq!(snapshot.iter().collect::<Vec<_>>(), vec![("b", "2")]);
    }

    #[test]
    fn test_store_failure_is_returned_not_thrown() {
        let bridge = StorageBridge::new("example.com", MemoryStore::failing("QuotaExceededError"));

        let response = bridge.handle(&BridgeRequest::SetStorageItem {
            domain: "example.com".to_string(),
            key: "k".to_string(),
            value: "v".to_string(),
        });

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("QuotaExceededError"));
    }

    #[test]
    fn test_unreachable_store_reports_error_for_every_operation() {
        let bridge = StorageBridge::new("example.com", MemoryStore::unavailable("SecurityError: access denied"));

        let get = bridge.handle(&BridgeRequest::GetLocalStorage {
            domain: "example.com".to_string(),
        });
        assert!(!get.success);
        assert_eq!(get.data, None);
        assert_eq!(get.error.as_deref(), Some("SecurityError: access denied"));

        let clear = bridge.handle(&BridgeRequest::ClearLocalStorage {
            domain: "example.com".to_string(),
        });
        assert_eq!(clear.error.as_deref(), Some("SecurityError: access denied"));
    }

    #[test]
    fn test_inspect_domain_answers_when_store_unreachable() {
        let bridge = StorageBridge::new("example.com", MemoryStore::unavailable("SecurityError: access denied"));

        let response = bridge.handle(&BridgeRequest::InspectDomain {
            domain: "example.com".to_string(),
        });

        assert_eq!(response, BridgeResponse::ok());
    }

    #[test]
    fn test_inspect_domain_always_succeeds() {
        let bridge = bridge_with(&[]);

        let response = bridge.handle(&BridgeRequest::InspectDomain {
            domain: "anything.org".to_string(),
        });

        assert_eq!(response, BridgeResponse::ok());
    }
}
