/// Bindings to the browser host: chrome.* extension APIs, clipboard, timers, downloads
use crate::error::InspectorError;
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query, catch)]
    async fn tabs_query(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = sendMessage, catch)]
    async fn tabs_send_message(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn on_message_add_listener(listener: &js_sys::Function);

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get, catch)]
    async fn storage_local_get(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set, catch)]
    async fn storage_local_set(items: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = writeText, catch)]
    async fn clipboard_write_text(text: &str) -> Result<JsValue, JsValue>;
}

/// A browser tab as returned by `chrome.tabs.query`
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TabInfo {
    pub id: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Serialize for the JS side as plain objects, never ES `Map`s
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, InspectorError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, InspectorError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// The focused tab of the current window
pub async fn active_tab() -> Result<TabInfo, InspectorError> {
    let query = Object::new();
    Reflect::set(&query, &"active".into(), &JsValue::TRUE).map_err(InspectorError::remote)?;
    Reflect::set(&query, &"currentWindow".into(), &JsValue::TRUE).map_err(InspectorError::remote)?;

    let tabs_js = tabs_query(query.into()).await.map_err(InspectorError::remote)?;
    let tabs: Vec<TabInfo> = from_js(tabs_js)?;
    tabs.into_iter().next().ok_or(InspectorError::NoInspectablePage)
}

/// Send a message to the content script of `tab_id` and wait for its reply
pub async fn send_to_tab<Req: Serialize, Resp: DeserializeOwned>(
    tab_id: i32,
    message: &Req,
) -> Result<Resp, InspectorError> {
    let reply = tabs_send_message(tab_id, to_js(message)?)
        .await
        .map_err(InspectorError::remote)?;

    if reply.is_undefined() || reply.is_null() {
        return Err(InspectorError::RemoteExecution("No response from page".to_string()));
    }
    from_js(reply)
}

/// Register a `chrome.runtime.onMessage` listener for the lifetime of the page
///
/// The listener receives `(message, sender, sendResponse)` and returns `true`
/// when it will answer asynchronously.
pub fn add_message_listener(listener: Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> bool>) {
    on_message_add_listener(listener.as_ref().unchecked_ref());
    listener.forget();
}

/// Read one key's object from `chrome.storage.local`; missing keys deserialize from `{}`
pub async fn load_extension_storage<T: DeserializeOwned>(key: &str) -> Result<T, InspectorError> {
    let result = storage_local_get(JsValue::from_str(key))
        .await
        .map_err(InspectorError::store)?;
    from_js(result)
}

pub async fn save_extension_storage<T: Serialize>(items: &T) -> Result<(), InspectorError> {
    storage_local_set(to_js(items)?)
        .await
        .map_err(InspectorError::store)?;
    Ok(())
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), InspectorError> {
    clipboard_write_text(text)
        .await
        .map_err(InspectorError::remote)?;
    Ok(())
}

/// Resolve after `ms` milliseconds
pub async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Ask the user a yes/no question; no window means no
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Current time as an ISO-8601 string
pub fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

/// Offer `contents` as a downloadable JSON file
pub fn download_json(contents: &str, filename: &str) -> Result<(), InspectorError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| InspectorError::RemoteExecution("No document available".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| InspectorError::RemoteExecution("No document body".to_string()))?;

    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let parts = Array::of1(&JsValue::from_str(contents));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(InspectorError::remote)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(InspectorError::remote)?;

    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(InspectorError::remote)?
        .unchecked_into();
    link.set_href(&url);
    link.set_download(filename);

    body.append_child(&link).map_err(InspectorError::remote)?;
    link.click();
    body.remove_child(&link).map_err(InspectorError::remote)?;

    Url::revoke_object_url(&url).map_err(InspectorError::remote)?;
    Ok(())
}
