/// Wire format between the popup and the content-script bridge
use crate::error::InspectorError;
use crate::snapshot::StorageSnapshot;
use serde::{Deserialize, Serialize};

/// A request sent to the bridge, discriminated by its `action` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BridgeRequest {
    GetLocalStorage { domain: String },
    ClearLocalStorage { domain: String },
    DeleteStorageItem { domain: String, key: String },
    SetStorageItem { domain: String, key: String, value: String },
    InspectDomain { domain: String },
}

impl BridgeRequest {
    pub fn domain(&self) -> &str {
        match self {
            BridgeRequest::GetLocalStorage { domain }
            | BridgeRequest::ClearLocalStorage { domain }
            | BridgeRequest::DeleteStorageItem { domain, .. }
            | BridgeRequest::SetStorageItem { domain, .. }
            | BridgeRequest::InspectDomain { domain } => domain,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            BridgeRequest::GetLocalStorage { .. } => "getLocalStorage",
            BridgeRequest::ClearLocalStorage { .. } => "clearLocalStorage",
            BridgeRequest::DeleteStorageItem { .. } => "deleteStorageItem",
            BridgeRequest::SetStorageItem { .. } => "setStorageItem",
            BridgeRequest::InspectDomain { .. } => "inspectDomain",
        }
    }
}

/// `{success, data?, error?}` as answered by the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StorageSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok() -> Self {
        BridgeResponse {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn with_data(data: StorageSnapshot) -> Self {
        BridgeResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &InspectorError) -> Self {
        BridgeResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }
    }

    /// Turn a failed response back into an error, keeping any snapshot on success
    pub fn into_result(self) -> Result<Option<StorageSnapshot>, InspectorError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(InspectorError::from_bridge_message(self.error))
        }
    }
}

impl From<Result<(), InspectorError>> for BridgeResponse {
    fn from(result: Result<(), InspectorError>) -> Self {
        match result {
            Ok(()) => BridgeResponse::ok(),
            Err(err) => BridgeResponse::failure(&err),
        }
    }
}

impl From<Result<StorageSnapshot, InspectorError>> for BridgeResponse {
    fn from(result: Result<StorageSnapshot, InspectorError>) -> Self {
        match result {
            Ok(data) => BridgeResponse::with_data(data),
            Err(err) => BridgeResponse::failure(&err),
        }
    }
}
