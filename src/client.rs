/// Popup side of the bridge protocol
use crate::domain::extract_hostname;
use crate::error::InspectorError;
use crate::host;
use crate::messages::{BridgeRequest, BridgeResponse};
use crate::snapshot::StorageSnapshot;
use log::debug;

/// The tab being inspected and the domain its requests are addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectTarget {
    pub tab_id: i32,
    pub domain: String,
}

impl InspectTarget {
    /// Resolve the active tab of the current window
    pub async fn active() -> Result<Self, InspectorError> {
        let tab = host::active_tab().await?;
        let tab_id = tab.id.ok_or(InspectorError::NoInspectablePage)?;
        let domain = tab
            .url
            .as_deref()
            .and_then(extract_hostname)
            .ok_or(InspectorError::NoInspectablePage)?;
        Ok(InspectTarget { tab_id, domain })
    }

    async fn send(&self, request: BridgeRequest) -> Result<Option<StorageSnapshot>, InspectorError> {
        debug!("Sending {} to tab {}", request.action(), self.tab_id);
        let response: BridgeResponse = host::send_to_tab(self.tab_id, &request).await?;
        response.into_result()
    }

    pub async fn get(&self) -> Result<StorageSnapshot, InspectorError> {
        let data = self
            .send(BridgeRequest::GetLocalStorage {
                domain: self.domain.clone(),
            })
            .await?;
        Ok(data.unwrap_or_default())
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), InspectorError> {
        self.send(BridgeRequest::SetStorageItem {
            domain: self.domain.clone(),
            key: key.to_string(),
            value: value.to_string(),
        })
        .await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), InspectorError> {
        self.send(BridgeRequest::DeleteStorageItem {
            domain: self.domain.clone(),
            key: key.to_string(),
        })
        .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), InspectorError> {
        self.send(BridgeRequest::ClearLocalStorage {
            domain: self.domain.clone(),
        })
        .await?;
        Ok(())
    }

    pub async fn inspect(&self) -> Result<(), InspectorError> {
        self.send(BridgeRequest::InspectDomain {
            domain: self.domain.clone(),
        })
        .await?;
        Ok(())
    }
}
