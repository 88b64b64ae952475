/// Extension-wide record of inspected domains, kept in chrome.storage.local
use serde::{Deserialize, Serialize};

/// Root object read from and written to `chrome.storage.local`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectedDomains {
    #[serde(rename = "inspectedDomains", default)]
    pub domains: Vec<String>,
}

impl InspectedDomains {
    /// Append a domain unless it is already recorded; returns whether it was added
    pub fn record(&mut self, domain: &str) -> bool {
        if self.contains(domain) {
            return false;
        }
        self.domains.push(domain.to_string());
        true
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}
