/// Key/value backends the bridge reads and writes
use crate::error::InspectorError;
use crate::snapshot::StorageSnapshot;

/// The page-side store the bridge passes operations through to
pub trait KeyValueStore {
    /// Every entry, in the store's own enumeration order
    fn entries(&self) -> Result<StorageSnapshot, InspectorError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), InspectorError>;

    fn remove_item(&self, key: &str) -> Result<(), InspectorError>;

    fn clear(&self) -> Result<(), InspectorError>;
}

/// `window.localStorage` of the page the content script runs in
///
/// Pages may forbid storage access; the lookup error is kept and returned
/// from every operation instead.
pub struct PageStorage {
    storage: Result<web_sys::Storage, InspectorError>,
}

impl PageStorage {
    pub fn new(storage: web_sys::Storage) -> Self {
        PageStorage { storage: Ok(storage) }
    }

    /// The current window's local storage
    pub fn local() -> Self {
        let storage = web_sys::window()
            .ok_or_else(|| InspectorError::Store("No window available".to_string()))
            .and_then(|window| window.local_storage().map_err(InspectorError::store))
            .and_then(|storage| {
                storage.ok_or_else(|| InspectorError::Store("Local storage is not available".to_string()))
            });
        PageStorage { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, InspectorError> {
        self.storage.as_ref().map_err(Clone::clone)
    }
}

impl KeyValueStore for PageStorage {
    fn entries(&self) -> Result<StorageSnapshot, InspectorError> {
        let storage = self.storage()?;
        let len = storage.length().map_err(InspectorError::store)?;
        let mut snapshot = StorageSnapshot::new();

        for index in 0..len {
            let Some(key) = storage.key(index).map_err(InspectorError::store)? else {
                continue;
            };
            if let Some(value) = storage.get_item(&key).map_err(InspectorError::store)? {
                snapshot.set(key, value);
            }
        }
        Ok(snapshot)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), InspectorError> {
        self.storage()?.set_item(key, value).map_err(InspectorError::store)
    }

    fn remove_item(&self, key: &str) -> Result<(), InspectorError> {
        self.storage()?.remove_item(key).map_err(InspectorError::store)
    }

    fn clear(&self) -> Result<(), InspectorError> {
        self.storage()?.clear().map_err(InspectorError::store)
    }
}

/// In-memory store for exercising the bridge off the browser
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: std::cell::RefCell<StorageSnapshot>,
    read_error: Option<String>,
    write_error: Option<String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_entries(entries: StorageSnapshot) -> Self {
        MemoryStore {
            entries: std::cell::RefCell::new(entries),
            ..Default::default()
        }
    }

    /// A store whose writes all fail with `message`, like a full quota
    pub fn failing(message: &str) -> Self {
        MemoryStore {
            write_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// A store that can't be reached at all, like a page that denies storage access
    pub fn unavailable(message: &str) -> Self {
        MemoryStore {
            read_error: Some(message.to_string()),
            write_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn check_writable(&self) -> Result<(), InspectorError> {
        match &self.write_error {
            Some(message) => Err(InspectorError::Store(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn entries(&self) -> Result<StorageSnapshot, InspectorError> {
        if let Some(message) = &self.read_error {
            return Err(InspectorError::Store(message.clone()));
        }
        Ok(self.entries.borrow().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), InspectorError> {
        self.check_writable()?;
        self.entries.borrow_mut().set(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), InspectorError> {
        self.check_writable()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), InspectorError> {
        self.check_writable()?;
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
