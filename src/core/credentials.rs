// src/core/credentials.rs

use crate::core::catalog;
use crate::core::errors::ScanError;
use crate::core::models::{Credential, ScannerType};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// The store shared between the UI and the dispatcher. The lock is only
/// held for short synchronous reads and writes, never across an `.await`.
pub type SharedCredentialStore = Arc<Mutex<CredentialStore>>;

/// Persistent string key/value storage behind the credential store.
pub trait KeyValueStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>, ScanError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ScanError>;
    fn remove(&mut self, key: &str) -> Result<(), ScanError>;

    /// Writes every entry or none of them. The default writes one at a time
    /// and restores the earlier values when a write fails.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), ScanError> {
        let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());
        for &(key, value) in entries {
            let previous = self.get(key)?;
            if let Err(e) = self.set(key, value) {
                for (key, previous) in written.into_iter().rev() {
                    let restored = match previous {
                        Some(previous) => self.set(key, &previous),
                        None => self.remove(key),
                    };
                    if let Err(restore_error) = restored {
                        warn!(slot = key, error = %restore_error, "Failed to restore credential slot.");
                    }
                }
                return Err(e);
            }
            written.push((key, previous));
        }
        Ok(())
    }
}

/// Volatile storage, used by tests and as a fallback when the data
/// directory is not writable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ScanError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ScanError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ScanError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A flat JSON object on disk, read and rewritten on every access.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, ScanError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ScanError::Storage(format!("{} is not valid JSON: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ScanError::Storage(format!("cannot read {}: {e}", self.path.display()))),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), ScanError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScanError::Storage(format!("cannot create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ScanError::Storage(e.to_string()))?;
        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| ScanError::Storage(format!("cannot write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ScanError::Storage(format!("cannot replace {}: {e}", self.path.display())))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ScanError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ScanError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), ScanError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn set_many(&mut self, new_entries: &[(&str, &str)]) -> Result<(), ScanError> {
        let mut entries = self.load()?;
        for &(key, value) in new_entries {
            entries.insert(key.to_string(), value.to_string());
        }
        self.save(&entries)
    }
}

fn key_slot(scanner_type: ScannerType) -> String {
    format!("scanner_api_key_{scanner_type}")
}

fn provider_slot(scanner_type: ScannerType) -> String {
    format!("scanner_api_provider_{scanner_type}")
}

/// Reads a slot through `cache`. Misses and read errors are cached as `None`
/// so a missing or unreadable file is only consulted once.
fn read_through(
    storage: &dyn KeyValueStorage,
    cache: &mut HashMap<ScannerType, Option<String>>,
    scanner_type: ScannerType,
    slot: &str,
) -> String {
    if let Some(cached) = cache.get(&scanner_type) {
        return cached.clone().unwrap_or_default();
    }
    let value = match storage.get(slot) {
        Ok(Some(value)) if !value.is_empty() => {
            debug!(%scanner_type, slot, "Credential loaded from storage.");
            Some(value)
        }
        Ok(_) => None,
        Err(e) => {
            warn!(%scanner_type, slot, error = %e, "Failed to read stored credential.");
            None
        }
    };
    cache.insert(scanner_type, value.clone());
    value.unwrap_or_default()
}

/// Per-scanner-type API keys and provider selections, cached in memory in
/// front of a persistent [`KeyValueStorage`].
pub struct CredentialStore {
    storage: Box<dyn KeyValueStorage>,
    keys: HashMap<ScannerType, Option<String>>,
    providers: HashMap<ScannerType, Option<String>>,
    base_urls: HashMap<ScannerType, String>,
}

impl CredentialStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            keys: HashMap::new(),
            providers: HashMap::new(),
            base_urls: HashMap::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn into_shared(self) -> SharedCredentialStore {
        Arc::new(Mutex::new(self))
    }

    /// Saves a key and, when given, a provider, in one storage write. Blank
    /// keys are rejected and leave the stored state untouched. Values are
    /// stored exactly as given.
    pub fn set_key(&mut self, scanner_type: ScannerType, api_key: &str, provider: Option<&str>) -> bool {
        if api_key.trim().is_empty() {
            warn!(%scanner_type, "Rejected empty API key.");
            return false;
        }
        let provider = provider.filter(|p| !p.trim().is_empty());

        let key_slot = key_slot(scanner_type);
        let provider_slot = provider_slot(scanner_type);
        let mut entries = vec![(key_slot.as_str(), api_key)];
        if let Some(provider) = provider {
            entries.push((provider_slot.as_str(), provider));
        }
        if let Err(e) = self.storage.set_many(&entries) {
            warn!(%scanner_type, error = %e, "Failed to persist API key.");
            return false;
        }

        self.keys.insert(scanner_type, Some(api_key.to_string()));
        if let Some(provider) = provider {
            self.providers.insert(scanner_type, Some(provider.to_string()));
            self.base_urls.remove(&scanner_type);
        }
        info!(%scanner_type, provider = ?provider, "API key saved.");
        true
    }

    /// Returns the stored key, or an empty string when none is saved.
    pub fn get_key(&mut self, scanner_type: ScannerType) -> String {
        read_through(self.storage.as_ref(), &mut self.keys, scanner_type, &key_slot(scanner_type))
    }

    pub fn get_provider(&mut self, scanner_type: ScannerType) -> String {
        read_through(self.storage.as_ref(), &mut self.providers, scanner_type, &provider_slot(scanner_type))
    }

    pub fn has_key(&mut self, scanner_type: ScannerType) -> bool {
        !self.get_key(scanner_type).is_empty()
    }

    /// Removes both key and provider from the cache and from storage.
    pub fn clear_key(&mut self, scanner_type: ScannerType) {
        self.keys.insert(scanner_type, None);
        self.providers.insert(scanner_type, None);
        self.base_urls.remove(&scanner_type);
        for slot in [key_slot(scanner_type), provider_slot(scanner_type)] {
            if let Err(e) = self.storage.remove(&slot) {
                warn!(%scanner_type, slot = %slot, error = %e, "Failed to remove stored credential.");
            }
        }
        info!(%scanner_type, "API key cleared.");
    }

    /// Catalog URL of the stored provider, or the scanner type's default.
    pub fn get_base_url(&mut self, scanner_type: ScannerType) -> String {
        if let Some(url) = self.base_urls.get(&scanner_type) {
            return url.clone();
        }
        let provider = self.get_provider(scanner_type);
        match catalog::find_provider(scanner_type, provider.trim()) {
            Some(entry) => {
                self.base_urls.insert(scanner_type, entry.base_url.to_string());
                entry.base_url.to_string()
            }
            None => catalog::default_base_url(scanner_type).to_string(),
        }
    }

    /// Snapshot handed to a scan; `None` when no key is stored.
    pub fn credential(&mut self, scanner_type: ScannerType) -> Option<Credential> {
        let api_key = self.get_key(scanner_type);
        if api_key.is_empty() {
            return None;
        }
        Some(Credential {
            scanner_type,
            api_key,
            provider: self.get_provider(scanner_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn empty_or_blank_keys_are_rejected_for_every_type() {
        let mut store = CredentialStore::in_memory();
        for scanner_type in ScannerType::iter() {
            assert!(store.set_key(scanner_type, "original", None));
            assert!(!store.set_key(scanner_type, "", Some("Shodan")));
            assert!(!store.set_key(scanner_type, "   ", None));
            assert_eq!(store.get_key(scanner_type), "original");
        }
    }

    #[test]
    fn catalog_provider_resolves_its_base_url() {
        let mut store = CredentialStore::in_memory();
        assert!(store.set_key(ScannerType::Network, "abc", Some("Censys")));
        assert_eq!(store.get_key(ScannerType::Network), "abc");
        assert_eq!(store.get_base_url(ScannerType::Network), "https://search.censys.io/api/v2");
    }

    #[test]
    fn unknown_provider_falls_back_to_default_url() {
        let mut store = CredentialStore::in_memory();
        assert!(store.set_key(ScannerType::Port, "abc", Some("ProviderX")));
        assert_eq!(store.get_provider(ScannerType::Port), "ProviderX");
        assert_eq!(store.get_base_url(ScannerType::Port), "https://api.portscan.example");
    }

    #[test]
    fn switching_to_unknown_provider_drops_the_resolved_url() {
        let mut store = CredentialStore::in_memory();
        store.set_key(ScannerType::Network, "abc", Some("Shodan"));
        store.set_key(ScannerType::Network, "abc", Some("Homegrown"));
        assert_eq!(store.get_base_url(ScannerType::Network), "https://api.networkscan.example");
    }

    #[test]
    fn clear_removes_key_and_provider() {
        let mut store = CredentialStore::in_memory();
        store.set_key(ScannerType::Traffic, "abc", Some("Zeek"));
        store.clear_key(ScannerType::Traffic);
        assert_eq!(store.get_key(ScannerType::Traffic), "");
        assert_eq!(store.get_provider(ScannerType::Traffic), "");
        assert!(store.credential(ScannerType::Traffic).is_none());
    }

    #[test]
    fn keys_are_isolated_per_scanner_type() {
        let mut store = CredentialStore::in_memory();
        store.set_key(ScannerType::Network, "net-key", None);
        assert_eq!(store.get_key(ScannerType::Port), "");
        assert_eq!(store.get_base_url(ScannerType::Network), "https://api.networkscan.example");
    }

    #[test]
    fn file_storage_survives_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let mut store = CredentialStore::new(FileStorage::new(&path));
        assert!(store.set_key(ScannerType::Vulnerability, "vuln-key", Some("Nessus")));
        drop(store);

        let mut reopened = CredentialStore::new(FileStorage::new(&path));
        assert_eq!(reopened.get_key(ScannerType::Vulnerability), "vuln-key");
        assert_eq!(reopened.get_provider(ScannerType::Vulnerability), "Nessus");
        assert_eq!(reopened.get_base_url(ScannerType::Vulnerability), "https://cloud.tenable.com/api");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("scanner_api_key_vulnerability"));
    }

    #[test]
    fn corrupt_file_reads_as_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = CredentialStore::new(FileStorage::new(&path));
        assert_eq!(store.get_key(ScannerType::Network), "");
        assert!(!store.set_key(ScannerType::Network, "abc", None));
    }

    #[test]
    fn padded_values_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let mut store = CredentialStore::new(FileStorage::new(&path));
        assert!(store.set_key(ScannerType::Network, " abc ", Some(" Shodan ")));
        assert_eq!(store.get_key(ScannerType::Network), " abc ");
        assert_eq!(store.get_provider(ScannerType::Network), " Shodan ");
        assert_eq!(store.get_base_url(ScannerType::Network), "https://api.shodan.io");

        let mut reopened = CredentialStore::new(FileStorage::new(&path));
        assert_eq!(reopened.get_key(ScannerType::Network), " abc ");
        assert_eq!(reopened.get_provider(ScannerType::Network), " Shodan ");
    }

    /// Memory storage that refuses to write provider slots.
    #[derive(Default)]
    struct ProviderWritesFail(MemoryStorage);

    impl KeyValueStorage for ProviderWritesFail {
        fn get(&self, key: &str) -> Result<Option<String>, ScanError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), ScanError> {
            if key.starts_with("scanner_api_provider_") {
                return Err(ScanError::Storage("disk full".into()));
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), ScanError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_provider_write_restores_the_previous_key() {
        let key = key_slot(ScannerType::Port);
        let provider = provider_slot(ScannerType::Port);

        let mut storage = ProviderWritesFail::default();
        storage.set(&key, "old").unwrap();
        assert!(storage.set_many(&[(key.as_str(), "new"), (provider.as_str(), "Shodan")]).is_err());
        assert_eq!(storage.get(&key).unwrap().as_deref(), Some("old"));

        let mut fresh = ProviderWritesFail::default();
        assert!(fresh.set_many(&[(key.as_str(), "new"), (provider.as_str(), "Shodan")]).is_err());
        assert_eq!(fresh.get(&key).unwrap(), None);
    }

    #[test]
    fn failed_provider_write_keeps_the_store_unchanged() {
        let mut store = CredentialStore::new(ProviderWritesFail::default());
        assert!(store.set_key(ScannerType::Port, "old", None));
        assert!(!store.set_key(ScannerType::Port, "new", Some("Shodan")));

        let credential = store.credential(ScannerType::Port).unwrap();
        assert_eq!(credential.api_key, "old");
        assert_eq!(credential.provider, "");
    }

    #[test]
    fn missing_and_unreadable_slots_are_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = CredentialStore::new(FileStorage::new(&path));
        assert!(!store.has_key(ScannerType::Network));
        assert_eq!(store.get_provider(ScannerType::Network), "");

        // Repaired behind the store's back: the cached absence still answers.
        std::fs::write(&path, r#"{"scanner_api_key_network":"abc"}"#).unwrap();
        assert!(!store.has_key(ScannerType::Network));

        let mut reopened = CredentialStore::new(FileStorage::new(&path));
        assert!(reopened.has_key(ScannerType::Network));
    }
}
