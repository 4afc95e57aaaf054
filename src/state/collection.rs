use std::fs;
use std::path::PathBuf;

use super::coin::{normalize, Coin};

/// The Collection owns the authoritative list of coin records.
///
/// Records are kept newest-first and persisted in full to a single
/// JSON file after every mutation. The file has no schema version;
/// older record shapes are migrated by the normalizer on load.
pub struct Collection {
    coins: Vec<Coin>,
    store_path: PathBuf,
}

impl Collection {
    /// Load the collection from the default store file.
    ///
    /// The store lives in the user's data directory:
    /// - Linux: ~/.local/share/coin-catalog/collection.json
    /// - macOS: ~/Library/Application Support/coin-catalog/collection.json
    /// - Windows: %APPDATA%\coin-catalog\collection.json
    pub fn load() -> Self {
        Self::load_from(Self::default_store_path())
    }

    /// Load the collection from a specific store file.
    ///
    /// A missing file is a normal first run. Corrupt content is logged
    /// and yields an empty collection, never an error.
    pub fn load_from(store_path: PathBuf) -> Self {
        let coins = match fs::read_to_string(&store_path) {
            Ok(contents) => match serde_json::from_str::<serde_json::Value>(&contents) {
                Ok(serde_json::Value::Array(items)) => items.iter().map(normalize).collect(),
                Ok(_) => {
                    eprintln!("⚠️  Store file is not a record array, starting empty");
                    Vec::new()
                }
                Err(e) => {
                    eprintln!("⚠️  Could not parse store file: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        println!(
            "📁 Collection loaded: {} coins from {}",
            coins.len(),
            store_path.display()
        );

        Collection { coins, store_path }
    }

    /// Resolve the default store file path
    fn default_store_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("coin-catalog");
        path.push("collection.json");
        path
    }

    /// Current records, newest first
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&Coin> {
        self.coins.iter().find(|coin| coin.id == id)
    }

    /// Insert a record at the head and persist
    pub fn add(&mut self, coin: Coin) {
        self.coins.insert(0, coin);
        self.persist();
    }

    /// Remove a record by id and persist.
    ///
    /// Returns whether anything was removed so the caller can drop a
    /// transient selection of that record. An unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.coins.len();
        self.coins.retain(|coin| coin.id != id);

        let removed = self.coins.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Serialize the full collection and write it atomically.
    ///
    /// Failure is logged, not surfaced: the in-memory list stays
    /// authoritative for the rest of the session.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            eprintln!("⚠️  Failed to persist collection: {}", e);
        }
    }

    fn try_persist(&self) -> Result<(), String> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create {}: {}", parent.display(), e))?;
        }

        let json = serde_json::to_string(&self.coins).map_err(|e| format!("serialize: {}", e))?;

        // Write the whole array to a sibling file, then rename over the
        // store so a crash mid-write never corrupts it
        let tmp_path = self.store_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| format!("write {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, &self.store_path)
            .map_err(|e| format!("rename to {}: {}", self.store_path.display(), e))?;

        Ok(())
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("coins", &self.coins.len())
            .field("store_path", &self.store_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coin(name: &str, value: f64) -> Coin {
        Coin {
            id: Coin::new_id(),
            name: name.to_string(),
            country: "Testland".to_string(),
            year: Some(1990),
            denomination: "1 Test".to_string(),
            value,
            composition: "Silver".to_string(),
            description: "A test coin".to_string(),
            condition: "Fine".to_string(),
            is_rare: false,
            rarity_details: String::new(),
            date_added: 1700000000,
            front_image_url: "front-ref".to_string(),
            back_image_url: "back-ref".to_string(),
            sources: vec!["https://example.com".to_string()],
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::load_from(dir.path().join("collection.json"));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(&path, "not json at all {{{").unwrap();

        let collection = Collection::load_from(path);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_add_then_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");

        let coin = sample_coin("Morgan Dollar", 42.5);
        let mut collection = Collection::load_from(path.clone());
        collection.add(coin.clone());

        let reloaded = Collection::load_from(path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.coins()[0], coin);
    }

    #[test]
    fn test_add_inserts_at_head() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = Collection::load_from(dir.path().join("collection.json"));

        collection.add(sample_coin("First", 1.0));
        collection.add(sample_coin("Second", 2.0));

        assert_eq!(collection.coins()[0].name, "Second");
        assert_eq!(collection.coins()[1].name, "First");
    }

    #[test]
    fn test_remove_deletes_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = Collection::load_from(dir.path().join("collection.json"));

        let keep_a = sample_coin("Keep A", 1.0);
        let target = sample_coin("Target", 2.0);
        let keep_b = sample_coin("Keep B", 3.0);
        collection.add(keep_a.clone());
        collection.add(target.clone());
        collection.add(keep_b.clone());

        assert!(collection.remove(&target.id));
        assert_eq!(collection.coins(), &[keep_b, keep_a]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = Collection::load_from(dir.path().join("collection.json"));
        collection.add(sample_coin("Only", 1.0));

        assert!(!collection.remove("no-such-id"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_legacy_records_are_migrated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.json");
        fs::write(
            &path,
            r#"[{"id": 17, "name": "Old Penny", "imageUrl": "legacy-ref", "value": "$3.50"}]"#,
        )
        .unwrap();

        let collection = Collection::load_from(path);
        assert_eq!(collection.len(), 1);

        let coin = &collection.coins()[0];
        assert_eq!(coin.id, "17");
        assert_eq!(coin.front_image_url, "legacy-ref");
        assert_eq!(coin.back_image_url, "legacy-ref");
        assert_eq!(coin.value, 3.5);
        assert_eq!(coin.year, None);
    }
}
