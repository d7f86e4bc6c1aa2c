//! Key/value persistence for kitchen records.
//!
//! Every collection is stored whole under a single key and rewritten whole
//! on each change, so there is never a partially written collection.
//!
//! # Keys
//!
//! - `recipes`, `orders`, `ingredients`, `mealPlans`: sequences of records
//! - `shopInfo`: the shop profile with its kitchens
//! - `userInfo`: the last known user identity
//! - `notificationEnabled`: order notification toggle
//!
//! The first five are seeded on first access when absent.

mod file;
mod memory;

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::ShopInfo;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Persistence keys known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Recipes,
    Orders,
    Ingredients,
    MealPlans,
    ShopInfo,
    UserInfo,
    NotificationEnabled,
}

impl StoreKey {
    /// The keys that are seeded on first access.
    pub const SEEDED: [StoreKey; 5] = [
        StoreKey::Recipes,
        StoreKey::Orders,
        StoreKey::Ingredients,
        StoreKey::MealPlans,
        StoreKey::ShopInfo,
    ];

    /// Returns the string key used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Recipes => "recipes",
            StoreKey::Orders => "orders",
            StoreKey::Ingredients => "ingredients",
            StoreKey::MealPlans => "mealPlans",
            StoreKey::ShopInfo => "shopInfo",
            StoreKey::UserInfo => "userInfo",
            StoreKey::NotificationEnabled => "notificationEnabled",
        }
    }

    pub fn is_seeded(&self) -> bool {
        Self::SEEDED.contains(self)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synchronous key/value substrate.
pub trait Backend {
    /// Loads the value stored under `key`, or `None` when absent.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the value stored under `key`.
    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Typed handle over a [`Backend`].
///
/// Cloning is cheap; all clones share the same backend.
#[derive(Clone)]
pub struct Store {
    backend: Rc<dyn Backend>,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    /// Store backed by one JSON file per key under `data_dir`.
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(data_dir.into()))
    }

    /// Store kept entirely in memory.
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Seeds every known collection that is still absent.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.get::<Vec<Value>>(StoreKey::Recipes)?;
        self.get::<Vec<Value>>(StoreKey::Orders)?;
        self.get::<Vec<Value>>(StoreKey::Ingredients)?;
        self.get::<Vec<Value>>(StoreKey::MealPlans)?;
        self.get::<ShopInfo>(StoreKey::ShopInfo)?;
        Ok(())
    }

    /// Reads `key`, seeding it with `T::default()` if it is a seeded key
    /// that is absent. Unseeded absent keys read as `T::default()` without
    /// being written.
    pub fn get<T>(&self, key: StoreKey) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        match self.load(key)? {
            Some(value) => Ok(value),
            None => {
                let value = T::default();
                if key.is_seeded() {
                    tracing::debug!("Seeding '{}'", key);
                    self.set(key, &value)?;
                }
                Ok(value)
            }
        }
    }

    /// Reads `key` without seeding.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        match self.backend.load(key.as_str())? {
            // A stored null is treated like an absent key.
            Some(Value::Null) | None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Replaces the value under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set_raw(key, value)
    }

    /// Reads the untyped value under `key`.
    pub fn get_raw(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        self.backend.load(key.as_str())
    }

    /// Writes an untyped value under `key`.
    pub fn set_raw(&self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        tracing::debug!("Writing '{}'", key);
        self.backend.save(key.as_str(), &value)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;

    #[test]
    fn test_key_names() {
        assert_eq!(StoreKey::MealPlans.as_str(), "mealPlans");
        assert_eq!(StoreKey::ShopInfo.as_str(), "shopInfo");
        assert_eq!(
            StoreKey::NotificationEnabled.to_string(),
            "notificationEnabled"
        );
        assert!(StoreKey::Orders.is_seeded());
        assert!(!StoreKey::UserInfo.is_seeded());
    }

    #[test]
    fn test_first_access_seeds_collections() {
        let store = Store::memory();
        assert!(store.get_raw(StoreKey::Recipes).unwrap().is_none());

        let recipes: Vec<Recipe> = store.get(StoreKey::Recipes).unwrap();
        assert!(recipes.is_empty());
        assert_eq!(
            store.get_raw(StoreKey::Recipes).unwrap(),
            Some(Value::Array(vec![]))
        );
    }

    #[test]
    fn test_first_access_seeds_default_shop() {
        let store = Store::memory();
        let shop: ShopInfo = store.get(StoreKey::ShopInfo).unwrap();

        assert_eq!(shop.id, "shop_001");
        assert_eq!(shop.name, "我的小店");
        assert_eq!(shop.kitchens.len(), 1);
        assert_eq!(shop.kitchens[0].name, "主厨房");
        assert!(shop.kitchens[0].is_default);
        assert_eq!(shop.current_kitchen_id, shop.kitchens[0].id);

        let raw = store.get_raw(StoreKey::ShopInfo).unwrap().unwrap();
        assert_eq!(raw["currentKitchenId"], "kitchen_001");
    }

    #[test]
    fn test_unseeded_key_is_not_written() {
        let store = Store::memory();
        let enabled: bool = store.get(StoreKey::NotificationEnabled).unwrap();
        assert!(!enabled);
        assert!(store.get_raw(StoreKey::NotificationEnabled).unwrap().is_none());
    }

    #[test]
    fn test_initialize_seeds_all_known_keys() {
        let store = Store::memory();
        store.initialize().unwrap();
        for key in StoreKey::SEEDED {
            assert!(store.get_raw(key).unwrap().is_some(), "{} not seeded", key);
        }
    }

    #[test]
    fn test_decode_error_names_key() {
        let store = Store::memory();
        store
            .set_raw(StoreKey::Recipes, serde_json::json!({"not": "a list"}))
            .unwrap();
        let err = store.get::<Vec<Recipe>>(StoreKey::Recipes).unwrap_err();
        assert!(err.to_string().contains("'recipes'"));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let store = Store::memory();
        store.set_raw(StoreKey::Orders, Value::Null).unwrap();
        let orders: Vec<Value> = store.get(StoreKey::Orders).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_clones_share_backend() {
        let store = Store::memory();
        let other = store.clone();
        store.set(StoreKey::NotificationEnabled, &true).unwrap();
        assert_eq!(
            other.load::<bool>(StoreKey::NotificationEnabled).unwrap(),
            Some(true)
        );
    }
}
