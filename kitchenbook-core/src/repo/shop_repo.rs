use crate::error::{KitchenError, StoreError};
use crate::models::{ShopInfo, UserInfo};
use crate::store::{Store, StoreKey};
use crate::validate;

/// The shop profile plus the small per-device settings stored beside it.
pub struct ShopRepository {
    store: Store,
}

impl ShopRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The stored shop, seeding the default shop on first access.
    ///
    /// Stored data is returned as is; invariants are repaired on save.
    pub fn get(&self) -> Result<ShopInfo, StoreError> {
        self.store.get(StoreKey::ShopInfo)
    }

    /// Validates, repairs and replaces the stored shop.
    pub fn save(&self, shop: ShopInfo) -> Result<ShopInfo, KitchenError> {
        let shop = validate::shop(shop)?;
        self.store.set(StoreKey::ShopInfo, &shop)?;
        Ok(shop)
    }

    /// Stores a changed kitchen selection. Only the kitchen invariants are
    /// repaired; profile text is kept as stored.
    pub fn save_selection(&self, mut shop: ShopInfo) -> Result<ShopInfo, StoreError> {
        if shop.repair() {
            tracing::warn!(
                "Repaired kitchen selection for shop '{}', current kitchen is now '{}'",
                shop.id,
                shop.current_kitchen_id
            );
        }
        self.store.set(StoreKey::ShopInfo, &shop)?;
        Ok(shop)
    }

    pub fn user(&self) -> Result<Option<UserInfo>, StoreError> {
        self.store.load(StoreKey::UserInfo)
    }

    pub fn save_user(&self, user: &UserInfo) -> Result<(), StoreError> {
        self.store.set(StoreKey::UserInfo, user)
    }

    /// Order notifications are on unless explicitly turned off.
    pub fn notifications_enabled(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .load(StoreKey::NotificationEnabled)?
            .unwrap_or(true))
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.store.set(StoreKey::NotificationEnabled, &enabled)
    }
}
