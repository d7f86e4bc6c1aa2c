//! Typed CRUD over the store's collections.
//!
//! Every repository reads the whole collection, changes it in memory and
//! writes it back. Missing ids are reported as `Ok(None)`.

mod ingredient_repo;
mod mealplan_repo;
mod order_repo;
mod recipe_repo;
mod shop_repo;

pub use ingredient_repo::IngredientRepository;
pub use mealplan_repo::{MealPlanRepository, PlanSummary};
pub use order_repo::OrderRepository;
pub use recipe_repo::RecipeRepository;
pub use shop_repo::ShopRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{Ingredient, Order, Recipe};
use crate::store::{Store, StoreKey};

/// A record kept in an id-keyed collection.
trait Record: Serialize + DeserializeOwned + Clone {
    const KEY: StoreKey;

    fn id(&self) -> &str;
}

impl Record for Recipe {
    const KEY: StoreKey = StoreKey::Recipes;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Ingredient {
    const KEY: StoreKey = StoreKey::Ingredients;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Order {
    const KEY: StoreKey = StoreKey::Orders;

    fn id(&self) -> &str {
        &self.id
    }
}

fn list<T: Record>(store: &Store) -> Result<Vec<T>, StoreError> {
    store.get(T::KEY)
}

fn find<T: Record>(store: &Store, id: &str) -> Result<Option<T>, StoreError> {
    Ok(list::<T>(store)?.into_iter().find(|r| r.id() == id))
}

/// Applies `change` to the record with `id` and writes the collection back.
fn modify<T, F>(store: &Store, id: &str, change: F) -> Result<Option<T>, StoreError>
where
    T: Record,
    F: FnOnce(&mut T),
{
    let mut records = list::<T>(store)?;
    let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
        return Ok(None);
    };
    change(record);
    let updated = record.clone();
    store.set(T::KEY, &records)?;
    Ok(Some(updated))
}

/// Drops the record with `id`, returning what remains.
fn remove<T: Record>(store: &Store, id: &str) -> Result<Vec<T>, StoreError> {
    let mut records = list::<T>(store)?;
    let before = records.len();
    records.retain(|r| r.id() != id);
    if records.len() != before {
        store.set(T::KEY, &records)?;
    }
    Ok(records)
}
