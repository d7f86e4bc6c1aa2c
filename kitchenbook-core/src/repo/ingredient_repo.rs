use crate::error::StoreError;
use crate::models::{Ingredient, IngredientPatch};
use crate::store::{Store, StoreKey};

pub struct IngredientRepository {
    store: Store,
}

impl IngredientRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Ingredient>, StoreError> {
        super::list(&self.store)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Ingredient>, StoreError> {
        super::find(&self.store, id)
    }

    pub fn add(&self, ingredient: Ingredient) -> Result<Ingredient, StoreError> {
        let mut ingredients = self.list()?;
        ingredients.push(ingredient.clone());
        self.store.set(StoreKey::Ingredients, &ingredients)?;
        Ok(ingredient)
    }

    pub fn update(
        &self,
        id: &str,
        patch: IngredientPatch,
    ) -> Result<Option<Ingredient>, StoreError> {
        super::modify(&self.store, id, |ingredient| patch.apply(ingredient))
    }

    pub fn delete(&self, id: &str) -> Result<Vec<Ingredient>, StoreError> {
        super::remove(&self.store, id)
    }
}
