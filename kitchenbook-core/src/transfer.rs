//! Whole-store export, import and reset.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, TransferError};
use crate::models::{Ingredient, MealPlan, Order, Recipe, ShopInfo};
use crate::store::{Store, StoreKey};

/// A snapshot of every collection plus the shop profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub shop_info: ShopInfo,
    pub recipes: Vec<Recipe>,
    pub orders: Vec<Order>,
    pub ingredients: Vec<Ingredient>,
    pub meal_plans: Vec<MealPlan>,
    pub export_time: DateTime<Utc>,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Import documents may leave out any section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default)]
    shop_info: Option<ShopInfo>,
    #[serde(default)]
    recipes: Option<Vec<Recipe>>,
    #[serde(default)]
    orders: Option<Vec<Order>>,
    #[serde(default)]
    ingredients: Option<Vec<Ingredient>>,
    #[serde(default)]
    meal_plans: Option<Vec<MealPlan>>,
}

pub fn export(store: &Store, now: DateTime<Utc>) -> Result<ExportDocument, StoreError> {
    Ok(ExportDocument {
        shop_info: store.get(StoreKey::ShopInfo)?,
        recipes: store.get(StoreKey::Recipes)?,
        orders: store.get(StoreKey::Orders)?,
        ingredients: store.get(StoreKey::Ingredients)?,
        meal_plans: store.get(StoreKey::MealPlans)?,
        export_time: now,
    })
}

/// Overwrites every section present in `json`, leaving the others alone.
///
/// The whole document is parsed before anything is written. Returns the
/// keys that were replaced.
pub fn import(store: &Store, json: &str) -> Result<Vec<StoreKey>, TransferError> {
    let doc: ImportDocument = serde_json::from_str(json)?;
    let mut written = Vec::new();

    if let Some(shop) = doc.shop_info {
        store.set(StoreKey::ShopInfo, &shop)?;
        written.push(StoreKey::ShopInfo);
    }
    if let Some(recipes) = doc.recipes {
        store.set(StoreKey::Recipes, &recipes)?;
        written.push(StoreKey::Recipes);
    }
    if let Some(orders) = doc.orders {
        store.set(StoreKey::Orders, &orders)?;
        written.push(StoreKey::Orders);
    }
    if let Some(ingredients) = doc.ingredients {
        store.set(StoreKey::Ingredients, &ingredients)?;
        written.push(StoreKey::Ingredients);
    }
    if let Some(meal_plans) = doc.meal_plans {
        store.set(StoreKey::MealPlans, &meal_plans)?;
        written.push(StoreKey::MealPlans);
    }

    tracing::info!("Imported {} section(s)", written.len());
    Ok(written)
}

/// Empties recipes, orders, ingredients and meal plans. The shop profile is
/// kept.
pub fn clear_all(store: &Store) -> Result<(), StoreError> {
    let empty: Vec<serde_json::Value> = Vec::new();
    for key in [
        StoreKey::Recipes,
        StoreKey::Orders,
        StoreKey::Ingredients,
        StoreKey::MealPlans,
    ] {
        store.set(key, &empty)?;
    }
    tracing::info!("Cleared all collections");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStats {
    pub recipe_count: usize,
    pub order_count: usize,
    pub ingredient_count: usize,
    pub plan_count: usize,
}

impl fmt::Display for DataStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recipes:     {}", self.recipe_count)?;
        writeln!(f, "Orders:      {}", self.order_count)?;
        writeln!(f, "Ingredients: {}", self.ingredient_count)?;
        write!(f, "Meal plans:  {}", self.plan_count)
    }
}

pub fn stats(store: &Store) -> Result<DataStats, StoreError> {
    Ok(DataStats {
        recipe_count: store.get::<Vec<Recipe>>(StoreKey::Recipes)?.len(),
        order_count: store.get::<Vec<Order>>(StoreKey::Orders)?.len(),
        ingredient_count: store.get::<Vec<Ingredient>>(StoreKey::Ingredients)?.len(),
        plan_count: store.get::<Vec<MealPlan>>(StoreKey::MealPlans)?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeIngredient;
    use crate::repo::{IngredientRepository, RecipeRepository};
    use serde_json::json;

    fn seeded_store() -> Store {
        let store = Store::memory();
        RecipeRepository::new(store.clone())
            .add(Recipe::new("Soup").with_ingredients(vec![RecipeIngredient::new("water", "")]))
            .unwrap();
        IngredientRepository::new(store.clone())
            .add(Ingredient::new("salt", 1.0, "kg"))
            .unwrap();
        store
    }

    #[test]
    fn test_export_shape() {
        let store = seeded_store();
        let doc = export(&store, Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        for key in [
            "shopInfo",
            "recipes",
            "orders",
            "ingredients",
            "mealPlans",
            "exportTime",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["recipes"][0]["name"], "Soup");
        assert_eq!(value["shopInfo"]["id"], "shop_001");
    }

    #[test]
    fn test_export_then_import_into_fresh_store() {
        let doc = export(&seeded_store(), Utc::now()).unwrap();
        let fresh = Store::memory();

        let written = import(&fresh, &doc.to_json().unwrap()).unwrap();
        assert_eq!(written.len(), 5);
        assert_eq!(stats(&fresh).unwrap().recipe_count, 1);
        assert_eq!(stats(&fresh).unwrap().ingredient_count, 1);
    }

    #[test]
    fn test_import_leaves_absent_keys_untouched() {
        let store = seeded_store();
        let written = import(&store, &json!({"orders": []}).to_string()).unwrap();

        assert_eq!(written, vec![StoreKey::Orders]);
        let stats = stats(&store).unwrap();
        assert_eq!(stats.recipe_count, 1);
        assert_eq!(stats.ingredient_count, 1);
    }

    #[test]
    fn test_malformed_import_writes_nothing() {
        let store = seeded_store();
        let err = import(&store, "{not json").unwrap_err();
        assert!(matches!(err, TransferError::Malformed(_)));

        let bad_section = json!({"orders": [], "recipes": "oops"}).to_string();
        assert!(import(&store, &bad_section).is_err());
        assert_eq!(stats(&store).unwrap().recipe_count, 1);
    }

    #[test]
    fn test_clear_all_keeps_shop() {
        let store = seeded_store();
        let mut shop = ShopInfo::default();
        shop.name = "Kept".into();
        store.set(StoreKey::ShopInfo, &shop).unwrap();

        clear_all(&store).unwrap();

        assert_eq!(
            stats(&store).unwrap(),
            DataStats {
                recipe_count: 0,
                order_count: 0,
                ingredient_count: 0,
                plan_count: 0
            }
        );
        assert_eq!(store.get::<ShopInfo>(StoreKey::ShopInfo).unwrap().name, "Kept");
    }
}
