//! Kitchenbook Core Library
//!
//! Recipes, pantry stock, meal plans and orders for a small shop with one or
//! more kitchens, persisted through a synchronous key/value [`Store`].

pub mod catalog;
pub mod collab;
pub mod error;
pub mod expiry;
pub mod id;
pub mod matching;
pub mod models;
pub mod ordering;
pub mod repo;
pub mod session;
pub mod store;
pub mod transfer;
pub mod validate;

pub use collab::{confirmed, Confirm, IdentityProvider, ImagePicker};
pub use error::{KitchenError, StoreError, TransferError, ValidationError};
pub use expiry::{days_left, sort_by_expiry, ExpiryStatus};
pub use matching::match_recipes_by_ingredients;
pub use models::{
    Admin, Ingredient, IngredientPatch, Kitchen, Meal, MealPlan, Nutrition, Order, OrderItem,
    OrderPatch, OrderStatus, PlannedDish, Recipe, RecipeIngredient, RecipePatch, ShopInfo, Step,
    UserInfo,
};
pub use repo::{
    IngredientRepository, MealPlanRepository, OrderRepository, PlanSummary, RecipeRepository,
    ShopRepository,
};
pub use session::{AdminMatch, ProfilePatch, Session, ShopImage};
pub use store::{Backend, FileBackend, MemoryBackend, Store, StoreKey};
pub use transfer::{DataStats, ExportDocument};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
