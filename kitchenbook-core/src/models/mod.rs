mod ingredient;
mod loose;
mod meal_plan;
mod order;
mod recipe;
mod shop;
mod user;

pub use ingredient::{Ingredient, IngredientPatch};
pub use loose::parse_date;
pub use meal_plan::{Meal, MealPlan, PlannedDish};
pub use order::{Order, OrderItem, OrderPatch, OrderStatus, ANONYMOUS_CUSTOMER, UNKNOWN_DISH};
pub use recipe::{
    Nutrition, Recipe, RecipeIngredient, RecipePatch, Step, DEFAULT_CATEGORIES, DIFFICULTIES,
};
pub use shop::{Admin, Kitchen, ShopInfo, UNKNOWN_OPENID};
pub use user::UserInfo;
