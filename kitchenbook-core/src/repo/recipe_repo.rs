use crate::error::StoreError;
use crate::models::{Recipe, RecipePatch};
use crate::store::{Store, StoreKey};

pub struct RecipeRepository {
    store: Store,
}

impl RecipeRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All recipes in insertion order.
    pub fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        super::list(&self.store)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        super::find(&self.store, id)
    }

    /// Appends a recipe. The caller assigns its id and creation time.
    pub fn add(&self, recipe: Recipe) -> Result<Recipe, StoreError> {
        let mut recipes = self.list()?;
        recipes.push(recipe.clone());
        self.store.set(StoreKey::Recipes, &recipes)?;
        Ok(recipe)
    }

    /// Overwrites the fields present in `patch`. Returns `None` if no recipe
    /// has this id.
    pub fn update(&self, id: &str, patch: RecipePatch) -> Result<Option<Recipe>, StoreError> {
        super::modify(&self.store, id, |recipe| patch.apply(recipe))
    }

    /// Removes a recipe and returns the remaining ones.
    pub fn delete(&self, id: &str) -> Result<Vec<Recipe>, StoreError> {
        super::remove(&self.store, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecipeIngredient, Step};

    fn repo() -> RecipeRepository {
        RecipeRepository::new(Store::memory())
    }

    fn recipe(name: &str) -> Recipe {
        Recipe::new(name)
            .with_category("家常菜")
            .with_ingredients(vec![RecipeIngredient::new("鸡蛋", "2个")])
            .with_steps(vec![Step::new("炒")])
    }

    #[test]
    fn test_add_and_get() {
        let repo = repo();
        let added = repo.add(recipe("番茄炒蛋")).unwrap();

        let fetched = repo.get_by_id(&added.id).unwrap().unwrap();
        assert_eq!(fetched, added);
        assert!(repo.get_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let repo = repo();
        repo.add(recipe("A")).unwrap();
        repo.add(recipe("B")).unwrap();
        repo.add(recipe("C")).unwrap();

        let names: Vec<String> = repo.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_update_changes_only_patched_fields() {
        let repo = repo();
        let original = repo.add(recipe("A").with_servings(2)).unwrap();

        let updated = repo
            .update(
                &original.id,
                RecipePatch {
                    servings: Some(4),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.servings, 4);
        let mut expected = original.clone();
        expected.servings = 4;
        assert_eq!(updated, expected);
        assert_eq!(repo.get_by_id(&original.id).unwrap().unwrap(), expected);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let repo = repo();
        repo.add(recipe("A")).unwrap();
        let before = repo.list().unwrap();

        let result = repo
            .update(
                "missing",
                RecipePatch {
                    name: Some("B".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
        assert_eq!(repo.list().unwrap(), before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let repo = repo();
        let a = repo.add(recipe("A")).unwrap();
        repo.add(recipe("B")).unwrap();

        let once = repo.delete(&a.id).unwrap();
        let twice = repo.delete(&a.id).unwrap();

        assert_eq!(once.len(), 1);
        assert_eq!(once, twice);
        assert_eq!(once[0].name, "B");
    }

    #[test]
    fn test_reads_plain_string_ingredients() {
        let store = Store::memory();
        store
            .set_raw(
                StoreKey::Recipes,
                serde_json::json!([{
                    "id": "r1",
                    "name": "Toast",
                    "ingredients": ["bread", {"name": "butter", "amount": 10}],
                    "steps": ["toast it"]
                }]),
            )
            .unwrap();

        let recipe = RecipeRepository::new(store)
            .get_by_id("r1")
            .unwrap()
            .unwrap();
        assert_eq!(recipe.ingredients[0], RecipeIngredient::new("bread", ""));
        assert_eq!(recipe.ingredients[1], RecipeIngredient::new("butter", "10"));
        assert_eq!(recipe.steps[0].text, "toast it");
        assert_eq!(recipe.servings, 1);
    }
}
