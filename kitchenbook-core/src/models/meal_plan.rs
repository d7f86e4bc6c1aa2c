use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three planned meals of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meal::Breakfast => write!(f, "breakfast"),
            Meal::Lunch => write!(f, "lunch"),
            Meal::Dinner => write!(f, "dinner"),
        }
    }
}

impl FromStr for Meal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" => Ok(Meal::Dinner),
            _ => Err(format!(
                "Invalid meal '{}'. Valid options: breakfast, lunch, dinner",
                s
            )),
        }
    }
}

/// A recipe reference inside a meal plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedDish {
    pub id: String,
    pub name: String,
}

impl PlannedDish {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The plan for one calendar day. `date` is the natural key: there is at
/// most one plan per date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub breakfast: Vec<PlannedDish>,
    #[serde(default)]
    pub lunch: Vec<PlannedDish>,
    #[serde(default)]
    pub dinner: Vec<PlannedDish>,
}

impl MealPlan {
    /// An empty plan for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
        }
    }

    pub fn dishes(&self, meal: Meal) -> &[PlannedDish] {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
        }
    }

    fn dishes_mut(&mut self, meal: Meal) -> &mut Vec<PlannedDish> {
        match meal {
            Meal::Breakfast => &mut self.breakfast,
            Meal::Lunch => &mut self.lunch,
            Meal::Dinner => &mut self.dinner,
        }
    }

    /// Adds a dish to a meal. Returns false if that recipe is already
    /// planned for the meal.
    pub fn add_dish(&mut self, meal: Meal, dish: PlannedDish) -> bool {
        let dishes = self.dishes_mut(meal);
        if dishes.iter().any(|d| d.id == dish.id) {
            return false;
        }
        dishes.push(dish);
        true
    }

    /// Removes a recipe from a meal. Returns true if it was present.
    pub fn remove_dish(&mut self, meal: Meal, recipe_id: &str) -> bool {
        let dishes = self.dishes_mut(meal);
        let len_before = dishes.len();
        dishes.retain(|d| d.id != recipe_id);
        dishes.len() != len_before
    }

    /// All dishes, breakfast first, then lunch, then dinner.
    pub fn all_dishes(&self) -> impl Iterator<Item = &PlannedDish> {
        self.breakfast
            .iter()
            .chain(self.lunch.iter())
            .chain(self.dinner.iter())
    }

    pub fn dish_count(&self) -> usize {
        self.breakfast.len() + self.lunch.len() + self.dinner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dish_count() == 0
    }
}

impl fmt::Display for MealPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.date, self.date.format("%m月%d日"))?;
        writeln!(f, "{}", "-".repeat(10))?;
        for meal in Meal::ALL {
            let dishes = self.dishes(meal);
            if dishes.is_empty() {
                writeln!(f, "  {:10} -", meal)?;
            } else {
                let names: Vec<&str> = dishes.iter().map(|d| d.name.as_str()).collect();
                writeln!(f, "  {:10} {}", meal, names.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_meal_from_str() {
        assert_eq!(Meal::from_str("LUNCH").unwrap(), Meal::Lunch);
        assert!(Meal::from_str("snack").is_err());
        assert_eq!(format!("{}", Meal::Dinner), "dinner");
    }

    #[test]
    fn test_add_dish_rejects_duplicates_per_meal() {
        let mut plan = MealPlan::new(date());
        assert!(plan.add_dish(Meal::Lunch, PlannedDish::new("r1", "Soup")));
        assert!(!plan.add_dish(Meal::Lunch, PlannedDish::new("r1", "Soup")));
        // The same recipe may appear at another meal.
        assert!(plan.add_dish(Meal::Dinner, PlannedDish::new("r1", "Soup")));
        assert_eq!(plan.dish_count(), 2);
    }

    #[test]
    fn test_remove_dish() {
        let mut plan = MealPlan::new(date());
        plan.add_dish(Meal::Breakfast, PlannedDish::new("r1", "Congee"));
        assert!(plan.remove_dish(Meal::Breakfast, "r1"));
        assert!(!plan.remove_dish(Meal::Breakfast, "r1"));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_all_dishes_order() {
        let mut plan = MealPlan::new(date());
        plan.add_dish(Meal::Dinner, PlannedDish::new("d", "Dinner dish"));
        plan.add_dish(Meal::Breakfast, PlannedDish::new("b", "Breakfast dish"));
        plan.add_dish(Meal::Lunch, PlannedDish::new("l", "Lunch dish"));

        let ids: Vec<&str> = plan.all_dishes().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "l", "d"]);
    }

    #[test]
    fn test_stored_shape() {
        let mut plan = MealPlan::new(date());
        plan.add_dish(Meal::Lunch, PlannedDish::new("r1", "Soup"));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["date"], "2025-01-01");
        assert_eq!(json["lunch"][0]["name"], "Soup");
        assert_eq!(json["breakfast"], serde_json::json!([]));
    }

    #[test]
    fn test_display() {
        let mut plan = MealPlan::new(date());
        plan.add_dish(Meal::Lunch, PlannedDish::new("r1", "Soup"));
        let output = format!("{}", plan);
        assert!(output.contains("2025-01-01"));
        assert!(output.contains("01月01日"));
        assert!(output.contains("Soup"));
    }
}
