use chrono::{Duration, NaiveDate};

use crate::error::{KitchenError, StoreError, ValidationError};
use crate::models::{Meal, MealPlan, PlannedDish};
use crate::store::{Store, StoreKey};

/// One day of the week overview.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub date: NaiveDate,
    pub dish_count: usize,
}

/// Meal plans keyed by date. There is no separate update: `add` replaces
/// the plan for an existing date.
pub struct MealPlanRepository {
    store: Store,
}

impl MealPlanRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<MealPlan>, StoreError> {
        self.store.get(StoreKey::MealPlans)
    }

    pub fn get_by_date(&self, date: NaiveDate) -> Result<Option<MealPlan>, StoreError> {
        Ok(self.list()?.into_iter().find(|p| p.date == date))
    }

    /// Stores `plan`, replacing any plan with the same date.
    pub fn add(&self, plan: MealPlan) -> Result<MealPlan, StoreError> {
        let mut plans = self.list()?;
        match plans.iter_mut().find(|p| p.date == plan.date) {
            Some(existing) => *existing = plan.clone(),
            None => plans.push(plan.clone()),
        }
        self.store.set(StoreKey::MealPlans, &plans)?;
        Ok(plan)
    }

    /// Adds a dish to one meal of `date`, creating the plan when needed.
    pub fn add_dish(
        &self,
        date: NaiveDate,
        meal: Meal,
        dish: PlannedDish,
    ) -> Result<MealPlan, KitchenError> {
        let mut plan = self
            .get_by_date(date)?
            .unwrap_or_else(|| MealPlan::new(date));
        let name = dish.name.clone();
        if !plan.add_dish(meal, dish) {
            return Err(ValidationError::DuplicateDish(name).into());
        }
        Ok(self.add(plan)?)
    }

    /// Removes a dish from one meal. Returns `None` when there is no plan
    /// for `date`.
    pub fn remove_dish(
        &self,
        date: NaiveDate,
        meal: Meal,
        recipe_id: &str,
    ) -> Result<Option<MealPlan>, StoreError> {
        let Some(mut plan) = self.get_by_date(date)? else {
            return Ok(None);
        };
        if plan.remove_dish(meal, recipe_id) {
            plan = self.add(plan)?;
        }
        Ok(Some(plan))
    }

    /// Replaces the plan for `date` with an empty one.
    pub fn clear(&self, date: NaiveDate) -> Result<MealPlan, StoreError> {
        self.add(MealPlan::new(date))
    }

    /// Drops the plan for `date` entirely, returning the remaining plans.
    pub fn delete(&self, date: NaiveDate) -> Result<Vec<MealPlan>, StoreError> {
        let mut plans = self.list()?;
        let before = plans.len();
        plans.retain(|p| p.date != date);
        if plans.len() != before {
            self.store.set(StoreKey::MealPlans, &plans)?;
        }
        Ok(plans)
    }

    /// Days from `today` through the following six that have a plan.
    pub fn week_from(&self, today: NaiveDate) -> Result<Vec<PlanSummary>, StoreError> {
        let plans = self.list()?;
        let summaries = (0..7)
            .map(|offset| today + Duration::days(offset))
            .filter_map(|date| {
                plans.iter().find(|p| p.date == date).map(|p| PlanSummary {
                    date,
                    dish_count: p.dish_count(),
                })
            })
            .collect();
        Ok(summaries)
    }
}
