use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::loose;
use crate::id::generate_id;

/// An item in the pantry.
///
/// `quantity` is `None` for stock that is not counted; such items always
/// count as available.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "loose::quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub unit: String,
    #[serde(default, with = "loose::expiry_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub add_time: DateTime<Utc>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            quantity: Some(quantity),
            unit: unit.into(),
            expiry_date: None,
            add_time: Utc::now(),
        }
    }

    pub fn with_expiry_date(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    /// True when the item can be used: untracked, or a positive count.
    pub fn in_stock(&self) -> bool {
        match self.quantity {
            None => true,
            Some(q) => q > 0.0,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity {
            Some(q) if self.unit.is_empty() => write!(f, "{} {}", q, self.name)?,
            Some(q) => write!(f, "{} {} {}", q, self.unit, self.name)?,
            None => write!(f, "{}", self.name)?,
        }
        if let Some(date) = self.expiry_date {
            write!(f, " (expires {})", date)?;
        }
        Ok(())
    }
}

/// Top-level fields to overwrite on an existing pantry item.
#[derive(Debug, Clone, Default)]
pub struct IngredientPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl IngredientPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.expiry_date.is_none()
    }

    pub fn apply(self, ingredient: &mut Ingredient) {
        if let Some(name) = self.name {
            ingredient.name = name;
        }
        if let Some(quantity) = self.quantity {
            ingredient.quantity = Some(quantity);
        }
        if let Some(unit) = self.unit {
            ingredient.unit = unit;
        }
        if let Some(expiry_date) = self.expiry_date {
            ingredient.expiry_date = expiry_date;
        }
    }
}
