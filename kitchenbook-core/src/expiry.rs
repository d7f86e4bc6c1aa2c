//! Pantry expiry scheduling.

use std::fmt;

use chrono::NaiveDate;

use crate::models::Ingredient;

/// Days until the item expires, negative once it has expired.
pub fn days_left(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Fresh,
    /// Expires within the warning window; carries the days left.
    ExpiringSoon(i64),
    /// Expired this many days ago.
    Expired(i64),
    Undated,
}

impl ExpiryStatus {
    pub fn of(ingredient: &Ingredient, today: NaiveDate, warning_days: i64) -> Self {
        match ingredient.expiry_date {
            None => ExpiryStatus::Undated,
            Some(expiry) => {
                let left = days_left(expiry, today);
                if left < 0 {
                    ExpiryStatus::Expired(-left)
                } else if left <= warning_days {
                    ExpiryStatus::ExpiringSoon(left)
                } else {
                    ExpiryStatus::Fresh
                }
            }
        }
    }

    pub fn needs_attention(self) -> bool {
        matches!(self, ExpiryStatus::ExpiringSoon(_) | ExpiryStatus::Expired(_))
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Fresh => write!(f, "fresh"),
            ExpiryStatus::ExpiringSoon(0) => write!(f, "expires today"),
            ExpiryStatus::ExpiringSoon(days) => write!(f, "expires in {} day(s)", days),
            ExpiryStatus::Expired(days) => write!(f, "expired {} day(s) ago", days),
            ExpiryStatus::Undated => write!(f, "no expiry date"),
        }
    }
}

/// Sorts soonest expiry first. Undated items go last, keeping their order.
pub fn sort_by_expiry(ingredients: &mut [Ingredient]) {
    ingredients.sort_by_key(|i| (i.expiry_date.is_none(), i.expiry_date));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_days_left_is_signed() {
        assert_eq!(days_left(date(3, 5), date(3, 1)), 4);
        assert_eq!(days_left(date(3, 1), date(3, 1)), 0);
        assert_eq!(days_left(date(2, 27), date(3, 1)), -2);
    }

    #[test]
    fn test_status() {
        let today = date(3, 1);
        let item = |m, d| Ingredient::new("milk", 1.0, "L").with_expiry_date(date(m, d));

        assert_eq!(
            ExpiryStatus::of(&item(3, 10), today, 3),
            ExpiryStatus::Fresh
        );
        assert_eq!(
            ExpiryStatus::of(&item(3, 4), today, 3),
            ExpiryStatus::ExpiringSoon(3)
        );
        assert_eq!(
            ExpiryStatus::of(&item(2, 28), today, 3),
            ExpiryStatus::Expired(1)
        );
        assert_eq!(
            ExpiryStatus::of(&Ingredient::new("salt", 1.0, "kg"), today, 3),
            ExpiryStatus::Undated
        );
        assert!(ExpiryStatus::Expired(1).needs_attention());
        assert!(!ExpiryStatus::Undated.needs_attention());
        assert_eq!(ExpiryStatus::ExpiringSoon(0).to_string(), "expires today");
    }

    #[test]
    fn test_sort_by_expiry() {
        let mut items = vec![
            Ingredient::new("undated-a", 1.0, ""),
            Ingredient::new("late", 1.0, "").with_expiry_date(date(4, 1)),
            Ingredient::new("undated-b", 1.0, ""),
            Ingredient::new("soon", 1.0, "").with_expiry_date(date(3, 2)),
        ];
        sort_by_expiry(&mut items);

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["soon", "late", "undated-a", "undated-b"]);
    }
}
