mod config_cmd;
mod data;
mod order;
mod pantry;
mod plan;
mod recipe;
mod shop;
mod user;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use order::OrderCommand;
pub use pantry::PantryCommand;
pub use plan::PlanCommand;
pub use recipe::RecipeCommand;
pub use shop::ShopCommand;
pub use user::UserCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shortens `s` to `width` characters, ending in "..." when cut.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an optional `--date`, defaulting to today.
pub(crate) fn date_or_today(date: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(d) => Ok(kitchenbook_core::validate::date(d)?),
        None => Ok(today()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("番茄炒蛋番茄炒蛋", 6), "番茄炒...");
    }

    #[test]
    fn test_date_or_today() {
        assert_eq!(date_or_today(None).unwrap(), today());
        assert_eq!(
            date_or_today(Some("2025-03-08")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()
        );
        assert!(date_or_today(Some("March 8")).is_err());
    }
}
