use serde::{Deserialize, Serialize};
use std::fmt;

use super::loose;

/// Openid recorded for admins whose identity token is not known.
pub const UNKNOWN_OPENID: &str = "unknown";

/// A member of a kitchen's admin roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub nick_name: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub openid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kitchen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub admins: Vec<Admin>,
}

impl Kitchen {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default: false,
            admins: Vec::new(),
        }
    }
}

/// The shop profile and its kitchens.
///
/// `Default` is the profile seeded on first launch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShopInfo {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub avatar: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub background: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub intro: String,
    #[serde(default)]
    pub kitchens: Vec<Kitchen>,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub current_kitchen_id: String,
}

impl Default for ShopInfo {
    fn default() -> Self {
        let mut kitchen = Kitchen::new("kitchen_001", "主厨房");
        kitchen.is_default = true;
        Self {
            id: "shop_001".to_string(),
            name: "我的小店".to_string(),
            avatar: String::new(),
            background: String::new(),
            intro: "欢迎来到我的小店".to_string(),
            current_kitchen_id: kitchen.id.clone(),
            kitchens: vec![kitchen],
        }
    }
}

impl ShopInfo {
    pub fn kitchen(&self, id: &str) -> Option<&Kitchen> {
        self.kitchens.iter().find(|k| k.id == id)
    }

    pub fn kitchen_mut(&mut self, id: &str) -> Option<&mut Kitchen> {
        self.kitchens.iter_mut().find(|k| k.id == id)
    }

    pub fn default_kitchen(&self) -> Option<&Kitchen> {
        self.kitchens.iter().find(|k| k.is_default)
    }

    /// The kitchen named by `current_kitchen_id`, falling back to the first
    /// kitchen when that id does not resolve.
    pub fn current_kitchen(&self) -> Option<&Kitchen> {
        self.kitchen(&self.current_kitchen_id)
            .or_else(|| self.kitchens.first())
    }

    /// Restores the kitchen invariants in place: one kitchen is marked
    /// default, and `current_kitchen_id` names an existing kitchen.
    ///
    /// Returns true if anything changed. Does nothing when there are no
    /// kitchens at all.
    pub fn repair(&mut self) -> bool {
        if self.kitchens.is_empty() {
            return false;
        }
        let mut changed = false;

        if self.default_kitchen().is_none() {
            self.kitchens[0].is_default = true;
            changed = true;
        }

        if self.kitchen(&self.current_kitchen_id).is_none() {
            let fallback = self
                .default_kitchen()
                .unwrap_or(&self.kitchens[0])
                .id
                .clone();
            self.current_kitchen_id = fallback;
            changed = true;
        }

        changed
    }
}

impl fmt::Display for ShopInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count().max(4)))?;
        if !self.intro.is_empty() {
            writeln!(f, "{}", self.intro)?;
        }

        writeln!(f, "\nKitchens:")?;
        for kitchen in &self.kitchens {
            let current = if kitchen.id == self.current_kitchen_id {
                "*"
            } else {
                " "
            };
            let default = if kitchen.is_default { " (default)" } else { "" };
            writeln!(
                f,
                " {} {} [{}]{} - {} admin(s)",
                current,
                kitchen.name,
                kitchen.id,
                default,
                kitchen.admins.len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_kitchens() -> ShopInfo {
        let mut shop = ShopInfo::default();
        shop.kitchens.push(Kitchen::new("k2", "Bar"));
        shop
    }

    #[test]
    fn test_seed_shape() {
        let json = serde_json::to_value(ShopInfo::default()).unwrap();
        assert_eq!(json["id"], "shop_001");
        assert_eq!(json["intro"], "欢迎来到我的小店");
        assert_eq!(json["currentKitchenId"], "kitchen_001");
        assert_eq!(json["kitchens"][0]["isDefault"], true);
        assert_eq!(json["kitchens"][0]["admins"], serde_json::json!([]));
    }

    #[test]
    fn test_current_kitchen_falls_back_to_first() {
        let mut shop = two_kitchens();
        shop.current_kitchen_id = "k2".into();
        assert_eq!(shop.current_kitchen().unwrap().id, "k2");

        shop.current_kitchen_id = "gone".into();
        assert_eq!(shop.current_kitchen().unwrap().id, "kitchen_001");
    }

    #[test]
    fn test_repair_marks_first_default() {
        let mut shop = two_kitchens();
        shop.kitchens[0].is_default = false;

        assert!(shop.repair());
        assert!(shop.kitchens[0].is_default);
        assert!(!shop.repair());
    }

    #[test]
    fn test_repair_resets_dangling_current_to_default() {
        let mut shop = two_kitchens();
        shop.kitchens[0].is_default = false;
        shop.kitchens[1].is_default = true;
        shop.current_kitchen_id = "deleted".into();

        assert!(shop.repair());
        assert_eq!(shop.current_kitchen_id, "k2");
    }

    #[test]
    fn test_repair_without_kitchens_is_noop() {
        let mut shop = ShopInfo::default();
        shop.kitchens.clear();
        assert!(!shop.repair());
    }

    #[test]
    fn test_admin_reads_null_fields() {
        let admin: Admin =
            serde_json::from_str(r#"{"nickName": "Ann", "openid": null}"#).unwrap();
        assert_eq!(admin.nick_name, "Ann");
        assert_eq!(admin.openid, "");
        assert!(admin.avatar.is_none());
    }
}
