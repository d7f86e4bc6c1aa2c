use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::loose;
use crate::id::{generate_id, order_number};

/// Customer name used when no user identity is known.
pub const ANONYMOUS_CUSTOMER: &str = "匿名用户";

/// Item name used when a stored item has none.
pub const UNKNOWN_DISH: &str = "未知菜品";

/// Order lifecycle. Orders only move forward: pending, preparing, ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    /// Any status string this version does not know.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// The status that follows this one, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready | OrderStatus::Unknown => None,
        }
    }

    /// Label shown to kitchen staff.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "待处理",
            OrderStatus::Preparing => "制作中",
            OrderStatus::Ready => "已完成",
            OrderStatus::Unknown => "未知",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::Ready => write!(f, "ready"),
            OrderStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            _ => Err(format!(
                "Invalid order status '{}'. Valid options: pending, preparing, ready",
                s
            )),
        }
    }
}

fn unknown_dish() -> String {
    UNKNOWN_DISH.to_string()
}

fn one() -> u32 {
    1
}

fn anonymous() -> String {
    ANONYMOUS_CUSTOMER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub recipe_id: String,
    #[serde(default = "unknown_dish")]
    pub name: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(recipe_id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: generate_id(),
            recipe_id: recipe_id.into(),
            name: name.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default, deserialize_with = "loose::string_or_null")]
    pub order_no: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_time: Option<DateTime<Utc>>,
    #[serde(default = "anonymous")]
    pub customer_name: String,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub kitchen_id: Option<String>,
}

impl Order {
    /// A new pending order created now.
    pub fn new(customer_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            order_no: order_number(now),
            items: Vec::new(),
            status: OrderStatus::Pending,
            create_time: now,
            complete_time: None,
            customer_name: customer_name.into(),
            remark: None,
            kitchen_id: None,
        }
    }

    pub fn with_items(mut self, items: Vec<OrderItem>) -> Self {
        self.items = items;
        self
    }

    /// Sets the remark; blank remarks are stored as `None`.
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        let remark = remark.into();
        let remark = remark.trim();
        self.remark = if remark.is_empty() {
            None
        } else {
            Some(remark.to_string())
        };
        self
    }

    pub fn with_kitchen(mut self, kitchen_id: Option<String>) -> Self {
        self.kitchen_id = kitchen_id;
        self
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order {}", self.order_no)?;
        writeln!(f, "{}", "=".repeat(self.order_no.len() + 6))?;
        writeln!(f, "Status: {} ({})", self.status.label(), self.status)?;
        writeln!(f, "Customer: {}", self.customer_name)?;
        writeln!(
            f,
            "Created: {}",
            self.create_time.format("%Y-%m-%d %H:%M:%S")
        )?;
        if let Some(done) = self.complete_time {
            writeln!(f, "Completed: {}", done.format("%Y-%m-%d %H:%M:%S"))?;
        }
        if let Some(remark) = &self.remark {
            writeln!(f, "Remark: {}", remark)?;
        }

        writeln!(f, "\nItems:")?;
        for item in &self.items {
            writeln!(f, "  - {} x{}", item.name, item.quantity)?;
        }
        Ok(())
    }
}

/// Top-level fields to overwrite on an existing order.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub complete_time: Option<DateTime<Utc>>,
    pub items: Option<Vec<OrderItem>>,
    pub customer_name: Option<String>,
    pub remark: Option<Option<String>>,
    pub kitchen_id: Option<Option<String>>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(complete_time) = self.complete_time {
            order.complete_time = Some(complete_time);
        }
        if let Some(items) = self.items {
            order.items = items;
        }
        if let Some(customer_name) = self.customer_name {
            order.customer_name = customer_name;
        }
        if let Some(remark) = self.remark {
            order.remark = remark;
        }
        if let Some(kitchen_id) = self.kitchen_id {
            order.kitchen_id = kitchen_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_progression() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next(), None);
    }

    #[test]
    fn test_status_labels_and_parsing() {
        assert_eq!(OrderStatus::Pending.label(), "待处理");
        assert_eq!(OrderStatus::Unknown.label(), "未知");
        assert_eq!("READY".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_reads() {
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
        assert_eq!(serde_json::to_string(&OrderStatus::Preparing).unwrap(), "\"preparing\"");
    }

    #[test]
    fn test_new_order() {
        let order = Order::new("Alice")
            .with_items(vec![
                OrderItem::new("r1", "Soup", 1),
                OrderItem::new("r2", "Rice", 2),
            ])
            .with_remark("  no chili  ");

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_no.starts_with("ORD"));
        assert_eq!(order.total_quantity(), 3);
        assert_eq!(order.remark.as_deref(), Some("no chili"));
        assert!(order.complete_time.is_none());
    }

    #[test]
    fn test_blank_remark_is_none() {
        let order = Order::new("Bob").with_remark("   ");
        assert!(order.remark.is_none());
    }

    #[test]
    fn test_stored_shape() {
        let order = Order::new("Alice").with_kitchen(Some("kitchen_001".into()));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["kitchenId"], "kitchen_001");
        assert!(json["remark"].is_null());
        assert!(json.get("completeTime").is_none());
    }

    #[test]
    fn test_loose_item_defaults() {
        let item: OrderItem = serde_json::from_str(r#"{"id": "i1"}"#).unwrap();
        assert_eq!(item.name, UNKNOWN_DISH);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.recipe_id, "");
    }

    #[test]
    fn test_order_display() {
        let order = Order::new("Alice").with_items(vec![OrderItem::new("r1", "Soup", 2)]);
        let output = format!("{}", order);
        assert!(output.contains("待处理"));
        assert!(output.contains("Soup x2"));
    }
}
