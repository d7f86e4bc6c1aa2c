//! Turning recipes and meal plans into orders.

use crate::error::{StoreError, ValidationError};
use crate::models::{MealPlan, Order, OrderItem, Recipe};
use crate::repo::OrderRepository;
use crate::session::Session;

/// A single-dish order for `recipe`, placed in the current kitchen.
pub fn order_for_recipe(session: &Session, recipe: &Recipe, remark: &str) -> Order {
    Order::new(session.customer_name())
        .with_items(vec![OrderItem::new(&recipe.id, &recipe.name, 1)])
        .with_remark(remark)
        .with_kitchen(session.current_kitchen_id())
}

/// One order covering every dish of a day's plan.
///
/// Dishes planned more than once become one item whose quantity is the
/// number of times it appears, in order of first appearance across
/// breakfast, lunch and dinner.
pub fn order_from_plan(session: &Session, plan: &MealPlan) -> Result<Order, ValidationError> {
    let mut items: Vec<OrderItem> = Vec::new();
    for dish in plan.all_dishes() {
        match items.iter_mut().find(|item| item.recipe_id == dish.id) {
            Some(item) => item.quantity += 1,
            None => items.push(OrderItem::new(&dish.id, &dish.name, 1)),
        }
    }
    if items.is_empty() {
        return Err(ValidationError::EmptyPlan(plan.date.to_string()));
    }

    let remark = format!("来自{}的饮食计划", plan.date.format("%m月%d日"));
    Ok(Order::new(session.customer_name())
        .with_items(items)
        .with_remark(remark)
        .with_kitchen(session.current_kitchen_id()))
}

/// Stores a new order and, when notifications are on, announces it.
pub fn place_order(
    session: &Session,
    orders: &OrderRepository,
    order: Order,
) -> Result<Order, StoreError> {
    let order = orders.add(order)?;
    if session.notifications_enabled()? {
        tracing::info!(
            order_no = %order.order_no,
            customer = %order.customer_name,
            items = order.total_quantity(),
            "New order received"
        );
    }
    Ok(order)
}
