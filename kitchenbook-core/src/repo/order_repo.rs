use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Order, OrderPatch, OrderStatus};
use crate::store::{Store, StoreKey};

pub struct OrderRepository {
    store: Store,
}

impl OrderRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All orders, newest first.
    pub fn list(&self) -> Result<Vec<Order>, StoreError> {
        super::list(&self.store)
    }

    pub fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.list()?;
        orders.retain(|o| o.status == status);
        Ok(orders)
    }

    /// The `limit` most recently created orders.
    pub fn recent(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.list()?;
        orders.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        orders.truncate(limit);
        Ok(orders)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Order>, StoreError> {
        super::find(&self.store, id)
    }

    /// Inserts an order at the head of the collection.
    pub fn add(&self, order: Order) -> Result<Order, StoreError> {
        let mut orders = self.list()?;
        orders.insert(0, order.clone());
        self.store.set(StoreKey::Orders, &orders)?;
        tracing::info!("Created order {} ({} items)", order.order_no, order.items.len());
        Ok(order)
    }

    /// Overwrites the fields present in `patch`.
    ///
    /// Moving an order to ready stamps its completion time unless the patch
    /// carries one.
    pub fn update(&self, id: &str, mut patch: OrderPatch) -> Result<Option<Order>, StoreError> {
        if patch.status == Some(OrderStatus::Ready) && patch.complete_time.is_none() {
            patch.complete_time = Some(Utc::now());
        }
        super::modify(&self.store, id, |order| patch.apply(order))
    }

    /// Moves a pending order to preparing.
    pub fn accept(&self, id: &str) -> Result<Option<Order>, StoreError> {
        self.update(id, OrderPatch::status(OrderStatus::Preparing))
    }

    /// Marks an order ready as of `at`.
    pub fn complete(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Order>, StoreError> {
        self.update(
            id,
            OrderPatch {
                status: Some(OrderStatus::Ready),
                complete_time: Some(at),
                ..Default::default()
            },
        )
    }

    pub fn delete(&self, id: &str) -> Result<Vec<Order>, StoreError> {
        super::remove(&self.store, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderItem;
    use chrono::Duration;

    fn order(customer: &str) -> Order {
        Order::new(customer).with_items(vec![OrderItem::new("r1", "Soup", 1)])
    }

    #[test]
    fn test_add_prepends() {
        let repo = OrderRepository::new(Store::memory());
        for name in ["first", "second", "third"] {
            let added = repo.add(order(name)).unwrap();
            assert_eq!(repo.list().unwrap()[0].id, added.id);
        }

        let customers: Vec<String> = repo
            .list()
            .unwrap()
            .into_iter()
            .map(|o| o.customer_name)
            .collect();
        assert_eq!(customers, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_accept_then_complete() {
        let repo = OrderRepository::new(Store::memory());
        let created = repo.add(order("Ann")).unwrap();

        let accepted = repo.accept(&created.id).unwrap().unwrap();
        assert_eq!(accepted.status, OrderStatus::Preparing);
        assert!(accepted.complete_time.is_none());

        let at = Utc::now();
        let done = repo.complete(&created.id, at).unwrap().unwrap();
        assert_eq!(done.status, OrderStatus::Ready);
        assert_eq!(done.complete_time, Some(at));
    }

    #[test]
    fn test_ready_update_stamps_complete_time() {
        let repo = OrderRepository::new(Store::memory());
        let created = repo.add(order("Ann")).unwrap();

        let done = repo
            .update(&created.id, OrderPatch::status(OrderStatus::Ready))
            .unwrap()
            .unwrap();
        assert!(done.complete_time.is_some());
    }

    #[test]
    fn test_update_unknown_order() {
        let repo = OrderRepository::new(Store::memory());
        assert!(repo.accept("missing").unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_filters() {
        let repo = OrderRepository::new(Store::memory());
        let mut old = order("old");
        old.create_time = Utc::now() - Duration::days(1);
        repo.add(old).unwrap();
        let fresh = repo.add(order("fresh")).unwrap();
        repo.accept(&fresh.id).unwrap();

        let pending = repo.list_by_status(OrderStatus::Pending).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].customer_name, "old");

        let recent = repo.recent(1).unwrap();
        assert_eq!(recent[0].customer_name, "fresh");
    }
}
