//! Order board: the pending, all-orders and history collections the
//! dashboard renders.
//!
//! The board is a plain view-model. It never talks to the network except in
//! [`OrderBoard::load`]; confirmations and status changes are folded in with
//! the `apply_*` methods so the lists stay consistent without a refetch.

use dryklin_core::{Order, OrderId};
use tracing::debug;

use crate::api::{OrderQuery, OrdersApi, Paging};
use crate::http::ApiError;

/// Pending, all and history order lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    pub pending: Vec<Order>,
    pub all: Vec<Order>,
    pub history: Vec<Order>,
}

impl OrderBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all three lists.
    ///
    /// # Errors
    ///
    /// Returns the first `ApiError`; the board is left unchanged on failure.
    pub async fn load(&mut self, api: &OrdersApi) -> Result<(), ApiError> {
        let query = OrderQuery::default();
        let (pending, all, history) = tokio::try_join!(
            api.pending(),
            api.list(&query),
            api.history(Paging::default()),
        )?;
        self.pending = pending;
        self.all = all.items;
        self.history = history.items;
        debug!(
            pending = self.pending.len(),
            all = self.all.len(),
            history = self.history.len(),
            "order board loaded"
        );
        Ok(())
    }

    /// Fold in a confirmed order: it leaves `pending`, is replaced in `all`
    /// (appended if unseen) and is replaced in or prepended to `history`.
    pub fn apply_confirmation(&mut self, order: &Order) {
        self.pending.retain(|o| o.id != order.id);
        upsert_back(&mut self.all, order);
        upsert_front(&mut self.history, order);
    }

    /// Fold in any status change. An order that is (again) `PENDING` joins
    /// the pending list and leaves history.
    pub fn apply_update(&mut self, order: &Order) {
        if order.order_status.is_pending() {
            upsert_back(&mut self.pending, order);
            self.history.retain(|o| o.id != order.id);
            upsert_back(&mut self.all, order);
        } else {
            self.apply_confirmation(order);
        }
    }

    /// Look an order up across all lists.
    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.all
            .iter()
            .chain(&self.pending)
            .chain(&self.history)
            .find(|o| &o.id == id)
    }
}

fn replace(list: &mut [Order], order: &Order) -> bool {
    list.iter_mut()
        .find(|o| o.id == order.id)
        .map(|slot| *slot = order.clone())
        .is_some()
}

fn upsert_back(list: &mut Vec<Order>, order: &Order) {
    if !replace(list, order) {
        list.push(order.clone());
    }
}

fn upsert_front(list: &mut Vec<Order>, order: &Order) {
    if !replace(list, order) {
        list.insert(0, order.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dryklin_core::OrderStatus;

    use super::*;

    fn order(id: &str, status: OrderStatus) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "totalAmount": 2500,
            "orderStatus": status.as_str(),
        }))
        .unwrap()
    }

    fn board() -> OrderBoard {
        OrderBoard {
            pending: vec![order("o-1", OrderStatus::Pending), order("o-2", OrderStatus::Pending)],
            all: vec![order("o-1", OrderStatus::Pending), order("o-2", OrderStatus::Pending)],
            history: vec![order("o-9", OrderStatus::Completed)],
        }
    }

    #[test]
    fn test_confirmation_moves_order_out_of_pending() {
        let mut board = board();
        let confirmed = order("o-1", OrderStatus::InProgress);
        board.apply_confirmation(&confirmed);

        assert_eq!(board.pending.len(), 1);
        assert_eq!(board.pending[0].id.as_str(), "o-2");
        assert_eq!(board.all.len(), 2);
        assert_eq!(board.all[0].order_status, OrderStatus::InProgress);
        assert_eq!(board.history[0].id.as_str(), "o-1");
        assert_eq!(board.history.len(), 2);
    }

    #[test]
    fn test_confirmation_of_unseen_order() {
        let mut board = OrderBoard::new();
        board.apply_confirmation(&order("o-5", OrderStatus::Processing));
        assert!(board.pending.is_empty());
        assert_eq!(board.all.len(), 1);
        assert_eq!(board.history.len(), 1);
    }

    #[test]
    fn test_confirmation_is_idempotent() {
        let mut board = board();
        let confirmed = order("o-1", OrderStatus::InProgress);
        board.apply_confirmation(&confirmed);
        let once = board.clone();
        board.apply_confirmation(&confirmed);
        assert_eq!(board, once);
    }

    #[test]
    fn test_update_back_to_pending() {
        let mut board = board();
        board.apply_update(&order("o-9", OrderStatus::Pending));
        assert_eq!(board.pending.len(), 3);
        assert!(board.history.is_empty());
        let found = board.find(&OrderId::parse("o-9").unwrap()).unwrap();
        assert_eq!(found.order_status, OrderStatus::Pending);
    }

    #[test]
    fn test_update_to_cancelled() {
        let mut board = board();
        board.apply_update(&order("o-2", OrderStatus::Cancelled));
        assert_eq!(board.pending.len(), 1);
        assert_eq!(board.history[0].order_status, OrderStatus::Cancelled);
    }
}
