//! Order commands, including confirmation with retry.

use clap::Subcommand;
use dryklin_admin::api::OrderQuery;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{Order, OrderStatus};

use super::PageArgs;
use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only orders in this status (e.g. pending, in-progress)
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Free-text search
        #[arg(long)]
        search: Option<String>,
    },
    /// Orders awaiting confirmation
    Pending,
    /// Orders that have left the pending state
    History {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one order
    Show { order_id: String },
    /// Confirm a pending order
    Confirm {
        order_id: String,

        /// Retries after the first attempt (default from DRYKLIN_CONFIRM_RETRIES)
        #[arg(long)]
        retries: Option<u32>,
    },
    /// Move an order to another status
    Status {
        order_id: String,
        status: OrderStatus,
    },
    /// Cancel an order
    Cancel {
        order_id: String,

        #[arg(long)]
        reason: Option<String>,
    },
}

const HEADERS: &[&str] = &["ORDER", "STATUS", "CUSTOMER", "SERVICE", "TOTAL", "CREATED"];

fn row(order: &Order) -> Vec<String> {
    vec![
        order.label().to_string(),
        order.order_status.to_string(),
        or_dash(
            order
                .customer
                .as_ref()
                .map(dryklin_core::OrderCustomer::full_name)
                .filter(|n| !n.is_empty()),
        ),
        or_dash(order.service_type.as_deref()),
        order.total().to_string(),
        or_dash(order.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())),
    ]
}

fn show_orders(out: &Output, orders: &[Order]) {
    out.show(orders, HEADERS, || orders.iter().map(row).collect());
}

fn show_order(out: &Output, order: &Order) {
    let items = order
        .items
        .iter()
        .map(|i| format!("{} x{}", i.name, i.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    out.detail(
        order,
        &[
            ("id", order.id.to_string()),
            ("number", or_dash(order.order_number.as_deref())),
            ("status", order.order_status.to_string()),
            ("total", order.total().to_string()),
            ("items", if items.is_empty() { "-".to_string() } else { items }),
            ("agent", or_dash(order.agent_id.as_ref())),
            ("partner", or_dash(order.partner_id.as_ref())),
        ],
    );
}

pub async fn run(state: &AppState, out: &Output, action: OrderAction) -> Result<(), AdminError> {
    let orders = state.orders();
    match action {
        OrderAction::List {
            page,
            status,
            search,
        } => {
            let query = OrderQuery {
                paging: page.into(),
                status,
                search,
            };
            let result = orders.list(&query).await?;
            show_orders(out, &result.items);
        }
        OrderAction::Pending => show_orders(out, &orders.pending().await?),
        OrderAction::History { page } => {
            show_orders(out, &orders.history(page.into()).await?.items);
        }
        OrderAction::Show { order_id } => show_order(out, &orders.get(&order_id).await?),
        OrderAction::Confirm { order_id, retries } => {
            let order = orders.confirm_order(&order_id, retries).await?;
            show_order(out, &order);
        }
        OrderAction::Status { order_id, status } => {
            show_order(out, &orders.update_status(&order_id, status).await?);
        }
        OrderAction::Cancel { order_id, reason } => {
            show_order(out, &orders.cancel(&order_id, reason.as_deref()).await?);
        }
    }
    Ok(())
}
