//! Platform user and customer commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{Customer, User};

use super::PageArgs;
use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Manage platform users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Look up customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// List users
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        search: Option<String>,
    },
    /// Show one user
    Show { user_id: String },
    /// Reactivate a user
    Activate { user_id: String },
    /// Deactivate a user
    Deactivate { user_id: String },
    /// Delete a user
    Delete { user_id: String },
}

#[derive(Subcommand)]
pub enum CustomerAction {
    /// List customers
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        search: Option<String>,
    },
    /// Show one customer
    Show { customer_id: String },
    /// A customer's orders
    Orders {
        customer_id: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

fn user_row(user: &User) -> Vec<String> {
    vec![
        user.id.to_string(),
        user.full_name(),
        user.email.clone(),
        or_dash(user.role),
        if user.is_active { "active" } else { "inactive" }.to_string(),
    ]
}

fn customer_row(customer: &Customer) -> Vec<String> {
    vec![
        customer.id.to_string(),
        format!("{} {}", customer.first_name, customer.last_name)
            .trim()
            .to_string(),
        customer.email.clone(),
        or_dash(customer.phone.as_deref()),
        customer.order_count.to_string(),
        dryklin_core::Price::ngn(customer.wallet_balance).to_string(),
    ]
}

const USER_HEADERS: &[&str] = &["ID", "NAME", "EMAIL", "ROLE", "STATUS"];
const CUSTOMER_HEADERS: &[&str] = &["ID", "NAME", "EMAIL", "PHONE", "ORDERS", "WALLET"];

pub async fn run(state: &AppState, out: &Output, command: AccountCommand) -> Result<(), AdminError> {
    match command {
        AccountCommand::Users { action } => users(state, out, action).await,
        AccountCommand::Customers { action } => customers(state, out, action).await,
    }
}

async fn users(state: &AppState, out: &Output, action: UserAction) -> Result<(), AdminError> {
    let api = state.users();
    match action {
        UserAction::List { page, search } => {
            let page = api.list(page.into(), search.as_deref()).await?;
            out.show(&page.items, USER_HEADERS, || page.items.iter().map(user_row).collect());
        }
        UserAction::Show { user_id } => {
            let user = api.get(&user_id).await?;
            out.show(&user, USER_HEADERS, || vec![user_row(&user)]);
        }
        UserAction::Activate { user_id } => {
            let user = api.set_active(&user_id, true).await?;
            out.done(&format!("Activated {}", user.email));
        }
        UserAction::Deactivate { user_id } => {
            let user = api.set_active(&user_id, false).await?;
            out.done(&format!("Deactivated {}", user.email));
        }
        UserAction::Delete { user_id } => {
            api.delete(&user_id).await?;
            out.done(&format!("Deleted user {}", user_id.trim()));
        }
    }
    Ok(())
}

async fn customers(state: &AppState, out: &Output, action: CustomerAction) -> Result<(), AdminError> {
    let api = state.customers();
    match action {
        CustomerAction::List { page, search } => {
            let page = api.list(page.into(), search.as_deref()).await?;
            out.show(&page.items, CUSTOMER_HEADERS, || {
                page.items.iter().map(customer_row).collect()
            });
        }
        CustomerAction::Show { customer_id } => {
            let customer = api.get(&customer_id).await?;
            out.show(&customer, CUSTOMER_HEADERS, || vec![customer_row(&customer)]);
        }
        CustomerAction::Orders { customer_id, page } => {
            let orders = api.orders(&customer_id, page.into()).await?;
            out.show(&orders.items, &["ORDER", "STATUS", "TOTAL"], || {
                orders
                    .items
                    .iter()
                    .map(|o| {
                        vec![
                            o.label().to_string(),
                            o.order_status.to_string(),
                            o.total().to_string(),
                        ]
                    })
                    .collect()
            });
        }
    }
    Ok(())
}
