//! Service partner commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{AccountStatus, ServicePartner};

use super::PageArgs;
use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum PartnerAction {
    /// List service partners
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one partner
    Show { partner_id: String },
    /// Change a partner's status (active, inactive, suspended)
    Status {
        partner_id: String,
        status: AccountStatus,
    },
    /// Hand an order to a partner
    Assign { order_id: String, partner_id: String },
}

const HEADERS: &[&str] = &["ID", "BUSINESS", "EMAIL", "PHONE", "STATUS"];

fn row(partner: &ServicePartner) -> Vec<String> {
    vec![
        partner.id.to_string(),
        partner.business_name.clone(),
        or_dash(partner.email.as_deref()),
        or_dash(partner.phone.as_deref()),
        partner.status.to_string(),
    ]
}

pub async fn run(state: &AppState, out: &Output, action: PartnerAction) -> Result<(), AdminError> {
    let api = state.partners();
    match action {
        PartnerAction::List { page } => {
            let page = api.list(page.into()).await?;
            out.show(&page.items, HEADERS, || page.items.iter().map(row).collect());
        }
        PartnerAction::Show { partner_id } => {
            let partner = api.get(&partner_id).await?;
            out.show(&partner, HEADERS, || vec![row(&partner)]);
        }
        PartnerAction::Status { partner_id, status } => {
            let partner = api.update_status(&partner_id, status).await?;
            out.done(&format!("{} is now {}", partner.business_name, partner.status));
        }
        PartnerAction::Assign {
            order_id,
            partner_id,
        } => {
            let order = api.assign_order(&order_id, &partner_id).await?;
            out.done(&format!(
                "Order {} assigned to partner {}",
                order.label(),
                partner_id.trim()
            ));
        }
    }
    Ok(())
}
