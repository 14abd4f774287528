//! Delivery agent commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{AccountStatus, AgentAvailability, DeliveryAgent};

use super::PageArgs;
use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum AgentAction {
    /// List delivery agents
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only agents with this availability (available, busy, offline)
        #[arg(long)]
        availability: Option<AgentAvailability>,
    },
    /// Show one agent
    Show { agent_id: String },
    /// Change an agent's status (active, inactive, suspended)
    Status {
        agent_id: String,
        status: AccountStatus,
    },
    /// Hand an order to an agent for pickup and delivery
    Assign { order_id: String, agent_id: String },
}

const HEADERS: &[&str] = &["ID", "NAME", "PHONE", "VEHICLE", "AVAILABILITY", "STATUS"];

fn row(agent: &DeliveryAgent) -> Vec<String> {
    vec![
        agent.id.to_string(),
        format!("{} {}", agent.first_name, agent.last_name)
            .trim()
            .to_string(),
        or_dash(agent.phone.as_deref()),
        or_dash(agent.vehicle_type.as_deref()),
        agent.availability.as_str().to_string(),
        agent.status.to_string(),
    ]
}

pub async fn run(state: &AppState, out: &Output, action: AgentAction) -> Result<(), AdminError> {
    let api = state.agents();
    match action {
        AgentAction::List { page, availability } => {
            let page = api.list(page.into(), availability).await?;
            out.show(&page.items, HEADERS, || page.items.iter().map(row).collect());
        }
        AgentAction::Show { agent_id } => {
            let agent = api.get(&agent_id).await?;
            out.show(&agent, HEADERS, || vec![row(&agent)]);
        }
        AgentAction::Status { agent_id, status } => {
            let agent = api.update_status(&agent_id, status).await?;
            out.done(&format!("Agent {} is now {}", agent.id, agent.status));
        }
        AgentAction::Assign { order_id, agent_id } => {
            let order = api.assign_order(&order_id, &agent_id).await?;
            out.done(&format!(
                "Order {} assigned to agent {}",
                order.label(),
                agent_id.trim()
            ));
        }
    }
    Ok(())
}
