//! Dashboard analytics commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{Price, RevenuePeriod};

use crate::output::Output;

#[derive(Subcommand)]
pub enum AnalyticsAction {
    /// Headline counters
    Summary,
    /// Revenue over time
    Revenue {
        /// Bucket size: daily, weekly, monthly or yearly
        #[arg(long, default_value = "monthly")]
        period: RevenuePeriod,
    },
}

pub async fn run(state: &AppState, out: &Output, action: AnalyticsAction) -> Result<(), AdminError> {
    let api = state.analytics();
    match action {
        AnalyticsAction::Summary => {
            let summary = api.summary().await?;
            out.detail(
                &summary,
                &[
                    ("total orders", summary.total_orders.to_string()),
                    ("pending", summary.pending_orders.to_string()),
                    ("completed", summary.completed_orders.to_string()),
                    ("cancelled", summary.cancelled_orders.to_string()),
                    ("completion rate", format!("{}%", summary.completion_rate())),
                    ("revenue", summary.revenue().to_string()),
                    ("customers", summary.total_customers.to_string()),
                    ("active partners", summary.active_partners.to_string()),
                    ("active agents", summary.active_agents.to_string()),
                ],
            );
        }
        AnalyticsAction::Revenue { period } => {
            let series = api.revenue(period).await?;
            out.show(&series, &["PERIOD", "REVENUE", "ORDERS"], || {
                series
                    .iter()
                    .map(|p| {
                        vec![
                            p.label.clone(),
                            Price::ngn(p.revenue).to_string(),
                            p.orders.to_string(),
                        ]
                    })
                    .collect()
            });
        }
    }
    Ok(())
}
