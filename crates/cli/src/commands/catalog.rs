//! Service-type catalog commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{NewServiceType, ServiceType, ServiceTypeUpdate};
use rust_decimal::Decimal;

use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum ServiceTypeAction {
    /// List service types
    List,
    /// Show one service type
    Show { service_type_id: String },
    /// Create a service type
    Create {
        #[arg(long)]
        name: String,

        /// Base price in naira, e.g. 1500.00
        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        description: Option<String>,

        /// Pricing unit, e.g. "per item" or "per kg"
        #[arg(long)]
        unit: Option<String>,
    },
    /// Change fields of a service type
    Update {
        service_type_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<Decimal>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        unit: Option<String>,

        /// Enable or disable the service
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a service type
    Delete { service_type_id: String },
}

const HEADERS: &[&str] = &["ID", "NAME", "PRICE", "UNIT", "ACTIVE"];

fn row(service: &ServiceType) -> Vec<String> {
    vec![
        service.id.to_string(),
        service.name.clone(),
        service.price().to_string(),
        or_dash(service.unit.as_deref()),
        if service.is_active { "yes" } else { "no" }.to_string(),
    ]
}

pub async fn run(state: &AppState, out: &Output, action: ServiceTypeAction) -> Result<(), AdminError> {
    let api = state.service_types();
    match action {
        ServiceTypeAction::List => {
            let services = api.list().await?;
            out.show(&services, HEADERS, || services.iter().map(row).collect());
        }
        ServiceTypeAction::Show { service_type_id } => {
            let service = api.get(&service_type_id).await?;
            out.show(&service, HEADERS, || vec![row(&service)]);
        }
        ServiceTypeAction::Create {
            name,
            price,
            description,
            unit,
        } => {
            let created = api
                .create(&NewServiceType {
                    name,
                    description,
                    base_price: price,
                    unit,
                })
                .await?;
            out.show(&created, HEADERS, || vec![row(&created)]);
        }
        ServiceTypeAction::Update {
            service_type_id,
            name,
            price,
            description,
            unit,
            active,
        } => {
            let update = ServiceTypeUpdate {
                name,
                description,
                base_price: price,
                unit,
                is_active: active,
            };
            let updated = api.update(&service_type_id, &update).await?;
            out.show(&updated, HEADERS, || vec![row(&updated)]);
        }
        ServiceTypeAction::Delete { service_type_id } => {
            api.delete(&service_type_id).await?;
            out.done(&format!("Deleted service type {}", service_type_id.trim()));
        }
    }
    Ok(())
}
