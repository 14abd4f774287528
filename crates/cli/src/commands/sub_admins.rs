//! Sub-admin provisioning commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use dryklin_core::{Email, NewSubAdmin, SubAdmin};

use crate::output::Output;

#[derive(Subcommand)]
pub enum SubAdminAction {
    /// List sub-admins
    List,
    /// Provision a sub-admin
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Permission to grant (repeatable), e.g. `orders:confirm`
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },
    /// Replace a sub-admin's permissions
    Permissions {
        sub_admin_id: String,

        #[arg(short, long = "permission")]
        permissions: Vec<String>,
    },
    /// Deactivate a sub-admin
    Deactivate { sub_admin_id: String },
    /// Delete a sub-admin
    Delete { sub_admin_id: String },
}

const HEADERS: &[&str] = &["ID", "NAME", "EMAIL", "ACTIVE", "PERMISSIONS"];

fn row(sub_admin: &SubAdmin) -> Vec<String> {
    vec![
        sub_admin.id.to_string(),
        sub_admin.name.clone(),
        sub_admin.email.clone(),
        if sub_admin.is_active { "yes" } else { "no" }.to_string(),
        sub_admin.permissions.join(","),
    ]
}

pub async fn run(state: &AppState, out: &Output, action: SubAdminAction) -> Result<(), AdminError> {
    let api = state.sub_admins();
    match action {
        SubAdminAction::List => {
            let sub_admins = api.list().await?;
            out.show(&sub_admins, HEADERS, || sub_admins.iter().map(row).collect());
        }
        SubAdminAction::Create {
            name,
            email,
            permissions,
        } => {
            let email =
                Email::parse(&email).map_err(|e| AdminError::BadRequest(e.to_string()))?;
            let created = api
                .create(&NewSubAdmin {
                    name,
                    email,
                    permissions,
                })
                .await?;
            out.show(&created, HEADERS, || vec![row(&created)]);
        }
        SubAdminAction::Permissions {
            sub_admin_id,
            permissions,
        } => {
            let updated = api.update_permissions(&sub_admin_id, &permissions).await?;
            out.show(&updated, HEADERS, || vec![row(&updated)]);
        }
        SubAdminAction::Deactivate { sub_admin_id } => {
            let updated = api.deactivate(&sub_admin_id).await?;
            out.done(&format!("Deactivated {}", updated.email));
        }
        SubAdminAction::Delete { sub_admin_id } => {
            api.delete(&sub_admin_id).await?;
            out.done(&format!("Deleted sub-admin {}", sub_admin_id.trim()));
        }
    }
    Ok(())
}
