//! Notification commands.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};

use super::PageArgs;
use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum NotificationAction {
    /// List notifications
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { notification_id: String },
    /// Mark every notification as read
    ReadAll,
}

pub async fn run(
    state: &AppState,
    out: &Output,
    action: NotificationAction,
) -> Result<(), AdminError> {
    let api = state.notifications();
    match action {
        NotificationAction::List { page, unread } => {
            let page = api.list(page.into(), unread).await?;
            out.show(&page.items, &["ID", "", "TITLE", "MESSAGE", "RECEIVED"], || {
                page.items
                    .iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            if n.is_read { " " } else { "*" }.to_string(),
                            n.title.clone(),
                            n.message.clone(),
                            or_dash(n.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())),
                        ]
                    })
                    .collect()
            });
        }
        NotificationAction::Read { notification_id } => {
            api.mark_read(&notification_id).await?;
            out.done("Marked as read");
        }
        NotificationAction::ReadAll => {
            api.mark_all_read().await?;
            out.done("All notifications marked as read");
        }
    }
    Ok(())
}
