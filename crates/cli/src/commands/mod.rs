//! Subcommand definitions and handlers, one module per API area.

pub mod accounts;
pub mod agents;
pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod partners;
pub mod sub_admins;

pub use accounts::AccountCommand;
pub use agents::AgentAction;
pub use analytics::AnalyticsAction;
pub use auth::AuthCommand;
pub use catalog::ServiceTypeAction;
pub use notifications::NotificationAction;
pub use orders::OrderAction;
pub use partners::PartnerAction;
pub use sub_admins::SubAdminAction;

use clap::Args;
use dryklin_admin::api::Paging;

/// `--page` / `--limit` flags shared by list commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value_t = Paging::DEFAULT_LIMIT)]
    pub limit: u32,
}

impl From<PageArgs> for Paging {
    fn from(args: PageArgs) -> Self {
        Self::new(args.page.max(1), args.limit.max(1))
    }
}
