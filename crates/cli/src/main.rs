//! DryKlin CLI - operator tools over the DryKlin admin API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password may also come from DRYKLIN_PASSWORD)
//! dk-cli login -e ops@dryklin.com
//!
//! # Work the pending queue
//! dk-cli orders pending
//! dk-cli orders confirm 65f1c2 --retries 2
//!
//! # Catalog and accounts
//! dk-cli service-types list
//! dk-cli agents assign 65f1c2 a-17
//! ```
//!
//! The session is kept encrypted in `DRYKLIN_SESSION_FILE`. See
//! `dryklin_admin::config` for every environment variable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use dryklin_admin::navigation::routes;
use dryklin_admin::{AdminConfig, AdminError, AppState, MemoryNavigator};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{
    AccountCommand, AgentAction, AnalyticsAction, AuthCommand, NotificationAction, OrderAction,
    PartnerAction, ServiceTypeAction, SubAdminAction,
};

#[derive(Parser)]
#[command(name = "dk-cli")]
#[command(author, version, about = "DryKlin admin CLI")]
struct Cli {
    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Auth(AuthCommand),
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    #[command(flatten)]
    Accounts(AccountCommand),
    /// Manage service partners
    Partners {
        #[command(subcommand)]
        action: PartnerAction,
    },
    /// Manage delivery agents
    Agents {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Manage the service-type catalog
    ServiceTypes {
        #[command(subcommand)]
        action: ServiceTypeAction,
    },
    /// Manage sub-admin accounts
    SubAdmins {
        #[command(subcommand)]
        action: SubAdminAction,
    },
    /// Show dashboard analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
    /// Browse notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dryklin_admin=info,dryklin_cli=info".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_json);

    if let Err(e) = run(cli, config).await {
        if e.is_reportable() {
            sentry::capture_error(&e);
        }
        tracing::error!("Command failed: {e}");
        if e.is_session_expired() {
            tracing::error!("Session expired. Run `dk-cli login` to sign in again.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), AdminError> {
    // Sign-in flows run "on" the sign-in page so the session guard leaves
    // their 401s alone.
    let start = match &cli.command {
        Commands::Auth(command) if command.is_signed_out_flow() => routes::SIGN_IN,
        _ => routes::DASHBOARD,
    };
    let navigator = Arc::new(MemoryNavigator::new(start));
    let state = AppState::new(config, navigator)?;
    let out = output::Output::new(cli.json);

    match cli.command {
        Commands::Auth(command) => commands::auth::run(&state, &out, command).await,
        Commands::Orders { action } => commands::orders::run(&state, &out, action).await,
        Commands::Accounts(command) => commands::accounts::run(&state, &out, command).await,
        Commands::Partners { action } => commands::partners::run(&state, &out, action).await,
        Commands::Agents { action } => commands::agents::run(&state, &out, action).await,
        Commands::ServiceTypes { action } => commands::catalog::run(&state, &out, action).await,
        Commands::SubAdmins { action } => commands::sub_admins::run(&state, &out, action).await,
        Commands::Analytics { action } => commands::analytics::run(&state, &out, action).await,
        Commands::Notifications { action } => {
            commands::notifications::run(&state, &out, action).await
        }
    }
}
