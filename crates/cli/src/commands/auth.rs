//! Sign-in, sign-out and account recovery.

use clap::Subcommand;
use dryklin_admin::{AdminError, AppState};
use secrecy::SecretString;

use crate::output::{Output, or_dash};

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in and store the session
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "DRYKLIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and wipe the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// One-time code verification
    Otp {
        #[command(subcommand)]
        action: OtpAction,
    },
    /// Password recovery
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
}

#[derive(Subcommand)]
pub enum OtpAction {
    /// Send a code to an email address
    Send {
        #[arg(short, long)]
        email: String,
    },
    /// Verify the code sent by `otp send`
    Verify { code: String },
}

#[derive(Subcommand)]
pub enum PasswordAction {
    /// Email a reset link
    Forgot {
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password with a reset token
    Reset {
        #[arg(short, long)]
        token: String,

        #[arg(short, long, env = "DRYKLIN_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

impl AuthCommand {
    /// Commands issued from the sign-in screens, before a session exists.
    pub const fn is_signed_out_flow(&self) -> bool {
        matches!(
            self,
            Self::Login { .. } | Self::Otp { .. } | Self::Password { .. }
        )
    }
}

pub async fn run(state: &AppState, out: &Output, command: AuthCommand) -> Result<(), AdminError> {
    let auth = state.auth();
    match command {
        AuthCommand::Login { email, password } => {
            let profile = auth.login(&email, &SecretString::from(password)).await?;
            out.detail(
                &profile,
                &[
                    ("signed in as", profile.email.clone()),
                    ("name", or_dash(profile.name.as_deref())),
                    ("role", or_dash(profile.role)),
                ],
            );
        }
        AuthCommand::Logout => {
            auth.logout().await;
            out.done("Signed out");
        }
        AuthCommand::Whoami => {
            let profile = auth.current_profile().await?;
            out.detail(
                &profile,
                &[
                    ("id", profile.id.to_string()),
                    ("email", profile.email.clone()),
                    ("name", or_dash(profile.name.as_deref())),
                    ("role", or_dash(profile.role)),
                    ("permissions", profile.permissions.join(", ")),
                ],
            );
        }
        AuthCommand::Otp { action } => match action {
            OtpAction::Send { email } => {
                auth.request_otp(&email).await?;
                out.done(&format!("Code sent to {}", email.trim()));
            }
            OtpAction::Verify { code } => {
                auth.verify_otp(&code).await?;
                out.done("Code verified");
            }
        },
        AuthCommand::Password { action } => match action {
            PasswordAction::Forgot { email } => {
                auth.forgot_password(&email).await?;
                out.done("If the account exists, a reset link is on its way");
            }
            PasswordAction::Reset { token, password } => {
                auth.reset_password(&token, &SecretString::from(password))
                    .await?;
                out.done("Password updated. Sign in with the new password.");
            }
        },
    }
    Ok(())
}
