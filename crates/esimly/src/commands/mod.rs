//! Command handlers, one module per resource area.

pub mod auth;
pub mod config_cmd;
pub mod credit;
pub mod esim;
pub mod overview;
pub mod promos;
pub mod shop;
pub mod stock;
pub mod users;
pub mod util;

use crate::cli::{AdminCommand, Command, GlobalOpts};
use crate::error::CliError;

use util::Context;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Whoami => auth::whoami(ctx, global),
        Command::Register(cmd) => auth::register(ctx, cmd, global).await,
        Command::VerifyEmail(args) => auth::verify_email(ctx, args, global).await,
        Command::ResendVerification { email } => {
            auth::resend_verification(ctx, &email, global).await
        }
        Command::ForgotPassword { email } => auth::forgot_password(ctx, &email, global).await,
        Command::ResetPassword(args) => auth::reset_password(ctx, args, global).await,

        Command::Shop(args) => shop::handle(ctx, args, global).await,

        Command::Admin(args) => match args.command {
            AdminCommand::Users(args) => users::handle(ctx, args, global).await,
            AdminCommand::Registrations => overview::registrations(ctx, global).await,
            AdminCommand::Enquiries => overview::enquiries(ctx, global).await,
            AdminCommand::Stats => overview::stats(ctx, global).await,
            AdminCommand::Stock(args) => stock::handle(ctx, args, global).await,
            AdminCommand::Promos(args) => promos::handle_promos(ctx, args, global).await,
            AdminCommand::Campaigns(args) => promos::handle_campaigns(ctx, args, global).await,
            AdminCommand::Esim(args) => esim::handle(ctx, args, global).await,
            AdminCommand::Credit(args) => credit::handle(ctx, args, global).await,
        },

        // Handled in main() before a context exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
