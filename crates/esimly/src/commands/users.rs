//! Admin user-management commands.

use std::sync::Arc;

use tabled::Tabled;

use esimly_core::model::User;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util::{Context, confirm, core_err, require_admin};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<User>> for UserRow {
    fn from(u: &Arc<User>) -> Self {
        Self {
            id: u.id.clone(),
            name: u.display_name(),
            email: u.email.clone(),
            role: u.role.to_string(),
            status: u.status.to_string(),
        }
    }
}

fn detail(u: &Arc<User>) -> String {
    let mut lines = vec![
        format!("ID:       {}", u.id),
        format!("Name:     {}", u.display_name()),
        format!("Email:    {}", u.email),
        format!("Role:     {}", u.role),
        format!("Account:  {}", u.account_type),
        format!("Status:   {}", u.status),
    ];
    if let Some(ref business) = u.business_name {
        lines.push(format!("Business: {business}"));
    }
    if let Some(ref phone) = u.phone_number {
        lines.push(format!("Phone:    {phone}"));
    }
    if let Some(created) = u.created_at {
        lines.push(format!("Created:  {}", created.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        UsersCommand::List => {
            portal.refresh_users().await.map_err(core_err(ctx))?;
            let snap = portal.store().users_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Show { user } => {
            portal.refresh_users().await.map_err(core_err(ctx))?;
            let snap = portal.store().users_snapshot();
            let found = snap.iter().find(|u| u.id == user || u.email == user);
            match found {
                Some(u) => {
                    let out = output::render_single(&global.output, u, detail, |u| u.id.clone());
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "user".into(),
                    identifier: user,
                    list_command: "admin users list".into(),
                }),
            }
        }

        UsersCommand::Approve { user } => {
            let message = portal.approve_user(&user).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User approved".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Reject { user } => {
            if !confirm(global, &format!("Reject account {user}?"))? {
                return Ok(());
            }
            let message = portal.reject_user(&user).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User rejected".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Suspend { user } => {
            if !confirm(global, &format!("Suspend account {user}?"))? {
                return Ok(());
            }
            let message = portal.suspend_user(&user).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User suspended".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Activate { user } => {
            let message = portal.activate_user(&user).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User activated".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Update {
            user,
            first_name,
            last_name,
            phone,
            role,
        } => {
            let update = esimly_core::UserUpdateDto {
                first_name,
                last_name,
                phone_number: phone,
                role,
            };
            let message = portal
                .update_user(&user, &update)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User updated".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        UsersCommand::Delete { user } => {
            if !confirm(
                global,
                &format!("Delete account {user}? This cannot be undone."),
            )? {
                return Ok(());
            }
            let message = portal.delete_user(&user).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "User deleted".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
