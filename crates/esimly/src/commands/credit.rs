//! Admin retailer-credit commands.

use std::sync::Arc;

use tabled::Tabled;

use esimly_core::convert::RetailerCredit;

use crate::cli::{CreditArgs, CreditCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, money};

use super::util::{Context, confirm, core_err, require_admin};

#[derive(Tabled)]
struct CreditRow {
    #[tabled(rename = "User")]
    user_id: String,
    #[tabled(rename = "Business")]
    business: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Level")]
    level: String,
}

impl From<&Arc<RetailerCredit>> for CreditRow {
    fn from(c: &Arc<RetailerCredit>) -> Self {
        Self {
            user_id: c.user_id.clone(),
            business: c.business_name.clone().unwrap_or_default(),
            email: c.email.clone(),
            limit: money(c.credit_limit),
            used: money(c.used_credit),
            level: c.level.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(ctx: &Context, args: CreditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        CreditCommand::List => {
            portal
                .refresh_retailer_credits()
                .await
                .map_err(core_err(ctx))?;
            let snap = portal.store().retailer_credits_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CreditRow::from(c),
                |c| c.user_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CreditCommand::Set { user, limit } => {
            if limit < 0.0 {
                return Err(CliError::Validation {
                    field: "limit".into(),
                    reason: "must not be negative".into(),
                });
            }
            if !confirm(
                global,
                &format!("Set credit limit for {user} to {}?", money(limit)),
            )? {
                return Ok(());
            }
            let message = portal
                .set_credit_limit(&user, limit)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Credit limit updated".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
