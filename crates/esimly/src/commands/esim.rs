//! Admin eSIM approval-queue commands, plus activation-QR generation
//! for assigned eSIM stock items.

use std::sync::Arc;

use tabled::Tabled;

use esimly_core::activation;
use esimly_core::model::{EsimRequest, EsimRequestStatus};

use crate::cli::{EsimArgs, EsimCommand, EsimStatusArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::{Context, confirm, core_err, require_admin};

impl From<EsimStatusArg> for EsimRequestStatus {
    fn from(arg: EsimStatusArg) -> Self {
        match arg {
            EsimStatusArg::Pending => Self::Pending,
            EsimStatusArg::Approved => Self::Approved,
            EsimStatusArg::Rejected => Self::Rejected,
        }
    }
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Serial")]
    serial: String,
}

impl From<&Arc<EsimRequest>> for RequestRow {
    fn from(r: &Arc<EsimRequest>) -> Self {
        Self {
            id: r.id.clone(),
            customer: r.customer_full_name.clone().unwrap_or_default(),
            email: r.customer_email.clone().unwrap_or_default(),
            status: r.status.to_string(),
            serial: r.assigned_esim_serial.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(ctx: &Context, args: EsimArgs, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        EsimCommand::List { status } => {
            let filter = status.map(EsimRequestStatus::from);
            portal
                .refresh_esim_requests(filter)
                .await
                .map_err(core_err(ctx))?;
            let snap = portal.store().esim_requests_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |r| RequestRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EsimCommand::Approve { request } => {
            if !confirm(global, &format!("Approve eSIM request {request}?"))? {
                return Ok(());
            }
            let message = portal
                .approve_esim_request(&request, Some(EsimRequestStatus::Pending))
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Request approved".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        EsimCommand::Reject { request, reason } => {
            // The blank-reason check lives in the portal so every surface
            // enforces it; failing here never touches the network.
            let message = portal
                .reject_esim_request(&request, &reason, Some(EsimRequestStatus::Pending))
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Request rejected".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        EsimCommand::Qr { item, svg, mailto } => {
            portal.refresh_stock().await.map_err(core_err(ctx))?;
            let items = portal.store().stock_items_snapshot();
            let found = items
                .iter()
                .find(|i| i.item_id == item || i.serial_number.as_deref() == Some(item.as_str()))
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "stock item".into(),
                    identifier: item.clone(),
                    list_command: "admin stock pools".into(),
                })?;

            let (Some(code), Some(serial)) = (&found.item_data, &found.serial_number) else {
                return Err(CliError::Rejected {
                    message: format!("stock item {item} has no activation data/serial yet"),
                });
            };

            let url = activation::activation_url(&ctx.storefront_origin, code, serial);

            if let Some(path) = svg {
                let svg_body = activation::activation_qr_svg(&url).map_err(core_err(ctx))?;
                std::fs::write(&path, svg_body)?;
                output::notify_success(
                    &format!("QR written to {}", path.display()),
                    &global.color,
                    global.quiet,
                );
            }

            if let Some(recipient) = mailto {
                output::print_output(
                    &activation::activation_mailto(&recipient, serial, &url),
                    global.quiet,
                );
                return Ok(());
            }

            let qr = activation::activation_qr_text(&url).map_err(core_err(ctx))?;
            output::print_output(&format!("{qr}\n{url}"), global.quiet);
            Ok(())
        }
    }
}
