//! Admin overview commands: registrations, enquiries, and the derived
//! statistics with the catalog → CSV-stock fallback.

use std::sync::Arc;

use tabled::Tabled;

use esimly_core::model::{BusinessRegistration, Enquiry};
use esimly_core::stats;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, money};

use super::util::{Context, core_err, require_admin};

#[derive(Tabled)]
struct RegistrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Business")]
    business: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<BusinessRegistration>> for RegistrationRow {
    fn from(r: &Arc<BusinessRegistration>) -> Self {
        Self {
            id: r.id.clone(),
            business: r.business_name.clone().unwrap_or_default(),
            contact: r.contact_name.clone().unwrap_or_default(),
            email: r.email.clone(),
            status: r.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct EnquiryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Enquiry>> for EnquiryRow {
    fn from(e: &Arc<Enquiry>) -> Self {
        Self {
            id: e.id.clone(),
            from: e.name.clone().unwrap_or_else(|| e.email.clone()),
            subject: e.subject.clone().unwrap_or_default(),
            status: e.status.clone().unwrap_or_default(),
        }
    }
}

pub async fn registrations(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    ctx.portal.refresh_admin().await.map_err(core_err(ctx))?;

    let snap = ctx.portal.store().registrations_snapshot();
    let out = output::render_list(
        &global.output,
        &snap,
        |r| RegistrationRow::from(r),
        |r| r.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn enquiries(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    ctx.portal.refresh_admin().await.map_err(core_err(ctx))?;

    let snap = ctx.portal.store().enquiries_snapshot();
    let out = output::render_list(
        &global.output,
        &snap,
        |e| EnquiryRow::from(e),
        |e| e.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn stats(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;

    // Prefer the backend's aggregate figures; recompute locally (catalog
    // with CSV-stock fallback) when the statistics endpoint is absent.
    let figures = match ctx.portal.api().admin_bundle_statistics().await {
        Ok(dto) => dto.into(),
        Err(e) => {
            tracing::debug!(error = %e, "statistics endpoint unavailable, deriving locally");
            ctx.portal.refresh_admin().await.map_err(core_err(ctx))?;
            ctx.portal.refresh_stock().await.map_err(core_err(ctx))?;
            let store = ctx.portal.store();
            stats::overview_statistics(&store.bundles_snapshot(), &store.stock_items_snapshot())
        }
    };

    let out = output::render_single(
        &global.output,
        &figures,
        |s| {
            [
                format!("Total bundles:  {}", s.total_bundles),
                format!("Active bundles: {}", s.active_bundles),
                format!("Units sold:     {}", s.total_units_sold),
                format!("Revenue:        {}", money(s.total_revenue)),
            ]
            .join("\n")
        },
        |s| s.total_bundles.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
