//! Retailer storefront commands: catalog, credit standing, purchase.

use std::sync::Arc;

use tabled::Tabled;

use esimly_core::model::{Bundle, CreditLevel, InventoryItem};
use esimly_core::{PriceFilter, catalog};

use crate::cli::{GlobalOpts, ShopArgs, ShopCommand};
use crate::error::CliError;
use crate::output::{self, money};

use super::util::{Context, confirm, core_err, require_business};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BundleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    product_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "In stock")]
    stock: u32,
    #[tabled(rename = "Sold")]
    sold: u32,
}

impl From<&Arc<Bundle>> for BundleRow {
    fn from(b: &Arc<Bundle>) -> Self {
        Self {
            id: b.id.clone(),
            name: b.name.clone(),
            product_type: b.product_type.to_string(),
            price: money(b.base_price),
            stock: b.stock_quantity,
            sold: b.sold_quantity,
        }
    }
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Level")]
    name: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&CreditLevel> for LevelRow {
    fn from(level: &CreditLevel) -> Self {
        Self {
            name: level.name.clone(),
            limit: level.credit_limit.map(money).unwrap_or_else(|| "-".into()),
            current: if level.is_current_level { "●" } else { "" }.into(),
            available: if level.is_available { "yes" } else { "locked" }.into(),
        }
    }
}

#[derive(Tabled)]
struct InventoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<InventoryItem>> for InventoryRow {
    fn from(item: &Arc<InventoryItem>) -> Self {
        Self {
            id: item.id.clone(),
            product: item.product_name.clone().unwrap_or_default(),
            serial: item.serial_number.clone().unwrap_or_default(),
            status: item.status.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: ShopArgs, global: &GlobalOpts) -> Result<(), CliError> {
    require_business(ctx)?;

    match args.command {
        ShopCommand::Bundles { price } => {
            ctx.portal.refresh_retailer().await;
            let snapshot = ctx.portal.store().bundles_snapshot();
            let filter = price.map_or(PriceFilter::All, PriceFilter::Exact);
            let bundles = catalog::filter_bundles(&snapshot, filter);

            let out = output::render_list(
                &global.output,
                &bundles,
                |b| BundleRow::from(b),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShopCommand::Credit => {
            ctx.portal.refresh_retailer().await;
            let Some(status) = ctx.portal.store().credit_status_snapshot() else {
                return Err(CliError::Rejected {
                    message: "credit status is unavailable right now".into(),
                });
            };

            let out = output::render_single(
                &global.output,
                status.as_ref(),
                |s| {
                    let mut lines = vec![
                        format!("Limit:      {}", money(s.credit_limit)),
                        format!("Used:       {}", money(s.used_credit)),
                        format!("Available:  {}", money(s.available_credit)),
                        format!("Usage:      {:.1}%", s.usage_percentage),
                    ];
                    if let Some(ref level) = s.current_level_name {
                        lines.push(format!("Level:      {level}"));
                    }
                    if let Some(ref next) = s.next_level_name {
                        lines.push(format!("Next level: {next}"));
                    }
                    if s.is_blocked {
                        lines.push("BLOCKED: purchasing is disabled for this account".into());
                    } else if s.needs_warning {
                        lines.push("Warning: credit usage is approaching the limit".into());
                    }
                    lines.join("\n")
                },
                |s| money(s.available_credit),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShopCommand::Levels => {
            ctx.portal.refresh_retailer().await;
            let levels = ctx.portal.store().credit_levels_snapshot();
            let out = output::render_list(
                &global.output,
                &levels,
                |l| LevelRow::from(l),
                |l| l.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShopCommand::Inventory => {
            ctx.portal.refresh_retailer().await;
            let items = ctx.portal.store().inventory_snapshot();
            let out = output::render_list(
                &global.output,
                &items,
                |i| InventoryRow::from(i),
                |i| i.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShopCommand::Buy { bundle, quantity } => {
            ctx.portal.refresh_retailer().await;
            let found =
                ctx.portal
                    .store()
                    .bundle_by_id(&bundle)
                    .ok_or_else(|| CliError::NotFound {
                        resource_type: "bundle".into(),
                        identifier: bundle.clone(),
                        list_command: "shop bundles".into(),
                    })?;

            let estimated = found.base_price * f64::from(quantity);
            let prompt = format!(
                "Buy {quantity} × {} for {} on credit?",
                found.name,
                money(estimated)
            );
            if !confirm(global, &prompt)? {
                return Ok(());
            }

            let outcome = ctx
                .portal
                .purchase(&bundle, quantity)
                .await
                .map_err(core_err(ctx))?;

            let mut message = outcome
                .message
                .unwrap_or_else(|| format!("Purchased {quantity} × {}", found.name));
            if let Some(total) = outcome.total_price {
                message.push_str(&format!(" ({})", money(total)));
            }
            // The purchase triggered a full dashboard re-fetch; these are
            // the server's post-purchase numbers, not local arithmetic.
            if let Some(status) = ctx.portal.store().credit_status_snapshot() {
                message.push_str(&format!(
                    " -- available credit {}",
                    money(status.available_credit)
                ));
            }
            output::notify_success(&message, &global.color, global.quiet);
            Ok(())
        }
    }
}
