//! Admin stock commands: pools, items, usage report, CSV upload, and
//! template download.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use esimly_core::model::{StockItem, StockPool};
use esimly_core::{BulkUploadMetaDto, StockKind, csvutil};

use crate::cli::{GlobalOpts, StockArgs, StockCommand, StockKindArg};
use crate::error::CliError;
use crate::output::{self, money};

use super::util::{Context, confirm, core_err, require_admin};

impl From<StockKindArg> for StockKind {
    fn from(arg: StockKindArg) -> Self {
        match arg {
            StockKindArg::Pins => StockKind::Pin,
            StockKindArg::Esims => StockKind::Esim,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    stock_type: String,
    #[tabled(rename = "Total")]
    total: u32,
    #[tabled(rename = "Available")]
    available: u32,
    #[tabled(rename = "Used")]
    used: u32,
    #[tabled(rename = "Reserved")]
    reserved: u32,
}

impl From<&Arc<StockPool>> for PoolRow {
    fn from(p: &Arc<StockPool>) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            stock_type: p.stock_type.to_string(),
            total: p.total_quantity,
            available: p.available_quantity,
            used: p.used_quantity,
            reserved: p.reserved_quantity,
        }
    }
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Arc<StockItem>> for ItemRow {
    fn from(i: &Arc<StockItem>) -> Self {
        Self {
            id: i.item_id.clone(),
            serial: i.serial_number.clone().unwrap_or_default(),
            status: i.status.to_string(),
            price: i.price.map(money).unwrap_or_else(|| "-".into()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: StockArgs, global: &GlobalOpts) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        StockCommand::Pools => {
            portal.refresh_stock().await.map_err(core_err(ctx))?;
            let snap = portal.store().stock_pools_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |p| PoolRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StockCommand::Items { pool } => {
            portal.refresh_stock().await.map_err(core_err(ctx))?;
            let snap = portal.store().stock_items_snapshot();
            let items: Vec<_> = snap
                .iter()
                .filter(|i| i.pool_id.as_deref() == Some(pool.as_str()))
                .cloned()
                .collect();
            if items.is_empty() && portal.store().stock_pool_by_id(&pool).is_none() {
                return Err(CliError::NotFound {
                    resource_type: "stock pool".into(),
                    identifier: pool,
                    list_command: "admin stock pools".into(),
                });
            }
            let out = output::render_list(
                &global.output,
                &items,
                |i| ItemRow::from(i),
                |i| i.item_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StockCommand::Report => {
            let report = portal
                .api()
                .stock_usage_report()
                .await
                .map_err(|e| CliError::from_core(e.into(), &ctx.profile_name))?;
            let out = serde_json::to_string_pretty(&report).unwrap_or_default();
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StockCommand::Upload {
            kind,
            file,
            pool_name,
            price,
            total_stock,
            notes,
        } => {
            let csv_text = std::fs::read_to_string(&file)?;

            // Pre-count data rows to fill totalStock, exactly like the
            // upload form does. --total-stock overrides the count (the
            // server re-validates either way).
            let counted = csvutil::count_data_rows(&csv_text);
            let total = total_stock.unwrap_or(counted);

            let prompt = format!(
                "Upload {} as pool '{pool_name}' ({total} items at {})?",
                file.display(),
                money(price)
            );
            if !confirm(global, &prompt)? {
                return Ok(());
            }

            let spinner = upload_spinner(global.quiet);
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("stock.csv")
                .to_owned();
            let meta = BulkUploadMetaDto {
                pool_name,
                total_stock: total,
                price,
                notes,
            };
            let result = portal
                .bulk_upload(kind.into(), &file_name, csv_text.into_bytes(), &meta)
                .await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            let message = result.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| format!("Uploaded {total} items")),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        StockCommand::Template { kind, out } => {
            let csv = portal
                .template_csv(kind.into())
                .await
                .map_err(core_err(ctx))?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)?;
                    output::notify_success(
                        &format!("Template written to {}", path.display()),
                        &global.color,
                        global.quiet,
                    );
                }
                None => output::print_output(csv.trim_end(), global.quiet),
            }
            Ok(())
        }
    }
}

fn upload_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} uploading…").expect("static spinner template"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(spinner)
}
