//! Admin promotion & reward-campaign commands. Two parallel CRUD
//! families sharing the banner-image upload path.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tabled::Tabled;

use esimly_core::media;
use esimly_core::model::{Campaign, DiscountType, Promotion};

use crate::cli::{
    CampaignFields, CampaignsArgs, CampaignsCommand, GlobalOpts, PromoFields, PromosArgs,
    PromosCommand,
};
use crate::error::CliError;
use crate::output;

use super::util::{Context, confirm, core_err, require_admin};

// ── Banner image ────────────────────────────────────────────────────

/// Read a banner image and embed it as a base64 data URL (max 2 MB).
fn load_banner(path: &Path, ctx: &Context) -> Result<String, CliError> {
    let bytes = std::fs::read(path)?;
    media::image_to_data_url(&bytes, media::mime_from_extension(path)).map_err(core_err(ctx))
}

fn parse_discount_type(value: &str) -> Result<DiscountType, CliError> {
    DiscountType::from_str(value).map_err(|_| CliError::Validation {
        field: "discount-type".into(),
        reason: format!("expected PERCENTAGE or FIXED, got '{value}'"),
    })
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PromoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Promotion>> for PromoRow {
    fn from(p: &Arc<Promotion>) -> Self {
        let discount = match (p.discount_type, p.discount_value) {
            (Some(DiscountType::Percentage), Some(v)) => format!("{v}%"),
            (Some(DiscountType::Fixed), Some(v)) => format!("R{v:.2}"),
            _ => "-".into(),
        };
        let window = match (&p.start_date, &p.end_date) {
            (Some(start), Some(end)) => format!("{start} → {end}"),
            (Some(start), None) => format!("{start} →"),
            _ => "-".into(),
        };
        let used = match (p.used_count, p.usage_limit) {
            (Some(used), Some(limit)) => format!("{used}/{limit}"),
            (Some(used), None) => used.to_string(),
            _ => "-".into(),
        };
        Self {
            id: p.id.clone().unwrap_or_default(),
            name: p.name.clone(),
            discount,
            window,
            used,
            status: p.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CampaignRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Reward")]
    reward: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Campaign>> for CampaignRow {
    fn from(c: &Arc<Campaign>) -> Self {
        let reward = match (&c.reward_type, c.reward_value) {
            (Some(kind), Some(value)) => format!("{kind} {value}"),
            (Some(kind), None) => kind.clone(),
            _ => "-".into(),
        };
        Self {
            id: c.id.clone().unwrap_or_default(),
            name: c.name.clone(),
            reward,
            status: c.status.clone().unwrap_or_default(),
        }
    }
}

// ── Form assembly ───────────────────────────────────────────────────

fn promotion_from_fields(
    fields: PromoFields,
    id: Option<String>,
    ctx: &Context,
) -> Result<Promotion, CliError> {
    let banner_image = fields
        .image
        .as_deref()
        .map(|path| load_banner(path, ctx))
        .transpose()?;
    let discount_type = fields
        .discount_type
        .as_deref()
        .map(parse_discount_type)
        .transpose()?;

    Ok(Promotion {
        id,
        name: fields.name,
        description: fields.description,
        discount_type,
        discount_value: fields.discount_value,
        start_date: fields.start_date,
        end_date: fields.end_date,
        usage_limit: fields.usage_limit,
        used_count: None,
        banner_image,
        status: None,
    })
}

fn campaign_from_fields(
    fields: CampaignFields,
    id: Option<String>,
    ctx: &Context,
) -> Result<Campaign, CliError> {
    let banner_image = fields
        .image
        .as_deref()
        .map(|path| load_banner(path, ctx))
        .transpose()?;

    Ok(Campaign {
        id,
        name: fields.name,
        description: fields.description,
        reward_type: fields.reward_type,
        reward_value: fields.reward_value,
        start_date: fields.start_date,
        end_date: fields.end_date,
        banner_image,
        status: None,
    })
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_promos(
    ctx: &Context,
    args: PromosArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        PromosCommand::List => {
            portal.refresh_promotions().await.map_err(core_err(ctx))?;
            let snap = portal.store().promotions_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |p| PromoRow::from(p),
                |p| p.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PromosCommand::Create(fields) => {
            let promotion = promotion_from_fields(fields, None, ctx)?;
            let message = portal
                .save_promotion(promotion)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Promotion created".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        PromosCommand::Update { id, fields } => {
            let promotion = promotion_from_fields(fields, Some(id), ctx)?;
            let message = portal
                .save_promotion(promotion)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Promotion updated".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        PromosCommand::Delete { id } => {
            if !confirm(global, &format!("Delete promotion {id}?"))? {
                return Ok(());
            }
            let message = portal.delete_promotion(&id).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Promotion deleted".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}

pub async fn handle_campaigns(
    ctx: &Context,
    args: CampaignsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    require_admin(ctx)?;
    let portal = &ctx.portal;

    match args.command {
        CampaignsCommand::List => {
            portal.refresh_campaigns().await.map_err(core_err(ctx))?;
            let snap = portal.store().campaigns_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CampaignRow::from(c),
                |c| c.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CampaignsCommand::Create(fields) => {
            let campaign = campaign_from_fields(fields, None, ctx)?;
            let message = portal
                .save_campaign(campaign)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Campaign created".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        CampaignsCommand::Update { id, fields } => {
            let campaign = campaign_from_fields(fields, Some(id), ctx)?;
            let message = portal
                .save_campaign(campaign)
                .await
                .map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Campaign updated".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        CampaignsCommand::Delete { id } => {
            if !confirm(global, &format!("Delete campaign {id}?"))? {
                return Ok(());
            }
            let message = portal.delete_campaign(&id).await.map_err(core_err(ctx))?;
            output::notify_success(
                &message.unwrap_or_else(|| "Campaign deleted".into()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
