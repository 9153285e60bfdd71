// ── Wire → domain conversions ──
//
// All tolerance for the backend's loose typing lives here: unknown enum
// strings fall back to sensible defaults, timestamps parse best-effort,
// and absent names become empty strings. Downstream code sees only the
// canonical model.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use esimly_api::types::{
    AdminUserDto, BundleDto, BundleStatisticsDto, BusinessRegistrationRecordDto, CampaignDto,
    CreditLevelDto, CreditStatusDto, EnquiryDto, EsimRequestDto, InventoryItemDto, PromotionDto,
    RetailerCreditDto, SessionUserDto, StockItemDto, StockPoolDto,
};

use crate::model::{
    AccountType, Bundle, BundleStatistics, BundleStatus, BusinessRegistration, Campaign,
    CreditLevel, CreditStatus, DiscountType, Enquiry, EsimRequest, EsimRequestStatus,
    InventoryItem, ItemStatus, ProductType, Promotion, Role, StockItem, StockPool, StockType,
    User, UserStatus,
};

/// Parse an enum-ish backend string, falling back to the type's default.
fn parse_or_default<T: FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|s| T::from_str(s).ok()).unwrap_or_default()
}

/// Best-effort RFC 3339 timestamp parse; the backend omits or mangles
/// dates often enough that failure is not an error.
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<SessionUserDto> for User {
    fn from(dto: SessionUserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            first_name: dto.first_name.unwrap_or_default(),
            last_name: dto.last_name.unwrap_or_default(),
            account_type: parse_or_default(dto.account_type.as_deref()),
            role: parse_or_default(dto.role.as_deref()),
            status: parse_or_default(dto.status.as_deref()),
            business_name: dto.business_name,
            phone_number: dto.phone_number,
            created_at: None,
        }
    }
}

impl From<AdminUserDto> for User {
    fn from(dto: AdminUserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            first_name: dto.first_name.unwrap_or_default(),
            last_name: dto.last_name.unwrap_or_default(),
            account_type: parse_or_default(dto.account_type.as_deref()),
            role: parse_or_default(dto.role.as_deref()),
            status: parse_or_default(dto.status.as_deref()),
            business_name: dto.business_name,
            phone_number: dto.phone_number,
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

impl From<BundleDto> for Bundle {
    fn from(dto: BundleDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            product_type: parse_or_default(dto.product_type.as_deref()),
            base_price: dto.base_price,
            stock_quantity: dto.stock_quantity,
            sold_quantity: dto.sold_quantity,
            status: parse_or_default::<BundleStatus>(dto.status.as_deref()),
        }
    }
}

impl From<InventoryItemDto> for InventoryItem {
    fn from(dto: InventoryItemDto) -> Self {
        Self {
            id: dto.id,
            product_name: dto.product_name,
            product_type: parse_or_default(dto.product_type.as_deref()),
            item_data: dto.item_data,
            serial_number: dto.serial_number,
            status: dto.status,
            purchased_at: parse_timestamp(dto.purchased_at.as_deref()),
        }
    }
}

impl From<CreditStatusDto> for CreditStatus {
    fn from(dto: CreditStatusDto) -> Self {
        let (level_name, level_desc, next_name) = match dto.current_level {
            Some(level) => (
                Some(level.name),
                level.description,
                level.next_level_name.or(level.next_level),
            ),
            None => (None, None, None),
        };
        Self {
            credit_limit: dto.credit_limit,
            available_credit: dto.available_credit,
            used_credit: dto.used_credit,
            usage_percentage: dto.usage_percentage,
            is_blocked: dto.is_blocked,
            needs_warning: dto.needs_warning,
            current_level_name: level_name,
            current_level_description: level_desc,
            next_level_name: next_name,
        }
    }
}

impl From<CreditLevelDto> for CreditLevel {
    fn from(dto: CreditLevelDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            credit_limit: dto.credit_limit,
            is_current_level: dto.is_current_level,
            is_available: dto.is_available,
        }
    }
}

impl From<StockPoolDto> for StockPool {
    fn from(dto: StockPoolDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            stock_type: parse_or_default(dto.stock_type.as_deref()),
            total_quantity: dto.total_quantity,
            available_quantity: dto.available_quantity,
            used_quantity: dto.used_quantity,
            reserved_quantity: dto.reserved_quantity,
            status: dto.status,
        }
    }
}

impl From<StockItemDto> for StockItem {
    fn from(dto: StockItemDto) -> Self {
        Self {
            item_id: dto.item_id,
            item_data: dto.item_data,
            serial_number: dto.serial_number,
            status: parse_or_default::<ItemStatus>(dto.status.as_deref()),
            pool_id: dto.pool_id,
            price: dto.price,
            notes: dto.notes,
        }
    }
}

impl From<PromotionDto> for Promotion {
    fn from(dto: PromotionDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            discount_type: dto
                .discount_type
                .as_deref()
                .and_then(|s| DiscountType::from_str(s).ok()),
            discount_value: dto.discount_value,
            start_date: dto.start_date,
            end_date: dto.end_date,
            usage_limit: dto.usage_limit,
            used_count: dto.used_count,
            banner_image: dto.banner_image,
            status: dto.status,
        }
    }
}

impl From<Promotion> for PromotionDto {
    fn from(p: Promotion) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            discount_type: p.discount_type.map(|d| d.to_string()),
            discount_value: p.discount_value,
            start_date: p.start_date,
            end_date: p.end_date,
            usage_limit: p.usage_limit,
            used_count: p.used_count,
            banner_image: p.banner_image,
            status: p.status,
        }
    }
}

impl From<CampaignDto> for Campaign {
    fn from(dto: CampaignDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            reward_type: dto.reward_type,
            reward_value: dto.reward_value,
            start_date: dto.start_date,
            end_date: dto.end_date,
            banner_image: dto.banner_image,
            status: dto.status,
        }
    }
}

impl From<Campaign> for CampaignDto {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            reward_type: c.reward_type,
            reward_value: c.reward_value,
            start_date: c.start_date,
            end_date: c.end_date,
            banner_image: c.banner_image,
            status: c.status,
        }
    }
}

impl From<EsimRequestDto> for EsimRequest {
    fn from(dto: EsimRequestDto) -> Self {
        Self {
            id: dto.id,
            status: parse_or_default::<EsimRequestStatus>(dto.status.as_deref()),
            customer_full_name: dto.customer_full_name,
            customer_email: dto.customer_email,
            id_number: dto.id_number,
            id_type: dto.id_type,
            assigned_esim_serial: dto.assigned_esim_serial,
            rejection_reason: dto.rejection_reason,
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

impl From<BusinessRegistrationRecordDto> for BusinessRegistration {
    fn from(dto: BusinessRegistrationRecordDto) -> Self {
        Self {
            id: dto.id,
            business_name: dto.business_name,
            contact_name: dto.contact_name,
            email: dto.email,
            status: dto.status,
            submitted_at: parse_timestamp(dto.submitted_at.as_deref()),
        }
    }
}

impl From<EnquiryDto> for Enquiry {
    fn from(dto: EnquiryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            subject: dto.subject,
            message: dto.message,
            status: dto.status,
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

impl From<BundleStatisticsDto> for BundleStatistics {
    fn from(dto: BundleStatisticsDto) -> Self {
        Self {
            total_bundles: dto.total_bundles,
            active_bundles: dto.active_bundles,
            total_revenue: dto.total_revenue,
            total_units_sold: dto.total_units_sold,
        }
    }
}

/// Admin view of a retailer's credit allowance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RetailerCredit {
    pub user_id: String,
    pub business_name: Option<String>,
    pub email: String,
    pub credit_limit: f64,
    pub used_credit: f64,
    pub level: Option<String>,
}

impl From<RetailerCreditDto> for RetailerCredit {
    fn from(dto: RetailerCreditDto) -> Self {
        Self {
            user_id: dto.user_id,
            business_name: dto.business_name,
            email: dto.email,
            credit_limit: dto.credit_limit,
            used_credit: dto.used_credit,
            level: dto.level,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enum_strings_fall_back() {
        let dto = BundleDto {
            id: "b1".into(),
            name: "Data 1GB".into(),
            description: None,
            product_type: Some("HOLOGRAM".into()),
            base_price: 99.0,
            stock_quantity: 5,
            sold_quantity: 0,
            status: None,
        };
        let bundle = Bundle::from(dto);
        assert_eq!(bundle.product_type, ProductType::Bundle);
        assert_eq!(bundle.status, BundleStatus::Active);
    }

    #[test]
    fn enum_parse_is_case_insensitive() {
        let dto = SessionUserDto {
            id: "u1".into(),
            email: "a@b.c".into(),
            first_name: None,
            last_name: None,
            account_type: Some("business".into()),
            role: Some("Admin".into()),
            status: None,
            business_name: None,
            phone_number: None,
        };
        let user = User::from(dto);
        assert_eq!(user.account_type, AccountType::Business);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn credit_status_flattens_current_level() {
        let dto = CreditStatusDto {
            credit_limit: 1000.0,
            available_credit: 600.0,
            used_credit: 400.0,
            usage_percentage: 40.0,
            is_blocked: false,
            needs_warning: false,
            current_level: Some(esimly_api::types::CurrentLevelDto {
                name: "BRONZE".into(),
                description: Some("Entry tier".into()),
                next_level: Some("silver".into()),
                next_level_name: Some("SILVER".into()),
            }),
        };
        let status = CreditStatus::from(dto);
        assert_eq!(status.current_level_name.as_deref(), Some("BRONZE"));
        assert_eq!(status.next_level_name.as_deref(), Some("SILVER"));
    }
}
