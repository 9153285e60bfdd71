//! Screen registry.

use std::collections::HashMap;

use crate::component::Component;
use crate::screen::ScreenId;

pub mod admin;
pub mod approvals;
pub mod login;
pub mod shop;
pub mod stock;

/// Create all screens. `storefront_origin` feeds the eSIM activation-QR
/// view on the stock screen.
pub fn create_screens(storefront_origin: String) -> HashMap<ScreenId, Box<dyn Component>> {
    let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
    screens.insert(ScreenId::Login, Box::new(login::LoginScreen::new()));
    screens.insert(ScreenId::Shop, Box::new(shop::ShopScreen::new()));
    screens.insert(ScreenId::Admin, Box::new(admin::AdminScreen::new()));
    screens.insert(
        ScreenId::Stock,
        Box::new(stock::StockScreen::new(storefront_origin)),
    );
    screens.insert(
        ScreenId::Approvals,
        Box::new(approvals::ApprovalsScreen::new()),
    );
    screens
}
