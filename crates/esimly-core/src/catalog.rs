// ── Retailer catalog rules ──
//
// Price-bucket filtering and the purchase quantity clamp. Both are pure
// functions over already-fetched data; the server remains the authority
// on stock, and any TOCTOU race surfaces as a purchase error.

use std::sync::Arc;

use crate::model::{Bundle, ProductType};

// ── Price filter ────────────────────────────────────────────────────

/// Client-side price-bucket filter over the fetched bundle list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PriceFilter {
    /// "All Bundles" -- no price constraint.
    #[default]
    All,
    /// Exact `base_price` match.
    Exact(f64),
}

impl PriceFilter {
    fn matches(self, bundle: &Bundle) -> bool {
        match self {
            Self::All => true,
            Self::Exact(price) => (bundle.base_price - price).abs() < f64::EPSILON,
        }
    }
}

/// Whether a bundle belongs in the retailer catalog at all.
///
/// eSIM-type bundles are excluded regardless of price: retailers only
/// buy PIN/EPIN stock through this screen.
pub fn retailer_visible(bundle: &Bundle) -> bool {
    bundle.product_type != ProductType::Esim
}

/// Partition the fetched list by the active filter. eSIM bundles never
/// appear, whatever the filter.
pub fn filter_bundles(bundles: &[Arc<Bundle>], filter: PriceFilter) -> Vec<Arc<Bundle>> {
    bundles
        .iter()
        .filter(|b| retailer_visible(b))
        .filter(|b| filter.matches(b))
        .cloned()
        .collect()
}

/// The distinct prices present in the retailer-visible catalog, sorted
/// ascending -- these become the filter buckets.
pub fn price_buckets(bundles: &[Arc<Bundle>]) -> Vec<f64> {
    let mut prices: Vec<f64> = bundles
        .iter()
        .filter(|b| retailer_visible(b))
        .map(|b| b.base_price)
        .collect();
    prices.sort_by(f64::total_cmp);
    prices.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
    prices
}

// ── Quantity picker ─────────────────────────────────────────────────

/// Quantity selection for the purchase modal, bounded to
/// `[1, stock_quantity]`. Every mutation clamps, so the held value is
/// always submittable while stock exists.
#[derive(Debug, Clone, Copy)]
pub struct QuantityPicker {
    quantity: u32,
    stock: u32,
}

impl QuantityPicker {
    /// Start at 1 (or 0 when the bundle is out of stock).
    pub fn new(stock_quantity: u32) -> Self {
        Self {
            quantity: if stock_quantity == 0 { 0 } else { 1 },
            stock: stock_quantity,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Direct numeric input; clamped on every change.
    pub fn set(&mut self, value: u32) {
        self.quantity = value.clamp(self.min(), self.stock);
    }

    pub fn increment(&mut self) {
        self.set(self.quantity.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set(self.quantity.saturating_sub(1));
    }

    /// Whether the current value may be submitted: within `[1, stock]`.
    pub fn can_submit(&self) -> bool {
        self.quantity >= 1 && self.quantity <= self.stock
    }

    fn min(&self) -> u32 {
        u32::from(self.stock > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BundleStatus;

    fn bundle(id: &str, price: f64, product_type: ProductType) -> Arc<Bundle> {
        Arc::new(Bundle {
            id: id.into(),
            name: format!("Bundle {id}"),
            description: None,
            product_type,
            base_price: price,
            stock_quantity: 10,
            sold_quantity: 0,
            status: BundleStatus::Active,
        })
    }

    #[test]
    fn exact_filter_partitions_by_price() {
        let bundles = vec![
            bundle("a", 99.0, ProductType::Epin),
            bundle("b", 99.0, ProductType::Epin),
            bundle("c", 199.0, ProductType::Epin),
        ];

        let cheap = filter_bundles(&bundles, PriceFilter::Exact(99.0));
        assert_eq!(cheap.len(), 2);
        assert!(cheap.iter().all(|b| (b.base_price - 99.0).abs() < f64::EPSILON));

        let all = filter_bundles(&bundles, PriceFilter::All);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn esim_bundles_excluded_regardless_of_filter() {
        let bundles = vec![
            bundle("a", 99.0, ProductType::Epin),
            bundle("b", 99.0, ProductType::Esim),
        ];

        assert_eq!(filter_bundles(&bundles, PriceFilter::All).len(), 1);
        assert_eq!(filter_bundles(&bundles, PriceFilter::Exact(99.0)).len(), 1);
        assert_eq!(
            filter_bundles(&bundles, PriceFilter::Exact(99.0))[0].id,
            "a"
        );
    }

    #[test]
    fn price_buckets_are_distinct_and_sorted() {
        let bundles = vec![
            bundle("a", 199.0, ProductType::Epin),
            bundle("b", 99.0, ProductType::Epin),
            bundle("c", 99.0, ProductType::Epin),
            bundle("d", 49.0, ProductType::Esim), // excluded
        ];
        assert_eq!(price_buckets(&bundles), vec![99.0, 199.0]);
    }

    #[test]
    fn quantity_clamps_at_bounds() {
        let mut picker = QuantityPicker::new(5);
        assert_eq!(picker.quantity(), 1);
        assert!(picker.can_submit());

        picker.set(5);
        assert!(picker.can_submit());

        // Above stock clamps back to stock.
        picker.increment();
        assert_eq!(picker.quantity(), 5);

        // Below 1 clamps back to 1.
        picker.set(1);
        picker.decrement();
        assert_eq!(picker.quantity(), 1);
        assert!(picker.can_submit());

        // Direct input clamps both ways.
        picker.set(0);
        assert_eq!(picker.quantity(), 1);
        picker.set(6);
        assert_eq!(picker.quantity(), 5);
    }

    #[test]
    fn zero_stock_cannot_submit() {
        let mut picker = QuantityPicker::new(0);
        assert_eq!(picker.quantity(), 0);
        assert!(!picker.can_submit());
        picker.increment();
        assert_eq!(picker.quantity(), 0);
        assert!(!picker.can_submit());
    }
}
