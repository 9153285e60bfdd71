// ── Admin overview statistics ──
//
// Two inventory representations coexist server-side: the product catalog
// (`bundles`) and the raw CSV stock items. The overview prefers the
// catalog; when it is empty the same figures are recomputed from the
// flattened stock-item list so a CSV-only deployment still shows real
// numbers instead of zeros.

use std::sync::Arc;

use crate::model::{Bundle, BundleStatistics, ItemStatus, StockItem};

/// Compute the overview figures with the catalog → stock fallback chain.
pub fn overview_statistics(
    bundles: &[Arc<Bundle>],
    stock_items: &[Arc<StockItem>],
) -> BundleStatistics {
    if bundles.is_empty() {
        return from_stock_items(stock_items);
    }
    from_bundles(bundles)
}

fn from_bundles(bundles: &[Arc<Bundle>]) -> BundleStatistics {
    let total_bundles = bundles.len() as u64;
    let active_bundles = bundles.iter().filter(|b| b.is_active()).count() as u64;
    let total_units_sold: u64 = bundles.iter().map(|b| u64::from(b.sold_quantity)).sum();
    let total_revenue: f64 = bundles
        .iter()
        .map(|b| b.base_price * f64::from(b.sold_quantity))
        .sum();
    BundleStatistics {
        total_bundles,
        active_bundles,
        total_revenue,
        total_units_sold,
    }
}

fn from_stock_items(items: &[Arc<StockItem>]) -> BundleStatistics {
    let total_bundles = items.len() as u64;
    let active_bundles = items
        .iter()
        .filter(|i| i.status == ItemStatus::Available)
        .count() as u64;
    let sold: Vec<_> = items
        .iter()
        .filter(|i| i.status == ItemStatus::Used || i.status == ItemStatus::Assigned)
        .collect();
    let total_units_sold = sold.len() as u64;
    let total_revenue: f64 = sold.iter().filter_map(|i| i.price).sum();
    BundleStatistics {
        total_bundles,
        active_bundles,
        total_revenue,
        total_units_sold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BundleStatus, ProductType};

    fn bundle(price: f64, sold: u32, status: BundleStatus) -> Arc<Bundle> {
        Arc::new(Bundle {
            id: "b".into(),
            name: "B".into(),
            description: None,
            product_type: ProductType::Epin,
            base_price: price,
            stock_quantity: 10,
            sold_quantity: sold,
            status,
        })
    }

    fn item(status: ItemStatus, price: Option<f64>) -> Arc<StockItem> {
        Arc::new(StockItem {
            item_id: "i".into(),
            item_data: None,
            serial_number: None,
            status,
            pool_id: None,
            price,
            notes: None,
        })
    }

    #[test]
    fn prefers_catalog_when_present() {
        let bundles = vec![
            bundle(100.0, 3, BundleStatus::Active),
            bundle(50.0, 2, BundleStatus::Inactive),
        ];
        let items = vec![item(ItemStatus::Used, Some(999.0))];

        let stats = overview_statistics(&bundles, &items);
        assert_eq!(stats.total_bundles, 2);
        assert_eq!(stats.active_bundles, 1);
        assert_eq!(stats.total_units_sold, 5);
        assert!((stats.total_revenue - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn falls_back_to_stock_items_when_catalog_empty() {
        let items = vec![
            item(ItemStatus::Available, Some(10.0)),
            item(ItemStatus::Used, Some(10.0)),
            item(ItemStatus::Assigned, Some(20.0)),
        ];

        let stats = overview_statistics(&[], &items);
        assert_eq!(stats.total_bundles, 3);
        assert_eq!(stats.active_bundles, 1);
        assert_eq!(stats.total_units_sold, 2);
        assert!((stats.total_revenue - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn both_empty_is_all_zeros() {
        let stats = overview_statistics(&[], &[]);
        assert_eq!(stats.total_bundles, 0);
        assert!((stats.total_revenue).abs() < f64::EPSILON);
    }
}
