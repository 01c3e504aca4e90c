//! # Corte Aggregation Engine
//!
//! Turns a date range's worth of persisted sales back into
//! operator-meaningful aggregates: grand total, per-payment-method totals,
//! per-category/product rollups and the chicken production counts.
//!
//! Pure, stateless computation over an immutable snapshot of already
//! persisted records. Category strings are classified with the documented
//! substring heuristics because persisted rows may carry labels that no
//! longer exist in the catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::normalize::{fold, is_chicken_name, ChickenUnit};
use crate::sale::Sale;

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive calendar-day range.
///
/// A single date is the range `from == to`. The caller normalizes dates to
/// the deployment's local calendar day; no timezone logic happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
}

impl DateRange {
    /// Range covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        DateRange { from: date, to: date }
    }

    /// Inclusive range; endpoints are reordered if given backwards.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            DateRange { from, to }
        } else {
            DateRange { from: to, to: from }
        }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Operator-facing label for tickets.
    pub fn label(&self) -> String {
        if self.from == self.to {
            self.from.format("%d/%m/%Y").to_string()
        } else {
            format!(
                "del {} al {}",
                self.from.format("%d/%m/%Y"),
                self.to.format("%d/%m/%Y")
            )
        }
    }
}

// =============================================================================
// Payment Totals
// =============================================================================

/// Subtotal and sale count for one payment bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTotal {
    pub total_cents: i64,
    pub count: u32,
}

/// Per-payment-method totals.
///
/// `other` is the defensive catch-all: persisted rows may predate the
/// payment-method column or carry values no current build writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentTotals {
    pub cash: PaymentTotal,
    pub card: PaymentTotal,
    pub other: PaymentTotal,
}

impl PaymentTotals {
    fn record(&mut self, raw_method: &str, total_cents: i64) {
        let folded = fold(raw_method);
        let bucket = if folded.contains("efectivo") || folded.contains("cash") {
            &mut self.cash
        } else if folded.contains("tarjeta") || folded.contains("card") {
            &mut self.card
        } else {
            &mut self.other
        };
        bucket.total_cents += total_cents;
        bucket.count += 1;
    }
}

// =============================================================================
// Chicken Totals
// =============================================================================

/// Production counts of raw chicken units sold in the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChickenTotals {
    /// Whole birds.
    pub whole: i64,
    /// Half birds.
    pub half: i64,
    /// Quarter birds.
    pub quarter: i64,
    /// Running equivalent in quarter birds (whole=4, half=2, quarter=1).
    pub quarter_units: i64,
}

impl ChickenTotals {
    fn add(&mut self, unit: ChickenUnit, quantity: i64) {
        match unit {
            ChickenUnit::Whole => self.whole += quantity,
            ChickenUnit::Half => self.half += quantity,
            ChickenUnit::Quarter => self.quarter += quantity,
        }
        self.quarter_units += quantity * unit.quarter_units();
    }

    /// Whole-bird equivalent total. Exact to two decimals because the
    /// count is kept in quarter units.
    pub fn equivalent(&self) -> f64 {
        self.quarter_units as f64 / 4.0
    }
}

/// Whether a line counts toward raw chicken production.
///
/// Category precedence, preserved exactly:
/// 1. Specialty categories never count, even when the name matches --
///    a specialty dish is a distinct finished product.
/// 2. Any other non-empty category counts only when it contains "pollos"
///    or "incluido" (package-included bucket).
/// 3. A line with no category counts whenever the name matches; such rows
///    come from production-only tickets that are pre-filtered to chicken.
pub fn counts_as_chicken(name: &str, category: Option<&str>) -> bool {
    if !is_chicken_name(name) {
        return false;
    }

    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(label) => {
            let folded = fold(label);
            if folded.contains("especialidad") {
                return false;
            }
            folded.contains("pollos") || folded.contains("incluido")
        }
        None => true,
    }
}

// =============================================================================
// Extras / Disposables
// =============================================================================

/// Quantity buckets for sides and consumables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtrasTotals {
    /// Paid extras sold on their own.
    pub paid_quantity: i64,
    /// Extras bundled free inside packages; never mixed into paid.
    pub included_quantity: i64,
    /// Disposables (cutlery, containers).
    pub disposables_quantity: i64,
}

impl ExtrasTotals {
    fn record(&mut self, name: &str, category: Option<&str>, quantity: i64) {
        if fold(name).contains("desechable") {
            self.disposables_quantity += quantity;
            return;
        }

        let folded_category = category.map(fold).unwrap_or_default();
        if folded_category.contains("incluido") {
            self.included_quantity += quantity;
        } else if folded_category.contains("extra") {
            self.paid_quantity += quantity;
        }
    }
}

// =============================================================================
// Product Rollup
// =============================================================================

/// Summed quantity and subtotal for one (category, clean name) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRow {
    pub category: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

/// Fixed presentation order of the known production categories.
const PRODUCTION_ORDER: [&str; 7] = [
    "pollos",
    "paquetes",
    "especialidades",
    "miercoles",
    "extras",
    "bebidas",
    "desechables",
];

fn production_rank(category: Option<&str>) -> usize {
    match category {
        Some(label) => {
            let folded = fold(label);
            PRODUCTION_ORDER
                .iter()
                .position(|known| *known == folded)
                // Unknown categories sort after the known block
                .unwrap_or(PRODUCTION_ORDER.len())
        }
        // Category-less rows go last
        None => PRODUCTION_ORDER.len() + 1,
    }
}

// =============================================================================
// Cut Report
// =============================================================================

/// The corte: every aggregate the operator report needs, for one range.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CutReport {
    pub range: DateRange,
    pub sale_count: u32,
    pub grand_total_cents: i64,
    pub payments: PaymentTotals,
    pub chicken: ChickenTotals,
    pub products: Vec<ProductRow>,
    pub extras: ExtrasTotals,
}

impl CutReport {
    /// Builds the report from the sales persisted in `range`.
    ///
    /// An empty slice yields a structurally complete zero-valued report.
    pub fn build(range: DateRange, sales: &[Sale]) -> CutReport {
        let mut payments = PaymentTotals::default();
        let mut chicken = ChickenTotals::default();
        let mut extras = ExtrasTotals::default();
        let mut groups: HashMap<(Option<String>, String), ProductRow> = HashMap::new();
        let mut grand_total_cents = 0i64;

        for sale in sales {
            grand_total_cents += sale.total_cents;
            payments.record(&sale.payment_method, sale.total_cents);

            for item in &sale.items {
                let category = item.category.as_deref();

                if counts_as_chicken(&item.name, category) {
                    chicken.add(ChickenUnit::classify_name(&item.name), item.quantity);
                }

                extras.record(&item.name, category, item.quantity);

                let name = item.grouping_name();
                let row = groups
                    .entry((item.category.clone(), name.clone()))
                    .or_insert_with(|| ProductRow {
                        category: item.category.clone(),
                        name,
                        quantity: 0,
                        subtotal_cents: 0,
                    });
                row.quantity += item.quantity;
                row.subtotal_cents += item.subtotal_cents;
            }
        }

        let mut products: Vec<ProductRow> = groups.into_values().collect();
        products.sort_by(|a, b| {
            production_rank(a.category.as_deref())
                .cmp(&production_rank(b.category.as_deref()))
                .then_with(|| {
                    // Alphabetical only matters among unknown categories
                    let fa = a.category.as_deref().map(fold).unwrap_or_default();
                    let fb = b.category.as_deref().map(fold).unwrap_or_default();
                    fa.cmp(&fb)
                })
                .then_with(|| b.quantity.cmp(&a.quantity))
                .then_with(|| a.name.cmp(&b.name))
        });

        CutReport {
            range,
            sale_count: sales.len() as u32,
            grand_total_cents,
            payments,
            chicken,
            products,
            extras,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::SaleItem;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn item(name: &str, category: Option<&str>, qty: i64, unit_price_cents: i64) -> SaleItem {
        SaleItem {
            name: name.to_string(),
            clean_name: crate::normalize::strip_flavor_suffix(name),
            category: category.map(str::to_string),
            flavor: None,
            quantity: qty,
            unit_price_cents,
            subtotal_cents: qty * unit_price_cents,
        }
    }

    fn sale(id: &str, method: &str, items: Vec<SaleItem>) -> Sale {
        let total_cents = items.iter().map(|i| i.subtotal_cents).sum();
        Sale {
            id: id.to_string(),
            created_at: Utc::now(),
            items,
            total_cents,
            payment_method: method.to_string(),
            notes: None,
            cash_received_cents: None,
            change_cents: None,
        }
    }

    #[test]
    fn test_date_range() {
        let single = DateRange::single(day(6));
        assert!(single.contains(day(6)));
        assert!(!single.contains(day(7)));
        assert_eq!(single.label(), "06/08/2026");

        let range = DateRange::new(day(6), day(1));
        assert_eq!(range.from, day(1));
        assert_eq!(range.to, day(6));
        assert!(range.contains(day(3)));
        assert_eq!(range.label(), "del 01/08/2026 al 06/08/2026");
    }

    #[test]
    fn test_chicken_classification_rules() {
        // Categorized chicken counts
        assert!(counts_as_chicken("1/4 Pollo - Tamarindo", Some("Pollos")));
        // Package-included bucket counts
        assert!(counts_as_chicken("1/2 Pollo", Some("Incluido en paquete")));
        // Specialty exclusion wins even with a chicken name
        assert!(!counts_as_chicken("Peninsular 1 Pollo", Some("Especialidades")));
        // Other categories don't count
        assert!(!counts_as_chicken("Torta de Pollo", Some("Extras")));
        // Category-less rows count by name alone
        assert!(counts_as_chicken("Pollo Entero", None));
        assert!(!counts_as_chicken("Refresco 600ml", None));
    }

    #[test]
    fn test_chicken_totals_quarters_and_equivalent() {
        let sales = vec![sale(
            "s1",
            "cash",
            vec![
                item("1/4 Pollo - Tamarindo", Some("Pollos"), 3, 5_000),
                item("Peninsular 1 Pollo", Some("Especialidades"), 2, 21_000),
            ],
        )];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.chicken.quarter, 3);
        assert_eq!(report.chicken.whole, 0);
        assert_eq!(report.chicken.half, 0);
        assert!((report.chicken.equivalent() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_categoryless_whole_chicken() {
        let sales = vec![sale("s1", "cash", vec![item("Pollo Entero", None, 2, 15_000)])];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.chicken.whole, 2);
        assert!((report.chicken.equivalent() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payment_totals() {
        let sales = vec![
            sale("s1", "cash", vec![item("1/4 Pollo", Some("Pollos"), 3, 5_000)]),
            sale("s2", "card", vec![item("1 Pollo", Some("Pollos"), 2, 10_000)]),
            sale("s3", "transferencia", vec![item("1/4 Pollo", Some("Pollos"), 1, 5_000)]),
        ];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.payments.cash.total_cents, 15_000);
        assert_eq!(report.payments.cash.count, 1);
        assert_eq!(report.payments.card.total_cents, 20_000);
        assert_eq!(report.payments.card.count, 1);
        assert_eq!(report.payments.other.total_cents, 5_000);
        assert_eq!(report.payments.other.count, 1);
        assert_eq!(report.grand_total_cents, 40_000);
    }

    #[test]
    fn test_spanish_payment_labels_bucket_correctly() {
        let sales = vec![
            sale("s1", "Efectivo", vec![item("1/4 Pollo", Some("Pollos"), 1, 15_000)]),
            sale("s2", "Tarjeta", vec![item("1 Pollo", Some("Pollos"), 1, 20_000)]),
        ];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.payments.cash.total_cents, 15_000);
        assert_eq!(report.payments.card.total_cents, 20_000);
        assert_eq!(report.payments.other.count, 0);
    }

    #[test]
    fn test_rollup_groups_flavors_together() {
        let one_sale = || {
            sale(
                "s",
                "cash",
                vec![
                    item("1/4 Pollo - BBQ", Some("Pollos"), 1, 5_000),
                    item("1/4 Pollo - Tamarindo", Some("Pollos"), 1, 5_000),
                ],
            )
        };
        let sales = vec![one_sale(), one_sale()];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.products.len(), 1);
        let row = &report.products[0];
        assert_eq!(row.category.as_deref(), Some("Pollos"));
        assert_eq!(row.name, "1/4 Pollo");
        assert_eq!(row.quantity, 4);
        assert_eq!(row.subtotal_cents, 20_000);
    }

    #[test]
    fn test_production_order_with_unknown_category() {
        let sales = vec![sale(
            "s1",
            "cash",
            vec![
                item("Agua 1L", Some("Bebidas"), 1, 2_000),
                item("Postre del día", Some("Postres"), 1, 4_000),
                item("Brasa Familiar - BBQ", Some("Paquetes"), 1, 32_000),
                item("1/4 Pollo - BBQ", Some("Pollos"), 5, 5_000),
            ],
        )];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        let categories: Vec<Option<&str>> =
            report.products.iter().map(|r| r.category.as_deref()).collect();
        assert_eq!(
            categories,
            vec![
                Some("Pollos"),
                Some("Paquetes"),
                Some("Bebidas"),
                Some("Postres"), // unknown appended after known block
            ]
        );
    }

    #[test]
    fn test_extras_buckets_stay_separate() {
        let sales = vec![sale(
            "s1",
            "cash",
            vec![
                item("Tortillas", Some("Extras"), 3, 1_500),
                item("Tortillas", Some("Incluido en paquete"), 2, 0),
                item("Cubiertos desechables", Some("Desechables"), 4, 500),
            ],
        )];

        let report = CutReport::build(DateRange::single(day(6)), &sales);
        assert_eq!(report.extras.paid_quantity, 3);
        assert_eq!(report.extras.included_quantity, 2);
        assert_eq!(report.extras.disposables_quantity, 4);
    }

    #[test]
    fn test_empty_range_is_zero_valued() {
        let report = CutReport::build(DateRange::single(day(6)), &[]);

        assert_eq!(report.sale_count, 0);
        assert_eq!(report.grand_total_cents, 0);
        assert_eq!(report.payments, PaymentTotals::default());
        assert_eq!(report.chicken, ChickenTotals::default());
        assert!(report.products.is_empty());
        assert_eq!(report.extras, ExtrasTotals::default());
    }
}
