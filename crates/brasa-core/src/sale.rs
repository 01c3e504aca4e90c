//! # Sale Records
//!
//! A finalized transaction and its flattened line-item snapshots.
//!
//! Line items freeze name, price, category and flavor at the moment of
//! sale. Once persisted a sale is immutable history: reports read it back
//! exactly as stored, never re-derived from the current catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::normalize::strip_flavor_suffix;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl PaymentMethod {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Item Snapshot
// =============================================================================

/// A flattened line item as persisted with its sale.
///
/// `category` and `flavor` are optional: rows persisted by older builds
/// (production-only tickets) may carry neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    /// Display name at time of sale, flavor text embedded.
    pub name: String,

    /// Flavor-free name used for report grouping.
    pub clean_name: String,

    /// Category label at time of sale, as stored.
    pub category: Option<String>,

    /// Chosen flavor text, if any.
    pub flavor: Option<String>,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in centavos at time of sale.
    pub unit_price_cents: i64,

    /// Line subtotal (unit price x quantity).
    pub subtotal_cents: i64,
}

impl SaleItem {
    /// Clean grouping name, falling back to stripping the display name for
    /// rows persisted before the clean name column existed.
    pub fn grouping_name(&self) -> String {
        if self.clean_name.trim().is_empty() {
            strip_flavor_suffix(&self.name)
        } else {
            self.clean_name.clone()
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A persisted sale, read back for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub items: Vec<SaleItem>,

    pub total_cents: i64,

    /// Payment method exactly as stored. Rows may predate the payment
    /// column; reports bucket unrecognized values separately.
    pub payment_method: String,

    pub notes: Option<String>,

    /// Cash tendered; meaningful for cash payments only.
    pub cash_received_cents: Option<i64>,

    /// Change returned; meaningful for cash payments only.
    pub change_cents: Option<i64>,
}

// =============================================================================
// Finalized Sale
// =============================================================================

/// A checkout-validated cart snapshot, ready for the persistence boundary.
///
/// Building one performs the checkout preconditions (non-empty cart, cash
/// sufficiency) without touching the cart, so a refused checkout leaves
/// everything editable for a retry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalizedSale {
    pub items: Vec<SaleItem>,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    pub notes: Option<String>,
    pub cash_received_cents: Option<i64>,
    pub change_cents: Option<i64>,
}

impl FinalizedSale {
    /// Validates and snapshots a cart for persistence.
    ///
    /// ## Rules
    /// - The cart must not be empty
    /// - Cash payments require the amount received, which must cover the
    ///   total; change is computed here
    /// - Card payments carry no received/change amounts
    pub fn from_cart(
        cart: &Cart,
        payment: PaymentMethod,
        notes: Option<String>,
        cash_received: Option<Money>,
    ) -> CoreResult<FinalizedSale> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = cart.total();
        let (received, change) = match payment {
            PaymentMethod::Cash => {
                let received = cash_received.ok_or(CoreError::MissingCashReceived)?;
                let change = crate::pricing::validate_cash_received(total, received)?;
                (Some(received.cents()), Some(change.cents()))
            }
            PaymentMethod::Card => (None, None),
        };

        let items = cart
            .items
            .iter()
            .map(|line| SaleItem {
                name: line.display_name.clone(),
                clean_name: line.clean_name.clone(),
                category: Some(line.category.as_str().to_string()),
                flavor: if line.flavors.is_empty() {
                    None
                } else {
                    Some(line.flavors.join(" / "))
                },
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.subtotal_cents,
            })
            .collect();

        Ok(FinalizedSale {
            items,
            total_cents: total.cents(),
            payment,
            notes,
            cash_received_cents: received,
            change_cents: change,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Modifiers, Selection};
    use crate::catalog::{Product, ProductCategory};

    fn quarter() -> Product {
        Product {
            id: "id-cuarto".to_string(),
            name: "1/4 Pollo".to_string(),
            category: ProductCategory::Pollos,
            price_cents: 6_500,
            requires_flavor: true,
            is_promo_pack: false,
            description: None,
            fixed_flavor: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cart_with_quarter() -> Cart {
        let product = quarter();
        let mut cart = Cart::new();
        cart.add_selection(
            &Selection {
                product: &product,
                modifiers: Modifiers::SingleFlavor("Tamarindo".to_string()),
                option: None,
                promo: false,
            },
            1,
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_cash_checkout_computes_change() {
        let cart = cart_with_quarter();

        let sale = FinalizedSale::from_cart(
            &cart,
            PaymentMethod::Cash,
            None,
            Some(Money::from_pesos(100)),
        )
        .unwrap();

        assert_eq!(sale.total_cents, 6_500);
        assert_eq!(sale.cash_received_cents, Some(10_000));
        assert_eq!(sale.change_cents, Some(3_500));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].name, "1/4 Pollo - Tamarindo");
        assert_eq!(sale.items[0].clean_name, "1/4 Pollo");
        assert_eq!(sale.items[0].category.as_deref(), Some("Pollos"));
        assert_eq!(sale.items[0].flavor.as_deref(), Some("Tamarindo"));
    }

    #[test]
    fn test_insufficient_cash_refused() {
        let cart = cart_with_quarter();

        let err = FinalizedSale::from_cart(
            &cart,
            PaymentMethod::Cash,
            None,
            Some(Money::from_pesos(50)),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientCash { .. }));

        let err =
            FinalizedSale::from_cart(&cart, PaymentMethod::Cash, None, None).unwrap_err();
        assert!(matches!(err, CoreError::MissingCashReceived));
    }

    #[test]
    fn test_card_checkout_has_no_cash_fields() {
        let cart = cart_with_quarter();

        let sale = FinalizedSale::from_cart(&cart, PaymentMethod::Card, None, None).unwrap();
        assert_eq!(sale.cash_received_cents, None);
        assert_eq!(sale.change_cents, None);
    }

    #[test]
    fn test_empty_cart_refused() {
        let err =
            FinalizedSale::from_cart(&Cart::new(), PaymentMethod::Card, None, None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_grouping_name_fallback() {
        let legacy = SaleItem {
            name: "1/4 Pollo - BBQ".to_string(),
            clean_name: String::new(),
            category: None,
            flavor: None,
            quantity: 1,
            unit_price_cents: 6_500,
            subtotal_cents: 6_500,
        };
        assert_eq!(legacy.grouping_name(), "1/4 Pollo");
    }
}
