//! # Cart Builder
//!
//! Converts a catalog selection plus operator-supplied modifiers into a
//! priced, uniquely-keyed line item and merges it into the running cart.
//!
//! The cart is an explicit value owned by the caller; there is no ambient
//! cart state. Every mutation keeps the line invariant
//! `subtotal == quantity * unit_price`.
//!
//! ## Uniqueness Key
//! A line's key is `product_id|flavors|option|promo` with explicit
//! sentinels for the empty parts. Two selections merge only when the whole
//! key matches: same product with a different flavor, option or promo flag
//! stays a separate line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Product, ProductCategory};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::normalize::strip_flavor_suffix;
use crate::options::CustomOption;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Sentinel key segment for a selection without flavor.
const NO_FLAVOR_KEY: &str = "sin-sabor";
/// Sentinel key segment for a selection without custom option.
const NO_OPTION_KEY: &str = "sin-opcion";

// =============================================================================
// Modifiers
// =============================================================================

/// One flavor-bearing portion within a multi-portion selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SlotChoice {
    /// A plain flavor from the flavor list.
    PlainFlavor(String),
    /// The slot upgraded to a specialty, at a per-slot upcharge.
    UpgradedSpecialty { name: String, upcharge_cents: i64 },
}

impl SlotChoice {
    fn name(&self) -> &str {
        match self {
            SlotChoice::PlainFlavor(name) => name,
            SlotChoice::UpgradedSpecialty { name, .. } => name,
        }
    }

    fn upcharge_cents(&self) -> i64 {
        match self {
            SlotChoice::PlainFlavor(_) => 0,
            SlotChoice::UpgradedSpecialty { upcharge_cents, .. } => *upcharge_cents,
        }
    }
}

/// Operator-supplied flavor modifiers for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Modifiers {
    /// The product takes no flavor.
    NoFlavor,
    /// A single flavor for a single-portion product.
    SingleFlavor(String),
    /// One choice per portion slot of a package.
    MultiSlot(Vec<SlotChoice>),
}

impl Modifiers {
    /// Resolved slot choices, rejecting blank flavor names.
    fn resolved(&self) -> CoreResult<Vec<SlotChoice>> {
        let slots: Vec<SlotChoice> = match self {
            Modifiers::NoFlavor => Vec::new(),
            Modifiers::SingleFlavor(name) => vec![SlotChoice::PlainFlavor(name.clone())],
            Modifiers::MultiSlot(choices) => choices.clone(),
        };

        for (idx, slot) in slots.iter().enumerate() {
            if slot.name().trim().is_empty() {
                return Err(CoreError::EmptyFlavorSlot { slot: idx + 1 });
            }
        }

        Ok(slots)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// A catalog selection ready to become a cart line.
///
/// The caller resolves the custom option (if the product has an option
/// set) and the promo flag before building the selection.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub product: &'a Product,
    pub modifiers: Modifiers,
    pub option: Option<CustomOption>,
    pub promo: bool,
}

impl<'a> Selection<'a> {
    /// A plain selection with no flavor, option or promo.
    pub fn plain(product: &'a Product) -> Self {
        Selection {
            product,
            modifiers: Modifiers::NoFlavor,
            option: None,
            promo: false,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the in-progress sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Uniqueness key; lines merge only on full key equality.
    pub key: String,

    /// Display name with flavor/option/promo text embedded, for print.
    pub display_name: String,

    /// Flavor-free product name, keeps report grouping from fragmenting.
    pub clean_name: String,

    /// Quantity, never below 1.
    pub quantity: i64,

    /// Unit price in centavos, upgrade upcharges already applied.
    pub unit_price_cents: i64,

    /// Line subtotal, always `quantity * unit_price_cents`.
    pub subtotal_cents: i64,

    /// Chosen flavor per slot (or the product's fixed flavor).
    pub flavors: Vec<String>,

    /// Whether a promotional pack was used.
    pub is_promo: bool,

    /// Chosen custom option id, if any.
    pub option_id: Option<String>,

    /// Category snapshot from the product.
    pub category: ProductCategory,
}

impl CartItem {
    /// Builds a line item from a selection.
    ///
    /// Policy, in order: validate flavor slots against the product's
    /// requirement, apply upgrade upcharges to the unit price, build the
    /// uniqueness key and display name, start at quantity 1.
    ///
    /// `required_slots` comes from [`crate::catalog::PackageIndex::flavor_slots`].
    pub fn from_selection(selection: &Selection<'_>, required_slots: u32) -> CoreResult<CartItem> {
        let product = selection.product;
        let slots = selection.modifiers.resolved()?;

        if product.requires_flavor && slots.len() as u32 != required_slots {
            return Err(CoreError::UnresolvedFlavorSlots {
                expected: required_slots,
                resolved: slots.len() as u32,
            });
        }

        let chosen: Vec<String> = slots.iter().map(|s| s.name().to_string()).collect();
        let upcharge: i64 = slots.iter().map(|s| s.upcharge_cents()).sum();
        let unit_price_cents = product.price_cents + upcharge;

        // Fixed-flavor products carry their flavor as metadata without
        // echoing it in the display name.
        let flavors = if chosen.is_empty() {
            product.fixed_flavor.clone().into_iter().collect()
        } else {
            chosen.clone()
        };

        let mut display_name = product.name.clone();
        if !chosen.is_empty() {
            display_name.push_str(" - ");
            display_name.push_str(&chosen.join(" / "));
        } else if product.requires_flavor {
            // Unreachable once slot validation holds; kept for print safety.
            display_name.push_str(" - Sin sabor");
        }
        if let Some(option) = &selection.option {
            display_name.push_str(&format!(" ({})", option.label));
        }
        if selection.promo {
            display_name.push_str(" (PROMO)");
        }

        let flavor_key = if flavors.is_empty() {
            NO_FLAVOR_KEY.to_string()
        } else {
            flavors.join("+")
        };
        let option_key = selection
            .option
            .as_ref()
            .map(|o| o.id.as_str())
            .unwrap_or(NO_OPTION_KEY);
        let promo_key = if selection.promo { "promo" } else { "normal" };
        let key = format!("{}|{}|{}|{}", product.id, flavor_key, option_key, promo_key);

        Ok(CartItem {
            key,
            display_name,
            clean_name: strip_flavor_suffix(&product.name),
            quantity: 1,
            unit_price_cents,
            subtotal_cents: unit_price_cents,
            flavors,
            is_promo: selection.promo,
            option_id: selection.option.as_ref().map(|o| o.id.clone()),
            category: product.category,
        })
    }

    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    fn recompute_subtotal(&mut self) {
        self.subtotal_cents = self.quantity * self.unit_price_cents;
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale.
///
/// ## Invariants
/// - Lines are unique by key; adding an identical selection merges
/// - `subtotal == quantity * unit_price` after every mutation
/// - Quantity never drops below 1 through decrement
/// - Non-merged lines are ordered most-recently-added first
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a line from the selection and merges it into the cart.
    ///
    /// Returns the merged-or-created line.
    pub fn add_selection(
        &mut self,
        selection: &Selection<'_>,
        required_slots: u32,
    ) -> CoreResult<&CartItem> {
        let item = CartItem::from_selection(selection, required_slots)?;
        self.merge_or_prepend(item)
    }

    /// Merges `item` into an existing line with the same key, or prepends
    /// it as the newest line.
    pub fn merge_or_prepend(&mut self, item: CartItem) -> CoreResult<&CartItem> {
        if let Some(pos) = self.items.iter().position(|line| line.key == item.key) {
            let new_qty = self.items[pos].quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            let line = &mut self.items[pos];
            line.quantity = new_qty;
            line.recompute_subtotal();
            return Ok(&self.items[pos]);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.insert(0, item);
        Ok(&self.items[0])
    }

    /// Increases a line's quantity by one.
    pub fn increment(&mut self, key: &str) -> CoreResult<()> {
        let line = self.line_mut(key)?;
        if line.quantity + 1 > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: line.quantity + 1,
                max: MAX_ITEM_QUANTITY,
            });
        }
        line.quantity += 1;
        line.recompute_subtotal();
        Ok(())
    }

    /// Decreases a line's quantity by one, flooring at 1.
    ///
    /// Removal is a separate explicit operation; decrement never deletes.
    pub fn decrement(&mut self, key: &str) -> CoreResult<()> {
        let line = self.line_mut(key)?;
        if line.quantity > 1 {
            line.quantity -= 1;
            line.recompute_subtotal();
        }
        Ok(())
    }

    /// Deletes a line entirely, regardless of quantity.
    pub fn remove(&mut self, key: &str) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|line| line.key != key);
        if self.items.len() == before {
            return Err(CoreError::CartLineNotFound(key.to_string()));
        }
        Ok(())
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines (not total quantity).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Cart total in centavos, recomputed from the line subtotals.
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(|line| line.subtotal_cents).sum()
    }

    /// Cart total as Money.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents())
    }

    fn line_mut(&mut self, key: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|line| line.key == key)
            .ok_or_else(|| CoreError::CartLineNotFound(key.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
