//! # Pricing / Change Calculator
//!
//! Cart total, cash validation, change and quick-cash suggestions.
//!
//! The total is always recomputed from the line subtotals; nothing here
//! caches across cart mutations.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Denominations used to build quick-cash suggestions, in pesos.
const QUICK_CASH_DENOMINATIONS: [i64; 5] = [10, 50, 100, 200, 500];

/// Fallback suggestions shown while the cart is still empty, in pesos.
const DEFAULT_SUGGESTIONS: [i64; 4] = [50, 100, 200, 500];

/// Maximum number of quick-cash buttons the tender screen shows.
const MAX_SUGGESTIONS: usize = 5;

/// Cart total, recomputed from the line subtotals.
pub fn cart_total(cart: &Cart) -> Money {
    cart.total()
}

/// Validates cash received against the total, returning the change due.
///
/// For a positive total the amount received must cover it; otherwise the
/// checkout is refused with [`CoreError::InsufficientCash`] and the cart
/// stays untouched for a retry.
///
/// ## Example
/// ```rust
/// use brasa_core::money::Money;
/// use brasa_core::pricing::validate_cash_received;
///
/// let change = validate_cash_received(Money::from_pesos(100), Money::from_pesos(150)).unwrap();
/// assert_eq!(change, Money::from_pesos(50));
/// assert!(validate_cash_received(Money::from_pesos(100), Money::from_pesos(50)).is_err());
/// ```
pub fn validate_cash_received(total: Money, received: Money) -> CoreResult<Money> {
    if total.is_positive() && received < total {
        return Err(CoreError::InsufficientCash {
            total_cents: total.cents(),
            received_cents: received.cents(),
        });
    }
    Ok(change_due(total, received))
}

/// Change due: `max(0, received - total)`.
pub fn change_due(total: Money, received: Money) -> Money {
    let diff = received - total;
    if diff.is_negative() {
        Money::zero()
    } else {
        diff
    }
}

/// Plausible cash-tendered amounts for the quick buttons.
///
/// For a non-positive total returns the fixed default set. Otherwise the
/// total is rounded up at each denomination (10, 50, 100, 200, 500 pesos),
/// de-duplicated keeping first occurrence, filtered to positive values and
/// capped at five suggestions.
///
/// ## Example
/// ```rust
/// use brasa_core::money::Money;
/// use brasa_core::pricing::quick_cash_suggestions;
///
/// let suggestions = quick_cash_suggestions(Money::from_pesos(137));
/// assert!(suggestions.contains(&Money::from_pesos(140)));
/// assert!(suggestions.contains(&Money::from_pesos(200)));
/// ```
pub fn quick_cash_suggestions(total: Money) -> Vec<Money> {
    if !total.is_positive() {
        return DEFAULT_SUGGESTIONS
            .iter()
            .map(|&pesos| Money::from_pesos(pesos))
            .collect();
    }

    let mut suggestions: Vec<Money> = Vec::new();
    for &pesos in &QUICK_CASH_DENOMINATIONS {
        let rounded = total.round_up_to(Money::from_pesos(pesos));
        if rounded.is_positive() && !suggestions.contains(&rounded) {
            suggestions.push(rounded);
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }

    suggestions
}

// =============================================================================
// Unit Tests
// =============================================================================
