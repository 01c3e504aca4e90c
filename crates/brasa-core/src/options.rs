//! # Custom Options
//!
//! Some products carry a small named list of sub-choices (e.g. which side
//! dish a "Brasa" plate comes with). Each choice maps to an internal
//! production name used for kitchen counting.
//!
//! The option table and the product catalog are maintained independently,
//! so lookups tolerate naming drift through the normalization chain:
//! exact, case/accent-insensitive, then leading-qualifier stripped. A miss
//! simply means the product has no option prompt; it never blocks a sale.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::normalize::NormalizedIndex;

/// One selectable sub-choice of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomOption {
    /// Stable identifier, part of the cart uniqueness key.
    pub id: String,

    /// Label appended to the cart display name, e.g. "Papas".
    pub label: String,

    /// Internal extra name used for production counting.
    pub production_name: String,
}

/// The named option list registered for one product name.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionSet {
    /// Product name this set is keyed under.
    pub product_name: String,
    pub options: Vec<CustomOption>,
}

impl OptionSet {
    /// Finds an option by its id.
    pub fn get(&self, option_id: &str) -> Option<&CustomOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// All registered option sets, indexed once at load time.
#[derive(Debug, Clone)]
pub struct OptionCatalog {
    index: NormalizedIndex<OptionSet>,
}

impl OptionCatalog {
    /// Builds the catalog from the option table.
    pub fn new(sets: Vec<OptionSet>) -> Self {
        OptionCatalog {
            index: NormalizedIndex::build(sets, |s| s.product_name.as_str()),
        }
    }

    /// An empty catalog (no product prompts for options).
    pub fn empty() -> Self {
        OptionCatalog::new(Vec::new())
    }

    /// Option set for a product name, walking the fallback chain.
    ///
    /// `None` means the product has no custom-option prompt.
    pub fn options_for(&self, product_name: &str) -> Option<&OptionSet> {
        self.index.get(product_name)
    }

    /// Resolves a chosen option id for a product name.
    pub fn resolve(&self, product_name: &str, option_id: &str) -> Option<&CustomOption> {
        self.options_for(product_name)
            .and_then(|set| set.get(option_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
