//! # brasa-core: Pure Business Logic for Brasa POS
//!
//! This crate is the heart of Brasa POS: every sale-composition and
//! reporting rule lives here as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//!   UI / IPC layer
//!        │
//!        ▼
//!   ★ brasa-core (THIS CRATE) ★
//!   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────┐
//!   │  catalog  │ │   cart    │ │  pricing  │ │  report   │
//!   │  options  │ │ Modifiers │ │ quick cash│ │  corte    │
//!   └───────────┘ └───────────┘ └───────────┘ └───────────┘
//!   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS
//!        │
//!        ▼
//!   brasa-db (SQLite repositories)
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Products, categories, flavors, package contents
//! - [`normalize`] - Folding, qualifier stripping, chicken-unit heuristics
//! - [`options`] - Custom-option sets with drift-tolerant lookup
//! - [`cart`] - Cart builder and line-item merge semantics
//! - [`pricing`] - Totals, cash validation, quick-cash suggestions
//! - [`sale`] - Finalized sale snapshots and payment methods
//! - [`report`] - Corte aggregation engine
//! - [`ticket`] - Print data contracts and plain-text rendering
//! - [`money`] - Integer centavo arithmetic (no floating point)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, every time
//! 2. **No I/O**: database, network and file access are forbidden here
//! 3. **Integer Money**: all monetary values are centavos (i64)
//! 4. **Explicit Errors**: typed errors, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod normalize;
pub mod options;
pub mod pricing;
pub mod report;
pub mod sale;
pub mod ticket;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, Modifiers, Selection, SlotChoice};
pub use catalog::{
    Flavor, IncludedExtra, PackageContents, PackageIndex, Product, ProductCategory,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use options::{CustomOption, OptionCatalog, OptionSet};
pub use report::{ChickenTotals, CutReport, DateRange, PaymentTotals};
pub use sale::{FinalizedSale, PaymentMethod, Sale, SaleItem};
pub use ticket::{CutTicket, SaleTicket};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// Keeps runaway carts out of the UI; one register, one operator.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Catches fat-finger quantities (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of the free-text note on a sale.
pub const MAX_NOTES_LEN: usize = 500;
