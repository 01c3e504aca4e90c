//! # brasa-db: Database Layer for Brasa POS
//!
//! SQLite storage behind the contracts the core consumes: catalog reads,
//! atomic sale persistence and date-range sale queries for the corte.
//!
//! ## Data Flow
//! ```text
//!   command layer
//!        │
//!        ▼
//!   brasa-db (THIS CRATE)
//!   ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//!   │   Database   │   │  Repositories  │   │  Migrations  │
//!   │   (pool.rs)  │◄──│ catalog / sale │   │  (embedded)  │
//!   └──────────────┘   └────────────────┘   └──────────────┘
//!        │
//!        ▼
//!   SQLite file (WAL mode)
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog and sale repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brasa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/brasa.db")).await?;
//! let products = db.catalog().list_products().await?;
//! let stored = db.sales().persist_sale(&finalized).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::sale::{SaleRepository, StoredSale};
