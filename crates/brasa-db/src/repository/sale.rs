//! # Sale Repository
//!
//! The one mutation boundary of the system: a finalized cart becomes a
//! sale row plus its item snapshots in a single transaction. Everything
//! else here is read-only range queries for the corte.
//!
//! A failed persist surfaces synchronously; the caller's cart is a
//! separate value and stays editable for the retry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use brasa_core::{DateRange, FinalizedSale, Sale, SaleItem};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, Clone, FromRow)]
struct SaleRow {
    id: String,
    created_at: DateTime<Utc>,
    total_cents: i64,
    payment_method: String,
    notes: Option<String>,
    cash_received_cents: Option<i64>,
    change_cents: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
struct ItemRow {
    sale_id: String,
    name: String,
    clean_name: String,
    category: Option<String>,
    flavor: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

impl From<ItemRow> for SaleItem {
    fn from(row: ItemRow) -> SaleItem {
        SaleItem {
            name: row.name,
            clean_name: row.clean_name,
            category: row.category,
            flavor: row.flavor,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            subtotal_cents: row.subtotal_cents,
        }
    }
}

fn assemble(row: SaleRow, items: Vec<SaleItem>) -> Sale {
    Sale {
        id: row.id,
        created_at: row.created_at,
        items,
        total_cents: row.total_cents,
        payment_method: row.payment_method,
        notes: row.notes,
        cash_received_cents: row.cash_received_cents,
        change_cents: row.change_cents,
    }
}

// =============================================================================
// Stored Sale
// =============================================================================

/// Receipt of a successful persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSale {
    pub id: String,
    pub total_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale persistence and range reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a finalized sale and its item snapshots atomically.
    ///
    /// Assigns the sale id and timestamp here; the snapshot items are
    /// stored exactly as validated, never re-derived from the catalog.
    pub async fn persist_sale(&self, sale: &FinalizedSale) -> DbResult<StoredSale> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(sale_id = %id, items = sale.items.len(), "persisting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, created_at, total_cents, payment_method, notes,
                               cash_received_cents, change_cents)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(now)
        .bind(sale.total_cents)
        .bind(sale.payment.as_str())
        .bind(&sale.notes)
        .bind(sale.cash_received_cents)
        .bind(sale.change_cents)
        .execute(&mut *tx)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, position, name, clean_name, category,
                                        flavor, quantity, unit_price_cents, subtotal_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(position as i64)
            .bind(&item.name)
            .bind(&item.clean_name)
            .bind(&item.category)
            .bind(&item.flavor)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(sale_id = %id, total = sale.total_cents, "sale persisted");

        Ok(StoredSale {
            id,
            total_cents: sale.total_cents,
        })
    }

    /// One sale with its items, for ticket reprint.
    pub async fn get_sale(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, created_at, total_cents, payment_method, notes,
                   cash_received_cents, change_cents
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT sale_id, name, clean_name, category, flavor, quantity,
                   unit_price_cents, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(assemble(
            row,
            items.into_iter().map(SaleItem::from).collect(),
        )))
    }

    /// All sales whose calendar day falls inside `range`, inclusive on
    /// both ends, with their flattened items as stored at sale time.
    ///
    /// Dates compare against `date(created_at)`; the caller already
    /// normalized the range to the deployment's local day.
    pub async fn sales_in_range(&self, range: DateRange) -> DbResult<Vec<Sale>> {
        let from = range.from.format("%Y-%m-%d").to_string();
        let to = range.to.format("%Y-%m-%d").to_string();

        debug!(from = %from, to = %to, "reading sales in range");

        let sale_rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, created_at, total_cents, payment_method, notes,
                   cash_received_cents, change_cents
            FROM sales
            WHERE date(created_at) BETWEEN ?1 AND ?2
            ORDER BY created_at
            "#,
        )
        .bind(&from)
        .bind(&to)
        .fetch_all(&self.pool)
        .await?;

        let item_rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT sale_id, name, clean_name, category, flavor, quantity,
                   unit_price_cents, subtotal_cents
            FROM sale_items
            WHERE sale_id IN (
                SELECT id FROM sales WHERE date(created_at) BETWEEN ?1 AND ?2
            )
            ORDER BY sale_id, position
            "#,
        )
        .bind(&from)
        .bind(&to)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for row in item_rows {
            items_by_sale
                .entry(row.sale_id.clone())
                .or_default()
                .push(SaleItem::from(row));
        }

        Ok(sale_rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                assemble(row, items)
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brasa_core::{
        Cart, CartItem, CutReport, Money, PaymentMethod, ProductCategory,
    };
    use chrono::NaiveDate;

    async fn test_db() -> Database {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn quarter_line(flavor: &str, quantity: i64) -> CartItem {
        CartItem {
            key: format!("id-cuarto|{}|sin-opcion|normal", flavor),
            display_name: format!("1/4 Pollo - {}", flavor),
            clean_name: "1/4 Pollo".to_string(),
            quantity,
            unit_price_cents: 6_500,
            subtotal_cents: quantity * 6_500,
            flavors: vec![flavor.to_string()],
            is_promo: false,
            option_id: None,
            category: ProductCategory::Pollos,
        }
    }

    fn finalized_cash_sale() -> FinalizedSale {
        let mut cart = Cart::new();
        cart.merge_or_prepend(quarter_line("Tamarindo", 2)).unwrap();
        FinalizedSale::from_cart(
            &cart,
            PaymentMethod::Cash,
            Some("sin salsa".to_string()),
            Some(Money::from_pesos(200)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_persist_and_get_sale() {
        let db = test_db().await;

        let stored = db.sales().persist_sale(&finalized_cash_sale()).await.unwrap();
        assert_eq!(stored.total_cents, 13_000);

        let sale = db.sales().get_sale(&stored.id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 13_000);
        assert_eq!(sale.payment_method, "cash");
        assert_eq!(sale.notes.as_deref(), Some("sin salsa"));
        assert_eq!(sale.cash_received_cents, Some(20_000));
        assert_eq!(sale.change_cents, Some(7_000));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].name, "1/4 Pollo - Tamarindo");
        assert_eq!(sale.items[0].category.as_deref(), Some("Pollos"));
        assert_eq!(sale.items[0].flavor.as_deref(), Some("Tamarindo"));

        assert!(db.sales().get_sale("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sales_in_range_inclusive_today() {
        let db = test_db().await;
        db.sales().persist_sale(&finalized_cash_sale()).await.unwrap();

        let today = Utc::now().date_naive();
        let sales = db
            .sales()
            .sales_in_range(DateRange::single(today))
            .await
            .unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].items.len(), 1);

        // A range entirely in the past finds nothing
        let past = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        );
        assert!(db.sales().sales_in_range(past).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_read_feeds_cut_report() {
        let db = test_db().await;
        db.sales().persist_sale(&finalized_cash_sale()).await.unwrap();

        let mut cart = Cart::new();
        cart.merge_or_prepend(quarter_line("BBQ", 1)).unwrap();
        let card_sale =
            FinalizedSale::from_cart(&cart, PaymentMethod::Card, None, None).unwrap();
        db.sales().persist_sale(&card_sale).await.unwrap();

        let today = Utc::now().date_naive();
        let range = DateRange::single(today);
        let sales = db.sales().sales_in_range(range).await.unwrap();
        let report = CutReport::build(range, &sales);

        assert_eq!(report.sale_count, 2);
        assert_eq!(report.grand_total_cents, 19_500);
        assert_eq!(report.payments.cash.count, 1);
        assert_eq!(report.payments.card.count, 1);
        // Both flavors collapse into one production row
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.products[0].name, "1/4 Pollo");
        assert_eq!(report.products[0].quantity, 3);
        assert_eq!(report.chicken.quarter, 3);
    }
}
