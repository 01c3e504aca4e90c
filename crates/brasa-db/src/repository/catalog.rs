//! # Catalog Repository
//!
//! Read access to products, flavors and package contents. The sale flow
//! only ever reads the catalog; administration edits it through its own
//! forms and the soft-delete flags keep history intact.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use brasa_core::{Flavor, IncludedExtra, PackageContents, PackageIndex, Product, ProductCategory};

// =============================================================================
// Row Types
// =============================================================================

/// Raw product row; the category label decodes separately so an unknown
/// label surfaces as a corrupt-row error instead of a panic.
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: String,
    price_cents: i64,
    requires_flavor: bool,
    is_promo_pack: bool,
    description: Option<String>,
    fixed_flavor: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Product> {
        let category = ProductCategory::from_label(&row.category).ok_or_else(|| {
            DbError::corrupt(
                "products",
                format!("unknown category '{}' on product {}", row.category, row.id),
            )
        })?;

        Ok(Product {
            id: row.id,
            name: row.name,
            category,
            price_cents: row.price_cents,
            requires_flavor: row.requires_flavor,
            is_promo_pack: row.is_promo_pack,
            description: row.description,
            fixed_flavor: row.fixed_flavor,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct FlavorRow {
    id: String,
    name: String,
    is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
struct IncludeRow {
    package_name: String,
    extra_name: String,
    quantity: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog reads.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// All non-deleted products, ordered by name.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        debug!("listing active products");

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, price_cents, requires_flavor, is_promo_pack,
                   description, fixed_flavor, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// One product by id, active or not (tickets reprint history).
    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, price_cents, requires_flavor, is_promo_pack,
                   description, fixed_flavor, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// All non-deleted flavors, ordered by name.
    pub async fn list_flavors(&self) -> DbResult<Vec<Flavor>> {
        debug!("listing active flavors");

        let rows: Vec<FlavorRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active
            FROM flavors
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Flavor {
                id: row.id,
                name: row.name,
                is_active: row.is_active,
            })
            .collect())
    }

    /// Package contents for every active package, extras in listed order.
    pub async fn list_package_contents(&self) -> DbResult<Vec<PackageContents>> {
        debug!("listing package contents");

        let rows: Vec<IncludeRow> = sqlx::query_as(
            r#"
            SELECT p.name AS package_name, i.extra_name, i.quantity
            FROM product_includes i
            JOIN products p ON p.id = i.product_id
            WHERE p.is_active = 1
            ORDER BY p.name, i.position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut contents: Vec<PackageContents> = Vec::new();
        for row in rows {
            match contents.last_mut() {
                Some(last) if last.package_name == row.package_name => {
                    last.extras.push(IncludedExtra {
                        name: row.extra_name,
                        quantity: row.quantity,
                    });
                }
                _ => contents.push(PackageContents {
                    package_name: row.package_name,
                    extras: vec![IncludedExtra {
                        name: row.extra_name,
                        quantity: row.quantity,
                    }],
                }),
            }
        }

        Ok(contents)
    }

    /// Builds the in-memory package index the cart builder consults.
    pub async fn load_package_index(&self) -> DbResult<PackageIndex> {
        Ok(PackageIndex::new(self.list_package_contents().await?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(
        db: &Database,
        id: &str,
        name: &str,
        category: &str,
        price_cents: i64,
        requires_flavor: bool,
        is_active: bool,
    ) {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price_cents, requires_flavor,
                                  is_promo_pack, description, fixed_flavor, is_active,
                                  created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, NULL, NULL, ?6, ?7, ?7)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(price_cents)
        .bind(requires_flavor)
        .bind(is_active)
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();
    }

    async fn seed_include(db: &Database, product_id: &str, position: i64, extra: &str, qty: i64) {
        sqlx::query(
            "INSERT INTO product_includes (product_id, position, extra_name, quantity) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(product_id)
        .bind(position)
        .bind(extra)
        .bind(qty)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_products_skips_deleted() {
        let db = test_db().await;
        seed_product(&db, "p1", "1/4 Pollo", "Pollos", 6_500, true, true).await;
        seed_product(&db, "p2", "Producto Viejo", "Extras", 1_000, false, false).await;

        let products = db.catalog().list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "1/4 Pollo");
        assert_eq!(products[0].category, ProductCategory::Pollos);
        assert!(products[0].requires_flavor);

        // Soft-deleted rows stay reachable by id for history
        let old = db.catalog().get_product("p2").await.unwrap().unwrap();
        assert!(!old.is_active);
    }

    #[tokio::test]
    async fn test_unknown_category_is_corrupt_row() {
        let db = test_db().await;
        seed_product(&db, "p1", "Misterio", "Inexistente", 1_000, false, true).await;

        let err = db.catalog().list_products().await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { .. }));
    }

    #[tokio::test]
    async fn test_list_flavors() {
        let db = test_db().await;
        for (id, name, active) in [
            ("f1", "Tamarindo", true),
            ("f2", "BBQ", true),
            ("f3", "Descontinuado", false),
        ] {
            sqlx::query("INSERT INTO flavors (id, name, is_active) VALUES (?1, ?2, ?3)")
                .bind(id)
                .bind(name)
                .bind(active)
                .execute(db.pool())
                .await
                .unwrap();
        }

        let flavors = db.catalog().list_flavors().await.unwrap();
        let names: Vec<&str> = flavors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["BBQ", "Tamarindo"]);
    }

    #[tokio::test]
    async fn test_package_contents_and_index() {
        let db = test_db().await;
        seed_product(&db, "pkg", "Brasa Familiar", "Paquetes", 32_000, true, true).await;
        seed_include(&db, "pkg", 0, "1 Pollo", 1).await;
        seed_include(&db, "pkg", 1, "1/2 Pollo", 1).await;
        seed_include(&db, "pkg", 2, "Refresco 2L", 1).await;

        let contents = db.catalog().list_package_contents().await.unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].package_name, "Brasa Familiar");
        assert_eq!(contents[0].extras.len(), 3);
        assert_eq!(contents[0].extras[0].name, "1 Pollo");

        // 1 whole + 1 half chicken -> 2 flavor slots
        let index = db.catalog().load_package_index().await.unwrap();
        let package = db.catalog().get_product("pkg").await.unwrap().unwrap();
        assert_eq!(index.flavor_slots(&package), 2);
    }
}
