//! # Catalog Model
//!
//! DB-backed description of products, categories, flavors and
//! package-to-extras associations. Read-only at sale time; administration
//! edits it elsewhere.
//!
//! The category of a product determines whether it prompts for a flavor,
//! whether it can carry a fixed flavor, and whether package-included extras
//! apply to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::normalize::{self, ChickenUnit, NormalizedIndex};

// =============================================================================
// Product Category
// =============================================================================

/// Catalog categories, closed set.
///
/// Report classification over *persisted* category strings stays
/// substring-based (see the report module); this enum governs catalog
/// behavior for products that exist right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// Rotisserie chicken sold by the whole, half or quarter.
    Pollos,
    /// Finished specialty dishes, often with a flavor locked in.
    Especialidades,
    /// Multi-portion packages with included extras.
    Paquetes,
    /// Wednesday promotional variants.
    Miercoles,
    /// Paid sides and add-ons.
    Extras,
    /// Bottled and fountain drinks.
    Bebidas,
    /// Cutlery, containers, bags.
    Desechables,
}

impl ProductCategory {
    /// Canonical label as stored in the catalog and on sale snapshots.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Pollos => "Pollos",
            ProductCategory::Especialidades => "Especialidades",
            ProductCategory::Paquetes => "Paquetes",
            ProductCategory::Miercoles => "Miércoles",
            ProductCategory::Extras => "Extras",
            ProductCategory::Bebidas => "Bebidas",
            ProductCategory::Desechables => "Desechables",
        }
    }

    /// Parses a stored label, case/accent-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize::fold(label).as_str() {
            "pollos" => Some(ProductCategory::Pollos),
            "especialidades" => Some(ProductCategory::Especialidades),
            "paquetes" => Some(ProductCategory::Paquetes),
            "miercoles" => Some(ProductCategory::Miercoles),
            "extras" => Some(ProductCategory::Extras),
            "bebidas" => Some(ProductCategory::Bebidas),
            "desechables" => Some(ProductCategory::Desechables),
            _ => None,
        }
    }

    /// Whether products of this category prompt the operator for flavor.
    ///
    /// Specialties carry a fixed flavor baked into the product instead of
    /// prompting; the per-product `requires_flavor` flag stays
    /// authoritative at sale time.
    pub const fn prompts_flavor(&self) -> bool {
        matches!(
            self,
            ProductCategory::Pollos | ProductCategory::Paquetes | ProductCategory::Miercoles
        )
    }

    /// Whether package-included extras apply to this category.
    pub const fn has_included_extras(&self) -> bool {
        matches!(self, ProductCategory::Paquetes)
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the operator and on tickets.
    pub name: String,

    /// Category, governs flavor prompting and included-extra handling.
    pub category: ProductCategory,

    /// Price in centavos.
    pub price_cents: i64,

    /// Whether the operator must resolve flavor slot(s) before confirming.
    pub requires_flavor: bool,

    /// Whether this is a promotional pack variant.
    pub is_promo_pack: bool,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Flavor locked into the product (specialties only).
    pub fixed_flavor: Option<String>,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> crate::money::Money {
        crate::money::Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Flavor
// =============================================================================

/// A named flavor option, globally listed.
///
/// Flavor names are unique among active flavors.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    /// Whether the flavor is active (soft delete).
    pub is_active: bool,
}

// =============================================================================
// Package Contents
// =============================================================================

/// One extra bundled free within a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IncludedExtra {
    /// Extra product name as listed in the package table.
    pub name: String,
    /// How many of it the package includes.
    pub quantity: i64,
}

/// A package product name and the ordered extras it includes for free.
///
/// Used both to derive how many flavor slots the package requires and to
/// tag its extras as included (not paid) in reporting.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PackageContents {
    /// Package product name (the lookup key; tolerant of naming drift).
    pub package_name: String,
    pub extras: Vec<IncludedExtra>,
}

impl PackageContents {
    /// Number of flavor slots this package requires.
    ///
    /// Each chicken-named included extra contributes its quantity times its
    /// chicken-unit equivalent (whole 1, half 0.5, quarter 0.25); the sum is
    /// rounded up to whole slots, minimum 1. Non-chicken extras contribute
    /// nothing.
    ///
    /// ## Example
    /// A package including 1 whole chicken and 1 half chicken needs
    /// ceil(1.5) = 2 flavor slots.
    pub fn flavor_slots(&self) -> u32 {
        let quarter_units: i64 = self
            .extras
            .iter()
            .filter(|extra| normalize::is_chicken_name(&extra.name))
            .map(|extra| extra.quantity * ChickenUnit::classify_name(&extra.name).quarter_units())
            .sum();

        if quarter_units <= 0 {
            return 1;
        }
        // Round up to whole birds worth of slots
        (((quarter_units + 3) / 4) as u32).max(1)
    }
}

// =============================================================================
// Package Index
// =============================================================================

/// Lookup index over all package contents, built once from the package
/// table at load time.
///
/// Lookups walk the normalization chain (exact, folded,
/// qualifier-stripped) because catalog product names and package-table keys
/// are maintained independently and drift.
#[derive(Debug, Clone)]
pub struct PackageIndex {
    index: NormalizedIndex<PackageContents>,
}

impl PackageIndex {
    /// Builds the index from the package table.
    pub fn new(contents: Vec<PackageContents>) -> Self {
        PackageIndex {
            index: NormalizedIndex::build(contents, |c| c.package_name.as_str()),
        }
    }

    /// Contents for a package product name, if registered.
    pub fn contents_for(&self, product_name: &str) -> Option<&PackageContents> {
        self.index.get(product_name)
    }

    /// Flavor slots a product requires before it can be confirmed.
    ///
    /// Products that don't require flavor need 0 slots. Flavor-required
    /// products default to 1 slot; packages with a registered entry derive
    /// their slot count from the included extras. A package with no entry
    /// degrades to a single slot rather than blocking the sale.
    pub fn flavor_slots(&self, product: &Product) -> u32 {
        if !product.requires_flavor {
            return 0;
        }

        if product.category.has_included_extras() {
            if let Some(contents) = self.contents_for(&product.name) {
                return contents.flavor_slots();
            }
        }

        1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: ProductCategory, price_cents: i64) -> Product {
        Product {
            id: format!("id-{}", normalize::fold(name).replace(' ', "-")),
            name: name.to_string(),
            category,
            price_cents,
            requires_flavor: category.prompts_flavor(),
            is_promo_pack: false,
            description: None,
            fixed_flavor: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn extras(list: &[(&str, i64)]) -> Vec<IncludedExtra> {
        list.iter()
            .map(|(name, quantity)| IncludedExtra {
                name: name.to_string(),
                quantity: *quantity,
            })
            .collect()
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in [
            ProductCategory::Pollos,
            ProductCategory::Especialidades,
            ProductCategory::Paquetes,
            ProductCategory::Miercoles,
            ProductCategory::Extras,
            ProductCategory::Bebidas,
            ProductCategory::Desechables,
        ] {
            assert_eq!(ProductCategory::from_label(category.as_str()), Some(category));
        }

        // Accent/case tolerant
        assert_eq!(
            ProductCategory::from_label("miercoles"),
            Some(ProductCategory::Miercoles)
        );
        assert_eq!(ProductCategory::from_label("desconocida"), None);
    }

    #[test]
    fn test_flavor_slots_from_included_chicken() {
        // 1 whole + 1 half = 1.5 birds -> 2 slots
        let contents = PackageContents {
            package_name: "Paquete Amigos".to_string(),
            extras: extras(&[("1 Pollo", 1), ("1/2 Pollo", 1), ("Refresco 2L", 1)]),
        };
        assert_eq!(contents.flavor_slots(), 2);

        // 2 quarters = 0.5 birds -> 1 slot
        let contents = PackageContents {
            package_name: "Paquete Chico".to_string(),
            extras: extras(&[("1/4 Pollo", 2), ("Tortillas", 1)]),
        };
        assert_eq!(contents.flavor_slots(), 1);

        // No chicken extras at all -> still 1 slot
        let contents = PackageContents {
            package_name: "Paquete Bebidas".to_string(),
            extras: extras(&[("Refresco 2L", 2)]),
        };
        assert_eq!(contents.flavor_slots(), 1);
    }

    #[test]
    fn test_package_index_slot_lookup() {
        let index = PackageIndex::new(vec![PackageContents {
            package_name: "Brasa Familiar".to_string(),
            extras: extras(&[("1 Pollo", 2)]),
        }]);

        let mut pkg = product("Brasa Familiar", ProductCategory::Paquetes, 32_000);
        assert_eq!(index.flavor_slots(&pkg), 2);

        // Naming drift: catalog gained a "Súper" prefix
        pkg.name = "Súper Brasa Familiar".to_string();
        assert_eq!(index.flavor_slots(&pkg), 2);

        // Unregistered package degrades to one slot
        let lone = product("Paquete Nuevo", ProductCategory::Paquetes, 20_000);
        assert_eq!(index.flavor_slots(&lone), 1);

        // Plain chicken needs exactly one slot
        let quarter = product("1/4 Pollo", ProductCategory::Pollos, 6_500);
        assert_eq!(index.flavor_slots(&quarter), 1);

        // Flavor-free products need none
        let soda = product("Refresco 600ml", ProductCategory::Bebidas, 2_500);
        assert_eq!(index.flavor_slots(&soda), 0);
    }
}
