//! # Text Normalization
//!
//! Shared normalization helpers for catalog name matching.
//!
//! Product names, option-table keys and category labels are maintained
//! independently and drift over time ("Super Brasa" vs "súper brasa").
//! Every fuzzy comparison in the system goes through [`fold`] so the
//! matching rules live in exactly one place.

use std::collections::HashMap;

/// Folds a string for comparison: lowercase, diacritics stripped,
/// whitespace collapsed.
///
/// ## Example
/// ```rust
/// use brasa_core::normalize::fold;
///
/// assert_eq!(fold("  Miércoles   Promo "), "miercoles promo");
/// assert_eq!(fold("SÚPER Brasa"), "super brasa");
/// ```
pub fn fold(text: &str) -> String {
    let lowered: String = text
        .chars()
        .map(|c| match c {
            'á' | 'Á' | 'à' | 'À' | 'ä' | 'Ä' => 'a',
            'é' | 'É' | 'è' | 'È' | 'ë' | 'Ë' => 'e',
            'í' | 'Í' | 'ì' | 'Ì' | 'ï' | 'Ï' => 'i',
            'ó' | 'Ó' | 'ò' | 'Ò' | 'ö' | 'Ö' => 'o',
            'ú' | 'Ú' | 'ù' | 'Ù' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            other => other,
        })
        .flat_map(|c| c.to_lowercase())
        .collect();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading words dropped by the qualifier-stripping fallback.
///
/// Catalog names gain marketing prefixes over time ("Super Brasa",
/// "Paquete Familiar") while the option/package tables keep the bare name.
const QUALIFIER_PREFIXES: [&str; 2] = ["super", "paquete"];

/// Strips leading qualifier words from an already-folded string.
///
/// ## Example
/// ```rust
/// use brasa_core::normalize::strip_qualifiers;
///
/// assert_eq!(strip_qualifiers("super brasa"), "brasa");
/// assert_eq!(strip_qualifiers("paquete familiar"), "familiar");
/// assert_eq!(strip_qualifiers("brasa"), "brasa");
/// ```
pub fn strip_qualifiers(folded: &str) -> String {
    let mut words: Vec<&str> = folded.split(' ').collect();
    while words.len() > 1 && QUALIFIER_PREFIXES.contains(&words[0]) {
        words.remove(0);
    }
    words.join(" ")
}

/// Removes a trailing `" - <flavor>"` / `" – <flavor>"` suffix from a
/// product name, producing the clean name used for report grouping.
///
/// "1/4 Pollo - Tamarindo" and "1/4 Pollo - BBQ" both group under
/// "1/4 Pollo". Hyphens without surrounding spaces ("Coca-Cola") are left
/// alone.
pub fn strip_flavor_suffix(name: &str) -> String {
    let cut = [" - ", " \u{2013} "]
        .iter()
        .filter_map(|sep| name.rfind(sep))
        .max();

    match cut {
        Some(idx) => name[..idx].trim_end().to_string(),
        None => name.trim().to_string(),
    }
}

// =============================================================================
// Chicken Unit Heuristics
// =============================================================================

/// The portion size a chicken line item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChickenUnit {
    Whole,
    Half,
    Quarter,
}

impl ChickenUnit {
    /// Classifies a product name by its portion tokens.
    ///
    /// "1/4" or "cuarto" wins over "1/2" or "medio"; anything else is a
    /// whole bird. Matching is case/accent-insensitive.
    pub fn classify_name(name: &str) -> Self {
        let folded = fold(name);
        if folded.contains("1/4") || folded.contains("cuarto") {
            ChickenUnit::Quarter
        } else if folded.contains("1/2") || folded.contains("medio") {
            ChickenUnit::Half
        } else {
            ChickenUnit::Whole
        }
    }

    /// The unit expressed in quarter birds: whole = 4, half = 2, quarter = 1.
    ///
    /// Counting in quarters keeps equivalents exact integers until display.
    pub const fn quarter_units(&self) -> i64 {
        match self {
            ChickenUnit::Whole => 4,
            ChickenUnit::Half => 2,
            ChickenUnit::Quarter => 1,
        }
    }
}

/// Whether a product name refers to raw chicken production units.
pub fn is_chicken_name(name: &str) -> bool {
    fold(name).contains("pollo")
}

// =============================================================================
// Normalized Lookup Index
// =============================================================================

/// A lookup table keyed by folded names, built once at load time.
///
/// `get` walks the fallback chain: exact raw key, folded key, then the
/// folded key with leading qualifiers stripped. A miss at the end of the
/// chain means the entry genuinely does not exist for that name.
#[derive(Debug, Clone)]
pub struct NormalizedIndex<T> {
    entries: Vec<T>,
    by_raw: HashMap<String, usize>,
    by_folded: HashMap<String, usize>,
}

impl<T> NormalizedIndex<T> {
    /// Builds the index from `items`, keying each entry by `key_fn`.
    ///
    /// Later entries with a colliding folded key shadow earlier ones.
    pub fn build<F>(items: Vec<T>, key_fn: F) -> Self
    where
        F: Fn(&T) -> &str,
    {
        let mut by_raw = HashMap::new();
        let mut by_folded = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            let key = key_fn(item);
            by_raw.insert(key.to_string(), idx);
            by_folded.insert(fold(key), idx);
        }
        NormalizedIndex {
            entries: items,
            by_raw,
            by_folded,
        }
    }

    /// Looks up `name` through the fallback chain.
    pub fn get(&self, name: &str) -> Option<&T> {
        if let Some(&idx) = self.by_raw.get(name) {
            return Some(&self.entries[idx]);
        }

        let folded = fold(name);
        if let Some(&idx) = self.by_folded.get(&folded) {
            return Some(&self.entries[idx]);
        }

        let stripped = strip_qualifiers(&folded);
        if stripped != folded {
            if let Some(&idx) = self.by_folded.get(&stripped) {
                return Some(&self.entries[idx]);
            }
        }

        None
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
