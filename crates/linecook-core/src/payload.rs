//! # Menu Payload
//!
//! The flat, id-referencing wire shape of a menu.
//!
//! ## Payload Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Flat Menu Payload                                   │
//! │                                                                         │
//! │  categories:      [{ categoryId, categoryName, products: [ids] }]       │
//! │  products:        [{ productId, ..., bundles: [ids],                    │
//! │                                      modifierGroups: [ids] }]           │
//! │  bundles:         [{ bundleId, ..., productGroups: [ids] }]             │
//! │  productGroups:   [{ productGroupId, defaultProduct: id,                │
//! │                                      options: [ids] }]                  │
//! │  modifierGroups:  [{ modifierGroupId, ..., options: [inline],           │
//! │                                      defaultSelection: id }]            │
//! │                                                                         │
//! │  Cross-references are OPAQUE STRING IDS, resolved by the catalog        │
//! │  builder. Modifier options are the one nested exception: they ride      │
//! │  inline inside their group.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tolerance Policy
//! Every field except the id/name pair is optional. Records missing id or
//! name are skipped during the build; everything else falls back to a
//! sensible default. The payload is never a reason to fail.

use serde::{Deserialize, Serialize};

// =============================================================================
// Top-Level Payload
// =============================================================================

/// The complete flat menu payload as received from the menu service.
///
/// An entirely empty payload is valid and produces an empty catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuPayload {
    pub categories: Vec<CategoryRecord>,
    pub products: Vec<ProductRecord>,
    pub bundles: Vec<BundleRecord>,
    pub product_groups: Vec<ProductGroupRecord>,
    pub modifier_groups: Vec<ModifierGroupRecord>,
}

// =============================================================================
// Per-Kind Records
// =============================================================================

/// A menu category referencing its products by id, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryRecord {
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub products: Vec<String>,
}

/// A sellable product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    /// Base price in cents.
    pub price_cents: Option<i64>,
    pub receipt_text: Option<String>,
    /// Bundle ids this product can be upgraded into.
    pub bundles: Vec<String>,
    /// Modifier group ids applicable to this product.
    pub modifier_groups: Vec<String>,
}

/// A product bundle (meal) referencing its option groups by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleRecord {
    pub bundle_id: Option<String>,
    pub bundle_name: Option<String>,
    /// Bundle upcharge in cents.
    pub price_cents: Option<i64>,
    pub receipt_text: Option<String>,
    pub product_groups: Vec<String>,
}

/// An option group within a bundle (e.g. drink choices).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductGroupRecord {
    pub product_group_id: Option<String>,
    pub product_group_name: Option<String>,
    pub default_product: Option<String>,
    pub options: Vec<String>,
}

/// A modifier group with its options nested inline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifierGroupRecord {
    pub modifier_group_id: Option<String>,
    pub modifier_group_name: Option<String>,
    /// Wire action: `"on"` = required, `"add"` = optional.
    pub action: Option<String>,
    pub default_selection: Option<String>,
    pub options: Vec<ModifierInfoRecord>,
    pub min_selections: Option<u32>,
    pub max_selections: Option<u32>,
}

/// One modifier option inside a modifier group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModifierInfoRecord {
    pub modifier_id: Option<String>,
    pub modifier_name: Option<String>,
    /// Price delta in cents; may be negative, zero, or positive.
    pub price_delta_cents: Option<i64>,
    pub receipt_text: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
