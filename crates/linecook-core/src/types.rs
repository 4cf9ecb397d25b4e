//! # Domain Types
//!
//! Core catalog and order-line types for LineCook POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Graph                                    │
//! │                                                                         │
//! │  Category ──► Product ──┬──► ProductBundle ──► ProductGroup ──► Product │
//! │                         │                                      (slim)   │
//! │                         └──► ModifierGroup ──► ModifierInfo             │
//! │                                                                         │
//! │  Products are SHARED across categories/bundles/groups via Arc.          │
//! │  Equality and hashing are BY ID so "the same product" is recognized     │
//! │  across separate allocations and across graph rebuilds.                 │
//! │                                                                         │
//! │  Products held by a ProductGroup are "slim": their bundle list is       │
//! │  empty. That keeps the reference graph acyclic (a bundle can offer a    │
//! │  product that itself offers that bundle).                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Items
//! A [`LineItem`] is a value snapshot of one configured order line. It is
//! what gets persisted to an order; the live, mutable working copy lives
//! inside the selection engine and is frozen into a `LineItem` on confirm.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::money::Money;

// =============================================================================
// Modifier Group Action
// =============================================================================

/// Whether a modifier group demands a selection or merely offers one.
///
/// Wire values: `"on"` = Required, `"add"` = Optional. Anything else is
/// treated as Required, the conservative reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierGroupAction {
    /// The group must end up with a selection count inside [min, max].
    Required,
    /// The group may legitimately stay empty.
    Optional,
}

impl ModifierGroupAction {
    /// Maps the wire string onto an action.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("on") => ModifierGroupAction::Required,
            Some("add") => ModifierGroupAction::Optional,
            _ => ModifierGroupAction::Required,
        }
    }
}

// =============================================================================
// Modifier Info
// =============================================================================

/// One customization option inside a modifier group (e.g. "American Cheese").
#[derive(Debug, Clone, Serialize)]
pub struct ModifierInfo {
    /// Stable string id, unique among modifiers.
    pub id: String,

    /// Display name shown in the option list.
    pub name: String,

    /// Price delta applied when selected. May be negative, zero, or positive.
    pub price_delta: Money,

    /// Abbreviation printed on the kitchen receipt.
    pub receipt_text: String,
}

// =============================================================================
// Modifier Group
// =============================================================================

/// A named set of mutually grouped customization options with a
/// selection-count policy.
///
/// ## Invariants (upheld by the catalog builder)
/// - `default_selection`, if present, is one of `options`
/// - `min_selections <= max_selections` is advisory at write time;
///   the selection engine enforces the range at finalize
#[derive(Debug, Clone, Serialize)]
pub struct ModifierGroup {
    pub id: String,
    pub name: String,
    pub action: ModifierGroupAction,
    pub default_selection: Option<Arc<ModifierInfo>>,
    pub options: Vec<Arc<ModifierInfo>>,
    pub min_selections: u32,
    pub max_selections: u32,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product.
///
/// The same `Arc<Product>` is shared by every category that lists it.
/// Products appearing as options inside a [`ProductGroup`] are separate
/// "slim" allocations (empty `bundles`) but compare equal by id.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,

    /// Base price; bundle upcharges and modifier deltas stack on top.
    pub price: Money,

    /// Abbreviation printed on the kitchen receipt.
    pub receipt_text: String,

    /// Bundles (meals) this product can be upgraded into.
    pub bundles: Vec<Arc<ProductBundle>>,

    /// Modifier groups applicable to this product.
    pub modifier_groups: Vec<Arc<ModifierGroup>>,
}

// =============================================================================
// Product Bundle
// =============================================================================

/// A meal upgrade: a priced wrapper around a set of option groups.
#[derive(Debug, Clone, Serialize)]
pub struct ProductBundle {
    pub id: String,
    pub name: String,

    /// Upcharge added on top of the base product price.
    pub price: Money,

    pub receipt_text: String,

    /// Option groups (e.g. Drinks, Sides) the bundle asks the user to fill.
    pub product_groups: Vec<Arc<ProductGroup>>,
}

// =============================================================================
// Product Group
// =============================================================================

/// A named set of substitutable products within a bundle (e.g. drink
/// choices).
///
/// Invariant (upheld by the catalog builder): `default_product`, if
/// present, is one of `options`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductGroup {
    pub id: String,
    pub name: String,
    pub default_product: Option<Arc<Product>>,
    pub options: Vec<Arc<Product>>,
}

// =============================================================================
// Category
// =============================================================================

/// A menu category: an ordered sequence of products.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub products: Vec<Arc<Product>>,
}

// =============================================================================
// Id-Based Identity
// =============================================================================
// Entities are compared and hashed by id alone. Products are shared (and
// sometimes re-allocated slim) across the graph; structural comparison
// would wrongly distinguish them, and id identity is what selection maps
// and the change comparator need.

macro_rules! id_identity {
    ($($entity:ty),+) => {
        $(
            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $entity {}

            impl Hash for $entity {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )+
    };
}

id_identity!(ModifierInfo, ModifierGroup, Product, ProductBundle, ProductGroup, Category);

// =============================================================================
// Product + Modifier Group Key
// =============================================================================

/// Composite key identifying a modifier selection slot.
///
/// ## Why Composite?
/// The same modifier group can apply to different products within one
/// line item (the burger's "Size" vs the bundled fries' "Size"). Keying
/// modifier selections by (product, group) keeps those slots apart.
///
/// Equality and hashing are structural over the two ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductModifierGroupKey {
    pub product_id: String,
    pub modifier_group_id: String,
}

impl ProductModifierGroupKey {
    /// Builds the key for a product/group pair.
    pub fn new(product: &Product, group: &ModifierGroup) -> Self {
        ProductModifierGroupKey {
            product_id: product.id.clone(),
            modifier_group_id: group.id.clone(),
        }
    }
}

// =============================================================================
// Selection Maps
// =============================================================================

/// Per-option-group product picks for the active bundle.
pub type GroupSelections = HashMap<Arc<ProductGroup>, Vec<Arc<Product>>>;

/// Per-(product, modifier group) modifier picks.
pub type ModifierSelections = HashMap<ProductModifierGroupKey, Vec<Arc<ModifierInfo>>>;

// =============================================================================
// Line Item
// =============================================================================

/// One configured, priced unit of an order.
///
/// Uses the snapshot pattern: a `LineItem` is a frozen value, not a live
/// reference into the selection engine's mutable state. Editing an
/// existing line item clones it back into a fresh session.
///
/// ## No serde derives?
/// The selection maps are keyed by structural keys with no natural JSON
/// map encoding. Persistence mappers own that concern; the serializable
/// UI surface is `LineItemSummary` in the session module.
#[derive(Debug, Clone)]
pub struct LineItem {
    /// Unique identifier (UUID v4), stable across edits of this line.
    pub id: String,

    /// The base product being ordered.
    pub product: Arc<Product>,

    /// The bundle upgrade, if the line was made a meal.
    pub bundle: Option<Arc<ProductBundle>>,

    /// Chosen products per option group of the active bundle.
    pub group_selections: GroupSelections,

    /// Chosen modifiers per (product, modifier group) slot.
    pub modifier_selections: ModifierSelections,

    /// Number of units; always >= 1.
    pub quantity: i64,

    /// When this line was first configured.
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Computes the line price:
    /// (base + bundle upcharge + sum of selected modifier deltas) × quantity.
    pub fn price(&self) -> Money {
        let mut unit = self.product.price;
        if let Some(bundle) = &self.bundle {
            unit += bundle.price;
        }
        for selection in self.modifier_selections.values() {
            for modifier in selection {
                unit += modifier.price_delta;
            }
        }
        unit.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
