//! # Catalog Graph Builder
//!
//! Turns the flat, id-referencing [`MenuPayload`] into a fully linked,
//! cycle-free catalog graph.
//!
//! ## Build Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Three-Pass Reference Resolution                      │
//! │                                                                         │
//! │  Pass 1: index each kind by id (skip records missing id/name)           │
//! │  Pass 2: resolve cross-references in dependency order                   │
//! │                                                                         │
//! │     modifier groups (leaf, options nested inline)                       │
//! │          │                                                              │
//! │     slim products (modifier groups only, NO bundles)                    │
//! │          │                                                              │
//! │     product groups (default + options ──► slim products)                │
//! │          │                                                              │
//! │     bundles (──► product groups)                                        │
//! │          │                                                              │
//! │     full products (slim + bundles attached)                             │
//! │          │                                                              │
//! │     categories (──► full products)                                      │
//! │                                                                         │
//! │  Pass 3: expose categories only; everything else is reachable           │
//! │          transitively, mirroring how a client browses a menu            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tolerance Policy
//! `build` is total: it NEVER fails. A record missing id or name is
//! skipped (warn log); a reference to an absent id is omitted from the
//! referencing collection (debug log); a duplicate id within one kind is
//! resolved last-seen-wins; an empty payload yields an empty graph.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::money::Money;
use crate::payload::{
    BundleRecord, CategoryRecord, MenuPayload, ModifierGroupRecord, ModifierInfoRecord,
    ProductGroupRecord, ProductRecord,
};
use crate::types::{
    Category, ModifierGroup, ModifierGroupAction, ModifierInfo, Product, ProductBundle,
    ProductGroup,
};

// =============================================================================
// Catalog Graph
// =============================================================================

/// The fully cross-linked, immutable in-memory representation of the menu.
///
/// Built once per menu refresh, then shared read-only. Only categories are
/// exposed; products, bundles, groups, and modifiers are reached by
/// walking the graph, the same way a client browses the menu.
#[derive(Debug, Clone, Default)]
pub struct CatalogGraph {
    /// Categories in payload order.
    pub categories: Vec<Category>,
}

impl CatalogGraph {
    /// An empty catalog (the degraded form when no payload is available).
    pub fn empty() -> Self {
        CatalogGraph::default()
    }

    /// True when the catalog has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Finds a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Builds the catalog graph from a flat payload.
    ///
    /// Pure, deterministic, and total: malformed records and dangling
    /// references are dropped, never fatal.
    pub fn build(payload: MenuPayload) -> CatalogGraph {
        // Dependency-ordered resolution; each step only looks up ids in
        // mappings built by earlier steps.
        let modifier_groups = index_modifier_groups(&payload.modifier_groups);
        let slim_products = index_slim_products(&payload.products, &modifier_groups);
        let product_groups = index_product_groups(&payload.product_groups, &slim_products);
        let bundles = index_bundles(&payload.bundles, &product_groups);
        let products = attach_bundles(&payload.products, &slim_products, &bundles);
        let categories = link_categories(&payload.categories, &products);

        CatalogGraph { categories }
    }
}

// =============================================================================
// Builder Passes
// =============================================================================

/// Indexes modifier groups, resolving their inline options and default.
fn index_modifier_groups(
    records: &[ModifierGroupRecord],
) -> HashMap<String, Arc<ModifierGroup>> {
    let mut map = HashMap::new();
    for record in records {
        let (Some(id), Some(name)) = (&record.modifier_group_id, &record.modifier_group_name)
        else {
            warn!(
                id = ?record.modifier_group_id,
                "skipping modifier group record missing id or name"
            );
            continue;
        };

        let options: Vec<Arc<ModifierInfo>> = record
            .options
            .iter()
            .filter_map(build_modifier_info)
            .collect();

        // The default must be a member of the group's own options;
        // anything else is treated as absent.
        let default_selection = record.default_selection.as_ref().and_then(|default_id| {
            let found = options.iter().find(|m| m.id == *default_id).cloned();
            if found.is_none() {
                debug!(group = %id, default = %default_id, "dropping unresolvable default selection");
            }
            found
        });

        let action = ModifierGroupAction::from_wire(record.action.as_deref());
        let min_selections = record.min_selections.unwrap_or(match action {
            ModifierGroupAction::Required => 1,
            ModifierGroupAction::Optional => 0,
        });
        let max_selections = record.max_selections.unwrap_or(match action {
            ModifierGroupAction::Required => 1,
            ModifierGroupAction::Optional => options.len() as u32,
        });

        // Last-seen wins on duplicate ids.
        map.insert(
            id.clone(),
            Arc::new(ModifierGroup {
                id: id.clone(),
                name: name.clone(),
                action,
                default_selection,
                options,
                min_selections,
                max_selections,
            }),
        );
    }
    map
}

/// Builds one inline modifier option, or drops it when id/name is missing.
fn build_modifier_info(record: &ModifierInfoRecord) -> Option<Arc<ModifierInfo>> {
    let (Some(id), Some(name)) = (&record.modifier_id, &record.modifier_name) else {
        warn!(id = ?record.modifier_id, "skipping modifier record missing id or name");
        return None;
    };
    Some(Arc::new(ModifierInfo {
        id: id.clone(),
        name: name.clone(),
        price_delta: Money::from_cents(record.price_delta_cents.unwrap_or(0)),
        receipt_text: record.receipt_text.clone().unwrap_or_default(),
    }))
}

/// Indexes products WITHOUT their bundle references.
///
/// These slim products are what product groups point at; leaving the
/// bundle list empty is what keeps the graph acyclic.
fn index_slim_products(
    records: &[ProductRecord],
    modifier_groups: &HashMap<String, Arc<ModifierGroup>>,
) -> HashMap<String, Arc<Product>> {
    let mut map = HashMap::new();
    for record in records {
        let (Some(id), Some(name)) = (&record.product_id, &record.product_name) else {
            warn!(id = ?record.product_id, "skipping product record missing id or name");
            continue;
        };

        let mut linked_groups = Vec::new();
        for group_id in &record.modifier_groups {
            match modifier_groups.get(group_id) {
                Some(group) => linked_groups.push(group.clone()),
                None => debug!(product = %id, group = %group_id, "dropping dangling modifier group reference"),
            }
        }

        map.insert(
            id.clone(),
            Arc::new(Product {
                id: id.clone(),
                name: name.clone(),
                description: record.product_description.clone().unwrap_or_default(),
                price: Money::from_cents(record.price_cents.unwrap_or(0)),
                receipt_text: record.receipt_text.clone().unwrap_or_default(),
                bundles: Vec::new(),
                modifier_groups: linked_groups,
            }),
        );
    }
    map
}

/// Indexes product groups, resolving default + options against slim products.
fn index_product_groups(
    records: &[ProductGroupRecord],
    products: &HashMap<String, Arc<Product>>,
) -> HashMap<String, Arc<ProductGroup>> {
    let mut map = HashMap::new();
    for record in records {
        let (Some(id), Some(name)) = (&record.product_group_id, &record.product_group_name)
        else {
            warn!(id = ?record.product_group_id, "skipping product group record missing id or name");
            continue;
        };

        let mut options = Vec::new();
        for product_id in &record.options {
            match products.get(product_id) {
                Some(product) => options.push(product.clone()),
                None => debug!(group = %id, product = %product_id, "dropping dangling option reference"),
            }
        }

        // The default must be one of the resolved options; a default that
        // dangles, or that names a product outside the option list, is
        // treated as absent.
        let default_product = record.default_product.as_ref().and_then(|default_id| {
            let found = options.iter().find(|p| p.id == *default_id).cloned();
            if found.is_none() {
                debug!(group = %id, default = %default_id, "dropping default product not among options");
            }
            found
        });

        map.insert(
            id.clone(),
            Arc::new(ProductGroup {
                id: id.clone(),
                name: name.clone(),
                default_product,
                options,
            }),
        );
    }
    map
}

/// Indexes bundles, resolving their product group references.
fn index_bundles(
    records: &[BundleRecord],
    product_groups: &HashMap<String, Arc<ProductGroup>>,
) -> HashMap<String, Arc<ProductBundle>> {
    let mut map = HashMap::new();
    for record in records {
        let (Some(id), Some(name)) = (&record.bundle_id, &record.bundle_name) else {
            warn!(id = ?record.bundle_id, "skipping bundle record missing id or name");
            continue;
        };

        let mut linked_groups = Vec::new();
        for group_id in &record.product_groups {
            match product_groups.get(group_id) {
                Some(group) => linked_groups.push(group.clone()),
                None => debug!(bundle = %id, group = %group_id, "dropping dangling product group reference"),
            }
        }

        map.insert(
            id.clone(),
            Arc::new(ProductBundle {
                id: id.clone(),
                name: name.clone(),
                price: Money::from_cents(record.price_cents.unwrap_or(0)),
                receipt_text: record.receipt_text.clone().unwrap_or_default(),
                product_groups: linked_groups,
            }),
        );
    }
    map
}

/// Rebuilds each slim product with its bundle references attached.
///
/// Malformed records were already warned about while indexing the slim
/// products, so this pass is quiet about them.
fn attach_bundles(
    records: &[ProductRecord],
    slim_products: &HashMap<String, Arc<Product>>,
    bundles: &HashMap<String, Arc<ProductBundle>>,
) -> HashMap<String, Arc<Product>> {
    let mut map = HashMap::new();
    for record in records {
        let Some(id) = &record.product_id else { continue };
        let Some(slim) = slim_products.get(id) else { continue };

        let mut linked_bundles = Vec::new();
        for bundle_id in &record.bundles {
            match bundles.get(bundle_id) {
                Some(bundle) => linked_bundles.push(bundle.clone()),
                None => debug!(product = %id, bundle = %bundle_id, "dropping dangling bundle reference"),
            }
        }

        map.insert(
            id.clone(),
            Arc::new(Product {
                bundles: linked_bundles,
                ..(**slim).clone()
            }),
        );
    }
    map
}

/// Links categories to their products, preserving payload order.
fn link_categories(
    records: &[CategoryRecord],
    products: &HashMap<String, Arc<Product>>,
) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let (Some(id), Some(name)) = (&record.category_id, &record.category_name) else {
            warn!(id = ?record.category_id, "skipping category record missing id or name");
            continue;
        };

        let mut linked_products = Vec::new();
        for product_id in &record.products {
            match products.get(product_id) {
                Some(product) => linked_products.push(product.clone()),
                None => debug!(category = %id, product = %product_id, "dropping dangling product reference"),
            }
        }

        let category = Category {
            id: id.clone(),
            name: name.clone(),
            products: linked_products,
        };

        // Last-seen wins: a duplicate id replaces the earlier category
        // in place, keeping its original position.
        match index.get(id) {
            Some(&position) => categories[position] = category,
            None => {
                index.insert(id.clone(), categories.len());
                categories.push(category);
            }
        }
    }
    categories
}

// =============================================================================
// Shared Catalog State
// =============================================================================

/// Holds the current catalog for any number of concurrent readers.
///
/// ## Thread Safety
/// The graph itself is immutable after construction, so readers clone an
/// `Arc` and walk it lock-free. A menu refresh builds a whole new graph
/// and [`swap`](CatalogState::swap)s it in atomically: readers never see
/// a partially rebuilt catalog, only the old graph or the new one.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    current: Arc<RwLock<Arc<CatalogGraph>>>,
}

impl CatalogState {
    /// Creates state holding an empty catalog.
    pub fn new() -> Self {
        CatalogState::default()
    }

    /// Returns the current catalog.
    pub fn current(&self) -> Arc<CatalogGraph> {
        self.current.read().expect("catalog lock poisoned").clone()
    }

    /// Replaces the catalog as a unit, returning the previous one.
    pub fn swap(&self, graph: CatalogGraph) -> Arc<CatalogGraph> {
        let mut guard = self.current.write().expect("catalog lock poisoned");
        std::mem::replace(&mut *guard, Arc::new(graph))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
