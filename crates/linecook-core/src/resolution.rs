//! # Selection Resolution
//!
//! Pure functions over the catalog graph that compute default selections
//! and validate user picks against a group's candidate set.
//!
//! ## Tolerance Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Unknown ids are DROPPED, not errors                                    │
//! │                                                                         │
//! │  setModifiers(cheese_group, ["UNKNOWN"]) → kept: [], dropped: [UNKNOWN] │
//! │                                                                         │
//! │  This mirrors the tolerant-merge policy of the catalog builder: a       │
//! │  stale id (e.g. after a menu refresh) shrinks the selection instead     │
//! │  of wedging the ordering flow. The dropped ids are returned so a        │
//! │  caller CAN surface the problem; none does today.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Selection counts are NOT clamped here; [`selection_count_valid`] is the
//! advisory check the engine consults before allowing finalize.

use std::sync::Arc;

use crate::types::{
    GroupSelections, ModifierGroup, ModifierInfo, ModifierSelections, Product, ProductBundle,
    ProductGroup, ProductModifierGroupKey,
};

// =============================================================================
// Resolved Selection
// =============================================================================

/// The outcome of resolving user-supplied ids against a candidate set.
#[derive(Debug, Clone)]
pub struct ResolvedSelection<T> {
    /// Candidates that resolved, in the order the ids were given.
    pub kept: Vec<T>,
    /// Ids that did not resolve to any candidate.
    pub dropped: Vec<String>,
}

fn resolve_ids<T: Clone>(
    candidates: &[T],
    ids: &[&str],
    id_of: impl Fn(&T) -> &str,
) -> ResolvedSelection<T> {
    let mut kept = Vec::with_capacity(ids.len());
    let mut dropped = Vec::new();
    for id in ids {
        match candidates.iter().find(|c| id_of(c) == *id) {
            Some(candidate) => kept.push(candidate.clone()),
            None => dropped.push((*id).to_string()),
        }
    }
    ResolvedSelection { kept, dropped }
}

// =============================================================================
// Modifier Resolution
// =============================================================================

/// The default selection for one modifier group: `[default]` if the group
/// has one, else empty (Optional groups may legitimately start empty).
pub fn default_selection(group: &ModifierGroup) -> Vec<Arc<ModifierInfo>> {
    group.default_selection.iter().cloned().collect()
}

/// The default modifier selections for a product: one entry per modifier
/// group attached to it, keyed by (product, group).
pub fn default_modifiers_for(product: &Product) -> ModifierSelections {
    product
        .modifier_groups
        .iter()
        .map(|group| {
            (
                ProductModifierGroupKey::new(product, group),
                default_selection(group),
            )
        })
        .collect()
}

/// Resolves chosen modifier ids against a group's option list.
/// Unknown ids are dropped, never an error.
pub fn resolve_modifier_ids(
    group: &ModifierGroup,
    ids: &[&str],
) -> ResolvedSelection<Arc<ModifierInfo>> {
    resolve_ids(&group.options, ids, |m| m.id.as_str())
}

/// Reports whether a selection count sits inside the group's [min, max].
///
/// Consulted at finalize time; writes are never clamped to the range.
pub fn selection_count_valid(group: &ModifierGroup, selection: &[Arc<ModifierInfo>]) -> bool {
    let count = selection.len() as u32;
    group.min_selections <= count && count <= group.max_selections
}

// =============================================================================
// Bundle / Option-Group Resolution
// =============================================================================

/// The default option-group selections for a bundle: one entry per group,
/// `[default]` or empty when the group has no default.
pub fn default_bundle_selections(bundle: &ProductBundle) -> GroupSelections {
    bundle
        .product_groups
        .iter()
        .map(|group| {
            let picks = group.default_product.iter().cloned().collect();
            (group.clone(), picks)
        })
        .collect()
}

/// Resolves chosen product ids against an option group's candidate list.
/// Unknown ids are dropped, never an error.
pub fn resolve_option_ids(group: &ProductGroup, ids: &[&str]) -> ResolvedSelection<Arc<Product>> {
    resolve_ids(&group.options, ids, |p| p.id.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================
