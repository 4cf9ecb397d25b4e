//! # Line-Item Selection Engine
//!
//! The stateful session that configures one order line, plus the pure
//! change-detection comparator behind "discard changes?" prompts.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Line-Item Session Lifecycle                           │
//! │                                                                         │
//! │  Tap Product ───► start_from_product() ──┐                              │
//! │                                          ├──► live state + baseline     │
//! │  Tap Bag Line ──► start_from_line_item() ┘                              │
//! │                        │                                                │
//! │          set_bundle / set_group_selection /                             │
//! │          set_modifiers / set_quantity                                   │
//! │                        │            (each recomputes derived price)     │
//! │                        ▼                                                │
//! │     Cancel ──► has_changes()? ──► discard prompt                        │
//! │     Confirm ─► finalize() ──────► immutable LineItem snapshot           │
//! │                                                                         │
//! │  The session is owned by ONE editing flow; it is not shared across      │
//! │  concurrent sessions and never blocks.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bundle Switching Semantics
//! Bundles are mutually exclusive option spaces. Setting a bundle replaces
//! option-group selections wholesale with that bundle's defaults (never a
//! merge with leftovers), and clearing it empties them. Modifier slots for
//! products that ride along with the bundle are managed the same way:
//! deselected products lose their slots, newly selected products seed
//! their own defaults, and the base product's slots always survive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::resolution::{
    default_bundle_selections, default_modifiers_for, resolve_modifier_ids, resolve_option_ids,
    selection_count_valid,
};
use crate::types::{
    GroupSelections, LineItem, ModifierGroup, ModifierSelections, Product, ProductBundle,
    ProductGroup, ProductModifierGroupKey,
};
use crate::MAX_LINE_ITEM_QUANTITY;

// =============================================================================
// Line-Item Session
// =============================================================================

/// The in-progress configuration of one order line.
///
/// Holds the live working copy, an immutable baseline for change
/// detection, and the derived price (recomputed synchronously after every
/// mutation, never cached stale).
#[derive(Debug, Clone)]
pub struct LineItemSession {
    live: LineItem,
    baseline: LineItem,
    price: Money,
    is_editing: bool,
}

impl LineItemSession {
    /// Starts configuring a product fresh: modifier selections seeded with
    /// the product's defaults, no bundle, quantity 1.
    pub fn start_from_product(product: Arc<Product>) -> Self {
        let modifier_selections = default_modifiers_for(&product);
        let live = LineItem {
            id: Uuid::new_v4().to_string(),
            product,
            bundle: None,
            group_selections: GroupSelections::new(),
            modifier_selections,
            quantity: 1,
            created_at: chrono::Utc::now(),
        };
        let baseline = live.clone();
        let price = live.price();
        LineItemSession {
            live,
            baseline,
            price,
            is_editing: false,
        }
    }

    /// Starts editing an existing line item. The baseline is a deep copy
    /// of the incoming snapshot, so mutating the live state can never
    /// alias it.
    pub fn start_from_line_item(line_item: &LineItem) -> Self {
        let live = line_item.clone();
        let baseline = line_item.clone();
        let price = live.price();
        LineItemSession {
            live,
            baseline,
            price,
            is_editing: true,
        }
    }

    // -------------------------------------------------------------------------
    // Read state
    // -------------------------------------------------------------------------

    /// The live working copy.
    pub fn line_item(&self) -> &LineItem {
        &self.live
    }

    /// The baseline this session started from.
    pub fn baseline(&self) -> &LineItem {
        &self.baseline
    }

    /// The derived price of the current configuration.
    pub fn price(&self) -> Money {
        self.price
    }

    /// True when the live state differs from the baseline (drives the
    /// "discard changes?" prompt on cancel).
    pub fn has_changes(&self) -> bool {
        has_changes(&self.baseline, &self.live)
    }

    /// True when every selection constraint is satisfied and
    /// [`finalize`](Self::finalize) would succeed.
    pub fn can_finalize(&self) -> bool {
        self.first_unsatisfied().is_none()
    }

    /// UI-facing summary of the session's derived state.
    pub fn summary(&self) -> LineItemSummary {
        LineItemSummary {
            line_item_id: self.live.id.clone(),
            product_name: self.live.product.name.clone(),
            price_cents: self.price.cents(),
            quantity: self.live.quantity,
            can_finalize: self.can_finalize(),
            has_changes: self.has_changes(),
            is_editing: self.is_editing,
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Sets or clears the bundle (meal) upgrade.
    ///
    /// Option-group selections are replaced wholesale with the new
    /// bundle's defaults (or cleared for à-la-carte). Modifier slots for
    /// non-base products are dropped, then re-seeded from the defaults of
    /// the products the new bundle selects.
    ///
    /// Re-setting the bundle already active is a no-op, so an idle UI
    /// event cannot clobber the user's picks.
    pub fn set_bundle(&mut self, bundle: Option<Arc<ProductBundle>>) {
        let current_id = self.live.bundle.as_ref().map(|b| b.id.as_str());
        let next_id = bundle.as_ref().map(|b| b.id.as_str());
        if current_id == next_id {
            return;
        }

        // Bundle-scoped modifier slots go away; the base product's survive.
        let base_id = self.live.product.id.clone();
        self.live
            .modifier_selections
            .retain(|key, _| key.product_id == base_id);

        match bundle {
            None => {
                self.live.bundle = None;
                self.live.group_selections.clear();
            }
            Some(bundle) => {
                let defaults = default_bundle_selections(&bundle);
                for picks in defaults.values() {
                    for product in picks {
                        self.seed_default_modifiers(product);
                    }
                }
                self.live.group_selections = defaults;
                self.live.bundle = Some(bundle);
            }
        }
        self.recompute_price();
    }

    /// Replaces one option group's picks with the given product ids.
    ///
    /// Ids not among the group's candidates are dropped and returned;
    /// other groups' selections are untouched. Products leaving the bundle
    /// entirely lose their modifier slots; products joining it seed their
    /// defaults.
    pub fn set_group_selection(&mut self, group: &Arc<ProductGroup>, ids: &[&str]) -> Vec<String> {
        let resolved = resolve_option_ids(group, ids);
        let previous = self
            .live
            .group_selections
            .insert(group.clone(), resolved.kept.clone())
            .unwrap_or_default();

        let base_id = self.live.product.id.clone();
        for removed in &previous {
            if removed.id == base_id {
                continue;
            }
            // A sibling group may still select this product; its slots
            // only go away once no group does.
            let still_selected = self
                .live
                .group_selections
                .values()
                .flatten()
                .any(|p| p.id == removed.id);
            if !still_selected {
                let removed_id = removed.id.clone();
                self.live
                    .modifier_selections
                    .retain(|key, _| key.product_id != removed_id);
            }
        }
        for added in &resolved.kept {
            let was_selected = previous.iter().any(|p| p.id == added.id);
            if !was_selected {
                self.seed_default_modifiers(added);
            }
        }

        self.recompute_price();
        resolved.dropped
    }

    /// Replaces the modifier picks for one (product, group) slot.
    ///
    /// Ids not among the group's candidates are dropped and returned. An
    /// all-unknown input leaves an empty entry, not a removed key. The
    /// count is NOT clamped to [min, max] here; finalize enforces it.
    pub fn set_modifiers(
        &mut self,
        product: &Arc<Product>,
        group: &Arc<ModifierGroup>,
        ids: &[&str],
    ) -> Vec<String> {
        let resolved = resolve_modifier_ids(group, ids);
        let key = ProductModifierGroupKey::new(product, group);
        self.live.modifier_selections.insert(key, resolved.kept);
        self.recompute_price();
        resolved.dropped
    }

    /// Sets the quantity. Values below 1 (or above the configured
    /// maximum) are rejected and the state, including the derived price,
    /// is left unchanged.
    pub fn set_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_LINE_ITEM_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_LINE_ITEM_QUANTITY,
            }
            .into());
        }
        self.live.quantity = quantity;
        self.recompute_price();
        Ok(())
    }

    /// Freezes the live state into an immutable [`LineItem`] snapshot.
    ///
    /// Fails with the first unsatisfied group when a modifier group's
    /// selection count is outside [min, max] or a bundle option group is
    /// empty. The live state is preserved so the user can fix it.
    pub fn finalize(&self) -> CoreResult<LineItem> {
        match self.first_unsatisfied() {
            Some(err) => Err(err),
            None => Ok(self.live.clone()),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Seeds a product's default modifier selections without clobbering
    /// slots the user already holds (the base product can itself be a
    /// bundle option).
    fn seed_default_modifiers(&mut self, product: &Arc<Product>) {
        for (key, selection) in default_modifiers_for(product) {
            self.live.modifier_selections.entry(key).or_insert(selection);
        }
    }

    fn recompute_price(&mut self) {
        self.price = self.live.price();
    }

    /// The first constraint the current configuration violates, if any:
    /// base product modifier groups, then per option group of the active
    /// bundle, the pick itself and the picked products' modifier groups.
    fn first_unsatisfied(&self) -> Option<CoreError> {
        if let Some(err) = self.check_modifier_groups(&self.live.product) {
            return Some(err);
        }
        if let Some(bundle) = &self.live.bundle {
            for group in &bundle.product_groups {
                let selected = self
                    .live
                    .group_selections
                    .get(group)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if selected.is_empty() {
                    return Some(CoreError::OptionGroupUnsatisfied {
                        group_id: group.id.clone(),
                        group_name: group.name.clone(),
                    });
                }
                for product in selected {
                    if let Some(err) = self.check_modifier_groups(product) {
                        return Some(err);
                    }
                }
            }
        }
        None
    }

    fn check_modifier_groups(&self, product: &Product) -> Option<CoreError> {
        for group in &product.modifier_groups {
            let key = ProductModifierGroupKey::new(product, group);
            let selected = self
                .live
                .modifier_selections
                .get(&key)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if !selection_count_valid(group, selected) {
                return Some(CoreError::SelectionCountOutOfRange {
                    group_id: group.id.clone(),
                    group_name: group.name.clone(),
                    min: group.min_selections,
                    max: group.max_selections,
                    selected: selected.len() as u32,
                });
            }
        }
        None
    }
}

// =============================================================================
// Change Detection
// =============================================================================

/// Structural diff between a baseline and the current selection state.
///
/// Pure and queried on demand (before allowing a cancel), never
/// maintained incrementally. True iff the bundle identity differs (by id,
/// including none-vs-set), the quantity differs, or either selection map
/// differs. Per key, chosen id lists compare as SETS; the order the user
/// tapped options in is irrelevant.
pub fn has_changes(baseline: &LineItem, current: &LineItem) -> bool {
    let baseline_bundle = baseline.bundle.as_ref().map(|b| b.id.as_str());
    let current_bundle = current.bundle.as_ref().map(|b| b.id.as_str());
    if baseline_bundle != current_bundle {
        return true;
    }
    if baseline.quantity != current.quantity {
        return true;
    }
    if !group_selections_match(&baseline.group_selections, &current.group_selections) {
        return true;
    }
    !modifier_selections_match(&baseline.modifier_selections, &current.modifier_selections)
}

fn group_selections_match(a: &GroupSelections, b: &GroupSelections) -> bool {
    a.len() == b.len()
        && a.iter().all(|(group, picks)| {
            b.get(group).is_some_and(|other| {
                id_sets_equal(
                    picks.iter().map(|p| p.id.as_str()),
                    other.iter().map(|p| p.id.as_str()),
                )
            })
        })
}

fn modifier_selections_match(a: &ModifierSelections, b: &ModifierSelections) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, picks)| {
            b.get(key).is_some_and(|other| {
                id_sets_equal(
                    picks.iter().map(|m| m.id.as_str()),
                    other.iter().map(|m| m.id.as_str()),
                )
            })
        })
}

fn id_sets_equal<'a>(
    a: impl Iterator<Item = &'a str>,
    b: impl Iterator<Item = &'a str>,
) -> bool {
    let a: HashSet<&str> = a.collect();
    let b: HashSet<&str> = b.collect();
    a == b
}

// =============================================================================
// Line-Item Summary
// =============================================================================

/// Derived display state for the item-detail screen.
///
/// Everything the UI needs to render the footer (price button, quantity
/// stepper, discard prompt) without replicating engine logic.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemSummary {
    pub line_item_id: String,
    pub product_name: String,
    pub price_cents: i64,
    pub quantity: i64,
    /// Whether every required group is satisfied.
    pub can_finalize: bool,
    /// Whether the live state differs from the baseline.
    pub has_changes: bool,
    /// True when the session edits an existing bag line ("Update item"
    /// vs "Add to bag").
    pub is_editing: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ModifierGroupAction, ModifierInfo};

    /// The burger-shop fixture mirrored across the engine tests: a cheese
    /// burger with Cheese/Topping groups, upgradeable to a meal with
    /// Drinks and Sides option groups; the default side (Fries) carries
    /// its own required Size group.
    struct Fixture {
        burger: Arc<Product>,
        meal: Arc<ProductBundle>,
        drinks: Arc<ProductGroup>,
        sides: Arc<ProductGroup>,
        cheese_group: Arc<ModifierGroup>,
        topping_group: Arc<ModifierGroup>,
        size_group: Arc<ModifierGroup>,
        fries: Arc<Product>,
        tots: Arc<Product>,
        coke: Arc<Product>,
        pepsi: Arc<Product>,
        no_cheese: Arc<ModifierInfo>,
        american: Arc<ModifierInfo>,
        lettuce: Arc<ModifierInfo>,
        mushroom: Arc<ModifierInfo>,
        bacon: Arc<ModifierInfo>,
        small_fries: Arc<ModifierInfo>,
        large_fries: Arc<ModifierInfo>,
    }

    fn modifier(id: &str, name: &str, delta_cents: i64, receipt: &str) -> Arc<ModifierInfo> {
        Arc::new(ModifierInfo {
            id: id.to_string(),
            name: name.to_string(),
            price_delta: Money::from_cents(delta_cents),
            receipt_text: receipt.to_string(),
        })
    }

    fn product(
        id: &str,
        name: &str,
        price_cents: i64,
        modifier_groups: Vec<Arc<ModifierGroup>>,
    ) -> Arc<Product> {
        Arc::new(Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "Description".to_string(),
            price: Money::from_cents(price_cents),
            receipt_text: String::new(),
            bundles: vec![],
            modifier_groups,
        })
    }

    impl Fixture {
        fn new() -> Self {
            let no_cheese = modifier("M1000", "No Cheese", 0, "NCH");
            let american = modifier("M1001", "American Cheese", 0, "ACH");
            let lettuce = modifier("M2000", "Lettuce", 100, "LTC");
            let mushroom = modifier("M2001", "Mushroom", 200, "MSH");
            let bacon = modifier("M2002", "Bacon", 300, "BCN");
            let small_fries = modifier("M3000", "Small Fries", 0, "SMF");
            let large_fries = modifier("M3001", "Large Fries", 0, "LRF");

            let cheese_group = Arc::new(ModifierGroup {
                id: "MG1000".to_string(),
                name: "Cheese".to_string(),
                action: ModifierGroupAction::Required,
                default_selection: Some(american.clone()),
                options: vec![no_cheese.clone(), american.clone()],
                min_selections: 1,
                max_selections: 1,
            });
            let topping_group = Arc::new(ModifierGroup {
                id: "MG2000".to_string(),
                name: "Topping".to_string(),
                action: ModifierGroupAction::Optional,
                default_selection: None,
                options: vec![lettuce.clone(), mushroom.clone(), bacon.clone()],
                min_selections: 0,
                max_selections: 5,
            });
            let size_group = Arc::new(ModifierGroup {
                id: "MG3000".to_string(),
                name: "Size".to_string(),
                action: ModifierGroupAction::Required,
                default_selection: Some(small_fries.clone()),
                options: vec![small_fries.clone(), large_fries.clone()],
                min_selections: 1,
                max_selections: 1,
            });

            let coke = product("D4000", "Coke", 0, vec![]);
            let pepsi = product("D4001", "Pepsi", 0, vec![]);
            let dr_pepper = product("D4002", "Dr. Pepper", 0, vec![]);
            let fries = product("F1000", "Fries", 300, vec![size_group.clone()]);
            let tots = product("T1000", "Tots", 300, vec![]);

            let drinks = Arc::new(ProductGroup {
                id: "PG1000".to_string(),
                name: "Drinks".to_string(),
                default_product: Some(coke.clone()),
                options: vec![coke.clone(), pepsi.clone(), dr_pepper],
            });
            let sides = Arc::new(ProductGroup {
                id: "PG1001".to_string(),
                name: "Sides".to_string(),
                default_product: Some(fries.clone()),
                options: vec![fries.clone(), tots.clone()],
            });
            let meal = Arc::new(ProductBundle {
                id: "B1000".to_string(),
                name: "Cheese Burger Meal".to_string(),
                price: Money::from_cents(1200),
                receipt_text: "CBM".to_string(),
                product_groups: vec![drinks.clone(), sides.clone()],
            });
            let burger = Arc::new(Product {
                id: "C1000".to_string(),
                name: "Cheese Burger".to_string(),
                description: "Description".to_string(),
                price: Money::from_cents(650),
                receipt_text: "CHB".to_string(),
                bundles: vec![meal.clone()],
                modifier_groups: vec![cheese_group.clone(), topping_group.clone()],
            });

            Fixture {
                burger,
                meal,
                drinks,
                sides,
                cheese_group,
                topping_group,
                size_group,
                fries,
                tots,
                coke,
                pepsi,
                no_cheese,
                american,
                lettuce,
                mushroom,
                bacon,
                small_fries,
                large_fries,
            }
        }

        fn cheese_key(&self) -> ProductModifierGroupKey {
            ProductModifierGroupKey::new(&self.burger, &self.cheese_group)
        }

        fn topping_key(&self) -> ProductModifierGroupKey {
            ProductModifierGroupKey::new(&self.burger, &self.topping_group)
        }

        fn fries_key(&self) -> ProductModifierGroupKey {
            ProductModifierGroupKey::new(&self.fries, &self.size_group)
        }

        /// A previously finalized meal line: pepsi + large fries, no
        /// cheese, lettuce + bacon.
        fn meal_line_item(&self) -> LineItem {
            LineItem {
                id: "aaa".to_string(),
                product: self.burger.clone(),
                bundle: Some(self.meal.clone()),
                group_selections: GroupSelections::from([
                    (self.drinks.clone(), vec![self.pepsi.clone()]),
                    (self.sides.clone(), vec![self.fries.clone()]),
                ]),
                modifier_selections: ModifierSelections::from([
                    (self.cheese_key(), vec![self.no_cheese.clone()]),
                    (
                        self.topping_key(),
                        vec![self.lettuce.clone(), self.bacon.clone()],
                    ),
                    (self.fries_key(), vec![self.large_fries.clone()]),
                ]),
                quantity: 1,
                created_at: chrono::Utc::now(),
            }
        }
    }

    #[test]
    fn test_fresh_product_defaults() {
        let f = Fixture::new();
        let session = LineItemSession::start_from_product(f.burger.clone());

        let expected = ModifierSelections::from([
            (f.cheese_key(), vec![f.american.clone()]),
            (f.topping_key(), vec![]),
        ]);
        assert_eq!(session.line_item().modifier_selections, expected);
        assert!(session.line_item().bundle.is_none());
        assert!(session.line_item().group_selections.is_empty());
        assert_eq!(session.line_item().quantity, 1);
        assert_eq!(session.price().cents(), 650);
        assert!(!session.has_changes());
    }

    #[test]
    fn test_make_a_meal() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));

        let expected_groups = GroupSelections::from([
            (f.drinks.clone(), vec![f.coke.clone()]),
            (f.sides.clone(), vec![f.fries.clone()]),
        ]);
        assert_eq!(session.line_item().group_selections, expected_groups);

        // The defaulted side brings its own default size along
        let expected_modifiers = ModifierSelections::from([
            (f.cheese_key(), vec![f.american.clone()]),
            (f.topping_key(), vec![]),
            (f.fries_key(), vec![f.small_fries.clone()]),
        ]);
        assert_eq!(session.line_item().modifier_selections, expected_modifiers);
        assert_eq!(session.price().cents(), 650 + 1200);
    }

    #[test]
    fn test_meal_to_ala_carte() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_line_item(&f.meal_line_item());
        session.set_bundle(None);

        assert!(session.line_item().group_selections.is_empty());
        // Bundle-scoped slots (fries size) are gone; the base product's
        // customizations survive untouched
        let expected = ModifierSelections::from([
            (f.cheese_key(), vec![f.no_cheese.clone()]),
            (f.topping_key(), vec![f.lettuce.clone(), f.bacon.clone()]),
        ]);
        assert_eq!(session.line_item().modifier_selections, expected);
        // 650 base + 100 lettuce + 300 bacon; the meal upcharge is gone
        assert_eq!(session.price().cents(), 1050);
    }

    #[test]
    fn test_bundle_replaces_never_merges() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));
        session.set_group_selection(&f.drinks, &["D4001"]);

        session.set_bundle(None);
        session.set_bundle(Some(f.meal.clone()));

        // Back to the bundle's defaults; the earlier Pepsi pick must not
        // leak through the round-trip
        assert_eq!(
            session.line_item().group_selections[&f.drinks],
            vec![f.coke.clone()]
        );
    }

    #[test]
    fn test_resetting_same_bundle_is_noop() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));
        session.set_group_selection(&f.drinks, &["D4001"]);

        session.set_bundle(Some(f.meal.clone()));
        assert_eq!(
            session.line_item().group_selections[&f.drinks],
            vec![f.pepsi.clone()]
        );
    }

    #[test]
    fn test_group_selection_swaps_modifier_slots() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));
        assert!(session
            .line_item()
            .modifier_selections
            .contains_key(&f.fries_key()));

        // Swapping fries for tots drops the fries' size slot...
        session.set_group_selection(&f.sides, &["T1000"]);
        assert_eq!(
            session.line_item().group_selections[&f.sides],
            vec![f.tots.clone()]
        );
        assert!(!session
            .line_item()
            .modifier_selections
            .contains_key(&f.fries_key()));

        // ...and swapping back re-seeds the default size
        session.set_group_selection(&f.sides, &["F1000"]);
        assert_eq!(
            session.line_item().modifier_selections[&f.fries_key()],
            vec![f.small_fries.clone()]
        );
    }

    #[test]
    fn test_product_in_sibling_group_keeps_modifier_slot() {
        let f = Fixture::new();
        // A bundle where two option groups both offer fries
        let snacks = Arc::new(ProductGroup {
            id: "PG2000".to_string(),
            name: "Snacks".to_string(),
            default_product: Some(f.fries.clone()),
            options: vec![f.fries.clone(), f.tots.clone()],
        });
        let combo = Arc::new(ProductBundle {
            id: "B2000".to_string(),
            name: "Double Side Combo".to_string(),
            price: Money::from_cents(1500),
            receipt_text: "DSC".to_string(),
            product_groups: vec![f.sides.clone(), snacks.clone()],
        });

        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(combo));
        session.set_modifiers(&f.fries, &f.size_group, &["M3001"]);

        // Deselecting fries from one group must not clear their size
        // slot while the sibling group still selects them
        session.set_group_selection(&f.sides, &["T1000"]);
        assert_eq!(
            session.line_item().modifier_selections[&f.fries_key()],
            vec![f.large_fries.clone()]
        );

        // Once no group selects fries the slot goes too
        session.set_group_selection(&snacks, &["T1000"]);
        assert!(!session
            .line_item()
            .modifier_selections
            .contains_key(&f.fries_key()));
    }

    #[test]
    fn test_adding_modifiers() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_modifiers(&f.burger, &f.cheese_group, &["M1000"]);
        session.set_modifiers(&f.burger, &f.topping_group, &["M2002", "M2001", "M2000"]);

        let expected = ModifierSelections::from([
            (f.cheese_key(), vec![f.no_cheese.clone()]),
            (
                f.topping_key(),
                vec![f.bacon.clone(), f.mushroom.clone(), f.lettuce.clone()],
            ),
        ]);
        assert_eq!(session.line_item().modifier_selections, expected);
        // 650 + 300 + 200 + 100
        assert_eq!(session.price().cents(), 1250);
    }

    #[test]
    fn test_unknown_modifier_ids_dropped() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        let dropped = session.set_modifiers(&f.burger, &f.cheese_group, &["UNKNOWN"]);

        assert_eq!(dropped, vec!["UNKNOWN"]);
        // The slot stays as an (empty) entry, and other groups are untouched
        let expected = ModifierSelections::from([
            (f.cheese_key(), vec![]),
            (f.topping_key(), vec![]),
        ]);
        assert_eq!(session.line_item().modifier_selections, expected);
    }

    #[test]
    fn test_unknown_option_ids_dropped() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));

        let dropped = session.set_group_selection(&f.drinks, &["D4001", "GHOST"]);
        assert_eq!(dropped, vec!["GHOST"]);
        assert_eq!(
            session.line_item().group_selections[&f.drinks],
            vec![f.pepsi.clone()]
        );
        // Sides untouched
        assert_eq!(
            session.line_item().group_selections[&f.sides],
            vec![f.fries.clone()]
        );
    }

    #[test]
    fn test_quantity_validation() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());

        assert!(session.set_quantity(0).is_err());
        assert!(session.set_quantity(-1).is_err());
        assert_eq!(session.line_item().quantity, 1);
        assert_eq!(session.price().cents(), 650);

        assert!(session.set_quantity(3).is_ok());
        assert_eq!(session.price().cents(), 1950);

        assert!(session.set_quantity(MAX_LINE_ITEM_QUANTITY + 1).is_err());
        assert_eq!(session.line_item().quantity, 3);
    }

    #[test]
    fn test_finalize_names_unsatisfied_modifier_group() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_modifiers(&f.burger, &f.cheese_group, &[]);

        assert!(!session.can_finalize());
        match session.finalize() {
            Err(CoreError::SelectionCountOutOfRange {
                group_name,
                min,
                max,
                selected,
                ..
            }) => {
                assert_eq!(group_name, "Cheese");
                assert_eq!((min, max, selected), (1, 1, 0));
            }
            other => panic!("expected SelectionCountOutOfRange, got {other:?}"),
        }

        // Live state is preserved so the user can fix it
        session.set_modifiers(&f.burger, &f.cheese_group, &["M1001"]);
        let line_item = session.finalize().unwrap();
        assert_eq!(line_item.id, session.line_item().id);
        assert_eq!(line_item.price().cents(), 650);
    }

    #[test]
    fn test_finalize_names_empty_option_group() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));
        session.set_group_selection(&f.drinks, &[]);

        match session.finalize() {
            Err(CoreError::OptionGroupUnsatisfied { group_name, .. }) => {
                assert_eq!(group_name, "Drinks");
            }
            other => panic!("expected OptionGroupUnsatisfied, got {other:?}"),
        }

        session.set_group_selection(&f.drinks, &["D4000"]);
        assert!(session.finalize().is_ok());
    }

    #[test]
    fn test_finalize_checks_bundled_product_groups() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_bundle(Some(f.meal.clone()));

        // Empty the bundled fries' required size group
        session.set_modifiers(&f.fries, &f.size_group, &[]);
        match session.finalize() {
            Err(CoreError::SelectionCountOutOfRange { group_name, .. }) => {
                assert_eq!(group_name, "Size");
            }
            other => panic!("expected SelectionCountOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_discard_changes_round_trip() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_line_item(&f.meal_line_item());
        assert!(!session.has_changes());

        session.set_bundle(None);
        assert!(session.has_changes());

        session.set_bundle(Some(f.meal.clone()));
        assert!(session.has_changes());

        // Walk every slice back to the baseline
        session.set_group_selection(&f.drinks, &["D4001"]);
        session.set_modifiers(&f.burger, &f.cheese_group, &["M1000"]);
        session.set_modifiers(&f.burger, &f.topping_group, &["M2000", "M2002"]);
        session.set_modifiers(&f.fries, &f.size_group, &["M3001"]);
        assert!(!session.has_changes());

        session.set_quantity(2).unwrap();
        assert!(session.has_changes());
        session.set_quantity(1).unwrap();
        assert!(!session.has_changes());
    }

    #[test]
    fn test_change_detection_is_order_independent() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_line_item(&f.meal_line_item());

        // Baseline toppings are [Lettuce, Bacon]; re-setting them in the
        // opposite order is not a change
        session.set_modifiers(&f.burger, &f.topping_group, &["M2002", "M2000"]);
        assert!(!session.has_changes());

        session.set_modifiers(&f.burger, &f.topping_group, &["M2002"]);
        assert!(session.has_changes());
    }

    #[test]
    fn test_summary() {
        let f = Fixture::new();
        let mut session = LineItemSession::start_from_product(f.burger.clone());
        session.set_quantity(2).unwrap();

        let summary = session.summary();
        assert_eq!(summary.product_name, "Cheese Burger");
        assert_eq!(summary.price_cents, 1300);
        assert_eq!(summary.quantity, 2);
        assert!(summary.can_finalize);
        assert!(summary.has_changes);
        assert!(!summary.is_editing);

        let edit = LineItemSession::start_from_line_item(&f.meal_line_item());
        assert!(edit.summary().is_editing);
        assert!(!edit.summary().has_changes);
    }
}
