//! # linecook-core: Pure Ordering Logic for LineCook POS
//!
//! This crate is the **heart** of the LineCook ordering client. It turns a
//! flat menu payload into a navigable catalog graph and drives the
//! configuration of individual order lines, as pure logic with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LineCook POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Ordering UI                                │   │
//! │  │    Menu Browser ──► Item Detail ──► Bag ──► Checkout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ linecook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  payload  │  │  catalog  │  │resolution │  │  session  │   │   │
//! │  │   │ flat wire │  │  builder  │  │ defaults, │  │ line-item │   │   │
//! │  │   │  records  │  │  + state  │  │ id checks │  │  engine   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Host Shell (fetch, persistence, printing)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`payload`] - Flat, id-referencing menu payload records
//! - [`catalog`] - Catalog graph builder and atomically swappable state
//! - [`types`] - Domain types (Product, ProductBundle, ModifierGroup, LineItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`resolution`] - Default selections and id resolution against the graph
//! - [`session`] - Line-item selection engine and change detection
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Tolerant Reads**: A malformed menu record is skipped, never a crash
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use linecook_core::catalog::CatalogGraph;
//! use linecook_core::payload::MenuPayload;
//! use linecook_core::session::LineItemSession;
//!
//! let payload: MenuPayload = serde_json::from_str("{}").unwrap();
//! let graph = CatalogGraph::build(payload);
//!
//! // With a real payload: pick a product, configure it, price it.
//! if let Some(category) = graph.categories.first() {
//!     let product = category.products[0].clone();
//!     let session = LineItemSession::start_from_product(product);
//!     let _cents = session.price().cents();
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod payload;
pub mod resolution;
pub mod session;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use linecook_core::Money` instead of
// `use linecook_core::money::Money`

pub use catalog::{CatalogGraph, CatalogState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payload::MenuPayload;
pub use session::{has_changes, LineItemSession, LineItemSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Can be made configurable per-location in future versions.
pub const MAX_LINE_ITEM_QUANTITY: i64 = 999;
