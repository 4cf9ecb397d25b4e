//! # Error Types
//!
//! Domain-specific error types for linecook-core.
//!
//! ## Error Philosophy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Failures are VALUES here, never control-flow interruptions             │
//! │                                                                         │
//! │  Structural omission (bad record, dangling id)  → dropped + logged      │
//! │  Selection validation (unknown id, qty < 1)     → trimmed / rejected    │
//! │  Finalize constraint (group unsatisfied)        → typed CoreError       │
//! │                                                                         │
//! │  The catalog builder NEVER fails; only the selection engine returns     │
//! │  errors, and only at its explicit validation points.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (group name, bounds, counts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core ordering-logic errors.
///
/// These represent constraint violations the user must resolve before a
/// line item can be finalized. They carry enough identity (which group)
/// for the UI to show a targeted message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A modifier group's selection count is outside its [min, max] bounds.
    ///
    /// ## When This Occurs
    /// - A required group (e.g. "Cheese") has nothing selected at finalize
    /// - More options were picked than the group allows
    ///
    /// Selection counts are deliberately NOT clamped at write time; the
    /// user keeps editing freely and this surfaces only at finalize.
    #[error("'{group_name}' needs between {min} and {max} selections, got {selected}")]
    SelectionCountOutOfRange {
        group_id: String,
        group_name: String,
        min: u32,
        max: u32,
        selected: u32,
    },

    /// A bundle option group (e.g. "Drinks") has no product selected.
    #[error("'{group_name}' needs a selection")]
    OptionGroupUnsatisfied {
        group_id: String,
        group_name: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a mutator is handed input that doesn't meet
/// requirements. The mutator rejects the input and leaves state intact.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
