//! Pattern stencils and their placement constraints

/// Constraint records and raw-map resolution
pub mod constraints;
/// Pattern stencils and the pattern source interface
pub mod pattern;

pub use constraints::{ConstraintIndex, Override, PatternConstraint, RawConstraints};
pub use pattern::{Pattern, PatternSource};
