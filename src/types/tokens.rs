//! Reserved sentinel tokens shared between recipe SQL and the value kernels.
//!
//! None of these may occur in real column data.

/// Marks a null element inside a `LIST(...)` aggregation.
pub const NULL_TOKEN: &str = "_purrNULL_";

/// Separates elements inside a `LIST(...)` aggregation.
pub const DELIM_TOKEN: &str = "_purrDELIM_";

/// Placeholder where the query builder splices its predicate.
pub const WHERE_TOKEN: &str = "_purrWHERE_";
