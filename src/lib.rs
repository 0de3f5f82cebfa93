//! # sql-page-rewriter
//!
//! Rewrites one SQL statement and its parameter object into everything needed
//! to run it as an offset-paginated query.
//!
//! ## Core Types
//!
//! - **[`Rewriter`]**: configured once per backend; produces rewrites
//! - **[`RewriteResult`]**: page SQL, count SQL, placeholders, and bound values
//! - **[`StatementTemplate`]**: SQL text plus its declared placeholders
//! - **[`ParameterObject`]**: the caller's parameter value (null, map, scalar, or record)
//! - **[`PageBounds`]**: offset, limit, and [`Order`] directives
//! - **[`Dialect`]**: backend limit/offset syntax
//! - **[`Error`]**: error type for rewrite operations
//!
//! ## Rewriting
//!
//! - **Normalize**: SQL is trimmed and one trailing `;` is removed
//! - **Order**: sort directives wrap the statement in a `temp_order` subquery
//! - **Limit**: the dialect appends or wraps its own paging syntax and registers
//!   the synthetic offset/limit parameters after the declared ones
//! - **Count**: the normalized statement, never the ordered or paged one, is
//!   wrapped in `select count(1)`
//!
//! SQL is treated as opaque text. Nothing is parsed or validated.

mod bind;
mod bounds;
mod config;
mod dialect;
mod error;
mod params;
mod rewriter;
mod scan;
mod statement;

// Re-export public types
pub use bind::SqliteQuery;
pub use bounds::{NO_LIMIT, NO_OFFSET, Order, PageBounds, SortDirection};
pub use config::RewriterConfig;
pub use dialect::{Dialect, PageParameters, PlaceholderStyle, count_sql};
pub use error::{Error, Result};
pub use params::{ParameterMap, ParameterObject, PropertyPath, PropertyResolver, extract_parameters};
pub use rewriter::{RewriteResult, Rewriter, normalize, order_by_sql};
pub use statement::{
   DefaultClassifier, ParamType, ParameterPlaceholder, StatementTemplate, ValueClassifier,
};
