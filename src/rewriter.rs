//! Page, count, and parameter rewriting for one statement.
//!
//! A [`Rewriter`] is configured once with a [`Dialect`](crate::Dialect) and a
//! [`ValueClassifier`]. Each call to [`Rewriter::rewrite`] produces an
//! immutable [`RewriteResult`]:
//!
//! ```text
//! statement ──normalize──┬──order by?──limit?──▶ page_sql
//!                        └──────────────────────▶ count_sql
//! parameter ──extract──────────(+ offset/limit)─▶ parameters
//! ```
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sql_page_rewriter::{
//!    Dialect, Order, PageBounds, ParameterObject, Rewriter, RewriterConfig, StatementTemplate,
//! };
//!
//! let rewriter = Rewriter::new(RewriterConfig::new().with_dialect(Dialect::MySql));
//! let statement = StatementTemplate::with_names("SELECT * FROM users WHERE age > ?;", ["minAge"]);
//! let bounds = PageBounds::page(2, 10).with_order(Order::desc("age"));
//!
//! let result = rewriter
//!    .rewrite(&statement, &ParameterObject::from(json!(18)), &bounds)
//!    .unwrap();
//!
//! assert_eq!(
//!    result.page_sql(),
//!    "select * from (SELECT * FROM users WHERE age > ?) temp_order order by age DESC limit ?, ?"
//! );
//! assert_eq!(
//!    result.count_sql(),
//!    "select count(1) from (SELECT * FROM users WHERE age > ?) tmp_count"
//! );
//! assert_eq!(result.ordered_values(), vec![json!(18), json!(10), json!(10)]);
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::Error;
use crate::bounds::{Order, PageBounds, validate_property};
use crate::config::RewriterConfig;
use crate::dialect::PageParameters;
use crate::params::{ParameterMap, ParameterObject, extract_parameters, lookup_binding};
use crate::statement::{DefaultClassifier, ParameterPlaceholder, StatementTemplate, ValueClassifier};

/// Trim `sql` and drop one trailing `;`, if present.
///
/// Whitespace left in front of the removed `;` is trimmed too, so applying
/// this to its own output changes nothing unless another `;` is exposed.
pub fn normalize(sql: &str) -> &str {
   let trimmed = sql.trim();
   match trimmed.strip_suffix(';') {
      Some(stripped) => stripped.trim_end(),
      None => trimmed,
   }
}

/// Wrap `sql` in a `temp_order` subquery sorted by `orders`.
///
/// Every property must match `[A-Za-z0-9_+.-]+`, whichever way the order was
/// built, since it is interpolated into the SQL.
pub fn order_by_sql(sql: &str, orders: &[&Order]) -> Result<String, Error> {
   if orders.is_empty() {
      return Err(Error::MalformedDirective);
   }

   let mut rendered = Vec::with_capacity(orders.len());
   for order in orders {
      validate_property(&order.property)?;
      rendered.push(order.to_string());
   }

   Ok(format!(
      "select * from ({}) temp_order order by {}",
      sql,
      rendered.join(", ")
   ))
}

/// Rewrites statements into page and count statements for one backend.
///
/// The rewriter holds no per-request state and can be shared across threads.
pub struct Rewriter {
   config: RewriterConfig,
   classifier: Box<dyn ValueClassifier + Send + Sync>,
}

impl Rewriter {
   /// Create a rewriter that treats every non-object JSON value as simple.
   pub fn new(config: RewriterConfig) -> Self {
      Self::with_classifier(config, DefaultClassifier)
   }

   /// Create a rewriter with a custom simple-value classifier.
   pub fn with_classifier(
      config: RewriterConfig,
      classifier: impl ValueClassifier + Send + Sync + 'static,
   ) -> Self {
      Self {
         config,
         classifier: Box::new(classifier),
      }
   }

   /// The configuration this rewriter was built with.
   pub fn config(&self) -> &RewriterConfig {
      &self.config
   }

   /// Rewrite `statement` for the page described by `bounds`.
   ///
   /// `parameter` is only read; the returned parameter set is a new map.
   pub fn rewrite(
      &self,
      statement: &StatementTemplate,
      parameter: &ParameterObject,
      bounds: &PageBounds,
   ) -> Result<RewriteResult, Error> {
      let mut parameters =
         extract_parameters(statement.placeholder_names(), parameter, &*self.classifier)?;
      if let ParameterObject::Map(_) = parameter {
         // Maps are copied as-is; nested names must still resolve at bind time
         for name in statement.placeholder_names() {
            lookup_binding(&parameters, name)?;
         }
      }
      let mut placeholders = statement.placeholders().to_vec();
      let declared = placeholders.len();

      let sql = normalize(statement.sql());

      let orders = bounds.present_orders();
      let ordered = !orders.is_empty();
      let mut page_sql = if ordered {
         order_by_sql(sql, &orders)?
      } else {
         sql.to_string()
      };

      let paged = bounds.is_paged();
      if paged {
         let mut page_params =
            PageParameters::new(&mut placeholders, &mut parameters, self.config.placeholder_style);
         page_sql = self.config.dialect.limit_sql(
            &page_sql,
            &self.config.offset_name,
            bounds.offset,
            &self.config.limit_name,
            bounds.limit,
            &mut page_params,
         )?;
      }

      let count_sql = self.config.dialect.count_sql(sql);

      debug!(
         dialect = %self.config.dialect,
         placeholders = placeholders.len(),
         ordered,
         paged,
         "Rewrote statement for pagination"
      );
      trace!(page_sql = %page_sql, count_sql = %count_sql, "Generated page and count SQL");

      Ok(RewriteResult {
         page_sql,
         count_sql,
         placeholders,
         parameters,
         declared,
      })
   }
}

impl fmt::Debug for Rewriter {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Rewriter")
         .field("config", &self.config)
         .finish_non_exhaustive()
   }
}

/// The frozen output of one rewrite.
///
/// Serializes with camelCase keys; `declared` is the number of leading
/// placeholders that belong to the statement template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
   page_sql: String,
   count_sql: String,
   placeholders: Vec<ParameterPlaceholder>,
   parameters: ParameterMap,
   declared: usize,
}

impl RewriteResult {
   /// Statement returning the requested page.
   pub fn page_sql(&self) -> &str {
      &self.page_sql
   }

   /// Statement returning the total row count, without ordering or paging.
   pub fn count_sql(&self) -> &str {
      &self.count_sql
   }

   /// Declared placeholders followed by any synthetic ones.
   pub fn placeholders(&self) -> &[ParameterPlaceholder] {
      &self.placeholders
   }

   /// Placeholders declared by the statement template, the only ones
   /// [`count_sql`](Self::count_sql) references.
   pub fn declared_placeholders(&self) -> &[ParameterPlaceholder] {
      &self.placeholders[..self.declared]
   }

   /// The bound parameter set, including the offset and limit entries.
   pub fn parameters(&self) -> &ParameterMap {
      &self.parameters
   }

   /// Values for [`page_sql`](Self::page_sql) in placeholder order.
   ///
   /// A name with no entry of its own is read as a property path into the
   /// parameter set (`user.id` from `user`); names whose first segment is
   /// unbound yield `null`.
   pub fn ordered_values(&self) -> Vec<JsonValue> {
      self.values_for(&self.placeholders)
   }

   /// Values for [`count_sql`](Self::count_sql) in placeholder order.
   pub fn count_values(&self) -> Vec<JsonValue> {
      self.values_for(self.declared_placeholders())
   }

   fn values_for(&self, placeholders: &[ParameterPlaceholder]) -> Vec<JsonValue> {
      placeholders
         .iter()
         .map(|p| lookup_binding(&self.parameters, &p.name).unwrap_or(JsonValue::Null))
         .collect()
   }
}
