//! Pagination request types: offset, limit, and sort directives.
//!
//! # Example
//!
//! ```
//! use sql_page_rewriter::{Order, PageBounds};
//!
//! let bounds = PageBounds::page(3, 20)
//!    .with_order(Order::desc("created_at"))
//!    .with_order(Order::asc("id"));
//!
//! assert_eq!(bounds.offset, 40);
//! assert_eq!(bounds.limit, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Offset sentinel meaning "start at the first row".
pub const NO_OFFSET: u64 = 0;

/// Limit sentinel meaning "return every row".
pub const NO_LIMIT: u64 = i32::MAX as u64;

/// Sort direction for an order directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// SQL keyword for this direction.
   pub fn as_sql(self) -> &'static str {
      match self {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      }
   }

   fn parse(token: &str) -> Option<Self> {
      if token.eq_ignore_ascii_case("asc") {
         Some(SortDirection::Asc)
      } else if token.eq_ignore_ascii_case("desc") {
         Some(SortDirection::Desc)
      } else {
         None
      }
   }
}

/// A single sort directive appended to the page query's ORDER BY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
   /// Column or expression to sort by
   pub property: String,
   /// Sort direction for this property
   pub direction: SortDirection,
   /// Optional template wrapping the property, e.g.
   /// `nlssort(? 'NLS_SORT=SCHINESE_PINYIN_M')`. The first `?` is replaced
   /// with the property.
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub expression: Option<String>,
}

impl Order {
   /// Create an order directive. The property is checked when the ORDER BY
   /// clause is rendered, not here.
   pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
      Self {
         property: property.into(),
         direction,
         expression: None,
      }
   }

   /// Create an order directive with ascending sort direction.
   pub fn asc(property: impl Into<String>) -> Self {
      Self::new(property, SortDirection::Asc)
   }

   /// Create an order directive with descending sort direction.
   pub fn desc(property: impl Into<String>) -> Self {
      Self::new(property, SortDirection::Desc)
   }

   /// Wrap the property in an expression template.
   pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
      self.expression = Some(expression.into());
      self
   }

   /// Parse a comma-separated order segment such as `"age.desc, name"`.
   ///
   /// Each item is `property` or `property.direction`; the direction suffix is
   /// only recognized when it is `asc` or `desc`, so qualified names like
   /// `user.name` keep their dot. Items without a direction sort ascending.
   /// Blank items are skipped.
   pub fn parse_list(segment: &str) -> Result<Vec<Order>, Error> {
      let mut orders = Vec::new();

      for item in segment.split(',') {
         let item = item.trim();
         if item.is_empty() {
            continue;
         }

         let (property, direction) = match item.rsplit_once('.') {
            Some((property, suffix)) => match SortDirection::parse(suffix) {
               Some(direction) => (property, direction),
               None => (item, SortDirection::Asc),
            },
            None => (item, SortDirection::Asc),
         };

         validate_property(property)?;
         orders.push(Order::new(property, direction));
      }

      Ok(orders)
   }
}

impl fmt::Display for Order {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self.expression.as_deref() {
         Some(expr) if expr.contains('?') => write!(
            f,
            "{} {}",
            expr.replacen('?', &self.property, 1),
            self.direction.as_sql()
         ),
         _ => write!(f, "{} {}", self.property, self.direction.as_sql()),
      }
   }
}

/// Validate that a sort property is safe for SQL interpolation.
///
/// Accepts names matching `[A-Za-z0-9_+.-]+`, which covers plain and qualified
/// column names.
pub(crate) fn validate_property(property: &str) -> Result<(), Error> {
   let valid = !property.is_empty()
      && property
         .chars()
         .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '.' | '-'));

   if !valid {
      return Err(Error::InvalidOrderProperty {
         property: property.to_string(),
      });
   }

   Ok(())
}

/// Offset, limit, and ordering requested for one paginated query.
///
/// `orders` may contain `None` entries (e.g. `null` in deserialized input);
/// these are skipped when the ORDER BY clause is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageBounds {
   /// Rows to skip, or [`NO_OFFSET`]
   pub offset: u64,
   /// Maximum rows to return, or [`NO_LIMIT`]
   pub limit: u64,
   /// Sort directives in priority order
   pub orders: Vec<Option<Order>>,
}

impl Default for PageBounds {
   fn default() -> Self {
      Self {
         offset: NO_OFFSET,
         limit: NO_LIMIT,
         orders: Vec::new(),
      }
   }
}

impl PageBounds {
   /// Unbounded request with no ordering.
   pub fn new() -> Self {
      Self::default()
   }

   /// First `limit` rows.
   pub fn limit(limit: u64) -> Self {
      Self {
         limit,
         ..Self::default()
      }
   }

   /// Request a 1-based page of `limit` rows. Page `0` is treated as page `1`.
   pub fn page(page: u64, limit: u64) -> Self {
      let page = page.max(1);
      Self {
         offset: (page - 1).saturating_mul(limit),
         limit,
         orders: Vec::new(),
      }
   }

   /// Skip `offset` rows before the page starts.
   pub fn with_offset(mut self, offset: u64) -> Self {
      self.offset = offset;
      self
   }

   /// Append a sort directive.
   pub fn with_order(mut self, order: Order) -> Self {
      self.orders.push(Some(order));
      self
   }

   /// Append several sort directives.
   pub fn with_orders(mut self, orders: impl IntoIterator<Item = Order>) -> Self {
      self.orders.extend(orders.into_iter().map(Some));
      self
   }

   /// Whether an offset or a limit was requested.
   pub fn is_paged(&self) -> bool {
      self.offset != NO_OFFSET || self.limit != NO_LIMIT
   }

   /// Sort directives with `None` entries discarded.
   pub fn present_orders(&self) -> Vec<&Order> {
      self.orders.iter().flatten().collect()
   }
}
