//! Binding rewritten statements onto SQLx SQLite queries.

use serde_json::Value as JsonValue;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

use crate::rewriter::RewriteResult;

/// A SQLite query with its arguments bound.
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

impl RewriteResult {
   /// The page statement with every placeholder value bound in order.
   pub fn page_query(&self) -> SqliteQuery<'_> {
      bind_all(sqlx::query(self.page_sql()), self.ordered_values())
   }

   /// The count statement with the declared placeholder values bound in order.
   pub fn count_query(&self) -> SqliteQuery<'_> {
      bind_all(sqlx::query(self.count_sql()), self.count_values())
   }
}

fn bind_all(query: SqliteQuery<'_>, values: Vec<JsonValue>) -> SqliteQuery<'_> {
   values.into_iter().fold(query, bind_value)
}

/// Bind one JSON value using the closest SQLite storage class.
fn bind_value(query: SqliteQuery<'_>, value: JsonValue) -> SqliteQuery<'_> {
   match value {
      JsonValue::Null => query.bind(None::<JsonValue>),
      JsonValue::Bool(flag) => query.bind(flag),
      JsonValue::String(text) => query.bind(text),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Value too large for i64, use f64 (will lose precision)
            query.bind(uint_val as f64)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}
