//! Backend-specific limit/offset clause construction.
//!
//! A [`Dialect`] is chosen once in [`RewriterConfig`](crate::RewriterConfig).
//! Each variant knows how to turn an already ordered statement into a page
//! statement, registering the synthetic offset/limit parameters it references
//! through [`PageParameters`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Error;
use crate::params::ParameterMap;
use crate::scan::has_top_level_keyword;
use crate::statement::{ParamType, ParameterPlaceholder};

/// How placeholder tokens are written in the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderStyle {
   /// Positional `?`, bound in placeholder order.
   #[default]
   Question,
   /// Numbered `$1`, `$2`, …, by 1-based placeholder position.
   Numbered,
}

/// Registration handle for synthetic page parameters.
///
/// Registering appends a placeholder after every existing one, stores the
/// value in the parameter map, and returns the token to splice into SQL.
pub struct PageParameters<'a> {
   placeholders: &'a mut Vec<ParameterPlaceholder>,
   parameters: &'a mut ParameterMap,
   style: PlaceholderStyle,
}

impl<'a> PageParameters<'a> {
   /// Register into `placeholders` and `parameters`, writing tokens in `style`.
   pub fn new(
      placeholders: &'a mut Vec<ParameterPlaceholder>,
      parameters: &'a mut ParameterMap,
      style: PlaceholderStyle,
   ) -> Self {
      Self {
         placeholders,
         parameters,
         style,
      }
   }

   /// Register `name = value` and return its placeholder token.
   ///
   /// Registering the same name twice appends a second placeholder bound to
   /// the same key, which positional binders need when SQL repeats a value.
   pub fn register(&mut self, name: &str, value: u64) -> String {
      self
         .placeholders
         .push(ParameterPlaceholder::new(name, ParamType::Integer));
      self.parameters.insert(name.to_string(), JsonValue::from(value));

      match self.style {
         PlaceholderStyle::Question => "?".to_string(),
         PlaceholderStyle::Numbered => format!("${}", self.placeholders.len()),
      }
   }
}

/// Database backend whose pagination syntax is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
   /// No backend selected; any paged request fails.
   #[default]
   None,
   #[serde(alias = "mariadb")]
   MySql,
   #[serde(alias = "postgres")]
   PostgreSql,
   Sqlite,
   H2,
   Hsqldb,
   Oracle,
   #[serde(alias = "mssql")]
   SqlServer,
   Db2,
   Derby,
}

impl Dialect {
   /// Name accepted by [`FromStr`] and serde.
   pub fn name(self) -> &'static str {
      match self {
         Dialect::None => "none",
         Dialect::MySql => "mysql",
         Dialect::PostgreSql => "postgresql",
         Dialect::Sqlite => "sqlite",
         Dialect::H2 => "h2",
         Dialect::Hsqldb => "hsqldb",
         Dialect::Oracle => "oracle",
         Dialect::SqlServer => "sqlserver",
         Dialect::Db2 => "db2",
         Dialect::Derby => "derby",
      }
   }

   /// Build the page statement for `sql`, registering the synthetic offset
   /// and limit parameters it references.
   pub fn limit_sql(
      self,
      sql: &str,
      offset_name: &str,
      offset: u64,
      limit_name: &str,
      limit: u64,
      params: &mut PageParameters<'_>,
   ) -> Result<String, Error> {
      let page_sql = match self {
         Dialect::None => {
            return Err(Error::Configuration("no dialect selected".to_string()));
         }
         Dialect::MySql => {
            let offset = params.register(offset_name, offset);
            let limit = params.register(limit_name, limit);
            format!("{} limit {}, {}", sql, offset, limit)
         }
         Dialect::PostgreSql | Dialect::Sqlite | Dialect::H2 | Dialect::Hsqldb => {
            let limit = params.register(limit_name, limit);
            let offset = params.register(offset_name, offset);
            format!("{} limit {} offset {}", sql, limit, offset)
         }
         Dialect::Oracle => {
            let (body, for_update) = split_for_update(sql);
            let end_offset = params.register(offset_name, offset);
            let end_limit = params.register(limit_name, limit);
            let start = params.register(offset_name, offset);
            format!(
               "select * from ( select row_.*, rownum rownum_ from ( {} ) row_ where rownum <= {} + {} ) where rownum_ > {}{}",
               body,
               end_offset,
               end_limit,
               start,
               if for_update { " for update" } else { "" }
            )
         }
         Dialect::SqlServer => {
            // OFFSET/FETCH is only valid after an ORDER BY
            let order = if has_top_level_keyword(sql, "ORDER BY") {
               ""
            } else {
               " order by (select null)"
            };
            let offset = params.register(offset_name, offset);
            let limit = params.register(limit_name, limit);
            format!(
               "{}{} offset {} rows fetch next {} rows only",
               sql, order, offset, limit
            )
         }
         Dialect::Db2 | Dialect::Derby => {
            let offset = params.register(offset_name, offset);
            let limit = params.register(limit_name, limit);
            format!("{} offset {} rows fetch next {} rows only", sql, offset, limit)
         }
      };

      Ok(page_sql)
   }

   /// Build the row-count statement for normalized `sql`.
   pub fn count_sql(self, sql: &str) -> String {
      count_sql(sql)
   }
}

/// Wrap `sql` in a `count(1)` subquery.
pub fn count_sql(sql: &str) -> String {
   format!("select count(1) from ({}) tmp_count", sql)
}

/// Split a trailing ` for update` off `sql`, matched case-insensitively.
fn split_for_update(sql: &str) -> (&str, bool) {
   const SUFFIX: &str = " for update";

   let split = sql.len().checked_sub(SUFFIX.len());
   match split {
      Some(at) if sql.is_char_boundary(at) && sql[at..].eq_ignore_ascii_case(SUFFIX) => {
         (&sql[..at], true)
      }
      _ => (sql, false),
   }
}

impl fmt::Display for Dialect {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.name())
   }
}

impl FromStr for Dialect {
   type Err = Error;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      let dialect = match s.trim().to_ascii_lowercase().as_str() {
         "none" => Dialect::None,
         "mysql" | "mariadb" => Dialect::MySql,
         "postgresql" | "postgres" => Dialect::PostgreSql,
         "sqlite" => Dialect::Sqlite,
         "h2" => Dialect::H2,
         "hsqldb" => Dialect::Hsqldb,
         "oracle" => Dialect::Oracle,
         "sqlserver" | "mssql" => Dialect::SqlServer,
         "db2" => Dialect::Db2,
         "derby" => Dialect::Derby,
         other => {
            return Err(Error::Configuration(format!("unknown dialect '{}'", other)));
         }
      };

      Ok(dialect)
   }
}
