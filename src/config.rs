//! Configuration for page rewriting

use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, PlaceholderStyle};

/// Configuration for a [`Rewriter`](crate::Rewriter)
///
/// # Examples
///
/// ```
/// use sql_page_rewriter::{Dialect, RewriterConfig};
///
/// // Use defaults (no dialect: unpaged rewrites only)
/// let config = RewriterConfig::default();
///
/// // Pick a backend
/// let config = RewriterConfig::new().with_dialect(Dialect::PostgreSql);
///
/// // Or load it from JSON
/// let config: RewriterConfig = serde_json::from_str(r#"{"dialect": "mysql"}"#).unwrap();
/// assert_eq!(config.dialect, Dialect::MySql);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriterConfig {
   /// Backend whose limit/offset syntax is generated
   ///
   /// Default: [`Dialect::None`], which rejects paged requests
   pub dialect: Dialect,

   /// Name of the synthetic offset parameter
   ///
   /// Default: `__offset`
   pub offset_name: String,

   /// Name of the synthetic limit parameter
   ///
   /// Default: `__limit`
   pub limit_name: String,

   /// Token style for synthetic placeholders
   ///
   /// Use [`PlaceholderStyle::Numbered`] when statements use `$1`, `$2`, …
   ///
   /// Default: [`PlaceholderStyle::Question`]
   pub placeholder_style: PlaceholderStyle,
}

impl Default for RewriterConfig {
   fn default() -> Self {
      Self {
         dialect: Dialect::None,
         offset_name: "__offset".to_string(),
         limit_name: "__limit".to_string(),
         placeholder_style: PlaceholderStyle::Question,
      }
   }
}

impl RewriterConfig {
   /// Default configuration: no dialect, `__offset`/`__limit`, `?` placeholders.
   pub fn new() -> Self {
      Self::default()
   }

   /// Select the backend whose limit syntax is generated.
   pub fn with_dialect(mut self, dialect: Dialect) -> Self {
      self.dialect = dialect;
      self
   }

   /// Rename the synthetic offset and limit parameters.
   pub fn with_parameter_names(
      mut self,
      offset_name: impl Into<String>,
      limit_name: impl Into<String>,
   ) -> Self {
      self.offset_name = offset_name.into();
      self.limit_name = limit_name.into();
      self
   }

   pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
      self.placeholder_style = style;
      self
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults() {
      let config = RewriterConfig::default();
      assert_eq!(config.dialect, Dialect::None);
      assert_eq!(config.offset_name, "__offset");
      assert_eq!(config.limit_name, "__limit");
      assert_eq!(config.placeholder_style, PlaceholderStyle::Question);
   }

   #[test]
   fn deserialize_partial_json() {
      let config: RewriterConfig =
         serde_json::from_str(r#"{"dialect": "postgres", "placeholderStyle": "numbered"}"#)
            .unwrap();

      assert_eq!(config.dialect, Dialect::PostgreSql);
      assert_eq!(config.placeholder_style, PlaceholderStyle::Numbered);
      assert_eq!(config.limit_name, "__limit");
   }

   #[test]
   fn builder_overrides() {
      let config = RewriterConfig::new()
         .with_dialect(Dialect::Oracle)
         .with_parameter_names("_skip", "_take");

      assert_eq!(config.dialect, Dialect::Oracle);
      assert_eq!(config.offset_name, "_skip");
      assert_eq!(config.limit_name, "_take");
   }
}
