//! Statement templates and parameter placeholder descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Semantic type of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamType {
   Integer,
   Real,
   Text,
   Boolean,
   Json,
   #[default]
   Any,
}

/// A named slot in the SQL text, in the order the statement references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterPlaceholder {
   /// Property path used to look up the bound value, e.g. `user.id`
   pub name: String,
   #[serde(default)]
   pub param_type: ParamType,
}

impl ParameterPlaceholder {
   /// Create a placeholder bound to the property path `name`.
   pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
      Self {
         name: name.into(),
         param_type,
      }
   }
}

/// SQL text together with the placeholders it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementTemplate {
   sql: String,
   placeholders: Vec<ParameterPlaceholder>,
}

impl StatementTemplate {
   pub fn new(sql: impl Into<String>, placeholders: Vec<ParameterPlaceholder>) -> Self {
      Self {
         sql: sql.into(),
         placeholders,
      }
   }

   /// Build a template whose placeholders are all [`ParamType::Any`].
   pub fn with_names<I, S>(sql: impl Into<String>, names: I) -> Self
   where
      I: IntoIterator<Item = S>,
      S: Into<String>,
   {
      let placeholders = names
         .into_iter()
         .map(|name| ParameterPlaceholder::new(name, ParamType::Any))
         .collect();
      Self::new(sql, placeholders)
   }

   pub fn sql(&self) -> &str {
      &self.sql
   }

   pub fn placeholders(&self) -> &[ParameterPlaceholder] {
      &self.placeholders
   }

   pub(crate) fn placeholder_names(&self) -> impl Iterator<Item = &str> {
      self.placeholders.iter().map(|p| p.name.as_str())
   }
}

/// Decides whether a runtime value is a "simple" scalar.
///
/// A simple parameter object is bound as-is to every placeholder instead of
/// being traversed by property path.
pub trait ValueClassifier {
   fn is_simple(&self, value: &JsonValue) -> bool;
}

/// Treats every JSON value except objects as simple.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ValueClassifier for DefaultClassifier {
   fn is_simple(&self, value: &JsonValue) -> bool {
      !value.is_object()
   }
}

impl<F> ValueClassifier for F
where
   F: Fn(&JsonValue) -> bool,
{
   fn is_simple(&self, value: &JsonValue) -> bool {
      self(value)
   }
}
