//! Parameter extraction: flattening a parameter object into named bindings.
//!
//! A statement references its parameters by property path (`id`,
//! `user.name`, `tags[0]`). The extractor turns whatever the caller passed
//! (nothing, a map, a scalar, or a structured record) into a fresh
//! name-keyed mapping that satisfies every declared placeholder.
//!
//! For structured records each placeholder is bound under its full name, and
//! the dotted segments are mirrored as nested objects so that both `user.id`
//! and `user` → `{ "id": … }` resolve.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::Error;
use crate::statement::ValueClassifier;

/// The bound parameter set produced by a rewrite.
pub type ParameterMap = IndexMap<String, JsonValue>;

/// One step of a property path: `name`, optional `[index]`, and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath<'a> {
   indexed_name: &'a str,
   name: &'a str,
   index: Option<&'a str>,
   children: Option<&'a str>,
}

impl<'a> PropertyPath<'a> {
   /// Split off the first segment of `path`. An unclosed `[` takes the rest
   /// of the segment as its index.
   pub fn parse(path: &'a str) -> Self {
      let (head, children) = match path.split_once('.') {
         Some((head, rest)) => (head, Some(rest)),
         None => (path, None),
      };

      let (name, index) = match head.find('[') {
         Some(open) => {
            let inner = &head[open + 1..];
            let inner = inner.strip_suffix(']').unwrap_or(inner);
            (&head[..open], Some(inner))
         }
         None => (head, None),
      };

      Self {
         indexed_name: head,
         name,
         index,
         children,
      }
   }

   /// The segment including its index, e.g. `items[0]`.
   pub fn indexed_name(&self) -> &'a str {
      self.indexed_name
   }

   /// The segment without its index, e.g. `items`.
   pub fn name(&self) -> &'a str {
      self.name
   }

   /// The text between the brackets, if the segment is indexed.
   pub fn index(&self) -> Option<&'a str> {
      self.index
   }

   /// Remaining path after this segment.
   pub fn children(&self) -> Option<&'a str> {
      self.children
   }
}

/// Resolves property paths against one kind of parameter object.
///
/// Implement this for caller-defined records and pass them as
/// [`ParameterObject::Record`].
pub trait PropertyResolver {
   /// Resolve a dotted, optionally indexed path such as `orders[1].total`.
   fn resolve_property(&self, path: &str) -> Result<JsonValue, Error>;
}

impl PropertyResolver for JsonValue {
   fn resolve_property(&self, path: &str) -> Result<JsonValue, Error> {
      let mut current = self;
      let mut remaining = Some(path);

      while let Some(rest) = remaining {
         if current.is_null() {
            return Ok(JsonValue::Null);
         }

         let step = PropertyPath::parse(rest);
         current = lookup_segment(current, &step, path)?;
         remaining = step.children();
      }

      Ok(current.clone())
   }
}

impl PropertyResolver for ParameterMap {
   fn resolve_property(&self, path: &str) -> Result<JsonValue, Error> {
      let step = PropertyPath::parse(path);
      let head = self
         .get(step.name())
         .ok_or_else(|| Error::unresolved(path, format!("no property '{}'", step.name())))?;

      let head = match step.index() {
         Some(index) => index_into(head, index, path)?,
         None => head,
      };

      match step.children() {
         Some(children) => head.resolve_property(children).map_err(|err| match err {
            Error::PropertyResolution { reason, .. } => Error::unresolved(path, reason),
            other => other,
         }),
         None => Ok(head.clone()),
      }
   }
}

fn lookup_segment<'v>(
   value: &'v JsonValue,
   step: &PropertyPath<'_>,
   path: &str,
) -> Result<&'v JsonValue, Error> {
   let object = value.as_object().ok_or_else(|| {
      Error::unresolved(
         path,
         format!("cannot read property '{}' of a non-object value", step.name()),
      )
   })?;

   let field = object
      .get(step.name())
      .ok_or_else(|| Error::unresolved(path, format!("no property '{}'", step.name())))?;

   match step.index() {
      Some(index) => index_into(field, index, path),
      None => Ok(field),
   }
}

fn index_into<'v>(value: &'v JsonValue, index: &str, path: &str) -> Result<&'v JsonValue, Error> {
   let found = match value {
      JsonValue::Array(items) => index.parse::<usize>().ok().and_then(|i| items.get(i)),
      JsonValue::Object(map) => map.get(index),
      _ => None,
   };

   found.ok_or_else(|| Error::unresolved(path, format!("index [{}] not found", index)))
}

/// The raw parameter value supplied with a statement.
pub enum ParameterObject {
   /// No parameter object.
   Null,
   /// A name-keyed mapping, copied as-is. Placeholders with no entry of their
   /// own are read as property paths into it (`user.id` from `user`).
   Map(ParameterMap),
   /// Any JSON value: simple values bind to every placeholder, objects are
   /// traversed by property path.
   Value(JsonValue),
   /// A caller-defined record resolved through [`PropertyResolver`].
   Record(Box<dyn PropertyResolver + Send + Sync>),
}

impl ParameterObject {
   /// Convert any serializable value into a parameter object.
   pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
      Ok(serde_json::to_value(value)?.into())
   }
}

impl fmt::Debug for ParameterObject {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         ParameterObject::Null => f.write_str("Null"),
         ParameterObject::Map(map) => f.debug_tuple("Map").field(map).finish(),
         ParameterObject::Value(value) => f.debug_tuple("Value").field(value).finish(),
         ParameterObject::Record(_) => f.write_str("Record(..)"),
      }
   }
}

impl From<JsonValue> for ParameterObject {
   fn from(value: JsonValue) -> Self {
      if value.is_null() {
         ParameterObject::Null
      } else {
         ParameterObject::Value(value)
      }
   }
}

impl From<ParameterMap> for ParameterObject {
   fn from(map: ParameterMap) -> Self {
      ParameterObject::Map(map)
   }
}

impl<T: Into<ParameterObject>> From<Option<T>> for ParameterObject {
   fn from(value: Option<T>) -> Self {
      value.map_or(ParameterObject::Null, Into::into)
   }
}

/// Build the bound parameter set for `names` from `parameter`.
///
/// The parameter object is never modified; the result is always a new map.
pub fn extract_parameters<'n>(
   names: impl IntoIterator<Item = &'n str>,
   parameter: &ParameterObject,
   classifier: &dyn ValueClassifier,
) -> Result<ParameterMap, Error> {
   match parameter {
      ParameterObject::Null | ParameterObject::Value(JsonValue::Null) => Ok(ParameterMap::new()),
      ParameterObject::Map(map) => Ok(map.clone()),
      ParameterObject::Value(value) if value.is_array() || classifier.is_simple(value) => Ok(names
         .into_iter()
         .map(|name| (name.to_string(), value.clone()))
         .collect()),
      ParameterObject::Value(record) => extract_record(names, record),
      ParameterObject::Record(record) => extract_record(names, &**record),
   }
}

/// Look up the value bound to `name`, falling back to a property path into
/// the map when there is no entry under the full name.
///
/// A path whose first segment has no entry yields `null`.
pub(crate) fn lookup_binding(params: &ParameterMap, name: &str) -> Result<JsonValue, Error> {
   if let Some(value) = params.get(name) {
      return Ok(value.clone());
   }

   if !params.contains_key(PropertyPath::parse(name).name()) {
      return Ok(JsonValue::Null);
   }

   params.resolve_property(name)
}

fn extract_record<'n>(
   names: impl IntoIterator<Item = &'n str>,
   record: &(impl PropertyResolver + ?Sized),
) -> Result<ParameterMap, Error> {
   let mut params = ParameterMap::new();

   for name in names {
      let value = record.resolve_property(name)?;
      bind_path(&mut params, "", name, &value, record)?;
      params.insert(name.to_string(), value);
   }

   Ok(params)
}

/// Key/value container that nested bindings can be written into.
trait Slots {
   fn contains(&self, key: &str) -> bool;
   fn put(&mut self, key: &str, value: JsonValue);
   /// Find or create a child object; `None` if `key` holds a non-object.
   fn child(&mut self, key: &str) -> Option<&mut JsonMap<String, JsonValue>>;
}

impl Slots for ParameterMap {
   fn contains(&self, key: &str) -> bool {
      self.contains_key(key)
   }

   fn put(&mut self, key: &str, value: JsonValue) {
      self.insert(key.to_string(), value);
   }

   fn child(&mut self, key: &str) -> Option<&mut JsonMap<String, JsonValue>> {
      self
         .entry(key.to_string())
         .or_insert_with(|| JsonValue::Object(JsonMap::new()))
         .as_object_mut()
   }
}

impl Slots for JsonMap<String, JsonValue> {
   fn contains(&self, key: &str) -> bool {
      self.contains_key(key)
   }

   fn put(&mut self, key: &str, value: JsonValue) {
      self.insert(key.to_string(), value);
   }

   fn child(&mut self, key: &str) -> Option<&mut JsonMap<String, JsonValue>> {
      self
         .entry(key)
         .or_insert_with(|| JsonValue::Object(JsonMap::new()))
         .as_object_mut()
   }
}

/// Write `value` for `property` into `slots`, building one nested object per
/// dotted segment. `parent` is the path already consumed, used to resolve the
/// unindexed sibling of an indexed leaf.
fn bind_path(
   slots: &mut impl Slots,
   parent: &str,
   property: &str,
   value: &JsonValue,
   record: &(impl PropertyResolver + ?Sized),
) -> Result<(), Error> {
   let step = PropertyPath::parse(property);

   if let Some(children) = step.children() {
      if let Some(child) = slots.child(step.indexed_name()) {
         let prefix = join_path(parent, step.indexed_name());
         bind_path(child, &prefix, children, value, record)?;
      }
   } else if step.index().is_some() {
      if !slots.contains(step.name()) {
         let sibling = record.resolve_property(&join_path(parent, step.name()))?;
         slots.put(step.name(), sibling);
      }
      slots.put(property, value.clone());
   } else {
      slots.put(property, value.clone());
   }

   Ok(())
}

fn join_path(parent: &str, segment: &str) -> String {
   if parent.is_empty() {
      segment.to_string()
   } else {
      format!("{}.{}", parent, segment)
   }
}
