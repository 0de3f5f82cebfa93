/// Result type alias for rewrite operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SQL page rewriting.
///
/// Every error is raised synchronously while building a rewrite. The transform
/// is deterministic, so none of them are worth retrying with the same inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Paging was requested but the configuration cannot produce a limit clause.
   #[error("configuration error: {0}")]
   Configuration(String),

   /// A placeholder path could not be resolved against the parameter object.
   #[error("cannot resolve property '{path}': {reason}")]
   PropertyResolution { path: String, reason: String },

   /// An ORDER BY wrapper was requested with no sort directives to render.
   #[error("order by clause requires at least one sort directive")]
   MalformedDirective,

   /// Sort property contains characters that are unsafe to interpolate.
   ///
   /// Properties must match `[A-Za-z0-9_+.-]+`.
   #[error("invalid order property '{property}': must match [A-Za-z0-9_+.-]+")]
   InvalidOrderProperty { property: String },

   /// Parameter object could not be converted to JSON.
   #[error(transparent)]
   Serialization(#[from] serde_json::Error),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Configuration(_) => "CONFIGURATION_ERROR".to_string(),
         Error::PropertyResolution { .. } => "PROPERTY_RESOLUTION_ERROR".to_string(),
         Error::MalformedDirective => "MALFORMED_DIRECTIVE".to_string(),
         Error::InvalidOrderProperty { .. } => "INVALID_ORDER_PROPERTY".to_string(),
         Error::Serialization(_) => "SERIALIZATION_ERROR".to_string(),
      }
   }

   pub(crate) fn unresolved(path: &str, reason: impl Into<String>) -> Self {
      Error::PropertyResolution {
         path: path.to_string(),
         reason: reason.into(),
      }
   }
}
