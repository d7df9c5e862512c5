/// All errors that can be returned while decoding or encoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The text is not valid JSON, or its top-level value is empty
    /// (`null`, `false`, `0`, `""`, `"0"` or `[]`).
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The discriminator names a type that is not in the registry.
    #[error("unknown type: '{0}'")]
    UnknownType(String),

    /// The discriminator is present but does not hold a string.
    #[error("discriminator '{field}' must be a string, found {found}")]
    InvalidDiscriminator { field: String, found: &'static str },

    /// A source key has no matching field on the destination type and the
    /// resolver is configured to reject such keys.
    #[error("{type_name} has no field '{field}'")]
    FieldMismatch { type_name: String, field: String },

    /// A declared field rejected the value it was given.
    #[error("{type_name}.{field}: {source}")]
    Field {
        type_name: String,
        field: String,
        #[source]
        source: Box<ResolveError>,
    },

    /// A node could not be converted into the requested Rust type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A float field holds NaN or an infinity, which JSON cannot represent.
    #[error("cannot encode non-finite number {0}")]
    NonFiniteNumber(f64),

    /// A type identifier was registered twice.
    #[error("type already registered: '{0}'")]
    DuplicateType(String),

    /// The payload or object graph nests deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    /// The JSON encoder failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ResolveError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Locate this error at `field` of the type identified by `type_name`.
    pub fn in_field(self, type_name: &str, field: &str) -> Self {
        ResolveError::Field {
            type_name: type_name.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}
