use std::fmt;

/// One union variant's reason for not matching during resolution.
///
/// Variants are never skipped silently: a structural-kind mismatch is
/// recorded here just like a full decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFailure {
    /// Human-readable variant shape, e.g. `model SingleFilterConfig`.
    pub variant: String,
    /// Why this variant was rejected.
    pub reason: String,
}

impl fmt::Display for VariantFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.variant, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors raised while decoding an untyped JSON value into a typed object.
///
/// Every variant except [`DecodeError::UnknownType`] carries the path of the
/// deepest failing value, rendered like `$.message.to[0].email`. Decoding is
/// all-or-nothing: the first failure aborts the whole call.
pub enum DecodeError {
    /// A field marked required was absent from the wire payload.
    #[error("{path}: missing required field `{field}`")]
    MissingRequiredField { path: String, field: &'static str },

    /// An explicit JSON `null` arrived for a field that is not nullable.
    #[error("{path}: unexpected null for non-nullable field")]
    UnexpectedNull { path: String },

    /// A string outside the enum's closed value set.
    #[error("{path}: unknown enum value `{value}` (expected one of: {expected})")]
    UnknownEnumValue {
        path: String,
        value: String,
        expected: String,
    },

    /// The JSON value's kind does not match the expected shape.
    #[error("{path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    /// No variant of a union matched; every variant's reason is listed.
    #[error("{path}: no variant of union `{union}` matched: [{}]", render_failures(.failures))]
    NoMatchingVariant {
        path: String,
        union: &'static str,
        failures: Vec<VariantFailure>,
    },

    /// Lookup of an unregistered model type. This is a programming error in
    /// the caller, not a property of the payload.
    #[error("unknown model type `{type_name}`")]
    UnknownType { type_name: String },
}

fn render_failures(failures: &[VariantFailure]) -> String {
    failures
        .iter()
        .map(VariantFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_cause() {
        let err = DecodeError::MissingRequiredField {
            path: "$.message".to_owned(),
            field: "to",
        };
        assert_eq!(err.to_string(), "$.message: missing required field `to`");

        let err = DecodeError::ShapeMismatch {
            path: "$.results[2]".to_owned(),
            expected: "object".to_owned(),
            found: "string",
        };
        assert_eq!(err.to_string(), "$.results[2]: expected object, found string");
    }

    #[test]
    fn no_matching_variant_lists_every_failure() {
        let err = DecodeError::NoMatchingVariant {
            path: "$.filter".to_owned(),
            union: "FilterConfig",
            failures: vec![
                VariantFailure {
                    variant: "model SingleFilterConfig".to_owned(),
                    reason: "missing required field `path`".to_owned(),
                },
                VariantFailure {
                    variant: "model NestedFilterConfig".to_owned(),
                    reason: "missing required field `rules`".to_owned(),
                },
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("SingleFilterConfig: missing required field `path`"));
        assert!(rendered.contains("NestedFilterConfig: missing required field `rules`"));
    }
}
