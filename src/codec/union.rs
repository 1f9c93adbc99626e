//! Union resolution: picks the variant a JSON value matches.
//!
//! Variants are attempted in declaration order and the first successful
//! decode wins, even when a later variant would also match. Declaration
//! order is the tie-break rule for shape-based (non-tagged) unions; callers
//! depend on it, so no best-match heuristic is applied. Encoding needs no
//! resolution: a decoded value already is its committed variant.

use serde_json::Value as JsonValue;

use crate::codec::decode::{Decoder, Path, json_kind};
use crate::codec::error::{DecodeError, VariantFailure};
use crate::codec::spec::{Shape, UnionSpec};
use crate::codec::value::Value;

impl Decoder<'_> {
    /// Resolve `value` against the union's variants.
    ///
    /// Returns the matched variant's index and decoded value, or
    /// [`DecodeError::NoMatchingVariant`] listing every variant's failure
    /// reason.
    pub fn resolve(
        &self,
        union: &'static UnionSpec,
        value: &JsonValue,
    ) -> Result<(usize, Value), DecodeError> {
        let mut path = Path::root();
        self.decode_union(union, value, &mut path)
    }

    pub(crate) fn decode_union(
        &self,
        union: &'static UnionSpec,
        value: &JsonValue,
        path: &mut Path,
    ) -> Result<(usize, Value), DecodeError> {
        let depth = path.depth();
        let mut failures = Vec::with_capacity(union.variants.len());
        for (index, variant) in union.variants.iter().enumerate() {
            // Cheap structural pre-check. Skips are recorded, never silent.
            if let Err(reason) = kind_compatible(variant, value) {
                failures.push(VariantFailure {
                    variant: variant.describe(),
                    reason,
                });
                continue;
            }
            match self.decode_shape(variant, value, path) {
                Ok(decoded) => return Ok((index, decoded)),
                Err(err) => {
                    // A failed attempt may have left segments on the path.
                    path.truncate(depth);
                    failures.push(VariantFailure {
                        variant: variant.describe(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        Err(DecodeError::NoMatchingVariant {
            path: path.render(),
            union: union.name,
            failures,
        })
    }
}

/// Top-level kind check: rejects variants whose shape cannot possibly match
/// the JSON value's kind, without attempting a full decode.
fn kind_compatible(shape: &Shape, value: &JsonValue) -> Result<(), String> {
    let expected = match shape {
        Shape::Bool => matches!(value, JsonValue::Bool(_)).then_some(()).ok_or("bool"),
        Shape::Int | Shape::Float => matches!(value, JsonValue::Number(_))
            .then_some(())
            .ok_or("number"),
        Shape::String | Shape::Enum(_) => matches!(value, JsonValue::String(_))
            .then_some(())
            .ok_or("string"),
        Shape::Model(_) | Shape::Map(_) => matches!(value, JsonValue::Object(_))
            .then_some(())
            .ok_or("object"),
        Shape::List(_) => matches!(value, JsonValue::Array(_))
            .then_some(())
            .ok_or("array"),
        // Nested unions and raw JSON accept any kind at this level.
        Shape::Union(_) | Shape::Json => Ok(()),
    };
    expected.map_err(|kind| {
        format!(
            "structural mismatch: expected {kind}, found {}",
            json_kind(value)
        )
    })
}
