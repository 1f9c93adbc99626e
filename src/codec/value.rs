//! Typed in-memory values: the decoded/built counterpart of a wire payload.
//!
//! A [`TypedObject`] tracks which fields were explicitly set, so encoding
//! can distinguish "absent" (omitted from the payload) from "explicitly
//! null" (emitted as JSON `null`).

use std::collections::BTreeMap;

use crate::codec::spec::ModelSpec;

/// A decoded or caller-built value for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit null (only for nullable fields).
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Canonical member of a closed enum value set.
    Enum(&'static str),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(TypedObject),
    /// Arbitrary caller-owned JSON carried through verbatim.
    Json(serde_json::Value),
}

/// Runtime instance of a model type.
///
/// Only fields explicitly set (by the decoder or through a builder) are
/// present in the map; everything else is unset and will be omitted from
/// the encoded payload entirely.
#[derive(Debug, Clone)]
pub struct TypedObject {
    spec: &'static ModelSpec,
    fields: BTreeMap<&'static str, Value>,
}

impl TypedObject {
    /// Start building an instance of `spec`.
    pub fn builder(spec: &'static ModelSpec) -> ObjectBuilder {
        ObjectBuilder {
            spec,
            fields: BTreeMap::new(),
        }
    }

    /// Construct directly from already-validated parts.
    ///
    /// Crate-internal: callers (the decoder and the typed request
    /// conversions) are responsible for having set every required field.
    pub(crate) fn from_parts(
        spec: &'static ModelSpec,
        fields: BTreeMap<&'static str, Value>,
    ) -> Self {
        Self { spec, fields }
    }

    /// The descriptor this object was built against.
    pub fn spec(&self) -> &'static ModelSpec {
        self.spec
    }

    /// Whether the field was explicitly set (including to null).
    pub fn has_field(&self, local_name: &str) -> bool {
        self.fields.contains_key(local_name)
    }

    /// The field's value, or `None` when unset.
    pub fn field(&self, local_name: &str) -> Option<&Value> {
        self.fields.get(local_name)
    }

    /// Set fields in spec declaration order, as `(local_name, value)` pairs.
    pub fn set_fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.spec
            .fields()
            .filter_map(|field| self.fields.get(field.local_name).map(|v| (field.local_name, v)))
    }

    /// String value of a field, or `None` when unset, null, or not a string.
    pub fn str_field(&self, local_name: &str) -> Option<&str> {
        match self.field(local_name) {
            Some(Value::String(value)) => Some(value),
            Some(Value::Enum(value)) => Some(value),
            _ => None,
        }
    }

    pub fn bool_field(&self, local_name: &str) -> Option<bool> {
        match self.field(local_name) {
            Some(Value::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn int_field(&self, local_name: &str) -> Option<i64> {
        match self.field(local_name) {
            Some(Value::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn float_field(&self, local_name: &str) -> Option<f64> {
        match self.field(local_name) {
            Some(Value::Float(value)) => Some(*value),
            Some(Value::Int(value)) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn list_field(&self, local_name: &str) -> Option<&[Value]> {
        match self.field(local_name) {
            Some(Value::List(values)) => Some(values),
            _ => None,
        }
    }

    pub fn object_field(&self, local_name: &str) -> Option<&TypedObject> {
        match self.field(local_name) {
            Some(Value::Object(object)) => Some(object),
            _ => None,
        }
    }

    pub fn json_field(&self, local_name: &str) -> Option<&serde_json::Value> {
        match self.field(local_name) {
            Some(Value::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// Required string field.
    ///
    /// # Panics
    ///
    /// Panics if the field is unset or not a string. Objects produced by the
    /// decoder or a finished builder uphold this for required string fields.
    pub fn expect_str(&self, local_name: &str) -> &str {
        match self.str_field(local_name) {
            Some(value) => value,
            None => self.invariant_violation(local_name, "string"),
        }
    }

    /// Required bool field. Panics like [`TypedObject::expect_str`].
    pub fn expect_bool(&self, local_name: &str) -> bool {
        match self.bool_field(local_name) {
            Some(value) => value,
            None => self.invariant_violation(local_name, "bool"),
        }
    }

    /// Required int field. Panics like [`TypedObject::expect_str`].
    pub fn expect_int(&self, local_name: &str) -> i64 {
        match self.int_field(local_name) {
            Some(value) => value,
            None => self.invariant_violation(local_name, "int"),
        }
    }

    /// Required list field. Panics like [`TypedObject::expect_str`].
    pub fn expect_list(&self, local_name: &str) -> &[Value] {
        match self.list_field(local_name) {
            Some(values) => values,
            None => self.invariant_violation(local_name, "list"),
        }
    }

    /// Required nested object field. Panics like [`TypedObject::expect_str`].
    pub fn expect_object(&self, local_name: &str) -> &TypedObject {
        match self.object_field(local_name) {
            Some(object) => object,
            None => self.invariant_violation(local_name, "object"),
        }
    }

    /// Required raw JSON field. Panics like [`TypedObject::expect_str`].
    pub fn expect_json(&self, local_name: &str) -> &serde_json::Value {
        match self.json_field(local_name) {
            Some(value) => value,
            None => self.invariant_violation(local_name, "json"),
        }
    }

    fn invariant_violation(&self, local_name: &str, kind: &str) -> ! {
        panic!(
            "model `{}` invariant violated: required {kind} field `{local_name}` is unset or has the wrong kind",
            self.spec.type_name
        )
    }
}

// Structural equality: same type name, same set fields. Spec identity is by
// name because specs are unique per registry.
impl PartialEq for TypedObject {
    fn eq(&self, other: &Self) -> bool {
        self.spec.type_name == other.spec.type_name && self.fields == other.fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Required fields left unset when a builder was finished.
#[error("model `{type_name}` is missing required fields: {}", .fields.join(", "))]
pub struct MissingFieldsError {
    pub type_name: &'static str,
    pub fields: Vec<&'static str>,
}

/// Accumulates field assignments and validates required coverage at
/// [`ObjectBuilder::build`]. Encoding stays total because an object cannot
/// be finished with required fields unset.
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    spec: &'static ModelSpec,
    fields: BTreeMap<&'static str, Value>,
}

impl ObjectBuilder {
    /// Assign a field by local name.
    ///
    /// # Panics
    ///
    /// Panics if `local_name` is not declared by the spec; assigning an
    /// undeclared field is a programming error, not input-dependent.
    pub fn set(mut self, local_name: &str, value: Value) -> Self {
        let Some(field) = self.spec.field(local_name) else {
            panic!(
                "model `{}` has no field named `{local_name}`",
                self.spec.type_name
            );
        };
        self.fields.insert(field.local_name, value);
        self
    }

    /// Assign a field only when a value is present.
    pub fn set_opt(self, local_name: &str, value: Option<Value>) -> Self {
        match value {
            Some(value) => self.set(local_name, value),
            None => self,
        }
    }

    /// Finish the object, verifying that every required field was set.
    pub fn build(self) -> Result<TypedObject, MissingFieldsError> {
        let missing: Vec<&'static str> = self
            .spec
            .fields()
            .filter(|field| field.required && !self.fields.contains_key(field.local_name))
            .map(|field| field.local_name)
            .collect();
        if !missing.is_empty() {
            return Err(MissingFieldsError {
                type_name: self.spec.type_name,
                fields: missing,
            });
        }
        Ok(TypedObject {
            spec: self.spec,
            fields: self.fields,
        })
    }
}
