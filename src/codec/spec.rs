//! Static model descriptors: per-type field tables that drive the generic
//! decoder and encoder. Descriptors are plain `static` data built with
//! `const fn` constructors, shared process-wide and never mutated.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::codec::error::DecodeError;

/// Wire shape of a field or union variant.
#[derive(Clone, Copy)]
pub enum Shape {
    Bool,
    Int,
    Float,
    String,
    /// Closed string value set. Unknown values fail decoding.
    Enum(&'static [&'static str]),
    /// Nested model, described by its own [`ModelSpec`].
    Model(&'static ModelSpec),
    /// Homogeneous JSON array.
    List(&'static Shape),
    /// JSON object with arbitrary keys and homogeneous values.
    Map(&'static Shape),
    /// One of several candidate shapes, resolved in declaration order.
    Union(&'static UnionSpec),
    /// Arbitrary caller-owned JSON (profile/data payloads). Never fails to
    /// decode; round-trips verbatim.
    Json,
}

impl Shape {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "bool".to_owned(),
            Self::Int => "int".to_owned(),
            Self::Float => "float".to_owned(),
            Self::String => "string".to_owned(),
            Self::Enum(_) => "enum string".to_owned(),
            Self::Model(spec) => format!("model {}", spec.type_name),
            Self::List(inner) => format!("list<{}>", inner.describe()),
            Self::Map(inner) => format!("map<{}>", inner.describe()),
            Self::Union(union) => format!("union {}", union.name),
            Self::Json => "json".to_owned(),
        }
    }
}

// Model specs may be mutually recursive (a nested filter holds a list of
// filters), so Debug must not recurse through Model/Union references.
impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::String => write!(f, "String"),
            Self::Enum(values) => write!(f, "Enum({values:?})"),
            Self::Model(spec) => write!(f, "Model({})", spec.type_name),
            Self::List(inner) => write!(f, "List({inner:?})"),
            Self::Map(inner) => write!(f, "Map({inner:?})"),
            Self::Union(union) => write!(f, "Union({})", union.name),
            Self::Json => write!(f, "Json"),
        }
    }
}

/// Descriptor for one field of a model type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// In-memory property name.
    pub local_name: &'static str,
    /// JSON key on the network; defaults to `local_name`.
    pub wire_name: &'static str,
    /// Required fields must be present on decode and set before encode.
    pub required: bool,
    /// Nullable fields accept an explicit JSON `null`, which decodes to a
    /// present-but-null value (distinct from absent).
    pub nullable: bool,
    /// Marks a field whose facade accessor substitutes a default when the
    /// field is unset. The decoder never materializes defaults.
    pub has_default: bool,
    pub shape: Shape,
}

impl FieldSpec {
    /// A field that must be present in the wire payload.
    pub const fn required(local_name: &'static str, shape: Shape) -> Self {
        Self {
            local_name,
            wire_name: local_name,
            required: true,
            nullable: false,
            has_default: false,
            shape,
        }
    }

    /// A field that may be absent; absent decodes to unset, not null.
    pub const fn optional(local_name: &'static str, shape: Shape) -> Self {
        Self {
            local_name,
            wire_name: local_name,
            required: false,
            nullable: false,
            has_default: false,
            shape,
        }
    }

    /// Override the JSON key when it differs from the local name.
    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = wire_name;
        self
    }

    /// Allow an explicit JSON `null` for this field.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field as carrying an accessor-side default.
    pub const fn defaulted(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// Descriptor for a model type: an ordered list of field groups.
///
/// Field groups exist so that shared field sets (the `paging` block of every
/// list response, audit timestamps) are declared once and embedded by every
/// spec that carries them. Iteration order is group order, then declaration
/// order within a group. Wire names must be unique across all groups.
#[derive(Debug)]
pub struct ModelSpec {
    pub type_name: &'static str,
    pub field_groups: &'static [&'static [FieldSpec]],
}

impl ModelSpec {
    /// All fields, flattened across groups, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.field_groups.iter().flat_map(|group| group.iter())
    }

    /// Look up a field by its local name.
    pub fn field(&self, local_name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|field| field.local_name == local_name)
    }
}

/// Descriptor for a union type: ordered candidate shapes.
///
/// Resolution is first-match-wins in declaration order. When two variants
/// could both match a payload (models whose required fields overlap), the
/// earlier declaration wins; this mirrors the API contract's closed-choice
/// priority and is deliberately not a best-match heuristic.
#[derive(Debug)]
pub struct UnionSpec {
    pub name: &'static str,
    pub variants: &'static [Shape],
}

/// Read-only registry of model specs, keyed by type name.
///
/// Populated once before first use, then shared freely across threads.
/// Registration failures are programming errors (schema inconsistencies)
/// and panic rather than returning a recoverable error.
#[derive(Debug)]
pub struct Registry {
    models: HashMap<&'static str, &'static ModelSpec>,
}

impl Registry {
    /// Build a registry from a fixed set of specs.
    ///
    /// # Panics
    ///
    /// Panics if two specs share a type name, if a spec declares duplicate
    /// wire names across its field groups, or if a field is both required
    /// and defaulted.
    pub fn new(specs: &[&'static ModelSpec]) -> Self {
        let mut models = HashMap::with_capacity(specs.len());
        for spec in specs {
            validate_spec(spec);
            if models.insert(spec.type_name, *spec).is_some() {
                panic!("duplicate model registration: `{}`", spec.type_name);
            }
        }
        Self { models }
    }

    /// Look up a model spec by type name.
    pub fn describe(&self, type_name: &str) -> Result<&'static ModelSpec, DecodeError> {
        self.models
            .get(type_name)
            .copied()
            .ok_or_else(|| DecodeError::UnknownType {
                type_name: type_name.to_owned(),
            })
    }

    /// Number of registered model types.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the registry holds no specs.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn validate_spec(spec: &ModelSpec) {
    let mut wire_names = HashSet::new();
    for field in spec.fields() {
        if !wire_names.insert(field.wire_name) {
            panic!(
                "model `{}` declares duplicate wire name `{}`",
                spec.type_name, field.wire_name
            );
        }
        if field.required && field.has_default {
            panic!(
                "model `{}` field `{}` is both required and defaulted",
                spec.type_name, field.local_name
            );
        }
    }
}
