//! Generic model codec: descriptor tables, decoder, encoder, and union
//! resolution.
//!
//! Every resource model in this crate is described by a static [`ModelSpec`]
//! (field names, wire renames, requiredness, nullability, shape). The
//! [`Decoder`] walks a parsed JSON value against a spec and produces a
//! [`TypedObject`]; [`encode`] is the inverse and emits only fields that
//! were explicitly set. Unions are resolved by shape in declaration order.
//!
//! Specs are immutable after registration and the decoder keeps no state
//! between calls, so everything here is freely shareable across threads.

mod decode;
mod encode;
mod error;
mod spec;
mod union;
mod value;

pub use decode::Decoder;
pub use encode::{encode, encode_value};
pub use error::{DecodeError, VariantFailure};
pub use spec::{FieldSpec, ModelSpec, Registry, Shape, UnionSpec};
pub use value::{MissingFieldsError, ObjectBuilder, TypedObject, Value};
