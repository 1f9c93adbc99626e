use std::fmt;

use crate::codec::MissingFieldsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MissingFields(MissingFieldsError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MissingFields(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<MissingFieldsError> for ValidationError {
    fn from(err: MissingFieldsError) -> Self {
        Self::MissingFields(err)
    }
}
