use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Domain rule broken by an entity about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankField(&'static str),
    NegativeSalary(Decimal),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::NegativeSalary(salary) => write!(f, "salary must be >= 0, got {salary}"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
