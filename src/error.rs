use crate::mir::Operator;

/// Failures of parsing and validating lookups and field values.
///
/// Every variant carries enough of the offending field, operator or location for a caller to
/// produce a precise message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed query at {at}: {reason}")]
    MalformedQuery { at: String, reason: String },
    #[error("unknown query field: {0}")]
    UnknownField(String),
    #[error("field is not filterable: {0}")]
    NotFilterable(String),
    #[error("field is not sortable: {0}")]
    NotSortable(String),
    #[error("invalid value for {operator} on field: {field}")]
    InvalidOperatorValue { field: String, operator: Operator },
    #[error("empty logical group: {0}")]
    EmptyLogicalGroup(String),
    #[error("unknown query operator: {0}")]
    UnknownOperator(String),
    #[error("empty sort field")]
    EmptyField,
    #[error("not an array")]
    NotAnArray,
    #[error("{0}")]
    InvalidValue(&'static str),
}

impl Error {
    pub(crate) fn malformed(at: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedQuery {
            at: at.into(),
            reason: reason.into(),
        }
    }
}
