use super::Validator;
use crate::error::Error;
use crate::hir::Value;

use ::time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// RFC 3339 timestamps, normalized to their canonical form.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Time;

impl Validator for Time {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        let Value::String(s) = value else {
            return Err(Error::InvalidValue("not a time"));
        };

        OffsetDateTime::parse(&s, &Rfc3339)
            .ok()
            .and_then(|time| time.format(&Rfc3339).ok())
            .map(Value::String)
            .ok_or(Error::InvalidValue("not a time"))
    }
}
