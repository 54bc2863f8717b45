//! Field schemas consulted while validating lookups.

pub mod reference;
pub mod types;

#[cfg(any(feature = "time", test))]
mod time;

#[cfg(any(feature = "time", test))]
pub use self::time::Time;

pub use self::reference::{
    check_references, collect_references, Placeholder, Reference, ReferenceArray, ReferenceChecker,
};
pub use self::types::{Bool, Float, Integer, Text};

use crate::error::Error;
use crate::hir::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Resolves fields by their dotted path, e.g. `address.city`.
pub trait FieldSchema {
    fn get_field(&self, path: &str) -> Option<&Field>;
}

impl<S: FieldSchema + ?Sized> FieldSchema for &S {
    fn get_field(&self, path: &str) -> Option<&Field> {
        (**self).get_field(path)
    }
}

/// Validates, and possibly normalizes, the value of a field.
pub trait Validator: Debug + Send + Sync {
    fn validate(&self, value: Value) -> Result<Value, Error>;

    /// The placeholder to resolve once the document holding `value` passed validation.
    ///
    /// Only references produce one.
    fn placeholder(&self, _field: &str, _value: &Value) -> Option<Placeholder> {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct Field {
    pub filterable: bool,
    pub sortable: bool,
    pub validator: Option<Arc<dyn Validator>>,
    /// The fields of a sub-document.
    pub schema: Option<Schema>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Run the field's validator, a field without one accepts anything.
    pub fn validate(&self, value: Value) -> Result<Value, Error> {
        match &self.validator {
            Some(validator) => validator.validate(value),
            None => Ok(value),
        }
    }

    /// Normalize a filter value if the validator accepts it, keep it as it is otherwise.
    pub(crate) fn coerce(&self, value: Value) -> Value {
        match &self.validator {
            Some(validator) if !value.is_null() => {
                validator.validate(value.clone()).unwrap_or(value)
            }
            _ => value,
        }
    }

    pub(crate) fn placeholder(&self, path: &str, value: &Value) -> Option<Placeholder> {
        self.validator
            .as_ref()
            .and_then(|validator| validator.placeholder(path, value))
    }
}

/// An in-memory set of named fields.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

impl FieldSchema for Schema {
    fn get_field(&self, path: &str) -> Option<&Field> {
        match path.split_once('.') {
            Some((name, rest)) => self.fields.get(name)?.schema.as_ref()?.get_field(rest),
            None => self.fields.get(path),
        }
    }
}
