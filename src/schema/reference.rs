//! Fields holding identifiers of items in another resource.
//!
//! Validation is done in two steps. The validators below only check the shape of the value. Once
//! a document passed validation, [`collect_references`] gathers one [`Placeholder`] per reference
//! it holds, and [`check_references`] hands those to a [`ReferenceChecker`], which confirms the
//! referenced items exist.

use super::{FieldSchema, Validator};
use crate::error::Error;
use crate::hir::Value;

/// A single identifier of an item of the resource at `path`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reference {
    pub path: String,
}

impl Reference {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Validator for Reference {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        Ok(value)
    }

    /// An unset reference (`null`) has nothing to resolve.
    fn placeholder(&self, field: &str, value: &Value) -> Option<Placeholder> {
        match value {
            Value::Null => None,
            value => Some(Placeholder::Reference {
                field: field.to_string(),
                resource: self.path.clone(),
                value: value.clone(),
            }),
        }
    }
}

/// A list of identifiers of items of the resource at `path`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceArray {
    pub path: String,
}

impl ReferenceArray {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Validator for ReferenceArray {
    fn validate(&self, values: Value) -> Result<Value, Error> {
        match values {
            Value::Array(_) => Ok(values),
            _ => Err(Error::NotAnArray),
        }
    }

    fn placeholder(&self, field: &str, values: &Value) -> Option<Placeholder> {
        match values {
            Value::Array(values) => Some(Placeholder::ReferenceArray {
                field: field.to_string(),
                resource: self.path.clone(),
                values: values.clone(),
            }),
            _ => None,
        }
    }
}

/// A validated, but not yet resolved, reference found in a document.
#[derive(Clone, Debug, PartialEq)]
pub enum Placeholder {
    Reference {
        field: String,
        resource: String,
        value: Value,
    },
    ReferenceArray {
        field: String,
        resource: String,
        values: Vec<Value>,
    },
}

impl Placeholder {
    /// The path of the document field holding the reference.
    pub fn field(&self) -> &str {
        match self {
            Self::Reference { field, .. } | Self::ReferenceArray { field, .. } => field,
        }
    }

    /// The path of the referenced resource.
    pub fn resource(&self) -> &str {
        match self {
            Self::Reference { resource, .. } | Self::ReferenceArray { resource, .. } => resource,
        }
    }
}

/// Confirms that referenced items exist.
pub trait ReferenceChecker {
    type Error;

    fn check(&self, placeholder: &Placeholder) -> Result<(), Self::Error>;
}

/// Collect the references held by a document, in document order.
///
/// Members unknown to the schema are skipped.
pub fn collect_references<S: FieldSchema + ?Sized>(
    schema: &S,
    document: &Value,
) -> Vec<Placeholder> {
    let mut result = vec![];
    walk(schema, "", document, &mut result);
    result
}

fn walk<S: FieldSchema + ?Sized>(
    schema: &S,
    prefix: &str,
    document: &Value,
    result: &mut Vec<Placeholder>,
) {
    let Value::Object(members) = document else {
        return;
    };

    for (name, value) in members {
        let Some(field) = schema.get_field(name) else {
            continue;
        };
        let path = match prefix {
            "" => name.clone(),
            prefix => format!("{prefix}.{name}"),
        };

        if let Some(placeholder) = field.placeholder(&path, value) {
            result.push(placeholder);
        } else if let Some(sub) = &field.schema {
            walk(sub, &path, value, result);
        }
    }
}

/// Hand every reference of a document to the checker.
///
/// All references are checked, failures are reported together with the path of their field.
pub fn check_references<S, C>(
    schema: &S,
    document: &Value,
    checker: &C,
) -> Result<(), Vec<(String, C::Error)>>
where
    S: FieldSchema + ?Sized,
    C: ReferenceChecker + ?Sized,
{
    let errors = collect_references(schema, document)
        .into_iter()
        .filter_map(|placeholder| {
            tracing::trace!(
                field = placeholder.field(),
                resource = placeholder.resource(),
                "checking reference"
            );
            checker
                .check(&placeholder)
                .err()
                .map(|err| (placeholder.field().to_string(), err))
        })
        .collect::<Vec<_>>();

    match errors.is_empty() {
        true => Ok(()),
        false => Err(errors),
    }
}
