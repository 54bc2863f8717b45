//! Validators for plain field types.

use super::Validator;
use crate::error::Error;
use crate::hir::Value;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Text;

impl Validator for Text {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        match value {
            Value::String(_) => Ok(value),
            _ => Err(Error::InvalidValue("not a string")),
        }
    }
}

/// Accepts integers, integral floats and numeric strings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Integer;

impl Validator for Integer {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        match value {
            Value::Integer(_) => Ok(value),
            Value::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                Ok(Value::Integer(n as i64))
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| Error::InvalidValue("not an integer")),
            _ => Err(Error::InvalidValue("not an integer")),
        }
    }
}

/// Accepts numbers and numeric strings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Float;

impl Validator for Float {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        match value {
            Value::Float(_) => Ok(value),
            Value::Integer(i) => Ok(Value::Float(i as f64)),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Float(n)),
                _ => Err(Error::InvalidValue("not a number")),
            },
            _ => Err(Error::InvalidValue("not a number")),
        }
    }
}

/// Accepts booleans and the strings `true` and `false`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Bool;

impl Validator for Bool {
    fn validate(&self, value: Value) -> Result<Value, Error> {
        match value {
            Value::Bool(_) => Ok(value),
            Value::String(s) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(Error::InvalidValue("not a boolean")),
            },
            _ => Err(Error::InvalidValue("not a boolean")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_text() {
        assert_eq!(Text.validate("a".into()), Ok("a".into()));
        assert_eq!(
            Text.validate(Value::Integer(1)),
            Err(Error::InvalidValue("not a string"))
        );
    }

    #[test]
    fn test_integer() {
        assert_eq!(Integer.validate(Value::Integer(3)), Ok(Value::Integer(3)));
        assert_eq!(Integer.validate(Value::Float(3.0)), Ok(Value::Integer(3)));
        assert_eq!(Integer.validate(" 42 ".into()), Ok(Value::Integer(42)));
        assert!(Integer.validate(Value::Float(3.5)).is_err());
        assert!(Integer.validate("4.2".into()).is_err());
        assert!(Integer.validate(Value::Bool(true)).is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(Float.validate(Value::Integer(2)), Ok(Value::Float(2.0)));
        assert_eq!(Float.validate("0.5".into()), Ok(Value::Float(0.5)));
        assert!(Float.validate("inf".into()).is_err());
        assert!(Float.validate(Value::Null).is_err());
    }

    #[test]
    fn test_bool() {
        assert_eq!(Bool.validate("true".into()), Ok(Value::Bool(true)));
        assert_eq!(Bool.validate(Value::Bool(false)), Ok(Value::Bool(false)));
        assert!(Bool.validate("yes".into()).is_err());
    }
}
