use crate::error::Error;
use crate::hir::{self, Value};
use crate::parser::{check_depth, parser, MAX_DEPTH};
use crate::schema::{Field, FieldSchema};
use chumsky::Parser;
use std::fmt::{Display, Formatter, Write};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    In,
    NotIn,
    Exists,
}

impl Operator {
    /// The operator for a `$op` key of an operator object.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "$ne" => Self::NotEqual,
            "$gt" => Self::Greater,
            "$gte" => Self::GreaterEqual,
            "$lt" => Self::Less,
            "$lte" => Self::LessEqual,
            "$in" => Self::In,
            "$nin" => Self::NotIn,
            "$exists" => Self::Exists,
            _ => return None,
        })
    }

    /// The key of the operator, equality has none in the filter syntax.
    pub const fn key(&self) -> Option<&'static str> {
        Some(match self {
            Self::Equal => return None,
            Self::NotEqual => "$ne",
            Self::Greater => "$gt",
            Self::GreaterEqual => "$gte",
            Self::Less => "$lt",
            Self::LessEqual => "$lte",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::Exists => "$exists",
        })
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::In | Self::NotIn => matches!(value, Value::Array(_)),
            Self::Exists => matches!(value, Value::Bool(_)),
            _ => value.is_scalar(),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key().unwrap_or("equality"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Compare {
        field: String,
        operator: Operator,
        value: Value,
    },
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    pub fn compare(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Compare {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    fn fmt_member(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compare {
                field,
                operator,
                value,
            } => {
                hir::write_string(f, field)?;
                match operator.key() {
                    Some(key) => write!(f, ":{{\"{key}\":{value}}}"),
                    None => write!(f, ":{value}"),
                }
            }
            Self::And(expressions) => fmt_group(f, "$and", expressions),
            Self::Or(expressions) => fmt_group(f, "$or", expressions),
            Self::Not(expression) => {
                f.write_str("\"$not\":{")?;
                expression.fmt_member(f)?;
                f.write_char('}')
            }
        }
    }
}

fn fmt_group(f: &mut Formatter<'_>, key: &str, expressions: &[Expression]) -> std::fmt::Result {
    write!(f, "\"{key}\":[")?;
    for (i, expression) in expressions.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        f.write_char('{')?;
        expression.fmt_member(f)?;
        f.write_char('}')?;
    }
    f.write_char(']')
}

/// A validated filter, the conjunction of its expressions.
///
/// Apart from the empty query, a query can only be obtained from [`Query::parse`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query(Vec<Expression>);

impl Query {
    /// Parse a filter text, checking every field and operator against the schema.
    pub fn parse<S: FieldSchema + ?Sized>(filter: &str, schema: &S) -> Result<Self, Error> {
        check_depth(filter)
            .map_err(|offset| Error::malformed(format!("offset {offset}"), "nesting too deep"))?;

        let document = parser()
            .parse(filter)
            .into_result()
            .map_err(|errors| match errors.first() {
                Some(err) => {
                    Error::malformed(format!("offset {}", err.span().start), err.to_string())
                }
                None => Error::malformed("offset 0", "invalid filter"),
            })?;

        let Value::Object(members) = document else {
            return Err(Error::malformed("(root)", "expected an object"));
        };

        Interpreter { schema }.members("", members, 0).map(Self)
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn append(&mut self, other: Query) {
        self.0.extend(other.0);
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Expression;
    type IntoIter = std::slice::Iter<'a, Expression>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, expression) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            expression.fmt_member(f)?;
        }
        f.write_char('}')
    }
}

fn child(path: &str, key: &str) -> String {
    match path {
        "" => key.to_string(),
        path => format!("{path}.{key}"),
    }
}

struct Interpreter<'s, S: ?Sized> {
    schema: &'s S,
}

impl<S: FieldSchema + ?Sized> Interpreter<'_, S> {
    fn members(
        &self,
        path: &str,
        members: Vec<(String, Value)>,
        depth: usize,
    ) -> Result<Vec<Expression>, Error> {
        let mut result = Vec::with_capacity(members.len());
        for (key, value) in members {
            self.member(path, key, value, depth, &mut result)?;
        }
        Ok(result)
    }

    fn member(
        &self,
        path: &str,
        key: String,
        value: Value,
        depth: usize,
        result: &mut Vec<Expression>,
    ) -> Result<(), Error> {
        match key.as_str() {
            "$and" | "$or" => {
                let path = child(path, &key);
                let Value::Array(items) = value else {
                    return Err(Error::malformed(path, "expected an array"));
                };
                if items.is_empty() {
                    return Err(Error::EmptyLogicalGroup(path));
                }

                let expressions = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| self.group(&format!("{path}[{i}]"), item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;

                result.push(match key.as_str() {
                    "$and" => Expression::And(expressions),
                    _ => Expression::Or(expressions),
                });
            }
            "$not" => {
                let expression = self.group(&child(path, &key), value, depth + 1)?;
                result.push(Expression::Not(Box::new(expression)));
            }
            op if op.starts_with('$') => return Err(Error::UnknownOperator(key)),
            _ => {
                let field = self
                    .schema
                    .get_field(&key)
                    .ok_or_else(|| Error::UnknownField(key.clone()))?;
                if !field.filterable {
                    return Err(Error::NotFilterable(key));
                }
                compare(&key, field, value, result)?;
            }
        }

        Ok(())
    }

    /// An object of one or more members, several members are joined as conjunction.
    fn group(&self, path: &str, value: Value, depth: usize) -> Result<Expression, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::malformed(path, "nesting too deep"));
        }
        let Value::Object(members) = value else {
            return Err(Error::malformed(path, "expected an object"));
        };

        let mut expressions = self.members(path, members, depth)?;
        match expressions.len() {
            0 => Err(Error::EmptyLogicalGroup(path.to_string())),
            1 => Ok(expressions.remove(0)),
            _ => Ok(Expression::And(expressions)),
        }
    }
}

fn compare(
    name: &str,
    field: &Field,
    value: Value,
    result: &mut Vec<Expression>,
) -> Result<(), Error> {
    let operators = match value {
        Value::Object(members) => {
            if !members.iter().any(|(key, _)| key.starts_with('$')) {
                return Err(Error::InvalidOperatorValue {
                    field: name.to_string(),
                    operator: Operator::Equal,
                });
            }
            members
                .into_iter()
                .map(|(key, value)| match Operator::from_key(&key) {
                    Some(operator) => Ok((operator, value)),
                    None => Err(Error::UnknownOperator(key)),
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        value => vec![(Operator::Equal, value)],
    };

    for (operator, value) in operators {
        if !operator.accepts(&value) {
            return Err(Error::InvalidOperatorValue {
                field: name.to_string(),
                operator,
            });
        }

        let value = match (operator, value) {
            (Operator::Exists, value) => value,
            (_, Value::Array(items)) => {
                Value::Array(items.into_iter().map(|item| field.coerce(item)).collect())
            }
            (_, value) => field.coerce(value),
        };

        result.push(Expression::Compare {
            field: name.to_string(),
            operator,
            value,
        });
    }

    Ok(())
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == Direction::Descending
    }

    /// Parse one token of a sort text, a leading `-` sorts descending.
    pub fn parse<S: FieldSchema + ?Sized>(token: &str, schema: &S) -> Result<Self, Error> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::EmptyField);
        }

        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, Direction::Descending),
            None => (token, Direction::Ascending),
        };

        let field = schema
            .get_field(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        if !field.sortable {
            return Err(Error::NotSortable(name.to_string()));
        }

        Ok(Self {
            field: name.to_string(),
            direction,
        })
    }

    /// Parse a comma separated sort text.
    pub fn parse_list<S: FieldSchema + ?Sized>(
        sort: &str,
        schema: &S,
    ) -> Result<Vec<Self>, Error> {
        sort.split(',').map(|token| Self::parse(token, schema)).collect()
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_descending() {
            f.write_char('-')?;
        }
        f.write_str(&self.field)
    }
}
