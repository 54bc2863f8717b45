use crate::hir::Value;
use crate::lookup::Lookup;
use crate::mir::{Direction, Expression, Operator, Query};
use ::sea_orm::sea_query::{Alias, Expr, IntoColumnRef, IntoCondition, SimpleExpr};
use ::sea_orm::{Condition, EntityTrait, Order, QueryFilter, QueryOrder, Select};

/// Apply the filter and the sort of a lookup to a select statement.
///
/// Field paths are used as column names.
pub fn apply_lookup<E>(select: Select<E>, lookup: &Lookup) -> Select<E>
where
    E: EntityTrait,
{
    let select = select.filter(translate_query(lookup.filter()));
    lookup.sort().iter().fold(select, |select, sort| {
        let column = SimpleExpr::Column(Alias::new(sort.field.as_str()).into_column_ref());
        select.order_by(column, translate_direction(sort.direction))
    })
}

/// Translate a query into a condition, matching all of its expressions.
pub fn translate_query(query: &Query) -> Condition {
    let mut result = Condition::all();
    for expression in query {
        result = result.add(translate_expression(expression));
    }
    result
}

pub fn translate_expression(expression: &Expression) -> Condition {
    match expression {
        Expression::Not(expression) => translate_expression(expression).not(),
        Expression::Or(expressions) => {
            let mut result = Condition::any();
            for expression in expressions {
                result = result.add(translate_expression(expression));
            }
            result
        }
        Expression::And(expressions) => {
            let mut result = Condition::all();
            for expression in expressions {
                result = result.add(translate_expression(expression));
            }
            result
        }
        Expression::Compare {
            field,
            operator,
            value,
        } => translate_compare(field, *operator, value),
    }
}

/// Translate a single comparison into a condition.
///
/// Equality with `null` becomes a null check, as does `$exists`.
pub fn translate_compare(field: &str, operator: Operator, value: &Value) -> Condition {
    let column = Expr::col(Alias::new(field));
    match (operator, value) {
        (Operator::Equal, Value::Null) | (Operator::Exists, Value::Bool(false)) => {
            column.is_null().into_condition()
        }
        (Operator::NotEqual, Value::Null) | (Operator::Exists, _) => {
            column.is_not_null().into_condition()
        }
        (Operator::Equal, value) => column.eq(translate_value(value)).into_condition(),
        (Operator::NotEqual, value) => column.ne(translate_value(value)).into_condition(),
        (Operator::Greater, value) => column.gt(translate_value(value)).into_condition(),
        (Operator::GreaterEqual, value) => column.gte(translate_value(value)).into_condition(),
        (Operator::Less, value) => column.lt(translate_value(value)).into_condition(),
        (Operator::LessEqual, value) => column.lte(translate_value(value)).into_condition(),
        (Operator::In, value) => column.is_in(translate_values(value)).into_condition(),
        (Operator::NotIn, value) => column.is_not_in(translate_values(value)).into_condition(),
    }
}

pub fn translate_value(value: &Value) -> ::sea_orm::Value {
    match value {
        Value::Null => ::sea_orm::Value::String(None),
        Value::Bool(b) => (*b).into(),
        Value::Integer(i) => (*i).into(),
        Value::Float(n) => (*n).into(),
        Value::String(s) => s.clone().into(),
        // no structured values in plain columns, compare with their text
        Value::Array(_) | Value::Object(_) => value.to_string().into(),
    }
}

fn translate_values(value: &Value) -> Vec<::sea_orm::Value> {
    match value {
        Value::Array(items) => items.iter().map(translate_value).collect(),
        value => vec![translate_value(value)],
    }
}

pub fn translate_direction(direction: Direction) -> Order {
    match direction {
        Direction::Ascending => Order::Asc,
        Direction::Descending => Order::Desc,
    }
}
