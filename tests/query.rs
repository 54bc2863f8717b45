use pretty_assertions::assert_eq;
use rest_lookup::prelude::*;

fn schema() -> Schema {
    Schema::new()
        .field("status", Field::new().filterable().validator(Text))
        .field("age", Field::new().filterable().sortable().validator(Integer))
        .field("score", Field::new().filterable().validator(Float))
        .field("active", Field::new().filterable().validator(Bool))
        .field("secret", Field::new().sortable())
        .field("tags", Field::new().filterable().validator(ReferenceArray::new("tags")))
        .field("owner", Field::new().filterable().validator(Reference::new("users")))
        .field(
            "address",
            Field::new().schema(
                Schema::new()
                    .field("city", Field::new().filterable())
                    .field("zip", Field::new()),
            ),
        )
}

fn assert_query(filter: &str, expected: Vec<Expression>) {
    let query = Query::parse(filter, &schema()).unwrap();
    assert_eq!(query.expressions(), expected.as_slice());
}

fn assert_query_err(filter: &str, expected: Error) {
    assert_eq!(Query::parse(filter, &schema()), Err(expected), "{filter}");
}

#[test]
fn test_empty() {
    assert_query("{}", vec![]);
    assert_query("  { }  ", vec![]);
}

#[test]
fn test_equality() {
    assert_query(
        r#"{"status": "active"}"#,
        vec![Expression::compare("status", Operator::Equal, "active")],
    );
    assert_query(
        r#"{"status": null}"#,
        vec![Expression::compare("status", Operator::Equal, Value::Null)],
    );
}

#[test]
fn test_operators() {
    assert_query(
        r#"{"age": {"$gt": 18, "$lte": 65}, "score": {"$ne": 1.5}, "status": {"$nin": ["a", "b"]}}"#,
        vec![
            Expression::compare("age", Operator::Greater, 18_i64),
            Expression::compare("age", Operator::LessEqual, 65_i64),
            Expression::compare("score", Operator::NotEqual, 1.5),
            Expression::compare("status", Operator::NotIn, vec!["a", "b"]),
        ],
    );
    assert_query(
        r#"{"age": {"$gte": 1, "$lt": 2, "$in": [3, 4], "$exists": true}}"#,
        vec![
            Expression::compare("age", Operator::GreaterEqual, 1_i64),
            Expression::compare("age", Operator::Less, 2_i64),
            Expression::compare("age", Operator::In, vec![3_i64, 4]),
            Expression::compare("age", Operator::Exists, true),
        ],
    );
}

#[test]
fn test_sub_document_field() {
    assert_query(
        r#"{"address.city": "Paris"}"#,
        vec![Expression::compare("address.city", Operator::Equal, "Paris")],
    );
    assert_query_err(
        r#"{"address.zip": "75000"}"#,
        Error::NotFilterable("address.zip".into()),
    );
    assert_query_err(
        r#"{"address.street": "x"}"#,
        Error::UnknownField("address.street".into()),
    );
}

#[test]
fn test_coercion() {
    assert_query(
        r#"{"age": "18", "score": {"$in": ["1.5", 2]}, "active": "true"}"#,
        vec![
            Expression::compare("age", Operator::Equal, 18_i64),
            Expression::compare("score", Operator::In, vec![1.5, 2.0]),
            Expression::compare("active", Operator::Equal, true),
        ],
    );
}

#[test]
fn test_coercion_keeps_raw_values() {
    assert_query(
        r#"{"age": "eighteen", "status": 5, "tags": "t1", "owner": 7}"#,
        vec![
            Expression::compare("age", Operator::Equal, "eighteen"),
            Expression::compare("status", Operator::Equal, 5_i64),
            Expression::compare("tags", Operator::Equal, "t1"),
            Expression::compare("owner", Operator::Equal, 7_i64),
        ],
    );
}

#[test]
fn test_logical() {
    assert_query(
        r#"{"$or": [{"status": "a"}, {"age": {"$gt": 1}, "active": false}], "$not": {"status": "b"}}"#,
        vec![
            Expression::Or(vec![
                Expression::compare("status", Operator::Equal, "a"),
                Expression::And(vec![
                    Expression::compare("age", Operator::Greater, 1_i64),
                    Expression::compare("active", Operator::Equal, false),
                ]),
            ]),
            Expression::Not(Box::new(Expression::compare(
                "status",
                Operator::Equal,
                "b",
            ))),
        ],
    );
    assert_query(
        r#"{"$and": [{"$not": {"age": 1, "status": "x"}}]}"#,
        vec![Expression::And(vec![Expression::Not(Box::new(
            Expression::And(vec![
                Expression::compare("age", Operator::Equal, 1_i64),
                Expression::compare("status", Operator::Equal, "x"),
            ]),
        ))])],
    );
}

#[test]
fn test_malformed() {
    for filter in ["", "{", "[]", "1", r#""status""#, r#"{"status": }"#, r#"{"a": 1} {}"#] {
        assert!(
            matches!(
                Query::parse(filter, &schema()),
                Err(Error::MalformedQuery { .. })
            ),
            "{filter}"
        );
    }

    assert_query_err(
        r#"{"$or": {"status": "a"}}"#,
        Error::MalformedQuery {
            at: "$or".into(),
            reason: "expected an array".into(),
        },
    );
    assert_query_err(
        r#"{"$and": [{"status": "a"}, 1]}"#,
        Error::MalformedQuery {
            at: "$and[1]".into(),
            reason: "expected an object".into(),
        },
    );
    assert_query_err(
        r#"{"$not": [{"status": "a"}]}"#,
        Error::MalformedQuery {
            at: "$not".into(),
            reason: "expected an object".into(),
        },
    );
}

#[test]
fn test_malformed_offset() {
    let Err(Error::MalformedQuery { at, .. }) = Query::parse(r#"{"status" "a"}"#, &schema())
    else {
        panic!("expected a malformed query");
    };
    assert!(at.starts_with("offset "), "{at}");
}

fn nested_not(depth: usize) -> String {
    format!(
        r#"{}{{"status":"x"}}{}"#,
        r#"{"$not":"#.repeat(depth),
        "}".repeat(depth)
    )
}

#[test]
fn test_nesting_too_deep() {
    for depth in [64, 300, 10_000] {
        let result = Query::parse(&nested_not(depth), &schema());
        assert!(
            matches!(
                &result,
                Err(Error::MalformedQuery { reason, .. }) if reason == "nesting too deep"
            ),
            "{depth}: {result:?}"
        );
    }

    assert_query_err(
        &"[".repeat(10_000),
        Error::MalformedQuery {
            at: "offset 64".into(),
            reason: "nesting too deep".into(),
        },
    );
}

#[test]
fn test_nesting() {
    let query = Query::parse(&nested_not(32), &schema()).unwrap();

    assert_eq!(query.len(), 1);
    assert_eq!(query.to_string(), nested_not(32));
}

#[test]
fn test_surrogate_pair() {
    assert_query(
        r#"{"status": "\ud83d\ude00 ok"}"#,
        vec![Expression::compare("status", Operator::Equal, "😀 ok")],
    );
    assert!(matches!(
        Query::parse(r#"{"status": "\ud83d"}"#, &schema()),
        Err(Error::MalformedQuery { .. })
    ));
}

#[test]
fn test_unknown_field() {
    assert_query_err(r#"{"unknown": 1}"#, Error::UnknownField("unknown".into()));
    assert_query_err(
        r#"{"$or": [{"status": "a"}, {"unknown": 1}]}"#,
        Error::UnknownField("unknown".into()),
    );
}

#[test]
fn test_not_filterable() {
    assert_query_err(r#"{"secret": 1}"#, Error::NotFilterable("secret".into()));
}

#[test]
fn test_unknown_operator() {
    assert_query_err(r#"{"$nor": []}"#, Error::UnknownOperator("$nor".into()));
    assert_query_err(
        r#"{"age": {"$regex": "a"}}"#,
        Error::UnknownOperator("$regex".into()),
    );
    assert_query_err(
        r#"{"age": {"$or": [{"age": 1}]}}"#,
        Error::UnknownOperator("$or".into()),
    );
    assert_query_err(
        r#"{"age": {"$gt": 1, "lt": 2}}"#,
        Error::UnknownOperator("lt".into()),
    );
    assert_query_err(r#"{"$exists": true}"#, Error::UnknownOperator("$exists".into()));
}

#[test]
fn test_empty_logical_group() {
    assert_query_err(r#"{"$and": []}"#, Error::EmptyLogicalGroup("$and".into()));
    assert_query_err(
        r#"{"$or": [{"status": "a"}, {}]}"#,
        Error::EmptyLogicalGroup("$or[1]".into()),
    );
    assert_query_err(r#"{"$not": {}}"#, Error::EmptyLogicalGroup("$not".into()));
    assert_query_err(
        r#"{"$or": [{"$not": {}}]}"#,
        Error::EmptyLogicalGroup("$or[0].$not".into()),
    );
}

#[test]
fn test_invalid_operator_value() {
    for (filter, operator) in [
        (r#"{"age": {"$in": 1}}"#, Operator::In),
        (r#"{"age": {"$nin": "a"}}"#, Operator::NotIn),
        (r#"{"age": {"$gt": [1]}}"#, Operator::Greater),
        (r#"{"age": {"$lte": {"$gt": 1}}}"#, Operator::LessEqual),
        (r#"{"age": {"$exists": 1}}"#, Operator::Exists),
        (r#"{"age": [1, 2]}"#, Operator::Equal),
        (r#"{"age": {}}"#, Operator::Equal),
        (r#"{"age": {"value": 1}}"#, Operator::Equal),
    ] {
        assert_query_err(
            filter,
            Error::InvalidOperatorValue {
                field: "age".into(),
                operator,
            },
        );
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::InvalidOperatorValue {
            field: "age".into(),
            operator: Operator::In
        }
        .to_string(),
        "invalid value for $in on field: age"
    );
    assert_eq!(
        Error::UnknownField("x".into()).to_string(),
        "unknown query field: x"
    );
}

#[test]
fn test_display_reparses() {
    for filter in [
        r#"{}"#,
        r#"{"status": "active"}"#,
        r#"{"status": "a \"b\" \\ c\n"}"#,
        r#"{"age": {"$gt": "18", "$lt": 65.0}, "score": {"$gte": 3}}"#,
        r#"{"age": 1, "age": 2}"#,
        r#"{"status": {"$in": ["a", "b"], "$nin": []}, "active": {"$exists": false}}"#,
        r#"{"$or": [{"status": "a"}, {"age": {"$gt": 1}, "active": false}]}"#,
        r#"{"$not": {"status": "a", "score": -0.5}}"#,
        r#"{"$and": [{"$or": [{"status": null}, {"$not": {"age": 3}}]}], "owner": "u1"}"#,
    ] {
        let query = Query::parse(filter, &schema()).unwrap();
        let text = query.to_string();
        let reparsed = Query::parse(&text, &schema()).unwrap();

        assert_eq!(query, reparsed, "{filter} => {text}");
        assert_eq!(text, reparsed.to_string());
    }
}

#[test]
fn test_display() {
    let query = Query::parse(
        r#"{ "age": {"$gt": "18"}, "$or": [{"status": "a"}, {"score": 2}] }"#,
        &schema(),
    )
    .unwrap();

    assert_eq!(
        query.to_string(),
        r#"{"age":{"$gt":18},"$or":[{"status":"a"},{"score":2.0}]}"#
    );
}
