// Integration tests for compiling filters into in-memory predicates over
// derived records: member paths, null handling, quantified collections and
// the left-to-right joining of statements.

use chrono::NaiveDate;
use crudfilter::{
    Filter, FilterBuilder, FilterError, FilterLimits, FilterStatement, FilterValue, Operation,
    OperationLogical::{And, Or},
    Value,
};
use uuid::Uuid;

mod common;
use common::{Address, Person, ids, people};

fn run(filter: &Filter) -> Vec<i32> {
    let people = people();
    let predicate = FilterBuilder::new()
        .get_expression::<Person>(filter)
        .expect("filter should compile");
    ids(predicate.filter_slice(&people))
}

fn compile_error(filter: &Filter) -> FilterError {
    FilterBuilder::new()
        .get_expression::<Person>(filter)
        .expect_err("filter should not compile")
}

// ============================================================================
// BASIC OPERATIONS
// ============================================================================

#[test]
fn test_empty_filter_matches_everything() {
    assert_eq!(run(&Filter::new()), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_text_equality_ignores_case_and_whitespace() {
    let mut filter = Filter::new();
    filter.equal("name", "alice", And).unwrap();
    assert_eq!(run(&filter), vec![1]);

    let mut filter = Filter::new();
    filter.equal("NAME", "  CAROL ", And).unwrap();
    assert_eq!(run(&filter), vec![3]);
}

#[test]
fn test_text_substring_prefix_and_suffix() {
    let mut filter = Filter::new();
    filter.contains("name", "LI", And).unwrap();
    assert_eq!(run(&filter), vec![1]);

    let mut filter = Filter::new();
    filter.starts_with("name", "ca", And).unwrap();
    assert_eq!(run(&filter), vec![3]);

    let mut filter = Filter::new();
    filter.ends_with("name", "E", And).unwrap();
    assert_eq!(run(&filter), vec![1, 4, 5]);
}

#[test]
fn test_between_is_inclusive() {
    let mut filter = Filter::new();
    filter.between("age", 18, 30, And).unwrap();
    assert_eq!(run(&filter), vec![1, 3, 5]);
}

#[test]
fn test_numeric_comparisons_on_nullable_members() {
    let mut filter = Filter::new();
    filter.greater_than("score", 80.0, And).unwrap();
    assert_eq!(run(&filter), vec![1, 4]);

    // Integer operands compare with float members by value
    let mut filter = Filter::new();
    filter.greater_than_or_equal_to("score", 70, And).unwrap();
    assert_eq!(run(&filter), vec![1, 3, 4]);

    // An absent value fails every comparison, NotEqual included
    let mut filter = Filter::new();
    filter.not_equal("score", 70, And).unwrap();
    assert_eq!(run(&filter), vec![1, 4, 5]);
}

#[test]
fn test_date_comparison() {
    let mut filter = Filter::new();
    filter
        .greater_than("joined", NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(), And)
        .unwrap();
    assert_eq!(run(&filter), vec![2, 4, 5]);
}

#[test]
fn test_null_and_white_space_checks() {
    let mut filter = Filter::new();
    filter.is_null::<Option<String>>("nickname", And).unwrap();
    assert_eq!(run(&filter), vec![2, 5]);

    let mut filter = Filter::new();
    filter
        .is_null_or_white_space::<Option<String>>("nickname", And)
        .unwrap();
    assert_eq!(run(&filter), vec![2, 3, 5]);

    let mut filter = Filter::new();
    filter
        .is_not_null_nor_white_space::<Option<String>>("nickname", And)
        .unwrap();
    assert_eq!(run(&filter), vec![1, 4]);
}

// ============================================================================
// JOINING STATEMENTS
// ============================================================================

#[test]
fn test_logical_of_first_statement_joins_the_second() {
    let mut filter = Filter::new();
    filter.equal("name", "bob", Or).unwrap().equal("age", 30, And).unwrap();
    assert_eq!(run(&filter), vec![1, 2, 5]);

    let mut filter = Filter::new();
    filter.equal("name", "bob", And).unwrap().equal("age", 30, And).unwrap();
    assert!(run(&filter).is_empty());
}

#[test]
fn test_statements_fold_left_to_right() {
    // (name = bob OR age = 30) AND tags contains "rust"
    let mut filter = Filter::new();
    filter
        .equal("name", "bob", Or)
        .unwrap()
        .equal("age", 30, And)
        .unwrap()
        .contains("tags", "rust", And)
        .unwrap();
    assert_eq!(run(&filter), vec![1, 5]);
}

// ============================================================================
// NESTED RECORDS
// ============================================================================

#[test]
fn test_null_parent_tolerance() {
    let mut filter = Filter::new();
    filter.is_null::<Option<Address>>("address", And).unwrap();
    assert_eq!(run(&filter), vec![2]);

    // Bob has no address, Carol's address has no city
    let mut filter = Filter::new();
    filter.is_null::<Option<String>>("address.city", And).unwrap();
    assert_eq!(run(&filter), vec![2, 3]);

    let mut filter = Filter::new();
    filter.equal("address.city", "paris", And).unwrap();
    assert_eq!(run(&filter), vec![1, 5]);

    let mut filter = Filter::new();
    filter.not_equal("address.city", "paris", And).unwrap();
    assert_eq!(run(&filter), vec![4]);
}

// ============================================================================
// COLLECTIONS
// ============================================================================

#[test]
fn test_list_operand_is_membership() {
    let mut filter = Filter::new();
    filter.is_in("tags", vec!["a", "b"], And).unwrap();
    assert_eq!(run(&filter), vec![1, 3, 4]);

    let mut filter = Filter::new();
    filter.is_in("age", vec![17, 45], And).unwrap();
    assert_eq!(run(&filter), vec![2, 4]);
}

#[test]
fn test_scalar_operand_on_collection_is_element_membership() {
    let mut filter = Filter::new();
    filter.contains("tags", "RUST", And).unwrap();
    assert_eq!(run(&filter), vec![1, 5]);
}

#[test]
fn test_quantified_collection_member() {
    let mut filter = Filter::new();
    filter.equal("skills[name]", "SQL", And).unwrap();
    assert_eq!(run(&filter), vec![1, 5]);

    let mut filter = Filter::new();
    filter.greater_than("skills[level]", 6, And).unwrap();
    assert_eq!(run(&filter), vec![1]);
}

#[test]
fn test_quantifier_joins_like_any_statement() {
    let mut filter = Filter::new();
    filter
        .equal("skills[name]", "go", Or)
        .unwrap()
        .equal("address.city", "paris", And)
        .unwrap();
    assert_eq!(run(&filter), vec![1, 4, 5]);
}

// ============================================================================
// ALLOWED OPERATIONS
// ============================================================================

const ALL_OPERATIONS: [Operation; 17] = [
    Operation::Equal,
    Operation::NotEqual,
    Operation::Contains,
    Operation::StartsWith,
    Operation::EndsWith,
    Operation::GreaterThan,
    Operation::GreaterThanOrEqualTo,
    Operation::LessThan,
    Operation::LessThanOrEqualTo,
    Operation::Between,
    Operation::In,
    Operation::IsNull,
    Operation::IsNotNull,
    Operation::IsEmpty,
    Operation::IsNotEmpty,
    Operation::IsNullOrWhiteSpace,
    Operation::IsNotNullNorWhiteSpace,
];

const ORDERED: &[Operation] = &[
    Operation::Equal,
    Operation::NotEqual,
    Operation::GreaterThan,
    Operation::GreaterThanOrEqualTo,
    Operation::LessThan,
    Operation::LessThanOrEqualTo,
    Operation::Between,
    Operation::In,
    Operation::Contains,
];

/// Builds a statement for `operation` declared as `T`, with as many copies
/// of `value` as the operation takes.
fn builds<T: FilterValue + Clone>(value: &T, operation: Operation) -> bool {
    let value = value.clone();
    match operation.arity() {
        0 => FilterStatement::without_value::<T>("member", operation, And).is_ok(),
        1 => FilterStatement::new("member", operation, Some(value), None, And).is_ok(),
        _ => FilterStatement::new("member", operation, Some(value.clone()), Some(value), And)
            .is_ok(),
    }
}

fn assert_allowed<T: FilterValue + Clone>(category: &str, value: &T, allowed: &[Operation]) {
    for operation in ALL_OPERATIONS {
        assert_eq!(
            builds(value, operation),
            allowed.contains(&operation),
            "{operation} on {category}"
        );
    }
}

#[test]
fn test_construction_follows_the_allowed_operations_table() {
    assert_allowed("text", &"abc".to_string(), &ALL_OPERATIONS);
    assert_allowed("i32", &7_i32, ORDERED);
    assert_allowed("f64", &7.5_f64, ORDERED);
    assert_allowed(
        "date",
        &NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ORDERED,
    );
    assert_allowed("bool", &true, &[Operation::Equal, Operation::NotEqual]);
    assert_allowed(
        "uuid",
        &Uuid::nil(),
        &[
            Operation::Equal,
            Operation::NotEqual,
            Operation::In,
            Operation::Contains,
        ],
    );

    let nullable: Vec<Operation> = ORDERED
        .iter()
        .copied()
        .chain([Operation::IsNull, Operation::IsNotNull])
        .collect();
    assert_allowed("Option<i32>", &Some(7_i32), &nullable);

    assert_allowed(
        "Vec<&str>",
        &vec!["a", "b"],
        &[Operation::Contains, Operation::In],
    );
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_invalid_operations_are_rejected_on_construction() {
    let mut filter = Filter::new();
    assert!(matches!(
        filter.starts_with("age", 5, And),
        Err(FilterError::InvalidOperation { .. })
    ));
    assert!(matches!(
        filter.greater_than("active", true, And),
        Err(FilterError::InvalidOperation { .. })
    ));
    assert!(matches!(
        filter.equal("tags", vec!["a"], And),
        Err(FilterError::InvalidArrayUsage { .. })
    ));
    assert!(matches!(
        FilterStatement::untyped("age", Operation::Between, Some(Value::Int(1)), None, And),
        Err(FilterError::MissingValue { .. })
    ));
    assert!(filter.is_empty());
}

#[test]
fn test_null_operand_is_missing_except_for_equality() {
    let mut filter = Filter::new();
    assert!(matches!(
        filter.contains("nickname", None::<&str>, And),
        Err(FilterError::MissingValue { expected: 1, .. })
    ));
    assert!(matches!(
        filter.starts_with("nickname", None::<&str>, And),
        Err(FilterError::MissingValue { .. })
    ));
    assert!(matches!(
        filter.greater_than("score", None::<f64>, And),
        Err(FilterError::MissingValue { .. })
    ));
    assert!(filter.is_empty());

    // Equal/NotEqual with a null operand test absence and presence
    filter.equal("nickname", None::<&str>, And).unwrap();
    assert_eq!(run(&filter), vec![2, 5]);

    let mut filter = Filter::new();
    filter.not_equal("nickname", None::<&str>, And).unwrap();
    assert_eq!(run(&filter), vec![1, 3, 4]);
}

#[test]
fn test_deserialized_null_operand_tests_absence() {
    let parsed: Filter =
        serde_json::from_str(r#"[{"property": "nickname", "operation": "Equal", "value": null}]"#)
            .unwrap();
    assert_eq!(parsed.statements()[0].value(), Some(&Value::Null));
    assert_eq!(run(&parsed), vec![2, 5]);

    let parsed: Filter =
        serde_json::from_str(r#"[{"property": "name", "operation": "Contains", "value": null}]"#)
            .unwrap();
    let mut filter = Filter::new();
    assert!(matches!(
        filter.push(parsed.statements()[0].clone()),
        Err(FilterError::MissingValue { .. })
    ));
}

#[test]
fn test_unknown_member_reports_path_and_segment() {
    let mut filter = Filter::new();
    filter.equal("address.country", "FR", And).unwrap();
    assert_eq!(
        compile_error(&filter),
        FilterError::UnknownMember {
            path: "address.country".to_string(),
            segment: "country".to_string(),
        }
    );
}

#[test]
fn test_invalid_paths() {
    let mut filter = Filter::new();
    filter.equal("name.first", "A", And).unwrap();
    assert!(matches!(compile_error(&filter), FilterError::NotARecord { .. }));

    let mut filter = Filter::new();
    filter.equal("address[city]", "Paris", And).unwrap();
    assert!(matches!(compile_error(&filter), FilterError::NotACollection { .. }));

    let mut filter = Filter::new();
    filter.equal("tags[name]", "a", And).unwrap();
    assert!(matches!(compile_error(&filter), FilterError::NotACollection { .. }));
}

#[test]
fn test_operand_type_is_checked_against_member() {
    let mut filter = Filter::new();
    filter.equal("age", "thirty", And).unwrap();
    assert!(matches!(compile_error(&filter), FilterError::TypeMismatch { .. }));

    let mut filter = Filter::new();
    filter.contains("age", 3, And).unwrap();
    assert!(matches!(compile_error(&filter), FilterError::TypeMismatch { .. }));
}

#[test]
fn test_limits() {
    let builder = FilterBuilder::with_limits(FilterLimits {
        max_statements: 1,
        ..FilterLimits::default()
    });
    let mut filter = Filter::new();
    filter.equal("age", 30, And).unwrap().equal("name", "eve", And).unwrap();
    assert!(matches!(
        builder.get_expression::<Person>(&filter),
        Err(FilterError::LimitExceeded { .. })
    ));
}

// ============================================================================
// PREDICATES
// ============================================================================

#[test]
fn test_compilation_is_deterministic() {
    let mut filter = Filter::new();
    filter
        .contains("name", "a", Or)
        .unwrap()
        .is_in("skills[name]", vec!["rust", "go"], And)
        .unwrap();
    assert_eq!(run(&filter), run(&filter));
    assert_eq!(run(&filter), vec![1, 3, 4]);
}

#[test]
fn test_predicate_is_shareable_across_threads() {
    let mut filter = Filter::new();
    filter.equal("address.city", "paris", And).unwrap();
    let predicate = FilterBuilder::new().get_expression::<Person>(&filter).unwrap();
    let matcher = predicate.as_fn();

    let handle = std::thread::spawn(move || {
        let people = people();
        people.iter().filter(|p| matcher(*p)).count()
    });
    assert_eq!(handle.join().unwrap(), 2);
}

#[test]
fn test_deserialized_filter_compiles_like_built_filter() {
    let json = r#"[
        {"property": "age", "operation": "Between", "value": 18, "value2": 30, "logical": "And"},
        {"property": "address.city", "operation": "Equal", "value": "PARIS"}
    ]"#;
    let parsed: Filter = serde_json::from_str(json).unwrap();

    let mut built = Filter::new();
    built
        .between("age", 18, 30, And)
        .unwrap()
        .equal("address.city", "PARIS", And)
        .unwrap();

    assert_eq!(run(&parsed), run(&built));
    assert_eq!(run(&parsed), vec![1, 5]);
}
