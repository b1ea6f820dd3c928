use super::*;

fn values(field: &Field) -> Vec<u32> {
    match field {
        Field::Any => panic!("expected a value set, got a wildcard"),
        Field::Values(values) => values.clone(),
    }
}

#[test]
fn test_wildcard_and_empty_parse_to_any() {
    assert!(Field::parse("*", 0, 59).unwrap().is_any());
    assert!(Field::parse("", 0, 59).unwrap().is_any());
    assert!(Field::parse("  ", 0, 59).unwrap().is_any());
}

#[test]
fn test_single_value() {
    let field = Field::parse("30", 0, 59).unwrap();
    assert_eq!(values(&field), vec![30]);
}

#[test]
fn test_value_out_of_range() {
    assert!(matches!(
        Field::parse("60", 0, 59),
        Err(CronError::OutOfRange { value: 60, min: 0, max: 59 })
    ));
    assert!(matches!(
        Field::parse("-1", 0, 59),
        Err(CronError::OutOfRange { value: -1, .. })
    ));
    assert!(matches!(
        Field::parse("0", 1, 31),
        Err(CronError::OutOfRange { value: 0, .. })
    ));
}

#[test]
fn test_non_numeric_value() {
    assert!(matches!(
        Field::parse("test", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
    assert!(matches!(
        Field::parse("1.5", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
}

#[test]
fn test_list_is_sorted_and_deduplicated() {
    let field = Field::parse("30,0,30,15", 0, 59).unwrap();
    assert_eq!(values(&field), vec![0, 15, 30]);
}

#[test]
fn test_list_rejects_bare_wildcard_term() {
    assert!(matches!(
        Field::parse("*,5", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
}

#[test]
fn test_range() {
    let field = Field::parse("10-15", 1, 31).unwrap();
    assert_eq!(values(&field), vec![10, 11, 12, 13, 14, 15]);
}

#[test]
fn test_reversed_range_fails() {
    assert!(matches!(
        Field::parse("5-2", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
}

#[test]
fn test_range_with_step() {
    let field = Field::parse("0-59/15", 0, 59).unwrap();
    assert_eq!(values(&field), vec![0, 15, 30, 45]);
}

#[test]
fn test_wildcard_with_step() {
    let field = Field::parse("*/20", 0, 59).unwrap();
    assert_eq!(values(&field), vec![0, 20, 40]);
}

#[test]
fn test_leading_step_separator_means_wildcard_step() {
    assert_eq!(
        Field::parse("/5", 0, 59).unwrap(),
        Field::parse("*/5", 0, 59).unwrap()
    );
}

#[test]
fn test_stepped_value_runs_to_domain_max() {
    let field = Field::parse("10/20", 0, 59).unwrap();
    assert_eq!(values(&field), vec![10, 30, 50]);
}

#[test]
fn test_non_positive_step_fails() {
    assert!(matches!(
        Field::parse("*/0", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
    assert!(matches!(
        Field::parse("*/-5", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
    assert!(matches!(
        Field::parse("10/x", 0, 59),
        Err(CronError::InvalidSyntax(_))
    ));
}

#[test]
fn test_union_of_terms() {
    let field = Field::parse("1-3,10/20,59", 0, 59).unwrap();
    assert_eq!(values(&field), vec![1, 2, 3, 10, 30, 50, 59]);
}

#[test]
fn test_contains() {
    let field = Field::parse("0,30", 0, 59).unwrap();
    assert!(field.contains(0));
    assert!(field.contains(30));
    assert!(!field.contains(15));
    assert!(Field::Any.contains(42));
}

#[test]
fn test_first() {
    assert_eq!(Field::parse("30,15", 0, 59).unwrap().first(0), 15);
    assert_eq!(Field::Any.first(7), 7);
}

#[test]
fn test_iter_over_domain() {
    let collected: Vec<u32> = Field::Any.iter(1, 5).collect();
    assert_eq!(collected, vec![1, 2, 3, 4, 5]);

    let field = Field::parse("2,4", 1, 5).unwrap();
    let collected: Vec<u32> = field.iter(1, 5).collect();
    assert_eq!(collected, vec![2, 4]);
}

#[test]
fn test_display_is_canonical() {
    assert_eq!(Field::Any.to_string(), "*");
    assert_eq!(Field::parse("10/20", 0, 59).unwrap().to_string(), "10,30,50");
    assert_eq!(Field::parse("3-5", 0, 59).unwrap().to_string(), "3,4,5");
}

#[test]
fn test_values_within_domain_and_ascending() {
    for expr in ["*/7", "1,5,3", "0-59/4", "17/13", "58,59"] {
        let field = Field::parse(expr, 0, 59).unwrap();
        let values = values(&field);
        assert!(!values.is_empty(), "{expr} parsed to an empty set");
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(values.iter().all(|&value| value <= 59));
    }
}
