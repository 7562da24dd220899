use super::*;

#[test]
fn last_root_assignment_wins() {
    let t = parse_root_table("other = 1\nipt = { 1 }\nipt = { 2, 3 };").unwrap();
    assert_eq!(t.sequence().count(), 2);
    assert_eq!(t.index(1), Some(&Value::Number(2.0)));
}

#[test]
fn return_and_bare_table_chunks() {
    let t = parse_root_table("return { base = 'x' }").unwrap();
    assert_eq!(t.field("base"), Some(&Value::Str("x".to_owned())));

    let t = parse_root_table("{ 'a'; 'b', }").unwrap();
    assert_eq!(t.sequence().count(), 2);
}

#[test]
fn explicit_keys_and_positional_counter() {
    let t = parse_root_table(r#"ipt = { [3] = "c", "a", ["name"] = 1, nil, [2.0] = "b" }"#).unwrap();
    // Positional `nil` occupies index 2 and overrides `[2.0]`.
    assert_eq!(t.index(1), Some(&Value::Str("a".to_owned())));
    assert_eq!(t.index(2), None);
    assert_eq!(t.index(3), Some(&Value::Str("c".to_owned())));
    assert_eq!(t.field("name"), Some(&Value::Number(1.0)));
    assert_eq!(t.sequence().count(), 1);
}

#[test]
fn missing_root_is_an_error() {
    let err = parse_root_table("local x = {}").unwrap_err();
    assert!(err.message.contains("no 'ipt' table"));

    let err = parse_root_table("ipt = 'text'").unwrap_err();
    assert_eq!(err.offset, 6);
}

#[test]
fn statements_are_not_evaluated() {
    assert!(parse_root_table("os.execute('rm -rf /')").is_err());
    assert!(parse_root_table("ipt = { f() }").is_err());
}

#[test]
fn unclosed_table_reports_position() {
    let src = "ipt = {\n  { file = \"a\" x = 1 },\n}";
    let err = parse_root_table(src).unwrap_err();
    assert_eq!(line_col(src, err.offset), (2, 16));
    assert!(err.message.contains("expected ',' or '}'"));
}

#[test]
fn deep_nesting_is_rejected() {
    let src = format!("ipt = {}{}", "{".repeat(100), "}".repeat(100));
    let err = parse_root_table(&src).unwrap_err();
    assert!(err.message.contains("nested too deeply"));
}

#[test]
fn nil_key_is_rejected() {
    assert!(parse_root_table("ipt = { [nil] = 1 }").is_err());
}

#[test]
fn line_col_counts_chars() {
    assert_eq!(line_col("ab\ncd", 0), (1, 1));
    assert_eq!(line_col("ab\ncd", 4), (2, 2));
    assert_eq!(line_col("é x", 3), (1, 3));
}
