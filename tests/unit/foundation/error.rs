use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MergeError::from(ParseError::MissingBase)
            .to_string()
            .contains("parse error:")
    );
    assert!(
        MergeError::from(CompositeError::MissingBase {
            path: PathBuf::from("a/b.png"),
        })
        .to_string()
        .contains("composite error: base image not found: a/b.png")
    );
    assert!(
        MergeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn offset_error_names_layer_and_axis() {
    let err = ParseError::InvalidOffset {
        index: 3,
        axis: Axis::Y,
        value: "\"abc\"".to_string(),
    };
    assert_eq!(err.to_string(), "layer 3: offset y is not an integer: \"abc\"");
}

#[test]
fn syntax_error_reports_location() {
    let err = ParseError::Syntax {
        line: 2,
        column: 7,
        message: "expected '}'".to_string(),
    };
    assert!(err.to_string().starts_with("syntax error at 2:7"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MergeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
