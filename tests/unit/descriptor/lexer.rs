use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_assignment_with_table() {
    assert_eq!(
        kinds(r#"ipt = { file = "a", x = -3 }"#),
        vec![
            TokenKind::Ident("ipt".to_owned()),
            TokenKind::Assign,
            TokenKind::LBrace,
            TokenKind::Ident("file".to_owned()),
            TokenKind::Assign,
            TokenKind::Str("a".to_owned()),
            TokenKind::Comma,
            TokenKind::Ident("x".to_owned()),
            TokenKind::Assign,
            TokenKind::Minus,
            TokenKind::Number(3.0),
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn skips_line_and_block_comments() {
    let src = "-- header\n--[[ block\n spanning ]] 1 --[==[ x ]] still ]==] 2";
    assert_eq!(
        kinds(src),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
}

#[test]
fn numbers_hex_fraction_exponent() {
    assert_eq!(
        kinds("0x1F 2.5 .5 1e2"),
        vec![
            TokenKind::Number(31.0),
            TokenKind::Number(2.5),
            TokenKind::Number(0.5),
            TokenKind::Number(100.0),
            TokenKind::Eof,
        ]
    );
    assert!(lex("1e").is_err());
    assert!(lex("12abc").is_err());
}

#[test]
fn string_escapes_and_long_strings() {
    assert_eq!(
        kinds(r#"'it\'s' "a\tb\65" [[raw\n]]"#),
        vec![
            TokenKind::Str("it's".to_owned()),
            TokenKind::Str("a\tbA".to_owned()),
            TokenKind::Str("raw\\n".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn non_ascii_strings_pass_through() {
    assert_eq!(
        kinds("\u{feff}\"立ち絵_01\""),
        vec![TokenKind::Str("立ち絵_01".to_owned()), TokenKind::Eof]
    );
}

#[test]
fn errors_carry_byte_offsets() {
    let err = lex("ipt = \"open").unwrap_err();
    assert_eq!(err.offset, 6);

    let err = lex("ipt = { x = 1 + 2 }").unwrap_err();
    assert_eq!(err.offset, 14);
    assert!(err.message.contains("unexpected character '+'"));
}
