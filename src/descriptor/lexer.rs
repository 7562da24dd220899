use crate::descriptor::ast::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),
    Nil,
    True,
    False,
    Local,
    Return,

    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Comma,
    Semi,
    Minus,

    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Ident(s) => format!("name '{s}'"),
            Self::Number(v) => format!("number {v}"),
            Self::Str(s) => format!("string {s:?}"),
            Self::Nil => "'nil'".to_owned(),
            Self::True => "'true'".to_owned(),
            Self::False => "'false'".to_owned(),
            Self::Local => "'local'".to_owned(),
            Self::Return => "'return'".to_owned(),
            Self::LBrace => "'{'".to_owned(),
            Self::RBrace => "'}'".to_owned(),
            Self::LBracket => "'['".to_owned(),
            Self::RBracket => "']'".to_owned(),
            Self::Assign => "'='".to_owned(),
            Self::Comma => "','".to_owned(),
            Self::Semi => "';'".to_owned(),
            Self::Minus => "'-'".to_owned(),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    // A UTF-8 byte order mark is common in hand-edited descriptor files.
    if input.starts_with('\u{feff}') {
        i = '\u{feff}'.len_utf8();
    }

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Comments: `-- line` or `--[==[ block ]==]`.
        if c == '-' && bytes.get(i + 1) == Some(&b'-') {
            i += 2;
            if let Some(level) = long_bracket_level(bytes, i) {
                let (_, end) = read_long_bracket(input, i, level)
                    .ok_or_else(|| SyntaxError::new(start, "unfinished block comment"))?;
                i = end;
            } else {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            continue;
        }

        if c.is_ascii_digit()
            || (c == '.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit())
        {
            let (v, end) = lex_number(input, i)?;
            i = end;
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let s = &input[start..i];
            let kind = match s {
                "nil" => TokenKind::Nil,
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "local" => TokenKind::Local,
                "return" => TokenKind::Return,
                _ => TokenKind::Ident(s.to_owned()),
            };
            out.push(Token {
                kind,
                span: Span { start, end: i },
            });
            continue;
        }

        if c == '"' || c == '\'' {
            let (s, end) = lex_quoted(input, i)?;
            i = end;
            out.push(Token {
                kind: TokenKind::Str(s),
                span: Span { start, end: i },
            });
            continue;
        }

        if c == '['
            && let Some(level) = long_bracket_level(bytes, i)
        {
            let (s, end) = read_long_bracket(input, i, level)
                .ok_or_else(|| SyntaxError::new(start, "unfinished long string"))?;
            i = end;
            out.push(Token {
                kind: TokenKind::Str(s.to_owned()),
                span: Span { start, end: i },
            });
            continue;
        }

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '=' => TokenKind::Assign,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            '-' => TokenKind::Minus,
            _ => {
                let ch = input[start..].chars().next().unwrap_or(c);
                return Err(SyntaxError::new(start, format!("unexpected character '{ch}'")));
            }
        };
        i += 1;
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}

fn lex_number(input: &str, start: usize) -> Result<(f64, usize), SyntaxError> {
    let bytes = input.as_bytes();
    let mut i = start;

    if bytes[i] == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
        i += 2;
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
            i += 1;
        }
        if digits_start == i {
            return Err(SyntaxError::new(start, "malformed hex number"));
        }
        let v = u64::from_str_radix(&input[digits_start..i], 16)
            .map_err(|_| SyntaxError::new(start, "hex number out of range"))?;
        return Ok((v as f64, i));
    }

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let e_pos = i;
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if exp_start == i {
            return Err(SyntaxError::new(
                e_pos,
                "invalid number exponent (expected digits)",
            ));
        }
    }
    if i < bytes.len() && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
        return Err(SyntaxError::new(start, "malformed number"));
    }

    let v: f64 = input[start..i]
        .parse()
        .map_err(|_| SyntaxError::new(start, "invalid number"))?;
    Ok((v, i))
}

fn lex_quoted(input: &str, start: usize) -> Result<(String, usize), SyntaxError> {
    let bytes = input.as_bytes();
    let quote = bytes[start];
    let mut buf = Vec::<u8>::new();
    let mut i = start + 1;

    loop {
        let Some(&b) = bytes.get(i) else {
            return Err(SyntaxError::new(start, "unfinished string"));
        };
        match b {
            b'\n' => return Err(SyntaxError::new(start, "unfinished string")),
            b'\\' => {
                let esc_pos = i;
                i += 1;
                let Some(&e) = bytes.get(i) else {
                    return Err(SyntaxError::new(start, "unfinished string"));
                };
                i += 1;
                match e {
                    b'n' => buf.push(b'\n'),
                    b't' => buf.push(b'\t'),
                    b'r' => buf.push(b'\r'),
                    b'a' => buf.push(0x07),
                    b'b' => buf.push(0x08),
                    b'f' => buf.push(0x0c),
                    b'v' => buf.push(0x0b),
                    b'\\' | b'"' | b'\'' => buf.push(e),
                    b'\n' => buf.push(b'\n'),
                    b'x' => {
                        let hex = input
                            .get(i..i + 2)
                            .and_then(|h| u8::from_str_radix(h, 16).ok())
                            .ok_or_else(|| SyntaxError::new(esc_pos, "invalid hex escape"))?;
                        buf.push(hex);
                        i += 2;
                    }
                    b'0'..=b'9' => {
                        let mut v = u32::from(e - b'0');
                        let mut n = 1;
                        while n < 3 && i < bytes.len() && bytes[i].is_ascii_digit() {
                            v = v * 10 + u32::from(bytes[i] - b'0');
                            i += 1;
                            n += 1;
                        }
                        let byte = u8::try_from(v)
                            .map_err(|_| SyntaxError::new(esc_pos, "decimal escape too large"))?;
                        buf.push(byte);
                    }
                    _ => {
                        return Err(SyntaxError::new(esc_pos, "invalid escape sequence"));
                    }
                }
            }
            _ if b == quote => {
                i += 1;
                break;
            }
            _ => {
                buf.push(b);
                i += 1;
            }
        }
    }

    let s = String::from_utf8(buf)
        .map_err(|_| SyntaxError::new(start, "string is not valid UTF-8"))?;
    Ok((s, i))
}

/// If a long bracket `[`, `[=`, `[==`, ... `[` opens at `at`, return its level.
fn long_bracket_level(bytes: &[u8], at: usize) -> Option<usize> {
    if bytes.get(at) != Some(&b'[') {
        return None;
    }
    let mut level = 0;
    let mut i = at + 1;
    while bytes.get(i) == Some(&b'=') {
        level += 1;
        i += 1;
    }
    (bytes.get(i) == Some(&b'[')).then_some(level)
}

/// Read the body of a long bracket opening at `at`; returns (body, end offset).
fn read_long_bracket(input: &str, at: usize, level: usize) -> Option<(&str, usize)> {
    let body_start = at + level + 2;
    let close = format!("]{}]", "=".repeat(level));
    let rel = input.get(body_start..)?.find(&close)?;
    let mut body = &input[body_start..body_start + rel];
    // A newline right after the opening bracket is not part of the string.
    if let Some(rest) = body.strip_prefix("\r\n") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix('\n') {
        body = rest;
    }
    Some((body, body_start + rel + close.len()))
}

#[cfg(test)]
#[path = "../../tests/unit/descriptor/lexer.rs"]
mod tests;
