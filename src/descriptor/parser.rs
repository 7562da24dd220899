use crate::descriptor::ast::{Key, SyntaxError, Table, Value};
use crate::descriptor::lexer::{Span, Token, TokenKind, lex};

/// Global name the descriptor table is assigned to.
pub const DESCRIPTOR_ROOT: &str = "ipt";

const MAX_TABLE_DEPTH: usize = 64;

/// Parse descriptor source and return the root table.
///
/// Accepts a chunk of `[local] name = value` assignments (the last assignment to
/// [`DESCRIPTOR_ROOT`] wins), a `return <table>` chunk, or a bare table.
pub(crate) fn parse_root_table(src: &str) -> Result<Table, SyntaxError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    let first = p.peek().kind.clone();
    let (value, at) = match first {
        TokenKind::Return => {
            p.bump();
            let at = p.span().start;
            let v = p.parse_value()?;
            p.consume(&TokenKind::Semi);
            p.expect(&TokenKind::Eof)?;
            (v, at)
        }
        TokenKind::LBrace => {
            let at = p.span().start;
            let v = p.parse_value()?;
            p.expect(&TokenKind::Eof)?;
            (v, at)
        }
        _ => {
            let mut root = None;
            while p.peek().kind != TokenKind::Eof {
                let (name, value, at) = p.parse_assignment()?;
                if name == DESCRIPTOR_ROOT {
                    root = Some((value, at));
                }
            }
            root.ok_or_else(|| {
                SyntaxError::new(
                    src.len(),
                    format!("no '{DESCRIPTOR_ROOT}' table is assigned"),
                )
            })?
        }
    };

    match value {
        Value::Table(t) => Ok(t),
        other => Err(SyntaxError::new(
            at,
            format!(
                "'{DESCRIPTOR_ROOT}' must be a table, found {}",
                other.type_name()
            ),
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.span().start,
            format!("expected {expected}, found {}", self.peek().kind.describe()),
        )
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), SyntaxError> {
        if self.peek().kind == *kind {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().kind == *kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_assignment(&mut self) -> Result<(String, Value, usize), SyntaxError> {
        self.consume(&TokenKind::Local);
        let name = match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                self.bump();
                name
            }
            _ => return Err(self.unexpected("an assignment")),
        };
        self.expect(&TokenKind::Assign)?;
        let at = self.span().start;
        let value = self.parse_value()?;
        self.consume(&TokenKind::Semi);
        Ok((name, value, at))
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        let tok = self.bump();
        match tok.kind {
            TokenKind::Nil => Ok(Value::Nil),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Number(v) => Ok(Value::Number(v)),
            TokenKind::Str(s) => Ok(Value::Str(s)),
            TokenKind::Minus => match self.bump().kind {
                TokenKind::Number(v) => Ok(Value::Number(-v)),
                other => Err(SyntaxError::new(
                    tok.span.start,
                    format!("expected number after '-', found {}", other.describe()),
                )),
            },
            TokenKind::LBrace => self.parse_table_body(tok.span.start).map(Value::Table),
            other => Err(SyntaxError::new(
                tok.span.start,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    /// Parse table fields after the opening `{` up to and including the closing `}`.
    fn parse_table_body(&mut self, open_at: usize) -> Result<Table, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_TABLE_DEPTH {
            return Err(SyntaxError::new(open_at, "tables nested too deeply"));
        }

        let mut table = Table::default();
        let mut positional = Vec::<Value>::new();

        loop {
            if self.consume(&TokenKind::RBrace) {
                break;
            }

            let named = *self.peek_kind_at(1) == TokenKind::Assign;
            match self.peek().kind.clone() {
                TokenKind::LBracket => {
                    let key_at = self.bump().span.start;
                    let key = self.parse_value()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.expect(&TokenKind::Assign)?;
                    let value = self.parse_value()?;
                    table.insert(table_key(key, key_at)?, value);
                }
                TokenKind::Ident(name) if named => {
                    self.bump();
                    self.bump();
                    let value = self.parse_value()?;
                    table.insert(Key::Name(name), value);
                }
                _ => positional.push(self.parse_value()?),
            }

            if self.consume(&TokenKind::Comma) || self.consume(&TokenKind::Semi) {
                continue;
            }
            if self.consume(&TokenKind::RBrace) {
                break;
            }
            return Err(self.unexpected("',' or '}'"));
        }

        // Positional items are stored last, so they win over explicit `[n]` keys.
        for (i, value) in positional.into_iter().enumerate() {
            table.insert(Key::Index(i as i64 + 1), value);
        }

        self.depth -= 1;
        Ok(table)
    }
}

fn table_key(key: Value, at: usize) -> Result<Key, SyntaxError> {
    match key {
        Value::Nil => Err(SyntaxError::new(at, "table index is nil")),
        Value::Number(v) if v.is_nan() => Err(SyntaxError::new(at, "table index is NaN")),
        Value::Number(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(Key::Index(v as i64)),
        Value::Str(s) => Ok(Key::Name(s)),
        other => Ok(Key::Other(other)),
    }
}

/// Convert a byte offset into a 1-based (line, column) pair.
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(src.len());
    let before = src.get(..offset).unwrap_or(src);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
#[path = "../../tests/unit/descriptor/parser.rs"]
mod tests;
