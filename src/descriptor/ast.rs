use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl SyntaxError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Literal value of the descriptor language.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Table(Table),
}

impl Value {
    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Table(_) => "table",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Table(_) => f.write_str("table"),
        }
    }
}

/// Table key after constructor evaluation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Key {
    Index(i64),
    Name(String),
    /// Keys that can never address a layer (fractional numbers, booleans).
    Other(Value),
}

/// Table constructor result. Later entries for the same key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Table {
    entries: Vec<(Key, Value)>,
}

impl Table {
    pub(crate) fn insert(&mut self, key: Key, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    fn get(&self, key: &Key) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !matches!(v, Value::Nil))
    }

    /// Integer-keyed lookup. `nil` entries count as absent.
    pub(crate) fn index(&self, i: i64) -> Option<&Value> {
        self.get(&Key::Index(i))
    }

    /// Name-keyed lookup. `nil` entries count as absent.
    pub(crate) fn field(&self, name: &str) -> Option<&Value> {
        self.get(&Key::Name(name.to_owned()))
    }

    /// Values at indices 1, 2, 3, ... up to (excluding) the first absent index.
    pub(crate) fn sequence(&self) -> impl Iterator<Item = &Value> + '_ {
        (1i64..).map_while(|i| self.index(i))
    }
}
