use std::str::FromStr;

use crate::descriptor::ast::{Table, Value};
use crate::descriptor::parser::{line_col, parse_root_table};
use crate::foundation::error::{Axis, ParseError};

/// File extension of descriptor files (without the dot).
pub const DESCRIPTOR_EXTENSION: &str = "ipt";

/// Base layer reference. Always placed at the origin; its image defines the canvas size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseRef {
    /// Logical asset name without extension.
    pub file_stem: String,
}

/// One positioned overlay entry of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerRef {
    /// 1-based position in the descriptor's overlay sequence.
    pub index: usize,
    /// Logical asset name without extension.
    pub file_stem: String,
    /// Horizontal offset of the overlay's top-left corner. May be negative.
    pub x: i32,
    /// Vertical offset of the overlay's top-left corner. May be negative.
    pub y: i32,
}

/// Parsed descriptor: a base layer plus overlays in paint order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerStack {
    /// Base layer.
    pub base: BaseRef,
    /// Overlays in ascending index order; later entries paint over earlier ones.
    pub overlays: Vec<LayerRef>,
}

impl FromStr for LayerStack {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_descriptor(s)
    }
}

/// Parse descriptor source text into a [`LayerStack`].
///
/// The overlay sequence is read from indices 1, 2, 3, ... and stops at the first absent
/// index, so entries after a gap are ignored.
pub fn parse_descriptor(source: &str) -> Result<LayerStack, ParseError> {
    let root = parse_root_table(source).map_err(|e| {
        let (line, column) = line_col(source, e.offset);
        ParseError::Syntax {
            line,
            column,
            message: e.message,
        }
    })?;

    let base = base_ref(&root)?;
    let overlays = root
        .sequence()
        .enumerate()
        .map(|(i, v)| layer_ref(i + 1, v))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LayerStack { base, overlays })
}

fn base_ref(root: &Table) -> Result<BaseRef, ParseError> {
    // `base = { legacy, stem }`; a bare string is accepted as the stem itself.
    let stem = match root.field("base") {
        Some(Value::Table(pair)) => pair.index(2).and_then(Value::as_str),
        Some(Value::Str(s)) => Some(s.as_str()),
        _ => None,
    };
    match stem {
        Some(s) if !s.is_empty() => Ok(BaseRef {
            file_stem: s.to_owned(),
        }),
        _ => Err(ParseError::MissingBase),
    }
}

fn layer_ref(index: usize, value: &Value) -> Result<LayerRef, ParseError> {
    let table = value.as_table().ok_or_else(|| ParseError::InvalidLayer {
        index,
        reason: format!("expected a table, found {}", value.type_name()),
    })?;

    let file_stem = match table.field("file") {
        Some(Value::Str(s)) if !s.is_empty() => s.clone(),
        Some(other) => {
            return Err(ParseError::InvalidLayer {
                index,
                reason: format!("'file' must be a non-empty string, found {other}"),
            });
        }
        None => {
            return Err(ParseError::InvalidLayer {
                index,
                reason: "missing 'file'".to_owned(),
            });
        }
    };

    Ok(LayerRef {
        index,
        file_stem,
        x: offset(table, index, Axis::X)?,
        y: offset(table, index, Axis::Y)?,
    })
}

fn offset(table: &Table, index: usize, axis: Axis) -> Result<i32, ParseError> {
    let name = match axis {
        Axis::X => "x",
        Axis::Y => "y",
    };
    let invalid = |value: String| ParseError::InvalidOffset { index, axis, value };

    let v = table
        .field(name)
        .ok_or_else(|| invalid("nil".to_owned()))?;
    let wide = match v {
        Value::Number(n) if n.is_finite() => n.trunc(),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| invalid(v.to_string()))?,
        other => return Err(invalid(other.to_string())),
    };

    if wide < f64::from(i32::MIN) || wide > f64::from(i32::MAX) {
        return Err(invalid(v.to_string()));
    }
    Ok(wide as i32)
}

#[cfg(test)]
#[path = "../../tests/unit/descriptor/model.rs"]
mod tests;
