//! Structured TLA+ values from error-trace states

use serde::Serialize;

/// A TLA+ value as printed by TLC
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Model values and other bare identifiers
    Name(String),
    Set(Vec<Value>),
    Sequence(Vec<Value>),
    Record(Vec<(String, Value)>),
    /// `(k1 :> v1 @@ k2 :> v2)`
    Function(Vec<(Value, Value)>),
    /// Text that could not be structured
    Raw(String),
}

impl Value {
    /// Number of direct children for collection values
    pub fn len(&self) -> usize {
        match self {
            Value::Set(items) | Value::Sequence(items) => items.len(),
            Value::Record(fields) => fields.len(),
            Value::Function(pairs) => pairs.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Value::Set(_) | Value::Sequence(_) | Value::Record(_) | Value::Function(_)
        )
    }
}

fn write_joined<T>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
    mut write_item: impl FnMut(&mut std::fmt::Formatter<'_>, &T) -> std::fmt::Result,
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("TRUE"),
            Value::Bool(false) => f.write_str("FALSE"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Name(n) | Value::Raw(n) => f.write_str(n),
            Value::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items, ", ", |f, v| write!(f, "{}", v))?;
                f.write_str("}")
            }
            Value::Sequence(items) => {
                f.write_str("<<")?;
                write_joined(f, items, ", ", |f, v| write!(f, "{}", v))?;
                f.write_str(">>")
            }
            Value::Record(fields) => {
                f.write_str("[")?;
                write_joined(f, fields, ", ", |f, (k, v)| write!(f, "{} |-> {}", k, v))?;
                f.write_str("]")
            }
            Value::Function(pairs) => {
                f.write_str("(")?;
                write_joined(f, pairs, " @@ ", |f, (k, v)| write!(f, "{} :> {}", k, v))?;
                f.write_str(")")
            }
        }
    }
}
