use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Declared type of a column.
///
/// The wire names are the ones clients pick from ("Complex Integer" keeps its space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    String,
    Integer,
    Real,
    Char,
    #[serde(rename = "Complex Integer")]
    ComplexInteger,
    #[serde(rename = "Complex Real")]
    ComplexReal,
}

impl TypeTag {
    pub const ALL: [TypeTag; 6] = [
        TypeTag::String,
        TypeTag::Char,
        TypeTag::Integer,
        TypeTag::Real,
        TypeTag::ComplexInteger,
        TypeTag::ComplexReal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "String",
            TypeTag::Integer => "Integer",
            TypeTag::Real => "Real",
            TypeTag::Char => "Char",
            TypeTag::ComplexInteger => "Complex Integer",
            TypeTag::ComplexReal => "Complex Real",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type name outside the closed set of column types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type `{}`", self.0)
    }
}

impl std::error::Error for UnknownTypeName {}

impl FromStr for TypeTag {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

/// A single cell.
///
/// Serialized adjacently tagged, e.g. `{"type":"Integer","value":42}` or `{"type":"Null"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Integer(i64),
    Real(f64),
    Char(char),
    #[serde(rename = "Complex Integer")]
    ComplexInteger { real: i64, imag: i64 },
    #[serde(rename = "Complex Real")]
    ComplexReal { real: f64, imag: f64 },
    Null,
}

impl Value {
    /// Tag of the value, `None` for `Null`.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::String(_) => Some(TypeTag::String),
            Value::Integer(_) => Some(TypeTag::Integer),
            Value::Real(_) => Some(TypeTag::Real),
            Value::Char(_) => Some(TypeTag::Char),
            Value::ComplexInteger { .. } => Some(TypeTag::ComplexInteger),
            Value::ComplexReal { .. } => Some(TypeTag::ComplexReal),
            Value::Null => None,
        }
    }

    /// False for reals holding NaN or an infinity, which JSON cannot carry.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Real(v) => v.is_finite(),
            Value::ComplexReal { real, imag } => real.is_finite() && imag.is_finite(),
            _ => true,
        }
    }
}

// Reals compare by bit pattern after folding -0.0 into 0.0 and every NaN into one NaN, so
// `Eq` and `Hash` agree with each other.
fn real_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => real_bits(*a) == real_bits(*b),
            (Value::Char(a), Value::Char(b)) => a == b,
            (
                Value::ComplexInteger { real: ar, imag: ai },
                Value::ComplexInteger { real: br, imag: bi },
            ) => ar == br && ai == bi,
            (
                Value::ComplexReal { real: ar, imag: ai },
                Value::ComplexReal { real: br, imag: bi },
            ) => real_bits(*ar) == real_bits(*br) && real_bits(*ai) == real_bits(*bi),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Real(r) => real_bits(*r).hash(state),
            Value::Char(c) => c.hash(state),
            Value::ComplexInteger { real, imag } => {
                real.hash(state);
                imag.hash(state);
            }
            Value::ComplexReal { real, imag } => {
                real_bits(*real).hash(state);
                real_bits(*imag).hash(state);
            }
            Value::Null => {}
        }
    }
}

/// Text form shown in a grid cell: `Null` is blank, complex numbers read `3 - 4i`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::ComplexInteger { real, imag } => {
                let sign = if *imag < 0 { '-' } else { '+' };
                write!(f, "{real} {sign} {}i", imag.unsigned_abs())
            }
            Value::ComplexReal { real, imag } => {
                let sign = if imag.is_sign_negative() && *imag != 0.0 {
                    '-'
                } else {
                    '+'
                };
                write!(f, "{real} {sign} {}i", imag.abs())
            }
            Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names_round_trip_through_from_str() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.as_str().parse::<TypeTag>(), Ok(tag));
        }
        assert_eq!(
            "Boolean".parse::<TypeTag>(),
            Err(UnknownTypeName("Boolean".to_string()))
        );
        assert!("string".parse::<TypeTag>().is_err());
    }

    #[test]
    fn value_wire_shape_is_adjacently_tagged() {
        assert_eq!(
            serde_json::to_value(Value::Integer(42)).unwrap(),
            json!({"type": "Integer", "value": 42})
        );
        assert_eq!(
            serde_json::to_value(Value::Null).unwrap(),
            json!({"type": "Null"})
        );
        let parsed: Value =
            serde_json::from_value(json!({"type": "Complex Integer", "value": {"real": 1, "imag": -2}}))
                .unwrap();
        assert_eq!(parsed, Value::ComplexInteger { real: 1, imag: -2 });
    }

    #[test]
    fn reals_fold_signed_zero_and_nan() {
        assert_eq!(Value::Real(0.0), Value::Real(-0.0));
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
        assert_ne!(Value::Real(1.0), Value::Integer(1));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn display_matches_grid_text() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::ComplexInteger { real: 3, imag: -4 }.to_string(), "3 - 4i");
        assert_eq!(
            Value::ComplexReal { real: 1.5, imag: 2.0 }.to_string(),
            "1.5 + 2i"
        );
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
    }
}
