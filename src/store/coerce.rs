use tablecast_schema::{TypeTag, Value};

/// Converts raw cell text into a value of `tag`. `None` means the text does not fit the type.
pub fn coerce(tag: TypeTag, raw: &str) -> Option<Value> {
    match tag {
        TypeTag::String => Some(Value::String(raw.to_string())),
        TypeTag::Integer => raw.trim().parse().ok().map(Value::Integer),
        TypeTag::Real => raw
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .map(Value::Real),
        TypeTag::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        TypeTag::ComplexInteger => {
            parse_complex::<i64>(raw).map(|(real, imag)| Value::ComplexInteger { real, imag })
        }
        TypeTag::ComplexReal => parse_complex::<f64>(raw)
            .filter(|(real, imag)| real.is_finite() && imag.is_finite())
            .map(|(real, imag)| Value::ComplexReal { real, imag }),
    }
}

/// Parses `"<re> + <im>i"` or `"<re> - <im>i"`, the same shape `Value` displays.
fn parse_complex<T: std::str::FromStr>(raw: &str) -> Option<(T, T)> {
    let body = raw.trim().strip_suffix('i')?;
    let mut parts = body.split_whitespace();
    let (real, sign, imag) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || !matches!(sign, "+" | "-") {
        return None;
    }
    // The sign is glued onto the magnitude so `i64::MIN` survives without a negation.
    let imag = format!("{sign}{imag}").parse().ok()?;
    Some((real.parse().ok()?, imag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(coerce(TypeTag::Integer, " 42 "), Some(Value::Integer(42)));
        assert_eq!(coerce(TypeTag::Integer, "4.2"), None);
        assert_eq!(coerce(TypeTag::Integer, "abc"), None);
        assert_eq!(coerce(TypeTag::Real, "2.5"), Some(Value::Real(2.5)));
        assert_eq!(coerce(TypeTag::Real, ""), None);
        assert_eq!(
            coerce(TypeTag::String, "  keep spaces "),
            Some(Value::String("  keep spaces ".to_string()))
        );
    }

    #[test]
    fn char_takes_exactly_one_character() {
        assert_eq!(coerce(TypeTag::Char, "x"), Some(Value::Char('x')));
        assert_eq!(coerce(TypeTag::Char, "é"), Some(Value::Char('é')));
        assert_eq!(coerce(TypeTag::Char, "xy"), None);
        assert_eq!(coerce(TypeTag::Char, ""), None);
    }

    #[test]
    fn complex_accepts_display_form() {
        assert_eq!(
            coerce(TypeTag::ComplexInteger, "3 - 4i"),
            Some(Value::ComplexInteger { real: 3, imag: -4 })
        );
        assert_eq!(
            coerce(TypeTag::ComplexReal, "1.5 + 2i"),
            Some(Value::ComplexReal {
                real: 1.5,
                imag: 2.0
            })
        );
        assert_eq!(
            coerce(TypeTag::ComplexInteger, "0 - 9223372036854775808i"),
            Some(Value::ComplexInteger {
                real: 0,
                imag: i64::MIN
            })
        );

        let shown = Value::ComplexInteger { real: -7, imag: 12 }.to_string();
        assert_eq!(
            coerce(TypeTag::ComplexInteger, &shown),
            Some(Value::ComplexInteger { real: -7, imag: 12 })
        );
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "1e400"] {
            assert_eq!(coerce(TypeTag::Real, raw), None, "{raw}");
        }
        for raw in ["NaN + 1i", "1 + infi", "1 - NaNi", "-inf + 0i"] {
            assert_eq!(coerce(TypeTag::ComplexReal, raw), None, "{raw}");
        }
        assert_eq!(coerce(TypeTag::Real, "1e300"), Some(Value::Real(1e300)));
    }

    #[test]
    fn complex_rejects_malformed_text() {
        for raw in ["3", "3 + 4", "3 * 4i", "3+4i", "1.5 + 2i", "3 + 4i extra", "3 - -4i"] {
            assert_eq!(coerce(TypeTag::ComplexInteger, raw), None, "{raw}");
        }
    }
}
