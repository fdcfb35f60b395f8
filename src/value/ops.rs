//! Binary/unary SassScript operators (`spec.md` §4.3). `libsass` dispatches
//! every operator through each value's own `operator==`/arithmetic
//! overrides with a double-dispatch visitor
//! (`examples/original_source/src/ast_values.cpp`); this crate collapses
//! that into one dense `match` over `(left, op, right)` tags, which reads
//! more like the teacher's own flat `Value::add`-style free functions than
//! like a C++ visitor, while keeping the same "every pair has a defined, or
//! explicitly rejected, behavior" contract.

use codemap::Span;

use crate::common::{Brackets, ListSeparator, QuoteKind};
use crate::error::{SassError, SassResult};
use crate::value::number::SassNumber;
use crate::value::Value;

pub fn add(left: &Value, right: &Value, span: Span) -> SassResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .add(b)
            .map(Value::Number)
            .ok_or_else(|| incompatible_units(a, b, span)),
        (Value::String(a, qa), Value::String(b, _)) => {
            Ok(Value::String(format!("{}{}", a, b), *qa))
        }
        (Value::String(a, qa), other) => Ok(Value::String(format!("{}{}", a, other.inspect()), *qa)),
        (other, Value::String(b, qb)) => {
            Ok(Value::String(format!("{}{}", other.css_repr(), b), *qb))
        }
        (Value::List(items, sep, brackets), other) => {
            let mut items = items.clone();
            items.push(other.clone());
            Ok(Value::List(items, *sep, *brackets))
        }
        (Value::Color(_), Value::Number(_)) | (Value::Number(_), Value::Color(_)) => {
            Err(type_error(left, right, "+", span))
        }
        (Value::Color(_), Value::Color(_)) => Err(type_error(left, right, "+", span)),
        _ => Ok(Value::quoted(format!("{}{}", left.inspect(), right.inspect()))),
    }
}

pub fn sub(left: &Value, right: &Value, span: Span) -> SassResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .sub(b)
            .map(Value::Number)
            .ok_or_else(|| incompatible_units(a, b, span)),
        (Value::Color(_), Value::Number(_)) | (Value::Number(_), Value::Color(_)) => {
            Err(type_error(left, right, "-", span))
        }
        (Value::Color(_), Value::Color(_)) => Err(type_error(left, right, "-", span)),
        _ => Ok(Value::unquoted(format!("{}-{}", left.inspect(), right.inspect()))),
    }
}

pub fn mul(left: &Value, right: &Value, span: Span) -> SassResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.mul(b))),
        (Value::Color(_), _) | (_, Value::Color(_)) => Err(type_error(left, right, "*", span)),
        _ => Err(type_error(left, right, "*", span)),
    }
}

pub fn div(left: &Value, right: &Value, span: Span) -> SassResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let mut result = a.div(b);
            result.as_slash = Some((Box::new(a.clone()), Box::new(b.clone())));
            Ok(Value::Number(result))
        }
        (Value::Color(_), _) | (_, Value::Color(_)) => Err(type_error(left, right, "/", span)),
        _ => Ok(Value::unquoted(format!("{}/{}", left.inspect(), right.inspect()))),
    }
}

pub fn rem(left: &Value, right: &Value, span: Span) -> SassResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .rem(b)
            .map(Value::Number)
            .ok_or_else(|| incompatible_units(a, b, span)),
        _ => Err(type_error(left, right, "%", span)),
    }
}

pub fn neg(value: &Value, span: Span) -> SassResult<Value> {
    match value {
        Value::Number(n) => Ok(Value::Number(n.neg())),
        _ => Err(SassError::sass_script(
            format!("Undefined operation \"-{}\".", value.inspect()),
            span,
        )),
    }
}

pub fn not(value: &Value) -> Value {
    Value::Bool(!value.is_truthy())
}

pub fn and(left: Value, evaluate_right: impl FnOnce() -> SassResult<Value>) -> SassResult<Value> {
    if left.is_truthy() {
        evaluate_right()
    } else {
        Ok(left)
    }
}

pub fn or(left: Value, evaluate_right: impl FnOnce() -> SassResult<Value>) -> SassResult<Value> {
    if left.is_truthy() {
        Ok(left)
    } else {
        evaluate_right()
    }
}

/// `spec.md` §4.3: "Equality is a total function over all value pairs."
pub fn equals(left: &Value, right: &Value) -> Value {
    Value::Bool(left.without_slash() == right.without_slash())
}

pub fn not_equals(left: &Value, right: &Value) -> Value {
    Value::Bool(left.without_slash() != right.without_slash())
}

pub fn relational(
    left: &Value,
    right: &Value,
    op: &str,
    span: Span,
) -> SassResult<Value> {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(type_error(left, right, op, span));
    };
    let ordering = a
        .fuzzy_cmp(b)
        .ok_or_else(|| incompatible_units(a, b, span))?;
    use std::cmp::Ordering::*;
    let result = match (op, ordering) {
        ("<", Less) | ("<=", Less) | ("<=", Equal) => true,
        (">", Greater) | (">=", Greater) | (">=", Equal) => true,
        _ => false,
    };
    Ok(Value::Bool(result))
}

fn type_error(left: &Value, right: &Value, op: &str, span: Span) -> Box<SassError> {
    SassError::sass_script(
        format!(
            "Undefined operation \"{} {} {}\".",
            left.inspect(),
            op,
            right.inspect()
        ),
        span,
    )
}

fn incompatible_units(a: &SassNumber, b: &SassNumber, span: Span) -> Box<SassError> {
    SassError::sass_script(
        format!(
            "Incompatible units {} and {}.",
            a.unit_string(),
            b.unit_string()
        ),
        span,
    )
}

/// `list-separator()`/join helper: picks the separator a newly constructed
/// list from two operands should use when neither side dictates one.
pub fn resolve_separator(a: ListSeparator, b: ListSeparator) -> ListSeparator {
    match (a, b) {
        (ListSeparator::Undecided, other) | (other, ListSeparator::Undecided) => other,
        (a, _) => a,
    }
}

pub fn join(a: Vec<Value>, b: Vec<Value>, sep: ListSeparator, brackets: Brackets) -> Value {
    let mut items = a;
    items.extend(b);
    Value::List(items, sep, brackets)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unit::Unit;

    fn dummy_span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn number_addition_respects_units() {
        let a = Value::Number(SassNumber::with_unit(1.0, Unit::Px));
        let b = Value::Number(SassNumber::with_unit(2.0, Unit::Px));
        let result = add(&a, &b, dummy_span()).unwrap();
        assert_eq!(result, Value::Number(SassNumber::with_unit(3.0, Unit::Px)));
    }

    #[test]
    fn string_plus_number_keeps_left_quoting() {
        let a = Value::String("a".into(), QuoteKind::Quoted);
        let b = Value::number(1.0);
        let result = add(&a, &b, dummy_span()).unwrap();
        assert_eq!(result, Value::String("a1".into(), QuoteKind::Quoted));
    }

    #[test]
    fn color_plus_number_is_an_error() {
        let color = Value::Color(crate::value::color::Color::from_rgba(1.0, 2.0, 3.0, 1.0));
        let n = Value::number(1.0);
        assert!(add(&color, &n, dummy_span()).is_err());
    }

    #[test]
    fn division_preserves_as_slash() {
        let a = Value::Number(SassNumber::unitless(1.0));
        let b = Value::Number(SassNumber::unitless(2.0));
        let result = div(&a, &b, dummy_span()).unwrap();
        match result {
            Value::Number(n) => assert!(n.as_slash.is_some()),
            _ => panic!("expected number"),
        }
    }
}
