//! `math.*` built-ins and their legacy global aliases (`percentage()`,
//! `round()`, `ceil()`, `floor()`, `abs()`, `min()`, `max()`).

use codemap::Span;

use crate::error::{SassError, SassResult};
use crate::value::number::SassNumber;
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span) -> Option<SassResult<Value>> {
    match name {
        "percentage" => Some(percentage(args, span)),
        "round" => Some(unary(args, span, SassNumber::round_half_up)),
        "ceil" => Some(unary(args, span, SassNumber::ceil)),
        "floor" => Some(unary(args, span, SassNumber::floor)),
        "abs" => Some(abs(args, span)),
        "min" => Some(extremum(args, span, true)),
        "max" => Some(extremum(args, span, false)),
        "div" => Some(div(args, span)),
        "unit" => Some(unit_of(args, span)),
        "is-unitless" => Some(is_unitless(args, span)),
        "compatible" => Some(compatible(args, span)),
        _ => None,
    }
}

fn number_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<SassNumber> {
    match args.get(index, name) {
        Some(Value::Number(n)) => Ok(n),
        Some(other) => Err(SassError::sass_script(format!("${}: {} is not a number.", name, other.inspect()), span)),
        None => Err(SassError::sass_script(format!("Missing argument ${}.", name), span)),
    }
}

fn unary(args: &Args, span: Span, f: impl Fn(&SassNumber) -> SassNumber) -> SassResult<Value> {
    let n = number_at(args, 0, "number", span)?;
    Ok(Value::Number(f(&n)))
}

fn percentage(args: &Args, span: Span) -> SassResult<Value> {
    let n = number_at(args, 0, "number", span)?;
    if !n.is_unitless() {
        return Err(SassError::sass_script("$number: Expected a unitless number.", span));
    }
    Ok(Value::number_with_unit(n.value * 100.0, crate::unit::Unit::Percent))
}

fn abs(args: &Args, span: Span) -> SassResult<Value> {
    let n = number_at(args, 0, "number", span)?;
    Ok(Value::Number(SassNumber { value: n.value.abs(), as_slash: None, ..n }))
}

fn extremum(args: &Args, span: Span, want_min: bool) -> SassResult<Value> {
    if args.positional.is_empty() {
        return Err(SassError::sass_script("At least one argument must be passed.", span));
    }
    let mut numbers = Vec::with_capacity(args.positional.len());
    for v in &args.positional {
        match v {
            Value::Number(n) => numbers.push(n.clone()),
            other => return Err(SassError::sass_script(format!("{} is not a number.", other.inspect()), span)),
        }
    }
    let mut best = numbers[0].clone();
    for n in &numbers[1..] {
        let ordering = best
            .fuzzy_cmp(n)
            .ok_or_else(|| SassError::sass_script(format!("{} and {} are incompatible.", best.unit_string(), n.unit_string()), span))?;
        let take = if want_min {
            ordering == std::cmp::Ordering::Greater
        } else {
            ordering == std::cmp::Ordering::Less
        };
        if take {
            best = n.clone();
        }
    }
    Ok(Value::Number(best))
}

fn div(args: &Args, span: Span) -> SassResult<Value> {
    let a = args.get(0, "number1").ok_or_else(|| SassError::sass_script("Missing argument $number1.", span))?;
    let b = args.get(1, "number2").ok_or_else(|| SassError::sass_script("Missing argument $number2.", span))?;
    crate::value::ops::div(&a, &b, span)
}

fn unit_of(args: &Args, span: Span) -> SassResult<Value> {
    let n = number_at(args, 0, "number", span)?;
    Ok(Value::quoted(n.unit_string()))
}

fn is_unitless(args: &Args, span: Span) -> SassResult<Value> {
    let n = number_at(args, 0, "number", span)?;
    Ok(Value::Bool(n.is_unitless()))
}

fn compatible(args: &Args, span: Span) -> SassResult<Value> {
    let a = number_at(args, 0, "number1", span)?;
    let b = number_at(args, 1, "number2", span)?;
    Ok(Value::Bool(a.convert_to_match(&b).is_some()))
}
