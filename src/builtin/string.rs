//! `string.*` built-ins and their legacy global aliases (`quote()`,
//! `unquote()`, `str-length()`, …). Indices are 1-based and Unicode
//! scalar-aware the way Sass's string functions are specified, not byte
//! offsets.

use codemap::Span;

use crate::common::QuoteKind;
use crate::error::{SassError, SassResult};
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span, precision: u8) -> Option<SassResult<Value>> {
    match name {
        "quote" => Some(quote(args, span)),
        "unquote" => Some(unquote(args, span)),
        "to-upper-case" => Some(case(args, span, str::to_uppercase)),
        "to-lower-case" => Some(case(args, span, str::to_lowercase)),
        "length" => Some(length(args, span)),
        "insert" => Some(insert(args, span)),
        "index" => Some(index(args, span)),
        "slice" => Some(slice(args, span)),
        "unique-id" => None,
        "str-length" => Some(length(args, span)),
        _ => {
            let _ = precision;
            None
        }
    }
}

fn string_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<(String, QuoteKind)> {
    match args.get(index, name) {
        Some(Value::String(s, q)) => Ok((s, q)),
        Some(other) => Err(SassError::sass_script(format!("${}: {} is not a string.", name, other.inspect()), span)),
        None => Err(SassError::sass_script(format!("Missing argument ${}.", name), span)),
    }
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn quote(args: &Args, span: Span) -> SassResult<Value> {
    let (s, _) = string_at(args, 0, "string", span)?;
    Ok(Value::quoted(s))
}

fn unquote(args: &Args, span: Span) -> SassResult<Value> {
    let (s, _) = string_at(args, 0, "string", span)?;
    Ok(Value::unquoted(s))
}

fn case(args: &Args, span: Span, f: impl Fn(&str) -> String) -> SassResult<Value> {
    let (s, q) = string_at(args, 0, "string", span)?;
    Ok(Value::String(f(&s), q))
}

fn length(args: &Args, span: Span) -> SassResult<Value> {
    let (s, _) = string_at(args, 0, "string", span)?;
    Ok(Value::number(chars(&s).len() as f64))
}

/// Real Sass indices are 1-based, negative counts from the end, and are
/// clamped (rather than erroring) for `insert`/`slice`'s looser contract.
fn clamp_index(n: f64, len: usize) -> usize {
    let i = n as i64;
    let resolved = if i >= 0 { i - 1 } else { len as i64 + i };
    resolved.clamp(0, len as i64) as usize
}

fn insert(args: &Args, span: Span) -> SassResult<Value> {
    let (s, q) = string_at(args, 0, "string", span)?;
    let (insert, _) = string_at(args, 1, "insert", span)?;
    let n = match args.get(2, "index") {
        Some(Value::Number(n)) => n.value,
        Some(other) => return Err(SassError::sass_script(format!("$index: {} is not a number.", other.inspect()), span)),
        None => return Err(SassError::sass_script("Missing argument $index.", span)),
    };
    let mut cs = chars(&s);
    let at = clamp_index(n, cs.len());
    let insert_chars = chars(&insert);
    cs.splice(at..at, insert_chars);
    Ok(Value::String(cs.into_iter().collect(), q))
}

fn index(args: &Args, span: Span) -> SassResult<Value> {
    let (s, _) = string_at(args, 0, "string", span)?;
    let (needle, _) = string_at(args, 1, "substring", span)?;
    let haystack = chars(&s);
    let needle_chars = chars(&needle);
    if needle_chars.is_empty() {
        return Ok(Value::number(1.0));
    }
    for start in 0..=haystack.len().saturating_sub(needle_chars.len()) {
        if haystack[start..start + needle_chars.len()] == needle_chars[..] {
            return Ok(Value::number((start + 1) as f64));
        }
    }
    Ok(Value::Null)
}

fn slice(args: &Args, span: Span) -> SassResult<Value> {
    let (s, q) = string_at(args, 0, "string", span)?;
    let cs = chars(&s);
    let start_n = match args.get(1, "start-at") {
        Some(Value::Number(n)) => n.value,
        _ => 1.0,
    };
    let end_n = match args.get(2, "end-at") {
        Some(Value::Number(n)) => n.value,
        _ => -1.0,
    };
    if cs.is_empty() {
        return Ok(Value::String(String::new(), q));
    }
    let start = clamp_index(start_n, cs.len());
    let end = clamp_index_inclusive(end_n, cs.len());
    if start >= cs.len() || start > end {
        return Ok(Value::String(String::new(), q));
    }
    let _ = span;
    Ok(Value::String(cs[start..=end.min(cs.len() - 1)].iter().collect(), q))
}

fn clamp_index_inclusive(n: f64, len: usize) -> usize {
    let i = n as i64;
    let resolved = if i >= 0 { i - 1 } else { len as i64 + i };
    resolved.clamp(-1, len as i64 - 1).max(0) as usize
}
