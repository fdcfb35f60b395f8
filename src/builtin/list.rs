//! `list.*` built-ins and their legacy global aliases (`length()`,
//! `nth()`, `join()`, …). Lists and maps are treated uniformly wherever
//! `Value::as_list` already does so (`@each`'s own rule, `spec.md` §3).

use codemap::Span;

use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassResult};
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span) -> Option<SassResult<Value>> {
    match name {
        "length" => Some(length(args, span)),
        "nth" => Some(nth(args, span)),
        "set-nth" => Some(set_nth(args, span)),
        "join" => Some(join(args, span)),
        "append" => Some(append(args, span)),
        "zip" => Some(zip(args, span)),
        "index" => Some(index(args, span)),
        "separator" => Some(separator(args, span)),
        "is-bracketed" => Some(is_bracketed(args, span)),
        _ => None,
    }
}

fn list_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<Value> {
    args.get(index, name).ok_or_else(|| SassError::sass_script(format!("Missing argument ${}.", name), span))
}

/// Real Sass indexes lists starting at 1, and allows negative indices
/// counting from the end.
fn resolve_index(n: f64, len: usize, span: Span) -> SassResult<usize> {
    if n.fract() != 0.0 || n == 0.0 {
        return Err(SassError::sass_script(format!("{} is not a valid index.", n), span));
    }
    let i = n as i64;
    let resolved = if i > 0 { i - 1 } else { len as i64 + i };
    if resolved < 0 || resolved as usize >= len {
        return Err(SassError::sass_script(format!("Invalid index {} for a list with {} elements.", i, len), span));
    }
    Ok(resolved as usize)
}

fn length(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    Ok(Value::number(v.as_list().len() as f64))
}

fn nth(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    let n = match list_at(args, 1, "n", span)? {
        Value::Number(n) => n.value,
        other => return Err(SassError::sass_script(format!("$n: {} is not a number.", other.inspect()), span)),
    };
    let items = v.as_list();
    let i = resolve_index(n, items.len(), span)?;
    Ok(items[i].clone())
}

fn set_nth(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    let n = match list_at(args, 1, "n", span)? {
        Value::Number(n) => n.value,
        other => return Err(SassError::sass_script(format!("$n: {} is not a number.", other.inspect()), span)),
    };
    let value = list_at(args, 2, "value", span)?;
    let mut items = v.as_list();
    let i = resolve_index(n, items.len(), span)?;
    items[i] = value;
    let sep = if v.separator() == ListSeparator::Undecided { ListSeparator::Space } else { v.separator() };
    Ok(Value::List(items, sep, Brackets::None))
}

fn join(args: &Args, span: Span) -> SassResult<Value> {
    let a = list_at(args, 0, "list1", span)?;
    let b = list_at(args, 1, "list2", span)?;
    let mut items = a.as_list();
    items.extend(b.as_list());
    let sep = match args.get(2, "separator") {
        Some(Value::String(s, _)) if s == "comma" => ListSeparator::Comma,
        Some(Value::String(s, _)) if s == "space" => ListSeparator::Space,
        Some(Value::String(s, _)) if s == "auto" || s.is_empty() => pick_separator(&a, &b),
        None => pick_separator(&a, &b),
        Some(other) => return Err(SassError::sass_script(format!("$separator: {} is not \"space\", \"comma\", or \"auto\".", other.inspect()), span)),
    };
    let bracketed = matches!(args.get(3, "bracketed"), Some(v) if v.is_truthy());
    let brackets = if bracketed || matches!(a, Value::List(_, _, Brackets::Bracketed)) { Brackets::Bracketed } else { Brackets::None };
    Ok(Value::List(items, sep, brackets))
}

fn pick_separator(a: &Value, b: &Value) -> ListSeparator {
    match a.separator() {
        ListSeparator::Undecided => match b.separator() {
            ListSeparator::Undecided => ListSeparator::Space,
            other => other,
        },
        other => other,
    }
}

fn append(args: &Args, span: Span) -> SassResult<Value> {
    let a = list_at(args, 0, "list", span)?;
    let value = list_at(args, 1, "val", span)?;
    let mut items = a.as_list();
    items.push(value);
    let sep = match args.get(2, "separator") {
        Some(Value::String(s, _)) if s == "comma" => ListSeparator::Comma,
        Some(Value::String(s, _)) if s == "space" => ListSeparator::Space,
        _ => {
            if a.separator() == ListSeparator::Undecided {
                ListSeparator::Space
            } else {
                a.separator()
            }
        }
    };
    let brackets = if matches!(a, Value::List(_, _, Brackets::Bracketed)) { Brackets::Bracketed } else { Brackets::None };
    Ok(Value::List(items, sep, brackets))
}

fn zip(args: &Args, span: Span) -> SassResult<Value> {
    if args.positional.is_empty() {
        return Err(SassError::sass_script("At least one list must be passed.", span));
    }
    let lists: Vec<Vec<Value>> = args.positional.iter().map(|v| v.as_list()).collect();
    let len = lists.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let tuple: Vec<Value> = lists.iter().map(|l| l[i].clone()).collect();
        out.push(Value::List(tuple, ListSeparator::Space, Brackets::None));
    }
    Ok(Value::List(out, ListSeparator::Comma, Brackets::None))
}

fn index(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    let value = list_at(args, 1, "value", span)?;
    let items = v.as_list();
    match items.iter().position(|item| *item == value) {
        Some(i) => Ok(Value::number((i + 1) as f64)),
        None => Ok(Value::Null),
    }
}

fn separator(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    let s = match v.separator() {
        ListSeparator::Comma => "comma",
        ListSeparator::Slash => "slash",
        ListSeparator::Space | ListSeparator::Undecided => "space",
    };
    Ok(Value::quoted(s))
}

fn is_bracketed(args: &Args, span: Span) -> SassResult<Value> {
    let v = list_at(args, 0, "list", span)?;
    Ok(Value::Bool(matches!(v, Value::List(_, _, Brackets::Bracketed))))
}
