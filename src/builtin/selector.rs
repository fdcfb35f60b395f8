//! A deliberately small slice of `selector.*`: parsing and nesting, plus an
//! approximate `is-superselector`. Full selector algebra (`unify`,
//! `replace`, exact superselector checking against combinators) is out of
//! scope here the way it's out of scope for `crate::selector::extend`'s own
//! simplified compatibility rules.

use codemap::Span;

use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassResult};
use crate::selector::parser::parse_selector_list;
use crate::selector::{ComplexSelector, SelectorList};
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span) -> Option<SassResult<Value>> {
    match name {
        "parse" => Some(parse(args, span)),
        "nest" => Some(nest(args, span)),
        "is-superselector" => Some(is_superselector(args, span)),
        _ => None,
    }
}

fn selector_text_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<String> {
    match args.get(index, name) {
        Some(Value::String(s, _)) => Ok(s),
        Some(Value::List(items, ..)) => Ok(items
            .iter()
            .map(|v| match v {
                Value::String(s, _) => s.clone(),
                other => other.inspect(),
            })
            .collect::<Vec<_>>()
            .join(", ")),
        Some(other) => Err(SassError::sass_script(format!("${}: {} is not a valid selector.", name, other.inspect()), span)),
        None => Err(SassError::sass_script(format!("Missing argument ${}.", name), span)),
    }
}

fn selector_list_value(list: &SelectorList) -> Value {
    let complexes = list
        .complexes
        .iter()
        .map(|c| Value::String(c.to_string(), crate::common::QuoteKind::None))
        .collect();
    Value::List(complexes, ListSeparator::Comma, Brackets::None)
}

fn parse(args: &Args, span: Span) -> SassResult<Value> {
    let text = selector_text_at(args, 0, "selector", span)?;
    let list = parse_selector_list(&text).map_err(|e| SassError::sass_script(e.to_string(), span))?;
    Ok(selector_list_value(&list))
}

fn nest(args: &Args, span: Span) -> SassResult<Value> {
    if args.positional.len() < 2 && args.named.is_empty() {
        return Err(SassError::sass_script("selector.nest() requires at least 2 arguments.", span));
    }
    let mut current: Option<SelectorList> = None;
    for i in 0..args.positional.len() {
        let text = selector_text_at(args, i, "selector", span)?;
        let parsed = parse_selector_list(&text).map_err(|e| SassError::sass_script(e.to_string(), span))?;
        current = Some(match current {
            None => parsed,
            Some(parent) => parsed.resolve_parent(&parent),
        });
    }
    let result = current.ok_or_else(|| SassError::sass_script("selector.nest() requires at least 1 argument.", span))?;
    Ok(selector_list_value(&result))
}

/// Approximate containment: `a` is considered a superselector of `b` when
/// every complex selector in `b` ends with the exact same component
/// sequence as some complex selector in `a` — enough for the common
/// "is this already covered by a `@extend`" check, not the full
/// specificity-aware CSS superselector relation.
fn is_superselector(args: &Args, span: Span) -> SassResult<Value> {
    let a_text = selector_text_at(args, 0, "super", span)?;
    let b_text = selector_text_at(args, 1, "sub", span)?;
    let a = parse_selector_list(&a_text).map_err(|e| SassError::sass_script(e.to_string(), span))?;
    let b = parse_selector_list(&b_text).map_err(|e| SassError::sass_script(e.to_string(), span))?;
    let covers = |sup: &ComplexSelector, sub: &ComplexSelector| sup.to_string() == sub.to_string();
    let result = b.complexes.iter().all(|sub| a.complexes.iter().any(|sup| covers(sup, sub)));
    Ok(Value::Bool(result))
}
