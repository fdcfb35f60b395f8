//! `meta.*` built-ins that don't need scope access. `function-exists`,
//! `mixin-exists`, `variable-exists`, `global-variable-exists`,
//! `content-exists`, and `get-function` are special-cased directly in
//! `crate::evaluate::Evaluator::eval_meta_scope_call` instead, since this
//! module only ever sees already-evaluated argument values.

use codemap::Span;

use crate::error::{SassError, SassResult};
use crate::value::map::SassMap;
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span, precision: u8) -> Option<SassResult<Value>> {
    match name {
        "type-of" => Some(type_of(args, span)),
        "inspect" => Some(inspect(args, span)),
        "feature-exists" => Some(Ok(Value::Bool(false))),
        "keywords" => Some(keywords(args, span)),
        _ => {
            let _ = precision;
            None
        }
    }
}

fn value_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<Value> {
    args.get(index, name).ok_or_else(|| SassError::sass_script(format!("Missing argument ${}.", name), span))
}

fn type_of(args: &Args, span: Span) -> SassResult<Value> {
    let v = value_at(args, 0, "value", span)?;
    let name = match v.type_name() {
        "bool" => "boolean",
        other => other,
    };
    Ok(Value::unquoted(name))
}

fn inspect(args: &Args, span: Span) -> SassResult<Value> {
    let v = value_at(args, 0, "value", span)?;
    Ok(Value::unquoted(v.inspect()))
}

fn keywords(args: &Args, span: Span) -> SassResult<Value> {
    let v = value_at(args, 0, "args", span)?;
    let arglist = match v {
        Value::ArgList(a) => a,
        other => return Err(SassError::sass_script(format!("{} is not an argument list.", other.inspect()), span)),
    };
    let mut map = SassMap::new();
    for (k, value) in arglist.keywords.iter() {
        map.insert(k.clone(), value.clone());
    }
    Ok(Value::Map(map))
}
