//! `map.*` built-ins. Real Sass keeps these namespaced-only (no legacy
//! global aliases), since the unprefixed names would collide with CSS's
//! own `get`/`set` usage in custom properties.

use codemap::Span;

use crate::error::{SassError, SassResult};
use crate::value::map::SassMap;
use crate::value::Value;

use super::Args;

pub(super) fn dispatch(name: &str, args: &Args, span: Span) -> Option<SassResult<Value>> {
    match name {
        "get" => Some(get(args, span)),
        "set" => Some(set(args, span)),
        "merge" => Some(merge(args, span)),
        "remove" => Some(remove(args, span)),
        "has-key" => Some(has_key(args, span)),
        "keys" => Some(keys(args, span)),
        "values" => Some(values(args, span)),
        _ => None,
    }
}

fn map_at(args: &Args, index: usize, name: &str, span: Span) -> SassResult<SassMap> {
    match args.get(index, name) {
        Some(Value::Map(m)) => Ok(m),
        Some(Value::List(items, ..)) if items.is_empty() => Ok(SassMap::new()),
        Some(other) => Err(SassError::sass_script(format!("${}: {} is not a map.", name, other.inspect()), span)),
        None => Err(SassError::sass_script(format!("Missing argument ${}.", name), span)),
    }
}

fn get(args: &Args, span: Span) -> SassResult<Value> {
    let map = map_at(args, 0, "map", span)?;
    let mut current = map;
    let keys: Vec<Value> = if args.positional.len() > 2 {
        args.positional[1..].to_vec()
    } else {
        vec![args.get(1, "key").ok_or_else(|| SassError::sass_script("Missing argument $key.", span))?]
    };
    let (last, rest) = keys.split_last().expect("at least one key");
    for key in rest {
        match current.get(key) {
            Some(Value::Map(m)) => current = m,
            _ => return Ok(Value::Null),
        }
    }
    Ok(current.get(last).unwrap_or(Value::Null))
}

fn set(args: &Args, span: Span) -> SassResult<Value> {
    let mut map = map_at(args, 0, "map", span)?;
    if args.positional.len() > 3 {
        return set_nested(map, &args.positional[1..], span);
    }
    let key = args.get(1, "key").ok_or_else(|| SassError::sass_script("Missing argument $key.", span))?;
    let value = args.get(2, "value").ok_or_else(|| SassError::sass_script("Missing argument $value.", span))?;
    map.insert(key, value);
    Ok(Value::Map(map))
}

fn set_nested(mut map: SassMap, path_and_value: &[Value], span: Span) -> SassResult<Value> {
    let (value, keys) = path_and_value.split_last().expect("at least one key and a value");
    fn recurse(map: &mut SassMap, keys: &[Value], value: Value) {
        if keys.len() == 1 {
            map.insert(keys[0].clone(), value);
            return;
        }
        let mut nested = match map.get(&keys[0]) {
            Some(Value::Map(m)) => m,
            _ => SassMap::new(),
        };
        recurse(&mut nested, &keys[1..], value);
        map.insert(keys[0].clone(), Value::Map(nested));
    }
    if keys.is_empty() {
        return Err(SassError::sass_script("Missing argument $key.", span));
    }
    recurse(&mut map, keys, value.clone());
    Ok(Value::Map(map))
}

fn merge(args: &Args, span: Span) -> SassResult<Value> {
    let mut map = map_at(args, 0, "map1", span)?;
    if args.positional.len() > 2 {
        let (last, path) = args.positional[1..].split_last().expect("at least a path and a map");
        let other = match last {
            Value::Map(m) => m.clone(),
            other => return Err(SassError::sass_script(format!("{} is not a map.", other.inspect()), span)),
        };
        fn recurse(map: &mut SassMap, path: &[Value], other: SassMap) {
            if path.is_empty() {
                map.merge(other);
                return;
            }
            let mut nested = match map.get(&path[0]) {
                Some(Value::Map(m)) => m,
                _ => SassMap::new(),
            };
            recurse(&mut nested, &path[1..], other);
            map.insert(path[0].clone(), Value::Map(nested));
        }
        recurse(&mut map, path, other);
        return Ok(Value::Map(map));
    }
    let other = map_at(args, 1, "map2", span)?;
    map.merge(other);
    Ok(Value::Map(map))
}

fn remove(args: &Args, span: Span) -> SassResult<Value> {
    let mut map = map_at(args, 0, "map", span)?;
    for key in &args.positional[1..] {
        map.remove(key);
    }
    Ok(Value::Map(map))
}

fn has_key(args: &Args, span: Span) -> SassResult<Value> {
    let map = map_at(args, 0, "map", span)?;
    let key = args.get(1, "key").ok_or_else(|| SassError::sass_script("Missing argument $key.", span))?;
    Ok(Value::Bool(map.get(&key).is_some()))
}

fn keys(args: &Args, span: Span) -> SassResult<Value> {
    let map = map_at(args, 0, "map", span)?;
    Ok(Value::List(map.keys(), crate::common::ListSeparator::Comma, crate::common::Brackets::None))
}

fn values(args: &Args, span: Span) -> SassResult<Value> {
    let map = map_at(args, 0, "map", span)?;
    Ok(Value::List(map.values(), crate::common::ListSeparator::Comma, crate::common::Brackets::None))
}
