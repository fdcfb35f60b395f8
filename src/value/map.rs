//! Insertion-ordered map value (`spec.md` §3: `Map(entries: ...)`).
//!
//! Adapted from `examples/MidasLamb-grass/src/value/map.rs` almost
//! verbatim: same `Vec<(Value, Value)>` backing store, same method names
//! (`get`/`insert`/`merge`/`keys`/`values`/`as_list`/`entries`), generalized
//! to this crate's own [`Value`] and to not need a fallible `equals` call
//! (structural `PartialEq` on `Value` already encodes the comparison rules
//! from `spec.md` §4.3, so map lookups here are infallible).

use std::slice::Iter;
use std::vec::IntoIter;

use crate::common::{Brackets, ListSeparator};
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct SassMap(Vec<(Value, Value)>);

impl SassMap {
    pub const fn new() -> SassMap {
        SassMap(Vec::new())
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    pub fn remove(&mut self, key: &Value) {
        self.0.retain(|(k, ..)| k != key);
    }

    pub fn merge(&mut self, other: SassMap) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> Iter<(Value, Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.iter().map(|(k, ..)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.iter().map(|(.., v)| v.clone()).collect()
    }

    pub fn as_list(&self) -> Vec<Value> {
        self.0
            .iter()
            .map(|(k, v)| {
                Value::List(vec![k.clone(), v.clone()], ListSeparator::Space, Brackets::None)
            })
            .collect()
    }

    pub fn entries(self) -> Vec<(Value, Value)> {
        self.0
    }

    /// Returns true if the key already existed (and was overwritten).
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        for (k, v) in &mut self.0 {
            if *k == key {
                *v = value;
                return true;
            }
        }
        self.0.push((key, value));
        false
    }
}

impl PartialEq for SassMap {
    fn eq(&self, other: &Self) -> bool {
        if self.0.len() != other.0.len() {
            return false;
        }
        self.0
            .iter()
            .all(|(k, v)| other.get(k).map_or(false, |ov| ov == *v))
    }
}
impl Eq for SassMap {}

impl IntoIterator for SassMap {
    type Item = (Value, Value);
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::QuoteKind;

    #[test]
    fn insert_then_get() {
        let mut map = SassMap::new();
        map.insert(Value::String("a".into(), QuoteKind::Quoted), Value::Null);
        assert!(map.get(&Value::String("a".into(), QuoteKind::None)).is_some());
    }

    #[test]
    fn empty_map_equals_empty_list() {
        let map = SassMap::new();
        assert!(map.as_list().is_empty());
    }
}
