//! `ArgumentList` (`spec.md` §3): a positional list plus a trailing keyword
//! map, produced by a variadic `args...` parameter and consumable either as
//! a plain list or, via `keywords()`, as its captured named arguments.

use crate::common::{Brackets, ListSeparator};
use crate::value::map::SassMap;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentList {
    pub items: Vec<Value>,
    pub separator: ListSeparator,
    pub keywords: SassMap,
    /// Set once `keywords()` has been called on this value from user code,
    /// matching the teacher-adjacent rule that an argument list "tracks
    /// whether keywords were read" (`spec.md` §3) so unread keywords can be
    /// flagged as unknown arguments at the call site that produced them.
    pub keywords_accessed: bool,
}

impl ArgumentList {
    pub fn new(items: Vec<Value>, separator: ListSeparator, keywords: SassMap) -> Self {
        ArgumentList {
            items,
            separator,
            keywords,
            keywords_accessed: false,
        }
    }

    pub fn as_list_value(&self) -> Value {
        Value::List(self.items.clone(), self.separator, Brackets::None)
    }
}
