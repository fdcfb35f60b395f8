//! The SassScript value lattice (`spec.md` §3, C2). A sum type over every
//! variant `spec.md` names, with equality, hashing, truthiness, and the two
//! textual forms (`inspect` for `#{}`-interpolation and debugging, CSS form
//! for property values) collected here; the cross-type operator table lives
//! in [`ops`].

pub mod arglist;
pub mod calculation;
pub mod color;
pub mod map;
pub mod number;
pub mod ops;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::atrule::function::UserFunction;
use crate::atrule::mixin::UserMixin;
use crate::common::{Brackets, ListSeparator, QuoteKind};
use crate::unit::Unit;
use crate::value::arglist::ArgumentList;
use crate::value::calculation::Calculation;
use crate::value::color::Color;
use crate::value::map::SassMap;
use crate::value::number::SassNumber;

/// A first-class reference to a function: either one declared with
/// `@function` or a name resolved against the built-in library
/// (`spec.md` §4.4's "dynamic calls ... fall back to name lookup").
#[derive(Debug, Clone)]
pub enum FunctionRef {
    UserDefined(String, Rc<UserFunction>),
    Builtin(String),
}

impl FunctionRef {
    pub fn name(&self) -> &str {
        match self {
            FunctionRef::UserDefined(name, _) => name,
            FunctionRef::Builtin(name) => name,
        }
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

#[derive(Debug, Clone)]
pub struct MixinRef(pub String, pub Rc<UserMixin>);

impl PartialEq for MixinRef {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(SassNumber),
    String(String, QuoteKind),
    Color(Color),
    List(Vec<Value>, ListSeparator, Brackets),
    Map(SassMap),
    ArgList(ArgumentList),
    Function(FunctionRef),
    Mixin(MixinRef),
    Calculation(Calculation),
    /// Carrier produced by a host-provided custom function/callback that
    /// raised an error; per `spec.md` §9 Open Question (c), these must
    /// never reach the serializer and are treated as `InternalError` if
    /// they do.
    CustomError(String),
    CustomWarning(String),
}

/// Hand-written rather than derived (`spec.md` §4.3): a derived `PartialEq`
/// would compare `String`'s `QuoteKind` field, making `"a" == unquote("a")`
/// false, and would never compare an empty `Map` equal to an empty `List`
/// since they're different variants. Both are real SassScript equalities
/// (the teacher's own `Value::equals` special-cases the same two things),
/// so equality is matched by hand here instead of normalizing the data
/// representation just to make `derive` work.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a, _), Value::String(b, _)) => a == b,
            (Value::Color(a), Value::Color(b)) => a == b,
            (Value::List(a_items, a_sep, a_brackets), Value::List(b_items, b_sep, b_brackets)) => {
                a_items == b_items && a_sep == b_sep && a_brackets == b_brackets
            }
            (Value::Map(a), Value::Map(b)) => a == b,
            // "maps with zero entries compare equal to empty lists" (`spec.md`
            // §3) — but not to an empty *bracketed* list: `[]` is its own
            // distinct literal, never interchangeable with `()`.
            (Value::Map(m), Value::List(items, _, Brackets::None))
            | (Value::List(items, _, Brackets::None), Value::Map(m)) => m.is_empty() && items.is_empty(),
            (Value::ArgList(a), Value::ArgList(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Mixin(a), Value::Mixin(b)) => a == b,
            (Value::Calculation(a), Value::Calculation(b)) => a == b,
            (Value::CustomError(a), Value::CustomError(b)) => a == b,
            (Value::CustomWarning(a), Value::CustomWarning(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn number(n: f64) -> Value {
        Value::Number(SassNumber::unitless(n))
    }

    pub fn number_with_unit(n: f64, unit: Unit) -> Value {
        Value::Number(SassNumber::with_unit(n, unit))
    }

    pub fn quoted(s: impl Into<String>) -> Value {
        Value::String(s.into(), QuoteKind::Quoted)
    }

    pub fn unquoted(s: impl Into<String>) -> Value {
        Value::String(s.into(), QuoteKind::None)
    }

    /// "not null and not false" (`spec.md` §3).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(..) => "string",
            Value::Color(_) => "color",
            Value::List(..) => "list",
            Value::Map(_) => "map",
            Value::ArgList(_) => "arglist",
            Value::Function(_) => "function",
            Value::Mixin(_) => "mixin",
            Value::Calculation(_) => "calculation",
            Value::CustomError(_) | Value::CustomWarning(_) => "internal",
        }
    }

    /// Treats both lists and maps uniformly as an ordered sequence, the way
    /// `@each` and most list built-ins do; an empty map behaves as the
    /// empty list (`spec.md` §3).
    pub fn as_list(&self) -> Vec<Value> {
        match self {
            Value::List(items, ..) => items.clone(),
            Value::Map(map) => map.as_list(),
            Value::ArgList(args) => args.items.clone(),
            other => vec![other.clone()],
        }
    }

    pub fn separator(&self) -> ListSeparator {
        match self {
            Value::List(_, sep, _) => *sep,
            Value::ArgList(args) => args.separator,
            _ => ListSeparator::Undecided,
        }
    }

    pub fn without_slash(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(n.without_slash()),
            other => other.clone(),
        }
    }

    /// The "inspection form" used inside `#{}` interpolation and by
    /// `@debug`/`meta.inspect()`: differs from CSS form for unquoted
    /// strings containing special characters, colors (always canonical
    /// hex/name), and collections (`spec.md` §4.5).
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(n, 10),
            Value::String(s, QuoteKind::None) => s.clone(),
            Value::String(s, QuoteKind::Quoted) => format!("\"{}\"", escape_for_double_quotes(s)),
            Value::Color(c) => inspect_color(c),
            Value::List(items, sep, brackets) => inspect_list(items, *sep, *brackets),
            Value::Map(map) => inspect_map(map),
            Value::ArgList(args) => inspect_list(&args.items, args.separator, Brackets::None),
            Value::Function(f) => format!("get-function(\"{}\")", f.name()),
            Value::Mixin(m) => format!("meta.get-mixin(\"{}\")", m.0),
            Value::Calculation(c) => c.to_string(),
            Value::CustomError(msg) => format!("Error: {}", msg),
            Value::CustomWarning(msg) => format!("Warning: {}", msg),
        }
    }

    /// A best-effort CSS-safe textual form, used only where no span/error
    /// context is available (e.g. inside [`Calculation`]'s `Display`). The
    /// real, error-producing CSS emission for property values lives in
    /// `crate::serializer`.
    pub fn css_repr(&self) -> String {
        self.inspect()
    }

    /// Value equality per `spec.md` §4.3: numbers compare via unit
    /// reduction + epsilon, strings by content regardless of quoting,
    /// colors via RGBA, lists element-wise including separator/brackets,
    /// maps as unordered key-value sets, all other cross-type pairs unequal.
    pub fn equals(&self, other: &Value) -> bool {
        self == other
    }

    /// The textual form written into a declaration's value or an
    /// `@media`/`@supports` condition after evaluation (`spec.md` §4.8).
    /// Differs from [`Value::inspect`] only in honoring the compiler's
    /// configured numeric precision instead of a fixed debug precision, and
    /// in rejecting the handful of types CSS has no literal syntax for.
    pub fn to_css(&self, precision: u8) -> Result<String, String> {
        match self {
            Value::Map(_) => Err(format!("{} isn't a valid CSS value.", self.inspect())),
            Value::Function(_) | Value::Mixin(_) => {
                Err(format!("{} isn't a valid CSS value.", self.inspect()))
            }
            Value::CustomError(msg) => Err(msg.clone()),
            Value::Number(n) => Ok(format_number(n, precision)),
            Value::List(items, sep, brackets) => {
                let parts = items
                    .iter()
                    .map(|v| v.to_css(precision))
                    .collect::<Result<Vec<_>, _>>()?;
                let joined = parts.join(sep.as_str());
                Ok(match brackets {
                    Brackets::None => joined,
                    Brackets::Bracketed => format!("[{}]", joined),
                })
            }
            Value::ArgList(args) => {
                let parts = args
                    .items
                    .iter()
                    .map(|v| v.to_css(precision))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parts.join(args.separator.as_str()))
            }
            _ => Ok(self.inspect()),
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // An empty map and an empty, non-bracketed list compare equal (see
        // `PartialEq`), so they must hash identically too — ahead of the
        // usual discriminant-first dispatch, which would otherwise hash a
        // `Map` and a `List` differently no matter their contents.
        if is_canonical_empty_collection(self) {
            "empty-collection".hash(state);
            return;
        }
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => {
                let (v, nums, dens) = n.normalized_value();
                ((v * 1e9).round() as i64).hash(state);
                nums.hash(state);
                dens.hash(state);
            }
            Value::String(s, _) => s.hash(state),
            Value::Color(c) => c.hash(state),
            Value::List(items, sep, brackets) => {
                for item in items {
                    item.hash(state);
                }
                format!("{:?}{:?}", sep, brackets).hash(state);
            }
            Value::Map(map) => {
                let mut entries: Vec<(u64, u64)> = map
                    .iter()
                    .map(|(k, v)| (hash_of(k), hash_of(v)))
                    .collect();
                entries.sort_unstable();
                entries.hash(state);
            }
            Value::ArgList(args) => {
                for item in &args.items {
                    item.hash(state);
                }
            }
            Value::Function(f) => f.name().hash(state),
            Value::Mixin(m) => m.0.hash(state),
            Value::Calculation(c) => c.to_string().hash(state),
            Value::CustomError(m) | Value::CustomWarning(m) => m.hash(state),
        }
    }
}

/// Mirrors the `Map`/`List` arm of `Value`'s `PartialEq`: true for an empty
/// map or an empty, non-bracketed list, the one pair of distinct variants
/// `spec.md` §3 requires to compare (and therefore hash) equal.
fn is_canonical_empty_collection(v: &Value) -> bool {
    match v {
        Value::Map(m) => m.is_empty(),
        Value::List(items, _, Brackets::None) => items.is_empty(),
        _ => false,
    }
}

fn hash_of(v: &Value) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    v.hash(&mut hasher);
    hasher.finish()
}

fn escape_for_double_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn inspect_color(c: &Color) -> String {
    let rgba = c.to_rgba();
    if let Some(name) = color::color_name_for_rgb(&rgba) {
        return name.to_owned();
    }
    if (rgba.alpha - 1.0).abs() < 1e-6 {
        format!(
            "#{:02x}{:02x}{:02x}",
            rgba.red.round().clamp(0.0, 255.0) as u8,
            rgba.green.round().clamp(0.0, 255.0) as u8,
            rgba.blue.round().clamp(0.0, 255.0) as u8
        )
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            rgba.red.round(),
            rgba.green.round(),
            rgba.blue.round(),
            format_number(&SassNumber::unitless(rgba.alpha), 10)
        )
    }
}

fn inspect_list(items: &[Value], sep: ListSeparator, brackets: Brackets) -> String {
    let joined = items
        .iter()
        .map(|v| match v {
            Value::List(inner, inner_sep, Brackets::None)
                if needs_parens(sep, *inner_sep) && inner.len() > 1 =>
            {
                format!("({})", v.inspect())
            }
            _ => v.inspect(),
        })
        .collect::<Vec<_>>()
        .join(sep.as_str());
    match brackets {
        Brackets::None if items.is_empty() => "()".to_owned(),
        Brackets::None => joined,
        Brackets::Bracketed => format!("[{}]", joined),
    }
}

fn needs_parens(outer: ListSeparator, inner: ListSeparator) -> bool {
    matches!(
        (outer, inner),
        (ListSeparator::Comma, ListSeparator::Comma)
            | (ListSeparator::Space, ListSeparator::Space)
            | (ListSeparator::Slash, ListSeparator::Slash)
    )
}

fn inspect_map(map: &SassMap) -> String {
    if map.is_empty() {
        return "()".to_owned();
    }
    let joined = map
        .iter()
        .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", joined)
}

/// Trims trailing zeros, applies the configured precision, and renders very
/// small magnitudes as `0` (`spec.md` §4.8). Used both for `inspect()` and,
/// with the compiler's configured precision, by the serializer.
pub fn format_number(n: &SassNumber, precision: u8) -> String {
    let threshold = 0.5 * 10f64.powi(-(precision as i32));
    let mut value = n.value;
    if value.abs() < threshold {
        value = 0.0;
    }
    let mut s = format!("{:.*}", precision as usize, value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if let Some(stripped) = s.strip_prefix("0.") {
        s = format!(".{}", stripped);
    } else if let Some(stripped) = s.strip_prefix("-0.") {
        s = format!("-.{}", stripped);
    }
    let unit = n.unit_string();
    if unit.is_empty() {
        s
    } else {
        format!("{}{}", s, unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn null_and_false_are_falsey() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::number(0.0).is_truthy());
    }

    #[test]
    fn string_equality_ignores_quoting() {
        let quoted = Value::quoted("a");
        let unquoted = Value::unquoted("a");
        assert_eq!(quoted, unquoted);
    }

    #[test]
    fn empty_map_equals_empty_list_inspect() {
        let map = Value::Map(SassMap::new());
        let list = Value::List(vec![], ListSeparator::Undecided, Brackets::None);
        assert_eq!(map.inspect(), list.inspect());
    }

    #[test]
    fn empty_map_equals_empty_unbracketed_list() {
        let map = Value::Map(SassMap::new());
        let list = Value::List(vec![], ListSeparator::Comma, Brackets::None);
        assert_eq!(map, list);
        assert_eq!(hash_of(&map), hash_of(&list));
    }

    #[test]
    fn empty_map_does_not_equal_empty_bracketed_list() {
        let map = Value::Map(SassMap::new());
        let list = Value::List(vec![], ListSeparator::Undecided, Brackets::Bracketed);
        assert_ne!(map, list);
    }

    #[test]
    fn string_equality_agrees_with_hash() {
        let quoted = Value::quoted("a");
        let unquoted = Value::unquoted("a");
        assert_eq!(hash_of(&quoted), hash_of(&unquoted));
    }

    #[test]
    fn number_formatting_trims_trailing_zeros() {
        let n = SassNumber::with_unit(10.0, Unit::Px);
        assert_eq!(format_number(&n, 10), "10px");
    }

    #[test]
    fn leading_zero_is_trimmed() {
        let n = SassNumber::unitless(0.5);
        assert_eq!(format_number(&n, 10), ".5");
    }
}
