//! Selector AST and the `@extend` extension engine (`spec.md` §3, §4.6).
//! The simple-selector shape is grounded on Servo's vendored `selectors`
//! crate (`examples/GNOME-librsvg/servo_crates/selectors`), simplified down
//! to what a Sass compiler needs to unify and re-serialize selectors rather
//! than match them against a live DOM.

pub mod extend;
pub mod parser;

use std::fmt;

/// One simple selector component: a type/universal selector, class, id,
/// attribute, pseudo-class/element, or a Sass placeholder (`%foo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Class(String),
    Id(String),
    Attribute(String),
    /// `attr[op=val]` stored pre-formatted; attribute matching semantics
    /// are out of scope (`spec.md` §1 Non-goals imply no DOM matching).
    AttributeWithValue(String),
    Placeholder(String),
    PseudoClass {
        name: String,
        args: Option<String>,
    },
    PseudoElement {
        name: String,
        args: Option<String>,
    },
    Parent,
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Universal => f.write_str("*"),
            SimpleSelector::Type(n) => f.write_str(n),
            SimpleSelector::Class(n) => write!(f, ".{}", n),
            SimpleSelector::Id(n) => write!(f, "#{}", n),
            SimpleSelector::Attribute(n) | SimpleSelector::AttributeWithValue(n) => {
                write!(f, "[{}]", n)
            }
            SimpleSelector::Placeholder(n) => write!(f, "%{}", n),
            SimpleSelector::PseudoClass { name, args: None } => write!(f, ":{}", name),
            SimpleSelector::PseudoClass {
                name,
                args: Some(a),
            } => write!(f, ":{}({})", name, a),
            SimpleSelector::PseudoElement { name, args: None } => write!(f, "::{}", name),
            SimpleSelector::PseudoElement {
                name,
                args: Some(a),
            } => write!(f, "::{}({})", name, a),
            SimpleSelector::Parent => f.write_str("&"),
        }
    }
}

/// A sequence of simple selectors with no combinator between them:
/// `div.foo#bar:hover`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn contains_placeholder(&self) -> bool {
        self.simples
            .iter()
            .any(|s| matches!(s, SimpleSelector::Placeholder(_)))
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simples.is_empty() {
            return f.write_str("*");
        }
        for s in &self.simples {
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// ` ` (descendant)
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    LaterSibling,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::NextSibling => " + ",
            Combinator::LaterSibling => " ~ ",
        })
    }
}

/// `(compound, combinator-to-next)*` — a complex selector is the full chain
/// `div > span.foo ~ a` (`spec.md` §4.6 step 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ComplexSelector {
    pub components: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    pub fn single(compound: CompoundSelector) -> Self {
        ComplexSelector {
            components: vec![(compound, None)],
        }
    }

    pub fn contains_placeholder(&self) -> bool {
        self.components.iter().any(|(c, _)| c.contains_placeholder())
    }

    /// `&`-replacement: substitutes every `Parent` marker in `self` with a
    /// copy of `parent`, or appends `parent`'s components before `self`'s
    /// first compound when no explicit `&` is present (implicit nesting,
    /// `spec.md` §4.2's nested style-rule production).
    pub fn resolve_parent(&self, parent: &ComplexSelector) -> ComplexSelector {
        let has_explicit_parent = self.components.iter().any(|(c, _)| {
            c.simples.iter().any(|s| matches!(s, SimpleSelector::Parent))
        });
        if !has_explicit_parent {
            let mut components = parent.components.clone();
            components.extend(self.components.clone());
            return ComplexSelector { components };
        }
        let mut components = Vec::new();
        for (compound, combinator) in &self.components {
            if compound.simples.iter().any(|s| matches!(s, SimpleSelector::Parent)) {
                let mut merged = parent.clone();
                if let Some(last) = merged.components.last_mut() {
                    last.0
                        .simples
                        .extend(compound.simples.iter().filter(|s| !matches!(s, SimpleSelector::Parent)).cloned());
                }
                components.extend(merged.components);
            } else {
                components.push((compound.clone(), *combinator));
            }
            if let Some(c) = combinator {
                if let Some(last) = components.last_mut() {
                    last.1 = Some(*c);
                }
            }
        }
        ComplexSelector { components }
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (compound, combinator) in &self.components {
            if !first {
                write!(f, "{}", combinator.unwrap_or(Combinator::Descendant))?;
            } else if let Some(c) = combinator {
                write!(f, "{} ", c)?;
            }
            write!(f, "{}", compound)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorList {
    pub complexes: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn resolve_parent(&self, parent: &SelectorList) -> SelectorList {
        if parent.complexes.is_empty() {
            return self.clone();
        }
        let mut complexes = Vec::new();
        for complex in &self.complexes {
            for p in &parent.complexes {
                complexes.push(complex.resolve_parent(p));
            }
        }
        SelectorList { complexes }
    }

    pub fn is_empty_or_all_placeholders(&self) -> bool {
        self.complexes.is_empty()
            || self.complexes.iter().all(|c| c.contains_placeholder())
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.complexes.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}
