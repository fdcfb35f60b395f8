//! Parses a selector list from its post-interpolation text form. By the
//! time a style rule's selector reaches here, every `#{}` segment has
//! already been evaluated and stringified (`spec.md` §4.5), so this is a
//! small self-contained recursive-descent parser over plain text rather
//! than a reuse of the main token stream.

use crate::error::SassResult;
use crate::selector::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};

pub fn parse_selector_list(text: &str) -> SassResult<SelectorList> {
    let complexes = text
        .split(',')
        .map(|part| parse_complex(part.trim()))
        .collect::<SassResult<Vec<_>>>()?;
    Ok(SelectorList { complexes })
}

fn parse_complex(text: &str) -> SassResult<ComplexSelector> {
    let mut components = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();
    let mut pending_combinator: Option<Combinator> = None;

    macro_rules! flush {
        () => {
            if !current.trim().is_empty() {
                components.push((parse_compound(current.trim())?, pending_combinator.take()));
                current.clear();
            }
        };
    }

    while let Some(&c) = chars.peek() {
        match c {
            '>' => {
                flush!();
                pending_combinator = Some(Combinator::Child);
                chars.next();
            }
            '+' => {
                flush!();
                pending_combinator = Some(Combinator::NextSibling);
                chars.next();
            }
            '~' => {
                flush!();
                pending_combinator = Some(Combinator::LaterSibling);
                chars.next();
            }
            c if c.is_whitespace() => {
                if !current.trim().is_empty() && pending_combinator.is_none() {
                    flush!();
                    pending_combinator = Some(Combinator::Descendant);
                }
                chars.next();
            }
            _ => {
                current.push(c);
                chars.next();
            }
        }
    }
    if !current.trim().is_empty() {
        components.push((parse_compound(current.trim())?, pending_combinator.take()));
    }
    if components.is_empty() {
        components.push((CompoundSelector::default(), None));
    }
    // The first component never carries an incoming combinator.
    if let Some(first) = components.first_mut() {
        first.1 = None;
    }
    Ok(ComplexSelector { components })
}

fn parse_compound(text: &str) -> SassResult<CompoundSelector> {
    let mut simples = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '&' => {
                simples.push(SimpleSelector::Parent);
                chars.next();
            }
            '*' => {
                simples.push(SimpleSelector::Universal);
                chars.next();
            }
            '.' => {
                chars.next();
                simples.push(SimpleSelector::Class(take_ident(&mut chars)));
            }
            '#' => {
                chars.next();
                simples.push(SimpleSelector::Id(take_ident(&mut chars)));
            }
            '%' => {
                chars.next();
                simples.push(SimpleSelector::Placeholder(take_ident(&mut chars)));
            }
            '[' => {
                let attr = take_until_matching(&mut chars, '[', ']');
                simples.push(SimpleSelector::AttributeWithValue(attr));
            }
            ':' => {
                chars.next();
                let is_element = chars.peek() == Some(&':');
                if is_element {
                    chars.next();
                }
                let name = take_ident(&mut chars);
                let args = if chars.peek() == Some(&'(') {
                    Some(take_until_matching(&mut chars, '(', ')'))
                } else {
                    None
                };
                simples.push(if is_element {
                    SimpleSelector::PseudoElement { name, args }
                } else {
                    SimpleSelector::PseudoClass { name, args }
                });
            }
            _ => {
                let ident = take_ident(&mut chars);
                if !ident.is_empty() {
                    simples.push(SimpleSelector::Type(ident));
                } else {
                    chars.next();
                }
            }
        }
    }
    Ok(CompoundSelector { simples })
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

fn take_until_matching(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    open: char,
    close: char,
) -> String {
    let mut out = String::new();
    let mut depth = 0;
    while let Some(c) = chars.next() {
        out.push(c);
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_compound_with_class_and_id() {
        let list = parse_selector_list(".foo#bar").unwrap();
        assert_eq!(list.complexes.len(), 1);
        assert_eq!(list.complexes[0].components[0].0.simples.len(), 2);
    }

    #[test]
    fn parses_descendant_combinator() {
        let list = parse_selector_list("div span").unwrap();
        let complex = &list.complexes[0];
        assert_eq!(complex.components.len(), 2);
        assert_eq!(complex.components[1].1, Some(Combinator::Descendant));
    }

    #[test]
    fn parses_comma_separated_list() {
        let list = parse_selector_list("a, b").unwrap();
        assert_eq!(list.complexes.len(), 2);
    }
}
