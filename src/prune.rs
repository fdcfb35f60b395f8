//! The placeholder pruner (`spec.md` §4.7, C9): once `@extend` has run, any
//! `%placeholder` selector that never got consumed still sits in the CSS
//! tree verbatim and must be stripped before serialization. Mirrors
//! libsass's `src/remove_placeholders.cpp`: a depth-first walk that drops
//! placeholder-containing complex selectors from each style rule, then
//! drops the rule entirely if nothing is left to select, then collapses
//! any container left with no children as a result.

use crate::ast::css::CssNode;

/// Prunes `tree` in place.
pub fn prune_placeholders(tree: &mut CssNode) {
    prune(tree);
}

/// Returns whether `node` should survive in its parent's children list.
fn prune(node: &mut CssNode) -> bool {
    match node {
        CssNode::StyleRule { selector, children, .. } => {
            selector.complexes.retain(|c| !c.contains_placeholder());
            children.retain_mut(prune);
            !selector.complexes.is_empty()
        }
        CssNode::Media { children, .. }
        | CssNode::Supports { children, .. }
        | CssNode::Keyframes { children, .. }
        | CssNode::KeyframesBlock { children, .. }
        | CssNode::UnknownAtRule { children, .. } => {
            children.retain_mut(prune);
            !children.is_empty()
        }
        CssNode::Root(children) => {
            children.retain_mut(prune);
            true
        }
        CssNode::Declaration { .. } | CssNode::Import { .. } | CssNode::Comment { .. } | CssNode::Charset => true,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selector::parser::parse_selector_list;
    use codemap::Span;

    fn dummy_span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    fn style_rule(selector: &str, children: Vec<CssNode>) -> CssNode {
        CssNode::StyleRule {
            selector: parse_selector_list(selector).unwrap(),
            children,
            span: dummy_span(),
        }
    }

    #[test]
    fn drops_a_style_rule_whose_only_selector_is_a_placeholder() {
        let mut tree = CssNode::Root(vec![style_rule("%unused", vec![])]);
        prune_placeholders(&mut tree);
        match tree {
            CssNode::Root(children) => assert!(children.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn keeps_a_style_rule_alongside_a_placeholder_sibling() {
        let mut tree = CssNode::Root(vec![style_rule(".kept, %unused", vec![])]);
        prune_placeholders(&mut tree);
        match &tree {
            CssNode::Root(children) => {
                assert_eq!(children.len(), 1);
                match &children[0] {
                    CssNode::StyleRule { selector, .. } => assert_eq!(selector.complexes.len(), 1),
                    _ => unreachable!(),
                }
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn collapses_a_media_block_left_with_no_children() {
        let mut tree = CssNode::Root(vec![CssNode::Media {
            query: "screen".to_owned(),
            children: vec![style_rule("%unused", vec![])],
            span: dummy_span(),
        }]);
        prune_placeholders(&mut tree);
        match tree {
            CssNode::Root(children) => assert!(children.is_empty()),
            _ => unreachable!(),
        }
    }
}
