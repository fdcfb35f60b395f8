//! The CSS-tree visitor that turns a pruned [`CssNode`] into text
//! (`spec.md` §4.8, C10). Since `CssNode::Declaration`'s value is already a
//! fully-rendered string by the time it reaches here (`crate::evaluate`
//! renders every [`crate::value::Value`] through `to_css` as it builds the
//! tree), this module's job narrows to layout: indentation and bracing per
//! [`OutputStyle`], `@charset` and `@import` placement, and comment
//! handling — the same division of labor as libsass's `src/output.hpp`/
//! `src/visitor_css.hpp`, and the one the teacher's own
//! `format::PrettyPrinter` drew between "render a declaration's value" and
//! "lay out a stylesheet".

use codemap::Span;

use crate::ast::css::CssNode;
use crate::common::OutputStyle;

/// One generated-position-to-source-span correspondence, collected while
/// serializing; `crate::sourcemap` turns a run of these into the VLQ
/// `mappings` string of a source map.
#[derive(Debug, Clone, Copy)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_span: Span,
}

/// Walks `tree` and returns its serialized text under `style`.
///
/// `@import` rules are hoisted to the top of their containing block, the
/// one layout transformation every output style shares
/// (`spec.md` §4.8's "imports float to the top").
pub fn serialize(tree: &CssNode, style: OutputStyle) -> String {
    let mut printer = Printer::new(style);
    printer.visit_root(tree);
    printer.finish().0
}

/// Same as [`serialize`], but also returns one [`Mapping`] per emitted
/// declaration, style-rule header, and `@import`/at-rule line — the
/// granularity dart-sass's own source maps use.
pub fn serialize_with_mappings(tree: &CssNode, style: OutputStyle) -> (String, Vec<Mapping>) {
    let mut printer = Printer::new(style);
    printer.track_mappings = true;
    printer.visit_root(tree);
    printer.finish()
}

/// A style rule's child that is itself a rule or at-rule, as opposed to one
/// of its own declarations/comments — see [`Printer::visit_style_rule`].
fn is_nested_rule(node: &CssNode) -> bool {
    matches!(
        node,
        CssNode::StyleRule { .. }
            | CssNode::Media { .. }
            | CssNode::Supports { .. }
            | CssNode::Keyframes { .. }
            | CssNode::KeyframesBlock { .. }
            | CssNode::UnknownAtRule { .. }
    )
}

struct Printer {
    style: OutputStyle,
    out: String,
    depth: usize,
    line: u32,
    column: u32,
    track_mappings: bool,
    mappings: Vec<Mapping>,
}

impl Printer {
    fn new(style: OutputStyle) -> Self {
        Printer {
            style,
            out: String::new(),
            depth: 0,
            line: 0,
            column: 0,
            track_mappings: false,
            mappings: Vec::new(),
        }
    }

    fn finish(self) -> (String, Vec<Mapping>) {
        (self.out, self.mappings)
    }

    /// Every write to `self.out` goes through here so `line`/`column` stay
    /// accurate for mapping purposes without re-scanning the buffer.
    fn push(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.out.push_str(text);
    }

    fn mark(&mut self, span: Span) {
        if self.track_mappings {
            self.mappings.push(Mapping {
                generated_line: self.line,
                generated_column: self.column,
                source_span: span,
            });
        }
    }

    fn compressed(&self) -> bool {
        matches!(self.style, OutputStyle::Compressed)
    }

    fn indent(&mut self) {
        if matches!(self.style, OutputStyle::Nested | OutputStyle::Expanded) {
            for _ in 0..self.depth {
                self.push("  ");
            }
        }
    }

    fn newline(&mut self) {
        if !self.compressed() {
            self.push("\n");
        }
    }

    fn visit_root(&mut self, node: &CssNode) {
        let children = match node {
            CssNode::Root(c) => c,
            other => {
                self.visit(other);
                return;
            }
        };

        let (imports, rest): (Vec<&CssNode>, Vec<&CssNode>) =
            children.iter().partition(|c| matches!(c, CssNode::Import { .. }));
        let has_charset = rest.iter().any(|c| matches!(c, CssNode::Charset));

        if has_charset && !self.compressed() {
            self.push("@charset \"UTF-8\";");
            self.newline();
        }
        for node in &imports {
            self.visit(node);
        }
        for node in &rest {
            if matches!(node, CssNode::Charset) {
                continue;
            }
            self.visit(node);
        }
        self.trim_trailing_blank();
    }

    fn trim_trailing_blank(&mut self) {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        if !self.out.is_empty() && !self.compressed() {
            self.out.push('\n');
        }
    }

    fn visit(&mut self, node: &CssNode) {
        match node {
            CssNode::Root(children) => {
                for child in children {
                    self.visit(child);
                }
            }
            CssNode::Charset => {}
            CssNode::Import { url, span } => {
                self.indent();
                self.mark(*span);
                self.push("@import ");
                self.push(url);
                self.push(";");
                self.newline();
            }
            CssNode::Comment { text, .. } => {
                if self.compressed() {
                    return;
                }
                self.indent();
                self.push(text);
                self.newline();
            }
            CssNode::StyleRule { selector, children, span } => {
                self.visit_style_rule(&selector.to_string(), children, *span);
            }
            CssNode::Media { query, children, span } => {
                self.visit_block(&format!("@media {}", query), children, *span);
            }
            CssNode::Supports { condition, children, span } => {
                self.visit_block(&format!("@supports {}", condition), children, *span);
            }
            CssNode::Keyframes { name, children, span } => {
                self.visit_block(&format!("@keyframes {}", name), children, *span);
            }
            CssNode::KeyframesBlock { selector, children, span } => {
                self.visit_block(selector, children, *span);
            }
            CssNode::UnknownAtRule { name, params, children, span } => {
                let header = if params.is_empty() {
                    format!("@{}", name)
                } else {
                    format!("@{} {}", name, params)
                };
                if children.is_empty() {
                    self.indent();
                    self.mark(*span);
                    self.push(&header);
                    self.push(";");
                    self.newline();
                } else {
                    self.visit_block(&header, children, *span);
                }
            }
            CssNode::Declaration { property, value, span } => {
                self.visit_declaration(property, value, *span);
            }
        }
    }

    /// A style rule's own block holds only its direct declarations/comments;
    /// any rule or at-rule nested inside it (`.a { .b { ... } }`,
    /// `.a { @media ... { ... } }`) is a separate CSS statement that floats
    /// out to be a sibling of `.a` once evaluation has already resolved its
    /// selector against the parent (`spec.md` §8 example 1), the way
    /// libsass's output visitor and the teacher's own printer split
    /// "properties of this rule" from "rules nested inside this rule".
    fn visit_style_rule(&mut self, header: &str, children: &[CssNode], span: Span) {
        let (nested, own): (Vec<&CssNode>, Vec<&CssNode>) = children.iter().partition(|c| is_nested_rule(c));
        if !own.is_empty() {
            self.visit_block(header, own.iter().copied(), span);
        }
        for child in nested {
            self.visit(child);
        }
    }

    fn visit_block<'a>(&mut self, header: &str, children: impl IntoIterator<Item = &'a CssNode>, span: Span) {
        let mut children = children.into_iter().peekable();
        if children.peek().is_none() {
            return;
        }
        self.indent();
        self.mark(span);
        self.push(header);
        match self.style {
            OutputStyle::Compressed => self.push("{"),
            OutputStyle::Compact => self.push(" { "),
            _ => self.push(" {\n"),
        }
        self.depth += 1;
        for child in children {
            self.visit(child);
        }
        self.depth -= 1;
        match self.style {
            OutputStyle::Compressed => {
                if self.out.ends_with(';') {
                    self.out.pop();
                }
                self.push("}");
            }
            OutputStyle::Compact => {
                if self.out.ends_with(' ') {
                    self.out.pop();
                }
                self.push("}\n");
            }
            _ => {
                self.indent();
                self.push("}\n");
            }
        }
    }

    fn visit_declaration(&mut self, property: &str, value: &str, span: Span) {
        self.indent();
        self.mark(span);
        match self.style {
            OutputStyle::Compressed => {
                self.push(property);
                self.push(":");
                self.push(value);
                self.push(";");
            }
            OutputStyle::Compact => {
                self.push(property);
                self.push(": ");
                self.push(value);
                self.push("; ");
            }
            _ => {
                self.push(property);
                self.push(": ");
                self.push(value);
                self.push(";\n");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selector::parser::parse_selector_list;
    use codemap::CodeMap;

    fn dummy_span() -> codemap::Span {
        let mut map = CodeMap::new();
        map.add_file("test".into(), "x".into()).span
    }

    fn sample_tree() -> CssNode {
        CssNode::Root(vec![CssNode::StyleRule {
            selector: parse_selector_list(".a").unwrap(),
            children: vec![CssNode::Declaration {
                property: "color".to_owned(),
                value: "red".to_owned(),
                span: dummy_span(),
            }],
            span: dummy_span(),
        }])
    }

    #[test]
    fn expanded_indents_and_breaks_lines() {
        let css = serialize(&sample_tree(), OutputStyle::Expanded);
        assert_eq!(css, ".a {\n  color: red;\n}\n");
    }

    #[test]
    fn compressed_drops_whitespace_and_trailing_semicolons() {
        let css = serialize(&sample_tree(), OutputStyle::Compressed);
        assert_eq!(css, ".a{color:red}");
    }

    #[test]
    fn empty_style_rule_emits_nothing() {
        let tree = CssNode::Root(vec![CssNode::StyleRule {
            selector: parse_selector_list(".empty").unwrap(),
            children: vec![],
            span: dummy_span(),
        }]);
        assert_eq!(serialize(&tree, OutputStyle::Expanded), "");
    }

    #[test]
    fn nested_style_rule_becomes_a_sibling_not_an_inner_block() {
        let tree = CssNode::Root(vec![CssNode::StyleRule {
            selector: parse_selector_list(".a").unwrap(),
            children: vec![
                CssNode::Declaration {
                    property: "color".to_owned(),
                    value: "red".to_owned(),
                    span: dummy_span(),
                },
                CssNode::StyleRule {
                    selector: parse_selector_list(".a .b").unwrap(),
                    children: vec![CssNode::Declaration {
                        property: "color".to_owned(),
                        value: "blue".to_owned(),
                        span: dummy_span(),
                    }],
                    span: dummy_span(),
                },
            ],
            span: dummy_span(),
        }]);
        let css = serialize(&tree, OutputStyle::Expanded);
        assert_eq!(css, ".a {\n  color: red;\n}\n.a .b {\n  color: blue;\n}\n");
    }

    #[test]
    fn style_rule_with_only_a_nested_rule_emits_no_empty_block() {
        let tree = CssNode::Root(vec![CssNode::StyleRule {
            selector: parse_selector_list(".a").unwrap(),
            children: vec![CssNode::StyleRule {
                selector: parse_selector_list(".a .b").unwrap(),
                children: vec![CssNode::Declaration {
                    property: "color".to_owned(),
                    value: "blue".to_owned(),
                    span: dummy_span(),
                }],
                span: dummy_span(),
            }],
            span: dummy_span(),
        }]);
        let css = serialize(&tree, OutputStyle::Expanded);
        assert_eq!(css, ".a .b {\n  color: blue;\n}\n");
    }

    #[test]
    fn charset_is_emitted_once_at_the_top() {
        let tree = CssNode::Root(vec![CssNode::Charset, CssNode::StyleRule {
            selector: parse_selector_list(".a").unwrap(),
            children: vec![CssNode::Declaration {
                property: "color".to_owned(),
                value: "red".to_owned(),
                span: dummy_span(),
            }],
            span: dummy_span(),
        }]);
        let css = serialize(&tree, OutputStyle::Expanded);
        assert!(css.starts_with("@charset \"UTF-8\";\n"));
    }
}
