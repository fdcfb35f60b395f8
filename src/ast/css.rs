//! The post-evaluation CSS tree (`spec.md` §3 "CSS tree"). Built by
//! `crate::evaluate`, rewritten in place by the extension engine
//! (`crate::selector::extend`) and the placeholder pruner (`crate::prune`),
//! then visited once by the serializer (`crate::serializer`).

use codemap::Span;

use crate::selector::SelectorList;

#[derive(Debug, Clone)]
pub enum CssNode {
    Root(Vec<CssNode>),
    StyleRule {
        selector: SelectorList,
        children: Vec<CssNode>,
        span: Span,
    },
    Media {
        query: String,
        children: Vec<CssNode>,
        span: Span,
    },
    Supports {
        condition: String,
        children: Vec<CssNode>,
        span: Span,
    },
    Keyframes {
        name: String,
        children: Vec<CssNode>,
        span: Span,
    },
    KeyframesBlock {
        selector: String,
        children: Vec<CssNode>,
        span: Span,
    },
    UnknownAtRule {
        name: String,
        params: String,
        children: Vec<CssNode>,
        span: Span,
    },
    Declaration {
        property: String,
        value: String,
        span: Span,
    },
    Import {
        url: String,
        span: Span,
    },
    Comment {
        text: String,
        span: Span,
    },
    Charset,
}

impl CssNode {
    pub fn children_mut(&mut self) -> Option<&mut Vec<CssNode>> {
        match self {
            CssNode::Root(c)
            | CssNode::StyleRule { children: c, .. }
            | CssNode::Media { children: c, .. }
            | CssNode::Supports { children: c, .. }
            | CssNode::Keyframes { children: c, .. }
            | CssNode::KeyframesBlock { children: c, .. }
            | CssNode::UnknownAtRule { children: c, .. } => Some(c),
            CssNode::Declaration { .. }
            | CssNode::Import { .. }
            | CssNode::Comment { .. }
            | CssNode::Charset => None,
        }
    }

    pub fn is_empty_container(&self) -> bool {
        matches!(self.children_mut_ref(), Some(c) if c.is_empty())
    }

    fn children_mut_ref(&self) -> Option<&Vec<CssNode>> {
        match self {
            CssNode::Root(c)
            | CssNode::StyleRule { children: c, .. }
            | CssNode::Media { children: c, .. }
            | CssNode::Supports { children: c, .. }
            | CssNode::Keyframes { children: c, .. }
            | CssNode::KeyframesBlock { children: c, .. }
            | CssNode::UnknownAtRule { children: c, .. } => Some(c),
            _ => None,
        }
    }
}
