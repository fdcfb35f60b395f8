//! `#{...}` interpolation (`spec.md` §4.2: "The parser owns interpolation
//! parsing: any stretch of 'almost any value' may contain `#{expr}`
//! segments"). Splits a raw text span into literal/expression parts; each
//! expression segment is parsed with the same expression grammar
//! (`crate::parse::value_parser`) used everywhere else.

use crate::ast::expr::{Spanned, StringPart};
use crate::error::SassResult;
use crate::parse::value_parser;

/// Splits `text` on `#{` ... `}` boundaries (honoring nested braces) and
/// parses each interpolated segment as an expression. `base_span` anchors
/// every produced sub-span; since interpolation runs on already-extracted
/// text rather than the live character cursor, sub-spans are approximate
/// (they point at `base_span`'s start), a documented limitation for
/// diagnostics raised from inside an interpolated expression.
pub fn split_interpolation(text: &str, base_span: codemap::Span) -> SassResult<Vec<StringPart>> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '#' && chars.get(i + 1) == Some(&'{') {
            if !literal.is_empty() {
                parts.push(StringPart::Literal(std::mem::take(&mut literal)));
            }
            let mut depth = 1;
            let start = i + 2;
            let mut j = start;
            while j < chars.len() && depth > 0 {
                match chars[j] {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
                if depth > 0 {
                    j += 1;
                }
            }
            let inner: String = chars[start..j].iter().collect();
            let expr = value_parser::parse_expr_str(&inner, base_span)?;
            parts.push(StringPart::Interpolation(Box::new(expr)));
            i = j + 1;
        } else {
            literal.push(chars[i]);
            i += 1;
        }
    }
    if !literal.is_empty() || parts.is_empty() {
        parts.push(StringPart::Literal(literal));
    }
    Ok(parts)
}

/// True if `text` has a balanced, nonzero occurrence of `#{` — used by the
/// statement-header scanner to avoid treating an interpolation's internal
/// braces as a block-open signal.
pub fn contains_interpolation(text: &str) -> bool {
    text.contains("#{")
}

pub type InterpolatedExpr = Spanned<crate::ast::expr::Expr>;
