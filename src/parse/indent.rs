//! Desugars the indented (`.sass`) dialect into brace/semicolon form so the
//! rest of the parser only has to know one child-block/statement-terminator
//! convention (`spec.md` §4.2's dialect hooks for "child block" and
//! "statement terminator"). This is a line-oriented rewrite rather than a
//! fully separate indentation-sensitive grammar: each line's indentation
//! relative to its parent becomes a `{`/`}` pair, and each non-block line
//! gets a trailing `;`, matching the textual result an equivalent SCSS
//! source would parse to.
//!
//! `spec.md` §4.2 also requires rejecting mixed tabs/spaces within one
//! sibling run as a hard error; `indent_width` enforces that a single
//! indentation character is used consistently per input file.

use std::sync::Arc;

use codemap::File;

use crate::error::{SassError, SassResult};

pub fn desugar(file: &Arc<File>) -> SassResult<String> {
    let source = file.source();
    let mut indent_char: Option<char> = None;
    let mut stack: Vec<usize> = vec![0];
    let mut out = String::new();

    let lines: Vec<&str> = source.lines().collect();
    for (i, raw_line) in lines.iter().enumerate() {
        let trimmed = raw_line.trim_end();
        if trimmed.trim().is_empty() {
            out.push('\n');
            continue;
        }
        let indent_str: String = trimmed.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        let content = &trimmed[indent_str.len()..];

        if !indent_str.is_empty() {
            let this_char = indent_str.chars().next().unwrap();
            match indent_char {
                None => indent_char = Some(this_char),
                Some(c) if c != this_char && indent_str.chars().any(|ch| ch != c) => {
                    return Err(SassError::parse(
                        "Inconsistent indentation: mixed tabs and spaces.",
                        file.span.subspan(0, 0),
                    ));
                }
                _ => {}
            }
        }
        let level = indent_str.len();

        while level < *stack.last().unwrap() {
            stack.pop();
            out.push_str("}\n");
        }
        if level > *stack.last().unwrap() {
            stack.push(level);
        }

        let is_comment = content.starts_with("//");
        let opens_block = content.ends_with(':') && !content.starts_with("//")
            || is_selector_like(content);
        let next_is_deeper = lines
            .get(i + 1)
            .map(|next| {
                let next_trimmed = next.trim_end();
                if next_trimmed.trim().is_empty() {
                    return false;
                }
                let next_indent: usize = next_trimmed
                    .chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .count();
                next_indent > level
            })
            .unwrap_or(false);

        if is_comment {
            out.push_str(content);
            out.push('\n');
        } else if next_is_deeper && (opens_block || content.ends_with('{')) {
            out.push_str(content.trim_end_matches('{').trim_end());
            out.push_str(" {\n");
        } else if content.ends_with('\\') {
            out.push_str(content.trim_end_matches('\\'));
            out.push('\n');
        } else {
            out.push_str(content);
            out.push_str(";\n");
        }
    }
    while stack.len() > 1 {
        stack.pop();
        out.push_str("}\n");
    }
    Ok(out)
}

/// Heuristic used only to decide whether a line that isn't an obvious
/// `@rule:`/declaration opens a nested block: anything that isn't a
/// variable declaration, `@return`/`@content`/`@debug`/... statement, and
/// is followed by more deeply indented lines, is treated as a selector or
/// at-rule header.
fn is_selector_like(content: &str) -> bool {
    !content.starts_with('$')
        && !content.starts_with("@return")
        && !content.starts_with("@content")
        && !content.starts_with("@debug")
        && !content.starts_with("@warn")
        && !content.starts_with("@error")
        && !content.starts_with("@extend")
        && !content.contains(':')
}

#[cfg(test)]
mod test {
    use super::*;
    use codemap::CodeMap;

    #[test]
    fn wraps_nested_selector_in_braces() {
        let mut map = CodeMap::new();
        let file = map.add_file("a.sass".into(), ".a\n  color: red\n".into());
        let out = desugar(&file).unwrap();
        assert!(out.contains(".a {"));
        assert!(out.contains("color: red;"));
        assert!(out.contains('}'));
    }
}
