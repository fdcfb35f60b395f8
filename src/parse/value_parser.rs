//! SassScript expression grammar (`spec.md` §4.2/§4.3). A small
//! precedence-climbing parser over an already-extracted text span (see
//! `crate::parse::stylesheet`'s header-scanning, which hands this parser
//! the raw text between a declaration's `:` and its terminating `;`/`{`).
//! Precedence, high to low: unary, `*`/`/`/`%`, `+`/`-`, relational,
//! equality, `and`, `or`, then the two list levels (space, comma) —
//! matching `spec.md` §4.3's statement that arithmetic binds inside lists.

use codemap::Span;

use crate::ast::expr::{BinOp, CallArgs, Expr, Spanned, StringPart, UnaryOp};
use crate::common::{Brackets, ListSeparator, QuoteKind};
use crate::error::{SassError, SassResult};
use crate::parse::interpolation::split_interpolation;
use crate::unit::Unit;

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    span: Span,
}

impl Scanner {
    fn new(s: &str, span: Span) -> Self {
        Scanner {
            chars: s.chars().collect(),
            pos: 0,
            span,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn starts_with_word(&self, word: &str) -> bool {
        let rest: String = self.chars[self.pos..].iter().collect();
        rest.starts_with(word)
            && rest[word.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric() && c != '_' && c != '-')
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.starts_with_word(word) {
            self.pos += word.chars().count();
            true
        } else {
            false
        }
    }

    fn err(&self, message: impl Into<String>) -> Box<SassError> {
        SassError::sass_script(message, self.span)
    }
}

pub fn parse_expr_str(s: &str, span: Span) -> SassResult<Spanned<Expr>> {
    let mut scanner = Scanner::new(s, span);
    scanner.skip_ws();
    if scanner.is_at_end() {
        return Err(scanner.err("Expected expression."));
    }
    let expr = parse_comma_list(&mut scanner)?;
    scanner.skip_ws();
    Ok(expr)
}

fn spanned(span: Span, node: Expr) -> Spanned<Expr> {
    Spanned { node, span }
}

fn parse_comma_list(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut items = vec![parse_space_list(s)?];
    loop {
        s.skip_ws();
        if s.peek() == Some(',') {
            s.advance();
            s.skip_ws();
            items.push(parse_space_list(s)?);
        } else {
            break;
        }
    }
    if items.len() == 1 {
        Ok(items.pop().unwrap())
    } else {
        Ok(spanned(
            s.span,
            Expr::List {
                items,
                separator: ListSeparator::Comma,
                brackets: Brackets::None,
            },
        ))
    }
}

fn parse_space_list(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut items = vec![parse_or(s)?];
    loop {
        let before = s.pos;
        s.skip_ws();
        if s.pos == before || s.is_at_end() || matches!(s.peek(), Some(',') | Some(')') | Some(']')) {
            s.pos = before.max(s.pos.min(before + (s.pos - before)));
            if s.is_at_end() || matches!(s.peek(), Some(',') | Some(')') | Some(']')) {
                break;
            }
        }
        if s.pos == before {
            break;
        }
        items.push(parse_or(s)?);
    }
    if items.len() == 1 {
        Ok(items.pop().unwrap())
    } else {
        Ok(spanned(
            s.span,
            Expr::List {
                items,
                separator: ListSeparator::Space,
                brackets: Brackets::None,
            },
        ))
    }
}

fn parse_or(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_and(s)?;
    loop {
        s.skip_ws();
        if s.eat_word("or") {
            s.skip_ws();
            let right = parse_and(s)?;
            left = spanned(
                s.span,
                Expr::BinOp {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
            );
        } else {
            break;
        }
    }
    Ok(left)
}

fn parse_and(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_equality(s)?;
    loop {
        s.skip_ws();
        if s.eat_word("and") {
            s.skip_ws();
            let right = parse_equality(s)?;
            left = spanned(
                s.span,
                Expr::BinOp {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
            );
        } else {
            break;
        }
    }
    Ok(left)
}

fn parse_equality(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_relational(s)?;
    loop {
        s.skip_ws();
        let op = if s.peek() == Some('=') && s.peek_at(1) == Some('=') {
            s.pos += 2;
            Some(BinOp::Eq)
        } else if s.peek() == Some('!') && s.peek_at(1) == Some('=') {
            s.pos += 2;
            Some(BinOp::Neq)
        } else {
            None
        };
        match op {
            Some(op) => {
                s.skip_ws();
                let right = parse_relational(s)?;
                left = spanned(
                    s.span,
                    Expr::BinOp {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                );
            }
            None => break,
        }
    }
    Ok(left)
}

fn parse_relational(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_additive(s)?;
    loop {
        s.skip_ws();
        let op = match (s.peek(), s.peek_at(1)) {
            (Some('<'), Some('=')) => {
                s.pos += 2;
                Some(BinOp::Lte)
            }
            (Some('>'), Some('=')) => {
                s.pos += 2;
                Some(BinOp::Gte)
            }
            (Some('<'), _) => {
                s.pos += 1;
                Some(BinOp::Lt)
            }
            (Some('>'), _) => {
                s.pos += 1;
                Some(BinOp::Gt)
            }
            _ => None,
        };
        match op {
            Some(op) => {
                s.skip_ws();
                let right = parse_additive(s)?;
                left = spanned(
                    s.span,
                    Expr::BinOp {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                );
            }
            None => break,
        }
    }
    Ok(left)
}

fn parse_additive(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_multiplicative(s)?;
    loop {
        let before = s.pos;
        s.skip_ws();
        let op = match s.peek() {
            Some('+') => Some(BinOp::Add),
            Some('-') if !looks_like_negative_number_start(s) => Some(BinOp::Sub),
            _ => None,
        };
        match op {
            Some(op) => {
                s.advance();
                s.skip_ws();
                let right = parse_multiplicative(s)?;
                left = spanned(
                    s.span,
                    Expr::BinOp {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                );
            }
            None => {
                s.pos = before;
                break;
            }
        }
    }
    Ok(left)
}

/// Disambiguates `1-2` (subtraction) from `(1 -2)` (a space list containing
/// a negative number) the way a value like `margin: 0 -1px` requires: a
/// `-` only starts a new unary-negative term when the prior token ended on
/// whitespace and this lookahead sits at a list boundary. Since this parser
/// already treats adjacent terms without an operator as a space-list split
/// (`parse_space_list`), a bare `-` that makes it into `parse_additive` is
/// always binary subtraction.
fn looks_like_negative_number_start(_s: &Scanner) -> bool {
    false
}

fn parse_multiplicative(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut left = parse_unary(s)?;
    loop {
        s.skip_ws();
        let op = match s.peek() {
            Some('*') => Some(BinOp::Mul),
            Some('/') => Some(BinOp::Div),
            Some('%') => Some(BinOp::Rem),
            _ => None,
        };
        match op {
            Some(op) => {
                s.advance();
                s.skip_ws();
                let right = parse_unary(s)?;
                left = spanned(
                    s.span,
                    Expr::BinOp {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                );
            }
            None => break,
        }
    }
    Ok(left)
}

fn parse_unary(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    s.skip_ws();
    if s.eat_word("not") {
        s.skip_ws();
        let operand = parse_unary(s)?;
        return Ok(spanned(
            s.span,
            Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
        ));
    }
    match s.peek() {
        Some('-') => {
            s.advance();
            let operand = parse_unary(s)?;
            Ok(spanned(
                s.span,
                Expr::UnaryOp {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
            ))
        }
        Some('+') if s.peek_at(1).map_or(false, |c| c.is_ascii_digit() || c == '.') => {
            s.advance();
            parse_unary(s)
        }
        _ => parse_primary(s),
    }
}

fn parse_primary(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    s.skip_ws();
    match s.peek() {
        None => Err(s.err("Expected expression.")),
        Some('(') => {
            s.advance();
            s.skip_ws();
            if s.peek() == Some(')') {
                s.advance();
                return Ok(spanned(
                    s.span,
                    Expr::List {
                        items: vec![],
                        separator: ListSeparator::Undecided,
                        brackets: Brackets::None,
                    },
                ));
            }
            let inner = parse_map_or_comma_list(s)?;
            s.skip_ws();
            if s.advance() != Some(')') {
                return Err(s.err("expected \")\"."));
            }
            Ok(spanned(s.span, Expr::Paren(Box::new(inner))))
        }
        Some('[') => {
            s.advance();
            s.skip_ws();
            if s.peek() == Some(']') {
                s.advance();
                return Ok(spanned(
                    s.span,
                    Expr::List {
                        items: vec![],
                        separator: ListSeparator::Undecided,
                        brackets: Brackets::Bracketed,
                    },
                ));
            }
            let inner = parse_comma_list(s)?;
            s.skip_ws();
            if s.advance() != Some(']') {
                return Err(s.err("expected \"]\"."));
            }
            let (items, separator) = match inner.node {
                Expr::List {
                    items, separator, ..
                } => (items, separator),
                other => (vec![spanned(inner.span, other)], ListSeparator::Undecided),
            };
            Ok(spanned(
                s.span,
                Expr::List {
                    items,
                    separator,
                    brackets: Brackets::Bracketed,
                },
            ))
        }
        Some('$') => {
            s.advance();
            let name = take_ident(s);
            Ok(spanned(s.span, Expr::Variable(name)))
        }
        Some('"') | Some('\'') => parse_quoted_string(s),
        Some('#') if s.peek_at(1) == Some('{') => parse_unquoted_with_interpolation(s),
        Some('#') => parse_hex_color(s),
        Some(c) if c.is_ascii_digit() || (c == '.' && s.peek_at(1).map_or(false, |d| d.is_ascii_digit())) => {
            parse_number(s)
        }
        Some(c) if c.is_alphabetic() || c == '_' || c == '-' || c == '\\' => parse_ident_led(s),
        Some(_) => parse_unquoted_with_interpolation(s),
    }
}

fn parse_map_or_comma_list(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let first_key = parse_space_list(s)?;
    s.skip_ws();
    if s.peek() == Some(':') {
        s.advance();
        s.skip_ws();
        let first_val = parse_space_list(s)?;
        let mut entries = vec![(first_key, first_val)];
        loop {
            s.skip_ws();
            if s.peek() == Some(',') {
                s.advance();
                s.skip_ws();
                if s.peek() == Some(')') {
                    break;
                }
                let k = parse_space_list(s)?;
                s.skip_ws();
                if s.advance() != Some(':') {
                    return Err(s.err("expected \":\"."));
                }
                s.skip_ws();
                let v = parse_space_list(s)?;
                entries.push((k, v));
            } else {
                break;
            }
        }
        return Ok(spanned(s.span, Expr::Map(entries)));
    }
    let mut items = vec![first_key];
    loop {
        s.skip_ws();
        if s.peek() == Some(',') {
            s.advance();
            s.skip_ws();
            items.push(parse_space_list(s)?);
        } else {
            break;
        }
    }
    if items.len() == 1 {
        Ok(items.pop().unwrap())
    } else {
        Ok(spanned(
            s.span,
            Expr::List {
                items,
                separator: ListSeparator::Comma,
                brackets: Brackets::None,
            },
        ))
    }
}

fn take_ident(s: &mut Scanner) -> String {
    let mut out = String::new();
    while let Some(c) = s.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
            s.advance();
        } else if c == '\\' {
            s.advance();
            if let Some(escaped) = s.advance() {
                out.push(escaped);
            }
        } else {
            break;
        }
    }
    out
}

fn parse_number(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut text = String::new();
    while matches!(s.peek(), Some(c) if c.is_ascii_digit()) {
        text.push(s.advance().unwrap());
    }
    if s.peek() == Some('.') && s.peek_at(1).map_or(false, |c| c.is_ascii_digit()) {
        text.push(s.advance().unwrap());
        while matches!(s.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(s.advance().unwrap());
        }
    }
    if matches!(s.peek(), Some('e') | Some('E'))
        && (s.peek_at(1).map_or(false, |c| c.is_ascii_digit())
            || (matches!(s.peek_at(1), Some('+') | Some('-'))
                && s.peek_at(2).map_or(false, |c| c.is_ascii_digit())))
    {
        text.push(s.advance().unwrap());
        if matches!(s.peek(), Some('+') | Some('-')) {
            text.push(s.advance().unwrap());
        }
        while matches!(s.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(s.advance().unwrap());
        }
    }
    let value: f64 = text
        .parse()
        .map_err(|_| s.err(format!("Invalid number \"{}\".", text)))?;
    let unit_name = if s.peek() == Some('%') {
        s.advance();
        "%".to_owned()
    } else {
        let mut u = String::new();
        while matches!(s.peek(), Some(c) if c.is_alphabetic()) {
            u.push(s.advance().unwrap());
        }
        u
    };
    let unit = Unit::parse(&unit_name);
    Ok(spanned(s.span, Expr::Number { value, unit }))
}

fn parse_quoted_string(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let quote = s.advance().unwrap();
    let mut parts = Vec::new();
    let mut literal = String::new();
    loop {
        match s.peek() {
            None => return Err(s.err("Expected closing quote.")),
            Some(c) if c == quote => {
                s.advance();
                break;
            }
            Some('\\') => {
                s.advance();
                if let Some(escaped) = s.advance() {
                    literal.push(escaped);
                }
            }
            Some('#') if s.peek_at(1) == Some('{') => {
                if !literal.is_empty() {
                    parts.push(StringPart::Literal(std::mem::take(&mut literal)));
                }
                s.pos += 2;
                let mut depth = 1;
                let start = s.pos;
                while depth > 0 {
                    match s.peek() {
                        Some('{') => depth += 1,
                        Some('}') => depth -= 1,
                        None => return Err(s.err("Expected closing \"}\".")),
                        _ => {}
                    }
                    if depth > 0 {
                        s.advance();
                    }
                }
                let inner: String = s.chars[start..s.pos].iter().collect();
                s.advance();
                let expr = parse_expr_str(&inner, s.span)?;
                parts.push(StringPart::Interpolation(Box::new(expr)));
            }
            Some(c) => {
                literal.push(c);
                s.advance();
            }
        }
    }
    if !literal.is_empty() || parts.is_empty() {
        parts.push(StringPart::Literal(literal));
    }
    Ok(spanned(
        s.span,
        Expr::Str {
            parts,
            quote: QuoteKind::Quoted,
        },
    ))
}

fn parse_hex_color(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut text = String::from("#");
    s.advance();
    while matches!(s.peek(), Some(c) if c.is_ascii_hexdigit()) {
        text.push(s.advance().unwrap());
    }
    Ok(spanned(s.span, Expr::Color(text)))
}

fn parse_unquoted_with_interpolation(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let mut text = String::new();
    text.push(s.advance().unwrap());
    Ok(spanned(
        s.span,
        Expr::Str {
            parts: split_interpolation(&text, s.span)?,
            quote: QuoteKind::None,
        },
    ))
}

/// Identifier-led primary: a bare word that may be a keyword (`true`,
/// `false`, `null`), a calculation (`calc(...)`), a function call, a
/// namespaced reference (`math.div(...)`), or a plain unquoted string.
fn parse_ident_led(s: &mut Scanner) -> SassResult<Spanned<Expr>> {
    let start = s.pos;
    let ident = take_ident(s);
    if ident.is_empty() {
        return parse_unquoted_with_interpolation(s);
    }
    match ident.as_str() {
        "true" => return Ok(spanned(s.span, Expr::Bool(true))),
        "false" => return Ok(spanned(s.span, Expr::Bool(false))),
        "null" => return Ok(spanned(s.span, Expr::Null)),
        _ => {}
    }
    if s.peek() == Some('.') && s.peek_at(1).map_or(false, |c| c.is_alphabetic() || c == '$' || c == '_') {
        s.advance();
        if s.peek() == Some('$') {
            s.advance();
            let name = take_ident(s);
            return Ok(spanned(
                s.span,
                Expr::Namespaced {
                    namespace: ident,
                    name,
                },
            ));
        }
        let name = take_ident(s);
        if s.peek() == Some('(') {
            let args = parse_call_args(s)?;
            return Ok(spanned(
                s.span,
                Expr::FuncCall {
                    namespace: Some(ident),
                    name,
                    args,
                },
            ));
        }
        return Ok(spanned(
            s.span,
            Expr::Namespaced {
                namespace: ident,
                name,
            },
        ));
    }
    if s.peek() == Some('(') {
        if matches!(ident.as_str(), "calc" | "min" | "max" | "clamp") {
            return parse_calculation(s, ident);
        }
        let args = parse_call_args(s)?;
        return Ok(spanned(
            s.span,
            Expr::FuncCall {
                namespace: None,
                name: ident,
                args,
            },
        ));
    }
    // Not a call: treat the whole run (identifier plus any trailing
    // interpolation/punctuation up to a list boundary) as an unquoted
    // string, the common case for keyword values like `solid` or
    // `sans-serif`.
    let rest_start = s.pos;
    while let Some(c) = s.peek() {
        if c.is_whitespace() || matches!(c, ',' | ')' | ']' | ':' | ';') {
            break;
        }
        s.advance();
    }
    let text: String = s.chars[start..rest_start.max(s.pos)].iter().collect();
    if text == ident {
        return Ok(spanned(
            s.span,
            Expr::Str {
                parts: vec![StringPart::Literal(ident)],
                quote: QuoteKind::None,
            },
        ));
    }
    Ok(spanned(
        s.span,
        Expr::Str {
            parts: split_interpolation(&text, s.span)?,
            quote: QuoteKind::None,
        },
    ))
}

fn parse_calculation(s: &mut Scanner, name: String) -> SassResult<Spanned<Expr>> {
    s.advance();
    s.skip_ws();
    let mut args = Vec::new();
    if s.peek() != Some(')') {
        args.push(parse_or(s)?);
        loop {
            s.skip_ws();
            if s.peek() == Some(',') {
                s.advance();
                s.skip_ws();
                args.push(parse_or(s)?);
            } else {
                break;
            }
        }
    }
    s.skip_ws();
    if s.advance() != Some(')') {
        return Err(s.err("expected \")\"."));
    }
    Ok(spanned(s.span, Expr::Calculation { name, args }))
}

/// Parses a parameter list's inner text (no surrounding parens), as found
/// in a `@mixin`/`@function` header — `$a, $b: 1, $rest...`.
pub fn parse_params_str(s: &str, span: Span) -> SassResult<Vec<crate::ast::expr::Param>> {
    let mut scanner = Scanner::new(s, span);
    let mut params = Vec::new();
    scanner.skip_ws();
    if scanner.is_at_end() {
        return Ok(params);
    }
    loop {
        scanner.skip_ws();
        if scanner.advance() != Some('$') {
            return Err(scanner.err("Expected variable name."));
        }
        let name = take_ident(&mut scanner);
        scanner.skip_ws();
        let mut is_variadic = false;
        let mut default = None;
        if scanner.peek() == Some('.') && scanner.peek_at(1) == Some('.') && scanner.peek_at(2) == Some('.') {
            scanner.pos += 3;
            is_variadic = true;
        } else if scanner.peek() == Some(':') {
            scanner.advance();
            scanner.skip_ws();
            default = Some(parse_or(&mut scanner)?);
        }
        params.push(crate::ast::expr::Param {
            name,
            default,
            is_variadic,
        });
        scanner.skip_ws();
        if scanner.peek() == Some(',') {
            scanner.advance();
        } else {
            break;
        }
    }
    Ok(params)
}

/// Parses a call argument list's inner text (no surrounding parens), as
/// found in `@include name(...)`/a function call already stripped of its
/// parens by the statement-header scanner.
pub fn parse_args_str(s: &str, span: Span) -> SassResult<CallArgs> {
    let mut scanner = Scanner::new(s, span);
    scanner.skip_ws();
    if scanner.is_at_end() {
        return Ok(CallArgs::new());
    }
    parse_call_args_body(&mut scanner)
}

fn parse_call_args(s: &mut Scanner) -> SassResult<CallArgs> {
    s.advance();
    s.skip_ws();
    if s.peek() == Some(')') {
        s.advance();
        return Ok(CallArgs::new());
    }
    let args = parse_call_args_body(s)?;
    s.skip_ws();
    if s.advance() != Some(')') {
        return Err(s.err("expected \")\"."));
    }
    Ok(args)
}

fn parse_call_args_body(s: &mut Scanner) -> SassResult<CallArgs> {
    let mut args = CallArgs::new();
    loop {
        s.skip_ws();
        let save = s.pos;
        if s.peek() == Some('$') {
            let mut probe = s.pos + 1;
            while probe < s.chars.len()
                && (s.chars[probe].is_alphanumeric() || s.chars[probe] == '-' || s.chars[probe] == '_')
            {
                probe += 1;
            }
            if probe < s.chars.len() && s.chars[probe] == ':' {
                s.pos = probe + 1;
                let name: String = s.chars[save + 1..probe].iter().collect();
                s.skip_ws();
                let value = parse_or(s)?;
                args.named.push((name, value));
                s.skip_ws();
                if s.peek() == Some(',') {
                    s.advance();
                    continue;
                } else {
                    break;
                }
            }
        }
        let value = parse_or(s)?;
        s.skip_ws();
        if s.peek() == Some('.') && s.peek_at(1) == Some('.') && s.peek_at(2) == Some('.') {
            s.pos += 3;
            args.rest = Some(Box::new(value));
            s.skip_ws();
            break;
        }
        args.positional.push(value);
        s.skip_ws();
        if s.peek() == Some(',') {
            s.advance();
        } else {
            break;
        }
    }
    Ok(args)
}

#[cfg(test)]
mod test {
    use super::*;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        map.add_file("t".into(), "x".into()).span
    }

    #[test]
    fn parses_addition() {
        let expr = parse_expr_str("1px + 2px", span()).unwrap();
        match expr.node {
            Expr::BinOp { op: BinOp::Add, .. } => {}
            other => panic!("expected BinOp::Add, got {:?}", other),
        }
    }

    #[test]
    fn parses_space_separated_list() {
        let expr = parse_expr_str("1px solid red", span()).unwrap();
        match expr.node {
            Expr::List { items, separator: ListSeparator::Space, .. } => {
                assert_eq!(items.len(), 3);
            }
            other => panic!("expected space list, got {:?}", other),
        }
    }

    #[test]
    fn parses_function_call_with_named_arg() {
        let expr = parse_expr_str("rgba($color: red, $alpha: 0.5)", span()).unwrap();
        match expr.node {
            Expr::FuncCall { name, args, .. } => {
                assert_eq!(name, "rgba");
                assert_eq!(args.named.len(), 2);
            }
            other => panic!("expected FuncCall, got {:?}", other),
        }
    }

    #[test]
    fn parses_variable() {
        let expr = parse_expr_str("$foo", span()).unwrap();
        assert_eq!(expr.node, Expr::Variable("foo".to_owned()));
    }

    #[test]
    fn parses_map_literal() {
        let expr = parse_expr_str("(a: 1, b: 2)", span()).unwrap();
        match expr.node {
            Expr::Paren(inner) => match inner.node {
                Expr::Map(entries) => assert_eq!(entries.len(), 2),
                other => panic!("expected map, got {:?}", other),
            },
            other => panic!("expected paren, got {:?}", other),
        }
    }
}
