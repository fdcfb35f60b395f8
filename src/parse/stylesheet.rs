//! The statement grammar (`spec.md` §4.2, C5). Walks the character-level
//! [`crate::lexer::Lexer`] the way the teacher's `eat_rules`/`eat_stmt`
//! (`examples/MidasLamb-grass/src/lib.rs`) do — scanning raw text up to the
//! next structurally significant character rather than tokenizing into a
//! richer token stream first — but builds a real [`Stmt`] tree instead of
//! evaluating inline, and delegates every value/selector text span to
//! [`crate::parse::value_parser`] / [`crate::parse::interpolation`].

use std::sync::Arc;

use codemap::{File, Span};

use crate::ast::expr::{CallArgs, Expr, Param, Spanned, StringPart};
use crate::ast::stmt::{ContentBlock, IfBranch, ImportArgument, Stmt};
use crate::common::{QuoteKind, SassSyntax};
use crate::error::{SassError, SassResult};
use crate::lexer::Lexer;
use crate::parse::interpolation::split_interpolation;
use crate::parse::value_parser;

/// Statement forms plain CSS (`spec.md` §4.2's blacklist) must reject.
const PLAIN_CSS_FORBIDDEN_AT_RULES: &[&str] = &[
    "extend", "mixin", "include", "function", "return", "each", "for", "if", "else", "while",
    "debug", "warn", "error", "content",
];

pub struct Parser {
    lexer: Lexer,
    file: Arc<File>,
    syntax: SassSyntax,
}

impl Parser {
    pub fn new(file: Arc<File>, syntax: SassSyntax) -> Self {
        Parser {
            lexer: Lexer::new(Arc::clone(&file)),
            file,
            syntax,
        }
    }

    pub fn parse_root(mut self) -> SassResult<Spanned<Stmt>> {
        let span = self.file.span;
        let body = self.parse_block_body(None)?;
        Ok(Spanned {
            node: Stmt::Root {
                syntax: self.syntax,
                body,
            },
            span,
        })
    }

    fn file_span(&self) -> Span {
        self.file.span
    }

    fn peek_char(&self) -> Option<char> {
        self.lexer.peek(0).map(|t| t.kind)
    }

    fn peek_at(&self, k: usize) -> Option<char> {
        self.lexer.peek(k).map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<char> {
        self.lexer.next().map(|t| t.kind)
    }

    fn skip_ws_and_comments(&mut self) -> SassResult<()> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.skip_loud_comment_consuming()?;
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    if self.syntax == SassSyntax::Css {
                        return Err(SassError::parse(
                            "Silent comments aren't allowed in plain CSS.",
                            self.current_span(),
                        ));
                    }
                    while !matches!(self.peek_char(), None | Some('\n')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_loud_comment_consuming(&mut self) -> SassResult<()> {
        self.advance();
        self.advance();
        loop {
            match self.peek_char() {
                None => return Err(SassError::parse("expected more input.", self.current_span())),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        Ok(())
    }

    fn current_span(&self) -> Span {
        match self.lexer.peek(0) {
            Some(tok) => tok.pos(),
            None => self.file_span().subspan(
                self.file.source().len() as u64,
                self.file.source().len() as u64,
            ),
        }
    }

    /// Parses statements until `terminator` (consumed) or EOF if `None`.
    fn parse_block_body(&mut self, terminator: Option<char>) -> SassResult<Vec<Spanned<Stmt>>> {
        let mut body = Vec::new();
        loop {
            self.skip_ws_and_comments()?;
            match (self.peek_char(), terminator) {
                (None, None) => break,
                (None, Some(t)) => {
                    return Err(SassError::parse(
                        format!("expected \"{}\".", t),
                        self.current_span(),
                    ))
                }
                (Some(c), Some(t)) if c == t => {
                    self.advance();
                    break;
                }
                _ => {
                    if let Some(stmt) = self.parse_statement()? {
                        body.push(stmt);
                    }
                }
            }
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> SassResult<Option<Spanned<Stmt>>> {
        let start = self.current_span();
        if self.peek_char() == Some('/') && self.peek_at(1) == Some('*') {
            let text = self.capture_loud_comment()?;
            return Ok(Some(Spanned {
                node: Stmt::LoudComment(text),
                span: start,
            }));
        }
        if self.peek_char() == Some('/') && self.peek_at(1) == Some('/') {
            let mut text = String::new();
            self.advance();
            self.advance();
            while !matches!(self.peek_char(), None | Some('\n')) {
                text.push(self.advance().unwrap());
            }
            return Ok(Some(Spanned {
                node: Stmt::SilentComment(text),
                span: start,
            }));
        }
        if self.peek_char() == Some('@') {
            return self.parse_at_rule().map(Some);
        }
        self.parse_rule_or_declaration(start)
    }

    fn capture_loud_comment(&mut self) -> SassResult<String> {
        let mut text = String::new();
        text.push(self.advance().unwrap());
        text.push(self.advance().unwrap());
        loop {
            match self.peek_char() {
                None => return Err(SassError::parse("expected more input.", self.current_span())),
                Some('*') if self.peek_at(1) == Some('/') => {
                    text.push(self.advance().unwrap());
                    text.push(self.advance().unwrap());
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        Ok(text)
    }

    /// Scans raw text up to (but not consuming) the next structurally
    /// significant character at bracket/string depth 0: `{`, `;`, or `}`.
    /// Returns the raw header text and which terminator was found (it is
    /// consumed unless it is `}`, which belongs to the enclosing block).
    fn scan_header(&mut self) -> SassResult<(String, Option<char>)> {
        let mut text = String::new();
        let mut depth: i32 = 0;
        loop {
            match self.peek_char() {
                None => return Ok((text, None)),
                Some('{') if depth == 0 => {
                    self.advance();
                    return Ok((text, Some('{')));
                }
                Some(';') if depth == 0 => {
                    self.advance();
                    return Ok((text, Some(';')));
                }
                Some('}') if depth == 0 => return Ok((text, Some('}'))),
                Some('(') | Some('[') | Some('{') => {
                    depth += 1;
                    text.push(self.advance().unwrap());
                }
                Some(')') | Some(']') | Some('}') => {
                    depth -= 1;
                    text.push(self.advance().unwrap());
                }
                Some('"') | Some('\'') => {
                    let quote = self.advance().unwrap();
                    text.push(quote);
                    loop {
                        match self.peek_char() {
                            None => return Err(SassError::parse("Expected closing quote.", self.current_span())),
                            Some(c) if c == quote => {
                                text.push(self.advance().unwrap());
                                break;
                            }
                            Some('\\') => {
                                text.push(self.advance().unwrap());
                                if let Some(c) = self.advance() {
                                    text.push(c);
                                }
                            }
                            Some(c) => {
                                text.push(c);
                                self.advance();
                            }
                        }
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_rule_or_declaration(&mut self, start: Span) -> SassResult<Option<Spanned<Stmt>>> {
        let (header, terminator) = self.scan_header()?;
        let header = header.trim();
        if header.is_empty() {
            return Ok(None);
        }

        if header.starts_with('$') {
            return self
                .build_variable_decl(header, start)
                .map(Some);
        }

        match terminator {
            Some('{') => {
                if is_nested_property_header(header) {
                    let colon = top_level_colon(header).unwrap();
                    let property = parse_interpolated(header[..colon].trim(), start)?;
                    let body = self.parse_block_body(Some('}'))?;
                    Ok(Some(Spanned {
                        node: Stmt::Declaration {
                            property,
                            value: None,
                            body,
                        },
                        span: start,
                    }))
                } else {
                    let selector = parse_interpolated(header, start)?;
                    let body = self.parse_block_body(Some('}'))?;
                    Ok(Some(Spanned {
                        node: Stmt::StyleRule { selector, body },
                        span: start,
                    }))
                }
            }
            Some(';') | Some('}') | None => {
                let Some(colon) = top_level_colon(header) else {
                    return Err(SassError::parse(
                        format!("expected \":\"."),
                        start,
                    ));
                };
                let property = parse_interpolated(header[..colon].trim(), start)?;
                let value_text = header[colon + 1..].trim();
                let value = if value_text.is_empty() {
                    None
                } else {
                    Some(value_parser::parse_expr_str(value_text, start)?)
                };
                Ok(Some(Spanned {
                    node: Stmt::Declaration {
                        property,
                        value,
                        body: vec![],
                    },
                    span: start,
                }))
            }
            Some(_) => unreachable!("scan_header only returns '{{', ';', '}}' or None"),
        }
    }

    fn build_variable_decl(&self, header: &str, span: Span) -> SassResult<Spanned<Stmt>> {
        let colon = header
            .find(':')
            .ok_or_else(|| SassError::parse("expected \":\".", span))?;
        let lhs = header[..colon].trim();
        let (namespace, name) = match lhs.split_once('.') {
            Some((ns, n)) if n.starts_with('$') => (Some(ns.to_owned()), n[1..].to_owned()),
            _ => (None, lhs.trim_start_matches('$').to_owned()),
        };
        let mut rhs = header[colon + 1..].trim();
        let mut default = false;
        let mut global = false;
        loop {
            if let Some(rest) = rhs.strip_suffix("!default") {
                default = true;
                rhs = rest.trim_end();
            } else if let Some(rest) = rhs.strip_suffix("!global") {
                global = true;
                rhs = rest.trim_end();
            } else {
                break;
            }
        }
        let value = value_parser::parse_expr_str(rhs, span)?;
        Ok(Spanned {
            node: Stmt::VariableDecl {
                namespace,
                name,
                value,
                default,
                global,
            },
            span,
        })
    }

    fn parse_at_rule(&mut self) -> SassResult<Spanned<Stmt>> {
        let start = self.current_span();
        self.advance();
        let name = self.take_ident();
        if self.syntax == SassSyntax::Css && PLAIN_CSS_FORBIDDEN_AT_RULES.contains(&name.as_str()) {
            return Err(SassError::parse(
                format!("@{} isn't allowed in plain CSS.", name),
                start,
            ));
        }
        match name.as_str() {
            "use" => self.parse_use(start),
            "forward" => self.parse_forward(start),
            "import" => self.parse_import(start),
            "mixin" => self.parse_mixin_decl(start),
            "function" => self.parse_function_decl(start),
            "include" => self.parse_include(start),
            "content" => self.parse_content_include(start),
            "return" => {
                let (header, _) = self.scan_header()?;
                let expr = value_parser::parse_expr_str(header.trim(), start)?;
                Ok(Spanned {
                    node: Stmt::Return(expr),
                    span: start,
                })
            }
            "if" => self.parse_if(start),
            "each" => self.parse_each(start),
            "for" => self.parse_for(start),
            "while" => self.parse_while(start),
            "at-root" => self.parse_at_root(start),
            "media" => self.parse_media(start),
            "supports" => self.parse_supports(start),
            "keyframes" => self.parse_keyframes(start, "keyframes".to_owned()),
            n if n.ends_with("keyframes") => self.parse_keyframes(start, n.to_owned()),
            "extend" => self.parse_extend(start),
            "error" => self.parse_error_warn_debug(start, Stmt::Error as fn(_) -> Stmt),
            "warn" => self.parse_error_warn_debug(start, Stmt::Warn as fn(_) -> Stmt),
            "debug" => self.parse_error_warn_debug(start, Stmt::Debug as fn(_) -> Stmt),
            _ => self.parse_unknown_at_rule(start, name),
        }
    }

    fn take_ident(&mut self) -> String {
        let mut out = String::new();
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '-' || c == '_') {
            out.push(self.advance().unwrap());
        }
        out
    }

    fn take_ws(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn parse_use(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        let (header, _) = self.scan_header()?;
        let header = header.trim();
        let (url_part, rest) = split_first_segment(header);
        let url = unquote(url_part);
        let mut alias = None;
        let mut configuration = Vec::new();
        let mut rest = rest.trim();
        if let Some(stripped) = rest.strip_prefix("as ") {
            let (alias_part, r) = split_first_segment(stripped.trim());
            alias = Some(alias_part.to_owned());
            rest = r.trim();
        }
        if let Some(stripped) = rest.strip_prefix("with") {
            let inner = stripped.trim().trim_start_matches('(').trim_end_matches(')');
            for entry in split_top_level(inner, ',') {
                if let Some((name, value)) = entry.split_once(':') {
                    let name = name.trim().trim_start_matches('$').to_owned();
                    let value = value_parser::parse_expr_str(value.trim(), start)?;
                    configuration.push((name, value));
                }
            }
        }
        Ok(Spanned {
            node: Stmt::Use {
                url,
                alias,
                configuration,
            },
            span: start,
        })
    }

    fn parse_forward(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        let (header, _) = self.scan_header()?;
        let header = header.trim();
        let (url_part, rest) = split_first_segment(header);
        let url = unquote(url_part);
        let mut prefix = None;
        let mut show = None;
        let mut hide = None;
        let mut rest = rest.trim();
        if let Some(stripped) = rest.strip_prefix("as ") {
            let (prefix_part, r) = split_first_segment(stripped.trim());
            prefix = Some(prefix_part.trim_end_matches('*').to_owned());
            rest = r.trim();
        }
        if let Some(stripped) = rest.strip_prefix("show ") {
            show = Some(
                split_top_level(stripped.trim(), ',')
                    .into_iter()
                    .map(|s| s.trim().to_owned())
                    .collect(),
            );
        } else if let Some(stripped) = rest.strip_prefix("hide ") {
            hide = Some(
                split_top_level(stripped.trim(), ',')
                    .into_iter()
                    .map(|s| s.trim().to_owned())
                    .collect(),
            );
        }
        Ok(Spanned {
            node: Stmt::Forward {
                url,
                prefix,
                show,
                hide,
            },
            span: start,
        })
    }

    fn parse_import(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        let (header, _) = self.scan_header()?;
        let mut args = Vec::new();
        for entry in split_top_level(header.trim(), ',') {
            let entry = entry.trim();
            if entry.starts_with("url(") || looks_like_static_import(entry) {
                let expr = value_parser::parse_expr_str(entry, start)?;
                args.push(ImportArgument::Static(expr));
            } else {
                args.push(ImportArgument::Dynamic(unquote(entry)));
            }
        }
        Ok(Spanned {
            node: Stmt::Import(args),
            span: start,
        })
    }

    fn parse_mixin_decl(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let name = self.take_ident();
        self.take_ws();
        let params = if self.peek_char() == Some('(') {
            self.parse_paren_text(start)?
        } else {
            Vec::new()
        };
        self.take_ws();
        let body = self.expect_body()?;
        let accepts_content = stmt_body_has_content(&body);
        Ok(Spanned {
            node: Stmt::MixinDecl {
                name,
                params,
                accepts_content,
                body,
            },
            span: start,
        })
    }

    fn parse_function_decl(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let name = self.take_ident();
        self.take_ws();
        let params = if self.peek_char() == Some('(') {
            self.parse_paren_text(start)?
        } else {
            Vec::new()
        };
        self.take_ws();
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::FunctionDecl { name, params, body },
            span: start,
        })
    }

    fn parse_paren_text(&mut self, start: Span) -> SassResult<Vec<Param>> {
        let raw = self.scan_balanced_parens()?;
        let inner = raw.trim_start_matches('(').trim_end_matches(')');
        value_parser::parse_params_str(inner, start)
    }

    fn scan_balanced_parens(&mut self) -> SassResult<String> {
        let mut out = String::new();
        let mut depth = 0;
        loop {
            match self.peek_char() {
                None => return Err(SassError::parse("expected \")\".", self.current_span())),
                Some('(') => {
                    depth += 1;
                    out.push(self.advance().unwrap());
                }
                Some(')') => {
                    depth -= 1;
                    out.push(self.advance().unwrap());
                    if depth == 0 {
                        break;
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        Ok(out)
    }

    fn expect_body(&mut self) -> SassResult<Vec<Spanned<Stmt>>> {
        self.take_ws();
        if self.advance() != Some('{') {
            return Err(SassError::parse("expected \"{\".", self.current_span()));
        }
        self.parse_block_body(Some('}'))
    }

    fn parse_include(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let first = self.take_ident();
        self.take_ws();
        let (namespace, name) = if self.peek_char() == Some('.') {
            self.advance();
            (Some(first), self.take_ident())
        } else {
            (None, first)
        };
        self.take_ws();
        let args = if self.peek_char() == Some('(') {
            let raw = self.scan_balanced_parens()?;
            let inner = raw.trim_start_matches('(').trim_end_matches(')');
            value_parser::parse_args_str(inner, start)?
        } else {
            CallArgs::new()
        };
        self.take_ws();
        let content = if self.peek_char() == Some('u') && self.source_from_here().starts_with("using") {
            for _ in 0.."using".len() {
                self.advance();
            }
            self.take_ws();
            let params = if self.peek_char() == Some('(') {
                self.parse_paren_text(start)?
            } else {
                Vec::new()
            };
            self.take_ws();
            let body = self.expect_body()?;
            Some(ContentBlock { params, body })
        } else if self.peek_char() == Some('{') {
            let body = self.expect_body()?;
            Some(ContentBlock {
                params: Vec::new(),
                body,
            })
        } else {
            self.expect_statement_end()?;
            None
        };
        Ok(Spanned {
            node: Stmt::Include {
                namespace,
                name,
                args,
                content,
            },
            span: start,
        })
    }

    fn source_from_here(&self) -> String {
        let state = self.lexer.state();
        let mut lex = self.lexer.clone();
        lex.backtrack(state);
        lex.take(16).map(|t| t.kind).collect()
    }

    fn expect_statement_end(&mut self) -> SassResult<()> {
        self.take_ws();
        match self.peek_char() {
            Some(';') => {
                self.advance();
                Ok(())
            }
            Some('}') | None => Ok(()),
            _ => Err(SassError::parse("expected \";\".", self.current_span())),
        }
    }

    fn parse_content_include(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let args = if self.peek_char() == Some('(') {
            let raw = self.scan_balanced_parens()?;
            let inner = raw.trim_start_matches('(').trim_end_matches(')');
            value_parser::parse_args_str(inner, start)?
        } else {
            CallArgs::new()
        };
        self.expect_statement_end()?;
        Ok(Spanned {
            node: Stmt::ContentInclude { args },
            span: start,
        })
    }

    fn parse_extend(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        let (header, _) = self.scan_header()?;
        let header = header.trim();
        let optional = header.ends_with("!optional");
        let sel_text = header.trim_end_matches("!optional").trim();
        let selector = parse_interpolated(sel_text, start)?;
        Ok(Spanned {
            node: Stmt::Extend { selector, optional },
            span: start,
        })
    }

    fn parse_error_warn_debug(
        &mut self,
        start: Span,
        ctor: fn(Spanned<Expr>) -> Stmt,
    ) -> SassResult<Spanned<Stmt>> {
        let (header, _) = self.scan_header()?;
        let expr = value_parser::parse_expr_str(header.trim(), start)?;
        Ok(Spanned {
            node: ctor(expr),
            span: start,
        })
    }

    fn parse_if(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let cond_text = self.scan_condition_text()?;
        let cond = value_parser::parse_expr_str(cond_text.trim(), start)?;
        let body = self.expect_body()?;
        let mut branches = vec![IfBranch { cond, body }];
        let mut else_branch = Vec::new();
        loop {
            let save = self.lexer.state();
            self.skip_ws_and_comments()?;
            if self.peek_char() == Some('@') && self.source_from_here().starts_with("@else") {
                self.advance();
                self.take_ident();
                self.take_ws();
                if self.source_from_here().starts_with("if") {
                    for _ in 0.."if".len() {
                        self.advance();
                    }
                    self.take_ws();
                    let cond_text = self.scan_condition_text()?;
                    let cond = value_parser::parse_expr_str(cond_text.trim(), start)?;
                    let body = self.expect_body()?;
                    branches.push(IfBranch { cond, body });
                } else {
                    else_branch = self.expect_body()?;
                    break;
                }
            } else {
                self.lexer.backtrack(save);
                break;
            }
        }
        Ok(Spanned {
            node: Stmt::If {
                branches,
                else_branch,
            },
            span: start,
        })
    }

    fn scan_condition_text(&mut self) -> SassResult<String> {
        let mut out = String::new();
        let mut depth = 0;
        let mut interp_depth = 0;
        loop {
            match self.peek_char() {
                None => return Err(SassError::parse("expected \"{\".", self.current_span())),
                Some('(') => {
                    depth += 1;
                    out.push(self.advance().unwrap());
                }
                Some(')') => {
                    depth -= 1;
                    out.push(self.advance().unwrap());
                }
                Some('#') if self.peek_at(1) == Some('{') => {
                    interp_depth += 1;
                    out.push(self.advance().unwrap());
                    out.push(self.advance().unwrap());
                }
                Some('{') if interp_depth > 0 => {
                    interp_depth += 1;
                    out.push(self.advance().unwrap());
                }
                Some('}') if interp_depth > 0 => {
                    interp_depth -= 1;
                    out.push(self.advance().unwrap());
                }
                Some('{') if depth == 0 => break,
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        Ok(out)
    }

    fn parse_each(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let header = self.scan_condition_text()?;
        let (vars_part, list_part) = header
            .split_once(" in ")
            .ok_or_else(|| SassError::parse("expected \"in\".", start))?;
        let vars = vars_part
            .split(',')
            .map(|v| v.trim().trim_start_matches('$').to_owned())
            .collect();
        let list = value_parser::parse_expr_str(list_part.trim(), start)?;
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::Each { vars, list, body },
            span: start,
        })
    }

    fn parse_for(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let header = self.scan_condition_text()?;
        let (var_part, rest) = header
            .split_once(" from ")
            .ok_or_else(|| SassError::parse("expected \"from\".", start))?;
        let var = var_part.trim().trim_start_matches('$').to_owned();
        let (inclusive, from_part, to_part) = if let Some((f, t)) = rest.split_once(" to ") {
            (false, f, t)
        } else if let Some((f, t)) = rest.split_once(" through ") {
            (true, f, t)
        } else {
            return Err(SassError::parse("expected \"to\" or \"through\".", start));
        };
        let from = value_parser::parse_expr_str(from_part.trim(), start)?;
        let to = value_parser::parse_expr_str(to_part.trim(), start)?;
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::For {
                var,
                from,
                to,
                inclusive,
                body,
            },
            span: start,
        })
    }

    fn parse_while(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let cond_text = self.scan_condition_text()?;
        let cond = value_parser::parse_expr_str(cond_text.trim(), start)?;
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::While { cond, body },
            span: start,
        })
    }

    fn parse_at_root(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let query = if self.peek_char() == Some('(') {
            Some(self.scan_balanced_parens()?)
        } else {
            None
        };
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::AtRoot { query, body },
            span: start,
        })
    }

    fn parse_media(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let query_text = self.scan_condition_text()?;
        let query = parse_interpolated(query_text.trim(), start)?;
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::Media { query, body },
            span: start,
        })
    }

    fn parse_supports(&mut self, start: Span) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let query_text = self.scan_condition_text()?;
        let condition = parse_interpolated(query_text.trim(), start)?;
        let body = self.expect_body()?;
        Ok(Spanned {
            node: Stmt::Supports { condition, body },
            span: start,
        })
    }

    fn parse_keyframes(&mut self, start: Span, name: String) -> SassResult<Spanned<Stmt>> {
        self.take_ws();
        let _vendor_name = self.scan_condition_text()?;
        let body = self.expect_body()?;
        let body = body
            .into_iter()
            .map(|stmt| match stmt.node {
                Stmt::StyleRule { selector, body } => Spanned {
                    node: Stmt::KeyframesBlock {
                        selector: expr_to_plain_text(&selector.node),
                        body,
                    },
                    span: stmt.span,
                },
                other => Spanned {
                    node: other,
                    span: stmt.span,
                },
            })
            .collect();
        Ok(Spanned {
            node: Stmt::Keyframes { name, body },
            span: start,
        })
    }

    fn parse_unknown_at_rule(&mut self, start: Span, name: String) -> SassResult<Spanned<Stmt>> {
        let (header, terminator) = self.scan_header()?;
        let params = parse_interpolated(header.trim(), start)?;
        let body = match terminator {
            Some('{') => self.parse_block_body(Some('}'))?,
            _ => Vec::new(),
        };
        Ok(Spanned {
            node: Stmt::UnknownAtRule { name, params, body },
            span: start,
        })
    }
}

fn stmt_body_has_content(body: &[Spanned<Stmt>]) -> bool {
    body.iter().any(|s| match &s.node {
        Stmt::ContentInclude { .. } => true,
        Stmt::If { branches, else_branch } => {
            branches.iter().any(|b| stmt_body_has_content(&b.body)) || stmt_body_has_content(else_branch)
        }
        Stmt::Each { body, .. }
        | Stmt::For { body, .. }
        | Stmt::While { body, .. }
        | Stmt::AtRoot { body, .. } => stmt_body_has_content(body),
        _ => false,
    })
}

fn parse_interpolated(text: &str, span: Span) -> SassResult<Spanned<Expr>> {
    let parts = split_interpolation(text, span)?;
    Ok(Spanned {
        node: Expr::Str {
            parts,
            quote: QuoteKind::None,
        },
        span,
    })
}

fn expr_to_plain_text(expr: &Expr) -> String {
    match expr {
        Expr::Str { parts, .. } => parts
            .iter()
            .map(|p| match p {
                StringPart::Literal(s) => s.clone(),
                StringPart::Interpolation(_) => String::new(),
            })
            .collect(),
        _ => String::new(),
    }
}

/// True if a `{`-terminated header looks like `ident: { ... }` (nested
/// property shorthand) rather than a selector. Anything with combinators,
/// multiple compounds, or a pseudo-class colon (`a:hover`) is a selector;
/// a bare identifier immediately followed by `:` and nothing else is
/// treated as a nested-property header.
fn is_nested_property_header(header: &str) -> bool {
    let Some(colon) = top_level_colon(header) else {
        return false;
    };
    let before = header[..colon].trim();
    let after = header[colon + 1..].trim();
    !before.is_empty()
        && before
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '#' || c == '{' || c == '}')
        && after.is_empty()
}

/// Finds the first `:` at bracket depth 0 and outside `#{}`, the boundary
/// real Sass declarations split property from value on.
fn top_level_colon(header: &str) -> Option<usize> {
    let mut depth = 0;
    let mut interp_depth = 0;
    let bytes = header.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'#' if bytes.get(i + 1) == Some(&b'{') => {
                interp_depth += 1;
                i += 1;
            }
            b'{' if interp_depth > 0 => interp_depth += 1,
            b'}' if interp_depth > 0 => interp_depth -= 1,
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b':' if depth == 0 && interp_depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                out.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

fn split_first_segment(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| c.is_whitespace())
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    if (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2)
        || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2)
    {
        trimmed[1..trimmed.len() - 1].to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn looks_like_static_import(entry: &str) -> bool {
    !entry.starts_with('"') && !entry.starts_with('\'')
}

#[cfg(test)]
mod test {
    use super::*;
    use codemap::CodeMap;

    fn parse(src: &str, syntax: SassSyntax) -> Spanned<Stmt> {
        let mut map = CodeMap::new();
        let file = map.add_file("t.scss".into(), src.into());
        Parser::new(file, syntax).parse_root().unwrap()
    }

    fn root_body(stmt: &Spanned<Stmt>) -> &[Spanned<Stmt>] {
        match &stmt.node {
            Stmt::Root { body, .. } => body,
            _ => panic!("expected root"),
        }
    }

    #[test]
    fn parses_simple_style_rule() {
        let root = parse(".a { color: red; }", SassSyntax::Scss);
        let body = root_body(&root);
        assert_eq!(body.len(), 1);
        match &body[0].node {
            Stmt::StyleRule { body, .. } => {
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0].node, Stmt::Declaration { .. }));
            }
            other => panic!("expected style rule, got {:?}", other),
        }
    }

    #[test]
    fn parses_variable_declaration_with_default() {
        let root = parse("$x: 1px !default;", SassSyntax::Scss);
        let body = root_body(&root);
        match &body[0].node {
            Stmt::VariableDecl { name, default, .. } => {
                assert_eq!(name, "x");
                assert!(default);
            }
            other => panic!("expected variable decl, got {:?}", other),
        }
    }

    #[test]
    fn parses_nested_selector() {
        let root = parse(".a { .b { color: red; } }", SassSyntax::Scss);
        let body = root_body(&root);
        match &body[0].node {
            Stmt::StyleRule { body, .. } => {
                assert!(matches!(body[0].node, Stmt::StyleRule { .. }));
            }
            other => panic!("expected style rule, got {:?}", other),
        }
    }

    #[test]
    fn parses_if_else_chain() {
        let root = parse(
            "@if $a { color: red; } @else if $b { color: blue; } @else { color: green; }",
            SassSyntax::Scss,
        );
        let body = root_body(&root);
        match &body[0].node {
            Stmt::If {
                branches,
                else_branch,
            } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(else_branch.len(), 1);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn parses_mixin_with_params_and_include() {
        let root = parse(
            "@mixin foo($a, $b: 1px) { width: $a; } .c { @include foo(2px, $b: 3px); }",
            SassSyntax::Scss,
        );
        let body = root_body(&root);
        match &body[0].node {
            Stmt::MixinDecl { name, params, .. } => {
                assert_eq!(name, "foo");
                assert_eq!(params.len(), 2);
            }
            other => panic!("expected mixin decl, got {:?}", other),
        }
    }

    #[test]
    fn rejects_mixin_in_plain_css() {
        let mut map = CodeMap::new();
        let file = map.add_file("t.css".into(), "@mixin foo { }".into());
        let result = Parser::new(file, SassSyntax::Css).parse_root();
        assert!(result.is_err());
    }
}
