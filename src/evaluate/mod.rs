//! The evaluator (`spec.md` §4.6/C7): walks a preloaded module's AST,
//! threading a lexically-scoped [`Scope`] and an [`ExtensionRegistry`]
//! through statement and expression dispatch, and produces the CSS tree
//! that `crate::prune`/`crate::serializer` turn into output text.
//!
//! `@use`/`@forward` execute a module's top-level statements once per
//! compilation (memoized in `executed`, keyed by canonical path) and emit
//! that module's own CSS output at its first `@use`/`@forward` site rather
//! than hoisting it to the top of the stylesheet the way dart-sass does —
//! recorded as a simplification in `DESIGN.md`.

pub mod args;
pub mod stack;

use std::collections::HashMap;
use std::mem;
use std::path::PathBuf;
use std::rc::Rc;

use codemap::Span;

use crate::ast::css::CssNode;
use crate::ast::expr::{BinOp, Expr, Param, Spanned, StringPart, UnaryOp};
use crate::ast::stmt::{ContentBlock, ImportArgument, Stmt};
use crate::atrule::{UserFunction, UserMixin};
use crate::common::QuoteKind;
use crate::error::{SassError, SassResult};
use crate::importer::Importer;
use crate::options::Options;
use crate::parse::preloader::{ModuleGraph, stmt_body};
use crate::scope::{Frame, Scope};
use crate::selector::extend::{Extension, ExtensionRegistry};
use crate::selector::parser::parse_selector_list;
use crate::source::SourceMap;
use crate::value::calculation::{Calculation, CalculationArg, CalculationName};
use crate::value::color::{named_color, Color};
use crate::value::{FunctionRef, Value};

use self::args::{bind_params, expand_rest, Binding, ResolvedArgs};
use self::stack::{FrameKind, StackFrame};

/// Whether a statement sequence ran to the end or hit `@return`. Only
/// meaningful inside a function body; control-flow blocks elsewhere
/// (style rules, mixins, `@each`/`@for`/`@while`) just propagate it
/// upward unused, since `@return` outside a function is a user error the
/// parser doesn't currently reject.
enum Signal {
    Continue,
    Return(Value),
}

pub struct Evaluator<'a> {
    scope: Scope,
    sources: &'a mut SourceMap,
    extensions: ExtensionRegistry,
    call_stack: Vec<StackFrame>,
    options: &'a Options,
    graph: &'a ModuleGraph,
    importers: &'a [Box<dyn Importer>],
    /// Public bindings of each module already executed this compilation,
    /// keyed by canonical path, so a module reached by more than one
    /// `@use` only runs its side effects (and emits its CSS) once.
    executed: HashMap<PathBuf, Frame>,
    /// The file currently executing, for resolving relative `@use`/
    /// `@forward`/`@import` URLs the same way the preloader did.
    current_path: PathBuf,
    current_selector: Option<crate::selector::SelectorList>,
    media_context: Option<String>,
    /// Nested-property prefixes in effect (`font: { weight: bold }`).
    property_prefix: Vec<String>,
    /// One slot per enclosing `@include`; `None` when that `@include` was
    /// given no content block, so `@content` inside it is a silent no-op.
    content_stack: Vec<Option<(Rc<ContentBlock>, Scope)>>,
}

/// Runs the whole compilation starting at `graph`'s entry point, returning
/// the unpruned/unserialized CSS tree, the extension registry `crate::prune`
/// and `crate::selector::extend` consult, and any `@warn`/`@debug` messages
/// collected along the way.
pub fn evaluate(
    graph: &ModuleGraph,
    importers: &[Box<dyn Importer>],
    options: &Options,
    sources: &mut SourceMap,
) -> SassResult<(CssNode, ExtensionRegistry)> {
    let entry = graph
        .entry
        .clone()
        .expect("a preloaded module graph always has an entry point");
    let body = {
        let module = graph
            .modules
            .get(&entry)
            .expect("preload always inserts the entry module before returning");
        stmt_body(&module.stmt)
    };

    let mut evaluator = Evaluator {
        scope: Scope::new(),
        sources,
        extensions: ExtensionRegistry::new(),
        call_stack: Vec::new(),
        options,
        graph,
        importers,
        executed: HashMap::new(),
        current_path: entry,
        current_selector: None,
        media_context: None,
        property_prefix: Vec::new(),
        content_stack: Vec::new(),
    };

    let mut out = Vec::new();
    evaluator.eval_stmts(&body, &mut out)?;
    Ok((CssNode::Root(out), evaluator.extensions))
}

impl<'a> Evaluator<'a> {
    /// Renders the current call stack innermost-first, the same shape
    /// `SassError::format_with_trace` uses, for `@warn`'s optional trace.
    fn trace_string(&self) -> String {
        self.call_stack
            .iter()
            .rev()
            .map(|frame| format!("    {}\n    {}", frame, self.sources.location_string(frame.call_site)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn eval_stmts(&mut self, stmts: &[Spanned<Stmt>], out: &mut Vec<CssNode>) -> SassResult<Signal> {
        for stmt in stmts {
            match self.eval_stmt(stmt, out)? {
                Signal::Continue => {}
                Signal::Return(v) => return Ok(Signal::Return(v)),
            }
        }
        Ok(Signal::Continue)
    }

    fn eval_stmt(&mut self, stmt: &Spanned<Stmt>, out: &mut Vec<CssNode>) -> SassResult<Signal> {
        match &stmt.node {
            Stmt::StyleRule { selector, body } => {
                let text = self.stringify(selector)?;
                let parsed = parse_selector_list(&text)?;
                let resolved = match &self.current_selector {
                    Some(parent) => parsed.resolve_parent(parent),
                    None => parsed,
                };
                let old_selector = self.current_selector.replace(resolved.clone());
                self.scope.push_frame();
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                self.scope.pop_frame();
                self.current_selector = old_selector;
                out.push(CssNode::StyleRule {
                    selector: resolved,
                    children,
                    span: stmt.span,
                });
                Ok(signal)
            }

            Stmt::Declaration { property, value, body } => {
                let prop_text = self.stringify(property)?;
                let full_name = match self.property_prefix.last() {
                    Some(prefix) => format!("{}-{}", prefix, prop_text),
                    None => prop_text,
                };
                if let Some(value_expr) = value {
                    let v = self.eval_expr(value_expr)?;
                    if !matches!(v, Value::Null) {
                        let css = v
                            .to_css(self.options.precision)
                            .map_err(|m| SassError::sass_script(m, stmt.span))?;
                        if !css.is_empty() {
                            out.push(CssNode::Declaration {
                                property: full_name.clone(),
                                value: css,
                                span: stmt.span,
                            });
                        }
                    }
                }
                if !body.is_empty() {
                    self.property_prefix.push(full_name);
                    let signal = self.eval_stmts(body, out)?;
                    self.property_prefix.pop();
                    return Ok(signal);
                }
                Ok(Signal::Continue)
            }

            Stmt::VariableDecl { namespace, name, value, default, global } => {
                if namespace.is_some() {
                    return Err(SassError::sass_script(
                        "Cannot modify a module variable from outside its module.",
                        stmt.span,
                    ));
                }
                let v = self.eval_expr(value)?;
                if *default {
                    self.scope.insert_default(name.clone(), v);
                } else {
                    self.scope.insert_var(name.clone(), v, *global);
                }
                Ok(Signal::Continue)
            }

            Stmt::If { branches, else_branch } => {
                for branch in branches {
                    if self.eval_expr(&branch.cond)?.is_truthy() {
                        self.scope.push_frame();
                        let signal = self.eval_stmts(&branch.body, out)?;
                        self.scope.pop_frame();
                        return Ok(signal);
                    }
                }
                self.scope.push_frame();
                let signal = self.eval_stmts(else_branch, out)?;
                self.scope.pop_frame();
                Ok(signal)
            }

            Stmt::Each { vars, list, body } => {
                let items = self.eval_expr(list)?.as_list();
                for item in items {
                    self.scope.push_frame();
                    if vars.len() == 1 {
                        self.scope.insert_var(vars[0].clone(), item, false);
                    } else {
                        let parts = item.as_list();
                        for (i, v) in vars.iter().enumerate() {
                            self.scope
                                .insert_var(v.clone(), parts.get(i).cloned().unwrap_or(Value::Null), false);
                        }
                    }
                    let signal = self.eval_stmts(body, out)?;
                    self.scope.pop_frame();
                    if let Signal::Return(v) = signal {
                        return Ok(Signal::Return(v));
                    }
                }
                Ok(Signal::Continue)
            }

            Stmt::For { var, from, to, inclusive, body } => {
                let from_v = self.eval_expr(from)?;
                let to_v = self.eval_expr(to)?;
                let (from_n, to_n) = match (from_v, to_v) {
                    (Value::Number(a), Value::Number(b)) => (a.value.round() as i64, b.value.round() as i64),
                    _ => return Err(SassError::sass_script("@for bounds must be numbers.", stmt.span)),
                };
                let step: i64 = if from_n <= to_n { 1 } else { -1 };
                let mut i = from_n;
                loop {
                    let done = if step > 0 {
                        if *inclusive { i > to_n } else { i >= to_n }
                    } else if *inclusive {
                        i < to_n
                    } else {
                        i <= to_n
                    };
                    if done {
                        break;
                    }
                    self.scope.push_frame();
                    self.scope.insert_var(var.clone(), Value::number(i as f64), false);
                    let signal = self.eval_stmts(body, out)?;
                    self.scope.pop_frame();
                    if let Signal::Return(v) = signal {
                        return Ok(Signal::Return(v));
                    }
                    i += step;
                }
                Ok(Signal::Continue)
            }

            Stmt::While { cond, body } => {
                while self.eval_expr(cond)?.is_truthy() {
                    self.scope.push_frame();
                    let signal = self.eval_stmts(body, out)?;
                    self.scope.pop_frame();
                    if let Signal::Return(v) = signal {
                        return Ok(Signal::Return(v));
                    }
                }
                Ok(Signal::Continue)
            }

            Stmt::AtRoot { query: _, body } => {
                // Partial implementation: drops the current selector so the
                // body's rules start fresh, but doesn't hoist past an
                // enclosing `@media`/`@supports` the way a full `@at-root
                // (without: ...)` would. Recorded in `DESIGN.md`.
                let old_selector = self.current_selector.take();
                let signal = self.eval_stmts(body, out)?;
                self.current_selector = old_selector;
                Ok(signal)
            }

            Stmt::Media { query, body } => {
                let text = self.stringify(query)?;
                let old_media = self.media_context.replace(text.clone());
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                self.media_context = old_media;
                out.push(CssNode::Media { query: text, children, span: stmt.span });
                Ok(signal)
            }

            Stmt::Supports { condition, body } => {
                let text = self.stringify(condition)?;
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                out.push(CssNode::Supports { condition: text, children, span: stmt.span });
                Ok(signal)
            }

            Stmt::Keyframes { name, body } => {
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                out.push(CssNode::Keyframes { name: name.clone(), children, span: stmt.span });
                Ok(signal)
            }

            Stmt::KeyframesBlock { selector, body } => {
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                out.push(CssNode::KeyframesBlock {
                    selector: selector.clone(),
                    children,
                    span: stmt.span,
                });
                Ok(signal)
            }

            Stmt::UnknownAtRule { name, params, body } => {
                let text = self.stringify(params)?;
                let mut children = Vec::new();
                let signal = self.eval_stmts(body, &mut children)?;
                out.push(CssNode::UnknownAtRule {
                    name: name.clone(),
                    params: text,
                    children,
                    span: stmt.span,
                });
                Ok(signal)
            }

            Stmt::MixinDecl { name, params, accepts_content: _, body } => {
                let mixin = UserMixin {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    closure: self.scope.clone(),
                    decl_span: stmt.span,
                };
                self.scope.insert_mixin(name.clone(), mixin);
                Ok(Signal::Continue)
            }

            Stmt::FunctionDecl { name, params, body } => {
                let func = UserFunction {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    closure: self.scope.clone(),
                    decl_span: stmt.span,
                };
                self.scope.insert_fn(name.clone(), func);
                Ok(Signal::Continue)
            }

            Stmt::Include { namespace, name, args, content } => {
                let mixin = match namespace {
                    Some(ns) => self.scope.get_namespaced_mixin(ns, name).ok_or_else(|| {
                        SassError::sass_script(
                            format!("Undefined mixin \"{}\" for namespace \"{}\".", name, ns),
                            stmt.span,
                        )
                    })?,
                    None => self
                        .scope
                        .get_mixin(name)
                        .ok_or_else(|| SassError::sass_script(format!("Undefined mixin \"{}\".", name), stmt.span))?,
                };
                let resolved = self.resolve_call_args(args, stmt.span)?;
                let (bound, mut arglist) = bind_params(&mixin.params, resolved, stmt.span)?;
                let caller_scope = self.scope.clone();
                self.call_stack
                    .push(StackFrame::new(FrameKind::Mixin, name.clone(), stmt.span));
                let old_scope = mem::replace(&mut self.scope, mixin.closure.new_child());
                for (pname, binding) in bound {
                    let is_variadic_slot = mixin.params.last().map_or(false, |p| p.is_variadic && p.name == pname);
                    let value = if is_variadic_slot {
                        Value::ArgList(arglist.take().expect("variadic slot always carries a built arglist"))
                    } else {
                        match binding {
                            Binding::Explicit(v) => v,
                            Binding::NeedsDefault => {
                                let param = find_param(&mixin.params, &pname);
                                let default = param
                                    .default
                                    .as_ref()
                                    .expect("a parameter left without a value must declare a default");
                                self.eval_expr(default)?
                            }
                        }
                    };
                    self.scope.insert_var(pname, value, false);
                }
                self.content_stack
                    .push(content.as_ref().map(|cb| (Rc::new(cb.clone()), caller_scope)));
                let signal = self.eval_stmts(&mixin.body, out)?;
                self.content_stack.pop();
                self.scope = old_scope;
                self.call_stack.pop();
                Ok(signal)
            }

            Stmt::ContentInclude { args } => {
                let slot = self.content_stack.last().cloned().flatten();
                match slot {
                    None => Ok(Signal::Continue),
                    Some((block, captured_scope)) => {
                        let resolved = self.resolve_call_args(args, stmt.span)?;
                        let (bound, mut arglist) = bind_params(&block.params, resolved, stmt.span)?;
                        self.call_stack
                            .push(StackFrame::new(FrameKind::Content, "@content", stmt.span));
                        let old_scope = mem::replace(&mut self.scope, captured_scope.new_child());
                        for (pname, binding) in bound {
                            let is_variadic_slot =
                                block.params.last().map_or(false, |p| p.is_variadic && p.name == pname);
                            let value = if is_variadic_slot {
                                Value::ArgList(arglist.take().expect("variadic slot always carries a built arglist"))
                            } else {
                                match binding {
                                    Binding::Explicit(v) => v,
                                    Binding::NeedsDefault => match find_param(&block.params, &pname).default.as_ref() {
                                        Some(default) => self.eval_expr(default)?,
                                        None => Value::Null,
                                    },
                                }
                            };
                            self.scope.insert_var(pname, value, false);
                        }
                        let signal = self.eval_stmts(&block.body, out)?;
                        self.scope = old_scope;
                        self.call_stack.pop();
                        Ok(signal)
                    }
                }
            }

            Stmt::Return(expr) => Ok(Signal::Return(self.eval_expr(expr)?)),

            Stmt::Use { url, alias, configuration } => {
                let (_, public, module_css) = self.load_module(url, stmt.span, configuration)?;
                out.extend(module_css);
                match alias.as_deref() {
                    Some("*") => self.scope.splice_root(&public),
                    Some(a) => self.scope.insert_namespace(a.to_owned(), public),
                    None => self.scope.insert_namespace(module_basename(url), public),
                }
                Ok(Signal::Continue)
            }

            Stmt::Forward { url, prefix, show, hide } => {
                let (_, public, module_css) = self.load_module(url, stmt.span, &[])?;
                out.extend(module_css);
                let filtered = filter_and_prefix(public, prefix.as_deref(), show.as_deref(), hide.as_deref());
                self.scope.splice_root(&filtered);
                Ok(Signal::Continue)
            }

            Stmt::Import(args) => {
                for arg in args {
                    match arg {
                        ImportArgument::Static(expr) => {
                            let url = self.stringify(expr)?;
                            out.push(CssNode::Import { url, span: stmt.span });
                        }
                        ImportArgument::Dynamic(url) => {
                            let canonical = self.resolve_url(url, stmt.span)?;
                            let body = {
                                let module = self.graph.modules.get(&canonical).ok_or_else(|| {
                                    SassError::import(format!("Module \"{}\" was not preloaded.", url), stmt.span)
                                })?;
                                stmt_body(&module.stmt)
                            };
                            self.call_stack
                                .push(StackFrame::new(FrameKind::Import, url.clone(), stmt.span));
                            let old_path = mem::replace(&mut self.current_path, canonical);
                            let signal = self.eval_stmts(&body, out)?;
                            self.current_path = old_path;
                            self.call_stack.pop();
                            if let Signal::Return(v) = signal {
                                return Ok(Signal::Return(v));
                            }
                        }
                    }
                }
                Ok(Signal::Continue)
            }

            Stmt::Extend { selector, optional } => {
                let current = self
                    .current_selector
                    .clone()
                    .ok_or_else(|| SassError::extend("@extend may only be used within style rules.", stmt.span))?;
                let text = self.stringify(selector)?;
                let target_list = parse_selector_list(&text)?;
                for complex in &target_list.complexes {
                    for (compound, _) in &complex.components {
                        for simple in &compound.simples {
                            for extender_complex in &current.complexes {
                                self.extensions.add(
                                    simple.clone(),
                                    Extension {
                                        extender: extender_complex.clone(),
                                        media_context: self.media_context.clone(),
                                        optional: *optional,
                                        span: stmt.span,
                                    },
                                );
                            }
                        }
                    }
                }
                Ok(Signal::Continue)
            }

            Stmt::Error(expr) => {
                let v = self.eval_expr(expr)?;
                Err(SassError::user(debug_repr(&v), stmt.span))
            }

            Stmt::Warn(expr) => {
                let v = self.eval_expr(expr)?;
                if !self.options.quiet {
                    let location = self.sources.location_string(stmt.span);
                    self.options.logger.warn(&debug_repr(&v), &location, &self.trace_string());
                }
                Ok(Signal::Continue)
            }

            Stmt::Debug(expr) => {
                let v = self.eval_expr(expr)?;
                if !self.options.quiet {
                    let location = self.sources.location_string(stmt.span);
                    self.options.logger.debug(&debug_repr(&v), &location);
                }
                Ok(Signal::Continue)
            }

            Stmt::LoudComment(text) => {
                out.push(CssNode::Comment { text: text.clone(), span: stmt.span });
                Ok(Signal::Continue)
            }

            Stmt::SilentComment(_) => Ok(Signal::Continue),

            Stmt::Root { body, .. } => self.eval_stmts(body, out),
        }
    }

    fn load_module(
        &mut self,
        url: &str,
        span: Span,
        configuration: &[(String, Spanned<Expr>)],
    ) -> SassResult<(PathBuf, Frame, Vec<CssNode>)> {
        let canonical = self.resolve_url(url, span)?;
        if let Some(frame) = self.executed.get(&canonical) {
            return Ok((canonical, frame.clone(), Vec::new()));
        }

        let body = {
            let module = self
                .graph
                .modules
                .get(&canonical)
                .ok_or_else(|| SassError::import(format!("Module \"{}\" was not preloaded.", url), span))?;
            stmt_body(&module.stmt)
        };

        let mut config_values = Vec::with_capacity(configuration.len());
        for (name, expr) in configuration {
            config_values.push((name.clone(), self.eval_expr(expr)?));
        }
        let mut fresh_scope = Scope::new();
        for (name, value) in config_values {
            fresh_scope.insert_var(name, value, false);
        }

        let old_scope = mem::replace(&mut self.scope, fresh_scope);
        let old_path = mem::replace(&mut self.current_path, canonical.clone());
        let mut module_css = Vec::new();
        let result = self.eval_stmts(&body, &mut module_css);
        let public = self.scope.public_bindings();
        self.scope = old_scope;
        self.current_path = old_path;
        result?;

        self.executed.insert(canonical.clone(), public.clone());
        Ok((canonical, public, module_css))
    }

    fn resolve_url(&self, url: &str, span: Span) -> SassResult<PathBuf> {
        for importer in self.importers {
            if let Some(result) = importer.resolve(url, Some(&self.current_path), span)? {
                return Ok(result.canonical_path);
            }
        }
        Err(SassError::import(format!("Can't find stylesheet to import: \"{}\"", url), span))
    }

    fn resolve_call_args(&mut self, args: &crate::ast::expr::CallArgs, span: Span) -> SassResult<ResolvedArgs> {
        let mut positional = Vec::with_capacity(args.positional.len());
        for e in &args.positional {
            positional.push(self.eval_expr(e)?);
        }
        let mut named = indexmap::IndexMap::new();
        for (k, e) in &args.named {
            named.insert(k.clone(), self.eval_expr(e)?);
        }
        if let Some(rest_expr) = &args.rest {
            let rest_val = self.eval_expr(rest_expr)?;
            let (more_pos, more_named) = expand_rest(rest_val, span)?;
            positional.extend(more_pos);
            for (k, v) in more_named {
                named.insert(k, v);
            }
        }
        Ok(ResolvedArgs { positional, named })
    }

    fn invoke_user_function(&mut self, func: &Rc<UserFunction>, resolved: ResolvedArgs, span: Span) -> SassResult<Value> {
        let (bound, mut arglist) = bind_params(&func.params, resolved, span)?;
        self.call_stack
            .push(StackFrame::new(FrameKind::Function, func.name.clone(), span));
        let old_scope = mem::replace(&mut self.scope, func.closure.new_child());
        for (pname, binding) in bound {
            let is_variadic_slot = func.params.last().map_or(false, |p| p.is_variadic && p.name == pname);
            let value = if is_variadic_slot {
                Value::ArgList(arglist.take().expect("variadic slot always carries a built arglist"))
            } else {
                match binding {
                    Binding::Explicit(v) => v,
                    Binding::NeedsDefault => {
                        let param = find_param(&func.params, &pname);
                        let default = param
                            .default
                            .as_ref()
                            .expect("a parameter left without a value must declare a default");
                        self.eval_expr(default)?
                    }
                }
            };
            self.scope.insert_var(pname, value, false);
        }
        let mut body_out = Vec::new();
        let signal = self.eval_stmts(&func.body, &mut body_out)?;
        self.scope = old_scope;
        self.call_stack.pop();
        match signal {
            Signal::Return(v) => Ok(v),
            Signal::Continue => Err(SassError::sass_script(
                format!("Function \"{}\" finished without @return.", func.name),
                span,
            )),
        }
    }

    fn invoke_builtin(&mut self, name: &str, resolved: &ResolvedArgs, span: Span) -> Option<SassResult<Value>> {
        let args = crate::builtin::Args {
            positional: resolved.positional.clone(),
            named: resolved.named.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };
        crate::builtin::dispatch(name, args, span, self.options.precision)
    }

    /// Host-registered functions (`spec.md` §6 `register_function`) are
    /// matched by the name in their signature, then bound against a
    /// parameter list parsed from that same signature the way a
    /// `@function` header would be, so defaults and `...` rest params work
    /// the same as for a Sass-defined function.
    fn invoke_custom_function(&mut self, name: &str, resolved: ResolvedArgs, span: Span) -> SassResult<Option<Value>> {
        let signature = self
            .options
            .functions
            .iter()
            .find(|f| signature_name(f.signature()) == name)
            .map(|f| f.signature().to_owned());
        let Some(signature) = signature else {
            return Ok(None);
        };
        let params = crate::parse::value_parser::parse_params_str(signature_params(&signature), span)?;
        let (bound, arglist) = bind_params(&params, resolved, span)?;
        let mut values = Vec::with_capacity(bound.len());
        for (pname, binding) in bound {
            let is_variadic_slot = params.last().map_or(false, |p| p.is_variadic && p.name == pname);
            let value = if is_variadic_slot {
                Value::ArgList(arglist.clone().expect("variadic slot always carries a built arglist"))
            } else {
                match binding {
                    Binding::Explicit(v) => v,
                    Binding::NeedsDefault => {
                        let param = find_param(&params, &pname);
                        let default = param.default.as_ref().expect("a parameter left without a value must declare a default");
                        self.eval_expr(default)?
                    }
                }
            };
            values.push(value);
        }
        let function = self.options.functions.iter().find(|f| signature_name(f.signature()) == name).expect("looked up above");
        Ok(Some(function.call(&values)?))
    }

    fn plain_css_function(&mut self, name: &str, resolved: ResolvedArgs, span: Span) -> SassResult<Value> {
        let mut parts = Vec::new();
        for v in resolved.positional {
            parts.push(v.to_css(self.options.precision).map_err(|m| SassError::sass_script(m, span))?);
        }
        for (k, v) in resolved.named {
            parts.push(format!("${}: {}", k, v.to_css(self.options.precision).map_err(|m| SassError::sass_script(m, span))?));
        }
        Ok(Value::unquoted(format!("{}({})", name, parts.join(", "))))
    }

    fn eval_call(&mut self, namespace: Option<&str>, name: &str, args: &crate::ast::expr::CallArgs, span: Span) -> SassResult<Value> {
        if namespace.is_none() && name == "if" && self.scope.get_fn("if").is_none() {
            return self.eval_if_function(args, span);
        }
        if namespace.is_none() && name == "call" {
            return self.eval_call_meta(args, span);
        }
        if is_scope_aware_meta(namespace, name) {
            return self.eval_meta_scope_call(name, args, span);
        }

        if let Some(ns) = namespace {
            if let Some(f) = self.scope.get_namespaced_fn(ns, name) {
                let resolved = self.resolve_call_args(args, span)?;
                return self.invoke_user_function(&f, resolved, span);
            }
            let resolved = self.resolve_call_args(args, span)?;
            let full = format!("{}.{}", ns, name);
            if let Some(result) = self.invoke_builtin(&full, &resolved, span) {
                return result;
            }
            return Err(SassError::sass_script(
                format!("Undefined function \"{}\" for namespace \"{}\".", name, ns),
                span,
            ));
        }

        if let Some(f) = self.scope.get_fn(name) {
            let resolved = self.resolve_call_args(args, span)?;
            return self.invoke_user_function(&f, resolved, span);
        }

        let resolved = self.resolve_call_args(args, span)?;
        if let Some(result) = self.invoke_builtin(name, &resolved, span) {
            return result;
        }
        if let Some(value) = self.invoke_custom_function(name, resolved.clone(), span)? {
            return Ok(value);
        }
        self.plain_css_function(name, resolved, span)
    }

    /// `meta.function-exists()` and friends need to query `self.scope`/
    /// `self.content_stack` directly, so they're special-cased here the
    /// same way `if`/`call` are, rather than living in `crate::builtin`
    /// (which only ever sees already-evaluated argument values, no scope).
    fn eval_meta_scope_call(&mut self, name: &str, args: &crate::ast::expr::CallArgs, span: Span) -> SassResult<Value> {
        if name == "content-exists" {
            return Ok(Value::Bool(self.content_stack.last().map_or(false, Option::is_some)));
        }
        if name == "get-function" {
            let resolved = self.resolve_call_args(args, span)?;
            let fname = match resolved.positional.first().or_else(|| resolved.named.get("name")) {
                Some(Value::String(s, _)) => s.clone(),
                Some(other) => return Err(SassError::sass_script(format!("$name: {} is not a string.", other.inspect()), span)),
                None => return Err(SassError::sass_script("Missing argument $name.", span)),
            };
            return Ok(match self.scope.get_fn(&fname) {
                Some(f) => Value::Function(FunctionRef::UserDefined(fname, f)),
                None => Value::Function(FunctionRef::Builtin(fname)),
            });
        }
        let resolved = self.resolve_call_args(args, span)?;
        let target = match resolved.positional.first().or_else(|| resolved.named.get("name")) {
            Some(Value::String(s, _)) => s.clone(),
            Some(other) => return Err(SassError::sass_script(format!("{} is not a string.", other.inspect()), span)),
            None => return Err(SassError::sass_script("Missing argument $name.", span)),
        };
        let exists = match name {
            "function-exists" => self.scope.get_fn(&target).is_some(),
            "mixin-exists" => self.scope.get_mixin(&target).is_some(),
            "variable-exists" => self.scope.get_var(&target).is_some(),
            "global-variable-exists" => self.scope.global_var_exists(&target),
            other => return Err(SassError::internal(format!("unhandled scope-aware meta function \"{}\"", other), span)),
        };
        Ok(Value::Bool(exists))
    }

    fn eval_if_function(&mut self, args: &crate::ast::expr::CallArgs, span: Span) -> SassResult<Value> {
        let find_named = |args: &crate::ast::expr::CallArgs, wanted: &str| {
            args.named.iter().find(|(n, _)| n == wanted).map(|(_, e)| e.clone())
        };
        let cond_expr = args
            .positional
            .get(0)
            .cloned()
            .or_else(|| find_named(args, "condition"))
            .ok_or_else(|| SassError::sass_script("Missing argument $condition.", span))?;
        let cond = self.eval_expr(&cond_expr)?;
        if cond.is_truthy() {
            let e = args
                .positional
                .get(1)
                .cloned()
                .or_else(|| find_named(args, "if-true"))
                .ok_or_else(|| SassError::sass_script("Missing argument $if-true.", span))?;
            self.eval_expr(&e)
        } else {
            match args.positional.get(2).cloned().or_else(|| find_named(args, "if-false")) {
                Some(e) => self.eval_expr(&e),
                None => Ok(Value::Null),
            }
        }
    }

    fn eval_call_meta(&mut self, args: &crate::ast::expr::CallArgs, span: Span) -> SassResult<Value> {
        let resolved = self.resolve_call_args(args, span)?;
        let mut positional = resolved.positional;
        if positional.is_empty() {
            return Err(SassError::sass_script("Missing argument $function.", span));
        }
        let func_val = positional.remove(0);
        let rest = ResolvedArgs { positional, named: resolved.named };
        match func_val {
            Value::Function(FunctionRef::UserDefined(_, f)) => self.invoke_user_function(&f, rest, span),
            Value::Function(FunctionRef::Builtin(name)) => self
                .invoke_builtin(&name, &rest, span)
                .unwrap_or_else(|| Err(SassError::sass_script(format!("Undefined function \"{}\".", name), span))),
            Value::String(name, _) => {
                if let Some(f) = self.scope.get_fn(&name) {
                    self.invoke_user_function(&f, rest, span)
                } else {
                    self.invoke_builtin(&name, &rest, span)
                        .unwrap_or_else(|| Err(SassError::sass_script(format!("Undefined function \"{}\".", name), span)))
                }
            }
            other => Err(SassError::sass_script(format!("{} is not a function reference.", other.inspect()), span)),
        }
    }

    fn eval_calculation(&mut self, name: &str, args: &[Spanned<Expr>], span: Span) -> SassResult<Value> {
        let calc_name = match name {
            "calc" => CalculationName::Calc,
            "min" => CalculationName::Min,
            "max" => CalculationName::Max,
            "clamp" => CalculationName::Clamp,
            other => return Err(SassError::internal(format!("unknown calculation \"{}\"", other), span)),
        };
        let mut calc_args = Vec::with_capacity(args.len());
        for a in args {
            calc_args.push(CalculationArg::Value(Box::new(self.eval_expr(a)?)));
        }
        let calc = Calculation { name: calc_name, args: calc_args };
        match calc.try_reduce() {
            Some(v) => Ok(v),
            None => Ok(Value::Calculation(calc)),
        }
    }

    fn eval_expr(&mut self, expr: &Spanned<Expr>) -> SassResult<Value> {
        match &expr.node {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number { value, unit } => Ok(Value::number_with_unit(*value, unit.clone())),
            Expr::Str { parts, quote } => {
                let rendered = self.render_string_parts(parts)?;
                if *quote == QuoteKind::None {
                    if let [StringPart::Literal(word)] = parts.as_slice() {
                        if let Some(color) = named_color(word) {
                            return Ok(Value::Color(color));
                        }
                    }
                    Ok(Value::unquoted(rendered))
                } else {
                    Ok(Value::quoted(rendered))
                }
            }
            Expr::Color(text) => Ok(Value::Color(parse_hex_to_color(text, expr.span)?)),
            Expr::List { items, separator, brackets } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::List(values, *separator, *brackets))
            }
            Expr::Map(entries) => {
                let mut map = crate::value::map::SassMap::new();
                for (k, v) in entries {
                    let key = self.eval_expr(k)?;
                    let value = self.eval_expr(v)?;
                    if map.insert(key.clone(), value) {
                        return Err(SassError::sass_script(format!("Duplicate key {} in map.", key.inspect()), expr.span));
                    }
                }
                Ok(Value::Map(map))
            }
            Expr::Variable(name) => self
                .scope
                .get_var(name)
                .cloned()
                .ok_or_else(|| SassError::sass_script(format!("Undefined variable: \"${}\".", name), expr.span)),
            Expr::Namespaced { namespace, name } => self
                .scope
                .get_namespaced_var(namespace, name)
                .cloned()
                .ok_or_else(|| SassError::sass_script(format!("Undefined variable: \"${}\".", name), expr.span)),
            Expr::BinOp { left, op, right } => self.eval_binop(left, *op, right, expr.span),
            Expr::UnaryOp { op, operand } => {
                let v = self.eval_expr(operand)?;
                match op {
                    UnaryOp::Neg => crate::value::ops::neg(&v, expr.span),
                    UnaryOp::Not => Ok(crate::value::ops::not(&v)),
                    UnaryOp::Plus => match v {
                        Value::Number(n) => Ok(Value::Number(n)),
                        other => Err(SassError::sass_script(format!("Undefined operation \"+{}\".", other.inspect()), expr.span)),
                    },
                }
            }
            Expr::Paren(inner) => self.eval_expr(inner),
            Expr::FuncCall { namespace, name, args } => self.eval_call(namespace.as_deref(), name, args, expr.span),
            Expr::Calculation { name, args } => self.eval_calculation(name, args, expr.span),
            Expr::FunctionRef(name) => {
                if let Some(f) = self.scope.get_fn(name) {
                    Ok(Value::Function(FunctionRef::UserDefined(name.clone(), f)))
                } else {
                    Ok(Value::Function(FunctionRef::Builtin(name.clone())))
                }
            }
            Expr::Value(v) => Ok((**v).clone()),
        }
    }

    fn eval_binop(&mut self, left: &Spanned<Expr>, op: BinOp, right: &Spanned<Expr>, span: Span) -> SassResult<Value> {
        match op {
            BinOp::And => {
                let l = self.eval_expr(left)?;
                crate::value::ops::and(l, || self.eval_expr(right))
            }
            BinOp::Or => {
                let l = self.eval_expr(left)?;
                crate::value::ops::or(l, || self.eval_expr(right))
            }
            BinOp::Eq => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(crate::value::ops::equals(&l, &r))
            }
            BinOp::Neq => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(crate::value::ops::not_equals(&l, &r))
            }
            BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                let op_str = match op {
                    BinOp::Lt => "<",
                    BinOp::Lte => "<=",
                    BinOp::Gt => ">",
                    BinOp::Gte => ">=",
                    _ => unreachable!(),
                };
                crate::value::ops::relational(&l, &r, op_str, span)
            }
            BinOp::Add => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                crate::value::ops::add(&l, &r, span)
            }
            BinOp::Sub => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                crate::value::ops::sub(&l, &r, span)
            }
            BinOp::Mul => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                crate::value::ops::mul(&l, &r, span)
            }
            BinOp::Div => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                crate::value::ops::div(&l, &r, span)
            }
            BinOp::Rem => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                crate::value::ops::rem(&l, &r, span)
            }
        }
    }

    fn render_string_parts(&mut self, parts: &[StringPart]) -> SassResult<String> {
        let mut out = String::new();
        for part in parts {
            match part {
                StringPart::Literal(s) => out.push_str(s),
                StringPart::Interpolation(expr) => {
                    let v = self.eval_expr(expr)?;
                    out.push_str(&interpolation_repr(&v));
                }
            }
        }
        Ok(out)
    }

    /// Evaluates `expr` and flattens it to the plain text Sass uses for
    /// selectors, `@media`/`@supports` conditions, property names, and
    /// unknown at-rule parameters: quotes are stripped the same way
    /// `#{}` interpolation strips them.
    fn stringify(&mut self, expr: &Spanned<Expr>) -> SassResult<String> {
        let v = self.eval_expr(expr)?;
        Ok(interpolation_repr(&v))
    }
}

fn find_param<'p>(params: &'p [Param], name: &str) -> &'p Param {
    params
        .iter()
        .find(|p| p.name == name)
        .expect("a name produced by bind_params always names a declared parameter")
}

fn interpolation_repr(v: &Value) -> String {
    match v {
        Value::String(s, _) => s.clone(),
        other => other.inspect(),
    }
}

fn debug_repr(v: &Value) -> String {
    interpolation_repr(v)
}

/// `meta.*` functions that need `self.scope`/`self.content_stack` rather
/// than plain argument values, reachable unprefixed (legacy) or under the
/// `meta` namespace.
fn is_scope_aware_meta(namespace: Option<&str>, name: &str) -> bool {
    matches!(namespace, None | Some("meta"))
        && matches!(
            name,
            "function-exists" | "mixin-exists" | "variable-exists" | "global-variable-exists" | "content-exists" | "get-function"
        )
}

/// The function name portion of a `CustomFunction::signature()` like
/// `"foo($a, $b: 1)"`.
fn signature_name(signature: &str) -> &str {
    signature.split('(').next().unwrap_or(signature).trim()
}

/// The parameter-list text inside a `CustomFunction::signature()`'s
/// parentheses, fed to `parse_params_str` the same way a `@function`
/// header's parentheses would be.
fn signature_params(signature: &str) -> &str {
    let start = signature.find('(').map_or(signature.len(), |i| i + 1);
    let end = signature.rfind(')').unwrap_or(signature.len());
    if start <= end {
        &signature[start..end]
    } else {
        ""
    }
}

/// The default namespace a bare `@use "path/to/_name.scss"` introduces:
/// the final path segment, minus a recognized extension and a leading
/// partial-file underscore.
fn module_basename(url: &str) -> String {
    let file_part = url.rsplit('/').next().unwrap_or(url);
    let stem = file_part
        .strip_suffix(".scss")
        .or_else(|| file_part.strip_suffix(".sass"))
        .or_else(|| file_part.strip_suffix(".css"))
        .unwrap_or(file_part);
    stem.strip_prefix('_').unwrap_or(stem).to_owned()
}

fn filter_and_prefix(frame: Frame, prefix: Option<&str>, show: Option<&[String]>, hide: Option<&[String]>) -> Frame {
    let keep = |name: &str| -> bool {
        if let Some(show) = show {
            return show.iter().any(|n| n == name);
        }
        if let Some(hide) = hide {
            return !hide.iter().any(|n| n == name);
        }
        true
    };
    let apply_prefix = |name: &str| -> String {
        match prefix {
            Some(p) => format!("{}{}", p, name),
            None => name.to_owned(),
        }
    };
    Frame {
        variables: frame
            .variables
            .into_iter()
            .filter(|(k, _)| keep(k))
            .map(|(k, v)| (apply_prefix(&k), v))
            .collect(),
        functions: frame
            .functions
            .into_iter()
            .filter(|(k, _)| keep(k))
            .map(|(k, v)| (apply_prefix(&k), v))
            .collect(),
        mixins: frame
            .mixins
            .into_iter()
            .filter(|(k, _)| keep(k))
            .map(|(k, v)| (apply_prefix(&k), v))
            .collect(),
    }
}

/// Expands `#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa` hex literals. The only
/// producer of `Expr::Color` is `value_parser::parse_hex_color`; bare color
/// keywords (`red`) arrive as plain `Expr::Str` instead and are resolved
/// against [`named_color`] in [`Evaluator::eval_expr`].
fn parse_hex_to_color(text: &str, span: Span) -> SassResult<Color> {
    let hex = text.trim_start_matches('#');
    let invalid = || SassError::sass_script(format!("Invalid hex color \"{}\".", text), span);
    let expand = |c: char| -> SassResult<u8> { c.to_digit(16).map(|d| (d * 17) as u8).ok_or_else(invalid) };
    let pair = |s: &str| -> SassResult<u8> { u8::from_str_radix(s, 16).map_err(|_| invalid()) };
    let (r, g, b, a) = match hex.len() {
        3 => {
            let c: Vec<char> = hex.chars().collect();
            (expand(c[0])?, expand(c[1])?, expand(c[2])?, 255u8)
        }
        4 => {
            let c: Vec<char> = hex.chars().collect();
            (expand(c[0])?, expand(c[1])?, expand(c[2])?, expand(c[3])?)
        }
        6 => (pair(&hex[0..2])?, pair(&hex[2..4])?, pair(&hex[4..6])?, 255u8),
        8 => (pair(&hex[0..2])?, pair(&hex[2..4])?, pair(&hex[4..6])?, pair(&hex[6..8])?),
        _ => return Err(invalid()),
    };
    Ok(Color::from_rgba(r as f64, g as f64, b as f64, a as f64 / 255.0))
}
