//! The preloader pass (`spec.md` §4.2): "a shallow walk over the statement
//! tree visits `@use`, `@forward`, and `@import` in source order,
//! recursively parses the referenced stylesheets ..., and builds the
//! module graph." Runs after each file is parsed but before evaluation, so
//! every statically-resolvable symbol reference has a parsed module behind
//! it by the time `crate::evaluate` walks the tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::stmt::{ImportArgument, Stmt};
use crate::common::SassSyntax;
use crate::error::{SassError, SassResult};
use crate::importer::Importer;
use crate::parse::parse_file;
use crate::source::SourceMap;

#[derive(Debug)]
pub struct ParsedModule {
    pub path: PathBuf,
    pub syntax: SassSyntax,
    pub stmt: codemap::Spanned<Stmt>,
}

/// Every module reachable from the entry point, keyed by canonical path,
/// in the order they were first loaded. `spec.md` §4.4: "Any module is
/// parsed and its top-level statements executed exactly once per
/// compilation, keyed by absolute path."
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub modules: IndexMap<PathBuf, ParsedModule>,
    pub entry: Option<PathBuf>,
}

struct Preloader<'a> {
    importers: &'a [Box<dyn Importer>],
    sources: &'a mut SourceMap,
    graph: ModuleGraph,
    /// `@import`-only ancestry, used to detect cycles through the legacy
    /// splicing form (`@use`/`@forward` cannot cycle back into a module
    /// still being loaded, since each only creates a namespace binding).
    import_stack: Vec<PathBuf>,
}

pub fn preload(
    entry_path: &Path,
    entry_contents: &str,
    entry_syntax: SassSyntax,
    importers: &[Box<dyn Importer>],
    sources: &mut SourceMap,
) -> SassResult<ModuleGraph> {
    let mut preloader = Preloader {
        importers,
        sources,
        graph: ModuleGraph::default(),
        import_stack: Vec::new(),
    };
    let canonical = entry_path.to_path_buf();
    preloader.load_and_walk(canonical.clone(), entry_contents.to_owned(), entry_syntax)?;
    preloader.graph.entry = Some(canonical);
    Ok(preloader.graph)
}

impl<'a> Preloader<'a> {
    fn load_and_walk(
        &mut self,
        canonical: PathBuf,
        contents: String,
        syntax: SassSyntax,
    ) -> SassResult<()> {
        if self.graph.modules.contains_key(&canonical) {
            return Ok(());
        }
        let file = self
            .sources
            .add_file(canonical.to_string_lossy().into_owned(), contents);
        let stmt = parse_file(Arc::clone(&file), syntax)?;
        self.graph.modules.insert(
            canonical.clone(),
            ParsedModule {
                path: canonical.clone(),
                syntax,
                stmt: stmt.clone(),
            },
        );
        self.walk_body(&canonical, &stmt_body(&stmt))
    }

    fn walk_body(&mut self, from: &Path, body: &[codemap::Spanned<Stmt>]) -> SassResult<()> {
        for stmt in body {
            match &stmt.node {
                Stmt::Use { url, .. } | Stmt::Forward { url, .. } => {
                    self.resolve_and_load(from, url, stmt.span)?;
                }
                Stmt::Import(args) => {
                    for arg in args {
                        if let ImportArgument::Dynamic(url) = arg {
                            self.resolve_legacy_import(from, url, stmt.span)?;
                        }
                    }
                }
                // Only the top level of a module establishes module-graph
                // edges; `@use`/`@forward`/`@import` nested inside control
                // flow or rules are evaluator-time concerns, not preload
                // targets, matching `spec.md` §4.2's "shallow walk".
                _ => {}
            }
        }
        Ok(())
    }

    fn resolve_and_load(&mut self, from: &Path, url: &str, span: codemap::Span) -> SassResult<()> {
        let result = self.resolve(from, url, span)?;
        self.load_and_walk(result.canonical_path, result.contents, result.syntax)
    }

    fn resolve_legacy_import(&mut self, from: &Path, url: &str, span: codemap::Span) -> SassResult<()> {
        let result = self.resolve(from, url, span)?;
        if self.import_stack.contains(&result.canonical_path) {
            let mut cycle: Vec<String> = self
                .import_stack
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            cycle.push(result.canonical_path.display().to_string());
            return Err(SassError::import(
                format!("This file is already being imported: {}", cycle.join(" -> ")),
                span,
            ));
        }
        if self.graph.modules.contains_key(&result.canonical_path) {
            return Ok(());
        }
        self.import_stack.push(result.canonical_path.clone());
        self.load_and_walk(
            result.canonical_path.clone(),
            result.contents,
            result.syntax,
        )?;
        self.import_stack.pop();
        Ok(())
    }

    fn resolve(
        &self,
        from: &Path,
        url: &str,
        span: codemap::Span,
    ) -> SassResult<crate::importer::ImportResult> {
        for importer in self.importers {
            if let Some(result) = importer.resolve(url, Some(from), span)? {
                return Ok(result);
            }
        }
        Err(SassError::import(
            format!("Can't find stylesheet to import: \"{}\"", url),
            span,
        ))
    }
}

/// Pulls a parsed module's top-level body back out of its `Stmt::Root`
/// wrapper; reused by `crate::evaluate` to execute a preloaded module's
/// statements once `@use`/`@forward`/`@import` resolves it by path.
pub(crate) fn stmt_body(stmt: &codemap::Spanned<Stmt>) -> Vec<codemap::Spanned<Stmt>> {
    match &stmt.node {
        Stmt::Root { body, .. } => body.clone(),
        _ => Vec::new(),
    }
}
