//! Compiler options (`spec.md` §6's `set_option` key table). A plain
//! builder struct rather than the teacher's ad hoc function parameters,
//! since the option surface here is much larger than anything the teacher
//! needed to thread through.

use std::path::PathBuf;

use crate::common::{OutputStyle, SourceMapMode};
use crate::importer::{CustomFunction, Importer};
use crate::logger::{DefaultLogger, Logger};

pub struct Options {
    pub output_style: OutputStyle,
    pub precision: u8,
    pub source_map_mode: SourceMapMode,
    pub source_map_path: Option<String>,
    pub source_map_root: Option<String>,
    pub source_map_origin: Option<String>,
    pub source_map_file_urls: bool,
    pub source_map_embed_contents: bool,
    pub logger_columns: usize,
    pub load_paths: Vec<PathBuf>,
    pub importers: Vec<(i32, Box<dyn Importer>)>,
    pub functions: Vec<Box<dyn CustomFunction>>,
    pub quiet: bool,
    pub logger: Box<dyn Logger>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            output_style: OutputStyle::Expanded,
            precision: 10,
            source_map_mode: SourceMapMode::None,
            source_map_path: None,
            source_map_root: None,
            source_map_origin: None,
            source_map_file_urls: false,
            source_map_embed_contents: false,
            logger_columns: 80,
            load_paths: sass_path_from_env(),
            importers: Vec::new(),
            functions: Vec::new(),
            quiet: false,
            logger: Box::new(DefaultLogger),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    pub fn output_style(mut self, style: OutputStyle) -> Self {
        self.output_style = style;
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn source_map_mode(mut self, mode: SourceMapMode) -> Self {
        self.source_map_mode = mode;
        self
    }

    pub fn add_load_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.load_paths.push(path.into());
        self
    }

    pub fn register_importer(mut self, priority: i32, importer: Box<dyn Importer>) -> Self {
        self.importers.push((priority, importer));
        self.importers.sort_by_key(|(p, _)| -*p);
        self
    }

    pub fn register_function(mut self, function: Box<dyn CustomFunction>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn logger(mut self, logger: Box<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }
}

/// `SASS_PATH` is a platform path-separator-delimited list of include
/// directories (`spec.md` §6).
fn sass_path_from_env() -> Vec<PathBuf> {
    match std::env::var_os("SASS_PATH") {
        Some(val) => std::env::split_paths(&val).collect(),
        None => Vec::new(),
    }
}
