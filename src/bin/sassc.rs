//! The CLI front end (`spec.md` §6's "CLI" row): a thin `clap`-based
//! wrapper around `grasswood::from_path`/`compile_string`. Reads
//! `input [output]`, recognizes the documented short and long flags, and
//! maps any compile failure to a nonzero exit code.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use grasswood::{OutputStyle, SourceMapMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Expanded,
    Nested,
    Compact,
    Compressed,
}

impl From<StyleArg> for OutputStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Expanded => OutputStyle::Expanded,
            StyleArg::Nested => OutputStyle::Nested,
            StyleArg::Compact => OutputStyle::Compact,
            StyleArg::Compressed => OutputStyle::Compressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceMapUrls {
    File,
    Relative,
}

/// A Sass-to-CSS compiler.
#[derive(Debug, Parser)]
#[command(name = "sassc", version, about)]
struct Cli {
    /// Sass/SCSS file to compile, or `-` for stdin.
    input: PathBuf,

    /// Where to write the CSS; stdout when omitted.
    output: Option<PathBuf>,

    /// Output style.
    #[arg(short = 't', long = "style", value_enum, default_value_t = StyleArg::Expanded)]
    style: StyleArg,

    /// Number of digits after the decimal point to emit for numbers.
    #[arg(short = 'p', long, default_value_t = 10)]
    precision: u8,

    /// Adds a directory to the list consulted for `@use`/`@import`.
    #[arg(short = 'I', long = "load-path")]
    load_path: Vec<PathBuf>,

    /// Emits a `.css.map` source map alongside the output.
    #[arg(short = 'm', long)]
    sourcemap: bool,

    /// Embeds the source map as a `data:` URL instead of a sibling file.
    #[arg(long)]
    embed_source_map: bool,

    /// Whether `sourceMappingURL`/`sources` entries are absolute `file://`
    /// URLs or paths relative to the map.
    #[arg(long, value_enum, default_value_t = SourceMapUrls::Relative)]
    source_map_urls: SourceMapUrls,

    /// Suppresses `@warn`/`@debug` output.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = match (cli.sourcemap, cli.embed_source_map) {
        (_, true) => SourceMapMode::Embed,
        (true, false) => SourceMapMode::Create,
        (false, false) => SourceMapMode::None,
    };

    let mut options = grasswood::Options::new()
        .output_style(cli.style.into())
        .precision(cli.precision)
        .source_map_mode(mode)
        .quiet(cli.quiet);

    for path in &cli.load_path {
        options = options.add_load_path(path.clone());
    }
    options.source_map_file_urls = cli.source_map_urls == SourceMapUrls::File;

    let result = if cli.input == PathBuf::from("-") {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {}", e);
            return ExitCode::FAILURE;
        }
        grasswood::compile_string(&source, options)
    } else {
        grasswood::from_path(&cli.input, options)
    };

    let compiled = match result {
        Ok(compiled) => compiled,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_output(&cli, &compiled) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn write_output(cli: &Cli, compiled: &grasswood::CompileResult) -> io::Result<()> {
    match &cli.output {
        Some(path) => {
            fs::write(path, &compiled.css)?;
            if let (Some(json), false) = (&compiled.source_map, cli.embed_source_map) {
                fs::write(path.with_extension("css.map"), json)?;
            }
        }
        None => {
            io::stdout().write_all(compiled.css.as_bytes())?;
        }
    }
    Ok(())
}
