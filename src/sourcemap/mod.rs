//! Source Map Revision 3 emission (`spec.md` §4.9, C11). Consumes the
//! [`crate::serializer::Mapping`]s collected while serializing and the
//! [`crate::source::SourceMap`] they point back into, and produces the
//! standard `{version, sources, mappings, ...}` JSON envelope, the same
//! artifact dart-sass and libsass both emit. VLQ encoding lives in
//! [`vlq`], kept separate so the segment-delta bookkeeping here stays
//! readable.

mod vlq;

use std::collections::HashMap;

use serde::Serialize;

use crate::serializer::Mapping;
use crate::source::SourceMap as Sources;

#[derive(Debug, Serialize)]
struct Envelope {
    version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(rename = "sourceRoot", skip_serializing_if = "Option::is_none")]
    source_root: Option<String>,
    sources: Vec<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    sources_content: Option<Vec<String>>,
    names: Vec<String>,
    mappings: String,
}

/// Options controlling the shape of the emitted envelope; named after the
/// `Options` fields they're drawn from rather than duplicating them.
pub struct SourceMapOptions<'a> {
    pub output_file: Option<&'a str>,
    pub source_root: Option<&'a str>,
    pub embed_contents: bool,
    pub file_urls: bool,
}

/// Builds the JSON text of a source map from the mappings gathered during
/// serialization. `contents` supplies each source file's original text
/// when `embed_contents` is requested; missing entries are left out of
/// `sourcesContent` rather than erroring, since embedding is best-effort.
pub fn build(sources: &Sources, mappings: &[Mapping], contents: &HashMap<String, String>, options: &SourceMapOptions) -> String {
    let mut source_names: Vec<String> = Vec::new();
    let mut source_index: HashMap<String, usize> = HashMap::new();

    let mut encoded = String::new();
    let mut prev_generated_line = 0u32;
    let mut prev_generated_column = 0u32;
    let mut prev_source_index = 0i64;
    let mut prev_source_line = 0i64;
    let mut prev_source_column = 0i64;
    let mut first_segment_on_line = true;

    for mapping in mappings {
        let loc = sources.look_up_span(mapping.source_span);
        let file_name = loc.file.name().to_owned();
        let index = *source_index.entry(file_name.clone()).or_insert_with(|| {
            source_names.push(normalize_source_name(&file_name, options.file_urls));
            source_names.len() - 1
        });

        while prev_generated_line < mapping.generated_line {
            encoded.push(';');
            prev_generated_line += 1;
            prev_generated_column = 0;
            first_segment_on_line = true;
        }
        if !first_segment_on_line {
            encoded.push(',');
        }
        first_segment_on_line = false;

        vlq::encode(mapping.generated_column as i64 - prev_generated_column as i64, &mut encoded);
        vlq::encode(index as i64 - prev_source_index, &mut encoded);
        vlq::encode(loc.begin.line as i64 - prev_source_line, &mut encoded);
        vlq::encode(loc.begin.column as i64 - prev_source_column, &mut encoded);

        prev_generated_column = mapping.generated_column;
        prev_source_index = index as i64;
        prev_source_line = loc.begin.line as i64;
        prev_source_column = loc.begin.column as i64;
    }

    let sources_content = if options.embed_contents {
        Some(source_names.iter().map(|name| contents.get(name).cloned().unwrap_or_default()).collect())
    } else {
        None
    };

    let envelope = Envelope {
        version: 3,
        file: options.output_file.map(str::to_owned),
        source_root: options.source_root.map(str::to_owned),
        sources: source_names,
        sources_content,
        names: Vec::new(),
        mappings: encoded,
    };

    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

fn normalize_source_name(name: &str, file_urls: bool) -> String {
    if file_urls && !name.starts_with("file://") && !name.contains("://") {
        format!("file://{}", name)
    } else {
        name.to_owned()
    }
}

/// The `/*# sourceMappingURL=... */` comment appended to generated CSS
/// when `source-map-mode` is `create` or `link`.
pub fn mapping_url_comment(url: &str) -> String {
    format!("\n/*# sourceMappingURL={} */\n", url)
}

/// Base64-encodes a source map for `data:` URL embedding
/// (`source-map-mode = embed`).
pub fn data_url(json: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    format!("data:application/json;base64,{}", STANDARD.encode(json))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::serializer::Mapping;
    use crate::source::SourceMap as Sources;

    #[test]
    fn single_mapping_encodes_a_non_empty_segment() {
        let mut sources = Sources::new();
        let file = sources.add_file("input.scss".into(), "a { color: red; }".into());
        let mappings = vec![Mapping {
            generated_line: 0,
            generated_column: 0,
            source_span: file.span,
        }];
        let json = build(&sources, &mappings, &HashMap::new(), &SourceMapOptions {
            output_file: Some("output.css"),
            source_root: None,
            embed_contents: false,
            file_urls: false,
        });
        assert!(json.contains("\"version\": 3"));
        assert!(json.contains("input.scss"));
        assert!(!json.contains("\"mappings\": \"\""));
    }

    #[test]
    fn two_lines_of_mappings_are_separated_by_a_semicolon() {
        let mut sources = Sources::new();
        let file = sources.add_file("input.scss".into(), "a {\n  color: red;\n}".into());
        let mappings = vec![
            Mapping { generated_line: 0, generated_column: 0, source_span: file.span },
            Mapping { generated_line: 1, generated_column: 2, source_span: file.span },
        ];
        let json = build(&sources, &mappings, &HashMap::new(), &SourceMapOptions {
            output_file: None,
            source_root: None,
            embed_contents: false,
            file_urls: false,
        });
        let mappings_field = json.lines().find(|l| l.contains("\"mappings\"")).unwrap();
        assert!(mappings_field.contains(';'));
    }

    #[test]
    fn embed_contents_includes_sources_content_when_available() {
        let mut sources = Sources::new();
        let file = sources.add_file("input.scss".into(), "a { color: red; }".into());
        let mappings = vec![Mapping { generated_line: 0, generated_column: 0, source_span: file.span }];
        let mut contents = HashMap::new();
        contents.insert("input.scss".to_owned(), "a { color: red; }".to_owned());
        let json = build(&sources, &mappings, &contents, &SourceMapOptions {
            output_file: None,
            source_root: None,
            embed_contents: true,
            file_urls: false,
        });
        assert!(json.contains("sourcesContent"));
    }
}
