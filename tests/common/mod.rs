#![allow(dead_code)]

use slate_yaml::dump::dump_stream;
use slate_yaml::error::{Diagnostic, DiagnosticCollector, DiagnosticSink};
use slate_yaml::tokenizer::{Scanner, TokenKind};
use slate_yaml::treebuild::{NodeId, NodeKind};
use slate_yaml::{Document, Stream};

/// Tokenize `input` completely, returning each token's kind and raw text.
pub fn tokens(input: &str) -> Vec<(TokenKind, String)> {
    let mut scanner = Scanner::new(input.as_bytes(), DiagnosticCollector::new());
    let mut out = Vec::new();
    loop {
        let token = scanner.pop();
        let text = String::from_utf8_lossy(token.range.slice(input.as_bytes())).into_owned();
        let kind = token.kind;
        out.push((kind, text));
        if matches!(kind, TokenKind::StreamEnd | TokenKind::Error) {
            return out;
        }
    }
}

pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokens(input).into_iter().map(|(kind, _)| kind).collect()
}

/// The canonical dump of every document in `input`.
pub fn canonical(input: &str) -> String {
    let mut collector = DiagnosticCollector::new();
    let mut stream = Stream::new(input.as_bytes(), &mut collector);
    let mut out = String::new();
    dump_stream(&mut stream, &mut out).unwrap();
    out
}

/// All diagnostics produced while draining `input`.
pub fn diagnostics(input: &str) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    {
        let mut stream = Stream::new(input.as_bytes(), &mut collector);
        stream.skip();
    }
    collector.diagnostics
}

/// Render the first document's tree as a compact one-line string:
/// `{k: v}` for mappings, `[a, b]` for sequences, `~` for nulls, `*name`
/// for aliases, `&name ` prefixes for anchors, raw bytes for scalars.
pub fn render(input: &str) -> String {
    let mut collector = DiagnosticCollector::new();
    let mut stream = Stream::new(input.as_bytes(), &mut collector);
    let mut doc = stream.next_document().expect("at least one document");
    match doc.root() {
        Some(root) => render_node(&mut doc, root),
        None => "<error>".to_string(),
    }
}

/// Render every document in the stream.
pub fn documents(input: &str) -> Vec<String> {
    let mut collector = DiagnosticCollector::new();
    let mut stream = Stream::new(input.as_bytes(), &mut collector);
    let mut out = Vec::new();
    while let Some(mut doc) = stream.next_document() {
        match doc.root() {
            Some(root) => out.push(render_node(&mut doc, root)),
            None => {
                out.push("<error>".to_string());
                break;
            }
        }
    }
    out
}

pub fn render_node<S: DiagnosticSink>(doc: &mut Document<'_, '_, S>, id: NodeId) -> String {
    let mut out = String::new();
    if let Some(anchor) = doc.anchor_name(id) {
        out.push('&');
        out.push_str(&String::from_utf8_lossy(anchor));
        out.push(' ');
    }
    match doc.node(id).kind() {
        NodeKind::Null => out.push('~'),
        NodeKind::Scalar => {
            out.push_str(&String::from_utf8_lossy(doc.scalar_raw(id).unwrap()));
        }
        NodeKind::Alias => {
            out.push('*');
            out.push_str(&String::from_utf8_lossy(doc.alias_name(id).unwrap()));
        }
        NodeKind::Sequence => {
            out.push('[');
            let mut first = true;
            while let Some(entry) = doc.next_entry(id) {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                let rendered = render_node(doc, entry);
                out.push_str(&rendered);
            }
            out.push(']');
        }
        NodeKind::Mapping => {
            out.push('{');
            let mut first = true;
            while let Some(entry) = doc.next_key_value(id) {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                let key = doc.key(entry);
                let rendered = render_node(doc, key);
                out.push_str(&rendered);
                out.push_str(": ");
                let value = doc.value(entry);
                let rendered = render_node(doc, value);
                out.push_str(&rendered);
            }
            out.push('}');
        }
        NodeKind::KeyValue => unreachable!("key-value entries are rendered via their mapping"),
    }
    out
}
