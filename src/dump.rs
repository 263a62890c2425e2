//! Debug renderings: the token dump and the canonical document dump.

use std::fmt::{self, Write};

use crate::error::{DiagnosticSink, IgnoreDiagnostics};
use crate::tokenizer::{Scanner, TokenKind};
use crate::treebuild::{Document, NodeId, NodeKind, Stream};

/// Print one token per line as `<Kind>: <text>`, stopping after
/// `Stream-End` or an `Error` token.
pub fn dump_tokens<S: DiagnosticSink, W: Write>(
    input: &[u8],
    sink: S,
    out: &mut W,
) -> fmt::Result {
    let mut scanner = Scanner::new(input, sink);
    loop {
        let token = scanner.pop();
        writeln!(
            out,
            "{}: {}",
            token.kind,
            String::from_utf8_lossy(token.range.slice(input))
        )?;
        if matches!(token.kind, TokenKind::StreamEnd | TokenKind::Error) {
            return Ok(());
        }
    }
}

/// Drive the scanner over the whole input; false if it failed.
pub fn scan_tokens(input: &[u8]) -> bool {
    let mut scanner = Scanner::new(input, IgnoreDiagnostics);
    loop {
        let token = scanner.pop();
        match token.kind {
            TokenKind::StreamEnd => return true,
            TokenKind::Error => return false,
            _ => {}
        }
    }
}

/// Render every document of the stream in canonical form, each framed by
/// `%YAML 1.2\n---\n` and `\n...\n`.
pub fn dump_stream<S: DiagnosticSink, W: Write>(
    stream: &mut Stream<'_, S>,
    out: &mut W,
) -> fmt::Result {
    while let Some(mut doc) = stream.next_document() {
        out.write_str("%YAML 1.2\n---\n")?;
        match doc.root() {
            Some(root) => dump_node(&mut doc, root, 0, false, out)?,
            None => break,
        }
        out.write_str("\n...\n")?;
    }
    Ok(())
}

/// Render one node: `!!str "raw"` for scalars, `!!seq [` / `!!map {`
/// blocks with two-space indented entries, `*name` for aliases and
/// `!!null null` otherwise. Anchors print as a `&name ` prefix.
pub fn dump_node<S: DiagnosticSink, W: Write>(
    doc: &mut Document<'_, '_, S>,
    id: NodeId,
    indent: usize,
    suppress_first_indent: bool,
    out: &mut W,
) -> fmt::Result {
    if !suppress_first_indent {
        write_indent(out, indent)?;
    }
    if let Some(anchor) = doc.anchor_name(id) {
        write!(out, "&{} ", String::from_utf8_lossy(anchor))?;
    }
    match doc.node(id).kind() {
        NodeKind::Scalar => {
            let raw = doc.scalar_raw(id).unwrap_or(&[]);
            write!(out, "!!str \"{}\"", String::from_utf8_lossy(raw))?;
        }
        NodeKind::Sequence => {
            out.write_str("!!seq [\n")?;
            while let Some(entry) = doc.next_entry(id) {
                dump_node(doc, entry, indent + 1, false, out)?;
                out.write_str(",\n")?;
            }
            write_indent(out, indent)?;
            out.write_char(']')?;
        }
        NodeKind::Mapping => {
            out.write_str("!!map {\n")?;
            while let Some(entry) = doc.next_key_value(id) {
                write_indent(out, indent + 1)?;
                out.write_str("? ")?;
                let key = doc.key(entry);
                dump_node(doc, key, indent + 1, true, out)?;
                out.write_char('\n')?;
                write_indent(out, indent + 1)?;
                out.write_str(": ")?;
                let value = doc.value(entry);
                dump_node(doc, value, indent + 1, true, out)?;
                out.write_str(",\n")?;
            }
            write_indent(out, indent)?;
            out.write_char('}')?;
        }
        NodeKind::Alias => {
            let name = doc.alias_name(id).unwrap_or(&[]);
            write!(out, "*{}", String::from_utf8_lossy(name))?;
        }
        NodeKind::Null | NodeKind::KeyValue => out.write_str("!!null null")?,
    }
    Ok(())
}

fn write_indent<W: Write>(out: &mut W, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        out.write_str("  ")?;
    }
    Ok(())
}
