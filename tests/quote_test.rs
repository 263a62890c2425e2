mod common;

use std::borrow::Cow;

use rstest::rstest;
use slate_yaml::error::DiagnosticCollector;
use slate_yaml::escaper::{decode_double_quoted, decode_scalar, decode_single_quoted, escape};
use slate_yaml::Stream;

#[rstest]
#[case::newline(br#""a\nb""#, b"a\nb")]
#[case::tab(br#""a\tb""#, b"a\tb")]
#[case::backslash(br#""a\\b""#, b"a\\b")]
#[case::quote(br#""a\"b""#, b"a\"b")]
#[case::null(br#""\0""#, b"\x00")]
#[case::bell(br#""\a""#, b"\x07")]
#[case::backspace(br#""\b""#, b"\x08")]
#[case::vertical_tab(br#""\v""#, b"\x0b")]
#[case::form_feed(br#""\f""#, b"\x0c")]
#[case::carriage_return(br#""\r""#, b"\x0d")]
#[case::escape_char(br#""\e""#, b"\x1b")]
#[case::space(br#""\ ""#, b" ")]
#[case::slash(br#""\/""#, b"/")]
#[case::hex(br#""\x41""#, b"A")]
#[case::hex_high(br#""\xE9""#, b"\xC3\xA9")]
#[case::unicode_16(br#""\u0041""#, b"A")]
#[case::unicode_32(br#""\U00000041""#, b"A")]
#[case::next_line(br#""\N""#, b"\xC2\x85")]
#[case::nbsp(br#""\_""#, b"\xC2\xA0")]
#[case::line_separator(br#""\L""#, b"\xE2\x80\xA8")]
#[case::paragraph_separator(br#""\P""#, b"\xE2\x80\xA9")]
#[case::folded_break(b"\"a\nb\"", b"a\nb")]
#[case::folded_crlf(b"\"a\r\nb\"", b"a\nb")]
#[case::escaped_break(b"\"a\\\nb\"", b"ab")]
fn double_quoted_escapes(#[case] raw: &[u8], #[case] expected: &[u8]) {
    assert_eq!(decode_scalar(raw).unwrap().as_ref(), expected);
}

#[test]
fn single_quote_doubling() {
    assert_eq!(decode_scalar(b"'it''s'").unwrap().as_ref(), b"it's");
    assert_eq!(decode_single_quoted(b"''''"), Cow::<[u8]>::Owned(b"''".to_vec()));
}

#[test]
fn plain_scalars_decode_to_their_raw_bytes() {
    assert_eq!(decode_scalar(b"plain value").unwrap().as_ref(), b"plain value");
}

#[test]
fn undisturbed_content_is_returned_as_a_view() {
    let decoded = decode_scalar(b"\"abc\"").unwrap();
    assert!(matches!(decoded, Cow::Borrowed(view) if view == b"abc"));
    let decoded = decode_scalar(b"'abc'").unwrap();
    assert!(matches!(decoded, Cow::Borrowed(view) if view == b"abc"));
}

#[test]
fn unknown_escape_is_an_error() {
    let err = decode_scalar(br#""a\qb""#).unwrap_err();
    assert_eq!(err.message, "Unrecognized escape code!");
    assert_eq!(err.offset, 3);
}

#[test]
fn truncated_hex_escape_is_an_error() {
    let err = decode_scalar(br#""\x4""#).unwrap_err();
    assert_eq!(err.message, "Invalid hex escape code!");
}

#[rstest]
#[case::plain(b"hello world".as_slice())]
#[case::specials(b"tab\there \\ and \"quote\"".as_slice())]
#[case::controls(b"\x00\x07\x08\x0b\x0c\x1b end".as_slice())]
#[case::unicode("héllo — \u{85}\u{a0}\u{2028}\u{2029}\u{1F600}".as_bytes())]
fn escape_then_decode_round_trips(#[case] input: &[u8]) {
    let escaped = escape(input);
    assert_eq!(
        decode_double_quoted(&escaped).unwrap().as_ref(),
        input,
        "round trip failed for {input:?}"
    );
}

#[test]
fn escape_leaves_clean_ascii_borrowed() {
    assert!(matches!(escape(b"clean ascii"), Cow::Borrowed(_)));
}

#[test]
fn document_scalar_value_decodes_escapes() {
    let mut collector = DiagnosticCollector::new();
    let input = b"key: \"a\\tb\\u0021\"\n";
    let mut stream = Stream::new(input, &mut collector);
    let mut doc = stream.next_document().unwrap();
    let root = doc.root().unwrap();
    let entry = doc.next_key_value(root).unwrap();
    let value = doc.value(entry);
    assert_eq!(doc.scalar_raw(value), Some(&b"\"a\\tb\\u0021\""[..]));
    assert_eq!(doc.scalar_value(value).unwrap().as_ref(), b"a\tb!");
    drop(doc);
    assert!(collector.diagnostics.is_empty());
}

#[test]
fn document_scalar_value_reports_bad_escapes() {
    let mut collector = DiagnosticCollector::new();
    let input = b"key: \"a\\qb\"\n";
    {
        let mut stream = Stream::new(input, &mut collector);
        let mut doc = stream.next_document().unwrap();
        let root = doc.root().unwrap();
        let entry = doc.next_key_value(root).unwrap();
        let value = doc.value(entry);
        assert_eq!(doc.scalar_value(value).unwrap().as_ref(), b"");
    }
    assert_eq!(collector.diagnostics.len(), 1);
    assert_eq!(collector.diagnostics[0].message, "Unrecognized escape code!");
    // The offset points at the escaped character inside the literal.
    assert_eq!(collector.diagnostics[0].at, 8);
}
