mod common;

use common::{diagnostics, kinds, tokens};
use rstest::rstest;
use slate_yaml::error::DiagnosticCollector;
use slate_yaml::tokenizer::Scanner;
use slate_yaml::tokenizer::TokenKind::*;

#[test]
fn block_mapping_tokens() {
    assert_eq!(
        tokens("a: 1\n"),
        vec![
            (StreamStart, String::new()),
            (BlockMappingStart, String::new()),
            (Key, String::new()),
            (Scalar, "a".to_string()),
            (Value, ":".to_string()),
            (Scalar, "1".to_string()),
            (BlockEnd, String::new()),
            (StreamEnd, String::new()),
        ]
    );
}

#[test]
fn flow_sequence_tokens() {
    assert_eq!(
        kinds("[a, b, c]\n"),
        vec![
            StreamStart,
            FlowSequenceStart,
            Scalar,
            FlowEntry,
            Scalar,
            FlowEntry,
            Scalar,
            FlowSequenceEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn explicit_key_with_adjacent_value_tokens() {
    assert_eq!(
        kinds("?: v\n"),
        vec![StreamStart, BlockMappingStart, Key, Value, Scalar, BlockEnd, StreamEnd]
    );
}

#[test]
fn nested_block_sequence_tokens() {
    assert_eq!(
        kinds("- - 1\n  - 2\n- 3\n"),
        vec![
            StreamStart,
            BlockSequenceStart,
            BlockEntry,
            BlockSequenceStart,
            BlockEntry,
            Scalar,
            BlockEntry,
            Scalar,
            BlockEnd,
            BlockEntry,
            Scalar,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn document_markers_reset_indentation() {
    assert_eq!(
        kinds("---\na: 1\n...\n"),
        vec![
            StreamStart,
            DocumentStart,
            BlockMappingStart,
            Key,
            Scalar,
            Value,
            Scalar,
            BlockEnd,
            DocumentEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn version_directive_token() {
    assert_eq!(
        tokens("%YAML 1.2\n---\na\n")[1],
        (VersionDirective, "%YAML 1.2".to_string())
    );
}

#[test]
fn unknown_directives_produce_no_token() {
    assert_eq!(
        kinds("%TAG ! tag:example.com,2000:\n%FOO bar\na\n"),
        vec![StreamStart, Scalar, StreamEnd]
    );
}

#[test]
fn peek_is_idempotent_and_pop_returns_the_peeked_token() {
    let input = b"key: [a, b]\n";
    let mut scanner = Scanner::new(input, DiagnosticCollector::new());
    loop {
        let first = *scanner.peek();
        let second = *scanner.peek();
        assert_eq!(first, second);
        let popped = scanner.pop();
        assert_eq!(first, popped);
        if popped.kind == StreamEnd {
            break;
        }
    }
}

#[rstest]
#[case::block_map("a: 1\nb: 2\n")]
#[case::nested_seq("- - 1\n  - 2\n- 3\n")]
#[case::map_of_seq("key: [ a, b ]\nother: c\n")]
#[case::indentless("key:\n- 1\n- 2\n")]
#[case::explicit("? a\n: b\n")]
#[case::multi_doc("---\na: 1\n---\n- x\n...\n")]
fn block_starts_and_ends_are_balanced(#[case] input: &str) {
    let kinds = kinds(input);
    let starts = kinds
        .iter()
        .filter(|k| matches!(**k, BlockMappingStart | BlockSequenceStart))
        .count();
    let ends = kinds.iter().filter(|k| matches!(**k, BlockEnd)).count();
    assert_eq!(starts, ends, "unbalanced block tokens in {input:?}");
    assert_eq!(kinds.last(), Some(&StreamEnd));
}

#[test]
fn synthetic_key_precedes_its_mapping_entry() {
    // Every Key emitted in block context directly follows either the
    // mapping start or the previous entry's value.
    let kinds = kinds("a: 1\nb: 2\nc: 3\n");
    for (index, kind) in kinds.iter().enumerate() {
        if *kind == Key {
            assert!(matches!(kinds[index - 1], BlockMappingStart | Scalar));
        }
    }
}

#[test]
fn utf8_bom_is_consumed_by_stream_start() {
    let input = "\u{FEFF}a\n".as_bytes();
    let mut scanner = Scanner::new(input, DiagnosticCollector::new());
    let start = scanner.pop();
    assert_eq!(start.kind, StreamStart);
    assert_eq!(start.range.len(), 3);
    assert_eq!(scanner.pop().kind, Scalar);
}

#[test]
fn stale_candidate_on_next_line_is_discarded() {
    // The quoted scalar on line one can no longer become a key once the
    // scanner reaches line two; the second line still forms its own
    // mapping.
    assert_eq!(
        kinds("'a'\nb: 1\n"),
        vec![
            StreamStart,
            Scalar,
            BlockMappingStart,
            Key,
            Scalar,
            Value,
            Scalar,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn stale_required_candidate_is_an_error_at_the_candidate() {
    let diags = diagnostics("a: 1\nb\nc: 2\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Could not find expected : for simple key");
    assert_eq!(diags[0].at, 5);
}

#[test]
fn unrecognized_character_fails_the_stream() {
    let kinds = kinds("@foo\n");
    assert_eq!(kinds.last(), Some(&Error));
    let diags = diagnostics("@foo\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].at, 0);
    assert_eq!(diags[0].message, "Unrecognized character while tokenizing");
}

#[test]
fn only_the_first_error_is_reported() {
    // The second bad byte would produce its own diagnostic if cascades
    // were not suppressed.
    let diags = diagnostics("@a\n@b\n");
    assert_eq!(diags.len(), 1);
}

#[test]
fn invalid_utf8_is_reported() {
    let mut scanner = Scanner::new(b"\xFF\n", DiagnosticCollector::new());
    loop {
        let token = scanner.pop();
        if token.kind == Error {
            break;
        }
        assert_ne!(token.kind, StreamEnd, "expected an error token");
    }
    assert!(scanner.failed());
}

#[test]
fn error_tokens_are_sticky() {
    let mut scanner = Scanner::new(b"@x\n", DiagnosticCollector::new());
    scanner.pop(); // Stream-Start
    assert_eq!(scanner.pop().kind, Error);
    assert_eq!(scanner.pop().kind, Error);
    assert_eq!(scanner.peek().kind, Error);
    assert!(scanner.failed());
}

#[test]
fn tab_indentation_in_scalar_continuation_is_an_error() {
    let diags = diagnostics("a: b\n\tc\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Found invalid tab character in indentation");
}

#[test]
fn unterminated_quoted_scalar_is_an_error() {
    let diags = diagnostics("\"abc\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Expected quote at end of scalar");
    assert_eq!(diags[0].at, 0);
}

#[test]
fn unexpected_colon_in_flow_plain_scalar_is_an_error() {
    let diags = diagnostics("[a:b]\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "Found unexpected ':' while scanning a plain scalar"
    );
}

#[test]
fn empty_alias_is_an_error() {
    let diags = diagnostics("*\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Got empty alias or anchor");
}

#[test]
fn block_scalar_runs_to_an_empty_line() {
    let toks = tokens("a: |\n x\n y\n\nb: 2\n");
    let scalar = toks
        .iter()
        .filter(|(kind, _)| *kind == Scalar)
        .nth(1)
        .unwrap();
    assert_eq!(scalar.1, "|\n x\n y\n");
}
