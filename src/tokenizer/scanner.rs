use std::collections::VecDeque;

use memchr::memchr2;

use crate::error::{DiagnosticSink, ScanError, ScanResult};
use crate::tokenizer::chars::{
    b_break_width, is_blank, is_blank_or_break, is_flow_indicator, is_uri_char, nb_char_width,
    ns_char_width,
};
use crate::tokenizer::encoding::detect_encoding;
use crate::tokenizer::{Range, Token, TokenKind};

/// Tracks a token that may retroactively become a mapping key.
///
/// Candidates name queued tokens by sequence number rather than by address,
/// so they stay valid while tokens are appended and while synthetic tokens
/// are inserted in front of them.
#[derive(Debug, Clone, Copy)]
struct SimpleKey {
    /// Sequence number of the candidate token; the queue head always has
    /// number `tokens_parsed`.
    token_number: usize,
    column: u32,
    line: u32,
    flow_level: u32,
    /// A key is grammatically obligatory when it opens a line of an
    /// enclosing block mapping; letting such a candidate go stale is an
    /// error rather than a silent discard.
    required: bool,
}

/// Scans YAML tokens from a byte buffer on demand.
///
/// Tokens are produced into a FIFO queue. Resolving a simple key may insert
/// synthetic `Key`/`BlockMappingStart` tokens *behind* tokens that are
/// already queued, so [`Scanner::peek`] refuses to hand out the queue head
/// while any live candidate still refers to it.
pub struct Scanner<'input, S: DiagnosticSink> {
    input: &'input [u8],
    sink: S,

    /// Byte cursor.
    pos: usize,
    /// Current indentation level in spaces, -1 before any block construct.
    indent: i32,
    /// Column in code points, 0-based.
    column: u32,
    /// Line, 0-based.
    line: u32,
    /// Flow-collection nesting depth; 0 means block context.
    flow_level: u32,

    is_start_of_stream: bool,
    is_simple_key_allowed: bool,
    /// Set while the token scanned last was an explicit `?` key; the `:`
    /// that follows it continues that mapping instead of opening a new one.
    after_explicit_key: bool,
    failed: bool,

    tokens: VecDeque<Token>,
    /// Number of tokens popped so far; `tokens_parsed + tokens.len()` is the
    /// sequence number of the next token to be pushed.
    tokens_parsed: usize,
    indents: Vec<i32>,
    simple_keys: Vec<SimpleKey>,
}

impl<'input, S: DiagnosticSink> Scanner<'input, S> {
    pub fn new(input: &'input [u8], sink: S) -> Self {
        Scanner {
            input,
            sink,
            pos: 0,
            indent: -1,
            column: 0,
            line: 0,
            flow_level: 0,
            is_start_of_stream: true,
            is_simple_key_allowed: true,
            after_explicit_key: false,
            failed: false,
            tokens: VecDeque::new(),
            tokens_parsed: 0,
            indents: Vec::new(),
            simple_keys: Vec::new(),
        }
    }

    /// The original input buffer.
    pub fn input(&self) -> &'input [u8] {
        self.input
    }

    /// True once an error occurred; stays true for the rest of the stream.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Parse the next token and return a reference to it without consuming
    /// it. The head is only returned once no simple-key candidate refers to
    /// it, so its position in the stream is final.
    pub fn peek(&mut self) -> &Token {
        let mut need_more = false;
        while !self.failed {
            if self.tokens.is_empty() || need_more {
                need_more = false;
                if self.fetch_more_tokens().is_err() {
                    break;
                }
                continue;
            }
            if self.remove_stale_simple_key_candidates().is_err() {
                break;
            }
            let head = self.tokens_parsed;
            if self.simple_keys.iter().any(|sk| sk.token_number == head) {
                need_more = true;
            } else {
                break;
            }
        }

        if self.failed {
            // Terminal state: everything from here on is a single Error
            // token, re-parked after each pop.
            self.tokens.clear();
            self.simple_keys.clear();
            let at = self.pos.min(self.input.len());
            self.tokens.push_back(Token {
                kind: TokenKind::Error,
                range: Range::empty_at(at),
            });
        }

        self.tokens
            .front()
            .expect("scanner leaves a token queued after peek")
    }

    /// Parse the next token, pop it from the queue and return it.
    pub fn pop(&mut self) -> Token {
        let token = *self.peek();
        self.tokens.pop_front();
        self.tokens_parsed += 1;
        token
    }

    /// Report a diagnostic and poison the scanner. Only the first report per
    /// stream reaches the sink; later ones are cascades of the first.
    pub(crate) fn report_error(&mut self, message: &str, at: usize) {
        if !self.failed {
            let clamped = at.min(self.input.len().saturating_sub(1));
            self.sink.report(clamped, message);
        }
        self.failed = true;
    }

    fn error(&mut self, message: &str, at: usize) -> ScanError {
        self.report_error(message, at);
        ScanError
    }

    fn fetch_more_tokens(&mut self) -> ScanResult {
        if self.failed {
            return Err(ScanError);
        }
        self.fetch_next_token()
    }

    fn fetch_next_token(&mut self) -> ScanResult {
        if self.is_start_of_stream {
            return self.scan_stream_start();
        }

        self.scan_to_next_token();

        if self.pos == self.input.len() {
            return self.scan_stream_end();
        }

        self.remove_stale_simple_key_candidates()?;
        self.unroll_indent(self.column as i32);

        let c = self.input[self.pos];

        if self.column == 0 && c == b'%' {
            return self.scan_directive();
        }
        if self.column == 0 && self.is_document_indicator(b'-') {
            return self.scan_document_indicator(true);
        }
        if self.column == 0 && self.is_document_indicator(b'.') {
            return self.scan_document_indicator(false);
        }

        let after_explicit_key = std::mem::replace(&mut self.after_explicit_key, false);

        match c {
            b'[' => self.scan_flow_collection_start(true),
            b'{' => self.scan_flow_collection_start(false),
            b']' => self.scan_flow_collection_end(true),
            b'}' => self.scan_flow_collection_end(false),
            b',' => self.scan_flow_entry(),
            b'-' if self.next_is_blank_or_break() => self.scan_block_entry(),
            b'?' if self.flow_level > 0
                || self.next_is_blank_or_break()
                || self.next_is_value_indicator() =>
            {
                self.scan_key()
            }
            b':' if self.flow_level > 0 || self.next_is_blank_or_break() => {
                self.scan_value(after_explicit_key)
            }
            b'*' => self.scan_alias_or_anchor(true),
            b'&' => self.scan_alias_or_anchor(false),
            b'!' => self.scan_tag(),
            b'|' if self.flow_level == 0 => self.scan_block_scalar(true),
            b'>' if self.flow_level == 0 => self.scan_block_scalar(false),
            b'\'' => self.scan_flow_scalar(false),
            b'"' => self.scan_flow_scalar(true),
            _ if self.accepts_plain_scalar(c) => self.scan_plain_scalar(),
            _ => Err(self.error("Unrecognized character while tokenizing", self.pos)),
        }
    }

    /// The heuristic deciding whether an otherwise unclaimed leading byte
    /// starts a plain scalar.
    fn accepts_plain_scalar(&self, c: u8) -> bool {
        const INDICATORS: &[u8] = b"-?:,[]{}#&*!|>'\"%@`";
        if !(is_blank_or_break(c) || INDICATORS.contains(&c)) {
            return true;
        }
        if c == b'-' && !self.next_is_blank_or_break() {
            return true;
        }
        self.flow_level == 0 && (c == b'?' || c == b':') && !self.next_is_blank_or_break()
    }

    // Cursor primitives. `skip` is only valid over ASCII bytes: it advances
    // one column per byte.

    fn rest(&self) -> &'input [u8] {
        &self.input[self.pos..]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip(&mut self, count: usize) {
        self.pos += count;
        self.column += count as u32;
    }

    /// End of input counts as a blank for the `-`/`?`/`:` follower checks,
    /// so `a:` at the very end of input still opens a mapping value.
    fn next_is_blank_or_break(&self) -> bool {
        self.peek_byte_at(1).map_or(true, is_blank_or_break)
    }

    /// `?:` with nothing in between: the colon closes an explicit key with
    /// no content.
    fn next_is_value_indicator(&self) -> bool {
        self.peek_byte_at(1) == Some(b':')
            && self.peek_byte_at(2).map_or(true, is_blank_or_break)
    }

    fn is_document_indicator(&self, marker: u8) -> bool {
        self.document_indicator_at(self.pos, marker)
    }

    fn document_indicator_at(&self, pos: usize, marker: u8) -> bool {
        let bytes = &self.input[pos..];
        bytes.len() >= 3
            && bytes[0] == marker
            && bytes[1] == marker
            && bytes[2] == marker
            && bytes.get(3).map_or(true, |&b| is_blank_or_break(b))
    }

    /// Skip whitespace, comments and line breaks until the start of the
    /// next token. New lines re-enable simple keys outside flow context.
    fn scan_to_next_token(&mut self) {
        loop {
            while matches!(self.peek_byte(), Some(b' ') | Some(b'\t')) {
                self.skip(1);
            }

            if self.peek_byte() == Some(b'#') {
                // Bytes inside a comment never affect layout; hop straight
                // to the line break (or end of input).
                let len = memchr2(b'\r', b'\n', self.rest()).unwrap_or(self.rest().len());
                self.pos += len;
            }

            match b_break_width(self.rest()) {
                0 => break,
                width => {
                    self.pos += width;
                    self.line += 1;
                    self.column = 0;
                    if self.flow_level == 0 {
                        self.is_simple_key_allowed = true;
                    }
                }
            }
        }
    }

    /// Must produce the first token of the stream; also identifies and
    /// consumes the byte order mark.
    fn scan_stream_start(&mut self) -> ScanResult {
        self.is_start_of_stream = false;

        let (_encoding, bom_len) = detect_encoding(self.input);
        let start = self.pos;
        self.pos += bom_len;

        self.tokens.push_back(Token {
            kind: TokenKind::StreamStart,
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    fn scan_stream_end(&mut self) -> ScanResult {
        // Force an ending new line if one isn't present.
        if self.column != 0 {
            self.column = 0;
            self.line += 1;
        }

        self.unroll_indent(-1);
        self.simple_keys.clear();
        self.is_simple_key_allowed = false;

        self.tokens.push_back(Token {
            kind: TokenKind::StreamEnd,
            range: Range::empty_at(self.pos),
        });
        Ok(())
    }

    /// Scan a `%...` directive. Only `%YAML` produces a token; `%TAG` and
    /// reserved directives are consumed to end of line without one.
    fn scan_directive(&mut self) -> ScanResult {
        self.unroll_indent(-1);
        self.simple_keys.clear();
        self.is_simple_key_allowed = false;

        let start = self.pos;
        self.skip(1);
        let name_start = self.pos;
        self.skip_while_ns_char();
        let is_yaml = &self.input[name_start..self.pos] == b"YAML";
        while self.peek_byte().map_or(false, is_blank) {
            self.skip(1);
        }

        if is_yaml {
            self.skip_while_ns_char();
            self.tokens.push_back(Token {
                kind: TokenKind::VersionDirective,
                range: Range::new(start, self.pos),
            });
        } else {
            self.skip_while_nb_char();
        }
        Ok(())
    }

    fn scan_document_indicator(&mut self, is_start: bool) -> ScanResult {
        self.unroll_indent(-1);
        self.simple_keys.clear();
        self.is_simple_key_allowed = false;

        let start = self.pos;
        self.skip(3);
        self.tokens.push_back(Token {
            kind: if is_start {
                TokenKind::DocumentStart
            } else {
                TokenKind::DocumentEnd
            },
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    fn scan_flow_collection_start(&mut self, is_sequence: bool) -> ScanResult {
        let start = self.pos;
        let col_start = self.column;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: if is_sequence {
                TokenKind::FlowSequenceStart
            } else {
                TokenKind::FlowMappingStart
            },
            range: Range::new(start, self.pos),
        });

        // [ and { may begin a simple key, and may be followed by one.
        self.save_simple_key_candidate(col_start);
        self.is_simple_key_allowed = true;
        self.flow_level += 1;
        Ok(())
    }

    fn scan_flow_collection_end(&mut self, is_sequence: bool) -> ScanResult {
        self.remove_simple_key_candidates_on_flow_level(self.flow_level);
        self.is_simple_key_allowed = false;

        let start = self.pos;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: if is_sequence {
                TokenKind::FlowSequenceEnd
            } else {
                TokenKind::FlowMappingEnd
            },
            range: Range::new(start, self.pos),
        });
        self.flow_level = self.flow_level.saturating_sub(1);
        Ok(())
    }

    fn scan_flow_entry(&mut self) -> ScanResult {
        self.remove_simple_key_candidates_on_flow_level(self.flow_level);
        self.is_simple_key_allowed = true;

        let start = self.pos;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: TokenKind::FlowEntry,
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    fn scan_block_entry(&mut self) -> ScanResult {
        self.roll_indent(self.column, TokenKind::BlockSequenceStart, None);
        self.remove_simple_key_candidates_on_flow_level(self.flow_level);
        self.is_simple_key_allowed = true;

        let start = self.pos;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: TokenKind::BlockEntry,
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    /// Scan an explicit `?` key indicator.
    fn scan_key(&mut self) -> ScanResult {
        if self.flow_level == 0 {
            self.roll_indent(self.column, TokenKind::BlockMappingStart, None);
        }
        self.remove_simple_key_candidates_on_flow_level(self.flow_level);
        self.is_simple_key_allowed = self.flow_level == 0;

        let start = self.pos;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: TokenKind::Key,
            range: Range::new(start, self.pos),
        });
        self.after_explicit_key = true;
        Ok(())
    }

    /// Scan a `:` value indicator. If a simple-key candidate is pending,
    /// this is the point where it is promoted: a synthetic `Key` (and, in
    /// block context, a `BlockMappingStart`) is inserted in front of the
    /// candidate's token.
    fn scan_value(&mut self, after_explicit_key: bool) -> ScanResult {
        if let Some(sk) = self.simple_keys.pop() {
            let index = sk.token_number - self.tokens_parsed;
            let anchor = self.tokens[index].range.start;
            self.tokens.insert(
                index,
                Token {
                    kind: TokenKind::Key,
                    range: Range::empty_at(anchor),
                },
            );
            self.roll_indent(sk.column, TokenKind::BlockMappingStart, Some(index));
            self.is_simple_key_allowed = false;
        } else {
            if self.flow_level == 0 && !after_explicit_key {
                self.roll_indent(self.column, TokenKind::BlockMappingStart, None);
            }
            self.is_simple_key_allowed = self.flow_level == 0;
        }

        let start = self.pos;
        self.skip(1);
        self.tokens.push_back(Token {
            kind: TokenKind::Value,
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    /// Scan a single- or double-quoted scalar. The token's range covers the
    /// entire literal including both quotes.
    fn scan_flow_scalar(&mut self, is_double_quoted: bool) -> ScanResult {
        let start = self.pos;
        let col_start = self.column;
        self.skip(1);

        loop {
            match self.peek_byte() {
                None => return Err(self.error("Expected quote at end of scalar", start)),
                Some(b'\'') if !is_double_quoted => {
                    // A doubled '' is the escape for a single quote.
                    if self.peek_byte_at(1) == Some(b'\'') {
                        self.skip(2);
                        continue;
                    }
                    break;
                }
                Some(b'"') if is_double_quoted => {
                    if was_escaped(&self.input[start + 1..self.pos]) {
                        self.skip(1);
                        continue;
                    }
                    break;
                }
                Some(_) => {
                    let width = nb_char_width(self.rest());
                    if width != 0 {
                        self.pos += width;
                        self.column += 1;
                        continue;
                    }
                    let break_width = b_break_width(self.rest());
                    if break_width != 0 {
                        self.pos += break_width;
                        self.line += 1;
                        self.column = 0;
                        continue;
                    }
                    return Err(self.error("Invalid utf8 code unit", self.pos));
                }
            }
        }
        self.skip(1); // Closing quote.

        self.tokens.push_back(Token {
            kind: TokenKind::Scalar,
            range: Range::new(start, self.pos),
        });
        self.save_simple_key_candidate(col_start);
        self.is_simple_key_allowed = false;
        Ok(())
    }

    fn scan_plain_scalar(&mut self) -> ScanResult {
        let start = self.pos;
        let col_start = self.column;
        let mut leading_blanks = false;
        let indent = (self.indent + 1).max(0) as u32;

        loop {
            if self.peek_byte() == Some(b'#') {
                break;
            }

            // Consume content characters.
            while let Some(c) = self.peek_byte() {
                if is_blank_or_break(c) {
                    break;
                }
                if self.flow_level > 0 && c == b':' {
                    let next = self.peek_byte_at(1);
                    if !next.map_or(false, |n| is_blank_or_break(n) || n == b',') {
                        return Err(self.error(
                            "Found unexpected ':' while scanning a plain scalar",
                            self.pos,
                        ));
                    }
                }
                if c == b':' && self.next_is_blank_or_break() {
                    break;
                }
                if self.flow_level > 0 && (is_flow_indicator(c) || c == b':' || c == b'?') {
                    break;
                }
                let width = nb_char_width(self.rest());
                if width == 0 {
                    break;
                }
                self.pos += width;
                self.column += 1;
            }

            if !self.peek_byte().map_or(false, is_blank_or_break) {
                break;
            }

            // Tentatively eat separating blanks; they belong to the scalar
            // only if content continues afterwards at a sufficient indent.
            let mut probe = self.pos;
            let line_mark = self.line;
            let column_mark = self.column;
            while let Some(&c) = self.input.get(probe) {
                if is_blank(c) {
                    if leading_blanks && self.column < indent && c == b'\t' {
                        return Err(self.error("Found invalid tab character in indentation", probe));
                    }
                    probe += 1;
                    self.column += 1;
                } else {
                    let width = b_break_width(&self.input[probe..]);
                    if width == 0 {
                        break;
                    }
                    leading_blanks = true;
                    probe += width;
                    self.line += 1;
                    self.column = 0;
                }
            }

            if probe == self.input.len() {
                // Trailing whitespace at end of input is not scalar content.
                self.line = line_mark;
                self.column = column_mark;
                break;
            }
            if self.flow_level == 0 && self.column < indent {
                // Dedent: the next line opens a sibling or parent construct.
                self.line = line_mark;
                self.column = column_mark;
                break;
            }
            if self.flow_level == 0
                && self.column == 0
                && (self.document_indicator_at(probe, b'-')
                    || self.document_indicator_at(probe, b'.'))
            {
                // A document marker line ends the scalar.
                self.line = line_mark;
                self.column = column_mark;
                break;
            }
            self.pos = probe;
        }

        if start == self.pos {
            if self.peek_byte().map_or(false, |b| b & 0x80 != 0) {
                return Err(self.error("Invalid utf8 code unit", self.pos));
            }
            return Err(self.error("Got empty plain scalar", start));
        }

        self.tokens.push_back(Token {
            kind: TokenKind::Scalar,
            range: Range::new(start, self.pos),
        });
        // Plain scalars can be simple keys.
        self.save_simple_key_candidate(col_start);
        self.is_simple_key_allowed = false;
        Ok(())
    }

    fn scan_alias_or_anchor(&mut self, is_alias: bool) -> ScanResult {
        let start = self.pos;
        let col_start = self.column;
        self.skip(1);

        loop {
            match self.peek_byte() {
                Some(b'[') | Some(b']') | Some(b'{') | Some(b'}') | Some(b',') | Some(b':')
                | None => break,
                Some(_) => {
                    let width = ns_char_width(self.rest());
                    if width == 0 {
                        break;
                    }
                    self.pos += width;
                    self.column += 1;
                }
            }
        }

        if self.pos == start + 1 {
            return Err(self.error("Got empty alias or anchor", start));
        }

        self.tokens.push_back(Token {
            kind: if is_alias {
                TokenKind::Alias
            } else {
                TokenKind::Anchor
            },
            range: Range::new(start, self.pos),
        });
        // Aliases and anchors can be simple keys.
        self.save_simple_key_candidate(col_start);
        self.is_simple_key_allowed = false;
        Ok(())
    }

    /// Scan a `|` or `>` scalar. Deliberately conservative: the body runs
    /// until a non-break character appears at column 0 (or end of input);
    /// there is no chomping or indentation-aware folding.
    fn scan_block_scalar(&mut self, _is_literal: bool) -> ScanResult {
        let start = self.pos;
        self.skip(1);

        loop {
            let width = nb_char_width(self.rest());
            if width != 0 {
                self.pos += width;
                self.column += 1;
                continue;
            }
            if self.column == 0 {
                break;
            }
            let break_width = b_break_width(self.rest());
            if break_width != 0 {
                self.pos += break_width;
                self.line += 1;
                self.column = 0;
                continue;
            }
            if self.pos == self.input.len() {
                break;
            }
            return Err(self.error("Invalid utf8 code unit", self.pos));
        }

        if self.pos == start + 1 {
            return Err(self.error("Got empty block scalar", start));
        }

        self.tokens.push_back(Token {
            kind: TokenKind::Scalar,
            range: Range::new(start, self.pos),
        });
        Ok(())
    }

    /// Scan a `!stuff` tag. Verbatim `!<uri>` form aside, the suffix is
    /// consumed as a run of ns-chars; the tag is never resolved.
    fn scan_tag(&mut self) -> ScanResult {
        let start = self.pos;
        let col_start = self.column;
        self.skip(1);

        match self.peek_byte() {
            None => {}
            Some(c) if is_blank_or_break(c) => {} // An empty tag.
            Some(b'<') => {
                self.skip(1);
                self.skip_while_uri_char();
                if self.peek_byte() != Some(b'>') {
                    return Err(self.error("Expected '>' to close verbatim tag", self.pos));
                }
                self.skip(1);
            }
            Some(_) => self.skip_while_ns_char(),
        }

        self.tokens.push_back(Token {
            kind: TokenKind::Tag,
            range: Range::new(start, self.pos),
        });
        // Tags can be simple keys.
        self.save_simple_key_candidate(col_start);
        self.is_simple_key_allowed = false;
        Ok(())
    }

    fn skip_while_ns_char(&mut self) {
        loop {
            let width = ns_char_width(self.rest());
            if width == 0 {
                break;
            }
            self.pos += width;
            self.column += 1;
        }
    }

    fn skip_while_nb_char(&mut self) {
        loop {
            let width = nb_char_width(self.rest());
            if width == 0 {
                break;
            }
            self.pos += width;
            self.column += 1;
        }
    }

    fn skip_while_uri_char(&mut self) {
        while self.peek_byte().map_or(false, is_uri_char) {
            self.skip(1);
        }
    }

    // Indentation control. Both are no-ops inside flow context.

    /// Increase the indent to `col`, inserting a synthetic `kind` token at
    /// `insert_at` (or appending) if a new level opens.
    fn roll_indent(&mut self, col: u32, kind: TokenKind, insert_at: Option<usize>) {
        if self.flow_level > 0 {
            return;
        }
        if self.indent < col as i32 {
            self.indents.push(self.indent);
            self.indent = col as i32;
            let token = Token {
                kind,
                range: Range::empty_at(self.pos),
            };
            match insert_at {
                Some(index) => self.tokens.insert(index, token),
                None => self.tokens.push_back(token),
            }
        }
    }

    /// Unroll the indent stack back to `col`, emitting one `BlockEnd` per
    /// closed level.
    fn unroll_indent(&mut self, col: i32) {
        if self.flow_level > 0 {
            return;
        }
        while self.indent > col {
            self.tokens.push_back(Token {
                kind: TokenKind::BlockEnd,
                range: Range::empty_at(self.pos),
            });
            match self.indents.pop() {
                Some(indent) => self.indent = indent,
                None => break,
            }
        }
    }

    // Simple-key protocol.

    /// If a simple key is currently allowed, record the most recently
    /// queued token as a candidate.
    fn save_simple_key_candidate(&mut self, column: u32) {
        if self.is_simple_key_allowed {
            let required =
                self.flow_level == 0 && self.indent >= 0 && self.indent == column as i32;
            self.simple_keys.push(SimpleKey {
                token_number: self.tokens_parsed + self.tokens.len() - 1,
                column,
                line: self.line,
                flow_level: self.flow_level,
                required,
            });
        }
    }

    /// Drop candidates that can no longer be promoted: not on the current
    /// line, or more than 1024 columns back. A required candidate going
    /// stale is an error at the candidate token's position.
    fn remove_stale_simple_key_candidates(&mut self) -> ScanResult {
        let mut index = 0;
        while index < self.simple_keys.len() {
            let sk = self.simple_keys[index];
            if sk.line != self.line || sk.column + 1024 < self.column {
                if sk.required {
                    let at = self.tokens[sk.token_number - self.tokens_parsed].range.start;
                    return Err(self.error("Could not find expected : for simple key", at));
                }
                self.simple_keys.remove(index);
            } else {
                index += 1;
            }
        }
        Ok(())
    }

    /// Remove the innermost candidate if it was saved at flow level `level`.
    fn remove_simple_key_candidates_on_flow_level(&mut self, level: u32) {
        if self
            .simple_keys
            .last()
            .map_or(false, |sk| sk.flow_level == level)
        {
            self.simple_keys.pop();
        }
    }
}

/// Whether a closing quote candidate is preceded by an odd number of
/// backslashes, i.e. is itself escaped. `content` is everything between the
/// opening quote and the candidate.
fn was_escaped(content: &[u8]) -> bool {
    let backslashes = content.iter().rev().take_while(|&&b| b == b'\\').count();
    backslashes % 2 == 1
}
