//! The lazy document tree: nodes materialize just-in-time as iterators
//! advance, and skipping a node consumes exactly the tokens it owns.

mod node;

pub use node::{MappingStyle, Node, NodeId, NodeKind, SequenceStyle};

use std::borrow::Cow;

use node::NodeData;

use crate::error::DiagnosticSink;
use crate::escaper;
use crate::tokenizer::{Range, Scanner, Token, TokenKind};

/// Top-level reader over one YAML stream.
///
/// The constructor consumes the implicit `StreamStart`. Documents are
/// produced one at a time by [`Stream::next_document`]; a document drains
/// the tokens it owns when dropped, which is what lets the stream reuse the
/// scanner for the following document.
pub struct Stream<'input, S: DiagnosticSink> {
    scanner: Scanner<'input, S>,
    begun: bool,
}

impl<'input, S: DiagnosticSink> Stream<'input, S> {
    pub fn new(input: &'input [u8], sink: S) -> Self {
        let mut scanner = Scanner::new(input, sink);
        scanner.pop();
        Stream {
            scanner,
            begun: false,
        }
    }

    /// The next document of the stream.
    ///
    /// The first call always yields a document (an empty stream parses to a
    /// null root). Later calls yield `None` once `StreamEnd` is at the head
    /// or the scanner failed. Only one document can be live at a time; it
    /// must be dropped before the next one is requested.
    pub fn next_document(&mut self) -> Option<Document<'_, 'input, S>> {
        if self.begun
            && (self.scanner.failed() || self.scanner.peek().kind == TokenKind::StreamEnd)
        {
            return None;
        }
        self.begun = true;
        Some(Document::new(&mut self.scanner))
    }

    /// Drain every document of the stream.
    pub fn skip(&mut self) {
        while self.next_document().is_some() {}
    }

    pub fn failed(&self) -> bool {
        self.scanner.failed()
    }

    pub fn input(&self) -> &'input [u8] {
        self.scanner.input()
    }
}

/// Parsing state for exactly one `---`…`...` unit.
///
/// The document owns an arena of nodes; handles ([`NodeId`]) index into it
/// and are only meaningful for this document. All iteration is forward-only
/// and single-pass.
pub struct Document<'s, 'input, S: DiagnosticSink> {
    scanner: &'s mut Scanner<'input, S>,
    nodes: Vec<Node>,
    root: Option<Option<NodeId>>,
}

impl<'s, 'input, S: DiagnosticSink> Document<'s, 'input, S> {
    fn new(scanner: &'s mut Scanner<'input, S>) -> Self {
        let mut doc = Document {
            scanner,
            nodes: Vec::new(),
            root: None,
        };
        if doc.parse_directives() {
            doc.expect_token(TokenKind::DocumentStart);
        }
        if doc.scanner.peek().kind == TokenKind::DocumentStart {
            doc.scanner.pop();
        }
        doc
    }

    /// Consume leading directives. Version numbers are not validated.
    fn parse_directives(&mut self) -> bool {
        let mut saw_directive = false;
        loop {
            match self.scanner.peek().kind {
                TokenKind::VersionDirective | TokenKind::TagDirective => {
                    self.scanner.pop();
                    saw_directive = true;
                }
                _ => break,
            }
        }
        saw_directive
    }

    fn expect_token(&mut self, kind: TokenKind) -> bool {
        let token = self.scanner.pop();
        if token.kind != kind {
            self.report("Unexpected token", &token);
            return false;
        }
        true
    }

    fn report(&mut self, message: &str, token: &Token) {
        self.scanner.report_error(message, token.range.start);
    }

    pub fn failed(&self) -> bool {
        self.scanner.failed()
    }

    pub fn input(&self) -> &'input [u8] {
        self.scanner.input()
    }

    /// The document's root node, parsed on first use. `None` only on a
    /// fatal parse error.
    pub fn root(&mut self) -> Option<NodeId> {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.parse_block_node();
        self.root = Some(root);
        root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// The node's `&name` anchor, without the sigil.
    pub fn anchor_name(&self, id: NodeId) -> Option<&'input [u8]> {
        self.node(id)
            .anchor
            .map(|range| range.slice(self.scanner.input()))
    }

    /// A scalar's exact input bytes, including any surrounding quotes.
    pub fn scalar_raw(&self, id: NodeId) -> Option<&'input [u8]> {
        match self.node(id).data {
            NodeData::Scalar { value } => Some(value.slice(self.scanner.input())),
            _ => None,
        }
    }

    /// A scalar's decoded value: quotes stripped, escapes resolved, line
    /// breaks folded. Returns a direct view of the input when no rewriting
    /// is needed. A malformed escape reports a diagnostic and yields the
    /// empty value.
    pub fn scalar_value(&mut self, id: NodeId) -> Option<Cow<'input, [u8]>> {
        let value = match self.node(id).data {
            NodeData::Scalar { value } => value,
            _ => return None,
        };
        let raw = value.slice(self.scanner.input());
        match escaper::decode_scalar(raw) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                self.scanner
                    .report_error(err.message, value.start + err.offset);
                Some(Cow::Borrowed(&[][..]))
            }
        }
    }

    /// An alias's `*name` referent name, without the sigil.
    pub fn alias_name(&self, id: NodeId) -> Option<&'input [u8]> {
        match self.node(id).data {
            NodeData::Alias { name } => Some(name.slice(self.scanner.input())),
            _ => None,
        }
    }

    /// Parse one node, consuming the tokens appropriate to its kind.
    /// Returns `None` on a fatal error (`Error` token or duplicate anchor).
    fn parse_block_node(&mut self) -> Option<NodeId> {
        let mut anchor: Option<Range> = None;
        loop {
            let token = *self.scanner.peek();
            match token.kind {
                TokenKind::Alias => {
                    self.scanner.pop();
                    return Some(self.alloc(Node::new(
                        None,
                        NodeData::Alias {
                            name: token.range.tail(),
                        },
                    )));
                }
                TokenKind::Anchor => {
                    if anchor.is_some() {
                        self.report("Already encountered an anchor for this node!", &token);
                        return None;
                    }
                    anchor = Some(token.range.tail());
                    self.scanner.pop();
                }
                TokenKind::Tag => {
                    // Tags are scanned but not resolved.
                    self.scanner.pop();
                }
                _ => break,
            }
        }

        let token = *self.scanner.peek();
        let node = match token.kind {
            // An unindented BlockEntry sequence; it is not terminated by a
            // BlockEnd, and the sequence's own iteration eats the token.
            TokenKind::BlockEntry => Node::sequence(anchor, SequenceStyle::Indentless),
            TokenKind::BlockSequenceStart => {
                self.scanner.pop();
                Node::sequence(anchor, SequenceStyle::Block)
            }
            TokenKind::BlockMappingStart => {
                self.scanner.pop();
                Node::mapping(anchor, MappingStyle::Block)
            }
            TokenKind::FlowSequenceStart => {
                self.scanner.pop();
                Node::sequence(anchor, SequenceStyle::Flow)
            }
            TokenKind::FlowMappingStart => {
                self.scanner.pop();
                Node::mapping(anchor, MappingStyle::Flow)
            }
            TokenKind::Scalar => {
                self.scanner.pop();
                Node::new(anchor, NodeData::Scalar { value: token.range })
            }
            // The KeyValue node eats the Key itself so it can detect null
            // keys.
            TokenKind::Key => Node::mapping(anchor, MappingStyle::Inline),
            TokenKind::Error => return None,
            _ => Node::new(anchor, NodeData::Null),
        };
        Some(self.alloc(node))
    }

    /// Advance a sequence by one entry, skipping whatever the previous
    /// entry left unconsumed. `None` once the sequence is exhausted.
    pub fn next_entry(&mut self, seq: NodeId) -> Option<NodeId> {
        loop {
            let state = match self.node(seq).data {
                NodeData::Sequence(state) => state,
                _ => panic!("next_entry on a non-sequence node"),
            };
            if state.at_end {
                return None;
            }
            if self.scanner.failed() {
                self.end_sequence(seq);
                return None;
            }
            if let Some(current) = state.current {
                self.skip(current);
            }
            self.sequence_mut(seq).at_beginning = false;

            let token = *self.scanner.peek();
            match state.style {
                SequenceStyle::Block => match token.kind {
                    TokenKind::BlockEntry => {
                        self.scanner.pop();
                        return self.parse_sequence_entry(seq);
                    }
                    TokenKind::BlockEnd => {
                        self.scanner.pop();
                        self.end_sequence(seq);
                        return None;
                    }
                    TokenKind::Error => {
                        self.end_sequence(seq);
                        return None;
                    }
                    _ => {
                        self.report("Unexpected token. Expected Block Entry or Block End.", &token);
                        self.end_sequence(seq);
                        return None;
                    }
                },
                SequenceStyle::Indentless => match token.kind {
                    TokenKind::BlockEntry => {
                        self.scanner.pop();
                        return self.parse_sequence_entry(seq);
                    }
                    _ => {
                        self.end_sequence(seq);
                        return None;
                    }
                },
                SequenceStyle::Flow => match token.kind {
                    TokenKind::FlowEntry => {
                        self.scanner.pop();
                        self.sequence_mut(seq).after_entry_separator = true;
                    }
                    TokenKind::FlowSequenceEnd => {
                        self.scanner.pop();
                        self.end_sequence(seq);
                        return None;
                    }
                    TokenKind::Error => {
                        self.end_sequence(seq);
                        return None;
                    }
                    TokenKind::StreamEnd | TokenKind::DocumentEnd | TokenKind::DocumentStart => {
                        self.report("Could not find closing ]!", &token);
                        self.end_sequence(seq);
                        return None;
                    }
                    _ => {
                        if !state.after_entry_separator {
                            self.report("Expected , between entries!", &token);
                            self.end_sequence(seq);
                            return None;
                        }
                        self.sequence_mut(seq).after_entry_separator = false;
                        return self.parse_sequence_entry(seq);
                    }
                },
            }
        }
    }

    fn parse_sequence_entry(&mut self, seq: NodeId) -> Option<NodeId> {
        match self.parse_block_node() {
            Some(entry) => {
                self.sequence_mut(seq).current = Some(entry);
                Some(entry)
            }
            None => {
                self.end_sequence(seq);
                None
            }
        }
    }

    /// Advance a mapping by one key-value entry. `None` once exhausted.
    pub fn next_key_value(&mut self, map: NodeId) -> Option<NodeId> {
        loop {
            let state = match self.node(map).data {
                NodeData::Mapping(state) => state,
                _ => panic!("next_key_value on a non-mapping node"),
            };
            if state.at_end {
                return None;
            }
            if self.scanner.failed() {
                self.end_mapping(map);
                return None;
            }
            if let Some(current) = state.current {
                self.skip(current);
                if state.style == MappingStyle::Inline {
                    self.end_mapping(map);
                    return None;
                }
            }
            self.mapping_mut(map).at_beginning = false;

            let token = *self.scanner.peek();
            match token.kind {
                // The KeyValue node eats the Key so it can detect null keys.
                TokenKind::Key | TokenKind::Scalar => {
                    let entry =
                        self.alloc(Node::new(None, NodeData::KeyValue { key: None, value: None }));
                    self.mapping_mut(map).current = Some(entry);
                    return Some(entry);
                }
                _ => {}
            }
            if state.style == MappingStyle::Block {
                match token.kind {
                    TokenKind::BlockEnd => {
                        self.scanner.pop();
                    }
                    TokenKind::Error => {}
                    _ => {
                        self.report("Unexpected token. Expected Key or Block End.", &token);
                    }
                }
                self.end_mapping(map);
                return None;
            }
            match token.kind {
                TokenKind::FlowEntry => {
                    self.scanner.pop();
                }
                TokenKind::FlowMappingEnd => {
                    self.scanner.pop();
                    self.end_mapping(map);
                    return None;
                }
                TokenKind::Error => {
                    self.end_mapping(map);
                    return None;
                }
                _ => {
                    self.report(
                        "Unexpected token. Expected Key, Flow Entry, or Flow Mapping End.",
                        &token,
                    );
                    self.end_mapping(map);
                    return None;
                }
            }
        }
    }

    /// The entry's key, parsed lazily. An absent key (`: value`, `? :`) is
    /// a Null node.
    pub fn key(&mut self, kv: NodeId) -> NodeId {
        if let NodeData::KeyValue { key: Some(key), .. } = self.node(kv).data {
            return key;
        }
        match self.node(kv).data {
            NodeData::KeyValue { .. } => {}
            _ => panic!("key on a non-key-value node"),
        }

        // Implicit null keys.
        let key = match self.scanner.peek().kind {
            TokenKind::BlockEnd | TokenKind::Value | TokenKind::Error => self.alloc_null(),
            first => {
                if first == TokenKind::Key {
                    self.scanner.pop();
                }
                // Explicit null keys.
                match self.scanner.peek().kind {
                    TokenKind::BlockEnd | TokenKind::Value => self.alloc_null(),
                    _ => match self.parse_block_node() {
                        Some(key) => key,
                        None => self.alloc_null(),
                    },
                }
            }
        };
        self.set_key(kv, key);
        key
    }

    /// The entry's value, parsed lazily; forces the key (and its token
    /// span) first. A missing value is a Null node.
    pub fn value(&mut self, kv: NodeId) -> NodeId {
        if let NodeData::KeyValue { value: Some(value), .. } = self.node(kv).data {
            return value;
        }

        let key = self.key(kv);
        self.skip(key);
        if self.scanner.failed() {
            let value = self.alloc_null();
            self.set_value(kv, value);
            return value;
        }

        let token = *self.scanner.peek();
        let value = match token.kind {
            // Implicit null values.
            TokenKind::BlockEnd
            | TokenKind::FlowMappingEnd
            | TokenKind::Key
            | TokenKind::FlowEntry
            | TokenKind::Error => self.alloc_null(),
            TokenKind::Value => {
                self.scanner.pop();
                // Explicit null values.
                match self.scanner.peek().kind {
                    TokenKind::BlockEnd | TokenKind::Key => self.alloc_null(),
                    _ => match self.parse_block_node() {
                        Some(value) => value,
                        None => self.alloc_null(),
                    },
                }
            }
            _ => {
                self.report("Unexpected token in Key Value.", &token);
                self.alloc_null()
            }
        };
        self.set_value(kv, value);
        value
    }

    /// Consume exactly the remaining token span the node owns, so that
    /// sibling iteration resumes at the correct position. An unvisited
    /// collection is iterated to its end, entry by entry.
    pub fn skip(&mut self, id: NodeId) {
        match self.node(id).data {
            NodeData::Null | NodeData::Scalar { .. } | NodeData::Alias { .. } => {}
            NodeData::KeyValue { .. } => {
                let key = self.key(id);
                self.skip(key);
                let value = self.value(id);
                self.skip(value);
            }
            NodeData::Sequence(state) => {
                if !state.at_end {
                    while self.next_entry(id).is_some() {}
                }
            }
            NodeData::Mapping(state) => {
                if !state.at_end {
                    while self.next_key_value(id).is_some() {}
                }
            }
        }
    }

    /// Finish parsing this document's tokens: drain the root and consume a
    /// trailing `DocumentEnd` if one follows.
    fn drain(&mut self) {
        if self.scanner.failed() {
            return;
        }
        if let Some(root) = self.root() {
            self.skip(root);
        }
        if !self.scanner.failed() && self.scanner.peek().kind == TokenKind::DocumentEnd {
            self.scanner.pop();
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn alloc_null(&mut self) -> NodeId {
        self.alloc(Node::new(None, NodeData::Null))
    }

    fn sequence_mut(&mut self, id: NodeId) -> &mut node::SequenceState {
        match &mut self.nodes[id.0 as usize].data {
            NodeData::Sequence(state) => state,
            _ => panic!("node is not a sequence"),
        }
    }

    fn mapping_mut(&mut self, id: NodeId) -> &mut node::MappingState {
        match &mut self.nodes[id.0 as usize].data {
            NodeData::Mapping(state) => state,
            _ => panic!("node is not a mapping"),
        }
    }

    fn end_sequence(&mut self, id: NodeId) {
        let state = self.sequence_mut(id);
        state.at_end = true;
        state.current = None;
    }

    fn end_mapping(&mut self, id: NodeId) {
        let state = self.mapping_mut(id);
        state.at_end = true;
        state.current = None;
    }

    fn set_key(&mut self, kv: NodeId, key: NodeId) {
        match &mut self.nodes[kv.0 as usize].data {
            NodeData::KeyValue { key: slot, .. } => *slot = Some(key),
            _ => panic!("node is not a key-value entry"),
        }
    }

    fn set_value(&mut self, kv: NodeId, value: NodeId) {
        match &mut self.nodes[kv.0 as usize].data {
            NodeData::KeyValue { value: slot, .. } => *slot = Some(value),
            _ => panic!("node is not a key-value entry"),
        }
    }
}

impl<S: DiagnosticSink> Drop for Document<'_, '_, S> {
    fn drop(&mut self) {
        self.drain();
    }
}
