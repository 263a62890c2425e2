use crate::tokenizer::Range;

/// Index of a node in its document's arena.
///
/// Ids are plain indices: cheap to copy, never owning, and only meaningful
/// for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub(crate) u32);

/// Presentation style of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingStyle {
    Block,
    Flow,
    /// The `[key: value]` shorthand: a mapping holding exactly one entry,
    /// living directly at a flow-sequence entry position.
    Inline,
}

/// Presentation style of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStyle {
    Block,
    Flow,
    /// A block sequence whose `- ` entries sit at the same column as their
    /// enclosing mapping key; it has no `BlockEnd` of its own.
    Indentless,
}

/// Broad classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Scalar,
    Sequence,
    Mapping,
    KeyValue,
    Alias,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SequenceState {
    pub(crate) style: SequenceStyle,
    pub(crate) at_beginning: bool,
    pub(crate) at_end: bool,
    pub(crate) current: Option<NodeId>,
    /// In flow style, whether a `,` (or the opening `[`) directly precedes
    /// the position we are at; an entry is only legal when it does.
    pub(crate) after_entry_separator: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct MappingState {
    pub(crate) style: MappingStyle,
    pub(crate) at_beginning: bool,
    pub(crate) at_end: bool,
    pub(crate) current: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeData {
    Null,
    Scalar { value: Range },
    Alias { name: Range },
    Sequence(SequenceState),
    Mapping(MappingState),
    KeyValue { key: Option<NodeId>, value: Option<NodeId> },
}

/// A single node of the lazy document tree.
///
/// Nodes are created as iterators advance over their start tokens and never
/// own each other; the document's arena owns them all.
#[derive(Debug)]
pub struct Node {
    pub(crate) anchor: Option<Range>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(anchor: Option<Range>, data: NodeData) -> Self {
        Node { anchor, data }
    }

    pub(crate) fn sequence(anchor: Option<Range>, style: SequenceStyle) -> Self {
        Node::new(
            anchor,
            NodeData::Sequence(SequenceState {
                style,
                at_beginning: true,
                at_end: false,
                current: None,
                after_entry_separator: true,
            }),
        )
    }

    pub(crate) fn mapping(anchor: Option<Range>, style: MappingStyle) -> Self {
        Node::new(
            anchor,
            NodeData::Mapping(MappingState {
                style,
                at_beginning: true,
                at_end: false,
                current: None,
            }),
        )
    }

    /// True for a collection whose iteration has not started yet.
    pub fn is_at_beginning(&self) -> bool {
        match self.data {
            NodeData::Sequence(state) => state.at_beginning,
            NodeData::Mapping(state) => state.at_beginning,
            _ => false,
        }
    }

    /// True for a collection whose iteration has finished.
    pub fn is_at_end(&self) -> bool {
        match self.data {
            NodeData::Sequence(state) => state.at_end,
            NodeData::Mapping(state) => state.at_end,
            _ => false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Null => NodeKind::Null,
            NodeData::Scalar { .. } => NodeKind::Scalar,
            NodeData::Alias { .. } => NodeKind::Alias,
            NodeData::Sequence(_) => NodeKind::Sequence,
            NodeData::Mapping(_) => NodeKind::Mapping,
            NodeData::KeyValue { .. } => NodeKind::KeyValue,
        }
    }

    /// The `&name` anchor range, if the node carried one.
    pub fn anchor(&self) -> Option<Range> {
        self.anchor
    }

    pub fn sequence_style(&self) -> Option<SequenceStyle> {
        match self.data {
            NodeData::Sequence(state) => Some(state.style),
            _ => None,
        }
    }

    pub fn mapping_style(&self) -> Option<MappingStyle> {
        match self.data {
            NodeData::Mapping(state) => Some(state.style),
            _ => None,
        }
    }
}
