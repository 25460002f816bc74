use crate::options::BlockOptions;
use crate::parsing::rope::span::Span;

use super::{
    classify::LineClass,
    kinds::{Alignment, ListItemLine, ListKind, Table},
    types::{BlockNode, BlockSegment},
};

/// Multi-line block currently being collected.
#[derive(Debug)]
enum LeafState {
    None,
    Table {
        start: Span,
        last_line_end: usize,
        header: Vec<String>,
        alignments: Vec<Alignment>,
        rows: Vec<Vec<String>>,
    },
    Quote {
        start: Span,
        last_line_end: usize,
        lines: Vec<String>,
    },
    List {
        start: Span,
        last_line_end: usize,
        kind: ListKind,
        first_number: Option<u64>,
        items: Vec<String>,
    },
}

/// How many lines the builder consumed for one `push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Line,
    /// The current line and the lookahead line (a table separator).
    LineAndNext,
}

/// Phase 2 of block parsing: turns classified lines into block segments.
///
/// Recognisers are tried in the order table, blockquote, heading, rule,
/// list, raw. Once a recogniser claims a line no other one sees it.
pub struct BlockBuilder<'o> {
    options: &'o BlockOptions,
    leaf: LeafState,
    out: Vec<BlockNode>,
}

impl<'o> BlockBuilder<'o> {
    pub fn new(options: &'o BlockOptions) -> Self {
        Self {
            options,
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass, next: Option<&LineClass>) -> Advance {
        if self.extend_table(c) {
            return Advance::Line;
        }

        if self.options.tables
            && c.has_pipe
            && let Some(sep) = next.filter(|n| n.is_table_separator)
        {
            self.flush();
            self.leaf = LeafState::Table {
                start: c.line,
                last_line_end: sep.line.end,
                header: Table::split_cells(&c.text),
                alignments: Table::alignments(&sep.text),
                rows: vec![],
            };
            return Advance::LineAndNext;
        }

        if self.options.blockquotes
            && let Some(quoted) = &c.quote
        {
            self.push_quote_line(c.line, quoted);
            return Advance::Line;
        }

        if self.options.headings
            && let Some((level, text)) = &c.heading
        {
            self.emit(
                BlockSegment::Heading {
                    level: *level,
                    text: text.clone(),
                },
                c.line,
            );
            return Advance::Line;
        }

        if self.options.rules && c.is_rule {
            self.emit(BlockSegment::HorizontalRule, c.line);
            return Advance::Line;
        }

        if self.options.lists
            && let Some(item) = &c.list_item
        {
            self.push_list_item(c.line, item);
            return Advance::Line;
        }

        if let Some(token) = &c.protected_block {
            self.emit(
                BlockSegment::ProtectedBlock {
                    token: token.clone(),
                },
                c.line,
            );
            return Advance::Line;
        }

        self.emit(
            BlockSegment::RawLine {
                text: c.text.clone(),
            },
            c.line,
        );
        Advance::Line
    }

    pub fn finish(mut self) -> Vec<BlockNode> {
        // EOF flush: unterminated runs are completed blocks, never dropped.
        self.flush();
        self.out
    }

    fn extend_table(&mut self, c: &LineClass) -> bool {
        match &mut self.leaf {
            LeafState::Table {
                last_line_end,
                rows,
                ..
            } if c.has_pipe => {
                rows.push(Table::split_cells(&c.text));
                *last_line_end = c.line.end;
                true
            }
            _ => false,
        }
    }

    fn push_quote_line(&mut self, line: Span, quoted: &str) {
        if let LeafState::Quote {
            last_line_end,
            lines,
            ..
        } = &mut self.leaf
        {
            lines.push(quoted.to_string());
            *last_line_end = line.end;
            return;
        }
        self.flush();
        self.leaf = LeafState::Quote {
            start: line,
            last_line_end: line.end,
            lines: vec![quoted.to_string()],
        };
    }

    fn push_list_item(&mut self, line: Span, item: &ListItemLine) {
        if let LeafState::List {
            kind,
            last_line_end,
            items,
            ..
        } = &mut self.leaf
            && *kind == item.kind
        {
            items.push(item.text.clone());
            *last_line_end = line.end;
            return;
        }
        // A different marker style closes the current list.
        self.flush();
        self.leaf = LeafState::List {
            start: line,
            last_line_end: line.end,
            kind: item.kind,
            first_number: item.number,
            items: vec![item.text.clone()],
        };
    }

    /// Closes any open multi-line block, then appends `segment`.
    fn emit(&mut self, segment: BlockSegment, line: Span) {
        self.flush();
        self.out.push(BlockNode {
            segment,
            span: line,
        });
    }

    fn flush(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        let (segment, start, end) = match prev {
            LeafState::None => return,
            LeafState::Table {
                start,
                last_line_end,
                header,
                alignments,
                rows,
            } => (
                BlockSegment::Table {
                    header,
                    alignments,
                    rows,
                },
                start,
                last_line_end,
            ),
            LeafState::Quote {
                start,
                last_line_end,
                lines,
            } => (BlockSegment::Blockquote { lines }, start, last_line_end),
            LeafState::List {
                start,
                last_line_end,
                kind,
                first_number,
                items,
            } => (
                BlockSegment::List {
                    kind,
                    start: first_number.filter(|_| kind == ListKind::Ordered),
                    items,
                },
                start,
                last_line_end,
            ),
        };
        self.out.push(BlockNode {
            segment,
            span: Span {
                start: start.start,
                end,
            },
        });
    }
}
