use crate::chunker::markers::{match_marker, LevelMapping, MarkerKind, TableTracker};
use crate::chunker::sanitize::is_all_uppercase;
use crate::types::SectionNode;
use std::collections::HashMap;

/// Token prefix for text that sits outside any marker.
pub const UNTAGGED_PREFIX: &str = "txt";

pub fn section_id(doc_id: &str, prefix: &str, sequence: usize) -> String {
    format!("{doc_id}_{prefix}{sequence:03}")
}

#[derive(Debug)]
struct OpenNode {
    depth: usize,
    node: SectionNode,
    lines: Vec<String>,
    awaiting_title: bool,
}

impl OpenNode {
    fn push_paragraph(&mut self, paragraph: &str, is_table: bool) {
        if self.awaiting_title {
            self.awaiting_title = false;
            if !is_table && self.lines.is_empty() && is_all_uppercase(paragraph) {
                self.node.title = paragraph.to_string();
                return;
            }
        }
        self.lines.push(paragraph.to_string());
    }

    fn finish(mut self) -> SectionNode {
        self.node.content = self.lines.join("\n");
        self.node
    }
}

struct TreeBuilder<'a> {
    doc_id: &'a str,
    levels: &'a LevelMapping,
    counters: HashMap<MarkerKind, usize>,
    roots: Vec<SectionNode>,
    stack: Vec<OpenNode>,
    untagged: Option<OpenNode>,
}

impl<'a> TreeBuilder<'a> {
    fn new(doc_id: &'a str, levels: &'a LevelMapping) -> Self {
        Self {
            doc_id,
            levels,
            counters: HashMap::new(),
            roots: Vec::new(),
            stack: Vec::new(),
            untagged: None,
        }
    }

    fn next_id(&mut self, kind: MarkerKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        section_id(self.doc_id, kind.id_prefix(), *counter)
    }

    /// Pops every open node at `depth` or deeper, attaching each to its parent.
    fn close_to(&mut self, depth: usize) {
        while self.stack.last().is_some_and(|open| open.depth >= depth) {
            let Some(open) = self.stack.pop() else {
                break;
            };
            let finished = open.finish();
            match self.stack.last_mut() {
                Some(parent) => parent.node.subsections.push(finished),
                None => self.roots.push(finished),
            }
        }
    }

    fn flush_untagged(&mut self) {
        if let Some(open) = self.untagged.take() {
            self.roots.push(open.finish());
        }
    }

    fn open(&mut self, kind: MarkerKind, depth: usize, header: &str, remainder: &str) {
        self.flush_untagged();
        self.close_to(depth);

        let mut open = OpenNode {
            depth,
            node: SectionNode {
                id: self.next_id(kind),
                header: header.to_string(),
                ..SectionNode::default()
            },
            lines: Vec::new(),
            awaiting_title: remainder.is_empty(),
        };
        if !remainder.is_empty() {
            if is_all_uppercase(remainder) {
                open.node.title = remainder.to_string();
            } else {
                open.lines.push(remainder.to_string());
            }
        }
        self.stack.push(open);
    }

    fn push_paragraph(&mut self, paragraph: &str, is_table: bool) {
        if let Some(open) = self.stack.last_mut() {
            open.push_paragraph(paragraph, is_table);
            return;
        }
        let doc_id = self.doc_id;
        self.untagged
            .get_or_insert_with(|| OpenNode {
                depth: 0,
                node: SectionNode {
                    id: section_id(doc_id, UNTAGGED_PREFIX, 1),
                    ..SectionNode::default()
                },
                lines: Vec::new(),
                awaiting_title: false,
            })
            .push_paragraph(paragraph, is_table);
    }

    fn finish(mut self) -> Vec<SectionNode> {
        self.flush_untagged();
        self.close_to(0);
        self.roots
    }
}

/// Builds the section forest for one segment.
///
/// Paragraphs matching a marker kind present in `levels` open a node at that
/// kind's depth, nested under the closest open node of smaller depth. Other
/// paragraphs (table lines included, verbatim) become content of the innermost
/// open node. Text before the first marker becomes a single untagged leaf.
pub fn parse_hierarchy(text: &str, levels: &LevelMapping, doc_id: &str) -> Vec<SectionNode> {
    let mut builder = TreeBuilder::new(doc_id, levels);
    let mut tables = TableTracker::default();

    for line in text.lines() {
        let paragraph = line.trim();
        if paragraph.is_empty() {
            continue;
        }
        let is_table = tables.observe(paragraph);
        if !is_table {
            if let Some(found) = match_marker(paragraph) {
                if let Some(depth) = builder.levels.depth_of(found.kind) {
                    builder.open(found.kind, depth, found.header, found.remainder);
                    continue;
                }
            }
        }
        builder.push_paragraph(paragraph, is_table);
    }

    builder.finish()
}

/// One untagged node holding the whole segment, used when no markers exist.
pub fn untagged_document(text: &str, doc_id: &str) -> Vec<SectionNode> {
    vec![SectionNode {
        id: section_id(doc_id, UNTAGGED_PREFIX, 1),
        content: text.trim().to_string(),
        ..SectionNode::default()
    }]
}
