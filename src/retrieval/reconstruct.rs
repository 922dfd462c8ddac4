use crate::types::{SectionNode, StructuredFile};

pub const DEFAULT_INDENT_WIDTH: usize = 4;
pub const DOCUMENT_SEPARATOR_WIDTH: usize = 80;

/// How headers are rendered for each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// `Khoản 2., Điều 3., Chương I`: own header followed by every ancestor header.
    FullHierarchy,
    /// Only the node's own header.
    Local,
}

#[derive(Debug, Clone, Copy)]
pub struct Reconstructor {
    indent_width: usize,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl Reconstructor {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }

    /// Renders a node and its descendants.
    pub fn section(&self, section: &SectionNode, mode: HeaderMode) -> String {
        let mut out = String::new();
        let mut ancestors: Vec<&str> = Vec::new();
        self.render_node(section, 0, mode, &mut ancestors, &mut out);
        out
    }

    fn render_node<'a>(
        &self,
        section: &'a SectionNode,
        level: usize,
        mode: HeaderMode,
        ancestors: &mut Vec<&'a str>,
        out: &mut String,
    ) {
        let indent = self.indent(level);
        let header = section.header.as_str();

        match mode {
            HeaderMode::FullHierarchy => {
                let reference = ancestors
                    .iter()
                    .copied()
                    .chain(std::iter::once(header))
                    .rev()
                    .filter(|h| !h.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                if !reference.is_empty() {
                    out.push_str(&format!("{indent}{reference}\n"));
                }
            }
            HeaderMode::Local => {
                if !header.is_empty() {
                    out.push_str(&format!("{indent}{header}\n"));
                }
            }
        }

        if !section.title.is_empty() {
            out.push_str(&format!("{indent}{}\n", section.title));
        }
        if !section.content.is_empty() {
            out.push_str(&render_content(&section.content, &indent));
        }

        ancestors.push(header);
        for child in &section.subsections {
            self.render_node(child, level + 1, mode, ancestors, out);
        }
        ancestors.pop();
    }

    /// Whole-file reconstruction with full ancestor references.
    pub fn file(&self, file: &StructuredFile) -> String {
        let separator = "-".repeat(DOCUMENT_SEPARATOR_WIDTH);
        let mut out = String::new();
        for document in &file.documents {
            for article in &document.articles {
                out.push_str(&self.section(article, HeaderMode::FullHierarchy));
            }
            out.push_str(&format!("\n{separator}\n\n"));
        }
        out
    }
}

/// Renders content lines at `indent`, turning `<tr>`/`<td>` rows into `a | b` lines.
pub fn render_content(content: &str, indent: &str) -> String {
    let mut text = String::new();
    let mut row_cells: Vec<String> = Vec::new();

    for raw in content.split('\n') {
        let line = raw.trim();
        match line {
            "<table>" => {}
            "</table>" => text.push('\n'),
            "<tr>" => row_cells.clear(),
            "</tr>" => {
                text.push_str(&format!("{indent}{}\n", row_cells.join(" | ")));
                row_cells.clear();
            }
            _ => {
                if let Some(cell) = line.strip_prefix("<td>").and_then(|l| l.strip_suffix("</td>")) {
                    row_cells.push(cell.trim().to_string());
                } else if line.is_empty() {
                    text.push('\n');
                } else {
                    text.push_str(&format!("{indent}{line}\n"));
                }
            }
        }
    }
    text
}

pub fn reconstruct_text(file: &StructuredFile) -> String {
    Reconstructor::default().file(file)
}

/// Renders one located node without its ancestor chain.
pub fn render_section(section: &SectionNode) -> String {
    Reconstructor::default().section(section, HeaderMode::Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> SectionNode {
        SectionNode {
            id: "D_art003".to_string(),
            header: "Điều 3.".to_string(),
            title: String::new(),
            content: "Giải thích từ ngữ".to_string(),
            subsections: vec![SectionNode {
                id: "D_cl001".to_string(),
                header: "1.".to_string(),
                title: String::new(),
                content: "Khoản một".to_string(),
                subsections: vec![],
            }],
        }
    }

    #[test]
    fn full_hierarchy_prefixes_ancestors_innermost_first() {
        let text = Reconstructor::default().section(&tree(), HeaderMode::FullHierarchy);
        assert_eq!(text, "Điều 3.\nGiải thích từ ngữ\n    1., Điều 3.\n    Khoản một\n");
    }

    #[test]
    fn local_mode_renders_own_headers_only() {
        let text = render_section(&tree());
        assert_eq!(text, "Điều 3.\nGiải thích từ ngữ\n    1.\n    Khoản một\n");
    }

    #[test]
    fn renders_table_rows_as_pipes() {
        let content = "Biểu phí\n<table>\n<tr>\n<td>STT</td>\n<td>Mức phí</td>\n</tr>\n</table>";
        assert_eq!(render_content(content, "  "), "  Biểu phí\n  STT | Mức phí\n\n");
    }
}
