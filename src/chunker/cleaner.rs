use crate::types::SectionNode;

/// Strips text from each parent's `content` that already appears as a direct
/// child's title or content. Children are cleaned before their parent.
///
/// Recursion depth is bounded by the number of marker kinds in the segment
/// (plus whatever serde_json's own nesting limit allows for loaded files).
pub fn clean_redundant_content(sections: &mut [SectionNode]) {
    for section in sections.iter_mut() {
        if section.subsections.is_empty() {
            continue;
        }
        clean_redundant_content(&mut section.subsections);

        let lower_level: Vec<String> = section
            .subsections
            .iter()
            .flat_map(|child| [child.content.trim(), child.title.trim()])
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect();

        if !section.content.is_empty() {
            section.content = strip_fragments(&section.content, &lower_level);
        }
    }
}

/// Removes every fragment until none of them occurs any more.
fn strip_fragments(content: &str, fragments: &[String]) -> String {
    let mut current = content.trim().to_string();
    loop {
        let mut changed = false;
        for fragment in fragments {
            if current.contains(fragment.as_str()) {
                current = current.replace(fragment.as_str(), "").trim().to_string();
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}
