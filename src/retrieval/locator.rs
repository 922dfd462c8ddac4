use crate::error::{ChunkError, Result};
use crate::retrieval::reconstruct::{HeaderMode, Reconstructor};
use crate::types::{marker_token, SectionNode, StructuredDocument, StructuredFile};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static APPENDIX_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_appendix_(\d+)$").unwrap());

/// What a tree search is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionQuery<'a> {
    /// Full `docid_marker` id.
    Exact(&'a str),
    /// Any node whose id ends with `_<token>`.
    MarkerSuffix(&'a str),
}

impl SectionQuery<'_> {
    pub fn matches(&self, node: &SectionNode) -> bool {
        match *self {
            SectionQuery::Exact(id) => node.id == id,
            SectionQuery::MarkerSuffix(token) => node
                .id
                .strip_suffix(token)
                .is_some_and(|head| head.ends_with('_')),
        }
    }
}

/// Pre-order search over a forest.
pub fn find_section<'a>(nodes: &'a [SectionNode], query: SectionQuery<'_>) -> Option<&'a SectionNode> {
    for node in nodes {
        if query.matches(node) {
            return Some(node);
        }
        if let Some(found) = find_section(&node.subsections, query) {
            return Some(found);
        }
    }
    None
}

fn find_in_documents<'a, I>(documents: I, query: SectionQuery<'_>) -> Option<&'a SectionNode>
where
    I: IntoIterator<Item = &'a StructuredDocument>,
{
    documents
        .into_iter()
        .find_map(|document| find_section(&document.articles, query))
}

/// Document number a section-id prefix points at: `N` for `..._appendix_NN`,
/// otherwise the main body.
pub fn doc_number_of_prefix(prefix: &str) -> u32 {
    APPENDIX_SUFFIX_RE
        .captures(prefix)
        .and_then(|captures| captures[1].parse().ok())
        .unwrap_or(1)
}

/// Locates a node by exact id, falling back to its marker token.
///
/// The fallback searches the document whose id equals the prefix of
/// `section_id` first, then documents with the same `doc_number` as the
/// prefix (main body or `_appendix_NN`), then every other document in file order.
pub fn locate_section<'a>(section_id: &str, file: &'a StructuredFile) -> Option<&'a SectionNode> {
    if let Some(found) = find_in_documents(&file.documents, SectionQuery::Exact(section_id)) {
        tracing::debug!("[Locator] Exact match for id '{}'", section_id);
        return Some(found);
    }

    let token = marker_token(section_id);
    if token.is_empty() {
        return None;
    }
    let query = SectionQuery::MarkerSuffix(token);
    let prefix = section_id
        .rsplit_once('_')
        .map(|(prefix, _)| prefix)
        .unwrap_or_default();

    let target = doc_number_of_prefix(prefix);
    let rank = |document: &StructuredDocument| {
        if document.doc_id == prefix {
            0
        } else if document.doc_number == target {
            1
        } else {
            2
        }
    };
    let mut ordered: Vec<&StructuredDocument> = file.documents.iter().collect();
    ordered.sort_by_key(|document| rank(*document));
    let found = find_in_documents(ordered, query)?;
    tracing::warn!(
        "[Locator] Exact match for id '{}' not found. Using fallback match '{}' -> '{}'.",
        section_id,
        token,
        found.id
    );
    Some(found)
}

/// Reconstructed text of the section, or `None` when it is absent.
pub fn retrieve_section_text(section_id: &str, file: &StructuredFile) -> Option<String> {
    retrieve_section_text_with(section_id, file, Reconstructor::default())
}

/// Same as [`retrieve_section_text`], rendered with local headers by `renderer`.
pub fn retrieve_section_text_with(
    section_id: &str,
    file: &StructuredFile,
    renderer: Reconstructor,
) -> Option<String> {
    locate_section(section_id, file).map(|node| renderer.section(node, HeaderMode::Local))
}

pub fn load_structured_file(path: &Path) -> Result<StructuredFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| ChunkError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| ChunkError::json(path, e))
}

pub fn retrieve_section_text_from_path(section_id: &str, json_path: &Path) -> Result<Option<String>> {
    retrieve_section_text_from_path_with(section_id, json_path, Reconstructor::default())
}

pub fn retrieve_section_text_from_path_with(
    section_id: &str,
    json_path: &Path,
    renderer: Reconstructor,
) -> Result<Option<String>> {
    let file = load_structured_file(json_path)?;
    if file.documents.is_empty() {
        tracing::warn!("[Locator] No documents found in {}", json_path.display());
    }
    Ok(retrieve_section_text_with(section_id, &file, renderer))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHit {
    pub path: PathBuf,
    pub text: String,
}

/// Structured JSON files under `folder`, in lexicographic path order.
pub fn structured_files_in(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("[Locator] Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

/// First file (in path order) that yields the section wins.
pub fn retrieve_section_text_from_folder(section_id: &str, folder: &Path) -> Result<Option<SectionHit>> {
    retrieve_section_text_from_folder_with(section_id, folder, Reconstructor::default())
}

pub fn retrieve_section_text_from_folder_with(
    section_id: &str,
    folder: &Path,
    renderer: Reconstructor,
) -> Result<Option<SectionHit>> {
    if !folder.is_dir() {
        tracing::error!("[Locator] Folder does not exist: {}", folder.display());
        return Err(ChunkError::FolderNotFound(folder.to_path_buf()));
    }

    for path in structured_files_in(folder) {
        tracing::debug!("[Locator] Searching for '{}' in {}", section_id, path.display());
        let file = match load_structured_file(&path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!("[Locator] {}", err);
                continue;
            }
        };
        if let Some(text) = retrieve_section_text_with(section_id, &file, renderer) {
            tracing::info!("[Locator] Section id '{}' found in {}", section_id, path.display());
            return Ok(Some(SectionHit { path, text }));
        }
    }

    tracing::warn!(
        "[Locator] Section id '{}' not found in any JSON file within folder: {}",
        section_id,
        folder.display()
    );
    Ok(None)
}

pub fn not_found_message(section_id: &str, folder: &Path) -> String {
    format!(
        "Section id '{}' not found in any JSON file within folder: {}",
        section_id,
        folder.display()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub doc_id: String,
    pub depth: usize,
    pub id: String,
    pub header: String,
    pub title: String,
}

/// Every node of every document in pre-order.
pub fn outline(file: &StructuredFile) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    for document in &file.documents {
        for article in &document.articles {
            article.walk(&mut |node, depth| {
                entries.push(OutlineEntry {
                    doc_id: document.doc_id.clone(),
                    depth,
                    id: node.id.clone(),
                    header: node.header.clone(),
                    title: node.title.clone(),
                });
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> SectionNode {
        SectionNode {
            id: id.to_string(),
            ..SectionNode::default()
        }
    }

    #[test]
    fn suffix_query_requires_separator() {
        let query = SectionQuery::MarkerSuffix("art003");
        assert!(query.matches(&leaf("DOC_art003")));
        assert!(!query.matches(&leaf("DOC_part003")));
        assert!(!query.matches(&leaf("DOC_art0031")));
    }

    #[test]
    fn prefix_doc_number_follows_appendix_suffix() {
        assert_eq!(doc_number_of_prefix("15/2020/NĐ-CP"), 1);
        assert_eq!(doc_number_of_prefix("16/2021/NĐ-CP_appendix_03"), 3);
        assert_eq!(doc_number_of_prefix(""), 1);
    }

    #[test]
    fn finds_nested_nodes_in_pre_order() {
        let mut parent = leaf("D_art001");
        parent.subsections = vec![leaf("D_cl001"), leaf("D_cl002")];
        let forest = vec![parent, leaf("D_art002")];
        let found = find_section(&forest, SectionQuery::Exact("D_cl002")).unwrap();
        assert_eq!(found.id, "D_cl002");
        assert!(find_section(&forest, SectionQuery::Exact("D_cl003")).is_none());
    }
}
