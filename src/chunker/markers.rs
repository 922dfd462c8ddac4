use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:Phần|PHẦN)\s+(?:(?:thứ|THỨ)\s+[^\s.:]+|[IVXLCDM]+|\d+)[.:]?)(?:\s+|$)")
        .unwrap()
});
static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:Chương|CHƯƠNG)\s+(?:[IVXLCDM]+|\d+)[.:]?)(?:\s+|$)").unwrap()
});
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:Mục|MỤC)\s+(?:\d+|[IVXLCDM]+)[.:]?)(?:\s+|$)").unwrap()
});
static ARTICLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:Điều|ĐIỀU)\s+\d+[a-zđ]?[.:]?)(?:\s+|$)").unwrap()
});
static CLAUSE_ROMAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([IVXLCDM]+\.)(?:\s+|$)").unwrap());
static CLAUSE_NESTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+(?:\.\d+)*\.?)(?:\s+|$)").unwrap());
static CLAUSE_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[.)])(?:\s+|$)").unwrap());
static CLAUSE_ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zđ]\))(?:\s+|$)").unwrap());

/// Hierarchy marker patterns recognised in Vietnamese legal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    Part,
    Chapter,
    Section,
    Article,
    ClauseRoman,
    ClauseNested,
    ClauseNumeric,
    ClauseAlpha,
}

impl MarkerKind {
    /// Match priority: earlier kinds win when several patterns accept a paragraph.
    pub const ALL: [MarkerKind; 8] = [
        MarkerKind::Part,
        MarkerKind::Chapter,
        MarkerKind::Section,
        MarkerKind::Article,
        MarkerKind::ClauseRoman,
        MarkerKind::ClauseNested,
        MarkerKind::ClauseNumeric,
        MarkerKind::ClauseAlpha,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Part => "part",
            MarkerKind::Chapter => "chapter",
            MarkerKind::Section => "section",
            MarkerKind::Article => "article",
            MarkerKind::ClauseRoman => "clause-roman",
            MarkerKind::ClauseNested => "clause-nested",
            MarkerKind::ClauseNumeric => "clause-numeric",
            MarkerKind::ClauseAlpha => "clause-alpha",
        }
    }

    /// Prefix of the per-node id token (`art` in `art003`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            MarkerKind::Part => "prt",
            MarkerKind::Chapter => "chap",
            MarkerKind::Section => "sec",
            MarkerKind::Article => "art",
            MarkerKind::ClauseRoman => "rom",
            MarkerKind::ClauseNested => "scl",
            MarkerKind::ClauseNumeric => "cl",
            MarkerKind::ClauseAlpha => "pt",
        }
    }

    pub fn from_str_id(value: &str) -> Option<MarkerKind> {
        MarkerKind::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    fn pattern(self) -> &'static Regex {
        match self {
            MarkerKind::Part => &PART_RE,
            MarkerKind::Chapter => &CHAPTER_RE,
            MarkerKind::Section => &SECTION_RE,
            MarkerKind::Article => &ARTICLE_RE,
            MarkerKind::ClauseRoman => &CLAUSE_ROMAN_RE,
            MarkerKind::ClauseNested => &CLAUSE_NESTED_RE,
            MarkerKind::ClauseNumeric => &CLAUSE_NUMERIC_RE,
            MarkerKind::ClauseAlpha => &CLAUSE_ALPHA_RE,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    pub kind: MarkerKind,
    /// Marker text as written, e.g. `Điều 3.`.
    pub header: &'a str,
    /// Whatever follows the marker on the same line.
    pub remainder: &'a str,
}

/// Classifies a single trimmed paragraph against the marker patterns.
pub fn match_marker(paragraph: &str) -> Option<MarkerMatch<'_>> {
    for kind in MarkerKind::ALL {
        let Some(captures) = kind.pattern().captures(paragraph) else {
            continue;
        };
        let (Some(whole), Some(header)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        return Some(MarkerMatch {
            kind,
            header: header.as_str(),
            remainder: paragraph[whole.end()..].trim(),
        });
    }
    None
}

/// Tracks `<table>` nesting while scanning paragraphs line by line.
#[derive(Debug, Default)]
pub(crate) struct TableTracker {
    depth: usize,
}

impl TableTracker {
    /// Feeds one paragraph; returns true when the paragraph belongs to a table.
    pub(crate) fn observe(&mut self, paragraph: &str) -> bool {
        let opens = paragraph.matches("<table>").count();
        let closes = paragraph.matches("</table>").count();
        let in_table = self.depth > 0 || opens > 0 || closes > 0 || is_table_tag_line(paragraph);
        self.depth = (self.depth + opens).saturating_sub(closes);
        in_table
    }
}

pub(crate) fn is_table_tag_line(paragraph: &str) -> bool {
    let trimmed = paragraph.trim();
    trimmed.starts_with("<table>")
        || trimmed.starts_with("</table>")
        || trimmed.starts_with("<tr>")
        || trimmed.starts_with("</tr>")
        || trimmed.starts_with("<td>")
}

/// Marker kinds present in a text, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerCatalogue {
    kinds: Vec<MarkerKind>,
}

impl MarkerCatalogue {
    pub fn kinds(&self) -> &[MarkerKind] {
        &self.kinds
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    fn record(&mut self, kind: MarkerKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }
}

impl FromIterator<MarkerKind> for MarkerCatalogue {
    fn from_iter<I: IntoIterator<Item = MarkerKind>>(iter: I) -> Self {
        let mut catalogue = MarkerCatalogue::default();
        for kind in iter {
            catalogue.record(kind);
        }
        catalogue
    }
}

/// Marker kind → nesting depth (0 = outermost).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMapping {
    levels: Vec<MarkerKind>,
}

impl LevelMapping {
    pub fn depth_of(&self, kind: MarkerKind) -> Option<usize> {
        self.levels.iter().position(|&k| k == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerKind, usize)> + '_ {
        self.levels.iter().enumerate().map(|(depth, &kind)| (kind, depth))
    }
}

impl FromIterator<MarkerKind> for LevelMapping {
    fn from_iter<I: IntoIterator<Item = MarkerKind>>(iter: I) -> Self {
        let catalogue: MarkerCatalogue = iter.into_iter().collect();
        assign_hierarchy_levels(&catalogue)
    }
}

pub fn detect_hierarchy(text: &str) -> MarkerCatalogue {
    let mut catalogue = MarkerCatalogue::default();
    let mut tables = TableTracker::default();
    for line in text.lines() {
        let paragraph = line.trim();
        if tables.observe(paragraph) {
            continue;
        }
        if let Some(found) = match_marker(paragraph) {
            catalogue.record(found.kind);
        }
    }
    catalogue
}

pub fn assign_hierarchy_levels(catalogue: &MarkerCatalogue) -> LevelMapping {
    LevelMapping {
        levels: catalogue.kinds.clone(),
    }
}
