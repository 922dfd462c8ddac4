//! Structuring pipeline: sanitize → segment → detect markers → assign levels →
//! build tree → clean redundancy.

pub mod cleaner;
pub mod forms;
pub mod hierarchy;
pub mod markers;
pub mod metadata;
pub mod sanitize;
pub mod segmenter;

pub use cleaner::clean_redundant_content;
pub use forms::detect_forms_in_appendix;
pub use hierarchy::parse_hierarchy;
pub use markers::{assign_hierarchy_levels, detect_hierarchy, LevelMapping, MarkerCatalogue, MarkerKind};
pub use sanitize::sanitize_content;
pub use segmenter::identify_and_segment_document;
