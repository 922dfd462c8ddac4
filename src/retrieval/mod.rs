//! Read side of the structured JSON: text reconstruction and section lookup.

pub mod citations;
pub mod locator;
pub mod reconstruct;

pub use citations::{expand_citations, extract_citation_ids, validate_citation};
pub use locator::{
    load_structured_file, not_found_message, outline, retrieve_section_text,
    retrieve_section_text_from_folder, retrieve_section_text_from_folder_with,
    retrieve_section_text_from_path, retrieve_section_text_from_path_with,
    retrieve_section_text_with, SectionHit,
};
pub use reconstruct::{reconstruct_text, render_section, HeaderMode, Reconstructor};
