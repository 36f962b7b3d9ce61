//! crates/scholar_core/src/query.rs
//!
//! The search/filter engine. Pure functions over a slice the catalog has
//! already scoped to the viewer; never fails, never reorders, never
//! deduplicates.

use crate::domain::{ClassLevel, Material};

/// The class-level narrowing a viewer has picked: everything, or one
/// specific grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassFilter {
    #[default]
    All,
    Level(ClassLevel),
}

impl ClassFilter {
    /// Parses a filter sentinel from the UI.
    ///
    /// This is a read-side convenience, so malformed input degrades to
    /// `All` (no narrowing) instead of erroring.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<ClassLevel>() {
            Ok(level) => ClassFilter::Level(level),
            Err(_) => ClassFilter::All,
        }
    }

    fn matches(&self, material: &Material) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Level(level) => material.class_level == *level,
        }
    }
}

/// Narrows `materials` to those matching both the search term and the
/// class filter, preserving the input order.
///
/// A material matches the term when it appears, case-insensitively, as a
/// substring of the title or the subject; the empty term matches
/// everything. No fuzzy matching, no ranking.
pub fn filter_materials(
    materials: &[Material],
    search_term: &str,
    class_filter: ClassFilter,
) -> Vec<Material> {
    let needle = search_term.to_lowercase();
    materials
        .iter()
        .filter(|material| {
            let matches_search = needle.is_empty()
                || material.title.to_lowercase().contains(&needle)
                || material.subject.to_lowercase().contains(&needle);
            matches_search && class_filter.matches(material)
        })
        .cloned()
        .collect()
}
