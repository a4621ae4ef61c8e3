use super::patterns::{PatternSet, StructuralPattern};
use crate::config::{DetectionConfig, UppercaseHeuristic};
use crate::error::ConfigError;
use regex::Regex;

// Fixed line shapes. Unlike the marker lists these are not configurable:
// they describe layout, not vocabulary.

/// "Title ..... 12", "Title … 12", "Title\t12", "Title    12"
const TOC_ENTRY_PATTERN: &str =
    r"^.*\p{L}.*?(?:\s*(?:\.{2,}|…+)[\s.…]*|\t+\s*|\s{2,})\d{1,4}\s*$";

/// "12", "- 12 -", "— 3 —"
const PAGE_NUMBER_PATTERN: &str = r"^\s*[-–—]?\s*\d{1,4}\s*[-–—]?\s*$";

/// Leading section number stripped before comparing main content markers
const NUMBERING_PREFIX_PATTERN: &str = r"^\s*(?:\d+\.?|[IVX]+\.)\s*";

/// Stateless text predicates used by the document state machine and the
/// paragraph classifier. Built once per pipeline from a `DetectionConfig`.
#[derive(Debug, Clone)]
pub struct ContentDetector {
    title_markers: PatternSet,
    title_exclusions: PatternSet,
    toc_headers: PatternSet,
    main_markers: PatternSet,
    main_patterns: PatternSet,
    heading1: PatternSet,
    heading2: PatternSet,
    list: PatternSet,
    uppercase: UppercaseHeuristic,
    toc_entry: Regex,
    page_number: Regex,
    numbering_prefix: Regex,
}

fn fixed(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl ContentDetector {
    pub fn new(config: &DetectionConfig) -> Result<Self, ConfigError> {
        let title_markers = PatternSet::contains(&config.title_page_markers)
            .with(PatternSet::regex(&config.title_page_patterns)?);

        Ok(Self {
            title_markers,
            title_exclusions: PatternSet::contains(&config.title_page_exclusions),
            toc_headers: PatternSet::exact(&config.table_of_contents_headers),
            main_markers: PatternSet::exact(&config.main_content_markers),
            main_patterns: PatternSet::regex(&config.main_content_patterns)?,
            heading1: PatternSet::regex(&config.heading1_patterns)?,
            heading2: PatternSet::regex(&config.heading2_patterns)?,
            list: PatternSet::regex(&config.list_patterns)?,
            uppercase: config.uppercase_heading.clone(),
            toc_entry: fixed(TOC_ENTRY_PATTERN)?,
            page_number: fixed(PAGE_NUMBER_PATTERN)?,
            numbering_prefix: fixed(NUMBERING_PREFIX_PATTERN)?,
        })
    }

    /// Title page vocabulary. References headings and anything shaped like a
    /// level-1 heading are excluded so "1 INTRODUCTION" never counts.
    pub fn is_title_page_marker(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if self.title_exclusions.matches(text) || self.heading1.matches(text) {
            return false;
        }
        self.title_markers.matches(text)
    }

    pub fn is_table_of_contents_header(&self, text: &str) -> bool {
        self.toc_headers.matches(text)
    }

    pub fn is_table_of_contents_entry(&self, text: &str) -> bool {
        self.toc_entry.is_match(text.trim_end())
    }

    pub fn is_main_content_start(&self, text: &str) -> bool {
        if text.trim().is_empty() || self.is_table_of_contents_entry(text) {
            return false;
        }
        if self.main_patterns.matches(text) {
            return true;
        }
        let unnumbered = self.numbering_prefix.replace(text, "");
        self.main_markers.matches(&unnumbered)
    }

    pub fn is_heading_level1(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.heading1.matches(text) || self.looks_like_uppercase_heading(text)
    }

    pub fn is_heading_level2(&self, text: &str) -> bool {
        self.heading2.matches(text)
    }

    pub fn is_list_item(&self, text: &str) -> bool {
        self.list.matches(text)
    }

    pub fn is_page_number_only(&self, text: &str) -> bool {
        self.page_number.is_match(text)
    }

    /// Pattern that made `text` a level-1 heading, for debug output
    pub fn heading1_match(&self, text: &str) -> Option<&StructuralPattern> {
        self.heading1.first_match(text)
    }

    fn looks_like_uppercase_heading(&self, text: &str) -> bool {
        let heuristic = &self.uppercase;
        if !heuristic.enabled {
            return false;
        }
        let trimmed = text.trim();
        if trimmed.chars().count() >= heuristic.max_chars {
            return false;
        }

        let (letters, upper) = trimmed
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(letters, upper), c| {
                (letters + 1, upper + usize::from(c.is_uppercase()))
            });
        if letters < heuristic.min_letters {
            return false;
        }
        upper as f32 / letters as f32 > heuristic.min_ratio
    }
}
