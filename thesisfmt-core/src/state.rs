use crate::rules::detection::ContentDetector;
use crate::types::preview;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document regions in traversal order. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionState {
    BeforeContent,
    InTableOfContents,
    InMainContent,
}

impl fmt::Display for RegionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionState::BeforeContent => "before_content",
            RegionState::InTableOfContents => "in_table_of_contents",
            RegionState::InMainContent => "in_main_content",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: RegionState,
    pub to: RegionState,
}

impl StateTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Traversal state for one pass over a document.
///
/// Fed every paragraph in order through [`DocumentState::observe`]. Each call
/// evaluates only the transitions allowed from the current region and makes
/// at most one of them.
#[derive(Debug, Clone)]
pub struct DocumentState<'a> {
    detector: &'a ContentDetector,
    region: RegionState,
    title_page_seen: bool,
    title_markers_seen: usize,
    table_of_contents_seen: bool,
    toc_entries_seen: usize,
    paragraphs_observed: usize,
}

impl<'a> DocumentState<'a> {
    pub fn new(detector: &'a ContentDetector) -> Self {
        Self {
            detector,
            region: RegionState::BeforeContent,
            title_page_seen: false,
            title_markers_seen: 0,
            table_of_contents_seen: false,
            toc_entries_seen: 0,
            paragraphs_observed: 0,
        }
    }

    pub fn observe(&mut self, text: &str) -> StateTransition {
        let from = self.region;
        self.paragraphs_observed += 1;

        match self.region {
            RegionState::BeforeContent => {
                if self.detector.is_title_page_marker(text) {
                    self.title_page_seen = true;
                    self.title_markers_seen += 1;
                    log::debug!("📋 Title page marker: \"{}\"", preview(text, 60));
                } else if self.detector.is_table_of_contents_header(text) {
                    self.table_of_contents_seen = true;
                    self.region = RegionState::InTableOfContents;
                } else if self.detector.is_main_content_start(text) {
                    self.region = RegionState::InMainContent;
                }
            }
            RegionState::InTableOfContents => {
                if self.detector.is_table_of_contents_entry(text)
                    || self.detector.is_page_number_only(text)
                {
                    self.toc_entries_seen += 1;
                } else if self.detector.is_main_content_start(text) {
                    self.region = RegionState::InMainContent;
                }
            }
            RegionState::InMainContent => {}
        }

        let transition = StateTransition {
            from,
            to: self.region,
        };
        if transition.changed() {
            log::info!(
                "🔀 Region {} → {} at paragraph {}: \"{}\"",
                from,
                self.region,
                self.paragraphs_observed - 1,
                preview(text, 60)
            );
        }
        transition
    }

    pub fn current(&self) -> RegionState {
        self.region
    }

    pub fn title_page_seen(&self) -> bool {
        self.title_page_seen
    }

    pub fn title_markers_seen(&self) -> usize {
        self.title_markers_seen
    }

    pub fn table_of_contents_seen(&self) -> bool {
        self.table_of_contents_seen
    }

    pub fn toc_entries_seen(&self) -> usize {
        self.toc_entries_seen
    }

    pub fn main_content_found(&self) -> bool {
        self.region == RegionState::InMainContent
    }
}
