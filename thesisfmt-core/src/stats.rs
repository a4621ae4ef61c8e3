use crate::state::DocumentState;
use crate::types::ParagraphRole;
use serde::{Deserialize, Serialize};

/// Final counts of one formatting run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub heading1: usize,
    pub heading2: usize,
    pub list_item: usize,
    pub regular_text: usize,
    pub skipped: usize,
    /// Counted under their role but left as is by a `noop` rule
    #[serde(default)]
    pub unchanged: usize,
    pub total: usize,
    pub title_page_detected: bool,
    pub table_of_contents_detected: bool,
    pub main_content_found: bool,
}

impl StatisticsSnapshot {
    pub fn count(&self, role: ParagraphRole) -> usize {
        match role {
            ParagraphRole::Skip => self.skipped,
            ParagraphRole::Heading1 => self.heading1,
            ParagraphRole::Heading2 => self.heading2,
            ParagraphRole::ListItem => self.list_item,
            ParagraphRole::RegularText => self.regular_text,
        }
    }

    /// Paragraphs that were actually restyled
    pub fn formatted(&self) -> usize {
        self.total - self.skipped - self.unchanged
    }
}

/// Mutable counters owned by a single run
#[derive(Debug, Default)]
pub struct StatisticsTracker {
    counts: StatisticsSnapshot,
}

impl StatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, role: ParagraphRole) {
        let counts = &mut self.counts;
        match role {
            ParagraphRole::Skip => counts.skipped += 1,
            ParagraphRole::Heading1 => counts.heading1 += 1,
            ParagraphRole::Heading2 => counts.heading2 += 1,
            ParagraphRole::ListItem => counts.list_item += 1,
            ParagraphRole::RegularText => counts.regular_text += 1,
        }
        counts.total += 1;
    }

    /// Count a paragraph whose role has a `noop` rule
    pub fn increment_unchanged(&mut self, role: ParagraphRole) {
        self.increment(role);
        self.counts.unchanged += 1;
    }

    /// Copy the landmark flags from the traversal state
    pub fn record_state(&mut self, state: &DocumentState) {
        self.counts.title_page_detected = state.title_page_seen();
        self.counts.table_of_contents_detected = state.table_of_contents_seen();
        self.counts.main_content_found = state.main_content_found();
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.counts.clone()
    }

    pub fn log_summary(&self) {
        let c = &self.counts;
        log::info!(
            "📊 Formatted {} of {} paragraphs: {} H1, {} H2, {} list, {} text, {} skipped",
            c.formatted(),
            c.total,
            c.heading1,
            c.heading2,
            c.list_item,
            c.regular_text,
            c.skipped
        );
        if !c.main_content_found && c.total > 0 {
            log::warn!("⚠️  Main content start was never detected; nothing was formatted");
        }
    }
}
