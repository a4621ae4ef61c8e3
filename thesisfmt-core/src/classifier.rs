use crate::config::{DetectionConfig, StyleHints};
use crate::error::ConfigError;
use crate::rules::detection::ContentDetector;
use crate::rules::patterns::PatternSet;
use crate::state::{DocumentState, RegionState};
use crate::types::{Paragraph, ParagraphRole};

/// Named paragraph styles that decide the role outright
#[derive(Debug, Clone)]
struct StyleHintSets {
    heading1: PatternSet,
    heading2: PatternSet,
    list: PatternSet,
}

impl StyleHintSets {
    fn from_config(hints: &StyleHints) -> Option<Self> {
        if !hints.enabled {
            return None;
        }
        Some(Self {
            heading1: PatternSet::exact(&hints.heading1_styles),
            heading2: PatternSet::exact(&hints.heading2_styles),
            list: PatternSet::exact(&hints.list_styles),
        })
    }

    fn role_for(&self, style_name: &str) -> Option<ParagraphRole> {
        if self.heading1.matches(style_name) {
            Some(ParagraphRole::Heading1)
        } else if self.heading2.matches(style_name) {
            Some(ParagraphRole::Heading2)
        } else if self.list.matches(style_name) {
            Some(ParagraphRole::ListItem)
        } else {
            None
        }
    }
}

/// Assigns a `ParagraphRole` from paragraph text and the current region.
/// Owns the compiled `ContentDetector` that `DocumentState` borrows.
#[derive(Debug, Clone)]
pub struct ParagraphClassifier {
    detector: ContentDetector,
    style_hints: Option<StyleHintSets>,
}

impl ParagraphClassifier {
    pub fn new(config: &DetectionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector: ContentDetector::new(config)?,
            style_hints: StyleHintSets::from_config(&config.style_hints),
        })
    }

    pub fn detector(&self) -> &ContentDetector {
        &self.detector
    }

    /// Everything outside main content is skipped. Inside it, level-1
    /// headings win over level-2 headings, which win over list items.
    pub fn classify(&self, text: &str, state: &DocumentState) -> ParagraphRole {
        if state.current() != RegionState::InMainContent {
            return ParagraphRole::Skip;
        }
        self.classify_main_content(text)
    }

    /// Like [`classify`](Self::classify), but a recognised named style takes
    /// precedence over the text predicates.
    pub fn classify_paragraph(&self, paragraph: &Paragraph, state: &DocumentState) -> ParagraphRole {
        if state.current() != RegionState::InMainContent {
            return ParagraphRole::Skip;
        }
        // A blank line keeps body spacing whatever style it carries
        if paragraph.is_blank() {
            return ParagraphRole::RegularText;
        }

        let hinted = match (&self.style_hints, paragraph.style_name.as_deref()) {
            (Some(hints), Some(style)) => hints.role_for(style),
            _ => None,
        };
        if let Some(role) = hinted {
            log::debug!(
                "🏷️  Style '{}' → {}",
                paragraph.style_name.as_deref().unwrap_or_default(),
                role
            );
            return role;
        }

        self.classify_main_content(&paragraph.text())
    }

    fn classify_main_content(&self, text: &str) -> ParagraphRole {
        if self.detector.is_heading_level1(text) {
            ParagraphRole::Heading1
        } else if self.detector.is_heading_level2(text) {
            ParagraphRole::Heading2
        } else if self.detector.is_list_item(text) {
            ParagraphRole::ListItem
        } else {
            ParagraphRole::RegularText
        }
    }
}
