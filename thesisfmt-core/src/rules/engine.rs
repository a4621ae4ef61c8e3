use super::formatter::{FormatContext, FormatOutcome, ParagraphFormatter};
use crate::classifier::ParagraphClassifier;
use crate::config::FormattingRules;
use crate::error::FormatResult;
use crate::state::{DocumentState, RegionState, StateTransition};
use crate::stats::{StatisticsSnapshot, StatisticsTracker};
use crate::types::{preview, Document, ParagraphRole};
use serde::Serialize;

/// Per-paragraph decision record, collected by `run_traced`
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub index: usize,
    pub text: String,
    pub region: RegionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<StateTransition>,
    pub role: ParagraphRole,
    pub formatted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormattingTrace {
    pub entries: Vec<TraceEntry>,
    pub statistics: StatisticsSnapshot,
}

/// Classification and formatting pass over a document.
///
/// Construction validates the rules and compiles every detection pattern,
/// so a bad rules file fails here and never half-formats a document.
#[derive(Debug, Clone)]
pub struct FormattingPipeline {
    classifier: ParagraphClassifier,
    formatter: ParagraphFormatter,
}

impl FormattingPipeline {
    pub fn new(rules: &FormattingRules) -> FormatResult<Self> {
        rules.validate()?;
        Ok(Self {
            classifier: ParagraphClassifier::new(&rules.detection)?,
            formatter: ParagraphFormatter::new(rules.clone()),
        })
    }

    pub fn rules(&self) -> &FormattingRules {
        self.formatter.rules()
    }

    pub fn run(&self, document: &mut Document) -> FormatResult<StatisticsSnapshot> {
        self.traverse(document, None)
    }

    pub fn run_traced(&self, document: &mut Document) -> FormatResult<FormattingTrace> {
        let mut entries = Vec::with_capacity(document.len());
        let statistics = self.traverse(document, Some(&mut entries))?;
        Ok(FormattingTrace {
            entries,
            statistics,
        })
    }

    fn apply_document_settings(&self, document: &mut Document) {
        let settings = &self.rules().document;
        document.page_setup.margins = Some(settings.margins);
        document.page_setup.page_numbering = Some(settings.page_numbering.clone());
    }

    fn traverse(
        &self,
        document: &mut Document,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> FormatResult<StatisticsSnapshot> {
        log::info!("🔍 Formatting {} paragraphs", document.len());
        self.apply_document_settings(document);

        let mut state = DocumentState::new(self.classifier.detector());
        let mut stats = StatisticsTracker::new();
        let mut has_preceding_content = false;

        for (index, paragraph) in document.paragraphs.iter_mut().enumerate() {
            let text = paragraph.text();
            let transition = state.observe(&text);
            let role = self.classifier.classify_paragraph(paragraph, &state);

            let context = FormatContext::new(index, has_preceding_content);
            let outcome = self.formatter.format(paragraph, role, context, &mut stats)?;

            if let Some(entries) = trace.as_deref_mut() {
                entries.push(TraceEntry {
                    index,
                    text: preview(&text, 80),
                    region: state.current(),
                    transition: transition.changed().then_some(transition),
                    role,
                    formatted: outcome == FormatOutcome::Formatted,
                });
            }
            has_preceding_content |= !text.trim().is_empty();
        }

        stats.record_state(&state);
        stats.log_summary();
        Ok(stats.snapshot())
    }
}

/// Validate `rules`, format `document` and hand both back
pub fn run(
    mut document: Document,
    rules: &FormattingRules,
) -> FormatResult<(Document, StatisticsSnapshot)> {
    let pipeline = FormattingPipeline::new(rules)?;
    let statistics = pipeline.run(&mut document)?;
    Ok((document, statistics))
}
