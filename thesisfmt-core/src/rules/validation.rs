use crate::classifier::ParagraphClassifier;
use crate::config::{FormattingRules, RoleRule, StyleSpec};
use crate::error::FormatResult;
use crate::state::{DocumentState, RegionState};
use crate::stats::{StatisticsSnapshot, StatisticsTracker};
use crate::types::{Document, Margins, Paragraph, ParagraphRole};
use serde::{Deserialize, Serialize};

const INDENT_TOLERANCE_CM: f32 = 0.1;
const SPACING_TOLERANCE: f32 = 0.1;
const FONT_SIZE_TOLERANCE_PT: f32 = 0.5;
const MARGIN_TOLERANCE_CM: f32 = 0.1;
const MARGIN_ERROR_CM: f32 = 0.5;

// Score weights; MAX_WEIGHT worth of issues brings the score to zero
const ERROR_WEIGHT: u32 = 3;
const WARNING_WEIGHT: u32 = 2;
const INFO_WEIGHT: u32 = 1;
const MAX_WEIGHT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// "margins", "fonts", "alignment", "indents", "spacing", "headings", "structure"
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<usize>,
    pub description: String,
    pub expected: String,
    pub actual: String,
}

impl ValidationIssue {
    fn new(
        severity: Severity,
        category: &str,
        paragraph: Option<usize>,
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.to_string(),
            paragraph,
            description: description.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    /// Role counts as the classifier sees the document
    pub statistics: StatisticsSnapshot,
}

impl ValidationReport {
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info += 1,
        }
        self.issues.push(issue);
    }

    /// Compliance score in 0..=100
    pub fn score(&self) -> u32 {
        if self.issues.is_empty() {
            return 100;
        }
        let weight = self.errors as u32 * ERROR_WEIGHT
            + self.warnings as u32 * WARNING_WEIGHT
            + self.info as u32 * INFO_WEIGHT;
        100u32.saturating_sub(weight * 100 / MAX_WEIGHT)
    }

    pub fn is_compliant(&self) -> bool {
        self.errors == 0
    }

    pub fn log_summary(&self) {
        if self.issues.is_empty() {
            log::info!("✅ No formatting issues found (score 100)");
            return;
        }
        log::info!(
            "📋 {} issues: {} errors, {} warnings, {} info (score {})",
            self.issues.len(),
            self.errors,
            self.warnings,
            self.info,
            self.score()
        );
        for issue in &self.issues {
            let location = issue
                .paragraph
                .map(|p| format!("paragraph {p}"))
                .unwrap_or_else(|| "document".to_string());
            let line = format!(
                "[{}] {}: {} (expected {}, found {})",
                issue.category, location, issue.description, issue.expected, issue.actual
            );
            match issue.severity {
                Severity::Error => log::warn!("   ❌ {line}"),
                Severity::Warning => log::warn!("   ⚠️  {line}"),
                Severity::Info => log::info!("   ℹ️  {line}"),
            }
        }
    }
}

/// Read-only check of a document against formatting rules.
///
/// Walks the document with the same state machine and classifier the
/// pipeline uses, so a freshly formatted document validates clean.
pub struct ComplianceValidator {
    classifier: ParagraphClassifier,
    rules: FormattingRules,
}

impl ComplianceValidator {
    pub fn new(rules: &FormattingRules) -> FormatResult<Self> {
        rules.validate()?;
        Ok(Self {
            classifier: ParagraphClassifier::new(&rules.detection)?,
            rules: rules.clone(),
        })
    }

    pub fn validate(&self, document: &Document) -> ValidationReport {
        log::info!("🔍 Validating {} paragraphs", document.len());
        let mut report = ValidationReport::default();

        self.validate_page_setup(document, &mut report);

        let mut state = DocumentState::new(self.classifier.detector());
        let mut stats = StatisticsTracker::new();
        let mut seen_heading1 = false;

        for (index, paragraph) in document.paragraphs.iter().enumerate() {
            let text = paragraph.text();
            state.observe(&text);
            let role = self.classifier.classify_paragraph(paragraph, &state);
            match self.rules.rule_for(role) {
                Some(RoleRule::NoOp(_)) => stats.increment_unchanged(role),
                _ => stats.increment(role),
            }

            if state.current() != RegionState::InMainContent {
                continue;
            }

            if self.classifier.detector().is_page_number_only(&text) {
                report.add_issue(ValidationIssue::new(
                    Severity::Info,
                    "structure",
                    Some(index),
                    "Page number typed as paragraph text",
                    "page numbers in the footer",
                    text.trim(),
                ));
            }

            match role {
                ParagraphRole::Heading1 => seen_heading1 = true,
                ParagraphRole::Heading2 if !seen_heading1 => {
                    report.add_issue(ValidationIssue::new(
                        Severity::Warning,
                        "headings",
                        Some(index),
                        "Level-2 heading before any level-1 heading",
                        "a level-1 heading first",
                        paragraph.preview(40),
                    ));
                }
                _ => {}
            }

            if let Some(RoleRule::Format(spec)) = self.rules.rule_for(role) {
                check_paragraph(paragraph, index, role, spec, &mut report);
            }
        }

        stats.record_state(&state);
        report.statistics = stats.snapshot();

        if !document.is_empty() && !state.main_content_found() {
            report.add_issue(ValidationIssue::new(
                Severity::Error,
                "structure",
                None,
                "Main content start was not found",
                "an introduction or first chapter heading",
                "none",
            ));
        } else if state.main_content_found() && report.statistics.heading1 == 0 {
            report.add_issue(ValidationIssue::new(
                Severity::Warning,
                "headings",
                None,
                "Main content has no level-1 headings",
                "at least one level-1 heading",
                "none",
            ));
        }

        report.log_summary();
        report
    }

    fn validate_page_setup(&self, document: &Document, report: &mut ValidationReport) {
        let expected = &self.rules.document.margins;
        match &document.page_setup.margins {
            None => report.add_issue(ValidationIssue::new(
                Severity::Warning,
                "margins",
                None,
                "Page margins are not set",
                describe_margins(expected),
                "inherited",
            )),
            Some(actual) => {
                let sides = [
                    ("top", expected.top_cm, actual.top_cm),
                    ("bottom", expected.bottom_cm, actual.bottom_cm),
                    ("left", expected.left_cm, actual.left_cm),
                    ("right", expected.right_cm, actual.right_cm),
                ];
                for (side, want, have) in sides {
                    let deviation = (want - have).abs();
                    if deviation > MARGIN_TOLERANCE_CM {
                        let severity = if deviation > MARGIN_ERROR_CM {
                            Severity::Error
                        } else {
                            Severity::Warning
                        };
                        report.add_issue(ValidationIssue::new(
                            severity,
                            "margins",
                            None,
                            format!("Wrong {side} margin"),
                            format!("{want} cm"),
                            format!("{have} cm"),
                        ));
                    }
                }
            }
        }

        if document.page_setup.page_numbering.is_none() {
            report.add_issue(ValidationIssue::new(
                Severity::Info,
                "structure",
                None,
                "Page numbering is not configured",
                "page numbers in header or footer",
                "none",
            ));
        }
    }
}

fn describe_margins(margins: &Margins) -> String {
    format!(
        "top {} / bottom {} / left {} / right {} cm",
        margins.top_cm, margins.bottom_cm, margins.left_cm, margins.right_cm
    )
}

fn describe<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "inherited".to_string())
}

fn within(actual: Option<f32>, expected: f32, tolerance: f32) -> bool {
    actual.is_some_and(|value| (value - expected).abs() <= tolerance)
}

fn check_paragraph(
    paragraph: &Paragraph,
    index: usize,
    role: ParagraphRole,
    spec: &StyleSpec,
    report: &mut ValidationReport,
) {
    let format = &paragraph.format;
    let mut warn = |category: &str, description: String, expected: String, actual: String| {
        report.add_issue(ValidationIssue::new(
            Severity::Warning,
            category,
            Some(index),
            description,
            expected,
            actual,
        ));
    };

    // One font issue per paragraph is enough to point at it
    let font_problem = paragraph
        .runs
        .iter()
        .filter(|run| !run.text.trim().is_empty())
        .find_map(|run| {
            let font = &run.font;
            if font.name.as_deref() != Some(spec.font_name.as_str()) {
                Some(("font", spec.font_name.clone(), describe(font.name.as_deref())))
            } else if !within(font.size_pt, spec.font_size_pt, FONT_SIZE_TOLERANCE_PT) {
                Some(("font size", format!("{}pt", spec.font_size_pt), describe(font.size_pt)))
            } else if spec.bold.is_some_and(|bold| font.bold != Some(bold)) {
                Some(("bold", describe(spec.bold), describe(font.bold)))
            } else {
                None
            }
        });
    if let Some((what, expected, actual)) = font_problem {
        warn("fonts", format!("Wrong {what} for {role}"), expected, actual);
    }

    if format.alignment != Some(spec.alignment) {
        warn(
            "alignment",
            format!("Wrong alignment for {role}"),
            spec.alignment.to_string(),
            describe(format.alignment),
        );
    }

    let indents = [
        ("first-line indent", format.first_line_indent_cm, spec.first_line_indent_cm),
        ("left indent", format.left_indent_cm, spec.left_indent_cm),
    ];
    for (what, actual, expected) in indents {
        if !within(actual, expected, INDENT_TOLERANCE_CM) {
            warn(
                "indents",
                format!("Wrong {what} for {role}"),
                format!("{expected} cm"),
                describe(actual),
            );
        }
    }

    if !within(format.line_spacing, spec.line_spacing, SPACING_TOLERANCE) {
        warn(
            "spacing",
            format!("Wrong line spacing for {role}"),
            spec.line_spacing.to_string(),
            describe(format.line_spacing),
        );
    }

    if role.is_heading() && format.outline_level != role.outline_level() {
        report.add_issue(ValidationIssue::new(
            Severity::Info,
            "headings",
            Some(index),
            format!("Missing outline level for {role}"),
            describe(role.outline_level()),
            describe(format.outline_level),
        ));
    }
}
