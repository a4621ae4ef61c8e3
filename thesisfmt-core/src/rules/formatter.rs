use crate::config::{FormattingRules, RoleRule, StyleSpec, TextTransform};
use crate::error::{ConfigError, FormatError, FormatResult};
use crate::stats::StatisticsTracker;
use crate::types::{Paragraph, ParagraphFormat, ParagraphRole, Run};

/// Where a paragraph sits in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatContext {
    pub index: usize,
    /// Any earlier paragraph has non-blank text
    pub has_preceding_content: bool,
}

impl FormatContext {
    pub fn new(index: usize, has_preceding_content: bool) -> Self {
        Self {
            index,
            has_preceding_content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Role was `Skip`; nothing touched
    Skipped,
    /// Rule entry was `noop`; nothing touched
    Unchanged,
    Formatted,
}

/// Applies the style for a role to a paragraph in place.
///
/// Every attribute is assigned, never adjusted relative to its old value,
/// so formatting an already formatted paragraph changes nothing.
#[derive(Debug, Clone)]
pub struct ParagraphFormatter {
    rules: FormattingRules,
}

impl ParagraphFormatter {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FormattingRules {
        &self.rules
    }

    pub fn format(
        &self,
        paragraph: &mut Paragraph,
        role: ParagraphRole,
        context: FormatContext,
        stats: &mut StatisticsTracker,
    ) -> FormatResult<FormatOutcome> {
        let spec = match role {
            ParagraphRole::Skip => {
                stats.increment(role);
                return Ok(FormatOutcome::Skipped);
            }
            ParagraphRole::Heading1
            | ParagraphRole::Heading2
            | ParagraphRole::ListItem
            | ParagraphRole::RegularText => {
                match self.rules.rule_for(role).ok_or(ConfigError::MissingRole(role))? {
                    RoleRule::Format(spec) => spec,
                    RoleRule::NoOp(_) => {
                        stats.increment_unchanged(role);
                        log::debug!("⏭️  [{}] {} (noop): \"{}\"", context.index, role, paragraph.preview(50));
                        return Ok(FormatOutcome::Unchanged);
                    }
                }
            }
        };

        if paragraph.protected {
            return Err(FormatError::Mutation {
                index: context.index,
                reason: format!("paragraph is protected and cannot be styled as {role}"),
            });
        }

        apply_paragraph_format(&mut paragraph.format, spec, role, context);
        apply_run_format(paragraph, spec);
        stats.increment(role);

        log::debug!(
            "✏️  [{}] {} ({} {}pt, {}): \"{}\"",
            context.index,
            role,
            spec.font_name,
            spec.font_size_pt,
            spec.alignment,
            paragraph.preview(50)
        );
        Ok(FormatOutcome::Formatted)
    }
}

fn apply_paragraph_format(
    format: &mut ParagraphFormat,
    spec: &StyleSpec,
    role: ParagraphRole,
    context: FormatContext,
) {
    format.alignment = Some(spec.alignment);
    format.first_line_indent_cm = Some(spec.first_line_indent_cm);
    format.left_indent_cm = Some(spec.left_indent_cm);
    format.right_indent_cm = Some(spec.right_indent_cm);
    format.space_before_pt = Some(spec.space_before_pt);
    format.space_after_pt = Some(spec.space_after_pt);
    format.line_spacing = Some(spec.line_spacing);
    format.outline_level = role.outline_level();
    // No break in front of the very first text of the document
    format.page_break_before = Some(spec.page_break_before && context.has_preceding_content);
}

fn apply_run_format(paragraph: &mut Paragraph, spec: &StyleSpec) {
    if paragraph.runs.is_empty() {
        paragraph.runs.push(Run::new(""));
    }

    for run in &mut paragraph.runs {
        run.font.name = Some(spec.font_name.clone());
        run.font.size_pt = Some(spec.font_size_pt);
        if let Some(bold) = spec.bold {
            run.font.bold = Some(bold);
        }
        if let Some(italic) = spec.italic {
            run.font.italic = Some(italic);
        }

        if spec.text_transform == TextTransform::Uppercase {
            run.text = run.text.to_uppercase();
        }
    }
}
