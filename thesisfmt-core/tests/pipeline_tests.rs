//! End-to-end formatting pipeline tests.
//!
//! Runs whole documents through `FormattingPipeline` and checks the
//! properties every run must have:
//!
//! - regions only move forward (before content → contents → main content)
//! - every paragraph is counted exactly once
//! - nothing before main content is touched
//! - formatting twice is the same as formatting once
//!
//! Fixture documents live in `test_fixtures/`.

use proptest::prelude::*;
use std::path::PathBuf;
use thesisfmt_core::config::{FormattingRules, RoleRule, StyleSpec, TextTransform};
use thesisfmt_core::containers::{DocumentContainer, JsonContainer};
use thesisfmt_core::error::{ConfigError, FormatError};
use thesisfmt_core::rules::engine::{run, FormattingPipeline};
use thesisfmt_core::rules::validation::ComplianceValidator;
use thesisfmt_core::state::RegionState;
use thesisfmt_core::types::{Alignment, Document, Paragraph, ParagraphRole};

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn load_thesis() -> Document {
    let path = fixtures_dir().join("thesis_ru.json");
    JsonContainer::new()
        .open(&path)
        .unwrap_or_else(|e| panic!("Missing fixture {}: {e:#}", path.display()))
}

fn load_rules(name: &str) -> FormattingRules {
    let path = fixtures_dir().join(name);
    FormattingRules::load_from_file(path.to_str().expect("fixture path is UTF-8"))
        .unwrap_or_else(|e| panic!("Invalid rules fixture {}: {e:#}", path.display()))
}

fn six_line_manuscript() -> Document {
    Document::from_lines([
        "FACULTY OF COMPUTER SCIENCE",
        "TABLE OF CONTENTS",
        "1 Introduction ... 3",
        "1 INTRODUCTION",
        "Some body text.",
        "- a list item",
    ])
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn six_line_manuscript_roles_and_counts() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = six_line_manuscript();
        let trace = pipeline.run_traced(&mut document).unwrap();

        let roles: Vec<_> = trace.entries.iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![
                ParagraphRole::Skip,
                ParagraphRole::Skip,
                ParagraphRole::Skip,
                ParagraphRole::Heading1,
                ParagraphRole::RegularText,
                ParagraphRole::ListItem,
            ]
        );

        let stats = trace.statistics;
        assert_eq!(stats.heading1, 1);
        assert_eq!(stats.heading2, 0);
        assert_eq!(stats.list_item, 1);
        assert_eq!(stats.regular_text, 1);
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.total, 6);
    }

    #[test]
    fn six_line_manuscript_styles() {
        let (document, _) = run(six_line_manuscript(), &FormattingRules::default()).unwrap();

        let heading = &document.paragraphs[3];
        assert_eq!(heading.format.alignment, Some(Alignment::Center));
        assert_eq!(heading.format.outline_level, Some(1));
        assert_eq!(heading.runs[0].font.bold, Some(true));

        let body = &document.paragraphs[4];
        assert_eq!(body.format.alignment, Some(Alignment::Justify));
        assert_eq!(body.runs[0].font.name.as_deref(), Some("Times New Roman"));

        let item = &document.paragraphs[5];
        assert_eq!(item.text(), "- a list item");
        assert_eq!(item.format.left_indent_cm, Some(1.25));
    }

    #[test]
    fn empty_document() {
        let (document, stats) = run(Document::default(), &FormattingRules::default()).unwrap();
        assert!(document.is_empty());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.skipped, 0);
        assert!(!stats.title_page_detected);
        assert!(!stats.table_of_contents_detected);
        assert!(!stats.main_content_found);
    }

    #[test]
    fn rules_missing_list_item_fail_before_any_mutation() {
        let rules = load_rules("rules_missing_list_item.yaml");
        let original = six_line_manuscript();

        let pipeline_err = FormattingPipeline::new(&rules).unwrap_err();
        assert!(matches!(
            pipeline_err,
            FormatError::Configuration(ConfigError::MissingRole(ParagraphRole::ListItem))
        ));

        let mut document = original.clone();
        assert!(FormattingPipeline::new(&rules)
            .and_then(|p| p.run(&mut document))
            .is_err());
        assert_eq!(document, original);
    }

    #[test]
    fn russian_thesis_fixture() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = load_thesis();
        let trace = pipeline.run_traced(&mut document).unwrap();
        let stats = &trace.statistics;

        assert_eq!(stats.total, 20);
        assert_eq!(stats.skipped, 10);
        assert_eq!(stats.heading1, 3);
        assert_eq!(stats.heading2, 1);
        assert_eq!(stats.list_item, 2);
        assert_eq!(stats.regular_text, 4);
        assert!(stats.title_page_detected);
        assert!(stats.table_of_contents_detected);
        assert!(stats.main_content_found);

        let transitions: Vec<_> = trace
            .entries
            .iter()
            .filter_map(|e| e.transition.map(|t| (e.index, t.to)))
            .collect();
        assert_eq!(
            transitions,
            vec![
                (5, RegionState::InTableOfContents),
                (10, RegionState::InMainContent)
            ]
        );

        // Emphasis inside body text survives; font family and size do not
        let body = &document.paragraphs[11];
        assert_eq!(body.runs.len(), 3);
        assert_eq!(body.runs[1].font.italic, Some(true));
        assert_eq!(body.runs[1].font.size_pt, Some(14.0));
        assert_eq!(body.format.line_spacing, Some(1.5));
        assert_eq!(body.format.alignment, Some(Alignment::Justify));
    }

    #[test]
    fn uppercase_headings_and_noop_lists() {
        let rules = load_rules("rules_uppercase_headings.yaml");
        let document = Document::from_lines(["Введение", "2. Methods", "1.1 Scope", "- item"]);
        let (document, stats) = run(document, &rules).unwrap();

        assert_eq!(document.paragraphs[0].text(), "ВВЕДЕНИЕ");
        assert_eq!(document.paragraphs[1].text(), "2. METHODS");
        // Only level-1 headings ask for the transform
        assert_eq!(document.paragraphs[2].text(), "1.1 Scope");

        // noop list items are counted but untouched
        assert_eq!(stats.list_item, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.formatted(), 3);
        assert_eq!(document.paragraphs[3], Paragraph::from_text("- item"));
        assert_eq!(rules.rule_for(ParagraphRole::ListItem), Some(&RoleRule::noop()));
    }

    #[test]
    fn uppercase_transform_on_body_roles_is_rejected() {
        for role in [ParagraphRole::Heading2, ParagraphRole::ListItem, ParagraphRole::RegularText] {
            let mut rules = FormattingRules::default();
            rules.roles.insert(
                role,
                RoleRule::Format(StyleSpec {
                    text_transform: TextTransform::Uppercase,
                    ..StyleSpec::default()
                }),
            );
            assert!(matches!(
                FormattingPipeline::new(&rules),
                Err(FormatError::Configuration(ConfigError::InvalidValue { .. }))
            ));
        }
    }

    #[test]
    fn numbered_first_chapter_starts_main_content() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = Document::from_lines([
            "СОДЕРЖАНИЕ",
            "1 Обзор литературы ..... 5",
            "1 ОБЗОР ЛИТЕРАТУРЫ",
            "Текст раздела.",
            "1.1 Подходы",
        ]);
        let trace = pipeline.run_traced(&mut document).unwrap();

        let roles: Vec<_> = trace.entries.iter().map(|e| e.role).collect();
        assert_eq!(
            roles,
            vec![
                ParagraphRole::Skip,
                ParagraphRole::Skip,
                ParagraphRole::Heading1,
                ParagraphRole::RegularText,
                ParagraphRole::Heading2
            ]
        );
        assert!(trace.statistics.main_content_found);
        assert_eq!(document.paragraphs[2].format.outline_level, Some(1));
    }

    #[test]
    fn formatted_fixture_validates_clean() {
        let rules = FormattingRules::default();
        let validator = ComplianceValidator::new(&rules).unwrap();
        let before = validator.validate(&load_thesis());
        let (document, _) = run(load_thesis(), &rules).unwrap();
        let after = validator.validate(&document);

        assert!(before.warnings > 0);
        assert!(after.issues.is_empty(), "{:#?}", after.issues);
        assert_eq!(after.score(), 100);
    }

    #[test]
    fn formatted_document_survives_json_container() {
        let dir = std::env::temp_dir().join(format!("thesisfmt-it-{}", std::process::id()));
        let path = dir.join("formatted.json");
        let container = JsonContainer::new();

        let (document, _) = run(load_thesis(), &FormattingRules::default()).unwrap();
        container.save(&document, &path).unwrap();
        let reopened = container.open(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(reopened.len(), document.len());
        for (a, b) in reopened.paragraphs.iter().zip(&document.paragraphs) {
            assert_eq!(a.text(), b.text());
            assert_eq!(a.format, b.format);
        }
    }
}

// ============================================================================
// Classification edge cases
// ============================================================================

mod edge_cases {
    use super::*;

    fn roles_of(lines: &[&str]) -> Vec<ParagraphRole> {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = Document::from_lines(lines.iter().copied());
        pipeline
            .run_traced(&mut document)
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.role)
            .collect()
    }

    #[test]
    fn landmark_line_is_classified_after_transition() {
        let roles = roles_of(&["INTRODUCTION", "Text."]);
        assert_eq!(roles, vec![ParagraphRole::Heading1, ParagraphRole::RegularText]);
    }

    #[test]
    fn no_main_content_means_everything_skipped() {
        let roles = roles_of(&["CONTENTS", "Chapter one ..... 1", "Some text", "- list"]);
        assert!(roles.iter().all(|r| *r == ParagraphRole::Skip));
    }

    #[test]
    fn toc_entry_does_not_start_main_content() {
        let roles = roles_of(&["CONTENTS", "Introduction ..... 3", "12", "INTRODUCTION"]);
        assert_eq!(
            roles,
            vec![
                ParagraphRole::Skip,
                ParagraphRole::Skip,
                ParagraphRole::Skip,
                ParagraphRole::Heading1
            ]
        );
    }

    #[test]
    fn heading1_wins_over_heading2() {
        let roles = roles_of(&["INTRODUCTION", "1.1 OVERVIEW", "1.2 Details"]);
        assert_eq!(
            roles,
            vec![
                ParagraphRole::Heading1,
                ParagraphRole::Heading1,
                ParagraphRole::Heading2
            ]
        );
    }

    #[test]
    fn blank_paragraphs_in_main_content_are_regular_text() {
        let roles = roles_of(&["ВВЕДЕНИЕ", "", "   "]);
        assert_eq!(
            roles,
            vec![
                ParagraphRole::Heading1,
                ParagraphRole::RegularText,
                ParagraphRole::RegularText
            ]
        );
    }

    #[test]
    fn blank_paragraph_with_heading_style_is_regular_text() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = Document::from_lines(["INTRODUCTION"]);
        document
            .paragraphs
            .push(Paragraph::from_text("   ").with_style("Heading 1"));
        let trace = pipeline.run_traced(&mut document).unwrap();

        let roles: Vec<_> = trace.entries.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![ParagraphRole::Heading1, ParagraphRole::RegularText]);
        assert_eq!(trace.statistics.heading1, 1);
        let blank = &document.paragraphs[1].format;
        assert_eq!(blank.outline_level, None);
        assert_eq!(blank.page_break_before, Some(false));
    }

    #[test]
    fn paragraph_without_runs_is_given_one() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = Document::from_lines(["INTRODUCTION"]);
        document.paragraphs.push(Paragraph::default());
        pipeline.run(&mut document).unwrap();
        assert_eq!(document.paragraphs[1].runs.len(), 1);
        assert_eq!(document.paragraphs[1].runs[0].font.size_pt, Some(14.0));
    }

    #[test]
    fn protected_paragraph_aborts_run() {
        let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
        let mut document = six_line_manuscript();
        document.paragraphs[4].protected = true;
        match pipeline.run(&mut document) {
            Err(FormatError::Mutation { index, .. }) => assert_eq!(index, 4),
            other => panic!("expected mutation error, got {other:?}"),
        }
        // Heading before the failure was already formatted
        assert_eq!(document.paragraphs[3].format.outline_level, Some(1));
    }
}

// ============================================================================
// Properties over generated documents
// ============================================================================

mod properties {
    use super::*;

    /// Lines from every detector category, so generated documents hit all
    /// region transitions and roles
    const SAMPLE_LINES: &[&str] = &[
        "FACULTY OF MATHEMATICS",
        "Кафедра информатики",
        "Иванов И.И.",
        "TABLE OF CONTENTS",
        "СОДЕРЖАНИЕ",
        "1 Introduction ..... 3",
        "Заключение … 40",
        "- 12 -",
        "INTRODUCTION",
        "1. ВВЕДЕНИЕ",
        "CHAPTER 1",
        "2 RELATED WORK",
        "2.1 Prior art",
        "1.1 OVERVIEW",
        "- bullet point",
        "а) пункт списка",
        "Ordinary body sentence.",
        "",
    ];

    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => prop::sample::select(SAMPLE_LINES).prop_map(|line| line.to_string()),
            1 => "[a-zA-Zа-яА-Я0-9 .,-]{0,40}",
        ]
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        prop::collection::vec(line_strategy(), 0..40).prop_map(Document::from_lines)
    }

    proptest! {
        #[test]
        fn regions_never_regress(document in document_strategy()) {
            let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
            let mut document = document;
            let trace = pipeline.run_traced(&mut document).unwrap();

            let regions: Vec<_> = trace.entries.iter().map(|e| e.region).collect();
            for pair in regions.windows(2) {
                prop_assert!(pair[0] <= pair[1], "region regressed: {:?}", pair);
            }
            for entry in &trace.entries {
                if let Some(t) = entry.transition {
                    prop_assert!(t.from < t.to);
                }
            }
        }

        #[test]
        fn every_paragraph_counted_once(document in document_strategy()) {
            let len = document.len();
            let (_, stats) = run(document, &FormattingRules::default()).unwrap();
            prop_assert_eq!(stats.total, len);
            prop_assert_eq!(
                stats.heading1 + stats.heading2 + stats.list_item + stats.regular_text + stats.skipped,
                stats.total
            );
        }

        #[test]
        fn front_matter_is_untouched(document in document_strategy()) {
            let original = document.clone();
            let pipeline = FormattingPipeline::new(&FormattingRules::default()).unwrap();
            let mut document = document;
            let trace = pipeline.run_traced(&mut document).unwrap();

            for entry in &trace.entries {
                if entry.region != RegionState::InMainContent {
                    prop_assert_eq!(entry.role, ParagraphRole::Skip);
                    prop_assert_eq!(&document.paragraphs[entry.index], &original.paragraphs[entry.index]);
                }
            }
        }

        #[test]
        fn formatting_is_idempotent(document in document_strategy()) {
            let rules = FormattingRules::default();
            let (once, first) = run(document, &rules).unwrap();
            let (twice, second) = run(once.clone(), &rules).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn formatting_is_idempotent_with_uppercase_headings(document in document_strategy()) {
            let rules = load_rules("rules_uppercase_headings.yaml");
            let (once, first) = run(document, &rules).unwrap();
            let (twice, second) = run(once.clone(), &rules).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn arbitrary_text_never_fails(lines in prop::collection::vec("\\PC{0,60}", 0..20)) {
            let len = lines.len();
            let (_, stats) = run(Document::from_lines(lines), &FormattingRules::default()).unwrap();
            prop_assert_eq!(stats.total, len);
        }
    }
}
