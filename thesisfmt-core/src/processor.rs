use crate::config::FormattingRules;
use crate::containers::DocumentContainer;
use crate::rules::engine::{FormattingPipeline, FormattingTrace};
use crate::rules::validation::{ComplianceValidator, ValidationReport};
use crate::stats::StatisticsSnapshot;
use anyhow::{bail, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for processing steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        log::info!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        log::info!("📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            log::info!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        log::info!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// File-level driver: open → format → save, with optional step timing
pub struct DocumentProcessor {
    container: Box<dyn DocumentContainer>,
}

impl DocumentProcessor {
    pub fn new(container: Box<dyn DocumentContainer>) -> Self {
        Self { container }
    }

    fn check_supported(&self, path: &Path) -> Result<()> {
        if !self.container.supports_file_type(path) {
            bail!(
                "{} does not support {}",
                self.container.name(),
                path.display()
            );
        }
        Ok(())
    }

    /// Format `input` with `rules` and write the result to `output`
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        rules: &FormattingRules,
        enable_profiling: bool,
    ) -> Result<StatisticsSnapshot> {
        let trace = self.process_file_traced(input, output, rules, enable_profiling)?;
        Ok(trace.statistics)
    }

    /// Like [`process_file`](Self::process_file), keeping the per-paragraph trace
    pub fn process_file_traced(
        &self,
        input: &Path,
        output: &Path,
        rules: &FormattingRules,
        enable_profiling: bool,
    ) -> Result<FormattingTrace> {
        self.check_supported(input)?;
        let mut profiler = StepProfiler::new(enable_profiling);
        let start_time = Instant::now();

        log::info!("📄 Processing document: {}", input.display());

        let pipeline = profiler.time_step("Rule validation", || FormattingPipeline::new(rules))?;
        let mut document = profiler.time_step("Open document", || self.container.open(input))?;
        let trace = profiler.time_step("Classify and format", || pipeline.run_traced(&mut document))?;
        profiler.time_step("Save document", || self.container.save(&document, output))?;

        log::info!("💾 Saved formatted document to {}", output.display());
        log::info!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        profiler.print_summary();

        Ok(trace)
    }

    /// Check `input` against `rules` without modifying it
    pub fn validate_file(&self, input: &Path, rules: &FormattingRules) -> Result<ValidationReport> {
        self.check_supported(input)?;
        let validator = ComplianceValidator::new(rules)?;
        let document = self.container.open(input)?;
        Ok(validator.validate(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::JsonContainer;
    use crate::types::Document;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("thesisfmt-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_profiler_disabled_records_nothing() {
        let mut profiler = StepProfiler::new(false);
        let value = profiler.time_step("step", || 42);
        assert_eq!(value, 42);
        assert!(profiler.timings().is_empty());
    }

    #[test]
    fn test_profiler_records_steps() {
        let mut profiler = StepProfiler::new(true);
        profiler.time_step("a", || ());
        profiler.time_step("b", || ());
        let names: Vec<_> = profiler.timings().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_process_then_validate() {
        let dir = scratch_dir("processor");
        let input = dir.join("thesis.json");
        let output = dir.join("out").join("thesis_formatted.json");
        let container = JsonContainer::new();
        let document = Document::from_lines(["INTRODUCTION", "Body text.", "- item"]);
        container.save(&document, &input).unwrap();

        let processor = DocumentProcessor::new(Box::new(JsonContainer::new()));
        let rules = FormattingRules::default();
        let stats = processor.process_file(&input, &output, &rules, true).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.heading1, 1);

        let before = processor.validate_file(&input, &rules).unwrap();
        let after = processor.validate_file(&output, &rules).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(before.score() < after.score());
        assert!(after.is_compliant());
    }

    #[test]
    fn test_unsupported_extension() {
        let processor = DocumentProcessor::new(Box::new(JsonContainer::new()));
        let err = processor
            .validate_file(Path::new("thesis.docx"), &FormattingRules::default())
            .unwrap_err();
        assert!(err.to_string().contains("does not support"));
    }
}
