use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

// Import from thesisfmt-core
use thesisfmt_core::requirements::{extract_rules, BuiltinRequirements, StructuredRequirements};
use thesisfmt_core::{
    DocumentProcessor, FormattingRules, FormattingTrace, JsonContainer, StatisticsSnapshot,
    ValidationReport,
};

#[derive(Parser)]
#[command(name = "thesisfmt")]
#[command(about = "Reformat an academic manuscript to a fixed set of formatting requirements")]
struct Args {
    /// Path to the manuscript (paragraph model as JSON)
    #[arg(short, long, required_unless_present = "show_rules")]
    input: Option<String>,

    /// Output file path (default: <input>_formatted.json next to the input)
    #[arg(short, long)]
    output: Option<String>,

    /// Formatting rules file (YAML or JSON); built-in rules when omitted
    #[arg(short, long)]
    rules: Option<String>,

    /// Requirements document written as a YAML rules document
    #[arg(long, conflicts_with = "rules")]
    requirements: Option<String>,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    report: Option<String>,

    /// Write the per-paragraph classification trace as JSON to this path
    #[arg(long)]
    dump_trace: Option<String>,

    /// Check the input against the rules without formatting it
    #[arg(long)]
    validate: bool,

    /// Print the effective rules as YAML and exit
    #[arg(long)]
    show_rules: bool,

    /// Time each processing step
    #[arg(long)]
    profile: bool,

    /// Log every paragraph decision
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("📝 Thesisfmt Manuscript Formatter");

    if let Err(e) = run(&args) {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let rules = load_rules(args)?;

    if args.show_rules {
        println!("{}", rules.to_yaml_string()?);
        return Ok(());
    }

    let Some(input_arg) = args.input.as_deref() else {
        anyhow::bail!("no input manuscript given (use --input)");
    };
    let input = Path::new(input_arg);
    if !input.exists() {
        anyhow::bail!("input manuscript not found at {}", input.display());
    }

    let processor = DocumentProcessor::new(Box::new(JsonContainer::new()));
    let fingerprint = rules.fingerprint()?;
    println!("📋 Rules fingerprint: {}", &fingerprint[..12]);

    if args.validate {
        let report = processor.validate_file(input, &rules)?;
        print_validation(&report);
        if let Some(report_path) = &args.report {
            write_json(report_path, &report)?;
            println!("💾 Validation report saved to: {report_path}");
        }
        return Ok(());
    }

    let output = output_path(input, args.output.as_deref());
    println!("📄 Processing: {}", input.display());

    let trace = processor
        .process_file_traced(input, &output, &rules, args.profile)
        .context("processing failed")?;

    println!("✅ Successfully formatted manuscript");
    print_statistics(&trace.statistics);
    println!("💾 Formatted manuscript saved to: {}", output.display());

    if let Some(trace_path) = &args.dump_trace {
        save_trace(&trace, trace_path)?;
    }
    if let Some(report_path) = &args.report {
        let report = serde_json::json!({
            "input": input_arg,
            "output": output.display().to_string(),
            "rules_fingerprint": fingerprint,
            "formatted_at": chrono::Utc::now().to_rfc3339(),
            "statistics": trace.statistics,
        });
        write_json(report_path, &report)?;
        println!("💾 Statistics report saved to: {report_path}");
    }

    Ok(())
}

/// Rules from a requirements document, a rules file, or the built-in set
fn load_rules(args: &Args) -> Result<FormattingRules> {
    if let Some(path) = &args.requirements {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read requirements {path}"))?;
        println!("📋 Extracting rules from requirements: {path}");
        return extract_rules(&StructuredRequirements, &text);
    }

    if let Some(path) = &args.rules {
        let rules = FormattingRules::load_from_file(path)?;
        rules.validate()?;
        println!("📋 Loaded rules from: {path}");
        return Ok(rules);
    }

    println!("📋 Using built-in formatting rules");
    extract_rules(&BuiltinRequirements, "")
}

fn output_path(input: &Path, output: Option<&str>) -> PathBuf {
    if let Some(output) = output {
        return PathBuf::from(output);
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_formatted.json"))
}

fn print_statistics(stats: &StatisticsSnapshot) {
    println!("📊 Paragraph statistics:");
    println!("   - Level-1 headings: {}", stats.heading1);
    println!("   - Level-2 headings: {}", stats.heading2);
    println!("   - List items: {}", stats.list_item);
    println!("   - Regular text: {}", stats.regular_text);
    println!("   - Left unchanged (noop rules): {}", stats.unchanged);
    println!("   - Skipped: {}", stats.skipped);
    println!("   - Total: {}", stats.total);
    println!(
        "   - Title page: {}, table of contents: {}, main content: {}",
        yes_no(stats.title_page_detected),
        yes_no(stats.table_of_contents_detected),
        yes_no(stats.main_content_found)
    );
}

fn print_validation(report: &ValidationReport) {
    let verdict = if report.is_compliant() { "✅" } else { "⚠️ " };
    println!(
        "{verdict} Compliance score: {}/100 ({} errors, {} warnings, {} info)",
        report.score(),
        report.errors,
        report.warnings,
        report.info
    );
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn save_trace(trace: &FormattingTrace, path: &str) -> Result<()> {
    write_json(path, &trace.entries)?;
    println!("💾 Classification trace saved to: {path} ({} paragraphs)", trace.entries.len());
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
    Ok(())
}
