use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

// Import from resumate-core
use resumate_core::storage::load_resume;
use resumate_core::{FileStorage, ParseStages, ParsingConfig, ProcessOptions, ResumeProcessor, StructuredResume};

// Import CLI utilities
use resumate_cli::DataDir;

#[derive(Parser)]
#[command(name = "resumate")]
#[command(about = "A heuristic resume parser that keeps structured fields in a local store")]
struct Args {
    /// Path to the resume file to process (.pdf, anything else is read as text)
    #[arg(short, long)]
    input: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: json, keys, or yaml
    #[arg(short = 'f', long, default_value = "json")]
    output_format: String,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Resume store file (default: store.json in the user data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Parse without writing anything to the store
    #[arg(long)]
    no_persist: bool,

    /// Print the resume currently held in the store and exit
    #[arg(long)]
    show_stored: bool,

    /// Enable minimal parse mode (header only, body sections skipped)
    #[arg(long)]
    minimal_parse: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Skip cache and force fresh processing (useful for development/testing)
    #[arg(long)]
    skip_cache: bool,

    /// Parse cache directory (default: cache/ in the user data directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: raw text, lines, header boundary, segments, and final resume as separate files
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output (default: test_outputs/stages)
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🦀 Resumate Resume Parser");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    let data_dir = DataDir::new()?;
    let store_path = args.store.clone().unwrap_or_else(|| data_dir.store_path());

    if args.show_stored {
        return show_stored(&store_path, &args.output_format);
    }

    let Some(input) = args.input.as_deref() else {
        println!("⚠️  No input file given. Use --input <path>, or --show-configs for help.");
        return Ok(());
    };

    // Check if input file exists
    if !Path::new(input).exists() {
        println!("⚠️  Input resume not found at: {}", input);
        println!("   Please check the file path.");
        return Ok(());
    }

    let mut config = ParsingConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if args.minimal_parse {
        config.minimal_parse = true;
    }

    let cache_dir = args.cache_dir.clone().unwrap_or_else(|| data_dir.cache_dir());
    let mut processor = ResumeProcessor::new_cli(&store_path, Some(&cache_dir), config)?;
    tracing::debug!(
        "store at {}, parse cache at {}",
        store_path.display(),
        cache_dir.display()
    );

    println!("📄 Processing: {}", input);

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let bytes = std::fs::read(input).with_context(|| format!("reading {input}"))?;
        match processor.capture_stages(&bytes, input) {
            Ok(stages) => {
                save_stages(&stages, input, &args.stages_dir)?;
                println!("\n✅ All stages dumped to: {}", args.stages_dir);
            }
            Err(e) => {
                eprintln!("❌ Stage dump failed: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let options = ProcessOptions {
        skip_cache: args.skip_cache,
        profile: args.profile,
        persist: !args.no_persist,
    };

    match processor.process_file_with_options(Path::new(input), options) {
        Ok(resume) => {
            println!("✅ Successfully processed resume");
            print_metrics(&resume);

            if options.persist {
                println!("🗄️  Stored under: {}", store_path.display());
            } else {
                println!("🚫 Store left untouched (--no-persist)");
            }

            // Generate output path
            let output_path = if let Some(output) = &args.output {
                output.clone()
            } else {
                let input_name = Path::new(input)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let extension = if args.output_format == "yaml" { "yaml" } else { "json" };
                format!("{input_name}_resumate.{extension}")
            };

            save_resume_output(&resume, &output_path, &args.output_format)?;
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_metrics(resume: &StructuredResume) {
    println!("📊 Resume fields:");
    println!("   - Name: {}", resume.header.name);
    println!("   - Email: {}", or_dash(&resume.header.email));
    println!("   - Phone: {}", or_dash(&resume.header.phone));
    println!("   - Address: {}", or_dash(&resume.header.address));
    println!("   - Summary: {} chars", resume.summary.len());
    println!("   - Skills: {}", resume.skills.len());
    println!("   - Experience entries: {}", resume.experience.len());
    println!("   - Education entries: {}", resume.education.len());
    println!("   - Certifications: {}", resume.certifications.len());
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn show_stored(store_path: &Path, format: &str) -> Result<()> {
    if !store_path.exists() {
        println!("⚠️  No store found at: {}", store_path.display());
        return Ok(());
    }
    let store = FileStorage::new(store_path)?;
    let resume = load_resume(&store)?;
    println!("🗄️  Store: {}", store_path.display());
    println!("{}", resume.render(format)?);
    Ok(())
}

/// One row per command-line flag shown by --show-configs
const OPTION_HELP: &[(&str, &str)] = &[
    ("--config <path>", "Load custom config file"),
    ("--input <path>", "Resume file to process (.pdf or text)"),
    ("--output <path>", "Output file path (auto-generated if not specified)"),
    ("--output-format <fmt>", "Output format: json, keys, or yaml"),
    ("--show-configs", "Show this help and exit"),
    ("--store <path>", "Resume store file (default: user data directory)"),
    ("--no-persist", "Parse without touching the store"),
    ("--show-stored", "Print the stored resume and exit"),
    ("--minimal-parse", "Header only, skip section parsing"),
    ("--profile", "Time every pipeline step"),
    ("--skip-cache", "Ignore the parse cache"),
    ("--cache-dir <path>", "Parse cache directory (default: user data directory)"),
    ("--dump-stages", "Write every pipeline stage to --stages-dir"),
    ("--stages-dir <path>", "Stage dump directory (default: test_outputs/stages)"),
];

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    for (flag, description) in OPTION_HELP {
        println!("  {flag:<24}{description}");
    }

    println!("\n📄 Output Formats:");
    println!("  json  - Structured resume with schema version (default)");
    println!("  keys  - The exact key/value layout written to the store");
    println!("  yaml  - Same as json, as YAML");

    println!("\n🔧 Config keys (YAML):");
    println!("  header.fallback_window       Header lines scanned when no heading is found (8)");
    println!("  header.place_keywords        Whole words marking an address line");
    println!("  header.name_excluded_terms   Words that disqualify a name line");
    println!("  sections.headings            List of {{keyword, category}} heading rules");
    println!("  splitting.list_delimiters    Regex splitting skills/certifications");
    println!("  splitting.block_separator    Regex splitting experience/education entries");
    println!("  minimal_parse                Header only");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i resume.pdf");
    println!("  cargo run -- -i resume.txt -o /path/to/output.json");
    println!("  cargo run -- -i resume.pdf -c config.yaml -f keys");
    println!("  cargo run -- --show-stored -f yaml");
}

fn save_stages(stages: &ParseStages, input: &str, output_dir: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Raw text
    let raw_path = format!("{}/stage1_raw_text.txt", output_dir);
    fs::write(&raw_path, &stages.raw_text)?;
    println!("  💾 {} ({} chars)", raw_path, stages.raw_text.len());

    // Stage 2: Normalized lines
    let lines_path = format!("{}/stage2_lines.json", output_dir);
    fs::write(&lines_path, serde_json::to_string_pretty(&stages.lines)?)?;
    println!("  💾 {} ({} lines)", lines_path, stages.lines.len());

    // Stage 3: Header boundary and fields
    let header_path = format!("{}/stage3_header.json", output_dir);
    let header_json = serde_json::json!({
        "boundary": stages.boundary,
        "fields": stages.header,
    });
    fs::write(&header_path, serde_json::to_string_pretty(&header_json)?)?;
    println!("  💾 {} (header ends at line {})", header_path, stages.boundary.index);

    // Stage 4: Section segments
    let segments_path = format!("{}/stage4_segments.json", output_dir);
    fs::write(&segments_path, serde_json::to_string_pretty(&stages.segments)?)?;
    println!("  💾 {} ({} segments)", segments_path, stages.segments.len());

    // Stage 5: Final resume
    let resume_path = format!("{}/stage5_resume.json", output_dir);
    stages.resume.save_with_format(&resume_path, "json")?;
    println!("  💾 {}", resume_path);

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": input,
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "raw_text_chars": stages.raw_text.len(),
            "lines": stages.lines.len(),
            "header_lines": stages.boundary.index,
            "segments": stages.segments.len(),
            "skills": stages.resume.skills.len(),
            "experience": stages.resume.experience.len(),
            "education": stages.resume.education.len(),
        }
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}

fn save_resume_output(resume: &StructuredResume, output_path: &str, format: &str) -> Result<()> {
    resume.save_with_format(output_path, format)?;

    match format {
        "keys" => println!("💾 Store key layout saved to: {}", output_path),
        "yaml" => println!("💾 YAML results saved to: {}", output_path),
        "json" => println!("💾 JSON results saved to: {}", output_path),
        _ => {
            println!("⚠️  Unknown output format '{}', using default json format", format);
            println!("💾 JSON results saved to: {}", output_path);
        }
    }

    Ok(())
}
