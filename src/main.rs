use clap::Parser;
use go_repack::{
    PackagePolicy, RenameOpts, RenameReport, RenameResponse, collect_import_rules,
    parse_import_rule, rename,
};
use std::fs;
use std::path::PathBuf;

/// Re-namespace a Go source tree: rewrite package clauses and import paths
#[derive(Parser, Debug)]
#[command(name = "go-repack")]
#[command(version)]
#[command(about = "Rewrite Go package clauses and import paths in place", long_about = None)]
struct Args {
    /// Root of the source tree
    #[arg(default_value = ".")]
    root: PathBuf,

    /// JSON file with rename options (flags below override or extend it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base canonical package path, joined with each file's directory
    #[arg(short, long)]
    package: Option<String>,

    /// Import prefix rule OLD=NEW (repeatable, each OLD at most once;
    /// overrides the config file's rule for the same OLD)
    #[arg(short, long = "import", value_name = "OLD=NEW", value_parser = parse_import_rule)]
    imports: Vec<(String, String)>,

    /// Path relative to the root to skip (repeatable)
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// How package clauses are rewritten
    #[arg(long, value_enum)]
    policy: Option<PackagePolicy>,

    /// Report what would change without writing files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every visited file and replacement
    #[arg(short, long)]
    verbose: bool,
}

/// Merge the optional config file with command-line flags
fn build_opts(args: &Args) -> go_repack::Result<RenameOpts> {
    let mut opts = match &args.config {
        Some(path) => RenameOpts::from_json_file(path)?,
        None => RenameOpts::default(),
    };

    if let Some(package) = &args.package {
        opts.package = Some(package.clone());
    }
    opts.imports.extend(collect_import_rules(args.imports.iter().cloned())?);
    opts.exclude.extend(args.exclude.iter().cloned());
    if let Some(policy) = args.policy {
        opts.policy = policy;
    }
    opts.dry_run |= args.dry_run;

    Ok(opts)
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = build_opts(&args).and_then(|opts| rename(&args.root, &opts));

    let response = match result {
        Ok(report) => RenameResponse::success(report),
        Err(e) => RenameResponse::failure(e.to_string()),
    };

    output_response(&response, args.json, args.output.as_ref());

    if !response.success {
        std::process::exit(1);
    }
}

/// Human-readable run summary
fn summary(report: &RenameReport) -> String {
    let mut lines = Vec::new();
    for file in &report.files {
        if file.changed {
            lines.push(format!(
                "{} {} ({} replacement(s))",
                if report.dry_run { "would rewrite" } else { "rewrote" },
                file.path.display(),
                file.replacements.len()
            ));
        }
    }
    for path in &report.skipped {
        lines.push(format!("skipped {}", path.display()));
    }
    lines.push(format!(
        "Visited {} file(s): {} changed, {} unchanged, {} skipped",
        report.files.len(),
        report.changed_count(),
        report.unchanged_count(),
        report.skipped.len()
    ));
    lines.join("\n")
}

/// Format and output the response
fn output_response(response: &RenameResponse, json_mode: bool, output_path: Option<&PathBuf>) {
    let output = if json_mode {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| {
            r#"{"success": false, "error": "Failed to serialize response"}"#.to_string()
        })
    } else {
        match (&response.report, &response.error) {
            (Some(report), _) => summary(report),
            (None, error) => format!("Error: {}", error.as_deref().unwrap_or("Unknown error")),
        }
    };

    // Write to file or stdout
    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("Failed to write output to '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    } else {
        println!("{}", output);
    }
}
