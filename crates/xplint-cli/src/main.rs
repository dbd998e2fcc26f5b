use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use xplint::{
    FileLintResult, LintConfig, LintRule, ValidatorRegistry, lint_directory, lint_file,
};

#[derive(Parser)]
#[command(name = "xplint")]
#[command(about = "Lint correlation, enrichment and normalization rule sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a rule file or every rule file in a directory (recursive)
    ///
    /// The dialect is taken from the file extension: `.co` correlation,
    /// `.en` enrichment, `.xp` normalization. Exits non-zero when any
    /// error-level diagnostic is reported.
    Lint {
        /// Path to a rule file or directory
        path: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Maximum diagnostics per validator and document
        #[arg(long = "max-problems")]
        max_problems: Option<usize>,

        /// Lint config file (default: nearest `.xplint.yml` above the path)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable a rule by code (can be specified multiple times)
        #[arg(short, long = "disable")]
        disable: Vec<String>,
    },

    /// List the built-in rules
    Rules {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lint {
            path,
            json,
            max_problems,
            config,
            disable,
        } => cmd_lint(path, json, max_problems, config, disable),
        Commands::Rules { json } => cmd_rules(json),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_lint(
    path: PathBuf,
    json: bool,
    max_problems: Option<usize>,
    config_path: Option<PathBuf>,
    disable: Vec<String>,
) {
    let mut config = load_config(&path, config_path.as_deref());

    let mut overrides = LintConfig {
        max_number_of_problems: max_problems,
        ..Default::default()
    };
    for code in &disable {
        match LintRule::from_code(code) {
            Some(rule) => {
                overrides.disabled_rules.insert(rule);
            }
            None => {
                eprintln!("Unknown rule '{code}' (see `xplint rules`)");
                process::exit(1);
            }
        }
    }
    config.merge(&overrides);

    let registry = ValidatorRegistry::with_defaults();
    let results = if path.is_dir() {
        lint_directory(&registry, &path, &config)
    } else {
        lint_file(&registry, &path, &config).map(|r| vec![r])
    };
    let results = match results {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error linting {}: {e}", path.display());
            process::exit(1);
        }
    };

    if json {
        print_json(&results);
    } else {
        print_report(&results);
    }

    if results.iter().any(FileLintResult::has_errors) {
        process::exit(1);
    }
}

#[derive(Serialize)]
struct RuleInfo {
    code: &'static str,
    severity: String,
    languages: &'static [&'static str],
    summary: &'static str,
}

fn cmd_rules(json: bool) {
    let registry = ValidatorRegistry::with_defaults();
    let rules: Vec<RuleInfo> = registry
        .iter()
        .map(|v| {
            let rule = v.rule();
            RuleInfo {
                code: rule.code(),
                severity: rule.default_severity().to_string(),
                languages: v.languages(),
                summary: rule.summary(),
            }
        })
        .collect();

    if json {
        print_json(&rules);
        return;
    }

    for r in &rules {
        println!(
            "{:<30} {:<8} {:<6} {}",
            r.code,
            r.severity,
            r.languages.join(","),
            r.summary
        );
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path, explicit: Option<&Path>) -> LintConfig {
    let found = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => LintConfig::find_in_ancestors(path),
    };
    let Some(config_path) = found else {
        return LintConfig::default();
    };

    match LintConfig::load(&config_path) {
        Ok(config) => {
            log::info!("using lint config {}", config_path.display());
            config
        }
        Err(e) => {
            eprintln!("Error loading config {}: {e}", config_path.display());
            process::exit(1);
        }
    }
}

fn print_report(results: &[FileLintResult]) {
    let mut errors = 0;
    let mut warnings = 0;

    for result in results {
        if let Some(e) = &result.error {
            println!("{}: {e}", result.path.display());
            errors += 1;
            continue;
        }
        if result.diagnostics.is_empty() {
            continue;
        }
        println!("{}", result.path.display());
        for d in &result.diagnostics {
            println!("  {}", d.to_string().replace('\n', "\n  "));
        }
        errors += result.error_count();
        warnings += result.warning_count();
    }

    println!(
        "Checked {} file(s): {errors} error(s), {warnings} warning(s)",
        results.len()
    );
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(j) => println!("{j}"),
        Err(e) => {
            eprintln!("JSON serialization error: {e}");
            process::exit(1);
        }
    }
}
