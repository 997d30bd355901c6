use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cleanslate::algorithms;
use cleanslate::paths::{safe_roots, selection_size, PathEnumerator};
use cleanslate::ui::{human_bytes, ProgressBar};
use cleanslate::{WipeConfig, WipeEngine, WipeMethod, WipeReport};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "cleanslate")]
#[command(about = "Secure file wiping tool implementing industry-standard sanitization methods")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse one directory level; protected entries are marked
    List {
        /// Directory to list
        path: Option<PathBuf>,

        /// Show the user-data root directories instead
        #[arg(long)]
        roots: bool,
    },

    /// Permanently destroy the selected files (IRREVERSIBLE!)
    Wipe {
        /// Files or directories to wipe
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Wiping method (dod, nist, gutmann, random, zero)
        #[arg(short, long, default_value = "dod")]
        method: String,

        /// Override the method's standard pass count
        #[arg(short, long)]
        passes: Option<u32>,

        /// Skip post-wipe verification
        #[arg(long)]
        no_verify: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,

        /// Additional protected path prefix (repeatable)
        #[arg(long = "protect")]
        protect: Vec<String>,
    },

    /// Estimate how long a wipe would take
    Estimate {
        /// Files or directories that would be wiped
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Wiping method (dod, nist, gutmann, random, zero)
        #[arg(short, long, default_value = "dod")]
        method: String,

        /// Override the method's standard pass count
        #[arg(short, long)]
        passes: Option<u32>,
    },

    /// List supported wiping methods and their pass counts
    Methods,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { path, roots } => cmd_list(path, roots),
        Commands::Wipe {
            paths,
            method,
            passes,
            no_verify,
            yes,
            json,
            protect,
        } => cmd_wipe(paths, &method, passes, no_verify, yes, json, protect),
        Commands::Estimate {
            paths,
            method,
            passes,
        } => cmd_estimate(paths, &method, passes),
        Commands::Methods => {
            cmd_methods();
            Ok(())
        }
    }
}

fn cmd_list(path: Option<PathBuf>, roots: bool) -> Result<()> {
    if roots {
        for root in safe_roots() {
            println!("{}", root.display());
        }
        return Ok(());
    }

    let path = match path {
        Some(path) => path,
        None => safe_roots()
            .into_iter()
            .next()
            .context("no user-data roots found; pass a directory explicitly")?,
    };

    let enumerator = PathEnumerator::default();
    let items = enumerator.list(&path)?;

    println!("{}:", path.display());
    for item in items {
        let kind = if item.is_directory { "📁" } else { "  " };
        let lock = if item.is_protected { " 🔒" } else { "" };
        let size = if item.is_directory {
            String::new()
        } else {
            format!("  {}", human_bytes(item.size_bytes as f64))
        };
        println!("  {} {}{}{}", kind, item.name, size, lock);
    }

    Ok(())
}

fn cmd_wipe(
    paths: Vec<PathBuf>,
    method: &str,
    passes: Option<u32>,
    no_verify: bool,
    yes: bool,
    json: bool,
    protect: Vec<String>,
) -> Result<()> {
    let method = WipeMethod::from_str(method)?;
    let config = WipeConfig {
        method,
        passes,
        verify: !no_verify,
    };

    let mut enumerator = PathEnumerator::default();
    for prefix in protect {
        enumerator.protected_mut().add_prefix(prefix);
    }

    let tasks = enumerator.expand(&paths);
    if tasks.is_empty() {
        println!("Nothing to wipe: selection is empty or fully protected.");
        return Ok(());
    }

    let total_bytes: u64 = tasks.iter().map(|t| t.size_bytes).sum();
    let pass_total = algorithms::pass_count(method, passes);

    if !yes {
        println!("⚠️  This will PERMANENTLY destroy data. There is no undo.");
        println!(
            "  {} file(s), {} total, method {} ({} pass(es))",
            tasks.len(),
            human_bytes(total_bytes as f64),
            method.label(),
            pass_total
        );
        print!("Type 'WIPE' to confirm: ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if answer.trim() != "WIPE" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let engine = WipeEngine::new();

    // SIGINT/SIGTERM request cooperative cancellation; the current pass
    // still runs to its boundary.
    let token = engine.cancel_token();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            eprintln!("\nCancellation requested, stopping at the next pass boundary...");
            token.cancel();
        }
    });

    let report = if json {
        engine.run(&tasks, &config)?
    } else {
        let mut bar = ProgressBar::new(48);
        let report = engine.run_with_progress(&tasks, &config, |p| bar.render(p))?;
        bar.finish();
        report
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.verify);
    }

    if !report.success {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(report: &WipeReport, verify_requested: bool) {
    if report.success {
        println!("✅ Wipe {} ({})", report.outcome, report.job_id);
    } else {
        println!("❌ Wipe {} ({})", report.outcome, report.job_id);
    }

    println!(
        "  {} file(s), {} destroyed in {}",
        report.files_wiped,
        human_bytes(report.bytes_wiped as f64),
        humantime::format_duration(std::time::Duration::from_millis(report.time_elapsed_ms))
    );

    if verify_requested {
        if report.verification_passed {
            println!("  Verification: all targets removed");
        } else {
            println!("  Verification: FAILED (some targets may still exist)");
        }
    }

    for error in &report.errors {
        println!("  ⚠️  {}", error);
    }
}

fn cmd_estimate(paths: Vec<PathBuf>, method: &str, passes: Option<u32>) -> Result<()> {
    let method = WipeMethod::from_str(method)?;
    let config = WipeConfig {
        method,
        passes,
        verify: false,
    };

    let enumerator = PathEnumerator::default();
    let tasks = enumerator.expand(&paths);
    let total = selection_size(&paths);

    let estimate = WipeEngine::estimate_duration(&tasks, &config);
    println!(
        "{} file(s), {} selected ({} wipeable)",
        tasks.len(),
        human_bytes(total as f64),
        human_bytes(tasks.iter().map(|t| t.size_bytes).sum::<u64>() as f64)
    );
    println!(
        "Estimated time with {}: ~{}",
        method.label(),
        humantime::format_duration(estimate)
    );

    Ok(())
}

fn cmd_methods() {
    println!("Supported wiping methods:");
    for method in WipeMethod::ALL {
        println!(
            "  {:<8} {:>2} pass(es)  {}",
            method.to_string(),
            algorithms::pass_count(method, None),
            method.label()
        );
    }
}
