use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layermerge::{BatchOpts, find_png_only_dirs, process_dirs, prune_empty_dirs};

#[derive(Parser, Debug)]
#[command(name = "layermerge", version, about = "Assemble layered images from .ipt descriptors")]
struct Cli {
    /// Log per-layer details.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge every .ipt descriptor in the given directories into PNGs.
    Merge(MergeArgs),
    /// List directories that contain only PNG files.
    Check(CheckArgs),
    /// Remove empty folders (including folders holding only empty folders).
    Clean(CleanArgs),
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Directories holding descriptors and their layer PNGs.
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    /// Output root; each input directory gets a subdirectory of the same name.
    #[arg(long, default_value = "merged")]
    output: PathBuf,

    /// Merge descriptors of a directory in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Decode every layer from disk each time instead of caching per directory.
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Write a JSON report of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Directory to search.
    #[arg(short, long, default_value = "merged")]
    dir: PathBuf,
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Directories to clean.
    paths: Vec<PathBuf>,

    /// Also clean the current directory.
    #[arg(long, default_value_t = false)]
    current: bool,

    /// Only report what would be removed.
    #[arg(short = 'n', long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Merge(args) => cmd_merge(args),
        Command::Check(args) => cmd_check(args),
        Command::Clean(args) => cmd_clean(args),
    }
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let opts = BatchOpts {
        output_root: args.output,
        parallel: args.parallel,
        threads: args.threads,
        cache_images: !args.no_cache,
    };
    if opts.threads == Some(0) {
        anyhow::bail!("--threads must be >= 1");
    }

    let report = process_dirs(&args.dirs, &opts);

    if let Some(path) = &args.report {
        layermerge::ensure_parent_dir(path)?;
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!(
        "merged {} file(s), {} failed, {} director{} skipped",
        report.merged_count(),
        report.failed_count(),
        report.skipped_dirs.len(),
        if report.skipped_dirs.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let found = find_png_only_dirs(&args.dir)?;
    if found.is_empty() {
        println!("no PNG-only directories under {}", args.dir.display());
        return Ok(());
    }

    println!("{} PNG-only director(ies):", found.len());
    for (i, d) in found.iter().enumerate() {
        let shown = d
            .path
            .strip_prefix(&args.dir)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(d.path.as_path());
        println!("{:3}. {} ({} png)", i + 1, shown.display(), d.png_count);
    }
    Ok(())
}

fn cmd_clean(args: CleanArgs) -> anyhow::Result<()> {
    let mut dirs = args.paths;
    if args.current {
        dirs.push(PathBuf::from("."));
    }
    if dirs.is_empty() {
        anyhow::bail!("no directories given (pass paths or --current)");
    }
    dirs.sort();
    dirs.dedup();

    let (mut checked, mut removed) = (0usize, 0usize);
    for dir in &dirs {
        match prune_empty_dirs(dir, args.dry_run) {
            Ok(r) => {
                checked += r.checked;
                removed += r.removed.len();
            }
            Err(e) => tracing::warn!("skipping '{}': {e}", dir.display()),
        }
    }

    let verb = if args.dry_run { "would remove" } else { "removed" };
    eprintln!("checked {checked} folder(s), {verb} {removed} empty folder(s)");
    Ok(())
}
