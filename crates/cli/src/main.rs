use anyhow::Context;
use clap::{ArgAction, ArgGroup, Parser};
use common::{HeaderStateParser, StateParser, CIRCUIT_FILE};
use librarian::Registry;
use std::io::Write;
use std::path::{Path, PathBuf};
use stevedore::ArchiveOptions;

mod paths;

#[derive(Parser)]
#[command(name = "schemazip", version)]
#[command(about = "Packages circuit schematics and their component dependencies into portable archives")]
#[command(group(
    ArgGroup::new("targets")
        .required(true)
        .multiple(true)
        .args(["architecture", "level"])
))]
struct Cli {
    /// Name of an architecture schematic to package (repeatable).
    #[arg(short, long, action = ArgAction::Append)]
    architecture: Vec<String>,

    /// Name of a level schematic directory, e.g. "not_gate" or
    /// "not_gate/Default" (repeatable).
    #[arg(short, long, action = ArgAction::Append)]
    level: Vec<String>,

    /// Increase log level (-v lists archived paths, -vv also lists skipped
    /// empty files).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Archive zero-length files instead of skipping them.
    #[arg(short = 'e', long)]
    include_empty_files: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = ArchiveOptions {
        include_empty_files: cli.include_empty_files,
        verbosity: cli.verbose,
    };

    let base = paths::save_root()?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let parser = HeaderStateParser;
    let mut failures = 0usize;

    // Levels first: they need no registry.
    for level in &cli.level {
        if let Err(e) = pack_level(&base, level, &stamp, &options) {
            eprintln!("error: level {level}: {e:#}");
            failures += 1;
        }
    }

    if !cli.architecture.is_empty() {
        // One registry per run, shared read-only across all builds. A
        // registry failure aborts every architecture build.
        let registry = load_registry(&base, &parser)?;

        for architecture in &cli.architecture {
            if let Err(e) = pack_architecture(&base, architecture, &registry, &parser, &stamp, &options)
            {
                eprintln!("error: architecture {architecture}: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} build(s) failed");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// levels
// ---------------------------------------------------------------------------

fn pack_level(
    base: &Path,
    level: &str,
    stamp: &str,
    options: &ArchiveOptions,
) -> anyhow::Result<()> {
    let zip_path = output_path(base, level, stamp);
    println!("Writing {}", zip_path.display());

    let plan = stevedore::plan_level(base, level, zip_path)?;
    stevedore::write_archive(&plan, options)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// architectures
// ---------------------------------------------------------------------------

fn load_registry(base: &Path, parser: &dyn StateParser) -> anyhow::Result<Registry> {
    let library = base.join("schematics").join("component_factory");
    let registry = librarian::build_registry(&library, parser, |done, total| {
        print!("\rLoading components [{done}/{total}]... ");
        let _ = std::io::stdout().flush();
    })
    .context("building component registry")?;
    println!();
    Ok(registry)
}

fn pack_architecture(
    base: &Path,
    architecture: &str,
    registry: &Registry,
    parser: &dyn StateParser,
    stamp: &str,
    options: &ArchiveOptions,
) -> anyhow::Result<()> {
    let arch_dir = base
        .join("schematics")
        .join("architecture")
        .join(architecture);
    let circuit = arch_dir.join(CIRCUIT_FILE);
    let bytes = std::fs::read(&circuit)
        .with_context(|| format!("reading {}", circuit.display()))?;
    let state = parser.parse_state(&bytes)?;

    let closure = librarian::resolve_closure(&state.dependencies, registry)?;

    let zip_path = output_path(base, architecture, stamp);
    println!("Writing {}", zip_path.display());

    let plan = stevedore::plan_architecture(base, architecture, &closure, zip_path)?;
    stevedore::write_archive(&plan, options)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `<name>_<stamp>.zip` next to the save root's parent; path separators in
/// level names become underscores.
fn output_path(base: &Path, name: &str, stamp: &str) -> PathBuf {
    let flat = name.replace(['/', '\\'], "_");
    base.parent()
        .unwrap_or(base)
        .join(format!("{flat}_{stamp}.zip"))
}
