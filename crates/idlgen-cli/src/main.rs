use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use idlgen_core::generate::generate;
use idlgen_core::idl::Idl;

#[derive(Parser, Debug)]
#[command(name = "idlgen")]
#[command(about = "Generate a TypeScript client from an anchor IDL.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the client source tree from an IDL file.
    Generate {
        /// Path to the IDL JSON file.
        #[arg(long)]
        idl: PathBuf,
        /// Output directory root (files land under <out>/...).
        #[arg(long)]
        out: PathBuf,
        /// Overrides the address declared in the IDL's metadata.
        #[arg(long)]
        program_id: Option<String>,
        /// If set, fail if any output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() -> Result<()> {
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            idl,
            out,
            program_id,
            check,
        } => run_generate(&idl, &out, program_id.as_deref(), check),
    }
}

fn run_generate(
    idl_path: &Path,
    out_root: &Path,
    program_id: Option<&str>,
    check: bool,
) -> Result<()> {
    let src = std::fs::read_to_string(idl_path)
        .with_context(|| format!("read IDL: {}", idl_path.display()))?;
    let idl = Idl::from_json(&src)?;
    let client = generate(&idl, program_id)?;

    for warning in &client.warnings {
        eprintln!("{warning}");
    }

    for (rel, text) in client.files() {
        write_file(out_root, &rel, &text, check).with_context(|| format!("output {rel}"))?;
    }
    Ok(())
}

fn write_file(out_root: &Path, rel: &str, src: &str, check: bool) -> Result<()> {
    let out_path = out_root.join(rel);

    if check {
        let cur = std::fs::read_to_string(&out_path)
            .with_context(|| format!("read existing output: {}", out_path.display()))?;
        if cur != src {
            anyhow::bail!("generated output differs: {}", out_path.display());
        }
        return Ok(());
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(&out_path, src.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    Ok(())
}
