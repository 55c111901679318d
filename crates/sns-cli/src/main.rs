// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `sns`: developer tool for sprite attribute records.
//!
//! # Usage
//! ```text
//! sns encode hero.json -o hero.bin [--tagged]
//! sns dump hero.bin [--tagged]
//! sns classify ui/panel_scale9.json hero.png
//! ```
//!
//! Tagged records carry a leading node-type byte derived from the sprite's
//! `filepath`.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod config;

use anyhow::{bail, Context, Result};
use bumpalo::Bump;
use clap::{Args, Parser, Subcommand};
use sns_core::{
    read_node_type, AttrValue, AttributeKind, NodeSpr, NodeType, Reader, SprBase, Writer,
};
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "sns", about = "Sprite attribute codec tool", version)]
struct Cli {
    /// JSON config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a sprite JSON object to its binary record.
    Encode(EncodeArgs),
    /// Print the contents of a binary record.
    Dump(DumpArgs),
    /// Print the node type of each path.
    Classify(ClassifyArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Sprite JSON file.
    input: PathBuf,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix the record with its node-type tag.
    #[arg(long)]
    tagged: bool,
}

#[derive(Args)]
struct DumpArgs {
    /// Binary record file.
    input: PathBuf,

    /// Expect a leading node-type tag.
    #[arg(long)]
    tagged: bool,
}

#[derive(Args)]
struct ClassifyArgs {
    /// File paths to classify.
    #[arg(required = true)]
    paths: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config);
    debug!(?config, "loaded config");

    match cli.command {
        Commands::Encode(args) => encode(&args, &config),
        Commands::Dump(args) => dump(&args, &config),
        Commands::Classify(args) => classify(&args),
    }
}

fn init_tracing(verbose: bool, config: &CliConfig) {
    let fallback = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn encode(args: &EncodeArgs, config: &CliConfig) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let val: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let arena = Bump::new();
    let spr = SprBase::load_from_json(&arena, &val)
        .with_context(|| format!("loading sprite from {}", args.input.display()))?;
    let node: &dyn NodeSpr<'_> = &spr;

    let mut writer = Writer::with_capacity(node.bin_size() + 1);
    if args.tagged || config.tagged {
        let Some(path) = node.base_info().sym_path() else {
            bail!("tagged output needs a \"filepath\" to classify");
        };
        writer.write_u8(NodeType::from_path(path)?.tag());
    }
    node.store_to_bin(&mut writer)?;
    let bytes = writer.into_vec();
    info!(
        input = %args.input.display(),
        mask = format_args!("{:#x}", spr.mask()),
        bytes = bytes.len(),
        "encoded sprite"
    );

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        }
        None => std::io::stdout()
            .lock()
            .write_all(&bytes)
            .context("writing stdout")?,
    }
    Ok(())
}

fn dump(args: &DumpArgs, config: &CliConfig) -> Result<()> {
    let bytes =
        fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let mut reader = Reader::new(&bytes).with_max_string_len(config.max_string_len);

    if args.tagged || config.tagged {
        let ty = read_node_type(&mut reader)?;
        println!("type: {ty:?}");
    }
    let arena = Bump::new();
    let spr = SprBase::load_from_bin(&arena, &mut reader)
        .with_context(|| format!("decoding {}", args.input.display()))?;
    if reader.remaining() > 0 {
        warn!(trailing = reader.remaining(), "bytes left after record");
    }

    println!("name: {}", spr.name().unwrap_or("-"));
    println!("path: {}", spr.sym_path().unwrap_or("-"));
    println!("mask: {:#010x}", spr.mask());
    for (kind, value) in spr.attributes() {
        println!("{}", format_attribute(kind, value));
    }
    Ok(())
}

fn format_attribute(kind: AttributeKind, value: AttrValue) -> String {
    match value {
        AttrValue::Pair(x, y) => format!("{kind:?}: {x} {y}"),
        AttrValue::Scalar(v) => format!("{kind:?}: {v}"),
        AttrValue::Word(w) => match kind {
            AttributeKind::ColorMul
            | AttributeKind::ColorAdd
            | AttributeKind::ColorR
            | AttributeKind::ColorG
            | AttributeKind::ColorB => format!("{kind:?}: {w:#010x}"),
            _ => format!("{kind:?}: {w}"),
        },
    }
}

fn classify(args: &ClassifyArgs) -> Result<()> {
    for path in &args.paths {
        let ty = NodeType::from_path(path)?;
        println!("{path}\t{ty:?}");
    }
    Ok(())
}
