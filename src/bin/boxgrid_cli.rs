//! CLI tool for boxgrid - places a JSON box tree and outputs the placements as JSON
//!
//! Usage:
//!   boxgrid_cli <tree.json>                          # Output JSON to stdout
//!   boxgrid_cli <tree.json> -o placed.json           # Output JSON to file
//!   boxgrid_cli <tree.json> --proto cards=cards.xlsx # Register a prototype template
//!   boxgrid_cli <tree.json> --config layout.json     # Load a LayoutConfig
//!   boxgrid_cli <tree.json> --origin B2              # Place the root at B2
//!
//! Set `RUST_LOG=debug` for run details.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use boxgrid::cell_ref::parse_cell_ref;
use boxgrid::{BoxgridError, GridBox, Layout, LayoutConfig, ProtoBank, Result};

const USAGE: &str = "Usage: boxgrid_cli <tree.json> [-o output.json] [--proto id=path.xlsx]... [--config layout.json] [--origin A1]";

#[derive(Debug, Default)]
struct Args {
    input: String,
    output: Option<String>,
    protos: Vec<(String, String)>,
    config: Option<String>,
    origin: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let mut parsed = Args::default();
    let mut input = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => parsed.output = Some(args.next()?),
            "--config" => parsed.config = Some(args.next()?),
            "--origin" => parsed.origin = Some(args.next()?),
            "--proto" => {
                let spec = args.next()?;
                let (id, path) = spec.split_once('=')?;
                parsed.protos.push((id.to_string(), path.to_string()));
            }
            _ if input.is_none() && !arg.starts_with('-') => input = Some(arg),
            _ => return None,
        }
    }

    parsed.input = input?;
    Some(parsed)
}

fn run(args: &Args) -> Result<()> {
    let tree: GridBox = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let mut config = match &args.config {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(origin) = &args.origin {
        let pos = parse_cell_ref(origin).ok_or_else(|| BoxgridError::CellRef(origin.clone()))?;
        config = config.with_origin(pos);
    }

    let mut bank = ProtoBank::new();
    for (id, path) in &args.protos {
        bank.add_xlsx(id.as_str(), &fs::read(path)?)?;
    }

    let placed = Layout::new(&bank).with_config(config).place(&tree)?;
    let json = serde_json::to_string_pretty(&placed)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json)?;
            log::info!("written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let Some(args) = parse_args(env::args().skip(1)) else {
        eprintln!("{USAGE}");
        process::exit(2);
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
