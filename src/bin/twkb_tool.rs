//! CLI tool for encoding and decoding TWKB geometries
//!
//! Usage:
//!   cargo run --release --bin twkb_tool -- encode <geojson_file|-> [options]
//!   cargo run --release --bin twkb_tool -- decode <base64|@file|-> [options]
//!
//! Encode options:
//!   --precision <n>      XY precision (-7..7, default 0)
//!   --precision-z <n>    Z precision (0..7)
//!   --precision-m <n>    M precision (0..7)
//!   --bbox               Include a bounding box
//!   --size               Include the size field
//!   --ids <a,b,c>        Element ids for multi-part geometries
//!   --params <file>      Load parameters from JSON; flags override it
//!   --keep-repeated      Do not drop repeated points
//!   --hex                Print hex instead of Base64
//!
//! Decode options:
//!   --pretty             Pretty-print the JSON output
//!   --summary            Show type, dimension, point count and bbox only
//!
//! Set RUST_LOG=twkb=debug for codec logging on stderr.

use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use twkb::{decode_base64, decode_detailed, encode, EncodingParameters, Geometry};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        return Ok(());
    }

    match args[1].as_str() {
        "encode" => run_encode(&args[2], &args[3..]),
        "decode" => run_decode(&args[2], &args[3..]),
        other => {
            print_usage(&args[0]);
            bail!("unknown command '{}'", other)
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <encode|decode> <input> [options]", program);
    eprintln!();
    eprintln!("Encode options:");
    eprintln!("  --precision <n>          XY precision (-7..7, default 0)");
    eprintln!("  --precision-z <n>        Z precision (0..7)");
    eprintln!("  --precision-m <n>        M precision (0..7)");
    eprintln!("  --bbox                   Include a bounding box");
    eprintln!("  --size                   Include the size field");
    eprintln!("  --ids <a,b,c>            Element ids for multi-part geometries");
    eprintln!("  --params <file>          Load parameters from JSON (flags override)");
    eprintln!("  --keep-repeated          Do not drop repeated points");
    eprintln!("  --hex                    Print hex instead of Base64");
    eprintln!();
    eprintln!("Decode options:");
    eprintln!("  --pretty                 Pretty-print the JSON output");
    eprintln!("  --summary                Show type, dimension, point count and bbox only");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} encode route.json --precision 5 --bbox", program);
    eprintln!("  {} decode oQCVmy2cr+0D", program);
    eprintln!("  {} decode @blob.txt --summary", program);
}

/// Read `-` as stdin, anything else as a file path
fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

fn next_value<'a>(options: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    options
        .get(*i)
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn run_encode(source: &str, options: &[String]) -> anyhow::Result<()> {
    let mut params = EncodingParameters::default();
    let mut hex = false;

    // a params file is applied first so flags always win
    if let Some(pos) = options.iter().position(|o| o == "--params") {
        let path = options.get(pos + 1).context("--params needs a value")?;
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        params = serde_json::from_str(&text).with_context(|| format!("Invalid parameters in {}", path))?;
    }

    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--precision" => params.precision_xy = next_value(options, &mut i, "--precision")?.parse()?,
            "--precision-z" => params.precision_z = next_value(options, &mut i, "--precision-z")?.parse()?,
            "--precision-m" => params.precision_m = next_value(options, &mut i, "--precision-m")?.parse()?,
            "--bbox" => params.include_bbox = true,
            "--size" => params.include_size = true,
            "--keep-repeated" => params.drop_repeated_points = false,
            "--hex" => hex = true,
            "--ids" => {
                let list = next_value(options, &mut i, "--ids")?;
                let ids = list
                    .split(',')
                    .map(|s| s.trim().parse::<i64>())
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("Invalid id list '{}'", list))?;
                params.ids = Some(ids);
            }
            "--params" => i += 1,
            other => eprintln!("Ignoring unknown option {}", other),
        }
        i += 1;
    }

    let text = read_input(source)?;
    let geometry: Geometry = serde_json::from_str(&text).context("Input is not a GeoJSON geometry")?;

    let start = std::time::Instant::now();
    let encoded = encode(&geometry, &params)?;
    eprintln!(
        "Encoded {:?} ({} points) into {} bytes in {:.3}ms",
        geometry.geometry_type(),
        geometry.point_count(),
        encoded.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if hex {
        let hex: String = encoded.bytes().iter().map(|b| format!("{:02x}", b)).collect();
        println!("{}", hex);
    } else {
        println!("{}", encoded.base64());
    }
    Ok(())
}

fn run_decode(source: &str, options: &[String]) -> anyhow::Result<()> {
    let mut pretty = false;
    let mut summary = false;
    for option in options {
        match option.as_str() {
            "--pretty" => pretty = true,
            "--summary" => summary = true,
            other => eprintln!("Ignoring unknown option {}", other),
        }
    }

    let text = match source.strip_prefix('@') {
        Some(path) => read_input(path)?,
        None if source == "-" => read_input(source)?,
        None => source.to_string(),
    };

    let bytes = decode_base64(&text)?;
    let decoded = decode_detailed(&bytes).context("Failed to decode TWKB")?;

    if summary {
        println!("Type:       {:?}", decoded.header.geometry_type);
        println!("Precision:  {}", decoded.header.precision_xy);
        println!("Dimension:  {}", decoded.header.dimension());
        println!("Points:     {}", decoded.geometry.point_count());
        println!("Bytes:      {}", bytes.len());
        if let Some(bbox) = &decoded.bbox {
            println!("BBox:       {:?} .. {:?}", bbox.min, bbox.max);
        }
        return Ok(());
    }

    let json = if pretty {
        serde_json::to_string_pretty(&decoded.geometry)?
    } else {
        serde_json::to_string(&decoded.geometry)?
    };
    println!("{}", json);
    Ok(())
}
