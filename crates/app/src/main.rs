//! huffpack CLI
//!
//! Usage:
//!   huffpack sample --out <PATH> [--seed N] [--leaves L] [--message-bits M]
//!   huffpack inspect <PATH>
//!   huffpack verify <PATH>

mod config;
mod sample_gen;

use anyhow::{bail, Context};
use config::{Command, Config};
use huffpack_core::codec::{encoded_len, trailing_bit_count};
use huffpack_core::{decode_from_slice, encode_to_vec, read_data, write_data};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = Config::from_args(&args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        eprintln!("run `huffpack --help` for usage");
        process::exit(2);
    });

    init_logging(config.log_filter.as_deref())?;
    debug!(?config, "resolved configuration");

    match &config.command {
        Command::Sample {
            output,
            leaves,
            message_bits,
        } => run_sample(output, config.seed, *leaves, *message_bits),
        Command::Inspect { input } => run_inspect(input),
        Command::Verify { input } => run_verify(input),
    }
}

fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run_sample(output: &Path, seed: u64, leaves: usize, message_bits: usize) -> anyhow::Result<()> {
    info!(seed, leaves, message_bits, "generating sample container");
    let data = sample_gen::generate_container(seed, leaves, message_bits);

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut out = BufWriter::new(file);
    write_data(&data, &mut out).context("failed to encode container")?;
    out.flush()
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        path = %output.display(),
        bytes = encoded_len(&data),
        "wrote container"
    );
    Ok(())
}

fn run_inspect(input: &Path) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let file_len = file.metadata()?.len();
    let data = read_data(&mut BufReader::new(file))
        .with_context(|| format!("failed to read container from {}", input.display()))?;

    println!("=== {} ===", input.display());
    println!("File size:      {} bytes", file_len);
    println!("Leaves:         {}", data.leaf_count());
    println!("Tree bits:      {}", data.tree_shape.len());
    println!("Message bits:   {}", data.message_bits.len());
    println!("Trailing bits:  {}", trailing_bit_count(data.total_bits()));
    println!();
    println!("{data}");
    Ok(())
}

fn run_verify(input: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let data = decode_from_slice(&bytes)
        .with_context(|| format!("failed to decode {}", input.display()))?;
    let reencoded = encode_to_vec(&data).context("failed to re-encode container")?;

    if reencoded != bytes {
        let first_diff = reencoded
            .iter()
            .zip(&bytes)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| reencoded.len().min(bytes.len()));
        bail!(
            "{} does not re-encode identically: first difference at byte {} ({} vs {} bytes)",
            input.display(),
            first_diff,
            bytes.len(),
            reencoded.len()
        );
    }

    info!(
        path = %input.display(),
        leaves = data.leaf_count(),
        message_bits = data.message_bits.len(),
        "container verified"
    );
    println!("OK: {}", input.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.huff");

        run_sample(&path, 42, 12, 333).unwrap();
        run_verify(&path).unwrap();
        run_inspect(&path).unwrap();

        let expected = sample_gen::generate_container(42, 12, 333);
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, encoded_len(&expected));
    }

    #[test]
    fn test_verify_rejects_dirty_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirty.huff");

        // 21 tree bits + 1 message bit leaves 2 padding bits in the last byte
        run_sample(&path, 3, 11, 1).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        *bytes.last_mut().unwrap() |= 0b1000_0000;
        fs::write(&path, &bytes).unwrap();

        let err = run_verify(&path).unwrap_err();
        let core = err.downcast_ref::<huffpack_core::Error>().unwrap();
        assert!(core.is_truncation());
    }

    #[test]
    fn test_inspect_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foreign.bin");
        fs::write(&path, b"PK\x03\x04 not ours").unwrap();

        let err = run_inspect(&path).unwrap_err();
        let core = err.downcast_ref::<huffpack_core::Error>().unwrap();
        assert!(core.is_format());
    }
}
