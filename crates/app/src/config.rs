//! Configuration for the huffpack command-line tool.
//!
//! Parses command-line arguments into a `Config`. Values left out on the
//! command line are filled from a seeded RNG, and the seed is logged so any
//! run can be reproduced.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// What the tool was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a random valid container to `output`
    Sample {
        output: PathBuf,
        leaves: usize,
        message_bits: usize,
    },

    /// Print the contents of a container file
    Inspect { input: PathBuf },

    /// Check that a container file re-encodes to identical bytes
    Verify { input: PathBuf },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected subcommand
    pub command: Command,

    /// Seed for every random default
    pub seed: u64,

    /// Log filter directive (overrides RUST_LOG)
    pub log_filter: Option<String>,
}

impl Config {
    /// Parse configuration from command-line arguments (without the program name).
    ///
    /// If --seed is not provided, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut subcommand: Option<String> = None;
        let mut path: Option<PathBuf> = None;
        let mut output: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut leaves: Option<usize> = None;
        let mut message_bits: Option<usize> = None;
        let mut log_filter: Option<String> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--leaves" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--leaves requires a number".to_string());
                    }
                    let n: usize = args[i].parse().map_err(|_| "invalid leaves")?;
                    if !(2..=256).contains(&n) {
                        return Err(format!("--leaves must be between 2 and 256, got {n}"));
                    }
                    leaves = Some(n);
                }
                "--message-bits" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--message-bits requires a number".to_string());
                    }
                    message_bits = Some(args[i].parse().map_err(|_| "invalid message-bits")?);
                }
                "--log" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--log requires a filter".to_string());
                    }
                    log_filter = Some(args[i].clone());
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("unknown argument: {arg}"));
                }
                arg => {
                    if subcommand.is_none() {
                        subcommand = Some(arg.to_string());
                    } else if path.is_none() {
                        path = Some(PathBuf::from(arg));
                    } else {
                        return Err(format!("unexpected argument: {arg}"));
                    }
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let command = match subcommand.as_deref() {
            Some("sample") => {
                if path.is_some() {
                    return Err("sample takes its output path via --out".to_string());
                }
                Command::Sample {
                    output: output.ok_or("sample requires --out <PATH>")?,
                    leaves: leaves.unwrap_or_else(|| rng.gen_range(2..=256)),
                    message_bits: message_bits.unwrap_or_else(|| rng.gen_range(0..=4096)),
                }
            }
            Some(name @ ("inspect" | "verify")) => {
                if output.is_some() || leaves.is_some() || message_bits.is_some() {
                    return Err(format!(
                        "{name} does not take --out, --leaves or --message-bits"
                    ));
                }
                let input = path.ok_or_else(|| format!("{name} requires a file path"))?;
                if name == "inspect" {
                    Command::Inspect { input }
                } else {
                    Command::Verify { input }
                }
            }
            Some(other) => return Err(format!("unknown command: {other}")),
            None => return Err("missing command (sample, inspect or verify)".to_string()),
        };

        Ok(Config {
            command,
            seed,
            log_filter,
        })
    }
}

fn print_help() {
    println!("huffpack: create and inspect Huffman container files");
    println!();
    println!("USAGE:");
    println!("    huffpack sample --out <PATH> [OPTIONS]");
    println!("    huffpack inspect <PATH>");
    println!("    huffpack verify <PATH>");
    println!();
    println!("OPTIONS:");
    println!("    --out <PATH>            Output file for sample");
    println!("    --seed <N>              Random seed for determinism");
    println!("    --leaves <N>            Distinct leaves, 2-256 (default: random)");
    println!("    --message-bits <N>      Message length in bits (default: random 0-4096)");
    println!();
    println!("    --log <FILTER>          Log filter, e.g. debug (default: RUST_LOG or info)");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack sample --out a.huff --seed 42           # Deterministic sample");
    println!("    huffpack inspect a.huff                          # Dump contents");
    println!("    huffpack verify a.huff --log debug               # Re-encode and compare");
    println!();
}
