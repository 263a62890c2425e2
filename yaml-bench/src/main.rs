//! yaml-bench: dump tokens or the canonical form of a YAML file, or time
//! the reader against generated input.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::io::Read;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use slate_yaml::dump::{dump_stream, dump_tokens, scan_tokens};
use slate_yaml::error::{DiagnosticCollector, DiagnosticSink};
use slate_yaml::Stream;

#[derive(Debug, Parser)]
#[command(name = "yaml-bench")]
#[command(about = "Dump and benchmark tool for the slate-yaml reader", long_about = None)]
struct Cli {
    /// Input file, or - for stdin
    input: Option<String>,

    /// Print the tokenization of the file
    #[arg(long)]
    tokens: bool,

    /// Print the canonical YAML for this file
    #[arg(long)]
    canonical: bool,

    /// Run a quick self-benchmark
    #[arg(long)]
    verify: bool,
}

/// Accept the traditional single-dash spellings (`-tokens`, `-canonical`,
/// `-verify`) alongside clap's `--` forms.
fn normalized_args() -> Vec<OsString> {
    std::env::args_os()
        .map(|arg| match arg.to_str() {
            Some("-tokens") => OsString::from("--tokens"),
            Some("-canonical") => OsString::from("--canonical"),
            Some("-verify") => OsString::from("--verify"),
            _ => arg,
        })
        .collect()
}

/// Prints every diagnostic to stderr as it arrives.
struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, at: usize, message: &str) {
        eprintln!("error at byte {at}: {message}");
    }
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("reading stdin")?;
        return Ok(buffer);
    }
    std::fs::read(path).with_context(|| format!("reading {path}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalized_args());

    if let Some(path) = &cli.input {
        let buffer = read_input(path)?;

        if cli.tokens {
            let mut out = String::new();
            dump_tokens(&buffer, StderrSink, &mut out)?;
            print!("{out}");
        }

        if cli.canonical {
            let mut stream = Stream::new(&buffer, StderrSink);
            let mut out = String::new();
            dump_stream(&mut stream, &mut out)?;
            print!("{out}");
        }
    }

    if cli.verify {
        benchmark("Fast", &generate_json_text(10, 500));
    }

    Ok(())
}

/// Time a baseline byte loop, a tokenization pass and a parse-and-skip pass
/// over `text`.
fn benchmark(name: &str, text: &[u8]) {
    let start = Instant::now();
    let mut checksum = 0u8;
    for &byte in text {
        checksum = checksum.wrapping_add(byte);
    }
    std::hint::black_box(checksum);
    println!("{name}: Loop      {:?}", start.elapsed());

    let start = Instant::now();
    let ok = scan_tokens(text);
    println!("{name}: Tokenize  {:?} (ok: {ok})", start.elapsed());

    let start = Instant::now();
    let mut collector = DiagnosticCollector::new();
    let mut stream = Stream::new(text, &mut collector);
    stream.skip();
    println!("{name}: Parse     {:?}", start.elapsed());
}

/// JSON-shaped YAML input for the self-benchmark.
fn generate_json_text(memory_mb: usize, value_size: usize) -> Vec<u8> {
    let memory_bytes = memory_mb * 1024 * 1024;
    let mut text = String::with_capacity(memory_bytes + 1024);
    let value = "*".repeat(value_size);
    text.push_str("[\n");
    while text.len() < memory_bytes {
        let _ = write!(
            text,
            " {{\n  \"key1\": \"{value}\",\n  \"key2\": \"{value}\",\n  \"key3\": \"{value}\"\n }}"
        );
        if text.len() < memory_bytes {
            text.push(',');
        }
        text.push('\n');
    }
    text.push_str("]\n");
    text.into_bytes()
}
