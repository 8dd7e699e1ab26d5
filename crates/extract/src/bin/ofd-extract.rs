// ABOUTME: CLI binary for the OFD receipt text extractor.
// ABOUTME: Extracts text and links from HTML files, stdin, or {"html": ...} request files.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use ofd_extract::{
    decode_html_bytes, ExtractRequest, ExtractionResult, Extractor, Layout, Rules,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ofd-extract")]
#[command(about = "Extract receipt text and links from HTML")]
struct Args {
    /// Output the full result as JSON instead of the text only
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Treat inputs as {"html": "..."} request bodies instead of raw HTML
    #[arg(long = "request")]
    request: bool,

    /// JSON rule file replacing the builtin rule set
    #[arg(long = "rules")]
    rules: Option<PathBuf>,

    /// Text layout
    #[arg(long = "layout", value_enum, default_value_t = Layout::Flat)]
    layout: Layout,

    /// Append a links section to the extracted text
    #[arg(long = "links-footer")]
    links_footer: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// HTML files to read; `-` or none reads stdin
    #[arg()]
    inputs: Vec<PathBuf>,
}

fn build_extractor(args: &Args) -> anyhow::Result<Extractor> {
    let mut builder = Extractor::builder()
        .layout(args.layout)
        .links_footer(args.links_footer);
    if let Some(path) = &args.rules {
        let rules = Rules::from_path(path)?.compile()?;
        builder = builder.rules(rules);
    }
    Ok(builder.build())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn extract_one(extractor: &Extractor, bytes: &[u8], as_request: bool) -> anyhow::Result<ExtractionResult> {
    if as_request {
        let request = ExtractRequest::from_json_bytes(bytes)?;
        return Ok(extractor.extract_request(&request));
    }
    Ok(extractor.extract(&decode_html_bytes(bytes)))
}

/// Format output based on whether JSON output is requested.
///
/// A single input prints one object; several print an array. Text mode
/// separates results with a blank line.
fn format_output(results: &[ExtractionResult], json_output: bool) -> anyhow::Result<String> {
    if json_output {
        let out = if results.len() == 1 {
            serde_json::to_string_pretty(&results[0])?
        } else {
            serde_json::to_string_pretty(results)?
        };
        Ok(out)
    } else {
        Ok(results
            .iter()
            .map(|r| r.text())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let extractor = match build_extractor(&args) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let inputs = if args.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.inputs.clone()
    };

    let start = Instant::now();
    let mut results = Vec::new();
    let mut had_error = false;

    for input in &inputs {
        match read_input(input).and_then(|bytes| extract_one(&extractor, &bytes, args.request)) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("error processing {}: {:#}", input.display(), e);
                had_error = true;
            }
        }
    }

    let elapsed = start.elapsed();

    if !results.is_empty() {
        match format_output(&results, args.json_output) {
            Ok(output_str) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output_str) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output_str);
                }
            }
            Err(e) => {
                eprintln!("error formatting output: {:#}", e);
                had_error = true;
            }
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
