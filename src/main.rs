//! `dictbench`: the CLI binary wiring dictionary/stream I/O, the matcher
//! registry, and the comparison harness together.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;

use dictbench::dictionary;
use dictbench::error::{HarnessError, Result};
use dictbench::harness::Harness;
use dictbench::registry;
use dictbench::report::Report;
use dictbench::stream::StreamSource;

/// Benchmark real-time multi-pattern streaming dictionary matchers against
/// a deterministic Aho-Corasick oracle.
#[derive(Parser, Debug)]
#[command(name = "dictbench", version, about)]
struct Cli {
    /// Dictionary file to load (repeatable; at least one required).
    #[arg(short = 'd', long = "dict", required = true, value_name = "PATH")]
    dict: Vec<PathBuf>,

    /// Stream file to feed through every engine (repeatable; at least one
    /// required).
    #[arg(short = 's', long = "stream", required = true, value_name = "PATH")]
    stream: Vec<PathBuf>,

    /// Output report path. Must be given exactly once.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Vec<PathBuf>,

    /// Raise logging verbosity and emit a line per classified mismatch.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Engine to race (repeatable; defaults to every registered engine).
    /// See `registry::ALGORITHMS` for the closed set of valid names.
    #[arg(short = 'a', long = "algo", value_name = "NAME")]
    algo: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str())).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("dictbench: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = match cli.output.as_slice() {
        [] => return Err(HarnessError::MissingFlag { flag: "-o/--output" }),
        [single] => single.clone(),
        _ => return Err(HarnessError::DuplicateFlag { flag: "-o/--output" }),
    };

    let algos = if cli.algo.is_empty() {
        registry::ALGORITHMS.iter().map(|d| d.tag).collect::<Vec<_>>()
    } else {
        cli.algo
            .iter()
            .map(|name| {
                registry::find(name)
                    .map(|d| d.tag)
                    .ok_or_else(|| HarnessError::UnknownAlgo { name: name.clone(), known: registry::known_names() })
            })
            .collect::<Result<Vec<_>>>()?
    };

    log::info!("dictbench: racing engines [{}]", algos.iter().map(|t| format!("{t:?}")).join(", "));

    let entries = dictionary::load_files(&cli.dict)?;
    log::info!("dictbench: loaded {} dictionary entries from {} files", entries.len(), cli.dict.len());

    let mut harness = Harness::build(entries, &algos)?;

    let out_file = File::create(&output).map_err(|source| HarnessError::Io { path: output.clone(), source })?;
    let mut report = Report::new(out_file, cli.verbose);

    for (stream_index, path) in cli.stream.iter().enumerate() {
        log::info!("dictbench: starting stream {stream_index} ({})", path.display());
        let mut source = StreamSource::open_file(path)?;
        harness.run_stream(stream_index, &mut source, &mut report)?;
    }

    Ok(())
}
