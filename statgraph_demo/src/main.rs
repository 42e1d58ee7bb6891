// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a statistics file into `graph_NN.svg` documents.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use statgraph_graphs::{BatchControl, Theme, build_graphs_with, parse_stats, parse_theme};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(PathBuf, std::io::Error),
    Graphs(statgraph_graphs::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::Io(path, err) => write!(f, "{}: {err}", path.display()),
            Self::Graphs(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(_) => None,
            Self::Io(_, err) => Some(err),
            Self::Graphs(err) => err.source(),
        }
    }
}

impl From<statgraph_graphs::Error> for CliError {
    fn from(value: statgraph_graphs::Error) -> Self {
        Self::Graphs(value)
    }
}

#[derive(Debug, PartialEq)]
struct Args {
    stats: PathBuf,
    theme: Option<PathBuf>,
    out: PathBuf,
    timeout: Option<Duration>,
}

fn usage() -> &'static str {
    "statgraph_demo\n\
\n\
USAGE:\n\
  statgraph_demo <stats.json> [--theme <theme.json>] [--out <dir>] [--timeout-ms <n>]\n\
\n\
NOTES:\n\
  - Writes graph_01.svg, graph_02.svg, ... into --out (default: current directory).\n\
  - Without --theme the built-in dark theme is used.\n\
  - Set RUST_LOG=debug to log every rendered chart.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut stats = None;
    let mut theme = None;
    let mut out = PathBuf::from(".");
    let mut timeout = None;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--theme" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                theme = Some(PathBuf::from(path));
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                out = PathBuf::from(path);
            }
            "--timeout-ms" => {
                let Some(ms) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let ms = ms.parse::<u64>().map_err(|_| CliError::Usage(usage()))?;
                timeout = Some(Duration::from_millis(ms));
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if stats.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                stats = Some(PathBuf::from(path));
            }
        }
    }

    let Some(stats) = stats else {
        return Err(CliError::Usage(usage()));
    };
    Ok(Args {
        stats,
        theme,
        out,
        timeout,
    })
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|err| CliError::Io(path.to_owned(), err))
}

fn run(args: &Args) -> Result<(), CliError> {
    let stats = parse_stats(&read(&args.stats)?)?;
    let theme = match &args.theme {
        Some(path) => parse_theme(&read(path)?)?,
        None => Theme::default(),
    };
    let mut control = BatchControl::new();
    if let Some(timeout) = args.timeout {
        control = control.with_timeout(timeout);
    }

    let documents = build_graphs_with(&stats, &theme, &control)?;
    std::fs::create_dir_all(&args.out).map_err(|err| CliError::Io(args.out.clone(), err))?;
    for (i, markup) in documents.iter().enumerate() {
        let path = args.out.join(format!("graph_{:02}.svg", i + 1));
        std::fs::write(&path, markup).map_err(|err| CliError::Io(path.clone(), err))?;
        info!(path = %path.display(), bytes = markup.len(), "wrote graph");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let result = parse_args(&argv).and_then(|args| run(&args));
    if let Err(err) = result {
        eprintln!("error: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
