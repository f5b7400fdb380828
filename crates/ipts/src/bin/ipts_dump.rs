//! Dumps IPTS captures as JSON lines.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use ipts::dump::{dump_file, Format};
use ipts::{DecodeOptions, DEFAULT_MAX_CONTAINER_DEPTH};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "ipts-dump",
    version,
    about = "Decode IPTS/ITHC digitizer captures and print one JSON document per record"
)]
#[command(group(ArgGroup::new("encoding").required(true)))]
struct Cli {
    /// Capture encoding.
    #[arg(long, value_enum, group = "encoding")]
    format: Option<Format>,

    /// Same as `--format ithc`.
    #[arg(long, group = "encoding")]
    ithc: bool,

    /// Same as `--format iptsbin`.
    #[arg(long, group = "encoding")]
    iptsbin: bool,

    /// Same as `--format iptstxt`.
    #[arg(long, group = "encoding")]
    iptstxt: bool,

    /// Deepest container nesting accepted.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CONTAINER_DEPTH)]
    max_depth: usize,

    /// Pretty-print each record.
    #[arg(long)]
    pretty: bool,

    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn encoding(&self) -> Format {
        match (self.format, self.ithc, self.iptsbin) {
            (Some(format), _, _) => format,
            (None, true, _) => Format::Ithc,
            (None, _, true) => Format::IptsBin,
            _ => Format::IptsTxt,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let format = cli.encoding();
    let options = DecodeOptions::default().with_max_container_depth(cli.max_depth);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for path in &cli.files {
        if let Err(e) = dump_file(path, format, options, &mut out, cli.pretty) {
            error!(path = %path.display(), "decode failed");
            eprintln!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
