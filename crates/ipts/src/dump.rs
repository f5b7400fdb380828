//! JSON-lines dumping of decoded captures.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use clap::ValueEnum;
use tracing::info;

use crate::protocol::DataEnvelope;
use crate::{read_framed, read_raw, DecodeError, DecodeOptions, TextLogReader};

/// Read buffer used for capture files.
const FILE_BUFFER_SIZE: usize = 0x10000;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capture encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// ITHC API envelopes.
    Ithc,
    /// IPTS data envelopes.
    #[value(name = "iptsbin")]
    IptsBin,
    /// `=` header lines followed by hex bytes.
    #[value(name = "iptstxt")]
    IptsTxt,
}

/// Writes each record as one JSON document per line and returns how many
/// were written. On the first error, records already written are flushed and
/// the error is returned.
pub fn dump_records<I, W>(records: I, out: &mut W, pretty: bool) -> Result<usize, DumpError>
where
    I: IntoIterator<Item = Result<DataEnvelope, DecodeError>>,
    W: Write,
{
    let mut count = 0;
    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                out.flush()?;
                return Err(e.into());
            }
        };
        if pretty {
            serde_json::to_writer_pretty(&mut *out, &record)?;
        } else {
            serde_json::to_writer(&mut *out, &record)?;
        }
        out.write_all(b"\n")?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

/// Decodes `input` in `format` and dumps every record to `out`.
pub fn dump_reader<R, W>(
    input: R,
    format: Format,
    options: DecodeOptions,
    out: &mut W,
    pretty: bool,
) -> Result<usize, DumpError>
where
    R: BufRead,
    W: Write,
{
    match format {
        Format::Ithc => dump_records(read_framed(input, options), out, pretty),
        Format::IptsBin => dump_records(read_raw(input, options), out, pretty),
        Format::IptsTxt => dump_records(TextLogReader::new(input, options), out, pretty),
    }
}

/// Opens `path` and dumps it. See [`dump_reader`].
pub fn dump_file<W: Write>(
    path: &Path,
    format: Format,
    options: DecodeOptions,
    out: &mut W,
    pretty: bool,
) -> Result<usize, DumpError> {
    let file = File::open(path)?;
    let count = dump_reader(
        BufReader::with_capacity(FILE_BUFFER_SIZE, file),
        format,
        options,
        out,
        pretty,
    )?;
    info!(path = %path.display(), count, "dumped capture");
    Ok(count)
}
