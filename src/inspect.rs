use std::path::Path;

use anyhow::Context;

use crate::cli::Args;
use crate::format::hunk::parse_hunk_file;
use crate::format::FormatError;
use crate::report::{render_failure, render_report, ReportOptions};

pub const USAGE: &str = "usage: amginspect <file>";

pub fn run(args: &Args) -> anyhow::Result<()> {
    println!("Amiga Inspect");
    let Some(input) = &args.input else {
        println!("{USAGE}");
        return Ok(());
    };
    let text = inspect_file(Path::new(input), &args.report_options())?;
    print!("{text}");
    Ok(())
}

/// Reads `path` and renders its report.
///
/// # Errors
/// Fails when the file cannot be read or decoding hits a structural error.
/// A file that is not a Hunk executable, or that references resident
/// libraries, still renders a one-line report.
pub fn inspect_file(path: &Path, options: &ReportOptions) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());

    let mut out = format!("Opening file {} ...\n", path.display());
    let report = inspect_bytes(&bytes, options)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    out.push_str(&report);
    Ok(out)
}

/// Decodes an in-memory file and renders its report.
///
/// # Errors
/// Returns the `FormatError` for every failure other than the clean-stop
/// outcomes described by `render_failure`.
pub fn inspect_bytes(bytes: &[u8], options: &ReportOptions) -> Result<String, FormatError> {
    match parse_hunk_file(bytes) {
        Ok(file) => Ok(render_report(&file, options)),
        Err(err) => match render_failure(&err) {
            Some(message) => {
                log::info!("stopped decoding: {err}");
                Ok(format!("{message}\n"))
            }
            None => Err(err),
        },
    }
}
