use crate::branch::BranchCode;
use crate::error::{Error, Result};
use crate::registry::BranchRegistry;
use crate::sales::Totals;
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::info;

pub const SUMMARY_FILE_NAME: &str = "branch.out";

#[derive(Serialize)]
struct SummaryRow<'a> {
    code: &'a BranchCode,
    name: &'a str,
    total: u64,
}

/// Writes one `code,name,total` line per registered branch, in ascending code order.
pub fn render<W>(writer: W, registry: &BranchRegistry, totals: &Totals) -> csv::Result<()>
where
    W: io::Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    for (code, name) in registry.iter() {
        wtr.serialize(SummaryRow {
            code,
            name,
            total: totals.get(code).unwrap_or_default(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Replaces `branch.out` in `dir`. The rows go to a temporary file in the same
/// directory first, so a failed write never leaves a partial summary behind.
///
/// A replaced `branch.out` keeps its permissions; a new one gets the same mode a
/// plain `File::create` would.
pub fn write<P>(dir: P, registry: &BranchRegistry, totals: &Totals) -> Result<PathBuf>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let path = dir.join(SUMMARY_FILE_NAME);
    let write_error = |source: io::Error| Error::OutputWriteError {
        path: path.clone(),
        source,
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".branch.out");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // narrowed by the umask at creation
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(write_error)?;
    if let Ok(existing) = fs::metadata(&path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?;
    }

    render(tmp.as_file_mut(), registry, totals).map_err(|e| write_error(e.into()))?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(&path).map_err(|e| write_error(e.error))?;

    info!(rows = registry.len(), "wrote {}", path.display());
    Ok(path)
}
