use std::{io, path::PathBuf};
use thiserror::Error;

use crate::sales::MAX_TOTAL;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way a run can fail. All of them are terminal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("branch definition file does not exist: {}", path.display())]
    RegistryNotFound { path: PathBuf },

    #[error("branch definition file has an invalid format (line {line}): {}", path.display())]
    RegistryFormatInvalid { path: PathBuf, line: u64 },

    #[error("cannot list directory {}: {source}", path.display())]
    DirectoryUnreadable { path: PathBuf, source: io::Error },

    #[error("sales file has an invalid format: {file}")]
    SalesFileFormatInvalid { file: String },

    #[error("sales file {file} references unknown branch code {code}")]
    UnknownBranchCode { file: String, code: String },

    #[error("total for branch {code} exceeds {max} (while adding {file})", max = MAX_TOTAL)]
    AmountOverflow { file: String, code: String },

    #[error("cannot write summary file {}: {source}", path.display())]
    OutputWriteError { path: PathBuf, source: io::Error },

    #[error("unexpected error reading {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}
