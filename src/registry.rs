use crate::branch::BranchCode;
use crate::error::{Error, Result};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const REGISTRY_FILE_NAME: &str = "branch.lst";

/// Branch code to branch name, read once from `branch.lst` and never modified afterwards.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BranchRegistry {
    names: BTreeMap<BranchCode, String>,
}

impl BranchRegistry {
    pub fn load<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = dir.as_ref().join(REGISTRY_FILE_NAME);
        let file = File::open(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => Error::RegistryNotFound { path: path.clone() },
            _ => Error::Io {
                path: path.clone(),
                source,
            },
        })?;

        let registry = Self::parse(file, &path)?;
        info!(branches = registry.len(), "loaded {}", path.display());

        Ok(registry)
    }

    /// Parses `code,name` lines. `source` is only used in error messages.
    ///
    /// A code that appears twice keeps the name from its last line.
    pub fn parse<R>(mut reader: R, source: &Path) -> Result<Self>
    where
        R: io::Read,
    {
        // kept in memory so line numbers can count the blank lines csv skips
        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(|e| Error::Io {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(input.as_slice());

        let mut names = BTreeMap::new();

        for record in reader.records() {
            let record = record.map_err(|e| read_error(e, &input, source))?;
            let line = line_of(&input, record.position());
            let invalid = || Error::RegistryFormatInvalid {
                path: source.to_path_buf(),
                line,
            };

            if record.len() != 2 {
                return Err(invalid());
            }

            let code = BranchCode::parse(&record[0]).ok_or_else(invalid)?;
            let name = &record[1];
            if name.is_empty() {
                return Err(invalid());
            }

            if let Some(previous) = names.insert(code.clone(), name.to_owned()) {
                warn!(
                    %code,
                    previous = %previous,
                    replacement = %name,
                    "duplicate branch code, keeping last"
                );
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Branches in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&BranchCode, &str)> {
        self.names.iter().map(|(code, name)| (code, name.as_str()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &BranchCode> {
        self.names.keys()
    }
}

/// 1-based line on which the record starting at or after `position` begins.
fn line_of(input: &[u8], position: Option<&csv::Position>) -> u64 {
    let start = position.map_or(0, |p| p.byte() as usize).min(input.len());
    let blank = input[start..]
        .iter()
        .take_while(|b| matches!(b, b'\n' | b'\r'))
        .count();
    let newlines = input[..start + blank].iter().filter(|&&b| b == b'\n').count();

    newlines as u64 + 1
}

fn read_error(err: csv::Error, input: &[u8], source: &Path) -> Error {
    let line = line_of(input, err.position());

    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => Error::Io {
            path: PathBuf::from(source),
            source: io_err,
        },
        // invalid UTF-8 and anything else the reader rejects
        _ => Error::RegistryFormatInvalid {
            path: PathBuf::from(source),
            line,
        },
    }
}
