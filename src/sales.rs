use crate::branch::{is_amount, BranchCode};
use crate::error::{Error, Result};
use crate::registry::BranchRegistry;
use crate::scanner::{SalesFile, SalesFileSet};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufRead, BufReader, ErrorKind, Read},
};
use tracing::debug;

/// Largest total a branch may reach: the signed 64-bit ceiling.
pub const MAX_TOTAL: u64 = i64::MAX as u64;

/// Longest line accepted in a sales file, terminator included.
const MAX_LINE_BYTES: u64 = 1024;

/// One `(code, amount)` observation taken from the first two lines of a sales file.
///
/// `amount` is `None` when the digits are well formed but exceed `MAX_TOTAL`.
#[derive(Debug, PartialEq, Eq)]
pub struct SalesRecord {
    pub code: BranchCode,
    pub amount: Option<u64>,
}

impl SalesRecord {
    pub fn read(file: &SalesFile) -> Result<Self> {
        let handle = File::open(&file.path).map_err(|source| Error::Io {
            path: file.path.clone(),
            source,
        })?;

        Self::parse(BufReader::new(handle), file)
    }

    pub fn parse<R>(mut reader: R, file: &SalesFile) -> Result<Self>
    where
        R: BufRead,
    {
        let invalid = || Error::SalesFileFormatInvalid {
            file: file.name.clone(),
        };

        let code_line = next_line(&mut reader, file)?.ok_or_else(invalid)?;
        let amount_line = next_line(&mut reader, file)?.ok_or_else(invalid)?;

        let code = BranchCode::parse(&code_line).ok_or_else(invalid)?;
        if !is_amount(&amount_line) {
            return Err(invalid());
        }

        // only a value too large for u64 can fail once the digits are checked
        let amount = amount_line
            .parse::<u64>()
            .ok()
            .filter(|amount| *amount <= MAX_TOTAL);

        Ok(Self { code, amount })
    }
}

/// Reads one line without its terminator, or `None` at end of file.
fn next_line<R>(reader: &mut R, file: &SalesFile) -> Result<Option<String>>
where
    R: BufRead,
{
    let mut line = String::new();

    match reader.by_ref().take(MAX_LINE_BYTES).read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(n) if n as u64 == MAX_LINE_BYTES && !line.ends_with('\n') => {
            Err(Error::SalesFileFormatInvalid {
                file: file.name.clone(),
            })
        }
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Some(line))
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(Error::SalesFileFormatInvalid {
            file: file.name.clone(),
        }),
        Err(source) => Err(io_error(file, source)),
    }
}

fn io_error(file: &SalesFile, source: io::Error) -> Error {
    Error::Io {
        path: file.path.clone(),
        source,
    }
}

/// Running total per branch. Always holds exactly the registry's codes.
#[derive(Debug, PartialEq, Eq)]
pub struct Totals {
    totals: BTreeMap<BranchCode, u64>,
}

impl Totals {
    pub fn seeded(registry: &BranchRegistry) -> Self {
        Self {
            totals: registry.codes().map(|code| (code.clone(), 0)).collect(),
        }
    }

    pub fn get(&self, code: &BranchCode) -> Option<u64> {
        self.totals.get(code).copied()
    }

    fn add(&mut self, record: &SalesRecord, file: &SalesFile) -> Result<()> {
        let total = self
            .totals
            .get_mut(&record.code)
            .ok_or_else(|| Error::UnknownBranchCode {
                file: file.name.clone(),
                code: record.code.to_string(),
            })?;

        let current = *total;
        *total = record
            .amount
            .and_then(|amount| current.checked_add(amount))
            .filter(|sum| *sum <= MAX_TOTAL)
            .ok_or_else(|| Error::AmountOverflow {
                file: file.name.clone(),
                code: record.code.to_string(),
            })?;

        Ok(())
    }
}

/// Folds every sales file into a fresh set of totals, stopping at the first failure.
pub fn aggregate(registry: &BranchRegistry, files: &SalesFileSet) -> Result<Totals> {
    let mut totals = Totals::seeded(registry);

    for file in files.iter() {
        let record = SalesRecord::read(file)?;
        totals.add(&record, file)?;
        debug!(file = %file.name, code = %record.code, amount = ?record.amount, "added sales");
    }

    Ok(totals)
}
