use crate::error::{Error, Result};
use regex::Regex;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use tracing::info;

static SALES_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}\.rcd$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesFile {
    pub name: String,
    pub path: PathBuf,
}

/// Sales files found in one directory, sorted by file name.
#[derive(Debug, Default)]
pub struct SalesFileSet {
    files: Vec<SalesFile>,
}

impl SalesFileSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SalesFile> {
        self.files.iter()
    }
}

/// Lists `dir` (not recursively) and keeps the regular files named `\d{8}\.rcd`.
pub fn scan<P>(dir: P) -> Result<SalesFileSet>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let unreadable = |source: io::Error| Error::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !is_sales_file_name(&name) {
            continue;
        }

        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.is_file() {
            files.push(SalesFile { name, path });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    info!(count = files.len(), "found sales files in {}", dir.display());

    Ok(SalesFileSet { files })
}

pub fn is_sales_file_name(name: &str) -> bool {
    SALES_FILE_NAME.is_match(name)
}
