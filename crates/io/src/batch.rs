// Directory batch loading: one result table per quality-control card

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colorqc_core::{
    concat, normalize, AggregateTable, Cell, Classifier, ExtractConfig, ExtractError, ResultTable,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::xlsx;

/// Office writes `~$name.xlsx` lock files next to open workbooks.
const LOCK_FILE_PREFIX: &str = "~$";

// ---------------------------------------------------------------------------
// Per-file outcome
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum FileOutcome {
    /// File was read and classified. The table may be empty.
    Extracted {
        path: PathBuf,
        part_number: Cell,
        table: ResultTable,
    },
    /// File could not be read or had no test block.
    Failed { path: PathBuf, error: ExtractError },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Extracted { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn table(&self) -> Option<&ResultTable> {
        match self {
            Self::Extracted { table, .. } => Some(table),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ExtractError> {
        match self {
            Self::Extracted { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// Batch report
// ---------------------------------------------------------------------------

/// Outcome of one pass over a source directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub source_dir: PathBuf,
    /// One entry per spreadsheet file, in file-name order.
    pub outcomes: Vec<FileOutcome>,
    /// Directory entries that were not spreadsheets.
    pub ignored: Vec<PathBuf>,
}

impl BatchReport {
    /// Result tables of successfully read files, including empty ones.
    pub fn tables(&self) -> impl Iterator<Item = &ResultTable> {
        self.outcomes.iter().filter_map(FileOutcome::table)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ExtractError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.path(), e)))
    }

    pub fn failed_paths(&self) -> Vec<&Path> {
        self.failures().map(|(path, _)| path).collect()
    }

    pub fn files_with_data(&self) -> usize {
        self.tables().filter(|t| !t.is_empty()).count()
    }

    /// True when no file produced any color data. Distinct from a run that
    /// failed: the aggregate is empty but the run completed.
    pub fn is_empty_result(&self) -> bool {
        self.files_with_data() == 0
    }

    pub fn aggregate(&self) -> AggregateTable {
        concat(self.tables())
    }

    pub fn summary(&self) -> RunSummary {
        let files = self
            .outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FileOutcome::Extracted { path, part_number, table } => Some(FileEntry {
                    path: path.display().to_string(),
                    part_number: part_number.to_string(),
                    rows: table.row_count(),
                    tests: table.test_headers().map(str::to_string).collect(),
                }),
                FileOutcome::Failed { .. } => None,
            })
            .collect();

        let failures = self
            .failures()
            .map(|(path, error)| FailureEntry {
                path: path.display().to_string(),
                kind: error.kind(),
                message: error.to_string(),
            })
            .collect();

        RunSummary {
            source_dir: self.source_dir.display().to_string(),
            files_read: self.outcomes.len(),
            files_with_data: self.files_with_data(),
            files_ignored: self.ignored.len(),
            files,
            failures,
        }
    }
}

/// Serializable view of a batch report, for `--json` output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source_dir: String,
    pub files_read: usize,
    pub files_with_data: usize,
    pub files_ignored: usize,
    pub files: Vec<FileEntry>,
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub part_number: String,
    pub rows: usize,
    pub tests: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FailureEntry {
    pub path: String,
    pub kind: &'static str,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Reads every spreadsheet in a directory and classifies it.
pub struct BatchLoader {
    config: ExtractConfig,
    classifier: Classifier,
    excluded: Vec<PathBuf>,
}

impl BatchLoader {
    pub fn new(config: ExtractConfig) -> Self {
        let classifier = config.classifier();
        Self {
            config,
            classifier,
            excluded: Vec::new(),
        }
    }

    /// Never treat `path` as input, e.g. the output of a previous run.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Process every spreadsheet in `dir` (non-recursive).
    ///
    /// Per-file failures are recorded in the report and do not stop the
    /// batch. Only an unreadable directory is an error.
    pub fn load_all(&self, dir: &Path) -> Result<BatchReport, ExtractError> {
        let entries = fs::read_dir(dir).map_err(|e| ExtractError::read(dir, e))?;

        let mut report = BatchReport {
            source_dir: dir.to_path_buf(),
            ..Default::default()
        };

        let inputs = self.select_inputs(
            dir,
            entries.map(|entry| entry.map(|e| e.path())),
            &mut report.ignored,
        );

        for path in inputs {
            let outcome = match self.load_file(&path) {
                Ok((part_number, table)) => {
                    debug!(path = %path.display(), rows = table.row_count(), "extracted");
                    FileOutcome::Extracted { path, part_number, table }
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping file");
                    FileOutcome::Failed { path, error }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            dir = %dir.display(),
            files = report.outcomes.len(),
            with_data = report.files_with_data(),
            failed = report.failures().count(),
            "batch loaded"
        );
        Ok(report)
    }

    /// Read, normalize and classify one file. Returns the part number and
    /// the (possibly empty) result table.
    pub fn load_file(&self, path: &Path) -> Result<(Cell, ResultTable), ExtractError> {
        let layout = self.classifier.layout();
        let raw = xlsx::import(path, layout.column_window)?;
        let part_number = layout.part_number(&raw).clone();
        let sheet = normalize(&raw, layout)?;
        let table = self.classifier.classify(&sheet, &part_number);
        Ok((part_number, table))
    }

    /// Spreadsheet files among the listed entries, sorted. Entries that
    /// cannot be read are logged and skipped.
    fn select_inputs(
        &self,
        dir: &Path,
        entries: impl IntoIterator<Item = io::Result<PathBuf>>,
        ignored: &mut Vec<PathBuf>,
    ) -> Vec<PathBuf> {
        let mut inputs = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(error) => {
                    warn!(dir = %dir.display(), %error, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            if is_lock_file(&path) || !self.config.accepts(&path) {
                ignored.push(path);
                continue;
            }
            if self.is_excluded(&path) {
                debug!(path = %path.display(), "skipping excluded file");
                continue;
            }
            inputs.push(path);
        }
        inputs.sort();
        inputs
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Ok(path) = fs::canonicalize(path) else {
            return false;
        };
        self.excluded
            .iter()
            .filter_map(|e| fs::canonicalize(e).ok())
            .any(|e| e == path)
    }
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOCK_FILE_PREFIX))
}
