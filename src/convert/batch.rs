//! Sequential batch conversion.

use super::{UpdConverter, WrittenFile};
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Progress notification sent before each file is processed.
///
/// `file_name` is the file now being converted. Completion of file `n` is
/// implied by the notification for file `n + 1` and by `convert_all`
/// returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the file about to be processed
    pub current: usize,

    /// Number of files in the batch
    pub total: usize,

    /// File name of the input
    pub file_name: String,
}

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    /// Input path as given
    pub input: PathBuf,

    /// File name of the input
    pub file_name: String,

    /// Success or failure details
    pub status: FileStatus,
}

/// Per-file status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileStatus {
    /// XML written
    #[serde(rename_all = "camelCase")]
    Success {
        output_path: PathBuf,
        file_id: String,
        item_count: usize,
    },
    /// Conversion failed; the rest of the batch was unaffected
    Failed { message: String },
}

impl FileOutcome {
    /// Check whether this file was converted.
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Success { .. })
    }
}

/// Outcomes of a whole batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// One outcome per input file
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of converted files.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Check whether every file was converted.
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Converts many files one after another into a single output directory.
pub struct BatchConverter {
    converter: UpdConverter,
}

impl BatchConverter {
    /// Create a batch converter.
    pub fn new(converter: UpdConverter) -> Self {
        Self { converter }
    }

    /// The underlying single-file converter.
    pub fn converter(&self) -> &UpdConverter {
        &self.converter
    }

    /// Convert every input into `output_dir`.
    ///
    /// Files are processed strictly in order and `progress` is called
    /// before each one. A failing file is recorded and the batch moves on;
    /// only failure to create `output_dir` aborts.
    pub fn convert_all<P, F>(
        &self,
        inputs: &[P],
        output_dir: &Path,
        mut progress: F,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        F: FnMut(&BatchProgress),
    {
        fs::create_dir_all(output_dir)?;

        let total = inputs.len();
        let mut report = BatchReport::default();
        for (index, input) in inputs.iter().enumerate() {
            let input = input.as_ref();
            let file_name = display_name(input);
            progress(&BatchProgress {
                current: index + 1,
                total,
                file_name: file_name.clone(),
            });

            let status = match self.converter.convert_file(input, output_dir) {
                Ok(WrittenFile {
                    output_path,
                    file_id,
                    item_count,
                }) => FileStatus::Success {
                    output_path,
                    file_id,
                    item_count,
                },
                Err(e) => {
                    log::warn!("Failed to convert {}: {}", input.display(), e);
                    FileStatus::Failed {
                        message: e.to_string(),
                    }
                }
            };
            report.outcomes.push(FileOutcome {
                input: input.to_path_buf(),
                file_name,
                status,
            });
        }

        log::info!(
            "Batch finished: {} converted, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
