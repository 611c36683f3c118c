use super::error::{ExportError, ExportResult};
use crate::health::Bundle;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sub-folder of the base output directory holding STU3 output
pub const FHIR_STU3_FOLDER: &str = "fhir_stu3";

pub fn ndjson_file_name(run_marker: i64) -> String {
    format!("Organization.{run_marker}.ndjson")
}

pub fn bundle_file_name(run_marker: i64) -> String {
    format!("hospitalInformation{run_marker}.json")
}

/// Resolve `<base>/<folder>`, creating it when missing
pub fn output_folder(base: &Path, folder: &str) -> ExportResult<PathBuf> {
    let path = base.join(folder);
    fs::create_dir_all(&path).map_err(|e| ExportError::io(&path, e))?;
    Ok(path)
}

/// Open a file for appending, creating it if needed
pub fn open_append(path: &Path) -> ExportResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ExportError::io(path, e))
}

/// Replace the whole file content
pub fn overwrite_file(path: &Path, content: &str) -> ExportResult<()> {
    fs::write(path, content).map_err(|e| ExportError::io(path, e))
}

/// Write the bundle into `output_folder` and return the file written.
///
/// With `ndjson` every entry's resource goes on its own line of
/// `Organization.<run_marker>.ndjson`; otherwise the pretty-printed bundle
/// replaces `hospitalInformation<run_marker>.json`.
pub fn write(
    bundle: &Bundle,
    run_marker: i64,
    ndjson: bool,
    output_folder: &Path,
) -> ExportResult<PathBuf> {
    if ndjson {
        let path = output_folder.join(ndjson_file_name(run_marker));
        if path.exists() {
            tracing::warn!("NDJSON 文件已存在，将追加写入: {}", path.display());
        }
        // 先打开文件，没有条目时也留下一个空文件
        let mut file = open_append(&path)?;
        for entry in &bundle.entry {
            let line = serde_json::to_string(&entry.resource)?;
            writeln!(file, "{line}").map_err(|e| ExportError::io(&path, e))?;
        }
        tracing::info!("已写入 {} 行 NDJSON: {}", bundle.len(), path.display());
        Ok(path)
    } else {
        let path = output_folder.join(bundle_file_name(run_marker));
        let json = serde_json::to_string_pretty(bundle)?;
        overwrite_file(&path, &json)?;
        tracing::info!("已写入 Bundle ({} 个条目): {}", bundle.len(), path.display());
        Ok(path)
    }
}
