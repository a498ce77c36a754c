//! Batch conversion of a header directory into SIP artifacts.
//!
//! Every header is converted on its own, in parallel, with no state shared
//! between files. Artifacts are only written once all headers have been
//! converted, so a parse failure anywhere leaves the output directory
//! untouched.

pub mod template;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub use template::HeaderTemplate;

use crate::{
    conditionals::{DefinitionEnvironment, skip_ranges},
    config::{InputSettings, MacroSettings, Settings},
    error::{FileError, Result, SipgenError},
    header::parse_header,
    macros::extract,
    synth::{Synthesis, include_block, synthesize},
};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Artifacts written by this run, by file name.
    pub written: Vec<String>,
    /// Headers that produced no artifact because of an error.
    pub failures: Vec<FileError>,
    /// Zero-length files removed from the output directory.
    pub removed: Vec<String>,
    /// Every artifact in the output directory after the run, sorted.
    pub artifacts: Vec<String>,
}

impl RunSummary {
    /// `%Include` line for every artifact in the output directory.
    pub fn module_index(&self) -> String {
        self.artifacts.iter().map(|name| format!("%Include {name}\n")).collect()
    }
}

/// Headers directly inside the input directory, sorted by path.
pub fn discover_headers(input: &InputSettings) -> Vec<PathBuf> {
    let mut headers: Vec<PathBuf> = WalkDir::new(&input.directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_public_header(path, input))
        .collect();
    headers.sort();
    headers
}

fn is_public_header(
    path: &Path,
    input: &InputSettings,
) -> bool {
    if !path.extension().is_some_and(|ext| ext == input.extension.as_str()) {
        return false;
    }
    let (Some(stem), Some(file_name)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.file_name().and_then(|s| s.to_str()),
    ) else {
        return false;
    };
    if !input.private_suffix.is_empty() && stem.ends_with(&input.private_suffix) {
        debug!("Skipping private header {file_name}");
        return false;
    }
    if input.denylist.iter().any(|denied| denied == file_name) {
        debug!("Skipping denylisted header {file_name}");
        return false;
    }
    true
}

/// Convert one header's text. `header_name` is the file name used in
/// `%TypeHeaderCode`.
pub fn convert_header(
    source: &str,
    header_name: &str,
    macros: &MacroSettings,
    env: &DefinitionEnvironment,
) -> Result<Synthesis> {
    let extraction = extract(source, macros)?;
    let ast = parse_header(&extraction.text)?;
    let skip = skip_ranges(&extraction.text, &ast, env)?;
    synthesize(&ast, &skip, &extraction.metadata, header_name)
}

/// Artifact text: template, include block and body.
pub fn render_artifact(
    template: Option<&HeaderTemplate>,
    artifact_name: &str,
    synthesis: &Synthesis,
    extension: &str,
) -> String {
    let mut out = String::new();
    if let Some(template) = template {
        out.push_str(&template.render(artifact_name));
        out.push_str("\n\n");
    }
    if !synthesis.includes.is_empty() {
        out.push_str(&include_block(&synthesis.includes, extension));
        out.push('\n');
    }
    out.push_str(&synthesis.body);
    out
}

struct Converted {
    path: PathBuf,
    artifact_name: String,
    result: Result<Synthesis>,
}

/// Convert every header of `settings.input` into `settings.output`.
///
/// Returns the parse failure of the first header (in path order) that could
/// not be parsed; nothing is written in that case.
pub fn run(settings: &Settings) -> std::result::Result<RunSummary, FileError> {
    let env = DefinitionEnvironment::from_settings(&settings.preprocessor);
    let output = &settings.output;
    let template = HeaderTemplate::load(output).map_err(|error| FileError {
        file: template_name(output.header_template.as_deref()),
        error,
    })?;

    let headers = discover_headers(&settings.input);
    info!("Converting {} header(s) from {}", headers.len(), settings.input.directory.display());

    let converted: Vec<Converted> = headers
        .par_iter()
        .map(|path| {
            let header_name = file_name(path);
            let artifact_name = artifact_name(path, &output.extension);
            info!("Processing {header_name}");
            let result = std::fs::read_to_string(path)
                .map_err(|source| SipgenError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|source| convert_header(&source, &header_name, &settings.macros, &env));
            Converted {
                path: path.clone(),
                artifact_name,
                result,
            }
        })
        .collect();

    let mut summary = RunSummary::default();
    let mut ready = Vec::new();
    for converted in converted {
        match converted.result {
            Ok(synthesis) => ready.push((converted.artifact_name, synthesis)),
            Err(error) if error.aborts_run() => {
                return Err(FileError {
                    file: file_name(&converted.path),
                    error,
                });
            },
            Err(error) => {
                let failure = FileError {
                    file: file_name(&converted.path),
                    error,
                };
                warn!("Skipping {failure}");
                summary.failures.push(failure);
            },
        }
    }

    for (artifact_name, synthesis) in ready {
        if synthesis.is_blank() {
            debug!("{artifact_name}: nothing to write");
            continue;
        }
        let text = render_artifact(template.as_ref(), &artifact_name, &synthesis, &output.extension);
        let path = output.directory.join(&artifact_name);
        if let Err(error) = write_artifact(&path, &text) {
            let failure = FileError {
                file: artifact_name,
                error,
            };
            warn!("Skipping {failure}");
            summary.failures.push(failure);
            continue;
        }
        info!("Wrote {}", path.display());
        summary.written.push(artifact_name);
    }

    summary.removed = remove_empty_files(&output.directory);
    summary.artifacts = list_artifacts(&output.directory, &output.extension);
    info!(
        "Converted {} header(s): {} artifact(s) written, {} failed",
        headers.len(),
        summary.written.len(),
        summary.failures.len()
    );
    Ok(summary)
}

fn write_artifact(
    path: &Path,
    text: &str,
) -> Result<()> {
    let io_error = |source: std::io::Error| SipgenError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, text).map_err(io_error)
}

/// Remove zero-length regular files directly inside `dir`.
fn remove_empty_files(dir: &Path) -> Vec<String> {
    let mut removed = Vec::new();
    for entry in output_entries(dir) {
        let is_empty = entry.metadata().is_ok_and(|metadata| metadata.len() == 0);
        if !is_empty {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                info!("Removed empty file {name}");
                removed.push(name);
            },
            Err(error) => warn!("Failed to remove empty file {name}: {error}"),
        }
    }
    removed.sort();
    removed
}

fn list_artifacts(
    dir: &Path,
    extension: &str,
) -> Vec<String> {
    let mut artifacts: Vec<String> = output_entries(dir)
        .into_iter()
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == extension))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    artifacts.sort();
    artifacts
}

fn output_entries(dir: &Path) -> Vec<walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

fn artifact_name(
    path: &Path,
    extension: &str,
) -> String {
    let stem = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
    format!("{stem}.{extension}")
}

fn template_name(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/src/pipeline/pipeline_tests.rs"]
mod tests;
