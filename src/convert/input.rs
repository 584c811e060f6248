use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::ConvertError;

/// File that anchors a grid coverage directory.
pub const HEADER_FILE: &str = "hdr.adf";

/// Suffix appended to the input name when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_converted.tif";

/// What the user pointed at on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Directory,
    /// A file inside the grid directory, usually the header itself.
    File(PathBuf),
}

/// A grid directory that passed validation and can be handed to GDAL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdfInput {
    pub grid_dir: PathBuf,
    pub header: PathBuf,
    pub kind: InputKind,
}

/// Checks that `path` names a grid directory, or a file in one, holding a header.
pub fn resolve_input(path: &Path) -> Result<AdfInput, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound(path.to_path_buf()));
    }

    let (grid_dir, kind) = if path.is_dir() {
        (path.to_path_buf(), InputKind::Directory)
    } else {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (parent, InputKind::File(path.to_path_buf()))
    };

    let header =
        find_header(&grid_dir)?.ok_or_else(|| ConvertError::MissingHeader(grid_dir.clone()))?;
    debug!(grid_dir = %grid_dir.display(), header = %header.display(), "resolved grid input");

    Ok(AdfInput {
        grid_dir,
        header,
        kind,
    })
}

/// Looks for `hdr.adf`, accepting upper case names written by some exporters.
fn find_header(dir: &Path) -> Result<Option<PathBuf>, ConvertError> {
    let exact = dir.join(HEADER_FILE);
    if exact.is_file() {
        return Ok(Some(exact));
    }

    let entries = fs::read_dir(dir).map_err(|source| ConvertError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let header = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|candidate| {
            candidate.is_file()
                && candidate
                    .file_name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(HEADER_FILE))
        });
    Ok(header)
}

/// `<name>_converted.tif` in the working directory.
///
/// `<name>` is the file stem for a file input and the directory name for a
/// directory input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = if input.is_file() {
        input.file_stem().map(|stem| stem.to_os_string())
    } else {
        input
            .file_name()
            .map(|name| name.to_os_string())
            .or_else(|| {
                input
                    .canonicalize()
                    .ok()
                    .and_then(|path| path.file_name().map(|name| name.to_os_string()))
            })
    };

    let name = name
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grid".to_string());
    PathBuf::from(format!("{name}{OUTPUT_SUFFIX}"))
}
