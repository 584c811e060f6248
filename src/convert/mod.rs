//! Grid coverage to GeoTIFF conversion.
//!
//! [`convert`] validates the grid directory, opens it through GDAL's `AIG`
//! driver and writes a tiled, compressed GeoTIFF with `GDALCreateCopy`.
//! Georeferencing, nodata and pixel types are carried over by GDAL.

mod compression;
mod input;
mod summary;


use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use compression::Compression;
pub use input::{
    default_output_path, resolve_input, AdfInput, InputKind, HEADER_FILE, OUTPUT_SUFFIX,
};
pub use summary::{DatasetSummary, Projection};

use crate::dataset::Dataset;
use crate::errors::{ConvertError, GdalError};
use crate::metadata::{Metadata, IMAGE_STRUCTURE};
use crate::options::{DatasetOptions, GdalOpenFlags};
use crate::DriverManager;

/// Short name of the driver that writes the output.
pub const GTIFF_DRIVER: &str = "GTiff";

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub source: DatasetSummary,
    pub output: PathBuf,
    pub compression: Compression,
    /// Size of the written file in bytes.
    pub output_bytes: u64,
    /// Raster size of the re-opened output, `None` if it could not be re-opened.
    pub verified: Option<(usize, usize)>,
}

impl ConversionReport {
    pub fn output_megabytes(&self) -> f64 {
        self.output_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Converts the grid at `input` (a directory, or a file inside one) to a
/// GeoTIFF at `output`.
pub fn convert(
    input: &Path,
    output: &Path,
    compression: Compression,
) -> Result<ConversionReport, ConvertError> {
    let input = resolve_input(input)?;
    info!(grid = %input.grid_dir.display(), "reading grid coverage");
    convert_dataset(&input.grid_dir, output, compression)
}

/// Copies any GDAL readable raster at `source` to a GeoTIFF at `output`.
///
/// [`convert`] calls this once the grid directory is validated.
pub fn convert_dataset(
    source: &Path,
    output: &Path,
    compression: Compression,
) -> Result<ConversionReport, ConvertError> {
    let (src, summary) = open_source(source)?;
    write_geotiff(src, summary, output, compression)
}

/// Opens `source` read-only and collects its [`DatasetSummary`].
///
/// Callers that report the source before writing use this together with
/// [`write_geotiff`] instead of [`convert`].
pub fn open_source(source: &Path) -> Result<(Dataset, DatasetSummary), ConvertError> {
    let src = Dataset::open_ex(
        source,
        DatasetOptions {
            open_flags: GdalOpenFlags::raster_read_only(),
            ..DatasetOptions::default()
        },
    )
    .map_err(|err| ConvertError::OpenFailed {
        path: source.to_path_buf(),
        source: err,
    })?;

    let summary = DatasetSummary::from_dataset(&src)?;
    debug!(driver = %summary.driver, "opened source dataset:\n{summary}");
    Ok((src, summary))
}

/// Writes `src` as a tiled GeoTIFF, then closes it and verifies the output.
pub fn write_geotiff(
    src: Dataset,
    summary: DatasetSummary,
    output: &Path,
    compression: Compression,
) -> Result<ConversionReport, ConvertError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let driver = DriverManager::get_driver_by_name(GTIFF_DRIVER)?;
    let options = compression.creation_options()?;
    info!(output = %output.display(), %compression, "writing GeoTIFF");

    let copy_failed = |source: GdalError| ConvertError::CreateCopyFailed {
        path: output.to_path_buf(),
        source,
    };
    let mut dst = src
        .create_copy(&driver, output, &options)
        .map_err(copy_failed)?;
    dst.flush_cache().map_err(copy_failed)?;
    dst.close().map_err(copy_failed)?;
    drop(src);

    let output_bytes = fs::metadata(output)
        .map_err(|source| ConvertError::Io {
            path: output.to_path_buf(),
            source,
        })?
        .len();

    Ok(ConversionReport {
        source: summary,
        output: output.to_path_buf(),
        compression,
        output_bytes,
        verified: verify_output(output),
    })
}

/// Re-opens the written file. A failure is only reported, the file is left in place.
fn verify_output(output: &Path) -> Option<(usize, usize)> {
    match Dataset::open_ex(
        output,
        DatasetOptions {
            open_flags: GdalOpenFlags::raster_read_only(),
            allowed_drivers: Some(&[GTIFF_DRIVER]),
        },
    ) {
        Ok(dataset) => {
            let size = dataset.raster_size();
            let written = dataset.metadata_item("COMPRESSION", IMAGE_STRUCTURE);
            debug!(
                width = size.0,
                height = size.1,
                compression = written.as_deref().unwrap_or("NONE"),
                "verified output"
            );
            Some(size)
        }
        Err(err) => {
            warn!(error = %err, "could not verify output file {}", output.display());
            None
        }
    }
}
