//! Conversion of ESRI ArcInfo binary grids (ADF coverages) to GeoTIFF.
//!
//! The heavy lifting is done by [GDAL](http://gdal.org/): its `AIG` driver
//! decodes the grid directory and the `GTiff` driver writes the output. This
//! crate wraps the small part of the GDAL C API the conversion needs and adds
//! input validation and reporting on top.
//!
//! ## Use
//!
//! ```no_run
//! use std::path::Path;
//! use adf2tiff::{convert, Compression};
//!
//! let report = convert(
//!     Path::new("data/elevation"),
//!     Path::new("elevation.tif"),
//!     Compression::Deflate,
//! )
//! .unwrap();
//! println!("{}", report.source);
//! println!("{:.2} MB written", report.output_megabytes());
//! ```

#![crate_name = "adf2tiff"]
#![crate_type = "lib"]

pub mod config;
pub mod convert;
pub mod cpl;
mod dataset;
mod driver;
pub mod errors;
mod geo_transform;
pub mod metadata;
mod options;
pub mod raster;
pub mod spatial_ref;
mod utils;
pub mod version;

pub use convert::{
    convert, convert_dataset, default_output_path, open_source, resolve_input, write_geotiff,
    AdfInput, Compression, ConversionReport, DatasetSummary, InputKind, Projection,
};
pub use dataset::Dataset;
pub use driver::{Driver, DriverManager};
pub use geo_transform::{GeoTransform, GeoTransformEx};
pub use options::{DatasetOptions, GdalOpenFlags};

#[cfg(test)]
mod test_utils;
