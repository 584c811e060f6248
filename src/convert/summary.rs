use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::dataset::Dataset;
use crate::errors::Result;
use crate::geo_transform::GeoTransformEx;

/// Coordinate reference system of a dataset, as far as it can be named.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The dataset carries no projection; the copy will have none either.
    None,
    Named {
        name: String,
        authority: Option<String>,
    },
    /// A projection GDAL could not name, e.g. a bare `prj.adf` definition.
    Custom,
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Projection::None => f.write_str("None (will be preserved)"),
            Projection::Named {
                name,
                authority: Some(authority),
            } => write!(f, "{name} ({authority})"),
            Projection::Named { name, .. } => f.write_str(name),
            Projection::Custom => f.write_str("Custom"),
        }
    }
}

/// Diagnostic metadata printed before a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub driver: String,
    pub size: (usize, usize),
    pub band_count: usize,
    pub projection: Projection,
    pub origin: Option<(f64, f64)>,
    pub pixel_size: Option<(f64, f64)>,
    /// Nodata value of the first band.
    pub no_data: Option<f64>,
    /// Pixel type of the first band.
    pub data_type: Option<String>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Result<DatasetSummary> {
        let projection = if dataset.projection().is_empty() {
            Projection::None
        } else {
            match dataset.spatial_ref() {
                Ok(srs) => match srs.name() {
                    Some(name) => Projection::Named {
                        name,
                        authority: srs.authority(),
                    },
                    None => Projection::Custom,
                },
                Err(err) => {
                    debug!(error = %err, "projection could not be parsed");
                    Projection::Custom
                }
            }
        };

        let transform = dataset.geo_transform().ok();

        let band_count = dataset.raster_count();
        let (no_data, data_type) = if band_count > 0 {
            let band = dataset.rasterband(1)?;
            (band.no_data_value(), Some(band.band_type().name()))
        } else {
            (None, None)
        };

        Ok(DatasetSummary {
            driver: dataset.driver().short_name(),
            size: dataset.raster_size(),
            band_count,
            projection,
            origin: transform.map(|gt| gt.origin()),
            pixel_size: transform.map(|gt| gt.pixel_size()),
            no_data,
            data_type,
        })
    }
}

impl Display for DatasetSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   Size: {} x {} pixels", self.size.0, self.size.1)?;
        writeln!(f, "   Bands: {}", self.band_count)?;
        writeln!(f, "   Projection: {}", self.projection)?;
        if let Some((x, y)) = self.origin {
            writeln!(f, "   Origin: ({x:.2}, {y:.2})")?;
        }
        if let Some((x, y)) = self.pixel_size {
            writeln!(f, "   Pixel Size: ({x:.2}, {y:.2})")?;
        }
        if let Some(no_data) = self.no_data {
            writeln!(f, "   NoData Value: {no_data}")?;
        }
        if let Some(data_type) = &self.data_type {
            writeln!(f, "   Data Type: {data_type}")?;
        }
        Ok(())
    }
}
