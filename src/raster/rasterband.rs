use std::ffi::c_int;
use std::marker::PhantomData;

use gdal_sys::{self, CPLErr, GDALRasterBandH};

use crate::dataset::Dataset;
use crate::errors::*;
use crate::raster::GdalDataType;
use crate::utils::_last_cpl_err;

/// A single band of a dataset.
///
/// Borrows the dataset that owns it, so the band cannot outlive the handle
/// GDAL hands it out from.
pub struct RasterBand<'a> {
    c_rasterband: GDALRasterBandH,
    phantom: PhantomData<&'a Dataset>,
}

impl<'a> RasterBand<'a> {
    /// Create a RasterBand from a wrapped C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_rasterband(_: &'a Dataset, c_rasterband: GDALRasterBandH) -> Self {
        RasterBand {
            c_rasterband,
            phantom: PhantomData,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterBandXSize(self.c_rasterband) };
        let size_y = unsafe { gdal_sys::GDALGetRasterBandYSize(self.c_rasterband) };
        (size_x as usize, size_y as usize)
    }

    /// Natural block size of the band, `(width, 1)` for strips.
    pub fn block_size(&self) -> (usize, usize) {
        let mut size_x = 0;
        let mut size_y = 0;
        unsafe { gdal_sys::GDALGetBlockSize(self.c_rasterband, &mut size_x, &mut size_y) };
        (size_x as usize, size_y as usize)
    }

    pub fn band_type(&self) -> GdalDataType {
        let ordinal = unsafe { gdal_sys::GDALGetRasterDataType(self.c_rasterband) };
        GdalDataType::from(ordinal)
    }

    pub fn no_data_value(&self) -> Option<f64> {
        let mut pb_success: c_int = 0;
        let no_data =
            unsafe { gdal_sys::GDALGetRasterNoDataValue(self.c_rasterband, &mut pb_success) };
        if pb_success != 0 {
            return Some(no_data);
        }
        None
    }

    pub fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALSetRasterNoDataValue(self.c_rasterband, no_data) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }
}
