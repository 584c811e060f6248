use std::ffi::{c_int, CString, NulError};
use std::path::Path;
use std::ptr;

use gdal_sys::{self, CPLErr, GDALDatasetH, GDALMajorObjectH};

use crate::cpl::CslStringList;
use crate::driver::_register_drivers;
use crate::errors::*;
use crate::geo_transform::GeoTransform;
use crate::metadata::Metadata;
use crate::options::DatasetOptions;
use crate::raster::RasterBand;
use crate::spatial_ref::SpatialRef;
use crate::utils::{_last_cpl_err, _last_null_pointer_err, _path_to_c_string, _string};
use crate::Driver;

/// An open GDAL dataset. The handle is closed on drop.
#[derive(Debug)]
pub struct Dataset {
    c_dataset: GDALDatasetH,
}

// GDAL datasets may move between threads as long as only one uses them at a time.
unsafe impl Send for Dataset {}

impl Dataset {
    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_dataset(&self) -> GDALDatasetH {
        self.c_dataset
    }

    /// Creates a new Dataset by wrapping a C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_dataset(c_dataset: GDALDatasetH) -> Dataset {
        Dataset { c_dataset }
    }

    /// Opens `path` read-only with any registered driver.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        Self::open_ex(path, DatasetOptions::default())
    }

    pub fn open_ex<P: AsRef<Path>>(path: P, options: DatasetOptions) -> Result<Dataset> {
        _register_drivers();
        let c_filename = _path_to_c_string(path.as_ref())?;

        // the CStrings must outlive the pointer array handed to GDAL
        let c_drivers_vec = to_c_strings(options.allowed_drivers)?;
        let c_drivers_ptrs = to_null_terminated(&c_drivers_vec);
        let c_drivers_ptr = if options.allowed_drivers.is_some() {
            c_drivers_ptrs.as_ptr()
        } else {
            ptr::null()
        };

        let c_dataset = unsafe {
            gdal_sys::GDALOpenEx(
                c_filename.as_ptr(),
                options.open_flags.bits(),
                c_drivers_ptr,
                ptr::null(),
                ptr::null(),
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALOpenEx"));
        }
        Ok(Dataset { c_dataset })
    }

    /// The driver that opened this dataset, e.g. `AIG` for a grid directory.
    pub fn driver(&self) -> Driver {
        unsafe {
            let c_driver = gdal_sys::GDALGetDatasetDriver(self.c_dataset);
            Driver::from_c_driver(c_driver)
        }
    }

    pub fn raster_size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterXSize(self.c_dataset) } as usize;
        let size_y = unsafe { gdal_sys::GDALGetRasterYSize(self.c_dataset) } as usize;
        (size_x, size_y)
    }

    pub fn raster_count(&self) -> usize {
        (unsafe { gdal_sys::GDALGetRasterCount(self.c_dataset) }) as usize
    }

    /// Fetch a band object for a dataset. Bands are numbered from 1.
    pub fn rasterband(&self, band_index: usize) -> Result<RasterBand> {
        let band_index = c_int::try_from(band_index)?;
        unsafe {
            let c_band = gdal_sys::GDALGetRasterBand(self.c_dataset, band_index);
            if c_band.is_null() {
                return Err(_last_null_pointer_err("GDALGetRasterBand"));
            }
            Ok(RasterBand::from_c_rasterband(self, c_band))
        }
    }

    /// The projection as WKT; empty when the dataset has none.
    pub fn projection(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetProjectionRef(self.c_dataset) };
        _string(rv)
    }

    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        let c_srs = unsafe { gdal_sys::GDALGetSpatialRef(self.c_dataset) };
        if c_srs.is_null() {
            return Err(_last_null_pointer_err("GDALGetSpatialRef"));
        }
        unsafe { SpatialRef::from_c_obj(c_srs) }
    }

    pub fn set_spatial_ref(&mut self, spatial_ref: &SpatialRef) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALSetSpatialRef(self.c_dataset, spatial_ref.to_c_hsrs()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Get affine transformation coefficients. Fails when the dataset is not georeferenced.
    pub fn geo_transform(&self) -> Result<GeoTransform> {
        let mut transformation = GeoTransform::default();
        let rv =
            unsafe { gdal_sys::GDALGetGeoTransform(self.c_dataset, transformation.as_mut_ptr()) };

        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(transformation)
    }

    pub fn set_geo_transform(&mut self, transformation: &GeoTransform) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALSetGeoTransform(self.c_dataset, transformation.as_ptr() as *mut f64)
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Copies this dataset to `filename` through `driver`.
    ///
    /// The copy is non-strict: the driver may drop what it cannot represent
    /// instead of failing.
    pub fn create_copy<P: AsRef<Path>>(
        &self,
        driver: &Driver,
        filename: P,
        options: &CslStringList,
    ) -> Result<Dataset> {
        let c_filename = _path_to_c_string(filename.as_ref())?;
        let c_dataset = unsafe {
            gdal_sys::GDALCreateCopy(
                driver.c_driver(),
                c_filename.as_ptr(),
                self.c_dataset,
                0,
                options.as_ptr(),
                None,
                ptr::null_mut(),
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreateCopy"));
        }
        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }

    /// Write all cached blocks to disk.
    #[cfg(any(major_ge_4, all(major_ge_3, minor_ge_7)))]
    pub fn flush_cache(&mut self) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALFlushCache(self.c_dataset) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Write all cached blocks to disk.
    ///
    /// Before GDAL 3.7 `GDALFlushCache` returns nothing, so a failure is read
    /// from the CPL error state instead.
    #[cfg(not(any(major_ge_4, all(major_ge_3, minor_ge_7))))]
    pub fn flush_cache(&mut self) -> Result<()> {
        unsafe {
            gdal_sys::CPLErrorReset();
            gdal_sys::GDALFlushCache(self.c_dataset);
        }
        let last_err = unsafe { gdal_sys::CPLGetLastErrorType() };
        if last_err == CPLErr::CE_Failure || last_err == CPLErr::CE_Fatal {
            return Err(_last_cpl_err(last_err));
        }
        Ok(())
    }

    /// Flushes and closes the dataset, reporting failures that `drop` would swallow.
    pub fn close(mut self) -> Result<()> {
        let c_dataset = std::mem::replace(&mut self.c_dataset, ptr::null_mut());
        unsafe { gdal_sys::CPLErrorReset() };
        unsafe { gdal_sys::GDALClose(c_dataset) };
        let last_err = unsafe { gdal_sys::CPLGetLastErrorType() };
        if last_err == CPLErr::CE_Failure || last_err == CPLErr::CE_Fatal {
            return Err(_last_cpl_err(last_err));
        }
        Ok(())
    }
}

impl Metadata for Dataset {
    unsafe fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_dataset
    }
}

impl Drop for Dataset {
    fn drop(&mut self) {
        if self.c_dataset.is_null() {
            return;
        }
        unsafe {
            gdal_sys::GDALClose(self.c_dataset);
        }
    }
}

fn to_c_strings(values: Option<&[&str]>) -> Result<Vec<CString>> {
    let c_strings = values
        .unwrap_or_default()
        .iter()
        .map(|&s| CString::new(s))
        .collect::<std::result::Result<Vec<CString>, NulError>>()?;
    Ok(c_strings)
}

fn to_null_terminated(values: &[CString]) -> Vec<*const std::ffi::c_char> {
    let mut ptrs = values.iter().map(|s| s.as_ptr()).collect::<Vec<_>>();
    ptrs.push(ptr::null());
    ptrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GdalOpenFlags;
    use crate::test_utils::{SuppressGDALErrorLog, TempFixture};
    use crate::DriverManager;

    #[test]
    fn test_open_missing_file() {
        let _nolog = SuppressGDALErrorLog::new();
        let fixture = TempFixture::empty("missing.tif");
        assert!(matches!(
            Dataset::open(fixture.path()),
            Err(GdalError::NullPointer {
                method_name: "GDALOpenEx",
                ..
            })
        ));
    }

    #[test]
    fn test_open_ex_allowed_driver_fail() {
        let _nolog = SuppressGDALErrorLog::new();
        let fixture = TempFixture::raster("source.tif", (4, 3));
        let result = Dataset::open_ex(
            fixture.path(),
            DatasetOptions {
                open_flags: GdalOpenFlags::raster_read_only(),
                allowed_drivers: Some(&["AIG"]),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_open_ex_allowed_driver() {
        let fixture = TempFixture::raster("source.tif", (4, 3));
        let ds = Dataset::open_ex(
            fixture.path(),
            DatasetOptions {
                open_flags: GdalOpenFlags::raster_read_only(),
                allowed_drivers: Some(&["GTiff"]),
            },
        )
        .unwrap();
        assert_eq!(ds.driver().short_name(), "GTiff");
    }

    #[test]
    fn test_create_copy_with_options() {
        let source = TempFixture::raster("source.tif", (40, 30));
        let target = TempFixture::empty("copy.tif");

        let ds = Dataset::open(source.path()).unwrap();
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let options =
            CslStringList::try_from(&[("COMPRESS", "DEFLATE"), ("TILED", "YES")][..]).unwrap();
        let mut copy = ds.create_copy(&driver, target.path(), &options).unwrap();
        copy.flush_cache().unwrap();
        copy.close().unwrap();

        let copy = Dataset::open(target.path()).unwrap();
        assert_eq!(copy.raster_size(), (40, 30));
        assert_eq!(copy.raster_count(), 1);
    }

    #[test]
    fn test_flush_cache_on_open_dataset() {
        let fixture = TempFixture::raster("source.tif", (4, 3));
        let mut ds = Dataset::open_ex(
            fixture.path(),
            DatasetOptions {
                open_flags: GdalOpenFlags::GDAL_OF_RASTER,
                allowed_drivers: None,
            },
        )
        .unwrap();
        assert!(ds.flush_cache().is_ok());
        assert!(ds.close().is_ok());
    }

    #[test]
    fn test_create_copy_bad_target() {
        let _nolog = SuppressGDALErrorLog::new();
        let source = TempFixture::raster("source.tif", (4, 3));
        let target = TempFixture::empty("missing_dir/copy.tif");

        let ds = Dataset::open(source.path()).unwrap();
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        assert!(matches!(
            ds.create_copy(&driver, target.path(), &CslStringList::new()),
            Err(GdalError::NullPointer {
                method_name: "GDALCreateCopy",
                ..
            })
        ));
    }

    #[test]
    fn test_rasterband_out_of_range() {
        let _nolog = SuppressGDALErrorLog::new();
        let fixture = TempFixture::raster("source.tif", (4, 3));
        let ds = Dataset::open(fixture.path()).unwrap();
        assert!(ds.rasterband(1).is_ok());
        assert!(ds.rasterband(2).is_err());
    }
}
