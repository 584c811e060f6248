use std::ffi::{c_int, CString};
use std::path::Path;
use std::sync::Once;

use gdal_sys::GDALDriverH;

use crate::cpl::CslStringList;
use crate::dataset::Dataset;
use crate::errors::*;
use crate::raster::GdalType;
use crate::utils::{_last_null_pointer_err, _path_to_c_string, _string};

static START: Once = Once::new();

pub fn _register_drivers() {
    START.call_once(|| unsafe {
        gdal_sys::GDALAllRegister();
    });
}

/// Raster format driver, e.g. `GTiff` for writing or `AIG` for reading grids.
#[derive(Debug)]
pub struct Driver {
    c_driver: GDALDriverH,
}

impl Driver {
    /// Creates a new Driver object by wrapping a C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_driver(c_driver: GDALDriverH) -> Driver {
        Driver { c_driver }
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_driver(&self) -> GDALDriverH {
        self.c_driver
    }

    pub fn short_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverShortName(self.c_driver) };
        _string(rv)
    }

    pub fn long_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverLongName(self.c_driver) };
        _string(rv)
    }

    /// Creates an empty dataset of `T` pixels.
    pub fn create_with_band_type_with_options<T: GdalType, P: AsRef<Path>>(
        &self,
        filename: P,
        size_x: usize,
        size_y: usize,
        bands: usize,
        options: &CslStringList,
    ) -> Result<Dataset> {
        let size_x = c_int::try_from(size_x)?;
        let size_y = c_int::try_from(size_y)?;
        let bands = c_int::try_from(bands)?;

        let c_filename = _path_to_c_string(filename.as_ref())?;
        let c_dataset = unsafe {
            gdal_sys::GDALCreate(
                self.c_driver,
                c_filename.as_ptr(),
                size_x,
                size_y,
                bands,
                T::gdal_type(),
                options.as_ptr(),
            )
        };

        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreate"));
        };

        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }
}

pub struct DriverManager;

impl DriverManager {
    /// Looks a driver up by its short name, registering all drivers on first use.
    pub fn get_driver_by_name(name: &str) -> Result<Driver> {
        _register_drivers();
        let c_name = CString::new(name)?;
        let c_driver = unsafe { gdal_sys::GDALGetDriverByName(c_name.as_ptr()) };
        if c_driver.is_null() {
            return Err(_last_null_pointer_err("GDALGetDriverByName"));
        };
        Ok(Driver { c_driver })
    }

    pub fn count() -> usize {
        _register_drivers();
        (unsafe { gdal_sys::GDALGetDriverCount() }) as usize
    }
}
