use std::ffi::{c_char, c_int, c_void, CString};
use std::ptr;

use gdal_sys::{self, OGRErr, OGRSpatialReferenceH};

use crate::errors::*;
use crate::utils::{_last_null_pointer_err, _optional_string, _string};

/// A coordinate reference system, owned through an `OGRSpatialReferenceH`.
#[derive(Debug)]
pub struct SpatialRef(OGRSpatialReferenceH);

impl Drop for SpatialRef {
    fn drop(&mut self) {
        unsafe { gdal_sys::OSRRelease(self.0) };
        self.0 = ptr::null_mut();
    }
}

impl Clone for SpatialRef {
    fn clone(&self) -> SpatialRef {
        let n_obj = unsafe { gdal_sys::OSRClone(self.0) };
        SpatialRef(n_obj)
    }
}

impl SpatialRef {
    pub fn from_wkt(wkt: &str) -> Result<SpatialRef> {
        let c_str = CString::new(wkt)?;
        let c_obj = unsafe { gdal_sys::OSRNewSpatialReference(c_str.as_ptr()) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRNewSpatialReference"));
        }
        Ok(SpatialRef(c_obj))
    }

    pub fn from_epsg(epsg_code: u32) -> Result<SpatialRef> {
        let c_obj = unsafe { gdal_sys::OSRNewSpatialReference(ptr::null()) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRNewSpatialReference"));
        }
        let rv = unsafe { gdal_sys::OSRImportFromEPSG(c_obj, epsg_code as c_int) };
        if rv != OGRErr::OGRERR_NONE {
            unsafe { gdal_sys::OSRRelease(c_obj) };
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRImportFromEPSG",
            });
        }
        Ok(SpatialRef(c_obj))
    }

    /// Takes a copy of a handle owned elsewhere, e.g. by a dataset.
    ///
    /// # Safety
    /// The handle must be a valid `OGRSpatialReferenceH`.
    pub unsafe fn from_c_obj(c_obj: OGRSpatialReferenceH) -> Result<SpatialRef> {
        let mut_c_obj = gdal_sys::OSRClone(c_obj);
        if mut_c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRClone"));
        }
        Ok(SpatialRef(mut_c_obj))
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn to_c_hsrs(&self) -> OGRSpatialReferenceH {
        self.0
    }

    pub fn to_wkt(&self) -> Result<String> {
        let mut c_wkt: *mut c_char = ptr::null_mut();
        let rv = unsafe { gdal_sys::OSRExportToWkt(self.0, &mut c_wkt) };
        let res = if rv != OGRErr::OGRERR_NONE {
            Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRExportToWkt",
            })
        } else {
            Ok(_string(c_wkt))
        };
        unsafe { gdal_sys::VSIFree(c_wkt as *mut c_void) };
        res
    }

    /// The CRS name, e.g. `NAD83 / UTM zone 10N`. `None` for unnamed definitions.
    pub fn name(&self) -> Option<String> {
        let c_ptr = unsafe { gdal_sys::OSRGetName(self.0) };
        _optional_string(c_ptr).filter(|name| name != "unknown" && name != "unnamed")
    }

    /// `AUTHORITY:CODE` of the root node, e.g. `EPSG:26910`, when one is attached.
    pub fn authority(&self) -> Option<String> {
        let name = _optional_string(unsafe { gdal_sys::OSRGetAuthorityName(self.0, ptr::null()) })?;
        let code = _optional_string(unsafe { gdal_sys::OSRGetAuthorityCode(self.0, ptr::null()) })?;
        Some(format!("{name}:{code}"))
    }
}
