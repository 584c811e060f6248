use std::ffi::CString;

use gdal_sys::GDALMajorObjectH;

use crate::utils::_optional_string;

/// Domain holding the structural properties a driver reports, such as
/// `COMPRESSION` and `INTERLEAVE`.
pub const IMAGE_STRUCTURE: &str = "IMAGE_STRUCTURE";

/// Metadata access on GDAL major objects, implemented for [`crate::Dataset`].
pub trait Metadata {
    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    unsafe fn gdal_object_ptr(&self) -> GDALMajorObjectH;

    /// Get a single metadata item; an empty `domain` means the default domain.
    ///
    /// Returns `None` when the item is not set or the key contains a NUL byte.
    fn metadata_item(&self, key: &str, domain: &str) -> Option<String> {
        let c_key = CString::new(key).ok()?;
        let c_domain = CString::new(domain).ok()?;
        let c_res = unsafe {
            gdal_sys::GDALGetMetadataItem(
                self.gdal_object_ptr(),
                c_key.as_ptr(),
                c_domain.as_ptr(),
            )
        };
        _optional_string(c_res)
    }
}
