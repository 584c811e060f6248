//! GDAL version inspection.

use std::ffi::CString;

use crate::errors::Result;
use crate::utils::_string;

/// Version of the GDAL headers this crate was built against, or `unknown`.
pub const BUILD_VERSION: &str = env!("ADF2TIFF_GDAL_BUILD_VERSION");

/// Calls `GDALVersionInfo` with one of `VERSION_NUM`, `RELEASE_DATE`,
/// `RELEASE_NAME`, `--version`, `LICENSE` or `BUILD_INFO`.
pub fn version_info(key: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    Ok(_string(unsafe { gdal_sys::GDALVersionInfo(c_key.as_ptr()) }))
}

/// Release name of the GDAL library loaded at runtime, e.g. `3.8.4`.
pub fn runtime_version() -> Result<String> {
    version_info("RELEASE_NAME")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_summary() {
        let summary = version_info("--version").unwrap();
        assert!(summary.starts_with("GDAL "));
        assert!(summary.contains(&runtime_version().unwrap()));
    }

    #[test]
    fn test_runtime_is_gdal_3() {
        let version_num: i64 = version_info("VERSION_NUM").unwrap().parse().unwrap();
        assert!(version_num >= 3_000_000);
    }
}
