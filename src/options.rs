use std::ffi::c_uint;

use bitflags::bitflags;

/// Open options for [`crate::Dataset::open_ex`].
#[derive(Debug, Default)]
pub struct DatasetOptions<'a> {
    pub open_flags: GdalOpenFlags,
    /// Short names of the drivers that may claim the path; `None` allows all.
    pub allowed_drivers: Option<&'a [&'a str]>,
}

bitflags! {
    /// The `nOpenFlags` argument of `GDALOpenEx`.
    ///
    /// Only read-only raster access is exposed; `GDAL_OF_SHARED` is left out
    /// because [`crate::Dataset`] always owns its handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GdalOpenFlags: c_uint {
        const GDAL_OF_READONLY = 0x00;
        const GDAL_OF_RASTER = 0x02;
        /// Emit error message in case of failed open.
        const GDAL_OF_VERBOSE_ERROR = 0x40;
    }
}

impl Default for GdalOpenFlags {
    fn default() -> GdalOpenFlags {
        GdalOpenFlags::GDAL_OF_READONLY
    }
}

impl GdalOpenFlags {
    /// Read-only raster access, reporting open failures through CPL.
    pub fn raster_read_only() -> GdalOpenFlags {
        GdalOpenFlags::GDAL_OF_READONLY
            | GdalOpenFlags::GDAL_OF_RASTER
            | GdalOpenFlags::GDAL_OF_VERBOSE_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_read_only_bits() {
        let flags = GdalOpenFlags::raster_read_only();
        assert_eq!(flags.bits(), 0x42);
        assert!(flags.contains(GdalOpenFlags::GDAL_OF_RASTER));
        assert!(flags.contains(GdalOpenFlags::GDAL_OF_VERBOSE_ERROR));
    }
}
