use std::ffi::c_double;
use std::mem::MaybeUninit;

/// An affine transform between pixel/line and georeferenced coordinates.
///
///   * `GeoTransform[0]`: x-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[1]`: W-E pixel resolution (pixel width).
///   * `GeoTransform[2]`: row rotation (typically zero).
///   * `GeoTransform[3]`: y-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[4]`: column rotation (typically zero).
///   * `GeoTransform[5]`: N-S pixel resolution (pixel height), negative for a North-up image.
pub type GeoTransform = [c_double; 6];

/// Extension methods on [`GeoTransform`]
pub trait GeoTransformEx {
    /// Upper-left corner of the upper-left pixel.
    fn origin(&self) -> (f64, f64);

    /// Pixel width and height; height is negative for North-up rasters.
    fn pixel_size(&self) -> (f64, f64);

    /// Apply the transform to a pixel/line coordinate. Wraps `GDALApplyGeoTransform`.
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);
}

impl GeoTransformEx for GeoTransform {
    fn origin(&self) -> (f64, f64) {
        (self[0], self[3])
    }

    fn pixel_size(&self) -> (f64, f64) {
        (self[1], self[5])
    }

    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        let mut geo_x = MaybeUninit::<f64>::uninit();
        let mut geo_y = MaybeUninit::<f64>::uninit();
        unsafe {
            gdal_sys::GDALApplyGeoTransform(
                self.as_ptr() as *mut f64,
                pixel,
                line,
                geo_x.as_mut_ptr(),
                geo_y.as_mut_ptr(),
            );
            (geo_x.assume_init(), geo_y.assume_init())
        }
    }
}
