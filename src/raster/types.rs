use std::fmt::{Display, Formatter};

pub use gdal_sys::GDALDataType;
use gdal_sys::GDALGetDataTypeName;

use crate::utils::_optional_string;

/// Primitive pixel types that map onto a [`GDALDataType`].
pub trait GdalType {
    fn gdal_type() -> GDALDataType::Type;
}

impl GdalType for u8 {
    fn gdal_type() -> GDALDataType::Type {
        GDALDataType::GDT_Byte
    }
}

impl GdalType for i16 {
    fn gdal_type() -> GDALDataType::Type {
        GDALDataType::GDT_Int16
    }
}

impl GdalType for i32 {
    fn gdal_type() -> GDALDataType::Type {
        GDALDataType::GDT_Int32
    }
}

impl GdalType for f32 {
    fn gdal_type() -> GDALDataType::Type {
        GDALDataType::GDT_Float32
    }
}

impl GdalType for f64 {
    fn gdal_type() -> GDALDataType::Type {
        GDALDataType::GDT_Float64
    }
}

/// Pixel type of a band, as reported by GDAL.
///
/// Grids only ever hold 32 bit integers or 32 bit floats, but any type GDAL
/// reports is carried through untouched.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GdalDataType(GDALDataType::Type);

impl GdalDataType {
    /// GDAL's name for the type, e.g. `Int32` or `Float32`.
    pub fn name(&self) -> String {
        let c_str = unsafe { GDALGetDataTypeName(self.0) };
        _optional_string(c_str).unwrap_or_else(|| "Unknown".to_string())
    }
}

impl From<GDALDataType::Type> for GdalDataType {
    fn from(ordinal: GDALDataType::Type) -> Self {
        GdalDataType(ordinal)
    }
}

impl Display for GdalDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
