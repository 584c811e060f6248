use std::ffi::NulError;
use std::num::TryFromIntError;
use std::path::PathBuf;
use std::str::Utf8Error;

use gdal_sys::{CPLErr, OGRErr};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GdalError>;

#[derive(Clone, Debug, Error)]
pub enum GdalError {
    #[error("FfiNulError")]
    FfiNulError(#[from] NulError),
    #[error("StrUtf8Error")]
    StrUtf8Error(#[from] Utf8Error),
    #[error(transparent)]
    IntConversionError(#[from] TryFromIntError),
    #[error("CPL error class: '{class:?}', error number: '{number}', error msg: '{msg}'")]
    CplError {
        class: CplErrType,
        number: i32,
        msg: String,
    },
    #[error("GDAL method '{method_name}' returned a NULL pointer. Error msg: '{msg}'")]
    NullPointer {
        method_name: &'static str,
        msg: String,
    },
    #[error("OGR method '{method_name}' returned error: '{err:?}'")]
    OgrError {
        err: OGRErr::Type,
        method_name: &'static str,
    },
    #[error("{0}")]
    BadArgument(String),
}

/// Severity of a message raised through GDAL's CPL error machinery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CplErrType {
    None,
    Debug,
    Warning,
    Failure,
    Fatal,
}

impl From<CPLErr::Type> for CplErrType {
    fn from(error_type: CPLErr::Type) -> Self {
        match error_type {
            CPLErr::CE_Debug => Self::Debug,
            CPLErr::CE_Warning => Self::Warning,
            CPLErr::CE_Failure => Self::Failure,
            CPLErr::CE_Fatal => Self::Fatal,
            _ => Self::None,
        }
    }
}

/// A compression name other than `LZW`, `DEFLATE` or `NONE`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid compression '{0}', expected one of LZW, DEFLATE, NONE")]
pub struct InvalidCompression(pub String);

/// Failures of a single grid to GeoTIFF conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("no hdr.adf found in directory: {}", .0.display())]
    MissingHeader(PathBuf),
    #[error(
        "failed to open grid dataset {}; make sure all grid files are present (hdr.adf, w001001.adf, ...)",
        .path.display()
    )]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: GdalError,
    },
    #[error("failed to create output GeoTIFF {}", .path.display())]
    CreateCopyFailed {
        path: PathBuf,
        #[source]
        source: GdalError,
    },
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Gdal(#[from] GdalError),
}
