use std::ffi::c_void;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::cpl::CslStringList;
use crate::spatial_ref::SpatialRef;
use crate::DriverManager;

pub const FIXTURE_NODATA: f64 = -9999.0;
/// `fixtures/elevation`: a 3 x 1 integer grid of 30 m cells, every cell 7.
pub const GRID_FIXTURE: &str = "elevation";
pub const FIXTURE_EPSG: u32 = 26910;
pub const FIXTURE_GEO_TRANSFORM: [f64; 6] = [500_000.0, 30.0, 0.0, 4_200_000.0, 0.0, -30.0];

/// A temporary directory plus a path inside it; the directory is removed on drop.
pub struct TempFixture {
    _temp_dir: tempfile::TempDir,
    temp_path: PathBuf,
}

impl TempFixture {
    /// Path to a not yet existing file `name` in a fresh temporary directory.
    pub fn empty(name: &str) -> Self {
        let _temp_dir = tempfile::tempdir().unwrap();
        let temp_path = _temp_dir.path().join(name);
        Self {
            _temp_dir,
            temp_path,
        }
    }

    /// Copies the grid directory `fixtures/<name>` into a temporary directory.
    pub fn grid_fixture(name: &str) -> Self {
        let staging = Self::empty(name);
        fs::create_dir(staging.path()).unwrap();
        for entry in fs::read_dir(fixture(name)).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), staging.path().join(entry.file_name())).unwrap();
        }
        staging
    }

    /// A single band `Float32` GeoTIFF of `size` pixels, georeferenced in
    /// UTM zone 10N with a nodata value, standing in for a decoded grid.
    pub fn raster(name: &str, size: (usize, usize)) -> Self {
        let fixture = Self::empty(name);
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut ds = driver
            .create_with_band_type_with_options::<f32, _>(
                fixture.path(),
                size.0,
                size.1,
                1,
                &CslStringList::new(),
            )
            .unwrap();
        ds.set_geo_transform(&FIXTURE_GEO_TRANSFORM).unwrap();
        ds.set_spatial_ref(&SpatialRef::from_epsg(FIXTURE_EPSG).unwrap())
            .unwrap();
        ds.rasterband(1)
            .unwrap()
            .set_no_data_value(FIXTURE_NODATA)
            .unwrap();
        ds.close().unwrap();
        fixture
    }

    /// A directory laid out like a grid coverage. Only the file names are
    /// real; GDAL cannot decode the empty files.
    pub fn grid_dir(name: &str, files: &[&str]) -> Self {
        let fixture = Self::empty(name);
        fs::create_dir(fixture.path()).unwrap();
        for file in files {
            fs::write(fixture.path().join(file), b"").unwrap();
        }
        fixture
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }
}

impl AsRef<Path> for TempFixture {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

/// Returns the fully qualified path to `filename` in `${CARGO_MANIFEST_DIR}/fixtures`.
pub fn fixture(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(filename)
}

/// Scoped value for temporarily suppressing thread-local GDAL log messages.
///
/// For tests that expect GDAL errors and want to keep the output log clean.
pub(crate) struct SuppressGDALErrorLog {
    // Make !Sync and !Send, and force use of `new`.
    _private: PhantomData<*mut c_void>,
}

impl SuppressGDALErrorLog {
    pub(crate) fn new() -> Self {
        unsafe { gdal_sys::CPLPushErrorHandler(Some(gdal_sys::CPLQuietErrorHandler)) };
        SuppressGDALErrorLog {
            _private: PhantomData,
        }
    }
}

impl Drop for SuppressGDALErrorLog {
    fn drop(&mut self) {
        unsafe { gdal_sys::CPLPopErrorHandler() };
    }
}
