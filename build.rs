use semver::Version;

/// `gdal-sys` exports the linked GDAL as `GDAL_VERSION_NUM`, e.g. `3080400` for 3.8.4.
fn gdal_version(version_number: i64) -> Version {
    let major = version_number / 1_000_000;
    let minor = (version_number - major * 1_000_000) / 10_000;
    let patch = (version_number - major * 1_000_000 - minor * 10_000) / 100;
    Version::new(major as u64, minor as u64, patch as u64)
}

fn main() {
    println!("cargo:rerun-if-env-changed=DEP_GDAL_VERSION_NUMBER");
    for major in 3..=4 {
        println!("cargo:rustc-check-cfg=cfg(major_ge_{major})");
    }
    for minor in 0..=99 {
        println!("cargo:rustc-check-cfg=cfg(minor_ge_{minor})");
    }

    let Some(version_number) = std::env::var("DEP_GDAL_VERSION_NUMBER")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
    else {
        println!("cargo:rustc-env=ADF2TIFF_GDAL_BUILD_VERSION=unknown");
        return;
    };

    let detected_version = gdal_version(version_number);
    if detected_version < Version::new(3, 0, 0) {
        panic!("adf2tiff requires GDAL >= 3.0, found {detected_version}");
    }

    println!("cargo:rustc-env=ADF2TIFF_GDAL_BUILD_VERSION={detected_version}");

    for major in 3..=detected_version.major {
        println!("cargo:rustc-cfg=major_ge_{major}");
    }
    for minor in 0..=detected_version.minor {
        println!("cargo:rustc-cfg=minor_ge_{minor}");
    }
}
