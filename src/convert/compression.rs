use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tracing::warn;

use crate::cpl::CslStringList;
use crate::errors::{InvalidCompression, Result};

/// TIFF compression applied to the output tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Lzw,
    Deflate,
    None,
}

impl Compression {
    /// Value of the `GTiff` driver's `COMPRESS` creation option.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Lzw => "LZW",
            Compression::Deflate => "DEFLATE",
            Compression::None => "NONE",
        }
    }

    /// Parses a user supplied name, falling back to [`Compression::Lzw`] with a
    /// warning when the name is not recognised.
    pub fn parse_or_default(name: Option<&str>) -> Compression {
        let Some(name) = name else {
            return Compression::default();
        };
        match name.parse() {
            Ok(compression) => compression,
            Err(err) => {
                warn!("{err}, using {}", Compression::default());
                Compression::default()
            }
        }
    }

    /// `GTiff` creation options: this compression, internal tiling, and
    /// BigTIFF only when the classic 4 GiB limit would be exceeded.
    pub fn creation_options(&self) -> Result<CslStringList> {
        CslStringList::try_from(
            &[
                ("COMPRESS", self.as_str()),
                ("TILED", "YES"),
                ("BIGTIFF", "IF_NEEDED"),
            ][..],
        )
    }
}

impl FromStr for Compression {
    type Err = InvalidCompression;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LZW" => Ok(Compression::Lzw),
            "DEFLATE" => Ok(Compression::Deflate),
            "NONE" => Ok(Compression::None),
            _ => Err(InvalidCompression(s.to_ascii_uppercase())),
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("lzw".parse::<Compression>(), Ok(Compression::Lzw));
        assert_eq!("Deflate".parse::<Compression>(), Ok(Compression::Deflate));
        assert_eq!("NONE".parse::<Compression>(), Ok(Compression::None));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "jpeg".parse::<Compression>(),
            Err(InvalidCompression("JPEG".to_string()))
        );
    }

    #[test]
    fn test_invalid_name_falls_back_to_lzw() {
        assert_eq!(Compression::parse_or_default(Some("zstd")), Compression::Lzw);
        assert_eq!(Compression::parse_or_default(Some("")), Compression::Lzw);
        assert_eq!(Compression::parse_or_default(None), Compression::Lzw);
        assert_eq!(
            Compression::parse_or_default(Some("deflate")),
            Compression::Deflate
        );
    }

    #[test]
    fn test_creation_options() {
        let options = Compression::Deflate.creation_options().unwrap();
        assert_eq!(options.to_string(), "COMPRESS=DEFLATE TILED=YES BIGTIFF=IF_NEEDED");

        let options = Compression::None.creation_options().unwrap();
        assert_eq!(
            options.fetch_name_value("COMPRESS").unwrap().as_deref(),
            Some("NONE")
        );
    }
}
