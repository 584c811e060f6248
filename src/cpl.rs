//! GDAL string lists.
//!
//! Driver creation options travel to GDAL as a NULL-terminated array of
//! `KEY=VALUE` C strings. [`CslStringList`] owns such an array and frees it
//! on drop.

use std::ffi::{c_char, CString};
use std::fmt::{Debug, Display, Formatter};
use std::ptr;

use gdal_sys::{CSLCount, CSLDestroy, CSLFetchNameValue, CSLSetNameValue};

use crate::errors::{GdalError, Result};
use crate::utils::_string;

/// Owned `char **papszStrList` holding `KEY=VALUE` entries.
pub struct CslStringList {
    list_ptr: *mut *mut c_char,
}

impl CslStringList {
    pub fn new() -> Self {
        Self {
            list_ptr: ptr::null_mut(),
        }
    }

    /// Assigns `value` to `name`, replacing an earlier value for the same name.
    ///
    /// Names are restricted to ASCII alphanumerics and `_`; values may not
    /// contain line breaks.
    pub fn set_name_value(&mut self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GdalError::BadArgument(format!(
                "Invalid characters in name: '{name}'"
            )));
        }
        if value.contains(['\n', '\r']) {
            return Err(GdalError::BadArgument(format!(
                "Invalid characters in value: '{value}'"
            )));
        }
        let psz_name = CString::new(name)?;
        let psz_value = CString::new(value)?;

        unsafe {
            self.list_ptr = CSLSetNameValue(self.list_ptr, psz_name.as_ptr(), psz_value.as_ptr());
        }

        Ok(())
    }

    /// Parses a single `KEY=VALUE` argument, as accepted by GDAL's command line tools.
    pub fn add_name_value_pair(&mut self, pair: &str) -> Result<()> {
        match pair.split_once('=') {
            Some((name, value)) => self.set_name_value(name.trim(), value.trim()),
            None => Err(GdalError::BadArgument(format!(
                "Expected KEY=VALUE, got '{pair}'"
            ))),
        }
    }

    pub fn fetch_name_value(&self, key: &str) -> Result<Option<String>> {
        let key = CString::new(key)?;
        let c_value = unsafe { CSLFetchNameValue(self.as_ptr(), key.as_ptr()) };
        if c_value.is_null() {
            return Ok(None);
        }
        Ok(Some(_string(c_value)))
    }

    pub fn len(&self) -> usize {
        (unsafe { CSLCount(self.as_ptr()) }) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in insertion order, split at the first `=`.
    pub fn iter(&self) -> impl Iterator<Item = (String, String)> + '_ {
        let count = self.len();
        (0..count).filter_map(move |idx| {
            let entry = unsafe { *self.list_ptr.add(idx) };
            if entry.is_null() {
                return None;
            }
            let entry = _string(entry);
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
    }

    pub fn as_ptr(&self) -> gdal_sys::CSLConstList {
        self.list_ptr
    }
}

impl Drop for CslStringList {
    fn drop(&mut self) {
        unsafe { CSLDestroy(self.list_ptr) }
    }
}

impl Default for CslStringList {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for CslStringList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders the list the way GDAL tools echo creation options: `K1=V1 K2=V2`.
impl Display for CslStringList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl TryFrom<&[(&str, &str)]> for CslStringList {
    type Error = GdalError;

    fn try_from(pairs: &[(&str, &str)]) -> Result<Self> {
        let mut result = Self::new();
        for (k, v) in pairs {
            result.set_name_value(k, v)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::cpl::CslStringList;
    use crate::errors::Result;

    fn fixture() -> Result<CslStringList> {
        CslStringList::try_from(
            &[
                ("COMPRESS", "LZW"),
                ("TILED", "YES"),
                ("BIGTIFF", "IF_NEEDED"),
            ][..],
        )
    }

    #[test]
    fn fetch_values() -> Result<()> {
        let l = fixture()?;
        assert_eq!(l.fetch_name_value("COMPRESS")?.as_deref(), Some("LZW"));
        assert_eq!(l.fetch_name_value("BIGTIFF")?.as_deref(), Some("IF_NEEDED"));
        assert_eq!(l.fetch_name_value("PREDICTOR")?, None);
        Ok(())
    }

    #[test]
    fn overwrites_duplicate_names() -> Result<()> {
        let mut l = fixture()?;
        l.set_name_value("COMPRESS", "DEFLATE")?;
        assert_eq!(l.len(), 3);
        assert_eq!(l.fetch_name_value("COMPRESS")?.as_deref(), Some("DEFLATE"));
        Ok(())
    }

    #[test]
    fn iterates_in_order() -> Result<()> {
        let l = fixture()?;
        let keys: Vec<String> = l.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["COMPRESS", "TILED", "BIGTIFF"]);
        Ok(())
    }

    #[test]
    fn empty_list() {
        let l = CslStringList::new();
        assert!(l.is_empty());
        assert_eq!(l.iter().count(), 0);
        assert_eq!(l.to_string(), "");
    }

    #[test]
    fn rejects_invalid_entries() -> Result<()> {
        let mut l = fixture()?;
        assert!(l.set_name_value("l==t", "2").is_err());
        assert!(l.set_name_value("", "2").is_err());
        assert!(l.set_name_value("foo", "2\n4\r5").is_err());
        assert!(l.add_name_value_pair("GDAL_CACHEMAX").is_err());
        Ok(())
    }

    #[test]
    fn parses_pairs() -> Result<()> {
        let mut l = CslStringList::new();
        l.add_name_value_pair("GDAL_CACHEMAX=512")?;
        l.add_name_value_pair("GDAL_DISABLE_READDIR_ON_OPEN = EMPTY_DIR")?;
        assert_eq!(l.fetch_name_value("GDAL_CACHEMAX")?.as_deref(), Some("512"));
        assert_eq!(
            l.fetch_name_value("GDAL_DISABLE_READDIR_ON_OPEN")?.as_deref(),
            Some("EMPTY_DIR")
        );
        Ok(())
    }

    #[test]
    fn display_fmt() -> Result<()> {
        let l = fixture()?;
        assert_eq!(l.to_string(), "COMPRESS=LZW TILED=YES BIGTIFF=IF_NEEDED");
        Ok(())
    }
}
