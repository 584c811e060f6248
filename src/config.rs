//! GDAL runtime configuration.
//!
//! Options set here override the corresponding environment variables, e.g.
//! `GDAL_CACHEMAX` or `GDAL_NUM_THREADS`. The error handler installed by
//! [`set_error_handler`] receives every message GDAL raises through CPL.

use std::ffi::{c_char, c_void, CString};
use std::sync::Mutex;

use gdal_sys::{CPLErr, CPLErrorNum, CPLGetErrorHandlerUserData};

use crate::cpl::CslStringList;
use crate::errors::{CplErrType, Result};
use crate::utils::_string;

pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    let c_val = CString::new(value.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), c_val.as_ptr());
    };
    Ok(())
}

/// Returns `default` when `key` is not set.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    let c_default = CString::new(default.as_bytes())?;
    let rv = unsafe { gdal_sys::CPLGetConfigOption(c_key.as_ptr(), c_default.as_ptr()) };
    Ok(_string(rv))
}

pub fn clear_config_option(key: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), ::std::ptr::null());
    };
    Ok(())
}

/// Applies every `KEY=VALUE` entry of `options` with [`set_config_option`].
pub fn apply_config_options(options: &CslStringList) -> Result<()> {
    for (key, value) in options.iter() {
        set_config_option(&key, &value)?;
    }
    Ok(())
}

type ErrorCallbackType = dyn FnMut(CplErrType, i32, &str) + 'static + Send;
// Outer box pins the callback's address for GDAL's `pUserData`; the inner box
// turns the fat trait object pointer into a thin one.
type PinnedErrorCallback = Box<Box<ErrorCallbackType>>;

static ERROR_CALLBACK: Mutex<Option<PinnedErrorCallback>> = Mutex::new(None);

/// Routes GDAL's CPL messages into `callback` until [`remove_error_handler`] is called.
///
/// Installing a new handler replaces the previous one.
pub fn set_error_handler<F>(callback: F)
where
    F: FnMut(CplErrType, i32, &str) + 'static + Send + Sync,
{
    unsafe extern "C" fn error_handler(
        error_type: CPLErr::Type,
        error_num: CPLErrorNum,
        error_msg_ptr: *const c_char,
    ) {
        let error_msg = _string(error_msg_ptr);
        let error_type: CplErrType = error_type.into();

        let callback_raw = CPLGetErrorHandlerUserData();
        if callback_raw.is_null() {
            return;
        }
        let callback: &mut Box<ErrorCallbackType> = &mut *(callback_raw as *mut Box<_>);

        callback(error_type, error_num, &error_msg);
    }

    let mut callback: PinnedErrorCallback = Box::new(Box::new(callback));
    let callback_ref: &mut Box<ErrorCallbackType> = callback.as_mut();

    // poisoning could only come from a panic inside `CPLSetErrorHandlerEx`
    let mut callback_lock = match ERROR_CALLBACK.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    };

    unsafe {
        gdal_sys::CPLSetErrorHandlerEx(Some(error_handler), callback_ref as *mut _ as *mut c_void);
    };

    callback_lock.replace(callback);
}

/// Restores GDAL's default handler, which prints to stderr.
pub fn remove_error_handler() {
    let mut callback_lock = match ERROR_CALLBACK.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    };

    unsafe {
        gdal_sys::CPLSetErrorHandler(None);
    };

    callback_lock.take();
}
