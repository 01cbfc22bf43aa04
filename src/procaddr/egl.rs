use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::ptr::NonNull;

use anyhow::{anyhow, Result};
use libloading::Library;

use crate::procaddr::ProcSource;

type EglGetProcAddress = unsafe extern "C" fn(*const c_char) -> *mut c_void;

/// EGL-based lookup, the Linux fallback when GLX is unavailable.
pub struct EglSource {
    _lib: Library,
    get_proc_address: EglGetProcAddress,
}

const EGL_LIBRARIES: &[&str] = &["libEGL.so.1", "libEGL.so"];

impl EglSource {
    pub fn open() -> Result<Self> {
        let mut last_error = None;

        for name in EGL_LIBRARIES {
            let lib = match unsafe { Library::new(name) } {
                Ok(lib) => lib,
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            };

            let get_proc_address: EglGetProcAddress = unsafe {
                let symbol = lib
                    .get::<EglGetProcAddress>(b"eglGetProcAddress\0")
                    .map_err(|e| anyhow!("{name} has no eglGetProcAddress: {e}"))?;
                *symbol
            };

            return Ok(Self { _lib: lib, get_proc_address });
        }

        Err(anyhow!(
            "no system EGL library found ({}): {:?}",
            EGL_LIBRARIES.join(", "),
            last_error
        ))
    }
}

impl ProcSource for EglSource {
    fn lookup(&self, name: &CStr) -> Option<NonNull<c_void>> {
        let address = unsafe { (self.get_proc_address)(name.as_ptr()) };
        NonNull::new(address)
    }
}
