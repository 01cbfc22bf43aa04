use std::ffi::CStr;
use std::os::raw::{c_uchar, c_void};
use std::ptr::NonNull;

use anyhow::{anyhow, Result};
use libloading::Library;

use crate::procaddr::ProcSource;

type GlxGetProcAddress = unsafe extern "C" fn(*const c_uchar) -> *mut c_void;

/// GLX extension-loader lookup through the system GL library.
///
/// The library stays open for the life of the source; the loader entry point
/// is fetched exactly once at open time, which doubles as the capability
/// query GLX availability is decided by.
pub struct GlxSource {
    _lib: Library,
    get_proc_address: GlxGetProcAddress,
}

const GL_LIBRARIES: &[&str] = &["libGL.so.1", "libGL.so"];

impl GlxSource {
    pub fn open() -> Result<Self> {
        let mut last_error = None;

        for name in GL_LIBRARIES {
            let lib = match unsafe { Library::new(name) } {
                Ok(lib) => lib,
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            };

            let get_proc_address: GlxGetProcAddress = unsafe {
                let symbol = lib
                    .get::<GlxGetProcAddress>(b"glXGetProcAddressARB\0")
                    .or_else(|_| lib.get::<GlxGetProcAddress>(b"glXGetProcAddress\0"))
                    .map_err(|e| anyhow!("{name} has no GLX loader entry point: {e}"))?;
                *symbol
            };

            return Ok(Self { _lib: lib, get_proc_address });
        }

        Err(anyhow!(
            "no system GL library found ({}): {:?}",
            GL_LIBRARIES.join(", "),
            last_error
        ))
    }
}

impl ProcSource for GlxSource {
    fn lookup(&self, name: &CStr) -> Option<NonNull<c_void>> {
        let address = unsafe { (self.get_proc_address)(name.as_ptr() as *const c_uchar) };
        NonNull::new(address)
    }
}
