use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr::NonNull;

use windows::core::PCSTR;
use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::OpenGL::{wglGetCurrentContext, wglGetProcAddress};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryA};

use crate::procaddr::ProcSource;

/// True when some WGL context is current on the calling thread. WGL lookups
/// return garbage without one; selection bootstraps a context first if not.
pub fn has_current_context() -> bool {
    !unsafe { wglGetCurrentContext() }.is_invalid()
}

/// `wglGetProcAddress` lookup with an `opengl32.dll` export fallback: WGL
/// only resolves extension entry points, the GL 1.x core lives in the DLL's
/// export table.
pub struct WglSource {
    opengl32: HMODULE,
}

// The module handle is process-global and only ever read.
unsafe impl Send for WglSource {}
unsafe impl Sync for WglSource {}

impl WglSource {
    pub fn new() -> Self {
        let opengl32 = unsafe { LoadLibraryA(PCSTR(b"opengl32.dll\0".as_ptr())) }
            .unwrap_or_default();
        Self { opengl32 }
    }
}

impl Default for WglSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcSource for WglSource {
    fn lookup(&self, name: &CStr) -> Option<NonNull<c_void>> {
        let name_ptr = PCSTR(name.as_ptr() as *const u8);

        let address = unsafe { wglGetProcAddress(name_ptr) }
            .or_else(|| {
                if self.opengl32.is_invalid() {
                    None
                } else {
                    unsafe { GetProcAddress(self.opengl32, name_ptr) }
                }
            })
            .map(|f| f as usize)?;

        NonNull::new(address as *mut c_void)
    }
}
