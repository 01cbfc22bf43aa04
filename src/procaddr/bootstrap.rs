use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr::NonNull;

use anyhow::{anyhow, Result};
use windows::core::PCSTR;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{GetDC, ReleaseDC, HDC};
use windows::Win32::Graphics::OpenGL::{
    wglCreateContext, wglDeleteContext, wglMakeCurrent, ChoosePixelFormat, SetPixelFormat, HGLRC,
    PFD_DRAW_TO_WINDOW, PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA, PIXELFORMATDESCRIPTOR,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleA;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExA, DefWindowProcA, DestroyWindow, RegisterClassA, WINDOW_EX_STYLE, WNDCLASSA,
    WS_OVERLAPPED,
};

use crate::procaddr::wgl::WglSource;
use crate::procaddr::ProcSource;

const WINDOW_CLASS: PCSTR = PCSTR(b"videobridge_bootstrap\0".as_ptr());

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    DefWindowProcA(hwnd, msg, wparam, lparam)
}

/// Hidden 1x1 window whose dummy GL context makes WGL lookups valid before
/// the host has created any context of its own.
///
/// Lives for the resolver's (process) lifetime; torn down on drop in strict
/// reverse order of creation.
pub struct BootstrapContext {
    hwnd: HWND,
    hdc: HDC,
    hglrc: HGLRC,
    inner: WglSource,
}

// Window, DC and context belong to this process and are only used for
// symbol lookup after creation.
unsafe impl Send for BootstrapContext {}
unsafe impl Sync for BootstrapContext {}

impl BootstrapContext {
    pub fn create() -> Result<Self> {
        unsafe {
            let instance: HINSTANCE = GetModuleHandleA(None)?.into();

            let class = WNDCLASSA {
                lpfnWndProc: Some(wnd_proc),
                hInstance: instance,
                lpszClassName: WINDOW_CLASS,
                ..Default::default()
            };
            // Zero means the class already exists from an earlier bootstrap,
            // which is fine.
            RegisterClassA(&class);

            let hwnd = CreateWindowExA(
                WINDOW_EX_STYLE(0),
                WINDOW_CLASS,
                PCSTR(b"videobridge bootstrap\0".as_ptr()),
                WS_OVERLAPPED,
                0,
                0,
                1,
                1,
                None,
                None,
                instance,
                None,
            )?;

            let hdc = GetDC(hwnd);
            if hdc.is_invalid() {
                let _ = DestroyWindow(hwnd);
                return Err(anyhow!("GetDC failed for bootstrap window"));
            }

            let descriptor = PIXELFORMATDESCRIPTOR {
                nSize: std::mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
                nVersion: 1,
                dwFlags: PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL,
                iPixelType: PFD_TYPE_RGBA,
                cColorBits: 32,
                ..Default::default()
            };

            let format = ChoosePixelFormat(hdc, &descriptor);
            if format == 0 {
                ReleaseDC(hwnd, hdc);
                let _ = DestroyWindow(hwnd);
                return Err(anyhow!("no usable pixel format for bootstrap context"));
            }
            SetPixelFormat(hdc, format, &descriptor)?;

            let hglrc = wglCreateContext(hdc)?;
            wglMakeCurrent(hdc, hglrc)?;

            Ok(Self { hwnd, hdc, hglrc, inner: WglSource::new() })
        }
    }
}

impl Drop for BootstrapContext {
    fn drop(&mut self) {
        unsafe {
            let _ = wglMakeCurrent(self.hdc, HGLRC::default());
            let _ = wglDeleteContext(self.hglrc);
            ReleaseDC(self.hwnd, self.hdc);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

impl ProcSource for BootstrapContext {
    fn lookup(&self, name: &CStr) -> Option<NonNull<c_void>> {
        self.inner.lookup(name)
    }
}
