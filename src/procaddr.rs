//! Platform proc-address resolution.
//!
//! The media engine does not link against OpenGL; at context creation it is
//! handed a lookup callback and pulls every GL function it needs through it.
//! This module owns that callback: a [`Strategy`] tag chosen once per process
//! plus the [`ProcSource`] doing the actual native lookup. Unknown symbols
//! resolve to `None`, never to an error; the engine decides which symbols
//! are optional.

use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use raw_window_handle::RawDisplayHandle;

use crate::config::Platform;
use crate::engine::GetProcAddressFn;
use crate::errors::BridgeError;

#[cfg(windows)]
pub mod bootstrap;
#[cfg(target_os = "linux")]
pub mod egl;
#[cfg(target_os = "linux")]
pub mod glx;
#[cfg(windows)]
pub mod wgl;

/// Native lookup strategy. Selected once per process, immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// X11 extension loader through the system GL library.
    Glx,
    /// EGL loader, used on Linux when GLX is unavailable (e.g. Wayland-only).
    Egl,
    /// `wglGetProcAddress` against an already-current Windows context.
    Wgl,
    /// Windows without a current context: a hidden offscreen window and a
    /// dummy context are bootstrapped first, then WGL lookup applies.
    BootstrapOffscreen,
}

impl Strategy {
    /// Strategy for a given OS tag. This is the coarse, display-agnostic
    /// selection; [`Strategy::for_display`] refines it when the host can
    /// hand over its native display handle.
    pub fn for_platform(platform: &Platform) -> Result<Self, BridgeError> {
        match platform {
            // GLX first; selection falls back to EGL when the GL library
            // lacks a GLX entry point (see `ProcAddressResolver::select`).
            Platform::Linux => Ok(Strategy::Glx),
            Platform::Windows => Ok(Strategy::Wgl),
            Platform::Other(name) => Err(BridgeError::PlatformUnsupported(name.clone())),
        }
    }

    /// Strategy for a host-provided native display handle.
    pub fn for_display(display: RawDisplayHandle) -> Result<Self, BridgeError> {
        match display {
            RawDisplayHandle::Xlib(_) | RawDisplayHandle::Xcb(_) => Ok(Strategy::Glx),
            RawDisplayHandle::Wayland(_) | RawDisplayHandle::Drm(_) | RawDisplayHandle::Gbm(_) => {
                Ok(Strategy::Egl)
            }
            RawDisplayHandle::Windows(_) => Ok(Strategy::Wgl),
            other => Err(BridgeError::PlatformUnsupported(format!("{other:?}"))),
        }
    }
}

/// A native symbol table: maps an ASCII symbol name to a callable address.
pub trait ProcSource: Send + Sync {
    fn lookup(&self, name: &CStr) -> Option<NonNull<c_void>>;
}

/// The process-wide resolver: one strategy tag, one source behind it.
pub struct ProcAddressResolver {
    strategy: Strategy,
    source: Arc<dyn ProcSource>,
}

impl ProcAddressResolver {
    /// Select a resolver for the given platform tag.
    ///
    /// Availability checks are explicit capability queries (does the loader
    /// library open and export its entry point), not failure-mode probing.
    pub fn select(platform: &Platform) -> Result<Self, BridgeError> {
        match platform {
            Platform::Linux => select_linux(),
            Platform::Windows => select_windows(),
            Platform::Other(name) => Err(BridgeError::PlatformUnsupported(name.clone())),
        }
    }

    /// Build a resolver from an explicit strategy tag and source. Hosts that
    /// already own a loader (a GUI toolkit's GL context, for instance) plug
    /// it in here instead of going through OS selection.
    pub fn with_source(strategy: Strategy, source: Arc<dyn ProcSource>) -> Self {
        Self { strategy, source }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Resolve a symbol name to a native address. Safe to call repeatedly;
    /// unknown names return `None`.
    pub fn resolve(&self, name: &CStr) -> Option<NonNull<c_void>> {
        let address = self.source.lookup(name);
        if address.is_none() {
            log::debug!(
                "proc address miss via {:?}: {}",
                self.strategy,
                name.to_string_lossy()
            );
        }
        address
    }

    /// The lookup callback injected into the engine at context creation.
    pub fn as_engine_fn(&self) -> GetProcAddressFn {
        let source = Arc::clone(&self.source);
        let strategy = self.strategy;
        Arc::new(move |name: &CStr| {
            let address = source.lookup(name);
            log::trace!(
                "engine proc lookup via {:?}: {} -> {}",
                strategy,
                name.to_string_lossy(),
                if address.is_some() { "ok" } else { "missing" }
            );
            address
        })
    }
}

impl std::fmt::Debug for ProcAddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcAddressResolver")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

lazy_static::lazy_static! {
    static ref PROCESS_RESOLVER: Result<Arc<ProcAddressResolver>, BridgeError> =
        ProcAddressResolver::select(&Platform::detect()).map(Arc::new);
}

/// The once-per-process resolver. The first caller triggers selection; every
/// later call observes the same outcome, including a failed one.
pub fn process_resolver() -> Result<Arc<ProcAddressResolver>, BridgeError> {
    PROCESS_RESOLVER.clone()
}

#[cfg(target_os = "linux")]
fn select_linux() -> Result<ProcAddressResolver, BridgeError> {
    match glx::GlxSource::open() {
        Ok(source) => {
            log::debug!("proc address strategy: GLX");
            return Ok(ProcAddressResolver::with_source(Strategy::Glx, Arc::new(source)));
        }
        Err(e) => log::debug!("GLX loader unavailable: {e}"),
    }

    match egl::EglSource::open() {
        Ok(source) => {
            log::debug!("proc address strategy: EGL");
            Ok(ProcAddressResolver::with_source(Strategy::Egl, Arc::new(source)))
        }
        Err(e) => {
            log::error!("EGL loader unavailable: {e}");
            Err(BridgeError::PlatformUnsupported(
                "linux without a usable GLX or EGL loader".to_string(),
            ))
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn select_linux() -> Result<ProcAddressResolver, BridgeError> {
    Err(BridgeError::PlatformUnsupported(
        "linux strategies not compiled into this build".to_string(),
    ))
}

#[cfg(windows)]
fn select_windows() -> Result<ProcAddressResolver, BridgeError> {
    // WGL only resolves correctly once *some* context is current. If the
    // host has not made one current yet, bootstrap a hidden offscreen one.
    if wgl::has_current_context() {
        log::debug!("proc address strategy: WGL (host context current)");
        return Ok(ProcAddressResolver::with_source(
            Strategy::Wgl,
            Arc::new(wgl::WglSource::new()),
        ));
    }

    let context = bootstrap::BootstrapContext::create()
        .map_err(|e| BridgeError::PlatformUnsupported(format!("WGL bootstrap failed: {e}")))?;
    log::debug!("proc address strategy: WGL via bootstrap offscreen context");
    Ok(ProcAddressResolver::with_source(
        Strategy::BootstrapOffscreen,
        Arc::new(context),
    ))
}

#[cfg(not(windows))]
fn select_windows() -> Result<ProcAddressResolver, BridgeError> {
    Err(BridgeError::PlatformUnsupported(
        "windows strategies not compiled into this build".to_string(),
    ))
}
