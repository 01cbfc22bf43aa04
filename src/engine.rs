//! Boundary to the media engine collaborator.
//!
//! The engine owns decoding, its internal threads, and the actual
//! pixel-producing render call. The bridge only ever talks to it through
//! [`MediaEngine`]: context creation with an injected proc-address lookup,
//! a producer-side update callback, one render call per paint cycle, and
//! thin playback glue.

use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::config::RenderApi;
use crate::errors::BridgeError;
use crate::frame::FrameDescriptor;
use crate::source::MediaSource;

pub mod null;

/// Function-lookup callback injected into the engine at context creation.
/// `None` means "symbol not available"; the engine decides how fatal that is.
pub type GetProcAddressFn = Arc<dyn Fn(&CStr) -> Option<NonNull<c_void>> + Send + Sync>;

/// Producer-side "new frame ready" callback. Invoked from the engine's
/// internal thread; must never make graphics calls.
pub type UpdateFn = Arc<dyn Fn() + Send + Sync>;

/// Opaque engine-side render context handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderContextHandle(u64);

impl RenderContextHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Parameters for engine-side render context creation.
#[derive(Clone)]
pub struct ContextParams {
    pub api: RenderApi,
    pub get_proc_address: GetProcAddressFn,
}

impl std::fmt::Debug for ContextParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextParams")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// Core engine interface consumed by the bridge.
///
/// Context calls happen on the host paint thread with a graphics context
/// current; playback calls can come from any host thread the adapter runs on.
pub trait MediaEngine: Send + Sync {
    /// Create a render context bound to the currently-current graphics
    /// context, using `params.get_proc_address` for function lookup.
    fn create_render_context(&self, params: ContextParams) -> Result<RenderContextHandle, BridgeError>;

    /// Register the producer-side frame-ready callback for a context.
    fn set_update_callback(&self, handle: RenderContextHandle, callback: UpdateFn);

    /// Draw the current video frame into the descriptor's framebuffer.
    fn render_frame(&self, handle: RenderContextHandle, frame: &FrameDescriptor);

    /// Release the engine-held context. The handle is dead afterwards.
    fn destroy_render_context(&self, handle: RenderContextHandle);

    /// Start playback of a source.
    fn play(&self, source: &MediaSource) -> Result<(), BridgeError>;

    /// Pause playback, keeping the current position.
    fn pause(&self) -> Result<(), BridgeError>;

    /// Resume paused playback.
    fn resume(&self) -> Result<(), BridgeError>;
}
