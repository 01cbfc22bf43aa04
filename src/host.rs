//! Capability interface between the bridge core and a host adapter.
//!
//! One core, many thin adapters: each host binding implements these traits
//! instead of subclassing anything. The bridge depends only on this seam.

use anyhow::Result;

use crate::context::GraphicsContextId;
use crate::frame::{FramebufferId, LogicalSize, SurfaceSize};

/// Thread-safe repaint request into the host's paint scheduling. Called from
/// the engine's internal thread; the host may coalesce requests further.
pub trait RepaintScheduler: Send + Sync {
    fn schedule_repaint(&self);
}

/// What a host adapter exposes to the bridge during a paint cycle.
///
/// All methods are called on the host's paint thread. Geometry is queried
/// fresh every cycle; nothing here is cached by the bridge.
pub trait SurfaceHost {
    /// Logical (scale-independent) size of the surface node.
    fn logical_size(&self) -> LogicalSize;

    /// Device scale factor (device pixel ratio) of the node's window.
    fn scale_factor(&self) -> f64;

    /// Allocate a framebuffer object of the given pixel size.
    fn create_framebuffer(&mut self, size: SurfaceSize) -> Result<FramebufferId>;

    /// The framebuffer that is the paint target this cycle, if any.
    fn current_framebuffer(&self) -> Option<FramebufferId>;

    /// Identity of the graphics context current on the paint thread, if any.
    fn graphics_context(&self) -> Option<GraphicsContextId>;

    /// Host-side state synchronization point, invoked right before a render.
    /// Hosts with a separate scene-graph thread copy item state here.
    fn synchronize(&mut self) {}
}
