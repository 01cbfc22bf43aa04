//! Render bridge between a media engine and a host scene-graph surface node.
//!
//! The host provides a drawable framebuffer-object node and a paint loop;
//! the engine provides decoding and the pixel-producing render call. This
//! crate owns the part in between: platform proc-address resolution, the
//! render-context lifecycle, coalesced cross-thread frame notifications,
//! and one engine render call per paint cycle.
//!
//! A host adapter implements [`host::SurfaceHost`] (and a
//! [`host::RepaintScheduler`]), constructs a [`surface::VideoSurface`]
//! around its engine, and forwards node lifecycle into the surface hooks.

pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod frame;
pub mod host;
pub mod procaddr;
pub mod renderer;
pub mod signal;
pub mod source;
pub mod surface;

pub use config::{BridgeConfig, Platform, RenderApi};
pub use context::{ContextState, GraphicsContextId, RenderContext};
pub use engine::{MediaEngine, RenderContextHandle};
pub use errors::BridgeError;
pub use frame::{FrameDescriptor, FramebufferId, LogicalSize, SurfaceSize};
pub use host::{RepaintScheduler, SurfaceHost};
pub use renderer::{FrameRenderer, RenderOutcome};
pub use signal::UpdateSignal;
pub use source::MediaSource;
pub use surface::VideoSurface;
