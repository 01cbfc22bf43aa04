//! The video surface node core.
//!
//! One `VideoSurface` per drawable node. Thin per-host adapters forward
//! their toolkit's lifecycle into the hooks here and implement
//! [`SurfaceHost`](crate::host::SurfaceHost); context lifecycle, update
//! coalescing and per-cycle rendering all live in this one place instead of
//! being repeated per host binding.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::context::{ContextState, GraphicsContextId, RenderContext};
use crate::engine::MediaEngine;
use crate::errors::BridgeError;
use crate::frame::{FramebufferId, SurfaceSize};
use crate::host::{RepaintScheduler, SurfaceHost};
use crate::procaddr::{self, ProcAddressResolver};
use crate::renderer::{FrameRenderer, RenderOutcome};
use crate::signal::UpdateSignal;
use crate::source::MediaSource;

pub struct VideoSurface {
    engine: Arc<dyn MediaEngine>,
    signal: Arc<UpdateSignal>,
    context: RenderContext,
    renderer: FrameRenderer,
    /// Explicit resolver when injected; otherwise the process-wide one is
    /// picked up lazily at first framebuffer request.
    resolver: Option<Arc<ProcAddressResolver>>,
    source: Option<MediaSource>,
}

impl VideoSurface {
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self::with_config(engine, BridgeConfig::default())
    }

    pub fn with_config(engine: Arc<dyn MediaEngine>, config: BridgeConfig) -> Self {
        let signal = Arc::new(UpdateSignal::new());
        let context = RenderContext::new(engine.clone(), signal.clone(), config.api);
        Self {
            engine,
            signal,
            context,
            renderer: FrameRenderer::new(config.flip_y),
            resolver: None,
            source: None,
        }
    }

    /// Like [`with_config`](Self::with_config), with an explicit resolver
    /// instead of the process-wide selection.
    pub fn with_resolver(
        engine: Arc<dyn MediaEngine>,
        config: BridgeConfig,
        resolver: Arc<ProcAddressResolver>,
    ) -> Self {
        let mut surface = Self::with_config(engine, config);
        surface.resolver = Some(resolver);
        surface
    }

    /// Write of the `source` property: parse and start playback.
    pub fn set_source(&mut self, raw: &str) -> Result<(), BridgeError> {
        let source: MediaSource = raw.parse()?;
        self.play(source)
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    pub fn play(&mut self, source: MediaSource) -> Result<(), BridgeError> {
        log::debug!("play {source}");
        self.engine.play(&source)?;
        self.source = Some(source);
        Ok(())
    }

    pub fn pause(&self) -> Result<(), BridgeError> {
        self.engine.pause()
    }

    pub fn resume(&self) -> Result<(), BridgeError> {
        self.engine.resume()
    }

    /// Surface-created hook: wire the host's repaint scheduling into the
    /// update signal so engine-thread frame notifications reach the paint
    /// loop.
    pub fn handle_surface_created(&self, scheduler: Arc<dyn RepaintScheduler>) {
        self.signal.attach_scheduler(scheduler);
    }

    /// Framebuffer-requested hook, called on the paint thread with the
    /// host's graphics context current. Lazily brings the render context up
    /// on the first request, then allocates the framebuffer at the surface's
    /// pixel size.
    ///
    /// Fatal conditions (`PlatformUnsupported`, `ContextCreationError`)
    /// surface here, synchronously, as startup failures rather than as
    /// silent blank frames later.
    pub fn handle_framebuffer_requested(
        &mut self,
        host: &mut dyn SurfaceHost,
    ) -> Result<FramebufferId, BridgeError> {
        let graphics = host.graphics_context().ok_or_else(|| {
            BridgeError::ContextCreation(
                "no graphics context current at framebuffer request".to_string(),
            )
        })?;

        let resolver = self.resolver()?;
        self.context.ensure_active(&resolver, graphics)?;

        let size = SurfaceSize::from_logical(host.logical_size(), host.scale_factor());
        host.create_framebuffer(size)
            .map_err(|e| BridgeError::Render(format!("framebuffer allocation failed: {e}")))
    }

    /// Paint hook: clear the coalesced update flag and issue at most one
    /// render call. Skips (successfully) while the context is not active.
    pub fn paint(&mut self, host: &mut dyn SurfaceHost) -> RenderOutcome {
        // One clear, one render, regardless of how many engine signals
        // arrived since the previous cycle.
        let _was_signaled = self.signal.take();
        self.renderer.render(&self.context, host)
    }

    /// Surface-destroyed hook: stop forwarding engine signals, then release
    /// the engine context. Must run before the host destroys the graphics
    /// context the render context is bound to.
    pub fn handle_surface_destroyed(&mut self) {
        self.signal.detach_scheduler();
        self.context.destroy();
    }

    /// The host detected graphics-context loss. Fatal for this surface.
    pub fn handle_context_loss(&mut self) {
        self.signal.detach_scheduler();
        self.context.handle_context_loss();
    }

    pub fn context_state(&self) -> ContextState {
        self.context.state()
    }

    pub fn bound_graphics(&self) -> Option<GraphicsContextId> {
        self.context.bound_graphics()
    }

    /// The surface's update signal, for hosts that drive their own paint
    /// scheduling and want to poll instead of attaching a scheduler.
    pub fn update_signal(&self) -> Arc<UpdateSignal> {
        self.signal.clone()
    }

    fn resolver(&mut self) -> Result<Arc<ProcAddressResolver>, BridgeError> {
        if let Some(resolver) = &self.resolver {
            return Ok(resolver.clone());
        }
        let resolver = procaddr::process_resolver()?;
        self.resolver = Some(resolver.clone());
        Ok(resolver)
    }
}
