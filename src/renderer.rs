//! Per-paint-cycle frame rendering.

use crate::context::RenderContext;
use crate::frame::FrameDescriptor;
use crate::host::SurfaceHost;

/// Why a paint cycle produced no frame. All of these are successful no-ops;
/// a skipped frame preserves UI responsiveness and never tears the context
/// down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Exactly one engine render call was issued with this descriptor.
    Rendered(FrameDescriptor),
    /// Context not active (startup, teardown, or failed creation).
    SkippedInactive,
    /// The paint thread's current graphics context is absent or is not the
    /// one the render context was created against.
    SkippedContextMismatch,
    /// The host provided no paint-target framebuffer this cycle.
    SkippedNoFramebuffer,
}

impl RenderOutcome {
    pub fn rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }
}

/// Issues at most one engine render call per paint cycle, into a framebuffer
/// sized to the host's logical geometry times its scale factor.
pub struct FrameRenderer {
    flip_y: bool,
}

impl FrameRenderer {
    pub fn new(flip_y: bool) -> Self {
        Self { flip_y }
    }

    /// One render attempt. Paint thread only, once per paint cycle.
    pub fn render(&self, context: &RenderContext, host: &mut dyn SurfaceHost) -> RenderOutcome {
        if !context.is_active() {
            return RenderOutcome::SkippedInactive;
        }

        let current = host.graphics_context();
        if current.is_none() || current != context.bound_graphics() {
            log::warn!(
                "skipping frame: current graphics context {:?} does not match bound {:?}",
                current,
                context.bound_graphics()
            );
            return RenderOutcome::SkippedContextMismatch;
        }

        let Some(framebuffer) = host.current_framebuffer() else {
            log::warn!("skipping frame: host provided no framebuffer this cycle");
            return RenderOutcome::SkippedNoFramebuffer;
        };

        host.synchronize();

        // Descriptor is computed fresh every cycle; host geometry may have
        // changed since the last frame.
        let descriptor = FrameDescriptor::compute(
            host.logical_size(),
            host.scale_factor(),
            framebuffer,
            self.flip_y,
        );

        if context.render(&descriptor) {
            RenderOutcome::Rendered(descriptor)
        } else {
            RenderOutcome::SkippedInactive
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::RenderApi;
    use crate::context::{GraphicsContextId, RenderContext};
    use crate::engine::null::NullEngine;
    use crate::engine::MediaEngine;
    use crate::frame::{FramebufferId, LogicalSize, SurfaceSize};
    use crate::procaddr::{ProcAddressResolver, ProcSource, Strategy};
    use crate::signal::UpdateSignal;
    use std::ffi::CStr;
    use std::os::raw::c_void;
    use std::ptr::NonNull;

    struct StubSource;

    impl ProcSource for StubSource {
        fn lookup(&self, _name: &CStr) -> Option<NonNull<c_void>> {
            NonNull::new(0x2000 as *mut c_void)
        }
    }

    struct TestHost {
        logical: LogicalSize,
        scale: f64,
        framebuffer: Option<FramebufferId>,
        graphics: Option<GraphicsContextId>,
        synchronized: usize,
    }

    impl TestHost {
        fn new(width: f64, height: f64, scale: f64) -> Self {
            Self {
                logical: LogicalSize::new(width, height),
                scale,
                framebuffer: Some(FramebufferId(7)),
                graphics: Some(GraphicsContextId(0xc0ffee)),
                synchronized: 0,
            }
        }
    }

    impl SurfaceHost for TestHost {
        fn logical_size(&self) -> LogicalSize {
            self.logical
        }

        fn scale_factor(&self) -> f64 {
            self.scale
        }

        fn create_framebuffer(&mut self, _size: SurfaceSize) -> anyhow::Result<FramebufferId> {
            Ok(FramebufferId(7))
        }

        fn current_framebuffer(&self) -> Option<FramebufferId> {
            self.framebuffer
        }

        fn graphics_context(&self) -> Option<GraphicsContextId> {
            self.graphics
        }

        fn synchronize(&mut self) {
            self.synchronized += 1;
        }
    }

    fn active_context(engine: &Arc<NullEngine>, gfx: GraphicsContextId) -> RenderContext {
        let signal = Arc::new(UpdateSignal::new());
        let mut ctx =
            RenderContext::new(engine.clone() as Arc<dyn MediaEngine>, signal, RenderApi::OpenGl);
        let resolver = ProcAddressResolver::with_source(Strategy::Glx, Arc::new(StubSource));
        ctx.ensure_active(&resolver, gfx).unwrap();
        ctx
    }

    #[test]
    fn renders_exactly_one_frame_with_computed_descriptor() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(800.0, 450.0, 1.0);
        let ctx = active_context(&engine, host.graphics.unwrap());

        let outcome = FrameRenderer::new(false).render(&ctx, &mut host);

        let expected = FrameDescriptor {
            width: 800,
            height: 450,
            framebuffer: FramebufferId(7),
            flip_y: false,
        };
        assert_eq!(outcome, RenderOutcome::Rendered(expected));
        assert_eq!(engine.frames(), vec![(ctx.handle().unwrap(), expected)]);
        assert_eq!(host.synchronized, 1);
    }

    #[test]
    fn scale_factor_is_applied_with_truncation() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(401.0, 300.0, 1.33);
        let ctx = active_context(&engine, host.graphics.unwrap());

        match FrameRenderer::new(false).render(&ctx, &mut host) {
            RenderOutcome::Rendered(desc) => {
                assert_eq!(desc.width, 533);
                assert_eq!(desc.height, 399);
            }
            other => panic!("expected a rendered frame, got {other:?}"),
        }
    }

    #[test]
    fn inactive_context_skips_without_engine_calls() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(100.0, 100.0, 1.0);
        let signal = Arc::new(UpdateSignal::new());
        let ctx =
            RenderContext::new(engine.clone() as Arc<dyn MediaEngine>, signal, RenderApi::OpenGl);

        let outcome = FrameRenderer::new(false).render(&ctx, &mut host);
        assert_eq!(outcome, RenderOutcome::SkippedInactive);
        assert_eq!(engine.frame_count(), 0);
        assert_eq!(host.synchronized, 0);
    }

    #[test]
    fn mismatched_graphics_context_drops_the_frame() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(100.0, 100.0, 1.0);
        let ctx = active_context(&engine, GraphicsContextId(0xdead));

        let outcome = FrameRenderer::new(false).render(&ctx, &mut host);
        assert_eq!(outcome, RenderOutcome::SkippedContextMismatch);
        assert_eq!(engine.frame_count(), 0);
        // The context survives; a later cycle with the right context renders.
        assert!(ctx.is_active());
    }

    #[test]
    fn absent_graphics_context_drops_the_frame() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(100.0, 100.0, 1.0);
        let ctx = active_context(&engine, host.graphics.unwrap());
        host.graphics = None;

        let outcome = FrameRenderer::new(false).render(&ctx, &mut host);
        assert_eq!(outcome, RenderOutcome::SkippedContextMismatch);
        assert_eq!(engine.frame_count(), 0);
    }

    #[test]
    fn missing_framebuffer_drops_the_frame() {
        let engine = Arc::new(NullEngine::new());
        let mut host = TestHost::new(100.0, 100.0, 1.0);
        let ctx = active_context(&engine, host.graphics.unwrap());
        host.framebuffer = None;

        let outcome = FrameRenderer::new(false).render(&ctx, &mut host);
        assert_eq!(outcome, RenderOutcome::SkippedNoFramebuffer);
        assert_eq!(engine.frame_count(), 0);
    }
}
