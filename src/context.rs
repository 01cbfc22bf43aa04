//! Engine render-context lifecycle.
//!
//! A render context binds the media engine's internal renderer to one host
//! graphics context. It is created lazily on the first framebuffer request,
//! survives repeated renders, and is destroyed exactly once, strictly
//! before the graphics context it was created against goes away. A lost
//! context is fatal for the surface instance; it is never silently rebuilt.

use std::sync::Arc;

use crate::config::RenderApi;
use crate::engine::{ContextParams, MediaEngine, RenderContextHandle};
use crate::errors::BridgeError;
use crate::procaddr::ProcAddressResolver;
use crate::signal::UpdateSignal;

/// Opaque identity of a host graphics context, as reported by the adapter
/// (typically the native context handle's address). Render calls are only
/// valid while the currently-current context has this identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphicsContextId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Initializing,
    Active,
    /// Terminal. Render calls after destruction are safe no-ops.
    Destroyed,
}

pub struct RenderContext {
    engine: Arc<dyn MediaEngine>,
    signal: Arc<UpdateSignal>,
    api: RenderApi,
    state: ContextState,
    handle: Option<RenderContextHandle>,
    bound_graphics: Option<GraphicsContextId>,
}

impl RenderContext {
    pub fn new(engine: Arc<dyn MediaEngine>, signal: Arc<UpdateSignal>, api: RenderApi) -> Self {
        Self {
            engine,
            signal,
            api,
            state: ContextState::Uninitialized,
            handle: None,
            bound_graphics: None,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ContextState::Active
    }

    pub fn handle(&self) -> Option<RenderContextHandle> {
        self.handle
    }

    /// Identity of the graphics context this render context was created
    /// against, while active.
    pub fn bound_graphics(&self) -> Option<GraphicsContextId> {
        self.bound_graphics
    }

    /// Create the engine-side context if it does not exist yet. Paint thread
    /// only, with the target graphics context current.
    ///
    /// Calling this while already `Active` returns the existing handle with
    /// no side effects: no second engine context, no duplicate callback
    /// registration. After a failed creation or a destroy the context stays
    /// `Destroyed` and this returns `ContextCreationError`; initialization
    /// is never retried automatically.
    pub fn ensure_active(
        &mut self,
        resolver: &ProcAddressResolver,
        graphics: GraphicsContextId,
    ) -> Result<RenderContextHandle, BridgeError> {
        match self.state {
            ContextState::Active => {
                // Unwrap-free: Active implies a handle by construction below.
                return self.handle.ok_or_else(|| {
                    BridgeError::ContextCreation("active context lost its handle".to_string())
                });
            }
            ContextState::Destroyed => {
                return Err(BridgeError::ContextCreation(
                    "render context was destroyed and is not recreated".to_string(),
                ));
            }
            ContextState::Initializing => {
                return Err(BridgeError::ContextCreation(
                    "render context creation re-entered".to_string(),
                ));
            }
            ContextState::Uninitialized => {}
        }

        self.state = ContextState::Initializing;

        let params = ContextParams {
            api: self.api,
            get_proc_address: resolver.as_engine_fn(),
        };

        match self.engine.create_render_context(params) {
            Ok(handle) => {
                self.engine.set_update_callback(handle, self.signal.producer_fn());
                self.handle = Some(handle);
                self.bound_graphics = Some(graphics);
                self.state = ContextState::Active;
                log::debug!(
                    "render context {:?} active, bound to graphics context {:?} via {:?}",
                    handle,
                    graphics,
                    resolver.strategy()
                );
                Ok(handle)
            }
            Err(e) => {
                self.state = ContextState::Destroyed;
                log::error!("render context creation failed: {e}");
                Err(e)
            }
        }
    }

    /// Issue one engine render call with the given descriptor. Returns
    /// `false` as a safe no-op when the context is not active. Expected
    /// during startup and teardown, never a fault.
    pub fn render(&self, frame: &crate::frame::FrameDescriptor) -> bool {
        match (self.state, self.handle) {
            (ContextState::Active, Some(handle)) => {
                self.engine.render_frame(handle, frame);
                true
            }
            _ => false,
        }
    }

    /// Release the engine-held context. Idempotent; the state is terminal.
    /// Paint thread only, before the bound graphics context is destroyed.
    pub fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!("destroying render context {handle:?}");
            self.engine.destroy_render_context(handle);
        }
        self.bound_graphics = None;
        self.state = ContextState::Destroyed;
    }

    /// The bound graphics context was lost. Fatal for this surface instance:
    /// the engine context is released and never rebuilt.
    pub fn handle_context_loss(&mut self) {
        if self.state == ContextState::Active {
            log::error!(
                "graphics context {:?} lost; render context is permanently destroyed",
                self.bound_graphics
            );
        }
        self.destroy();
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        // Backstop only; surfaces destroy their context at teardown.
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::null::NullEngine;
    use crate::procaddr::{ProcAddressResolver, ProcSource, Strategy};
    use std::ffi::CStr;
    use std::os::raw::c_void;
    use std::ptr::NonNull;

    struct EmptySource;

    impl ProcSource for EmptySource {
        fn lookup(&self, _name: &CStr) -> Option<NonNull<c_void>> {
            NonNull::new(0x1000 as *mut c_void)
        }
    }

    fn resolver() -> ProcAddressResolver {
        ProcAddressResolver::with_source(Strategy::Glx, Arc::new(EmptySource))
    }

    fn context(engine: &Arc<NullEngine>) -> RenderContext {
        let signal = Arc::new(UpdateSignal::new());
        RenderContext::new(engine.clone() as Arc<dyn MediaEngine>, signal, RenderApi::OpenGl)
    }

    #[test]
    fn create_is_idempotent_while_active() {
        let engine = Arc::new(NullEngine::new());
        let mut ctx = context(&engine);
        let resolver = resolver();
        let gfx = GraphicsContextId(0xbeef);

        let first = ctx.ensure_active(&resolver, gfx).unwrap();
        let second = ctx.ensure_active(&resolver, gfx).unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.contexts_created(), 1);
        assert_eq!(ctx.bound_graphics(), Some(gfx));
        assert!(ctx.is_active());
    }

    #[test]
    fn rejected_creation_lands_in_destroyed_and_is_not_retried() {
        let engine = Arc::new(NullEngine::new());
        engine.reject_contexts(true);
        let mut ctx = context(&engine);
        let resolver = resolver();

        let err = ctx.ensure_active(&resolver, GraphicsContextId(1)).unwrap_err();
        assert!(matches!(err, BridgeError::ContextCreation(_)));
        assert_eq!(ctx.state(), ContextState::Destroyed);

        // Even with a now-willing engine, no retry happens.
        engine.reject_contexts(false);
        let err = ctx.ensure_active(&resolver, GraphicsContextId(1)).unwrap_err();
        assert!(matches!(err, BridgeError::ContextCreation(_)));
        assert_eq!(engine.contexts_created(), 0);
    }

    #[test]
    fn destroy_releases_exactly_once() {
        let engine = Arc::new(NullEngine::new());
        let mut ctx = context(&engine);
        ctx.ensure_active(&resolver(), GraphicsContextId(2)).unwrap();
        assert_eq!(engine.live_contexts(), 1);

        ctx.destroy();
        ctx.destroy();
        assert_eq!(engine.live_contexts(), 0);
        assert_eq!(ctx.state(), ContextState::Destroyed);
        assert_eq!(ctx.bound_graphics(), None);
    }

    #[test]
    fn drop_is_a_destroy_backstop() {
        let engine = Arc::new(NullEngine::new());
        {
            let mut ctx = context(&engine);
            ctx.ensure_active(&resolver(), GraphicsContextId(3)).unwrap();
            assert_eq!(engine.live_contexts(), 1);
        }
        assert_eq!(engine.live_contexts(), 0);
    }

    #[test]
    fn context_loss_is_terminal() {
        let engine = Arc::new(NullEngine::new());
        let mut ctx = context(&engine);
        ctx.ensure_active(&resolver(), GraphicsContextId(4)).unwrap();

        ctx.handle_context_loss();
        assert_eq!(ctx.state(), ContextState::Destroyed);
        assert_eq!(engine.live_contexts(), 0);
        assert!(ctx.ensure_active(&resolver(), GraphicsContextId(4)).is_err());
    }
}
