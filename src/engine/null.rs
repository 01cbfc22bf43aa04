use std::collections::HashMap;
use std::sync::Mutex;

use crate::engine::{ContextParams, MediaEngine, RenderContextHandle, UpdateFn};
use crate::errors::BridgeError;
use crate::frame::FrameDescriptor;
use crate::source::MediaSource;

/// Engine stand-in that performs no decoding or drawing.
///
/// It allocates real handle numbers, tracks which contexts are live, records
/// every frame descriptor it is asked to render, and can fire the registered
/// update callback on demand (standing in for the engine's internal thread).
/// Useful both for headless hosts and as the test double for the bridge.
pub struct NullEngine {
    state: Mutex<NullEngineState>,
}

#[derive(Default)]
struct NullEngineState {
    next_handle: u64,
    live: HashMap<RenderContextHandle, Option<UpdateFn>>,
    frames: Vec<(RenderContextHandle, FrameDescriptor)>,
    reject_contexts: bool,
    created_total: u64,
    playing: Option<MediaSource>,
    paused: bool,
}

impl NullEngine {
    pub fn new() -> Self {
        Self { state: Mutex::new(NullEngineState::default()) }
    }

    /// Make subsequent context creations fail, as an engine with unusable
    /// initialization parameters would.
    pub fn reject_contexts(&self, reject: bool) {
        self.state.lock().unwrap().reject_contexts = reject;
    }

    /// Number of engine-side contexts currently alive.
    pub fn live_contexts(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    /// Handles of the contexts currently alive, in no particular order.
    pub fn live_handles(&self) -> Vec<RenderContextHandle> {
        self.state.lock().unwrap().live.keys().copied().collect()
    }

    /// Total contexts ever created, including destroyed ones.
    pub fn contexts_created(&self) -> u64 {
        self.state.lock().unwrap().created_total
    }

    /// Every frame descriptor rendered so far, oldest first.
    pub fn frames(&self) -> Vec<(RenderContextHandle, FrameDescriptor)> {
        self.state.lock().unwrap().frames.clone()
    }

    pub fn frame_count(&self) -> usize {
        self.state.lock().unwrap().frames.len()
    }

    /// Source most recently handed to `play`, if any.
    pub fn current_source(&self) -> Option<MediaSource> {
        self.state.lock().unwrap().playing.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    /// Invoke the update callback registered for `handle`, as the engine's
    /// internal thread would when a new frame is ready. Returns false when
    /// the context is gone or no callback was registered.
    pub fn fire_update(&self, handle: RenderContextHandle) -> bool {
        // Clone the callback out before calling it; the callback may call
        // back into this engine.
        let callback = {
            let state = self.state.lock().unwrap();
            match state.live.get(&handle) {
                Some(Some(cb)) => cb.clone(),
                _ => return false,
            }
        };
        callback();
        true
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for NullEngine {
    fn create_render_context(&self, params: ContextParams) -> Result<RenderContextHandle, BridgeError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_contexts {
            return Err(BridgeError::ContextCreation(format!(
                "null engine configured to reject `{}` contexts",
                params.api.as_str()
            )));
        }

        state.next_handle += 1;
        state.created_total += 1;
        let handle = RenderContextHandle::from_raw(state.next_handle);
        state.live.insert(handle, None);
        Ok(handle)
    }

    fn set_update_callback(&self, handle: RenderContextHandle, callback: UpdateFn) {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state.live.get_mut(&handle) {
            *slot = Some(callback);
        }
    }

    fn render_frame(&self, handle: RenderContextHandle, frame: &FrameDescriptor) {
        let mut state = self.state.lock().unwrap();
        if !state.live.contains_key(&handle) {
            log::error!("NullEngine: render on dead context handle {:?}", handle);
            return;
        }
        state.frames.push((handle, *frame));
    }

    fn destroy_render_context(&self, handle: RenderContextHandle) {
        self.state.lock().unwrap().live.remove(&handle);
    }

    fn play(&self, source: &MediaSource) -> Result<(), BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.playing = Some(source.clone());
        state.paused = false;
        Ok(())
    }

    fn pause(&self) -> Result<(), BridgeError> {
        let mut state = self.state.lock().unwrap();
        if state.playing.is_none() {
            return Err(BridgeError::Playback("nothing is playing".to_string()));
        }
        state.paused = true;
        Ok(())
    }

    fn resume(&self) -> Result<(), BridgeError> {
        let mut state = self.state.lock().unwrap();
        if state.playing.is_none() {
            return Err(BridgeError::Playback("nothing is playing".to_string()));
        }
        state.paused = false;
        Ok(())
    }
}
