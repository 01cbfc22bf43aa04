#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    /// No proc-address strategy exists for this operating system. Fatal,
    /// reported before any render context is attempted.
    #[error("no graphics platform strategy for `{0}`")]
    PlatformUnsupported(String),

    /// A specific graphics symbol could not be resolved. Non-fatal on its
    /// own; the engine decides whether the symbol was required.
    #[error("could not resolve graphics symbol `{0}`")]
    Resolution(String),

    /// The engine rejected render-context creation. Fatal for the surface
    /// instance; the context stays destroyed and is never retried.
    #[error("engine rejected render context creation: {0}")]
    ContextCreation(String),

    /// A render call could not be issued. Degrades to a dropped frame.
    #[error("render failed: {0}")]
    Render(String),

    /// A playback command was refused by the engine.
    #[error("playback command failed: {0}")]
    Playback(String),
}
