/// Operating platform the bridge runs on. Identified once at process start;
/// drives proc-address strategy selection and is never reprobed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    /// Anything else. Carries the OS name for error reporting.
    Other(String),
}

impl Platform {
    /// Deterministic OS identification, no capability probing involved.
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
            Platform::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Graphics API the engine renders through. Only OpenGL today; the variant
/// exists so the engine boundary does not hardcode a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderApi {
    OpenGl,
}

impl RenderApi {
    /// Engine-facing API name, as passed in context-creation parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderApi::OpenGl => "opengl",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Process-scoped platform tag, resolved once and passed explicitly into
    /// render-context creation.
    pub platform: Platform,
    /// API requested from the engine at context creation.
    pub api: RenderApi,
    /// Whether frames are rendered upside-down for the host to flip. The
    /// scene-graph hosts this bridge targets composite FBOs unflipped.
    pub flip_y: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            platform: Platform::detect(),
            api: RenderApi::OpenGl,
            flip_y: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_detects_current_platform() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.platform, Platform::detect());
        assert_eq!(cfg.api, RenderApi::OpenGl);
        assert!(!cfg.flip_y);
    }

    #[test]
    fn platform_display_matches_os_names() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        assert_eq!(Platform::Windows.to_string(), "windows");
        assert_eq!(Platform::Other("haiku".into()).to_string(), "haiku");
    }
}
