use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::errors::BridgeError;

/// What the `source` property of a video surface points at. Media engines
/// accept both proper URLs and bare filesystem paths, so both forms parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Url(Url),
    Path(PathBuf),
}

impl MediaSource {
    /// Engine-facing form of the source, handed verbatim to playback calls.
    pub fn as_engine_str(&self) -> String {
        match self {
            MediaSource::Url(url) => url.to_string(),
            MediaSource::Path(path) => path.display().to_string(),
        }
    }
}

impl FromStr for MediaSource {
    type Err = BridgeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(BridgeError::Playback("empty media source".to_string()));
        }

        // A single-letter scheme is a Windows drive prefix, not a URL.
        match Url::parse(raw) {
            Ok(url) if url.scheme().len() > 1 => Ok(MediaSource::Url(url)),
            _ => Ok(MediaSource::Path(PathBuf::from(raw))),
        }
    }
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_engine_str())
    }
}
