use serde::Deserialize;

/// Wire contract with the third-party player SDK.
///
/// The script URL and the global ready-callback name are the only two
/// things the page and the SDK agree on; both default to the YouTube
/// iframe API values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Script resource the loader injects, exactly once per process.
    pub script_url: String,
    /// Name of the global callback the SDK invokes once it is usable.
    pub ready_callback: String,
    /// Defaults applied to every player instance the SDK constructs.
    pub embed: EmbedDefaults,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            script_url: "https://www.youtube.com/iframe_api".to_string(),
            ready_callback: "onYouTubeIframeAPIReady".to_string(),
            embed: EmbedDefaults::default(),
        }
    }
}

/// Playback parameters for embedded player instances.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbedDefaults {
    /// Start playback as soon as the instance is constructed.
    pub autoplay: bool,
    /// Offset every new instance begins at.
    pub start_seconds: f64,
}

impl Default for EmbedDefaults {
    fn default() -> Self {
        Self {
            autoplay: true,
            start_seconds: 0.0,
        }
    }
}
