/// Engine-wide constants and tunable defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimConfig {
    /// Milliseconds between repeats when the command gives no `:<seconds>`.
    pub default_delay_ms: u64,
    /// Upper bound on `<n>x`; larger counts are clamped with a warning.
    pub max_count: u32,
}

impl AnimConfig {
    // ===== command grammar =====
    /// Command keyword recognised by [`crate::CommandParser`].
    pub const COMMAND_PREFIX: &'static str = "/anim";
    /// Prefix that suppresses private diagnostics for a command.
    pub const QUIET_PREFIX: char = '!';
    /// Leading marker that turns an asset token into a literal path.
    pub const LITERAL_PATH_MARKER: char = '/';

    // ===== catalog records =====
    /// Namespace root prepended to every ingested record.
    pub const NAMESPACE_ROOT: &'static str = "modules/";
    /// Width marker as it appears in manifest files.
    pub const MANIFEST_WIDTH_MARKER: &'static str = ",width=";
    /// Compact width tag used by indexed records.
    pub const WIDTH_TAG: &'static str = ",W:";
    /// Extensions the playback service can play.
    pub const PLAYABLE_EXTENSIONS: [&'static str; 4] = ["webm", "mp4", "ogv", "ogg"];

    // ===== instance defaults =====
    pub const DEFAULT_DELAY_MS: u64 = 1000;
    pub const DEFAULT_MAX_COUNT: u32 = 100;
    pub const DEFAULT_SCALE: f64 = 1.0;
    /// Horizontal anchor of centered effects (sprite middle).
    pub const CENTERED_ANCHOR_X: f64 = 0.5;
    /// Vertical anchor for every effect.
    pub const ANCHOR_Y: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            default_delay_ms: Self::DEFAULT_DELAY_MS,
            max_count: Self::DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_default_delay_ms(default_delay_ms: u64) -> Self {
        Self {
            default_delay_ms,
            ..Self::new()
        }
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count.max(1);
        self
    }
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self::new()
    }
}
