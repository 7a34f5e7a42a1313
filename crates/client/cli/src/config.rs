//! Driver configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;

use anim_runtime::CatalogSpec;

/// Configuration for the terminal driver.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub manifest_dir: Option<PathBuf>,
    pub modules: CatalogSpec,
    pub scene_file: Option<PathBuf>,
    pub rng_seed: Option<u64>,
    pub session_id: Option<String>,
    pub privileged: bool,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ANIM_MANIFEST_DIR` - Directory holding `<namespace>.txt` manifests (default: platform data dir)
    /// - `ANIM_MODULES` - Manifest groups, e.g. `jb2a_patreon|JB2A_DnD5e,jaamod`
    /// - `ANIM_SCENE_FILE` - JSON scene with tokens, selection and targets
    /// - `ANIM_RNG_SEED` - Fixed seed for reproducible asset draws
    /// - `ANIM_SESSION_ID` - Session identifier for the log directory (default: timestamp)
    /// - `ANIM_PRIVILEGED` - Act as the game master (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.manifest_dir = env::var("ANIM_MANIFEST_DIR").ok().map(PathBuf::from);

        if let Some(modules) = read_env::<CatalogSpec>("ANIM_MODULES")
            && !modules.groups.is_empty()
        {
            config.modules = modules;
        }

        config.scene_file = env::var("ANIM_SCENE_FILE").ok().map(PathBuf::from);
        config.rng_seed = read_env::<u64>("ANIM_RNG_SEED");
        config.session_id = env::var("ANIM_SESSION_ID").ok();

        if let Some(privileged) = read_env::<bool>("ANIM_PRIVILEGED") {
            config.privileged = privileged;
        } else if env::var("ANIM_PRIVILEGED").is_ok() {
            // Accept a bare variable as "true"
            config.privileged = true;
        }

        config
    }

    /// Manifest directory, falling back to the platform data directory.
    pub fn manifest_dir(&self) -> PathBuf {
        self.manifest_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "anim")
                .map(|dirs| dirs.data_dir().join("manifests"))
                .unwrap_or_else(|| PathBuf::from("./manifests"))
        })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
