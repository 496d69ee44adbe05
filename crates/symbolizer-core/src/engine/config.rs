//! Engine configuration.

use std::env;

use tracing::warn;

/// Toggles for [`DumpEngine`](super::DumpEngine).
///
/// ## Environment Variables
///
/// - `SYMBOLIZER_SEARCH_IMAGE_PATHS`: look for symbols at the image path
///   recorded in the dump (default: on)
/// - `SYMBOLIZER_CACHE`: cache symbolization results (default: on)
///
/// Accepted values are `1`/`true`/`on`/`yes` and `0`/`false`/`off`/`no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig
{
    /// Fall back to the module's recorded image path on the local filesystem
    /// when the symbol location has nothing for it.
    pub search_image_paths: bool,
    /// Cache rendered strings per `(address, style)`.
    pub cache: bool,
}

impl Default for EngineConfig
{
    fn default() -> Self
    {
        Self {
            search_image_paths: true,
            cache: true,
        }
    }
}

impl EngineConfig
{
    /// Defaults overridden by the `SYMBOLIZER_*` environment variables.
    ///
    /// This is what [`DumpEngine::new`](super::DumpEngine::new) and therefore
    /// [`Session::open`](crate::Session::open) use.
    #[must_use]
    pub fn from_env() -> Self
    {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self
    {
        let defaults = Self::default();
        Self {
            search_image_paths: flag(&lookup, SEARCH_IMAGE_PATHS_VAR, defaults.search_image_paths),
            cache: flag(&lookup, CACHE_VAR, defaults.cache),
        }
    }
}

pub const SEARCH_IMAGE_PATHS_VAR: &str = "SYMBOLIZER_SEARCH_IMAGE_PATHS";
pub const CACHE_VAR: &str = "SYMBOLIZER_CACHE";

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool
{
    match lookup(name) {
        Some(value) => parse_flag(&value).unwrap_or_else(|| {
            warn!(variable = name, value = %value, "Ignoring unrecognised flag value");
            default
        }),
        None => default,
    }
}

fn parse_flag(value: &str) -> Option<bool>
{
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
