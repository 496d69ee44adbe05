//! Build and target information.

/// Version of this crate, split into components.
///
/// ```rust
/// use symbolizer_core::version::Version;
///
/// assert_eq!(Version::string(), env!("CARGO_PKG_VERSION"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Version;

impl Version
{
    pub const MAJOR: u32 = parse_component(env!("CARGO_PKG_VERSION_MAJOR"));
    pub const MINOR: u32 = parse_component(env!("CARGO_PKG_VERSION_MINOR"));
    pub const PATCH: u32 = parse_component(env!("CARGO_PKG_VERSION_PATCH"));
    /// Pre-release label (`alpha.1`, `rc.2`); empty for a release build.
    pub const RELEASE: &'static str = env!("CARGO_PKG_VERSION_PRE");

    /// Full version string as published.
    pub fn string() -> &'static str
    {
        env!("CARGO_PKG_VERSION")
    }
}

/// The platform this crate was compiled for.
#[derive(Debug, Clone, Copy)]
pub struct Target;

impl Target
{
    /// `x86_64`, `aarch64`, ...
    pub const ARCHITECTURE: &'static str = env!("SYMBOLIZER_TARGET_ARCH");
    /// `linux`, `windows`, `macos`, ...
    pub const SYSTEM: &'static str = env!("SYMBOLIZER_TARGET_SYSTEM");
}

const fn parse_component(text: &str) -> u32
{
    let bytes = text.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if !digit.is_ascii_digit() {
            break;
        }
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}
