//! Which native libraries exist and where to load them from.

use core::fmt;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the etcpak shared library.
pub const ETCPAK_LIB_ENV: &str = "NCB_ETCPAK_LIB";
/// Environment variable naming the texture2ddecoder shared library.
pub const T2D_LIB_ENV: &str = "NCB_T2D_LIB";
/// Environment variable naming the ASTC encoder shared library.
pub const ASTC_LIB_ENV: &str = "NCB_ASTC_LIB";
/// Environment variable naming the FMOD runtime shared library.
pub const FMOD_LIB_ENV: &str = "NCB_FMOD_LIB";

/// The native libraries the bridge knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LibraryKind {
    /// ETC/BC compressor and decompressor.
    Etcpak,
    /// Decoder for most GPU block formats, plus crunch unpacking.
    Texture2dDecoder,
    /// ASTC encoder with context handles.
    AstcEncoder,
    /// FMOD runtime, used to decode sounds to PCM.
    Fmod,
}

impl LibraryKind {
    /// All libraries, in load order.
    pub const ALL: [LibraryKind; 4] = [
        LibraryKind::Etcpak,
        LibraryKind::Texture2dDecoder,
        LibraryKind::AstcEncoder,
        LibraryKind::Fmod,
    ];

    /// Prefix used in qualified codec names.
    pub const fn prefix(self) -> &'static str {
        match self {
            LibraryKind::Etcpak => "etcpak",
            LibraryKind::Texture2dDecoder => "t2d",
            LibraryKind::AstcEncoder => "astcenc",
            LibraryKind::Fmod => "fmod",
        }
    }

    /// Parses a qualified-name prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    /// Base name of the shared library, without platform prefix or extension.
    pub const fn base_name(self) -> &'static str {
        match self {
            LibraryKind::Etcpak => "etcpak",
            LibraryKind::Texture2dDecoder => "t2ddecoder",
            LibraryKind::AstcEncoder => "astc_encoder",
            LibraryKind::Fmod => "fmod",
        }
    }

    /// Environment variable consulted by [`LibraryConfig::from_env`].
    pub const fn env_var(self) -> &'static str {
        match self {
            LibraryKind::Etcpak => ETCPAK_LIB_ENV,
            LibraryKind::Texture2dDecoder => T2D_LIB_ENV,
            LibraryKind::AstcEncoder => ASTC_LIB_ENV,
            LibraryKind::Fmod => FMOD_LIB_ENV,
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

/// Where each native library is loaded from.
///
/// A library without a path is not loaded; every codec it backs then fails with
/// [`crate::ErrorKind::LibraryUnavailable`]. Bare file names are resolved by the
/// platform loader.
///
/// # Examples
///
/// ```
/// use native_codec_bridge::native::{LibraryConfig, LibraryKind};
///
/// let config = LibraryConfig::new()
///     .with_etcpak("/opt/codecs/libetcpak.so")
///     .with_default_name(LibraryKind::Texture2dDecoder);
///
/// assert!(config.path(LibraryKind::Etcpak).is_some());
/// assert!(config.path(LibraryKind::AstcEncoder).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryConfig {
    etcpak: Option<PathBuf>,
    texture2ddecoder: Option<PathBuf>,
    astc_encoder: Option<PathBuf>,
    fmod: Option<PathBuf>,
}

impl LibraryConfig {
    /// A configuration that loads nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads library paths from `NCB_ETCPAK_LIB`, `NCB_T2D_LIB`, `NCB_ASTC_LIB` and `NCB_FMOD_LIB`.
    ///
    /// Unset or empty variables leave the library unconfigured.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        for kind in LibraryKind::ALL {
            if let Some(value) = env::var_os(kind.env_var()).filter(|v| !v.is_empty()) {
                config = config.with_path(kind, value);
            }
        }
        config
    }

    /// Sets the path of the etcpak library.
    pub fn with_etcpak(self, path: impl Into<PathBuf>) -> Self {
        self.with_path(LibraryKind::Etcpak, path)
    }

    /// Sets the path of the texture2ddecoder library.
    pub fn with_texture2ddecoder(self, path: impl Into<PathBuf>) -> Self {
        self.with_path(LibraryKind::Texture2dDecoder, path)
    }

    /// Sets the path of the ASTC encoder library.
    pub fn with_astc_encoder(self, path: impl Into<PathBuf>) -> Self {
        self.with_path(LibraryKind::AstcEncoder, path)
    }

    /// Sets the path of the FMOD runtime library.
    pub fn with_fmod(self, path: impl Into<PathBuf>) -> Self {
        self.with_path(LibraryKind::Fmod, path)
    }

    /// Uses the platform file name of `kind` (e.g. `libetcpak.so`) and lets the loader search for it.
    pub fn with_default_name(self, kind: LibraryKind) -> Self {
        self.with_path(kind, libloading::library_filename(kind.base_name()))
    }

    /// Sets the path of the given library.
    pub fn with_path(mut self, kind: LibraryKind, path: impl Into<PathBuf>) -> Self {
        *self.slot(kind) = Some(path.into());
        self
    }

    /// The configured path of `kind`, if any.
    pub fn path(&self, kind: LibraryKind) -> Option<&Path> {
        match kind {
            LibraryKind::Etcpak => self.etcpak.as_deref(),
            LibraryKind::Texture2dDecoder => self.texture2ddecoder.as_deref(),
            LibraryKind::AstcEncoder => self.astc_encoder.as_deref(),
            LibraryKind::Fmod => self.fmod.as_deref(),
        }
    }

    fn slot(&mut self, kind: LibraryKind) -> &mut Option<PathBuf> {
        match kind {
            LibraryKind::Etcpak => &mut self.etcpak,
            LibraryKind::Texture2dDecoder => &mut self.texture2ddecoder,
            LibraryKind::AstcEncoder => &mut self.astc_encoder,
            LibraryKind::Fmod => &mut self.fmod,
        }
    }
}
