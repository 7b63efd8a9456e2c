//! The loaded native libraries and the by-name codec operations over them.

use crate::adapter::{self, AstcConfig, AstcContext};
use crate::bc7::Bc7Params;
use crate::contract::{validate, ImageDimensions};
use crate::descriptor::{CodecDescriptor, Direction};
use crate::error::{CodecError, LibraryError};
use crate::native::{
    open_library, resolve_entry, resolve_fmod, FmodEntryPoints, LibraryConfig, LibraryKind,
    NativeEntry,
};
use crate::output::CodecOutput;
use crate::registry::{self, ASTCENC_COMPRESS};
use crate::translate::translate;
use libloading::Library;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// Reason reported for libraries that were never configured.
const NOT_CONFIGURED: &str = "no library path configured";

/// A set of loaded native libraries with their entry points resolved.
///
/// Entry points are resolved once, when a library is loaded, and are invoked by
/// address afterwards. The set is immutable once built and can be shared between
/// threads; every operation is a synchronous, self-contained call.
pub struct CodecBridge {
    entries: HashMap<(&'static str, Direction), NativeEntry>,
    fmod: Option<FmodEntryPoints>,
    unavailable: HashMap<LibraryKind, String>,
    // Declared last so the entry points above are dropped before their libraries unload.
    _libraries: Vec<Library>,
}

impl CodecBridge {
    /// Loads every library named in `config`.
    ///
    /// A library that fails to load is logged and recorded as unavailable; its codecs then
    /// fail with [`crate::ErrorKind::LibraryUnavailable`]. Loading never fails as a whole.
    pub fn load(config: &LibraryConfig) -> Self {
        let mut builder = Self::builder();
        for kind in LibraryKind::ALL {
            let Some(path) = config.path(kind) else {
                debug!("{kind}: {NOT_CONFIGURED}");
                builder.mark_unavailable(kind, NOT_CONFIGURED);
                continue;
            };
            if let Err(e) = builder.load_library(kind, path) {
                warn!("{e}");
                builder.mark_unavailable(kind, e.to_string());
            }
        }
        builder.build()
    }

    /// Starts an empty bridge; libraries and entry points are added explicitly.
    pub fn builder() -> CodecBridgeBuilder {
        CodecBridgeBuilder::default()
    }

    /// Whether the entry point behind `descriptor` is available.
    pub fn is_available(&self, descriptor: &CodecDescriptor) -> bool {
        self.entries
            .contains_key(&(descriptor.name, descriptor.direction))
    }

    /// Why `library` is unavailable, or `None` if at least one of its entry points resolved.
    pub fn unavailable_reason(&self, library: LibraryKind) -> Option<&str> {
        self.unavailable.get(&library).map(String::as_str)
    }

    /// Compresses `width * height` RGBA8 pixels with the named codec.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnknownCodec`] if no compressor has that name
    /// - the buffer contract errors of [`crate::contract::validate`]
    /// - [`CodecError::LibraryUnavailable`] if the backing library is not loaded
    /// - [`CodecError::NativeCallFailed`] if the native routine reports failure
    pub fn compress(
        &self,
        codec: &str,
        rgba: &[u8],
        dims: ImageDimensions,
    ) -> Result<CodecOutput, CodecError> {
        let descriptor = find(Direction::Compress, codec)?;
        self.run(descriptor, rgba, dims, None)
    }

    /// Decompresses block data with the named codec into 32-bit pixels.
    ///
    /// The compressed length is accepted as-is; inputs shorter than what the native
    /// decoder reads are refused with [`CodecError::TruncatedInput`].
    ///
    /// # Errors
    ///
    /// As for [`CodecBridge::compress`].
    pub fn decompress(
        &self,
        codec: &str,
        data: &[u8],
        dims: ImageDimensions,
    ) -> Result<CodecOutput, CodecError> {
        let descriptor = find(Direction::Decompress, codec)?;
        self.run(descriptor, data, dims, None)
    }

    /// Compresses to BC7 with explicit encoder parameters.
    pub fn compress_bc7_with_params(
        &self,
        rgba: &[u8],
        dims: ImageDimensions,
        params: &Bc7Params,
    ) -> Result<CodecOutput, CodecError> {
        let descriptor = find(Direction::Compress, "etcpak:bc7")?;
        self.run(descriptor, rgba, dims, Some(params))
    }

    /// Unpacks mip level `level_index` of a crunch container.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnknownCodec`] if no unpacker has that name
    /// - [`CodecError::LibraryUnavailable`] if the backing library is not loaded
    /// - [`CodecError::NativeCallFailed`] / [`CodecError::NullOutput`] if unpacking fails
    pub fn unpack(
        &self,
        codec: &str,
        data: &[u8],
        level_index: u32,
    ) -> Result<CodecOutput, CodecError> {
        let descriptor = find(Direction::Unpack, codec)?;
        match self.entry(descriptor)? {
            NativeEntry::Unpack { unpack, free } => {
                let outcome = adapter::unpack(descriptor, unpack, free, data, level_index)?;
                translate(descriptor, outcome)
            }
            _ => Err(shape_mismatch(descriptor)),
        }
    }

    /// Creates an ASTC encoder context owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`CodecError::LibraryUnavailable`] if the ASTC encoder is not loaded
    /// - [`CodecError::InvalidBlockFootprint`] if the footprint is not an ASTC footprint
    /// - [`CodecError::ContextCreationFailed`] if the encoder rejects the configuration
    pub fn astc_context(&self, config: AstcConfig) -> Result<AstcContext<'_>, CodecError> {
        match self.entry(&ASTCENC_COMPRESS)? {
            NativeEntry::AstcContext(entry) => AstcContext::create(entry, config),
            _ => Err(shape_mismatch(&ASTCENC_COMPRESS)),
        }
    }

    /// The FMOD runtime entry points, for decoding sounds to PCM.
    ///
    /// # Errors
    ///
    /// [`CodecError::LibraryUnavailable`] if the FMOD runtime is not loaded.
    pub fn fmod_entry_points(&self) -> Result<FmodEntryPoints, CodecError> {
        self.fmod.ok_or_else(|| CodecError::LibraryUnavailable {
            codec: "fmod",
            library: LibraryKind::Fmod,
            reason: self
                .unavailable
                .get(&LibraryKind::Fmod)
                .cloned()
                .unwrap_or_else(|| NOT_CONFIGURED.to_owned()),
        })
    }

    /// Runs one descriptor: validate, invoke, translate.
    pub fn run(
        &self,
        descriptor: &'static CodecDescriptor,
        input: &[u8],
        dims: ImageDimensions,
        params: Option<&Bc7Params>,
    ) -> Result<CodecOutput, CodecError> {
        let spec = validate(descriptor, dims, input.len())?;
        let entry = self.entry(descriptor)?;
        let outcome = adapter::invoke(descriptor, entry, input, &spec, params)?;
        translate(descriptor, outcome)
    }

    fn entry(&self, descriptor: &CodecDescriptor) -> Result<NativeEntry, CodecError> {
        self.entries
            .get(&(descriptor.name, descriptor.direction))
            .copied()
            .ok_or_else(|| CodecError::LibraryUnavailable {
                codec: descriptor.name,
                library: descriptor.library,
                reason: self
                    .unavailable
                    .get(&descriptor.library)
                    .cloned()
                    .unwrap_or_else(|| format!("{} is not exported", descriptor.symbol)),
            })
    }
}

impl core::fmt::Debug for CodecBridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CodecBridge")
            .field("entries", &self.entries.len())
            .field("unavailable", &self.unavailable)
            .finish_non_exhaustive()
    }
}

fn find(direction: Direction, codec: &str) -> Result<&'static CodecDescriptor, CodecError> {
    registry::find(direction, codec).ok_or_else(|| CodecError::UnknownCodec(codec.to_owned()))
}

fn shape_mismatch(descriptor: &CodecDescriptor) -> CodecError {
    CodecError::UnsupportedFormat {
        codec: descriptor.name,
        detail: format!("entry point does not match {:?}", descriptor.shape),
    }
}

/// Builds a [`CodecBridge`] from shared libraries or from entry points registered directly.
#[derive(Default)]
pub struct CodecBridgeBuilder {
    entries: HashMap<(&'static str, Direction), NativeEntry>,
    fmod: Option<FmodEntryPoints>,
    unavailable: HashMap<LibraryKind, String>,
    libraries: Vec<Library>,
}

impl CodecBridgeBuilder {
    /// Opens the shared library at `path` and resolves every entry point of `kind`.
    ///
    /// Either all entry points resolve or none are added.
    pub fn load_library(&mut self, kind: LibraryKind, path: &Path) -> Result<(), LibraryError> {
        let library = open_library(kind, path)?;
        let resolved = registry::codecs()
            .filter(|descriptor| descriptor.library == kind)
            .map(|descriptor| {
                resolve_entry(&library, descriptor)
                    .map(|entry| ((descriptor.name, descriptor.direction), entry))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let fmod = match kind {
            LibraryKind::Fmod => Some(resolve_fmod(&library)?),
            _ => None,
        };

        debug!("{kind}: resolved {} entry points", resolved.len());
        self.entries.extend(resolved);
        if fmod.is_some() {
            self.fmod = fmod;
        }
        self.unavailable.remove(&kind);
        self.libraries.push(library);
        Ok(())
    }

    /// Registers an entry point for the codec named `name` in `direction`.
    ///
    /// Used for statically linked codecs and for tests. `entry` must be a function with
    /// the C signature of the codec's call shape, and must stay callable for as long as
    /// the built bridge is alive.
    pub fn register(
        mut self,
        direction: Direction,
        name: &str,
        entry: NativeEntry,
    ) -> Result<Self, LibraryError> {
        let descriptor = registry::find(direction, name)
            .ok_or_else(|| LibraryError::UnknownCodec(name.to_owned()))?;
        if !entry.fits(descriptor.shape) {
            return Err(LibraryError::ShapeMismatch {
                codec: descriptor.name,
            });
        }
        self.entries
            .insert((descriptor.name, descriptor.direction), entry);
        self.unavailable.remove(&descriptor.library);
        Ok(self)
    }

    /// Registers FMOD runtime entry points, under the same contract as [`Self::register`].
    pub fn register_fmod(mut self, entry: FmodEntryPoints) -> Self {
        self.fmod = Some(entry);
        self.unavailable.remove(&LibraryKind::Fmod);
        self
    }

    /// Records why `kind` is unavailable.
    pub fn mark_unavailable(&mut self, kind: LibraryKind, reason: impl Into<String>) -> &mut Self {
        self.unavailable.insert(kind, reason.into());
        self
    }

    /// Finishes the bridge.
    pub fn build(self) -> CodecBridge {
        CodecBridge {
            entries: self.entries,
            fmod: self.fmod,
            unavailable: self.unavailable,
            _libraries: self.libraries,
        }
    }
}
