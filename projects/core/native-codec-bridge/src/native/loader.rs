//! Opens shared libraries and resolves the entry points the registry declares.

use super::config::LibraryKind;
use super::entry::*;
use crate::descriptor::{CallShape, CodecDescriptor};
use crate::error::LibraryError;
use libloading::Library;
use log::debug;
use std::path::Path;

/// Opens the shared library at `path`.
pub(crate) fn open_library(kind: LibraryKind, path: &Path) -> Result<Library, LibraryError> {
    // Safety: loading runs the library's initializers; the configured libraries are plain C codecs.
    let library = unsafe { Library::new(path) }.map_err(|source| LibraryError::Open {
        library: kind,
        path: path.to_path_buf(),
        source,
    })?;
    debug!("opened {kind} from '{}'", path.display());
    Ok(library)
}

/// Resolves `symbol` as a value of the function pointer type `T`.
///
/// # Safety
///
/// `T` must be the exact C signature of the exported symbol.
unsafe fn symbol<T: Copy>(
    library: &Library,
    kind: LibraryKind,
    symbol: &'static str,
) -> Result<T, LibraryError> {
    let resolved = library
        .get::<T>(symbol.as_bytes())
        .map_err(|source| LibraryError::MissingSymbol {
            library: kind,
            symbol,
            source,
        })?;
    Ok(*resolved)
}

/// Resolves the entry point (or entry points) `descriptor` needs from `library`.
///
/// The returned function pointers are only valid while `library` stays loaded.
pub(crate) fn resolve_entry(
    library: &Library,
    descriptor: &CodecDescriptor,
) -> Result<NativeEntry, LibraryError> {
    let kind = descriptor.library;
    let name = descriptor.symbol;
    // Safety: each symbol is read with the signature the library's C header declares.
    unsafe {
        Ok(match descriptor.shape {
            CallShape::Encode | CallShape::Decode => {
                NativeEntry::Block(symbol::<BlockFn>(library, kind, name)?)
            }
            CallShape::EncodeWithParams => {
                NativeEntry::BlockWithParams(symbol::<BlockWithParamsFn>(library, kind, name)?)
            }
            CallShape::DecodeLongDims => {
                NativeEntry::DecodeLongDims(symbol::<DecodeLongDimsFn>(library, kind, name)?)
            }
            CallShape::DecodeU32Dims => {
                NativeEntry::DecodeU32Dims(symbol::<DecodeU32DimsFn>(library, kind, name)?)
            }
            CallShape::DecodeAstcBlocks => {
                NativeEntry::DecodeAstcBlocks(symbol::<DecodeAstcBlocksFn>(library, kind, name)?)
            }
            CallShape::DecodePvrtc { .. } => {
                NativeEntry::DecodePvrtc(symbol::<DecodePvrtcFn>(library, kind, name)?)
            }
            CallShape::ContextEncode | CallShape::ContextDecode => {
                NativeEntry::AstcContext(AstcEntryPoints {
                    create: symbol::<AstcCreateFn>(library, kind, ASTC_CREATE_SYMBOL)?,
                    destroy: symbol::<AstcDestroyFn>(library, kind, ASTC_DESTROY_SYMBOL)?,
                    compress: symbol::<AstcCompressFn>(library, kind, ASTC_COMPRESS_SYMBOL)?,
                    decompress: symbol::<AstcDecompressFn>(library, kind, ASTC_DECOMPRESS_SYMBOL)?,
                })
            }
            CallShape::UnpackAllocated => NativeEntry::Unpack {
                unpack: symbol::<UnpackFn>(library, kind, name)?,
                free: symbol::<FreeFn>(library, kind, T2D_FREE_SYMBOL)?,
            },
        })
    }
}

/// Resolves the FMOD runtime entry points from `library`.
pub(crate) fn resolve_fmod(library: &Library) -> Result<FmodEntryPoints, LibraryError> {
    let kind = LibraryKind::Fmod;
    // Safety: each symbol is read with the signature of the FMOD C API.
    let entry = unsafe {
        FmodEntryPoints {
            system_create: symbol(library, kind, FMOD_SYSTEM_CREATE_SYMBOL)?,
            system_init: symbol(library, kind, FMOD_SYSTEM_INIT_SYMBOL)?,
            system_release: symbol(library, kind, FMOD_SYSTEM_RELEASE_SYMBOL)?,
            create_sound: symbol(library, kind, FMOD_CREATE_SOUND_SYMBOL)?,
            sound_release: symbol(library, kind, FMOD_SOUND_RELEASE_SYMBOL)?,
            get_num_subsounds: symbol(library, kind, FMOD_GET_NUM_SUBSOUNDS_SYMBOL)?,
            get_subsound: symbol(library, kind, FMOD_GET_SUBSOUND_SYMBOL)?,
            get_format: symbol(library, kind, FMOD_GET_FORMAT_SYMBOL)?,
            get_defaults: symbol(library, kind, FMOD_GET_DEFAULTS_SYMBOL)?,
            get_length: symbol(library, kind, FMOD_GET_LENGTH_SYMBOL)?,
            lock: symbol(library, kind, FMOD_SOUND_LOCK_SYMBOL)?,
            unlock: symbol(library, kind, FMOD_SOUND_UNLOCK_SYMBOL)?,
        }
    };
    debug!("{kind}: resolved the runtime entry points");
    Ok(entry)
}
