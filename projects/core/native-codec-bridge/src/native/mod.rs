//! Native library configuration, entry point signatures and symbol resolution.

mod config;
pub mod entry;
mod loader;

pub use config::{
    LibraryConfig, LibraryKind, ASTC_LIB_ENV, ETCPAK_LIB_ENV, FMOD_LIB_ENV, T2D_LIB_ENV,
};
pub use entry::{AstcEntryPoints, FmodEntryPoints, NativeEntry};
pub(crate) use loader::{open_library, resolve_entry, resolve_fmod};
