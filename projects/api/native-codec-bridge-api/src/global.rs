//! The process-wide bridge.
//!
//! Libraries are loaded by an explicit [`init`], shared read-only by every caller and
//! released by [`shutdown`]. Calls in flight keep their own [`Arc`] to the bridge, so a
//! shutdown never unloads a library under a running native call; the libraries unload
//! when the last such call returns.

use log::debug;
use native_codec_bridge::{CodecBridge, CodecError, LibraryConfig};
use std::sync::{Arc, PoisonError, RwLock};

static BRIDGE: RwLock<Option<Arc<CodecBridge>>> = RwLock::new(None);

/// Loads the libraries named in `config` and makes them the process-wide bridge.
///
/// If a bridge is already installed it is returned unchanged and `config` is ignored;
/// call [`shutdown`] first to reload with a different configuration.
pub fn init(config: &LibraryConfig) -> Arc<CodecBridge> {
    let mut slot = BRIDGE.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(bridge) = slot.as_ref() {
        debug!("native libraries already initialized");
        return Arc::clone(bridge);
    }

    let bridge = Arc::new(CodecBridge::load(config));
    debug!("initialized native libraries: {bridge:?}");
    *slot = Some(Arc::clone(&bridge));
    bridge
}

/// [`init`] with the library paths from the environment.
///
/// See [`LibraryConfig::from_env`].
pub fn init_from_env() -> Arc<CodecBridge> {
    init(&LibraryConfig::from_env())
}

/// Installs an already built bridge, such as one with statically registered entry points.
///
/// # Errors
///
/// Hands `bridge` back if one is already installed.
pub fn install(bridge: CodecBridge) -> Result<Arc<CodecBridge>, CodecBridge> {
    let mut slot = BRIDGE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(bridge);
    }
    let bridge = Arc::new(bridge);
    *slot = Some(Arc::clone(&bridge));
    Ok(bridge)
}

/// The process-wide bridge.
///
/// # Errors
///
/// [`CodecError::NotInitialized`] before [`init`] or after [`shutdown`].
pub fn bridge() -> Result<Arc<CodecBridge>, CodecError> {
    BRIDGE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(CodecError::NotInitialized)
}

/// Whether a bridge is installed.
pub fn is_initialized() -> bool {
    BRIDGE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Releases the process-wide bridge. Returns whether one was installed.
pub fn shutdown() -> bool {
    let released = BRIDGE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if released.is_some() {
        debug!("released native libraries");
    }
    released.is_some()
}
