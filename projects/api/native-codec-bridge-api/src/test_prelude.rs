//! Shared helpers for tests touching the process-wide bridge.

use core::ffi::c_int;
use native_codec_bridge::descriptor::Direction;
use native_codec_bridge::native::NativeEntry;
use native_codec_bridge::CodecBridge;
use std::sync::{Mutex, MutexGuard, PoisonError};

static GLOBAL: Mutex<()> = Mutex::new(());

/// Serializes tests that install or release the process-wide bridge.
pub(crate) fn exclusive_global() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stores the first pixel of each 4x4 block in the block's first four bytes.
unsafe extern "C" fn fake_bc1_encode(
    input: *const u8,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    let width = width as usize;
    let input = unsafe { core::slice::from_raw_parts(input, width * height as usize * 4) };
    let out = unsafe { core::slice::from_raw_parts_mut(out, out_size as usize) };
    for (index, block) in out.chunks_exact_mut(8).enumerate() {
        let x = (index % (width / 4)) * 4;
        let y = (index / (width / 4)) * 4;
        block[..4].copy_from_slice(&input[(y * width + x) * 4..][..4]);
    }
    1
}

/// A bridge where only `etcpak:bc1` compression is available.
pub(crate) fn fake_bc1_bridge() -> CodecBridge {
    CodecBridge::builder()
        .register(Direction::Compress, "etcpak:bc1", NativeEntry::Block(fake_bc1_encode))
        .expect("block entry fits the bc1 encoder")
        .build()
}
