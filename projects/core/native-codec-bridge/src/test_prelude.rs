//! In-process stand-ins for the native entry points, with call counters.
//!
//! The fakes follow the C contracts of the real routines closely enough to exercise the
//! adapters: they read exactly the bytes the real routine would and write the whole
//! output region. Counters are thread-local so tests may run in parallel.

use crate::bc7::Bc7Params;
use crate::bridge::CodecBridge;
use crate::descriptor::Direction;
use crate::native::entry::{AstcEntryPoints, AstcNativeContext};
use crate::native::NativeEntry;
use core::ffi::{c_float, c_int, c_long, c_void};
use core::slice;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// First byte that makes every fake report failure.
pub(crate) const CORRUPT_MARKER: u8 = 0xEE;

/// Bytes per block the fake block codecs assume when only pixel sizes are known.
const FAKE_BLOCK_BYTES: usize = 8;

thread_local! {
    static ENCODE_CALLS: Cell<usize> = const { Cell::new(0) };
    static DECODE_CALLS: Cell<usize> = const { Cell::new(0) };
    static FREE_CALLS: Cell<usize> = const { Cell::new(0) };
    static LIVE_CONTEXTS: Cell<usize> = const { Cell::new(0) };
    static LAST_ASTC_CREATE: Cell<Option<(f32, c_int)>> = const { Cell::new(None) };
    static NATIVE_ALLOCATIONS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

pub(crate) fn reset_call_counts() {
    ENCODE_CALLS.set(0);
    DECODE_CALLS.set(0);
    FREE_CALLS.set(0);
}

pub(crate) fn encode_calls() -> usize {
    ENCODE_CALLS.get()
}

pub(crate) fn decode_calls() -> usize {
    DECODE_CALLS.get()
}

pub(crate) fn free_calls() -> usize {
    FREE_CALLS.get()
}

pub(crate) fn live_native_allocations() -> usize {
    NATIVE_ALLOCATIONS.with_borrow(HashMap::len)
}

pub(crate) fn live_astc_contexts() -> usize {
    LIVE_CONTEXTS.get()
}

/// Quality and flags of the last successful `astc_create` on this thread.
pub(crate) fn last_astc_create() -> Option<(f32, c_int)> {
    LAST_ASTC_CREATE.get()
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    counter.set(counter.get() + 1);
}

/// `width * height` RGBA8 pixels of a single colour.
pub(crate) fn solid_rgba(width: usize, height: usize, colour: [u8; 4]) -> Vec<u8> {
    colour.repeat(width * height)
}

/// `width * height` RGBA8 pixels that differ from their neighbours.
pub(crate) fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| [(i % 256) as u8, (i / width) as u8, (i * 7 % 256) as u8, 255])
        .collect()
}

/// `count` 8-byte blocks whose first four bytes hold `colour`.
pub(crate) fn fake_blocks(count: usize, colour: [u8; 4]) -> Vec<u8> {
    (0..count)
        .flat_map(|_| {
            let mut block = [0u8; FAKE_BLOCK_BYTES];
            block[..4].copy_from_slice(&colour);
            block
        })
        .collect()
}

/// Index of the block holding pixel `(x, y)` for `block_w x block_h` blocks.
fn block_index(x: usize, y: usize, width: usize, block_w: usize, block_h: usize) -> usize {
    (y / block_h) * width.div_ceil(block_w) + x / block_w
}

/// Writes the colour of each 4x4 block as 32-bit BGRA pixels.
///
/// # Safety
///
/// `data` must hold one 8-byte block per 4x4 block and `out` `width * height` pixels.
unsafe fn write_bgra_from_blocks(data: *const u8, width: usize, height: usize, out: *mut u8) -> c_int {
    let blocks = width.div_ceil(4) * height.div_ceil(4);
    let data = slice::from_raw_parts(data, blocks * FAKE_BLOCK_BYTES);
    let out = slice::from_raw_parts_mut(out, width * height * 4);
    if data.first() == Some(&CORRUPT_MARKER) {
        return 0;
    }
    for y in 0..height {
        for x in 0..width {
            let block = &data[block_index(x, y, width, 4, 4) * FAKE_BLOCK_BYTES..];
            let pixel = &mut out[(y * width + x) * 4..][..4];
            pixel.copy_from_slice(&[block[2], block[1], block[0], block[3]]);
        }
    }
    1
}

/// etcpak-style encoder: stores the first pixel of each 4x4 block in the block's first bytes.
pub(crate) unsafe extern "C" fn fake_block_encode(
    input: *const u8,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    bump(&ENCODE_CALLS);
    let (width, height) = (width as usize, height as usize);
    let input = slice::from_raw_parts(input, width * height * 4);
    let out = slice::from_raw_parts_mut(out, out_size as usize);
    let blocks = (width / 4) * (height / 4);
    if blocks == 0 || out.len() % blocks != 0 {
        return 0;
    }
    let block_bytes = out.len() / blocks;

    for (index, block) in out.chunks_exact_mut(block_bytes).enumerate() {
        let x = (index % (width / 4)) * 4;
        let y = (index / (width / 4)) * 4;
        block[..4].copy_from_slice(&input[(y * width + x) * 4..][..4]);
    }
    1
}

/// etcpak-style encoder that always fails.
pub(crate) unsafe extern "C" fn fake_failing_encode(
    _input: *const u8,
    _width: c_int,
    _height: c_int,
    _out: *mut u8,
    _out_size: c_int,
) -> c_int {
    bump(&ENCODE_CALLS);
    0
}

/// etcpak-style decoder over 8-byte blocks, writing BGRA.
pub(crate) unsafe extern "C" fn fake_block_decode(
    input: *const u8,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    bump(&DECODE_CALLS);
    if out_size != width * height * 4 {
        return 0;
    }
    write_bgra_from_blocks(input, width as usize, height as usize, out)
}

/// BC7 encoder reporting what it read through the parameter pointer.
///
/// Writes `[params != null, uber_level, perceptual]` to the first output bytes.
pub(crate) unsafe extern "C" fn fake_bc7_encode(
    _input: *const u8,
    _width: c_int,
    _height: c_int,
    params: *const Bc7Params,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    bump(&ENCODE_CALLS);
    let out = slice::from_raw_parts_mut(out, out_size as usize);
    if let Some(params) = params.as_ref() {
        out[0] = 1;
        out[1] = params.uber_level as u8;
        out[2] = params.perceptual;
    }
    1
}

pub(crate) unsafe extern "C" fn fake_decode_long_dims(
    data: *const u8,
    width: c_long,
    height: c_long,
    out: *mut u32,
) -> c_int {
    bump(&DECODE_CALLS);
    write_bgra_from_blocks(data, width as usize, height as usize, out.cast())
}

pub(crate) unsafe extern "C" fn fake_decode_u32_dims(
    data: *const u8,
    width: u32,
    height: u32,
    out: *mut u32,
) -> c_int {
    bump(&DECODE_CALLS);
    write_bgra_from_blocks(data, width as usize, height as usize, out.cast())
}

/// Writes `[block_width, block_height, 0, 255]` to every pixel.
pub(crate) unsafe extern "C" fn fake_decode_astc_blocks(
    _data: *const u8,
    width: c_long,
    height: c_long,
    block_width: c_int,
    block_height: c_int,
    out: *mut u32,
) -> c_int {
    bump(&DECODE_CALLS);
    let out = slice::from_raw_parts_mut(out.cast::<u8>(), (width * height * 4) as usize);
    for pixel in out.chunks_exact_mut(4) {
        pixel.copy_from_slice(&[block_width as u8, block_height as u8, 0, 255]);
    }
    1
}

/// Writes `is_2bpp` to every byte of the output.
pub(crate) unsafe extern "C" fn fake_decode_pvrtc(
    _data: *const u8,
    width: c_long,
    height: c_long,
    out: *mut u32,
    is_2bpp: c_int,
) -> c_int {
    bump(&DECODE_CALLS);
    let out = slice::from_raw_parts_mut(out.cast::<u8>(), (width * height * 4) as usize);
    out.fill(is_2bpp as u8);
    1
}

/// Hands out a native-owned buffer tracked until [`fake_free`] releases it.
fn native_alloc(bytes: Vec<u8>) -> *mut u8 {
    let len = bytes.len();
    let ptr = Box::into_raw(bytes.into_boxed_slice()).cast::<u8>();
    NATIVE_ALLOCATIONS.with_borrow_mut(|allocations| allocations.insert(ptr as usize, len));
    ptr
}

/// Unpacker returning each input byte inverted, followed by the level index.
pub(crate) unsafe extern "C" fn fake_unpack(
    data: *const u8,
    data_size: u32,
    level_index: u32,
    out_ptr: *mut *mut u8,
    out_size: *mut u32,
) -> c_int {
    let data = slice::from_raw_parts(data, data_size as usize);
    if data.first() == Some(&CORRUPT_MARKER) {
        return 0;
    }
    let mut bytes: Vec<u8> = data.iter().map(|byte| byte ^ 0xFF).collect();
    bytes.push(level_index as u8);
    *out_size = bytes.len() as u32;
    *out_ptr = native_alloc(bytes);
    1
}

/// Unpacker reporting success without a buffer.
pub(crate) unsafe extern "C" fn fake_unpack_null(
    _data: *const u8,
    _data_size: u32,
    _level_index: u32,
    out_ptr: *mut *mut u8,
    out_size: *mut u32,
) -> c_int {
    *out_ptr = core::ptr::null_mut();
    *out_size = 0;
    1
}

/// Unpacker reporting success with an empty buffer.
pub(crate) unsafe extern "C" fn fake_unpack_empty(
    _data: *const u8,
    _data_size: u32,
    _level_index: u32,
    out_ptr: *mut *mut u8,
    out_size: *mut u32,
) -> c_int {
    // One real byte backs the allocation so its address is unique.
    *out_ptr = native_alloc(vec![0]);
    *out_size = 0;
    1
}

pub(crate) unsafe extern "C" fn fake_free(ptr: *mut c_void) {
    bump(&FREE_CALLS);
    let len = NATIVE_ALLOCATIONS
        .with_borrow_mut(|allocations| allocations.remove(&(ptr as usize)))
        .unwrap_or_else(|| panic!("free of unknown pointer {ptr:p}"));
    drop(Box::from_raw(slice::from_raw_parts_mut(ptr.cast::<u8>(), len)));
}

/// State behind a fake ASTC context handle.
struct FakeAstcContext {
    block_x: usize,
    block_y: usize,
}

impl FakeAstcContext {
    unsafe fn from_handle<'a>(ctx: *mut AstcNativeContext) -> &'a FakeAstcContext {
        &*ctx.cast::<FakeAstcContext>()
    }

    fn block_count(&self, width: usize, height: usize) -> usize {
        width.div_ceil(self.block_x) * height.div_ceil(self.block_y)
    }
}

/// Creates a context; HDR profiles are refused with a null handle.
unsafe extern "C" fn fake_astc_create(
    profile: c_int,
    block_x: c_int,
    block_y: c_int,
    block_z: c_int,
    quality: c_float,
    flags: c_int,
) -> *mut AstcNativeContext {
    if profile == 3 || block_z != 1 {
        return core::ptr::null_mut();
    }
    LAST_ASTC_CREATE.set(Some((quality, flags)));
    LIVE_CONTEXTS.set(LIVE_CONTEXTS.get() + 1);
    let context = Box::new(FakeAstcContext {
        block_x: block_x as usize,
        block_y: block_y as usize,
    });
    Box::into_raw(context).cast()
}

unsafe extern "C" fn fake_astc_destroy(ctx: *mut AstcNativeContext) {
    LIVE_CONTEXTS.set(LIVE_CONTEXTS.get() - 1);
    drop(Box::from_raw(ctx.cast::<FakeAstcContext>()));
}

/// Stores the first pixel's colour in every 16-byte block. Returns 2 on corrupt input.
unsafe extern "C" fn fake_astc_compress(
    ctx: *mut AstcNativeContext,
    rgba: *const u8,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    let context = FakeAstcContext::from_handle(ctx);
    let (width, height) = (width as usize, height as usize);
    if out_size as usize != context.block_count(width, height) * 16 {
        return 1;
    }
    let rgba = slice::from_raw_parts(rgba, width * height * 4);
    if rgba[0] == CORRUPT_MARKER {
        return 2;
    }
    let out = slice::from_raw_parts_mut(out, out_size as usize);
    for block in out.chunks_exact_mut(16) {
        block[..4].copy_from_slice(&rgba[..4]);
    }
    0
}

/// Writes each block's colour to its pixels as RGBA. Returns 2 when blocks are missing.
unsafe extern "C" fn fake_astc_decompress(
    ctx: *mut AstcNativeContext,
    blocks: *const u8,
    blocks_size: c_int,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int {
    let context = FakeAstcContext::from_handle(ctx);
    let (width, height) = (width as usize, height as usize);
    if (blocks_size as usize) < context.block_count(width, height) * 16 {
        return 2;
    }
    if out_size as usize != width * height * 4 {
        return 1;
    }
    let blocks = slice::from_raw_parts(blocks, blocks_size as usize);
    let out = slice::from_raw_parts_mut(out, out_size as usize);
    for y in 0..height {
        for x in 0..width {
            let index = block_index(x, y, width, context.block_x, context.block_y);
            out[(y * width + x) * 4..][..4].copy_from_slice(&blocks[index * 16..][..4]);
        }
    }
    0
}

pub(crate) fn fake_astc_entry_points() -> AstcEntryPoints {
    AstcEntryPoints {
        create: fake_astc_create,
        destroy: fake_astc_destroy,
        compress: fake_astc_compress,
        decompress: fake_astc_decompress,
    }
}

/// A bridge with fakes registered for a handful of codecs from every library.
pub(crate) fn fake_bridge() -> CodecBridge {
    let astc = NativeEntry::AstcContext(fake_astc_entry_points());
    CodecBridge::builder()
        .register(Direction::Compress, "etcpak:bc1", NativeEntry::Block(fake_block_encode))
        .and_then(|b| b.register(Direction::Compress, "etcpak:bc3", NativeEntry::Block(fake_block_encode)))
        .and_then(|b| b.register(Direction::Compress, "etcpak:bc7", NativeEntry::BlockWithParams(fake_bc7_encode)))
        .and_then(|b| b.register(Direction::Decompress, "etcpak:bc1", NativeEntry::Block(fake_block_decode)))
        .and_then(|b| b.register(Direction::Decompress, "t2d:bc1", NativeEntry::DecodeLongDims(fake_decode_long_dims)))
        .and_then(|b| b.register(Direction::Decompress, "t2d:bc4", NativeEntry::DecodeU32Dims(fake_decode_u32_dims)))
        .and_then(|b| {
            b.register(
                Direction::Unpack,
                "t2d:crunch",
                NativeEntry::Unpack {
                    unpack: fake_unpack,
                    free: fake_free,
                },
            )
        })
        .and_then(|b| b.register(Direction::Compress, "astcenc:astc", astc))
        .and_then(|b| b.register(Direction::Decompress, "astcenc:astc", astc))
        .expect("fake entry points match their call shapes")
        .build()
}
