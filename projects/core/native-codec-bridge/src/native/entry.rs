//! C signatures of the native entry points, and the tagged union that carries them.

use crate::bc7::Bc7Params;
use crate::descriptor::CallShape;
use core::ffi::{c_char, c_float, c_int, c_long, c_uint, c_void};

/// Symbol creating an ASTC encoder context.
pub const ASTC_CREATE_SYMBOL: &str = "astc_create";
/// Symbol destroying an ASTC encoder context.
pub const ASTC_DESTROY_SYMBOL: &str = "astc_destroy";
/// Symbol compressing RGBA8 through an ASTC context.
pub const ASTC_COMPRESS_SYMBOL: &str = "astc_compress_rgba8";
/// Symbol decompressing to RGBA8 through an ASTC context.
pub const ASTC_DECOMPRESS_SYMBOL: &str = "astc_decompress_rgba8";
/// Symbol releasing buffers allocated by texture2ddecoder's unpack routines.
pub const T2D_FREE_SYMBOL: &str = "t2d_free";

/// `int f(const u8* in, int w, int h, u8* out, int out_size)`; etcpak compressors and decompressors.
pub type BlockFn =
    unsafe extern "C" fn(input: *const u8, width: c_int, height: c_int, out: *mut u8, out_size: c_int) -> c_int;

/// `int f(const u8* rgba, int w, int h, const bc7_params* params, u8* out, int out_size)`.
pub type BlockWithParamsFn = unsafe extern "C" fn(
    input: *const u8,
    width: c_int,
    height: c_int,
    params: *const Bc7Params,
    out: *mut u8,
    out_size: c_int,
) -> c_int;

/// `int f(const u8* data, long w, long h, u32* out)`.
pub type DecodeLongDimsFn =
    unsafe extern "C" fn(data: *const u8, width: c_long, height: c_long, out: *mut u32) -> c_int;

/// `int f(const u8* data, u32 w, u32 h, u32* out)`.
pub type DecodeU32DimsFn =
    unsafe extern "C" fn(data: *const u8, width: u32, height: u32, out: *mut u32) -> c_int;

/// `int f(const u8* data, long w, long h, int block_w, int block_h, u32* out)`.
pub type DecodeAstcBlocksFn = unsafe extern "C" fn(
    data: *const u8,
    width: c_long,
    height: c_long,
    block_width: c_int,
    block_height: c_int,
    out: *mut u32,
) -> c_int;

/// `int f(const u8* data, long w, long h, u32* out, int is2bpp)`.
pub type DecodePvrtcFn = unsafe extern "C" fn(
    data: *const u8,
    width: c_long,
    height: c_long,
    out: *mut u32,
    is_2bpp: c_int,
) -> c_int;

/// `int f(const u8* data, u32 len, u32 level, u8** out, u32* out_len)`.
pub type UnpackFn = unsafe extern "C" fn(
    data: *const u8,
    data_size: u32,
    level_index: u32,
    out_ptr: *mut *mut u8,
    out_size: *mut u32,
) -> c_int;

/// `void f(void* p)`, releasing a buffer handed out by an [`UnpackFn`].
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

/// Opaque native ASTC encoder context.
#[repr(C)]
pub struct AstcNativeContext {
    _private: [u8; 0],
}

/// `ctx* astc_create(int profile, int bx, int by, int bz, float quality, int flags)`.
pub type AstcCreateFn = unsafe extern "C" fn(
    profile: c_int,
    block_x: c_int,
    block_y: c_int,
    block_z: c_int,
    quality: c_float,
    flags: c_int,
) -> *mut AstcNativeContext;

/// `void astc_destroy(ctx*)`.
pub type AstcDestroyFn = unsafe extern "C" fn(ctx: *mut AstcNativeContext);

/// `int astc_compress_rgba8(ctx*, const u8* rgba, int w, int h, u8* out, int out_size)`.
pub type AstcCompressFn = unsafe extern "C" fn(
    ctx: *mut AstcNativeContext,
    rgba: *const u8,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int;

/// `int astc_decompress_rgba8(ctx*, const u8* blocks, int len, int w, int h, u8* out, int out_size)`.
pub type AstcDecompressFn = unsafe extern "C" fn(
    ctx: *mut AstcNativeContext,
    blocks: *const u8,
    blocks_size: c_int,
    width: c_int,
    height: c_int,
    out: *mut u8,
    out_size: c_int,
) -> c_int;

/// The four entry points of the ASTC encoder.
#[derive(Debug, Clone, Copy)]
pub struct AstcEntryPoints {
    /// Creates a context.
    pub create: AstcCreateFn,
    /// Destroys a context.
    pub destroy: AstcDestroyFn,
    /// Compresses through a context.
    pub compress: AstcCompressFn,
    /// Decompresses through a context.
    pub decompress: AstcDecompressFn,
}

/// `FMOD_RESULT`; [`FMOD_OK`] on success.
pub type FmodResult = c_int;

/// `FMOD_OK`.
pub const FMOD_OK: FmodResult = 0;
/// `FMOD_INIT_NORMAL`.
pub const FMOD_INIT_NORMAL: c_uint = 0;
/// `FMOD_OPENMEMORY`: the name argument of `createSound` points at the sound data.
pub const FMOD_OPENMEMORY: c_uint = 0x0000_0800;
/// `FMOD_TIMEUNIT_PCMBYTES`.
pub const FMOD_TIMEUNIT_PCMBYTES: c_uint = 0x0000_0004;
/// `FMOD_VERSION` of the headers these signatures follow (2.02).
pub const FMOD_HEADER_VERSION: c_uint = 0x0002_0222;

/// Symbol creating an FMOD system.
pub const FMOD_SYSTEM_CREATE_SYMBOL: &str = "FMOD_System_Create";
/// Symbol initializing an FMOD system.
pub const FMOD_SYSTEM_INIT_SYMBOL: &str = "FMOD_System_Init";
/// Symbol releasing an FMOD system.
pub const FMOD_SYSTEM_RELEASE_SYMBOL: &str = "FMOD_System_Release";
/// Symbol creating a sound.
pub const FMOD_CREATE_SOUND_SYMBOL: &str = "FMOD_System_CreateSound";
/// Symbol releasing a sound.
pub const FMOD_SOUND_RELEASE_SYMBOL: &str = "FMOD_Sound_Release";
/// Symbol counting a sound's subsounds.
pub const FMOD_GET_NUM_SUBSOUNDS_SYMBOL: &str = "FMOD_Sound_GetNumSubSounds";
/// Symbol fetching a subsound.
pub const FMOD_GET_SUBSOUND_SYMBOL: &str = "FMOD_Sound_GetSubSound";
/// Symbol reading a sound's sample format.
pub const FMOD_GET_FORMAT_SYMBOL: &str = "FMOD_Sound_GetFormat";
/// Symbol reading a sound's default frequency.
pub const FMOD_GET_DEFAULTS_SYMBOL: &str = "FMOD_Sound_GetDefaults";
/// Symbol reading a sound's length.
pub const FMOD_GET_LENGTH_SYMBOL: &str = "FMOD_Sound_GetLength";
/// Symbol locking a sound's sample data.
pub const FMOD_SOUND_LOCK_SYMBOL: &str = "FMOD_Sound_Lock";
/// Symbol unlocking a sound's sample data.
pub const FMOD_SOUND_UNLOCK_SYMBOL: &str = "FMOD_Sound_Unlock";

/// Opaque `FMOD_SYSTEM`.
#[repr(C)]
pub struct FmodSystemHandle {
    _private: [u8; 0],
}

/// Opaque `FMOD_SOUND`.
#[repr(C)]
pub struct FmodSoundHandle {
    _private: [u8; 0],
}

/// Mirror of `FMOD_CREATESOUNDEXINFO`. Callbacks and user pointers are always null here.
///
/// Fields keep the C header's names and order.
#[allow(missing_docs)]
#[repr(C)]
#[derive(Debug)]
pub struct FmodCreateSoundExInfo {
    /// Size of this struct in bytes.
    pub cbsize: c_int,
    /// Bytes of sound data behind the name argument.
    pub length: c_uint,
    pub fileoffset: c_uint,
    /// Channel count of raw PCM data.
    pub numchannels: c_int,
    /// Sample rate of raw PCM data.
    pub defaultfrequency: c_int,
    pub format: c_int,
    pub decodebuffersize: c_uint,
    pub initialsubsound: c_int,
    pub numsubsounds: c_int,
    pub inclusionlist: *mut c_int,
    pub inclusionlistnum: c_int,
    pub pcmreadcallback: *mut c_void,
    pub pcmsetposcallback: *mut c_void,
    pub nonblockcallback: *mut c_void,
    pub dlsname: *const c_char,
    pub encryptionkey: *const c_char,
    pub maxpolyphony: c_int,
    pub userdata: *mut c_void,
    pub suggestedsoundtype: c_int,
    pub fileuseropen: *mut c_void,
    pub fileuserclose: *mut c_void,
    pub fileuserread: *mut c_void,
    pub fileuserseek: *mut c_void,
    pub fileuserasyncread: *mut c_void,
    pub fileuserasynccancel: *mut c_void,
    pub fileuserdata: *mut c_void,
    pub filebuffersize: c_int,
    pub channelorder: c_int,
    pub initialsoundgroup: *mut c_void,
    pub initialseekposition: c_uint,
    pub initialseekpostype: c_uint,
    pub ignoresetfilesystem: c_int,
    pub audioqueuepolicy: c_uint,
    pub minmidigranularity: c_uint,
    pub nonblockthreadid: c_int,
    pub fsbguid: *mut c_void,
}

impl FmodCreateSoundExInfo {
    /// Describes `length` bytes of in-memory sound data.
    pub fn new(length: c_uint, channels: c_int, frequency: c_int) -> Self {
        // Safety: every field is an integer or a raw pointer, for which all-zero is valid.
        let mut info: Self = unsafe { core::mem::zeroed() };
        info.cbsize = core::mem::size_of::<Self>() as c_int;
        info.length = length;
        info.numchannels = channels;
        info.defaultfrequency = frequency;
        info
    }
}

/// `FMOD_RESULT FMOD_System_Create(FMOD_SYSTEM** system, unsigned int headerversion)`.
pub type FmodSystemCreateFn =
    unsafe extern "system" fn(system: *mut *mut FmodSystemHandle, header_version: c_uint) -> FmodResult;

/// `FMOD_RESULT FMOD_System_Init(FMOD_SYSTEM*, int maxchannels, FMOD_INITFLAGS, void* extradriverdata)`.
pub type FmodSystemInitFn = unsafe extern "system" fn(
    system: *mut FmodSystemHandle,
    max_channels: c_int,
    flags: c_uint,
    extra_driver_data: *mut c_void,
) -> FmodResult;

/// `FMOD_RESULT FMOD_System_Release(FMOD_SYSTEM*)`.
pub type FmodSystemReleaseFn = unsafe extern "system" fn(system: *mut FmodSystemHandle) -> FmodResult;

/// `FMOD_RESULT FMOD_System_CreateSound(FMOD_SYSTEM*, const char*, FMOD_MODE, FMOD_CREATESOUNDEXINFO*, FMOD_SOUND**)`.
pub type FmodCreateSoundFn = unsafe extern "system" fn(
    system: *mut FmodSystemHandle,
    name_or_data: *const c_char,
    mode: c_uint,
    exinfo: *mut FmodCreateSoundExInfo,
    sound: *mut *mut FmodSoundHandle,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_Release(FMOD_SOUND*)`.
pub type FmodSoundReleaseFn = unsafe extern "system" fn(sound: *mut FmodSoundHandle) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_GetNumSubSounds(FMOD_SOUND*, int*)`.
pub type FmodGetNumSubSoundsFn =
    unsafe extern "system" fn(sound: *mut FmodSoundHandle, count: *mut c_int) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_GetSubSound(FMOD_SOUND*, int index, FMOD_SOUND**)`.
pub type FmodGetSubSoundFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    index: c_int,
    subsound: *mut *mut FmodSoundHandle,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_GetFormat(FMOD_SOUND*, FMOD_SOUND_TYPE*, FMOD_SOUND_FORMAT*, int* channels, int* bits)`.
pub type FmodGetFormatFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    sound_type: *mut c_int,
    format: *mut c_int,
    channels: *mut c_int,
    bits: *mut c_int,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_GetDefaults(FMOD_SOUND*, float* frequency, int* priority)`.
pub type FmodGetDefaultsFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    frequency: *mut c_float,
    priority: *mut c_int,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_GetLength(FMOD_SOUND*, unsigned int* length, FMOD_TIMEUNIT)`.
pub type FmodGetLengthFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    length: *mut c_uint,
    time_unit: c_uint,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_Lock(FMOD_SOUND*, unsigned offset, unsigned length, void** p1, void** p2, unsigned* l1, unsigned* l2)`.
pub type FmodSoundLockFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    offset: c_uint,
    length: c_uint,
    ptr1: *mut *mut c_void,
    ptr2: *mut *mut c_void,
    len1: *mut c_uint,
    len2: *mut c_uint,
) -> FmodResult;

/// `FMOD_RESULT FMOD_Sound_Unlock(FMOD_SOUND*, void* p1, void* p2, unsigned l1, unsigned l2)`.
pub type FmodSoundUnlockFn = unsafe extern "system" fn(
    sound: *mut FmodSoundHandle,
    ptr1: *mut c_void,
    ptr2: *mut c_void,
    len1: c_uint,
    len2: c_uint,
) -> FmodResult;

/// The FMOD runtime entry points used to decode a sound and read its PCM data.
#[derive(Debug, Clone, Copy)]
pub struct FmodEntryPoints {
    /// `FMOD_System_Create`.
    pub system_create: FmodSystemCreateFn,
    /// `FMOD_System_Init`.
    pub system_init: FmodSystemInitFn,
    /// `FMOD_System_Release`.
    pub system_release: FmodSystemReleaseFn,
    /// `FMOD_System_CreateSound`.
    pub create_sound: FmodCreateSoundFn,
    /// `FMOD_Sound_Release`.
    pub sound_release: FmodSoundReleaseFn,
    /// `FMOD_Sound_GetNumSubSounds`.
    pub get_num_subsounds: FmodGetNumSubSoundsFn,
    /// `FMOD_Sound_GetSubSound`.
    pub get_subsound: FmodGetSubSoundFn,
    /// `FMOD_Sound_GetFormat`.
    pub get_format: FmodGetFormatFn,
    /// `FMOD_Sound_GetDefaults`.
    pub get_defaults: FmodGetDefaultsFn,
    /// `FMOD_Sound_GetLength`.
    pub get_length: FmodGetLengthFn,
    /// `FMOD_Sound_Lock`.
    pub lock: FmodSoundLockFn,
    /// `FMOD_Sound_Unlock`.
    pub unlock: FmodSoundUnlockFn,
}

/// A resolved native entry point, tagged with its call shape.
#[derive(Debug, Clone, Copy)]
pub enum NativeEntry {
    /// [`CallShape::Encode`] and [`CallShape::Decode`].
    Block(BlockFn),
    /// [`CallShape::EncodeWithParams`].
    BlockWithParams(BlockWithParamsFn),
    /// [`CallShape::DecodeLongDims`].
    DecodeLongDims(DecodeLongDimsFn),
    /// [`CallShape::DecodeU32Dims`].
    DecodeU32Dims(DecodeU32DimsFn),
    /// [`CallShape::DecodeAstcBlocks`].
    DecodeAstcBlocks(DecodeAstcBlocksFn),
    /// [`CallShape::DecodePvrtc`].
    DecodePvrtc(DecodePvrtcFn),
    /// [`CallShape::ContextEncode`] and [`CallShape::ContextDecode`].
    AstcContext(AstcEntryPoints),
    /// [`CallShape::UnpackAllocated`].
    Unpack {
        /// The unpack routine.
        unpack: UnpackFn,
        /// The paired free.
        free: FreeFn,
    },
}

impl NativeEntry {
    /// Whether this entry can be invoked with the given call shape.
    pub const fn fits(&self, shape: CallShape) -> bool {
        matches!(
            (self, shape),
            (NativeEntry::Block(_), CallShape::Encode | CallShape::Decode)
                | (NativeEntry::BlockWithParams(_), CallShape::EncodeWithParams)
                | (NativeEntry::DecodeLongDims(_), CallShape::DecodeLongDims)
                | (NativeEntry::DecodeU32Dims(_), CallShape::DecodeU32Dims)
                | (NativeEntry::DecodeAstcBlocks(_), CallShape::DecodeAstcBlocks)
                | (NativeEntry::DecodePvrtc(_), CallShape::DecodePvrtc { .. })
                | (
                    NativeEntry::AstcContext(_),
                    CallShape::ContextEncode | CallShape::ContextDecode
                )
                | (NativeEntry::Unpack { .. }, CallShape::UnpackAllocated)
        )
    }
}
