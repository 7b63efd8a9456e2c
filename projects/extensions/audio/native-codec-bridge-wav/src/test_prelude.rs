//! In-process stand-in for the FMOD runtime, with thread-local counters.
//!
//! A fake sound is described by its data: byte 0 is the `FMOD_SOUND_FORMAT`, byte 1 the
//! subsound count, the rest is the PCM every (sub)sound reports. Locks hand the range
//! out in two parts, split at a 4-byte boundary near the middle.

use crate::format::SoundFormat;
use core::ffi::{c_char, c_float, c_int, c_uint, c_void};
use core::slice;
use native_codec_bridge::native::entry::{
    FmodCreateSoundExInfo, FmodEntryPoints, FmodResult, FmodSoundHandle, FmodSystemHandle,
    FMOD_OK, FMOD_OPENMEMORY, FMOD_TIMEUNIT_PCMBYTES,
};
use native_codec_bridge::CodecBridge;
use std::cell::Cell;

/// First byte that makes `createSound` fail.
pub(crate) const FAIL_MARKER: u8 = 0xEE;
/// `FMOD_ERR_FORMAT`.
pub(crate) const FAKE_ERR_FORMAT: FmodResult = 19;
/// `FMOD_ERR_INVALID_PARAM`.
const FAKE_ERR_INVALID_PARAM: FmodResult = 31;
/// Highest channel count the fake system accepts.
pub(crate) const FAKE_MAX_CHANNELS: u16 = 4093;

thread_local! {
    static SYSTEMS_CREATED: Cell<usize> = const { Cell::new(0) };
    static LIVE_SYSTEMS: Cell<usize> = const { Cell::new(0) };
    static LIVE_SOUNDS: Cell<usize> = const { Cell::new(0) };
    static LIVE_LOCKS: Cell<usize> = const { Cell::new(0) };
    static LOCK_CALLS: Cell<usize> = const { Cell::new(0) };
    static LAST_INIT_FLAGS: Cell<Option<c_uint>> = const { Cell::new(None) };
}

pub(crate) fn systems_created() -> usize {
    SYSTEMS_CREATED.get()
}

pub(crate) fn live_systems() -> usize {
    LIVE_SYSTEMS.get()
}

pub(crate) fn live_sounds() -> usize {
    LIVE_SOUNDS.get()
}

pub(crate) fn live_locks() -> usize {
    LIVE_LOCKS.get()
}

pub(crate) fn lock_calls() -> usize {
    LOCK_CALLS.get()
}

pub(crate) fn last_init_flags() -> Option<c_uint> {
    LAST_INIT_FLAGS.get()
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    counter.set(counter.get() + 1);
}

fn drop_one(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    counter.set(counter.get() - 1);
}

/// Encodes a fake sound as `createSound` expects it.
pub(crate) fn fake_sound(format: SoundFormat, subsounds: u8, pcm: &[u8]) -> Vec<u8> {
    let mut raw = vec![format as u8, subsounds];
    raw.extend_from_slice(pcm);
    raw
}

/// A bridge whose only library is the fake FMOD runtime.
pub(crate) fn fake_fmod_bridge() -> CodecBridge {
    CodecBridge::builder()
        .register_fmod(fake_fmod_entry_points())
        .build()
}

pub(crate) fn fake_fmod_entry_points() -> FmodEntryPoints {
    FmodEntryPoints {
        system_create: fake_system_create,
        system_init: fake_system_init,
        system_release: fake_system_release,
        create_sound: fake_create_sound,
        sound_release: fake_sound_release,
        get_num_subsounds: fake_get_num_subsounds,
        get_subsound: fake_get_subsound,
        get_format: fake_get_format,
        get_defaults: fake_get_defaults,
        get_length: fake_get_length,
        lock: fake_lock,
        unlock: fake_unlock,
    }
}

struct FakeSystem {
    max_channels: c_int,
}

#[derive(Clone)]
struct FakeSound {
    format: c_int,
    channels: c_int,
    frequency: c_int,
    subsounds: c_int,
    pcm: Vec<u8>,
}

unsafe fn sound<'a>(handle: *mut FmodSoundHandle) -> &'a mut FakeSound {
    &mut *handle.cast::<FakeSound>()
}

fn new_sound(sound: FakeSound) -> *mut FmodSoundHandle {
    bump(&LIVE_SOUNDS);
    Box::into_raw(Box::new(sound)).cast()
}

unsafe extern "system" fn fake_system_create(
    system: *mut *mut FmodSystemHandle,
    _header_version: c_uint,
) -> FmodResult {
    bump(&SYSTEMS_CREATED);
    bump(&LIVE_SYSTEMS);
    *system = Box::into_raw(Box::new(FakeSystem { max_channels: 0 })).cast();
    FMOD_OK
}

unsafe extern "system" fn fake_system_init(
    system: *mut FmodSystemHandle,
    max_channels: c_int,
    flags: c_uint,
    _extra_driver_data: *mut c_void,
) -> FmodResult {
    if max_channels > c_int::from(FAKE_MAX_CHANNELS) {
        return FAKE_ERR_INVALID_PARAM;
    }
    LAST_INIT_FLAGS.set(Some(flags));
    (*system.cast::<FakeSystem>()).max_channels = max_channels;
    FMOD_OK
}

unsafe extern "system" fn fake_system_release(system: *mut FmodSystemHandle) -> FmodResult {
    drop_one(&LIVE_SYSTEMS);
    drop(Box::from_raw(system.cast::<FakeSystem>()));
    FMOD_OK
}

unsafe extern "system" fn fake_create_sound(
    system: *mut FmodSystemHandle,
    data: *const c_char,
    mode: c_uint,
    exinfo: *mut FmodCreateSoundExInfo,
    out: *mut *mut FmodSoundHandle,
) -> FmodResult {
    let info = &*exinfo;
    let initialized = (*system.cast::<FakeSystem>()).max_channels > 0;
    if !initialized
        || mode & FMOD_OPENMEMORY == 0
        || info.cbsize as usize != core::mem::size_of::<FmodCreateSoundExInfo>()
    {
        return FAKE_ERR_INVALID_PARAM;
    }
    match slice::from_raw_parts(data.cast::<u8>(), info.length as usize) {
        [FAIL_MARKER, ..] | [] | [_] => FAKE_ERR_FORMAT,
        [format, subsounds, pcm @ ..] => {
            *out = new_sound(FakeSound {
                format: c_int::from(*format),
                channels: info.numchannels,
                frequency: info.defaultfrequency,
                subsounds: c_int::from(*subsounds),
                pcm: pcm.to_vec(),
            });
            FMOD_OK
        }
    }
}

unsafe extern "system" fn fake_sound_release(handle: *mut FmodSoundHandle) -> FmodResult {
    drop_one(&LIVE_SOUNDS);
    drop(Box::from_raw(handle.cast::<FakeSound>()));
    FMOD_OK
}

unsafe extern "system" fn fake_get_num_subsounds(
    handle: *mut FmodSoundHandle,
    count: *mut c_int,
) -> FmodResult {
    *count = sound(handle).subsounds;
    FMOD_OK
}

unsafe extern "system" fn fake_get_subsound(
    handle: *mut FmodSoundHandle,
    index: c_int,
    out: *mut *mut FmodSoundHandle,
) -> FmodResult {
    let parent = sound(handle);
    if !(0..parent.subsounds).contains(&index) {
        return FAKE_ERR_INVALID_PARAM;
    }
    *out = new_sound(FakeSound {
        subsounds: 0,
        ..parent.clone()
    });
    FMOD_OK
}

unsafe extern "system" fn fake_get_format(
    handle: *mut FmodSoundHandle,
    sound_type: *mut c_int,
    format: *mut c_int,
    channels: *mut c_int,
    bits: *mut c_int,
) -> FmodResult {
    let sound = sound(handle);
    *sound_type = 0;
    *format = sound.format;
    *channels = sound.channels;
    *bits = SoundFormat::from_raw(sound.format)
        .and_then(SoundFormat::bits)
        .map_or(0, c_int::from);
    FMOD_OK
}

unsafe extern "system" fn fake_get_defaults(
    handle: *mut FmodSoundHandle,
    frequency: *mut c_float,
    priority: *mut c_int,
) -> FmodResult {
    *frequency = sound(handle).frequency as c_float;
    *priority = 128;
    FMOD_OK
}

unsafe extern "system" fn fake_get_length(
    handle: *mut FmodSoundHandle,
    length: *mut c_uint,
    time_unit: c_uint,
) -> FmodResult {
    if time_unit != FMOD_TIMEUNIT_PCMBYTES {
        return FAKE_ERR_INVALID_PARAM;
    }
    *length = sound(handle).pcm.len() as c_uint;
    FMOD_OK
}

unsafe extern "system" fn fake_lock(
    handle: *mut FmodSoundHandle,
    offset: c_uint,
    length: c_uint,
    ptr1: *mut *mut c_void,
    ptr2: *mut *mut c_void,
    len1: *mut c_uint,
    len2: *mut c_uint,
) -> FmodResult {
    bump(&LOCK_CALLS);
    let pcm = &mut sound(handle).pcm;
    let (offset, length) = (offset as usize, length as usize);
    if offset + length > pcm.len() {
        return FAKE_ERR_INVALID_PARAM;
    }
    bump(&LIVE_LOCKS);
    let start = pcm.as_mut_ptr().add(offset);
    let split = (length / 2) & !3;
    *ptr1 = start.cast();
    *len1 = split as c_uint;
    if length > split {
        *ptr2 = start.add(split).cast();
        *len2 = (length - split) as c_uint;
    } else {
        *ptr2 = core::ptr::null_mut();
        *len2 = 0;
    }
    FMOD_OK
}

unsafe extern "system" fn fake_unlock(
    _handle: *mut FmodSoundHandle,
    _ptr1: *mut c_void,
    _ptr2: *mut c_void,
    _len1: c_uint,
    _len2: c_uint,
) -> FmodResult {
    drop_one(&LIVE_LOCKS);
    FMOD_OK
}
