//! Decoding in-memory sounds with the FMOD runtime and packaging them as WAV.
//!
//! An FMOD system must not be used from two threads at once. [`FmodToolkit`] keeps one
//! system per `(channels, init flags)` pair, each behind its own mutex, and holds that
//! mutex for the whole of a [`FmodToolkit::raw_to_wav`] call. Sounds, subsounds and
//! sample locks are guards that release their native counterpart when dropped, so an
//! error part way through leaves nothing locked or allocated.

use crate::error::WavError;
use crate::format::{SoundFormat, SoundInfo};
use crate::wav::{subsound_to_wav, wav_file_name, WavFile};
use core::ffi::{c_float, c_int, c_uint, c_void};
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use core::slice;
use log::{debug, warn};
use native_codec_bridge::native::entry::{
    FmodCreateSoundExInfo, FmodEntryPoints, FmodResult, FmodSoundHandle, FmodSystemHandle,
    FMOD_CREATE_SOUND_SYMBOL, FMOD_GET_DEFAULTS_SYMBOL, FMOD_GET_FORMAT_SYMBOL,
    FMOD_GET_LENGTH_SYMBOL, FMOD_GET_NUM_SUBSOUNDS_SYMBOL, FMOD_GET_SUBSOUND_SYMBOL,
    FMOD_HEADER_VERSION, FMOD_INIT_NORMAL, FMOD_OK, FMOD_OPENMEMORY, FMOD_SOUND_LOCK_SYMBOL,
    FMOD_SOUND_RELEASE_SYMBOL, FMOD_SOUND_UNLOCK_SYMBOL, FMOD_SYSTEM_CREATE_SYMBOL,
    FMOD_SYSTEM_INIT_SYMBOL, FMOD_SYSTEM_RELEASE_SYMBOL, FMOD_TIMEUNIT_PCMBYTES,
};
use native_codec_bridge::CodecBridge;
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// Converts an `FMOD_RESULT` into an error naming the call.
fn check(call: &'static str, result: FmodResult) -> Result<(), WavError> {
    match result {
        FMOD_OK => Ok(()),
        result => Err(WavError::Fmod { call, result }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SystemKey {
    channels: c_int,
    init_flags: c_uint,
}

/// An initialized FMOD system, released on drop.
struct FmodSystem {
    handle: NonNull<FmodSystemHandle>,
    entry: FmodEntryPoints,
}

// Safety: the handle is owned exclusively and only used behind the toolkit's per-system mutex.
unsafe impl Send for FmodSystem {}

impl FmodSystem {
    fn create(entry: FmodEntryPoints, header_version: c_uint, key: SystemKey) -> Result<Self, WavError> {
        let mut raw = ptr::null_mut();
        // Safety: `raw` is a valid out pointer.
        let result = unsafe { (entry.system_create)(&mut raw, header_version) };
        check(FMOD_SYSTEM_CREATE_SYMBOL, result)?;
        let handle = NonNull::new(raw).ok_or(WavError::NullHandle(FMOD_SYSTEM_CREATE_SYMBOL))?;
        let system = Self { handle, entry };

        // Safety: the handle is live; if init fails, `system` releases it on return.
        let result = unsafe {
            (entry.system_init)(handle.as_ptr(), key.channels, key.init_flags, ptr::null_mut())
        };
        check(FMOD_SYSTEM_INIT_SYMBOL, result)?;
        debug!(
            "created FMOD system for {} channels, init flags {:#x}",
            key.channels, key.init_flags
        );
        Ok(system)
    }

    /// Opens `raw` as an in-memory sound.
    fn create_sound(
        &mut self,
        raw: &[u8],
        length: c_uint,
        channels: c_int,
        frequency: c_int,
    ) -> Result<Sound<'_>, WavError> {
        let mut exinfo = FmodCreateSoundExInfo::new(length, channels, frequency);
        let mut sound = ptr::null_mut();
        // Safety: `raw` holds `length` bytes and FMOD_OPENMEMORY copies them before returning.
        let result = unsafe {
            (self.entry.create_sound)(
                self.handle.as_ptr(),
                raw.as_ptr().cast(),
                FMOD_OPENMEMORY,
                &mut exinfo,
                &mut sound,
            )
        };
        check(FMOD_CREATE_SOUND_SYMBOL, result)?;
        Sound::from_raw(sound, self.entry, FMOD_CREATE_SOUND_SYMBOL)
    }
}

impl Drop for FmodSystem {
    fn drop(&mut self) {
        // Safety: the handle came from `FMOD_System_Create` and is released exactly once.
        let result = unsafe { (self.entry.system_release)(self.handle.as_ptr()) };
        if let Err(e) = check(FMOD_SYSTEM_RELEASE_SYMBOL, result) {
            warn!("{e}");
        }
    }
}

/// A sound or subsound, released on drop. Cannot outlive the system that created it.
struct Sound<'a> {
    handle: NonNull<FmodSoundHandle>,
    entry: FmodEntryPoints,
    _owner: PhantomData<&'a ()>,
}

impl<'a> Sound<'a> {
    fn from_raw(
        raw: *mut FmodSoundHandle,
        entry: FmodEntryPoints,
        call: &'static str,
    ) -> Result<Self, WavError> {
        let handle = NonNull::new(raw).ok_or(WavError::NullHandle(call))?;
        Ok(Self {
            handle,
            entry,
            _owner: PhantomData,
        })
    }

    fn subsound_count(&self) -> Result<c_int, WavError> {
        let mut count: c_int = 0;
        // Safety: the handle is live and `count` is a valid out pointer.
        let result = unsafe { (self.entry.get_num_subsounds)(self.handle.as_ptr(), &mut count) };
        check(FMOD_GET_NUM_SUBSOUNDS_SYMBOL, result)?;
        Ok(count)
    }

    fn subsound(&self, index: c_int) -> Result<Sound<'_>, WavError> {
        let mut raw = ptr::null_mut();
        // Safety: as above.
        let result = unsafe { (self.entry.get_subsound)(self.handle.as_ptr(), index, &mut raw) };
        check(FMOD_GET_SUBSOUND_SYMBOL, result)?;
        Sound::from_raw(raw, self.entry, FMOD_GET_SUBSOUND_SYMBOL)
    }

    /// Reads the sample format, channel count, default frequency and PCM length.
    fn info(&self) -> Result<SoundInfo, WavError> {
        let handle = self.handle.as_ptr();
        let (mut sound_type, mut format, mut channels, mut bits): (c_int, c_int, c_int, c_int) =
            (0, 0, 0, 0);
        // Safety: the handle is live and every out pointer is valid.
        let result = unsafe {
            (self.entry.get_format)(handle, &mut sound_type, &mut format, &mut channels, &mut bits)
        };
        check(FMOD_GET_FORMAT_SYMBOL, result)?;

        let mut frequency: c_float = 0.0;
        let mut priority: c_int = 0;
        // Safety: as above.
        let result = unsafe { (self.entry.get_defaults)(handle, &mut frequency, &mut priority) };
        check(FMOD_GET_DEFAULTS_SYMBOL, result)?;

        let mut pcm_bytes: c_uint = 0;
        // Safety: as above.
        let result =
            unsafe { (self.entry.get_length)(handle, &mut pcm_bytes, FMOD_TIMEUNIT_PCMBYTES) };
        check(FMOD_GET_LENGTH_SYMBOL, result)?;

        let format = SoundFormat::from_raw(format)
            .ok_or_else(|| WavError::InvalidSound(format!("unknown sample format {format}")))?;
        let channels = u16::try_from(channels)
            .map_err(|_| WavError::InvalidSound(format!("{channels} channels")))?;
        Ok(SoundInfo::new(format, channels, sample_rate(frequency)?, pcm_bytes))
    }

    /// Locks the first `length` bytes of sample data for reading.
    fn lock(&self, length: c_uint) -> Result<SampleLock<'_>, WavError> {
        let mut ptrs: [*mut c_void; 2] = [ptr::null_mut(); 2];
        let mut lens: [c_uint; 2] = [0; 2];
        let [ptr1, ptr2] = &mut ptrs;
        let [len1, len2] = &mut lens;
        // Safety: the handle is live and every out pointer is valid.
        let result = unsafe {
            (self.entry.lock)(self.handle.as_ptr(), 0, length, ptr1, ptr2, len1, len2)
        };
        check(FMOD_SOUND_LOCK_SYMBOL, result)?;
        Ok(SampleLock {
            handle: self.handle,
            entry: self.entry,
            ptrs,
            lens,
            _sound: PhantomData,
        })
    }
}

impl Drop for Sound<'_> {
    fn drop(&mut self) {
        // Safety: the handle came from FMOD and is released exactly once.
        let result = unsafe { (self.entry.sound_release)(self.handle.as_ptr()) };
        if let Err(e) = check(FMOD_SOUND_RELEASE_SYMBOL, result) {
            warn!("{e}");
        }
    }
}

/// Locked sample data, unlocked on drop. FMOD may hand the range out as two parts.
struct SampleLock<'a> {
    handle: NonNull<FmodSoundHandle>,
    entry: FmodEntryPoints,
    ptrs: [*mut c_void; 2],
    lens: [c_uint; 2],
    _sound: PhantomData<&'a ()>,
}

impl SampleLock<'_> {
    fn chunks(&self) -> Vec<&[u8]> {
        self.ptrs
            .iter()
            .zip(self.lens)
            .filter(|(ptr, len)| !ptr.is_null() && *len > 0)
            // Safety: FMOD keeps `len` bytes readable at `ptr` until the range is unlocked.
            .map(|(ptr, len)| unsafe { slice::from_raw_parts(ptr.cast::<u8>(), len as usize) })
            .collect()
    }
}

impl Drop for SampleLock<'_> {
    fn drop(&mut self) {
        let [ptr1, ptr2] = self.ptrs;
        let [len1, len2] = self.lens;
        // Safety: unlocks exactly what `FMOD_Sound_Lock` handed out.
        let result = unsafe { (self.entry.unlock)(self.handle.as_ptr(), ptr1, ptr2, len1, len2) };
        if let Err(e) = check(FMOD_SOUND_UNLOCK_SYMBOL, result) {
            warn!("{e}");
        }
    }
}

fn sample_rate(frequency: c_float) -> Result<u32, WavError> {
    if frequency.is_finite() && (0.0..=u32::MAX as c_float).contains(&frequency) {
        // Truncates toward zero.
        Ok(frequency as u32)
    } else {
        Err(WavError::InvalidSound(format!("default frequency {frequency}")))
    }
}

/// Builds one sound's WAV file. The format is checked before the samples are locked.
fn export(sound: &Sound<'_>, convert_float: bool) -> Result<Vec<u8>, WavError> {
    let info = sound.info()?;
    if info.format.bits().is_none() {
        return Err(WavError::UnsupportedFormat(info.format));
    }
    if info.pcm_bytes == 0 {
        return subsound_to_wav(&info, &[], convert_float);
    }
    let lock = sound.lock(info.pcm_bytes)?;
    subsound_to_wav(&info, &lock.chunks(), convert_float)
}

/// Exports each subsound, or the sound itself when it has none.
fn export_all(sound: &Sound<'_>, name: &str, convert_float: bool) -> Result<Vec<WavFile>, WavError> {
    let count = sound.subsound_count()?;
    if count <= 0 {
        return Ok(vec![WavFile {
            name: wav_file_name(name, 0),
            data: export(sound, convert_float)?,
        }]);
    }
    (0..count)
        .map(|index| {
            let subsound = sound.subsound(index)?;
            Ok(WavFile {
                name: wav_file_name(name, index as usize),
                data: export(&subsound, convert_float)?,
            })
        })
        .collect()
}

/// Decodes sounds through the FMOD runtime of a [`CodecBridge`].
///
/// Systems are created on first use and released when the toolkit is dropped. The
/// toolkit is `Sync`: calls with different channel counts run in parallel, calls that
/// share a system are serialized.
pub struct FmodToolkit<'lib> {
    entry: FmodEntryPoints,
    header_version: c_uint,
    init_flags: c_uint,
    systems: Mutex<HashMap<SystemKey, Arc<Mutex<FmodSystem>>>>,
    _library: PhantomData<&'lib CodecBridge>,
}

impl<'lib> FmodToolkit<'lib> {
    /// Uses the FMOD runtime loaded by `bridge`, with `FMOD_INIT_NORMAL`.
    ///
    /// # Errors
    ///
    /// [`WavError::Codec`] if the bridge has no FMOD runtime.
    pub fn new(bridge: &'lib CodecBridge) -> Result<Self, WavError> {
        Ok(Self {
            entry: bridge.fmod_entry_points()?,
            header_version: FMOD_HEADER_VERSION,
            init_flags: FMOD_INIT_NORMAL,
            systems: Mutex::default(),
            _library: PhantomData,
        })
    }

    /// Sets the `FMOD_VERSION` passed to `FMOD_System_Create`; it must match the runtime.
    pub fn with_header_version(mut self, header_version: u32) -> Self {
        self.header_version = header_version;
        self
    }

    /// Sets the `FMOD_INITFLAGS` new systems are initialized with.
    pub fn with_init_flags(mut self, init_flags: u32) -> Self {
        self.init_flags = init_flags;
        self
    }

    /// Number of systems created so far.
    pub fn system_count(&self) -> usize {
        self.systems.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Opens `raw` with FMOD and writes every subsound as a WAV file.
    ///
    /// `channels` and `frequency` describe raw PCM input and select the cached system.
    /// Files are named as by [`wav_file_name`]. Float PCM is converted to 16-bit when
    /// `convert_float` is set.
    ///
    /// # Errors
    ///
    /// - [`WavError::NoChannels`] if `channels` is zero
    /// - [`WavError::TooLarge`] if `raw` does not fit FMOD's 32-bit length
    /// - [`WavError::Fmod`] / [`WavError::NullHandle`] if an FMOD call fails
    /// - the errors of [`subsound_to_wav`] for each subsound
    pub fn raw_to_wav(
        &self,
        raw: &[u8],
        name: &str,
        channels: u16,
        frequency: u32,
        convert_float: bool,
    ) -> Result<Vec<WavFile>, WavError> {
        if channels == 0 {
            return Err(WavError::NoChannels);
        }
        let length = c_uint::try_from(raw.len()).map_err(|_| WavError::TooLarge(raw.len()))?;
        let frequency = c_int::try_from(frequency)
            .map_err(|_| WavError::InvalidSound(format!("sample rate {frequency}")))?;
        let channels = c_int::from(channels);

        let system = self.system(channels)?;
        let mut guard = system.lock().unwrap_or_else(PoisonError::into_inner);
        let sound = guard.create_sound(raw, length, channels, frequency)?;
        let files = export_all(&sound, name, convert_float)?;
        debug!("{name}: exported {} WAV file(s) from {length} bytes", files.len());
        Ok(files)
    }

    /// The cached system for `channels`, created on first use.
    fn system(&self, channels: c_int) -> Result<Arc<Mutex<FmodSystem>>, WavError> {
        let key = SystemKey {
            channels,
            init_flags: self.init_flags,
        };
        let mut systems = self.systems.lock().unwrap_or_else(PoisonError::into_inner);
        let system = match systems.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let system = FmodSystem::create(self.entry, self.header_version, key)?;
                entry.insert(Arc::new(Mutex::new(system)))
            }
        };
        Ok(Arc::clone(system))
    }
}

impl core::fmt::Debug for FmodToolkit<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FmodToolkit")
            .field("header_version", &self.header_version)
            .field("init_flags", &self.init_flags)
            .field("systems", &self.system_count())
            .finish_non_exhaustive()
    }
}
