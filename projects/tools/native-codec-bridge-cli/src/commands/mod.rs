pub mod compress;
pub mod decompress;
pub mod fmod_wav;
pub mod list;
pub mod sizes;
pub mod unpack_crunch;
pub mod wav;
