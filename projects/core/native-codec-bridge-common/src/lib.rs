#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! Code shared between the native codec bridge crates.
//!
//! - [`allocate`]: 64-byte aligned output buffers handed to native entry points.
//! - [`pixels`]: The 32-bit pixel layouts codecs consume and produce.

pub mod allocate;
pub mod pixels;
