//! Core XML reading primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: predefined and numeric reference decoding with Cow
//! - Encoding: UTF-8/UTF-16 detection and conversion to UTF-8

pub mod encoding;
pub mod entities;
pub mod scanner;
