//! Infrared remote receiver library.
//!
//! A GPIO edge interrupt timestamps every level change into a lock-free
//! [`CircularLog`]; the main loop drains it through a [`Reader`], which
//! runs a protocol [`Decoder`] (NEC today) and resynchronizes on garbage.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, so everything else runs and is tested on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod capture;
pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod pins;
pub mod reader;
pub mod timing;

pub use capture::CircularLog;
pub use config::ReaderConfig;
pub use decode::{DecodeOutcome, Decoder, Frame, FrameKind, NecCommand, NecDecoder};
pub use error::{EdgeError, Error};
pub use reader::Reader;
pub use timing::{Coarse, Fine, PrecisionProfile};
