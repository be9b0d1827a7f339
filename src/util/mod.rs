//! Shared utility helpers.

pub mod error;
pub(crate) mod trace;

pub use error::{LogoLocError, LogoLocResult};
