#![cfg_attr(feature = "simd", feature(portable_simd))]

// Re-exported so the `zplugin_debug_assert*!` macros can refer to `$crate::log` regardless of
// whether they're expanded inside this crate or a downstream plugin crate.
pub use log;

#[macro_use]
pub mod debug;

/// Everything you'd need to build a plugin. Import this with `use zplugin::prelude::*;`.
pub mod prelude;

// These modules have also been re-exported in the prelude.
pub mod formatters;
pub mod util;

pub mod audio_setup;
pub mod buffer;
pub mod context;
pub mod event;
pub mod params;
pub mod plugin;
pub mod state;
pub mod wrapper;
