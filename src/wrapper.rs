//! Contracts shared by the CLAP and VST3 wrappers (spec §4.8): the logic each format's wrapper
//! must implement on top of the core to honor automation scheduling, value formatting, and bundle
//! packaging. The wrappers' own ABI/COM plumbing is outside the core, per spec's Non-goals.

pub mod bundle;
pub mod clap;
#[cfg(feature = "vst3")]
pub mod vst3;
