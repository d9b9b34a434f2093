//! Debug-only assertions and logging helpers for the audio actor.
//!
//! These compile to nothing outside of debug builds so that invariant checks never cost
//! audio-actor cycles in a release build, while still surfacing the failure through the
//! `log` facade (rather than panicking) when they do fire.

/// Like `debug_assert!`, but logs through [`log::debug!`] instead of panicking.
#[macro_export]
macro_rules! zplugin_debug_assert {
    ($cond:expr $(,)?) => (
        if cfg!(debug_assertions) && !$cond {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($cond)));
        }
    );
    ($cond:expr, $format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) && !$cond {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($cond), ", ", $format), $($($args)*)?);
        }
    );
}
pub use zplugin_debug_assert;

/// Like `debug_assert_eq!`, but logs through [`log::debug!`] instead of panicking.
#[macro_export]
macro_rules! zplugin_debug_assert_eq {
    ($left:expr, $right:expr $(,)?) => (
        if cfg!(debug_assertions) && $left != $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " != ", stringify!($right)));
        }
    );
    ($left:expr, $right:expr, $format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) && $left != $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " != ", stringify!($right), ", ", $format), $($($args)*)?);
        }
    );
}
pub use zplugin_debug_assert_eq;

/// Like `debug_assert_ne!`, but logs through [`log::debug!`] instead of panicking.
#[macro_export]
macro_rules! zplugin_debug_assert_ne {
    ($left:expr, $right:expr $(,)?) => (
        if cfg!(debug_assertions) && $left == $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " == ", stringify!($right)));
        }
    );
    ($left:expr, $right:expr, $format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) && $left == $right {
            $crate::log::debug!(concat!("Debug assertion failed: ", stringify!($left), " == ", stringify!($right), ", ", $format), $($($args)*)?);
        }
    );
}
pub use zplugin_debug_assert_ne;

/// An unconditional debug assertion failure, for when the condition has already been
/// checked elsewhere.
#[macro_export]
macro_rules! zplugin_debug_assert_failure {
    () => (
        if cfg!(debug_assertions) {
            $crate::log::debug!("Debug assertion failed");
        }
    );
    ($format:expr $(, $($args:tt)*)?) => (
        if cfg!(debug_assertions) {
            $crate::log::debug!(concat!("Debug assertion failed: ", $format), $($($args)*)?);
        }
    );
}
pub use zplugin_debug_assert_failure;
