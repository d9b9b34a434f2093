//! The parameter system (C1, C2): declarations, ranges, smoothing, and the atomic runtime store
//! that bridges the main and audio actors.
//!
//! A plugin's parameters are declared once, as a `&'static [ParamDecl]` built by a
//! `#[derive(Params)]` struct (see [`internals::Params`]), and given atomic, lock-free storage
//! at runtime by [`store::ParamRuntime`].

pub mod declaration;
pub mod internals;
pub mod lookup;
pub mod range;
pub mod smoothing;
pub mod store;

pub use declaration::{ParamDecl, ParamFlags};
pub use internals::Params;
pub use range::{FloatRange, IntRange};
pub use smoothing::{Smoother, SmoothingStyle};
pub use store::ParamRuntime;
