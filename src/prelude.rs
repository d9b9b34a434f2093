//! Everything a plugin author needs. Import this with `use zplugin::prelude::*;`.

pub use crate::debug::*;

pub use crate::formatters;
pub use crate::util;

pub use crate::audio_setup::{
    AudioIOLayout, AuxiliaryBuffers, BufferConfig, PortNames, ProcessMode,
};
pub use crate::buffer::Buffer;
pub use crate::context::{ProcessContext, ProcessStatus, Transport};
pub use crate::event::{Event, OutputEventQueue};
pub use crate::params::{
    FloatRange, IntRange, ParamDecl, ParamFlags, ParamRuntime, Params, Smoother, SmoothingStyle,
};
pub use crate::plugin::{MidiConfig, Plugin};
pub use crate::state::{StateError, StateReader, StateWriter};

pub use zplugin_derive::Params;
