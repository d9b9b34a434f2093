//! The author-facing plugin contract (C6, spec §4.6): the trait a DSP author implements, validated
//! at compile time to provide metadata, an audio I/O layout, a parameter declaration, and the
//! `init`/`deinit`/`process` lifecycle.

use crate::audio_setup::{AudioIOLayout, AuxiliaryBuffers, BufferConfig};
use crate::buffer::Buffer;
use crate::context::{ProcessContext, ProcessStatus};
use crate::params::Params;
use crate::state::{StateReader, StateWriter};

/// Whether and how a plugin receives or sends MIDI note and channel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidiConfig {
    /// No MIDI events are exchanged.
    #[default]
    None,
    /// Note on/off, choke, polyphonic expression, and channel MIDI events are exchanged.
    Basic,
}

/// Basic functionality that needs to be implemented by a plugin. The framework validates at
/// compile time that a conforming type provides metadata, an audio I/O layout, a parameter
/// declaration, and the `init`/`deinit`/`process` lifecycle (spec §4.6).
pub trait Plugin: Default + Send + Sync + 'static {
    /// The type whose `#[derive(Params)]` implementation supplies this plugin's parameter
    /// declarations. The framework builds the atomic runtime store from `Self::Params` once, kept
    /// alongside the plugin instance by the wrapper; the author reaches it through
    /// [`ProcessContext`] rather than owning it directly.
    type Params: Params;

    const NAME: &'static str;
    const VENDOR: &'static str;
    const URL: &'static str;
    /// Semver-compatible version string (e.g. `"0.1.0"`). Hosts generally don't parse this, but it
    /// should only contain digits and dots just in case.
    const VERSION: &'static str;
    /// A reverse-DNS-style identifier unique to this plugin (e.g. `"com.example.gain"`), used to
    /// derive the VST3 class ID and the CLAP plugin id.
    const PLUGIN_ID: &'static str;

    /// The audio I/O configurations this plugin supports, in preference order. The first layout is
    /// the default; a host may pick a different one from the list.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    /// The version written into the state envelope's header, passed back to [`Plugin::load()`] for
    /// migration.
    const STATE_VERSION: u32 = 1;
    /// Whether the wrapper should refuse to load a state envelope written by a newer version than
    /// [`Plugin::STATE_VERSION`], instead of passing it through to [`Plugin::load()`] for the
    /// author to handle. Defaults to `false`, since most plugins never bump their version and a
    /// hard rejection would break otherwise-harmless loads.
    const STRICT_STATE_VERSIONING: bool = false;
    /// Whether the wrapper should split process blocks at parameter automation change points
    /// instead of applying automation at the block boundary.
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    /// Whether this plugin supports the given audio I/O layout. The default implementation accepts
    /// any layout present in [`Plugin::AUDIO_IO_LAYOUTS`]; override for finer-grained checks (e.g.
    /// matching sidechain channel counts at activation time).
    fn accepts_layout(layout: &AudioIOLayout) -> bool {
        Self::AUDIO_IO_LAYOUTS.contains(layout)
    }

    /// Initialize the plugin for the given layout and buffer configuration. Returning `false` fails
    /// activation. Expensive setup (allocations, loading resources) belongs here, not in
    /// [`Default::default()`].
    fn init(&mut self, layout: &AudioIOLayout, config: &BufferConfig) -> bool {
        let _ = (layout, config);
        true
    }

    /// Called when the plugin is deactivated. The default does nothing.
    fn deinit(&mut self) {}

    /// Called when the host flushes the plugin's internal state (e.g. after a parameter change
    /// while not processing, or when restarting playback). The default does nothing; plugins with
    /// internal state that would otherwise click (filters, delay lines) should clear it here.
    fn reset(&mut self) {}

    /// Process a block of audio. `aux` carries any sidechain input/output buffers declared in the
    /// active [`AudioIOLayout`]. See [`ProcessStatus`] for what to return.
    fn process(
        &mut self,
        buffer: &mut Buffer,
        aux: &mut AuxiliaryBuffers,
        context: &mut ProcessContext,
    ) -> ProcessStatus;

    /// Write this plugin's author-defined state extension into the state envelope, after the
    /// framework has already written the per-parameter normalized values. Returning `false` aborts
    /// the save. The default writes nothing.
    fn save(&self, writer: &mut dyn StateWriter) -> bool {
        let _ = writer;
        true
    }

    /// Read this plugin's author-defined state extension back from the state envelope, after the
    /// framework has already restored the per-parameter normalized values. `version` is the
    /// envelope's stored version, for migrating older formats. Returning `false` aborts the load.
    /// The default reads nothing.
    fn load(&mut self, reader: &mut dyn StateReader, version: u32) -> bool {
        let _ = (reader, version);
        true
    }
}
