//! A minimal smoothed-gain plugin exercising the full framework: parameter declaration through
//! `#[derive(Params)]`, block processing through `ProcessContext`, and state save/load.

use std::num::NonZeroU32;

use zplugin::prelude::*;
use zplugin::util::db_to_gain;

#[derive(Params)]
struct GainParams {
    #[param(kind = "continuous", id = "gain", name = "Gain", default = 0.0, min = -30.0, max = 30.0, unit = " dB", smoothing = "linear", smoothing_ms = 50.0)]
    gain: (),

    #[param(kind = "boolean", id = "bypass", name = "Bypass", default = false)]
    bypass: (),
}

#[derive(Default)]
pub struct Gain;

impl Plugin for Gain {
    type Params = GainParams;

    const NAME: &'static str = "Gain";
    const VENDOR: &'static str = "ZPlugin contributors";
    const URL: &'static str = "https://example.com/zplugin";
    const VERSION: &'static str = "0.1.0";
    const PLUGIN_ID: &'static str = "com.zplugin.gain";

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        ..AudioIOLayout::const_default()
    }];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    fn init(&mut self, _layout: &AudioIOLayout, _config: &BufferConfig) -> bool {
        true
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        context: &mut ProcessContext,
    ) -> ProcessStatus {
        let bypassed = context.get_bool(1);

        for mut channel_samples in buffer.iter_samples() {
            let gain = db_to_gain(context.next_smoothed(0));
            if bypassed {
                continue;
            }
            for sample in channel_samples.iter_mut() {
                *sample *= gain;
            }
        }

        ProcessStatus::Normal
    }

    fn save(&self, writer: &mut dyn StateWriter) -> bool {
        let _ = writer;
        true
    }

    fn load(&mut self, reader: &mut dyn StateReader, version: u32) -> bool {
        let _ = (reader, version);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_gain_and_bypass() {
        let decls = GainParams::declarations();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].id(), "gain");
        assert_eq!(decls[1].id(), "bypass");
    }

    #[test]
    fn layout_is_stereo_in_and_out() {
        let layout = Gain::AUDIO_IO_LAYOUTS[0];
        assert_eq!(layout.main_input_channels, NonZeroU32::new(2));
        assert_eq!(layout.main_output_channels, NonZeroU32::new(2));
    }
}
