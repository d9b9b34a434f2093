//! The VST3 wrapper contract (spec §4.4, §4.8): class ID derivation, the COM reference count
//! primitive every exposed interface shares, and the event translation rules between VST3's and
//! the unified event model. The COM vtables themselves (`IComponent`, `IAudioProcessor`,
//! `IEditController`, ...) are ABI plumbing outside the core (spec's Non-goals: "the low-level
//! CLAP/VST3 C ABI type mirrors"); what's here is the logic a VST3 wrapper must get right to honor
//! the core's contracts.

use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam::utils::CachePadded;
use sha2::{Digest, Sha256};

use crate::event::Event;

/// Derive a 16-byte VST3 class ID from a plugin's reverse-DNS `plugin_id`, taking the first 16
/// bytes of its SHA-256 digest. Deterministic, so the same id always yields the same class, and
/// effectively collision-free across unrelated plugin ids.
pub fn derive_class_id(plugin_id: &str) -> [u8; 16] {
    let digest = Sha256::digest(plugin_id.as_bytes());
    let mut class_id = [0u8; 16];
    class_id.copy_from_slice(&digest[..16]);
    class_id
}

/// A cache-line-padded atomic reference count, shared by every COM interface a wrapper object
/// exposes (VST3 requires a single identity behind the several interfaces a component implements,
/// so `IComponent`, `IAudioProcessor`, and `IEditController` all forward to the same count).
pub struct ComRefCount {
    count: CachePadded<AtomicU32>,
}

impl ComRefCount {
    /// A freshly created object starts at a reference count of 1, owned by its creator.
    pub fn new() -> Self {
        Self {
            count: CachePadded::new(AtomicU32::new(1)),
        }
    }

    /// `IUnknown::addRef`: increment and return the new count.
    pub fn add_ref(&self) -> u32 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// `IUnknown::release`: decrement and return the new count. The caller drops the object once
    /// this reaches 0.
    pub fn release(&self) -> u32 {
        self.count.fetch_sub(1, Ordering::AcqRel) - 1
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for ComRefCount {
    fn default() -> Self {
        Self::new()
    }
}

/// VST3's note expression type ids, the subset this framework maps onto the unified polyphonic
/// expression variants (spec §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteExpressionType {
    Volume,
    Pan,
    Tuning,
    Vibrato,
    Expression,
    Brightness,
    Pressure,
}

/// Translate a VST3 "note expression value" event into the corresponding unified polyphonic
/// expression event. VST3 does not carry a channel or note number for these events, so both
/// default to 0 (spec §4.4).
pub fn note_expression_to_event(
    expression_type: NoteExpressionType,
    timing: u32,
    voice_id: Option<i32>,
    value: f32,
) -> Event {
    match expression_type {
        NoteExpressionType::Volume => Event::volume(timing, voice_id, 0, 0, value),
        NoteExpressionType::Pan => Event::pan(timing, voice_id, 0, 0, value),
        NoteExpressionType::Tuning => Event::tuning(timing, voice_id, 0, 0, value),
        NoteExpressionType::Vibrato => Event::vibrato(timing, voice_id, 0, 0, value),
        NoteExpressionType::Expression => Event::expression(timing, voice_id, 0, 0, value),
        NoteExpressionType::Brightness => Event::brightness(timing, voice_id, 0, 0, value),
        NoteExpressionType::Pressure => Event::pressure(timing, voice_id, 0, 0, value),
    }
}

/// Whether an author-emitted output event has a VST3 equivalent. `voice_terminated`, `choke`, and
/// the channel MIDI variants are dropped on the way out, since VST3 has no direct equivalent for
/// them (spec §4.4); everything else maps symmetrically.
pub fn has_vst3_output_equivalent(event: &Event) -> bool {
    !matches!(
        event,
        Event::VoiceTerminated { .. }
            | Event::Choke { .. }
            | Event::Cc { .. }
            | Event::ChannelPressure { .. }
            | Event::PitchBend { .. }
            | Event::ProgramChange { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_id_is_deterministic() {
        assert_eq!(
            derive_class_id("com.zplugin.gain"),
            derive_class_id("com.zplugin.gain")
        );
    }

    #[test]
    fn class_id_differs_across_plugins() {
        assert_ne!(
            derive_class_id("com.zplugin.gain"),
            derive_class_id("com.zplugin.delay")
        );
    }

    #[test]
    fn ref_count_tracks_add_and_release() {
        let refs = ComRefCount::new();
        assert_eq!(refs.count(), 1);
        assert_eq!(refs.add_ref(), 2);
        assert_eq!(refs.release(), 1);
        assert_eq!(refs.release(), 0);
    }

    #[test]
    fn note_expression_defaults_channel_and_note_to_zero() {
        let event = note_expression_to_event(NoteExpressionType::Pressure, 10, Some(3), 0.5);
        match event {
            Event::Pressure {
                timing,
                voice_id,
                channel,
                note,
                value,
            } => {
                assert_eq!(timing, 10);
                assert_eq!(voice_id, Some(3));
                assert_eq!(channel, 0);
                assert_eq!(note, 0);
                assert_eq!(value, 0.5);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn voice_terminated_choke_and_channel_midi_are_dropped_on_output() {
        assert!(!has_vst3_output_equivalent(&Event::voice_terminated(0, None, 0, 60)));
        assert!(!has_vst3_output_equivalent(&Event::choke(0, None, 0, 60)));
        assert!(!has_vst3_output_equivalent(&Event::cc(0, 0, 1, 0.5)));
        assert!(!has_vst3_output_equivalent(&Event::channel_pressure(0, 0, 0.5)));
        assert!(!has_vst3_output_equivalent(&Event::pitch_bend(0, 0, 0.5)));
        assert!(!has_vst3_output_equivalent(&Event::program_change(0, 0, 1)));
    }

    #[test]
    fn note_on_off_and_poly_pressure_have_vst3_equivalents() {
        assert!(has_vst3_output_equivalent(&Event::note_on(0, None, 0, 60, 1.0)));
        assert!(has_vst3_output_equivalent(&Event::note_off(0, None, 0, 60, 0.0)));
        assert!(has_vst3_output_equivalent(&Event::pressure(0, None, 0, 60, 0.5)));
    }
}
