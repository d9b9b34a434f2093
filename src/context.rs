//! The process contract (C6, C7): the `ProcessContext` the author's `process()` receives, the
//! `Transport` it exposes, and the `ProcessStatus` the author returns.

use crate::event::Event;
use crate::params::ParamRuntime;

/// What the author's `process()` returns, telling the wrapper how to treat the plugin's output
/// and tail behavior (spec §4.6).
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessStatus {
    /// Audio was processed as normal.
    Normal,
    /// The plugin produced silence and the wrapper may skip calling `process()` until there is
    /// new input (e.g. incoming events or non-silent audio).
    Silence,
    /// The plugin has a finite tail of `samples` after its input goes silent and should keep
    /// being called for that long.
    Tail(u32),
    /// The plugin always needs to keep processing, even on silent input (e.g. a synth with a free
    /// running LFO, or a reverb that never fully decays).
    KeepAlive,
    /// Processing failed. The message is surfaced to the host's log where possible.
    Err(String),
}

/// Host-provided playback timeline information (spec §4.7). All position/loop/tempo fields are
/// optional since hosts vary in what they report; an all-`None`, non-playing transport is a legal
/// default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    /// Whether the transport is currently running.
    pub playing: bool,
    /// Whether recording is armed in the host project.
    pub recording: bool,
    /// Whether the host's loop is currently active.
    pub looping: bool,

    /// The sample rate in Hertz.
    pub sample_rate: f32,
    /// The project's tempo in beats per minute.
    pub tempo: Option<f64>,
    /// The time signature's numerator.
    pub time_sig_numerator: Option<i32>,
    /// The time signature's denominator.
    pub time_sig_denominator: Option<i32>,

    pub(crate) pos_samples: Option<i64>,
    pub(crate) pos_seconds: Option<f64>,
    pub(crate) pos_beats: Option<f64>,
    pub(crate) bar_start_pos_beats: Option<f64>,
    pub(crate) bar_number: Option<i32>,

    pub(crate) loop_range_samples: Option<(i64, i64)>,
    pub(crate) loop_range_seconds: Option<(f64, f64)>,
    pub(crate) loop_range_beats: Option<(f64, f64)>,
}

impl Transport {
    /// An empty transport: not playing, not recording, no position information. A legal default
    /// for a host that reports nothing (spec §4.7).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            playing: false,
            recording: false,
            looping: false,

            sample_rate,
            tempo: None,
            time_sig_numerator: None,
            time_sig_denominator: None,

            pos_samples: None,
            pos_seconds: None,
            pos_beats: None,
            bar_start_pos_beats: None,
            bar_number: None,

            loop_range_samples: None,
            loop_range_seconds: None,
            loop_range_beats: None,
        }
    }

    /// The position in the song in samples. Derived from seconds or beats+tempo if not set
    /// directly.
    pub fn pos_samples(&self) -> Option<i64> {
        match (
            self.pos_samples,
            self.pos_seconds,
            self.pos_beats,
            self.tempo,
        ) {
            (Some(pos_samples), _, _, _) => Some(pos_samples),
            (_, Some(pos_seconds), _, _) => {
                Some((pos_seconds * self.sample_rate as f64).round() as i64)
            }
            (_, _, Some(pos_beats), Some(tempo)) => {
                Some((pos_beats / tempo * 60.0 * self.sample_rate as f64).round() as i64)
            }
            (_, _, _, _) => None,
        }
    }

    /// The position in the song in seconds. Derived from samples or beats+tempo if not set
    /// directly.
    pub fn pos_seconds(&self) -> Option<f64> {
        match (
            self.pos_samples,
            self.pos_seconds,
            self.pos_beats,
            self.tempo,
        ) {
            (_, Some(pos_seconds), _, _) => Some(pos_seconds),
            (Some(pos_samples), _, _, _) => Some(pos_samples as f64 / self.sample_rate as f64),
            (_, _, Some(pos_beats), Some(tempo)) => Some(pos_beats / tempo * 60.0),
            (_, _, _, _) => None,
        }
    }

    /// The position in the song in quarter notes. Derived from samples/seconds+tempo if not set
    /// directly.
    pub fn pos_beats(&self) -> Option<f64> {
        match (
            self.pos_samples,
            self.pos_seconds,
            self.pos_beats,
            self.tempo,
        ) {
            (_, _, Some(pos_beats), _) => Some(pos_beats),
            (_, Some(pos_seconds), _, Some(tempo)) => Some(pos_seconds / 60.0 * tempo),
            (Some(pos_samples), _, _, Some(tempo)) => {
                Some(pos_samples as f64 / self.sample_rate as f64 / 60.0 * tempo)
            }
            (_, _, _, _) => None,
        }
    }

    /// The last bar's start position in beats. Derived from the time signature and beat position
    /// if not set directly.
    pub fn bar_start_pos_beats(&self) -> Option<f64> {
        if self.bar_start_pos_beats.is_some() {
            return self.bar_start_pos_beats;
        }

        match (
            self.time_sig_numerator,
            self.time_sig_denominator,
            self.pos_beats(),
        ) {
            (Some(time_sig_numerator), Some(time_sig_denominator), Some(pos_beats)) => {
                let quarter_note_bar_length =
                    time_sig_numerator as f64 / time_sig_denominator as f64 * 4.0;
                Some((pos_beats / quarter_note_bar_length).floor() * quarter_note_bar_length)
            }
            (_, _, _) => None,
        }
    }

    /// The number of the bar at `bar_start_pos_beats`, starting at 0 for the song's first bar.
    /// Derived if not set directly.
    pub fn bar_number(&self) -> Option<i32> {
        if self.bar_number.is_some() {
            return self.bar_number;
        }

        match (
            self.time_sig_numerator,
            self.time_sig_denominator,
            self.pos_beats(),
        ) {
            (Some(time_sig_numerator), Some(time_sig_denominator), Some(pos_beats)) => {
                let quarter_note_bar_length =
                    time_sig_numerator as f64 / time_sig_denominator as f64 * 4.0;
                Some((pos_beats / quarter_note_bar_length).floor() as i32)
            }
            (_, _, _) => None,
        }
    }

    /// The loop range in samples, end exclusive. Derived from seconds or beats+tempo if not set
    /// directly.
    pub fn loop_range_samples(&self) -> Option<(i64, i64)> {
        match (
            self.loop_range_samples,
            self.loop_range_seconds,
            self.loop_range_beats,
            self.tempo,
        ) {
            (Some(loop_range_samples), _, _, _) => Some(loop_range_samples),
            (_, Some((start_seconds, end_seconds)), _, _) => Some((
                (start_seconds * self.sample_rate as f64).round() as i64,
                (end_seconds * self.sample_rate as f64).round() as i64,
            )),
            (_, _, Some((start_beats, end_beats)), Some(tempo)) => Some((
                (start_beats / tempo * 60.0 * self.sample_rate as f64).round() as i64,
                (end_beats / tempo * 60.0 * self.sample_rate as f64).round() as i64,
            )),
            (_, _, _, _) => None,
        }
    }

    /// The loop range in seconds, end exclusive. Derived from samples or beats+tempo if not set
    /// directly.
    pub fn loop_range_seconds(&self) -> Option<(f64, f64)> {
        match (
            self.loop_range_samples,
            self.loop_range_seconds,
            self.loop_range_beats,
            self.tempo,
        ) {
            (_, Some(loop_range_seconds), _, _) => Some(loop_range_seconds),
            (Some((start_samples, end_samples)), _, _, _) => Some((
                start_samples as f64 / self.sample_rate as f64,
                end_samples as f64 / self.sample_rate as f64,
            )),
            (_, _, Some((start_beats, end_beats)), Some(tempo)) => {
                Some((start_beats / tempo * 60.0, end_beats / tempo * 60.0))
            }
            (_, _, _, _) => None,
        }
    }

    /// The loop range in quarter notes, end exclusive. Derived from samples/seconds+tempo if not
    /// set directly.
    pub fn loop_range_beats(&self) -> Option<(f64, f64)> {
        match (
            self.loop_range_samples,
            self.loop_range_seconds,
            self.loop_range_beats,
            self.tempo,
        ) {
            (_, _, Some(loop_range_beats), _) => Some(loop_range_beats),
            (_, Some((start_seconds, end_seconds)), _, Some(tempo)) => {
                Some((start_seconds / 60.0 * tempo, end_seconds / 60.0 * tempo))
            }
            (Some((start_samples, end_samples)), _, _, Some(tempo)) => Some((
                start_samples as f64 / self.sample_rate as f64 / 60.0 * tempo,
                end_samples as f64 / self.sample_rate as f64 / 60.0 * tempo,
            )),
            (_, _, _, _) => None,
        }
    }
}

/// What the author's `process()` receives (spec §4.6): transport information, the input and
/// output event streams, the sample rate, and typed, index-based parameter access backed by the
/// atomic runtime store.
///
/// A wrong-variant accessor call (e.g. `get_bool` on a continuous parameter's index) is not
/// checked at runtime; `#[derive(Params)]` is expected to make such calls unreachable at compile
/// time.
pub struct ProcessContext<'a> {
    transport: Transport,
    input_events: &'a [Event],
    next_input_event: usize,
    output_events: &'a mut crate::event::OutputEventQueue,
    params: &'a ParamRuntime,
}

impl<'a> ProcessContext<'a> {
    pub fn new(
        transport: Transport,
        input_events: &'a [Event],
        output_events: &'a mut crate::event::OutputEventQueue,
        params: &'a ParamRuntime,
    ) -> Self {
        Self {
            transport,
            input_events,
            next_input_event: 0,
            output_events,
            params,
        }
    }

    /// Information about the current transport position and status.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// The current sample rate in Hertz.
    pub fn sample_rate(&self) -> f32 {
        self.transport.sample_rate
    }

    /// The next input event, in ascending timing order, or `None` once the block is exhausted.
    pub fn next_event(&mut self) -> Option<Event> {
        let event = self.input_events.get(self.next_input_event).copied();
        if event.is_some() {
            self.next_input_event += 1;
        }
        event
    }

    /// Send an event to the host. Fails without effect once the output queue is at capacity.
    pub fn send_event(&mut self, event: Event) -> bool {
        self.output_events.push(event)
    }

    /// A continuous parameter's current plain value, without advancing its smoother.
    pub fn get_float(&self, index: usize) -> f32 {
        self.params.get_float(index)
    }

    /// An integer parameter's current value, without advancing its smoother.
    pub fn get_int(&self, index: usize) -> i32 {
        self.params.get_int(index)
    }

    /// A boolean parameter's current value, without advancing its smoother.
    pub fn get_bool(&self, index: usize) -> bool {
        self.params.get_bool(index)
    }

    /// A choice parameter's current index, without advancing its smoother.
    pub fn get_choice(&self, index: usize) -> usize {
        self.params.get_choice(index)
    }

    /// The audio actor's per-sample smoothed read for a continuous parameter, advancing its
    /// smoother by one sample.
    pub fn next_smoothed(&self, index: usize) -> f32 {
        self.params.next_smoothed(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::OutputEventQueue;
    use crate::params::declaration::{ParamDecl, ParamFlags};
    use crate::params::range::FloatRange;
    use crate::params::smoothing::SmoothingStyle;

    static DECLS: &[ParamDecl] = &[ParamDecl::Continuous {
        name: "Gain",
        id: "gain",
        default: 0.0,
        range: FloatRange::Linear {
            min: -60.0,
            max: 24.0,
        },
        unit: Some(" dB"),
        smoothing: SmoothingStyle::None,
        flags: ParamFlags::AUTOMATABLE,
    }];

    #[test]
    fn empty_transport_is_legal_default() {
        let transport = Transport::new(44_100.0);
        assert!(!transport.playing);
        assert!(!transport.recording);
        assert!(!transport.looping);
        assert_eq!(transport.pos_samples(), None);
        assert_eq!(transport.tempo, None);
    }

    #[test]
    fn transport_derives_samples_from_beats_and_tempo() {
        let mut transport = Transport::new(44_100.0);
        transport.tempo = Some(120.0);
        transport.pos_beats = Some(2.0);
        // 2 quarter notes at 120 bpm is 1 second.
        assert_eq!(transport.pos_seconds(), Some(1.0));
        assert_eq!(transport.pos_samples(), Some(44_100));
    }

    #[test]
    fn next_event_walks_input_in_order() {
        let events = [
            Event::note_on(0, None, 0, 60, 1.0),
            Event::note_on(10, None, 0, 64, 1.0),
        ];
        let mut output = OutputEventQueue::with_capacity(4);
        let params = ParamRuntime::new(DECLS);
        let mut ctx = ProcessContext::new(Transport::new(44_100.0), &events, &mut output, &params);

        assert_eq!(ctx.next_event().map(|e| e.timing()), Some(0));
        assert_eq!(ctx.next_event().map(|e| e.timing()), Some(10));
        assert_eq!(ctx.next_event(), None);
    }

    #[test]
    fn send_event_reaches_output_queue() {
        let events: [Event; 0] = [];
        let mut output = OutputEventQueue::with_capacity(4);
        let params = ParamRuntime::new(DECLS);
        let mut ctx = ProcessContext::new(Transport::new(44_100.0), &events, &mut output, &params);

        assert!(ctx.send_event(Event::note_off(0, None, 0, 60, 0.0)));
        drop(ctx);
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn typed_accessors_read_the_param_store() {
        let events: [Event; 0] = [];
        let mut output = OutputEventQueue::with_capacity(4);
        let params = ParamRuntime::new(DECLS);
        params.set_normalized(0, 1.0, 44_100.0);

        let ctx = ProcessContext::new(Transport::new(44_100.0), &events, &mut output, &params);
        assert_eq!(ctx.get_float(0), 24.0);
    }
}
