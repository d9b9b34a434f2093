//! The CLAP wrapper contract (C8, spec §4.8): sample-accurate vs. block-boundary automation
//! scheduling, and the stream bridge for the state envelope. The exported factory symbol itself
//! (`clap_entry`) and the full `clap_plugin` processing vtable are build-system/ABI plumbing that
//! sits outside the core (spec's Non-goals: "the low-level CLAP/VST3 C ABI type mirrors"); what's
//! here is the logic a CLAP wrapper must get right to honor the core's contracts.

use crate::params::ParamRuntime;
use crate::state::{StateReader, StateWriter};

#[cfg(feature = "clap")]
use clap_sys::stream::{clap_istream, clap_ostream};
#[cfg(feature = "clap")]
use std::os::raw::c_void;

/// A single parameter automation event delivered inline with an audio block, as CLAP carries
/// them: a stable id hash, a new normalized value, and a sample-accurate timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationEvent {
    pub timing: u32,
    pub id_hash: u32,
    pub normalized_value: f32,
}

/// The distinct, ascending, nonzero timings at which `events` change a parameter. A wrapper with
/// `sample_accurate_automation` enabled splits its block at each of these offsets (spec §4.8);
/// one with it disabled applies every event at the block boundary instead and never calls this.
pub fn split_points(events: &[AutomationEvent]) -> Vec<u32> {
    let mut points: Vec<u32> = events.iter().map(|event| event.timing).filter(|&t| t > 0).collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// Apply every event timed at or before `up_to_timing` to the parameter store, looking each one
/// up by its id hash via `index_of`. Events whose hash isn't found are silently skipped (the host
/// sent an id the plugin doesn't declare).
pub fn apply_up_to(
    params: &ParamRuntime,
    index_of: impl Fn(u32) -> Option<usize>,
    sample_rate: f32,
    events: &[AutomationEvent],
    up_to_timing: u32,
) {
    for event in events {
        if event.timing <= up_to_timing {
            if let Some(index) = index_of(event.id_hash) {
                params.set_normalized(index, event.normalized_value, sample_rate);
            }
        }
    }
}

#[cfg(feature = "clap")]
impl StateWriter for clap_ostream {
    fn write(&mut self, buf: &[u8]) -> usize {
        let written = unsafe {
            match self.write {
                Some(write) => write(self, buf.as_ptr() as *const c_void, buf.len() as u64),
                None => return 0,
            }
        };
        written.max(0) as usize
    }
}

#[cfg(feature = "clap")]
impl StateReader for clap_istream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let read = unsafe {
            match self.read {
                Some(read) => read(self, buf.as_mut_ptr() as *mut c_void, buf.len() as u64),
                None => return 0,
            }
        };
        read.max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::declaration::{ParamDecl, ParamFlags};
    use crate::params::range::FloatRange;
    use crate::params::smoothing::SmoothingStyle;
    use crate::util::fnv1a32;

    static DECLS: &[ParamDecl] = &[ParamDecl::Continuous {
        name: "Gain",
        id: "gain",
        default: 0.0,
        range: FloatRange::Linear { min: -60.0, max: 24.0 },
        unit: Some(" dB"),
        smoothing: SmoothingStyle::None,
        flags: ParamFlags::AUTOMATABLE,
    }];

    fn index_of(id_hash: u32) -> Option<usize> {
        (id_hash == fnv1a32(b"gain")).then_some(0)
    }

    #[test]
    fn split_points_are_sorted_unique_and_exclude_zero() {
        let events = [
            AutomationEvent { timing: 0, id_hash: 1, normalized_value: 0.0 },
            AutomationEvent { timing: 64, id_hash: 1, normalized_value: 0.5 },
            AutomationEvent { timing: 32, id_hash: 1, normalized_value: 0.25 },
            AutomationEvent { timing: 64, id_hash: 1, normalized_value: 0.75 },
        ];
        assert_eq!(split_points(&events), vec![32, 64]);
    }

    #[test]
    fn apply_up_to_skips_later_events() {
        let params = ParamRuntime::new(DECLS);
        let events = [
            AutomationEvent { timing: 0, id_hash: fnv1a32(b"gain"), normalized_value: 0.5 },
            AutomationEvent { timing: 64, id_hash: fnv1a32(b"gain"), normalized_value: 1.0 },
        ];
        apply_up_to(&params, index_of, 44_100.0, &events, 0);
        assert_eq!(params.normalized(0), 0.5);
    }

    #[test]
    fn apply_up_to_skips_unknown_hashes() {
        let params = ParamRuntime::new(DECLS);
        let events = [AutomationEvent { timing: 0, id_hash: 0xDEAD_BEEF, normalized_value: 1.0 }];
        apply_up_to(&params, index_of, 44_100.0, &events, 0);
        assert_eq!(params.normalized(0), DECLS[0].default_normalized());
    }
}
