//! The per-parameter atomic runtime store shared between the main and audio actors (spec §3,
//! §4.2, §5). Declarations are pure data; this is where they get a cache-line-padded atomic
//! normalized value and a smoother.

use std::sync::atomic::Ordering;

use crossbeam::utils::CachePadded;

use super::declaration::ParamDecl;
use super::smoothing::{AtomicF32, Smoother};

/// Atomic, lock-free storage for one plugin's parameters, built once from its declarations.
///
/// Every parameter gets a normalized `AtomicF32` (the value automation, state save/load, and the
/// GUI read and write) and a `Smoother<f32>` operating in plain units (the value `process` reads
/// sample-by-sample). Non-continuous parameters get a smoother too, seeded with
/// [`super::smoothing::SmoothingStyle::None`], so the store's two arrays stay parallel and
/// uniformly indexed as spec §3 requires.
pub struct ParamRuntime {
    declarations: &'static [ParamDecl],
    normalized: Box<[CachePadded<AtomicF32>]>,
    smoothers: Box<[CachePadded<Smoother<f32>>]>,
}

impl ParamRuntime {
    pub fn new(declarations: &'static [ParamDecl]) -> Self {
        for decl in declarations {
            decl.assert_validity();
        }

        let normalized = declarations
            .iter()
            .map(|decl| CachePadded::new(AtomicF32::new(decl.default_normalized())))
            .collect();
        let smoothers = declarations
            .iter()
            .map(|decl| {
                let smoother = Smoother::new(decl.smoothing_style());
                smoother.reset(decl.default_plain());
                CachePadded::new(smoother)
            })
            .collect();

        Self {
            declarations,
            normalized,
            smoothers,
        }
    }

    pub fn declarations(&self) -> &'static [ParamDecl] {
        self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Load a parameter's current normalized value. Safe to call from either actor.
    pub fn normalized(&self, index: usize) -> f32 {
        self.normalized[index].load(Ordering::Relaxed)
    }

    /// Main-actor write: store the new normalized value and retarget the parameter's smoother
    /// towards the corresponding plain value. Per spec §5, this becomes visible to the audio
    /// actor no later than the next `process` call.
    pub fn set_normalized(&self, index: usize, normalized: f32, sample_rate: f32) {
        let normalized = normalized.clamp(0.0, 1.0);
        self.normalized[index].store(normalized, Ordering::Relaxed);

        let plain = self.declarations[index].unnormalize(normalized);
        self.smoothers[index].set_target(sample_rate, plain);
    }

    /// Load a value directly from the state envelope (spec §4.5): store the normalized value and
    /// snap (not smooth) the smoother to the corresponding plain value, since a freshly loaded
    /// preset should not audibly ramp in.
    pub fn load_normalized(&self, index: usize, normalized: f32) {
        let normalized = normalized.clamp(0.0, 1.0);
        self.normalized[index].store(normalized, Ordering::Relaxed);
        let plain = self.declarations[index].unnormalize(normalized);
        self.smoothers[index].reset(plain);
    }

    /// Called on activation (spec §3: "each activation ... resets smoothers to current param
    /// values"): snap every smoother to its parameter's current normalized value, discarding any
    /// in-flight smoothing.
    pub fn reset_smoothers(&self) {
        for index in 0..self.len() {
            let plain = self.declarations[index].unnormalize(self.normalized(index));
            self.smoothers[index].reset(plain);
        }
    }

    /// The audio actor's per-sample smoothed read, advancing the smoother by one sample.
    pub fn next_smoothed(&self, index: usize) -> f32 {
        self.smoothers[index].next()
    }

    /// The audio actor's non-advancing read of a continuous parameter's current plain value.
    pub fn get_float(&self, index: usize) -> f32 {
        self.smoothers[index].previous_value()
    }

    /// The audio actor's non-advancing read of an integer parameter's current plain value.
    pub fn get_int(&self, index: usize) -> i32 {
        self.smoothers[index].previous_value().round() as i32
    }

    /// The audio actor's non-advancing read of a boolean parameter's current value.
    pub fn get_bool(&self, index: usize) -> bool {
        self.smoothers[index].previous_value() >= 0.5
    }

    /// The audio actor's non-advancing read of a choice parameter's current index.
    pub fn get_choice(&self, index: usize) -> usize {
        self.smoothers[index].previous_value().round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::declaration::ParamFlags;
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
        smoothing: SmoothingStyle::Linear(10.0),
        flags: ParamFlags::AUTOMATABLE,
    }];

    #[test]
    fn starts_at_default() {
        let store = ParamRuntime::new(DECLS);
        assert_eq!(store.get_float(0), 0.0);
        assert_eq!(store.normalized(0), DECLS[0].default_normalized());
    }

    #[test]
    fn set_normalized_retargets_smoother() {
        let store = ParamRuntime::new(DECLS);
        store.set_normalized(0, 1.0, 1000.0);
        assert_eq!(store.normalized(0), 1.0);
        // Smoother hasn't advanced yet, so the plain read is still the old value.
        assert_eq!(store.get_float(0), 0.0);
        for _ in 0..10 {
            store.next_smoothed(0);
        }
        assert_eq!(store.get_float(0), 24.0);
    }

    #[test]
    fn load_normalized_snaps_without_smoothing() {
        let store = ParamRuntime::new(DECLS);
        store.load_normalized(0, 1.0);
        assert_eq!(store.get_float(0), 24.0);
    }

    #[test]
    fn reset_smoothers_discards_in_flight_smoothing() {
        let store = ParamRuntime::new(DECLS);
        store.set_normalized(0, 1.0, 1000.0);
        store.next_smoothed(0);
        // Only one of ten steps has elapsed, so without the reset the next read would still be
        // short of the target.
        assert!(store.get_float(0) < 24.0);
        store.reset_smoothers();
        assert_eq!(store.get_float(0), 24.0);
    }
}
