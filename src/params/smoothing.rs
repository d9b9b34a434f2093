//! Per-sample smoothing of parameter values.

use std::sync::atomic::{AtomicI32, Ordering};

pub use atomic_float::AtomicF32;

use crate::zplugin_debug_assert;

/// Controls if and how a parameter's value is smoothed from one target to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingStyle {
    /// No smoothing. [`Smoother::next()`] always returns the target value.
    None,
    /// Approach the target value at a constant rate, reaching it in exactly this many
    /// milliseconds.
    Linear(f32),
    /// Approach the target value along a geometric (multiplicative) progression, reaching it
    /// in exactly this many milliseconds. Falls back to [`SmoothingStyle::None`]'s behavior for
    /// one step whenever the current or target value is not strictly positive, since the
    /// geometric ratio is undefined through zero.
    Logarithmic(f32),
    /// Approach the target value as a single-pole IIR filter would: fast at first, then
    /// tapering off, reaching 99.99% of the way there in this many milliseconds and then
    /// snapping exactly to the target on the final step.
    Exponential(f32),
}

/// A smoother, producing one interpolated value per sample between a parameter's previous and
/// newly set target value. All fields are atomics so the smoother can be advanced from the audio
/// actor while the main actor calls [`Smoother::set_target()`] concurrently (spec §5).
#[derive(Debug)]
pub struct Smoother<T: Smoothable> {
    pub style: SmoothingStyle,
    /// Steps remaining until `next()` starts returning the target value directly. Signed
    /// because a block-skip can overshoot past zero.
    steps_left: AtomicI32,
    /// The per-step increment (`Linear`), multiplicative ratio (`Logarithmic`), or IIR
    /// coefficient (`Exponential`).
    step_size: AtomicF32,
    current: AtomicF32,
    target: T::Atomic,
}

/// An infinite iterator over a smoother's successive [`Smoother::next()`] values.
pub struct SmootherIter<'a, T: Smoothable> {
    smoother: &'a Smoother<T>,
}

impl SmoothingStyle {
    /// The number of steps needed to reach the target, given this style's duration and the
    /// sample rate. At least 1, so `set_target` never divides by zero.
    #[inline]
    pub fn num_steps(&self, sample_rate: f32) -> u32 {
        zplugin_debug_assert!(sample_rate > 0.0);

        match self {
            Self::None => 1,
            Self::Linear(time) | Self::Logarithmic(time) | Self::Exponential(time) => {
                zplugin_debug_assert!(*time >= 0.0);
                ((sample_rate * time / 1000.0).round() as u32).max(1)
            }
        }
    }

    /// The per-step value used by [`Self::next()`]/[`Self::next_step()`].
    #[inline]
    pub fn step_size(&self, start: f32, target: f32, num_steps: u32) -> f32 {
        zplugin_debug_assert!(num_steps >= 1);

        match self {
            Self::None => 0.0,
            Self::Linear(_) => (target - start) / (num_steps as f32),
            Self::Logarithmic(_) => {
                zplugin_debug_assert!(start > 0.0 && target > 0.0);
                ((target / start) as f64).powf((num_steps as f64).recip()) as f32
            }
            Self::Exponential(_) => 0.0001f64.powf((num_steps as f64).recip()) as f32,
        }
    }

    #[inline]
    pub fn next(&self, current: f32, target: f32, step_size: f32) -> f32 {
        match self {
            Self::None => target,
            Self::Linear(_) => current + step_size,
            Self::Logarithmic(_) => current * step_size,
            Self::Exponential(_) => (current * step_size) + (target * (1.0 - step_size)),
        }
    }

    /// Equivalent to calling [`Self::next()`] `steps` times, but in closed form for the styles
    /// whose progression admits one (linear, logarithmic, exponential all do).
    #[inline]
    pub fn next_step(&self, current: f32, target: f32, step_size: f32, steps: u32) -> f32 {
        zplugin_debug_assert!(steps >= 1);

        match self {
            Self::None => target,
            Self::Linear(_) => current + (step_size * steps as f32),
            Self::Logarithmic(_) => current * step_size.powi(steps as i32),
            Self::Exponential(_) => {
                let coefficient = step_size.powi(steps as i32);
                (current * coefficient) + (target * (1.0 - coefficient))
            }
        }
    }
}

/// A value that a [`Smoother`] can interpolate. Implemented for `f32` and `i32`.
pub trait Smoothable: Default + Clone + Copy {
    type Atomic: Default;

    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;

    fn atomic_new(value: Self) -> Self::Atomic;
    fn atomic_load(this: &Self::Atomic) -> Self;
    fn atomic_store(this: &Self::Atomic, value: Self);
}

impl<T: Smoothable> Default for Smoother<T> {
    fn default() -> Self {
        Self {
            style: SmoothingStyle::None,
            steps_left: AtomicI32::new(0),
            step_size: Default::default(),
            current: AtomicF32::new(0.0),
            target: Default::default(),
        }
    }
}

impl<T: Smoothable> Iterator for SmootherIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.smoother.next())
    }
}

impl<T: Smoothable> Clone for Smoother<T> {
    fn clone(&self) -> Self {
        Self {
            style: self.style,
            steps_left: AtomicI32::new(self.steps_left.load(Ordering::Relaxed)),
            step_size: AtomicF32::new(self.step_size.load(Ordering::Relaxed)),
            current: AtomicF32::new(self.current.load(Ordering::Relaxed)),
            target: T::atomic_new(T::atomic_load(&self.target)),
        }
    }
}

impl<T: Smoothable> Smoother<T> {
    pub fn new(style: SmoothingStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn none() -> Self {
        Default::default()
    }

    #[inline]
    pub fn steps_left(&self) -> i32 {
        self.steps_left.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.steps_left() > 0
    }

    #[inline]
    pub fn iter(&self) -> SmootherIter<'_, T> {
        SmootherIter { smoother: self }
    }

    /// Reset the smoother to `value` immediately, with nothing left to smooth. Called when a
    /// plugin activates (spec §3, "each activation ... resets smoothers to current param
    /// values").
    pub fn reset(&self, value: T) {
        T::atomic_store(&self.target, value);
        self.current.store(value.to_f32(), Ordering::Relaxed);
        self.steps_left.store(0, Ordering::Relaxed);
    }

    /// Retarget the smoother from its current value towards `target`, to be reached after
    /// `self.style`'s duration at `sample_rate`. A logarithmic style whose current or target
    /// value is not strictly positive snaps immediately instead of dividing through zero.
    pub fn set_target(&self, sample_rate: f32, target: T) {
        T::atomic_store(&self.target, target);

        let current = self.current.load(Ordering::Relaxed);
        let target_f32 = target.to_f32();

        if matches!(self.style, SmoothingStyle::Logarithmic(_))
            && (current <= 0.0 || target_f32 <= 0.0)
        {
            self.current.store(target_f32, Ordering::Relaxed);
            self.steps_left.store(0, Ordering::Relaxed);
            self.step_size.store(0.0, Ordering::Relaxed);
            return;
        }

        let steps_left = self.style.num_steps(sample_rate) as i32;
        self.steps_left.store(steps_left, Ordering::Relaxed);
        self.step_size.store(
            self.style.step_size(current, target_f32, steps_left as u32),
            Ordering::Relaxed,
        );
    }

    /// Advance the smoother by one sample. Must be called exactly once per sample on the audio
    /// actor.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn next(&self) -> T {
        let target = T::atomic_load(&self.target);

        if self.steps_left.load(Ordering::Relaxed) > 0 {
            let current = self.current.load(Ordering::Relaxed);
            let target_f32 = target.to_f32();
            let step_size = self.step_size.load(Ordering::Relaxed);

            let old_steps_left = self.steps_left.fetch_sub(1, Ordering::Relaxed);
            let new = if old_steps_left == 1 {
                self.steps_left.store(0, Ordering::Relaxed);
                target_f32
            } else {
                self.style.next(current, target_f32, step_size)
            };
            self.current.store(new, Ordering::Relaxed);

            T::from_f32(new)
        } else {
            target
        }
    }

    /// [`Self::next()`], but skipping `steps - 1` values ahead in one call.
    #[inline]
    pub fn next_step(&self, steps: u32) -> T {
        zplugin_debug_assert!(steps != 0);

        let target = T::atomic_load(&self.target);

        if self.steps_left.load(Ordering::Relaxed) > 0 {
            let current = self.current.load(Ordering::Relaxed);
            let target_f32 = target.to_f32();
            let step_size = self.step_size.load(Ordering::Relaxed);

            let old_steps_left = self.steps_left.fetch_sub(steps as i32, Ordering::Relaxed);
            let new = if old_steps_left <= steps as i32 {
                self.steps_left.store(0, Ordering::Relaxed);
                target_f32
            } else {
                self.style.next_step(current, target_f32, step_size, steps)
            };
            self.current.store(new, Ordering::Relaxed);

            T::from_f32(new)
        } else {
            target
        }
    }

    pub fn previous_value(&self) -> T {
        T::from_f32(self.current.load(Ordering::Relaxed))
    }

    /// Fill `block_values[..block_len]` as if `next()` had been called `block_len` times.
    ///
    /// # Panics
    ///
    /// Panics if `block_len > block_values.len()`.
    pub fn fill_block(&self, block_values: &mut [T], block_len: usize) {
        self.fill_block_exact(&mut block_values[..block_len])
    }

    /// The same as [`Self::fill_block()`], but filling the entire slice.
    pub fn fill_block_exact(&self, block_values: &mut [T]) {
        let target = T::atomic_load(&self.target);

        let steps_left = self.steps_left.load(Ordering::Relaxed) as usize;
        let num_smoothed_values = block_values.len().min(steps_left);
        if num_smoothed_values > 0 {
            let mut current = self.current.load(Ordering::Relaxed);
            let target_f32 = target.to_f32();
            let step_size = self.step_size.load(Ordering::Relaxed);

            if num_smoothed_values == steps_left {
                block_values[..num_smoothed_values - 1].fill_with(|| {
                    current = self.style.next(current, target_f32, step_size);
                    T::from_f32(current)
                });

                current = target_f32;
                block_values[num_smoothed_values - 1] = target;
            } else {
                block_values[..num_smoothed_values].fill_with(|| {
                    current = self.style.next(current, target_f32, step_size);
                    T::from_f32(current)
                });
            }

            block_values[num_smoothed_values..].fill(target);

            self.current.store(current, Ordering::Relaxed);
            self.steps_left
                .fetch_sub(num_smoothed_values as i32, Ordering::Relaxed);
        } else {
            block_values.fill(target);
        }
    }
}

impl Smoothable for f32 {
    type Atomic = AtomicF32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn atomic_new(value: Self) -> Self::Atomic {
        AtomicF32::new(value)
    }

    #[inline]
    fn atomic_load(this: &Self::Atomic) -> Self {
        this.load(Ordering::Relaxed)
    }

    #[inline]
    fn atomic_store(this: &Self::Atomic, value: Self) {
        this.store(value, Ordering::Relaxed)
    }
}

impl Smoothable for i32 {
    type Atomic = AtomicI32;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value.round() as i32
    }

    #[inline]
    fn atomic_new(value: Self) -> Self::Atomic {
        AtomicI32::new(value)
    }

    #[inline]
    fn atomic_load(this: &Self::Atomic) -> Self {
        this.load(Ordering::Relaxed)
    }

    #[inline]
    fn atomic_store(this: &Self::Atomic, value: Self) {
        this.store(value, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `next()` called `n` times must equal `next_step(n)` (spec §8 invariant 7).
    #[test]
    fn linear_next_equivalence() {
        let style = SmoothingStyle::Linear(100.0);
        let mut current = 0.4;
        let target = 0.8;
        let steps = 15;
        let step_size = style.step_size(current, target, steps);

        let expected = style.next_step(current, target, step_size, steps);
        for _ in 0..steps {
            current = style.next(current, target, step_size);
        }
        approx::assert_relative_eq!(current, expected, epsilon = 1e-5);
    }

    #[test]
    fn logarithmic_next_equivalence() {
        let style = SmoothingStyle::Logarithmic(100.0);
        let mut current = 20.0;
        let target = 200.0;
        let steps = 15;
        let step_size = style.step_size(current, target, steps);

        let expected = style.next_step(current, target, step_size, steps);
        for _ in 0..steps {
            current = style.next(current, target, step_size);
        }
        approx::assert_relative_eq!(current, expected, epsilon = 1e-5);
    }

    #[test]
    fn exponential_next_equivalence() {
        let style = SmoothingStyle::Exponential(100.0);
        let mut current = 0.4;
        let target = 0.8;
        let steps = 15;
        let step_size = style.step_size(current, target, steps);

        let expected = style.next_step(current, target, step_size, steps);
        for _ in 0..steps {
            current = style.next(current, target, step_size);
        }
        approx::assert_relative_eq!(current, expected, epsilon = 1e-5);
    }

    /// Linear ramp from 0 to 1 over 10 ms at 1000 Hz: 10 steps of exactly 0.1 (spec §8).
    #[test]
    fn linear_ramp_matches_spec_scenario() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Linear(10.0));
        smoother.reset(0.0);
        smoother.set_target(1000.0, 1.0);

        for i in 1..=10 {
            let value = smoother.next();
            approx::assert_abs_diff_eq!(value, i as f32 * 0.1, epsilon = 1e-6);
        }
        assert_eq!(smoother.next(), 1.0);
    }

    #[test]
    fn linear_smoother_terminates_exactly() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Linear(100.0));
        smoother.reset(10.0);
        smoother.set_target(100.0, 20.0);
        for _ in 0..(10 - 2) {
            smoother.next();
        }
        assert_ne!(smoother.next(), 20.0);
        assert_eq!(smoother.next(), 20.0);
    }

    #[test]
    fn linear_i32_smoothing_rounds() {
        let smoother: Smoother<i32> = Smoother::new(SmoothingStyle::Linear(100.0));
        smoother.reset(10);
        smoother.set_target(100.0, 20);
        for _ in 0..(10 - 2) {
            smoother.next();
        }
        assert_ne!(smoother.next(), 20);
        assert_eq!(smoother.next(), 20);
    }

    #[test]
    fn logarithmic_smoother_terminates_exactly() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Logarithmic(100.0));
        smoother.reset(20.0);
        smoother.set_target(100.0, 200.0);
        for _ in 0..(10 - 2) {
            smoother.next();
        }
        assert_ne!(smoother.next(), 200.0);
        assert_eq!(smoother.next(), 200.0);
    }

    /// A logarithmic target crossing through zero must snap instead of dividing by zero.
    #[test]
    fn logarithmic_snaps_when_target_non_positive() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Logarithmic(100.0));
        smoother.reset(20.0);
        smoother.set_target(100.0, 0.0);
        assert_eq!(smoother.next(), 0.0);
        assert!(!smoother.is_smoothing());
    }

    #[test]
    fn logarithmic_snaps_when_current_non_positive() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Logarithmic(100.0));
        smoother.reset(0.0);
        smoother.set_target(100.0, 50.0);
        assert_eq!(smoother.next(), 50.0);
    }

    #[test]
    fn none_style_snaps_immediately() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::None);
        smoother.reset(1.0);
        smoother.set_target(44_100.0, 5.0);
        assert_eq!(smoother.next(), 5.0);
    }

    /// [`Smoother::next_step()`] must agree with repeated [`Smoother::next()`].
    #[test]
    fn skipping_linear_smoothing() {
        let smoother: Smoother<f32> = Smoother::new(SmoothingStyle::Linear(100.0));
        smoother.reset(10.0);
        smoother.set_target(100.0, 20.0);
        smoother.next_step(8);
        assert_ne!(smoother.next(), 20.0);
        assert_eq!(smoother.next(), 20.0);
    }

    /// [`Smoother::fill_block()`] must equal calling `next()` the same number of times.
    #[test]
    fn fill_block_matches_next() {
        for style in [
            SmoothingStyle::Linear(10.0),
            SmoothingStyle::Exponential(10.0),
            SmoothingStyle::Logarithmic(10.0),
        ] {
            let stepwise: Smoother<f32> = Smoother::new(style);
            let blockwise: Smoother<f32> = Smoother::new(style);
            stepwise.reset(20.0);
            blockwise.reset(20.0);
            stepwise.set_target(1000.0, 200.0);
            blockwise.set_target(1000.0, 200.0);

            let mut block = [0.0f32; 32];
            blockwise.fill_block_exact(&mut block);

            for expected in block {
                approx::assert_relative_eq!(stepwise.next(), expected, epsilon = 1e-5);
            }
        }
    }
}
