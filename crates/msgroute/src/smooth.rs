// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exponentially smoothed running estimate.
//!
//! [`SmoothedStat`] summarizes a noisy stream (per-destination latency,
//! outstanding requests) in O(1) time and space per sample. The logical
//! window `WINDOW` sets the decay coefficient `alpha = 2 / (WINDOW + 1)`;
//! smaller windows react faster. It is not a true fixed-window average.

/// Numeric observation accepted by [`SmoothedStat::insert_sample`].
pub trait Sample: Copy {
    /// The sample as a float. Wide integers may lose precision.
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($ty:ty),*) => {
        $(
            impl Sample for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// Exponential moving average over a logical window of `WINDOW` samples.
///
/// Not internally synchronized: share it behind a lock, or keep it on the
/// thread that owns the tracked destination.
///
/// ```
/// use msgroute::SmoothedStat;
///
/// let mut latency = SmoothedStat::<16>::new();
/// assert!(!latency.has_value());
///
/// latency.insert_sample(10);
/// latency.insert_sample(20);
/// assert!(latency.value() > 10.0 && latency.value() < 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedStat<const WINDOW: usize> {
    value: f64,
    samples: u64,
}

impl<const WINDOW: usize> SmoothedStat<WINDOW> {
    /// Weight of the newest sample.
    pub const ALPHA: f64 = 2.0 / (WINDOW as f64 + 1.0);

    const VALID_WINDOW: () = assert!(WINDOW >= 1, "smoothing window must be at least 1");

    /// Create an estimator with no value.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WINDOW;
        Self {
            value: 0.0,
            samples: 0,
        }
    }

    /// Check if at least one sample has been inserted.
    pub fn has_value(&self) -> bool {
        self.samples > 0
    }

    /// Current estimate, or 0.0 before the first sample.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of samples inserted so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Feed one observation.
    ///
    /// The first sample becomes the estimate as is; later ones are blended
    /// in with weight [`Self::ALPHA`].
    pub fn insert_sample(&mut self, sample: impl Sample) {
        let sample = sample.to_f64();
        if self.samples == 0 {
            self.value = sample;
        } else {
            self.value = Self::ALPHA * sample + (1.0 - Self::ALPHA) * self.value;
        }
        self.samples = self.samples.saturating_add(1);
    }
}

impl<const WINDOW: usize> Default for SmoothedStat<WINDOW> {
    fn default() -> Self {
        Self::new()
    }
}
