//! Fixed-rate angle trajectories.

use crate::error::{SimError, SimResult};

/// One trajectory sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub time_s: f64,
    pub angle_deg: f64,
}

/// Precomputed angle-vs-time samples, strictly increasing in time.
///
/// Built only by the solver; handed to playback by value.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    pub(crate) fn from_samples(samples: Vec<Sample>) -> SimResult<Self> {
        for s in &samples {
            if !(s.time_s.is_finite() && s.angle_deg.is_finite()) {
                return Err(SimError::Integration {
                    what: "non-finite trajectory sample",
                    t: s.time_s,
                });
            }
        }
        if let Some(w) = samples.windows(2).find(|w| w[1].time_s <= w[0].time_s) {
            return Err(SimError::Integration {
                what: "trajectory times not strictly increasing",
                t: w[1].time_s,
            });
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time_s)
    }

    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.angle_deg)
    }
}

impl IntoIterator for Trajectory {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

/// Output times for a horizon and sample rate.
///
/// Produces `round(duration * rate)` points spaced evenly over
/// `[0, duration]`, both ends included. A single point is `[0]`.
pub fn sample_times(duration_s: f64, sample_rate_hz: f64) -> SimResult<Vec<f64>> {
    if !(duration_s.is_finite() && duration_s > 0.0) {
        return Err(SimError::InvalidParameter {
            what: "duration must be finite and positive",
        });
    }
    if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
        return Err(SimError::InvalidParameter {
            what: "sample rate must be finite and positive",
        });
    }
    let count = (duration_s * sample_rate_hz).round();
    if count < 1.0 {
        return Err(SimError::InvalidParameter {
            what: "duration * sample rate must round to at least one sample",
        });
    }
    if count > u32::MAX as f64 {
        return Err(SimError::InvalidParameter {
            what: "too many samples requested",
        });
    }
    let n = count as usize;
    if n == 1 {
        return Ok(vec![0.0]);
    }
    let spacing = duration_s / (n - 1) as f64;
    let mut times: Vec<f64> = (0..n).map(|i| i as f64 * spacing).collect();
    // land exactly on the horizon
    times[n - 1] = duration_s;
    Ok(times)
}
