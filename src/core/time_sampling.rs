//! Time sampling.
//!
//! Every written property refers to a time sampling by index. The
//! archive owns the list; index 0 is always identity sampling.

/// Time value in seconds.
pub type Chrono = f64;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum TimeSamplingType {
    /// Sample `i` sits at time `i`.
    #[default]
    Identity,
    /// `start_time + i * time_per_cycle`.
    Uniform { time_per_cycle: Chrono, start_time: Chrono },
    /// Explicit, increasing times.
    Acyclic { times: Vec<Chrono> },
}

/// Maps sample indices to times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSampling {
    pub sampling_type: TimeSamplingType,
}

impl TimeSampling {
    pub const IDENTITY: Self = Self { sampling_type: TimeSamplingType::Identity };

    /// Fixed frame rate, e.g. `uniform(1.0 / 24.0, 0.0)`.
    pub fn uniform(time_per_cycle: Chrono, start_time: Chrono) -> Self {
        Self { sampling_type: TimeSamplingType::Uniform { time_per_cycle, start_time } }
    }

    pub fn acyclic(times: Vec<Chrono>) -> Self {
        Self { sampling_type: TimeSamplingType::Acyclic { times } }
    }

    /// Time of sample `index`. Acyclic samplings return `None` past their
    /// last listed time.
    pub fn sample_time(&self, index: usize) -> Option<Chrono> {
        let i = index as Chrono;
        match &self.sampling_type {
            TimeSamplingType::Identity => Some(i),
            TimeSamplingType::Uniform { time_per_cycle, start_time } => {
                Some(start_time + i * time_per_cycle)
            }
            TimeSamplingType::Acyclic { times } => times.get(index).copied(),
        }
    }
}
