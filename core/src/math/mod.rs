pub mod pulse;
pub mod stats;

pub use pulse::PulseHelper;
pub use stats::StatsHelper;
