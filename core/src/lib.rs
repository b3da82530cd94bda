//! Arrhythmia catalog and waveform synthesis for the Rust EKG trainer.
//!
//! The modules unify the legacy trainer's two diverging generators into a
//! single catalog, a deterministic synthesizer, and well-defined error
//! surfaces.

pub mod arrhythmia;
pub mod math;
pub mod prelude;
pub mod telemetry;
pub mod waveform;

pub use prelude::{EkgError, EkgResult, SynthesisParams};
