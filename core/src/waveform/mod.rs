pub mod synthesizer;
pub mod trace;

pub use synthesizer::WaveformSynthesizer;
pub use trace::{EkgTrace, WaveComponent, WaveWindow};
