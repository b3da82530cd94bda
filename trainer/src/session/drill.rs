use crate::grading::client::{GradingError, GradingFeedback, GradingRequest};
use crate::session::config::SessionConfig;
use ekgcore::arrhythmia::{ArrhythmiaCatalog, ArrhythmiaSpec};
use ekgcore::prelude::{EkgError, EkgResult};
use ekgcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use ekgcore::waveform::{EkgTrace, WaveformSynthesizer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Beat counts the practice surface offers; other values are ignored.
pub const SUPPORTED_BEAT_COUNTS: [usize; 2] = [3, 5];

/// Where the learner stands with the grading service for the current drill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackState {
    /// No diagnosis submitted yet.
    Hidden,
    /// The grading service replied with feedback text.
    Available(String),
    /// The grading service could not be reached or replied unusably.
    Unavailable,
}

/// What the driver reports after starting a drill. Carries the answer, so it
/// is printed by the offline driver but never serialized onto the bridge.
#[derive(Debug, Clone)]
pub struct DrillSummary {
    pub arrhythmia: String,
    pub samples: usize,
    pub duration_seconds: f64,
    pub wave_windows: usize,
}

struct Drill {
    answer: String,
    trace: EkgTrace,
}

/// One learner's practice session: draws rhythms from the catalog, keeps the
/// current trace and the learner's diagnosis, and folds grading outcomes back
/// into the feedback state.
pub struct DrillSession {
    config: SessionConfig,
    catalog: ArrhythmiaCatalog,
    synthesizer: WaveformSynthesizer,
    rng: StdRng,
    current: Option<Drill>,
    diagnosis: String,
    reasoning: String,
    feedback: FeedbackState,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl DrillSession {
    pub fn new(config: SessionConfig, catalog: ArrhythmiaCatalog) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            catalog,
            synthesizer: WaveformSynthesizer::new(),
            rng,
            current: None,
            diagnosis: String::new(),
            reasoning: String::new(),
            feedback: FeedbackState::Hidden,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Start a drill on a randomly drawn rhythm.
    pub fn next_drill(&mut self) -> EkgResult<DrillSummary> {
        let (name, spec) = {
            let entry = self
                .catalog
                .pick(&mut self.rng)
                .ok_or_else(|| EkgError::UnknownArrhythmia("(empty catalog)".to_string()))?;
            (entry.name.clone(), entry.spec.clone())
        };
        self.start_drill(name, spec)
    }

    /// Start a drill on a named rhythm, for scripted practice runs.
    pub fn force_drill(&mut self, name: &str) -> EkgResult<DrillSummary> {
        let spec = self.catalog.lookup(name)?.clone();
        self.start_drill(name.to_string(), spec)
    }

    fn start_drill(&mut self, name: String, spec: ArrhythmiaSpec) -> EkgResult<DrillSummary> {
        let seed = self.rng.gen::<u64>();
        let params = self.config.to_synthesis_params(seed);
        let trace = self.synthesizer.synthesize(&spec, &params)?;

        let summary = DrillSummary {
            arrhythmia: name.clone(),
            samples: trace.len(),
            duration_seconds: trace.duration_seconds(),
            wave_windows: trace.wave_windows.len(),
        };

        self.metrics.record_trace();
        self.logger.record(&format!(
            "drill ready: {} samples, {} wave windows",
            summary.samples, summary.wave_windows
        ));

        self.current = Some(Drill { answer: name, trace });
        self.diagnosis.clear();
        self.reasoning.clear();
        self.feedback = FeedbackState::Hidden;

        Ok(summary)
    }

    /// Restrict the next drills to one of the supported beat counts.
    pub fn set_beats(&mut self, beats: usize) -> bool {
        if SUPPORTED_BEAT_COUNTS.contains(&beats) {
            self.config.beats = beats;
            true
        } else {
            self.logger
                .record_warning(&format!("ignoring unsupported beat count {}", beats));
            false
        }
    }

    pub fn beats(&self) -> usize {
        self.config.beats
    }

    pub fn sampling_rate_hz(&self) -> f64 {
        self.config.sampling_rate_hz
    }

    pub fn trace(&self) -> Option<&EkgTrace> {
        self.current.as_ref().map(|drill| &drill.trace)
    }

    pub fn set_diagnosis(&mut self, text: &str) {
        self.diagnosis = text.to_string();
    }

    pub fn set_reasoning(&mut self, text: &str) {
        self.reasoning = text.to_string();
    }

    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Payload for the grading service, or `None` before the first drill.
    /// The hidden answer travels only here, never through the chart routes.
    pub fn grading_request(&self) -> Option<GradingRequest> {
        self.current.as_ref().map(|drill| {
            let attributes = self
                .catalog
                .lookup(&drill.answer)
                .map(|spec| spec.description.clone())
                .unwrap_or_default();
            GradingRequest {
                user_answer: self.diagnosis.clone(),
                correct_answer: drill.answer.clone(),
                user_explanation: self.reasoning.clone(),
                ekg_attributes: attributes,
            }
        })
    }

    /// Fold a grading outcome into the session. Failures leave the learner
    /// with an explicit "unavailable" state rather than stale feedback.
    pub fn apply_feedback(&mut self, outcome: Result<GradingFeedback, GradingError>) {
        match outcome {
            Ok(graded) => {
                self.logger.record("grading feedback received");
                self.feedback = FeedbackState::Available(graded.feedback);
            }
            Err(err) => {
                self.metrics.record_grading_failure();
                self.logger
                    .record_warning(&format!("grading unavailable: {}", err));
                self.feedback = FeedbackState::Unavailable;
            }
        }
    }

    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
