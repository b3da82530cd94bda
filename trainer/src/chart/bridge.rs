use crate::chart::model::ChartModel;
use crate::grading::client::GradingClient;
use crate::session::drill::{DrillSession, FeedbackState};
use serde::Deserialize;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn chart_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct GenerateCommand {
    #[serde(default)]
    beats: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DiagnoseCommand {
    diagnosis: String,
    reasoning: String,
}

/// Bridge that hosts the chart HTTP endpoints and feeds learner commands
/// into the session.
pub struct ChartBridge {
    state: Arc<RwLock<DrillSession>>,
}

impl ChartBridge {
    pub fn new(state: Arc<RwLock<DrillSession>>, client: Arc<GradingClient>) -> Self {
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let client_filter = warp::any().map(move || client.clone());

        let trace_route = warp::path("trace")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<DrillSession>>| {
                let session = state.read().unwrap();
                warp::reply::json(&chart_model_for(&session))
            });

        let generate_route = warp::path("generate")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and_then(
                |command: GenerateCommand, state: Arc<RwLock<DrillSession>>| async move {
                    let mut session = state.write().unwrap();
                    if let Some(beats) = command.beats {
                        session.set_beats(beats);
                    }
                    match session.next_drill() {
                        Ok(summary) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "ok",
                                "samples": summary.samples,
                                "beats": session.beats()
                            })),
                            StatusCode::OK,
                        )),
                        Err(err) => {
                            eprintln!("generate error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let diagnose_route = warp::path("diagnose")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(client_filter)
            .and_then(
                |command: DiagnoseCommand,
                 state: Arc<RwLock<DrillSession>>,
                 client: Arc<GradingClient>| async move {
                    // The lock is released before the grading await so the
                    // trace route stays responsive while the service thinks.
                    let request = {
                        let mut session = state.write().unwrap();
                        session.set_diagnosis(&command.diagnosis);
                        session.set_reasoning(&command.reasoning);
                        session.grading_request()
                    };

                    let request = match request {
                        Some(request) => request,
                        None => {
                            return Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "no-drill"})),
                                StatusCode::OK,
                            ));
                        }
                    };

                    let outcome = client.grade(&request).await;
                    let mut session = state.write().unwrap();
                    session.apply_feedback(outcome);
                    let reply = match session.feedback() {
                        FeedbackState::Available(text) => {
                            json!({"status": "ok", "feedback": text})
                        }
                        _ => json!({"status": "unavailable"}),
                    };
                    Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&reply),
                        StatusCode::OK,
                    ))
                },
            );

        let status_route = warp::path("status")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<DrillSession>>| {
                let session = state.read().unwrap();
                let metrics = session.metrics();
                let feedback = match session.feedback() {
                    FeedbackState::Hidden => "hidden",
                    FeedbackState::Available(_) => "available",
                    FeedbackState::Unavailable => "unavailable",
                };
                warp::reply::json(&json!({
                    "beats": session.beats(),
                    "traces_generated": metrics.traces_generated,
                    "gradings_failed": metrics.gradings_failed,
                    "feedback": feedback,
                }))
            });

        thread::spawn(move || {
            let routes = trace_route
                .or(generate_route)
                .or(diagnose_route)
                .or(status_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(chart_bind_address()).await;
            });
        });

        Self { state }
    }

    /// Chart model for the current trace; empty before the first drill.
    pub fn chart_model(&self) -> ChartModel {
        let session = self.state.read().unwrap();
        chart_model_for(&session)
    }

    pub fn publish_status(&self, message: &str) {
        println!("[chart] {}", message);
    }
}

fn chart_model_for(session: &DrillSession) -> ChartModel {
    match session.trace() {
        Some(trace) => ChartModel::from_trace(trace, session.sampling_rate_hz()),
        None => ChartModel::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::SessionConfig;
    use ekgcore::arrhythmia::ArrhythmiaCatalog;

    #[test]
    fn chart_bridge_reflects_session_state() {
        let config = SessionConfig {
            seed: Some(21),
            ..SessionConfig::default()
        };
        let session = Arc::new(RwLock::new(DrillSession::new(
            config,
            ArrhythmiaCatalog::standard(),
        )));
        let client = Arc::new(GradingClient::new("http://127.0.0.1:8000/analyze-response"));
        let bridge = ChartBridge::new(session.clone(), client);

        assert!(bridge.chart_model().amplitude.is_empty());

        session
            .write()
            .unwrap()
            .force_drill("Sinus Tachycardia")
            .unwrap();
        let model = bridge.chart_model();
        assert!(!model.amplitude.is_empty());
        assert_eq!(model.amplitude.len(), model.time_seconds.len());
        assert!(!model.highlights.is_empty());
    }
}
