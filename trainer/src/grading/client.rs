use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GRADING_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload posted to the analysis service. Field names are fixed by that
/// service's API and must not be renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingRequest {
    pub user_answer: String,
    pub correct_answer: String,
    pub user_explanation: String,
    pub ekg_attributes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradingFeedback {
    pub feedback: String,
}

#[derive(thiserror::Error, Debug)]
pub enum GradingError {
    #[error("grading request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("grading service returned status {0}")]
    Status(StatusCode),
    #[error("malformed grading response: {0}")]
    MalformedResponse(String),
}

/// Client for the external diagnosis-grading service.
pub struct GradingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GradingClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn grade(&self, request: &GradingRequest) -> Result<GradingFeedback, GradingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(GRADING_TIMEOUT)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GradingError::Status(response.status()));
        }

        response
            .json::<GradingFeedback>()
            .await
            .map_err(|err| GradingError::MalformedResponse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    fn sample_request() -> GradingRequest {
        GradingRequest {
            user_answer: "Afib with RVR".to_string(),
            correct_answer: "Aflutter".to_string(),
            user_explanation: "No P waves and the rhythm looked irregular.".to_string(),
            ekg_attributes: "Sawtooth flutter waves preceding each QRS.".to_string(),
        }
    }

    #[test]
    fn request_serializes_with_service_field_names() {
        let value = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(value["user_answer"], "Afib with RVR");
        assert_eq!(value["correct_answer"], "Aflutter");
        assert!(!value["user_explanation"].as_str().unwrap().is_empty());
        assert!(value.get("ekg_attributes").is_some());
    }

    #[tokio::test]
    async fn grade_posts_request_and_parses_feedback() {
        let route = warp::path("analyze-response")
            .and(warp::post())
            .and(warp::body::json())
            .map(|body: GradingRequest| {
                warp::reply::json(&serde_json::json!({
                    "feedback": format!("You answered {}.", body.user_answer)
                }))
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = GradingClient::new(&format!("http://{}/analyze-response", addr));
        let feedback = client.grade(&sample_request()).await.unwrap();
        assert_eq!(feedback.feedback, "You answered Afib with RVR.");
    }

    #[tokio::test]
    async fn grade_maps_non_success_status_to_error() {
        let route = warp::path("analyze-response").and(warp::post()).map(|| {
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"detail": "model overloaded"})),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            )
        });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = GradingClient::new(&format!("http://{}/analyze-response", addr));
        let err = client.grade(&sample_request()).await.unwrap_err();
        assert!(matches!(err, GradingError::Status(status) if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn grade_rejects_reply_without_feedback_field() {
        let route = warp::path("analyze-response")
            .and(warp::post())
            .map(|| warp::reply::json(&serde_json::json!({"verdict": "close enough"})));
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = GradingClient::new(&format!("http://{}/analyze-response", addr));
        let err = client.grade(&sample_request()).await.unwrap_err();
        assert!(matches!(err, GradingError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn grade_surfaces_connection_failures() {
        // Port 9 (discard) is assumed to have no listener.
        let client = GradingClient::new("http://127.0.0.1:9/analyze-response");
        let err = client.grade(&sample_request()).await.unwrap_err();
        assert!(matches!(err, GradingError::Request(_)));
    }
}
