use ekgcore::waveform::WaveComponent;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "EKG Trainer Visualizer".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: DiagnosisForm,
    payload: Option<ChartPayload>,
    feedback: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<ChartPayload, String>),
    FormFieldChanged(FormField, String),
    SubmitDiagnosis,
    DiagnosisSubmitted(Result<DiagnoseReply, String>),
    GenerateRequested(usize),
    GenerateCompleted(Result<String, String>),
}

#[derive(Debug, Clone, Copy)]
enum FormField {
    Diagnosis,
    Reasoning,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                form: DiagnosisForm::default(),
                payload: None,
                feedback: String::new(),
                status: "Waiting for the chart bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                let previous = state.payload.as_ref().map(|p| p.amplitude.len());
                if previous != Some(payload.amplitude.len()) {
                    state.push_history(format!(
                        "Trace updated: {} samples",
                        payload.amplitude.len()
                    ));
                }
                state.status = format!(
                    "Trace: {} samples / {} highlights",
                    payload.amplitude.len(),
                    payload.highlights.len()
                );
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::FormFieldChanged(field, value) => {
                state.form.update_field(field, value);
                Task::none()
            }
            Message::SubmitDiagnosis => {
                let command = state.form.to_command();
                Task::perform(post_diagnosis(command), Message::DiagnosisSubmitted)
            }
            Message::DiagnosisSubmitted(Ok(reply)) => {
                match reply.status.as_str() {
                    "ok" => {
                        state.feedback = reply.feedback.unwrap_or_default();
                        state.status = "Feedback received".into();
                        state.push_history("Diagnosis graded".into());
                    }
                    "unavailable" => {
                        state.feedback.clear();
                        state.status = "Grading service unavailable; try again shortly".into();
                        state.push_history("Grading unavailable".into());
                    }
                    "no-drill" => {
                        state.status = "Generate an EKG before submitting a diagnosis".into();
                    }
                    other => {
                        state.status = format!("Diagnose reply: {other}");
                    }
                }
                Task::none()
            }
            Message::DiagnosisSubmitted(Err(err)) => {
                state.status = format!("Diagnose error: {err}");
                Task::none()
            }
            Message::GenerateRequested(beats) => {
                Task::perform(post_generate(beats), Message::GenerateCompleted)
            }
            Message::GenerateCompleted(Ok(message)) => {
                state.status = message;
                state.form.clear();
                state.feedback.clear();
                state.push_history("New drill requested".into());
                Task::none()
            }
            Message::GenerateCompleted(Err(err)) => {
                state.status = format!("Generate error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let diagnosis_column = column![
            text("Diagnosis").size(26),
            text_input("Your diagnosis", &state.form.diagnosis)
                .on_input(|value| Message::FormFieldChanged(FormField::Diagnosis, value))
                .padding(6),
            text_input("Why you think so", &state.form.reasoning)
                .on_input(|value| Message::FormFieldChanged(FormField::Reasoning, value))
                .padding(6),
            button("Check diagnosis")
                .on_press(Message::SubmitDiagnosis)
                .padding(10),
            row![
                button("New EKG (3 beats)")
                    .on_press(Message::GenerateRequested(3))
                    .padding(10),
                button("New EKG (5 beats)")
                    .on_press(Message::GenerateRequested(5))
                    .padding(10),
            ]
            .spacing(10),
            text(&state.status).size(14),
            text("Feedback").size(16),
            Container::new(
                scrollable(
                    text(if state.feedback.is_empty() {
                        "No feedback yet"
                    } else {
                        &state.feedback
                    })
                    .size(14)
                )
                .height(Length::Fixed(160.0))
            )
            .padding(6),
            column![
                text("Wave highlights").size(16),
                text("P: atrial depolarization, peach band before each QRS complex.").size(12),
                text("Q/R/S: ventricular depolarization, pink bands around the tall R spike.")
                    .size(12),
                text("T: ventricular repolarization, mint band after each QRS complex.").size(12),
                text("Bands mark where each wave would fall; absent or displaced waves are the clue.")
                    .size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let trace_info = if let Some(payload) = &state.payload {
            text(format!(
                "Samples: {} / {:.2} s",
                payload.amplitude.len(),
                payload.time_seconds.last().copied().unwrap_or(0.0)
            ))
            .size(18)
        } else {
            text("Samples: n/a").size(18)
        };

        let chart = Canvas::new(EkgChart::from_payload(state.payload.as_ref()))
            .width(Length::Fill)
            .height(Length::Fixed(320.0));

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let chart_column = column![
            text("EKG Chart").size(26),
            trace_info,
            chart,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![diagnosis_column, chart_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_payload() -> Result<ChartPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/trace")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<ChartPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_diagnosis(command: DiagnoseCommand) -> Result<DiagnoseReply, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/diagnose")
        .json(&command)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        response
            .json::<DiagnoseReply>()
            .await
            .map_err(|e| e.to_string())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

async fn post_generate(beats: usize) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/generate")
        .json(&serde_json::json!({ "beats": beats }))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(format!("New {}-beat EKG requested", beats))
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct DiagnosisForm {
    diagnosis: String,
    reasoning: String,
}

impl DiagnosisForm {
    fn default() -> Self {
        Self {
            diagnosis: String::new(),
            reasoning: String::new(),
        }
    }

    fn update_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Diagnosis => self.diagnosis = value,
            FormField::Reasoning => self.reasoning = value,
        }
    }

    fn to_command(&self) -> DiagnoseCommand {
        DiagnoseCommand {
            diagnosis: self.diagnosis.trim().to_string(),
            reasoning: self.reasoning.trim().to_string(),
        }
    }

    fn clear(&mut self) {
        self.diagnosis.clear();
        self.reasoning.clear();
    }
}

#[derive(Debug, Serialize)]
struct DiagnoseCommand {
    diagnosis: String,
    reasoning: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DiagnoseReply {
    #[serde(default)]
    status: String,
    #[serde(default)]
    feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartPayload {
    #[serde(default)]
    time_seconds: Vec<f64>,
    #[serde(default)]
    amplitude: Vec<f64>,
    #[serde(default)]
    highlights: Vec<HighlightPayload>,
    #[serde(default)]
    y_min: f64,
    #[serde(default)]
    y_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct HighlightPayload {
    component: WaveComponent,
    x_min_seconds: f64,
    x_max_seconds: f64,
}

#[derive(Clone)]
struct EkgChart {
    time: Vec<f32>,
    amplitude: Vec<f32>,
    highlights: Vec<(WaveComponent, f32, f32)>,
    y_min: f32,
    y_max: f32,
}

impl EkgChart {
    fn from_payload(payload: Option<&ChartPayload>) -> Self {
        match payload {
            Some(payload) => Self {
                time: payload.time_seconds.iter().map(|v| *v as f32).collect(),
                amplitude: payload.amplitude.iter().map(|v| *v as f32).collect(),
                highlights: payload
                    .highlights
                    .iter()
                    .map(|h| (h.component, h.x_min_seconds as f32, h.x_max_seconds as f32))
                    .collect(),
                y_min: payload.y_min as f32,
                y_max: payload.y_max as f32,
            },
            None => Self {
                time: Vec::new(),
                amplitude: Vec::new(),
                highlights: Vec::new(),
                y_min: -1.0,
                y_max: 1.0,
            },
        }
    }
}

fn highlight_color(component: WaveComponent) -> Color {
    match component {
        WaveComponent::P => Color::from_rgba8(255, 223, 186, 0.5),
        WaveComponent::T => Color::from_rgba8(186, 255, 233, 0.5),
        WaveComponent::Q | WaveComponent::R | WaveComponent::S => {
            Color::from_rgba8(255, 186, 186, 0.5)
        }
    }
}

impl canvas::Program<Message> for EkgChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        if self.amplitude.len() > 1 && self.time.len() == self.amplitude.len() {
            let x_min = self.time.first().copied().unwrap_or(0.0);
            let x_max = self.time.last().copied().unwrap_or(1.0);
            let x_span = (x_max - x_min).max(f32::EPSILON);
            let y_span = (self.y_max - self.y_min).max(f32::EPSILON);
            let to_x = |t: f32| (t - x_min) / x_span * bounds.width;
            let to_y = |v: f32| bounds.height - (v - self.y_min) / y_span * bounds.height;

            for (component, start, end) in &self.highlights {
                let left = to_x(*start).clamp(0.0, bounds.width);
                let right = to_x(*end).clamp(0.0, bounds.width);
                if right > left {
                    frame.fill_rectangle(
                        Point::new(left, 0.0),
                        Size::new(right - left, bounds.height),
                        highlight_color(*component),
                    );
                }
            }

            let midline_y = to_y(0.0);
            let midline = Path::new(|builder| {
                builder.move_to(Point::new(0.0, midline_y));
                builder.line_to(Point::new(bounds.width, midline_y));
            });
            frame.stroke(
                &midline,
                Stroke::default().with_color(Color::from_rgb(0.25, 0.25, 0.3)),
            );

            let trace = Path::new(|builder| {
                for (i, value) in self.amplitude.iter().enumerate() {
                    let x = to_x(self.time[i]);
                    let y = to_y(*value);
                    if i == 0 {
                        builder.move_to(Point::new(x, y));
                    } else {
                        builder.line_to(Point::new(x, y));
                    }
                }
            });
            frame.stroke(
                &trace,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(1.0, 0.39, 0.52)),
            );
        }

        vec![frame.into_geometry()]
    }
}
