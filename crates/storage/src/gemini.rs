//! Routine suggestions via the Gemini `generateContent` endpoint.
//!
//! The model is asked for a JSON document matching a fixed schema. The
//! request is guarded by a timeout; expiry, transport errors and undecodable
//! payloads all surface as a [`SuggestionError`] and are never retried.

use futures_util::{
    future::{Either, select},
    pin_mut,
};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use liftlog_domain::{
    Reps, RoutineSuggestion, SuggestedExercise, SuggestionError, SuggestionRepository, Weight,
};
use serde::Deserialize;
use serde_json::json;

const ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const TIMEOUT_MS: u32 = 10_000;

/// Client for the routine-suggestion service.
pub struct Gemini {
    api_key: String,
}

impl Gemini {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

impl SuggestionRepository for Gemini {
    async fn generate_routine(&self, goal: &str) -> Result<RoutineSuggestion, SuggestionError> {
        let request = Request::post(&format!("{ENDPOINT}?key={}", self.api_key))
            .json(&request_body(goal))
            .expect("serialization failed");

        let send = request.send();
        pin_mut!(send);
        let timeout = TimeoutFuture::new(TIMEOUT_MS);
        pin_mut!(timeout);

        let response = match select(send, timeout).await {
            Either::Left((result, _)) => result.map_err(|_| SuggestionError::NoConnection)?,
            Either::Right(((), _)) => return Err(SuggestionError::Timeout),
        };
        if !response.ok() {
            return Err(SuggestionError::Http(response.status()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|_| SuggestionError::InvalidResponse)?;
        parse_generated(&body.text().ok_or(SuggestionError::InvalidResponse)?)
    }
}

fn request_body(goal: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{
                "text": format!("Generate a gym workout routine for the following goal: {goal}")
            }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "exercises": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": { "type": "STRING" },
                                "targetReps": { "type": "INTEGER" },
                                "targetWeight": { "type": "INTEGER" },
                                "sets": { "type": "INTEGER" }
                            },
                            "required": ["name", "targetReps", "targetWeight", "sets"]
                        }
                    }
                },
                "required": ["name", "description", "exercises"]
            }
        }
    })
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        self.candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRoutine {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    exercises: Vec<GeneratedExercise>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedExercise {
    name: String,
    target_reps: Option<u32>,
    target_weight: Option<f32>,
    sets: Option<u32>,
}

/// Parses the model's JSON payload into a suggestion. Values that fail
/// domain validation are treated as absent rather than failing the whole
/// suggestion.
fn parse_generated(text: &str) -> Result<RoutineSuggestion, SuggestionError> {
    let generated: GeneratedRoutine =
        serde_json::from_str(text).map_err(|_| SuggestionError::InvalidResponse)?;
    Ok(RoutineSuggestion {
        name: generated.name,
        description: generated.description,
        exercises: generated
            .exercises
            .into_iter()
            .map(|exercise| SuggestedExercise {
                name: exercise.name,
                target_reps: exercise.target_reps.and_then(|reps| Reps::new(reps).ok()),
                target_weight: exercise
                    .target_weight
                    .and_then(|weight| Weight::new(weight).ok()),
                target_sets: exercise.sets,
            })
            .collect(),
    })
}
