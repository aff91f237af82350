//! Quality metrics for analytics-advisor chat sessions.
//!
//! Derived purely from message timestamps, per-response confidence, and user
//! feedback ratings. Ratings live on a 1-5 scale, confidence on 0-100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub timestamp: DateTime<Utc>,
    pub confidence_score: Option<f64>,
    pub feedback_rating: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionQuality {
    pub average_response_time_ms: Option<f64>,
    pub average_confidence_score: Option<f64>,
    pub user_satisfaction: Option<f64>,
    pub response_speed_rating: u8,
    pub insight_relevance_rating: f64,
    pub overall_rating: f64,
}

/// Fallback rating for components with no observations yet.
const NEUTRAL_RATING: f64 = 3.0;

pub fn session_quality(messages: &[SessionMessage]) -> SessionQuality {
    let average_response_time_ms = average_response_time(messages);
    let average_confidence_score = average_confidence(messages);
    let user_satisfaction = user_satisfaction(messages);

    let response_speed_rating = match average_response_time_ms {
        Some(elapsed) if elapsed < 5_000.0 => 5,
        Some(elapsed) if elapsed < 10_000.0 => 4,
        Some(elapsed) if elapsed < 20_000.0 => 3,
        Some(_) => 2,
        None => NEUTRAL_RATING as u8,
    };

    let insight_relevance_rating =
        average_confidence_score.map(|confidence| confidence / 20.0).unwrap_or(NEUTRAL_RATING);

    let overall_rating = (user_satisfaction.unwrap_or(NEUTRAL_RATING)
        + f64::from(response_speed_rating)
        + insight_relevance_rating)
        / 3.0;

    SessionQuality {
        average_response_time_ms,
        average_confidence_score,
        user_satisfaction,
        response_speed_rating,
        insight_relevance_rating,
        overall_rating,
    }
}

/// Mean latency over adjacent user -> assistant message pairs.
fn average_response_time(messages: &[SessionMessage]) -> Option<f64> {
    let mut total_ms = 0.0;
    let mut pairs = 0usize;

    for window in messages.windows(2) {
        if window[0].role == MessageRole::User && window[1].role == MessageRole::Assistant {
            total_ms += (window[1].timestamp - window[0].timestamp).num_milliseconds() as f64;
            pairs += 1;
        }
    }

    (pairs > 0).then(|| total_ms / pairs as f64)
}

fn average_confidence(messages: &[SessionMessage]) -> Option<f64> {
    let scores: Vec<f64> = messages
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .filter_map(|m| m.confidence_score)
        .collect();

    (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64)
}

fn user_satisfaction(messages: &[SessionMessage]) -> Option<f64> {
    let ratings: Vec<f64> =
        messages.iter().filter_map(|m| m.feedback_rating).map(f64::from).collect();

    (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64)
}
