//! Evaluation events — observability side channel for the interviewer
//! dashboard's audit log. Notification only; never part of the scoring
//! contract.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::questions::Question;

/// One evaluation: which strategy ran, its raw response text, and the final
/// score it produced.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationEvent {
    pub question: String,
    pub answer: String,
    /// Raw oracle/heuristic response text, verbatim.
    pub response: String,
    pub score: u32,
    /// Model identifier of the strategy that produced the score.
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl EvaluationEvent {
    pub fn now(
        question: &Question,
        answer: &str,
        response: String,
        score: u32,
        model: &str,
    ) -> Self {
        Self {
            question: question.text.clone(),
            answer: answer.to_string(),
            response,
            score,
            model: model.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Fan-out sink: live subscribers get a broadcast stream, and a bounded ring
/// of recent events backs the `GET /api/v1/evaluations/recent` endpoint.
#[derive(Clone)]
pub struct EvaluationSink {
    tx: broadcast::Sender<EvaluationEvent>,
    recent: Arc<Mutex<VecDeque<EvaluationEvent>>>,
    capacity: usize,
}

impl EvaluationSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Publishes an event. Dropped silently when no subscriber is listening.
    pub fn publish(&self, event: EvaluationEvent) {
        {
            let mut ring = self.recent.lock().expect("event ring mutex poisoned");
            if ring.len() == self.capacity {
                ring.pop_front();
            }
            ring.push_back(event.clone());
        }
        let _ = self.tx.send(event);
    }

    /// Most recent events, oldest first.
    pub fn recent(&self) -> Vec<EvaluationEvent> {
        self.recent
            .lock()
            .expect("event ring mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> broadcast::Receiver<EvaluationEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::models::Difficulty;

    fn event(n: u32) -> EvaluationEvent {
        let q = Question {
            id: "1".to_string(),
            text: format!("question {n}"),
            difficulty: Difficulty::Easy,
            max_time: 20,
            category: "Fallback Pool".to_string(),
        };
        EvaluationEvent::now(&q, "answer", "SCORE: 5.0".to_string(), n, "test-model")
    }

    #[test]
    fn test_ring_keeps_most_recent_up_to_capacity() {
        let sink = EvaluationSink::new(3);
        for n in 0..5 {
            sink.publish(event(n));
        }
        let recent = sink.recent();
        assert_eq!(recent.len(), 3);
        assert_eq!(
            recent.iter().map(|e| e.score).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let sink = EvaluationSink::new(4);
        let mut rx = sink.subscribe();
        sink.publish(event(7));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.score, 7);
        assert_eq!(received.model, "test-model");
    }
}
