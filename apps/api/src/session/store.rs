//! In-memory session registry and the analysis pipeline that drives it.
//!
//! The write lock is held only while a transition runs, never across the
//! extraction or model call. `begin_analysis` flips the session to Loading
//! under that lock, so a concurrent second request sees Loading and is refused.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::evaluation::evaluator::MatchEvaluator;
use crate::evaluation::models::EvaluationResult;
use crate::extraction::{extract_in_background, TextExtractor};
use crate::session::{
    AnalysisError, AnalysisInput, AnalysisStart, Screen, SessionState, TransitionError,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Time of the last successful transition.
    pub last_active: DateTime<Utc>,
    pub state: SessionState,
}

impl Session {
    fn idle_for_at_least(&self, max_idle: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_active)
            .to_std()
            .is_ok_and(|idle| idle >= max_idle)
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub async fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            state: SessionState::default(),
        };
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        info!(session_id = %session.id, "Session created");
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    /// Runs one transition under the write lock and returns the updated session.
    pub async fn apply<F, T>(&self, id: Uuid, transition: F) -> Result<(Session, T), SessionError>
    where
        F: FnOnce(&mut SessionState) -> Result<T, TransitionError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        let output = transition(&mut session.state)?;
        session.last_active = Utc::now();
        Ok((session.clone(), output))
    }

    /// Drops sessions with no transition for `max_idle`. Sessions still
    /// Loading are kept; their pipeline task finishes them.
    pub async fn remove_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.state.current_screen == Screen::Loading
                || !session.idle_for_at_least(max_idle, now)
        });
        before - sessions.len()
    }

    /// Runs `remove_idle` every `every` until the process exits.
    pub async fn sweep_idle(self, max_idle: Duration, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = self.remove_idle(max_idle).await;
            if removed > 0 {
                info!(removed, "Idle sessions removed");
            }
        }
    }
}

/// `startAnalysis`: validate, go to Loading, extract, evaluate, route.
///
/// Field validation failures leave the session on Home and are not errors.
/// Pipeline failures land on Home with a notice. Only a missing session or an
/// illegal transition (including a second concurrent start) returns `Err`.
///
/// Once the session is Loading, the pipeline and its closing transition run
/// on a spawned task, so the session still leaves Loading if the caller's
/// future is dropped (client disconnect, request timeout).
pub async fn run_analysis(
    sessions: &SessionStore,
    id: Uuid,
    extractor: Arc<dyn TextExtractor>,
    evaluator: &MatchEvaluator,
) -> Result<Session, SessionError> {
    let (session, start) = sessions.apply(id, |state| state.begin_analysis()).await?;

    let input = match start {
        AnalysisStart::Invalid => return Ok(session),
        AnalysisStart::Started(input) => input,
    };
    info!(session_id = %id, file = %input.resume.file_name, "Analysis started");

    let task = {
        let sessions = sessions.clone();
        let evaluator = evaluator.clone();
        tokio::spawn(async move {
            let outcome = analyze(extractor, &evaluator, input).await;
            finish_analysis(&sessions, id, outcome).await
        })
    };

    match task.await {
        Ok(finished) => finished,
        Err(e) => {
            error!(session_id = %id, "Analysis task aborted: {e}");
            let outcome = Err(AnalysisError::Interrupted(e.to_string()));
            finish_analysis(sessions, id, outcome).await
        }
    }
}

async fn finish_analysis(
    sessions: &SessionStore,
    id: Uuid,
    outcome: Result<EvaluationResult, AnalysisError>,
) -> Result<Session, SessionError> {
    if let Err(e) = &outcome {
        warn!(session_id = %id, "Analysis failed: {e}");
    }
    let (session, ()) = sessions
        .apply(id, |state| state.complete_analysis(outcome))
        .await?;
    info!(session_id = %id, screen = ?session.state.current_screen, "Analysis finished");
    Ok(session)
}

async fn analyze(
    extractor: Arc<dyn TextExtractor>,
    evaluator: &MatchEvaluator,
    input: AnalysisInput,
) -> Result<EvaluationResult, AnalysisError> {
    let resume_text =
        extract_in_background(extractor, input.resume.data, input.resume.format).await?;
    let result = evaluator
        .evaluate(&resume_text, &input.job_description)
        .await?;
    Ok(result)
}
