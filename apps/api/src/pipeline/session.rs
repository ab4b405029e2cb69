//! Session store — the single owner of mutable pipeline state.
//!
//! State only changes through `SessionCommand`s. Each dispatch, including a
//! guarded multi-command dispatch, happens under one write lock, so readers see
//! either the whole change or none of it.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Candidate, JobDescription};
use crate::pipeline::phase::{validate_transition, Phase, TransitionError};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub current_phase: Phase,
    pub job_description: Option<JobDescription>,
    pub candidates: Vec<Candidate>,
    pub selected_candidate_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Unconditional; guarded moves go through `SessionStore::transition_to`.
    SetPhase(Phase),
    SetJobDescription(JobDescription),
    SetCandidates(Vec<Candidate>),
    /// Replaces the candidate with the same id. No-op when absent.
    UpdateCandidate(Candidate),
    /// `UpdateCandidate` for each element, applied as one change.
    UpdateCandidates(Vec<Candidate>),
    SetSelectedCandidate(Option<Uuid>),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("the job description is already confirmed for this session")]
    JobDescriptionFrozen,

    #[error("this operation belongs to the {expected:?} phase but the session is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("candidate {0} not found")]
    UnknownCandidate(Uuid),
}

impl SessionState {
    pub fn apply(mut self, command: SessionCommand) -> Self {
        match command {
            SessionCommand::SetPhase(phase) => self.current_phase = phase,
            SessionCommand::SetJobDescription(jd) => self.job_description = Some(jd),
            SessionCommand::SetCandidates(candidates) => self.candidates = candidates,
            SessionCommand::UpdateCandidate(candidate) => self.replace_candidate(candidate),
            SessionCommand::UpdateCandidates(candidates) => {
                for candidate in candidates {
                    self.replace_candidate(candidate);
                }
            }
            SessionCommand::SetSelectedCandidate(id) => self.selected_candidate_id = id,
            SessionCommand::Reset => return SessionState::default(),
        }
        self
    }

    fn replace_candidate(&mut self, candidate: Candidate) {
        match self.candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(slot) => *slot = candidate,
            None => debug!("update for unknown candidate {} ignored", candidate.id),
        }
    }

    /// Merges each result onto the stored record with the same id. Ids that are
    /// no longer stored are dropped.
    pub fn merge_results<T>(
        &self,
        results: Vec<(Uuid, T)>,
        merge: impl Fn(Candidate, T) -> Candidate,
    ) -> Vec<Candidate> {
        results
            .into_iter()
            .filter_map(|(id, value)| self.candidate(id).map(|c| merge(c.clone(), value)))
            .collect()
    }

    pub fn candidate(&self, id: Uuid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected_candidate_id.and_then(|id| self.candidate(id))
    }

    pub fn require_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.current_phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                expected,
                actual: self.current_phase,
            })
        }
    }
}

/// Cloneable handle to the session. Passed explicitly to whoever needs it.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A consistent copy of the whole state.
    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.clone()
    }

    pub async fn dispatch(&self, command: SessionCommand) {
        let mut guard = self.inner.write().await;
        let state = std::mem::take(&mut *guard);
        *guard = state.apply(command);
    }

    /// Runs `decide` against the current state and applies the commands it
    /// returns, all under one write lock. Nothing is applied when it fails.
    pub async fn dispatch_guarded<T, E>(
        &self,
        decide: impl FnOnce(&SessionState) -> Result<(Vec<SessionCommand>, T), E>,
    ) -> Result<T, E> {
        let mut guard = self.inner.write().await;
        let (commands, value) = decide(&*guard)?;
        let mut state = std::mem::take(&mut *guard);
        for command in commands {
            state = state.apply(command);
        }
        *guard = state;
        Ok(value)
    }

    pub async fn set_phase(&self, phase: Phase) {
        self.dispatch(SessionCommand::SetPhase(phase)).await;
    }

    pub async fn set_job_description(&self, jd: JobDescription) {
        self.dispatch(SessionCommand::SetJobDescription(jd)).await;
    }

    pub async fn set_candidates(&self, candidates: Vec<Candidate>) {
        self.dispatch(SessionCommand::SetCandidates(candidates)).await;
    }

    pub async fn update_candidate(&self, candidate: Candidate) {
        self.dispatch(SessionCommand::UpdateCandidate(candidate)).await;
    }

    pub async fn update_candidates(&self, candidates: Vec<Candidate>) {
        self.dispatch(SessionCommand::UpdateCandidates(candidates)).await;
    }

    pub async fn set_selected_candidate(&self, id: Option<Uuid>) {
        self.dispatch(SessionCommand::SetSelectedCandidate(id)).await;
    }

    pub async fn reset(&self) {
        self.dispatch(SessionCommand::Reset).await;
        info!("session reset");
    }

    /// Guarded phase change. See `validate_transition` for the rules.
    pub async fn transition_to(&self, target: Phase) -> Result<Phase, SessionError> {
        let from = self
            .dispatch_guarded(|state| {
                validate_transition(state, target)?;
                Ok::<_, SessionError>((vec![SessionCommand::SetPhase(target)], state.current_phase))
            })
            .await?;
        info!("phase {} -> {}", from.title(), target.title());
        Ok(target)
    }
}
