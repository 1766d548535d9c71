//! Session store: owns every open wizard and runs its enhancement tasks.
//!
//! Each session is mutated only under the store's write lock. An enhancement task is
//! spawned per 2→3 advance (the reducer's busy gate makes that at most one per
//! session) and is tied to a `CancellationToken`. Closing the session cancels the
//! token; a result that arrives after that is dropped.
//!
//! Clients that navigate away never send `DELETE`, so sessions untouched for longer than
//! the idle TTL are evicted by a background sweep, which cancels them the same way.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRequirement;
use crate::wizard::enhancer::{EnhancementRequest, Enhancer};
use crate::wizard::state::{reduce, Effect, Outcome, UserInput, WizardAction, WizardState};

struct WizardSession {
    state: WizardState,
    /// Present while an enhancement is running.
    cancel: Option<CancellationToken>,
    last_touched: Instant,
}

impl WizardSession {
    fn cancel_pending(&mut self) -> bool {
        match self.cancel.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    enhancer: Arc<dyn Enhancer>,
}

impl SessionStore {
    pub fn new(enhancer: Arc<dyn Enhancer>) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            enhancer,
        }
    }

    pub async fn create(&self, job: JobRequirement) -> (Uuid, WizardState) {
        let id = Uuid::new_v4();
        let state = WizardState::new(job);
        self.sessions.write().await.insert(
            id,
            WizardSession {
                state: state.clone(),
                cancel: None,
                last_touched: Instant::now(),
            },
        );
        info!(session_id = %id, job = %state.job.title, "Wizard session opened");
        (id, state)
    }

    /// Reads a session. Counts as activity for the idle TTL.
    pub async fn get(&self, id: Uuid) -> Result<WizardState, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.last_touched = Instant::now();
        Ok(session.state.clone())
    }

    /// Applies user input. Input while an enhancement is running is refused with
    /// `Conflict` and leaves the state untouched.
    pub async fn dispatch(&self, id: Uuid, input: UserInput) -> Result<WizardState, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.last_touched = Instant::now();

        let transition = reduce(&session.state, WizardAction::Input(input));
        match transition.outcome {
            Outcome::IgnoredWhileBusy => {
                return Err(AppError::Conflict(
                    "Resume enhancement in progress; try again when it finishes".to_string(),
                ))
            }
            Outcome::Invalid(message) => return Err(AppError::Validation(message)),
            Outcome::Applied | Outcome::Unchanged => {}
        }

        session.state = transition.state;
        if let Some(Effect::StartEnhancement(request)) = transition.effect {
            let token = CancellationToken::new();
            session.cancel = Some(token.clone());
            self.spawn_enhancement(id, request, token);
        }
        Ok(session.state.clone())
    }

    /// Removes the session and cancels any running enhancement.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let mut session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))?;
        if session.cancel_pending() {
            debug!(session_id = %id, "Cancelled pending enhancement");
        }
        info!(session_id = %id, "Wizard session closed");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes every session idle for longer than `ttl`, cancelling its enhancement.
    /// Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|id, session| {
            if now.duration_since(session.last_touched) <= ttl {
                return true;
            }
            let cancelled = session.cancel_pending();
            info!(session_id = %id, cancelled, "Wizard session expired");
            false
        });
        before - sessions.len()
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_idle_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    debug!(evicted, "Idle wizard sessions swept");
                }
            }
        })
    }

    fn spawn_enhancement(&self, id: Uuid, request: EnhancementRequest, token: CancellationToken) {
        let sessions = Arc::clone(&self.sessions);
        let enhancer = Arc::clone(&self.enhancer);

        tokio::spawn(async move {
            let action = tokio::select! {
                _ = token.cancelled() => {
                    debug!(session_id = %id, "Enhancement cancelled");
                    return;
                }
                result = enhancer.enhance(request) => match result {
                    Ok(document) => WizardAction::EnhancementCompleted { document },
                    Err(e) => {
                        warn!(session_id = %id, "Enhancement failed: {e}");
                        WizardAction::EnhancementFailed { message: e.to_string() }
                    }
                },
            };

            let mut sessions = sessions.write().await;
            if token.is_cancelled() {
                return;
            }
            let Some(session) = sessions.get_mut(&id) else {
                return;
            };
            let transition = reduce(&session.state, action);
            session.state = transition.state;
            session.cancel = None;
            session.last_touched = Instant::now();
            info!(
                session_id = %id,
                step = u8::from(session.state.step),
                score = session.state.resume_score,
                "Enhancement finished"
            );
        });
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Wizard session {id} not found"))
}
