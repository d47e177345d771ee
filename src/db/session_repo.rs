// src/db/session_repo.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{TimeDelta, Utc};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::interval,
};
use uuid::Uuid;

use crate::{common::error::AppError, models::session::OnboardingSession};

pub type SessionHandle = Arc<Mutex<OnboardingSession>>;

// O repositório de aplicações em andamento. Fica em memória até o commit
// de cada passo; cada sessão tem um único escritor por vez (o Mutex).
#[derive(Clone, Default)]
pub struct SessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: OnboardingSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn find(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::ApplicationNotFound)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove as sessões sem mudança há mais de `max_idle`. Sessões com o
    /// Mutex travado estão em uso e ficam para a próxima varredura.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.updated_at > cutoff,
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Varredura periódica em background (anexos pendentes vivem na sessão).
    pub fn spawn_sweeper(self, max_idle: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = interval(every);
            // O primeiro tick é imediato
            timer.tick().await;

            loop {
                timer.tick().await;
                let purged = self.purge_idle(max_idle).await;
                if purged > 0 {
                    tracing::info!(
                        "🧹 {} sessão(ões) expirada(s) removida(s), {} ativa(s)",
                        purged,
                        self.count().await
                    );
                }
            }
        })
    }
}
