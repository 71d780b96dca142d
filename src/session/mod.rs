pub mod draft;
pub mod selection;

pub use draft::{DraftError, ReservationDraft, Submission};
pub use selection::SeatSelection;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Отправка без ответа дольше этого срока считается брошенной.
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Черновики броней, по одному на открытую форму.
#[derive(Clone)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<Uuid, ReservationDraft>>>,
    submit_timeout: Duration,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::with_submit_timeout(DEFAULT_SUBMIT_TIMEOUT)
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `submit_timeout` должен быть не меньше таймаута запроса к бэкенду.
    pub fn with_submit_timeout(submit_timeout: Duration) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            submit_timeout,
        }
    }

    pub async fn create(&self) -> Uuid {
        self.insert(ReservationDraft::new()).await
    }

    pub async fn insert(&self, draft: ReservationDraft) -> Uuid {
        let id = Uuid::new_v4();
        self.drafts.write().await.insert(id, draft);
        debug!("Draft {} created", id);
        id
    }

    /// Выполняет `f` над черновиком под блокировкой записи и обновляет
    /// время последнего обращения.
    pub async fn with_draft<T, F>(&self, id: Uuid, f: F) -> Result<T, DraftError>
    where
        F: FnOnce(&mut ReservationDraft) -> Result<T, DraftError>,
    {
        let mut drafts = self.drafts.write().await;
        let draft = drafts.get_mut(&id).ok_or(DraftError::NotFound(id))?;
        if draft.release_stale_submit(self.submit_timeout) {
            warn!("Draft {} had an abandoned submission, released", id);
        }
        draft.touch();
        f(draft)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.drafts.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }

    /// Удаляет черновики, к которым не обращались дольше `ttl`.
    /// Черновики с незавершённой отправкой не трогаем, пока она не устарела.
    pub async fn purge_idle(&self, ttl: Duration) -> usize {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, draft| {
            draft.release_stale_submit(self.submit_timeout);
            draft.is_submitting() || draft.idle_for() < ttl
        });
        before - drafts.len()
    }
}

/// Фоновая задача очистки заброшенных черновиков.
pub fn spawn_sweeper(store: DraftStore, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let purged = store.purge_idle(ttl).await;
            if purged > 0 {
                info!("🧹 Purged {} idle reservation drafts", purged);
            }
        }
    })
}
