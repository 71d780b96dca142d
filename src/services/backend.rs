//! backend.rs
//!
//! Клиент внешнего бэкенда кинотеатра.
//!
//! Ключевые компоненты:
//! 1.  **CircuitBreaker**: "Автоматический выключатель", который перестаёт
//!     дёргать бэкенд после серии сбоев и через таймаут пропускает пробный запрос.
//! 2.  **CinemaBackendClient**: все операции бэкенда (`POST /cinema/<операция>`)
//!     для фильмов, залов и броней. Каждый вызов проходит через `CircuitBreaker`.
//!
//! Повторов нет: решение о повторе принимает вызывающая сторона.

use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{BackendConfig, CircuitBreakerConfig};
use crate::models::{
    decode_reservations, DecodeError, Movie, MovieForm, RawReservation, Reservation,
    ReservationForm, Room, RoomForm,
};

/// Состояния "Автоматического выключателя".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Нормальный режим, запросы разрешены.
    Closed,
    /// Запросы запрещены до истечения таймаута.
    Open,
    /// Таймаут истёк, пропускаем пробные запросы.
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    state: RwLock<CircuitState>,
    failure_count: AtomicU32,
    last_failure: RwLock<Option<Instant>>,
    failure_threshold: u32,
    timeout_duration: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, timeout_seconds: u64) -> Self {
        Self {
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU32::new(0),
            last_failure: RwLock::new(None),
            failure_threshold: failure_threshold.max(1),
            timeout_duration: Duration::from_secs(timeout_seconds),
        }
    }

    /// Можно ли выполнить следующий запрос.
    pub fn can_execute(&self) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        match *state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let last_failure = *self.last_failure.read().unwrap_or_else(PoisonError::into_inner);
                let timed_out = last_failure.map_or(true, |at| at.elapsed() >= self.timeout_duration);

                if timed_out {
                    *state = CircuitState::HalfOpen;
                    info!("Circuit breaker transitioning to HalfOpen state");
                }
                timed_out
            }
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if *state == CircuitState::HalfOpen {
            *state = CircuitState::Closed;
            info!("Circuit breaker recovered - transitioning to Closed state");
        }
        if *state == CircuitState::Closed {
            self.failure_count.store(0, Ordering::Relaxed);
        }
    }

    pub fn record_failure(&self) {
        let failure_count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        *self.last_failure.write().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        match *state {
            CircuitState::Closed if failure_count >= self.failure_threshold => {
                *state = CircuitState::Open;
                error!(
                    "Circuit breaker OPENED - {} failures reached threshold {}",
                    failure_count, self.failure_threshold
                );
            }
            CircuitState::HalfOpen => {
                *state = CircuitState::Open;
                warn!("Circuit breaker test failed - returning to Open state");
            }
            _ => {}
        }
    }

    pub fn get_state(&self) -> CircuitState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("circuit breaker is open - cinema backend temporarily unavailable")]
    CircuitOpen,
    #[error("cinema backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cinema backend rejected {operation} with status {status}: {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl BackendError {
    /// Сетевые сбои и 5xx считаются отказом бэкенда, 4xx нет.
    fn trips_breaker(&self) -> bool {
        match self {
            BackendError::Transport(_) => true,
            BackendError::Rejected { status, .. } => *status >= 500,
            BackendError::CircuitOpen | BackendError::Decode(_) => false,
        }
    }
}

// Тело запросов на обновление: id + поля формы на одном уровне
#[derive(Serialize)]
struct WithId<'a, T> {
    id: i64,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Clone)]
pub struct CinemaBackendClient {
    base_url: String,
    http_client: reqwest::Client,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl CinemaBackendClient {
    pub fn from_config(
        config: &BackendConfig,
        breaker: &CircuitBreakerConfig,
    ) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            circuit_breaker: Arc::new(CircuitBreaker::new(
                breaker.failure_threshold,
                breaker.timeout_seconds,
            )),
        })
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    fn endpoint(&self, operation: &str) -> RequestBuilder {
        self.http_client
            .post(format!("{}/cinema/{}", self.base_url, operation))
    }

    async fn execute_with_circuit_breaker<F, T>(
        &self,
        operation: &'static str,
        call: F,
    ) -> Result<T, BackendError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        if !self.circuit_breaker.can_execute() {
            warn!("Circuit breaker is OPEN - blocking {} request", operation);
            return Err(BackendError::CircuitOpen);
        }

        match call.await {
            Ok(result) => {
                self.circuit_breaker.record_success();
                Ok(result)
            }
            Err(e) if e.trips_breaker() => {
                error!("Cinema backend {} failed: {:?}", operation, e);
                self.circuit_breaker.record_failure();
                Err(e)
            }
            Err(e) => {
                // Бэкенд ответил, значит он жив
                warn!("Cinema backend {} rejected: {}", operation, e);
                self.circuit_breaker.record_success();
                Err(e)
            }
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, BackendError> {
        debug!("-> cinema/{}", operation);
        self.execute_with_circuit_breaker(operation, async move {
            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }
            let message = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read cinema/{} error body: {}", operation, e);
                    String::new()
                }
            };
            Err(BackendError::Rejected {
                operation,
                status: status.as_u16(),
                message,
            })
        })
        .await
    }

    async fn fetch<T: DeserializeOwned>(&self, operation: &'static str) -> Result<T, BackendError> {
        let response = self.send(operation, self.endpoint(operation)).await?;
        Ok(response.json::<T>().await?)
    }

    async fn submit<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        body: &B,
    ) -> Result<(), BackendError> {
        self.send(operation, self.endpoint(operation).json(body)).await?;
        Ok(())
    }

    // --- Фильмы ---

    pub async fn get_movies(&self) -> Result<Vec<Movie>, BackendError> {
        self.fetch("get-movies").await
    }

    pub async fn register_movie(&self, movie: &MovieForm) -> Result<(), BackendError> {
        info!("Registering movie '{}'", movie.title);
        self.submit("register-movie", movie).await
    }

    pub async fn update_movie(&self, id: i64, movie: &MovieForm) -> Result<(), BackendError> {
        info!("Updating movie {}", id);
        self.submit("update-movie", &WithId { id, body: movie }).await
    }

    pub async fn delete_movie(&self, id: i64) -> Result<(), BackendError> {
        info!("Deleting movie {}", id);
        self.submit("delete-movie", &json!({ "id": id })).await
    }

    // --- Залы ---

    pub async fn get_rooms(&self) -> Result<Vec<Room>, BackendError> {
        self.fetch("get-rooms").await
    }

    pub async fn get_room(&self, id: i64) -> Result<Option<Room>, BackendError> {
        let rooms = self.get_rooms().await?;
        Ok(rooms.into_iter().find(|room| room.id == id))
    }

    pub async fn register_room(&self, room: &RoomForm) -> Result<(), BackendError> {
        info!("Registering room '{}' with capacity {}", room.name, room.capacity);
        self.submit("register-room", room).await
    }

    pub async fn update_room(&self, id: i64, room: &RoomForm) -> Result<(), BackendError> {
        info!("Updating room {}", id);
        self.submit("update-room", &WithId { id, body: room }).await
    }

    pub async fn delete_room(&self, id: i64) -> Result<(), BackendError> {
        info!("Deleting room {}", id);
        self.submit("delete-room", &json!({ "id": id })).await
    }

    // --- Брони ---

    /// Брони с проверкой списка мест; битая запись даёт ошибку, а не пустой список.
    pub async fn get_reservations(&self) -> Result<Vec<Reservation>, BackendError> {
        let raw: Vec<RawReservation> = self.fetch("get-reservations").await?;
        let reservations = decode_reservations(raw).inspect_err(|e| {
            error!("Reservation payload failed integrity check: {}", e);
        })?;
        Ok(reservations)
    }

    pub async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, BackendError> {
        let reservations = self.get_reservations().await?;
        Ok(reservations.into_iter().find(|r| r.id == id))
    }

    pub async fn create_reservation(&self, form: &ReservationForm) -> Result<(), BackendError> {
        info!(
            "Creating reservation: movie={}, room={}, seats={}",
            form.details.movie_id,
            form.room_id,
            form.seats.len()
        );
        self.submit("reservation", form).await
    }

    pub async fn update_reservation(&self, id: i64, form: &ReservationForm) -> Result<(), BackendError> {
        info!("Updating reservation {}", id);
        self.submit("update-reservation", &WithId { id, body: form }).await
    }

    pub async fn delete_reservation(&self, id: i64) -> Result<(), BackendError> {
        info!("Deleting reservation {}", id);
        self.submit("delete-reservation", &json!({ "id": id })).await
    }
}
