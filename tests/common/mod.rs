#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Duration, Utc};
use invitation_tracker::entities::{GroupRole, InvitationStatus};
use invitation_tracker::{Clock, Decision, Invitation, InvitationSource, TrackerError, TrackerOptions};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "ilmiobellissimotokenditest";

/// Crea un invito pendente che scade `expires_in` dopo `now`
pub fn invitation(id: i64, now: DateTime<Utc>, expires_in: Duration) -> Invitation {
    Invitation {
        id,
        group_id: 100 + id,
        group_name: format!("group-{id}"),
        group_description: format!("description of group {id}"),
        inviter_username: "alice".to_string(),
        role: GroupRole::Member,
        status: InvitationStatus::Pending,
        created_at: now - Duration::hours(1),
        expires_at: now + expires_in,
    }
}

pub fn ids(list: &[Invitation]) -> Vec<i64> {
    list.iter().map(|inv| inv.id).collect()
}

/// Opzioni di default ma senza rate limit, per i test che fanno fetch ravvicinati
pub fn unthrottled_options() -> TrackerOptions {
    TrackerOptions {
        min_fetch_interval: std::time::Duration::ZERO,
        ..TrackerOptions::default()
    }
}

// ============================================================
// Orologi
// ============================================================

/// Orologio spostato a mano dai test
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Orologio che avanza insieme al tempo (eventualmente in pausa) di tokio
pub struct TokioClock {
    base: DateTime<Utc>,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        self.base + Duration::from_std(self.start.elapsed()).unwrap()
    }
}

// ============================================================
// Sorgente in memoria
// ============================================================

/// Sorgente finta: restituisce sempre la lista `pending`, conta le chiamate e
/// può simulare latenza e fallimenti
#[derive(Default)]
pub struct FakeSource {
    pending: Mutex<Vec<Invitation>>,
    failures_left: AtomicUsize,
    fail_respond: AtomicBool,
    latency: Mutex<std::time::Duration>,
    pub fetch_calls: AtomicUsize,
    pub respond_calls: Mutex<Vec<(i64, Decision)>>,
}

impl FakeSource {
    pub fn with_pending(pending: Vec<Invitation>) -> Self {
        let source = Self::default();
        source.set_pending(pending);
        source
    }

    pub fn set_pending(&self, pending: Vec<Invitation>) {
        *self.pending.lock().unwrap() = pending;
    }

    /// I prossimi `n` fetch falliscono
    pub fn fail_next_fetches(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn fail_responses(&self, fail: bool) {
        self.fail_respond.store(fail, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: std::time::Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn responses(&self) -> Vec<(i64, Decision)> {
        self.respond_calls.lock().unwrap().clone()
    }

    fn latency(&self) -> std::time::Duration {
        *self.latency.lock().unwrap()
    }
}

impl InvitationSource for FakeSource {
    async fn fetch_pending(&self) -> Result<Vec<Invitation>, TrackerError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(TrackerError::status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn respond(&self, id: i64, decision: Decision) -> Result<(), TrackerError> {
        self.respond_calls.lock().unwrap().push((id, decision));
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.fail_respond.load(Ordering::SeqCst) {
            return Err(TrackerError::status(StatusCode::SERVICE_UNAVAILABLE)
                .with_details("try again later"));
        }
        self.pending.lock().unwrap().retain(|inv| inv.id != id);
        Ok(())
    }
}

// ============================================================
// Backend HTTP finto (axum)
// ============================================================

#[derive(Default)]
pub struct MockBackend {
    pub pending: Mutex<Vec<Invitation>>,
    /// Se impostato, `GET /invitations` risponde con questo body grezzo
    pub raw_list_body: Mutex<Option<String>>,
    pub fail_list: AtomicBool,
    pub fail_respond: AtomicBool,
    pub list_calls: AtomicUsize,
    pub decisions: Mutex<Vec<(i64, String)>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

async fn list_invitations(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    backend.list_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "missing or invalid token").into_response();
    }
    if backend.fail_list.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    if let Some(raw) = backend.raw_list_body.lock().unwrap().clone() {
        return (StatusCode::OK, raw).into_response();
    }
    let pending = backend.pending.lock().unwrap().clone();
    Json(json!({ "data": pending })).into_response()
}

async fn respond_to_invitation(
    State(backend): State<Arc<MockBackend>>,
    Path((id, action)): Path<(i64, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if action != "accept" && action != "decline" {
        return StatusCode::NOT_FOUND.into_response();
    }
    if backend.fail_respond.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "could not update invitation").into_response();
    }
    let mut pending = backend.pending.lock().unwrap();
    let before = pending.len();
    pending.retain(|inv| inv.id != id);
    if pending.len() == before {
        return (StatusCode::NOT_FOUND, "invitation not found").into_response();
    }
    backend.decisions.lock().unwrap().push((id, action));
    Json(json!({ "success": true })).into_response()
}

/// Avvia il backend su una porta libera e ritorna l'URL base delle API
pub async fn spawn_backend(backend: Arc<MockBackend>) -> String {
    let app = Router::new()
        .route("/api/invitations", get(list_invitations))
        .route("/api/invitations/{id}/{action}", post(respond_to_invitation))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}
