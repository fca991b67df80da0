use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::airtable::{AirtableClient, RecordSource};
use crate::config::Settings;
use crate::contact::{ContactRelay, ContactSubmission, Relayed};
use crate::content::similar::Keyworded;
use crate::content::{
    Article, Catalog, Collection, Event, GcMember, NewsroomPost, Podcast, PressArticle,
    TeamMember, Video,
};
use crate::db::{StatusCheck, StatusCheckCreate, StatusStore};
use crate::error::ApiError;
use crate::membership::{self, MembershipApplication, Submitted};

pub struct AppState {
    pub catalog: Catalog,
    pub store: StatusStore,
    pub contact: ContactRelay,
}

impl AppState {
    pub fn new(settings: &Settings, source: Arc<dyn RecordSource>, store: StatusStore) -> Self {
        AppState {
            catalog: Catalog::new(source, Arc::new(settings.airtable.clone())),
            store,
            contact: ContactRelay::new(&settings.contact),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/status", get(list_status).post(create_status))
        .route("/api/events", get(list::<Event>))
        .route("/api/event/{id}", get(get_one::<Event>))
        .route("/api/podcasts", get(list::<Podcast>))
        .route("/api/podcast/{id}", get(get_one::<Podcast>))
        .route("/api/podcasts/similar/{id}", get(similar::<Podcast>))
        .route("/api/videos", get(list::<Video>))
        .route("/api/video/{id}", get(get_one::<Video>))
        .route("/api/videos/similar/{id}", get(similar::<Video>))
        .route("/api/articles", get(list::<Article>))
        .route("/api/article/{id}", get(get_one::<Article>))
        .route("/api/articles/similar/{id}", get(similar::<Article>))
        .route("/api/newsroom", get(list::<NewsroomPost>))
        .route("/api/newsroom/{id}", get(get_one::<NewsroomPost>))
        .route("/api/in-the-press", get(list::<PressArticle>))
        .route("/api/in-the-press/{id}", get(get_one::<PressArticle>))
        .route("/api/gc-members", get(list::<GcMember>))
        .route("/api/gc-member/{id}", get(get_one::<GcMember>))
        .route("/api/team", get(list::<TeamMember>))
        .route("/api/team/{id}", get(get_one::<TeamMember>))
        .route("/api/membership/application", post(submit_application))
        .route("/api/contact/submit", post(submit_contact))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings) -> Result<()> {
    let source: Arc<dyn RecordSource> = Arc::new(AirtableClient::new(&settings.airtable));
    let store = StatusStore::open(&settings.db_path)?;
    let state = Arc::new(AppState::new(&settings, source, store));

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    info!("Listening on {}", settings.bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

// ── Handlers ──

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

async fn list<T: Collection>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<T>>, ApiError> {
    Ok(Json(state.catalog.list_for_route::<T>().await?))
}

async fn get_one<T: Collection>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<T>, ApiError> {
    Ok(Json(state.catalog.get::<T>(&id).await?))
}

async fn similar<T: Collection + Keyworded>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<T>> {
    Json(state.catalog.similar::<T>(&id).await)
}

async fn submit_application(
    State(state): State<Arc<AppState>>,
    Json(application): Json<MembershipApplication>,
) -> Result<Json<Submitted>, ApiError> {
    let submitted = membership::submit(
        state.catalog.source(),
        state.catalog.settings(),
        &application,
    )
    .await?;
    Ok(Json(submitted))
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<Relayed>, ApiError> {
    Ok(Json(state.contact.forward(&submission).await?))
}

async fn create_status(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, ApiError> {
    Ok(Json(state.store.create(input).await?))
}

async fn list_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

// ── Tests ──
