// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod session;


use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::QueryRejection},
    http::StatusCode,
    routing::{get, post},
};
use clap::Parser;
use folio_api::{
    CreateEducationRequest, CreateExperienceRequest, CreateOrganizationRequest,
    CreateUserRequest, CreateUserResponse, EducationView, ExperienceView,
    ListEducationsResponse, ListExperiencesResponse, ListOrganizationsResponse, ListQuery,
    ListUsersResponse, LoginRequest, LoginResponse, OrganizationView, PatchEducationRequest,
    PatchExperienceRequest, PatchOrganizationRequest, PatchProfileRequest, ProfileView,
    SetFeaturedResponse, WhoAmIResponse,
};
use folio_persistence::SqlitePersistence;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::HttpError;
use crate::session::SessionCaller;

/// Folio Server - HTTP server for the Folio profile backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Days a login session stays valid
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u16).range(1..))]
    session_days: u16,
}

/// Server configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ServerConfig {
    /// Database file; in-memory when `None`.
    database: Option<PathBuf>,
    /// Listen address.
    addr: SocketAddr,
    /// Lifetime of new sessions.
    session_duration: Duration,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            database: args.database,
            addr: SocketAddr::new(args.bind, args.port),
            session_duration: Duration::days(i64::from(args.session_days)),
        }
    }
}

/// Application state shared across handlers.
///
/// The persistence adapter holds a single connection, so handlers take
/// turns on it through the mutex.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Lifetime of new sessions.
    session_duration: Duration,
}

// ============================================================================
// Sessions and users
// ============================================================================

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        folio_api::login(&mut persistence, &req, app_state.session_duration)?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: SessionCaller,
) -> Result<StatusCode, HttpError> {
    info!("Handling logout request");

    let token: String = session.token.unwrap_or_default();
    let mut persistence = app_state.persistence.lock().await;
    folio_api::logout(&mut persistence, &session.caller, &token)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    info!("Handling whoami request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::whoami(&mut persistence, &caller)?))
}

async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, HttpError> {
    let Query(query) = query?;
    info!("Handling list users request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::list_users(
        &mut persistence,
        &caller,
        query.page(),
    )?))
}

async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), HttpError> {
    info!(username = %req.username, "Handling create user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateUserResponse =
        folio_api::create_user(&mut persistence, &caller, req)?;

    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Organizations
// ============================================================================

async fn handle_list_organizations(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListOrganizationsResponse>, HttpError> {
    let Query(query) = query?;
    info!(?query, "Handling list organizations request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::list_organizations(
        &mut persistence,
        &caller,
        &query,
    )?))
}

async fn handle_create_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationView>), HttpError> {
    info!(name = %req.name, "Handling create organization request");

    let mut persistence = app_state.persistence.lock().await;
    let view: OrganizationView =
        folio_api::create_organization(&mut persistence, &caller, req)?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn handle_get_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(organization_id): Path<i64>,
) -> Result<Json<OrganizationView>, HttpError> {
    info!(organization_id, "Handling get organization request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::get_organization(
        &mut persistence,
        &caller,
        organization_id,
    )?))
}

async fn handle_update_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(organization_id): Path<i64>,
    Json(req): Json<PatchOrganizationRequest>,
) -> Result<Json<OrganizationView>, HttpError> {
    info!(organization_id, "Handling update organization request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::update_organization(
        &mut persistence,
        &caller,
        organization_id,
        req,
    )?))
}

async fn handle_delete_organization(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(organization_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(organization_id, "Handling delete organization request");

    let mut persistence = app_state.persistence.lock().await;
    folio_api::delete_organization(&mut persistence, &caller, organization_id)?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Experiences
// ============================================================================

async fn handle_list_experiences(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListExperiencesResponse>, HttpError> {
    let Query(query) = query?;
    info!(?query, "Handling list experiences request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::list_experiences(
        &mut persistence,
        &caller,
        &query,
    )?))
}

async fn handle_create_experience(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Json(req): Json<CreateExperienceRequest>,
) -> Result<(StatusCode, Json<ExperienceView>), HttpError> {
    info!(
        organization_id = req.organization_id,
        "Handling create experience request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let view: ExperienceView =
        folio_api::create_experience(&mut persistence, &caller, req)?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn handle_get_experience(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(experience_id): Path<i64>,
) -> Result<Json<ExperienceView>, HttpError> {
    info!(experience_id, "Handling get experience request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::get_experience(
        &mut persistence,
        &caller,
        experience_id,
    )?))
}

async fn handle_update_experience(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(experience_id): Path<i64>,
    Json(req): Json<PatchExperienceRequest>,
) -> Result<Json<ExperienceView>, HttpError> {
    info!(experience_id, "Handling update experience request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::update_experience(
        &mut persistence,
        &caller,
        experience_id,
        req,
    )?))
}

async fn handle_delete_experience(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(experience_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(experience_id, "Handling delete experience request");

    let mut persistence = app_state.persistence.lock().await;
    folio_api::delete_experience(&mut persistence, &caller, experience_id)?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Educations
// ============================================================================

async fn handle_list_educations(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListEducationsResponse>, HttpError> {
    let Query(query) = query?;
    info!(?query, "Handling list educations request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::list_educations(
        &mut persistence,
        &caller,
        &query,
    )?))
}

async fn handle_create_education(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Json(req): Json<CreateEducationRequest>,
) -> Result<(StatusCode, Json<EducationView>), HttpError> {
    info!(
        organization_id = req.organization_id,
        "Handling create education request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let view: EducationView = folio_api::create_education(&mut persistence, &caller, req)?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn handle_get_education(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(education_id): Path<i64>,
) -> Result<Json<EducationView>, HttpError> {
    info!(education_id, "Handling get education request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::get_education(
        &mut persistence,
        &caller,
        education_id,
    )?))
}

async fn handle_update_education(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(education_id): Path<i64>,
    Json(req): Json<PatchEducationRequest>,
) -> Result<Json<EducationView>, HttpError> {
    info!(education_id, "Handling update education request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::update_education(
        &mut persistence,
        &caller,
        education_id,
        req,
    )?))
}

async fn handle_delete_education(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(education_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(education_id, "Handling delete education request");

    let mut persistence = app_state.persistence.lock().await;
    folio_api::delete_education(&mut persistence, &caller, education_id)?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Profiles
// ============================================================================

async fn handle_get_featured_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
) -> Result<Json<ProfileView>, HttpError> {
    info!("Handling get featured profile request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::get_featured_profile(
        &mut persistence,
        &caller,
    )?))
}

async fn handle_get_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(profile_id): Path<i64>,
) -> Result<Json<ProfileView>, HttpError> {
    info!(profile_id, "Handling get profile request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::get_profile(
        &mut persistence,
        &caller,
        profile_id,
    )?))
}

async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(profile_id): Path<i64>,
    Json(req): Json<PatchProfileRequest>,
) -> Result<Json<ProfileView>, HttpError> {
    info!(profile_id, "Handling update profile request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::update_profile(
        &mut persistence,
        &caller,
        profile_id,
        req,
    )?))
}

async fn handle_set_featured(
    AxumState(app_state): AxumState<AppState>,
    SessionCaller { caller, .. }: SessionCaller,
    Path(profile_id): Path<i64>,
) -> Result<Json<SetFeaturedResponse>, HttpError> {
    info!(profile_id, "Handling set featured request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(folio_api::set_featured(
        &mut persistence,
        &caller,
        profile_id,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(handle_login).delete(handle_logout))
        .route("/users", get(handle_list_users).post(handle_create_user))
        .route("/users/me", get(handle_whoami))
        .route(
            "/organizations",
            get(handle_list_organizations).post(handle_create_organization),
        )
        .route(
            "/organizations/{organization_id}",
            get(handle_get_organization)
                .patch(handle_update_organization)
                .delete(handle_delete_organization),
        )
        .route(
            "/experiences",
            get(handle_list_experiences).post(handle_create_experience),
        )
        .route(
            "/experiences/{experience_id}",
            get(handle_get_experience)
                .patch(handle_update_experience)
                .delete(handle_delete_experience),
        )
        .route(
            "/educations",
            get(handle_list_educations).post(handle_create_education),
        )
        .route(
            "/educations/{education_id}",
            get(handle_get_education)
                .patch(handle_update_education)
                .delete(handle_delete_education),
        )
        .route("/profiles/featured", get(handle_get_featured_profile))
        .route(
            "/profiles/{profile_id}",
            get(handle_get_profile).patch(handle_update_profile),
        )
        .route("/profiles/{profile_id}/featured", post(handle_set_featured))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: ServerConfig = ServerConfig::from(Args::parse());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Folio server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &config.database {
        info!(path = %db_path.display(), "Using file-based database");
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let purged: usize = persistence.delete_expired_sessions(OffsetDateTime::now_utc())?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_duration: config.session_duration,
    };

    let app: Router = build_router(app_state);

    info!(addr = %config.addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
