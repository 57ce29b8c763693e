use std::sync::{Mutex, MutexGuard};

use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::error::ErrorInternalServerError;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::auth::{check_login, LoginOutcome, ADMIN_SESSION_KEY, ATTEMPTS_SESSION_KEY};
use crate::display::ScheduleTable;
use crate::form::{export_schedule_csv, validate_signup, LoginRequest, SignupRequest};
use crate::roster::{event_key, event_title, next_saturday, Lineup, RosterError, MAX_PLAYERS, MIN_PLAYERS};
use crate::schedule::{Player, ScheduleError, ScheduleGenerator, SessionClock};
use crate::store::{EventStore, StoreError};

pub struct AppState {
    pub store: Mutex<EventStore>,
    pub generator: ScheduleGenerator,
    pub clock: SessionClock,
    pub admin_password_hash: String,
    pub max_login_attempts: u32,
    /// Pins the event date; otherwise the coming Saturday is used
    pub event_date: Option<NaiveDate>,
}

impl AppState {
    fn event_date(&self) -> NaiveDate {
        self.event_date
            .unwrap_or_else(|| next_saturday(Local::now().date_naive()))
    }

    fn store(&self) -> Result<MutexGuard<'_, EventStore>> {
        self.store
            .lock()
            .map_err(|_| ErrorInternalServerError("Event store is unavailable"))
    }
}

#[derive(Serialize)]
pub struct EventResponse {
    date: String,
    date_key: String,
    players: Vec<Player>,
    max_players: usize,
    min_players: usize,
    signup_open: bool,
    substitutes: Vec<Player>,
    schedule: Option<ScheduleTable>,
}

fn error_json(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({"success": false, "error": message.into()})
}

fn is_admin(session: &Session) -> Result<bool> {
    Ok(session.get::<bool>(ADMIN_SESSION_KEY)?.unwrap_or(false))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(error_json("Unauthorized"))
}

fn store_failure(e: StoreError) -> HttpResponse {
    error!("Event store failure: {}", e);
    HttpResponse::InternalServerError().json(error_json("Failed to save, please try again"))
}

// Current event: roster, substitutes and any saved schedule
async fn get_event(state: web::Data<AppState>) -> Result<HttpResponse> {
    let date = state.event_date();
    let event = state.store()?.load(date);

    let roster = event.roster();
    let substitutes = event.substitutes();
    let schedule = event
        .schedule
        .as_ref()
        .map(|schedule| ScheduleTable::from_schedule(schedule, &state.clock));

    Ok(HttpResponse::Ok().json(EventResponse {
        date: event_title(date),
        date_key: event_key(date),
        signup_open: !roster.is_full(),
        players: event.players,
        max_players: MAX_PLAYERS,
        min_players: MIN_PLAYERS,
        substitutes,
        schedule,
    }))
}

// Sign-up endpoint
async fn signup(req: web::Json<SignupRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let name = match validate_signup(&req) {
        Ok(name) => name,
        Err(message) => return Ok(HttpResponse::BadRequest().json(error_json(message))),
    };

    let date = state.event_date();
    let result = state.store()?.add_player(date, &name);
    match result {
        Ok(player) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "player": player,
        }))),
        Err(StoreError::Roster(e @ (RosterError::AlreadySignedUp(_) | RosterError::Full { .. }))) => {
            Ok(HttpResponse::Conflict().json(error_json(e.to_string())))
        }
        Err(StoreError::Roster(e)) => Ok(HttpResponse::BadRequest().json(error_json(e.to_string()))),
        Err(e) => Ok(store_failure(e)),
    }
}

// Admin login endpoint
async fn admin_login(
    req: web::Json<LoginRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let failed = session.get::<u32>(ATTEMPTS_SESSION_KEY)?.unwrap_or(0);

    match check_login(
        &req.password,
        &state.admin_password_hash,
        failed,
        state.max_login_attempts,
    ) {
        LoginOutcome::Accepted => {
            session.remove(ATTEMPTS_SESSION_KEY);
            session.insert(ADMIN_SESSION_KEY, true)?;
            info!("Admin logged in");
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        LoginOutcome::Rejected { remaining } => {
            session.insert(ATTEMPTS_SESSION_KEY, failed + 1)?;
            warn!(remaining, "Rejected admin password");
            Ok(HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": "Password incorrect",
                "remaining_attempts": remaining,
            })))
        }
        LoginOutcome::LockedOut => Ok(HttpResponse::TooManyRequests().json(error_json(
            "Too many incorrect attempts. Please try again later.",
        ))),
    }
}

async fn admin_logout(session: Session) -> Result<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// Generate endpoint; a failed run leaves the saved schedule untouched
async fn generate(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&session)? {
        return Ok(unauthorized());
    }

    let date = state.event_date();
    let mut store = state.store()?;
    let lineup = match Lineup::from_roster(&store.load(date).roster()) {
        Ok(lineup) => lineup,
        Err(e) => return Ok(HttpResponse::BadRequest().json(error_json(e.to_string()))),
    };

    let schedule = match state
        .generator
        .generate(&lineup.players, lineup.num_courts, &mut rand::thread_rng())
    {
        Ok(schedule) => schedule,
        Err(e @ ScheduleError::GenerationFailure { .. }) => {
            warn!(event = %date, "{}", e);
            return Ok(HttpResponse::UnprocessableEntity().json(error_json(
                "Unable to generate a schedule without repeating pairs.",
            )));
        }
        Err(e) => return Ok(HttpResponse::BadRequest().json(error_json(e.to_string()))),
    };

    let table = ScheduleTable::from_schedule(&schedule, &state.clock);
    if let Err(e) = store.save_schedule(date, schedule) {
        return Ok(store_failure(e));
    }
    info!(event = %date, courts = lineup.num_courts, "Schedule generated");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Schedule generated successfully.",
        "schedule": table,
        "substitutes": lineup.substitutes,
    })))
}

// Clear endpoint: drops roster and schedule, then forgets the admin login
async fn clear(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&session)? {
        return Ok(unauthorized());
    }

    let date = state.event_date();
    let result = state.store()?.clear(date);
    if let Err(e) = result {
        return Ok(store_failure(e));
    }
    session.remove(ADMIN_SESSION_KEY);
    info!(event = %date, "Event cleared");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Schedule cleared.",
    })))
}

// CSV download of the saved schedule
async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let date = state.event_date();
    let event = state.store()?.load(date);

    let Some(schedule) = event.schedule.as_ref() else {
        return Ok(HttpResponse::NotFound().json(error_json("Schedule not available")));
    };
    let substitutes = event.substitutes();

    let table = ScheduleTable::from_schedule(schedule, &state.clock);
    let mut body = Vec::new();
    export_schedule_csv(&table, &substitutes, &mut body)
        .map_err(|e| ErrorInternalServerError(format!("Failed to export schedule: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"tennis_schedule_{}.csv\"", event_key(date)),
        ))
        .body(body))
}

// HTML page handlers
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn admin_page() -> Result<HttpResponse> {
    let html = include_str!("../templates/admin.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Pages and API routes, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/admin", web::get().to(admin_page))
        .route("/api/event", web::get().to(get_event))
        .route("/api/signup", web::post().to(signup))
        .route("/api/login", web::post().to(admin_login))
        .route("/api/logout", web::post().to(admin_logout))
        .route("/api/generate", web::post().to(generate))
        .route("/api/clear", web::post().to(clear))
        .route("/api/export.csv", web::get().to(export_csv));
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);
    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
