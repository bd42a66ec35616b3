// GPA Ledger - Web Server
// JSON API over a single in-memory ledger

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use gpa_ledger::{
    Config, Entry, GpaLedger, GradeView, LedgerError, ModuleView, OverallSummary, SemesterId,
    SemesterSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
struct AppState {
    ledger: Arc<Mutex<GpaLedger>>,
}

impl AppState {
    fn new(ledger: GpaLedger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, GpaLedger> {
        // ledger mutations are single pushes/clears, so a poisoned value is still consistent
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message),
    };
    (status, Json(body)).into_response()
}

fn status_for(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::DuplicateModule { .. } => StatusCode::CONFLICT,
        LedgerError::UnknownSemester(_) => StatusCode::NOT_FOUND,
        LedgerError::UnknownModule { .. }
        | LedgerError::UnknownGrade(_)
        | LedgerError::MissingSelection => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::MalformedInput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn ledger_error(err: LedgerError) -> Response {
    error_response(status_for(&err), err.to_string())
}

fn parse_semester(raw: &str) -> Result<SemesterId, Response> {
    raw.parse::<SemesterId>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))
}

/// Semester detail: summary plus the module catalog to pick from
#[derive(Serialize)]
struct SemesterResponse {
    #[serde(flatten)]
    summary: SemesterSummary,
    modules: Vec<ModuleView>,
}

#[derive(Debug, Deserialize)]
struct AddEntryRequest {
    module: String,
    grade: String,
}

#[derive(Serialize)]
struct ResetResponse {
    removed: usize,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/grades - Grade scale in file order
async fn get_grades(State(state): State<AppState>) -> Json<ApiResponse<Vec<GradeView>>> {
    Json(ApiResponse::ok(state.ledger().grade_scale().views()))
}

/// GET /api/semesters - Every semester with its current entries
async fn get_semesters(State(state): State<AppState>) -> Json<ApiResponse<Vec<SemesterSummary>>> {
    Json(ApiResponse::ok(state.ledger().overall_summary().semesters))
}

/// GET /api/semesters/:id - One semester with its module catalog
async fn get_semester(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let id = match parse_semester(&raw) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let ledger = state.ledger();
    let record = match ledger.semester(id) {
        Ok(record) => record,
        Err(e) => return ledger_error(e),
    };

    let response = SemesterResponse {
        summary: SemesterSummary::from_record(record),
        modules: record.catalog().views(),
    };
    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// POST /api/semesters/:id/entries - Add a module/grade selection
async fn add_entry(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(request): Json<AddEntryRequest>,
) -> Response {
    let id = match parse_semester(&raw) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let mut ledger = state.ledger();
    match ledger.add_entry(id, &request.module, &request.grade) {
        Ok(entry) => {
            let entry: Entry = entry.clone();
            (StatusCode::CREATED, Json(ApiResponse::ok(entry))).into_response()
        }
        Err(e) => {
            if e.is_recoverable_notice() {
                info!("{}", e);
            } else {
                warn!(semester = %id, "entry rejected: {}", e);
            }
            ledger_error(e)
        }
    }
}

/// DELETE /api/semesters/:id/entries - Reset a semester
async fn reset_semester(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let id = match parse_semester(&raw) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.ledger().reset_semester(id) {
        Ok(removed) => (StatusCode::OK, Json(ApiResponse::ok(ResetResponse { removed }))).into_response(),
        Err(e) => ledger_error(e),
    }
}

/// GET /api/overall - Overall GPA and classification
async fn get_overall(State(state): State<AppState>) -> Json<ApiResponse<OverallSummary>> {
    Json(ApiResponse::ok(state.ledger().overall_summary()))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/grades", get(get_grades))
        .route("/semesters", get(get_semesters))
        .route("/semesters/:id", get(get_semester))
        .route("/semesters/:id/entries", axum::routing::post(add_entry).delete(reset_semester))
        .route("/overall", get(get_overall))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // gpa-server [DATA_DIR | CONFIG.json]
    let config = match std::env::args().nth(1) {
        Some(arg) if arg.ends_with(".json") => Config::from_file(&arg)?,
        Some(dir) => Config::from_data_dir(dir),
        None => Config::default(),
    };

    let ledger = GpaLedger::load(&config).context("Failed to load grade reference data")?;
    let app = router(AppState::new(ledger));

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://localhost:3000/api/overall");

    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpa_ledger::GradeScale;

    fn state() -> AppState {
        let scale: GradeScale = vec![("A", 4.0), ("B", 3.0)].into_iter().collect();
        let mut ledger = GpaLedger::new(scale);
        ledger.register_semester(SemesterId::new(1), vec![("Math", 3.0), ("Eng", 2.0)].into_iter().collect());
        AppState::new(ledger)
    }

    fn request(module: &str, grade: &str) -> Json<AddEntryRequest> {
        Json(AddEntryRequest {
            module: module.to_string(),
            grade: grade.to_string(),
        })
    }

    #[test]
    fn test_status_mapping() {
        let s1 = SemesterId::new(1);
        assert_eq!(
            status_for(&LedgerError::DuplicateModule { semester: s1, module: "Math".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_for(&LedgerError::UnknownSemester(s1)), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&LedgerError::UnknownGrade("Z".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&LedgerError::MissingSelection), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_add_entry_flow() {
        let state = state();

        let resp = add_entry(State(state.clone()), Path("1".to_string()), request("Math", "A")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = add_entry(State(state.clone()), Path("1".to_string()), request("Eng", "B")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = add_entry(State(state.clone()), Path("1".to_string()), request("Math", "B")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let Json(overall) = get_overall(State(state.clone())).await;
        let summary = overall.data.unwrap();
        assert!((summary.gpa - 3.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_bad_semester_paths() {
        let state = state();

        let resp = add_entry(State(state.clone()), Path("abc".to_string()), request("Math", "A")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = get_semester(State(state.clone()), Path("7".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset() {
        let state = state();
        add_entry(State(state.clone()), Path("1".to_string()), request("Math", "A")).await;

        let resp = reset_semester(State(state.clone()), Path("1".to_string())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.ledger().overall_gpa(), 0.0);
    }
}
