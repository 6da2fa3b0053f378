use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use daybook_core::analytics::{
    activity_trends, analyze_time_allocation, calendar_stats, countdowns,
};
use daybook_core::assistant::answer_question;
use daybook_core::categorize::{KeywordCategorizer, OracleCategorizer};
use daybook_core::plan::{
    OraclePlanner, PlanOutcome, TemplatePlanner, generate_week_plan, preview_parse,
};
use daybook_core::{Oracle, ServiceError, WeekWindow, WithFallback};
use daybook_store::calendar::{monday_of, parse_date_key};
use daybook_store::queries::{labels as label_queries, notes as note_queries};
use daybook_store::{DeletionReport, JsonStore, StoreError};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub oracle: Arc<dyn Oracle>,
}

impl AppState {
    pub fn new(store: JsonStore, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            store: Arc::new(store),
            oracle,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => Self::bad_request(msg),
            StoreError::NotFound(msg) => Self::not_found(msg),
            other => {
                tracing::error!(error = %other, "store failure");
                Self::internal(other.to_string())
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::bad_request(msg),
            ServiceError::Store(err) => err.into(),
            other => {
                tracing::error!(error = %other, "service failure");
                Self::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<Response, AppError>;

fn success() -> Response {
    Json(json!({ "status": "success" })).into_response()
}

fn success_with(message: impl Into<String>) -> Response {
    Json(json!({ "status": "success", "message": message.into() })).into_response()
}

/// Treat a missing or blank string field as absent.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateRequest {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LabelRequest {
    pub date: Option<String>,
    pub label: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveNoteRequest {
    pub date: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateNoteRequest {
    pub date: Option<String>,
    pub contents: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteNoteRequest {
    pub date: Option<String>,
    pub note_index: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateRangeRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatesRequest {
    pub dates: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeekRequest {
    pub week_start: Option<String>,
}

/// A number that clients may send either as JSON number or as string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Int(i64),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonthRequest {
    pub year: Option<LooseNumber>,
    pub month: Option<LooseNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoalRequest {
    pub goal: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DebugResponseRequest {
    pub response: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarkImportantRequest {
    pub date: Option<String>,
    pub activity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletionResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: DeletionReport,
    pub message: String,
}

impl DeletionResponse {
    fn new(report: DeletionReport, message: String) -> Self {
        Self {
            status: "success",
            report,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/get_notes", get(get_notes))
        .route("/get_labels", get(get_labels))
        .route("/save_label", post(save_label))
        .route("/update_label", post(update_label))
        .route("/delete_label", post(delete_label))
        .route("/get_labels_for_month", get(get_labels_for_month))
        .route("/get_notes_for_month", get(get_notes_for_month))
        .route("/save_note", post(save_note))
        .route("/update_note", post(update_note))
        .route("/delete_note", post(delete_note))
        .route("/delete_all_notes", post(delete_all_notes))
        .route("/delete_date_range", post(delete_date_range))
        .route("/delete_multiple_dates", post(delete_multiple_dates))
        .route("/delete_week", post(delete_week))
        .route("/delete_month", post(delete_month))
        .route("/generate_plan", post(generate_plan))
        .route("/ask_ai", post(ask_ai))
        .route("/get_week_dates", get(get_week_dates))
        .route("/get_calendar_stats", get(get_calendar_stats))
        .route("/analyze_time_allocation", get(get_time_allocation))
        .route("/get_activity_trends", get(get_activity_trends))
        .route("/debug/ai_response", post(debug_ai_response))
        .route("/get_countdowns", get(get_countdowns))
        .route("/mark_as_important", post(mark_as_important))
        .route("/unmark_as_important", post(unmark_as_important))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("daybook serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("daybook serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl+C");
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Handlers: notes and labels
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> ApiResult {
    let notes = note_queries::list_notes(&state.store)?;
    let window = WeekWindow::current();

    let rows = window
        .dates()
        .iter()
        .map(|date| {
            let activities = notes.get(date).map(|a| a.join(", ")).unwrap_or_default();
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(date),
                escape_html(&activities)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = format!(
        "<!DOCTYPE html>\
<html><head><title>daybook</title></head><body>\
<h1>daybook</h1>\
<p><a href=\"/get_notes\">/get_notes</a> | <a href=\"/get_labels\">/get_labels</a> | \
<a href=\"/get_calendar_stats\">/get_calendar_stats</a> | <a href=\"/get_countdowns\">/get_countdowns</a></p>\
<table><tr><th>Date</th><th>Activities</th></tr>{rows}</table>\
</body></html>"
    );

    Ok(Html(html).into_response())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

async fn get_notes(State(state): State<AppState>) -> ApiResult {
    Ok(Json(note_queries::list_notes(&state.store)?).into_response())
}

async fn get_labels(State(state): State<AppState>) -> ApiResult {
    Ok(Json(label_queries::list_labels(&state.store)?).into_response())
}

async fn save_label(State(state): State<AppState>, Json(req): Json<LabelRequest>) -> ApiResult {
    let (Some(date), Some(label)) = (required(req.date), required(req.label)) else {
        return Err(AppError::bad_request("Please provide date and label"));
    };
    label_queries::save_label(&state.store, &date, &label, req.color.as_deref())?;
    Ok(success())
}

async fn update_label(State(state): State<AppState>, Json(req): Json<LabelRequest>) -> ApiResult {
    let (Some(date), Some(label)) = (required(req.date), required(req.label)) else {
        return Err(AppError::bad_request("Please provide date and label"));
    };
    let color = required(req.color);
    label_queries::update_label(&state.store, &date, &label, color.as_deref())?;
    Ok(success())
}

async fn delete_label(State(state): State<AppState>, Json(req): Json<DateRequest>) -> ApiResult {
    let Some(date) = required(req.date) else {
        return Err(AppError::bad_request("Please provide date"));
    };
    label_queries::delete_label(&state.store, &date)?;
    Ok(success())
}

fn month_params(query: MonthQuery) -> Result<(i32, u32), AppError> {
    match (query.year, query.month) {
        (Some(year), Some(month)) => Ok((year, month)),
        _ => Err(AppError::bad_request(
            "Please provide year and month parameters",
        )),
    }
}

async fn get_labels_for_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult {
    let (year, month) = month_params(query)?;
    Ok(Json(label_queries::labels_for_month(&state.store, year, month)?).into_response())
}

async fn get_notes_for_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult {
    let (year, month) = month_params(query)?;
    Ok(Json(note_queries::notes_for_month(&state.store, year, month)?).into_response())
}

async fn save_note(State(state): State<AppState>, Json(req): Json<SaveNoteRequest>) -> ApiResult {
    let (Some(date), Some(content)) = (required(req.date), req.content) else {
        return Err(AppError::bad_request("Please provide date and content"));
    };
    note_queries::append_note(&state.store, &date, &content)?;
    Ok(success())
}

async fn update_note(
    State(state): State<AppState>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult {
    let (Some(date), Some(contents)) = (required(req.date), req.contents) else {
        return Err(AppError::bad_request("Please provide date and contents list"));
    };
    note_queries::replace_notes(&state.store, &date, contents)?;
    Ok(success())
}

async fn delete_note(
    State(state): State<AppState>,
    Json(req): Json<DeleteNoteRequest>,
) -> ApiResult {
    let (Some(date), Some(index)) = (required(req.date), req.note_index) else {
        return Err(AppError::bad_request("Please provide date and note index"));
    };
    note_queries::delete_note(&state.store, &date, index)?;
    Ok(success())
}

async fn delete_all_notes(
    State(state): State<AppState>,
    Json(req): Json<DateRequest>,
) -> ApiResult {
    let Some(date) = required(req.date) else {
        return Err(AppError::bad_request("Please provide date"));
    };
    note_queries::delete_date(&state.store, &date)?;
    Ok(success())
}

fn deleted_message(report: &DeletionReport) -> String {
    format!(
        "Deleted {} days with {} total notes",
        report.deleted_dates.len(),
        report.deleted_notes_count
    )
}

async fn delete_date_range(
    State(state): State<AppState>,
    Json(req): Json<DateRangeRequest>,
) -> ApiResult {
    let (Some(start), Some(end)) = (required(req.start_date), required(req.end_date)) else {
        return Err(AppError::bad_request(
            "Please provide both start_date and end_date",
        ));
    };
    let start = parse_date_key(&start)?;
    let end = parse_date_key(&end)?;
    let report = note_queries::delete_range(&state.store, start, end)?;
    let message = deleted_message(&report);
    Ok(Json(DeletionResponse::new(report, message)).into_response())
}

async fn delete_multiple_dates(
    State(state): State<AppState>,
    Json(req): Json<DatesRequest>,
) -> ApiResult {
    let Some(dates) = req.dates else {
        return Err(AppError::bad_request("Please provide a list of dates"));
    };
    let report = note_queries::delete_dates(&state.store, &dates)?;
    let message = deleted_message(&report);
    Ok(Json(DeletionResponse::new(report, message)).into_response())
}

async fn delete_week(State(state): State<AppState>, Json(req): Json<WeekRequest>) -> ApiResult {
    let start = match required(req.week_start) {
        Some(start) => parse_date_key(&start)?,
        None => monday_of(today()),
    };
    let (report, end) = note_queries::delete_week(&state.store, start)?;

    if report.is_empty() {
        return Ok(success_with(format!(
            "No notes found for week from {start} to {end}"
        )));
    }
    let message = format!(
        "Deleted week from {start} to {end} with {} total notes",
        report.deleted_notes_count
    );
    let mut body = serde_json::to_value(DeletionResponse::new(report, message))
        .map_err(|e| AppError::internal(e.to_string()))?;
    body["week_start"] = json!(start.to_string());
    body["week_end"] = json!(end.to_string());
    Ok(Json(body).into_response())
}

async fn delete_month(State(state): State<AppState>, Json(req): Json<MonthRequest>) -> ApiResult {
    let (Some(year), Some(month)) = (req.year, req.month) else {
        return Err(AppError::bad_request("Please provide both year and month"));
    };
    let (Some(year), Some(month)) = (year.value(), month.value()) else {
        return Err(AppError::bad_request("Year and month must be valid numbers"));
    };
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request("Month must be between 1 and 12"));
    }
    let year = i32::try_from(year).map_err(|_| AppError::bad_request("Year is out of range"))?;
    let month = month as u32;

    let report = note_queries::delete_month(&state.store, year, month)?;
    let month_name = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"));

    if report.is_empty() {
        return Ok(success_with(format!("No notes found for {month_name}")));
    }
    let message = format!(
        "Deleted {month_name} with {} total notes",
        report.deleted_notes_count
    );
    let mut body = serde_json::to_value(DeletionResponse::new(report, message))
        .map_err(|e| AppError::internal(e.to_string()))?;
    body["month"] = json!(month_name);
    Ok(Json(body).into_response())
}

async fn mark_as_important(
    State(state): State<AppState>,
    Json(req): Json<MarkImportantRequest>,
) -> ApiResult {
    let (Some(date), Some(_activity)) = (required(req.date), required(req.activity)) else {
        return Err(AppError::bad_request("Please provide date and activity"));
    };
    label_queries::mark_important(&state.store, &date)?;
    Ok(success_with("Event marked as important"))
}

async fn unmark_as_important(
    State(state): State<AppState>,
    Json(req): Json<DateRequest>,
) -> ApiResult {
    let Some(date) = required(req.date) else {
        return Err(AppError::bad_request("Please provide date"));
    };
    label_queries::unmark_important(&state.store, &date)?;
    Ok(success_with("Important marking removed"))
}

// ---------------------------------------------------------------------------
// Handlers: planning and analytics
// ---------------------------------------------------------------------------

async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<GoalRequest>,
) -> ApiResult {
    let planner = WithFallback::new(
        OraclePlanner::new(Arc::clone(&state.oracle)),
        TemplatePlanner,
    );
    let outcome =
        generate_week_plan(&state.store, &planner, &req.goal, &WeekWindow::current()).await?;
    Ok(Json(PlanResponse {
        status: "success",
        outcome,
    })
    .into_response())
}

async fn ask_ai(State(state): State<AppState>, Json(req): Json<QuestionRequest>) -> ApiResult {
    match answer_question(&state.store, state.oracle.as_ref(), &req.question).await {
        Ok(answer) => Ok(Json(json!({ "answer": answer })).into_response()),
        Err(ServiceError::Oracle(err)) => {
            tracing::error!(error = %err, "schedule question failed");
            Err(AppError::internal(format!("AI response error: {err}")))
        }
        Err(err) => Err(err.into()),
    }
}

async fn get_week_dates() -> ApiResult {
    Ok(Json(json!({ "week_dates": WeekWindow::current() })).into_response())
}

async fn get_calendar_stats(State(state): State<AppState>) -> ApiResult {
    let notes = note_queries::list_notes(&state.store)?;
    Ok(Json(calendar_stats(&notes, &WeekWindow::current())).into_response())
}

async fn get_time_allocation(State(state): State<AppState>) -> ApiResult {
    let notes = note_queries::list_notes(&state.store)?;
    let categorizer = WithFallback::new(
        OracleCategorizer::new(Arc::clone(&state.oracle)),
        KeywordCategorizer::new(),
    );
    let report = analyze_time_allocation(&notes, &categorizer, &WeekWindow::current())
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(report).into_response())
}

async fn get_activity_trends(State(state): State<AppState>) -> ApiResult {
    let notes = note_queries::list_notes(&state.store)?;
    Ok(Json(activity_trends(&notes, today())).into_response())
}

async fn debug_ai_response(
    Json(req): Json<DebugResponseRequest>,
) -> ApiResult {
    let preview = preview_parse(&req.response, &WeekWindow::current())?;
    Ok(Json(preview).into_response())
}

async fn get_countdowns(State(state): State<AppState>) -> ApiResult {
    let notes = note_queries::list_notes(&state.store)?;
    let labels = label_queries::list_labels(&state.store)?;
    Ok(Json(countdowns(&notes, &labels, today())).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
