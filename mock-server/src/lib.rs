use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256, Sha512};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@webfry.dev";
pub const DEMO_PASSWORD: &str = "correct horse battery staple";
pub const DEMO_API_KEY: &str = "demo-key";
pub const API_KEY_HEADER: &str = "x-api-key";

const MAX_USAGE_FOR_PLAN: u64 = 10_000;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "123456789", "12345678", "qwerty", "abc123", "111111", "letmein",
    "iloveyou", "admin", "welcome", "monkey", "dragon", "football", "hunter2",
];

/// (hash, plaintext, algorithm) triples the lookup endpoints can "crack".
const KNOWN_HASHES: &[(&str, &str, &str)] = &[
    ("5f4dcc3b5aa765d61d8327deb882cf99", "password", "MD5"),
    ("5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8", "password", "SHA-1"),
    ("5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8", "password", "SHA-256"),
    ("e10adc3949ba59abbe56e057f20f883e", "123456", "MD5"),
    ("7c4a8d09ca3762af61e59520943dc26494f8941b", "123456", "SHA-1"),
    ("8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92", "123456", "SHA-256"),
    ("0d107d09f5bbe40cade3de5c71e9e9b7", "letmein", "MD5"),
];

#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub api_key: String,
    pub plan: String,
    pub api_usage: u64,
    pub created_at: String,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub accounts: Vec<Account>,
}

impl MockState {
    /// State with the demo account, authenticated by `api_key`.
    pub fn with_demo_account(api_key: &str) -> Self {
        Self {
            accounts: vec![Account {
                email: DEMO_EMAIL.to_string(),
                password: DEMO_PASSWORD.to_string(),
                api_key: api_key.to_string(),
                plan: "pro".to_string(),
                api_usage: 0,
                created_at: "2024-01-01T00:00:00Z".to_string(),
            }],
        }
    }
}

pub type Db = Arc<RwLock<MockState>>;

/// Error responses in the shapes the real service uses.
#[derive(Debug)]
pub enum Failure {
    /// `{"error": ...}` body.
    Error(StatusCode, String),
    /// `{"message": ...}` body.
    Message(StatusCode, String),
    /// No body at all.
    Empty(StatusCode),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Failure::Error(status, error) => (status, Json(json!({ "error": error }))).into_response(),
            Failure::Message(status, message) => {
                (status, Json(json!({ "message": message }))).into_response()
            }
            Failure::Empty(status) => status.into_response(),
        }
    }
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordBody {
    pub password: String,
}

#[derive(Deserialize)]
pub struct HashesBody {
    pub hashes: String,
}

#[derive(Deserialize)]
pub struct HashGeneratorBody {
    pub algorithm: String,
    pub plaintext: String,
}

#[derive(Deserialize)]
pub struct HashBody {
    pub hash: String,
}

#[derive(Deserialize)]
pub struct Base64Body {
    pub text: String,
    pub option: String,
}

#[derive(Deserialize)]
pub struct TokenBody {
    pub token: String,
}

#[derive(Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Deserialize)]
pub struct SuggestionBody {
    #[serde(default)]
    pub email: Option<String>,
    pub message: String,
}

pub fn app() -> Router {
    app_with_state(MockState::with_demo_account(DEMO_API_KEY))
}

pub fn app_with_state(state: MockState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    let api = Router::new()
        .route("/get_api_key", post(get_api_key))
        .route("/new_api_key", post(new_api_key))
        .route("/user_info", post(user_info))
        .route("/password_check", post(password_check))
        .route("/hash_lookup", post(hash_lookup))
        .route("/hash_lookup_site", post(hash_lookup_site))
        .route("/hash_generator", post(hash_generator))
        .route("/base64", post(base64_codec))
        .route("/entropy", post(entropy))
        .route("/hash_identifier", post(hash_identifier))
        .route("/generate_random_key", post(generate_random_key))
        .route("/jwt_decoder", post(jwt_decoder))
        .route("/secure_encrypt", post(not_available))
        .route("/secure_decrypt", post(not_available))
        .route("/json_format", post(json_format))
        .route("/json_minify", post(json_minify))
        .route("/common_pwd", post(common_pwd))
        .route("/suggestion", post(suggestion))
        .route("/ip_info", post(under_construction))
        .route("/data_breach", post(under_construction))
        .with_state(db);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::with_demo_account(DEMO_API_KEY)).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Resolve the caller's account from the API key header and count the call.
async fn authenticate(db: &Db, headers: &HeaderMap) -> Result<Account, Failure> {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Failure::Error(StatusCode::UNAUTHORIZED, "missing API key".to_string()))?;

    let mut state = db.write().await;
    let account = state
        .accounts
        .iter_mut()
        .find(|a| a.api_key == key)
        .ok_or_else(|| Failure::Error(StatusCode::UNAUTHORIZED, "invalid API key".to_string()))?;
    account.api_usage += 1;
    Ok(account.clone())
}

async fn get_api_key(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<Value>, Failure> {
    let state = db.read().await;
    state
        .accounts
        .iter()
        .find(|a| a.email == input.email && a.password == input.password)
        .map(|a| Json(json!({ "api_key": a.api_key })))
        .ok_or_else(|| Failure::Error(StatusCode::UNAUTHORIZED, "invalid credentials".to_string()))
}

async fn new_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let account = authenticate(&db, &headers).await?;
    let fresh = Uuid::new_v4().simple().to_string();

    let mut state = db.write().await;
    if let Some(a) = state.accounts.iter_mut().find(|a| a.email == account.email) {
        a.api_key = fresh.clone();
    }
    Ok(Json(json!({ "api_key": fresh })))
}

async fn user_info(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let account = authenticate(&db, &headers).await?;
    Ok(Json(json!({
        "email": account.email,
        "paid_until": null,
        "plan": account.plan,
        "api_usage": account.api_usage,
        "max_usage_for_plan": MAX_USAGE_FOR_PLAN,
        "created_at": account.created_at,
    })))
}

async fn password_check(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PasswordBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(strength_report(&input.password)))
}

async fn entropy(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PasswordBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    let bits = entropy_bits(&input.password);
    Ok(Json(json!({
        "entropy": round2(bits),
        "estimate_brute_force": crack_time(bits),
    })))
}

async fn common_pwd(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PasswordBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    let is_common = COMMON_PASSWORDS.contains(&input.password.to_lowercase().as_str());
    Ok(Json(json!({ "is_common": is_common })))
}

async fn hash_lookup(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<HashesBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(lookup_hashes(&input.hashes)))
}

async fn hash_lookup_site(Json(input): Json<HashesBody>) -> Json<Value> {
    Json(lookup_hashes(&input.hashes))
}

async fn hash_generator(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<HashGeneratorBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    let hash = match input.algorithm.to_ascii_lowercase().as_str() {
        "sha256" => format!("{:x}", Sha256::digest(input.plaintext.as_bytes())),
        "sha512" => format!("{:x}", Sha512::digest(input.plaintext.as_bytes())),
        other => {
            return Err(Failure::Error(
                StatusCode::BAD_REQUEST,
                format!("unsupported algorithm: {other}"),
            ))
        }
    };
    Ok(Json(json!({ "algorithm": input.algorithm, "hash": hash })))
}

async fn hash_identifier(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<HashBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(json!({ "estimate": identify_hash(input.hash.trim()) })))
}

async fn base64_codec(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Base64Body>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    let outcome = match input.option.as_str() {
        "encode" => Ok(STANDARD.encode(input.text.as_bytes())),
        "decode" => STANDARD
            .decode(input.text.trim())
            .map_err(|e| format!("invalid base64: {e}"))
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|_| "decoded bytes are not valid UTF-8".to_string())
            }),
        other => {
            return Err(Failure::Error(
                StatusCode::BAD_REQUEST,
                format!("unknown option: {other}"),
            ))
        }
    };
    Ok(Json(match outcome {
        Ok(answer) => json!({ "answer": answer, "error": null }),
        Err(error) => json!({ "answer": "", "error": error }),
    }))
}

async fn generate_random_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(json!({ "random_key": Uuid::new_v4().simple().to_string() })))
}

async fn jwt_decoder(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(match decode_jwt(&input.token) {
        Ok(decoded) => json!({ "answer": decoded.to_string(), "error": "" }),
        Err(error) => json!({ "answer": "", "error": error }),
    }))
}

async fn json_format(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TextBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(reformat(&input.text, true)))
}

async fn json_minify(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TextBody>,
) -> Result<Json<Value>, Failure> {
    authenticate(&db, &headers).await?;
    Ok(Json(reformat(&input.text, false)))
}

async fn suggestion(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<SuggestionBody>,
) -> Result<String, Failure> {
    authenticate(&db, &headers).await?;
    if input.message.trim().is_empty() {
        return Err(Failure::Message(
            StatusCode::BAD_REQUEST,
            "message must not be empty".to_string(),
        ));
    }
    tracing::info!(from = input.email.as_deref().unwrap_or("anonymous"), "suggestion received");
    Ok("Thanks for the suggestion!".to_string())
}

async fn not_available(State(db): State<Db>, headers: HeaderMap) -> Failure {
    match authenticate(&db, &headers).await {
        Err(failure) => failure,
        Ok(_) => Failure::Error(
            StatusCode::NOT_IMPLEMENTED,
            "not available on the mock server".to_string(),
        ),
    }
}

async fn under_construction(State(db): State<Db>, headers: HeaderMap) -> Failure {
    match authenticate(&db, &headers).await {
        Err(failure) => failure,
        Ok(_) => Failure::Empty(StatusCode::SERVICE_UNAVAILABLE),
    }
}

// ---------------------------------------------------------------------------
// Canned analysis
// ---------------------------------------------------------------------------

fn charset_size(password: &str) -> u32 {
    let mut size = 0;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        size += 26;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        size += 26;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        size += 10;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        size += 33;
    }
    size
}

pub fn entropy_bits(password: &str) -> f64 {
    let size = charset_size(password);
    if size == 0 {
        return 0.0;
    }
    password.chars().count() as f64 * f64::from(size).log2()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Average brute-force time at ten billion guesses per second.
pub fn crack_time(bits: f64) -> String {
    let seconds = 2f64.powf(bits) / 2.0 / 1e10;
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;
    const YEAR: f64 = 365.25 * DAY;

    if seconds < 1.0 {
        "instant".to_string()
    } else if seconds < MINUTE {
        format!("{} seconds", seconds.round())
    } else if seconds < HOUR {
        format!("{} minutes", (seconds / MINUTE).round())
    } else if seconds < DAY {
        format!("{} hours", (seconds / HOUR).round())
    } else if seconds < YEAR {
        format!("{} days", (seconds / DAY).round())
    } else if seconds < 1000.0 * YEAR {
        format!("{} years", (seconds / YEAR).round())
    } else {
        "centuries".to_string()
    }
}

pub fn strength_report(password: &str) -> Value {
    let bits = entropy_bits(password);
    let common = COMMON_PASSWORDS.contains(&password.to_lowercase().as_str());
    let (score, label) = match bits {
        _ if common => (0, "very weak"),
        b if b < 28.0 => (0, "very weak"),
        b if b < 36.0 => (1, "weak"),
        b if b < 60.0 => (2, "reasonable"),
        b if b < 128.0 => (3, "strong"),
        _ => (4, "very strong"),
    };

    let mut feedback = Vec::new();
    if password.chars().count() < 12 {
        feedback.push("Use at least 12 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        feedback.push("Add uppercase letters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        feedback.push("Add digits");
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        feedback.push("Add symbols");
    }
    if common {
        feedback.push("This password appears in common password lists");
    }

    json!({
        "score": score,
        "label": label,
        "feedback": feedback,
        "length": password.chars().count(),
        "entropy": round2(bits),
        "charset_size": charset_size(password),
        "estimated_crack_time": crack_time(bits),
    })
}

pub fn identify_hash(hash: &str) -> &'static str {
    if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
        return "bcrypt";
    }
    if hash.starts_with("$argon2") {
        return "Argon2";
    }
    if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return "Unknown";
    }
    match hash.len() {
        32 => "MD5",
        40 => "SHA-1",
        64 => "SHA-256",
        128 => "SHA-512",
        _ => "Unknown",
    }
}

pub fn lookup_hashes(raw: &str) -> Value {
    let hashes: Vec<&str> = raw
        .split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .collect();

    let results: Vec<Value> = hashes
        .iter()
        .map(|hash| {
            let needle = hash.to_ascii_lowercase();
            match KNOWN_HASHES.iter().find(|(known, _, _)| *known == needle) {
                Some((_, plaintext, kind)) => {
                    json!({ "hash": hash, "plaintext": plaintext, "type": kind, "found": true })
                }
                None => json!({ "hash": hash, "plaintext": null, "type": null, "found": false }),
            }
        })
        .collect();

    let total_found = results.iter().filter(|r| r["found"] == true).count();
    let success_rate = if hashes.is_empty() {
        0.0
    } else {
        round2(total_found as f64 / hashes.len() as f64 * 100.0)
    };

    json!({
        "results": results,
        "summary": {
            "total_searched": hashes.len(),
            "total_found": total_found,
            "success_rate": success_rate,
        }
    })
}

pub fn decode_jwt(token: &str) -> Result<Value, String> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err("token must have three dot-separated segments".to_string());
    }

    let decode_segment = |segment: &str| -> Result<Value, String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment.trim_end_matches('='))
            .map_err(|e| format!("invalid base64url segment: {e}"))?;
        serde_json::from_slice(&bytes).map_err(|e| format!("segment is not JSON: {e}"))
    };

    Ok(json!({
        "header": decode_segment(segments[0])?,
        "payload": decode_segment(segments[1])?,
    }))
}

fn reformat(text: &str, pretty: bool) -> Value {
    let rendered = serde_json::from_str::<Value>(text).and_then(|v| {
        if pretty {
            serde_json::to_string_pretty(&v)
        } else {
            serde_json::to_string(&v)
        }
    });
    match rendered {
        Ok(result) => json!({ "result": result, "error": "" }),
        Err(error) => json!({ "result": "", "error": error.to_string() }),
    }
}
