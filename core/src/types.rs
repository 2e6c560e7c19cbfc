//! Request and response DTOs for the Webfry API.
//!
//! # Design
//! Field names match the wire format exactly. Response fields the service
//! documents as optional or nullable are `Option` with `#[serde(default)]`,
//! so a server omitting them still deserializes. Request types skip `None`
//! fields rather than sending `null`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Credentials exchanged for an API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

/// Account details for the key in use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfoResponse {
    pub email: String,
    #[serde(default)]
    pub paid_until: Option<String>,
    /// `starter`, `pro`, `enterprise`, or a plan name this crate does not know.
    pub plan: String,
    pub api_usage: u64,
    #[serde(default)]
    pub max_usage_for_plan: Option<u64>,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordCheckBody {
    pub password: String,
}

/// Strength assessment returned by `password_check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrengthResult {
    pub score: f64,
    pub label: String,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_crack_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntropyRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntropyResponse {
    pub entropy: f64,
    pub estimate_brute_force: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResponse {
    pub is_common: bool,
}

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

/// `hashes` holds one or more hashes separated by newlines or commas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashLookupBody {
    pub hashes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashResult {
    pub hash: String,
    #[serde(default)]
    pub plaintext: Option<String>,
    #[serde(default, rename = "type")]
    pub hash_type: Option<String>,
    pub found: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HashSummary {
    pub total_searched: u64,
    pub total_found: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HashLookupOutput {
    pub results: Vec<HashResult>,
    pub summary: HashSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashGeneratorRequest {
    pub algorithm: String,
    pub plaintext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashGeneratorResponse {
    pub algorithm: String,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashIdentifierRequest {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashIdentifierResponse {
    pub estimate: String,
}

// ---------------------------------------------------------------------------
// Encoding and crypto helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Base64Option {
    Encode,
    Decode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Base64Request {
    pub text: String,
    pub option: Base64Option,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Base64Response {
    pub answer: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRandomKeyResponse {
    pub random_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtResponse {
    pub answer: String,
    #[serde(default)]
    pub error: String,
}

/// Input for `secure_encrypt` and `secure_decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CryptoRequest {
    pub text: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CryptoResponse {
    pub result: String,
    #[serde(default)]
    pub error: String,
}

/// Input for `json_format` and `json_minify`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonResponse {
    pub result: String,
    #[serde(default)]
    pub error: String,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
}

/// Body of `ip_info` and `data_breach`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpRequest {
    pub ip_string: String,
}
