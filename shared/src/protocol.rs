use crate::{Profile, Role};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Token + profile pair returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Profile,
}

/// Profile wrapper shape used by validate and the profile endpoints:
/// `{ "user": Profile }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub user: Profile,
}

/// Authenticate with email + password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Create an account. The backend responds exactly like login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Validate the persisted token and fetch the current profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest;

impl ApiRequest for ValidateRequest {
    type Response = ProfileEnvelope;
    const PATH: &'static str = "/api/auth/validate";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Read the current profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = ProfileEnvelope;
    const PATH: &'static str = "/api/auth/profile";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Replace the mutable profile fields. The response carries the full
/// refreshed profile, which the client swaps in wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = ProfileEnvelope;
    const PATH: &'static str = "/api/auth/profile";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The client builds every request from these constants alone, so
    // they are the wire contract with the backend.
    #[test]
    fn endpoints_declare_path_and_method() {
        assert_eq!(LoginRequest::PATH, "/api/auth/login");
        assert_eq!(LoginRequest::METHOD, HttpMethod::Post);
        assert_eq!(RegisterRequest::METHOD, HttpMethod::Post);
        assert_eq!(ValidateRequest::METHOD, HttpMethod::Get);
        assert_eq!(GetProfileRequest::METHOD, HttpMethod::Get);
        assert_eq!(UpdateProfileRequest::METHOD, HttpMethod::Put);
        // Read and update share one profile resource
        assert_eq!(UpdateProfileRequest::PATH, GetProfileRequest::PATH);
    }

    #[test]
    fn method_maps_to_wire_name() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }
}
