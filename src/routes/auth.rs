use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    #[serde(rename = "userId", alias = "id")]
    user_id: Option<String>,
}

/// Validates session tokens issued by the platform's auth service
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtVerifier {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            cookie_name: cookie_name.into(),
        }
    }

    /// Requester id carried by `token`
    pub fn verify(&self, token: &str) -> Result<String, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            ApiError::Unauthorized("Invalid or expired session".to_string())
        })?;

        data.claims
            .user_id
            .or(data.claims.sub)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Session carries no user id".to_string()))
    }

    /// Bearer header first, then the session cookie
    fn token_from_request(&self, req: &HttpRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        bearer.or_else(|| req.cookie(&self.cookie_name).map(|c| c.value().to_string()))
    }

    pub fn authenticate(&self, req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
        let token = self
            .token_from_request(req)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        self.verify(&token).map(|user_id| AuthenticatedUser { user_id })
    }
}

/// The requester, as proven by a valid session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<JwtVerifier>>() {
            Some(verifier) => verifier.authenticate(req),
            None => Err(ApiError::Unauthorized("Authentication is not configured".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, test::TestRequest};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        #[serde(rename = "userId")]
        user_id: &'a str,
        exp: usize,
    }

    fn token(secret: &str, user_id: &str) -> String {
        let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        encode(
            &Header::default(),
            &TestClaims { user_id, exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let verifier = JwtVerifier::new("secret", "accessToken");
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token("secret", "u1"))))
            .to_http_request();

        assert_eq!(verifier.authenticate(&req).unwrap().user_id, "u1");
    }

    #[test]
    fn test_cookie_token() {
        let verifier = JwtVerifier::new("secret", "accessToken");
        let req = TestRequest::default()
            .cookie(Cookie::new("accessToken", token("secret", "u2")))
            .to_http_request();

        assert_eq!(verifier.authenticate(&req).unwrap().user_id, "u2");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = JwtVerifier::new("secret", "accessToken");
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token("other", "u1"))))
            .to_http_request();

        assert!(matches!(verifier.authenticate(&req), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_missing_token_rejected() {
        let verifier = JwtVerifier::new("secret", "accessToken");
        let req = TestRequest::default().to_http_request();

        assert!(matches!(verifier.authenticate(&req), Err(ApiError::Unauthorized(_))));
    }
}
