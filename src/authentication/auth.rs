use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::{AppState, SharedState};
use crate::authorization::permissions::PermissionSet;
use crate::change_password_request::ChangePasswordRequest;
use crate::data_access::data_context::StoreError;
use crate::login_request::LoginRequest;
use crate::login_response::LoginResponse;
use crate::settings::Settings;
use crate::user::User;
use crate::user_get_response::UserGetResponse;

/// Bearer token payload. Expiry is fixed at issuance, with no refresh
/// flow; an expired or malformed token is simply unauthenticated.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub jti: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// The authenticated caller, resolved once per request by the middleware:
/// the account record plus the flags of its role.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub permissions: PermissionSet,
    pub role_name: String,
}

// ── Tokens & passwords ─────────────────────────────────────────

pub fn create_token(
    user: &User,
    role_name: &str,
    settings: &Settings,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiry = now + Duration::minutes(settings.jwt_expiration_in_minutes as i64);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: role_name.to_string(),
        jti: Uuid::new_v4(),
        exp: expiry.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, settings: &Settings) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// ── Handler logic ──────────────────────────────────────────────

/// Unknown username, wrong password, and deactivated account are all the
/// same 401; login never says which part failed.
pub fn login(state: &AppState, payload: LoginRequest) -> Result<LoginResponse, (StatusCode, String)> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .data_context
        .get_user_by_username(payload.username.trim())
        .map_err(store_failure)?
        .filter(|u| u.is_active)
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    let role_name = state
        .data_context
        .get_role(user.role_id)
        .map_err(store_failure)?
        .map(|r| r.name)
        .unwrap_or_else(|| "User".to_string());

    let token = create_token(&user, &role_name, &state.settings).map_err(|e| {
        tracing::error!("token creation failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;

    tracing::info!("{} logged in", user.username);
    Ok(LoginResponse {
        token,
        user: user.to_get_dto(&role_name),
    })
}

pub fn current_user_response(caller: &CurrentUser) -> UserGetResponse {
    caller.user.to_get_dto(&caller.role_name)
}

pub fn change_password(
    state: &AppState,
    caller: &CurrentUser,
    payload: ChangePasswordRequest,
) -> Result<(), (StatusCode, String)> {
    if payload.new_password.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "New password is required".to_string()));
    }

    let mut user = state
        .data_context
        .get_user(caller.user.id)
        .map_err(store_failure)?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    if !verify_password(&payload.current_password, &user.password_hash) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Current password is incorrect".to_string(),
        ));
    }

    user.password_hash = hash_password(&payload.new_password).map_err(|e| {
        tracing::error!("password hash failed: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;
    user.updated_at = Some(Utc::now());

    let email = user.email.clone();
    state
        .data_context
        .update_user(&user, &email)
        .map_err(store_failure)?;
    Ok(())
}

// ── Middleware ─────────────────────────────────────────────────

/// Verify the bearer token, resolve the account and its role, and stash the
/// caller in request extensions. Deactivated accounts are rejected here, so
/// downstream code only ever sees active callers.
pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Missing or invalid token".to_string(),
            ))
        }
    };

    let claims = verify_token(token, &state.settings)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid token".to_string()))?;

    let user = state
        .data_context
        .get_user(claims.sub)
        .map_err(store_failure)?
        .filter(|u| u.is_active)
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    let (permissions, role_name) = match state
        .data_context
        .get_role(user.role_id)
        .map_err(store_failure)?
    {
        Some(role) => (role.permissions, role.name),
        None => (PermissionSet::none(), "User".to_string()),
    };

    request.extensions_mut().insert(CurrentUser {
        user,
        permissions,
        role_name,
    });
    Ok(next.run(request).await)
}

fn store_failure(e: StoreError) -> (StatusCode, String) {
    tracing::error!("store failure: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(secret: &str) -> Settings {
        Settings {
            tcp_socket_binding: "127.0.0.1".into(),
            tcp_socket_port: 0,
            database_path: String::new(),
            jwt_secret: secret.into(),
            jwt_expiration_in_minutes: 120,
            default_admin_username: "admin".into(),
            default_admin_password: "admin123".into(),
            default_admin_email: "admin@taskmanager.com".into(),
            default_admin_full_name: "Administrator".into(),
        }
    }

    fn test_user() -> User {
        User::new(
            "Jane Doe".into(),
            "jane".into(),
            "jane@example.com".into(),
            "unused".into(),
            2,
        )
    }

    #[test]
    fn token_round_trip_carries_identity_claims() {
        let settings = test_settings("round-trip-secret");
        let user = test_user();

        let token = create_token(&user, "Director", &settings).unwrap();
        let claims = verify_token(&token, &settings).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "jane");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.role, "Director");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let user = test_user();
        let token = create_token(&user, "User", &test_settings("secret-a")).unwrap();
        assert!(verify_token(&token, &test_settings("secret-b")).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = test_settings("expiry-secret");
        let user = test_user();
        let past = Utc::now() - Duration::hours(3);
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: "User".into(),
            jti: Uuid::new_v4(),
            exp: (past + Duration::minutes(5)).timestamp() as usize,
            iat: past.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &settings).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not.a.token", &test_settings("s")).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2"); // never stored in the clear
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
