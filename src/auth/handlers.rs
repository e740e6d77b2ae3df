use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthData, LoginRequest, ProfileData, SignupRequest},
        extractors::SessionUser,
        password::hash_password,
        repo::User,
        session::SessionKeys,
        strategy::{verify_credentials, AuthError},
    },
    response::{ApiError, Envelope},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

pub async fn home() -> &'static str {
    "homepage"
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found !")
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // The existence check and the insert are not atomic and the schema has
    // no unique index, so two concurrent signups for the same username can
    // both pass this check. Inherited from the original contract.
    match User::find_by_username(&state.db, &payload.username).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(username = %payload.username, "username already taken");
            return Err(ApiError::conflict("User already exists !"));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(e.into());
        }
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(e.into());
        }
    };

    let user = match User::create(&state.db, &payload.username, &hash, "Signed Up").await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    let keys = SessionKeys::from_ref(&state);
    let token = match keys.sign(&user.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session sign failed");
            return Err(e.into());
        }
    };

    info!(username = %user.username, "user signed up");
    Ok((
        [(header::SET_COOKIE, keys.set_cookie(&token))],
        Json(Envelope::ok(
            AuthData {
                username: user.username,
            },
            "Signup successful",
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = match verify_credentials(&state.db, &payload.username, &payload.password).await {
        Ok(u) => u,
        Err(e @ (AuthError::UnknownUser(_) | AuthError::WrongPassword)) => {
            return Err(ApiError::unauthorized(e.to_string()));
        }
        Err(AuthError::Store(e)) => {
            error!(error = %e, "credential check failed");
            return Err(e.into());
        }
    };

    let user = match User::touch_activity(&state.db, &user.username, "Logged In").await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %user.username, "user vanished between check and update");
            return Err(ApiError::unauthorized("User not found"));
        }
        Err(e) => {
            error!(error = %e, "touch_activity failed");
            return Err(e.into());
        }
    };

    let keys = SessionKeys::from_ref(&state);
    let token = match keys.sign(&user.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session sign failed");
            return Err(e.into());
        }
    };

    info!(username = %user.username, "user logged in");
    Ok((
        [(header::SET_COOKIE, keys.set_cookie(&token))],
        Json(Envelope::ok(
            AuthData {
                username: user.username,
            },
            "Login successful",
        )),
    ))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
) -> Result<Json<Envelope<ProfileData>>, ApiError> {
    let user = match User::touch_activity(&state.db, &username, "Viewed Profile").await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %username, "session user not found");
            return Err(ApiError::unauthorized("User not found"));
        }
        Err(e) => {
            error!(error = %e, "touch_activity failed");
            return Err(e.into());
        }
    };

    info!(username = %user.username, "profile viewed");
    Ok(Json(Envelope::ok(
        user.into(),
        "User profile retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_envelope_serialization() {
        let env = Envelope::ok(
            AuthData {
                username: "alice".into(),
            },
            "Login successful",
        );
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["username"], "alice");
        assert_eq!(json["message"], "Login successful");
    }

    #[test]
    fn login_failures_map_to_unauthorized() {
        let err = ApiError::unauthorized(AuthError::WrongPassword.to_string());
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Incorrect Password !");
    }
}
