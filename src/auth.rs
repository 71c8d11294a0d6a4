//! Identifying the user that made a request.
//!
//! Users log in through a separate service which sets a private (encrypted and
//! authenticated) cookie holding their user ID. This module only reads that
//! cookie, it never issues one.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};

use crate::{Error, UserID};

/// The name of the cookie that holds the user ID.
pub const COOKIE_USER_ID: &str = "user_id";

/// Read the user ID from the identity cookie in `jar`.
///
/// # Errors
/// Returns [Error::Unauthorized] if the cookie is missing, could not be
/// decrypted, or does not hold a user ID.
pub(crate) fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    match jar.get(COOKIE_USER_ID) {
        Some(user_id_cookie) => extract_user_id(&user_id_cookie).ok_or(Error::Unauthorized),
        None => Err(Error::Unauthorized),
    }
}

fn extract_user_id(cookie: &Cookie) -> Option<UserID> {
    cookie.value_trimmed().parse().ok().map(UserID::new)
}

/// Middleware that checks for a valid identity cookie.
///
/// The user ID is placed into the request extensions and the request is
/// executed normally if the cookie is valid, otherwise a `401 Unauthorized`
/// JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn auth_guard(jar: PrivateCookieJar, mut request: Request, next: Next) -> Response {
    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(error) => {
            tracing::debug!("rejected request to {}: {error}", request.uri().path());
            return error.into_response();
        }
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use axum_test::TestServer;
    use sha2::Digest;

    use crate::{UserID, test_utils::auth_cookie};

    use super::{COOKIE_USER_ID, auth_guard, get_user_id_from_auth_cookie};

    const TEST_PROTECTED_ROUTE: &str = "/api/protected";

    async fn echo_user_id(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_key() -> Key {
        let hash = sha2::Sha512::digest("nafstenoas");
        Key::from(&hash)
    }

    fn get_test_server(key: Key) -> TestServer {
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(echo_user_id))
            .route_layer(middleware::from_fn_with_state(key.clone(), auth_guard))
            .with_state(key);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let key = get_key();
        let server = get_test_server(key.clone());

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(auth_cookie(&key, UserID::new(42)))
            .await;

        response.assert_status_ok();
        response.assert_text("42");
    }

    #[tokio::test]
    async fn get_protected_route_with_no_cookie_is_unauthorized() {
        let server = get_test_server(get_key());

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn get_protected_route_with_plaintext_cookie_is_unauthorized() {
        let server = get_test_server(get_key());

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(COOKIE_USER_ID, "1"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cookie_from_other_key_is_unauthorized() {
        let server = get_test_server(get_key());

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(auth_cookie(
                &Key::from(&sha2::Sha512::digest("another secret")),
                UserID::new(1),
            ))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn non_numeric_user_id_is_rejected() {
        let jar = PrivateCookieJar::new(get_key()).add(Cookie::new(COOKIE_USER_ID, "FOOBAR"));

        assert!(get_user_id_from_auth_cookie(&jar).is_err());
    }

    #[test]
    fn reads_user_id() {
        let jar = PrivateCookieJar::new(get_key()).add(Cookie::new(COOKIE_USER_ID, "7"));

        assert_eq!(get_user_id_from_auth_cookie(&jar), Ok(UserID::new(7)));
    }
}
