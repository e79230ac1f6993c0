// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.


//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{SubmittedUser, UserId};
use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{self, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use std::str::FromStr;
use tower::Layer;
use tower::util::MapRequestLayer;
use tower_http::services::ServeDir;
use userbook_core::rest::{RestError, RestResult, get_unique_header};

mod root_get;
#[cfg(test)]
mod testutils;
mod user_delete;
mod user_edit_get;
mod user_put;
mod users_get;
mod users_new_get;
mod users_post;

/// Name of the query parameter that HTML forms use to request a method other than `POST`.
const METHOD_OVERRIDE_PARAM: &str = "_method";

/// Rewrites the method of a `POST` request that asks for a different one via the
/// `METHOD_OVERRIDE_PARAM` query parameter.
///
/// Only `PUT`, `DELETE` and `PATCH` can be requested this way.  Any other value, or any request
/// that is not a `POST`, is left untouched.
fn method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    let Some(query) = req.uri().query() else {
        return req;
    };

    let requested = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()
        .and_then(|params| params.into_iter().find(|(key, _)| key == METHOD_OVERRIDE_PARAM))
        .map(|(_, value)| value.to_ascii_uppercase());
    let method = match requested.as_deref() {
        Some("PUT") => Method::PUT,
        Some("DELETE") => Method::DELETE,
        Some("PATCH") => Method::PATCH,
        _ => return req,
    };
    *req.method_mut() = method;
    req
}

/// Parses the user identifier given in a request path.
///
/// A malformed identifier cannot possibly match a stored record so it is reported as missing.
fn parse_user_id(id: &str) -> RestResult<UserId> {
    UserId::from_str(id).map_err(|_| RestError::NotFound("User not found".to_owned()))
}

/// Generates the response that sends the client back to the list of users.
fn redirect_to_users() -> Response {
    (StatusCode::FOUND, [(http::header::LOCATION, "/users")]).into_response()
}

/// Parses a user submission as sent by an HTML form or by a JSON client.
#[async_trait]
impl<S> FromRequest<S> for SubmittedUser
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = match get_unique_header(req.headers(), &http::header::CONTENT_TYPE)? {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|e| RestError::InvalidRequest(format!("Invalid Content-Type: {}", e)))?
                    .to_owned(),
            ),
            None => None,
        };

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::InvalidRequest(e.body_text()))?;

        let Some(content_type) = content_type else {
            if body.is_empty() {
                return Ok(SubmittedUser::default());
            }
            return Err(RestError::InvalidRequest(
                "Missing Content-Type for a non-empty body".to_owned(),
            ));
        };

        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/json" => Ok(serde_json::from_slice(&body)?),
            "application/x-www-form-urlencoded" => serde_urlencoded::from_bytes(&body)
                .map_err(|e| RestError::InvalidRequest(format!("Invalid form: {}", e))),
            _ => {
                Err(RestError::InvalidRequest(format!("Unsupported Content-Type {}", content_type)))
            }
        }
    }
}

/// Creates the router for the application.
///
/// If `static_dir` is provided, requests that don't match any route are served from the files in
/// that directory.
pub(crate) fn app(driver: Driver, static_dir: Option<PathBuf>) -> Router {
    use axum::routing::{get, put};

    let mut routes = Router::new()
        .route("/", get(root_get::handler))
        .route("/users", get(users_get::handler).post(users_post::handler))
        .route("/users/new", get(users_new_get::handler))
        .route("/users/:id", put(user_put::handler).delete(user_delete::handler))
        .route("/users/:id/edit", get(user_edit_get::handler))
        .with_state(driver);
    if let Some(static_dir) = static_dir {
        routes = routes.fallback_service(ServeDir::new(static_dir));
    }

    // The method override has to happen before routing, which rules out `Router::layer`.
    Router::new().fallback_service(MapRequestLayer::new(method_override).layer(routes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::TestContext;
    use axum::body::Body;
    use serde_json::json;
    use std::fs;
    use userbook_core::rest::testutils::OneShotBuilder;

    /// Builds a request with the given `method` and `uri` and returns the method it ends up with
    /// after going through the override.
    fn override_of(method: Method, uri: &str) -> Method {
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        method_override(req).method().clone()
    }

    #[test]
    fn test_method_override_applies_to_post() {
        assert_eq!(Method::PUT, override_of(Method::POST, "/users/x?_method=PUT"));
        assert_eq!(Method::DELETE, override_of(Method::POST, "/users/x?_method=DELETE"));
        assert_eq!(Method::PATCH, override_of(Method::POST, "/users/x?_method=patch"));
        assert_eq!(Method::PUT, override_of(Method::POST, "/users/x?a=b&_method=PUT"));
    }

    #[test]
    fn test_method_override_ignored() {
        assert_eq!(Method::POST, override_of(Method::POST, "/users"));
        assert_eq!(Method::POST, override_of(Method::POST, "/users?method=PUT"));
        assert_eq!(Method::POST, override_of(Method::POST, "/users?_method=GET"));
        assert_eq!(Method::POST, override_of(Method::POST, "/users?_method=CONNECT"));
        assert_eq!(Method::GET, override_of(Method::GET, "/users?_method=DELETE"));
    }

    #[test]
    fn test_parse_user_id() {
        let id = UserId::generate();
        assert_eq!(id, parse_user_id(&id.to_string()).unwrap());
        assert_eq!(
            RestError::NotFound("User not found".to_owned()),
            parse_user_id("12345").unwrap_err()
        );
    }

    /// Extracts a `SubmittedUser` from a request with the given `content_type` and `body`.
    async fn extract(content_type: Option<&str>, body: &str) -> RestResult<SubmittedUser> {
        let mut builder = Request::builder().method(Method::POST).uri("/users");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_owned())).unwrap();
        SubmittedUser::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_submitted_user_from_form() {
        assert_eq!(
            SubmittedUser::new("Alice Smith", "25", "a@b.com"),
            extract(
                Some("application/x-www-form-urlencoded"),
                "name=Alice+Smith&age=25&email=a%40b.com&_method=PUT"
            )
            .await
            .unwrap()
        );
    }

    #[tokio::test]
    async fn test_submitted_user_from_json() {
        let body = json!({"name": "Alice", "age": 25, "email": "a@b.com"}).to_string();
        assert_eq!(
            SubmittedUser::new("Alice", "25", "a@b.com"),
            extract(Some("application/json; charset=utf-8"), &body).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_submitted_user_missing_fields() {
        assert_eq!(
            SubmittedUser::new("", "", "a@b.com"),
            extract(Some("application/json"), r#"{"email": "a@b.com"}"#).await.unwrap()
        );
        assert_eq!(SubmittedUser::default(), extract(None, "").await.unwrap());
    }

    #[tokio::test]
    async fn test_submitted_user_bad_content_type() {
        match extract(Some("text/plain"), "name=Alice").await {
            Err(RestError::InvalidRequest(e)) => assert!(e.contains("Unsupported Content-Type")),
            e => panic!("Unexpected result {:?}", e),
        }
        match extract(None, "name=Alice").await {
            Err(RestError::InvalidRequest(e)) => assert!(e.contains("Missing Content-Type")),
            e => panic!("Unexpected result {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_submitted_user_bad_json() {
        match extract(Some("application/json"), "42").await {
            Err(RestError::InvalidRequest(_)) => (),
            e => panic!("Unexpected result {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_unknown_path_without_static_dir() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), (Method::GET, "/style.css"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_empty()
            .await;
    }

    #[tokio::test]
    async fn test_static_dir_fallback() {
        let dir = std::env::temp_dir().join(format!("userbook-static-{}", uuid::Uuid::new_v4()));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("hello.txt"), "Hello from disk").unwrap();

        let context = TestContext::setup_with_static_dir(Some(dir.clone())).await;

        OneShotBuilder::new(context.app(), (Method::GET, "/hello.txt"))
            .send_empty()
            .await
            .expect_text("^Hello from disk$")
            .await;
        OneShotBuilder::new(context.app(), (Method::GET, "/users"))
            .send_empty()
            .await
            .expect_text("There are no users yet")
            .await;
        OneShotBuilder::new(context.app(), (Method::GET, "/missing.txt"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_empty()
            .await;

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_method_override_to_unrouted_method() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), (Method::POST, "/users/new?_method=PATCH"))
            .send_empty()
            .await
            .expect_status(StatusCode::METHOD_NOT_ALLOWED)
            .expect_empty()
            .await;
    }
}
