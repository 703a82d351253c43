//! End-to-end checks against the assembled router.
//!
//! The account store is an in-memory double; the Postgres pool is lazy and
//! points at a closed port so only `/health` ever touches it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, StatusCode,
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
};
use gatekeeper::api::{
    self,
    handlers::{
        auth::{
            Account, AccountStore, AuthGuard, PLACEHOLDER_ACCOUNT_ID, PlaceholderResolver,
            StoreError,
        },
        csrf::{CsrfSettings, CsrfTokenResponse},
        error::ErrorBody,
    },
};
use serde::de::DeserializeOwned;
use sqlx::postgres::PgPoolOptions;
use std::{collections::HashMap, sync::Arc, sync::Mutex, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct Accounts(Mutex<HashMap<Uuid, Account>>);

#[async_trait]
impl AccountStore for Accounts {
    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self
            .0
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(accounts.get(&id).cloned())
    }

    async fn update_display_name(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        let mut accounts = self
            .0
            .lock()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(accounts.get_mut(&id).map(|account| {
            account.display_name = Some(display_name.to_string());
            account.clone()
        }))
    }
}

fn bob() -> Account {
    Account {
        id: PLACEHOLDER_ACCOUNT_ID,
        email: "bob@example.com".to_string(),
        display_name: None,
        created_at: "2024-05-01 12:00:00+00".to_string(),
    }
}

fn test_app(accounts: Accounts) -> Result<Router> {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://gatekeeper@127.0.0.1:1/gatekeeper")?;
    let guard = Arc::new(AuthGuard::new(
        Arc::new(PlaceholderResolver),
        Arc::new(accounts),
    ));
    let settings = Arc::new(CsrfSettings::with_secret(Some("integration".to_string())));
    Ok(api::app(guard, settings, pool))
}

fn with_bob() -> Accounts {
    let accounts = Accounts::default();
    if let Ok(mut map) = accounts.0.lock() {
        map.insert(PLACEHOLDER_ACCOUNT_ID, bob());
    }
    accounts
}

async fn json_body<T: DeserializeOwned>(response: axum::response::Response) -> Result<T> {
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn csrf_token_then_patch_me() -> Result<()> {
    let app = test_app(with_bob())?;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/v1/csrf").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie")?
        .to_str()?
        .split(';')
        .next()
        .context("empty Set-Cookie")?
        .to_string();
    let token: CsrfTokenResponse = json_body(response).await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/v1/me")
                .header(AUTHORIZATION, "Bearer xyz")
                .header(CONTENT_TYPE, "application/json")
                .header("X-CSRF-Token", token.csrf_token)
                .header(COOKIE, cookie)
                .body(Body::from(r#"{"display_name":"Bob"}"#))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let account: Account = json_body(response).await?;
    assert_eq!(account.display_name.as_deref(), Some("Bob"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/me")
                .header(AUTHORIZATION, "Bearer xyz")
                .body(Body::empty())?,
        )
        .await?;
    let account: Account = json_body(response).await?;
    assert_eq!(account.display_name.as_deref(), Some("Bob"));
    Ok(())
}

#[tokio::test]
async fn forged_csrf_cookie_is_rejected() -> Result<()> {
    let response = test_app(with_bob())?
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/v1/me")
                .header(AUTHORIZATION, "Bearer xyz")
                .header(CONTENT_TYPE, "application/json")
                .header("X-CSRF-Token", "abc")
                .header(COOKIE, "gatekeeper-csrf-token=abc.not-a-signature")
                .body(Body::from(r#"{"display_name":"Eve"}"#))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let payload: ErrorBody = json_body(response).await?;
    assert_eq!(
        payload,
        ErrorBody::new("INVALID_CSRF", "The CSRF token is invalid.")
    );
    Ok(())
}

#[tokio::test]
async fn unknown_account_in_chinese() -> Result<()> {
    let response = test_app(Accounts::default())?
        .oneshot(
            Request::builder()
                .uri("/v1/me")
                .header(AUTHORIZATION, "Bearer xyz")
                .header(ACCEPT_LANGUAGE, "zh-CN")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let payload: ErrorBody = json_body(response).await?;
    assert_eq!(payload, ErrorBody::new("USER_NOT_FOUND", "用户不存在。"));
    Ok(())
}

#[tokio::test]
async fn whoami_is_anonymous_without_credential() -> Result<()> {
    let response = test_app(with_bob())?
        .oneshot(Request::builder().uri("/v1/whoami").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let payload: serde_json::Value = json_body(response).await?;
    assert_eq!(
        payload,
        serde_json::json!({"authenticated": false, "account": null})
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let response = test_app(with_bob())?
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
