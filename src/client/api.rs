//! Typed wrappers around the reservation API.
//!
//! One call per user action, no retries. Calls that need an identity take
//! the [`Session`] and send its user id as `X-User-ID`.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::error::{ClientError, ClientResult};
use super::session::Session;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::USER_ID_HEADER;
use crate::interfaces::http::modules::auth::UserDto;
use crate::interfaces::http::modules::reservations::{AdminReservationDto, ReservationDto};

/// Details of a table booking, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ReservationInput {
    pub date: String,
    pub time: String,
    pub people: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Auth ───────────────────────────────────────────────────

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<UserDto> {
        let req = self
            .request(Method::POST, "/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }));
        self.send(req).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserDto> {
        let req = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }));
        self.send(req).await
    }

    // ── Customer ───────────────────────────────────────────────

    pub async fn create_reservation(
        &self,
        session: &Session,
        input: &ReservationInput,
    ) -> ClientResult<ReservationDto> {
        let req = self.authed(session, Method::POST, "/reservations")?.json(&json!({
            "date": input.date,
            "time": input.time,
            "people": input.people,
            "comment": input.comment,
        }));
        self.send(req).await
    }

    pub async fn my_reservations(
        &self,
        session: &Session,
        status: Option<&str>,
    ) -> ClientResult<Vec<ReservationDto>> {
        let mut req = self.authed(session, Method::GET, "/my/reservations")?;
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        self.send(req).await
    }

    pub async fn cancel_reservation(&self, session: &Session, id: i32) -> ClientResult<ReservationDto> {
        let req = self.authed(session, Method::PATCH, &format!("/reservations/{}/cancel", id))?;
        self.send(req).await
    }

    // ── Administrator ──────────────────────────────────────────

    pub async fn admin_reservations(
        &self,
        session: &Session,
        date: Option<&str>,
        status: Option<&str>,
    ) -> ClientResult<Vec<AdminReservationDto>> {
        let mut req = self.authed(session, Method::GET, "/admin/reservations")?;
        let filters: Vec<(&str, &str)> = [("date", date), ("status", status)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        if !filters.is_empty() {
            req = req.query(&filters);
        }
        self.send(req).await
    }

    pub async fn confirm_reservation(&self, session: &Session, id: i32) -> ClientResult<ReservationDto> {
        let path = format!("/admin/reservations/{}/confirm", id);
        let req = self.authed(session, Method::PATCH, &path)?;
        self.send(req).await
    }

    pub async fn admin_cancel_reservation(
        &self,
        session: &Session,
        id: i32,
    ) -> ClientResult<ReservationDto> {
        let path = format!("/admin/reservations/{}/cancel", id);
        let req = self.authed(session, Method::PATCH, &path)?;
        self.send(req).await
    }

    // ── Plumbing ───────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, session: &Session, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let user_id = session.user_id()?;
        Ok(self
            .request(method, path)
            .header(USER_ID_HEADER, user_id.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let envelope = resp.json::<ApiResponse>().await.ok();
        debug!(status = status.as_u16(), "API call failed");
        Err(ClientError::from_response(status, envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SeedUser;
    use crate::config::AppConfig;
    use crate::infrastructure::crypto::password::MIN_COST;
    use crate::server::{ServerHandle, ServerOptions};

    async fn start_server() -> ServerHandle {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 0;
        cfg.database.url = "sqlite::memory:".into();
        cfg.database.max_connections = 1;
        cfg.security.bcrypt_cost = MIN_COST;
        cfg.seed.users = vec![SeedUser {
            name: "Admin".into(),
            email: "admin@vesuvio.test".into(),
            password: "admin-pass".into(),
            is_admin: true,
        }];
        ServerHandle::start(ServerOptions {
            config: cfg,
            ..Default::default()
        })
        .await
        .unwrap()
    }

    fn booking(people: i32) -> ReservationInput {
        ReservationInput {
            date: "2025-12-25".into(),
            time: "20:00".into(),
            people,
            comment: Some("window seat".into()),
        }
    }

    #[tokio::test]
    async fn customer_and_admin_flow() {
        let server = start_server().await;
        let dir = tempfile::tempdir().unwrap();
        let api = ApiClient::new(server.base_url()).unwrap();

        // Customer registers, logs in, books.
        api.register("Ann", "ann@example.com", "pw").await.unwrap();
        let mut ann = Session::load(dir.path().join("ann.json"));
        ann.login(api.login("ann@example.com", "pw").await.unwrap()).unwrap();

        let created = api.create_reservation(&ann, &booking(2)).await.unwrap();
        assert_eq!(created.status, "pending");
        assert_eq!(created.comment.as_deref(), Some("window seat"));

        // Administrator confirms.
        let mut admin = Session::load(dir.path().join("admin.json"));
        admin
            .login(api.login("admin@vesuvio.test", "admin-pass").await.unwrap())
            .unwrap();
        assert!(admin.is_admin());

        let listed = api
            .admin_reservations(&admin, Some("2025-12-25"), Some("pending"))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user.as_ref().unwrap().email, "ann@example.com");

        let confirmed = api.confirm_reservation(&admin, created.id).await.unwrap();
        assert_eq!(confirmed.status, "confirmed");

        // Owner cancels; a second cancel is an invalid transition.
        let cancelled = api.cancel_reservation(&ann, created.id).await.unwrap();
        assert_eq!(cancelled.status, "cancelled");
        let again = api.admin_cancel_reservation(&admin, created.id).await;
        assert!(matches!(again, Err(ClientError::InvalidState(_))));

        let mine = api.my_reservations(&ann, Some("cancelled")).await.unwrap();
        assert_eq!(mine.len(), 1);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn errors_map_to_client_taxonomy() {
        let server = start_server().await;
        let dir = tempfile::tempdir().unwrap();
        let api = ApiClient::new(server.base_url()).unwrap();

        api.register("Bob", "bob@example.com", "pw").await.unwrap();
        assert!(matches!(
            api.register("Bob", "BOB@example.com", "pw").await,
            Err(ClientError::Conflict(ref m)) if m == "email already exists"
        ));
        assert!(matches!(
            api.login("bob@example.com", "wrong").await,
            Err(ClientError::Authentication(_))
        ));

        let mut bob = Session::load(dir.path().join("bob.json"));
        assert!(matches!(
            api.my_reservations(&bob, None).await,
            Err(ClientError::NotLoggedIn)
        ));

        bob.login(api.login("bob@example.com", "pw").await.unwrap()).unwrap();
        assert!(matches!(
            api.create_reservation(&bob, &booking(0)).await,
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            api.admin_reservations(&bob, None, None).await,
            Err(ClientError::Authorization(_))
        ));
        assert!(matches!(
            api.cancel_reservation(&bob, 999).await,
            Err(ClientError::NotFound(_))
        ));

        server.shutdown().await;
    }
}
