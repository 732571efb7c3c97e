//! Shared harness: every test gets its own server on a random port backed by
//! a freshly created and migrated database.

#![allow(dead_code)]

use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use taskboard::configuration::{get_configuration, DatabaseSettings, Settings};
use taskboard::startup::run;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub settings: Settings,
    pub api_client: reqwest::Client,
}

pub struct SignedUp {
    pub access_token: String,
    pub refresh_token: String,
    pub board_id: Uuid,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn with adjusted settings, e.g. a tiny access token lifetime
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut settings = get_configuration().expect("Failed to read configuration.");
    settings.database.database_name = Uuid::new_v4().to_string();
    settings.application.static_dir = None;
    customise(&mut settings);

    let db_pool = configure_database(&settings.database).await;

    let server =
        run(listener, db_pool.clone(), settings.clone()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool,
        settings,
        api_client: reqwest::Client::new(),
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/api/auth/signup",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/api/auth/login",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign up and return the issued tokens and default board
    pub async fn signed_up(&self, email: &str) -> SignedUp {
        let response = self.signup(email, "pw123456").await;
        assert_eq!(201, response.status().as_u16());

        let body: Value = response.json().await.expect("Failed to parse response");
        SignedUp {
            access_token: body["accessToken"].as_str().unwrap().to_string(),
            refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
            board_id: body["boardId"].as_str().unwrap().parse().unwrap(),
        }
    }

    pub async fn get_authorized(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_authorized(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_authorized(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_authorized(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
