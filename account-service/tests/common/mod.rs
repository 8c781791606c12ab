use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::auth::errors::MailError;
use account_service::domain::auth::models::AuthSettings;
use account_service::domain::auth::models::MailMessage;
use account_service::domain::auth::ports::MailDispatcher;
use account_service::domain::auth::service::AuthService;
use account_service::domain::user::models::NewUser;
use account_service::domain::user::models::Role;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::UserError;
use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use chrono::Utc;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryUserRepository>,
    pub mailbox: Arc<RecordingMailDispatcher>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(AuthSettings::default()).await
    }

    pub async fn spawn_with(settings: AuthSettings) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryUserRepository::default());
        let mailbox = Arc::new(RecordingMailDispatcher::default());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let user_service = Arc::new(UserService::new(Arc::clone(&store)));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_service),
            Arc::clone(&store),
            Arc::clone(&mailbox),
            authenticator,
            settings,
        ));

        let router = create_router(auth_service, user_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            mailbox,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a principal through the API and return its session token
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Token carried by the most recent reset mail
    pub fn last_reset_token(&self) -> String {
        let sent = self.mailbox.sent();
        let message = sent.last().expect("No mail was sent");
        message.context["token"]
            .as_str()
            .expect("Reset mail without token")
            .to_string()
    }
}

/// User store kept in memory, assigning ids the way a BIGSERIAL column does
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn promote(&self, email: &str, role: Role) {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email.as_str() == email)
            .expect("Unknown user");
        user.role = role;
    }

    pub fn remove(&self, email: &str) {
        self.users
            .lock()
            .unwrap()
            .retain(|u| u.email.as_str() != email);
    }

    pub fn password_hash(&self, email: &str) -> String {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .map(|u| u.password_hash.clone())
            .expect("Unknown user")
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let id = users.iter().map(|u| u.id.as_i64()).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId::new(id).unwrap(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == *id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.password_hash = password_hash.to_string();
        Ok(user.clone())
    }
}

/// Mail dispatcher that keeps every message instead of delivering it
#[derive(Default)]
pub struct RecordingMailDispatcher {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailDispatcher {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailDispatcher for RecordingMailDispatcher {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
