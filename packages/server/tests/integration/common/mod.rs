use std::net::SocketAddr;

use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tempfile::TempDir;

use quizmatics::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use quizmatics::entity::lesson_quiz;
use quizmatics::state::AppState;

pub mod routes {
    pub const REGISTER: &str = "/api/Auth/Register";
    pub const LOGIN: &str = "/api/Auth/Login";
    pub const TEACHERS: &str = "/api/Teachers/List";
    pub const ADD_TEACHER: &str = "/api/Teachers/Add";
    pub const LESSONS: &str = "/api/Lessons/List";
    pub const ADD_LESSON: &str = "/api/Lessons/Add";
    pub const QUIZZES: &str = "/api/Quizzes/List";
    pub const ADD_QUIZ: &str = "/api/Quizzes/Add";

    pub fn find_teacher(id: i32) -> String {
        format!("/api/Teachers/Find/{id}")
    }

    pub fn update_teacher(id: i32) -> String {
        format!("/api/Teachers/Update/{id}")
    }

    pub fn delete_teacher(id: i32) -> String {
        format!("/api/Teachers/Delete/{id}")
    }

    pub fn find_lesson(id: i32) -> String {
        format!("/api/Lessons/Find/{id}")
    }

    pub fn update_lesson(id: i32) -> String {
        format!("/api/Lessons/Update/{id}")
    }

    pub fn delete_lesson(id: i32) -> String {
        format!("/api/Lessons/Delete/{id}")
    }

    pub fn quizzes_of_lesson(id: i32) -> String {
        format!("/api/Lessons/ListOfQuizzes/{id}")
    }

    pub fn lessons_by_teacher(id: i32) -> String {
        format!("/api/Lessons/ListLessonsByTeacher/{id}")
    }

    pub fn find_quiz(id: i32) -> String {
        format!("/api/Quizzes/Find/{id}")
    }

    pub fn update_quiz(id: i32) -> String {
        format!("/api/Quizzes/Update/{id}")
    }

    pub fn delete_quiz(id: i32) -> String {
        format!("/api/Quizzes/Delete/{id}")
    }

    pub fn lessons_of_quiz(id: i32) -> String {
        format!("/api/Quizzes/ListOfLessons/{id}")
    }

    pub fn link_quiz(lesson_id: i32, quiz_id: i32) -> String {
        format!("/api/Quizzes/LinkQuiz?lessonId={lesson_id}&quizId={quiz_id}")
    }

    pub fn unlink_quiz(lesson_id: i32, quiz_id: i32) -> String {
        format!("/api/Quizzes/UnlinkQuiz?lessonId={lesson_id}&quizId={quiz_id}")
    }
}

/// A running test server over its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    /// Token of the account created by `spawn`; sent with every request.
    pub token: String,
    // Dropping the directory deletes the database file.
    _temp_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Location` header, for redirects.
    pub location: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::with_prefix("quizmatics-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join("db.sqlite");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            path.to_str().expect("temp path should be valid UTF-8")
        );

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                log_level: "info".to_string(),
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
                min_connections: 1,
                connect_timeout_secs: 8,
                sqlx_logging: false,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_ttl_hours: 1,
            },
        };

        let db = quizmatics::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };
        let app = quizmatics::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut app = Self {
            addr,
            // Page tests assert on the redirect itself.
            client: Client::builder()
                .redirect(Policy::none())
                .build()
                .expect("Failed to build HTTP client"),
            db,
            token: String::new(),
            _temp_dir: temp_dir,
        };
        app.token = app.login_new_user("editor", "editor-password").await;
        app
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A request carrying the test account's bearer header and page cookie.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.token)
            .header(
                reqwest::header::COOKIE,
                format!("quizmatics_token={}", self.token),
            )
    }

    /// Send a request with no credentials at all.
    pub async fn anonymous(&self, method: Method, path: &str) -> TestResponse {
        let res = self
            .client
            .request(method, self.url(path))
            .send()
            .await
            .expect("Failed to send anonymous request");

        TestResponse::from_response(res).await
    }

    /// Send a request with an arbitrary `Authorization` header value.
    pub async fn with_authorization(
        &self,
        method: Method,
        path: &str,
        value: &str,
    ) -> TestResponse {
        let res = self
            .client
            .request(method, self.url(path))
            .header(reqwest::header::AUTHORIZATION, value)
            .send()
            .await
            .expect("Failed to send request");

        TestResponse::from_response(res).await
    }

    /// Register an account through the API and return a fresh token for it.
    pub async fn login_new_user(&self, username: &str, password: &str) -> String {
        let creds = json!({ "username": username, "password": password });
        let res = self.post(routes::REGISTER, &creds).await;
        assert_eq!(res.status, 201, "register failed: {}", res.text);
        let res = self.post(routes::LOGIN, &creds).await;
        assert_eq!(res.status, 200, "login failed: {}", res.text);
        res.body["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_string()
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .request(Method::GET, path)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST with no body, as the link endpoints take only a query string.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let res = self
            .request(Method::POST, path)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let res = self
            .request(Method::POST, path)
            .form(form)
            .send()
            .await
            .expect("Failed to send form POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .request(Method::PUT, path)
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .request(Method::DELETE, path)
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a teacher via the API and return its id.
    pub async fn create_teacher(&self, name: &str) -> i32 {
        let email = format!("{}@example.com", name.to_lowercase());
        let res = self
            .post(routes::ADD_TEACHER, &json!({ "name": name, "email": email }))
            .await;
        assert_eq!(res.status, 201, "create_teacher failed: {}", res.text);
        res.id("teacherId")
    }

    /// Create a lesson via the API and return its id.
    pub async fn create_lesson(&self, teacher_id: i32, title: &str) -> i32 {
        let res = self
            .post(
                routes::ADD_LESSON,
                &json!({
                    "title": title,
                    "description": "Lesson description",
                    "dateCreated": "2025-01-31",
                    "teacherId": teacher_id,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_lesson failed: {}", res.text);
        res.id("lessonId")
    }

    /// Create a quiz linked to `lesson_id` via the API and return its id.
    pub async fn create_quiz(&self, lesson_id: i32, title: &str) -> i32 {
        let res = self
            .post(
                routes::ADD_QUIZ,
                &json!({
                    "title": title,
                    "description": "Quiz description",
                    "maxMinsAllotted": 30,
                    "grade": 7,
                    "difficultyLevel": 1,
                    "lessonId": lesson_id,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_quiz failed: {}", res.text);
        res.id("quizId")
    }

    /// Link a quiz to a lesson via the API, asserting success.
    pub async fn link(&self, lesson_id: i32, quiz_id: i32) {
        let res = self.post_empty(&routes::link_quiz(lesson_id, quiz_id)).await;
        assert_eq!(res.status, 200, "link failed: {}", res.text);
    }

    /// Number of rows in the lesson-quiz junction table.
    pub async fn link_count(&self) -> u64 {
        lesson_quiz::Entity::find()
            .count(&self.db)
            .await
            .expect("DB query failed")
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            location,
        }
    }

    pub fn id(&self, field: &str) -> i32 {
        self.body[field]
            .as_i64()
            .unwrap_or_else(|| panic!("response body should contain '{field}'")) as i32
    }
}
