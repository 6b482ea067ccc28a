use reqwest::Method;
use serde_json::json;

use crate::common::{TestApp, routes};

async fn lesson_fixture(app: &TestApp) -> i32 {
    let teacher = app.create_teacher("Apurva").await;
    app.create_lesson(teacher, "Algebra Basics").await
}

mod accounts {
    use super::*;

    #[tokio::test]
    async fn duplicate_username_is_409() {
        let app = TestApp::spawn().await;
        let creds = json!({ "username": "editor", "password": "another-password" });

        let res = app.post(routes::REGISTER, &creds).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = TestApp::spawn().await;
        let creds = json!({ "username": "editor", "password": "not-the-password" });

        let res = app.post(routes::LOGIN, &creds).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::REGISTER, &json!({ "username": "sam", "password": "short" }))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod protected_api {
    use super::*;

    #[tokio::test]
    async fn lesson_update_and_delete_require_a_token() {
        let app = TestApp::spawn().await;
        let lesson = lesson_fixture(&app).await;

        let res = app.anonymous(Method::PUT, &routes::update_lesson(lesson)).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app.anonymous(Method::DELETE, &routes::delete_lesson(lesson)).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 200);
    }

    #[tokio::test]
    async fn malformed_or_forged_tokens_are_rejected() {
        let app = TestApp::spawn().await;
        let lesson = lesson_fixture(&app).await;
        let path = routes::delete_lesson(lesson);

        for value in ["Token abc", "Bearer not-a-jwt"] {
            let res = app.with_authorization(Method::DELETE, &path, value).await;
            assert_eq!(res.status, 401, "{value}");
            assert_eq!(res.body["code"], "TOKEN_INVALID", "{value}");
        }
        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 200);
    }

    #[tokio::test]
    async fn other_mutations_stay_open() {
        let app = TestApp::spawn().await;
        let lesson = lesson_fixture(&app).await;

        let res = app
            .anonymous(Method::DELETE, &routes::delete_teacher(99))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 200);
    }

    #[tokio::test]
    async fn a_second_account_can_delete() {
        let app = TestApp::spawn().await;
        let lesson = lesson_fixture(&app).await;
        let token = app.login_new_user("sam", "sam-password").await;

        let res = app
            .with_authorization(
                Method::DELETE,
                &routes::delete_lesson(lesson),
                &format!("Bearer {token}"),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 404);
    }
}

mod protected_pages {
    use super::*;

    #[tokio::test]
    async fn edit_and_delete_pages_redirect_to_login() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        let lesson = app.create_lesson(teacher, "Algebra Basics").await;

        let paths = [
            (Method::GET, format!("/TeacherPage/Edit/{teacher}")),
            (Method::GET, format!("/TeacherPage/ConfirmDelete/{teacher}")),
            (Method::POST, format!("/TeacherPage/Delete/{teacher}")),
            (Method::GET, format!("/LessonPage/Edit/{lesson}")),
            (Method::GET, format!("/LessonPage/ConfirmDelete/{lesson}")),
            (Method::POST, format!("/LessonPage/Delete/{lesson}")),
        ];
        for (method, path) in paths {
            let res = app.anonymous(method, &path).await;
            assert_eq!(res.status, 303, "{path}");
            assert_eq!(res.location.as_deref(), Some("/Account/Login"), "{path}");
        }

        assert_eq!(app.get(&routes::find_teacher(teacher)).await.status, 200);
        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 200);
    }

    #[tokio::test]
    async fn quiz_pages_stay_open() {
        let app = TestApp::spawn().await;
        let lesson = lesson_fixture(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app
            .anonymous(Method::GET, &format!("/QuizPage/Edit/{quiz}"))
            .await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn login_page_sets_the_session_cookie() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}/Account/Login", app.addr))
            .form(&[("username", "editor"), ("password", "editor-password")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 303);
        let cookie = res
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("quizmatics_token="), "{cookie}");
        assert!(cookie.contains("HttpOnly"), "{cookie}");
    }

    #[tokio::test]
    async fn login_page_with_wrong_password_renders_401() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                "/Account/Login",
                &[("username", "editor"), ("password", "wrong-password")],
            )
            .await;
        assert_eq!(res.status, 401);
        assert!(res.text.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn non_numeric_page_id_renders_400() {
        let app = TestApp::spawn().await;

        let res = app.get("/QuizPage/Details/abc").await;
        assert_eq!(res.status, 400);
        assert!(res.text.contains("<h1>Error</h1>"));
    }
}
