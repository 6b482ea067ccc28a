use axum::Router;
use axum::response::Redirect;
use axum::routing::{get, post};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::pages;
use crate::state::AppState;

/// JSON API, documented through utoipa. Nested under `/api` by the caller.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/Auth", auth_routes())
        .nest("/Teachers", teacher_routes())
        .nest("/Lessons", lesson_routes())
        .nest("/Quizzes", quiz_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
}

fn teacher_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::teacher::list_teachers))
        .routes(routes!(handlers::teacher::find_teacher))
        .routes(routes!(handlers::teacher::add_teacher))
        .routes(routes!(handlers::teacher::update_teacher))
        .routes(routes!(handlers::teacher::delete_teacher))
}

fn lesson_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::lesson::list_lessons))
        .routes(routes!(handlers::lesson::find_lesson))
        .routes(routes!(handlers::lesson::add_lesson))
        .routes(routes!(handlers::lesson::update_lesson))
        .routes(routes!(handlers::lesson::delete_lesson))
        .routes(routes!(handlers::lesson::list_of_quizzes))
        .routes(routes!(handlers::lesson::list_lessons_by_teacher))
}

fn quiz_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::quiz::list_quizzes))
        .routes(routes!(handlers::quiz::find_quiz))
        .routes(routes!(handlers::quiz::add_quiz))
        .routes(routes!(handlers::quiz::update_quiz))
        .routes(routes!(handlers::quiz::delete_quiz))
        .routes(routes!(handlers::quiz::list_of_lessons))
        .routes(routes!(handlers::quiz::link_quiz))
        .routes(routes!(
            handlers::quiz::unlink_quiz,
            handlers::quiz::unlink_quiz_delete
        ))
}

/// Server-rendered pages. `/` lands on the lesson list.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/LessonPage/List") }))
        .nest("/Account", account_pages())
        .nest("/TeacherPage", teacher_pages())
        .nest("/LessonPage", lesson_pages())
        .nest("/QuizPage", quiz_pages())
}

fn account_pages() -> Router<AppState> {
    use pages::account::*;

    Router::new()
        .route("/Login", get(login_form).post(login))
        .route("/Register", get(register_form).post(register))
        .route("/Logout", post(logout))
}

fn teacher_pages() -> Router<AppState> {
    use pages::teacher::*;

    Router::new()
        .route("/", get(index))
        .route("/List", get(list))
        .route("/Details/{id}", get(details))
        .route("/Add", get(add_form).post(add))
        .route("/Edit/{id}", get(edit_form).post(edit))
        .route("/ConfirmDelete/{id}", get(confirm_delete))
        .route("/Delete/{id}", post(delete))
}

fn lesson_pages() -> Router<AppState> {
    use pages::lesson::*;

    Router::new()
        .route("/", get(index))
        .route("/List", get(list))
        .route("/Details/{id}", get(details))
        .route("/Add", get(add_form).post(add))
        .route("/Edit/{id}", get(edit_form).post(edit))
        .route("/ConfirmDelete/{id}", get(confirm_delete))
        .route("/Delete/{id}", post(delete))
        .route("/LinkQuiz", post(link_quiz))
        .route("/UnlinkQuiz", post(unlink_quiz))
}

fn quiz_pages() -> Router<AppState> {
    use pages::quiz::*;

    Router::new()
        .route("/", get(index))
        .route("/List", get(list))
        .route("/Details/{id}", get(details))
        .route("/Add", get(add_form).post(add))
        .route("/Edit/{id}", get(edit_form).post(edit))
        .route("/ConfirmDelete/{id}", get(confirm_delete))
        .route("/Delete/{id}", post(delete))
}
