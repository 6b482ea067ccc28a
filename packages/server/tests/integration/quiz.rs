use crate::common::{TestApp, routes};
use serde_json::json;

async fn algebra_lesson(app: &TestApp) -> i32 {
    let teacher = app.create_teacher("Apurva").await;
    app.create_lesson(teacher, "Algebra Basics").await
}

mod quiz_crud {
    use super::*;

    #[tokio::test]
    async fn add_quiz_links_it_to_the_lesson() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;

        let res = app
            .post(
                routes::ADD_QUIZ,
                &json!({
                    "title": "Fractions",
                    "description": "Halves and quarters",
                    "dateCreated": "2025-03-01",
                    "maxMinsAllotted": 20,
                    "grade": 6,
                    "difficultyLevel": 0,
                    "lessonId": lesson,
                }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id("quizId");
        assert_eq!(res.body["message"], format!("Quiz {id} added successfully."));

        let res = app.get(&routes::find_quiz(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Fractions");
        assert_eq!(res.body["dateCreated"], "2025-03-01");
        assert_eq!(res.body["difficultyLevel"], 0);
        assert_eq!(res.body["totalLessons"], 1);
        assert_eq!(res.body["lessonNames"], json!(["Algebra Basics"]));
        assert_eq!(app.link_count().await, 1);
    }

    #[tokio::test]
    async fn add_quiz_for_unknown_lesson_is_404_and_persists_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::ADD_QUIZ,
                &json!({
                    "title": "Fractions",
                    "maxMinsAllotted": 20,
                    "grade": 6,
                    "difficultyLevel": 0,
                    "lessonId": 77,
                }),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Lesson not found.");
        assert_eq!(app.get(routes::QUIZZES).await.body, json!([]));
        assert_eq!(app.link_count().await, 0);
    }

    #[tokio::test]
    async fn out_of_range_difficulty_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;

        let res = app
            .post(
                routes::ADD_QUIZ,
                &json!({
                    "title": "Fractions",
                    "maxMinsAllotted": 20,
                    "grade": 6,
                    "difficultyLevel": 3,
                    "lessonId": lesson,
                }),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn update_leaves_links_untouched() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app
            .put(
                &routes::update_quiz(quiz),
                &json!({
                    "quizId": quiz,
                    "title": "Fractions II",
                    "description": "Harder",
                    "maxMinsAllotted": 45,
                    "grade": 8,
                    "difficultyLevel": 2,
                }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], format!("Quiz {quiz} updated successfully."));

        let res = app.get(&routes::find_quiz(quiz)).await;
        assert_eq!(res.body["title"], "Fractions II");
        assert_eq!(res.body["maxMinsAllotted"], 45);
        assert_eq!(res.body["difficultyLevel"], 2);
        assert_eq!(res.body["lessonNames"], json!(["Algebra Basics"]));
    }

    #[tokio::test]
    async fn update_with_mismatched_id_is_rejected() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app
            .put(
                &routes::update_quiz(quiz),
                &json!({
                    "quizId": quiz + 10,
                    "title": "Changed",
                    "maxMinsAllotted": 45,
                    "grade": 8,
                    "difficultyLevel": 2,
                }),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Quiz ID mismatch.");
    }

    #[tokio::test]
    async fn update_unknown_quiz_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .put(
                &routes::update_quiz(5),
                &json!({
                    "quizId": 5,
                    "title": "Ghost",
                    "maxMinsAllotted": 10,
                    "grade": 1,
                    "difficultyLevel": 0,
                }),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Quiz not found.");
    }

    #[tokio::test]
    async fn delete_removes_quiz_and_links() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app.delete(&routes::delete_quiz(quiz)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], format!("Quiz {quiz} deleted successfully."));
        assert_eq!(app.get(&routes::find_quiz(quiz)).await.status, 404);
        assert_eq!(app.link_count().await, 0);
        assert_eq!(app.get(&routes::find_lesson(lesson)).await.status, 200);
    }
}

mod quiz_links {
    use super::*;

    #[tokio::test]
    async fn link_reports_success_message() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let other = app.create_lesson(1, "Geometry").await;
        let quiz = app.create_quiz(other, "Fractions").await;

        let res = app.post_empty(&routes::link_quiz(lesson, quiz)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], format!("Quiz {quiz} linked to Lesson {lesson}."));
        assert_eq!(app.link_count().await, 2);
    }

    #[tokio::test]
    async fn linking_twice_is_a_conflict_and_keeps_one_row() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app.post_empty(&routes::link_quiz(lesson, quiz)).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "ALREADY_EXISTS");
        assert_eq!(res.body["message"], "Quiz is already linked to this Lesson.");
        assert_eq!(app.link_count().await, 1);
    }

    #[tokio::test]
    async fn linking_unknown_quiz_is_404() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;

        let res = app.post_empty(&routes::link_quiz(lesson, 404)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Lesson or Quiz not found.");
    }

    #[tokio::test]
    async fn unlink_removes_the_row() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app.post_empty(&routes::unlink_quiz(lesson, quiz)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], format!("Quiz {quiz} unlinked from Lesson {lesson}."));
        assert_eq!(app.link_count().await, 0);
    }

    #[tokio::test]
    async fn unlink_also_accepts_delete() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let quiz = app.create_quiz(lesson, "Fractions").await;

        let res = app.delete(&routes::unlink_quiz(lesson, quiz)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(app.link_count().await, 0);
    }

    #[tokio::test]
    async fn unlinking_an_unlinked_pair_is_a_conflict() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let other = app.create_lesson(1, "Geometry").await;
        let quiz = app.create_quiz(other, "Fractions").await;

        let res = app.post_empty(&routes::unlink_quiz(lesson, quiz)).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "NOT_LINKED");
        assert_eq!(res.body["message"], "Quiz is not linked to this Lesson.");
        assert_eq!(app.link_count().await, 1);
    }

    #[tokio::test]
    async fn unlink_from_unknown_lesson_is_404() {
        let app = TestApp::spawn().await;

        let res = app.post_empty(&routes::unlink_quiz(31, 1)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn list_of_lessons_includes_teacher_names() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;
        let sam = app.create_teacher("Sam").await;
        let biology = app.create_lesson(sam, "Biology").await;
        let quiz = app.create_quiz(lesson, "Fractions").await;
        app.link(biology, quiz).await;

        let res = app.get(&routes::lessons_of_quiz(quiz)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let lessons = res.body.as_array().unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0]["title"], "Algebra Basics");
        assert_eq!(lessons[0]["name"], "Apurva");
        assert_eq!(lessons[1]["title"], "Biology");
        assert_eq!(lessons[1]["name"], "Sam");
    }

    #[tokio::test]
    async fn list_of_lessons_for_unknown_quiz_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::lessons_of_quiz(8)).await;
        assert_eq!(res.status, 404);
    }
}

mod quiz_request_errors {
    use super::*;

    #[tokio::test]
    async fn link_without_quiz_id_is_a_json_validation_error() {
        let app = TestApp::spawn().await;
        let lesson = algebra_lesson(&app).await;

        let res = app
            .post_empty(&format!("/api/Quizzes/LinkQuiz?lessonId={lesson}"))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR", "{}", res.text);
        assert!(res.body["message"].as_str().unwrap().contains("quizId"));
    }

    #[tokio::test]
    async fn non_numeric_ids_are_json_validation_errors() {
        let app = TestApp::spawn().await;

        for path in ["/api/Quizzes/Find/abc", "/api/Teachers/Find/abc"] {
            let res = app.get(path).await;
            assert_eq!(res.status, 400, "{path}");
            assert_eq!(res.body["code"], "VALIDATION_ERROR", "{path}: {}", res.text);
        }

        let res = app.delete("/api/Quizzes/UnlinkQuiz?lessonId=x&quizId=1").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
