use crate::common::{TestApp, routes};

mod navigation {
    use super::*;

    #[tokio::test]
    async fn root_redirects_to_lesson_list() {
        let app = TestApp::spawn().await;

        let res = app.get("/").await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/LessonPage/List"));
    }

    #[tokio::test]
    async fn lists_render_with_escaped_names() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                routes::ADD_TEACHER,
                &serde_json::json!({ "name": "<script>", "email": "s@x.com" }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app.get("/TeacherPage/List").await;
        assert_eq!(res.status, 200);
        assert!(res.text.contains("&lt;script&gt;"));
        assert!(!res.text.contains("<script>"));
    }

    #[tokio::test]
    async fn unknown_details_render_the_error_view() {
        let app = TestApp::spawn().await;

        let res = app.get("/QuizPage/Details/5").await;
        assert_eq!(res.status, 404);
        assert!(res.text.contains("Quiz not found."));
    }
}

mod teacher_pages {
    use super::*;

    #[tokio::test]
    async fn add_redirects_to_list() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form("/TeacherPage/Add", &[("name", "Apurva"), ("email", "a@x.com")])
            .await;
        assert_eq!(res.status, 303, "{}", res.text);
        assert_eq!(res.location.as_deref(), Some("/TeacherPage/List"));

        let res = app.get("/TeacherPage/List").await;
        assert!(res.text.contains("Apurva"));
    }

    #[tokio::test]
    async fn invalid_form_renders_400() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form("/TeacherPage/Add", &[("name", ""), ("email", "a@x.com")])
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn details_list_the_teachers_lessons() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        app.create_lesson(teacher, "Algebra Basics").await;

        let res = app.get(&format!("/TeacherPage/Details/{teacher}")).await;
        assert_eq!(res.status, 200);
        assert!(res.text.contains("Algebra Basics"));
    }

    #[tokio::test]
    async fn delete_redirects_and_removes() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;

        let res = app.get(&format!("/TeacherPage/ConfirmDelete/{teacher}")).await;
        assert_eq!(res.status, 200);

        let res = app
            .post_form(&format!("/TeacherPage/Delete/{teacher}"), &[])
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(app.get(&routes::find_teacher(teacher)).await.status, 404);
    }
}

mod lesson_pages {
    use super::*;

    #[tokio::test]
    async fn add_form_without_teachers_shows_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/LessonPage/Add").await;
        assert_eq!(res.status, 404);
        assert!(res.text.contains("No teachers found."));
    }

    #[tokio::test]
    async fn added_lesson_without_date_gets_today() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        let teacher = teacher.to_string();

        let res = app
            .post_form(
                "/LessonPage/Add",
                &[
                    ("title", "Algebra Basics"),
                    ("description", ""),
                    ("dateCreated", ""),
                    ("teacherId", &teacher),
                ],
            )
            .await;
        assert_eq!(res.status, 303, "{}", res.text);

        let res = app.get(routes::LESSONS).await;
        let today = chrono::Local::now().date_naive().to_string();
        assert_eq!(res.body[0]["dateCreated"], today);
    }

    #[tokio::test]
    async fn details_offer_only_unlinked_quizzes() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        let lesson = app.create_lesson(teacher, "Algebra Basics").await;
        let other = app.create_lesson(teacher, "Geometry").await;
        app.create_quiz(lesson, "Fractions").await;
        let spare = app.create_quiz(other, "Triangles").await;

        let res = app.get(&format!("/LessonPage/Details/{lesson}")).await;
        assert_eq!(res.status, 200);
        assert!(res.text.contains("Fractions"));
        assert!(res.text.contains(&format!(r#"<option value="{spare}">Triangles</option>"#)));
    }

    #[tokio::test]
    async fn link_and_unlink_forms_redirect_to_details() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        let lesson = app.create_lesson(teacher, "Algebra Basics").await;
        let other = app.create_lesson(teacher, "Geometry").await;
        let quiz = app.create_quiz(other, "Triangles").await;
        let (lesson_s, quiz_s) = (lesson.to_string(), quiz.to_string());
        let form = [("lessonId", lesson_s.as_str()), ("quizId", quiz_s.as_str())];

        let res = app.post_form("/LessonPage/LinkQuiz", &form).await;
        assert_eq!(res.status, 303, "{}", res.text);
        let details = format!("/LessonPage/Details/{lesson}");
        assert_eq!(res.location.as_deref(), Some(details.as_str()));
        assert_eq!(app.link_count().await, 2);

        let res = app.post_form("/LessonPage/LinkQuiz", &form).await;
        assert_eq!(res.status, 409);
        assert!(res.text.contains("Quiz is already linked to this Lesson."));

        let res = app.post_form("/LessonPage/UnlinkQuiz", &form).await;
        assert_eq!(res.status, 303);
        assert_eq!(app.link_count().await, 1);
    }
}

mod quiz_pages {
    use super::*;

    #[tokio::test]
    async fn add_form_without_lessons_shows_error() {
        let app = TestApp::spawn().await;

        let res = app.get("/QuizPage/Add").await;
        assert_eq!(res.status, 404);
        assert!(res.text.contains("No lessons found."));
    }

    #[tokio::test]
    async fn edit_posts_update_and_redirects_to_details() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("Apurva").await;
        let lesson = app.create_lesson(teacher, "Algebra Basics").await;
        let quiz = app.create_quiz(lesson, "Fractions").await;
        let quiz_s = quiz.to_string();

        let res = app
            .post_form(
                &format!("/QuizPage/Edit/{quiz}"),
                &[
                    ("quizId", quiz_s.as_str()),
                    ("title", "Fractions II"),
                    ("description", ""),
                    ("maxMinsAllotted", "40"),
                    ("grade", "8"),
                    ("difficultyLevel", "2"),
                ],
            )
            .await;
        assert_eq!(res.status, 303, "{}", res.text);

        let res = app.get(&routes::find_quiz(quiz)).await;
        assert_eq!(res.body["title"], "Fractions II");
        assert_eq!(res.body["difficultyLevel"], 2);
    }
}
