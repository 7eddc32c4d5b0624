//! Integration tests for the notes API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::util::ServiceExt;

    use notekeeper::api::public::notes::Note;

    use crate::test_utils::{body_to_string, test_app, test_app_with_config};

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create_note(app: &Router, user_id: &str, content: &str) -> Note {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/notes",
                json!({"user_id": user_id, "content": content}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_to_string(response.into_body()).await;
        serde_json::from_str(&body).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn it_creates_and_lists_notes() {
        let app = test_app().await;

        let first = create_note(&app, "user-1", "first note").await;
        let second = create_note(&app, "user-1", "second note").await;
        create_note(&app, "user-2", "someone else").await;

        let response = app
            .oneshot(get("/api/notes?user_id=user-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let notes: Vec<Note> = serde_json::from_str(&body).unwrap();
        // Newest first
        assert_eq!(
            notes.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(notes[1].content, "first note");
    }

    #[tokio::test]
    #[serial]
    async fn it_returns_400_for_missing_user_id() {
        let app = test_app().await;

        let response = app.clone().oneshot(get("/api/notes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("user_id is required"));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/notes",
                json!({"user_id": "user-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("content is required"));
    }

    #[tokio::test]
    #[serial]
    async fn it_views_only_owned_notes() {
        let app = test_app().await;
        let note = create_note(&app, "user-1", "private").await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/notes/{}?user_id=user-1", note.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        let found: Note = serde_json::from_str(&body).unwrap();
        assert_eq!(found, note);

        let response = app
            .oneshot(get(&format!("/api/notes/{}?user_id=user-2", note.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn it_updates_a_note() {
        let app = test_app().await;
        let note = create_note(&app, "user-1", "draft").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/notes/{}", note.id),
                json!({"user_id": "user-1", "content": "final"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        let updated: Note = serde_json::from_str(&body).unwrap();
        assert_eq!(updated.content, "final");
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);

        // Only the owner can update
        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/notes/{}", note.id),
                json!({"user_id": "user-2", "content": "hijacked"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn it_deletes_a_note() {
        let app = test_app().await;
        let note = create_note(&app, "user-1", "temporary").await;

        let delete = |user_id: &str| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/notes/{}?user_id={}", note.id, user_id))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(delete("user-2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.clone().oneshot(delete("user-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(delete("user-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn it_includes_default_notes_for_every_user() {
        let (app, _db) = test_app_with_config(|config| {
            config.default_note_ids = vec![1];
        })
        .await;

        // The first note created gets id 1 and becomes a default note
        let default_note = create_note(&app, "admin", "welcome").await;
        assert_eq!(default_note.id, 1);
        let own_note = create_note(&app, "user-1", "mine").await;

        let response = app
            .clone()
            .oneshot(get("/api/notes?user_id=user-1"))
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        let notes: Vec<Note> = serde_json::from_str(&body).unwrap();
        assert_eq!(
            notes.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![own_note.id, default_note.id]
        );

        let response = app
            .clone()
            .oneshot(get("/api/notes/1?user_id=user-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Default notes are read only to everyone else
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/notes/1?user_id=user-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
