use axum::http::StatusCode;
use domains::PostRepository;
use integration_tests::{body_json, body_text, publish_form, MultipartForm, TestApp, PNG_BYTES};
use serde_json::json;

#[tokio::test]
async fn published_post_is_listed_and_its_image_served() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;
    let farandula = app.category_id("Farandula").await;

    let response = app
        .post_multipart("/api/v1/publicar", publish_form("Estreno", farandula), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 201);
    assert_eq!(body["message"], "Publicación realizada con éxito.");

    let files = app.uploaded_files();
    assert_eq!(files.len(), 1);
    let filename = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));

    let home = body_text(app.get("/").await).await;
    assert!(home.contains("Estreno"));
    assert!(home.contains(&format!("/public/img/{filename}")));

    assert!(body_text(app.get("/farandula").await).await.contains("Estreno"));
    assert!(!body_text(app.get("/politica").await).await.contains("Estreno"));

    let image = app.get(&format!("/public/img/{filename}")).await;
    assert_eq!(image.status(), StatusCode::OK);
}

#[tokio::test]
async fn publish_without_token_leaves_no_file() {
    let app = TestApp::spawn().await;
    let farandula = app.category_id("Farandula").await;

    let response = app
        .post_multipart("/api/v1/publicar", publish_form("Estreno", farandula), None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn missing_title_removes_the_uploaded_image() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;
    let form = MultipartForm::new()
        .text("contenido", "Sin titulo")
        .text("idCategoria", "1")
        .file("imagen", "foto.png", "image/png", PNG_BYTES)
        .finish();

    let response = app.post_multipart("/api/v1/publicar", form, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "no ha proporcionado todo el contenido requerido."
    );
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn unknown_category_removes_the_uploaded_image() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;

    let response = app
        .post_multipart("/api/v1/publicar", publish_form("Huerfana", 999), Some(&token))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Error con la base de datos.");
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn non_image_attachment_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;
    let form = MultipartForm::new()
        .text("titulo", "Texto")
        .text("contenido", "Contenido")
        .text("idCategoria", "1")
        .file("imagen", "notas.txt", "text/plain", b"solo texto")
        .finish();

    let response = app.post_multipart("/api/v1/publicar", form, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "El archivo adjunto no es una imagen válida."
    );
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn oversized_image_is_rejected_with_the_limit() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;
    let farandula = app.category_id("Farandula").await;

    let mut image = PNG_BYTES.to_vec();
    image.resize(2 * 1024 * 1024 + 1, 0);
    let form = MultipartForm::new()
        .text("titulo", "Enorme")
        .text("contenido", "Contenido")
        .text("idCategoria", &farandula.to_string())
        .file("imagen", "grande.png", "image/png", &image)
        .finish();

    let response = app.post_multipart("/api/v1/publicar", form, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body["code"], 413);
    assert_eq!(body["message"], "Usted ha superado el límite permitido (2)");
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn comments_show_up_on_the_detail_page_with_their_count() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;
    let politica = app.category_id("Politica").await;
    let published = app
        .post_multipart("/api/v1/publicar", publish_form("Debate", politica), Some(&token))
        .await;
    assert_eq!(published.status(), StatusCode::CREATED);
    let post_id = app.store.list().await.unwrap()[0].post.id;

    let response = app
        .post_json(
            "/api/v1/comentarios",
            json!({"comentario": "Muy interesante", "idPublicacion": post_id}),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await["message"],
        "Comentario realizado con éxito."
    );

    let detail = body_text(app.get(&format!("/publicacion/{post_id}")).await).await;
    assert!(detail.contains("Debate"));
    assert!(detail.contains("Muy interesante"));
    assert!(detail.contains("Comentarios (1)"));
}

#[tokio::test]
async fn comment_on_a_missing_post_fails() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("Ana", "ana@gaceta.test", "secreta").await;

    let response = app
        .post_json(
            "/api/v1/comentarios",
            json!({"comentario": "Hola", "idPublicacion": 4242}),
            Some(&token),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "no se pudo crear el comentario."
    );
}
