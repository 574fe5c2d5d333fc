//! Drives a real listener over HTTP, the way the browser pages do.

use integration_tests::{TestApp, PNG_BYTES};
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn register_login_publish_and_comment_over_http() {
    let test_app = TestApp::spawn().await;
    let farandula = test_app.category_id("Farandula").await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = test_app.app.clone();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let client = reqwest::Client::new();

    let registered = client
        .post(format!("{base}/api/v1/registro"))
        .json(&json!({"nombre": "Luis", "email": "luis@gaceta.test", "password": "clave"}))
        .send()
        .await
        .unwrap();
    assert_eq!(registered.status(), StatusCode::CREATED);

    let login: Value = client
        .post(format!("{base}/api/v1/login"))
        .json(&json!({"email": "luis@gaceta.test", "password": "clave"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().unwrap().to_string();

    let publish_page = client
        .get(format!("{base}/publicar"))
        .header(reqwest::header::AUTHORIZATION, &token)
        .send()
        .await
        .unwrap();
    assert_eq!(publish_page.status(), StatusCode::OK);
    let publish_page = publish_page.text().await.unwrap();
    assert!(publish_page.contains(">Farandula</option>"));
    assert!(publish_page.contains(">Politica</option>"));

    let form = multipart::Form::new()
        .text("titulo", "Gala anual")
        .text("contenido", "Todo sobre la gala")
        .text("idCategoria", farandula.to_string())
        .part(
            "imagen",
            multipart::Part::bytes(PNG_BYTES.to_vec())
                .file_name("gala.png")
                .mime_str("image/png")
                .unwrap(),
        );
    let published = client
        .post(format!("{base}/api/v1/publicar"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(published.status(), StatusCode::CREATED);

    let home = client.get(&base).send().await.unwrap().text().await.unwrap();
    assert!(home.contains("Gala anual"));

    let commented = client
        .post(format!("{base}/api/v1/comentarios"))
        .bearer_auth(&token)
        .form(&[("comentario", "Qué elegancia"), ("idPublicacion", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(commented.status(), StatusCode::CREATED);

    let detail = client
        .get(format!("{base}/publicacion/1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(detail.contains("Qué elegancia"));
    assert!(detail.contains("Comentarios (1)"));
}
