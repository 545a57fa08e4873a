use crate::helpers::{ADMIN_EMAIL, TestApp, assert_redirects_to};

async fn create_pattern(app: &TestApp, title: &str) -> reqwest::Response {
    app.post_form(
        "/patterns/new",
        &[("title", title), ("content", "Define a one-to-many dependency")],
    )
    .await
}

#[tokio::test]
async fn admin_builds_a_pattern_with_sections() {
    let app = TestApp::new().await;
    app.sign_up("root", ADMIN_EMAIL).await;

    assert_redirects_to(&create_pattern(&app, "Observer").await, "/patterns");
    let index = app.get_html("/patterns").await;
    assert!(index.contains("Your pattern has been created!"));
    assert!(index.contains("Observer"));

    let response = app
        .post_form(
            "/patterns/1/sections/new",
            &[("title", "Intent"), ("content", "Notify dependents")],
        )
        .await;
    assert_redirects_to(&response, "/patterns/1");

    let pattern = app.get_html("/patterns/1").await;
    assert!(pattern.contains("Your section has been created!"));
    assert!(pattern.contains("Notify dependents"));

    let response = app
        .post_form(
            "/sections/1/update",
            &[("title", "Intent"), ("content", "Keep dependents in sync")],
        )
        .await;
    assert_redirects_to(&response, "/sections/1");
    assert!(app.get_html("/sections/1").await.contains("Keep dependents in sync"));

    assert_redirects_to(&app.post_form("/sections/1/delete", &[]).await, "/patterns/1");
    assert_eq!(app.get("/sections/1").await.status().as_u16(), 404);
}

#[tokio::test]
async fn duplicate_title_is_a_field_error() {
    let app = TestApp::new().await;
    app.sign_up("root", ADMIN_EMAIL).await;
    create_pattern(&app, "Observer").await;

    let response = create_pattern(&app, "Observer").await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("A pattern with that title already exists.")
    );
}

#[tokio::test]
async fn regular_users_cannot_manage_patterns() {
    let app = TestApp::new().await;
    app.sign_up("root", ADMIN_EMAIL).await;
    create_pattern(&app, "Observer").await;
    app.logout().await;

    app.sign_up("ada", "ada@example.com").await;

    assert!(!app.get_html("/patterns/1").await.contains("/patterns/1/update"));
    assert_eq!(app.get("/patterns/new").await.status().as_u16(), 403);
    assert_eq!(create_pattern(&app, "Strategy").await.status().as_u16(), 403);
    assert_eq!(app.get("/patterns/1/update").await.status().as_u16(), 403);
    assert_eq!(app.post_form("/patterns/1/delete", &[]).await.status().as_u16(), 403);
    assert_eq!(
        app.post_form(
            "/patterns/1/sections/new",
            &[("title", "Intent"), ("content", "x")]
        )
        .await
        .status()
        .as_u16(),
        403
    );
    assert!(app.get_html("/patterns").await.contains("Observer"));
}

#[tokio::test]
async fn anonymous_visitors_can_read_patterns() {
    let app = TestApp::new().await;
    app.sign_up("root", ADMIN_EMAIL).await;
    create_pattern(&app, "Observer").await;

    let visitor = app.new_browser();
    let response = visitor.get(app.url("/patterns/1")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("Observer"));

    let response = visitor.get(app.url("/patterns/new")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 303);
}

#[tokio::test]
async fn deleting_a_pattern_removes_its_sections() {
    let app = TestApp::new().await;
    app.sign_up("root", ADMIN_EMAIL).await;
    create_pattern(&app, "Observer").await;
    app.post_form(
        "/patterns/1/sections/new",
        &[("title", "Intent"), ("content", "x")],
    )
    .await;

    assert_redirects_to(&app.post_form("/patterns/1/delete", &[]).await, "/patterns");

    assert_eq!(app.get("/patterns/1").await.status().as_u16(), 404);
    assert_eq!(app.get("/sections/1").await.status().as_u16(), 404);
}
