use crate::helpers::{PASSWORD, TestApp, assert_redirects_to};

const NEW_PASSWORD: &str = "battery-staple";

async fn request_reset(app: &TestApp, email: &str) -> String {
    let response = app.post_form("/reset_password", &[("email", email)]).await;
    assert_redirects_to(&response, "/login");

    let sent = app
        .email_client
        .last_sent_to(email)
        .await
        .expect("reset email was sent");
    assert_eq!(sent.subject, "Password Reset Request");

    let start = sent.content.find("/reset_password/").expect("link in body");
    sent.content[start..]
        .split_whitespace()
        .next()
        .unwrap()
        .to_owned()
}

async fn submit_new_password(app: &TestApp, path: &str) -> reqwest::Response {
    app.post_form(
        path,
        &[("password", NEW_PASSWORD), ("confirm_password", NEW_PASSWORD)],
    )
    .await
}

#[tokio::test]
async fn reset_flow_changes_the_password() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;

    let link = request_reset(&app, "ada@example.com").await;
    assert!(app.get_html("/login").await.contains("An email has been sent"));

    assert_eq!(app.get(&link).await.status().as_u16(), 200);
    assert_redirects_to(&submit_new_password(&app, &link).await, "/login");
    assert!(app.get_html("/login").await.contains("Your password has been updated!"));

    assert_eq!(app.login("ada@example.com", PASSWORD).await.status().as_u16(), 200);
    assert_redirects_to(&app.login("ada@example.com", NEW_PASSWORD).await, "/");
}

#[tokio::test]
async fn unknown_email_is_a_field_error() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/reset_password", &[("email", "nobody@example.com")])
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("There is no account with that email."));
    assert!(app.email_client.sent().await.is_empty());
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;
    let link = request_reset(&app, "ada@example.com").await;

    app.clock.advance(chrono::Duration::seconds(1801));

    assert_redirects_to(&app.get(&link).await, "/reset_password");
    assert!(app.get_html("/reset_password").await.contains("That is an invalid or expired token."));
    assert_redirects_to(&submit_new_password(&app, &link).await, "/reset_password");
}

#[tokio::test]
async fn token_works_only_once() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;
    let link = request_reset(&app, "ada@example.com").await;

    assert_redirects_to(&submit_new_password(&app, &link).await, "/login");
    assert_redirects_to(&submit_new_password(&app, &link).await, "/reset_password");
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::new().await;

    assert_redirects_to(&app.get("/reset_password/not-a-token").await, "/reset_password");
}

#[tokio::test]
async fn short_password_keeps_token_usable() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;
    let link = request_reset(&app, "ada@example.com").await;

    let response = app
        .post_form(&link, &[("password", "short"), ("confirm_password", "short")])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    assert_redirects_to(&submit_new_password(&app, &link).await, "/login");
}
