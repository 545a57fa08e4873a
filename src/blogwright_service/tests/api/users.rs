use crate::helpers::{PASSWORD, TestApp, assert_redirects_to, location};

#[tokio::test]
async fn register_then_login_shows_username_in_nav() {
    let app = TestApp::new().await;

    let response = app.register("ada", "ada@example.com").await;
    assert_redirects_to(&response, "/login");

    let login_page = app.get_html("/login").await;
    assert!(login_page.contains("Account created for ada!"));

    let response = app.login("ada@example.com", PASSWORD).await;
    assert_redirects_to(&response, "/");

    let home = app.get_html("/").await;
    assert!(home.contains("Logout"));
    assert!(home.contains("Account"));
}

#[tokio::test]
async fn flash_is_shown_once() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;

    assert!(app.get_html("/login").await.contains("Account created for ada!"));
    assert!(!app.get_html("/login").await.contains("Account created for ada!"));
}

#[tokio::test]
async fn duplicate_username_and_email_are_field_errors() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;

    let response = app.register("ada", "other@example.com").await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("That username is taken"));

    let response = app.register("grace", "ada@example.com").await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("That email is taken"));
}

#[tokio::test]
async fn mismatched_passwords_rerender_the_form() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("username", "ada"),
                ("email", "ada@example.com"),
                ("password", PASSWORD),
                ("confirm_password", "something-else"),
            ],
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Field must be equal to password."));
    assert!(html.contains("ada@example.com"));
}

#[tokio::test]
async fn wrong_password_shows_inline_failure() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;

    let response = app.login("ada@example.com", "wrong-password").await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Login Unsuccessful. Please check email and password."));

    let response = app.get("/account").await;
    assert_eq!(response.status().as_u16(), 303);
}

#[tokio::test]
async fn protected_pages_redirect_to_login_with_next() {
    let app = TestApp::new().await;

    let response = app.get("/account").await;
    assert_redirects_to(&response, "/login?next=%2Faccount");

    let login_page = app.get_html("/login?next=/account").await;
    assert!(login_page.contains("Please log in to access this page."));

    app.register("ada", "ada@example.com").await;
    let response = app
        .http_client
        .post(app.url("/login?next=/account"))
        .form(&[("email", "ada@example.com"), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_redirects_to(&response, "/account");
}

#[tokio::test]
async fn offsite_next_is_ignored() {
    let app = TestApp::new().await;
    app.register("ada", "ada@example.com").await;

    let response = app
        .http_client
        .post(app.url("/login?next=//evil.example"))
        .form(&[("email", "ada@example.com"), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();

    assert_redirects_to(&response, "/");
}

#[tokio::test]
async fn logged_in_users_are_sent_home_from_auth_pages() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;

    for path in ["/register", "/login", "/reset_password"] {
        assert_redirects_to(&app.get(path).await, "/");
    }
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;
    assert_eq!(app.get("/account").await.status().as_u16(), 200);

    assert_redirects_to(&app.logout().await, "/");

    let response = app.get("/account").await;
    assert_eq!(response.status().as_u16(), 303);
    assert!(location(&response).starts_with("/login"));
}

#[tokio::test]
async fn account_update_changes_username() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;

    let form = reqwest::multipart::Form::new()
        .text("username", "countess")
        .text("email", "ada@example.com");
    let response = app
        .http_client
        .post(app.url("/account"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_redirects_to(&response, "/account");

    let html = app.get_html("/account").await;
    assert!(html.contains("Your account has been updated!"));
    assert!(html.contains("countess"));
}

#[tokio::test]
async fn account_rejects_unsupported_picture() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;

    let picture = reqwest::multipart::Part::bytes(b"GIF89a".to_vec()).file_name("me.gif");
    let form = reqwest::multipart::Form::new()
        .text("username", "ada")
        .text("email", "ada@example.com")
        .part("picture", picture);
    let response = app
        .http_client
        .post(app.url("/account"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("File does not have an allowed extension"));
}

#[tokio::test]
async fn unknown_user_page_is_404() {
    let app = TestApp::new().await;

    let response = app.get("/user/nobody").await;

    assert_eq!(response.status().as_u16(), 404);
    assert!(response.text().await.unwrap().contains("Page Not Found"));
}

#[tokio::test]
async fn unknown_route_renders_error_page() {
    let app = TestApp::new().await;
    assert_eq!(app.get("/no/such/page").await.status().as_u16(), 404);
}
