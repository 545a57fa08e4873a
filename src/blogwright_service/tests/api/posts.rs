use crate::helpers::{PASSWORD, TestApp, assert_redirects_to};

#[tokio::test]
async fn created_post_appears_on_home_and_its_page() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;

    let response = app.create_post("Analytical Engine", "Notes on the engine").await;
    assert_redirects_to(&response, "/");

    let home = app.get_html("/").await;
    assert!(home.contains("Your post has been created!"));
    assert!(home.contains("Analytical Engine"));

    let post = app.get_html("/post/1").await;
    assert!(post.contains("Notes on the engine"));
    assert!(post.contains("/post/1/update"));
}

#[tokio::test]
async fn blank_title_rerenders_the_editor() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;

    let response = app.create_post("   ", "content kept").await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("This field is required."));
    assert!(html.contains("content kept"));
    assert_eq!(app.get("/post/1").await.status().as_u16(), 404);
}

#[tokio::test]
async fn anonymous_users_cannot_create_posts() {
    let app = TestApp::new().await;

    let response = app.create_post("Title", "Content").await;

    assert_eq!(response.status().as_u16(), 303);
    assert!(app.get("/post/1").await.status().is_client_error());
}

#[tokio::test]
async fn only_the_author_can_modify_a_post() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;
    app.create_post("Mine", "Original").await;
    app.logout().await;

    app.sign_up("grace", "grace@example.com").await;

    assert!(!app.get_html("/post/1").await.contains("/post/1/update"));
    assert_eq!(app.get("/post/1/update").await.status().as_u16(), 403);

    let response = app
        .post_form("/post/1/update", &[("title", "Stolen"), ("content", "x")])
        .await;
    assert_eq!(response.status().as_u16(), 403);
    assert!(response.text().await.unwrap().contains("permission to do that"));

    assert_eq!(app.post_form("/post/1/delete", &[]).await.status().as_u16(), 403);
    assert!(app.get_html("/post/1").await.contains("Original"));
}

#[tokio::test]
async fn author_updates_and_deletes_a_post() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;
    app.create_post("Draft", "First version").await;

    assert!(app.get_html("/post/1/update").await.contains("First version"));

    let response = app
        .post_form("/post/1/update", &[("title", "Final"), ("content", "Second version")])
        .await;
    assert_redirects_to(&response, "/post/1");

    let post = app.get_html("/post/1").await;
    assert!(post.contains("Your post has been updated!"));
    assert!(post.contains("Second version"));

    let response = app.post_form("/post/1/delete", &[]).await;
    assert_redirects_to(&response, "/");
    assert!(app.get_html("/").await.contains("Your post has been deleted."));
    assert_eq!(app.get("/post/1").await.status().as_u16(), 404);
}

#[tokio::test]
async fn missing_post_is_404() {
    let app = TestApp::new().await;
    assert_eq!(app.get("/post/42").await.status().as_u16(), 404);
    assert_eq!(app.get("/post/not-a-number").await.status().as_u16(), 400);
}

#[tokio::test]
async fn home_paginates_newest_first() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;
    for n in 1..=6 {
        app.create_post(&format!("Post {n}"), "body").await;
    }

    let first = app.get_html("/").await;
    assert!(first.contains("Post 6"));
    assert!(first.contains("Post 2"));
    assert!(!first.contains("Post 1<"));
    assert!(first.contains("/?page=2"));

    let second = app.get_html("/?page=2").await;
    assert!(second.contains("Post 1"));
    assert!(!second.contains("Post 6"));

    assert_eq!(app.get("/?page=3").await.status().as_u16(), 404);
    assert_eq!(app.get("/?page=0").await.status().as_u16(), 404);
    assert_eq!(app.get("/?page=abc").await.status().as_u16(), 200);
}

#[tokio::test]
async fn user_page_lists_only_their_posts() {
    let app = TestApp::new().await;
    app.sign_up("ada", "ada@example.com").await;
    app.create_post("Ada writes", "a").await;
    app.logout().await;

    let grace = app.new_browser();
    for (path, form) in [
        (
            "/register",
            vec![
                ("username", "grace"),
                ("email", "grace@example.com"),
                ("password", PASSWORD),
                ("confirm_password", PASSWORD),
            ],
        ),
        (
            "/login",
            vec![("email", "grace@example.com"), ("password", PASSWORD)],
        ),
        ("/post/new", vec![("title", "Grace writes"), ("content", "g")]),
    ] {
        let response = grace.post(app.url(path)).form(&form).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 303);
    }

    let page = app.get_html("/user/ada").await;
    assert!(page.contains("Ada writes"));
    assert!(!page.contains("Grace writes"));
}
