//! Askama page templates.

use askama::Template;

use super::models::{
    AccountView, NavContext, PageLinkView, PatternView, PostView, SectionView,
};
use crate::forms::FieldErrors;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub posts: Vec<PostView>,
    pub links: Vec<PageLinkView>,
    /// Page links append the page number to this.
    pub page_base: String,
}

#[derive(Template)]
#[template(path = "user_posts.html")]
pub struct UserPostsTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub username: String,
    pub total: u64,
    pub posts: Vec<PostView>,
    pub links: Vec<PageLinkView>,
    pub page_base: String,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub nav: NavContext,
    pub page_title: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub post: PostView,
    pub can_modify: bool,
}

/// Shared create/update form for posts, patterns and sections.
#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub legend: String,
    pub action: String,
    pub title: String,
    pub content: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub email: String,
    pub remember: bool,
    pub action: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub account: AccountView,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "reset_request.html")]
pub struct ResetRequestTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub email: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "reset_token.html")]
pub struct ResetTokenTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub action: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "patterns_index.html")]
pub struct PatternsIndexTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub patterns: Vec<PatternView>,
}

#[derive(Template)]
#[template(path = "pattern.html")]
pub struct PatternTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub pattern: PatternView,
    pub sections: Vec<SectionView>,
}

#[derive(Template)]
#[template(path = "section.html")]
pub struct SectionTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub pattern: PatternView,
    pub section: SectionView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: NavContext,
    pub page_title: String,
    pub status: u16,
    pub heading: String,
    pub message: String,
}
