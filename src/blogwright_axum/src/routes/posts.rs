use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use blogwright_application::{
    CreatePostUseCase, DeletePostUseCase, EditPostUseCase, ShowPostUseCase,
};
use blogwright_core::{PostId, can_modify};

use super::editor;
use crate::error::AppError;
use crate::flash::{self, FlashCategory};
use crate::forms::{FieldErrors, PostForm};
use crate::middleware::{AuthUser, PageContext};
use crate::state::AppState;
use crate::views::{PostTemplate, PostView, render};

const NEW_POST: &str = "New Post";
const UPDATE_POST: &str = "Update Post";

pub async fn new_form(ctx: PageContext) -> Result<Response, AppError> {
    editor(
        ctx.nav(),
        NEW_POST,
        "/post/new".to_owned(),
        "",
        "",
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Create post", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return editor(
                ctx.nav(),
                NEW_POST,
                "/post/new".to_owned(),
                &form.title,
                &form.content,
                errors,
            );
        }
    };

    CreatePostUseCase::new(&*state.post_store)
        .execute(&user, update)
        .await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your post has been created!");
    Ok((jar, Redirect::to("/")).into_response())
}

#[tracing::instrument(name = "Show post", skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let authored = ShowPostUseCase::new(&*state.post_store, &*state.user_store)
        .execute(PostId(id))
        .await?;
    let can_modify = ctx
        .user
        .as_ref()
        .is_some_and(|user| can_modify(user, &authored.post));

    render(&PostTemplate {
        nav: ctx.nav(),
        page_title: authored.post.title.as_str().to_owned(),
        post: PostView::from(&authored),
        can_modify,
    })
}

#[tracing::instrument(name = "Edit post form", skip(state, user, ctx))]
pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let post = EditPostUseCase::new(&*state.post_store)
        .load_for_edit(&user, PostId(id))
        .await?;

    editor(
        ctx.nav(),
        UPDATE_POST,
        format!("/post/{id}/update"),
        post.title.as_str(),
        &post.content,
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Update post", skip(state, user, ctx, jar, form))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let use_case = EditPostUseCase::new(&*state.post_store);
    use_case.load_for_edit(&user, PostId(id)).await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return editor(
                ctx.nav(),
                UPDATE_POST,
                format!("/post/{id}/update"),
                &form.title,
                &form.content,
                errors,
            );
        }
    };

    let post = use_case.execute(&user, PostId(id), update).await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your post has been updated!");
    Ok((jar, Redirect::to(&format!("/post/{}", post.id))).into_response())
}

#[tracing::instrument(name = "Delete post", skip(state, user, jar))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    DeletePostUseCase::new(&*state.post_store)
        .execute(&user, PostId(id))
        .await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your post has been deleted.");
    Ok((jar, Redirect::to("/")).into_response())
}
