use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use blogwright_application::{BrowsePatternsUseCase, ManagePatternsUseCase, PatternError};
use blogwright_core::PatternId;

use super::editor;
use crate::error::AppError;
use crate::flash::{self, FlashCategory};
use crate::forms::{FieldErrors, PatternForm};
use crate::middleware::{AuthUser, PageContext};
use crate::state::AppState;
use crate::views::{PatternTemplate, PatternView, PatternsIndexTemplate, SectionView, render};

const NEW_PATTERN: &str = "New Pattern";
const UPDATE_PATTERN: &str = "Update Pattern";

#[tracing::instrument(name = "Patterns index", skip_all)]
pub async fn index(State(state): State<AppState>, ctx: PageContext) -> Result<Response, AppError> {
    let patterns = BrowsePatternsUseCase::new(&*state.pattern_store)
        .index()
        .await?;

    render(&PatternsIndexTemplate {
        nav: ctx.nav(),
        page_title: "Patterns Index".to_owned(),
        patterns: patterns.iter().map(PatternView::from).collect(),
    })
}

#[tracing::instrument(name = "Show pattern", skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let found = BrowsePatternsUseCase::new(&*state.pattern_store)
        .pattern(PatternId(id))
        .await?;

    render(&PatternTemplate {
        nav: ctx.nav(),
        page_title: found.pattern.title.as_str().to_owned(),
        pattern: PatternView::from(&found.pattern),
        sections: found.sections.iter().map(SectionView::from).collect(),
    })
}

pub async fn new_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
) -> Result<Response, AppError> {
    ManagePatternsUseCase::new(&*state.pattern_store).authorize_create(&user)?;

    editor(
        ctx.nav(),
        NEW_PATTERN,
        "/patterns/new".to_owned(),
        "",
        "",
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Create pattern", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Form(form): Form<PatternForm>,
) -> Result<Response, AppError> {
    let use_case = ManagePatternsUseCase::new(&*state.pattern_store);
    use_case.authorize_create(&user)?;

    let rerender = |errors| {
        editor(
            ctx.nav(),
            NEW_PATTERN,
            "/patterns/new".to_owned(),
            &form.title,
            &form.content,
            errors,
        )
    };

    let pattern = match form.validate() {
        Ok(pattern) => pattern,
        Err(errors) => return rerender(errors),
    };

    match use_case.create(&user, pattern).await {
        Ok(_) => {
            let jar = flash::push(jar, FlashCategory::Success, "Your pattern has been created!");
            Ok((jar, Redirect::to("/patterns")).into_response())
        }
        Err(e @ PatternError::TitleTaken) => rerender(title_error(e)),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(name = "Edit pattern form", skip(state, user, ctx))]
pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let pattern = ManagePatternsUseCase::new(&*state.pattern_store)
        .load_for_edit(&user, PatternId(id))
        .await?;

    editor(
        ctx.nav(),
        UPDATE_PATTERN,
        format!("/patterns/{id}/update"),
        pattern.title.as_str(),
        pattern.content.as_deref().unwrap_or_default(),
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Update pattern", skip(state, user, ctx, jar, form))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PatternForm>,
) -> Result<Response, AppError> {
    let use_case = ManagePatternsUseCase::new(&*state.pattern_store);
    use_case.load_for_edit(&user, PatternId(id)).await?;

    let rerender = |errors| {
        editor(
            ctx.nav(),
            UPDATE_PATTERN,
            format!("/patterns/{id}/update"),
            &form.title,
            &form.content,
            errors,
        )
    };

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => return rerender(errors),
    };

    match use_case.update(&user, PatternId(id), update).await {
        Ok(pattern) => {
            let jar = flash::push(jar, FlashCategory::Success, "Your pattern has been updated!");
            Ok((jar, Redirect::to(&format!("/patterns/{}", pattern.id))).into_response())
        }
        Err(e @ PatternError::TitleTaken) => rerender(title_error(e)),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(name = "Delete pattern", skip(state, user, jar))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    ManagePatternsUseCase::new(&*state.pattern_store)
        .delete(&user, PatternId(id))
        .await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your pattern has been deleted.");
    Ok((jar, Redirect::to("/patterns")).into_response())
}

fn title_error(e: PatternError) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.add("title", e.to_string());
    errors
}
