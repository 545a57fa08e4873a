use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use blogwright_application::{BrowsePatternsUseCase, ManageSectionsUseCase};
use blogwright_core::{PatternId, SectionId};

use super::editor;
use crate::error::AppError;
use crate::flash::{self, FlashCategory};
use crate::forms::{FieldErrors, SectionForm};
use crate::middleware::{AuthUser, PageContext};
use crate::state::AppState;
use crate::views::{PatternView, SectionTemplate, SectionView, render};

const UPDATE_SECTION: &str = "Update Section";

fn new_section_legend(pattern_title: &str) -> String {
    format!("New Section for {pattern_title}")
}

#[tracing::instrument(name = "Show section", skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (pattern, section) = BrowsePatternsUseCase::new(&*state.pattern_store)
        .section(SectionId(id))
        .await?;

    render(&SectionTemplate {
        nav: ctx.nav(),
        page_title: section.title.as_str().to_owned(),
        pattern: PatternView::from(&pattern),
        section: SectionView::from(&section),
    })
}

#[tracing::instrument(name = "New section form", skip(state, user, ctx))]
pub async fn new_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    Path(pattern_id): Path<i64>,
) -> Result<Response, AppError> {
    let pattern = ManageSectionsUseCase::new(&*state.pattern_store)
        .authorize_create(&user, PatternId(pattern_id))
        .await?;

    editor(
        ctx.nav(),
        &new_section_legend(pattern.title.as_str()),
        format!("/patterns/{pattern_id}/sections/new"),
        "",
        "",
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Create section", skip(state, user, ctx, jar, form))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(pattern_id): Path<i64>,
    Form(form): Form<SectionForm>,
) -> Result<Response, AppError> {
    let use_case = ManageSectionsUseCase::new(&*state.pattern_store);
    let pattern = use_case
        .authorize_create(&user, PatternId(pattern_id))
        .await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return editor(
                ctx.nav(),
                &new_section_legend(pattern.title.as_str()),
                format!("/patterns/{pattern_id}/sections/new"),
                &form.title,
                &form.content,
                errors,
            );
        }
    };

    use_case
        .create(&user, PatternId(pattern_id), update)
        .await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your section has been created!");
    Ok((jar, Redirect::to(&format!("/patterns/{pattern_id}"))).into_response())
}

#[tracing::instrument(name = "Edit section form", skip(state, user, ctx))]
pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let section = ManageSectionsUseCase::new(&*state.pattern_store)
        .load_for_edit(&user, SectionId(id))
        .await?;

    editor(
        ctx.nav(),
        UPDATE_SECTION,
        format!("/sections/{id}/update"),
        section.title.as_str(),
        &section.content,
        FieldErrors::default(),
    )
}

#[tracing::instrument(name = "Update section", skip(state, user, ctx, jar, form))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<SectionForm>,
) -> Result<Response, AppError> {
    let use_case = ManageSectionsUseCase::new(&*state.pattern_store);
    use_case.load_for_edit(&user, SectionId(id)).await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return editor(
                ctx.nav(),
                UPDATE_SECTION,
                format!("/sections/{id}/update"),
                &form.title,
                &form.content,
                errors,
            );
        }
    };

    let section = use_case.update(&user, SectionId(id), update).await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your section has been updated!");
    Ok((jar, Redirect::to(&format!("/sections/{}", section.id))).into_response())
}

#[tracing::instrument(name = "Delete section", skip(state, user, jar))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let section = ManageSectionsUseCase::new(&*state.pattern_store)
        .delete(&user, SectionId(id))
        .await?;

    let jar = flash::push(jar, FlashCategory::Success, "Your section has been deleted.");
    Ok((jar, Redirect::to(&format!("/patterns/{}", section.pattern_id))).into_response())
}
