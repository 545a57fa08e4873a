use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use blogwright_adapters::auth::{create_removal_cookie, generate_session_cookie};
use blogwright_application::{
    ListPostsUseCase, LoginError, LoginUseCase, LogoutUseCase, RegisterError, RegisterUseCase,
    RequestPasswordResetError, RequestPasswordResetUseCase, ResetPasswordUseCase,
    UpdateAccountError, UpdateAccountUseCase, UploadedPicture,
};
use blogwright_core::{Password, PictureStoreError, User, UserStoreError, Username};
use serde::Deserialize;

use super::PageQuery;
use crate::error::AppError;
use crate::flash::{self, FlashCategory};
use crate::forms::{
    AccountForm, FieldErrors, LoginForm, RegistrationForm, RequestResetForm, ResetPasswordForm,
};
use crate::middleware::{
    AuthUser, CurrentSession, CurrentUser, PageContext, encode_query_value, safe_next_path,
};
use crate::state::AppState;
use crate::views::{
    AccountTemplate, AccountView, LoginTemplate, NavContext, PostListing, RegisterTemplate,
    ResetRequestTemplate, ResetTokenTemplate, UserPostsTemplate, render,
};

pub const LOGIN_FAILED: &str = "Login Unsuccessful. Please check email and password.";
pub const INVALID_RESET_TOKEN: &str = "That is an invalid or expired token.";

fn home() -> Response {
    Redirect::to("/").into_response()
}

/// Unique-constraint failures belong next to the field that caused them.
fn taken_field(e: &UserStoreError) -> Option<&'static str> {
    match e {
        UserStoreError::UsernameTaken => Some("username"),
        UserStoreError::EmailTaken => Some("email"),
        _ => None,
    }
}

fn register_page(
    ctx: &PageContext,
    form: &RegistrationForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&RegisterTemplate {
        nav: ctx.nav(),
        page_title: "Register".to_owned(),
        username: form.username.clone(),
        email: form.email.clone(),
        errors,
    })
}

pub async fn register_form(
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }
    register_page(&ctx, &RegistrationForm::default(), FieldErrors::default())
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    jar: CookieJar,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }

    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => return register_page(&ctx, &form, errors),
    };

    let result = RegisterUseCase::new(&*state.user_store, &state.bootstrap_admins)
        .execute(
            registration.username,
            registration.email,
            registration.password,
        )
        .await;

    match result {
        Ok(user) => {
            let message = format!("Account created for {}!", user.username);
            let jar = flash::push(jar, FlashCategory::Success, message);
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(RegisterError::UserStoreError(e)) => match taken_field(&e) {
            Some(field) => {
                let mut errors = FieldErrors::default();
                errors.add(field, e.to_string());
                register_page(&ctx, &form, errors)
            }
            None => Err(e.into()),
        },
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

impl NextQuery {
    fn login_action(&self) -> String {
        match safe_next_path(self.next.as_deref()) {
            Some(next) => format!("/login?next={}", encode_query_value(next)),
            None => "/login".to_owned(),
        }
    }
}

fn login_page(
    nav: NavContext,
    query: &NextQuery,
    form: &LoginForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&LoginTemplate {
        nav,
        page_title: "Login".to_owned(),
        email: form.email.clone(),
        remember: form.remember(),
        action: query.login_action(),
        errors,
    })
}

pub async fn login_form(
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }
    login_page(ctx.nav(), &query, &LoginForm::default(), FieldErrors::default())
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }

    let (email, password) = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return login_page(ctx.nav(), &query, &form, errors),
    };

    let authenticated = match Password::try_from(password) {
        Ok(password) => LoginUseCase::new(&*state.user_store)
            .execute(email, password)
            .await
            .map(Some),
        Err(_) => Ok(None),
    };

    let user: User = match authenticated {
        Ok(Some(user)) => user,
        Ok(None) | Err(LoginError::IncorrectCredentials) => {
            let nav = ctx.nav_with(FlashCategory::Danger, LOGIN_FAILED);
            return login_page(nav, &query, &form, FieldErrors::default());
        }
        Err(LoginError::UserStoreError(e)) => return Err(e.into()),
    };

    let cookie = generate_session_cookie(user.id, &state.session, form.remember())
        .map_err(|e| AppError::Unexpected(e.to_string()))?;
    tracing::info!(user_id = %user.id, "Logged in");

    let target = safe_next_path(query.next.as_deref()).unwrap_or("/");
    Ok((jar.add(cookie), Redirect::to(target)).into_response())
}

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(claims) = session {
        let expires_at = claims.expires_at();
        LogoutUseCase::new(&*state.revoked_sessions)
            .execute(claims.jti, expires_at)
            .await?;
    }

    let jar = jar.add(create_removal_cookie(&state.session));
    Ok((jar, Redirect::to("/")).into_response())
}

fn account_page(
    ctx: &PageContext,
    account: AccountView,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&AccountTemplate {
        nav: ctx.nav(),
        page_title: "Account".to_owned(),
        account,
        errors,
    })
}

#[tracing::instrument(name = "Account", skip_all)]
pub async fn account(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let user = state.user_store.get_user(identity.id).await?;
    account_page(&ctx, AccountView::from(&user), FieldErrors::default())
}

/// Read the account form. A file input left empty arrives as a part with
/// an empty file name, which means "keep the current picture".
async fn read_account_form(
    mut multipart: Multipart,
) -> Result<(AccountForm, Option<UploadedPicture>), AppError> {
    let mut form = AccountForm::default();
    let mut picture = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "username" | "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if name == "username" {
                    form.username = value;
                } else {
                    form.email = value;
                }
            }
            "picture" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    picture = Some(UploadedPicture {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, picture))
}

#[tracing::instrument(name = "Update account", skip_all)]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ctx: PageContext,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let current = state.user_store.get_user(identity.id).await?;
    let (form, picture) = read_account_form(multipart).await?;

    let submitted = AccountView {
        username: form.username.clone(),
        email: form.email.clone(),
        image_url: AccountView::from(&current).image_url,
    };

    let (username, email) = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return account_page(&ctx, submitted, errors),
    };

    let result = UpdateAccountUseCase::new(&*state.user_store, &*state.picture_store)
        .execute(identity.id, username, email, picture)
        .await;

    let mut errors = FieldErrors::default();
    match result {
        Ok(_) => {
            let jar = flash::push(jar, FlashCategory::Success, "Your account has been updated!");
            return Ok((jar, Redirect::to("/account")).into_response());
        }
        Err(UpdateAccountError::UserStoreError(e)) => match taken_field(&e) {
            Some(field) => errors.add(field, e.to_string()),
            None => return Err(e.into()),
        },
        Err(UpdateAccountError::PictureStoreError(e @ PictureStoreError::UnsupportedExtension)) => {
            errors.add("picture", e.to_string())
        }
        Err(e) => return Err(e.into()),
    }
    account_page(&ctx, submitted, errors)
}

#[tracing::instrument(name = "User posts", skip(state, ctx, query))]
pub async fn user_posts(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let username = Username::try_from(username).map_err(|_| AppError::NotFound)?;
    let (author, page) = ListPostsUseCase::new(&*state.post_store, &*state.user_store)
        .by_author(&username, query.request())
        .await?;
    let listing = PostListing::from(&page);

    render(&UserPostsTemplate {
        nav: ctx.nav(),
        page_title: author.username.as_str().to_owned(),
        username: author.username.as_str().to_owned(),
        total: listing.total,
        posts: listing.posts,
        links: listing.links,
        page_base: format!("/user/{}?page=", author.username),
    })
}

fn reset_request_page(
    ctx: &PageContext,
    email: &str,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&ResetRequestTemplate {
        nav: ctx.nav(),
        page_title: "Reset Password".to_owned(),
        email: email.to_owned(),
        errors,
    })
}

pub async fn reset_request_form(
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }
    reset_request_page(&ctx, "", FieldErrors::default())
}

#[tracing::instrument(name = "Request password reset", skip_all)]
pub async fn reset_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    jar: CookieJar,
    Form(form): Form<RequestResetForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }

    let email = match form.validate() {
        Ok(email) => email,
        Err(errors) => return reset_request_page(&ctx, &form.email, errors),
    };

    let result = RequestPasswordResetUseCase::new(
        &*state.user_store,
        &*state.reset_tokens,
        &*state.email_client,
        &state.public_url,
    )
    .execute(email)
    .await;

    match result {
        Ok(_) => {
            let jar = flash::push(
                jar,
                FlashCategory::Info,
                "An email has been sent with instructions to reset your password.",
            );
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(e @ RequestPasswordResetError::UnknownEmail) => {
            let mut errors = FieldErrors::default();
            errors.add("email", e.to_string());
            reset_request_page(&ctx, &form.email, errors)
        }
        Err(e) => Err(e.into()),
    }
}

fn reject_reset_token(jar: CookieJar) -> Response {
    let jar = flash::push(jar, FlashCategory::Warning, INVALID_RESET_TOKEN);
    (jar, Redirect::to("/reset_password")).into_response()
}

fn reset_token_page(
    ctx: &PageContext,
    token: &str,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&ResetTokenTemplate {
        nav: ctx.nav(),
        page_title: "Reset Password".to_owned(),
        action: format!("/reset_password/{token}"),
        errors,
    })
}

#[tracing::instrument(name = "Reset password form", skip_all)]
pub async fn reset_token_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }

    let use_case = ResetPasswordUseCase::new(
        &*state.user_store,
        &*state.reset_tokens,
        &*state.revoked_reset_tokens,
    );
    match use_case.resolve(&token).await {
        Ok(_) => reset_token_page(&ctx, &token, FieldErrors::default()),
        Err(e) if e.is_token_rejection() => Ok(reject_reset_token(jar)),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_token(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ctx: PageContext,
    jar: CookieJar,
    Path(token): Path<String>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(home());
    }

    let use_case = ResetPasswordUseCase::new(
        &*state.user_store,
        &*state.reset_tokens,
        &*state.revoked_reset_tokens,
    );
    match use_case.resolve(&token).await {
        Ok(_) => {}
        Err(e) if e.is_token_rejection() => return Ok(reject_reset_token(jar)),
        Err(e) => return Err(e.into()),
    }

    let password = match form.validate() {
        Ok(password) => password,
        Err(errors) => return reset_token_page(&ctx, &token, errors),
    };

    match use_case.execute(&token, password).await {
        Ok(_) => {
            let jar = flash::push(jar, FlashCategory::Success, "Your password has been updated!");
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(e) if e.is_token_rejection() => Ok(reject_reset_token(jar)),
        Err(e) => Err(e.into()),
    }
}
