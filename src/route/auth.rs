use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::{
        error::PortfolioError,
        identity::IdentityService,
        security::{get_identity_from_token, BearerAuthorization},
    },
    repository::account::sign_up_with_profile,
    schema::{
        auth::{
            LoginRequest, LoginResponse, LoginResponses, LogoutResponses, ResetPasswordRequest,
            ResetPasswordResponse, ResetPasswordResponses, SignupRequest, SignupResponse,
            SignupResponses,
        },
        common::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
    },
    AppState,
};

#[derive(Tags)]
enum ApiAuthTags {
    Auth,
}

pub struct ApiAuth;

#[OpenApi]
impl ApiAuth {
    #[oai(path = "/auth/signup", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_signup(
        &self,
        json: Json<SignupRequest>,
        state: Data<&Arc<AppState>>,
    ) -> SignupResponses {
        match sign_up_with_profile(
            state.identity.as_ref(),
            state.store.as_ref(),
            &json.email,
            &json.password,
            &json.username,
        )
        .await
        {
            Ok((account, created)) => SignupResponses::Ok(Json(SignupResponse {
                id: account.id.to_string(),
                email: account.email,
                username: created.username,
            })),
            Err(PortfolioError::Validation { message, .. }) => {
                SignupResponses::BadRequest(Json(BadRequestResponse { message }))
            }
            Err(err) => SignupResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_signup",
                    "sign_up_with_profile",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/auth/login", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_login(
        &self,
        json: Json<LoginRequest>,
        state: Data<&Arc<AppState>>,
    ) -> LoginResponses {
        let token = match state.identity.sign_in(&json.email, &json.password).await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "sign in",
                    &err.to_string(),
                )))
            }
        };
        match token {
            Some(token) => LoginResponses::Ok(Json(LoginResponse {
                token,
                token_type: "Bearer".to_string(),
            })),
            None => LoginResponses::BadRequest(Json(BadRequestResponse {
                message: "Invalid credentials".to_string(),
            })),
        }
    }

    #[oai(path = "/auth/logout", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_logout(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> LogoutResponses {
        let token = auth.0.token;
        let caller = match get_identity_from_token(state.identity.as_ref(), token.clone()).await {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "resolve identity",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if caller.is_none() {
            return LogoutResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        }
        if let Err(err) = state
            .identity
            .sign_out(token.as_deref().unwrap_or_default())
            .await
        {
            return LogoutResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_logout",
                "sign out",
                &err.to_string(),
            )));
        }
        LogoutResponses::NoContent
    }

    #[oai(
        path = "/auth/reset-password",
        method = "post",
        tag = "ApiAuthTags::Auth"
    )]
    async fn auth_reset_password(
        &self,
        json: Json<ResetPasswordRequest>,
        state: Data<&Arc<AppState>>,
    ) -> ResetPasswordResponses {
        if let Err(err) = state.identity.reset_password(&json.email).await {
            return ResetPasswordResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_reset_password",
                    "reset password",
                    &err.to_string(),
                ),
            ));
        }
        ResetPasswordResponses::Ok(Json(ResetPasswordResponse {
            message: "Password reset email sent".to_string(),
        }))
    }
}
