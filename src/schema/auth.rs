use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use super::common::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse};

#[derive(Object, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct SignupResponse {
    pub id: String,
    pub email: String,
    pub username: String,
}

#[derive(ApiResponse)]
pub enum SignupResponses {
    #[oai(status = 201)]
    Ok(Json<SignupResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
}

#[derive(ApiResponse)]
pub enum LoginResponses {
    #[oai(status = 200)]
    Ok(Json<LoginResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum LogoutResponses {
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}

#[derive(ApiResponse)]
pub enum ResetPasswordResponses {
    #[oai(status = 200)]
    Ok(Json<ResetPasswordResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
