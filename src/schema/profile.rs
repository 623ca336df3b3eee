use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::core::utils::datetime_to_string_opt;
use crate::model::profile::Profile;

use super::common::{
    BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};

#[derive(Object, Deserialize, Serialize)]
pub struct ProfileDetailResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub title: String,
    pub bio: String,
    pub picture_url: String,
    pub picture_scale: f32,
    pub picture_offset_x: i32,
    pub picture_offset_y: i32,
    pub created_date: Option<String>,
}

impl From<Profile> for ProfileDetailResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            username: profile.username,
            title: profile.title,
            bio: profile.bio,
            picture_url: profile.picture_url,
            picture_scale: profile.picture_scale,
            picture_offset_x: profile.picture_offset_x,
            picture_offset_y: profile.picture_offset_y,
            created_date: datetime_to_string_opt(profile.created_date),
        }
    }
}

#[derive(ApiResponse)]
pub enum ProfileDetailResponses {
    #[oai(status = 200)]
    Ok(Json<ProfileDetailResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
}

#[derive(ApiResponse)]
pub enum ProfileUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<ProfileDetailResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct PictureTransformRequest {
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Object, Deserialize, Serialize)]
pub struct PictureUploadResponse {
    pub picture_url: String,
}

#[derive(ApiResponse)]
pub enum PictureUploadResponses {
    #[oai(status = 200)]
    Ok(Json<PictureUploadResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
