use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::model::category::Category;

use super::common::{InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse};

#[derive(Object, Deserialize, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
        }
    }
}

#[derive(ApiResponse)]
pub enum CategoryAllResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<CategoryResponse>>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct CategoryCreateRequest {
    pub name: String,
}

#[derive(ApiResponse)]
pub enum CategoryCreateResponses {
    #[oai(status = 201)]
    Ok(Json<CategoryResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct CategoryUpdateRequest {
    pub name: String,
}

#[derive(ApiResponse)]
pub enum CategoryUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<CategoryResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum CategoryDeleteResponses {
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
