use poem_openapi::{payload::Json, ApiResponse, Object, Union};
use serde::{Deserialize, Serialize};

use crate::model::project::Project;

use super::common::{
    BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};

#[derive(Object, Deserialize, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub recruiter_name: String,
    pub description: String,
    pub contribution: String,
    pub tools: Vec<String>,
    pub link: String,
    pub category_id: Option<String>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            title: project.title,
            recruiter_name: project.recruiter_name,
            description: project.description,
            contribution: project.contribution,
            tools: project.tools,
            link: project.link,
            category_id: project.category_id.map(|id| id.to_string()),
        }
    }
}

#[derive(ApiResponse)]
pub enum ProjectAllResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<ProjectResponse>>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct ProjectCreateRequest {
    pub title: String,
    pub recruiter_name: String,
    pub description: String,
    pub contribution: String,
    /// Comma-separated; split and trimmed before storage.
    pub tools: String,
    pub link: String,
    pub category_id: Option<String>,
}

#[derive(ApiResponse)]
pub enum ProjectCreateResponses {
    #[oai(status = 201)]
    Ok(Json<ProjectResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

/// Tools on an edit come back either untouched (the stored list) or retyped
/// (a comma-separated string).
#[derive(Union, Debug, Clone)]
pub enum ToolsInput {
    Raw(String),
    List(Vec<String>),
}

#[derive(Object)]
pub struct ProjectUpdateRequest {
    pub title: Option<String>,
    pub recruiter_name: Option<String>,
    pub description: Option<String>,
    pub contribution: Option<String>,
    pub tools: Option<ToolsInput>,
    pub link: Option<String>,
    /// An empty string clears the category assignment.
    pub category_id: Option<String>,
}

#[derive(ApiResponse)]
pub enum ProjectUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<ProjectResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum ProjectDeleteResponses {
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
