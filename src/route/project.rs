use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use uuid::Uuid;

use crate::{
    core::{
        error::PortfolioError,
        security::{get_identity_from_token, BearerAuthorization},
    },
    repository::project::{
        create_project, delete_project, get_project_by_id, list_projects, update_project,
        NewProject, ProjectUpdate, ToolsField,
    },
    schema::{
        common::{
            BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
            UnauthorizedResponse,
        },
        project::{
            ProjectAllResponses, ProjectCreateRequest, ProjectCreateResponses,
            ProjectDeleteResponses, ProjectResponse, ProjectUpdateRequest, ProjectUpdateResponses,
            ToolsInput,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiProjectTags {
    Project,
}

pub struct ApiProject;

/// `None` = field absent, `Some(None)` = clear the assignment.
fn parse_category_assignment(input: Option<String>) -> Result<Option<Option<Uuid>>, ()> {
    match input {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(Some(None)),
        Some(raw) => match Uuid::parse_str(&raw) {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => Err(()),
        },
    }
}

#[OpenApi]
impl ApiProject {
    #[oai(path = "/project/", method = "get", tag = "ApiProjectTags::Project")]
    async fn all_project_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProjectAllResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProjectAllResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.project",
                            "all_project_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProjectAllResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        match list_projects(state.store.as_ref(), &caller.id).await {
            Ok(projects) => ProjectAllResponses::Ok(Json(
                projects.into_iter().map(ProjectResponse::from).collect(),
            )),
            Err(err) => ProjectAllResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.project",
                    "all_project_api",
                    "list_projects",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/project/", method = "post", tag = "ApiProjectTags::Project")]
    async fn create_project_api(
        &self,
        json: Json<ProjectCreateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProjectCreateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProjectCreateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.project",
                            "create_project_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProjectCreateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let category_id = match parse_category_assignment(json.0.category_id) {
            Ok(assignment) => assignment.flatten(),
            Err(()) => {
                return ProjectCreateResponses::BadRequest(Json(BadRequestResponse {
                    message: "category_id: not a valid id".to_string(),
                }))
            }
        };
        let new = NewProject {
            title: json.0.title,
            recruiter_name: json.0.recruiter_name,
            description: json.0.description,
            contribution: json.0.contribution,
            tools: json.0.tools,
            link: json.0.link,
            category_id,
        };
        match create_project(state.store.as_ref(), &caller.id, new).await {
            Ok(created) => ProjectCreateResponses::Ok(Json(created.into())),
            Err(PortfolioError::Validation { field, message }) => {
                ProjectCreateResponses::BadRequest(Json(BadRequestResponse {
                    message: format!("{field}: {message}"),
                }))
            }
            Err(err) => ProjectCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.project",
                    "create_project_api",
                    "create_project",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/project/:id", method = "put", tag = "ApiProjectTags::Project")]
    async fn update_project_api(
        &self,
        Path(id): Path<String>,
        json: Json<ProjectUpdateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProjectUpdateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProjectUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.project",
                            "update_project_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProjectUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let Ok(id) = Uuid::parse_str(&id) else {
            return ProjectUpdateResponses::NotFound(Json(NotFoundResponse::default()));
        };
        match get_project_by_id(state.store.as_ref(), &id).await {
            Ok(Some(found)) if found.owner_id == caller.id => {}
            Ok(_) => {
                return ProjectUpdateResponses::NotFound(Json(NotFoundResponse::default()));
            }
            Err(err) => {
                return ProjectUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.project",
                        "update_project_api",
                        "get_project_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        }
        let category_id = match parse_category_assignment(json.0.category_id) {
            Ok(assignment) => assignment,
            Err(()) => {
                return ProjectUpdateResponses::BadRequest(Json(BadRequestResponse {
                    message: "category_id: not a valid id".to_string(),
                }))
            }
        };
        let update = ProjectUpdate {
            title: json.0.title,
            recruiter_name: json.0.recruiter_name,
            description: json.0.description,
            contribution: json.0.contribution,
            tools: json.0.tools.map(|tools| match tools {
                ToolsInput::Raw(raw) => ToolsField::Raw(raw),
                ToolsInput::List(list) => ToolsField::List(list),
            }),
            link: json.0.link,
            category_id,
        };
        match update_project(state.store.as_ref(), &id, update).await {
            Ok(Some(updated)) => ProjectUpdateResponses::Ok(Json(updated.into())),
            Ok(None) => ProjectUpdateResponses::NotFound(Json(NotFoundResponse::default())),
            Err(PortfolioError::Validation { field, message }) => {
                ProjectUpdateResponses::BadRequest(Json(BadRequestResponse {
                    message: format!("{field}: {message}"),
                }))
            }
            Err(err) => ProjectUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.project",
                    "update_project_api",
                    "update_project",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/project/:id",
        method = "delete",
        tag = "ApiProjectTags::Project"
    )]
    async fn delete_project_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProjectDeleteResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProjectDeleteResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.project",
                            "delete_project_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProjectDeleteResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let Ok(id) = Uuid::parse_str(&id) else {
            return ProjectDeleteResponses::NotFound(Json(NotFoundResponse::default()));
        };
        match get_project_by_id(state.store.as_ref(), &id).await {
            Ok(Some(found)) if found.owner_id == caller.id => {}
            Ok(_) => {
                return ProjectDeleteResponses::NotFound(Json(NotFoundResponse::default()));
            }
            Err(err) => {
                return ProjectDeleteResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.project",
                        "delete_project_api",
                        "get_project_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        }
        match delete_project(state.store.as_ref(), &id).await {
            Ok(()) => ProjectDeleteResponses::NoContent,
            Err(err) => ProjectDeleteResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.project",
                    "delete_project_api",
                    "delete_project",
                    &err.to_string(),
                ),
            )),
        }
    }
}
