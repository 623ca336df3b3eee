use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use uuid::Uuid;

use crate::{
    core::security::{get_identity_from_token, BearerAuthorization},
    repository::category::{
        create_category, delete_category_cascade, get_category_by_id, list_categories,
        update_category,
    },
    schema::{
        category::{
            CategoryAllResponses, CategoryCreateRequest, CategoryCreateResponses,
            CategoryDeleteResponses, CategoryResponse, CategoryUpdateRequest,
            CategoryUpdateResponses,
        },
        common::{InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse},
    },
    AppState,
};

#[derive(Tags)]
enum ApiCategoryTags {
    Category,
}

pub struct ApiCategory;

#[OpenApi]
impl ApiCategory {
    #[oai(path = "/category/", method = "get", tag = "ApiCategoryTags::Category")]
    async fn all_category_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CategoryAllResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return CategoryAllResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.category",
                            "all_category_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return CategoryAllResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        match list_categories(state.store.as_ref(), &caller.id).await {
            Ok(categories) => CategoryAllResponses::Ok(Json(
                categories.into_iter().map(CategoryResponse::from).collect(),
            )),
            Err(err) => CategoryAllResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.category",
                    "all_category_api",
                    "list_categories",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/category/", method = "post", tag = "ApiCategoryTags::Category")]
    async fn create_category_api(
        &self,
        json: Json<CategoryCreateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CategoryCreateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return CategoryCreateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.category",
                            "create_category_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return CategoryCreateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        match create_category(state.store.as_ref(), &caller.id, &json.name).await {
            Ok(created) => CategoryCreateResponses::Ok(Json(created.into())),
            Err(err) => CategoryCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.category",
                    "create_category_api",
                    "create_category",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/category/:id",
        method = "put",
        tag = "ApiCategoryTags::Category"
    )]
    async fn update_category_api(
        &self,
        Path(id): Path<String>,
        json: Json<CategoryUpdateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CategoryUpdateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return CategoryUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.category",
                            "update_category_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return CategoryUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let Ok(id) = Uuid::parse_str(&id) else {
            return CategoryUpdateResponses::NotFound(Json(NotFoundResponse::default()));
        };
        // A record that is missing or belongs to someone else reads the same.
        match get_category_by_id(state.store.as_ref(), &id).await {
            Ok(Some(found)) if found.owner_id == caller.id => {}
            Ok(_) => {
                return CategoryUpdateResponses::NotFound(Json(NotFoundResponse::default()));
            }
            Err(err) => {
                return CategoryUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.category",
                        "update_category_api",
                        "get_category_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        }
        match update_category(state.store.as_ref(), &id, &json.name).await {
            Ok(Some(updated)) => CategoryUpdateResponses::Ok(Json(updated.into())),
            Ok(None) => CategoryUpdateResponses::NotFound(Json(NotFoundResponse::default())),
            Err(err) => CategoryUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.category",
                    "update_category_api",
                    "update_category",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/category/:id",
        method = "delete",
        tag = "ApiCategoryTags::Category"
    )]
    async fn delete_category_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> CategoryDeleteResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return CategoryDeleteResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.category",
                            "delete_category_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return CategoryDeleteResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let Ok(id) = Uuid::parse_str(&id) else {
            return CategoryDeleteResponses::NotFound(Json(NotFoundResponse::default()));
        };
        match get_category_by_id(state.store.as_ref(), &id).await {
            Ok(Some(found)) if found.owner_id == caller.id => {}
            Ok(_) => {
                return CategoryDeleteResponses::NotFound(Json(NotFoundResponse::default()));
            }
            Err(err) => {
                return CategoryDeleteResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.category",
                        "delete_category_api",
                        "get_category_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        }
        match delete_category_cascade(state.store.as_ref(), &id).await {
            Ok(Some(_)) => CategoryDeleteResponses::NoContent,
            Ok(None) => CategoryDeleteResponses::NotFound(Json(NotFoundResponse::default())),
            Err(err) => CategoryDeleteResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.category",
                    "delete_category_api",
                    "delete_category_cascade",
                    &err.to_string(),
                ),
            )),
        }
    }
}
