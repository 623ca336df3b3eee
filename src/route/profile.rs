use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{
    payload::{Binary, Json},
    OpenApi, Tags,
};

use crate::{
    core::{
        assets::AssetStore,
        error::PortfolioError,
        security::{get_identity_from_token, BearerAuthorization},
    },
    model::profile::PictureTransform,
    repository::profile::{get_profile, put_profile, ProfileUpdate},
    schema::{
        common::{
            BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
            UnauthorizedResponse,
        },
        profile::{
            PictureTransformRequest, PictureUploadResponse, PictureUploadResponses,
            ProfileDetailResponses, ProfileUpdateRequest, ProfileUpdateResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiProfileTags {
    Profile,
}

pub struct ApiProfile;

#[OpenApi]
impl ApiProfile {
    #[oai(path = "/profile", method = "get", tag = "ApiProfileTags::Profile")]
    async fn get_profile_api(
        &self,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileDetailResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProfileDetailResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "get_profile_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProfileDetailResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        match get_profile(state.store.as_ref(), &caller.id).await {
            Ok(Some(found)) => ProfileDetailResponses::Ok(Json(found.into())),
            Ok(None) => ProfileDetailResponses::NotFound(Json(NotFoundResponse::default())),
            Err(err) => ProfileDetailResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "get_profile_api",
                    "get_profile",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/profile", method = "put", tag = "ApiProfileTags::Profile")]
    async fn update_profile_api(
        &self,
        json: Json<ProfileUpdateRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileUpdateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProfileUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "update_profile_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProfileUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let update = ProfileUpdate {
            username: json.0.username,
            title: json.0.title,
            bio: json.0.bio,
            ..ProfileUpdate::default()
        };
        match put_profile(state.store.as_ref(), &caller.id, update).await {
            Ok(updated) => ProfileUpdateResponses::Ok(Json(updated.into())),
            Err(PortfolioError::Validation { field, message }) => {
                ProfileUpdateResponses::BadRequest(Json(BadRequestResponse {
                    message: format!("{field}: {message}"),
                }))
            }
            Err(PortfolioError::NotFound(_)) => {
                ProfileUpdateResponses::NotFound(Json(NotFoundResponse::default()))
            }
            Err(err) => ProfileUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "update_profile_api",
                    "put_profile",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/profile/picture-transform",
        method = "put",
        tag = "ApiProfileTags::Profile"
    )]
    async fn update_picture_transform_api(
        &self,
        json: Json<PictureTransformRequest>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> ProfileUpdateResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return ProfileUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "update_picture_transform_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return ProfileUpdateResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };
        let update = ProfileUpdate {
            picture: Some(PictureTransform {
                scale: json.0.scale,
                offset_x: json.0.offset_x,
                offset_y: json.0.offset_y,
            }),
            ..ProfileUpdate::default()
        };
        match put_profile(state.store.as_ref(), &caller.id, update).await {
            Ok(updated) => ProfileUpdateResponses::Ok(Json(updated.into())),
            Err(PortfolioError::Validation { field, message }) => {
                ProfileUpdateResponses::BadRequest(Json(BadRequestResponse {
                    message: format!("{field}: {message}"),
                }))
            }
            Err(PortfolioError::NotFound(_)) => {
                ProfileUpdateResponses::NotFound(Json(NotFoundResponse::default()))
            }
            Err(err) => ProfileUpdateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "update_picture_transform_api",
                    "put_profile",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/profile/picture",
        method = "put",
        tag = "ApiProfileTags::Profile"
    )]
    async fn upload_picture_api(
        &self,
        body: Binary<Vec<u8>>,
        state: Data<&Arc<AppState>>,
        auth: BearerAuthorization,
    ) -> PictureUploadResponses {
        let caller =
            match get_identity_from_token(state.identity.as_ref(), auth.0.token.clone()).await {
                Ok(val) => val,
                Err(err) => {
                    return PictureUploadResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.profile",
                            "upload_picture_api",
                            "resolve identity",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        let Some(caller) = caller else {
            return PictureUploadResponses::Unauthorized(Json(UnauthorizedResponse::default()));
        };

        let asset_ref = match state
            .assets
            .upload(&format!("pfp/{}", caller.id), body.0)
            .await
        {
            Ok(val) => val,
            Err(err) => {
                return PictureUploadResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "upload_picture_api",
                        "upload bytes",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let picture_url = match state.assets.get_url(&asset_ref).await {
            Ok(val) => val,
            Err(err) => {
                return PictureUploadResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.profile",
                        "upload_picture_api",
                        "resolve url",
                        &err.to_string(),
                    ),
                ))
            }
        };

        let update = ProfileUpdate {
            picture_url: Some(picture_url.clone()),
            ..ProfileUpdate::default()
        };
        match put_profile(state.store.as_ref(), &caller.id, update).await {
            Ok(_) => PictureUploadResponses::Ok(Json(PictureUploadResponse { picture_url })),
            Err(PortfolioError::NotFound(_)) => {
                PictureUploadResponses::NotFound(Json(NotFoundResponse::default()))
            }
            Err(err) => PictureUploadResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.profile",
                    "upload_picture_api",
                    "put_profile",
                    &err.to_string(),
                ),
            )),
        }
    }
}
