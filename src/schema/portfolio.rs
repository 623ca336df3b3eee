use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::core::markup::render_markup;
use crate::core::utils::datetime_to_string_opt;
use crate::model::category::Category;
use crate::model::profile::Profile;
use crate::model::project::Project;
use crate::repository::portfolio::PortfolioView;

use super::common::{
    InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
};

#[derive(Object, Deserialize, Serialize)]
pub struct PortfolioPictureResponse {
    pub url: String,
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Object, Deserialize, Serialize)]
pub struct PortfolioProfileResponse {
    pub username: String,
    pub title: String,
    pub bio: String,
    pub bio_html: String,
    pub picture: PortfolioPictureResponse,
    pub created_date: Option<String>,
}

impl From<Profile> for PortfolioProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            bio_html: render_markup(&profile.bio),
            username: profile.username,
            title: profile.title,
            bio: profile.bio,
            picture: PortfolioPictureResponse {
                url: profile.picture_url,
                scale: profile.picture_scale,
                offset_x: profile.picture_offset_x,
                offset_y: profile.picture_offset_y,
            },
            created_date: datetime_to_string_opt(profile.created_date),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct PortfolioProjectResponse {
    pub id: String,
    pub title: String,
    pub recruiter_name: String,
    pub description: String,
    pub description_html: String,
    pub contribution: String,
    pub contribution_html: String,
    pub tools: Vec<String>,
    pub link: String,
    pub category_id: Option<String>,
}

impl From<Project> for PortfolioProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            title: project.title,
            recruiter_name: project.recruiter_name,
            description_html: render_markup(&project.description),
            description: project.description,
            contribution_html: render_markup(&project.contribution),
            contribution: project.contribution,
            tools: project.tools,
            link: project.link,
            category_id: project.category_id.map(|id| id.to_string()),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct PortfolioCategoryResponse {
    pub id: String,
    pub name: String,
}

impl From<Category> for PortfolioCategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct PortfolioResponse {
    pub profile: PortfolioProfileResponse,
    /// Absent when the projects fetch failed; the page still renders.
    pub projects: Option<Vec<PortfolioProjectResponse>>,
    /// Absent when the categories fetch failed.
    pub categories: Option<Vec<PortfolioCategoryResponse>>,
    pub expanded_category: Option<String>,
}

impl From<PortfolioView> for PortfolioResponse {
    fn from(view: PortfolioView) -> Self {
        Self {
            profile: view.profile.into(),
            projects: view
                .projects
                .map(|projects| projects.into_iter().map(Into::into).collect()),
            categories: view
                .categories
                .map(|categories| categories.into_iter().map(Into::into).collect()),
            expanded_category: view.expanded_category.map(|id| id.to_string()),
        }
    }
}

#[derive(ApiResponse)]
pub enum PortfolioResponses {
    #[oai(status = 200)]
    Ok(Json<PortfolioResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 503)]
    ServiceUnavailable(Json<ServiceUnavailableResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct ContactRequest {
    pub sender_name: String,
    pub sender_email: String,
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

#[derive(ApiResponse)]
pub enum ContactResponses {
    #[oai(status = 200)]
    Ok(Json<ContactResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
