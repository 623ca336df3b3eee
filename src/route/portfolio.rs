use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::{
    core::{
        error::{PortfolioError, TRANSIENT_USER_MESSAGE},
        mail::ContactMessage,
    },
    repository::portfolio::{load_portfolio, send_contact_message},
    schema::{
        common::{InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse},
        portfolio::{
            ContactRequest, ContactResponse, ContactResponses, PortfolioResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiPortfolioTags {
    Portfolio,
}

pub struct ApiPortfolio;

#[OpenApi]
impl ApiPortfolio {
    /// Public read access; no bearer token required.
    #[oai(
        path = "/portfolio/:username",
        method = "get",
        tag = "ApiPortfolioTags::Portfolio"
    )]
    async fn get_portfolio_api(
        &self,
        Path(username): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> PortfolioResponses {
        match load_portfolio(state.store.as_ref(), &username, state.retry).await {
            Ok(view) => PortfolioResponses::Ok(Json(view.into())),
            Err(PortfolioError::NotFound(_)) => PortfolioResponses::NotFound(Json(
                NotFoundResponse {
                    message: "Portfolio not found".to_string(),
                },
            )),
            Err(PortfolioError::Transient { .. }) => PortfolioResponses::ServiceUnavailable(
                Json(ServiceUnavailableResponse {
                    message: TRANSIENT_USER_MESSAGE.to_string(),
                }),
            ),
            Err(err) => PortfolioResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.portfolio",
                    "get_portfolio_api",
                    "load_portfolio",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(
        path = "/portfolio/:username/contact",
        method = "post",
        tag = "ApiPortfolioTags::Portfolio"
    )]
    async fn contact_api(
        &self,
        Path(username): Path<String>,
        json: Json<ContactRequest>,
        state: Data<&Arc<AppState>>,
    ) -> ContactResponses {
        let message = ContactMessage {
            sender_name: json.0.sender_name,
            sender_email: json.0.sender_email,
            body: json.0.message,
        };
        match send_contact_message(state.store.as_ref(), state.mail.as_ref(), &username, message)
            .await
        {
            Ok(()) => ContactResponses::Ok(Json(ContactResponse {
                message: "Message sent".to_string(),
            })),
            Err(PortfolioError::NotFound(_)) => ContactResponses::NotFound(Json(
                NotFoundResponse {
                    message: "Portfolio not found".to_string(),
                },
            )),
            Err(err) => ContactResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.portfolio",
                    "contact_api",
                    "send_contact_message",
                    &err.to_string(),
                ),
            )),
        }
    }
}
