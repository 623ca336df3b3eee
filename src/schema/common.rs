use poem_openapi::Object;
use serde::{Deserialize, Serialize};

#[derive(Object, Deserialize, Serialize)]
pub struct InternalServerErrorResponse {
    pub module: String,
    pub function: String,
    pub step: String,
    pub error: String,
}

impl InternalServerErrorResponse {
    pub fn new(module: &str, function: &str, step: &str, error: &str) -> Self {
        Self {
            module: module.to_string(),
            function: function.to_string(),
            step: step.to_string(),
            error: error.to_string(),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct BadRequestResponse {
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct NotFoundResponse {
    pub message: String,
}

impl Default for NotFoundResponse {
    fn default() -> Self {
        Self {
            message: "Data not found".to_string(),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct UnauthorizedResponse {
    pub message: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            message: "Unauthorized".to_string(),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct ServiceUnavailableResponse {
    pub message: String,
}
