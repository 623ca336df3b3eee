use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};
use serde::{Deserialize, Serialize};

use crate::core::identity::{Identity, IdentityService};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserApiKey {
    pub token: Option<String>,
}

/// ApiKey authorization
#[derive(SecurityScheme)]
#[oai(ty = "bearer", checker = "bearer_checker")]
pub struct BearerAuthorization(pub UserApiKey);

pub async fn bearer_checker(_req: &Request, api_key: Bearer) -> Option<UserApiKey> {
    Some(UserApiKey {
        token: Some(api_key.token),
    })
}

/// Resolves the bearer token of a request to an identity, if the provider
/// still knows the session.
pub async fn get_identity_from_token(
    identity: &dyn IdentityService,
    token: Option<String>,
) -> anyhow::Result<Option<Identity>> {
    if token.is_none() {
        return Ok(None);
    }
    identity.current_user(token).await
}
