use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use crate::core::error::PortfolioError;
use crate::core::mail::{ContactMessage, MailRelay};
use crate::core::store::DocumentStore;
use crate::model::category::Category;
use crate::model::profile::Profile;
use crate::model::project::Project;
use crate::model::username_lookup::{self, UsernameLookup};
use crate::repository::{category, profile, project};
use crate::settings::Config;

/// Retry bounds for the public profile fetch. Applies to the
/// username-lookup/profile stage only; attempts are sequential with a fixed
/// delay in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        let default = Self::default();
        Self {
            max_attempts: config.fetch_retry_attempts.unwrap_or(default.max_attempts),
            delay: config
                .fetch_retry_delay_secs
                .map(Duration::from_secs)
                .unwrap_or(default.delay),
        }
    }
}

/// A public portfolio, ready for display.
///
/// `projects` and `categories` are `None` when their fetch failed; the rest
/// of the page still renders.
#[derive(Clone, Debug)]
pub struct PortfolioView {
    pub profile: Profile,
    pub projects: Option<Vec<Project>>,
    pub categories: Option<Vec<Category>>,
    pub expanded_category: Option<Uuid>,
}

/// Loads the public portfolio for a username.
///
/// The lookup/profile stage is retried on failure up to the policy bound;
/// an empty lookup or a missing profile is a definitive `NotFound` and ends
/// the pipeline immediately. Once the profile is in hand, projects and
/// categories are fetched concurrently; either failing only degrades the
/// view. The first category in returned order starts out expanded.
pub async fn load_portfolio(
    store: &dyn DocumentStore,
    username: &str,
    retry: RetryPolicy,
) -> Result<PortfolioView, PortfolioError> {
    let mut attempt = 0u32;
    let found = loop {
        attempt += 1;
        match lookup_profile(store, username).await {
            Ok(Some(found)) => break found,
            Ok(None) => return Err(PortfolioError::NotFound("portfolio")),
            Err(cause) if attempt < retry.max_attempts => {
                tracing::warn!(
                    username,
                    attempt,
                    error = %cause,
                    "portfolio fetch failed, retrying"
                );
                tokio::time::sleep(retry.delay).await;
            }
            Err(cause) => {
                tracing::error!(username, attempts = attempt, error = %cause, "portfolio fetch gave up");
                return Err(PortfolioError::Transient {
                    attempts: attempt,
                    cause,
                });
            }
        }
    };

    let (projects, categories) = tokio::join!(
        project::list_projects(store, &found.id),
        category::list_categories(store, &found.id),
    );
    let projects = match projects {
        Ok(projects) => Some(projects),
        Err(err) => {
            tracing::warn!(owner = %found.id, error = %err, "projects fetch failed, showing without");
            None
        }
    };
    let categories = match categories {
        Ok(categories) => Some(categories),
        Err(err) => {
            tracing::warn!(owner = %found.id, error = %err, "categories fetch failed, showing without");
            None
        }
    };
    let expanded_category = categories
        .as_ref()
        .and_then(|list| list.first())
        .map(|first| first.id);

    Ok(PortfolioView {
        profile: found,
        projects,
        categories,
        expanded_category,
    })
}

/// Resolves a username to its profile. `None` means the name is unknown or
/// the profile record is gone; exactly one lookup match is expected.
async fn lookup_profile(
    store: &dyn DocumentStore,
    username: &str,
) -> anyhow::Result<Option<Profile>> {
    let matches = store
        .query_by_equality(username_lookup::COLLECTION, "username", &json!(username))
        .await?;
    let Some(doc) = matches.into_iter().next() else {
        return Ok(None);
    };
    let lookup: UsernameLookup = doc.decode()?;
    profile::get_profile(store, &lookup.owner_id).await
}

/// Relays a visitor message to the portfolio owner. One attempt, no retry;
/// the outcome is reported back to the visitor as a notification.
pub async fn send_contact_message(
    store: &dyn DocumentStore,
    mail: &dyn MailRelay,
    username: &str,
    message: ContactMessage,
) -> Result<(), PortfolioError> {
    let Some(owner) = lookup_profile(store, username).await? else {
        return Err(PortfolioError::NotFound("portfolio"));
    };
    mail.send(&owner.email, &message).await?;
    tracing::info!(username, "contact message dispatched");
    Ok(())
}
