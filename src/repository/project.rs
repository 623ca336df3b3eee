use serde_json::json;
use uuid::Uuid;

use crate::core::error::PortfolioError;
use crate::core::store::DocumentStore;
use crate::model::{project, project::Project};
use crate::repository::category::get_category_by_id;

/// Splits a comma-separated tools input into a trimmed, ordered list.
/// Empty segments are dropped.
pub fn normalize_tools(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tools as they arrive from an edit: a raw comma-separated string is
/// normalized like at creation, an already-split list is stored as-is so an
/// untouched edit round-trips.
#[derive(Clone, Debug)]
pub enum ToolsField {
    Raw(String),
    List(Vec<String>),
}

impl ToolsField {
    pub fn into_list(self) -> Vec<String> {
        match self {
            ToolsField::Raw(raw) => normalize_tools(&raw),
            ToolsField::List(list) => list,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewProject {
    pub title: String,
    pub recruiter_name: String,
    pub description: String,
    pub contribution: String,
    /// Comma-separated input, normalized before storage.
    pub tools: String,
    pub link: String,
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub recruiter_name: Option<String>,
    pub description: Option<String>,
    pub contribution: Option<String>,
    pub tools: Option<ToolsField>,
    pub link: Option<String>,
    /// `Some(None)` clears the category assignment.
    pub category_id: Option<Option<Uuid>>,
}

async fn ensure_category_owner(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
    category_id: Option<&Uuid>,
) -> Result<(), PortfolioError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    match get_category_by_id(store, category_id).await? {
        Some(found) if found.owner_id == *owner_id => Ok(()),
        Some(_) => Err(PortfolioError::Validation {
            field: "category_id",
            message: "category belongs to a different owner".to_string(),
        }),
        None => Err(PortfolioError::Validation {
            field: "category_id",
            message: "category does not exist".to_string(),
        }),
    }
}

pub async fn create_project(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
    new: NewProject,
) -> Result<Project, PortfolioError> {
    ensure_category_owner(store, owner_id, new.category_id.as_ref()).await?;
    let tools = normalize_tools(&new.tools);
    let fields = json!({
        "title": new.title,
        "recruiter_name": new.recruiter_name,
        "description": new.description,
        "contribution": new.contribution,
        "tools": tools,
        "link": new.link,
        "owner_id": owner_id,
        "category_id": new.category_id,
    });
    let key = store.add(project::COLLECTION, fields).await?;
    Ok(Project {
        id: Uuid::parse_str(&key).map_err(anyhow::Error::new)?,
        title: new.title,
        recruiter_name: new.recruiter_name,
        description: new.description,
        contribution: new.contribution,
        tools,
        link: new.link,
        owner_id: *owner_id,
        category_id: new.category_id,
    })
}

pub async fn get_project_by_id(
    store: &dyn DocumentStore,
    id: &Uuid,
) -> anyhow::Result<Option<Project>> {
    match store.get_by_key(project::COLLECTION, &id.to_string()).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

pub async fn update_project(
    store: &dyn DocumentStore,
    id: &Uuid,
    update: ProjectUpdate,
) -> Result<Option<Project>, PortfolioError> {
    let Some(mut found) = get_project_by_id(store, id).await? else {
        return Ok(None);
    };
    if let Some(category_id) = update.category_id {
        ensure_category_owner(store, &found.owner_id, category_id.as_ref()).await?;
        found.category_id = category_id;
    }
    if let Some(title) = update.title {
        found.title = title;
    }
    if let Some(recruiter_name) = update.recruiter_name {
        found.recruiter_name = recruiter_name;
    }
    if let Some(description) = update.description {
        found.description = description;
    }
    if let Some(contribution) = update.contribution {
        found.contribution = contribution;
    }
    if let Some(tools) = update.tools {
        found.tools = tools.into_list();
    }
    if let Some(link) = update.link {
        found.link = link;
    }
    store
        .put(project::COLLECTION, &id.to_string(), found.to_fields(), false)
        .await?;
    Ok(Some(found))
}

pub async fn delete_project(store: &dyn DocumentStore, id: &Uuid) -> anyhow::Result<()> {
    store.delete(project::COLLECTION, &id.to_string()).await
}

pub async fn list_projects(
    store: &dyn DocumentStore,
    owner_id: &Uuid,
) -> anyhow::Result<Vec<Project>> {
    let docs = store
        .query_by_equality(project::COLLECTION, "owner_id", &json!(owner_id))
        .await?;
    docs.into_iter().map(|doc| doc.decode()).collect()
}
