use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRequest {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryIdQuery {
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryNameQuery {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryData {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.to_string(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

fn parse_id(id: &str) -> Result<CategoryId, ApiError> {
    CategoryId::from_string(id).map_err(|e| ApiError::from(CategoryError::from(e)))
}

fn parse_name(name: String) -> Result<CategoryName, ApiError> {
    CategoryName::new(name).map_err(|e| ApiError::from(CategoryError::from(e)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    state
        .category_service
        .create_category(parse_name(body.name)?)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::CREATED, category.into()))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<CategoryData>>, ApiError> {
    state
        .category_service
        .list_categories()
        .await
        .map_err(ApiError::from)
        .map(|categories| {
            ApiSuccess::new(
                StatusCode::OK,
                categories.iter().map(CategoryData::from).collect(),
            )
        })
}

pub async fn get_category_by_id(
    State(state): State<AppState>,
    Query(query): Query<CategoryIdQuery>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    state
        .category_service
        .get_category(&parse_id(&query.id)?)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}

pub async fn get_category_by_name(
    State(state): State<AppState>,
    Query(query): Query<CategoryNameQuery>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    state
        .category_service
        .get_category_by_name(&parse_name(query.name)?)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryRequest>,
) -> Result<ApiSuccess<CategoryData>, ApiError> {
    let id = parse_id(&id)?;
    let name = parse_name(body.name)?;

    state
        .category_service
        .rename_category(&id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref category| ApiSuccess::new(StatusCode::OK, category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .category_service
        .delete_category(&parse_id(&id)?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Category is successfully deleted")))
}
