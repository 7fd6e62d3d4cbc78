use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::categories::{CategoryDto, CategoryRequest},
    entity::categories::{ActiveModel, Column, Entity as Categories},
    error::{AppError, AppResult},
    response::Page,
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<Page<CategoryDto>> {
    let (page, per_page, offset) = pagination.normalize();

    let total = Categories::find().count(&state.orm).await? as i64;

    let content = Categories::find()
        .order_by_asc(Column::Id)
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CategoryDto::from)
        .collect();

    Ok(Page::new(content, page, per_page, total))
}

pub async fn get_category(state: &AppState, id: i64) -> AppResult<CategoryDto> {
    match Categories::find_by_id(id).one(&state.orm).await? {
        Some(category) => Ok(category.into()),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_category(state: &AppState, payload: CategoryRequest) -> AppResult<CategoryDto> {
    validate(&payload)?;

    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
    };
    let category = active.insert(&state.orm).await?;

    tracing::debug!(category_id = category.id, "category created");
    Ok(category.into())
}

pub async fn update_category(
    state: &AppState,
    id: i64,
    payload: CategoryRequest,
) -> AppResult<CategoryDto> {
    let existing = match Categories::find_by_id(id).one(&state.orm).await? {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    validate(&payload)?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    let category = active.update(&state.orm).await?;

    Ok(category.into())
}

/// Deleting a category that some product still references trips the join
/// table's foreign key, which `AppError` maps to 409.
pub async fn delete_category(state: &AppState, id: i64) -> AppResult<()> {
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::debug!(category_id = id, "category deleted");
    Ok(())
}

fn validate(payload: &CategoryRequest) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "name must not be blank".into(),
        ));
    }
    Ok(())
}
