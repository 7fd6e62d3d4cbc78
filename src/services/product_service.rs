use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::categories::CategoryRef,
    dto::products::{ProductDto, ProductRequest},
    entity::Categories,
    entity::categories::{Column as CategoryColumn, Model as CategoryModel},
    entity::product_categories::{
        ActiveModel as JoinActive, Column as JoinColumn, Entity as ProductCategories,
    },
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    response::Page,
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_products(state: &AppState, pagination: Pagination) -> AppResult<Page<ProductDto>> {
    let (page, per_page, offset) = pagination.normalize();

    let total = Products::find().count(&state.orm).await? as i64;

    let products = Products::find()
        .order_by_asc(Column::Id)
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let categories = products
        .load_many_to_many(Categories, ProductCategories, &state.orm)
        .await?;

    let content = products
        .into_iter()
        .zip(categories)
        .map(|(product, cats)| ProductDto::from_model(product, cats))
        .collect();

    Ok(Page::new(content, page, per_page, total))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ProductDto> {
    let product = match Products::find_by_id(id).one(&state.orm).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let categories = product
        .find_related(Categories)
        .all(&state.orm)
        .await?;

    Ok(ProductDto::from_model(product, categories))
}

pub async fn create_product(state: &AppState, payload: ProductRequest) -> AppResult<ProductDto> {
    validate(&payload)?;

    let txn = state.orm.begin().await?;
    let categories = resolve_categories(&txn, &payload.categories).await?;

    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        date: Set(payload.date.unwrap_or_else(Utc::now).fixed_offset()),
    };
    let product = active.insert(&txn).await?;

    insert_join_rows(&txn, product.id, &categories).await?;
    txn.commit().await?;

    tracing::debug!(product_id = product.id, "product created");
    Ok(ProductDto::from_model(product, categories))
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: ProductRequest,
) -> AppResult<ProductDto> {
    // Fetch first so an unknown id fails before anything is written.
    let existing = match Products::find_by_id(id).one(&state.orm).await? {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    validate(&payload)?;

    let txn = state.orm.begin().await?;
    let categories = resolve_categories(&txn, &payload.categories).await?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    active.price = Set(payload.price);
    active.image_url = Set(payload.image_url);
    if let Some(date) = payload.date {
        active.date = Set(date.fixed_offset());
    }
    let product = active.update(&txn).await?;

    // Replace the association wholesale.
    ProductCategories::delete_many()
        .filter(JoinColumn::ProductId.eq(id))
        .exec(&txn)
        .await?;
    insert_join_rows(&txn, product.id, &categories).await?;

    txn.commit().await?;

    Ok(ProductDto::from_model(product, categories))
}

pub async fn delete_product(state: &AppState, id: i64) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    // The product owns its join rows, so they go with it.
    ProductCategories::delete_many()
        .filter(JoinColumn::ProductId.eq(id))
        .exec(&txn)
        .await?;

    let result = Products::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    txn.commit().await?;
    tracing::debug!(product_id = id, "product deleted");
    Ok(())
}

fn validate(payload: &ProductRequest) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "name must not be blank".into(),
        ));
    }
    if payload.price < 0.0 {
        return Err(AppError::UnprocessableEntity(
            "price must not be negative".into(),
        ));
    }
    Ok(())
}

/// Loads the referenced categories, rejecting the request when any id does
/// not exist. Duplicate references collapse to one. Runs on the write
/// transaction so the lookup and the join-row insert see the same categories.
async fn resolve_categories<C: ConnectionTrait>(
    conn: &C,
    refs: &[CategoryRef],
) -> AppResult<Vec<CategoryModel>> {
    let ids: BTreeSet<i64> = refs.iter().map(|c| c.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found = Categories::find()
        .filter(CategoryColumn::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;

    if found.len() != ids.len() {
        let known: BTreeSet<i64> = found.iter().map(|c| c.id).collect();
        let missing: Vec<String> = ids.difference(&known).map(|id| id.to_string()).collect();
        return Err(AppError::UnprocessableEntity(format!(
            "unknown category id(s): {}",
            missing.join(", ")
        )));
    }

    Ok(found)
}

async fn insert_join_rows<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    categories: &[CategoryModel],
) -> AppResult<()> {
    if categories.is_empty() {
        return Ok(());
    }
    let rows = categories.iter().map(|category| JoinActive {
        product_id: Set(product_id),
        category_id: Set(category.id),
    });
    ProductCategories::insert_many(rows).exec(conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use crate::dto::products::ProductDto;
    use crate::entity::{categories, products};

    fn sample_product() -> products::Model {
        products::Model {
            id: 1,
            name: "Phone".into(),
            description: "Good Phone".into(),
            price: 800.0,
            image_url: "https://img.example.com/phone.png".into(),
            date: DateTime::parse_from_rfc3339("2020-10-20T03:00:00Z").unwrap(),
        }
    }

    #[test]
    fn dto_carries_scalar_fields_and_categories() {
        let category = categories::Model {
            id: 1,
            name: "Tv".into(),
        };

        let dto = ProductDto::from_model(sample_product(), vec![category]);

        assert_eq!(dto.id, 1);
        assert_eq!(dto.name, "Phone");
        assert_eq!(dto.price, 800.0);
        assert_eq!(dto.date.to_rfc3339(), "2020-10-20T03:00:00+00:00");
        assert_eq!(dto.categories.len(), 1);
        assert_eq!(dto.categories[0].name, "Tv");
    }

    #[test]
    fn dto_serializes_with_camel_case_wire_fields() {
        let dto = ProductDto::from_model(sample_product(), vec![]);
        let json = serde_json::to_value(&dto).unwrap();

        assert!(json.get("imageUrl").is_some());
        assert!(json.get("image_url").is_none());
        assert_eq!(json["categories"], serde_json::json!([]));
    }
}
