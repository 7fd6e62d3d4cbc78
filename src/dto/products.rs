use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::categories::{CategoryDto, CategoryRef};
use crate::entity::{categories::Model as CategoryModel, products::Model as ProductModel};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<CategoryDto>,
}

impl ProductDto {
    pub fn from_model(model: ProductModel, categories: Vec<CategoryModel>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            date: model.date.with_timezone(&Utc),
            categories: categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

/// Body accepted by POST and PUT. The scalar fields are written wholesale
/// onto the entity; the category list replaces the association.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    /// On create an omitted date defaults to the current instant; on update
    /// it leaves the stored value untouched.
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}
