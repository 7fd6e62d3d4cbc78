use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::categories::Model as CategoryModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<CategoryModel> for CategoryDto {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
}

/// A category reference inside a product body; only the id is meaningful,
/// the name (if sent) is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRef {
    pub id: i64,
}
