pub mod categories;
pub mod product_categories;
pub mod products;

pub use categories::Entity as Categories;
pub use product_categories::Entity as ProductCategories;
pub use products::Entity as Products;
