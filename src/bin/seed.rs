use axum_catalog_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Products, categories::ActiveModel as CategoryActive,
        product_categories::ActiveModel as JoinActive, products::ActiveModel as ProductActive,
    },
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

const DESCRIPTION: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    if Products::find().count(&orm).await? > 0 {
        println!("Catalog already seeded, nothing to do");
        return Ok(());
    }

    let mut category_ids = Vec::new();
    for name in ["Books", "Electronics", "Computers"] {
        let category = CategoryActive {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&orm)
        .await?;
        category_ids.push(category.id);
    }

    // (name, price, index into category_ids)
    let mut products: Vec<(String, f64, usize)> = vec![
        ("The Lord of the Rings".into(), 90.5, 0),
        ("Rails for Dummies".into(), 100.99, 0),
        ("Smart TV".into(), 2190.0, 1),
        ("Macbook Pro".into(), 1250.0, 2),
        ("PC Gamer".into(), 1200.0, 2),
    ];
    for (i, suffix) in [
        "Ex", "X", "Alfa", "Tera", "Y", "Nitro", "Card", "Plus", "Hera", "Weed", "Max", "Turbo",
        "Hot", "Ez", "Tr", "Tx", "Er", "Min", "Boo", "Foo",
    ]
    .iter()
    .enumerate()
    {
        products.push((format!("PC Gamer {suffix}"), 1200.0 + 50.0 * i as f64, 2));
    }

    for (name, price, category_idx) in products {
        let slug = name.to_lowercase().replace(' ', "-");
        let product = ProductActive {
            id: NotSet,
            name: Set(name),
            description: Set(DESCRIPTION.to_string()),
            price: Set(price),
            image_url: Set(format!("https://img.example.com/{slug}.jpg")),
            date: NotSet,
        }
        .insert(&orm)
        .await?;

        JoinActive {
            product_id: Set(product.id),
            category_id: Set(category_ids[category_idx]),
        }
        .insert(&orm)
        .await?;
    }

    println!("Seeded {} categories and 25 products", category_ids.len());
    Ok(())
}
