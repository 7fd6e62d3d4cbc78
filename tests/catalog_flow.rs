use axum_catalog_api::{
    db::{create_orm_conn, run_migrations},
    dto::categories::{CategoryRef, CategoryRequest},
    dto::products::ProductRequest,
    error::AppError,
    routes::params::Pagination,
    services::{category_service, product_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

fn product_request(name: &str, categories: Vec<CategoryRef>) -> ProductRequest {
    ProductRequest {
        name: name.to_string(),
        description: "Good Phone".to_string(),
        price: 800.0,
        image_url: "https://img.example.com/phone.png".to_string(),
        date: None,
        categories,
    }
}

// Full catalog CRUD flow: create a category and a product referencing it,
// read both back, update, then exercise the delete failure modes.
#[tokio::test]
async fn catalog_crud_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let category = category_service::create_category(
        &state,
        CategoryRequest {
            name: "Electronics".into(),
        },
    )
    .await?;
    assert!(category.id > 0);

    // Insert assigns a fresh id and echoes the referenced category back.
    let created = product_service::create_product(
        &state,
        product_request("Phone", vec![CategoryRef { id: category.id }]),
    )
    .await?;
    assert!(created.id > 0);
    assert_eq!(created.categories.len(), 1);
    assert_eq!(created.categories[0].id, category.id);
    assert_eq!(created.categories[0].name, "Electronics");

    // A second insert gets a strictly larger id.
    let second = product_service::create_product(&state, product_request("Tablet", vec![])).await?;
    assert!(second.id > created.id);

    // GET by id returns the identical representation.
    let fetched = product_service::get_product(&state, created.id).await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.price, created.price);
    assert_eq!(fetched.categories, created.categories);

    // Paged listing reports both rows.
    let page = product_service::list_products(
        &state,
        Pagination {
            page: Some(1),
            per_page: Some(10),
        },
    )
    .await?;
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.content[0].id, created.id);

    // Unknown ids surface as the typed not-found error, not a store error.
    let err = product_service::get_product(&state, 100_000).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = product_service::update_product(&state, 100_000, product_request("X", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = product_service::delete_product(&state, 100_000).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Update overwrites the scalar fields and replaces the category set.
    let mut update = product_request("Phone Pro", vec![]);
    update.price = 950.0;
    let updated = product_service::update_product(&state, created.id, update).await?;
    assert_eq!(updated.name, "Phone Pro");
    assert_eq!(updated.price, 950.0);
    assert!(updated.categories.is_empty());
    // An omitted date on update keeps the stored instant.
    assert_eq!(updated.date, created.date);

    // Validation failures come back as 422-kind errors before any write.
    let err = product_service::create_product(&state, product_request("   ", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnprocessableEntity(_)));

    let err = category_service::create_category(&state, CategoryRequest { name: "".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnprocessableEntity(_)));

    // Referencing a category that does not exist is rejected up front.
    let err = product_service::create_product(
        &state,
        product_request("Ghost", vec![CategoryRef { id: 99_999 }]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UnprocessableEntity(_)));

    // Re-attach the category, then deleting it must conflict while referenced.
    product_service::update_product(
        &state,
        created.id,
        product_request("Phone Pro", vec![CategoryRef { id: category.id }]),
    )
    .await?;
    let err = category_service::delete_category(&state, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict));

    // Deleting the product removes it together with its association rows.
    product_service::delete_product(&state, created.id).await?;
    let err = product_service::get_product(&state, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // With the reference gone the category delete goes through.
    category_service::delete_category(&state, category.id).await?;
    let err = category_service::get_category(&state, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE product_category, product, category RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { orm })
}
