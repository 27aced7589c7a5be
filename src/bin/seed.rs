use storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let owner_id = ensure_user(&pool, "Rosa Delgado", "rosa@example.com").await?;
    let patron_id = ensure_user(&pool, "Sam Porter", "sam@example.com").await?;
    seed_store(&pool, owner_id).await?;

    println!("Seed completed. Owner ID: {owner_id}, Patron ID: {patron_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, name: &str, email: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch the id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_store(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let store_id: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO stores (id, owner_id, name, description, location)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (owner_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind("Rosa's Taqueria")
    .bind("Street tacos and aguas frescas")
    .bind("Stall 12, Market Hall")
    .fetch_one(pool)
    .await?;

    // Re-running the seed rebuilds the item list.
    sqlx::query("DELETE FROM store_items WHERE store_id = $1")
        .bind(store_id.0)
        .execute(pool)
        .await?;

    let items = vec![
        ("Carnitas Taco", "Slow-braised pork, cilantro, onion", 450, 40),
        ("Baja Fish Taco", "Beer-battered cod, cabbage slaw", 550, 30),
        ("Horchata", "House-made, served over ice", 350, 60),
    ];

    for (title, desc, price, quantity) in items {
        sqlx::query(
            r#"
            INSERT INTO store_items (id, store_id, title, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(store_id.0)
        .bind(title)
        .bind(desc)
        .bind(price as i64)
        .bind(quantity)
        .execute(pool)
        .await?;
    }

    println!("Seeded store");
    Ok(())
}
