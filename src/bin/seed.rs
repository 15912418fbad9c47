use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_catalog_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin", "admin12345", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user", "user12345", "user").await?;

    let category_id = ensure_category(&pool, "Electronics", "electronics").await?;
    seed_catalog(&pool, category_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, username, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

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

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    sqlx::query(
        r#"
        INSERT INTO categories (id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .execute(pool)
    .await?;

    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("Ferris Laptop 14", "Lightweight laptop for Rustaceans", 1_250_000_i64, 25_i32),
        ("Crab Phone X", "A phone with claws", 850_000, 60),
        ("Borrow Checker Watch", "Never lose ownership of your time", 320_000, 120),
        ("Async Headphones", "Non-blocking sound", 210_000, 80),
    ];

    for (name, desc, price, stock) in products {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let product_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO products (id, category_id, name, description, price, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product_id)
        .bind(category_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO product_images (id, product_id, image_path)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(format!("product_images/{}.jpg", name.to_lowercase().replace(' ', "-")))
        .execute(pool)
        .await?;
    }

    // One live 20% deal on the first product, 24h window.
    let (product_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM products ORDER BY created_at LIMIT 1")
            .fetch_one(pool)
            .await?;
    let has_deal: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM deals WHERE product_id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    if has_deal.is_none() {
        sqlx::query(
            r#"
            INSERT INTO deals (id, product_id, discount_percent, duration_secs)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(20.0_f64)
        .bind(86_400_i64)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
