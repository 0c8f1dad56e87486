//! Schema bootstrap for the Postgres backend.
//!
//! Tables carry no foreign keys and no unique constraints. Cross-table
//! integrity and uniqueness are enforced by service pre-checks, so the
//! schema stays permissive and deletes never cascade on their own. The
//! indexes below only speed up the lookups the stores actually run.

use sqlx::PgPool;

use webstore_core::{DomainError, DomainResult};

const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sellers (
        seller_id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        status TEXT NOT NULL,
        joining_date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        category_id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS catalogues (
        catalogue_id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS catalogue_categories (
        catalogue_category_id UUID PRIMARY KEY,
        catalogue_id UUID NOT NULL,
        category_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        product_id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        image_url TEXT,
        stock INTEGER NOT NULL,
        catalogue_category_id UUID NOT NULL,
        seller_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS product_prices (
        price_id UUID PRIMARY KEY,
        product_id UUID NOT NULL,
        currency_id UUID NOT NULL,
        amount_minor BIGINT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS currencies (
        currency_id UUID PRIMARY KEY,
        code TEXT NOT NULL,
        symbol TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        user_id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        full_name TEXT,
        email TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        created_by TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        updated_by TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_sellers_email ON sellers (lower(email))",
    "CREATE INDEX IF NOT EXISTS idx_sellers_status ON sellers (status)",
    "CREATE INDEX IF NOT EXISTS idx_sellers_joining_date ON sellers (joining_date)",
    "CREATE INDEX IF NOT EXISTS idx_categories_name ON categories (lower(name))",
    "CREATE INDEX IF NOT EXISTS idx_catalogues_name ON catalogues (lower(name))",
    "CREATE INDEX IF NOT EXISTS idx_cc_catalogue ON catalogue_categories (catalogue_id)",
    "CREATE INDEX IF NOT EXISTS idx_cc_category ON catalogue_categories (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_seller ON products (seller_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_placement ON products (catalogue_category_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_name ON products (lower(name))",
    "CREATE INDEX IF NOT EXISTS idx_prices_product ON product_prices (product_id)",
    "CREATE INDEX IF NOT EXISTS idx_prices_currency ON product_prices (currency_id)",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users (lower(email))",
];

/// Creates every table and index the stores rely on, idempotently.
pub async fn ensure_schema(pool: &PgPool) -> DomainResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|err| DomainError::storage(err.to_string()))?;
    }
    tracing::debug!("database schema ensured");
    Ok(())
}
