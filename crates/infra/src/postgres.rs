//! Postgres backend implementing every store port via sqlx.
//!
//! No foreign keys are declared (see [`crate::schema`]); whatever
//! referential soundness the API guarantees comes from service pre-checks.
//! Queries order by primary key, which is creation order for time-ordered
//! ids, matching the in-memory backend row for row.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use webstore_catalog::model::{
    AdminUser, AssociationDetail, Catalogue, CatalogueCategory, CatalogueRef, Category, Currency,
    PriceDetail, Product, ProductPlacement, ProductPrice, Seller, SellerStatus,
};
use webstore_catalog::store::{
    AdminUserStore, CatalogueCategoryStore, CatalogueStore, CategoryStore, CurrencyStore,
    ProductPriceStore, ProductStore, SellerStore,
};
use webstore_core::{
    AuditStamp, CatalogueCategoryId, CatalogueId, CategoryId, CurrencyId, DomainError,
    DomainResult, PageRequest, PriceId, ProductId, SellerId, UserId,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_err(err: sqlx::Error) -> DomainError {
    DomainError::storage(err.to_string())
}

fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}

fn audit_from_row(row: &PgRow) -> Result<AuditStamp, sqlx::Error> {
    Ok(AuditStamp {
        created_at: row.try_get("created_at")?,
        created_by: row.try_get("created_by")?,
        updated_at: row.try_get("updated_at")?,
        updated_by: row.try_get("updated_by")?,
    })
}

fn seller_from_row(row: &PgRow) -> Result<Seller, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Seller {
        id: SellerId::from_uuid(row.try_get("seller_id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status: status
            .parse::<SellerStatus>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
        joining_date: row.try_get("joining_date")?,
        audit: audit_from_row(row)?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get("category_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        audit: audit_from_row(row)?,
    })
}

fn catalogue_from_row(row: &PgRow) -> Result<Catalogue, sqlx::Error> {
    Ok(Catalogue {
        id: CatalogueId::from_uuid(row.try_get("catalogue_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        audit: audit_from_row(row)?,
    })
}

fn association_from_row(row: &PgRow) -> Result<CatalogueCategory, sqlx::Error> {
    Ok(CatalogueCategory {
        id: CatalogueCategoryId::from_uuid(row.try_get("catalogue_category_id")?),
        catalogue_id: CatalogueId::from_uuid(row.try_get("catalogue_id")?),
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        audit: audit_from_row(row)?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("product_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        stock: row.try_get("stock")?,
        catalogue_category_id: CatalogueCategoryId::from_uuid(
            row.try_get("catalogue_category_id")?,
        ),
        seller_id: SellerId::from_uuid(row.try_get("seller_id")?),
        audit: audit_from_row(row)?,
    })
}

fn price_from_row(row: &PgRow) -> Result<ProductPrice, sqlx::Error> {
    Ok(ProductPrice {
        id: PriceId::from_uuid(row.try_get("price_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        currency_id: CurrencyId::from_uuid(row.try_get("currency_id")?),
        amount_minor: row.try_get("amount_minor")?,
        audit: audit_from_row(row)?,
    })
}

fn currency_from_row(row: &PgRow) -> Result<Currency, sqlx::Error> {
    Ok(Currency {
        id: CurrencyId::from_uuid(row.try_get("currency_id")?),
        code: row.try_get("code")?,
        symbol: row.try_get("symbol")?,
        audit: audit_from_row(row)?,
    })
}

fn admin_user_from_row(row: &PgRow) -> Result<AdminUser, sqlx::Error> {
    Ok(AdminUser {
        id: UserId::from_uuid(row.try_get("user_id")?),
        username: row.try_get("username")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        role: row.try_get("role")?,
        audit: audit_from_row(row)?,
    })
}

fn price_detail_from_row(row: &PgRow) -> Result<PriceDetail, sqlx::Error> {
    Ok(PriceDetail {
        price_id: PriceId::from_uuid(row.try_get("price_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        product_name: row.try_get("product_name")?,
        currency_id: CurrencyId::from_uuid(row.try_get("currency_id")?),
        currency_code: row.try_get("currency_code")?,
        currency_symbol: row.try_get("currency_symbol")?,
        amount_minor: row.try_get("amount_minor")?,
    })
}

fn association_detail_from_row(row: &PgRow) -> Result<AssociationDetail, sqlx::Error> {
    Ok(AssociationDetail {
        id: CatalogueCategoryId::from_uuid(row.try_get("catalogue_category_id")?),
        catalogue_id: CatalogueId::from_uuid(row.try_get("catalogue_id")?),
        catalogue_name: row.try_get("catalogue_name")?,
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        category_name: row.try_get("category_name")?,
        audit: audit_from_row(row)?,
    })
}

fn collect<T>(
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> DomainResult<Vec<T>> {
    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_err)
}

const PRICE_DETAIL_SELECT: &str = "SELECT pp.price_id, pp.product_id, p.name AS product_name, \
     pp.currency_id, cur.code AS currency_code, cur.symbol AS currency_symbol, pp.amount_minor \
     FROM product_prices pp \
     JOIN products p ON p.product_id = pp.product_id \
     JOIN currencies cur ON cur.currency_id = pp.currency_id";

const ASSOCIATION_DETAIL_SELECT: &str =
    "SELECT cc.catalogue_category_id, cc.catalogue_id, cat.name AS catalogue_name, \
     cc.category_id, c.name AS category_name, \
     cc.created_at, cc.created_by, cc.updated_at, cc.updated_by \
     FROM catalogue_categories cc \
     JOIN catalogues cat ON cat.catalogue_id = cc.catalogue_id \
     JOIN categories c ON c.category_id = cc.category_id";

#[async_trait]
impl SellerStore for PgStore {
    async fn insert(&self, seller: &Seller) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO sellers (seller_id, name, email, status, joining_date, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(seller.id.as_uuid())
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(seller.status.as_str())
        .bind(seller.joining_date)
        .bind(seller.audit.created_at)
        .bind(&seller.audit.created_by)
        .bind(seller.audit.updated_at)
        .bind(&seller.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> DomainResult<()> {
        sqlx::query(
            "UPDATE sellers SET name = $2, email = $3, status = $4, joining_date = $5, \
             updated_at = $6, updated_by = $7 WHERE seller_id = $1",
        )
        .bind(seller.id.as_uuid())
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(seller.status.as_str())
        .bind(seller.joining_date)
        .bind(seller.audit.updated_at)
        .bind(&seller.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: SellerId) -> DomainResult<Option<Seller>> {
        let row = sqlx::query("SELECT * FROM sellers WHERE seller_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(seller_from_row).transpose().map_err(db_err)
    }

    async fn delete(&self, id: SellerId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM sellers WHERE seller_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Seller>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query("SELECT * FROM sellers ORDER BY seller_id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, seller_from_row)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Seller>> {
        let row = sqlx::query("SELECT * FROM sellers WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(seller_from_row).transpose().map_err(db_err)
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM sellers WHERE lower(email) = lower($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }

    async fn search(&self, keyword: &str) -> DomainResult<Vec<Seller>> {
        let rows = sqlx::query(
            "SELECT * FROM sellers WHERE name ILIKE $1 OR email ILIKE $1 ORDER BY seller_id",
        )
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, seller_from_row)
    }

    async fn list_by_status(&self, status: SellerStatus) -> DomainResult<Vec<Seller>> {
        let rows = sqlx::query("SELECT * FROM sellers WHERE status = $1 ORDER BY seller_id")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, seller_from_row)
    }

    async fn list_joined_after(&self, date: NaiveDate) -> DomainResult<Vec<Seller>> {
        let rows = sqlx::query("SELECT * FROM sellers WHERE joining_date > $1 ORDER BY seller_id")
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, seller_from_row)
    }

    async fn list_joined_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Seller>> {
        let rows = sqlx::query(
            "SELECT * FROM sellers WHERE joining_date BETWEEN $1 AND $2 ORDER BY seller_id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, seller_from_row)
    }

    async fn count_by_status(&self, status: SellerStatus) -> DomainResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) FROM sellers WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        let count: i64 = row.try_get(0).map_err(db_err)?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn insert(&self, category: &Category) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO categories (category_id, name, description, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.audit.created_at)
        .bind(&category.audit.created_by)
        .bind(category.audit.updated_at)
        .bind(&category.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> DomainResult<()> {
        sqlx::query(
            "UPDATE categories SET name = $2, description = $3, updated_at = $4, updated_by = $5 \
             WHERE category_id = $1",
        )
        .bind(category.id.as_uuid())
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.audit.updated_at)
        .bind(&category.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE category_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(category_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Category>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query("SELECT * FROM categories ORDER BY category_id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, category_from_row)
    }

    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Category>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query(
            "SELECT DISTINCT c.* FROM categories c \
             JOIN catalogue_categories cc ON cc.category_id = c.category_id \
             JOIN products p ON p.catalogue_category_id = cc.catalogue_category_id \
             WHERE p.seller_id = $1 ORDER BY c.category_id OFFSET $2 LIMIT $3",
        )
        .bind(seller_id.as_uuid())
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, category_from_row)
    }

    async fn name_exists(&self, name: &str) -> DomainResult<bool> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM categories WHERE lower(name) = lower($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT * FROM categories WHERE name ILIKE $1 OR description ILIKE $1 \
             ORDER BY category_id",
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, category_from_row)
    }

    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT DISTINCT c.* FROM categories c \
             JOIN catalogue_categories cc ON cc.category_id = c.category_id \
             JOIN products p ON p.catalogue_category_id = cc.catalogue_category_id \
             WHERE p.seller_id = $1 AND (c.name ILIKE $2 OR c.description ILIKE $2) \
             ORDER BY c.category_id",
        )
        .bind(seller_id.as_uuid())
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, category_from_row)
    }
}

#[async_trait]
impl CatalogueStore for PgStore {
    async fn insert(&self, catalogue: &Catalogue) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO catalogues (catalogue_id, name, description, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(catalogue.id.as_uuid())
        .bind(&catalogue.name)
        .bind(&catalogue.description)
        .bind(catalogue.audit.created_at)
        .bind(&catalogue.audit.created_by)
        .bind(catalogue.audit.updated_at)
        .bind(&catalogue.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, catalogue: &Catalogue) -> DomainResult<()> {
        sqlx::query(
            "UPDATE catalogues SET name = $2, description = $3, updated_at = $4, updated_by = $5 \
             WHERE catalogue_id = $1",
        )
        .bind(catalogue.id.as_uuid())
        .bind(&catalogue.name)
        .bind(&catalogue.description)
        .bind(catalogue.audit.updated_at)
        .bind(&catalogue.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: CatalogueId) -> DomainResult<Option<Catalogue>> {
        let row = sqlx::query("SELECT * FROM catalogues WHERE catalogue_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(catalogue_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn delete(&self, id: CatalogueId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM catalogues WHERE catalogue_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Catalogue>> {
        let (offset, limit) = page.offset_limit();
        let rows =
            sqlx::query("SELECT * FROM catalogues ORDER BY catalogue_id OFFSET $1 LIMIT $2")
                .bind(offset)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        collect(rows, catalogue_from_row)
    }

    async fn list_for_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Catalogue>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query(
            "SELECT DISTINCT cat.* FROM catalogues cat \
             JOIN catalogue_categories cc ON cc.catalogue_id = cat.catalogue_id \
             JOIN products p ON p.catalogue_category_id = cc.catalogue_category_id \
             WHERE p.seller_id = $1 ORDER BY cat.catalogue_id OFFSET $2 LIMIT $3",
        )
        .bind(seller_id.as_uuid())
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, catalogue_from_row)
    }

    async fn search(&self, name: &str) -> DomainResult<Vec<Catalogue>> {
        let rows =
            sqlx::query("SELECT * FROM catalogues WHERE name ILIKE $1 ORDER BY catalogue_id")
                .bind(like_pattern(name))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        collect(rows, catalogue_from_row)
    }

    async fn search_for_seller(
        &self,
        seller_id: SellerId,
        name: &str,
    ) -> DomainResult<Vec<Catalogue>> {
        let rows = sqlx::query(
            "SELECT DISTINCT cat.* FROM catalogues cat \
             JOIN catalogue_categories cc ON cc.catalogue_id = cat.catalogue_id \
             JOIN products p ON p.catalogue_category_id = cc.catalogue_category_id \
             WHERE p.seller_id = $1 AND cat.name ILIKE $2 ORDER BY cat.catalogue_id",
        )
        .bind(seller_id.as_uuid())
        .bind(like_pattern(name))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, catalogue_from_row)
    }
}

#[async_trait]
impl CatalogueCategoryStore for PgStore {
    async fn insert(&self, association: &CatalogueCategory) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO catalogue_categories (catalogue_category_id, catalogue_id, category_id, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(association.id.as_uuid())
        .bind(association.catalogue_id.as_uuid())
        .bind(association.category_id.as_uuid())
        .bind(association.audit.created_at)
        .bind(&association.audit.created_by)
        .bind(association.audit.updated_at)
        .bind(&association.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: CatalogueCategoryId) -> DomainResult<Option<CatalogueCategory>> {
        let row =
            sqlx::query("SELECT * FROM catalogue_categories WHERE catalogue_category_id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.as_ref()
            .map(association_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn delete(&self, id: CatalogueCategoryId) -> DomainResult<bool> {
        let result =
            sqlx::query("DELETE FROM catalogue_categories WHERE catalogue_category_id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_pair(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<Option<CatalogueCategory>> {
        let row = sqlx::query(
            "SELECT * FROM catalogue_categories WHERE catalogue_id = $1 AND category_id = $2",
        )
        .bind(catalogue_id.as_uuid())
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref()
            .map(association_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn pair_exists(
        &self,
        catalogue_id: CatalogueId,
        category_id: CategoryId,
    ) -> DomainResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM catalogue_categories \
             WHERE catalogue_id = $1 AND category_id = $2)",
        )
        .bind(catalogue_id.as_uuid())
        .bind(category_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }

    async fn exists_for_catalogue(&self, catalogue_id: CatalogueId) -> DomainResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM catalogue_categories WHERE catalogue_id = $1)",
        )
        .bind(catalogue_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }

    async fn category_ids_for_catalogue(
        &self,
        catalogue_id: CatalogueId,
    ) -> DomainResult<Vec<CategoryId>> {
        let rows = sqlx::query(
            "SELECT category_id FROM catalogue_categories WHERE catalogue_id = $1 \
             ORDER BY catalogue_category_id",
        )
        .bind(catalogue_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter()
            .map(|row| Ok(CategoryId::from_uuid(row.try_get("category_id")?)))
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(db_err)
    }

    async fn catalogue_refs_for_category(
        &self,
        category_id: CategoryId,
    ) -> DomainResult<Vec<CatalogueRef>> {
        let rows = sqlx::query(
            "SELECT DISTINCT cat.catalogue_id, cat.name, cat.description \
             FROM catalogue_categories cc \
             JOIN catalogues cat ON cat.catalogue_id = cc.catalogue_id \
             WHERE cc.category_id = $1 ORDER BY cat.catalogue_id",
        )
        .bind(category_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter()
            .map(|row| {
                Ok(CatalogueRef {
                    catalogue_id: CatalogueId::from_uuid(row.try_get("catalogue_id")?),
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(db_err)
    }

    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM catalogue_categories WHERE category_id = $1")
            .bind(category_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }

    async fn detail(&self, id: CatalogueCategoryId) -> DomainResult<Option<AssociationDetail>> {
        let sql = format!("{ASSOCIATION_DETAIL_SELECT} WHERE cc.catalogue_category_id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(association_detail_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn list_details(
        &self,
        catalogue_id: Option<CatalogueId>,
    ) -> DomainResult<Vec<AssociationDetail>> {
        let rows = match catalogue_id {
            Some(catalogue_id) => {
                let sql = format!(
                    "{ASSOCIATION_DETAIL_SELECT} WHERE cc.catalogue_id = $1 \
                     ORDER BY cc.catalogue_category_id"
                );
                sqlx::query(&sql)
                    .bind(catalogue_id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{ASSOCIATION_DETAIL_SELECT} ORDER BY cc.catalogue_category_id");
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(db_err)?;
        collect(rows, association_detail_from_row)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn insert(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO products (product_id, name, description, image_url, stock, \
             catalogue_category_id, seller_id, created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.stock)
        .bind(product.catalogue_category_id.as_uuid())
        .bind(product.seller_id.as_uuid())
        .bind(product.audit.created_at)
        .bind(&product.audit.created_by)
        .bind(product.audit.updated_at)
        .bind(&product.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            "UPDATE products SET name = $2, description = $3, image_url = $4, stock = $5, \
             catalogue_category_id = $6, seller_id = $7, updated_at = $8, updated_by = $9 \
             WHERE product_id = $1",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.stock)
        .bind(product.catalogue_category_id.as_uuid())
        .bind(product.seller_id.as_uuid())
        .bind(product.audit.updated_at)
        .bind(&product.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE product_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn delete(&self, id: ProductId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> DomainResult<Vec<Product>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query("SELECT * FROM products ORDER BY product_id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, product_from_row)
    }

    async fn list_by_seller(
        &self,
        seller_id: SellerId,
        page: PageRequest,
    ) -> DomainResult<Vec<Product>> {
        let (offset, limit) = page.offset_limit();
        let rows = sqlx::query(
            "SELECT * FROM products WHERE seller_id = $1 \
             ORDER BY product_id OFFSET $2 LIMIT $3",
        )
        .bind(seller_id.as_uuid())
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, product_from_row)
    }

    async fn name_exists(&self, name: &str) -> DomainResult<bool> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM products WHERE lower(name) = lower($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT * FROM products WHERE name ILIKE $1 OR description ILIKE $1 \
             ORDER BY product_id",
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, product_from_row)
    }

    async fn search_by_seller(
        &self,
        seller_id: SellerId,
        term: &str,
    ) -> DomainResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT * FROM products WHERE seller_id = $1 \
             AND (name ILIKE $2 OR description ILIKE $2) ORDER BY product_id",
        )
        .bind(seller_id.as_uuid())
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        collect(rows, product_from_row)
    }

    async fn delete_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let result = sqlx::query(
            "DELETE FROM products p USING catalogue_categories cc \
             WHERE p.catalogue_category_id = cc.catalogue_category_id AND cc.category_id = $1",
        )
        .bind(category_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }

    async fn count_by_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let row = sqlx::query(
            "SELECT COUNT(*) FROM products p \
             JOIN catalogue_categories cc ON cc.catalogue_category_id = p.catalogue_category_id \
             WHERE cc.category_id = $1",
        )
        .bind(category_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        let count: i64 = row.try_get(0).map_err(db_err)?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_category_and_seller(
        &self,
        category_id: CategoryId,
        seller_id: SellerId,
    ) -> DomainResult<u64> {
        let row = sqlx::query(
            "SELECT COUNT(*) FROM products p \
             JOIN catalogue_categories cc ON cc.catalogue_category_id = p.catalogue_category_id \
             WHERE cc.category_id = $1 AND p.seller_id = $2",
        )
        .bind(category_id.as_uuid())
        .bind(seller_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        let count: i64 = row.try_get(0).map_err(db_err)?;
        Ok(count.max(0) as u64)
    }

    async fn placements_for_seller(
        &self,
        seller_id: SellerId,
    ) -> DomainResult<Vec<ProductPlacement>> {
        let rows = sqlx::query(
            "SELECT p.product_id, cat.catalogue_id, cat.name AS catalogue_name, \
             cat.description AS catalogue_description, c.category_id, \
             c.name AS category_name, c.description AS category_description \
             FROM products p \
             JOIN catalogue_categories cc ON cc.catalogue_category_id = p.catalogue_category_id \
             JOIN catalogues cat ON cat.catalogue_id = cc.catalogue_id \
             JOIN categories c ON c.category_id = cc.category_id \
             WHERE p.seller_id = $1 ORDER BY p.product_id",
        )
        .bind(seller_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter()
            .map(|row| {
                Ok(ProductPlacement {
                    product_id: ProductId::from_uuid(row.try_get("product_id")?),
                    catalogue_id: CatalogueId::from_uuid(row.try_get("catalogue_id")?),
                    catalogue_name: row.try_get("catalogue_name")?,
                    catalogue_description: row.try_get("catalogue_description")?,
                    category_id: CategoryId::from_uuid(row.try_get("category_id")?),
                    category_name: row.try_get("category_name")?,
                    category_description: row.try_get("category_description")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(db_err)
    }
}

#[async_trait]
impl ProductPriceStore for PgStore {
    async fn insert(&self, price: &ProductPrice) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO product_prices (price_id, product_id, currency_id, amount_minor, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(price.id.as_uuid())
        .bind(price.product_id.as_uuid())
        .bind(price.currency_id.as_uuid())
        .bind(price.amount_minor)
        .bind(price.audit.created_at)
        .bind(&price.audit.created_by)
        .bind(price.audit.updated_at)
        .bind(&price.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, price: &ProductPrice) -> DomainResult<()> {
        sqlx::query(
            "UPDATE product_prices SET amount_minor = $2, updated_at = $3, updated_by = $4 \
             WHERE price_id = $1",
        )
        .bind(price.id.as_uuid())
        .bind(price.amount_minor)
        .bind(price.audit.updated_at)
        .bind(&price.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: PriceId) -> DomainResult<Option<ProductPrice>> {
        let row = sqlx::query("SELECT * FROM product_prices WHERE price_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(price_from_row).transpose().map_err(db_err)
    }

    async fn delete(&self, id: PriceId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM product_prices WHERE price_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_product_and_currency(
        &self,
        product_id: ProductId,
        currency_id: CurrencyId,
    ) -> DomainResult<Option<ProductPrice>> {
        let row = sqlx::query(
            "SELECT * FROM product_prices WHERE product_id = $1 AND currency_id = $2",
        )
        .bind(product_id.as_uuid())
        .bind(currency_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(price_from_row).transpose().map_err(db_err)
    }

    async fn details_for_product(&self, product_id: ProductId) -> DomainResult<Vec<PriceDetail>> {
        let sql = format!("{PRICE_DETAIL_SELECT} WHERE pp.product_id = $1 ORDER BY pp.price_id");
        let rows = sqlx::query(&sql)
            .bind(product_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, price_detail_from_row)
    }

    async fn list_details(&self) -> DomainResult<Vec<PriceDetail>> {
        let sql = format!("{PRICE_DETAIL_SELECT} ORDER BY pp.price_id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, price_detail_from_row)
    }

    async fn detail(&self, id: PriceId) -> DomainResult<Option<PriceDetail>> {
        let sql = format!("{PRICE_DETAIL_SELECT} WHERE pp.price_id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(price_detail_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn delete_for_product(&self, product_id: ProductId) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM product_prices WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }

    async fn delete_for_category(&self, category_id: CategoryId) -> DomainResult<u64> {
        let result = sqlx::query(
            "DELETE FROM product_prices pp USING products p, catalogue_categories cc \
             WHERE pp.product_id = p.product_id \
             AND p.catalogue_category_id = cc.catalogue_category_id \
             AND cc.category_id = $1",
        )
        .bind(category_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CurrencyStore for PgStore {
    async fn insert(&self, currency: &Currency) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO currencies (currency_id, code, symbol, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(currency.id.as_uuid())
        .bind(&currency.code)
        .bind(&currency.symbol)
        .bind(currency.audit.created_at)
        .bind(&currency.audit.created_by)
        .bind(currency.audit.updated_at)
        .bind(&currency.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get(&self, id: CurrencyId) -> DomainResult<Option<Currency>> {
        let row = sqlx::query("SELECT * FROM currencies WHERE currency_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(currency_from_row)
            .transpose()
            .map_err(db_err)
    }

    async fn list(&self) -> DomainResult<Vec<Currency>> {
        let rows = sqlx::query("SELECT * FROM currencies ORDER BY currency_id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        collect(rows, currency_from_row)
    }

    async fn is_empty(&self) -> DomainResult<bool> {
        let row = sqlx::query("SELECT NOT EXISTS(SELECT 1 FROM currencies)")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        row.try_get(0).map_err(db_err)
    }
}

#[async_trait]
impl AdminUserStore for PgStore {
    async fn insert(&self, user: &AdminUser) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO users (user_id, username, full_name, email, role, \
             created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.role)
        .bind(user.audit.created_at)
        .bind(&user.audit.created_by)
        .bind(user.audit.updated_at)
        .bind(&user.audit.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<AdminUser>> {
        let row = sqlx::query("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(admin_user_from_row)
            .transpose()
            .map_err(db_err)
    }
}
