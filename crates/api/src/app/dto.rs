//! Request bodies and query parameters.
//!
//! Identifiers arrive as strings and go through the domain id parsers, so
//! a malformed value answers 400 with the domain message instead of a
//! deserializer rejection.

use chrono::NaiveDate;
use serde::Deserialize;

use webstore_catalog::model::SellerStatus;
use webstore_catalog::{
    AssociationDraft, CatalogueDraft, CategoryDraft, LoginRequest, PriceDraft, ProductDraft,
    SellerDraft,
};
use webstore_core::{DomainResult, PageRequest, SellerId};

// -------------------------
// Request bodies
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub google_token: String,
    pub user_type: Option<String>,
}

impl From<GoogleLoginRequest> for LoginRequest {
    fn from(req: GoogleLoginRequest) -> Self {
        Self {
            google_token: req.google_token,
            user_type: req.user_type,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRequest {
    pub name: String,
    pub email: String,
    pub status: Option<String>,
    pub joining_date: NaiveDate,
}

impl SellerRequest {
    pub fn into_draft(self) -> DomainResult<SellerDraft> {
        let status = match self.status {
            Some(raw) => Some(raw.parse::<SellerStatus>()?),
            None => None,
        };
        Ok(SellerDraft {
            name: self.name,
            email: self.email,
            status,
            joining_date: self.joining_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryRequest> for CategoryDraft {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogueRequest {
    pub name: String,
    pub description: Option<String>,
}

impl From<CatalogueRequest> for CatalogueDraft {
    fn from(req: CatalogueRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
    pub catalogue_id: String,
    pub category_id: String,
    pub seller_id: Option<String>,
}

impl ProductRequest {
    pub fn into_draft(self) -> DomainResult<ProductDraft> {
        let seller_id = match self.seller_id {
            Some(raw) => Some(raw.parse::<SellerId>()?),
            None => None,
        };
        Ok(ProductDraft {
            name: self.name,
            description: self.description,
            image_url: self.image_url,
            stock: self.stock.unwrap_or(0),
            catalogue_id: self.catalogue_id.parse()?,
            category_id: self.category_id.parse()?,
            seller_id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub product_id: String,
    pub currency_id: String,
    pub amount: i64,
}

impl PriceRequest {
    pub fn into_draft(self) -> DomainResult<PriceDraft> {
        Ok(PriceDraft {
            product_id: self.product_id.parse()?,
            currency_id: self.currency_id.parse()?,
            amount_minor: self.amount,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceUpdateRequest {
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRequest {
    pub catalogue_id: String,
    pub category_id: String,
}

impl AssociationRequest {
    pub fn into_draft(self) -> DomainResult<AssociationDraft> {
        Ok(AssociationDraft {
            catalogue_id: self.catalogue_id.parse()?,
            category_id: self.category_id.parse()?,
        })
    }
}

// -------------------------
// Query parameters
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page, self.size)
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordParam {
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermParams {
    pub search_term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameParam {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateParam {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationListParams {
    pub catalogue_id: Option<String>,
}
