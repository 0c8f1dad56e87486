//! Application services over the store ports.
//!
//! Services are where the rules live: callers are scoped before any data is
//! touched, audit fields are stamped from the caller, and the uniqueness and
//! referential checks the stores do not enforce themselves run here as
//! explicit pre-checks.

mod associations;
mod catalogues;
mod categories;
mod login;
mod prices;
mod products;
mod sellers;

pub use associations::{AssociationDraft, AssociationService};
pub use catalogues::{CatalogueDraft, CatalogueService};
pub use categories::{CategoryDraft, CategoryService};
pub use login::{AuthOutcome, LoginRequest, LoginService};
pub use prices::{CurrencyService, PriceDraft, PriceService};
pub use products::{ProductDraft, ProductService};
pub use sellers::{SellerDraft, SellerService};
