//! Read models assembled from several stored records.
//!
//! The structs here are what list and detail endpoints serialize. The
//! grouping itself is pure so it can be tested without a store.

use serde::Serialize;

use webstore_core::{CatalogueId, CategoryId, SellerId};

use crate::model::{AssociationDetail, CatalogueRef, Category, PriceDetail, Product, ProductPlacement};

/// A category together with its aggregate context: how many products sit
/// under it and which catalogues reference it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: u64,
    pub catalogues: Vec<CatalogueRef>,
}

/// A product with its price lines and placement resolved.
///
/// `catalogue_category` is `None` only when the placement row has gone
/// missing underneath the product; the product itself is still returned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub catalogue_category: Option<AssociationDetail>,
    pub prices: Vec<PriceDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub product_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueDetails {
    pub catalogue_id: CatalogueId,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<CategoryDetails>,
}

/// The per-seller drill-down: catalogue, then category, then product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDetails {
    pub seller_id: SellerId,
    pub name: String,
    pub email: String,
    pub catalogues: Vec<CatalogueDetails>,
}

/// Groups a seller's product placements into catalogue/category counts.
///
/// Built purely from the placements, so a catalogue or category the seller
/// has no products in never shows up, and counts are never zero. Catalogues
/// and categories keep the order they were first encountered in.
pub fn group_seller_products(placements: &[ProductPlacement]) -> Vec<CatalogueDetails> {
    let mut catalogues: Vec<CatalogueDetails> = Vec::new();
    for placement in placements {
        let idx = match catalogues
            .iter()
            .position(|c| c.catalogue_id == placement.catalogue_id)
        {
            Some(idx) => idx,
            None => {
                catalogues.push(CatalogueDetails {
                    catalogue_id: placement.catalogue_id,
                    name: placement.catalogue_name.clone(),
                    description: placement.catalogue_description.clone(),
                    categories: Vec::new(),
                });
                catalogues.len() - 1
            }
        };
        let catalogue = &mut catalogues[idx];
        match catalogue
            .categories
            .iter_mut()
            .find(|c| c.category_id == placement.category_id)
        {
            Some(category) => category.product_count += 1,
            None => catalogue.categories.push(CategoryDetails {
                category_id: placement.category_id,
                name: placement.category_name.clone(),
                description: placement.category_description.clone(),
                product_count: 1,
            }),
        }
    }
    catalogues
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use webstore_core::ProductId;

    use super::*;

    fn placement(
        catalogue: CatalogueId,
        cat_name: &str,
        category: CategoryId,
        category_name: &str,
    ) -> ProductPlacement {
        ProductPlacement {
            product_id: ProductId::new(),
            catalogue_id: catalogue,
            catalogue_name: cat_name.to_string(),
            catalogue_description: None,
            category_id: category,
            category_name: category_name.to_string(),
            category_description: None,
        }
    }

    #[test]
    fn no_placements_no_catalogues() {
        assert!(group_seller_products(&[]).is_empty());
    }

    #[test]
    fn same_cell_placements_accumulate() {
        let summer = CatalogueId::new();
        let electronics = CategoryId::new();
        let grouped = group_seller_products(&[
            placement(summer, "Summer", electronics, "Electronics"),
            placement(summer, "Summer", electronics, "Electronics"),
        ]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].name, "Summer");
        assert_eq!(grouped[0].categories.len(), 1);
        assert_eq!(grouped[0].categories[0].name, "Electronics");
        assert_eq!(grouped[0].categories[0].product_count, 2);
    }

    #[test]
    fn categories_nest_under_their_catalogue() {
        let summer = CatalogueId::new();
        let winter = CatalogueId::new();
        let electronics = CategoryId::new();
        let apparel = CategoryId::new();
        let grouped = group_seller_products(&[
            placement(summer, "Summer", electronics, "Electronics"),
            placement(summer, "Summer", apparel, "Apparel"),
            placement(winter, "Winter", electronics, "Electronics"),
            placement(summer, "Summer", electronics, "Electronics"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name, "Summer");
        assert_eq!(grouped[0].categories.len(), 2);
        assert_eq!(grouped[0].categories[0].product_count, 2);
        assert_eq!(grouped[0].categories[1].product_count, 1);
        assert_eq!(grouped[1].name, "Winter");
        assert_eq!(grouped[1].categories.len(), 1);
        assert_eq!(grouped[1].categories[0].product_count, 1);
    }

    #[test]
    fn first_encounter_order_is_kept() {
        let a = CatalogueId::new();
        let b = CatalogueId::new();
        let cat = CategoryId::new();
        let grouped = group_seller_products(&[
            placement(b, "B", cat, "C"),
            placement(a, "A", cat, "C"),
            placement(b, "B", cat, "C"),
        ]);
        assert_eq!(grouped[0].name, "B");
        assert_eq!(grouped[1].name, "A");
    }

    proptest! {
        #[test]
        fn counts_sum_to_placements_and_never_hit_zero(
            cells in prop::collection::vec((0u8..4, 0u8..4), 0..40)
        ) {
            let catalogues: Vec<CatalogueId> = (0..4).map(|_| CatalogueId::new()).collect();
            let categories: Vec<CategoryId> = (0..4).map(|_| CategoryId::new()).collect();
            let placements: Vec<ProductPlacement> = cells
                .iter()
                .map(|&(cat, cty)| {
                    placement(
                        catalogues[cat as usize],
                        &format!("catalogue-{cat}"),
                        categories[cty as usize],
                        &format!("category-{cty}"),
                    )
                })
                .collect();

            let grouped = group_seller_products(&placements);
            let total: u64 = grouped
                .iter()
                .flat_map(|c| c.categories.iter())
                .map(|c| c.product_count)
                .sum();
            prop_assert_eq!(total, placements.len() as u64);
            for catalogue in &grouped {
                prop_assert!(!catalogue.categories.is_empty());
                for category in &catalogue.categories {
                    prop_assert!(category.product_count > 0);
                    prop_assert!(placements.iter().any(
                        |p| p.catalogue_id == catalogue.catalogue_id
                            && p.category_id == category.category_id
                    ));
                }
            }
        }
    }
}
