//! Product list filtering for the browse screens.

use common::Product;

/// Criteria applied to a product list. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub vendor_id: Option<String>,
    pub in_stock_only: bool,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category != *category {
                return false;
            }
        }
        if let Some(vendor) = &self.vendor_id {
            if product.vendor_id.as_deref() != Some(vendor.as_str()) {
                return false;
            }
        }
        if self.in_stock_only && product.stock == 0 {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term) || product.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    /// Matching products, in their original order.
    pub fn filter<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
