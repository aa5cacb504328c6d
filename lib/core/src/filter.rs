// Product filters used for scoping and category listings
use crate::Product;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Exact `category` equality
    Category(String),
    /// Exact `big_category` equality
    BigCategory(String),
    /// Case-insensitive substring of `big_category`
    BigCategoryContains(String),
}

impl ProductFilter {
    pub fn big_category_contains(keyword: &str) -> Self {
        ProductFilter::BigCategoryContains(keyword.to_lowercase())
    }
}

impl Filter for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Category(category) => product.category == *category,
            ProductFilter::BigCategory(big) => product.big_category == *big,
            ProductFilter::BigCategoryContains(keyword) => {
                product.big_category.to_lowercase().contains(keyword.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filters() {
        let product = Product::new("p1", "사이다").with_categories("탄산음료", "음료류");
        assert!(ProductFilter::Category("탄산음료".to_string()).matches(&product));
        assert!(!ProductFilter::Category("음료류".to_string()).matches(&product));
        assert!(ProductFilter::BigCategory("음료류".to_string()).matches(&product));
        assert!(ProductFilter::big_category_contains("음료").matches(&product));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let product = Product::new("p1", "Chips").with_categories("Snack", "Snacks & Sweets");
        assert!(ProductFilter::big_category_contains("SNACKS").matches(&product));
    }
}
