use crate::text::value_text;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accept any JSON value for a text field; absent and null become "".
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

fn optional_text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(value_text(&other)),
    })
}

fn raw_materials_field<'de, D>(deserializer: D) -> Result<RawMaterials, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawMaterials>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ingredient breakdown of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterials {
    /// Full comma-separated ingredient list, in label order
    #[serde(default, deserialize_with = "text_field")]
    pub ingredients_raw: String,
    #[serde(default, deserialize_with = "text_field")]
    pub safe: String,
    #[serde(default, deserialize_with = "text_field")]
    pub caution: String,
    #[serde(default, deserialize_with = "text_field")]
    pub warning: String,
    #[serde(default, deserialize_with = "text_field")]
    pub etc: String,
}

impl RawMaterials {
    /// Comma-separated ingredient list, trimmed, empties dropped
    pub fn ingredients(&self) -> Vec<&str> {
        split_list(&self.ingredients_raw)
    }

    pub fn warnings(&self) -> Vec<&str> {
        split_list(&self.warning)
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// A product record from the catalog
///
/// Fields the engines do not read are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "text_field")]
    pub product_id: String,
    #[serde(default, deserialize_with = "text_field")]
    pub product_name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "text_field")]
    pub category: String,
    #[serde(default, deserialize_with = "text_field")]
    pub big_category: String,
    #[serde(default, deserialize_with = "text_field")]
    pub brand_name_kor: String,
    #[serde(default, deserialize_with = "text_field")]
    pub brand_name_eng: String,
    #[serde(default, deserialize_with = "raw_materials_field")]
    pub raw_materials: RawMaterials,
    #[serde(
        default,
        deserialize_with = "optional_text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            ..Default::default()
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_categories(
        mut self,
        category: impl Into<String>,
        big_category: impl Into<String>,
    ) -> Self {
        self.category = category.into();
        self.big_category = big_category.into();
        self
    }

    pub fn with_raw_materials(mut self, raw_materials: RawMaterials) -> Self {
        self.raw_materials = raw_materials;
        self
    }

    /// Name, category and the four ingredient classes, space-joined
    pub fn descriptive_text(&self) -> String {
        let rm = &self.raw_materials;
        [
            self.product_name.as_str(),
            self.category.as_str(),
            rm.safe.as_str(),
            rm.caution.as_str(),
            rm.warning.as_str(),
            rm.etc.as_str(),
        ]
        .join(" ")
    }
}

/// One row of a recommendation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub product_id: String,
    pub manufacturer: String,
    pub product_name: String,
    pub image_url: Option<String>,
}

impl From<&Product> for RecommendationEntry {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id.clone(),
            manufacturer: product.manufacturer.clone(),
            product_name: product.product_name.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_missing_fields() {
        let product: Product = serde_json::from_value(json!({
            "product_id": "p1",
            "product_name": "새우깡"
        }))
        .unwrap();
        assert_eq!(product.manufacturer, "");
        assert_eq!(product.raw_materials, RawMaterials::default());
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_deserialize_loose_types() {
        let product: Product = serde_json::from_value(json!({
            "product_id": 42,
            "product_name": ["컵", "라면"],
            "manufacturer": null,
            "energy_kcal": 120,
            "raw_materials": { "warning": "대두, 밀", "safe": null }
        }))
        .unwrap();
        let bare: Product = serde_json::from_value(json!({
            "product_id": "p2",
            "raw_materials": null
        }))
        .unwrap();
        assert_eq!(bare.raw_materials, RawMaterials::default());
        assert_eq!(product.product_id, "42");
        assert_eq!(product.product_name, "컵 라면");
        assert_eq!(product.manufacturer, "");
        assert_eq!(product.raw_materials.warnings(), vec!["대두", "밀"]);
        assert_eq!(product.extra.get("energy_kcal"), Some(&json!(120)));
    }

    #[test]
    fn test_serialize_keeps_extra_fields() {
        let mut product = Product::new("p1", "콜라");
        product.extra.insert("sugar_g".to_string(), json!(27));
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["sugar_g"], json!(27));
        assert_eq!(value["product_name"], json!("콜라"));
    }

    #[test]
    fn test_ingredient_lists() {
        let rm = RawMaterials {
            ingredients_raw: " 밀가루, 설탕 ,, 대두 ".to_string(),
            ..Default::default()
        };
        assert_eq!(rm.ingredients(), vec!["밀가루", "설탕", "대두"]);
        assert!(rm.warnings().is_empty());
    }

    #[test]
    fn test_descriptive_text_order() {
        let product = Product::new("p1", "초코파이")
            .with_categories("파이", "과자류")
            .with_raw_materials(RawMaterials {
                safe: "설탕".to_string(),
                warning: "우유".to_string(),
                ..Default::default()
            });
        assert_eq!(product.descriptive_text(), "초코파이 파이 설탕  우유 ");
    }
}
