//! Snapshot loader
//!
//! Reads a product dump from disk and fills the derived brand fields. Accepted
//! layouts: a JSON array of records, an object with a `products` array, or
//! JSON Lines (`.jsonl`, one record per line).

use crate::{BrandTable, Error, Product, Result};
use serde_json::Value;
use std::path::Path;

/// Set `brand_name_kor` / `brand_name_eng` from the product name.
///
/// Any brand values already on the record are replaced.
pub fn enrich(product: &mut Product, brands: &BrandTable) {
    match brands.detect(&product.product_name) {
        Some((korean, english)) => {
            product.brand_name_kor = korean.to_string();
            product.brand_name_eng = english.to_string();
        }
        None => {
            product.brand_name_kor.clear();
            product.brand_name_eng.clear();
        }
    }
}

/// Turn raw records into enriched products, skipping unusable ones.
pub fn products_from_values(records: Vec<Value>, brands: &BrandTable) -> Vec<Product> {
    let total = records.len();
    let mut products = Vec::with_capacity(total);

    for (position, record) in records.into_iter().enumerate() {
        let has_id = record
            .get("product_id")
            .map(|id| !id.is_null())
            .unwrap_or(false);
        if !has_id {
            tracing::warn!("Skipping record {} without product_id", position);
            continue;
        }
        match serde_json::from_value::<Product>(record) {
            Ok(mut product) => {
                enrich(&mut product, brands);
                products.push(product);
            }
            Err(e) => tracing::warn!("Skipping malformed record {}: {}", position, e),
        }
    }

    tracing::debug!("Parsed {} of {} records", products.len(), total);
    products
}

pub fn parse_json(json: &str, brands: &BrandTable) -> Result<Vec<Product>> {
    let records = match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove("products") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(Error::Serialization(
                    "expected an array or an object with a 'products' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(Error::Serialization(
                "expected an array or an object with a 'products' array".to_string(),
            ))
        }
    };
    Ok(products_from_values(records, brands))
}

pub fn parse_json_lines(text: &str, brands: &BrandTable) -> Result<Vec<Product>> {
    let records = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<Value>(line))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(products_from_values(records, brands))
}

/// Load and enrich a product dump
pub fn load_products<P: AsRef<Path>>(path: P, brands: &BrandTable) -> Result<Vec<Product>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let is_lines = path.extension().map(|ext| ext == "jsonl").unwrap_or(false);

    let products = if is_lines {
        parse_json_lines(&text, brands)?
    } else {
        parse_json(&text, brands)?
    };
    tracing::info!("Loaded {} products from {:?}", products.len(), path);
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_enrich_detects_brand() {
        let brands = BrandTable::default();
        let mut product = Product::new("1", "농심 신라면 120g");
        enrich(&mut product, &brands);
        assert_eq!(product.brand_name_kor, "농심");
        assert_eq!(product.brand_name_eng, "nongshim");

        let mut unknown = Product::new("2", "무명 라면");
        unknown.brand_name_kor = "stale".to_string();
        enrich(&mut unknown, &brands);
        assert_eq!(unknown.brand_name_kor, "");
        assert_eq!(unknown.brand_name_eng, "");
    }

    #[test]
    fn test_enrich_uses_first_variant() {
        let brands = BrandTable::default();
        let mut product = Product::new("1", "코카콜라 제로");
        enrich(&mut product, &brands);
        assert_eq!(product.brand_name_eng, "cocacola");
    }

    #[test]
    fn test_parse_json_layouts() {
        let brands = BrandTable::default();
        let array = r#"[{"product_id": "a", "product_name": "오뚜기 진라면"}]"#;
        let wrapped =
            r#"{"products": [{"product_id": "a", "product_name": "오뚜기 진라면"}]}"#;

        let from_array = parse_json(array, &brands).unwrap();
        let from_object = parse_json(wrapped, &brands).unwrap();
        assert_eq!(from_array, from_object);
        assert_eq!(from_array[0].brand_name_eng, "ottogi");

        assert!(parse_json(r#"{"items": []}"#, &brands).is_err());
        assert!(parse_json("42", &brands).is_err());
    }

    #[test]
    fn test_records_without_id_are_skipped() {
        let brands = BrandTable::default();
        let json = r#"[
            {"product_name": "no id"},
            {"product_id": null, "product_name": "null id"},
            {"product_id": "ok", "product_name": "kept"}
        ]"#;
        let products = parse_json(json, &brands).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "ok");
    }

    #[test]
    fn test_load_json_lines_file() {
        let brands = BrandTable::default();
        let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        writeln!(file, r#"{{"product_id": "1", "product_name": "롯데 빼빼로"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"product_id": "2", "product_name": "삼양 불닭볶음면"}}"#
        )
        .unwrap();

        let products = load_products(file.path(), &brands).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].brand_name_kor, "롯데");
        assert_eq!(products[1].brand_name_eng, "samyang");
    }
}
