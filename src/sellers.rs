//! Seller configuration loading.
//!
//! Sellers live in a TOML file maintained by the operations team, one
//! `[[sellers]]` table per seller:
//!
//! ```toml
//! [[sellers]]
//! seller_id = "slr001"
//! seller_name = "Acme Home"
//! active = true
//! email_to = "finance@acme.example; owner@acme.example"
//! email_cc = "reports@platform.example"
//! ```
//!
//! Address lists are semicolon-delimited in the file and split here, so the
//! rest of the crate only ever sees trimmed, non-empty addresses. Inactive
//! sellers are dropped at load time; file order is preserved.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

/// One active seller, as consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct SellerConfig {
    /// Platform-assigned seller id, matched against order participants.
    pub id: String,
    /// Human-readable name; also the `f_sellerNames` listing filter value.
    pub display: String,
    pub email_to: Vec<String>,
    pub email_cc: Vec<String>,
}

/// On-disk shape of the seller file.
#[derive(Debug, Deserialize)]
struct SellerFile {
    #[serde(default)]
    sellers: Vec<SellerEntry>,
}

#[derive(Debug, Deserialize)]
struct SellerEntry {
    seller_id: String,
    seller_name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    email_to: String,
    #[serde(default)]
    email_cc: String,
}

/// Loads the active sellers from `path`, in file order.
///
/// # Errors
///
/// Returns [`RemitError::Sellers`](crate::RemitError::Sellers) if the file
/// cannot be read or is not valid TOML.
pub fn load_sellers(path: &Path) -> crate::Result<Vec<SellerConfig>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| crate::RemitError::Sellers(format!("failed to read {}: {e}", path.display())))?;
    let sellers = parse_sellers(&raw)?;
    info!(
        count = sellers.len(),
        file = %path.display(),
        "active sellers loaded"
    );
    Ok(sellers)
}

fn parse_sellers(raw: &str) -> crate::Result<Vec<SellerConfig>> {
    let file: SellerFile = toml::from_str(raw)
        .map_err(|e| crate::RemitError::Sellers(format!("invalid seller file: {e}")))?;

    Ok(file
        .sellers
        .into_iter()
        .filter(|entry| entry.active)
        .map(|entry| SellerConfig {
            id: entry.seller_id.trim().to_string(),
            display: entry.seller_name.trim().to_string(),
            email_to: split_addresses(&entry.email_to),
            email_cc: split_addresses(&entry.email_cc),
        })
        .collect())
}

/// Splits a semicolon-delimited address list, trimming and dropping blanks.
fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELLERS_TOML: &str = r#"
        [[sellers]]
        seller_id = "slr001"
        seller_name = " Acme Home "
        active = true
        email_to = "finance@acme.example; owner@acme.example ;"
        email_cc = "reports@platform.example"

        [[sellers]]
        seller_id = "slr002"
        seller_name = "Dormant Store"
        active = false
        email_to = "nobody@dormant.example"

        [[sellers]]
        seller_id = "slr003"
        seller_name = "Bare Minimum"
        active = true
    "#;

    #[test]
    fn keeps_only_active_sellers_in_file_order() {
        let sellers = parse_sellers(SELLERS_TOML).unwrap();
        assert_eq!(sellers.len(), 2);
        assert_eq!(sellers[0].id, "slr001");
        assert_eq!(sellers[1].id, "slr003");
    }

    #[test]
    fn trims_names_and_splits_address_lists() {
        let sellers = parse_sellers(SELLERS_TOML).unwrap();
        assert_eq!(sellers[0].display, "Acme Home");
        assert_eq!(
            sellers[0].email_to,
            vec!["finance@acme.example", "owner@acme.example"]
        );
        assert_eq!(sellers[0].email_cc, vec!["reports@platform.example"]);
    }

    #[test]
    fn missing_address_fields_become_empty_lists() {
        let sellers = parse_sellers(SELLERS_TOML).unwrap();
        assert!(sellers[1].email_to.is_empty());
        assert!(sellers[1].email_cc.is_empty());
    }

    #[test]
    fn empty_file_yields_no_sellers() {
        assert!(parse_sellers("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_sellers("[[sellers]\nseller_id = 1").unwrap_err();
        assert!(err.to_string().contains("invalid seller file"));
    }
}
