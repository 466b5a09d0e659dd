use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account role selected at registration.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }
}

/// Interface language offered by the app. Persisted as its lowercase code.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
    Pt,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized language code: {0:?}")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Fr, Language::Es, Language::Pt];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Pt => "pt",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let r: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(r, Role::Admin);
        assert_eq!(Role::Customer.as_str(), "customer");
    }

    #[test]
    fn language_parses_known_codes_only() {
        assert_eq!("fr".parse::<Language>(), Ok(Language::Fr));
        assert_eq!(" PT ".parse::<Language>(), Ok(Language::Pt));
        assert_eq!("de".parse::<Language>(), Err(UnknownLanguage("de".into())));
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::Es.to_string(), "es");
    }

    #[test]
    fn product_accepts_camel_case_payload() {
        let p: Product = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Shea butter",
            "category": "beauty",
            "vendorId": "v9",
            "price": 4.5
        }))
        .unwrap();
        assert_eq!(p.vendor_id.as_deref(), Some("v9"));
        assert_eq!(p.stock, 0);
        assert!(p.images.is_empty());
    }
}
