use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Typed view over the vendor onboarding draft.
///
/// Every field is optional: each screen fills a few of them and merges the
/// view into the draft with `DraftStore::update_with`, where `None` fields are
/// left out and therefore never erase what an earlier screen wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorSetup {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub business_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub account_holder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "scalar_text")]
    pub account_number: Option<String>,
}

/// Read a form field as text. Phone, postal and account numbers often arrive
/// as JSON numbers; lists and objects are not form text and are rejected.
fn scalar_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("expected text, got {other}"))),
    }
}

/// Screens of the onboarding flow, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Business,
    Contact,
    Address,
    Payout,
}

impl SetupStep {
    pub const ALL: [SetupStep; 4] = [SetupStep::Business, SetupStep::Contact, SetupStep::Address, SetupStep::Payout];

    /// Draft field names a step must fill before the flow can be submitted.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            SetupStep::Business => &["storeName", "businessType"],
            SetupStep::Contact => &["ownerName", "email", "phone"],
            SetupStep::Address => &["street", "city", "country"],
            SetupStep::Payout => &["bankName", "accountHolder", "accountNumber"],
        }
    }
}

impl VendorSetup {
    fn field(&self, name: &str) -> Option<&str> {
        let v = match name {
            "storeName" => &self.store_name,
            "businessType" => &self.business_type,
            "description" => &self.description,
            "ownerName" => &self.owner_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "street" => &self.street,
            "city" => &self.city,
            "region" => &self.region,
            "postalCode" => &self.postal_code,
            "country" => &self.country,
            "bankName" => &self.bank_name,
            "accountHolder" => &self.account_holder,
            "accountNumber" => &self.account_number,
            _ => return None,
        };
        v.as_deref()
    }

    /// Required fields of `step` that are missing or blank.
    pub fn missing_in(&self, step: SetupStep) -> Vec<&'static str> {
        step.required_fields()
            .iter()
            .copied()
            .filter(|f| self.field(f).map_or(true, |v| v.trim().is_empty()))
            .collect()
    }

    /// Required fields still missing across the whole flow.
    pub fn missing_required(&self) -> Vec<&'static str> {
        SetupStep::ALL.iter().flat_map(|s| self.missing_in(*s)).collect()
    }

    /// First step with missing required fields, i.e. where a resumed flow continues.
    pub fn resume_step(&self) -> Option<SetupStep> {
        SetupStep::ALL.into_iter().find(|s| !self.missing_in(*s).is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.resume_step().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_fields_are_not_serialized() {
        let view = VendorSetup { store_name: Some("Ada's".into()), ..Default::default() };
        assert_eq!(serde_json::to_value(&view).unwrap(), serde_json::json!({"storeName": "Ada's"}));
    }

    #[test]
    fn numeric_fields_read_as_text() {
        let v: VendorSetup = serde_json::from_value(serde_json::json!({
            "phone": 2348000000u64,
            "postalCode": 10001,
            "accountNumber": "0123456789",
            "city": null
        }))
        .unwrap();
        assert_eq!(v.phone.as_deref(), Some("2348000000"));
        assert_eq!(v.postal_code.as_deref(), Some("10001"));
        assert_eq!(v.account_number.as_deref(), Some("0123456789"));
        assert_eq!(v.city, None);

        let nested = serde_json::from_value::<VendorSetup>(serde_json::json!({"phone": ["1"]}));
        assert!(nested.is_err());
    }

    #[test]
    fn resume_step_follows_navigation_order() {
        let mut v = VendorSetup::default();
        assert_eq!(v.resume_step(), Some(SetupStep::Business));

        v.store_name = Some("Ada's".into());
        v.business_type = Some("retail".into());
        assert_eq!(v.resume_step(), Some(SetupStep::Contact));
        assert_eq!(v.missing_in(SetupStep::Contact), vec!["ownerName", "email", "phone"]);

        v.owner_name = Some("Ada".into());
        v.email = Some("ada@example.com".into());
        v.phone = Some("  ".into());
        assert_eq!(v.missing_in(SetupStep::Contact), vec!["phone"]);
        assert!(!v.is_complete());
    }

    #[test]
    fn complete_setup_has_nothing_missing() {
        let v = VendorSetup {
            store_name: Some("Ada's".into()),
            business_type: Some("retail".into()),
            owner_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            phone: Some("+2348000000".into()),
            street: Some("1 Marina".into()),
            city: Some("Lagos".into()),
            country: Some("NG".into()),
            bank_name: Some("First".into()),
            account_holder: Some("Ada".into()),
            account_number: Some("0123456789".into()),
            ..Default::default()
        };
        assert!(v.missing_required().is_empty());
        assert!(v.is_complete());
    }
}
