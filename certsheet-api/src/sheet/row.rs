//! Intern certificate row layout

use serde::{Deserialize, Deserializer, Serialize};

/// Column order used by every write. Must match the sheet header by convention.
pub const CERTIFICATE_FIELDS: [&str; 7] = [
    "CertNo",
    "NAME",
    "CLASS",
    "COURSE_NAME",
    "Mail",
    "MergedDocURL",
    "LinkToMergedDoc",
];

/// Request body for create and update.
///
/// Scalar JSON values are stringified; `null` and empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInput {
    #[serde(rename = "CertNo", default, deserialize_with = "lenient_string")]
    pub cert_no: Option<String>,
    #[serde(rename = "NAME", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "CLASS", default, deserialize_with = "lenient_string")]
    pub class: Option<String>,
    #[serde(rename = "COURSE_NAME", default, deserialize_with = "lenient_string")]
    pub course_name: Option<String>,
    #[serde(rename = "Mail", default, deserialize_with = "lenient_string")]
    pub mail: Option<String>,
    #[serde(rename = "MergedDocURL", default, deserialize_with = "lenient_string")]
    pub merged_doc_url: Option<String>,
    #[serde(rename = "LinkToMergedDoc", default, deserialize_with = "lenient_string")]
    pub link_to_merged_doc: Option<String>,
}

impl CertificateInput {
    /// Names of required fields (`CertNo`, `NAME`) that are absent or empty
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cert_no.is_none() {
            missing.push(CERTIFICATE_FIELDS[0]);
        }
        if self.name.is_none() {
            missing.push(CERTIFICATE_FIELDS[1]);
        }
        missing
    }

    /// Row values in write order, using `key` for the `CertNo` column.
    /// Absent fields become empty strings.
    pub fn to_row(&self, key: &str) -> Vec<String> {
        let cell = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            key.to_string(),
            cell(&self.name),
            cell(&self.class),
            cell(&self.course_name),
            cell(&self.mail),
            cell(&self.merged_doc_url),
            cell(&self.link_to_merged_doc),
        ]
    }
}

/// Accept strings, numbers and booleans; map null and "" to `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a string, number or boolean, found {}",
                other
            )));
        }
    };
    Ok(text.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_absent_fields() {
        let input: CertificateInput = serde_json::from_str(r#"{"CertNo": "A3"}"#).unwrap();
        assert_eq!(input.missing_required(), vec!["NAME"]);

        let empty = CertificateInput::default();
        assert_eq!(empty.missing_required(), vec!["CertNo", "NAME"]);
    }

    #[test]
    fn test_empty_and_null_count_as_missing() {
        let input: CertificateInput =
            serde_json::from_str(r#"{"CertNo": "", "NAME": null}"#).unwrap();
        assert_eq!(input.missing_required(), vec!["CertNo", "NAME"]);
    }

    #[test]
    fn test_scalars_are_stringified() {
        let input: CertificateInput =
            serde_json::from_str(r#"{"CertNo": 1042, "NAME": "Ada", "CLASS": true}"#).unwrap();
        assert_eq!(input.cert_no.as_deref(), Some("1042"));
        assert_eq!(input.class.as_deref(), Some("true"));
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let result = serde_json::from_str::<CertificateInput>(r#"{"NAME": ["Ada"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_row_fills_blanks_in_order() {
        let input: CertificateInput = serde_json::from_str(
            r#"{"CertNo": "ignored", "NAME": "Ada", "Mail": "ada@example.com"}"#,
        )
        .unwrap();
        let row = input.to_row("C-7");

        assert_eq!(row.len(), CERTIFICATE_FIELDS.len());
        assert_eq!(row, vec!["C-7", "Ada", "", "", "ada@example.com", "", ""]);
    }
}
