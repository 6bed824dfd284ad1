use std::collections::{BTreeMap, HashMap};

pub type FormFields = HashMap<String, String>;

/// All required fields were present and non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidForm {
    values: BTreeMap<String, String>,
}

impl ValidForm {
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFields {
    pub fields: Vec<String>,
}

/// All-or-nothing extraction: either every required field is usable or the
/// caller gets the full list of fields to flag.
pub fn validate(raw: &FormFields, required: &[&str]) -> Result<ValidForm, InvalidFields> {
    let mut values = BTreeMap::new();
    let mut invalid = Vec::new();

    for field in required {
        match raw.get(*field).map(|value| value.trim()) {
            Some(value) if !value.is_empty() => {
                values.insert(field.to_string(), value.to_string());
            }
            _ => invalid.push(field.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(ValidForm { values })
    } else {
        Err(InvalidFields { fields: invalid })
    }
}
