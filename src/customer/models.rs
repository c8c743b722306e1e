//! Customer Info Form State
//!
//! Fields are replaced one at a time; nothing is validated until the shopper
//! submits. Only `name` and `email` are required, and a value made only of
//! whitespace counts as missing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the form's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerField {
    Name,
    Email,
    Phone,
    Address,
}

impl CustomerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerField::Name => "name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Address => "address",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details collected by the checkout form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = value.into();
    }

    /// Replaces a single field, leaving the others untouched
    pub fn set_field(&mut self, field: CustomerField, value: impl Into<String>) {
        match field {
            CustomerField::Name => self.set_name(value),
            CustomerField::Email => self.set_email(value),
            CustomerField::Phone => self.set_phone(value),
            CustomerField::Address => self.set_address(value),
        }
    }

    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
            CustomerField::Address => &self.address,
        }
    }

    /// Applies every field present in `patch`
    pub fn apply(&mut self, patch: CustomerPatch) {
        for (field, value) in patch.into_fields() {
            self.set_field(field, value);
        }
    }

    /// Checks the fields required before checkout.
    ///
    /// On failure returns the missing fields in form order.
    pub fn validate_for_submission(&self) -> Result<(), Vec<CustomerField>> {
        let missing: Vec<_> = [CustomerField::Name, CustomerField::Email]
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial update of the form; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerPatch {
    fn into_fields(self) -> impl Iterator<Item = (CustomerField, String)> {
        [
            (CustomerField::Name, self.name),
            (CustomerField::Email, self.email),
            (CustomerField::Phone, self.phone),
            (CustomerField::Address, self.address),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}
