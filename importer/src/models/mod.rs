//! Domain models shared by both pipelines.
//!
//! - [`SourceField`] - the 14 columns of the contact export
//! - [`RawRecord`] - one export row, fixed layout, unnormalized
//! - [`NormalizedValue`] - a cleaned, typed, non-empty field value
//! - [`SqlLiteral`] - one value fragment inside an INSERT tuple
//! - [`DestinationRow`] - an ordered tuple of literals for one contact

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Source Fields
// =============================================================================

/// A column of the contact export, identified by its exact header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceField {
    #[serde(rename = "Record ID")]
    RecordId,
    #[serde(rename = "First Name")]
    FirstName,
    #[serde(rename = "Last Name")]
    LastName,
    #[serde(rename = "HubSpot Score")]
    HubspotScore,
    #[serde(rename = "Specialty")]
    Specialty,
    #[serde(rename = "City")]
    City,
    #[serde(rename = "State/Region")]
    StateRegion,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "Phone Number")]
    PhoneNumber,
    #[serde(rename = "Mobile Phone Number")]
    MobilePhoneNumber,
    #[serde(rename = "Number of Sales Activities")]
    SalesActivities,
    #[serde(rename = "Notes")]
    Notes,
    #[serde(rename = "Contact owner")]
    ContactOwner,
    #[serde(rename = "Create Date")]
    CreateDate,
}

impl SourceField {
    /// Every field, in export column order.
    pub const ALL: [SourceField; 14] = [
        Self::RecordId,
        Self::FirstName,
        Self::LastName,
        Self::HubspotScore,
        Self::Specialty,
        Self::City,
        Self::StateRegion,
        Self::Email,
        Self::PhoneNumber,
        Self::MobilePhoneNumber,
        Self::SalesActivities,
        Self::Notes,
        Self::ContactOwner,
        Self::CreateDate,
    ];

    /// Header text as it appears in the export.
    pub fn header(&self) -> &'static str {
        match self {
            Self::RecordId => "Record ID",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::HubspotScore => "HubSpot Score",
            Self::Specialty => "Specialty",
            Self::City => "City",
            Self::StateRegion => "State/Region",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
            Self::MobilePhoneNumber => "Mobile Phone Number",
            Self::SalesActivities => "Number of Sales Activities",
            Self::Notes => "Notes",
            Self::ContactOwner => "Contact owner",
            Self::CreateDate => "Create Date",
        }
    }

    /// Position in [`SourceField::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// =============================================================================
// Raw Record
// =============================================================================

/// One row of the export, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub record_id: String,
    pub first_name: String,
    pub last_name: String,
    pub hubspot_score: String,
    pub specialty: String,
    pub city: String,
    pub state_region: String,
    pub email: String,
    pub phone_number: String,
    pub mobile_phone_number: String,
    pub sales_activities: String,
    pub notes: String,
    pub contact_owner: String,
    pub create_date: String,
}

impl RawRecord {
    /// Build a record from values ordered like [`SourceField::ALL`].
    pub fn from_values(values: [String; 14]) -> Self {
        let [
            record_id,
            first_name,
            last_name,
            hubspot_score,
            specialty,
            city,
            state_region,
            email,
            phone_number,
            mobile_phone_number,
            sales_activities,
            notes,
            contact_owner,
            create_date,
        ] = values;
        Self {
            record_id,
            first_name,
            last_name,
            hubspot_score,
            specialty,
            city,
            state_region,
            email,
            phone_number,
            mobile_phone_number,
            sales_activities,
            notes,
            contact_owner,
            create_date,
        }
    }

    /// Raw value of a field.
    pub fn get(&self, field: SourceField) -> &str {
        match field {
            SourceField::RecordId => &self.record_id,
            SourceField::FirstName => &self.first_name,
            SourceField::LastName => &self.last_name,
            SourceField::HubspotScore => &self.hubspot_score,
            SourceField::Specialty => &self.specialty,
            SourceField::City => &self.city,
            SourceField::StateRegion => &self.state_region,
            SourceField::Email => &self.email,
            SourceField::PhoneNumber => &self.phone_number,
            SourceField::MobilePhoneNumber => &self.mobile_phone_number,
            SourceField::SalesActivities => &self.sales_activities,
            SourceField::Notes => &self.notes,
            SourceField::ContactOwner => &self.contact_owner,
            SourceField::CreateDate => &self.create_date,
        }
    }
}

// =============================================================================
// Normalized Values and SQL Literals
// =============================================================================

/// A cleaned field value. Never holds an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    /// Trimmed text with `'` already doubled.
    Text(String),
    /// ASCII digits only.
    Digits(String),
    /// Integer or decimal rendering of a number.
    Number(String),
    /// `YYYY-MM-DD HH:MM:SS`.
    Timestamp(String),
}

impl NormalizedValue {
    /// Numbers go out bare, everything else single-quoted.
    pub fn to_literal(&self) -> SqlLiteral {
        match self {
            Self::Text(s) | Self::Digits(s) | Self::Timestamp(s) => SqlLiteral::Quoted(s.clone()),
            Self::Number(s) => SqlLiteral::Bare(s.clone()),
        }
    }
}

/// A value fragment in an INSERT tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlLiteral {
    Null,
    /// Content is already escaped.
    Quoted(String),
    Bare(String),
}

impl SqlLiteral {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<NormalizedValue>> for SqlLiteral {
    fn from(value: Option<NormalizedValue>) -> Self {
        value.map(|v| v.to_literal()).unwrap_or(SqlLiteral::Null)
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Quoted(s) => write!(f, "'{}'", s),
            Self::Bare(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Destination Row
// =============================================================================

/// Literals for one contact, in destination column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRow {
    values: Vec<SqlLiteral>,
}

impl DestinationRow {
    pub fn new(values: Vec<SqlLiteral>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[SqlLiteral] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Renders the `(v1,v2,...)` tuple.
impl fmt::Display for DestinationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")
    }
}

// =============================================================================
// Tests
// =============================================================================
