//! Request and response types for the dataset API.
//!
//! Field names match the API's JSON exactly. Optional fields that are unset
//! are left out of request bodies, and fields the API adds that are not
//! modelled here are ignored when decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// Publication state of a dataset or version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    /// Registered but not yet associated with an edition
    Created,
    /// Edition confirmed by the publisher
    EditionConfirmed,
    /// Associated with a publishing collection
    Associated,
    /// Publicly released
    Published,
}

/// Generic hyperlink reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Identifier of the linked resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Absolute URL of the linked resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Links attached to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLinks {
    /// Link to the dataset itself
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
}

/// A catalog dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique dataset identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publishing collection the dataset belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Related resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DatasetLinks>,
    /// Publication state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    /// Website URI of the dataset landing page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Dataset {
    /// Create a dataset with only its identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Envelope the API wraps dataset reads and writes in.
///
/// `current` holds the published variant, `next` the variant being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetResponse {
    /// Dataset identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Published variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Dataset>,
    /// In-progress variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Dataset>,
}

/// A specific edition and version of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersion {
    /// Version identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Edition this version belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Version number; the API may send it as a string or an integer
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Publication state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    /// Release description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Website page type
    #[serde(
        rename = "pageType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_type: Option<String>,
    /// Website URI of the version page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Links attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceLinks {
    /// Dataset the instance imports into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Link>,
}

/// A server-side import/processing job tied to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Edition being produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Version being produced
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Related resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<InstanceLinks>,
}

/// Website metadata published alongside a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "nationalStatistic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub national_statistic: Option<String>,
    #[serde(
        rename = "pageType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_type: Option<String>,
    #[serde(
        rename = "releaseDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Who to ask about the dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<DatasetContacts>,
}

/// Contact entries for a dataset, keyed by how they are reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetContacts {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<Contact>,
}

/// A single contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    }))
}
