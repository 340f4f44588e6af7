use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ClientError;

// listing
//  ├── id            (string or number on the wire)
//  ├── title / description
//  ├── price         (number or numeric string)
//  ├── location
//  │    ├── name
//  │    └── locationId
//  ├── bedrooms / bathrooms / area
//  ├── media[]
//  │    ├── kind     (image | video)
//  │    └── url
//  ├── owner
//  ├── verification
//  ├── createdAt
//  └── hidden / boosted

/// Identifier as sent by the backend. Numbers are normalized to their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Id(s),
            RawId::Int(n) => Id(n.to_string()),
        })
    }
}

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id(n.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_location")]
    pub location: ListingLocation,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bedrooms: Option<u8>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bathrooms: Option<u8>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub area: Option<f64>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub verification: VerificationStatus,
    #[serde(alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub boosted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingLocation {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "location_id")]
    pub location_id: Option<Id>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: Id,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
    #[serde(other)]
    Unknown,
}

/// One selectable value of a facet (category, location, property type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(alias = "title", alias = "label")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(alias = "post_id")]
    pub post_id: Option<Id>,
    pub author: Option<String>,
    #[serde(alias = "text", alias = "content")]
    pub body: String,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<Id>,
    #[serde(alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Num(f64),
        Text(String),
        Null(Option<()>),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Num(n) => Ok(n),
        RawPrice::Text(s) => {
            let cleaned: String = s.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("price is not numeric: {s}")))
        }
        RawPrice::Null(_) => Ok(0.0),
    }
}

/// Number sent as a JSON number or as text. Anything else reads as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Text(String),
    Other(Value),
}

impl RawNumber {
    fn value(self) -> Option<f64> {
        match self {
            RawNumber::Num(n) => Some(n),
            RawNumber::Text(s) => {
                let cleaned: String = s.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
                cleaned.parse::<f64>().ok()
            }
            RawNumber::Other(_) => None,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)?.value())
}

/// Room counts: whole numbers in `0..=255`, otherwise absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)?
        .value()
        .filter(|n| n.fract() == 0.0 && (0.0..=255.0).contains(n))
        .map(|n| n as u8))
}

/// Location as an object, or as bare text naming the place.
fn lenient_location<'de, D>(deserializer: D) -> Result<ListingLocation, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLocation {
        Full(ListingLocation),
        Name(String),
        Other(Value),
    }

    Ok(match RawLocation::deserialize(deserializer)? {
        RawLocation::Full(loc) => loc,
        RawLocation::Name(name) => ListingLocation {
            name,
            location_id: None,
        },
        RawLocation::Other(_) => ListingLocation::default(),
    })
}

/// Free text that some backends send as a number or boolean.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Keys the backend has been seen to wrap collections under.
const COLLECTION_KEYS: [&str; 4] = ["data", "posts", "results", "items"];

/// Pull a collection out of a response body that is either a bare array or
/// an object wrapping the array under one of [`COLLECTION_KEYS`].
///
/// Records that do not decode are skipped so one bad entry cannot empty a section.
pub fn extract_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ClientError> {
    let arr = match body {
        Value::Array(arr) => arr,
        Value::Object(mut obj) => COLLECTION_KEYS
            .iter()
            .find_map(|k| match obj.remove(*k) {
                Some(Value::Array(arr)) => Some(arr),
                _ => None,
            })
            .ok_or_else(|| ClientError::Decode("collection missing from response".to_string()))?,
        other => {
            return Err(ClientError::Decode(format!(
                "expected a collection, got {}",
                kind_of(&other)
            )))
        }
    };

    let total = arr.len();
    let mut items = Vec::with_capacity(total);
    let mut first_err = None;
    for v in arr {
        match serde_json::from_value::<T>(v) {
            Ok(item) => items.push(item),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_err {
        log::warn!(
            "skipped {} of {} records that did not decode (first: {e})",
            total - items.len(),
            total
        );
    }
    Ok(items)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
