//! Catalog records returned by the catalog backend.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::id::{CategoryId, ProductId, SubcategoryId};
use super::price::{self, Price};
use crate::de::{null_default, opt_text};

/// Thumbnail shown when a product has no `SMALL` image variation.
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/50";

/// A root-level taxonomy node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
}

/// A taxonomy node nested under a [`Category`] (`childs` in the backend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
}

/// Size tag of an image variation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Icon,
    Other(String),
}

impl ImageSize {
    /// Wire name of the size.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
            Self::Icon => "ICO",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ImageSize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SMALL" => Self::Small,
            "MEDIUM" => Self::Medium,
            "LARGE" => Self::Large,
            "ICO" => Self::Icon,
            _ => Self::Other(value),
        }
    }
}

impl Serialize for ImageSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// One rendition of a product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariation {
    pub size: ImageSize,
    pub url: String,
}

/// A product image and its renditions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, deserialize_with = "null_default")]
    pub variations: Vec<ImageVariation>,
}

/// Product row as listed under a subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<ProductImage>,
}

impl ProductSummary {
    /// URL of the first `SMALL` variation, or [`PLACEHOLDER_THUMBNAIL`].
    #[must_use]
    pub fn thumbnail_url(&self) -> &str {
        self.images
            .iter()
            .flat_map(|image| image.variations.iter())
            .find(|variation| variation.size == ImageSize::Small)
            .map_or(PLACEHOLDER_THUMBNAIL, |variation| variation.url.as_str())
    }
}

/// Stock flag nested as `availability.availability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default, deserialize_with = "null_default")]
    pub availability: bool,
}

/// Commercial data nested as `extraData`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtraData {
    #[serde(default, deserialize_with = "opt_text")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "price::lenient")]
    pub pvp_ecommerce: Option<Price>,
    #[serde(default, deserialize_with = "opt_text")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct DetailFields {
    id: ProductId,
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "opt_text")]
    sku: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    body: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    availability: Availability,
    #[serde(rename = "extraData", default, deserialize_with = "null_default")]
    extra_data: ExtraData,
    #[serde(default, deserialize_with = "null_default")]
    images: Vec<ProductImage>,
}

/// Full product record from the detail endpoints.
///
/// Keeps the original JSON object next to the typed view: serializing a
/// `ProductDetail` reproduces the backend object unchanged, which is what
/// the create-product endpoint expects.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    fields: DetailFields,
    raw: Value,
}

impl ProductDetail {
    /// Decode a detail object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object has no valid `id` or a typed field
    /// has the wrong type.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = DetailFields::deserialize(&raw)?;
        Ok(Self { fields, raw })
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.fields.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.fields.title
    }

    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.fields.sku.as_deref()
    }

    /// Untrusted rich-text body. Must be sanitized before rendering.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.fields.body.as_deref()
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.fields.availability.availability
    }

    #[must_use]
    pub const fn extra(&self) -> &ExtraData {
        &self.fields.extra_data
    }

    /// Every variation URL across all images, first occurrence order, no duplicates.
    #[must_use]
    pub fn gallery_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        for variation in self.fields.images.iter().flat_map(|i| i.variations.iter()) {
            if !variation.url.is_empty() && !urls.contains(&variation.url.as_str()) {
                urls.push(&variation.url);
            }
        }
        urls
    }

    /// The backend object as received.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Serialize for ProductDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProductDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(raw).map_err(serde::de::Error::custom)
    }
}
