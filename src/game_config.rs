use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::region::Region;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    #[serde(rename = "image1")]
    pub image_a: String,
    #[serde(rename = "image2")]
    pub image_b: String,
}

/// A playable game: a title, two images and the regions where they differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(rename = "gameTitle")]
    pub title: String,
    pub images: Images,
    #[serde(rename = "differences")]
    pub regions: Vec<Region>,
}

impl GameConfig {
    pub fn new(
        title: impl Into<String>,
        image_a: impl Into<String>,
        image_b: impl Into<String>,
        regions: Vec<Region>,
    ) -> Self {
        Self {
            title: title.into(),
            images: Images {
                image_a: image_a.into(),
                image_b: image_b.into(),
            },
            regions,
        }
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// All four checks run independently; every failing field is reported.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Required");
        }
        if self.images.image_a.trim().is_empty() {
            errors.insert(Field::ImageA, "Required");
        }
        if self.images.image_b.trim().is_empty() {
            errors.insert(Field::ImageB, "Required");
        }
        if self.regions.is_empty() {
            errors.insert(Field::Regions, "At least one difference required");
        }
        errors.into_result()
    }
}

/// Editable parts of a game config, used to key validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum Field {
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "image A")]
    ImageA,
    #[strum(serialize = "image B")]
    ImageB,
    #[strum(serialize = "differences")]
    Regions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: std::collections::BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.errors
                .iter()
                .map(|(field, msg)| format!("{field}: {msg}"))
                .join(", ")
        )
    }
}
