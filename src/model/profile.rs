use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::error::PortfolioError;

pub const COLLECTION: &str = "users";

/// One portfolio profile per account, keyed by the account id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub picture_url: String,
    #[serde(default = "default_picture_scale")]
    pub picture_scale: f32,
    #[serde(default)]
    pub picture_offset_x: i32,
    #[serde(default)]
    pub picture_offset_y: i32,
    #[serde(default)]
    pub created_date: Option<DateTime<FixedOffset>>,
}

fn default_picture_scale() -> f32 {
    1.0
}

impl Profile {
    pub fn new(id: Uuid, email: String, username: String, now: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            email,
            username,
            title: String::new(),
            bio: String::new(),
            picture_url: String::new(),
            picture_scale: default_picture_scale(),
            picture_offset_x: 0,
            picture_offset_y: 0,
            created_date: Some(now),
        }
    }

    /// Stored field map; the id lives in the document key only.
    pub fn to_fields(&self) -> Value {
        json!({
            "email": self.email,
            "username": self.username,
            "title": self.title,
            "bio": self.bio,
            "picture_url": self.picture_url,
            "picture_scale": self.picture_scale,
            "picture_offset_x": self.picture_offset_x,
            "picture_offset_y": self.picture_offset_y,
            "created_date": self.created_date,
        })
    }

    pub fn picture(&self) -> PictureTransform {
        PictureTransform {
            scale: self.picture_scale,
            offset_x: self.picture_offset_x,
            offset_y: self.picture_offset_y,
        }
    }

    pub fn set_picture(&mut self, picture: PictureTransform) {
        self.picture_scale = picture.scale;
        self.picture_offset_x = picture.offset_x;
        self.picture_offset_y = picture.offset_y;
    }
}

/// How the stored picture is cropped for display: scale first, then
/// translate by the offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PictureTransform {
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl PictureTransform {
    pub const MIN_SCALE: f32 = 1.0;
    pub const MAX_SCALE: f32 = 2.0;
    pub const MAX_OFFSET: i32 = 50;

    /// Out-of-range values are refused, naming the offending field.
    pub fn validate(&self) -> Result<(), PortfolioError> {
        if !(Self::MIN_SCALE..=Self::MAX_SCALE).contains(&self.scale) {
            return Err(PortfolioError::Validation {
                field: "picture_scale",
                message: format!(
                    "scale must be between {} and {}, got {}",
                    Self::MIN_SCALE,
                    Self::MAX_SCALE,
                    self.scale
                ),
            });
        }
        if !(-Self::MAX_OFFSET..=Self::MAX_OFFSET).contains(&self.offset_x) {
            return Err(PortfolioError::Validation {
                field: "picture_offset_x",
                message: format!(
                    "offset must be between -{} and {}, got {}",
                    Self::MAX_OFFSET,
                    Self::MAX_OFFSET,
                    self.offset_x
                ),
            });
        }
        if !(-Self::MAX_OFFSET..=Self::MAX_OFFSET).contains(&self.offset_y) {
            return Err(PortfolioError::Validation {
                field: "picture_offset_y",
                message: format!(
                    "offset must be between -{} and {}, got {}",
                    Self::MAX_OFFSET,
                    Self::MAX_OFFSET,
                    self.offset_y
                ),
            });
        }
        Ok(())
    }
}

impl Default for PictureTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}
