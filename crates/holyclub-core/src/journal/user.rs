//! User profile types.

use serde::{Deserialize, Serialize};

use super::image::{ImagePart, PROFILE_IMAGE_FIELD};
use crate::error::{Error, InvalidInputError};

/// The author block embedded in entries and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// The signed-in user's profile from `/user/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub nickname: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Stored file name of the profile picture.
    #[serde(default)]
    pub profile: Option<String>,
}

/// A change to the signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    nickname: String,
    delete_picture: bool,
    picture: Option<ImagePart>,
}

impl ProfileUpdate {
    /// Rename the user. The nickname must not be blank.
    pub fn new(nickname: impl Into<String>) -> Result<Self, Error> {
        let nickname = nickname.into().trim().to_string();
        if nickname.is_empty() {
            return Err(InvalidInputError::Blank { field: "nickname" }.into());
        }
        Ok(Self {
            nickname,
            delete_picture: false,
            picture: None,
        })
    }

    /// Also remove the current profile picture.
    pub fn delete_picture(mut self) -> Self {
        self.delete_picture = true;
        self
    }

    /// Replace the profile picture. Ignored when the picture is deleted.
    pub fn picture(mut self, picture: ImagePart) -> Self {
        self.picture = Some(picture);
        self
    }

    /// The new picture with its multipart field name, unless deleting.
    pub fn file_part(&self) -> Option<(&'static str, &ImagePart)> {
        if self.delete_picture {
            return None;
        }
        self.picture
            .as_ref()
            .map(|picture| (PROFILE_IMAGE_FIELD, picture))
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Form fields as the backend expects them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("nickname".to_string(), self.nickname.clone())];
        if self.delete_picture {
            fields.push(("deleteProfile".to_string(), "true".to_string()));
        }
        fields
    }
}
