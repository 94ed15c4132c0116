//! Image resource descriptors handed to the rendering layer.
//!
//! The core only computes the URL, the auth headers and the target size.
//! Decoding and caching belong to the image loader.

use serde::{Deserialize, Serialize};

use super::post::Post;
use super::user::User;

pub const HEADER_API_KEY: &str = "x-api-key";
pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_ACCESS_TOKEN: &str = "x-access-token";

/// Size of the area posts are laid out in, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width: u32,
    pub height: u32,
}

/// Target size for the rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Headers required to load protected images.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    entries: Vec<(&'static str, String)>,
}

impl AuthHeaders {
    pub fn new(api_key: &str, user: &User) -> Self {
        Self {
            entries: vec![
                (HEADER_API_KEY, api_key.to_string()),
                (HEADER_USER_ID, user.id.clone()),
                (HEADER_ACCESS_TOKEN, user.access_token.expose().to_string()),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.entries.iter().map(|(key, _)| *key).collect();
        f.debug_struct("AuthHeaders").field("keys", &keys).finish()
    }
}

/// What the image loader needs to fetch and place one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub url: String,
    pub headers: AuthHeaders,
    pub target: Option<ImageSize>,
}

impl ImageDescriptor {
    /// Descriptor with no target size (e.g. avatars).
    pub fn without_size(url: impl Into<String>, headers: AuthHeaders) -> Self {
        Self {
            url: url.into(),
            headers,
            target: None,
        }
    }

    /// Descriptor for a post image spanning the full display width.
    pub fn for_post(post: &Post, headers: AuthHeaders, display: DisplayMetrics) -> Self {
        Self {
            url: post.image_url.clone(),
            headers,
            target: Some(scale_to_width(
                post.image_width,
                post.image_height,
                display,
            )),
        }
    }
}

/// Aspect-preserving size for an image shown at the full display width.
///
/// Height scales with `display.width / image_width`. Without a known
/// width the scale is 1; without a known height a third of the display
/// height is reserved.
pub fn scale_to_width(
    image_width: Option<u32>,
    image_height: Option<u32>,
    display: DisplayMetrics,
) -> ImageSize {
    let height = match (image_width, image_height) {
        (Some(width), Some(height)) if width > 0 => {
            let scaled = u64::from(height) * u64::from(display.width) / u64::from(width);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        }
        (_, Some(height)) => height,
        (_, None) => display.height / 3,
    };
    ImageSize {
        width: display.width,
        height,
    }
}
