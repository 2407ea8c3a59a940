//! Placeholder media shown before the avatar's remote video is playing.

use crate::api::Avatar;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub url: String,
    pub kind: PlaceholderKind,
}

/// Extension check, case-insensitive.
pub fn is_image_url(url: &str) -> bool {
    url.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Use the selected avatar's preview if it is listed, otherwise `fallback_url`.
pub fn placeholder_for(avatars: &[Avatar], avatar_id: &str, fallback_url: &str) -> Placeholder {
    let url = avatars
        .iter()
        .find(|a| a.avatar_id == avatar_id && !a.url.is_empty())
        .map(|a| a.url.clone())
        .unwrap_or_else(|| fallback_url.to_string());

    let kind = if is_image_url(&url) {
        PlaceholderKind::Image
    } else {
        PlaceholderKind::Video
    };
    Placeholder { url, kind }
}
