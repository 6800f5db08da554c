//! Open Graph images.
//!
//! A request path is turned into segments, the segments into either a custom
//! visual tree (override table) or an [`OgPayload`], the payload into the
//! generic card, and the card into PNG bytes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::post_store::PostStore;
use crate::query_string::QueryString;

pub mod layout;
pub mod overrides;
pub mod render;
pub mod resolver;
pub mod template;

pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;
pub const MIN_DIMENSION: u32 = 320;
pub const MAX_DIMENSION: u32 = 2000;

pub const SITE_ACCENT: &str = "#0f172a";
pub const POST_ACCENT: &str = "#1d4ed8";

/// Everything the images need to know about the site owner.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteIdentity {
    pub name: String,
    pub handle: String,
    pub domain: String,
    pub description: String,
    pub tagline: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OgPayload {
    pub title: String,
    pub description: Option<String>,
    pub badge: Option<String>,
    pub footer: Option<String>,
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions { width: OG_IMAGE_WIDTH, height: OG_IMAGE_HEIGHT }
    }
}

impl Dimensions {
    pub fn from_query(query: &QueryString) -> Self {
        Dimensions {
            width: clamp_dimension(query.get("width"), OG_IMAGE_WIDTH),
            height: clamp_dimension(query.get("height"), OG_IMAGE_HEIGHT),
        }
    }
}

lazy_static! {
    static ref LEADING_INT_REGEX: Regex = Regex::new(r"^\s*([+-]?)(\d+)").unwrap();
}

/// Reads the leading integer of `raw` (`"800px"` is 800) and clamps it to
/// [`MIN_DIMENSION`, `MAX_DIMENSION`]. Missing or non numeric values give `fallback`.
pub fn clamp_dimension(raw: Option<&str>, fallback: u32) -> u32 {
    let Some(caps) = raw.and_then(|r| LEADING_INT_REGEX.captures(r)) else {
        return fallback;
    };

    let negative = &caps[1] == "-";
    let parsed = match caps[2].parse::<u32>() {
        Ok(n) if !negative => n,
        Ok(_) => 0,
        // more digits than u32 holds
        Err(_) => if negative { 0 } else { u32::MAX },
    };

    parsed.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

/// What an override renderer gets to see.
pub struct OgContext<'a> {
    pub segments: &'a [String],
    pub query: &'a QueryString,
    pub dimensions: Dimensions,
    pub store: &'a PostStore,
    pub site: &'a SiteIdentity,
}

/// `/posts//hello-world/` and `posts/hello-world` give the same segments.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_site() -> SiteIdentity {
    SiteIdentity {
        name: "Simon Emanuel Schmid".to_string(),
        handle: "ses.eth".to_string(),
        domain: "schmid.io".to_string(),
        description: "Personal website and blog - Blogosphere 2.0".to_string(),
        tagline: "blogosphere 2.0".to_string(),
    }
}
