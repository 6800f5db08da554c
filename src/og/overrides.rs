use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::og::layout::Node;
use crate::og::template::{post_card, site_card, PostCardVariant};
use crate::og::OgContext;

pub const ROOT_KEY: &str = "index";

/// Custom renderer owning the whole image for one route.
pub type OgRenderer = fn(&OgContext) -> Node;

lazy_static! {
    static ref OVERRIDE_RENDERERS: HashMap<&'static str, OgRenderer> = {
        let mut renderers: HashMap<&'static str, OgRenderer> = HashMap::new();
        renderers.insert("posts/nouns", nouns_card);
        renderers
    };
}

pub fn route_key(segments: &[String]) -> String {
    if segments.is_empty() {
        ROOT_KEY.to_string()
    } else {
        segments.join("/")
    }
}

pub fn get_override_renderer(segments: &[String]) -> Option<OgRenderer> {
    OVERRIDE_RENDERERS.get(route_key(segments).as_str()).copied()
}

fn nouns_card(ctx: &OgContext) -> Node {
    match ctx.store.get_post("nouns") {
        Some(post) => post_card(&post, PostCardVariant::Nouns, ctx.site),
        None => site_card(ctx.site),
    }
}
