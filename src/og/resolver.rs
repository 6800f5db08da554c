use crate::content::post_store::PostStore;
use crate::og::layout::Node;
use crate::og::overrides::get_override_renderer;
use crate::og::template::payload_card;
use crate::og::{OgContext, OgPayload, SiteIdentity, POST_ACCENT, SITE_ACCENT};
use crate::text_utils::{capitalize, format_display_date};

const POSTS_SECTION: &str = "posts";

#[derive(Debug, PartialEq)]
pub enum OgRender {
    /// Returned as is by an override renderer.
    Custom(Node),
    Payload(OgPayload),
}

impl OgRender {
    pub fn into_node(self, site: &SiteIdentity) -> Node {
        match self {
            OgRender::Custom(node) => node,
            OgRender::Payload(payload) => payload_card(&payload, site),
        }
    }
}

/// Overrides win, everything else gets a payload. Never fails.
pub fn resolve(ctx: &OgContext) -> OgRender {
    if let Some(renderer) = get_override_renderer(ctx.segments) {
        return OgRender::Custom(renderer(ctx));
    }

    OgRender::Payload(resolve_default_payload(ctx.segments, ctx.store, ctx.site))
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn site_payload(title: String, site: &SiteIdentity) -> OgPayload {
    OgPayload {
        title,
        description: non_empty(&site.description),
        badge: None,
        footer: Some(site.domain.clone()),
        accent: Some(SITE_ACCENT.to_string()),
    }
}

pub fn resolve_default_payload(segments: &[String], store: &PostStore, site: &SiteIdentity) -> OgPayload {
    if segments.is_empty() {
        return site_payload(site.name.clone(), site);
    }

    if segments[0] == POSTS_SECTION {
        if let Some(post) = segments.get(1).and_then(|slug| store.get_post(slug)) {
            // a post without a title still needs something on the card
            let title = non_empty(&post.title).unwrap_or_else(|| post.slug.clone());
            return OgPayload {
                title,
                description: non_empty(&post.description),
                badge: non_empty(&post.tag),
                footer: Some(format_display_date(&post.date)),
                accent: Some(POST_ACCENT.to_string()),
            };
        }
    }

    let fallback_title = segments.iter()
        .map(|s| capitalize(s))
        .collect::<Vec<_>>()
        .join(" / ");
    let title = non_empty(&fallback_title).unwrap_or_else(|| site.domain.clone());

    site_payload(title, site)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::og::test_site;
    use crate::og::Dimensions;
    use crate::query_string::QueryString;

    fn store() -> PostStore {
        PostStore::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content/posts"))
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_root_payload() {
        let payload = resolve_default_payload(&[], &store(), &test_site());
        assert_eq!(payload, OgPayload {
            title: "Simon Emanuel Schmid".to_string(),
            description: Some("Personal website and blog - Blogosphere 2.0".to_string()),
            badge: None,
            footer: Some("schmid.io".to_string()),
            accent: Some("#0f172a".to_string()),
        });
    }

    #[test]
    fn test_post_payload() {
        let payload = resolve_default_payload(&segments(&["posts", "hello-world"]), &store(), &test_site());
        assert_eq!(payload.title, "Hello world! The path to Blogosphere 2.0");
        assert_eq!(payload.badge.as_deref(), Some("blogosphere-2"));
        assert_eq!(payload.footer.as_deref(), Some("Jan 15, 2024"));
        assert_eq!(payload.accent.as_deref(), Some("#1d4ed8"));
    }

    #[test]
    fn test_fallback_payload() {
        let site = test_site();
        let payload = resolve_default_payload(&segments(&["unknown", "path"]), &store(), &site);
        assert_eq!(payload.title, "Unknown / Path");
        assert_eq!(payload.footer.as_deref(), Some("schmid.io"));
        assert_eq!(payload.accent.as_deref(), Some("#0f172a"));
        assert!(payload.badge.is_none());

        let payload = resolve_default_payload(&segments(&["posts", "missing"]), &store(), &site);
        assert_eq!(payload.title, "Posts / Missing");

        let payload = resolve_default_payload(&segments(&["posts"]), &store(), &site);
        assert_eq!(payload.title, "Posts");

        let payload = resolve_default_payload(&segments(&["posts", "_blogroll"]), &store(), &site);
        assert_eq!(payload.title, "Posts / _blogroll");

        let deep = segments(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(resolve_default_payload(&deep, &store(), &site).title, "A / B / C / D / E / F");
    }

    #[test]
    fn test_resolve_prefers_override() {
        let store = store();
        let site = test_site();
        let query = QueryString::default();

        let nouns = segments(&["posts", "nouns"]);
        let ctx = OgContext { segments: &nouns, query: &query, dimensions: Dimensions::default(), store: &store, site: &site };
        assert!(matches!(resolve(&ctx), OgRender::Custom(_)));

        let hello = segments(&["posts", "hello-world"]);
        let ctx = OgContext { segments: &hello, query: &query, dimensions: Dimensions::default(), store: &store, site: &site };
        match resolve(&ctx) {
            OgRender::Payload(payload) => assert_eq!(payload.badge.as_deref(), Some("blogosphere-2")),
            OgRender::Custom(_) => panic!("hello-world has no override"),
        }
    }
}
