use maud::{html, Markup};

use crate::config::Site;
use crate::content::Post;
use crate::og::Dimensions;
use crate::view::{page_shell, PageMeta};

#[derive(Debug, PartialEq)]
pub struct PreviewRoute {
    pub label: String,
    pub path: String,
    pub og_path: String,
}

/// The homepage first, then every post in listing order.
pub fn preview_routes(posts: &[Post]) -> Vec<PreviewRoute> {
    let mut routes = vec![PreviewRoute {
        label: "Homepage".to_string(),
        path: "/".to_string(),
        og_path: "/og".to_string(),
    }];

    routes.extend(posts.iter().map(|post| PreviewRoute {
        label: format!("Post: {}", post.title),
        path: format!("/posts/{}", post.slug),
        og_path: format!("/og/posts/{}", post.slug),
    }));

    routes
}

fn preview_meta(title: &str) -> PageMeta<'_> {
    PageMeta {
        robots: "noindex",
        ..PageMeta::website(title, "Open Graph image preview")
    }
}

/// `query` is appended as is to every image URL, e.g. `?width=800&height=400`.
pub fn render_preview_list(site: &Site, routes: &[PreviewRoute], query: &str) -> Markup {
    let body = html! {
        div class="page" {
            h1 { "OG Image Preview" }
            p { "Generated Open Graph images for every page of " (site.domain) "." }

            @for route in routes {
                section class="preview" {
                    h2 { (route.label) }
                    p { "Path: " code { (route.og_path) } }
                    img src={ (route.og_path) (query) } alt={ "OG image for " (route.path) } loading="lazy";
                    p class="actions" {
                        a href=(route.path) { "View page" }
                        a href={ (route.og_path) (query) } { "Open image" }
                        a href={ "/og-preview" (route.path.trim_end_matches('/')) (query) } { "Inspect" }
                    }
                }
            }
        }
    };

    page_shell(site, &preview_meta("OG Preview"), body)
}

/// Preview of a single path at the requested size.
pub fn render_path_preview(site: &Site, segments: &[String], dimensions: Dimensions) -> Markup {
    let path = format!("/{}", segments.join("/"));
    let og_path = if segments.is_empty() {
        "/og".to_string()
    } else {
        format!("/og{}", path)
    };
    let image = format!("{}?width={}&height={}", og_path, dimensions.width, dimensions.height);
    let title = format!("OG Preview - {}", path);

    let body = html! {
        div class="page" {
            h1 { (title) }
            section class="preview" {
                h2 { "Preview (" (dimensions.width) "×" (dimensions.height) ")" }
                p { "Path: " code { (og_path) } }
                img src=(image) alt={ "OG image for " (path) } width=(dimensions.width) height=(dimensions.height);
                p class="actions" {
                    a href=(path) { "View page" }
                    a href=(image) { "Open image" }
                    a href="/og-preview" { "All pages" }
                }
            }
        }
    };

    page_shell(site, &preview_meta(&title), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::test_site_config;

    fn post(slug: &str, title: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            date: "2025-10-24".to_string(),
            description: "".to_string(),
            tag: "".to_string(),
            author: "".to_string(),
            content: "".to_string(),
        }
    }

    #[test]
    fn test_preview_routes() {
        let routes = preview_routes(&[post("nouns", "I minted a Noun")]);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].og_path, "/og");
        assert_eq!(routes[1], PreviewRoute {
            label: "Post: I minted a Noun".to_string(),
            path: "/posts/nouns".to_string(),
            og_path: "/og/posts/nouns".to_string(),
        });
    }

    #[test]
    fn test_render_preview_list() {
        let routes = preview_routes(&[post("nouns", "I minted a Noun")]);
        let page = render_preview_list(&test_site_config(), &routes, "").into_string();
        assert!(page.contains(r#"<img src="/og" alt="OG image for /" loading="lazy">"#));
        assert!(page.contains(r#"<img src="/og/posts/nouns" alt="OG image for /posts/nouns" loading="lazy">"#));
        assert!(page.contains(r#"<a href="/posts/nouns">View page</a>"#));
        assert!(page.contains(r#"<a href="/og-preview/posts/nouns">Inspect</a>"#));
    }

    #[test]
    fn test_render_preview_list_forwards_query() {
        let routes = preview_routes(&[]);
        let page = render_preview_list(&test_site_config(), &routes, "?width=800&height=400").into_string();
        assert!(page.contains(r#"<img src="/og?width=800&amp;height=400""#));
        assert!(page.contains(r#"<a href="/og?width=800&amp;height=400">Open image</a>"#));
    }

    #[test]
    fn test_render_path_preview() {
        let segments = vec!["posts".to_string(), "nouns".to_string()];
        let page = render_path_preview(&test_site_config(), &segments, Dimensions { width: 800, height: 418 }).into_string();
        assert!(page.contains("<title>OG Preview - /posts/nouns</title>"));
        assert!(page.contains(r#"src="/og/posts/nouns?width=800&amp;height=418""#));
        assert!(page.contains("Preview (800×418)"));

        let page = render_path_preview(&test_site_config(), &[], Dimensions::default()).into_string();
        assert!(page.contains(r#"src="/og?width=1200&amp;height=630""#));
    }
}
