//! HTML pages, rendered with maud, and the RSS channel.
//!
//! Every dynamic value goes through maud's escaping. The only pre-escaped
//! input is the compiled post body and the stylesheet.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::Site;

pub mod home_renderer;
pub mod post_renderer;
pub mod preview_renderer;
pub mod rss_renderer;

pub const RSS_PATH: &str = "/api/rss";

pub const PAGE_CSS: &str = r#"
body { font-family: Figtree, "Inter", system-ui, sans-serif; color: #111827; margin: 0; }
.page { margin: 2rem 1rem; max-width: 48rem; }
.site-name { font-size: 3.75rem; font-weight: 700; line-height: 0.9; color: #9ca3af; margin: 0; }
.site-name.small { font-size: 1.25rem; }
.site-name .initial { color: #111827; }
a.home-link { text-decoration: none; }
.identity { margin: 1.5rem 0; font-size: 0.875rem; color: #4b5563; }
.identity a { color: inherit; text-decoration: none; }
.identity a:hover { text-decoration: underline; }
.count { font-weight: 600; }
.links { margin-top: 1.5rem; overflow: hidden; }
.links a { float: left; margin: 2px; padding: 4px; background: #e2e8f0; border: 1px solid #cbd5e1; color: inherit; text-decoration: none; }
.links a:hover { background: transparent; }
.links .note { color: #9ca3af; font-size: 0.75rem; }
h2 { font-size: 1.125rem; font-weight: 600; margin-top: 1.5rem; }
.posts a { text-decoration: underline; color: inherit; }
.prose { margin: 2rem 0; line-height: 1.7; }
.prose table { border-collapse: collapse; }
.prose th, .prose td { border: 1px solid #e5e7eb; padding: 4px 8px; }
.prose pre { background: #f3f4f6; padding: 1rem; overflow-x: auto; }
.preview { background: #fff; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.15); padding: 1.5rem; margin-bottom: 1.5rem; }
.preview img { width: 100%; border: 2px solid #d1d5db; border-radius: 4px; }
.preview .actions a { margin-right: 1rem; }
"#;

/// Head meta data shared by all pages.
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// `website` or `article`.
    pub og_type: &'a str,
    /// Absolute URL of the Open Graph image, if the page has one.
    pub image: Option<String>,
    pub published_time: Option<&'a str>,
    pub author: Option<&'a str>,
    pub robots: &'a str,
}

impl<'a> PageMeta<'a> {
    pub fn website(title: &'a str, description: &'a str) -> Self {
        PageMeta {
            title,
            description,
            og_type: "website",
            image: None,
            published_time: None,
            author: None,
            robots: "follow, index",
        }
    }
}

/// `https://www.ses.box/` + `/og` is `https://www.ses.box/og`.
pub fn absolute_url(site_url: &str, path: &str) -> String {
    format!("{}/{}", site_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub fn page_shell(site: &Site, meta: &PageMeta, body_content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(site.language.as_deref().unwrap_or("en")) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                meta name="robots" content=(meta.robots);

                meta property="og:site_name" content=(site.name);
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                meta property="og:type" content=(meta.og_type);
                @if let Some(ref image) = meta.image {
                    meta property="og:image" content=(image);
                }
                @if let Some(published_time) = meta.published_time {
                    meta property="article:published_time" content=(published_time);
                }
                @if let Some(author) = meta.author {
                    meta property="article:author" content=(author);
                    meta name="author" content=(author);
                }

                meta name="twitter:card" content="summary_large_image";
                @if let Some(ref twitter) = site.twitter {
                    meta name="twitter:site" content=(twitter);
                }
                meta name="twitter:title" content=(meta.title);
                meta name="twitter:description" content=(meta.description);
                @if let Some(ref image) = meta.image {
                    meta name="twitter:image" content=(image);
                }

                link rel="alternate" type="application/rss+xml" title="RSS" href=(RSS_PATH);
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (body_content)
            }
        }
    }
}

/// `Simon Emanuel Schmid` with every initial highlighted, one word per line.
pub fn site_name(name: &str) -> Markup {
    let words: Vec<(char, &str)> = name.split_whitespace()
        .filter_map(|word| {
            let mut chars = word.chars();
            chars.next().map(|first| (first, chars.as_str()))
        })
        .collect();

    html! {
        @for (i, (initial, rest)) in words.iter().enumerate() {
            span class="initial" { (initial) }
            (rest)
            @if i + 1 < words.len() {
                " " br;
            }
        }
    }
}

pub fn render_not_found(site: &Site) -> Markup {
    let meta = PageMeta {
        robots: "noindex",
        ..PageMeta::website("Not found", site.description.as_str())
    };

    let body = html! {
        div class="page" {
            a class="home-link" href="/" {
                header class="site-name small" { (site_name(&site.name)) }
            }
            main class="prose" {
                h1 { "404" }
                p { "This page could not be found." }
                a href="/" { "Back to " (site.domain) }
            }
        }
    };

    page_shell(site, &meta, body)
}

#[cfg(test)]
pub(crate) fn test_site_config() -> Site {
    Site {
        name: "Simon Emanuel Schmid".to_string(),
        handle: "ses.eth".to_string(),
        domain: "schmid.io".to_string(),
        description: "Personal website and blog - Blogosphere 2.0".to_string(),
        tagline: "blogosphere 2.0".to_string(),
        site_url: "https://www.ses.box".to_string(),
        language: None,
        handle_url: Some("https://app.ens.domains/ses.eth".to_string()),
        twitter: Some("@schmid_si".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("https://www.ses.box", "/og"), "https://www.ses.box/og");
        assert_eq!(absolute_url("https://www.ses.box/", "og/posts/nouns"), "https://www.ses.box/og/posts/nouns");
    }

    #[test]
    fn test_site_name() {
        let markup = site_name("Simon Emanuel Schmid").into_string();
        assert_eq!(markup, r#"<span class="initial">S</span>imon <br><span class="initial">E</span>manuel <br><span class="initial">S</span>chmid"#);
    }

    #[test]
    fn test_not_found() {
        let page = render_not_found(&test_site_config()).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("could not be found"));
        assert!(page.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(page.contains(r#"<link rel="alternate" type="application/rss+xml" title="RSS" href="/api/rss">"#));
    }
}
