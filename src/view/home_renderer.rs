use maud::{html, Markup};

use crate::config::{Link, Site};
use crate::content::Post;
use crate::stats::FollowStats;
use crate::view::{absolute_url, page_shell, site_name, PageMeta};

/// Everything the homepage shows. Counts that could not be fetched render as `?`.
pub struct HomePage<'a> {
    pub site: &'a Site,
    pub links: &'a [Link],
    pub stats: FollowStats,
    pub profile_url: Option<&'a str>,
    pub posts: &'a [Post],
}

fn follow_counts(stats: &FollowStats) -> Markup {
    html! {
        span class="count" { (stats.followers_display()) }
        " followers · "
        span class="count" { (stats.following_display()) }
        " following"
    }
}

impl HomePage<'_> {
    pub fn render(&self) -> Markup {
        let site = self.site;
        let mut meta = PageMeta::website(site.name.as_str(), site.description.as_str());
        meta.image = Some(absolute_url(&site.site_url, "/og"));

        let body = html! {
            div class="page" {
                h1 class="site-name" { (site_name(&site.name)) }

                div class="identity" {
                    @match site.handle_url {
                        Some(ref url) => { a href=(url) { (site.handle) } }
                        None => { span { (site.handle) } }
                    }
                    " · "
                    @match self.profile_url {
                        Some(url) => { a href=(url) { (follow_counts(&self.stats)) } }
                        None => { span { (follow_counts(&self.stats)) } }
                    }
                }

                @if !self.links.is_empty() {
                    nav class="links" {
                        @for link in self.links {
                            a href=(link.url) {
                                (link.label)
                                @if let Some(ref note) = link.note {
                                    " " span class="note" { (note) }
                                }
                            }
                        }
                    }
                }

                h2 { "Read" }
                ul class="posts" {
                    @for post in self.posts {
                        li {
                            a href={ "/posts/" (post.slug) } {
                                (post.title) " (" (post.date) ")"
                            }
                        }
                    }
                }
            }
        };

        page_shell(site, &meta, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::test_site_config;

    fn links() -> Vec<Link> {
        vec![
            Link { label: "GitHub".to_string(), url: "https://github.com/schmidsi".to_string(), note: None },
            Link { label: "X".to_string(), url: "https://x.com/schmidsi".to_string(), note: Some("Twitter".to_string()) },
        ]
    }

    fn post(slug: &str, title: &str, date: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            description: "".to_string(),
            tag: "".to_string(),
            author: "".to_string(),
            content: "".to_string(),
        }
    }

    #[test]
    fn test_render_home() {
        let site = test_site_config();
        let links = links();
        let posts = vec![
            post("nouns", "I minted a Noun", "2025-10-24"),
            post("hello-world", "Hello <world>", "2024-1-15"),
        ];
        let page = HomePage {
            site: &site,
            links: &links,
            stats: FollowStats { followers: Some(42), following: Some(7) },
            profile_url: Some("https://efp.app/ses.eth"),
            posts: &posts,
        }.render().into_string();

        assert!(page.contains(r#"<a href="https://app.ens.domains/ses.eth">ses.eth</a>"#));
        assert!(page.contains(r#"<span class="count">42</span> followers · <span class="count">7</span> following"#));
        assert!(page.contains(r#"<a href="https://x.com/schmidsi">X <span class="note">Twitter</span></a>"#));
        assert!(page.contains(r#"<a href="/posts/nouns">I minted a Noun (2025-10-24)</a>"#));
        assert!(page.contains("Hello &lt;world&gt; (2024-1-15)"));
        assert!(page.contains(r#"<meta property="og:image" content="https://www.ses.box/og">"#));

        let nouns = page.find("/posts/nouns").unwrap();
        let hello = page.find("/posts/hello-world").unwrap();
        assert!(nouns < hello);
    }

    #[test]
    fn test_render_home_unknown_stats() {
        let site = test_site_config();
        let posts = vec![post("nouns", "I minted a Noun", "2025-10-24")];
        let page = HomePage {
            site: &site,
            links: &[],
            stats: FollowStats::unknown(),
            profile_url: None,
            posts: &posts,
        }.render().into_string();

        assert!(page.contains(r#"<span class="count">?</span> followers · <span class="count">?</span> following"#));
        assert!(page.contains("I minted a Noun (2025-10-24)"));
        assert!(!page.contains(r#"class="links""#));
    }
}
