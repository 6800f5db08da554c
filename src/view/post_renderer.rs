use maud::{html, Markup, PreEscaped};

use crate::config::Site;
use crate::content::Post;
use crate::view::{absolute_url, page_shell, site_name, PageMeta};

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `rendered` is the already compiled post body.
pub fn render_post(site: &Site, post: &Post, rendered: &str) -> Markup {
    let title = non_empty(&post.title).unwrap_or(post.slug.as_str());
    let meta = PageMeta {
        title,
        description: post.description.as_str(),
        og_type: "article",
        image: Some(absolute_url(&site.site_url, &format!("/og/posts/{}", post.slug))),
        published_time: non_empty(&post.date),
        author: non_empty(&post.author),
        robots: "follow, index",
    };

    let body = html! {
        div class="page" {
            a class="home-link" href="/" {
                header class="site-name small" { (site_name(&site.name)) }
            }
            main class="prose" {
                (PreEscaped(rendered))
            }
        }
    };

    page_shell(site, &meta, body)
}
