use crate::content::Post;
use crate::og::layout::{Align, Flex, GradientDirection, Justify, Node, Paint, Pill, Text};
use crate::og::{OgPayload, SiteIdentity, SITE_ACCENT};
use crate::text_utils::capitalize;

const INK: &str = "#0f172a";
const HEADLINE: &str = "#111827";
const MUTED: &str = "#6b7280";
const FADED: &str = "#9ca3af";

/// Hand authored card variants of the per post image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostCardVariant {
    Nouns,
    Standard,
}

impl PostCardVariant {
    pub fn for_slug(slug: &str) -> Self {
        match slug {
            "nouns" => PostCardVariant::Nouns,
            _ => PostCardVariant::Standard,
        }
    }
}

fn soft_gradient(direction: GradientDirection) -> Paint {
    Paint::Gradient {
        direction,
        from: "#f9fafb".to_string(),
        to: "#e5e7eb".to_string(),
    }
}

fn site_name(site: &SiteIdentity, size: f32) -> Text {
    Text::new(site.name.as_str(), size)
        .color(FADED)
        .initials(HEADLINE)
}

/// The generic card: identity bar, badge/title/description, footer bar.
pub fn payload_card(payload: &OgPayload, site: &SiteIdentity) -> Node {
    let accent = payload.accent.as_deref().unwrap_or(SITE_ACCENT);

    let top_bar = Flex::row()
        .justify(Justify::SpaceBetween)
        .align(Align::Center)
        .child(Text::new(site.name.as_str(), 28.0).uppercase().letter_spacing(6.0).color("#64748b"))
        .child(Text::new(site.handle.as_str(), 28.0).uppercase().letter_spacing(6.0).color("#64748b"));

    let badge = payload.badge.as_ref().map(|badge| {
        Text::new(badge.as_str(), 24.0)
            .weight(600)
            .color(accent)
            .pill(Pill {
                fill: accent.to_string(),
                opacity: 0.08,
                padding_x: 24.0,
                padding_y: 12.0,
            })
    });

    let description = payload.description.as_ref().map(|description| {
        Text::new(description.as_str(), 30.0)
            .line_height(1.35)
            .color("#334155")
            .max_width(920.0)
    });

    let body = Flex::column()
        .gap(32.0)
        .child_opt(badge)
        .child(Text::new(payload.title.as_str(), 72.0).weight(700).line_height(1.05).color(INK).max_width(1000.0))
        .child_opt(description);

    let footer_text = payload.footer.as_deref().unwrap_or(site.domain.as_str());
    let footer = Flex::row()
        .justify(Justify::SpaceBetween)
        .align(Align::Center)
        .child(Text::new(site.tagline.as_str(), 28.0).color("#475569"))
        .child(Text::new(footer_text, 28.0).color("#475569"));

    Flex::column()
        .justify(Justify::SpaceBetween)
        .align(Align::Stretch)
        .padding(72.0)
        .radius(32.0)
        .background(Paint::Gradient {
            direction: GradientDirection::Diagonal,
            from: "#f8fafc".to_string(),
            to: "#e2e8f0".to_string(),
        })
        .child(top_bar)
        .child(body)
        .child(footer)
        .into()
}

/// `nft, nouns` reads as `NFT, Nouns`.
fn display_tags(post: &Post) -> String {
    post.categories().iter()
        .map(|t| if t.chars().count() <= 3 { t.to_uppercase() } else { capitalize(t) })
        .collect::<Vec<_>>()
        .join(", ")
}

fn date_line(post: &Post, tags: String, size: f32, gap: f32) -> Flex {
    Flex::row()
        .gap(gap)
        .child(Text::new(post.date.as_str(), size).color(MUTED))
        .child(Text::new("•", size).color(MUTED))
        .child(Text::new(tags, size).color(MUTED))
}

pub fn post_card(post: &Post, variant: PostCardVariant, site: &SiteIdentity) -> Node {
    match variant {
        PostCardVariant::Nouns => {
            let details = Flex::column()
                .gap(20.0)
                .child(Text::new(post.title.as_str(), 52.0).weight(700).color(HEADLINE).max_width(700.0))
                .child(date_line(post, display_tags(post), 24.0, 15.0));

            let main = Flex::row()
                .justify(Justify::Center)
                .align(Align::Center)
                .gap(40.0)
                .child(Text::new("⌐◨-◨", 120.0).color(HEADLINE))
                .child(details);

            Flex::column()
                .justify(Justify::Center)
                .align(Align::Center)
                .gap(40.0)
                .padding(60.0)
                .background(soft_gradient(GradientDirection::Diagonal))
                .child(site_name(site, 32.0))
                .child(main)
                .into()
        }
        PostCardVariant::Standard => {
            Flex::column()
                .justify(Justify::Center)
                .align(Align::Center)
                .gap(40.0)
                .padding(80.0)
                .background(soft_gradient(GradientDirection::Down))
                .child(site_name(site, 36.0))
                .child(Text::new(post.title.as_str(), 52.0).weight(700).color(HEADLINE).max_width(900.0).centered())
                .child(date_line(post, post.tag.clone(), 28.0, 20.0))
                .into()
        }
    }
}

/// The fixed card used for the site itself.
pub fn site_card(site: &SiteIdentity) -> Node {
    Flex::column()
        .justify(Justify::Center)
        .align(Align::Center)
        .gap(20.0)
        .background(soft_gradient(GradientDirection::Down))
        .child(site_name(site, 72.0))
        .child(Text::new(capitalize(&site.tagline), 36.0).color(MUTED))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::og::test_site;

    fn post(slug: &str, tag: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: "I minted a Noun".to_string(),
            date: "2025-10-24".to_string(),
            description: "".to_string(),
            tag: tag.to_string(),
            author: "Simon".to_string(),
            content: "".to_string(),
        }
    }

    #[test]
    fn test_variant_for_slug() {
        assert_eq!(PostCardVariant::for_slug("nouns"), PostCardVariant::Nouns);
        assert_eq!(PostCardVariant::for_slug("hello-world"), PostCardVariant::Standard);
        assert_eq!(PostCardVariant::for_slug("Nouns"), PostCardVariant::Standard);
    }

    #[test]
    fn test_display_tags() {
        assert_eq!(display_tags(&post("nouns", "nft, nouns")), "NFT, Nouns");
    }

    #[test]
    fn test_payload_card_contents() {
        let payload = OgPayload {
            title: "Hello".to_string(),
            description: None,
            badge: Some("blogosphere-2".to_string()),
            footer: None,
            accent: Some("#1d4ed8".to_string()),
        };
        let svg = payload_card(&payload, &test_site()).to_svg(1200, 630, "sans-serif");
        assert!(svg.contains(">Hello<"));
        assert!(svg.contains(">blogosphere-2<"));
        assert!(svg.contains(r##"fill="#1d4ed8" fill-opacity="0.08""##));
        assert!(svg.contains(">SIMON EMANUEL SCHMID<"));
        assert!(svg.contains(">SES.ETH<"));
        // no footer in the payload, the domain is shown
        assert!(svg.contains(">schmid.io<"));
    }

    #[test]
    fn test_post_cards() {
        let site = test_site();
        let nouns = post_card(&post("nouns", "nft, nouns"), PostCardVariant::Nouns, &site)
            .to_svg(1200, 630, "sans-serif");
        assert!(nouns.contains("⌐◨-◨"));
        assert!(nouns.contains(">NFT, Nouns<"));

        let standard = post_card(&post("other", "nft, nouns"), PostCardVariant::Standard, &site)
            .to_svg(1200, 630, "sans-serif");
        assert!(!standard.contains("⌐◨-◨"));
        assert!(standard.contains(">nft, nouns<"));
        assert!(standard.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_site_card() {
        let svg = site_card(&test_site()).to_svg(1200, 630, "sans-serif");
        assert!(svg.contains(">Blogosphere 2.0<"));
    }
}
