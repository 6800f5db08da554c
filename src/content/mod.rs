use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;

use crate::content::front_matter::{parse_front_matter, split_front_matter};

pub mod front_matter;
pub mod markup;
pub mod post_store;

/// One blog entry, as found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// Kept as written in the front matter, see `text_utils::parse_post_date`.
    pub date: String,
    pub description: String,
    /// Comma separated, e.g. `nft, nouns`.
    pub tag: String,
    pub author: String,
    pub content: String,
}

impl Post {
    pub fn from_string(slug: &str, raw: &str) -> io::Result<Post> {
        let (yaml, body) = split_front_matter(raw)?;
        let fm = match yaml {
            Some(yaml) => parse_front_matter(yaml)?,
            None => Default::default(),
        };

        Ok(Post {
            slug: slug.to_string(),
            title: fm.title,
            date: fm.date,
            description: fm.description,
            tag: fm.tag,
            author: fm.author,
            content: body.to_string(),
        })
    }

    pub fn categories(&self) -> Vec<String> {
        split_tags(&self.tag)
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}, author={}, tag={}\ntitle={}",
               self.slug,
               self.date,
               self.author,
               self.tag,
               self.title,
        )
    }
}

pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
