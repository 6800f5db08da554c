use std::io;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::Post;
use crate::text_utils::format_rfc2822;
use crate::view::RSS_PATH;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:atom="http://www.w3.org/2005/Atom" version="2.0">
<channel>
  <title>Simon Emanuel Schmid</title>
  <description>Personal blog - Blogosphere 2.0</description>
  <link>https://www.ses.box</link>
  <atom:link href="https://www.ses.box/api/rss" rel="self" type="application/rss+xml"/>
  <language>en</language>
  <pubDate>Fri, 24 Oct 2025 10:00:00 +0000</pubDate>
  <item>
    <title>I minted a Noun</title>
    <description>...</description>
    <link>https://www.ses.box/posts/nouns</link>
    <guid isPermaLink="true">https://www.ses.box/posts/nouns</guid>
    <pubDate>Fri, 24 Oct 2025 00:00:00 +0000</pubDate>
    <category>nft</category>
    <category>nouns</category>
    <dc:creator>Simon Emanuel Schmid</dc:creator>
    <content:encoded><![CDATA[...]]></content:encoded>
  </item>
</channel>
</rss>
*/

const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
const NS_CONTENT: &str = "http://purl.org/rss/1.0/modules/content/";
const NS_ATOM: &str = "http://www.w3.org/2005/Atom";

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
    pub language: &'a str,
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

impl<'a> RssChannel<'a> {
    /// `pub_date` is the build time of the feed.
    pub fn render(&self, posts: &[Post], pub_date: DateTime<Utc>) -> io::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("xmlns:dc", NS_DC));
        rss.push_attribute(("xmlns:content", NS_CONTENT));
        rss.push_attribute(("xmlns:atom", NS_ATOM));
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "description", self.ch_desc)?;
        push_text(&mut writer, "link", self.ch_link)?;

        let feed_url = full_link(self.ch_link, RSS_PATH);
        let mut self_link = BytesStart::new("atom:link");
        self_link.push_attribute(("href", feed_url.as_str()));
        self_link.push_attribute(("rel", "self"));
        self_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(self_link))?;

        push_text(&mut writer, "language", self.language)?;
        push_text(&mut writer, "pubDate", &pub_date.to_rfc2822())?;

        for post in posts {
            self.push_item(&mut writer, post)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }

    fn push_item(&self, writer: &mut XmlWriter, post: &Post) -> io::Result<()> {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        push_text(writer, "title", &post.title)?;
        push_text(writer, "description", &post.description)?;

        let link = full_link(self.ch_link, &format!("/posts/{}", post.slug));
        push_text(writer, "link", &link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&link)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        // a date we cannot read is left out rather than guessed
        if let Some(pub_date) = format_rfc2822(&post.date) {
            push_text(writer, "pubDate", &pub_date)?;
        }

        for category in post.categories() {
            push_text(writer, "category", &category)?;
        }

        if !post.author.is_empty() {
            push_text(writer, "dc:creator", &post.author)?;
        }

        push_cdata(writer, "content:encoded", &post.content)?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
        Ok(())
    }
}

fn full_link(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn push_text(writer: &mut XmlWriter, tag: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut XmlWriter, tag: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    // `]]>` inside the text ends up split over two sections
    for cdata in BytesCData::escaped(text) {
        writer.write_event(Event::CData(cdata))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
