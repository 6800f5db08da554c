use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Parser;

use blogosphere::content::post_store::{DRAFT_PREFIX, POST_EXTENSION};

/// Creates a new post with its front matter filled in.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// File name without extension. Derived from the title when missing
    #[arg(short, long)]
    slug: Option<String>,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,

    #[arg(short, long, default_value = "")]
    description: String,

    /// Comma separated, e.g. "nft, nouns"
    #[arg(long, default_value = "")]
    tag: String,

    /// Directory the post is written to
    #[arg(short, long, default_value = "content/posts")]
    posts_dir: PathBuf,

    /// Prefix the file with `_` so it is not published
    #[arg(long)]
    draft: bool,
}

fn get_author(args: &Args) -> String {
    if let Some(ref name) = args.author {
        return name.clone();
    }

    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}

/// `Zürich, 2024!` becomes `zurich-2024`.
fn slug_from_title(title: &str) -> String {
    let ascii = unidecode::unidecode(title).to_lowercase();

    let mut slug = String::new();
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Single quoted YAML scalar, quotes inside are doubled.
fn yaml_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn render_post(title: &str, date: &str, description: &str, tag: &str, author: &str) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", yaml_quote(title));
    let _ = writeln!(&mut buf, "date: {}", yaml_quote(date));
    let _ = writeln!(&mut buf, "description: {}", yaml_quote(description));
    let _ = writeln!(&mut buf, "tag: {}", yaml_quote(tag));
    let _ = writeln!(&mut buf, "author: {}", yaml_quote(author));
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "{{/* Replace with your content */}}");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "This is a body example");

    buf
}

fn post_file_name(slug: &str, draft: bool) -> String {
    if draft {
        format!("{}{}.{}", DRAFT_PREFIX, slug, POST_EXTENSION)
    } else {
        format!("{}.{}", slug, POST_EXTENSION)
    }
}

/// Never overwrites an existing post.
fn write_post(path: &Path, content: &str) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(anyhow!("{} already exists, not overwriting it", path.display()));
        }
        Err(e) => return Err(anyhow!("Error creating {}: {}", path.display(), e)),
    };
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let slug = match args.slug {
        Some(ref slug) => slug.clone(),
        None => slug_from_title(&args.title),
    };
    if slug.is_empty() {
        return Err(anyhow!("Could not derive a file name from \"{}\", please pass --slug", args.title));
    }

    let author = get_author(&args);
    let date = Local::now().format("%Y-%m-%d").to_string();
    let content = render_post(&args.title, &date, &args.description, &args.tag, &author);

    let path = args.posts_dir.join(post_file_name(&slug, args.draft));
    write_post(&path, &content)?;
    println!("Created {}", path.display());

    Ok(())
}
