use std::io;
use std::io::ErrorKind;

use markdown::Options;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comment {
    Html,
    Mdx,
}

impl Comment {
    fn closing(self) -> &'static str {
        match self {
            Comment::Html => "-->",
            Comment::Mdx => "*/}",
        }
    }
}

/// Removes HTML (`<!-- -->`) and MDX (`{/* */}`) comments and top level
/// `import`/`export` statements. Fenced code blocks and inline code spans are
/// kept as written.
pub fn strip_mdx(md_post: &str) -> io::Result<String> {
    let mut res = String::with_capacity(md_post.len());
    let mut in_fence = false;
    let mut comment = None;

    for line in md_post.split_inclusive('\n') {
        if comment.is_none() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                res.push_str(line);
                continue;
            }
            if in_fence {
                res.push_str(line);
                continue;
            }
            if line.starts_with("import ") || line.starts_with("export ") {
                continue;
            }
        }
        comment = strip_line(line, comment, &mut res);
    }

    match comment {
        Some(_) => Err(io::Error::new(ErrorKind::InvalidData, "Error finding end of comment")),
        None => Ok(res),
    }
}

/// Copies `line` without its comments. Returns the comment still open at the end of the line.
fn strip_line(line: &str, mut comment: Option<Comment>, out: &mut String) -> Option<Comment> {
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        if let Some(open) = comment {
            match rest.find(open.closing()) {
                Some(end) => {
                    rest = &rest[end + open.closing().len()..];
                    comment = None;
                }
                None => return comment,
            }
        } else if ch == '`' {
            let ticks = rest.len() - rest.trim_start_matches('`').len();
            let delimiter = &rest[..ticks];
            let span_len = match rest[ticks..].find(delimiter) {
                Some(close) => 2 * ticks + close,
                // no closing run, the backticks are plain text
                None => ticks,
            };
            out.push_str(&rest[..span_len]);
            rest = &rest[span_len..];
        } else if rest.starts_with("<!--") {
            comment = Some(Comment::Html);
            rest = &rest["<!--".len()..];
        } else if rest.starts_with("{/*") {
            comment = Some(Comment::Mdx);
            rest = &rest["{/*".len()..];
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    comment
}

/// Compiles a post body to HTML. JSX is not evaluated, the body is read as
/// GitHub flavoured markdown.
pub fn compile(md_text: &str) -> io::Result<String> {
    let buf = strip_mdx(md_text)?;
    match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}
