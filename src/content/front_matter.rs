use std::io;
use std::io::ErrorKind;

use serde_yaml_ng::{Mapping, Value};

const DELIMITER: &str = "---";

#[derive(Debug, Default, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub description: String,
    pub tag: String,
    pub author: String,
}

/// Splits `---` delimited YAML from the body. A file without an opening
/// delimiter has no metadata and is all body.
pub fn split_front_matter(raw: &str) -> io::Result<(Option<&str>, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let first = match lines.next() {
        Some(line) if line.trim_end() == DELIMITER => line,
        _ => return Ok((None, raw)),
    };

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let yaml = &raw[yaml_start..offset];
            let body = &raw[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(io::Error::new(ErrorKind::InvalidData, "End of front matter is missing"))
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter()
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(_) => String::new(),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    }
}

fn get_field(mapping: &Mapping, key: &str) -> String {
    mapping.get(key).map(scalar_to_string).unwrap_or_default()
}

pub fn parse_front_matter(yaml: &str) -> io::Result<FrontMatter> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let mapping: Mapping = match serde_yaml_ng::from_str(yaml) {
        Ok(mapping) => mapping,
        Err(e) => return Err(io::Error::new(ErrorKind::InvalidData, format!("Invalid front matter: {}", e))),
    };

    Ok(FrontMatter {
        title: get_field(&mapping, "title"),
        date: get_field(&mapping, "date"),
        description: get_field(&mapping, "description"),
        tag: get_field(&mapping, "tag"),
        author: get_field(&mapping, "author"),
    })
}
