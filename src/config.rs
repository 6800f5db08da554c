use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::og::SiteIdentity;

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub public_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub font_dir: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Site {
    pub name: String,
    pub handle: String,
    pub domain: String,
    pub description: String,
    pub tagline: String,
    pub site_url: String,
    pub language: Option<String>,
    /// Where the handle links to, e.g. its ENS page.
    pub handle_url: Option<String>,
    /// `twitter:site` account, with the `@`.
    pub twitter: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Link {
    pub label: String,
    pub url: String,
    pub note: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct Stats {
    pub api_url: String,
    /// Where the follower counts link to.
    pub profile_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub site: Site,
    #[serde(default)]
    pub links: Vec<Link>,
    pub paths: Paths,
    pub server: Server,
    pub stats: Option<Stats>,
    pub log: Option<Log>,
}

impl Site {
    pub fn identity(&self) -> SiteIdentity {
        SiteIdentity {
            name: self.name.clone(),
            handle: self.handle.clone(),
            domain: self.domain.clone(),
            description: self.description.clone(),
            tagline: self.tagline.clone(),
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let str_path = path.to_string_lossy();
    PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        public_dir: parse_path(cfg.paths.public_dir),
        posts_dir: parse_path(cfg.paths.posts_dir),
        font_dir: cfg.paths.font_dir.map(parse_path),
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
