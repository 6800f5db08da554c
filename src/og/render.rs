use std::io;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};
use tracing::info;

use crate::og::layout::Node;
use crate::og::Dimensions;

const FONT_FAMILY: &str = "Figtree, Roboto Mono, Inter, DejaVu Sans, sans-serif";

/// Rasterizes visual trees. The font database is loaded once and shared.
#[derive(Clone)]
pub struct OgImageRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl OgImageRenderer {
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            db.load_fonts_dir(dir);
        }
        info!("Loaded {} font faces for OG images", db.len());

        OgImageRenderer { fontdb: Arc::new(db) }
    }

    /// No fonts at all: shapes are drawn, text is not.
    pub fn without_fonts() -> Self {
        OgImageRenderer { fontdb: Arc::new(fontdb::Database::new()) }
    }

    pub fn render_svg(&self, node: &Node, dimensions: Dimensions) -> String {
        node.to_svg(dimensions.width, dimensions.height, FONT_FAMILY)
    }

    /// PNG bytes of exactly `dimensions`.
    pub fn render_png(&self, node: &Node, dimensions: Dimensions) -> io::Result<Vec<u8>> {
        let svg = self.render_svg(node, dimensions);

        let options = Options {
            fontdb: self.fontdb.clone(),
            ..Options::default()
        };
        let tree = match Tree::from_str(&svg, &options) {
            Ok(tree) => tree,
            Err(e) => return Err(io::Error::new(ErrorKind::InvalidData, format!("SVG parse error: {}", e))),
        };

        let mut pixmap = Pixmap::new(dimensions.width, dimensions.height)
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "Failed to create pixmap"))?;

        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        match pixmap.encode_png() {
            Ok(png) => Ok(png),
            Err(e) => Err(io::Error::new(ErrorKind::Other, format!("PNG encode error: {}", e))),
        }
    }
}
