use std::io;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use maud::Markup;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::content::markup;
use crate::content::post_store::PostStore;
use crate::og::layout::Node;
use crate::og::render::OgImageRenderer;
use crate::og::resolver::resolve;
use crate::og::template::{post_card, site_card, PostCardVariant};
use crate::og::{path_segments, Dimensions, OgContext, SiteIdentity};
use crate::query_string::QueryString;
use crate::stats::StatsClient;
use crate::view::home_renderer::HomePage;
use crate::view::post_renderer::render_post;
use crate::view::preview_renderer::{preview_routes, render_path_preview, render_preview_list};
use crate::view::render_not_found;
use crate::view::rss_renderer::RssChannel;

const NO_STORE: &str = "no-store";
const IMAGE_CACHE: &str = "public, max-age=3600";
const FEED_CACHE: &str = "public, max-age=3600, s-maxage=3600";
const FORWARDED_QUERY: [&str; 2] = ["width", "height"];

/// Read only, shared by every request. Nothing in here is cached, posts are
/// read from disk on each request.
pub struct AppState {
    pub config: Config,
    pub site: SiteIdentity,
    pub store: PostStore,
    pub stats: StatsClient,
    pub renderer: OgImageRenderer,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let renderer = OgImageRenderer::new(config.paths.font_dir.as_deref());
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: Config, renderer: OgImageRenderer) -> Self {
        let site = config.site.identity();
        let store = PostStore::new(config.paths.posts_dir.clone());
        let api_url = config.stats.as_ref().map(|s| s.api_url.as_str());
        let stats = StatsClient::new(api_url, &config.site.handle);

        AppState {
            config,
            site,
            store,
            stats,
            renderer,
        }
    }
}

type SharedState = State<Arc<AppState>>;

fn internal_error(msg: String) -> Response {
    error!("{}", msg);
    (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
}

fn not_found_page(state: &AppState) -> Response {
    (StatusCode::NOT_FOUND, render_not_found(&state.config.site)).into_response()
}

async fn png_response(state: &AppState, node: Node, dimensions: Dimensions, cache_control: &'static str) -> Response {
    let renderer = state.renderer.clone();
    let rendered = tokio::task::spawn_blocking(move || renderer.render_png(&node, dimensions)).await;

    match rendered {
        Ok(Ok(png)) => (
            [(header::CONTENT_TYPE, "image/png"), (header::CACHE_CONTROL, cache_control)],
            png,
        ).into_response(),
        Ok(Err(e)) => internal_error(format!("Error rendering OG image: {}", e)),
        Err(e) => internal_error(format!("OG image task failed: {}", e)),
    }
}

async fn index(State(state): SharedState) -> Markup {
    // a failed stats call only turns the counts into `?`
    let stats = state.stats.fetch().await;
    let posts = state.store.list_posts();
    let config = &state.config;

    HomePage {
        site: &config.site,
        links: &config.links,
        stats,
        profile_url: config.stats.as_ref().and_then(|s| s.profile_url.as_deref()),
        posts: &posts,
    }.render()
}

async fn view_post(State(state): SharedState, Path(slug): Path<String>) -> Response {
    let Some(post) = state.store.get_post(&slug) else {
        debug!("Post {} not found", slug);
        return not_found_page(&state);
    };

    let rendered = match markup::compile(&post.content) {
        Ok(html) => html,
        Err(e) => return internal_error(format!("Error compiling post {}: {}", slug, e)),
    };

    render_post(&state.config.site, &post, &rendered).into_response()
}

async fn og_image(state: &AppState, segments: Vec<String>, raw_query: Option<String>) -> Response {
    let query = QueryString::from_opt(raw_query.as_deref());
    let dimensions = Dimensions::from_query(&query);

    let node = {
        let ctx = OgContext {
            segments: &segments,
            query: &query,
            dimensions,
            store: &state.store,
            site: &state.site,
        };
        resolve(&ctx).into_node(&state.site)
    };

    png_response(state, node, dimensions, NO_STORE).await
}

async fn og_root(State(state): SharedState, RawQuery(raw_query): RawQuery) -> Response {
    og_image(&state, vec![], raw_query).await
}

async fn og_path(State(state): SharedState, Path(path): Path<String>, RawQuery(raw_query): RawQuery) -> Response {
    og_image(&state, path_segments(&path), raw_query).await
}

async fn post_og_image(State(state): SharedState, Path(slug): Path<String>) -> Response {
    let Some(post) = state.store.get_post(&slug) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let node = post_card(&post, PostCardVariant::for_slug(&post.slug), &state.site);
    png_response(&state, node, Dimensions::default(), IMAGE_CACHE).await
}

async fn site_og_image(State(state): SharedState) -> Response {
    png_response(&state, site_card(&state.site), Dimensions::default(), IMAGE_CACHE).await
}

async fn og_preview(State(state): SharedState, RawQuery(raw_query): RawQuery) -> Markup {
    let query = QueryString::from_opt(raw_query.as_deref());
    let routes = preview_routes(&state.store.list_posts());
    render_preview_list(&state.config.site, &routes, &query.forward(&FORWARDED_QUERY))
}

async fn og_path_preview(State(state): SharedState, Path(path): Path<String>, RawQuery(raw_query): RawQuery) -> Markup {
    let query = QueryString::from_opt(raw_query.as_deref());
    render_path_preview(&state.config.site, &path_segments(&path), Dimensions::from_query(&query))
}

async fn rss(State(state): SharedState) -> Response {
    let site = &state.config.site;
    let channel = RssChannel {
        ch_title: &site.name,
        ch_link: &site.site_url,
        ch_desc: &site.description,
        language: site.language.as_deref().unwrap_or("en"),
    };

    match channel.render(&state.store.list_posts(), Utc::now()) {
        Ok(xml) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8"), (header::CACHE_CONTROL, FEED_CACHE)],
            xml,
        ).into_response(),
        Err(e) => internal_error(format!("Error rendering RSS feed: {}", e)),
    }
}

async fn not_found(State(state): SharedState) -> Response {
    not_found_page(&state)
}

pub fn router(state: Arc<AppState>) -> Router {
    // ServeDir never leaves public_dir, `..` components give a 404
    let public_files = ServeDir::new(&state.config.paths.public_dir);

    Router::new()
        .route("/", get(index))
        .route("/posts/{slug}", get(view_post))
        .route("/posts/{slug}/opengraph-image", get(post_og_image))
        .route("/opengraph-image", get(site_og_image))
        .route("/og", get(og_root))
        .route("/og/{*path}", get(og_path))
        .route("/og-preview", get(og_preview))
        .route("/og-preview/{*path}", get(og_path_preview))
        .route("/api/rss", get(rss))
        .nest_service("/public", public_files)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let bind_addr = format!("{}:{}", config.server.address, config.server.port);

    let state = Arc::new(AppState::new(config));
    for slug in state.store.list_slugs() {
        info!("Post: {}", slug);
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{HeaderMap, Request};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::parse_config;

    fn test_app(public_dir: &std::path::Path) -> Router {
        test_app_with(public_dir, "")
    }

    /// `extra` is appended to the config, e.g. a `[stats]` section.
    fn test_app_with(public_dir: &std::path::Path, extra: &str) -> Router {
        let posts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content/posts");
        let cfg = format!(r##"
[site]
name = "Simon Emanuel Schmid"
handle = "ses.eth"
domain = "schmid.io"
description = "Personal website and blog - Blogosphere 2.0"
tagline = "blogosphere 2.0"
site_url = "https://www.ses.box"

[paths]
public_dir = "{}"
posts_dir = "{}"

[server]
address = "127.0.0.1"
port = 8001
{}
"##, public_dir.display(), posts_dir.display(), extra);

        let config = parse_config(&cfg).unwrap();
        let state = AppState::with_renderer(config, OgImageRenderer::without_fonts());
        router(Arc::new(state))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    /// Serves `status` and `body` for every stats request, returns the API base url.
    async fn stats_api(status: StatusCode, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let api = Router::new()
            .route("/api/v1/users/{handle}/stats", axum::routing::get(move || async move { (status, body) }));
        tokio::spawn(async move { axum::serve(listener, api).await });
        format!("http://{}/api/v1", addr)
    }

    fn png_size(png: &[u8]) -> (u32, u32) {
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[tokio::test]
    async fn test_index() {
        let public = TempDir::new().unwrap();
        let (status, _, body) = get(test_app(public.path()), "/").await;
        assert_eq!(status, StatusCode::OK);

        // no [stats] section, counts are unknown but the posts are listed
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains(r#"<span class="count">?</span> followers"#));
        assert!(body.contains(r#"<a href="/posts/nouns">I minted a Noun (2025-10-24)</a>"#));
        assert!(body.contains(r#"<a href="/posts/hello-world">"#));
        assert!(!body.contains("/posts/_blogroll"));
    }

    #[tokio::test]
    async fn test_index_with_failing_stats() {
        let public = TempDir::new().unwrap();
        let api_url = stats_api(StatusCode::SERVICE_UNAVAILABLE, r#"{"followers_count": 42}"#).await;
        let app = test_app_with(public.path(), &format!("[stats]\napi_url = \"{}\"\n", api_url));

        let (status, _, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);

        let body = String::from_utf8(body).unwrap();
        assert!(body.contains(r#"<span class="count">?</span> followers"#));
        assert!(!body.contains(r#"<span class="count">42</span>"#));
        assert!(body.contains(r#"<a href="/posts/nouns">I minted a Noun (2025-10-24)</a>"#));
        assert!(body.contains(r#"<a href="/posts/hello-world">"#));
    }

    #[tokio::test]
    async fn test_index_with_stats() {
        let public = TempDir::new().unwrap();
        let api_url = stats_api(StatusCode::OK, r#"{"followers_count": 42, "following_count": "7"}"#).await;
        let app = test_app_with(public.path(), &format!("[stats]\napi_url = \"{}\"\n", api_url));

        let (_, _, body) = get(app, "/").await;
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains(r#"<span class="count">42</span> followers"#));
        assert!(body.contains(r#"<span class="count">7</span>"#));
    }

    #[tokio::test]
    async fn test_view_post() {
        let public = TempDir::new().unwrap();
        let (status, _, body) = get(test_app(public.path()), "/posts/hello-world").await;
        assert_eq!(status, StatusCode::OK);

        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("<h2>Why now</h2>"));
        assert!(body.contains(r#"<meta property="og:image" content="https://www.ses.box/og/posts/hello-world">"#));
        assert!(!body.contains("draft note"));
        assert!(!body.contains("Cross-posted"));
    }

    #[tokio::test]
    async fn test_view_missing_post() {
        let public = TempDir::new().unwrap();
        for uri in ["/posts/missing", "/posts/_blogroll", "/no/such/page"] {
            let (status, _, body) = get(test_app(public.path()), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert!(String::from_utf8(body).unwrap().contains("could not be found"));
        }
    }

    #[tokio::test]
    async fn test_og_image_dimensions() {
        let public = TempDir::new().unwrap();
        let (status, headers, body) = get(test_app(public.path()), "/og?width=100&height=5000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(png_size(&body), (320, 2000));

        let (_, _, body) = get(test_app(public.path()), "/og/posts/nouns?width=abc").await;
        assert_eq!(png_size(&body), (1200, 630));

        let (status, _, body) = get(test_app(public.path()), "/og/unknown/path?width=800px&height=418").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(png_size(&body), (800, 418));
    }

    #[tokio::test]
    async fn test_legacy_og_images() {
        let public = TempDir::new().unwrap();
        let (status, headers, body) = get(test_app(public.path()), "/posts/hello-world/opengraph-image?width=500").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(png_size(&body), (1200, 630));

        let (status, _, body) = get(test_app(public.path()), "/posts/missing/opengraph-image").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Not found");

        let (status, _, body) = get(test_app(public.path()), "/opengraph-image").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(png_size(&body), (1200, 630));
    }

    #[tokio::test]
    async fn test_rss() {
        let public = TempDir::new().unwrap();
        let (status, headers, body) = get(test_app(public.path()), "/api/rss").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/xml; charset=utf-8");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600, s-maxage=3600");

        let body = String::from_utf8(body).unwrap();
        assert!(body.contains("<category>nft</category><category>nouns</category>"));
        assert!(body.contains("<link>https://www.ses.box/posts/hello-world</link>"));
        assert!(body.find("/posts/nouns").unwrap() < body.find("/posts/hello-world").unwrap());
    }

    #[tokio::test]
    async fn test_og_preview() {
        let public = TempDir::new().unwrap();
        let (status, _, body) = get(test_app(public.path()), "/og-preview?width=800&height=400&t=1").await;
        assert_eq!(status, StatusCode::OK);
        let body = String::from_utf8(body).unwrap();
        assert!(body.contains(r#"src="/og/posts/nouns?width=800&amp;height=400""#));

        let (status, _, body) = get(test_app(public.path()), "/og-preview/posts/nouns?width=5000").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("Preview (2000×630)"));
    }

    #[tokio::test]
    async fn test_public_files() {
        let public = TempDir::new().unwrap();
        fs::write(public.path().join("style.css"), "body {}").unwrap();

        let (status, _, body) = get(test_app(public.path()), "/public/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body {}");

        let (status, _, _) = get(test_app(public.path()), "/public/../Cargo.toml").await;
        assert_ne!(status, StatusCode::OK);
    }
}
