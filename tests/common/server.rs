//! Mock site helpers

use super::fixtures::{ChartEntry, chart_page, detail_page};
use imdb_top_ratings::Config;
use std::path::Path;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `entries` as the chart at `/chart/top/`
pub async fn mount_chart(server: &MockServer, entries: &[ChartEntry]) {
    Mock::given(method("GET"))
        .and(path("/chart/top/"))
        .and(header("accept-language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_string(chart_page(entries)))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve a detail page at `href`, expecting exactly `times` requests
pub async fn mount_detail(server: &MockServer, href: &str, summary: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(href))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(summary)))
        .expect(times)
        .mount(server)
        .await;
}

/// Configuration pointing at `server` and writing into `dir`
pub fn config_for(server: &MockServer, dir: &Path) -> Config {
    let mut config = Config::default();
    config.scrape.base_url = server.uri();
    config.output.directory = dir.to_path_buf();
    config
}
