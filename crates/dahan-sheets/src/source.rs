//! [`SheetSource`], the HTTP implementation of [`MasterDataSource`].

use std::time::Duration;

use dahan_core::{SourceError, dimension::Dimension, source::MasterDataSource};
use reqwest::Client;

use crate::{Result, urls::SourceUrls};

/// Fetches each dimension's payload from its configured sheet URL.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SheetSource {
  client: Client,
  urls:   SourceUrls,
}

impl SheetSource {
  /// Build a source over `urls`. Without a `timeout` the transport default
  /// applies.
  pub fn new(urls: SourceUrls, timeout: Option<Duration>) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self { client: builder.build()?, urls })
  }

  pub fn urls(&self) -> &SourceUrls { &self.urls }
}

impl MasterDataSource for SheetSource {
  fn locate(&self, dimension: Dimension) -> Option<String> { self.urls.resolve(dimension) }

  async fn fetch<'a>(
    &'a self,
    dimension: Dimension,
    location: &'a str,
  ) -> Result<String, SourceError> {
    let network = |e: reqwest::Error| SourceError::Network { dimension, message: e.to_string() };

    let resp = self.client.get(location).send().await.map_err(network)?;
    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(%dimension, %status, "master data fetch rejected");
      return Err(SourceError::Http { dimension, status: status.as_u16() });
    }

    let body = resp.text().await.map_err(network)?;
    tracing::debug!(%dimension, bytes = body.len(), "fetched master data");
    Ok(body)
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;

  fn source(spirit: String) -> SheetSource {
    let urls = SourceUrls { spirit: Some(spirit), ..Default::default() };
    SheetSource::new(urls, Some(Duration::from_secs(5))).expect("client")
  }

  #[tokio::test]
  async fn fetches_the_export_form_of_an_edit_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/sheet/export"))
      .and(query_param("format", "csv"))
      .and(query_param("gid", "7"))
      .respond_with(ResponseTemplate::new(200).set_body_string("spirit_name\nRiver\n"))
      .expect(1)
      .mount(&server)
      .await;

    let src = source(format!("{}/sheet/edit?gid=7", server.uri()));
    let location = src.locate(Dimension::Spirit).expect("configured");
    let body = src.fetch(Dimension::Spirit, &location).await.unwrap();

    assert_eq!(body, "spirit_name\nRiver\n");
  }

  #[tokio::test]
  async fn non_success_status_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let src = source(format!("{}/spirits.csv", server.uri()));
    let err = src
      .fetch(Dimension::Spirit, &format!("{}/spirits.csv", server.uri()))
      .await
      .unwrap_err();

    assert_eq!(err, SourceError::Http { dimension: Dimension::Spirit, status: 404 });
  }

  #[tokio::test]
  async fn unreachable_host_is_a_network_error() {
    // Nothing listens on port 1.
    let uri = "http://127.0.0.1:1/spirits.csv";
    let src = source(uri.to_owned());
    let err = src.fetch(Dimension::Adversary, uri).await.unwrap_err();

    assert!(matches!(err, SourceError::Network { dimension: Dimension::Adversary, .. }));
  }

  #[test]
  fn unconfigured_dimensions_have_no_location() {
    let src = SheetSource::new(SourceUrls::default(), None).unwrap();
    assert_eq!(src.locate(Dimension::Scenario), None);
  }
}
