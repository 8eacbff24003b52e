//! Per-dimension source URLs and their normalisation.

use dahan_core::dimension::Dimension;
use serde::{Deserialize, Serialize};

/// Marker left in URLs of an unconfigured install.
const PLACEHOLDER_MARKER: &str = "YOUR_";

/// One optional URL per master-data dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceUrls {
  pub spirit:    Option<String>,
  pub adversary: Option<String>,
  pub scenario:  Option<String>,
  pub aspect:    Option<String>,
}

impl SourceUrls {
  pub fn get(&self, dimension: Dimension) -> Option<&str> {
    match dimension {
      Dimension::Spirit => self.spirit.as_deref(),
      Dimension::Adversary => self.adversary.as_deref(),
      Dimension::Scenario => self.scenario.as_deref(),
      Dimension::Aspect => self.aspect.as_deref(),
    }
  }

  /// The fetchable URL for `dimension`, or `None` if it is unset or still a
  /// placeholder.
  pub fn resolve(&self, dimension: Dimension) -> Option<String> {
    self
      .get(dimension)
      .filter(|url| !is_placeholder(url))
      .map(export_url)
  }
}

/// An empty URL, or one still carrying the `YOUR_` template marker.
pub fn is_placeholder(url: &str) -> bool {
  let url = url.trim();
  url.is_empty() || url.contains(PLACEHOLDER_MARKER)
}

/// Rewrite a sheet tab's edit link into its CSV export link. Anything else is
/// returned trimmed but otherwise unchanged.
pub fn export_url(url: &str) -> String {
  url.trim().replacen("/edit?gid=", "/export?format=csv&gid=", 1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholders_are_detected() {
    assert!(is_placeholder(""));
    assert!(is_placeholder("   "));
    assert!(is_placeholder("https://docs.google.com/spreadsheets/d/YOUR_SHEET_ID/export"));
    assert!(!is_placeholder("https://example.com/spirits.csv"));
  }

  #[test]
  fn edit_links_become_export_links() {
    assert_eq!(
      export_url(" https://docs.google.com/spreadsheets/d/abc/edit?gid=42 "),
      "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=42"
    );
    assert_eq!(export_url("https://example.com/a.csv"), "https://example.com/a.csv");
  }

  #[test]
  fn resolve_skips_missing_and_placeholder_urls() {
    let urls = SourceUrls {
      spirit: Some("https://example.com/s/edit?gid=1".into()),
      adversary: Some("YOUR_ADVERSARY_URL".into()),
      ..Default::default()
    };
    assert_eq!(
      urls.resolve(Dimension::Spirit).as_deref(),
      Some("https://example.com/s/export?format=csv&gid=1")
    );
    assert_eq!(urls.resolve(Dimension::Adversary), None);
    assert_eq!(urls.resolve(Dimension::Aspect), None);
  }
}
