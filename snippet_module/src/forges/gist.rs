use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::config::ForgeConfig;
use crate::error::SnippetError;
use crate::patterns::SnippetReference;

use super::{FetchRequest, ForgeClient, ResolvedFile};

#[derive(Debug, Deserialize)]
struct GistPayload {
    #[serde(default)]
    files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    raw_url: String,
}

/// Anchor form of a gist file name: lowercase with `.` replaced by `-`.
pub fn slugify(file_name: &str) -> String {
    file_name.to_lowercase().replace('.', "-")
}

fn gist_url(config: &ForgeConfig, reference: &SnippetReference) -> String {
    if reference.revision_path.is_empty() {
        format!("{}/gists/{}", config.github_api_base, reference.repo)
    } else {
        format!(
            "{}/gists/{}/{}",
            config.github_api_base, reference.repo, reference.revision_path
        )
    }
}

fn headers(config: &ForgeConfig) -> Vec<(&'static str, String)> {
    let mut headers = vec![("Accept", "application/vnd.github.v3+json".to_string())];
    if let Some(token) = &config.github_token {
        headers.push(("Authorization", format!("token {}", token)));
    }
    headers
}

/// Real file name and raw URL of the gist file whose slug matches `slug`.
fn find_file<'a>(payload: &'a GistPayload, slug: &str) -> Option<(&'a str, &'a str)> {
    let wanted = slug.to_lowercase();
    payload
        .files
        .iter()
        .find(|(name, _)| slugify(name) == wanted)
        .map(|(name, file)| (name.as_str(), file.raw_url.as_str()))
}

pub(super) async fn resolve(
    client: &ForgeClient,
    reference: &SnippetReference,
) -> Result<Option<ResolvedFile>, SnippetError> {
    let config = client.config();
    let payload: GistPayload = client
        .get_json(&FetchRequest::new(gist_url(config, reference), headers(config)))
        .await?;

    let Some((file_name, raw_url)) = find_file(&payload, &reference.file_path) else {
        debug!(
            "gist {} has no file matching slug {}",
            reference.repo, reference.file_path
        );
        return Ok(None);
    };

    let contents = client
        .get_text(&FetchRequest::new(raw_url, Vec::new()))
        .await?;

    Ok(Some(ResolvedFile {
        display_path: file_name.to_string(),
        contents,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::Forge;

    fn payload(names: &[&str]) -> GistPayload {
        GistPayload {
            files: names
                .iter()
                .map(|name| {
                    (
                        name.to_string(),
                        GistFile {
                            raw_url: format!("https://gist.githubusercontent.com/raw/{}", name),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn slug_matches_mixed_case_file_name() {
        let payload = payload(&["README.md", "FuNkYnAmE.test.cpp"]);
        let (name, url) = find_file(&payload, "funkyname-test-cpp").unwrap();
        assert_eq!(name, "FuNkYnAmE.test.cpp");
        assert!(url.ends_with("/FuNkYnAmE.test.cpp"));
    }

    #[test]
    fn slug_comparison_ignores_case_on_both_sides() {
        let payload = payload(&["Test.PY"]);
        assert!(find_file(&payload, "TEST-py").is_some());
    }

    #[test]
    fn missing_slug_finds_nothing() {
        assert!(find_file(&payload(&["test.py"]), "other-py").is_none());
    }

    #[test]
    fn payload_parses_github_shape() {
        let json = r#"{
            "id": "abc",
            "files": {
                "test.py": {"filename": "test.py", "raw_url": "https://example.test/raw/test.py", "size": 22}
            }
        }"#;
        let parsed: GistPayload = serde_json::from_str(json).unwrap();
        assert_eq!(find_file(&parsed, "test-py").unwrap().1, "https://example.test/raw/test.py");
    }

    #[test]
    fn revision_is_appended_when_present() {
        let mut reference = SnippetReference {
            forge: Forge::Gist,
            repo: "abc".to_string(),
            revision_path: String::new(),
            file_path: "test-py".to_string(),
            lines: None,
        };
        let config = ForgeConfig::default();
        assert_eq!(gist_url(&config, &reference), "https://api.github.com/gists/abc");
        reference.revision_path = "0127ff".to_string();
        assert_eq!(gist_url(&config, &reference), "https://api.github.com/gists/abc/0127ff");
    }
}
