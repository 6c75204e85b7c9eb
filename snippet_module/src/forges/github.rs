use crate::config::ForgeConfig;
use crate::error::SnippetError;
use crate::patterns::SnippetReference;

use super::refs::{list_ref_names, split_revision_path};
use super::{encode_segments, FetchRequest, ForgeClient, ResolvedFile, ResolvedFileRef};

const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

pub(super) fn headers(config: &ForgeConfig) -> Vec<(&'static str, String)> {
    let mut headers = vec![("Accept", RAW_ACCEPT.to_string())];
    if let Some(token) = &config.github_token {
        headers.push(("Authorization", format!("token {}", token)));
    }
    headers
}

fn repo_url(config: &ForgeConfig, repo: &str) -> String {
    format!("{}/repos/{}", config.github_api_base, repo)
}

pub(super) fn resolve_file_ref<'a, I>(
    config: &ForgeConfig,
    reference: &SnippetReference,
    ref_names: I,
) -> Result<ResolvedFileRef, SnippetError>
where
    I: IntoIterator<Item = &'a str>,
{
    let (revision, file_path) = split_revision_path(&reference.revision_path, ref_names);
    if file_path.is_empty() {
        return Err(SnippetError::NotFound(format!(
            "no file path in {}",
            reference.revision_path
        )));
    }

    let url = format!(
        "{}/contents/{}?ref={}",
        repo_url(config, &reference.repo),
        encode_segments(&file_path),
        urlencoding::encode(&revision)
    );

    Ok(ResolvedFileRef {
        source: FetchRequest::new(url, headers(config)),
        revision,
        file_path,
    })
}

pub(super) async fn resolve(
    client: &ForgeClient,
    reference: &SnippetReference,
) -> Result<ResolvedFile, SnippetError> {
    let config = client.config();
    let base = repo_url(config, &reference.repo);

    let names = list_ref_names(
        client,
        FetchRequest::new(format!("{}/branches?per_page=100", base), headers(config)),
        FetchRequest::new(format!("{}/tags?per_page=100", base), headers(config)),
    )
    .await;

    let resolved = resolve_file_ref(config, reference, names.iter().map(String::as_str))?;
    let contents = client.get_text(&resolved.source).await?;

    Ok(ResolvedFile {
        display_path: resolved.file_path,
        contents,
    })
}
