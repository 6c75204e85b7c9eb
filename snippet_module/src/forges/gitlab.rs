use crate::config::ForgeConfig;
use crate::error::SnippetError;
use crate::patterns::{Forge, SnippetReference};

use super::refs::{list_ref_names, split_revision_path};
use super::{encode_component, FetchRequest, ForgeClient, ResolvedFile, ResolvedFileRef};

/// API base and token for a GitLab-compatible forge.
fn endpoint(config: &ForgeConfig, forge: Forge) -> (&str, Option<&str>) {
    match forge {
        Forge::Heptapod => (config.heptapod_api_base.as_str(), config.heptapod_token.as_deref()),
        _ => (config.gitlab_api_base.as_str(), config.gitlab_token.as_deref()),
    }
}

fn headers(token: Option<&str>) -> Vec<(&'static str, String)> {
    token
        .map(|token| vec![("PRIVATE-TOKEN", token.to_string())])
        .unwrap_or_default()
}

fn project_url(base: &str, repo: &str) -> String {
    format!("{}/projects/{}/repository", base, encode_component(repo))
}

pub(super) fn resolve_file_ref<'a, I>(
    config: &ForgeConfig,
    reference: &SnippetReference,
    ref_names: I,
) -> Result<ResolvedFileRef, SnippetError>
where
    I: IntoIterator<Item = &'a str>,
{
    let (base, token) = endpoint(config, reference.forge);
    let (revision, file_path) = split_revision_path(&reference.revision_path, ref_names);
    if file_path.is_empty() {
        return Err(SnippetError::NotFound(format!(
            "no file path in {}",
            reference.revision_path
        )));
    }

    let url = format!(
        "{}/files/{}/raw?ref={}",
        project_url(base, &reference.repo),
        encode_component(&file_path),
        encode_component(&revision)
    );

    Ok(ResolvedFileRef {
        source: FetchRequest::new(url, headers(token)),
        revision,
        file_path,
    })
}

pub(super) async fn resolve(
    client: &ForgeClient,
    reference: &SnippetReference,
) -> Result<ResolvedFile, SnippetError> {
    let config = client.config();
    let (base, token) = endpoint(config, reference.forge);
    let project = project_url(base, &reference.repo);

    let names = list_ref_names(
        client,
        FetchRequest::new(format!("{}/branches?per_page=100", project), headers(token)),
        FetchRequest::new(format!("{}/tags?per_page=100", project), headers(token)),
    )
    .await;

    let resolved = resolve_file_ref(config, reference, names.iter().map(String::as_str))?;
    let contents = client.get_text(&resolved.source).await?;

    Ok(ResolvedFile {
        display_path: resolved.file_path,
        contents,
    })
}
