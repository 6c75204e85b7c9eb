use crate::config::ForgeConfig;
use crate::error::SnippetError;
use crate::patterns::SnippetReference;

use super::{encode_segments, FetchRequest, ForgeClient, ResolvedFile, ResolvedFileRef};

pub(super) fn resolve_file_ref(config: &ForgeConfig, reference: &SnippetReference) -> ResolvedFileRef {
    let url = format!(
        "{}/{}/raw/{}/{}",
        config.bitbucket_base,
        encode_segments(&reference.repo),
        urlencoding::encode(&reference.revision_path),
        encode_segments(&reference.file_path)
    );

    ResolvedFileRef {
        revision: reference.revision_path.clone(),
        file_path: reference.file_path.clone(),
        source: FetchRequest::new(url, Vec::new()),
    }
}

pub(super) async fn resolve(
    client: &ForgeClient,
    reference: &SnippetReference,
) -> Result<ResolvedFile, SnippetError> {
    let resolved = resolve_file_ref(client.config(), reference);
    let contents = client.get_text(&resolved.source).await?;

    Ok(ResolvedFile {
        display_path: resolved.file_path,
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::Forge;

    #[test]
    fn raw_url_keeps_path_separators() {
        let reference = SnippetReference {
            forge: Forge::Bitbucket,
            repo: "avdg/ai-bot-js".to_string(),
            revision_path: "197308c".to_string(),
            file_path: "lib/my stream.js".to_string(),
            lines: None,
        };
        let resolved = resolve_file_ref(&ForgeConfig::default(), &reference);
        assert_eq!(
            resolved.source.url,
            "https://bitbucket.org/avdg/ai-bot-js/raw/197308c/lib/my%20stream.js"
        );
        assert_eq!(resolved.file_path, "lib/my stream.js");
    }
}
