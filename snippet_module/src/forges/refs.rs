use serde::Deserialize;
use tracing::warn;

use super::{FetchRequest, ForgeClient};

/// Entry of a branch or tag listing; every supported forge names it `name`.
#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

/// Split an ambiguous `ref/path` blob into `(ref, path)`.
///
/// Defaults to splitting at the first `/`. A candidate ref replaces the
/// default when the blob starts with `candidate + "/"`; the longest such
/// candidate wins, and among equally long ones the first in the list.
pub fn split_revision_path<'a, I>(blob: &str, candidates: I) -> (String, String)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&str> = None;
    for candidate in candidates {
        if candidate.is_empty() || best.is_some_and(|b| b.len() >= candidate.len()) {
            continue;
        }
        let matches = blob
            .strip_prefix(candidate)
            .is_some_and(|rest| rest.starts_with('/'));
        if matches {
            best = Some(candidate);
        }
    }

    match best {
        Some(name) => (name.to_string(), blob[name.len() + 1..].to_string()),
        None => match blob.split_once('/') {
            Some((head, rest)) => (head.to_string(), rest.to_string()),
            None => (blob.to_string(), String::new()),
        },
    }
}

/// Branch names followed by tag names. A failed listing contributes nothing.
pub(super) async fn list_ref_names(
    client: &ForgeClient,
    branches: FetchRequest,
    tags: FetchRequest,
) -> Vec<String> {
    let (branches, tags) = futures::join!(
        client.get_json::<Vec<NamedRef>>(&branches),
        client.get_json::<Vec<NamedRef>>(&tags),
    );

    [("branches", branches), ("tags", tags)]
        .into_iter()
        .flat_map(|(kind, listing)| match listing {
            Ok(refs) => refs,
            Err(err) => {
                warn!("failed to list {}: {}", kind, err);
                Vec::new()
            }
        })
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_split_without_candidates() {
        assert_eq!(
            split_revision_path("master/nested/file.py", []),
            ("master".to_string(), "nested/file.py".to_string())
        );
    }

    #[test]
    fn slash_in_branch_name() {
        let (r, p) = split_revision_path("feature/login/src/app.rs", ["main", "feature/login"]);
        assert_eq!(r, "feature/login");
        assert_eq!(p, "src/app.rs");
    }

    #[test]
    fn longest_candidate_wins_regardless_of_order() {
        let blob = "release/v1/docs/a.md";
        let expected = ("release/v1".to_string(), "docs/a.md".to_string());
        assert_eq!(split_revision_path(blob, ["release", "release/v1"]), expected);
        assert_eq!(split_revision_path(blob, ["release/v1", "release"]), expected);
    }

    #[test]
    fn candidate_must_end_at_segment_boundary() {
        let (r, p) = split_revision_path("mainline/src/x.c", ["main"]);
        assert_eq!(r, "mainline");
        assert_eq!(p, "src/x.c");
    }

    #[test]
    fn unmatched_candidates_keep_default() {
        let (r, p) = split_revision_path("v2/README.md", ["main", "dev"]);
        assert_eq!((r.as_str(), p.as_str()), ("v2", "README.md"));
    }

    #[test]
    fn blob_without_slash_has_empty_path() {
        assert_eq!(
            split_revision_path("main", ["main"]),
            ("main".to_string(), String::new())
        );
    }
}
