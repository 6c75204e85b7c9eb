//! URL pattern registry for forge snippet links.
//!
//! Each forge owns one compiled pattern. Scanning a message yields every
//! non-overlapping match of every forge, in the fixed order of [`Forge::ALL`]
//! and left to right within one forge.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Supported code forges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Forge {
    GitHub,
    Gist,
    GitLab,
    Bitbucket,
    /// GitLab-compatible instance hosting Mercurial projects.
    Heptapod,
}

impl Forge {
    /// Registry order used when scanning a message.
    pub const ALL: [Forge; 5] = [
        Forge::GitHub,
        Forge::Gist,
        Forge::GitLab,
        Forge::Bitbucket,
        Forge::Heptapod,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Forge::GitHub => "github",
            Forge::Gist => "gist",
            Forge::GitLab => "gitlab",
            Forge::Bitbucket => "bitbucket",
            Forge::Heptapod => "heptapod",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Forge::GitHub => &*GITHUB_PATTERN,
            Forge::Gist => &*GIST_PATTERN,
            Forge::GitLab => &*GITLAB_PATTERN,
            Forge::Bitbucket => &*BITBUCKET_PATTERN,
            Forge::Heptapod => &*HEPTAPOD_PATTERN,
        }
    }

    /// Every reference to this forge found in `text`, left to right.
    pub fn find_all<'t>(self, text: &'t str) -> impl Iterator<Item = SnippetReference> + 't {
        self.pattern()
            .captures_iter(text)
            .filter_map(move |caps| SnippetReference::from_captures(self, &caps))
    }
}

impl fmt::Display for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// blob/<ref>/<path>#L5, #L5-L10, #L5~L10, #L5:L10
static GITHUB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https://github\.com/(?P<repo>[a-zA-Z0-9-]+/[\w.-]+)/blob/(?P<path>[^#>?\s]+)",
        r"(?:\?[^#>\s]*)?(?:#L(?P<start_line>[0-9]+)(?:[-~:]L(?P<end_line>[0-9]+))?)?",
    ))
    .unwrap()
});

// <id>[/<revision>]#file-<slug>-L5-L10; the slug is lazy so the line suffix is split off
static GIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https://gist\.github\.com/[a-zA-Z0-9-]+/(?P<gist_id>[a-zA-Z0-9]+)/*(?P<revision>[a-zA-Z0-9]+)?/*",
        r"#file-(?P<file_slug>[\w.-]+?)(?:-L(?P<start_line>[0-9]+)(?:[-~:]L(?P<end_line>[0-9]+))?)?",
        r"(?:$|[^\w.-])",
    ))
    .unwrap()
});

// group[/subgroup...]/project/-/blob/<ref>/<path>#L5-10
static GITLAB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https://gitlab\.com/(?P<repo>[\w.-]+(?:/[\w.-]+)+)/-/blob/(?P<path>[^#>?\s]+)",
        r"(?:\?[^#>\s]*)?(?:#L(?P<start_line>[0-9]+)(?:-(?P<end_line>[0-9]+))?)?",
    ))
    .unwrap()
});

// src/<hash>/<path>#lines-5:10
static BITBUCKET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https://bitbucket\.org/(?P<repo>[a-zA-Z0-9-]+/[\w.-]+)/src/(?P<revision>[0-9a-zA-Z]+)/",
        r"(?P<path>[^#>?\s]+)(?:\?[^#>\s]*)?",
        r"(?:#lines-(?P<start_line>[0-9]+)(?::(?P<end_line>[0-9]+))?)?",
    ))
    .unwrap()
});

// group/project/-/blob/<ref>/<path>#L5-10, #L5~10, #L5:10
static HEPTAPOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https://foss\.heptapod\.net/(?P<repo>[\w.-]+(?:/[\w.-]+)+)/-/blob/(?P<path>[^#>?\s]+)",
        r"(?:\?[^#>\s]*)?(?:#L(?P<start_line>[0-9]+)(?:[-~:](?P<end_line>[0-9]+))?)?",
    ))
    .unwrap()
});

/// Requested line range as written in the URL, 1-based and unvalidated.
///
/// `end` can only be present together with `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: Option<usize>,
}

impl LineSpan {
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: None,
        }
    }

    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Parsed intent of one matched URL.
///
/// Field meaning depends on the forge:
/// - GitHub, GitLab, Heptapod: `revision_path` is the unresolved `ref/path`
///   blob and `file_path` is empty until an adapter splits it.
/// - Bitbucket: `revision_path` is the commit and `file_path` the file.
/// - Gist: `repo` is the gist id, `revision_path` the gist revision (empty for
///   the latest one) and `file_path` the slugified file name from the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetReference {
    pub forge: Forge,
    pub repo: String,
    pub revision_path: String,
    pub file_path: String,
    /// `None` means the whole file.
    pub lines: Option<LineSpan>,
}

impl SnippetReference {
    fn from_captures(forge: Forge, caps: &Captures<'_>) -> Option<Self> {
        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let (repo, revision_path, file_path) = match forge {
            Forge::GitHub | Forge::GitLab | Forge::Heptapod => (
                group("repo")?.to_string(),
                decode_component(group("path")?).into_owned(),
                String::new(),
            ),
            Forge::Bitbucket => (
                group("repo")?.to_string(),
                group("revision")?.to_string(),
                decode_component(group("path")?).into_owned(),
            ),
            Forge::Gist => (
                group("gist_id")?.to_string(),
                group("revision").unwrap_or_default().to_string(),
                group("file_slug")?.to_string(),
            ),
        };

        let lines = group("start_line").map(|start| LineSpan {
            start: parse_line_number(start),
            end: group("end_line").map(parse_line_number),
        });

        Some(Self {
            forge,
            repo,
            revision_path,
            file_path,
            lines,
        })
    }
}

/// All snippet references in `text`, grouped by forge in registry order.
pub fn find_references(text: &str) -> impl Iterator<Item = SnippetReference> + '_ {
    Forge::ALL
        .into_iter()
        .flat_map(move |forge| forge.find_all(text))
}

// Digits that overflow saturate, which later resolves to an out-of-range request.
fn parse_line_number(digits: &str) -> usize {
    digits.parse::<usize>().unwrap_or(usize::MAX)
}

fn decode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
