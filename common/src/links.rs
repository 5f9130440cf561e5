//! プロジェクトリンクの種別判定
//!
//! URLのホスト部分から github / gitlab / figma などの種別を推定する。

use serde::{Deserialize, Serialize};

/// リンク種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Github,
    Gitlab,
    Netlify,
    Vercel,
    Figma,
    Youtube,
    Website,
    Unknown,
}

impl LinkKind {
    /// URLから種別を推定（部分一致、大文字小文字を区別しない）
    pub fn infer(url: &str) -> Self {
        let lower = url.trim().to_lowercase();
        if lower.is_empty() {
            return LinkKind::Unknown;
        }

        if lower.contains("github.com") {
            LinkKind::Github
        } else if lower.contains("gitlab.com") {
            LinkKind::Gitlab
        } else if lower.contains("netlify") {
            LinkKind::Netlify
        } else if lower.contains("vercel") {
            LinkKind::Vercel
        } else if lower.contains("figma.com") {
            LinkKind::Figma
        } else if lower.contains("youtube.com") || lower.contains("youtu.be") {
            LinkKind::Youtube
        } else {
            LinkKind::Website
        }
    }

    /// 表示ラベル（"$ open github" の後半）
    pub fn label(&self) -> &'static str {
        match self {
            LinkKind::Github => "github",
            LinkKind::Gitlab => "gitlab",
            LinkKind::Netlify => "netlify",
            LinkKind::Vercel => "vercel",
            LinkKind::Figma => "figma",
            LinkKind::Youtube => "youtube",
            LinkKind::Website => "website",
            LinkKind::Unknown => "link",
        }
    }

    /// ライブプレビューの候補になるか（ソースホスティング以外）
    pub fn is_previewable(&self) -> bool {
        !matches!(self, LinkKind::Github | LinkKind::Unknown)
    }
}

/// プロジェクトの外部リンク
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LinkRepr")]
pub struct ProjectLink {
    pub url: String,
    pub kind: LinkKind,
}

impl ProjectLink {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = LinkKind::infer(&url);
        Self { url, kind }
    }
}

/// JSON上の表現: 文字列のみ、または {url, kind}
#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Url(String),
    Full {
        url: String,
        #[serde(default)]
        kind: Option<LinkKind>,
    },
}

impl From<LinkRepr> for ProjectLink {
    fn from(repr: LinkRepr) -> Self {
        match repr {
            LinkRepr::Url(url) => ProjectLink::new(url),
            LinkRepr::Full { url, kind: Some(kind) } => ProjectLink { url, kind },
            LinkRepr::Full { url, kind: None } => ProjectLink::new(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_hosts() {
        assert_eq!(LinkKind::infer("https://github.com/me/repo"), LinkKind::Github);
        assert_eq!(LinkKind::infer("https://GitLab.com/me/repo"), LinkKind::Gitlab);
        assert_eq!(LinkKind::infer("https://app.netlify.app"), LinkKind::Netlify);
        assert_eq!(LinkKind::infer("https://demo.vercel.app"), LinkKind::Vercel);
        assert_eq!(LinkKind::infer("https://www.figma.com/file/x"), LinkKind::Figma);
        assert_eq!(LinkKind::infer("https://youtu.be/abc"), LinkKind::Youtube);
        assert_eq!(LinkKind::infer("https://example.dev"), LinkKind::Website);
        assert_eq!(LinkKind::infer("   "), LinkKind::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(LinkKind::Github.label(), "github");
        assert_eq!(LinkKind::Unknown.label(), "link");
        assert_eq!(LinkKind::Website.label(), "website");
    }

    #[test]
    fn test_previewable() {
        assert!(!LinkKind::Github.is_previewable());
        assert!(!LinkKind::Unknown.is_previewable());
        assert!(LinkKind::Vercel.is_previewable());
        assert!(LinkKind::Website.is_previewable());
    }

    #[test]
    fn test_deserialize_plain_and_full() {
        let links: Vec<ProjectLink> = serde_json::from_str(
            r#"["https://github.com/a/b", {"url": "https://a.dev"}, {"url": "https://b.dev", "kind": "figma"}]"#,
        )
        .unwrap();
        assert_eq!(links[0].kind, LinkKind::Github);
        assert_eq!(links[1].kind, LinkKind::Website);
        assert_eq!(links[2].kind, LinkKind::Figma);
    }
}
