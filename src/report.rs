//! コンテンツ検証とプレビュー表示用のテキスト整形

use portfolio_common::{
    CarouselSession, DetailOverlay, ProjectRecord, ProjectsSection, Viewport,
};
use std::collections::HashMap;
use std::fmt;

/// カードに表示する技術タグの数
pub const CARD_TECH_PREVIEW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    EmptyName { index: usize },
    MissingImage { index: usize },
    MissingSummary { index: usize },
    NoLinks { index: usize },
    InvalidUrl { index: usize, url: String },
    DuplicateSlug { slug: String, indices: Vec<usize> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptyName { index } => write!(f, "#{}: 名前が空です", index),
            Warning::MissingImage { index } => write!(f, "#{}: 画像がありません", index),
            Warning::MissingSummary { index } => write!(f, "#{}: 概要がありません", index),
            Warning::NoLinks { index } => write!(f, "#{}: リンクがありません", index),
            Warning::InvalidUrl { index, url } => {
                write!(f, "#{}: http(s)ではないリンク: {}", index, url)
            }
            Warning::DuplicateSlug { slug, indices } => {
                write!(f, "スラッグ重複 '{}': {:?}", slug, indices)
            }
        }
    }
}

/// 表示は壊れないが見直したほうがよい箇所
pub fn check_section(section: &ProjectsSection) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut slugs: HashMap<String, Vec<usize>> = HashMap::new();

    for (index, record) in section.projects.iter().enumerate() {
        if record.name.trim().is_empty() {
            warnings.push(Warning::EmptyName { index });
        }
        if record.image().is_none() {
            warnings.push(Warning::MissingImage { index });
        }
        if record.summary().is_none() {
            warnings.push(Warning::MissingSummary { index });
        }

        let mut links = record.links().peekable();
        if links.peek().is_none() {
            warnings.push(Warning::NoLinks { index });
        }
        for link in links.filter(|l| !is_http(&l.url)) {
            warnings.push(Warning::InvalidUrl {
                index,
                url: link.url.clone(),
            });
        }

        slugs.entry(record.slug()).or_default().push(index);
    }

    let mut duplicates: Vec<Warning> = slugs
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(slug, indices)| Warning::DuplicateSlug { slug, indices })
        .collect();
    duplicates.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
    warnings.extend(duplicates);

    warnings
}

fn is_http(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    url.starts_with("https://") || url.starts_with("http://")
}

/// カード上のタグ表示（"Rust, WASM +3"）
pub fn card_tags(record: &ProjectRecord) -> String {
    match record.tech_stack_preview(CARD_TECH_PREVIEW) {
        Some(preview) if preview.overflow > 0 => {
            format!("{} +{}", preview.shown.join(", "), preview.overflow)
        }
        Some(preview) => preview.shown.join(", "),
        None => String::new(),
    }
}

/// 描画対象カードの配置表
pub fn placement_table(session: &CarouselSession, projects: &[ProjectRecord]) -> Vec<String> {
    let mut placements = session.visible_placements();
    placements.sort_by_key(|(_, p)| p.offset);

    let mut lines = vec![format!(
        "showing {} of {}",
        session.current_index() + 1,
        session.len()
    )];
    for (index, placement) in placements {
        let marker = if placement.is_centered() { "▶" } else { " " };
        let name = projects
            .get(index)
            .map(|r| format!("{}.md", r.slug()))
            .unwrap_or_default();
        lines.push(format!(
            "{} {:>+3} {:<24} opacity={:.2} scale={:.2} z={} {}",
            marker,
            placement.offset,
            name,
            placement.opacity,
            placement.scale,
            placement.z_index,
            placement.transform_css()
        ));
    }
    lines
}

/// モーダルを開いたときの表示内容
pub fn detail_lines(overlay: &DetailOverlay, projects: &[ProjectRecord]) -> Vec<String> {
    let state = overlay.state();
    let Some(record) = projects.get(state.selected_index()) else {
        return Vec::new();
    };

    let mut lines = vec![format!("## {}", record.display_name())];
    if state.has_navigation() {
        lines.push(format!("{} / {}", state.selected_index() + 1, state.len()));
    }

    if let Some(description) = record.description() {
        lines.push("# About".to_string());
        lines.extend(description.paragraphs().map(|p| format!("  {}", p)));
    }

    let links: Vec<String> = record
        .links()
        .map(|l| format!("  $ open {}  {}", l.kind.label(), l.url))
        .collect();
    if !links.is_empty() {
        lines.push("# Links".to_string());
        lines.extend(links);
    }

    let preview = state.preview(record);
    if !preview.is_empty() {
        lines.push("# Preview".to_string());
        if let Some(url) = preview.embed_url {
            lines.push(format!("  embed: {}", url));
        }
        if let Some(image) = preview.fallback_image {
            lines.push(format!("  image: {}", image.url));
        }
        if preview.warning {
            lines.push("  warn: iframe blocked, use link to view directly".to_string());
        }
    }

    let items = record.tech_stack_items();
    if !items.is_empty() {
        lines.push("# Tech Stack".to_string());
        lines.push(format!("  {}", items.join(" · ")));
    }
    lines
}

pub fn viewport_label(viewport: Viewport) -> &'static str {
    match viewport {
        Viewport::Mobile => "mobile",
        Viewport::Desktop => "desktop",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_common::{ImageRef, ProjectLink, RichText};

    fn record(name: &str) -> ProjectRecord {
        ProjectRecord {
            name: name.into(),
            short_description: Some(RichText::plain("summary")),
            image: Some(ImageRef {
                url: "https://img/x.png".into(),
                ..Default::default()
            }),
            links: vec![ProjectLink::new("https://github.com/me/x")],
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_section_has_no_warnings() {
        let section = ProjectsSection::from_projects(vec![record("A"), record("B")]);
        assert!(check_section(&section).is_empty());
    }

    #[test]
    fn test_warnings_collected() {
        let mut bare = ProjectRecord::default();
        bare.links.push(ProjectLink::new("ftp://files.local/x"));
        let section = ProjectsSection::from_projects(vec![record("Same Name"), record("same  name"), bare]);

        let warnings = check_section(&section);
        assert!(warnings.contains(&Warning::EmptyName { index: 2 }));
        assert!(warnings.contains(&Warning::MissingImage { index: 2 }));
        assert!(warnings.contains(&Warning::InvalidUrl {
            index: 2,
            url: "ftp://files.local/x".into()
        }));
        assert!(warnings.contains(&Warning::DuplicateSlug {
            slug: "same-name".into(),
            indices: vec![0, 1]
        }));
    }

    #[test]
    fn test_card_tags_overflow() {
        let mut r = record("A");
        r.tech_stack = Some("Rust, Leptos, WASM, Tailwind".into());
        assert_eq!(card_tags(&r), "Rust, Leptos +2");
        r.tech_stack = Some("Rust".into());
        assert_eq!(card_tags(&r), "Rust");
        r.tech_stack = None;
        assert_eq!(card_tags(&r), "");
    }

    #[test]
    fn test_placement_table_centered_first_line() {
        let projects = vec![record("A"), record("B"), record("C")];
        let session = CarouselSession::mount(projects.len(), Viewport::Desktop).unwrap();
        let lines = placement_table(&session, &projects);
        assert_eq!(lines[0], "showing 1 of 3");
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| l.starts_with('▶') && l.contains("a.md")));
    }

    #[test]
    fn test_detail_lines_single_record() {
        let projects = vec![record("Solo")];
        let overlay = DetailOverlay::open(&projects, 0).unwrap();
        let lines = detail_lines(&overlay, &projects);
        assert_eq!(lines[0], "## Solo");
        assert!(!lines.iter().any(|l| l.contains(" / ")));
        assert!(lines.iter().any(|l| l.contains("$ open github")));
        assert!(lines.iter().any(|l| l.contains("image: https://img/x.png")));
    }
}
