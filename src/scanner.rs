use crate::error::{PortfolioError, Result};
use portfolio_common::{parse_section, ProjectsSection};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ContentFile {
    pub path: PathBuf,
    pub file_name: String,
}

const CONTENT_EXTENSIONS: &[&str] = &["json", "JSON"];

/// ファイルならそれ自身、フォルダなら直下（recursive時は配下すべて）のJSON
pub fn scan_content(path: &Path, recursive: bool) -> Result<Vec<ContentFile>> {
    if !path.exists() {
        return Err(PortfolioError::FileNotFound(path.display().to_string()));
    }

    if path.is_file() {
        return Ok(vec![content_file(path)]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<ContentFile> = WalkDir::new(path)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| CONTENT_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()))
                .unwrap_or(false)
        })
        .map(|e| content_file(e.path()))
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn content_file(path: &Path) -> ContentFile {
    ContentFile {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

/// 1ファイル読み込み
pub fn load_section(path: &Path) -> Result<ProjectsSection> {
    if !path.is_file() {
        return Err(PortfolioError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_section(&content)?)
}

/// 1件以上あることを要求する
pub fn load_projects(path: &Path) -> Result<ProjectsSection> {
    let section = load_section(path)?;
    if section.is_empty() {
        return Err(PortfolioError::EmptyProjectList(path.display().to_string()));
    }
    Ok(section)
}
