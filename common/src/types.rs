//! プロジェクトレコードの型定義
//!
//! CMS・静的JSONのどちらから読み込んでも同じ形に正規化される:
//! - ProjectRecord: カルーセル1枚分のデータ
//! - RichText: 段落単位のテキスト
//! - ImageRef: 画像参照（URL + alt）

use crate::links::{LinkKind, ProjectLink};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// リッチテキストの1ブロック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type", default = "default_block_kind")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

fn default_block_kind() -> String {
    "paragraph".to_string()
}

/// リッチテキスト（段落の列）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RichTextRepr", into = "Vec<TextBlock>")]
pub struct RichText {
    pub blocks: Vec<TextBlock>,
}

/// JSON上の表現: プレーン文字列、またはブロック配列
#[derive(Deserialize)]
#[serde(untagged)]
enum RichTextRepr {
    Plain(String),
    Blocks(Vec<TextBlock>),
}

impl From<RichTextRepr> for RichText {
    fn from(repr: RichTextRepr) -> Self {
        match repr {
            RichTextRepr::Plain(text) => RichText::plain(text),
            RichTextRepr::Blocks(blocks) => RichText { blocks },
        }
    }
}

impl From<RichText> for Vec<TextBlock> {
    fn from(rich: RichText) -> Self {
        rich.blocks
    }
}

impl RichText {
    /// 1段落のテキストを作成
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![TextBlock {
                kind: default_block_kind(),
                text: text.into(),
            }],
        }
    }

    /// 空白以外の文字を含むブロックがあるか
    pub fn is_filled(&self) -> bool {
        self.blocks.iter().any(|b| !b.text.trim().is_empty())
    }

    /// 空でない段落のテキスト
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// プレーンテキスト化（段落はスペース区切り）
    pub fn as_text(&self) -> String {
        self.paragraphs().collect::<Vec<_>>().join(" ")
    }
}

/// 画像参照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageRef {
    pub url: String,
    pub alt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn is_filled(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

/// カード上に表示する技術スタックの抜粋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechPreview {
    pub shown: Vec<String>,
    /// 省略された件数（"+N" 表示用）
    pub overflow: usize,
}

/// プロジェクト1件分のレコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub name: String,
    pub short_description: Option<RichText>,
    pub long_description: Option<RichText>,
    pub image: Option<ImageRef>,
    /// カンマ区切りの技術スタック
    pub tech_stack: Option<String>,
    pub links: Vec<ProjectLink>,
}

impl ProjectRecord {
    /// 表示名（未設定なら "project"）
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "project"
        } else {
            name
        }
    }

    /// ターミナル風タイトル用のスラッグ（空白の連続をハイフンに）
    pub fn slug(&self) -> String {
        lazy_static::lazy_static! {
            static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
        }

        let name = self.name.trim();
        if name.is_empty() {
            return "project".to_string();
        }
        WHITESPACE_RE.replace_all(&name.to_lowercase(), "-").into_owned()
    }

    /// 画像（URLが空のものは無いものとして扱う）
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref().filter(|img| img.is_filled())
    }

    /// カード用の短い説明
    pub fn summary(&self) -> Option<&RichText> {
        self.short_description.as_ref().filter(|t| t.is_filled())
    }

    /// 詳細表示用の説明（長文優先、無ければ短文）
    pub fn description(&self) -> Option<&RichText> {
        self.long_description
            .as_ref()
            .filter(|t| t.is_filled())
            .or_else(|| self.summary())
    }

    /// 技術スタックの項目（空要素は除外）
    pub fn tech_stack_items(&self) -> Vec<String> {
        self.tech_stack
            .as_deref()
            .map(|text| {
                text.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 先頭 `max` 件と残り件数
    pub fn tech_stack_preview(&self, max: usize) -> Option<TechPreview> {
        let items = self.tech_stack_items();
        if items.is_empty() {
            return None;
        }
        let overflow = items.len().saturating_sub(max);
        let shown = items.into_iter().take(max).collect();
        Some(TechPreview { shown, overflow })
    }

    /// URLが空でないリンク
    pub fn links(&self) -> impl Iterator<Item = &ProjectLink> {
        self.links.iter().filter(|l| !l.url.trim().is_empty())
    }

    /// ライブプレビュー対象のWebサイトURL（github以外の最初のリンク）
    ///
    /// 種別の明示指定があっても、URLがgithubなら埋め込まない
    pub fn website_url(&self) -> Option<&str> {
        self.links()
            .find(|l| l.kind.is_previewable() && LinkKind::infer(&l.url).is_previewable())
            .map(|l| l.url.as_str())
    }
}
