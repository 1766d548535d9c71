//! Document Renderer: lays a `ResumeDocument` out as positioned blocks.
//!
//! Pure and deterministic: the same document and style always produce the same
//! `RenderedDocument`. The preview endpoint and the export pipeline both consume this
//! output, so what the user previews is exactly what gets rasterized.
//!
//! Coordinates are CSS pixels on an A4-width canvas (794px at 96dpi), origin top-left.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::models::resume::ResumeDocument;

/// A4 width at 96 dpi.
pub const PAGE_WIDTH_PX: f32 = 794.0;
const PADDING_PX: f32 = 48.0;
const BULLET_INDENT_PX: f32 = 16.0;
const TAG_PAD_X_PX: f32 = 8.0;
const TAG_PAD_Y_PX: f32 = 2.0;
const TAG_GAP_PX: f32 = 6.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    Standard,
    Compact,
}

/// Style options chosen on the wizard's style tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub template: Template,
    pub font: FontFamily,
    /// Font size of the name header, in px.
    pub name_font_size: u8,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            template: Template::Standard,
            font: FontFamily::Inter,
            name_font_size: 25,
        }
    }
}

struct Spacing {
    body_px: f32,
    heading_px: f32,
    line_height: f32,
    section_gap: f32,
    item_gap: f32,
}

fn spacing(template: Template) -> Spacing {
    match template {
        Template::Standard => Spacing {
            body_px: 14.0,
            heading_px: 16.0,
            line_height: 1.5,
            section_gap: 20.0,
            item_gap: 8.0,
        },
        Template::Compact => Spacing {
            body_px: 12.0,
            heading_px: 14.0,
            line_height: 1.3,
            section_gap: 12.0,
            item_gap: 4.0,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Name,
    Contact,
    SectionHeading,
    Paragraph,
    Tag,
    EntryTitle,
    EntryMeta,
    Bullet,
}

/// One positioned text block. `lines` are already wrapped to `width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_px: f32,
    pub line_height_px: f32,
    pub bold: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub width: f32,
    pub height: f32,
    pub style: StyleConfig,
    pub blocks: Vec<Block>,
}

/// Renders the document with the given style.
pub fn render(document: &ResumeDocument, style: &StyleConfig) -> RenderedDocument {
    let mut layout = Layout::new(style);
    let (body, heading) = (layout.spacing.body_px, layout.spacing.heading_px);

    let info = &document.personal_info;
    layout.text(BlockKind::Name, &info.name, 0.0, f32::from(style.name_font_size), true);
    let contact = [&info.title, &info.email, &info.phone, &info.location]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    layout.text(BlockKind::Contact, &contact, 0.0, body, false);

    if !document.summary.trim().is_empty() {
        layout.section("Summary", heading);
        layout.text(BlockKind::Paragraph, &document.summary, 0.0, body, false);
    }

    if !document.skills.is_empty() {
        layout.section("Skills", heading);
        layout.tags(&document.skills, body);
    }

    if !document.experience.is_empty() {
        layout.section("Experience", heading);
        for entry in &document.experience {
            let title = match (entry.title.trim(), entry.company.trim()) {
                (t, "") => t.to_string(),
                ("", c) => c.to_string(),
                (t, c) => format!("{t} | {c}"),
            };
            layout.text(BlockKind::EntryTitle, &title, 0.0, body, true);
            layout.text(BlockKind::EntryMeta, &entry.duration, 0.0, body, false);
            for bullet in &entry.bullets {
                layout.text(BlockKind::Bullet, bullet, BULLET_INDENT_PX, body, false);
            }
            layout.gap(layout.spacing.item_gap);
        }
    }

    if !document.education.is_empty() {
        layout.section("Education", heading);
        for entry in &document.education {
            layout.text(BlockKind::EntryTitle, &entry.school, 0.0, body, true);
            let meta = if entry.year.trim().is_empty() {
                entry.degree.clone()
            } else {
                format!("{} | {}", entry.degree, entry.year)
            };
            layout.text(BlockKind::EntryMeta, &meta, 0.0, body, false);
            layout.gap(layout.spacing.item_gap);
        }
    }

    layout.finish(*style)
}

struct Layout {
    metrics: &'static FontMetricTable,
    spacing: Spacing,
    cursor_y: f32,
    blocks: Vec<Block>,
}

impl Layout {
    fn new(style: &StyleConfig) -> Self {
        Layout {
            metrics: get_metrics(style.font),
            spacing: spacing(style.template),
            cursor_y: PADDING_PX,
            blocks: Vec::new(),
        }
    }

    fn content_width(&self) -> f32 {
        PAGE_WIDTH_PX - 2.0 * PADDING_PX
    }

    fn gap(&mut self, px: f32) {
        self.cursor_y += px;
    }

    fn section(&mut self, title: &str, heading_px: f32) {
        if !self.blocks.is_empty() {
            self.gap(self.spacing.section_gap);
        }
        self.text(BlockKind::SectionHeading, title, 0.0, heading_px, true);
        self.gap(self.spacing.item_gap / 2.0);
    }

    /// Places a wrapped text block at the cursor. Empty text places nothing.
    fn text(&mut self, kind: BlockKind, text: &str, indent: f32, font_px: f32, bold: bool) {
        let width = self.content_width() - indent;
        let lines = self.metrics.wrap(text, width, font_px);
        if lines.is_empty() {
            return;
        }
        let line_height_px = font_px * self.spacing.line_height;
        let height = line_height_px * lines.len() as f32;
        self.blocks.push(Block {
            kind,
            x: PADDING_PX + indent,
            y: self.cursor_y,
            width,
            height,
            font_px,
            line_height_px,
            bold,
            lines,
        });
        self.cursor_y += height;
    }

    /// Flows skill tags left to right, wrapping to a new row when the row is full.
    fn tags(&mut self, skills: &[String], font_px: f32) {
        let line_height_px = font_px * self.spacing.line_height;
        let tag_height = line_height_px + 2.0 * TAG_PAD_Y_PX;
        let right_edge = PADDING_PX + self.content_width();
        let mut x = PADDING_PX;
        let mut placed_in_row = false;

        for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let width = self.metrics.width_px(skill, font_px) + 2.0 * TAG_PAD_X_PX;
            if placed_in_row && x + width > right_edge {
                x = PADDING_PX;
                self.cursor_y += tag_height + TAG_GAP_PX;
            }
            self.blocks.push(Block {
                kind: BlockKind::Tag,
                x,
                y: self.cursor_y,
                width,
                height: tag_height,
                font_px,
                line_height_px,
                bold: false,
                lines: vec![skill.to_string()],
            });
            x += width + TAG_GAP_PX;
            placed_in_row = true;
        }
        if placed_in_row {
            self.cursor_y += tag_height;
        }
    }

    fn finish(self, style: StyleConfig) -> RenderedDocument {
        RenderedDocument {
            width: PAGE_WIDTH_PX,
            height: (self.cursor_y + PADDING_PX).ceil(),
            style,
            blocks: self.blocks,
        }
    }
}
