//! Page layout for the PDF report.
//!
//! The layout is computed as plain draw operations in millimetres, measured
//! from the top-left corner of an A4 page. `pdf.rs` replays them through the
//! PDF library. Keeping the two apart lets the wrapping and pagination rules
//! be tested without decoding a PDF.

use chrono::{DateTime, Local};

use super::text_metrics::{text_width, truncate_to_width, wrap_text};
use crate::core::metadata::join_tags;
use crate::core::{FileMetadata, Metadata};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 25.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Lowest baseline available to body content; the footer lives below it.
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - 40.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 20.0;
const LINE_HEIGHT: f32 = 5.0;
const SECTION_GAP: f32 = 20.0;
const LABEL_GAP: f32 = 8.0;

pub const BADGE_FONT_SIZE: f32 = 10.0;
pub const BADGE_PADDING: f32 = 2.5;
const BADGE_HEIGHT: f32 = 7.0;
const BADGE_GAP: f32 = 3.0;
const BADGE_ROW_GAP: f32 = 2.5;

pub const REPORT_HEADING: &str = "FOLDER ANALYSIS REPORT";
pub const FOOTER_MARKER: &str = "Folder Metadata Generator";
pub const UNTITLED: &str = "Untitled Project";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_TAGS: &str = "No tags available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const BLACK: Rgb = Rgb(0, 0, 0);
const MUTED: Rgb = Rgb(100, 100, 100);
const BODY: Rgb = Rgb(60, 60, 60);
const FAINT: Rgb = Rgb(120, 120, 120);
const RULE: Rgb = Rgb(200, 200, 200);
const BADGE_FILL: Rgb = Rgb(39, 174, 96);
const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline sits at `y`.
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        style: FontStyle,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
    },
    /// A filled tag label; `y` is the top edge.
    Badge {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        text: String,
        fill: Rgb,
        text_color: Rgb,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub pages: Vec<Page>,
}

impl ReportLayout {
    /// All text drawn on every page, in drawing order. Handy for assertions.
    pub fn texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|page| page.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } | DrawOp::Badge { text, .. } => Some(text.as_str()),
                DrawOp::Line { .. } => None,
            })
            .collect()
    }
}

/// Lays out the complete report for `metadata`.
pub fn layout_report(metadata: &Metadata, now: DateTime<Local>) -> ReportLayout {
    let mut cursor = Cursor::new();

    cursor.text(REPORT_HEADING, 18.0, FontStyle::Bold, BLACK);
    cursor.advance(10.0);
    cursor.text(
        &format!("Generated on {}", now.format("%Y-%m-%d")),
        10.0,
        FontStyle::Regular,
        MUTED,
    );
    cursor.advance(15.0);
    cursor.rule();
    cursor.advance(SECTION_GAP);

    cursor.label("Title:");
    cursor.paragraph(metadata.title_or(UNTITLED), 11.0, FontStyle::Regular, BODY);
    cursor.advance(SECTION_GAP - LINE_HEIGHT);

    cursor.label("Description:");
    cursor.paragraph(
        metadata.description_or(NO_DESCRIPTION),
        10.0,
        FontStyle::Regular,
        BODY,
    );
    cursor.advance(SECTION_GAP - LINE_HEIGHT);

    cursor.label("Tags:");
    cursor.badges(metadata.tags());
    cursor.advance(SECTION_GAP);

    if !metadata.files().is_empty() {
        cursor.label("Files:");
        for file in metadata.files() {
            cursor.file_record(file);
        }
    }

    cursor.finish(now)
}

/// Tracks the current page and vertical position while laying out.
struct Cursor {
    done: Vec<Page>,
    current: Page,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Page::default(),
            y: 30.0,
        }
    }

    fn page(&mut self) -> &mut Page {
        &mut self.current
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Starts a new page when fewer than `height` mm remain.
    fn ensure_space(&mut self, height: f32) {
        if self.y + height > CONTENT_BOTTOM {
            self.done.push(std::mem::take(&mut self.current));
            self.y = MARGIN + 5.0;
        }
    }

    fn text(&mut self, text: &str, size: f32, style: FontStyle, color: Rgb) {
        let y = self.y;
        self.page().ops.push(DrawOp::Text {
            x: MARGIN,
            y,
            text: text.to_string(),
            size,
            style,
            color,
        });
    }

    fn rule(&mut self) {
        let y = self.y;
        self.page().ops.push(DrawOp::Line {
            x1: MARGIN,
            y1: y,
            x2: PAGE_WIDTH - MARGIN,
            y2: y,
            color: RULE,
        });
    }

    fn label(&mut self, label: &str) {
        self.ensure_space(LABEL_GAP + LINE_HEIGHT);
        self.text(label, 12.0, FontStyle::Bold, BLACK);
        self.advance(LABEL_GAP);
    }

    /// Writes word-wrapped text, leaving the cursor one line below the last line.
    fn paragraph(&mut self, text: &str, size: f32, style: FontStyle, color: Rgb) {
        for line in wrap_text(text, CONTENT_WIDTH, size) {
            self.ensure_space(LINE_HEIGHT);
            self.text(&line, size, style, color);
            self.advance(LINE_HEIGHT);
        }
    }

    /// Lays tags out as inline badges, wrapping to a new row at the margin.
    fn badges(&mut self, tags: &[String]) {
        if tags.is_empty() {
            self.text(NO_TAGS, 10.0, FontStyle::Italic, FAINT);
            return;
        }

        let max_label = CONTENT_WIDTH - 2.0 * BADGE_PADDING;
        // Badges hang below the label baseline; shift up so the row aligns.
        self.y -= BADGE_HEIGHT - 2.0;
        let mut x = MARGIN;

        for tag in tags {
            let label = truncate_to_width(tag, max_label, BADGE_FONT_SIZE);
            let width = text_width(&label, BADGE_FONT_SIZE) + 2.0 * BADGE_PADDING;

            if x > MARGIN && x + width > PAGE_WIDTH - MARGIN {
                x = MARGIN;
                self.y += BADGE_HEIGHT + BADGE_ROW_GAP;
            }
            self.ensure_space(BADGE_HEIGHT);

            let y = self.y;
            self.page().ops.push(DrawOp::Badge {
                x,
                y,
                width,
                height: BADGE_HEIGHT,
                text: label,
                fill: BADGE_FILL,
                text_color: WHITE,
            });
            x += width + BADGE_GAP;
        }

        self.y += BADGE_HEIGHT;
    }

    fn file_record(&mut self, file: &FileMetadata) {
        self.ensure_space(3.0 * LINE_HEIGHT);
        self.paragraph(
            file.filename_or("Unknown File"),
            11.0,
            FontStyle::Bold,
            BLACK,
        );
        self.paragraph(file.title_or("Untitled"), 10.0, FontStyle::Italic, MUTED);
        self.paragraph(
            file.description_or("No description"),
            10.0,
            FontStyle::Regular,
            BODY,
        );
        self.paragraph(
            &format!("Tags: {}", join_tags(file.tags(), "none")),
            9.0,
            FontStyle::Regular,
            FAINT,
        );
        self.advance(LINE_HEIGHT);
    }

    /// Adds the footer to every page and returns the finished layout.
    fn finish(self, now: DateTime<Local>) -> ReportLayout {
        let millis = now.timestamp_millis().to_string();
        let document_id = &millis[millis.len().saturating_sub(6)..];
        let mut pages = self.done;
        pages.push(self.current);
        let total = pages.len();

        for (i, page) in pages.iter_mut().enumerate() {
            page.ops.push(DrawOp::Line {
                x1: MARGIN,
                y1: FOOTER_Y - 10.0,
                x2: PAGE_WIDTH - MARGIN,
                y2: FOOTER_Y - 10.0,
                color: RULE,
            });
            page.ops.push(DrawOp::Text {
                x: MARGIN,
                y: FOOTER_Y,
                text: FOOTER_MARKER.to_string(),
                size: 8.0,
                style: FontStyle::Regular,
                color: FAINT,
            });
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH / 2.0 - 8.0,
                y: FOOTER_Y,
                text: format!("Page {} of {}", i + 1, total),
                size: 8.0,
                style: FontStyle::Regular,
                color: FAINT,
            });
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH - 50.0,
                y: FOOTER_Y,
                text: format!("Document ID: {document_id}"),
                size: 8.0,
                style: FontStyle::Regular,
                color: FAINT,
            });
        }

        ReportLayout { pages }
    }
}
