use chrono::{DateTime, Local};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
};

use super::layout::{
    layout_report, DrawOp, FontStyle, ReportLayout, Rgb, BADGE_FONT_SIZE, BADGE_PADDING,
    PAGE_HEIGHT, PAGE_WIDTH, UNTITLED,
};
use super::{pdf_filename, require, Artifact};
use crate::core::{CoreError, Metadata, Result};

/// Renders the metadata report as a PDF document.
pub fn export_to_pdf(metadata: Option<&Metadata>, now: DateTime<Local>) -> Result<Artifact> {
    let metadata = require(metadata)?;
    let layout = layout_report(metadata, now);
    let bytes = render(&layout, metadata.title_or(UNTITLED))?;
    tracing::debug!(
        "Rendered PDF report with {} page(s), {} bytes",
        layout.pages.len(),
        bytes.len()
    );
    Ok(Artifact::new(
        pdf_filename(metadata.title.as_deref(), now),
        bytes,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn render_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::Render(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Converts a top-down layout coordinate to the PDF's bottom-up space.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn render(layout: &ReportLayout, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(render_error)?,
    };

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    doc.save_to_bytes().map_err(render_error)
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            size,
            style,
            color: rgb,
        } => {
            layer.set_fill_color(color(*rgb));
            layer.use_text(text.clone(), *size, Mm(*x), flip(*y), fonts.get(*style));
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: rgb,
        } => {
            layer.set_outline_color(color(*rgb));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), flip(*y1)), false),
                    (Point::new(Mm(*x2), flip(*y2)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Badge {
            x,
            y,
            width,
            height,
            text,
            fill,
            text_color,
        } => {
            layer.set_fill_color(color(*fill));
            layer.add_rect(
                Rect::new(Mm(*x), flip(*y + *height), Mm(*x + *width), flip(*y))
                    .with_mode(PaintMode::Fill),
            );
            layer.set_fill_color(color(*text_color));
            layer.use_text(
                text.clone(),
                BADGE_FONT_SIZE,
                Mm(*x + BADGE_PADDING),
                flip(*y + *height - 2.0),
                &fonts.regular,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileMetadata;

    #[test]
    fn renders_a_pdf_document() {
        let metadata = Metadata {
            title: Some("Quarterly Reports".to_string()),
            description: Some("Spreadsheets and summaries for each quarter.".to_string()),
            tags: Some(vec!["finance".to_string(), "reports".to_string()]),
            files: Some(vec![FileMetadata {
                filename: Some("q1.xlsx".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let artifact = export_to_pdf(Some(&metadata), Local::now()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.content_type, "application/pdf");
        assert!(artifact.filename.starts_with("folder_analysis_quarterly_reports_"));
        assert!(artifact.filename.ends_with(".pdf"));
    }

    #[test]
    fn missing_metadata_is_invalid_input() {
        assert!(matches!(
            export_to_pdf(None, Local::now()),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
