//! Section-by-section rendering and PDF serialisation.

use crate::error::{FormError, FormResult};
use crate::fields::ReferralForm;
use crate::layout::{referral_sections, RenderStamp, Section};
use crate::page::{
    mm_to_pt, Canvas, DrawOp, Font, Rgb, BORDER_WIDTH_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use printpdf::path::PaintMode;
use printpdf::{Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::collections::HashMap;
use std::io::BufWriter;

const DOCUMENT_TITLE: &str = "Medical Referral Form";

/// A finished PDF and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedForm {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A section that could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionError {
    pub section: String,
    pub reason: String,
}

/// Result of rendering: the document, if one could be produced, and every section failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub document: Option<RenderedForm>,
    pub section_errors: Vec<SectionError>,
}

impl RenderReport {
    /// A document was produced and every section drew cleanly.
    pub fn is_complete(&self) -> bool {
        self.document.is_some() && self.section_errors.is_empty()
    }
}

pub fn render(form: &ReferralForm, stamp: &RenderStamp) -> RenderReport {
    tracing::info!("generating medical referral form {}", stamp.reference_number());
    render_sections(&referral_sections(form, stamp), stamp)
}

/// Draw each section independently and serialise the result.
///
/// A section whose elements fail to draw is left off the page entirely and recorded in the
/// report; the remaining sections are still drawn.
pub fn render_sections(sections: &[Section], stamp: &RenderStamp) -> RenderReport {
    let (page, section_errors) = compose(sections);

    let document = match build_pdf(page) {
        Ok(bytes) => {
            tracing::info!("referral form generated: {} bytes", bytes.len());
            Some(RenderedForm {
                filename: stamp.filename(),
                bytes,
            })
        }
        Err(e) => {
            tracing::error!("referral form could not be produced: {}", e);
            None
        }
    };

    RenderReport {
        document,
        section_errors,
    }
}

fn compose(sections: &[Section]) -> (Canvas, Vec<SectionError>) {
    let mut page = Canvas::new();
    let mut section_errors = Vec::new();

    for section in sections {
        let mut canvas = Canvas::new();
        match section.elements.iter().try_for_each(|e| canvas.draw(e)) {
            Ok(()) => page.append(canvas),
            Err(e) => {
                tracing::warn!("failed to draw form section '{}': {}", section.name, e);
                section_errors.push(SectionError {
                    section: section.name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    (page, section_errors)
}

fn build_pdf(page: Canvas) -> FormResult<Vec<u8>> {
    let (doc, page_index, layer_index) = PdfDocument::new(
        DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let mut fonts = HashMap::new();
    for font in Font::ALL {
        let font_ref = doc
            .add_builtin_font(font.builtin())
            .map_err(|e| FormError::Serialize(format!("font error: {e}")))?;
        fonts.insert(font, font_ref);
    }

    layer.set_outline_thickness(mm_to_pt(BORDER_WIDTH_MM));
    for op in page.into_ops() {
        replay(&layer, &fonts, op)?;
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| FormError::Serialize(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| FormError::Serialize(format!("buffer error: {e}")))
}

/// Emit one operation, flipping from top-left millimetres to printpdf's bottom-left origin.
fn replay(
    layer: &PdfLayerReference,
    fonts: &HashMap<Font, IndirectFontRef>,
    op: DrawOp,
) -> FormResult<()> {
    match op {
        DrawOp::Fill { rect, color } => {
            layer.set_fill_color(pdf_color(color));
            layer.add_rect(pdf_rect(&rect).with_mode(PaintMode::Fill));
        }
        DrawOp::Stroke { rect, color } => {
            layer.set_outline_color(pdf_color(color));
            layer.add_rect(pdf_rect(&rect).with_mode(PaintMode::Stroke));
        }
        DrawOp::Text {
            x,
            baseline,
            text,
            font,
            size,
            color,
        } => {
            let font_ref = fonts
                .get(&font)
                .ok_or_else(|| FormError::Serialize(format!("font {font:?} not registered")))?;
            layer.set_fill_color(pdf_color(color));
            layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT_MM - baseline), font_ref);
        }
    }
    Ok(())
}

fn pdf_rect(rect: &crate::page::Rect) -> printpdf::Rect {
    let bottom = PAGE_HEIGHT_MM - rect.y - rect.h;
    printpdf::Rect::new(
        Mm(rect.x),
        Mm(bottom),
        Mm(rect.x + rect.w),
        Mm(bottom + rect.h),
    )
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.fractions();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}
