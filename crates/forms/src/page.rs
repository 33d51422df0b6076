//! Drawing primitives for a single A4 page.
//!
//! Positions are given in millimetres from the top-left corner, the way the layout is
//! designed, and converted to PDF user space (points, origin bottom-left) when emitted.

use crate::error::{FormError, FormResult};
use crate::text::{sanitize, wrap_words};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Rough average glyph width of Helvetica, as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Single-line form boxes wrap once content exceeds this many characters.
const FORM_BOX_WRAP_CHARS: usize = 50;
const FORM_BOX_MAX_LINES: usize = 3;

/// Border width in millimetres.
pub const BORDER_WIDTH_MM: f32 = 0.2;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BORDER: Rgb = Rgb(100, 100, 100);
    pub const LABEL_BAND: Rgb = Rgb(240, 240, 240);
    pub const LETTERHEAD: Rgb = Rgb(20, 50, 120);
    pub const MUTED: Rgb = Rgb(128, 128, 128);

    /// Channels scaled to `0.0..=1.0`.
    pub fn fractions(self) -> (f32, f32, f32) {
        let scale = |c: u8| f32::from(c) / 255.0;
        (scale(self.0), scale(self.1), scale(self.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];

    pub fn builtin(self) -> printpdf::BuiltinFont {
        match self {
            Font::Regular => printpdf::BuiltinFont::Helvetica,
            Font::Bold => printpdf::BuiltinFont::HelveticaBold,
            Font::Italic => printpdf::BuiltinFont::HelveticaOblique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Styling for a line of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    /// Size in points.
    pub size: f32,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(font: Font, size: f32) -> Self {
        Self {
            font,
            size,
            color: Rgb::BLACK,
            align: Align::Left,
        }
    }

    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub const fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

/// One drawable item of a form section.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Filled rectangle without border.
    Band { rect: Rect, color: Rgb },
    /// A line of text vertically centred in `rect`.
    Text {
        rect: Rect,
        text: String,
        style: TextStyle,
    },
    /// Bordered box with a shaded label band and a short value.
    FormBox {
        rect: Rect,
        label: String,
        content: String,
        multiline: bool,
    },
    /// Bordered box with a label band and word-wrapped free text.
    TextBox {
        rect: Rect,
        label: String,
        content: String,
    },
}

/// A primitive page operation. Coordinates are millimetres from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Stroke {
        rect: Rect,
        color: Rgb,
    },
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: Font,
        size: f32,
        color: Rgb,
    },
}

/// Accumulates draw operations for one page.
#[derive(Debug, Default)]
pub struct Canvas {
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Every line of text on the canvas, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn append(&mut self, other: Canvas) {
        self.ops.extend(other.ops);
    }

    pub fn draw(&mut self, element: &Element) -> FormResult<()> {
        match element {
            Element::Band { rect, color } => {
                check_bounds("band", rect)?;
                self.fill_rect(rect, *color);
                Ok(())
            }
            Element::Text { rect, text, style } => self.cell(rect, text, *style),
            Element::FormBox {
                rect,
                label,
                content,
                multiline,
            } => self.form_box(rect, label, content, *multiline),
            Element::TextBox {
                rect,
                label,
                content,
            } => self.text_box(rect, label, content),
        }
    }

    fn form_box(
        &mut self,
        rect: &Rect,
        label: &str,
        content: &str,
        multiline: bool,
    ) -> FormResult<()> {
        check_bounds(label, rect)?;
        self.fill_rect(&Rect::new(rect.x, rect.y, rect.w, 8.0), Rgb::LABEL_BAND);
        self.stroke_rect(rect, Rgb::BORDER);

        let inner_w = rect.w - 4.0;
        self.cell(
            &Rect::new(rect.x + 2.0, rect.y + 1.0, inner_w, 6.0),
            label,
            TextStyle::new(Font::Bold, 8.0),
        )?;

        let content = sanitize(content);
        let style = TextStyle::new(Font::Regular, 10.0);
        if multiline && content.len() > FORM_BOX_WRAP_CHARS {
            // Only as many 5mm lines as fit below the label band.
            let max_lines = (((rect.h - 10.0) / 5.0) as usize).clamp(1, FORM_BOX_MAX_LINES);
            let lines = wrap_words(&content, FORM_BOX_WRAP_CHARS, max_lines);
            for (i, line) in lines.iter().enumerate() {
                let y = rect.y + 10.0 + i as f32 * 5.0;
                self.cell(&Rect::new(rect.x + 2.0, y, inner_w, 5.0), line, style)?;
            }
            Ok(())
        } else {
            self.cell(
                &Rect::new(rect.x + 2.0, rect.y + 10.0, inner_w, 5.0),
                &content,
                style,
            )
        }
    }

    fn text_box(&mut self, rect: &Rect, label: &str, content: &str) -> FormResult<()> {
        check_bounds(label, rect)?;
        self.fill_rect(&Rect::new(rect.x, rect.y, rect.w, 10.0), Rgb::LABEL_BAND);
        self.stroke_rect(rect, Rgb::BORDER);

        let inner_w = rect.w - 4.0;
        self.cell(
            &Rect::new(rect.x + 2.0, rect.y + 2.0, inner_w, 6.0),
            label,
            TextStyle::new(Font::Bold, 9.0),
        )?;

        let chars_per_line = (inner_w / 2.5) as usize;
        let max_lines = (((rect.h - 12.0) / 4.0) as usize).max(1);
        let content = sanitize(content);
        let style = TextStyle::new(Font::Regular, 9.0);
        for (i, line) in wrap_words(&content, chars_per_line, max_lines)
            .iter()
            .enumerate()
        {
            let y = rect.y + 12.0 + i as f32 * 4.0;
            self.cell(&Rect::new(rect.x + 2.0, y, inner_w, 4.0), line, style)?;
        }
        Ok(())
    }

    /// Draw `text` on one line inside `rect`, vertically centred.
    fn cell(&mut self, rect: &Rect, text: &str, style: TextStyle) -> FormResult<()> {
        check_bounds(text, rect)?;
        let text = sanitize(text);
        if text.is_empty() {
            return Ok(());
        }

        let size_mm = style.size / PT_PER_MM;
        let x = match style.align {
            Align::Left => rect.x,
            Align::Center => {
                let width = text.len() as f32 * size_mm * AVG_GLYPH_WIDTH;
                rect.x + ((rect.w - width) / 2.0).max(0.0)
            }
        };
        let baseline = rect.y + rect.h / 2.0 + 0.3 * size_mm;

        self.ops.push(DrawOp::Text {
            x,
            baseline,
            text,
            font: style.font,
            size: style.size,
            color: style.color,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rect, color: Rgb) {
        self.ops.push(DrawOp::Fill { rect: *rect, color });
    }

    fn stroke_rect(&mut self, rect: &Rect, color: Rgb) {
        self.ops.push(DrawOp::Stroke { rect: *rect, color });
    }
}

fn check_bounds(element: &str, rect: &Rect) -> FormResult<()> {
    const EPSILON: f32 = 0.01;
    let fits = rect.x >= -EPSILON
        && rect.y >= -EPSILON
        && rect.w >= 0.0
        && rect.h >= 0.0
        && rect.x + rect.w <= PAGE_WIDTH_MM + EPSILON
        && rect.y + rect.h <= PAGE_HEIGHT_MM + EPSILON;

    if fits {
        Ok(())
    } else {
        Err(FormError::OutOfBounds {
            element: sanitize(element),
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_text(canvas: &Canvas) -> Vec<String> {
        canvas.texts().map(String::from).collect()
    }

    #[test]
    fn form_box_draws_band_border_label_and_value() {
        let mut canvas = Canvas::new();
        canvas
            .draw(&Element::FormBox {
                rect: Rect::new(8.0, 35.0, 88.0, 16.0),
                label: "DATE OF REFERRAL".into(),
                content: "10/19/2026".into(),
                multiline: false,
            })
            .expect("draw");

        let ops = canvas.ops();
        assert!(matches!(ops[0], DrawOp::Fill { color: Rgb::LABEL_BAND, .. }));
        assert!(matches!(ops[1], DrawOp::Stroke { color: Rgb::BORDER, .. }));
        assert_eq!(shown_text(&canvas), vec!["DATE OF REFERRAL", "10/19/2026"]);
    }

    #[test]
    fn multiline_form_box_wraps_to_three_lines() {
        let mut canvas = Canvas::new();
        let content = "word ".repeat(60);
        canvas
            .draw(&Element::FormBox {
                rect: Rect::new(8.0, 100.0, 88.0, 25.0),
                label: "NOTES".into(),
                content,
                multiline: true,
            })
            .expect("draw");

        let text = shown_text(&canvas);
        // label + three content lines
        assert_eq!(text.len(), 4);
        assert!(text[1..].iter().all(|l| l.len() <= 50));
    }

    #[test]
    fn short_multiline_form_box_keeps_text_inside() {
        let rect = Rect::new(8.0, 111.0, 88.0, 18.0);
        let mut canvas = Canvas::new();
        canvas
            .draw(&Element::FormBox {
                rect,
                label: "REFERRING TO SPECIALIST".into(),
                content: "Dr. Alexandra Catherine Montgomery-Richardson, MD, PhD, FACC".into(),
                multiline: true,
            })
            .expect("draw");

        let baselines: Vec<f32> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { baseline, .. } => Some(*baseline),
                _ => None,
            })
            .collect();
        // label + one content line
        assert_eq!(baselines.len(), 2);
        assert!(baselines.iter().all(|b| *b < rect.y + rect.h), "{baselines:?}");
    }

    #[test]
    fn text_box_line_budget_follows_box_size() {
        let mut canvas = Canvas::new();
        let content = "lorem ipsum dolor sit amet ".repeat(20);
        canvas
            .draw(&Element::TextBox {
                rect: Rect::new(8.0, 151.0, 185.0, 20.0),
                label: "MAJOR COMPLAINT / SYMPTOMS".into(),
                content,
            })
            .expect("draw");

        let text = shown_text(&canvas);
        // 20mm tall box leaves room for two 4mm lines of at most 72 characters.
        assert_eq!(text.len(), 3);
        assert!(text[1..].iter().all(|l| l.len() <= 72));
    }

    #[test]
    fn short_text_box_still_shows_one_line() {
        let mut canvas = Canvas::new();
        canvas
            .draw(&Element::TextBox {
                rect: Rect::new(8.0, 199.0, 185.0, 18.0),
                label: "ANTICIPATED CPT CODES".into(),
                content: "99244 - Office consultation".into(),
            })
            .expect("draw");

        let text = shown_text(&canvas);
        assert_eq!(text, vec!["ANTICIPATED CPT CODES", "99244 - Office consultation"]);
    }

    #[test]
    fn element_outside_page_is_rejected() {
        let mut canvas = Canvas::new();
        let err = canvas
            .draw(&Element::FormBox {
                rect: Rect::new(150.0, 290.0, 88.0, 16.0),
                label: "OVERFLOW".into(),
                content: "x".into(),
                multiline: false,
            })
            .expect_err("box overflows the page");
        assert!(matches!(err, FormError::OutOfBounds { element, .. } if element == "OVERFLOW"));
    }

    #[test]
    fn text_is_sanitised_before_drawing() {
        let mut canvas = Canvas::new();
        canvas
            .draw(&Element::Text {
                rect: Rect::new(8.0, 8.0, 100.0, 6.0),
                text: "Patient\u{2019}s \u{201c}note\u{201d}".into(),
                style: TextStyle::new(Font::Regular, 9.0),
            })
            .expect("draw");
        assert_eq!(shown_text(&canvas), vec!["Patient's \"note\""]);
    }

    #[test]
    fn centred_text_is_shifted_right() {
        let mut canvas = Canvas::new();
        canvas
            .draw(&Element::Text {
                rect: Rect::new(0.0, 5.0, 210.0, 10.0),
                text: "MEDICAL REFERRAL FORM".into(),
                style: TextStyle::new(Font::Bold, 18.0).centered(),
            })
            .expect("draw");

        match &canvas.ops()[0] {
            DrawOp::Text { x, baseline, .. } => {
                assert!(*x > 50.0 && *x < 105.0, "x = {x}");
                assert!(*baseline > 10.0 && *baseline < 15.0, "baseline = {baseline}");
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn millimetres_convert_to_points() {
        assert!((mm_to_pt(PAGE_WIDTH_MM) - 595.27).abs() < 0.1);
        assert!((mm_to_pt(PAGE_HEIGHT_MM) - 841.89).abs() < 0.1);
    }
}
