//! Draws a laid-out [`Page`] with printpdf.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Polygon,
};

use crate::logo::LogoImage;

use super::fonts::Font;
use super::layout::{rounded_rect_points, DrawOp, Page, Stroke, PAGE_HEIGHT, PAGE_WIDTH};
use super::theme::Rgb;
use super::RenderError;

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(mm(x), mm(y)), false)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Helvetica => &self.regular,
            Font::HelveticaBold => &self.bold,
        }
    }
}

/// Writes `page` as a single-page A4 PDF at `path`.
pub fn write_pdf(
    page: &Page,
    logo: Option<&LogoImage>,
    title: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let (doc, page_index, layer_index) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Invoice");
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for op in &page.ops {
        draw(&layer, &fonts, logo, op);
    }

    let file = File::create(path).map_err(|source| RenderError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, logo: Option<&LogoImage>, op: &DrawOp) {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let ring = vec![
                point(*x, *y),
                point(*x + *width, *y),
                point(*x + *width, *y + *height),
                point(*x, *y + *height),
            ];
            draw_shape(layer, ring, *fill, *stroke);
        }
        DrawOp::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
            fill,
        } => {
            let ring = rounded_rect_points(*x, *y, *width, *height, *radius)
                .into_iter()
                .map(|(px, py)| point(px, py))
                .collect();
            draw_shape(layer, ring, Some(*fill), None);
        }
        DrawOp::Polygon { points, fill } => {
            let ring = points.iter().map(|(px, py)| point(*px, *py)).collect();
            draw_shape(layer, ring, Some(*fill), None);
        }
        DrawOp::Line { from, to, stroke } => {
            apply_stroke(layer, *stroke);
            layer.add_line(Line {
                points: vec![point(from.0, from.1), point(to.0, to.1)],
                is_closed: false,
            });
        }
        DrawOp::Text {
            text,
            font,
            size,
            color: fill,
            ..
        } => {
            if let Some((left, baseline)) = op.text_origin() {
                layer.set_fill_color(color(*fill));
                layer.use_text(text.clone(), *size, mm(left), mm(baseline), fonts.get(*font));
            }
        }
        DrawOp::Logo {
            x,
            y,
            width,
            height,
        } => {
            if let Some(logo) = logo {
                let (px_w, px_h) = (logo.width() as f32, logo.height() as f32);
                // At 72 dpi one pixel is one point, so scale maps pixels to
                // the target box directly.
                Image::from_dynamic_image(&logo.image).add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(mm(*x)),
                        translate_y: Some(mm(*y)),
                        scale_x: Some(*width / px_w),
                        scale_y: Some(*height / px_h),
                        dpi: Some(72.0),
                        ..Default::default()
                    },
                );
            }
        }
    }
}

fn apply_stroke(layer: &PdfLayerReference, stroke: Stroke) {
    layer.set_outline_color(color(stroke.color));
    layer.set_outline_thickness(stroke.width);
}

fn draw_shape(
    layer: &PdfLayerReference,
    ring: Vec<(Point, bool)>,
    fill: Option<Rgb>,
    stroke: Option<Stroke>,
) {
    let mode = match (fill, stroke) {
        (Some(_), Some(_)) => PaintMode::FillStroke,
        (Some(_), None) => PaintMode::Fill,
        (None, Some(_)) => PaintMode::Stroke,
        (None, None) => return,
    };
    if let Some(fill) = fill {
        layer.set_fill_color(color(fill));
    }
    if let Some(stroke) = stroke {
        apply_stroke(layer, stroke);
    }
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode,
        winding_order: WindingOrder::NonZero,
    });
}
