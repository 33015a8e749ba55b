//! Fixed invoice layout expressed as a display list.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! an A4 page. Nothing here touches the PDF library, so the whole page can be
//! inspected in tests.

use log::warn;

use crate::config::Branding;
use crate::invoice::models::InvoiceForm;

use super::amounts::{clean_amount, format_amount, Totals};
use super::fonts::{string_width, winansi_text, Font};
use super::theme::{Rgb, Theme};

pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;

const MARGIN_X: f32 = 40.0;
const LOGO_WIDTH: f32 = 80.0;
const ROW_HEIGHT: f32 = 30.0;
const RULE_WIDTH: f32 = 0.5;
const FOOTER_RULE_Y: f32 = 45.0;

const TABLE_HEADERS: [(&str, f32); 6] = [
    ("NO.", 55.0),
    ("ITEM DESCRIPTION", 230.0),
    ("QTY", 375.0),
    ("PRICE", 435.0),
    ("DISCOUNT", 500.0),
    ("TOTAL", 555.0),
];
const COLUMN_EDGES: [f32; 8] = [40.0, 70.0, 320.0, 390.0, 440.0, 490.0, 535.0, 580.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Rgb,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    /// `x` is the anchor: left edge, center, or right edge depending on
    /// `align`.
    Text {
        text: String,
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Rgb,
        align: Align,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl DrawOp {
    /// Left edge of a text run after alignment.
    pub fn text_origin(&self) -> Option<(f32, f32)> {
        match self {
            Self::Text {
                text,
                x,
                y,
                font,
                size,
                align,
                ..
            } => {
                let width = string_width(text, *font, *size);
                let left = match align {
                    Align::Left => *x,
                    Align::Center => *x - width / 2.0,
                    Align::Right => *x - width,
                };
                Some((left, *y))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    pub totals: Totals,
    /// Lowest y reached by the body content, above the footer.
    pub content_bottom: f32,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }

    pub fn logo(&self) -> Option<&DrawOp> {
        self.ops.iter().find(|op| matches!(op, DrawOp::Logo { .. }))
    }

    /// True when body content runs into the footer band.
    pub fn overflows(&self) -> bool {
        self.content_bottom < FOOTER_RULE_Y
    }
}

/// Lays out the whole invoice. `logo_size` is the pixel size of the logo
/// bitmap, if one is going to be embedded.
pub fn layout(form: &InvoiceForm, logo_size: Option<(u32, u32)>, branding: &Branding) -> Page {
    let theme = Theme::from_form(form.primary_color.as_deref(), form.secondary_color.as_deref());
    let totals = Totals::from_items(&form.items);

    let mut composer = Composer {
        ops: Vec::new(),
        theme,
        currency: branding.currency.as_str(),
    };

    composer.top_decoration();
    let header_y = PAGE_HEIGHT - 110.0;
    composer.header(form, logo_size, header_y);

    let mut y = header_y - 65.0;
    y = composer.customer_section(form, y);
    y = composer.order_section(form, y);
    y = composer.totals_section(&totals, y);
    y = composer.delivery_section(form, y);
    composer.footer(form, branding);

    Page {
        ops: composer.ops,
        totals,
        content_bottom: y,
    }
}

struct Composer<'a> {
    ops: Vec<DrawOp>,
    theme: Theme,
    currency: &'a str,
}

impl Composer<'_> {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: Some(fill),
            stroke: None,
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke: Some(Stroke {
                color,
                width: RULE_WIDTH,
            }),
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            stroke: Stroke { color, width },
        });
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, font: Font, size: f32, align: Align) {
        let color = self.theme.text;
        self.colored_text(text, x, y, font, size, color, align);
    }

    #[allow(clippy::too_many_arguments)]
    fn colored_text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Rgb,
        align: Align,
    ) {
        let raw = text.into();
        let text = winansi_text(&raw).into_owned();
        if text.len() != raw.len() {
            warn!("Dropping characters the builtin fonts cannot encode from {:?}", raw);
        }
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            text,
            x,
            y,
            font,
            size,
            color,
            align,
        });
    }

    fn section_label(&mut self, label: &str, y: f32, width: f32, size: f32) {
        self.ops.push(DrawOp::RoundedRect {
            x: MARGIN_X,
            y,
            width,
            height: 24.0,
            radius: 4.0,
            fill: self.theme.section_background,
        });
        self.text(label, MARGIN_X + 10.0, y + 7.0, Font::HelveticaBold, size, Align::Left);
    }

    fn money(&self, amount: &str) -> String {
        format!("{} {}", amount, self.currency)
    }

    fn top_decoration(&mut self) {
        let (w, h) = (PAGE_WIDTH, PAGE_HEIGHT);
        self.fill_rect(0.0, h - 15.0, w * 0.7, 15.0, self.theme.secondary);
        self.fill_rect(w * 0.7, h - 15.0, w * 0.3, 15.0, self.theme.primary);
        self.ops.push(DrawOp::Polygon {
            points: vec![
                (w - 320.0, h - 15.0),
                (w, h - 15.0),
                (w, h - 45.0),
                (w - 260.0, h - 45.0),
            ],
            fill: self.theme.primary,
        });
    }

    fn header(&mut self, form: &InvoiceForm, logo_size: Option<(u32, u32)>, header_y: f32) {
        let logo_drawn = match logo_size {
            Some((px_w, px_h)) if px_w > 0 && px_h > 0 => {
                let height = LOGO_WIDTH * (px_h as f32 / px_w as f32);
                self.ops.push(DrawOp::Logo {
                    x: MARGIN_X,
                    y: header_y - height / 2.0,
                    width: LOGO_WIDTH,
                    height,
                });
                true
            }
            _ => false,
        };

        let text_x = if logo_drawn {
            MARGIN_X + LOGO_WIDTH + 20.0
        } else {
            MARGIN_X
        };
        let (first, rest) = form.name_parts();
        let name_y = header_y - 12.0;
        self.colored_text(first, text_x, name_y, Font::HelveticaBold, 32.0, self.theme.primary, Align::Left);
        if !rest.is_empty() {
            let rest_x = text_x + string_width(first, Font::HelveticaBold, 32.0) + 12.0;
            self.colored_text(rest, rest_x, name_y, Font::HelveticaBold, 32.0, self.theme.secondary, Align::Left);
        }

        let info_x = PAGE_WIDTH - MARGIN_X;
        self.text(form.company_name.as_str(), info_x, header_y + 15.0, Font::Helvetica, 9.0, Align::Right);
        self.text(form.company_address.as_str(), info_x, header_y + 3.0, Font::Helvetica, 9.0, Align::Right);
        self.text(form.company_email.as_str(), info_x, header_y - 9.0, Font::Helvetica, 9.0, Align::Right);
    }

    fn customer_section(&mut self, form: &InvoiceForm, mut y: f32) -> f32 {
        self.section_label("CUSTOMER INFORMATION", y, 160.0, 10.0);
        y -= 30.0;

        let fields = [
            ("COMPANY", form.client_name.as_str()),
            ("PHONE NO", form.client_phone.as_str()),
            ("EMAIL", form.client_email.as_str()),
        ];
        for (label, value) in fields {
            self.text(label, MARGIN_X, y, Font::HelveticaBold, 8.0, Align::Left);
            self.text(value, MARGIN_X + 90.0, y, Font::Helvetica, 9.0, Align::Left);
            self.line(
                (MARGIN_X + 90.0, y - 2.0),
                (PAGE_WIDTH - MARGIN_X, y - 2.0),
                self.theme.secondary,
                RULE_WIDTH,
            );
            y -= 20.0;
        }

        y - 25.0
    }

    fn order_section(&mut self, form: &InvoiceForm, mut y: f32) -> f32 {
        self.section_label("ORDER DETAILS", y, 120.0, 10.0);

        y -= 35.0;
        let band_width = PAGE_WIDTH - MARGIN_X * 2.0;
        let (background, border) = (self.theme.section_background, self.theme.border);
        self.stroke_rect(MARGIN_X, y, band_width, 35.0, Some(background), border);
        for (title, x) in TABLE_HEADERS {
            self.text(title, x, y + 12.0, Font::HelveticaBold, 8.0, Align::Center);
        }

        y -= ROW_HEIGHT;
        for item in &form.items {
            for edges in COLUMN_EDGES.windows(2) {
                self.stroke_rect(edges[0], y, edges[1] - edges[0], ROW_HEIGHT, None, border);
            }

            let baseline = y + 10.0;
            self.text(item.number.to_string(), 55.0, baseline, Font::Helvetica, 8.0, Align::Center);
            self.text(item.name.as_str(), 75.0, baseline, Font::Helvetica, 8.0, Align::Left);
            self.text(item.quantity.as_str(), 415.0, baseline, Font::Helvetica, 8.0, Align::Center);
            let price = self.money(&item.price);
            self.text(price, 465.0, baseline, Font::Helvetica, 8.0, Align::Center);
            let discount = self.money("0");
            self.text(discount, 512.0, baseline, Font::Helvetica, 8.0, Align::Center);
            let total = self.money(&clean_amount(&item.total));
            self.text(total, 557.0, baseline, Font::Helvetica, 8.0, Align::Center);

            y -= ROW_HEIGHT;
        }

        y
    }

    fn totals_section(&mut self, totals: &Totals, mut y: f32) -> f32 {
        let total_width = 110.0;
        let cell_width = total_width / 2.0;
        let start_x = PAGE_WIDTH - MARGIN_X - total_width;
        let amount_x = PAGE_WIDTH - MARGIN_X - 5.0;
        let (background, border) = (self.theme.section_background, self.theme.border);

        y -= 10.0;
        let rows = [
            ("GST TAX 5%", totals.tax, 5.0, 7.0),
            ("TOTAL", totals.total, 10.0, 9.0),
        ];
        for (i, (label, amount, label_inset, size)) in rows.into_iter().enumerate() {
            if i > 0 {
                y -= 25.0;
            }
            self.stroke_rect(start_x, y, cell_width, 25.0, Some(background), border);
            self.stroke_rect(start_x + cell_width, y, cell_width, 25.0, Some(background), border);
            self.text(label, start_x + label_inset, y + 8.0, Font::HelveticaBold, size, Align::Left);
            let amount = self.money(&format_amount(amount));
            self.text(amount, amount_x, y + 8.0, Font::HelveticaBold, size, Align::Right);
        }

        y
    }

    fn delivery_section(&mut self, form: &InvoiceForm, mut y: f32) -> f32 {
        y -= 50.0;
        self.section_label("DELIVERY DETAILS", y, 110.0, 9.0);

        y -= 45.0;
        let secondary = self.theme.secondary;
        self.stroke_rect(MARGIN_X, y, 180.0, 20.0, None, secondary);
        self.stroke_rect(MARGIN_X, y - 20.0, 180.0, 20.0, None, secondary);
        self.line((MARGIN_X + 80.0, y - 20.0), (MARGIN_X + 80.0, y + 20.0), secondary, RULE_WIDTH);

        self.text("METHOD", MARGIN_X + 5.0, y + 6.0, Font::HelveticaBold, 8.0, Align::Left);
        self.text("DATE", MARGIN_X + 5.0, y - 14.0, Font::HelveticaBold, 8.0, Align::Left);
        self.text(form.delivery_method.as_str(), MARGIN_X + 85.0, y + 6.0, Font::Helvetica, 8.0, Align::Left);
        self.text(form.invoice_date.as_str(), MARGIN_X + 85.0, y - 14.0, Font::Helvetica, 8.0, Align::Left);

        let signature_x = PAGE_WIDTH - MARGIN_X - 100.0;
        self.text(form.contact_person.as_str(), signature_x, y, Font::HelveticaBold, 10.0, Align::Center);
        self.text(form.contact_title.as_str(), signature_x, y - 15.0, Font::HelveticaBold, 10.0, Align::Center);

        y - 20.0
    }

    fn footer(&mut self, form: &InvoiceForm, branding: &Branding) {
        self.line(
            (MARGIN_X, FOOTER_RULE_Y),
            (PAGE_WIDTH - MARGIN_X, FOOTER_RULE_Y),
            self.theme.secondary,
            0.2,
        );
        let line = format!(
            "Email: {}    |    Web: {}",
            form.company_email, branding.website
        );
        self.text(line, PAGE_WIDTH / 2.0, 30.0, Font::Helvetica, 8.0, Align::Center);
    }
}

/// Outline of a rounded rectangle, corners approximated with short chords.
pub fn rounded_rect_points(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Vec<(f32, f32)> {
    const STEPS: usize = 6;
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let corners = [
        (x + width - r, y + r, -90.0_f32),
        (x + width - r, y + height - r, 0.0),
        (x + r, y + height - r, 90.0),
        (x + r, y + r, 180.0),
    ];

    let mut points = Vec::with_capacity(corners.len() * (STEPS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=STEPS {
            let angle = (start + 90.0 * step as f32 / STEPS as f32).to_radians();
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    points
}
