use std::collections::HashMap;

use invoice_pdf_server::config::Branding;
use invoice_pdf_server::invoice::models::InvoiceForm;
use invoice_pdf_server::render::fonts::{string_width, Font};
use invoice_pdf_server::render::layout::{layout, DrawOp, Page, Stroke, PAGE_HEIGHT, PAGE_WIDTH};
use invoice_pdf_server::render::theme::{parse_hex_color, Rgb, DEFAULT_PRIMARY, DEFAULT_SECONDARY};

#[cfg(test)]
mod layout_tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> InvoiceForm {
        let fields: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InvoiceForm::from_fields(&fields)
    }

    fn two_item_form() -> InvoiceForm {
        form(&[
            ("company_name", "Lancers Tech"),
            ("company_email", "info@lancerstech.com"),
            ("client_name", "Acme Corp"),
            ("invoice_date", "2025-11-05"),
            ("product_name_0", "Course"),
            ("product_quantity_0", "1"),
            ("product_price_0", "5,000"),
            ("product_total_0", "5,000"),
            ("product_name_1", "Workshop"),
            ("product_quantity_1", "2"),
            ("product_price_1", "5,000"),
            ("product_total_1", "$10,000"),
        ])
    }

    fn items_form(count: usize) -> InvoiceForm {
        let mut fields = HashMap::new();
        for i in 0..count {
            fields.insert(format!("product_name_{}", i), format!("Item {}", i));
            fields.insert(format!("product_total_{}", i), "100".to_string());
        }
        InvoiceForm::from_fields(&fields)
    }

    fn text_x(op: Option<&DrawOp>) -> f32 {
        match op {
            Some(DrawOp::Text { x, .. }) => *x,
            other => panic!("expected text op, got {:?}", other),
        }
    }

    const W: f32 = PAGE_WIDTH;
    const H: f32 = PAGE_HEIGHT;
    const COLUMN_EDGES: [f32; 8] = [40.0, 70.0, 320.0, 390.0, 440.0, 490.0, 535.0, 580.0];

    // Body y positions for a page with two items.
    const ORDER_BAND_Y: f32 = H - 110.0 - 65.0 - 30.0 - 60.0 - 25.0 - 35.0;
    const FIRST_ROW_Y: f32 = ORDER_BAND_Y - 30.0;
    const DELIVERY_CELL_Y: f32 = FIRST_ROW_Y - 2.0 * 30.0 - 35.0 - 50.0 - 45.0;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn close_point(a: (f32, f32), b: (f32, f32)) -> bool {
        close(a.0, b.0) && close(a.1, b.1)
    }

    fn rects_at(page: &Page, rx: f32, ry: f32, rw: f32, rh: f32) -> Vec<&DrawOp> {
        page.ops
            .iter()
            .filter(|op| match op {
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => close(*x, rx) && close(*y, ry) && close(*width, rw) && close(*height, rh),
                _ => false,
            })
            .collect()
    }

    fn has_line(page: &Page, from: (f32, f32), to: (f32, f32), width: f32) -> bool {
        page.ops.iter().any(|op| match op {
            DrawOp::Line {
                from: f,
                to: t,
                stroke: Stroke { width: w, .. },
            } => close_point(*f, from) && close_point(*t, to) && close(*w, width),
            _ => false,
        })
    }

    fn color(hex: &str) -> Rgb {
        parse_hex_color(hex).expect("valid test color")
    }

    #[test]
    fn test_totals_block_shows_tax_and_grand_total() {
        let page = layout(&two_item_form(), None, &Branding::default());

        assert_eq!(page.totals.subtotal, 15000.0);
        assert!(page.find_text("GST TAX 5%").is_some());
        assert!(page.find_text("750 PKR").is_some());
        assert!(page.find_text("15,750 PKR").is_some());
    }

    #[test]
    fn test_item_rows_print_cleaned_totals() {
        let page = layout(&two_item_form(), None, &Branding::default());

        assert!(page.find_text("Course").is_some());
        assert!(page.find_text("Workshop").is_some());
        assert!(page.find_text("10000 PKR").is_some());
        assert!(page.find_text("5,000 PKR").is_some());
        assert!(page.find_text("0 PKR").is_some());
    }

    #[test]
    fn test_empty_form_still_lays_out_defaults() {
        let page = layout(&InvoiceForm::default(), None, &Branding::default());

        assert!(page.find_text("Lancers").is_some());
        assert!(page.find_text("ORDER DETAILS").is_some());
        assert!(page.find_text("0 PKR").is_some());
        assert!(page.find_text("ON-CAMPUS TRAINING").is_some());
        assert!(page.find_text("C.E.O").is_some());
        assert!(!page.overflows());
    }

    #[test]
    fn test_company_name_split_moves_right_of_logo() {
        let without_logo = layout(&two_item_form(), None, &Branding::default());
        let with_logo = layout(&two_item_form(), Some((200, 100)), &Branding::default());

        assert_eq!(text_x(without_logo.find_text("Lancers")), 40.0);
        assert_eq!(text_x(with_logo.find_text("Lancers")), 140.0);
        assert!(text_x(with_logo.find_text("Tech")) > 140.0);
        assert!(without_logo.logo().is_none());
    }

    #[test]
    fn test_logo_keeps_aspect_ratio() {
        let page = layout(&two_item_form(), Some((200, 100)), &Branding::default());

        match page.logo() {
            Some(DrawOp::Logo {
                x,
                y,
                width,
                height,
            }) => {
                assert_eq!(*x, 40.0);
                assert_eq!(*width, 80.0);
                assert_eq!(*height, 40.0);
                assert!((*y - (PAGE_HEIGHT - 110.0 - 20.0)).abs() < 1e-3);
            }
            other => panic!("expected logo op, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_sized_logo_is_not_placed() {
        let page = layout(&two_item_form(), Some((0, 10)), &Branding::default());
        assert!(page.logo().is_none());
        assert_eq!(text_x(page.find_text("Lancers")), 40.0);
    }

    #[test]
    fn test_footer_uses_company_email_and_website() {
        let branding = Branding {
            currency: "USD".to_string(),
            website: "example.test".to_string(),
        };
        let page = layout(&two_item_form(), None, &branding);

        assert!(page
            .find_text("Email: info@lancerstech.com    |    Web: example.test")
            .is_some());
        assert!(page.find_text("15,750 USD").is_some());
    }

    #[test]
    fn test_custom_primary_color_reaches_company_name() {
        let mut form = two_item_form();
        form.primary_color = Some("#102030".to_string());
        let page = layout(&form, None, &Branding::default());

        match page.find_text("Lancers") {
            Some(DrawOp::Text { color, .. }) => {
                assert_eq!(Some(*color), parse_hex_color("#102030"));
                assert_ne!(Some(*color), parse_hex_color(DEFAULT_PRIMARY));
            }
            other => panic!("expected text op, got {:?}", other),
        }
    }

    #[test]
    fn test_long_item_lists_overflow_the_page() {
        assert!(!layout(&items_form(9), None, &Branding::default()).overflows());
        assert!(layout(&items_form(10), None, &Branding::default()).overflows());
    }

    #[test]
    fn test_top_decoration_bars_and_accent() {
        let page = layout(&two_item_form(), None, &Branding::default());

        let left = rects_at(&page, 0.0, H - 15.0, W * 0.7, 15.0);
        assert!(matches!(left.as_slice(), [DrawOp::Rect { fill: Some(c), stroke: None, .. }] if *c == color(DEFAULT_SECONDARY)));
        let right = rects_at(&page, W * 0.7, H - 15.0, W * 0.3, 15.0);
        assert!(matches!(right.as_slice(), [DrawOp::Rect { fill: Some(c), stroke: None, .. }] if *c == color(DEFAULT_PRIMARY)));

        let accent = page
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Polygon { points, fill } => Some((points, *fill)),
                _ => None,
            })
            .expect("accent polygon");
        let expected = [
            (W - 320.0, H - 15.0),
            (W, H - 15.0),
            (W, H - 45.0),
            (W - 260.0, H - 45.0),
        ];
        assert_eq!(accent.0.len(), 4);
        for (got, want) in accent.0.iter().zip(expected) {
            assert!(close_point(*got, want), "{:?} != {:?}", got, want);
        }
        assert_eq!(accent.1, color(DEFAULT_PRIMARY));
    }

    #[test]
    fn test_order_header_band_spans_the_content_width() {
        let page = layout(&two_item_form(), None, &Branding::default());

        let band = rects_at(&page, 40.0, ORDER_BAND_Y, W - 80.0, 35.0);
        match band.as_slice() {
            [DrawOp::Rect {
                fill: Some(_),
                stroke: Some(stroke),
                ..
            }] => assert!(close(stroke.width, 0.5)),
            other => panic!("expected one header band, got {:?}", other),
        }
        assert!(matches!(
            page.find_text("ITEM DESCRIPTION"),
            Some(DrawOp::Text { y, .. }) if close(*y, ORDER_BAND_Y + 12.0)
        ));
    }

    #[test]
    fn test_each_item_row_has_one_cell_per_column() {
        let page = layout(&two_item_form(), None, &Branding::default());

        for row in 0..2 {
            let row_y = FIRST_ROW_Y - 30.0 * row as f32;
            for edges in COLUMN_EDGES.windows(2) {
                let cells = rects_at(&page, edges[0], row_y, edges[1] - edges[0], 30.0);
                assert!(
                    matches!(cells.as_slice(), [DrawOp::Rect { fill: None, stroke: Some(_), .. }]),
                    "missing cell at x={} row={}",
                    edges[0],
                    row
                );
            }
        }
        assert!(matches!(
            page.find_text("Workshop"),
            Some(DrawOp::Text { x, y, .. }) if close(*x, 75.0) && close(*y, FIRST_ROW_Y - 30.0 + 10.0)
        ));
    }

    #[test]
    fn test_delivery_cells_divider_and_signature() {
        let page = layout(&two_item_form(), None, &Branding::default());
        let y = DELIVERY_CELL_Y;
        let secondary = color(DEFAULT_SECONDARY);

        for cell_y in [y, y - 20.0] {
            let cells = rects_at(&page, 40.0, cell_y, 180.0, 20.0);
            assert!(matches!(
                cells.as_slice(),
                [DrawOp::Rect { fill: None, stroke: Some(Stroke { color, .. }), .. }] if *color == secondary
            ));
        }
        assert!(has_line(&page, (120.0, y - 20.0), (120.0, y + 20.0), 0.5));

        assert!(matches!(
            page.find_text("CH.Shahrukh Farooq"),
            Some(DrawOp::Text { x, y: ty, .. }) if close(*x, W - 140.0) && close(*ty, y)
        ));
        assert!(matches!(
            page.find_text("C.E.O"),
            Some(DrawOp::Text { x, y: ty, .. }) if close(*x, W - 140.0) && close(*ty, y - 15.0)
        ));
        assert!(close(page.content_bottom, y - 20.0));
    }

    #[test]
    fn test_footer_rule_sits_at_the_page_bottom() {
        let page = layout(&two_item_form(), None, &Branding::default());
        assert!(has_line(&page, (40.0, 45.0), (W - 40.0, 45.0), 0.2));
    }

    #[test]
    fn test_page_texts_lists_every_text_run_in_order() {
        let page = layout(&two_item_form(), None, &Branding::default());
        let texts: Vec<&str> = page.texts().collect();

        let position = |needle: &str| texts.iter().position(|t| *t == needle);
        let customer = position("CUSTOMER INFORMATION").expect("customer label");
        let order = position("ORDER DETAILS").expect("order label");
        let delivery = position("DELIVERY DETAILS").expect("delivery label");
        assert!(customer < order && order < delivery);
        assert!(texts.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_unencodable_text_is_dropped_before_alignment() {
        let page = layout(
            &form(&[
                ("client_name", "شرکت"),
                ("client_phone", "Café 42"),
                ("company_address", "Plot 12 شرکت"),
            ]),
            None,
            &Branding::default(),
        );

        assert!(page.texts().all(|t| !t.contains('ش')));
        assert!(page.find_text("Café 42").is_some());

        let address = page.find_text("Plot 12 ").expect("address kept its encodable part");
        let (left, _) = address.text_origin().expect("text op");
        let width = string_width("Plot 12 ", Font::Helvetica, 9.0);
        assert!(close(left + width, W - 40.0));
    }
}
