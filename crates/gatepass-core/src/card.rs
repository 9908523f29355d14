// ── Shareable pass card composer ──
//
// Lays out a fixed-width card: title, QR code, host address, a one-line
// visit summary, and a wrapped instructional footer. The canvas height
// is computed from the wrapped line counts BEFORE allocation, so no
// content is ever clipped.
//
// Text measurement sits behind `TextMeasure` so layout is testable
// without font assets; production rasterization uses a caller-supplied
// TTF through `FontRasterizer`.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_text_mut;

use crate::error::CoreError;
use crate::model::PassRecord;

// ── Layout constants ────────────────────────────────────────────────

pub const CARD_WIDTH: u32 = 600;
const PADDING: u32 = 40;
const QR_DISPLAY_SIZE: u32 = 400;

const TITLE_PX: f32 = 36.0;
const ADDRESS_PX: f32 = 28.0;
const DETAILS_PX: f32 = 22.0;
const FOOTER_PX: f32 = 18.0;

const TITLE_HEIGHT: u32 = 40;
const ADDRESS_HEIGHT: u32 = 32;
const DETAILS_HEIGHT: u32 = 26;
const FOOTER_LINE_HEIGHT: u32 = 22;

const BG: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const TITLE_COLOR: Rgb<u8> = Rgb([0x1a, 0x2e, 0x23]);
const TEXT_COLOR: Rgb<u8> = Rgb([0x37, 0x41, 0x51]);
const FOOTER_COLOR: Rgb<u8> = Rgb([0x6b, 0x72, 0x80]);

const FOOTER_TEXT: &str = "Show this QR code to security. Scanning will open a page \
                           with the visitor's details for verification.";

// ── Text seams ──────────────────────────────────────────────────────

/// Width measurement for a single line of text at a pixel size.
pub trait TextMeasure {
    fn line_width(&self, text: &str, px: f32) -> f32;
}

/// Measurement plus actual glyph rasterization onto a canvas.
pub trait TextRasterizer: TextMeasure {
    fn draw_line(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, px: f32, text: &str);
}

/// TTF-backed rasterizer.
pub struct FontRasterizer {
    font: FontVec,
}

impl FontRasterizer {
    /// Load a font from raw TTF/OTF bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CoreError> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| CoreError::FontUnavailable {
            message: e.to_string(),
        })?;
        Ok(Self { font })
    }
}

impl TextMeasure for FontRasterizer {
    fn line_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

impl TextRasterizer for FontRasterizer {
    fn draw_line(
        &self,
        canvas: &mut RgbImage,
        color: Rgb<u8>,
        x: i32,
        y: i32,
        px: f32,
        text: &str,
    ) {
        draw_text_mut(canvas, color, x, y, PxScale::from(px), &self.font, text);
    }
}

// ── Card content ────────────────────────────────────────────────────

/// The four text blocks of a card.
#[derive(Debug, Clone)]
pub struct CardText {
    pub title: String,
    pub address: String,
    pub details: String,
    pub footer: String,
}

impl CardText {
    /// Card text for a pass, e.g. title "Tijani Ukay Visitor Pass" and a
    /// `date : visitor (plate)` summary line.
    pub fn for_pass(community: &str, record: &PassRecord, host_address: Option<&str>) -> Self {
        Self {
            title: format!("{community} Visitor Pass"),
            address: host_address.unwrap_or("Host Address").to_owned(),
            details: format!(
                "{} : {} ({})",
                record.scheduled_date.format("%d %b %Y"),
                record.visitor_name,
                record.vehicle_plate
            ),
            footer: FOOTER_TEXT.to_owned(),
        }
    }
}

// ── Layout ──────────────────────────────────────────────────────────

/// Greedy word wrap against a measured width. Words longer than the
/// limit get a line of their own rather than being split.
pub fn wrap_text(measure: &impl TextMeasure, text: &str, max_width: f32, px: f32) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_owned();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure.line_width(&candidate, px) > max_width {
            lines.push(current);
            current = word.to_owned();
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

struct CardLayout {
    footer_lines: Vec<String>,
    height: u32,
}

fn layout(measure: &impl TextMeasure, text: &CardText) -> CardLayout {
    #[allow(clippy::cast_precision_loss)]
    let content_width = (CARD_WIDTH - 2 * PADDING) as f32;
    let footer_lines = wrap_text(measure, &text.footer, content_width, FOOTER_PX);

    #[allow(clippy::cast_possible_truncation)]
    let footer_block = footer_lines.len() as u32 * FOOTER_LINE_HEIGHT;

    // Vertical rhythm: padding, title, 20, QR, 30, address, 10, details,
    // 40, footer block, padding.
    let height = PADDING
        + TITLE_HEIGHT
        + 20
        + QR_DISPLAY_SIZE
        + 30
        + ADDRESS_HEIGHT
        + 10
        + DETAILS_HEIGHT
        + 40
        + footer_block
        + PADDING;

    CardLayout {
        footer_lines,
        height,
    }
}

/// Compute the height the composed card will have, without drawing it.
pub fn card_height(measure: &impl TextMeasure, text: &CardText) -> u32 {
    layout(measure, text).height
}

// ── Composition ─────────────────────────────────────────────────────

/// Compose the flattened share card.
///
/// The QR image is scaled to its display size; all text is centered
/// horizontally.
pub fn compose_share_card<R: TextRasterizer>(
    text: &CardText,
    qr: &GrayImage,
    raster: &R,
) -> RgbImage {
    let plan = layout(raster, text);
    let mut card = RgbImage::from_pixel(CARD_WIDTH, plan.height, BG);

    let mut y = PADDING;
    draw_centered(raster, &mut card, TITLE_COLOR, y, TITLE_PX, &text.title);
    y += TITLE_HEIGHT + 20;

    let scaled = imageops::resize(
        qr,
        QR_DISPLAY_SIZE,
        QR_DISPLAY_SIZE,
        imageops::FilterType::Nearest,
    );
    let qr_rgb: RgbImage = image::DynamicImage::ImageLuma8(scaled).into_rgb8();
    let qr_x = i64::from((CARD_WIDTH - QR_DISPLAY_SIZE) / 2);
    imageops::overlay(&mut card, &qr_rgb, qr_x, i64::from(y));
    y += QR_DISPLAY_SIZE + 30;

    draw_centered(raster, &mut card, TITLE_COLOR, y, ADDRESS_PX, &text.address);
    y += ADDRESS_HEIGHT + 10;

    draw_centered(raster, &mut card, TEXT_COLOR, y, DETAILS_PX, &text.details);
    y += DETAILS_HEIGHT + 40;

    for line in &plan.footer_lines {
        draw_centered(raster, &mut card, FOOTER_COLOR, y, FOOTER_PX, line);
        y += FOOTER_LINE_HEIGHT;
    }

    card
}

fn draw_centered<R: TextRasterizer>(
    raster: &R,
    canvas: &mut RgbImage,
    color: Rgb<u8>,
    y: u32,
    px: f32,
    text: &str,
) {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let x = ((CARD_WIDTH as f32 - raster.line_width(text, px)) / 2.0).max(0.0) as i32;
    #[allow(clippy::cast_possible_wrap)]
    raster.draw_line(canvas, color, x, y as i32, px, text);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::model::{PassRecord, PassToken, VehicleType};

    use super::*;

    /// Fixed-advance measurer: every glyph is half the pixel size wide.
    struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn line_width(&self, text: &str, px: f32) -> f32 {
            #[allow(clippy::cast_precision_loss)]
            let chars = text.chars().count() as f32;
            chars * px * 0.5
        }
    }

    impl TextRasterizer for FixedAdvance {
        fn draw_line(&self, _: &mut RgbImage, _: Rgb<u8>, _: i32, _: i32, _: f32, _: &str) {}
    }

    fn record() -> PassRecord {
        PassRecord {
            id: Uuid::new_v4(),
            pass_token: PassToken::generate(),
            host_id: Uuid::new_v4(),
            host_name: "Siti Rahman".into(),
            visitor_name: "Alice Tan".into(),
            visitor_phone: "0123456789".into(),
            vehicle_plate: "WXY 1234".into(),
            vehicle_type: VehicleType::Car,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            reason: "Family visit".into(),
            created_at: None,
        }
    }

    #[test]
    fn wrap_keeps_lines_within_width() {
        let text = "Show this QR code to security. Scanning will open a page \
                    with the visitor's details for verification.";
        let lines = wrap_text(&FixedAdvance, text, 520.0, FOOTER_PX);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(FixedAdvance.line_width(line, FOOTER_PX) <= 520.0, "{line}");
        }
        // no words lost or reordered
        let rejoined = lines.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap_text(&FixedAdvance, "", 100.0, FOOTER_PX).is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text(&FixedAdvance, "short text", 520.0, FOOTER_PX);
        assert_eq!(lines, vec!["short text".to_owned()]);
    }

    #[test]
    fn card_height_accounts_for_every_footer_line() {
        let text = CardText::for_pass("Tijani Ukay", &record(), Some("12 Jalan Mawar"));
        #[allow(clippy::cast_precision_loss)]
        let content_width = (CARD_WIDTH - 2 * PADDING) as f32;
        let lines = wrap_text(&FixedAdvance, &text.footer, content_width, FOOTER_PX);
        let expected = PADDING
            + TITLE_HEIGHT
            + 20
            + QR_DISPLAY_SIZE
            + 30
            + ADDRESS_HEIGHT
            + 10
            + DETAILS_HEIGHT
            + 40
            + u32::try_from(lines.len()).unwrap() * FOOTER_LINE_HEIGHT
            + PADDING;
        assert_eq!(card_height(&FixedAdvance, &text), expected);
    }

    #[test]
    fn composed_card_matches_planned_dimensions() {
        let text = CardText::for_pass("Tijani Ukay", &record(), Some("12 Jalan Mawar"));
        let qr = GrayImage::from_pixel(256, 256, image::Luma([255]));
        let card = compose_share_card(&text, &qr, &FixedAdvance);
        assert_eq!(card.width(), CARD_WIDTH);
        assert_eq!(card.height(), card_height(&FixedAdvance, &text));
    }

    #[test]
    fn missing_address_falls_back_to_placeholder() {
        let text = CardText::for_pass("Tijani Ukay", &record(), None);
        assert_eq!(text.address, "Host Address");
    }

    #[test]
    fn details_line_reads_date_visitor_plate() {
        let text = CardText::for_pass("Tijani Ukay", &record(), None);
        assert_eq!(text.details, "14 Mar 2025 : Alice Tan (WXY 1234)");
    }
}
