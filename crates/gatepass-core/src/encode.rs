// ── QR encoding ──

use image::GrayImage;
use qrcode::QrCode;
use url::Url;

use crate::error::CoreError;

/// Minimum rendered size for reliable camera decoding at phone-scanning
/// distance.
pub const MIN_QR_SIZE: u32 = 256;

/// Render a verification URL as a QR image, at least
/// [`MIN_QR_SIZE`] pixels square (quiet zone included).
pub fn render_qr(url: &Url) -> Result<GrayImage, CoreError> {
    render_qr_text(url.as_str())
}

/// Render arbitrary payload text as a QR image.
pub fn render_qr_text(payload: &str) -> Result<GrayImage, CoreError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| CoreError::Encode {
        message: e.to_string(),
    })?;
    Ok(code
        .render::<image::Luma<u8>>()
        .min_dimensions(MIN_QR_SIZE, MIN_QR_SIZE)
        .build())
}

/// Filename for a shared pass image: whitespace in the visitor name is
/// collapsed to underscores.
pub fn share_filename(visitor_name: &str) -> String {
    let safe: Vec<&str> = visitor_name.split_whitespace().collect();
    format!("VisitorPass-{}.png", safe.join("_"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::link::{LinkConfig, verification_url};
    use crate::model::PassToken;

    #[test]
    fn rendered_code_meets_minimum_size() {
        let cfg = LinkConfig::new("https://community.example.org".parse().unwrap());
        let url = verification_url(&cfg, &PassToken::generate());
        let img = render_qr(&url).unwrap();
        assert!(img.width() >= MIN_QR_SIZE);
        assert!(img.height() >= MIN_QR_SIZE);
    }

    #[test]
    fn rendered_code_decodes_back_to_payload() {
        let cfg = LinkConfig::new("https://community.example.org".parse().unwrap());
        let token = PassToken::generate();
        let url = verification_url(&cfg, &token);
        let img = render_qr(&url).unwrap();

        let frame = crate::scan::Frame::from_luma(img.width(), img.height(), img.into_raw());
        let decoded = crate::scan::decode_frame(&frame).unwrap();
        assert_eq!(decoded, url.as_str());
    }

    #[test]
    fn share_filename_replaces_whitespace_runs() {
        assert_eq!(share_filename("Alice Tan"), "VisitorPass-Alice_Tan.png");
        assert_eq!(share_filename("  A  B  "), "VisitorPass-A_B.png");
    }
}
