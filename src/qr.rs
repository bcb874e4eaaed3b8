//! Booking-reference QR code rendering

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::Luma;
use qrcode::QrCode;
use std::io::Cursor;

/// Render the booking reference as a PNG QR code packed into a data URI,
/// for inline display on the confirmation page. Returns None if encoding
/// fails; the page simply omits the image then.
pub fn booking_qr_data_uri(booking_id: i64) -> Option<String> {
    let code = QrCode::new(format!("UWEFlix booking #{booking_id}").as_bytes()).ok()?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(160, 160)
        .build();

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;

    Some(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_renders_to_png_data_uri() {
        let uri = booking_qr_data_uri(42).expect("qr should render");
        assert!(uri.starts_with("data:image/png;base64,"));

        let png = STANDARD
            .decode(uri.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        // PNG magic bytes
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
