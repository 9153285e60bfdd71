// ── eSIM activation artifacts ──
//
// The activation URL format is load-bearing: QR codes printed from it
// are in customers' hands, so the exact string -- raw substitution, no
// percent-encoding, this parameter order -- must never change.

use qrcode::QrCode;
use qrcode::render::svg;
use qrcode::render::unicode;

use crate::error::CoreError;

/// Build the activation URL for an eSIM stock item.
///
/// `{origin}/esim/activate?code={itemData}&serial={serialNumber}` --
/// a pure function of its inputs, identical across calls.
pub fn activation_url(origin: &str, item_data: &str, serial_number: &str) -> String {
    let origin = origin.trim_end_matches('/');
    format!("{origin}/esim/activate?code={item_data}&serial={serial_number}")
}

/// Render the activation URL as an SVG QR code (for file export).
pub fn activation_qr_svg(url: &str) -> Result<String, CoreError> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|e| CoreError::Internal(format!("QR encoding failed: {e}")))?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .build())
}

/// Render the activation URL as unicode half-blocks (for the terminal).
pub fn activation_qr_text(url: &str) -> Result<String, CoreError> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|e| CoreError::Internal(format!("QR encoding failed: {e}")))?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build())
}

/// Prefilled `mailto:` handoff for sharing an activation link.
pub fn activation_mailto(recipient: &str, serial_number: &str, url: &str) -> String {
    let subject = format!("Your eSIM activation ({serial_number})");
    let body = format!("Scan the QR code or open this link to activate your eSIM: {url}");
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencode(&subject),
        urlencode(&body)
    )
}

/// Minimal percent-encoding for mailto query values. The activation URL
/// itself is never encoded (see module header) -- only the mail fields.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_format_is_exact() {
        let url = activation_url("https://shop.esimly.io", "ABC123", "SN001");
        assert_eq!(
            url,
            "https://shop.esimly.io/esim/activate?code=ABC123&serial=SN001"
        );
    }

    #[test]
    fn url_is_deterministic() {
        let a = activation_url("https://shop.esimly.io", "ABC123", "SN001");
        let b = activation_url("https://shop.esimly.io", "ABC123", "SN001");
        assert_eq!(a, b);
    }

    #[test]
    fn trailing_slash_on_origin_is_tolerated() {
        let url = activation_url("https://shop.esimly.io/", "X", "Y");
        assert_eq!(url, "https://shop.esimly.io/esim/activate?code=X&serial=Y");
    }

    #[test]
    fn qr_renders_both_targets() {
        let url = activation_url("https://shop.esimly.io", "ABC123", "SN001");
        let svg = activation_qr_svg(&url).unwrap();
        assert!(svg.starts_with("<?xml") || svg.starts_with("<svg"));
        let text = activation_qr_text(&url).unwrap();
        assert!(!text.is_empty());
    }

    #[test]
    fn mailto_encodes_fields_only() {
        let link = activation_mailto("a@b.c", "SN001", "https://x/esim/activate?code=1&serial=2");
        assert!(link.starts_with("mailto:a@b.c?subject="));
        assert!(link.contains("body=Scan%20the%20QR"));
    }
}
