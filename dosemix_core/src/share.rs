//! Shareable links.
//!
//! A link is the configured base URL with the serialized input as its
//! query. The same text can be shown as a QR code for phones.

use crate::{query, DosageInput, Error, Result};
use qrcode::render::unicode;
use qrcode::QrCode;
use url::Url;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://dosemix.app/";

/// Build the shareable URL for `input`
///
/// Any query or fragment already on `base` is replaced.
pub fn share_url(base: &Url, input: &DosageInput) -> Url {
    let mut url = base.clone();
    url.set_query(Some(&query::serialize(input)));
    url.set_fragment(None);
    url
}

/// Parse `base` and build the shareable URL for `input`
pub fn share_url_str(base: &str, input: &DosageInput) -> Result<Url> {
    let base = Url::parse(base)?;
    Ok(share_url(&base, input))
}

/// Render `text` as a QR code made of Unicode half blocks
///
/// Two module rows per text line, with the standard quiet zone.
pub fn render_qr(text: &str) -> Result<String> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| Error::Qr(e.to_string()))?;
    let image = code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Dark)
        .light_color(unicode::Dense1x2::Light)
        .build();
    tracing::debug!("Rendered QR code (version {:?}) for {} bytes", code.version(), text.len());
    Ok(image)
}
