//! Remote image service tier, the last resort in every chain.
//!
//! On screen the tier only builds the image URL and lets the viewer load it;
//! when embedding into a PDF it downloads the image through the shared
//! client and cache, and resizes it to the requested box.

use async_trait::async_trait;
use image::GrayImage;
use image::imageops::{self, FilterType};
use reqwest::Url;

use super::{RenderContext, RenderMode, RenderRequest, RenderStrategy, RenderedCode};
use crate::error::LabelError;
use crate::model::Symbology;

/// Fetches code images from the configured HTTP services.
pub struct RemoteService;

#[async_trait]
impl RenderStrategy for RemoteService {
    fn name(&self) -> &'static str {
        "remote-service"
    }

    async fn try_render(
        &self,
        request: &RenderRequest,
        ctx: &RenderContext,
    ) -> Result<RenderedCode, LabelError> {
        let url = service_url(request, ctx)?;

        match request.mode {
            RenderMode::Display => Ok(RenderedCode::Remote { url, image: None }),
            RenderMode::Embed => {
                let image = fetch_image(&url, ctx).await?;
                let image = fit_to(image, request);
                Ok(RenderedCode::Remote {
                    url,
                    image: Some(image),
                })
            }
        }
    }
}

/// The image URL for a request.
pub fn service_url(request: &RenderRequest, ctx: &RenderContext) -> Result<String, LabelError> {
    match request.symbology {
        Symbology::Qr => qr_service_url(
            &ctx.config.qr_service_url,
            &request.payload,
            request.width.min(request.height),
        ),
        sym => barcode_service_url(&ctx.config.barcode_service_url, sym, &request.payload),
    }
}

/// `<base>?size=<s>x<s>&data=<payload>`, with the payload percent-encoded.
pub fn qr_service_url(base: &str, payload: &str, size: u32) -> Result<String, LabelError> {
    let size = format!("{}x{}", size, size);
    let url = Url::parse_with_params(base, &[("size", size.as_str()), ("data", payload)])
        .map_err(|e| LabelError::ExternalServiceUnavailable(format!("bad QR service URL: {}", e)))?;
    Ok(url.into())
}

/// `<base>/<symbology>/<payload>`, with the payload as one escaped path segment.
pub fn barcode_service_url(
    base: &str,
    symbology: Symbology,
    payload: &str,
) -> Result<String, LabelError> {
    let mut url = Url::parse(base).map_err(|e| {
        LabelError::ExternalServiceUnavailable(format!("bad barcode service URL: {}", e))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            LabelError::ExternalServiceUnavailable(format!("barcode service URL '{}' cannot take a path", base))
        })?
        .pop_if_empty()
        .push(symbology.as_str())
        .push(payload);
    Ok(url.into())
}

/// Download an image as grayscale, through the context cache.
pub async fn fetch_image(url: &str, ctx: &RenderContext) -> Result<GrayImage, LabelError> {
    if let Some(hit) = ctx.cached_image(url).await {
        tracing::debug!(url, "remote image cache hit");
        return Ok(hit);
    }

    let response = ctx
        .http_client
        .get(url)
        .send()
        .await
        .map_err(|e| LabelError::ExternalServiceUnavailable(format!("Failed to download {}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(LabelError::ExternalServiceUnavailable(format!(
            "Failed to download {}: HTTP {}",
            url,
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| LabelError::ExternalServiceUnavailable(format!("Failed to read image data: {}", e)))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|e| LabelError::ExternalServiceUnavailable(format!("Failed to decode image: {}", e)))?
        .to_luma8();

    ctx.cache_image(url, image.clone()).await;
    Ok(image)
}

/// Resize a downloaded image to the request box. QR images are kept square.
fn fit_to(image: GrayImage, request: &RenderRequest) -> GrayImage {
    let (w, h) = match request.symbology {
        Symbology::Qr => {
            let side = request.width.min(request.height);
            (side, side)
        }
        _ => (request.width, request.height),
    };
    if image.dimensions() == (w, h) {
        return image;
    }
    imageops::resize(&image, w, h, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use crate::render::{SurfaceSlot, TargetSurface};
    use image::Luma;

    #[test]
    fn test_qr_url_encodes_payload() {
        let url = qr_service_url(
            "https://api.qrserver.com/v1/create-qr-code/",
            "A&B C/1",
            120,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=120x120&data=A%26B+C%2F1"
        );
    }

    #[test]
    fn test_barcode_url_escapes_segment() {
        let url = barcode_service_url("https://barcodeapi.org/api", Symbology::Code128, "A/B 1").unwrap();
        assert_eq!(url, "https://barcodeapi.org/api/code128/A%2FB%201");

        let url = barcode_service_url("https://barcodeapi.org/api/", Symbology::Ean13, "0121230000001").unwrap();
        assert_eq!(url, "https://barcodeapi.org/api/ean13/0121230000001");
    }

    #[test]
    fn test_bad_base_url() {
        assert!(matches!(
            qr_service_url("not a url", "x", 10),
            Err(LabelError::ExternalServiceUnavailable(_))
        ));
        assert!(barcode_service_url("mailto:ops@example.com", Symbology::Code128, "x").is_err());
    }

    #[tokio::test]
    async fn test_display_mode_returns_url_without_network() {
        let ctx = RenderContext::with_defaults().unwrap();
        // Detached surfaces don't matter to the remote tier
        let target = TargetSurface::display(SurfaceSlot::detached(), 150, 100);
        let request = RenderRequest::new("WID-001", Symbology::Qr, &target);

        let code = RemoteService.try_render(&request, &ctx).await.unwrap();
        assert!(code.image().is_none());
        assert_eq!(
            code.remote_url(),
            Some("https://api.qrserver.com/v1/create-qr-code/?size=100x100&data=WID-001")
        );
    }

    #[tokio::test]
    async fn test_embed_mode_uses_cache() {
        let ctx = RenderContext::with_defaults().unwrap();
        let request = RenderRequest::new("X", Symbology::Code128, &TargetSurface::offscreen(40, 20, 1));
        let url = service_url(&request, &ctx).unwrap();
        ctx.cache_image(&url, GrayImage::from_pixel(10, 5, Luma([0]))).await;

        let code = RemoteService.try_render(&request, &ctx).await.unwrap();
        assert_eq!(code.image().map(|i| i.dimensions()), Some((40, 20)));
    }

    #[tokio::test]
    async fn test_unreachable_service_fails() {
        let config = LabelConfig {
            qr_service_url: "http://127.0.0.1:9/qr".to_string(),
            http_timeout_ms: 500,
            ..Default::default()
        };
        let ctx = RenderContext::new(config).unwrap();
        let request = RenderRequest::new("X", Symbology::Qr, &TargetSurface::offscreen(40, 40, 1));

        let err = RemoteService.try_render(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, LabelError::ExternalServiceUnavailable(_)));
    }
}
