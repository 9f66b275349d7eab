use crate::error::RasterizeError;
use image::DynamicImage;
use pdf2image::{PDF, Pages};
use tracing::{error, info};

/// Hard cap on rendered pages per upload.
pub const MAX_PDF_PAGES: u32 = 5;

/// Render the first pages of a PDF into RGB bitmaps.
///
/// Never fails: an unreadable document is logged and yields an empty list,
/// which callers must treat as "could not rasterize" rather than as an empty
/// document.
pub async fn rasterize_pdf(pdf_bytes: Vec<u8>) -> Vec<DynamicImage> {
    info!("Converting PDF to images ({} bytes)", pdf_bytes.len());

    let rendered = tokio::task::spawn_blocking(move || render_first_pages(pdf_bytes))
        .await
        .map_err(RasterizeError::from)
        .and_then(|result| result);

    match rendered {
        Ok(images) => {
            info!("Successfully converted PDF to {} images", images.len());
            images
        }
        Err(e) => {
            error!("PDF conversion failed: {}", e);
            Vec::new()
        }
    }
}

fn render_first_pages(pdf_bytes: Vec<u8>) -> Result<Vec<DynamicImage>, RasterizeError> {
    let pdf = PDF::from_bytes(pdf_bytes).map_err(|e| RasterizeError::Load(e.to_string()))?;

    let page_count = pdf.page_count();
    let last_page = page_count.min(MAX_PDF_PAGES);
    if last_page == 0 {
        return Ok(Vec::new());
    }
    if page_count > MAX_PDF_PAGES {
        info!(
            "PDF has {} pages, rendering only the first {}",
            page_count, MAX_PDF_PAGES
        );
    }

    // Default render options keep each page at its native resolution.
    let pages = pdf
        .render(Pages::Range(1..=last_page), None)
        .map_err(|e| RasterizeError::Render(e.to_string()))?;

    Ok(pages
        .into_iter()
        .take(MAX_PDF_PAGES as usize)
        .map(|page| DynamicImage::ImageRgb8(page.to_rgb8()))
        .collect())
}
