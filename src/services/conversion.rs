use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Markup returned until a real conversion engine is wired in
pub const PLACEHOLDER_HTML: &str =
    "<div class='pdf-page'>This is where the converted PDF content would appear.</div>";

/// Seam for the PDF <-> HTML conversion backend
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Render the stored PDF at `source` as editable HTML
    async fn pdf_to_html(&self, source: &Path) -> Result<String>;

    /// Turn edited HTML back into a PDF
    async fn html_to_pdf(&self, html: &str) -> Result<()>;
}

/// Converter that performs no conversion at all
pub struct PlaceholderConverter;

#[async_trait]
impl DocumentConverter for PlaceholderConverter {
    async fn pdf_to_html(&self, source: &Path) -> Result<String> {
        tracing::debug!("Placeholder conversion for {}", source.display());
        Ok(PLACEHOLDER_HTML.to_string())
    }

    async fn html_to_pdf(&self, html: &str) -> Result<()> {
        tracing::debug!("Placeholder save of {} bytes of HTML", html.len());
        Ok(())
    }
}

pub fn create_converter() -> Box<dyn DocumentConverter> {
    Box::new(PlaceholderConverter)
}
