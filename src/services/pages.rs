use anyhow::{Context, Result};
use std::path::PathBuf;

/// The static pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Editor,
    Privacy,
    Terms,
    About,
    Contact,
}

impl Page {
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Home => "home.html",
            Page::Editor => "editor.html",
            Page::Privacy => "privacy.html",
            Page::Terms => "terms.html",
            Page::About => "about.html",
            Page::Contact => "contact.html",
        }
    }
}

/// Loads page templates from a directory on every request
pub struct PageRenderer {
    template_dir: PathBuf,
}

impl PageRenderer {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    pub async fn render(&self, page: Page) -> Result<String> {
        let path = self.template_dir.join(page.template_name());
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to load template {}", path.display()))
    }
}
