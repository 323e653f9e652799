//! Document generation pipeline
//!
//! Turns a validated [`DocumentRequest`] into a filled DOCX and, through a
//! [`PdfRenderer`], a PDF. Intermediate files live in a temporary
//! directory that is removed whether or not generation succeeds.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use docforge_ooxml::{substitute_with_report, PlaceholderMap, Template};
use docforge_pdf::{LibreOfficeRenderer, PdfError, PdfRenderer};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::error::Result;
use crate::request::DocumentRequest;
use crate::validate::PhoneRules;

/// Output of a successful generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocuments {
    pub docx_name: String,
    pub docx: Vec<u8>,
    pub pdf_name: String,
    pub pdf: Vec<u8>,
}

impl GeneratedDocuments {
    /// Write both files into `dir`, returning their paths. If either write
    /// fails, neither file is left in `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let docx_path = dir.join(&self.docx_name);
        let pdf_path = dir.join(&self.pdf_name);

        let written = std::fs::write(&docx_path, &self.docx)
            .and_then(|()| std::fs::write(&pdf_path, &self.pdf));
        if let Err(err) = written {
            remove_partial(&docx_path);
            remove_partial(&pdf_path);
            return Err(err.into());
        }
        Ok((docx_path, pdf_path))
    }
}

fn remove_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove partial output"),
    }
}

/// Generates documents from templates
pub struct Generator<R = LibreOfficeRenderer> {
    settings: Settings,
    phone_rules: PhoneRules,
    renderer: R,
    today: Option<NaiveDate>,
}

impl Generator<LibreOfficeRenderer> {
    /// Generator using the converter configured in `settings`
    pub fn from_settings(settings: Settings) -> Self {
        let renderer = settings.renderer();
        Self::new(settings, renderer)
    }
}

impl<R: PdfRenderer> Generator<R> {
    pub fn new(settings: Settings, renderer: R) -> Self {
        let phone_rules = settings.phone_rules();
        Self {
            settings,
            phone_rules,
            renderer,
            today: None,
        }
    }

    /// Use a fixed date instead of the local date for "today"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Placeholder map `request` fills its template with
    pub fn placeholders(&self, request: &DocumentRequest) -> PlaceholderMap {
        request.placeholders(self.today())
    }

    /// Fill the template for `request`, returning the file name and DOCX bytes
    pub fn fill(&self, request: &DocumentRequest) -> Result<(String, Vec<u8>)> {
        request.validate(&self.phone_rules)?;
        let base_name = base_name(request);
        let docx = self.fill_template(request)?;
        Ok((format!("{}.docx", base_name), docx))
    }

    /// Fill the template and render it to PDF
    pub fn generate(&self, request: &DocumentRequest) -> Result<GeneratedDocuments> {
        request.validate(&self.phone_rules)?;
        let base_name = base_name(request);
        let docx = self.fill_template(request)?;

        let workdir = tempfile::tempdir()?;
        let docx_name = format!("{}.docx", base_name);
        let pdf_name = format!("{}.pdf", base_name);
        let docx_path = workdir.path().join(&docx_name);
        let pdf_path = workdir.path().join(&pdf_name);

        std::fs::write(&docx_path, &docx)?;
        self.renderer.render(&docx_path, &pdf_path)?;
        if !pdf_path.is_file() {
            return Err(PdfError::ConversionFailed(format!(
                "PDF file not found at: {}",
                pdf_path.display()
            ))
            .into());
        }
        let pdf = std::fs::read(&pdf_path)?;

        info!(
            kind = request.kind().slug(),
            docx = %docx_name,
            pdf = %pdf_name,
            "Generated documents"
        );
        Ok(GeneratedDocuments {
            docx_name,
            docx,
            pdf_name,
            pdf,
        })
    }

    fn fill_template(&self, request: &DocumentRequest) -> Result<Vec<u8>> {
        let kind = request.kind();
        let template = Template::load(self.settings.template_path(kind))?;
        let placeholders = self.placeholders(request);

        let mut document = template.document()?;
        let report = substitute_with_report(&mut document, &placeholders);
        debug!(
            kind = kind.slug(),
            replacements = report.replacements,
            placeholders = placeholders.len(),
            "Filled template"
        );
        Ok(template.into_docx(&document)?)
    }
}

/// `<label with spaces replaced by _>_<8 hex chars>`
fn base_name(request: &DocumentRequest) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}_{}", request.kind().label().replace(' ', "_"), &id[..8])
}
