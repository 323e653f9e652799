//! DOCX to PDF rendering
//!
//! Rendering is delegated to an office suite running headless. The
//! converter writes into a scratch directory that is removed afterwards,
//! so a failed or timed-out conversion leaves nothing behind.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{PdfError, Result};

/// Default converter program
pub const DEFAULT_PROGRAM: &str = "libreoffice";

/// Default conversion timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Converts a DOCX file into a PDF file
pub trait PdfRenderer {
    /// Render `docx` and write the result to `pdf`
    fn render(&self, docx: &Path, pdf: &Path) -> Result<()>;
}

/// Renderer running `<program> --headless --convert-to pdf --outdir <dir> <docx>`
#[derive(Debug, Clone)]
pub struct LibreOfficeRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for LibreOfficeRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl LibreOfficeRenderer {
    /// Create a renderer for the given converter program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Arguments passed before the conversion arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self, docx: &Path, outdir: &Path, log: File) -> Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(outdir)
            .arg(docx)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    PdfError::ConverterNotFound(format!("{}: {}", self.program, e))
                }
                _ => PdfError::Io(e),
            })
    }
}

impl PdfRenderer for LibreOfficeRenderer {
    fn render(&self, docx: &Path, pdf: &Path) -> Result<()> {
        let scratch = tempfile::tempdir()?;
        let outdir = scratch.path().join("out");
        std::fs::create_dir(&outdir)?;
        let log_path = scratch.path().join("converter.log");

        debug!(program = %self.program, docx = %docx.display(), "Starting PDF conversion");
        let mut child = self.spawn(docx, &outdir, File::create(&log_path)?)?;

        let Some(status) = wait_with_timeout(&mut child, self.timeout)? else {
            let _ = child.kill();
            child.wait()?;
            warn!(
                program = %self.program,
                timeout = ?self.timeout,
                "PDF converter killed after timeout"
            );
            return Err(PdfError::Timeout(self.timeout));
        };

        if !status.success() {
            let log = std::fs::read_to_string(&log_path).unwrap_or_default();
            warn!(program = %self.program, %status, "PDF converter failed");
            return Err(PdfError::ConversionFailed(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                log.trim()
            )));
        }

        let produced = first_pdf(&outdir)?.ok_or_else(|| {
            warn!(program = %self.program, "PDF converter produced no output");
            PdfError::ConversionFailed(format!(
                "{} produced no PDF for {}",
                self.program,
                docx.display()
            ))
        })?;

        std::fs::copy(&produced, pdf)?;
        debug!(pdf = %pdf.display(), "PDF conversion complete");
        Ok(())
    }
}

/// Poll the child until it exits or the timeout elapses
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// First `.pdf` file in `dir`, by name
fn first_pdf(dir: &Path) -> Result<Option<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs.into_iter().next())
}
