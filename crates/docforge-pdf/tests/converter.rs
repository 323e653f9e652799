//! Converter process tests
//!
//! Shell scripts stand in for LibreOffice. They are run through `sh` so the
//! tests do not depend on execute permissions in the temp directory.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use docforge_pdf::{LibreOfficeRenderer, PdfError, PdfRenderer};
use tempfile::TempDir;

/// Writes `<outdir>/<docx stem>.pdf` like `soffice --convert-to pdf`
const FAKE_CONVERTER: &str = r#"
outdir=""
while [ $# -gt 1 ]; do
  if [ "$1" = "--outdir" ]; then
    outdir="$2"
    shift
  fi
  shift
done
name=$(basename "$1" .docx)
printf '%%PDF-1.4 converted from %s' "$name" > "$outdir/$name.pdf"
"#;

fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn renderer(script: &Path) -> LibreOfficeRenderer {
    LibreOfficeRenderer::new("sh").with_args([script.to_string_lossy().into_owned()])
}

fn input(dir: &TempDir) -> PathBuf {
    let docx = dir.path().join("Offer_Letter_1a2b3c4d.docx");
    std::fs::write(&docx, b"PK\x03\x04").unwrap();
    docx
}

#[test]
fn test_converter_output_moved_to_destination() {
    let dir = tempfile::tempdir().unwrap();
    let converter = script(&dir, "convert.sh", FAKE_CONVERTER);
    let docx = input(&dir);
    let pdf = dir.path().join("result.pdf");

    renderer(&converter).render(&docx, &pdf).unwrap();

    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(String::from_utf8_lossy(&bytes).contains("Offer_Letter_1a2b3c4d"));
}

#[test]
fn test_converter_failure_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let converter = script(&dir, "fail.sh", "echo 'source file could not be loaded' >&2\nexit 3\n");
    let docx = input(&dir);
    let pdf = dir.path().join("result.pdf");

    let err = renderer(&converter).render(&docx, &pdf).unwrap_err();
    match err {
        PdfError::ConversionFailed(message) => {
            assert!(message.contains("could not be loaded"), "{}", message)
        }
        other => panic!("expected ConversionFailed, got {:?}", other),
    }
    assert!(!pdf.exists());
}

#[test]
fn test_converter_without_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let converter = script(&dir, "silent.sh", "exit 0\n");
    let docx = input(&dir);
    let pdf = dir.path().join("result.pdf");

    let err = renderer(&converter).render(&docx, &pdf).unwrap_err();
    assert!(matches!(err, PdfError::ConversionFailed(_)), "got {:?}", err);
    assert!(!pdf.exists());
}

#[test]
fn test_converter_killed_on_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let converter = script(&dir, "hang.sh", "sleep 30\n");
    let docx = input(&dir);
    let pdf = dir.path().join("result.pdf");

    let started = std::time::Instant::now();
    let err = renderer(&converter)
        .with_timeout(Duration::from_millis(300))
        .render(&docx, &pdf)
        .unwrap_err();

    assert!(matches!(err, PdfError::Timeout(_)), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!pdf.exists());
}
