//! DOCX package access
//!
//! A DOCX file is a ZIP package of XML parts and media. The whole package
//! is held in memory so the main document part can be swapped before the
//! package is written out again. Every part remembers the compression it
//! was read with; parts added later are deflated.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::{OoxmlError, Result};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Written first, as Word and LibreOffice expect
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// An OOXML package held in memory
#[derive(Debug, Clone, Default)]
pub struct OoxmlArchive {
    parts: BTreeMap<String, Part>,
}

impl OoxmlArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Read a package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut zip = ZipArchive::new(reader)?;
        let mut parts = BTreeMap::new();

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(
                entry.name().to_string(),
                Part {
                    data,
                    compression: entry.compression(),
                },
            );
        }

        Ok(Self { parts })
    }

    /// Contents of a part
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|part| part.data.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Part names in sorted order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// The main document part (`word/document.xml`)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Replace or add a part; a replaced part keeps its compression
    pub fn set(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let part = self.parts.entry(name.into()).or_insert_with(|| Part {
            data: Vec::new(),
            compression: CompressionMethod::Deflated,
        });
        part.data = data.into();
    }

    /// Pack the package into memory
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Pack the package; the content types part comes first, the rest in
    /// name order, so equal packages produce equal bytes.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let content_types = self.parts.get_key_value(CONTENT_TYPES_PART);
        let rest = self
            .parts
            .iter()
            .filter(|(name, _)| name.as_str() != CONTENT_TYPES_PART);

        for (name, part) in content_types.into_iter().chain(rest) {
            let options = SimpleFileOptions::default()
                .compression_method(part.compression)
                .last_modified_time(DateTime::default());
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        for (name, data, method) in entries {
            zip.start_file(*name, SimpleFileOptions::default().compression_method(*method))
                .unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_set_and_get() {
        let mut archive = OoxmlArchive::new();
        archive.set("word/styles.xml", "<w:styles/>");
        assert!(archive.contains("word/styles.xml"));
        assert_eq!(archive.get("word/styles.xml"), Some(&b"<w:styles/>"[..]));

        archive.set("word/styles.xml", b"<w:styles></w:styles>".to_vec());
        assert_eq!(archive.get("word/styles.xml"), Some(&b"<w:styles></w:styles>"[..]));
        assert_eq!(archive.part_names().count(), 1);
    }

    #[test]
    fn test_missing_document_part() {
        let archive = OoxmlArchive::new();
        let err = archive.document_xml().unwrap_err();
        assert!(matches!(err, OoxmlError::MissingFile(ref p) if p == DOCUMENT_PART));
    }

    #[test]
    fn test_directories_skipped() {
        let bytes = {
            let mut buffer = Cursor::new(Vec::new());
            let mut zip = ZipWriter::new(&mut buffer);
            zip.add_directory("word/media/", SimpleFileOptions::default()).unwrap();
            zip.start_file(DOCUMENT_PART, SimpleFileOptions::default()).unwrap();
            zip.write_all(b"<w:document/>").unwrap();
            zip.finish().unwrap();
            buffer.into_inner()
        };
        let archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.part_names().collect::<Vec<_>>(), [DOCUMENT_PART]);
    }

    #[test]
    fn test_compression_kept_per_part() {
        let png: &[u8] = &[0x89, 0x50, 0x4e, 0x47];
        let bytes = package(&[
            (DOCUMENT_PART, &b"<w:document/>"[..], CompressionMethod::Deflated),
            ("word/media/image1.png", png, CompressionMethod::Stored),
        ]);

        let mut archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();
        archive.set(DOCUMENT_PART, "<w:document><w:body/></w:document>");
        archive.set("customXml/item1.xml", "<item/>");

        let mut zip = ZipArchive::new(Cursor::new(archive.to_bytes().unwrap())).unwrap();
        assert_eq!(zip.by_name("word/media/image1.png").unwrap().compression(), CompressionMethod::Stored);
        assert_eq!(zip.by_name(DOCUMENT_PART).unwrap().compression(), CompressionMethod::Deflated);
        assert_eq!(zip.by_name("customXml/item1.xml").unwrap().compression(), CompressionMethod::Deflated);

        let mut document = String::new();
        zip.by_name(DOCUMENT_PART).unwrap().read_to_string(&mut document).unwrap();
        assert_eq!(document, "<w:document><w:body/></w:document>");
    }

    #[test]
    fn test_content_types_written_first() {
        let mut archive = OoxmlArchive::new();
        archive.set("Custom.xml", "<a/>");
        archive.set("_rels/.rels", "<Relationships/>");
        archive.set(CONTENT_TYPES_PART, "<Types/>");

        let mut zip = ZipArchive::new(Cursor::new(archive.to_bytes().unwrap())).unwrap();
        assert_eq!(zip.by_index(0).unwrap().name(), CONTENT_TYPES_PART);
        assert_eq!(zip.by_index(1).unwrap().name(), "Custom.xml");
        assert_eq!(zip.by_index(2).unwrap().name(), "_rels/.rels");
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut a = OoxmlArchive::new();
        a.set("word/b.xml", "<b/>");
        a.set("word/a.xml", "<a/>");
        let mut b = OoxmlArchive::new();
        b.set("word/a.xml", "<a/>");
        b.set("word/b.xml", "<b/>");
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let result = OoxmlArchive::from_reader(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(OoxmlError::Archive(_))));
    }
}
