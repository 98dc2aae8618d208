//! Paginated document capability.
//!
//! An [`ArtifactFactory`] opens blank documents; an [`Artifact`] takes images
//! placed in page coordinates and writes itself to disk. The production
//! implementation is [`PdfFactory`], which builds a single-page PDF with
//! `lopdf` and embeds the raster as a JPEG image XObject.
//!
//! Page coordinates follow the raster convention: origin at the top-left
//! corner, y growing downward, in the [`Unit`] the document was opened with.
//! The PDF backend flips to PDF's bottom-left origin when it writes the
//! content stream.

use crate::raster::{Orientation, PageSize, Placement, RasterImage, Unit};
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

const JPEG_QUALITY: u8 = 92;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("artifact has no pages to save")]
    Empty,
}

/// Capability that opens blank paginated documents.
pub trait ArtifactFactory {
    fn name(&self) -> &'static str;

    fn new_document(
        &self,
        orientation: Orientation,
        unit: Unit,
        page: PageSize,
    ) -> Result<Box<dyn Artifact>, ArtifactError>;
}

/// An open document.
pub trait Artifact {
    /// Page `(width, height)` in the document's unit.
    fn page_dimensions(&self) -> (f64, f64);

    /// Place `image` at `placement` on the current page.
    fn embed_image(
        &mut self,
        image: &RasterImage,
        placement: &Placement,
    ) -> Result<(), ArtifactError>;

    /// Write the document to `path`. Nothing is left at `path` on failure.
    fn save(&mut self, path: &Path) -> Result<(), ArtifactError>;
}

// ============================================================================
// PDF
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfFactory;

impl ArtifactFactory for PdfFactory {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn new_document(
        &self,
        orientation: Orientation,
        unit: Unit,
        page: PageSize,
    ) -> Result<Box<dyn Artifact>, ArtifactError> {
        Ok(Box::new(PdfArtifact::new(orientation, unit, page)))
    }
}

pub struct PdfArtifact {
    doc: Document,
    pages_id: ObjectId,
    unit: Unit,
    page: (f64, f64),
    images: Dictionary,
    operations: Vec<Operation>,
}

impl PdfArtifact {
    pub fn new(orientation: Orientation, unit: Unit, page: PageSize) -> Self {
        let mut doc = Document::with_version("1.5");
        doc.trailer
            .set("Creator", Object::string_literal("portfolio-builder"));
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0i64,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self {
            doc,
            pages_id,
            unit,
            page: page.dimensions(orientation, unit),
            images: Dictionary::new(),
            operations: Vec::new(),
        }
    }

    fn page_points(&self) -> (f32, f32) {
        (
            self.unit.to_pt(self.page.0) as f32,
            self.unit.to_pt(self.page.1) as f32,
        )
    }

    fn finish_page(&mut self) -> Result<(), ArtifactError> {
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let encoded = content
            .encode()
            .map_err(|e| ArtifactError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));

        let (width, height) = self.page_points();
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Resources" => dictionary! { "XObject" => std::mem::take(&mut self.images) },
            "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), width.into(), height.into()],
            "Contents" => content_id,
        });

        let pages = self
            .doc
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| ArtifactError::Pdf(e.to_string()))?;
        pages.set("Kids", vec![Object::Reference(page_id)]);
        pages.set("Count", 1i64);
        Ok(())
    }
}

impl Artifact for PdfArtifact {
    fn page_dimensions(&self) -> (f64, f64) {
        self.page
    }

    fn embed_image(
        &mut self,
        image: &RasterImage,
        placement: &Placement,
    ) -> Result<(), ArtifactError> {
        let rgb = image::load_from_memory_with_format(&image.png, image::ImageFormat::Png)?
            .to_rgb8();
        let mut jpeg = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))?;

        let xobject_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(rgb.width()),
                "Height" => i64::from(rgb.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));
        let name = format!("Im{}", self.images.len());
        self.images.set(name.as_bytes().to_vec(), xobject_id);

        let (_, page_h) = self.page_points();
        let w = self.unit.to_pt(placement.width) as f32;
        let h = self.unit.to_pt(placement.height) as f32;
        let x = self.unit.to_pt(placement.x) as f32;
        let y = page_h - self.unit.to_pt(placement.y) as f32 - h;

        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![w.into(), 0f32.into(), 0f32.into(), h.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), ArtifactError> {
        if self.operations.is_empty() {
            return Err(ArtifactError::Empty);
        }
        self.finish_page()?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        self.doc
            .save_to(&mut staged)
            .map_err(|e| ArtifactError::Pdf(e.to_string()))?;
        staged.flush()?;
        staged.persist(path).map_err(|e| ArtifactError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::raster::fit_to_page;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Mock factory that records what the pipeline asked for.
    #[derive(Clone, Default)]
    pub struct MockFactory {
        pub log: Arc<Mutex<Vec<RecordedArtifactOp>>>,
        pub fail_save: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedArtifactOp {
        Open {
            orientation: Orientation,
            unit: Unit,
            page: PageSize,
        },
        Embed {
            width: u32,
            height: u32,
            placement: Placement,
        },
        Save(String),
    }

    impl MockFactory {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_save() -> Self {
            Self {
                fail_save: true,
                ..Self::default()
            }
        }

        pub fn get_log(&self) -> Vec<RecordedArtifactOp> {
            self.log.lock().unwrap().clone()
        }
    }

    struct MockArtifact {
        log: Arc<Mutex<Vec<RecordedArtifactOp>>>,
        page: (f64, f64),
        fail_save: bool,
    }

    impl ArtifactFactory for MockFactory {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn new_document(
            &self,
            orientation: Orientation,
            unit: Unit,
            page: PageSize,
        ) -> Result<Box<dyn Artifact>, ArtifactError> {
            self.log.lock().unwrap().push(RecordedArtifactOp::Open {
                orientation,
                unit,
                page,
            });
            Ok(Box::new(MockArtifact {
                log: Arc::clone(&self.log),
                page: page.dimensions(orientation, unit),
                fail_save: self.fail_save,
            }))
        }
    }

    impl Artifact for MockArtifact {
        fn page_dimensions(&self) -> (f64, f64) {
            self.page
        }

        fn embed_image(
            &mut self,
            image: &RasterImage,
            placement: &Placement,
        ) -> Result<(), ArtifactError> {
            self.log.lock().unwrap().push(RecordedArtifactOp::Embed {
                width: image.width,
                height: image.height,
                placement: *placement,
            });
            Ok(())
        }

        fn save(&mut self, path: &Path) -> Result<(), ArtifactError> {
            if self.fail_save {
                return Err(ArtifactError::Pdf("mock save failure".to_string()));
            }
            std::fs::write(path, b"%PDF-mock")?;
            self.log
                .lock()
                .unwrap()
                .push(RecordedArtifactOp::Save(path.to_string_lossy().to_string()));
            Ok(())
        }
    }

    fn embedded_pdf(image: &RasterImage) -> PdfArtifact {
        let mut pdf = PdfArtifact::new(Orientation::Portrait, Unit::Mm, PageSize::A4);
        let placement = fit_to_page((image.width, image.height), pdf.page_dimensions(), 10.0);
        pdf.embed_image(image, &placement).unwrap();
        pdf
    }

    #[test]
    fn pdf_page_is_a4_in_requested_unit() {
        let pdf = PdfArtifact::new(Orientation::Portrait, Unit::Mm, PageSize::A4);
        assert_eq!(pdf.page_dimensions(), (210.0, 297.0));
    }

    #[test]
    fn pdf_save_writes_a_loadable_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Jane_Doe_Resume.pdf");
        let image = RasterImage::solid(160, 200, [200, 10, 10]).unwrap();

        embedded_pdf(&image).save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn pdf_embeds_jpeg_xobject() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.pdf");
        let image = RasterImage::solid(32, 32, [0, 0, 255]).unwrap();
        embedded_pdf(&image).save(&path).unwrap();

        let loaded = Document::load(&path).unwrap();
        let has_dct = loaded.objects.values().any(|obj| {
            obj.as_stream()
                .ok()
                .and_then(|s| s.dict.get(b"Filter").ok())
                .and_then(|f| f.as_name().ok())
                .is_some_and(|name| name == b"DCTDecode")
        });
        assert!(has_dct);
    }

    #[test]
    fn pdf_save_without_image_is_error_and_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.pdf");
        let mut pdf = PdfArtifact::new(Orientation::Portrait, Unit::Mm, PageSize::A4);
        assert!(matches!(pdf.save(&path), Err(ArtifactError::Empty)));
        assert!(!path.exists());
    }

    #[test]
    fn pdf_embed_rejects_non_png_bytes() {
        let mut pdf = PdfArtifact::new(Orientation::Portrait, Unit::Mm, PageSize::A4);
        let bogus = RasterImage {
            png: b"nope".to_vec(),
            width: 10,
            height: 10,
        };
        let placement = fit_to_page((10, 10), pdf.page_dimensions(), 10.0);
        assert!(matches!(
            pdf.embed_image(&bogus, &placement),
            Err(ArtifactError::Image(_))
        ));
    }

    #[test]
    fn mock_factory_records_lifecycle() {
        let tmp = TempDir::new().unwrap();
        let factory = MockFactory::new();
        let mut doc = factory
            .new_document(Orientation::Portrait, Unit::Mm, PageSize::A4)
            .unwrap();
        let image = RasterImage::solid(8, 8, [0, 0, 0]).unwrap();
        let placement = fit_to_page((8, 8), doc.page_dimensions(), 10.0);
        doc.embed_image(&image, &placement).unwrap();
        doc.save(&tmp.path().join("x.pdf")).unwrap();

        let log = factory.get_log();
        assert_eq!(log.len(), 3);
        assert!(matches!(log[0], RecordedArtifactOp::Open { page: PageSize::A4, .. }));
        assert!(matches!(log[2], RecordedArtifactOp::Save(ref p) if p.ends_with("x.pdf")));
    }
}
