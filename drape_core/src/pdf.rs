//! # PDF Generation Module
//!
//! Prints a [`DocumentView`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - A fixed Typst preamble sets up the page and a `field` helper
//! - Every piece of user text enters the source as a Typst string literal,
//!   never as markup, so names like `#2F_主臥*` print verbatim
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! The bundled Typst fonts carry no CJK glyphs. Point [`FontSet::with_dirs`]
//! at a directory holding a CJK font (e.g. Noto Sans CJK TC) to print
//! Chinese labels.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drape_core::documents::DocumentKind;
//! use drape_core::pdf::{render_document_pdf, FontSet};
//! use drape_core::project::Project;
//!
//! let project = Project::new("松仁路 100 號");
//! let fonts = FontSet::with_dirs(&["/usr/share/fonts/opentype/noto".into()]);
//! let pdf = render_document_pdf(&project.document(DocumentKind::Quote), &fonts).unwrap();
//! std::fs::write("quote.pdf", pdf).unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::documents::{DocumentView, Line};
use crate::errors::{CalcError, CalcResult};

/// Fonts shipped with Typst, parsed once per process.
static BUNDLED_FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
        .collect()
});

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

// ============================================================================
// Fonts
// ============================================================================

/// Fonts available to the PDF renderer.
#[derive(Clone)]
pub struct FontSet {
    fonts: Vec<Font>,
}

impl FontSet {
    /// Only the fonts bundled with Typst.
    pub fn bundled() -> Self {
        FontSet {
            fonts: BUNDLED_FONTS.clone(),
        }
    }

    /// Fonts found in `dirs` (searched first) plus the bundled fonts.
    ///
    /// Unreadable directories and files are skipped with a warning.
    pub fn with_dirs(dirs: &[PathBuf]) -> Self {
        let mut fonts = Vec::new();
        for dir in dirs {
            load_dir(dir, &mut fonts);
        }
        info!(custom = fonts.len(), "Loaded fonts");
        fonts.extend(BUNDLED_FONTS.iter().cloned());
        FontSet { fonts }
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Family names, deduplicated, in search order.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = Vec::new();
        for font in &self.fonts {
            let family = font.info().family.clone();
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }
}

impl Default for FontSet {
    fn default() -> Self {
        FontSet::bundled()
    }
}

fn load_dir(dir: &Path, fonts: &mut Vec<Font>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping font directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_dir(&path, fonts);
            continue;
        }

        let is_font = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FONT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_font {
            continue;
        }

        match fs::read(&path) {
            Ok(data) => {
                let before = fonts.len();
                fonts.extend(Font::iter(Bytes::new(data)));
                debug!(file = %path.display(), faces = fonts.len() - before, "Loaded font file");
            }
            Err(e) => warn!(file = %path.display(), error = %e, "Skipping font file"),
        }
    }
}

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String, fonts: &FontSet) -> Self {
        let fonts = fonts.fonts.clone();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// Template
// ============================================================================

const PREAMBLE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #align(center)[#text(size: 8pt)[#counter(page).display("1 / 1", both: true)]]
  ]
)

#set text(
  font: ("Noto Sans CJK TC", "Noto Sans TC", "Source Han Sans TC", "Microsoft JhengHei", "PingFang TC", "Libertinus Serif"),
  size: 10.5pt,
  lang: "zh",
)

#let field(label, value) = block(spacing: 0.55em)[#strong(label + ":") #value]
"##;

/// Typst source for a document view.
fn build_source(view: &DocumentView) -> String {
    let mut src = String::from(PREAMBLE);

    if !view.shop_name.is_empty() {
        src.push_str(&format!(
            "#align(center, text(size: 10pt, fill: gray, {}))\n",
            typst_str(&view.shop_name)
        ));
    }
    src.push_str(&format!(
        "#align(center, text(size: 16pt, weight: \"bold\", {}))\n",
        typst_str(&view.title)
    ));
    src.push_str("#line(length: 100%, stroke: 1pt)\n");
    push_fields(&mut src, &view.header);

    for section in &view.sections {
        src.push_str("#v(6pt)\n#line(length: 100%, stroke: 0.5pt + gray)\n");
        src.push_str(&format!(
            "#text(size: 12pt, weight: \"bold\", {})\n",
            typst_str(&section.heading)
        ));
        push_fields(&mut src, &section.lines);

        if !section.pricing.is_empty() {
            src.push_str("#block(fill: luma(242), inset: 8pt, radius: 3pt, width: 100%)[\n");
            src.push_str(&format!("#strong({})\n", typst_str("計價項目")));
            push_fields(&mut src, &section.pricing);
            src.push_str("]\n");
        }
    }

    if !view.closing.is_empty() {
        src.push_str("#v(8pt)\n#line(length: 100%, stroke: 1pt)\n");
        if let Some(heading) = &view.closing_heading {
            src.push_str(&format!(
                "#text(size: 12pt, weight: \"bold\", {})\n",
                typst_str(heading)
            ));
        }
        push_fields(&mut src, &view.closing);
    }

    if let Some(total) = &view.total {
        src.push_str(&format!(
            "#v(12pt)\n#align(right, text(size: 14pt, weight: \"bold\", {}))\n",
            typst_str(&format!("{}: {}", total.label, total.value))
        ));
    }

    src
}

fn push_fields(src: &mut String, lines: &[Line]) {
    for line in lines {
        src.push_str(&format!(
            "#field({}, {})\n",
            typst_str(&line.label),
            typst_str(&line.value)
        ));
    }
}

/// Quote `s` as a Typst string literal.
fn typst_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// PDF Rendering
// ============================================================================

/// Render a document view to PDF bytes.
///
/// # Errors
///
/// [`CalcError::RenderFailed`] when Typst compilation or PDF export fails.
pub fn render_document_pdf(view: &DocumentView, fonts: &FontSet) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(build_source(view), fonts);

    let warned = typst::compile(&world);
    for warning in &warned.warnings {
        debug!(warning = %warning.message, "Typst warning");
    }

    let document = warned.output.map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("compile", messages.join("; "))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("pdf", messages.join("; "))
    })?;

    info!(document = %view.kind, bytes = pdf_bytes.len(), "Rendered PDF");
    Ok(pdf_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentKind;
    use crate::project::Project;
    use crate::window::WindowField;

    fn quote_view() -> DocumentView {
        let mut project = Project::new("Site \"A\" #1");
        project.set_window_field(1, WindowField::FloorSpace, "2F_bed*room").unwrap();
        project.set_window_field(1, WindowField::Width, "100").unwrap();
        project.set_window_field(1, WindowField::Height, "150").unwrap();
        project.document(DocumentKind::Quote)
    }

    #[test]
    fn test_typst_str_escapes() {
        assert_eq!(typst_str("plain"), "\"plain\"");
        assert_eq!(typst_str("a \"b\" \\ c"), "\"a \\\"b\\\" \\\\ c\"");
        assert_eq!(typst_str("line1\nline2"), "\"line1\\nline2\"");
    }

    #[test]
    fn test_source_keeps_user_text_in_strings() {
        let source = build_source(&quote_view());
        assert!(source.contains("\"Site \\\"A\\\" #1\""));
        assert!(source.contains("2F_bed*room"));
        assert!(source.contains("#block(fill: luma(242)"));
    }

    #[test]
    fn test_order_source_has_no_price_block() {
        let project = Project::new("Site");
        let source = build_source(&project.document(DocumentKind::InstallOrder));
        assert!(!source.contains("luma(242)"));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_document_pdf(&quote_view(), &FontSet::bundled());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_missing_font_dir_falls_back_to_bundled() {
        let fonts = FontSet::with_dirs(&[PathBuf::from("/nonexistent/fonts")]);
        assert_eq!(fonts.len(), FontSet::bundled().len());
        assert!(!fonts.is_empty());
    }
}
