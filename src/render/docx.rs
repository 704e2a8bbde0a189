//! DOCX renderer: WordprocessingML body written with `quick-xml`, packaged
//! into an OOXML zip container.

use super::{or_fallback, walk_document, DocumentVisitor, RenderOptions, SECTION_ERROR_TEXT};
use crate::cleanup::is_invisible_char;
use crate::error::Result;
use crate::inline::format_inline;
use crate::model::{Document, DocumentSection, ListItem, StyledRun, Table, TitleInfo, TocEntry};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Heading level of section titles; body headers are placed below it.
const SECTION_TIER: u8 = 1;

/// Deepest list level defined in the numbering part.
const MAX_LIST_LEVEL: usize = 8;

/// Usable page width in twentieths of a point (Letter, 1" margins).
const TEXT_WIDTH_TWIPS: usize = 9360;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Paragraph-level formatting for a single `w:p`.
#[derive(Debug, Default, Clone)]
struct ParagraphProps {
    style: Option<String>,
    keep_next: bool,
    list_level: Option<usize>,
    before: Option<u32>,
    after: Option<u32>,
    center: bool,
    /// Font size in half-points applied to every run
    run_size: Option<u32>,
    /// Forces every run bold
    bold: bool,
}

impl ParagraphProps {
    fn spaced(before: Option<u32>, after: Option<u32>) -> Self {
        Self {
            before,
            after,
            ..Default::default()
        }
    }

    fn heading(level: u8) -> Self {
        Self {
            style: Some(format!("Heading{}", level)),
            keep_next: true,
            ..Default::default()
        }
    }

    fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    fn sized(mut self, half_points: u32) -> Self {
        self.run_size = Some(half_points);
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// DOCX renderer.
pub struct DocxRenderer {
    options: RenderOptions,
    body: Writer<Vec<u8>>,
    /// Document title and author for the core properties part
    core: (String, String),
}

impl DocxRenderer {
    /// Creates a new renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            body: Writer::new(Vec::new()),
            core: (String::new(), String::new()),
        }
    }

    /// Renders a document to the bytes of a `.docx` file.
    pub fn render(self, document: &Document) -> Result<Vec<u8>> {
        walk_document(document, self)
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.body.write_event(Event::Start(elem))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.body.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.body.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.start("w:t", &[("xml:space", "preserve")])?;
        self.body
            .write_event(Event::Text(BytesText::new(&xml_safe(text))))?;
        self.end("w:t")
    }

    fn page_break(&mut self) -> Result<()> {
        self.start("w:p", &[])?;
        self.start("w:r", &[])?;
        self.empty("w:br", &[("w:type", "page")])?;
        self.end("w:r")?;
        self.end("w:p")
    }

    fn write_paragraph(&mut self, props: &ParagraphProps, runs: &[StyledRun]) -> Result<()> {
        self.start("w:p", &[])?;
        self.write_paragraph_props(props)?;
        for run in runs {
            self.write_run(run, props)?;
        }
        self.end("w:p")
    }

    fn write_plain(&mut self, props: &ParagraphProps, text: &str) -> Result<()> {
        self.write_paragraph(props, &[StyledRun::plain(text)])
    }

    /// Writes `w:pPr`. Child order follows the WordprocessingML schema.
    fn write_paragraph_props(&mut self, props: &ParagraphProps) -> Result<()> {
        self.start("w:pPr", &[])?;

        if let Some(style) = &props.style {
            self.empty("w:pStyle", &[("w:val", style.as_str())])?;
        }
        if props.keep_next {
            self.empty("w:keepNext", &[])?;
        }
        if let Some(level) = props.list_level {
            let level = level.to_string();
            self.start("w:numPr", &[])?;
            self.empty("w:ilvl", &[("w:val", level.as_str())])?;
            self.empty("w:numId", &[("w:val", "1")])?;
            self.end("w:numPr")?;
        }

        let before = props.before.map(|v| v.to_string());
        let after = props.after.map(|v| v.to_string());
        let mut spacing: Vec<(&str, &str)> = Vec::new();
        if let Some(before) = &before {
            spacing.push(("w:before", before.as_str()));
        }
        if let Some(after) = &after {
            spacing.push(("w:after", after.as_str()));
        }
        if !spacing.is_empty() {
            self.empty("w:spacing", &spacing)?;
        }

        if props.center {
            self.empty("w:jc", &[("w:val", "center")])?;
        }

        self.end("w:pPr")
    }

    fn write_run(&mut self, run: &StyledRun, props: &ParagraphProps) -> Result<()> {
        if run.is_empty() {
            return Ok(());
        }

        self.start("w:r", &[])?;

        let bold = run.bold || props.bold;
        if bold || props.run_size.is_some() {
            self.start("w:rPr", &[])?;
            if bold {
                self.empty("w:b", &[])?;
            }
            if let Some(size) = props.run_size {
                let size = size.to_string();
                self.empty("w:sz", &[("w:val", size.as_str())])?;
                self.empty("w:szCs", &[("w:val", size.as_str())])?;
            }
            self.end("w:rPr")?;
        }

        if self.options.preserve_line_breaks {
            for (i, line) in run.text.split('\n').enumerate() {
                if i > 0 {
                    self.empty("w:br", &[])?;
                }
                if !line.is_empty() {
                    self.text(line)?;
                }
            }
        } else {
            let joined = run.text.replace('\n', " ");
            self.text(&joined)?;
        }

        self.end("w:r")
    }

    fn write_section_heading(&mut self, section: &DocumentSection, first: bool) -> Result<()> {
        if !first {
            self.page_break()?;
        }
        let props = ParagraphProps::heading(SECTION_TIER);
        self.write_plain(&props, &section.heading())
    }

    fn write_table_borders(&mut self) -> Result<()> {
        self.start("w:tblBorders", &[])?;
        for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
            self.empty(
                side,
                &[
                    ("w:val", "single"),
                    ("w:sz", "4"),
                    ("w:space", "0"),
                    ("w:color", "auto"),
                ],
            )?;
        }
        self.end("w:tblBorders")
    }

    /// Assembles `word/document.xml` around the rendered body.
    fn document_xml(&self) -> Result<Vec<u8>> {
        let mut doc = Writer::new(Vec::new());
        doc.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        doc.write_event(Event::Start(
            BytesStart::new("w:document").with_attributes([("xmlns:w", W_NS), ("xmlns:r", R_NS)]),
        ))?;
        doc.write_event(Event::Start(BytesStart::new("w:body")))?;
        doc.get_mut().extend_from_slice(self.body.get_ref());
        doc.get_mut().extend_from_slice(SECTION_PROPERTIES.as_bytes());
        doc.write_event(Event::End(BytesEnd::new("w:body")))?;
        doc.write_event(Event::End(BytesEnd::new("w:document")))?;
        Ok(doc.into_inner())
    }

    fn package(&self, document_xml: &[u8]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opt = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", opt)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", opt)?;
        zip.write_all(RELS_XML.as_bytes())?;

        zip.start_file("docProps/core.xml", opt)?;
        zip.write_all(core_xml(&self.core.0, &self.core.1).as_bytes())?;

        zip.start_file("word/document.xml", opt)?;
        zip.write_all(document_xml)?;

        zip.start_file("word/_rels/document.xml.rels", opt)?;
        zip.write_all(WORD_RELS_XML.as_bytes())?;

        zip.start_file("word/styles.xml", opt)?;
        zip.write_all(styles_xml(&self.options).as_bytes())?;

        zip.start_file("word/numbering.xml", opt)?;
        zip.write_all(numbering_xml().as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl DocumentVisitor for DocxRenderer {
    type Output = Vec<u8>;

    fn visit_title(&mut self, title: &TitleInfo) -> Result<()> {
        let project = or_fallback(&title.project_title, "Project Title").to_string();
        let client = or_fallback(&title.client_name, "Client Company").to_string();
        let preparer = or_fallback(&title.preparer_name, "Your Company").to_string();
        self.core = (project.clone(), preparer.clone());

        let heading = ParagraphProps::spaced(None, Some(400)).centered().sized(36).bold();
        self.write_plain(&heading, "STATEMENT OF WORK")?;
        let subtitle = ParagraphProps::spaced(None, Some(800)).centered().sized(28).bold();
        self.write_plain(&subtitle, &project)?;

        let label = ParagraphProps::spaced(None, Some(200)).sized(24).bold();
        let name = ParagraphProps::spaced(None, Some(100)).sized(22);
        let detail = ParagraphProps::spaced(None, Some(100)).sized(20);

        self.write_plain(&label, "Prepared for:")?;
        self.write_plain(&name, &client)?;
        if let Some(address) = title.client_address.as_deref().filter(|a| !a.trim().is_empty()) {
            self.write_plain(&detail, address)?;
        }

        let label = ParagraphProps::spaced(Some(400), Some(200)).sized(24).bold();
        self.write_plain(&label, "Prepared by:")?;
        self.write_plain(&name, &preparer)?;
        let contact = [
            title.preparer_address.clone(),
            title.preparer_email.as_ref().map(|e| format!("Email: {}", e)),
            title.preparer_phone.as_ref().map(|p| format!("Phone: {}", p)),
        ];
        for line in contact.into_iter().flatten() {
            if !line.trim().is_empty() {
                self.write_plain(&detail, &line)?;
            }
        }

        let date = ParagraphProps::spaced(Some(800), None).centered().sized(20);
        self.write_plain(&date, &title.date)?;

        self.page_break()
    }

    fn visit_toc(&mut self, toc: &[TocEntry]) -> Result<()> {
        if !self.options.include_toc || toc.is_empty() {
            return Ok(());
        }

        let mut heading = ParagraphProps::heading(SECTION_TIER);
        heading.after = Some(400);
        self.write_plain(&heading, "Table of Contents")?;

        let entry_props = ParagraphProps::spaced(None, Some(100));
        for entry in toc {
            self.write_plain(&entry_props, &entry.label())?;
        }

        self.page_break()
    }

    fn begin_section(&mut self, section: &DocumentSection, first: bool) -> Result<()> {
        self.write_section_heading(section, first)
    }

    fn visit_header(&mut self, text: &str, level: u8) -> Result<()> {
        let level = self.options.body_heading_level(level, SECTION_TIER);
        let mut props = ParagraphProps::heading(level);
        props.before = Some(240);
        props.after = Some(120);
        self.write_paragraph(&props, &format_inline(text.trim()))
    }

    fn visit_paragraph(&mut self, runs: &[StyledRun]) -> Result<()> {
        self.write_paragraph(&ParagraphProps::spaced(None, Some(200)), runs)
    }

    fn visit_list(&mut self, items: &[ListItem]) -> Result<()> {
        for item in items {
            let props = ParagraphProps {
                style: Some("ListParagraph".to_string()),
                list_level: Some(item.indent_level.min(MAX_LIST_LEVEL)),
                after: Some(100),
                ..Default::default()
            };
            self.write_paragraph(&props, &item.runs)?;
        }
        Ok(())
    }

    fn visit_table(&mut self, table: &Table) -> Result<()> {
        let cols = table.column_count().max(1);
        let col_width = (TEXT_WIDTH_TWIPS / cols).to_string();

        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty("w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
        self.write_table_borders()?;
        self.end("w:tblPr")?;

        self.start("w:tblGrid", &[])?;
        for _ in 0..cols {
            self.empty("w:gridCol", &[("w:w", col_width.as_str())])?;
        }
        self.end("w:tblGrid")?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let header = row_idx == 0;
            self.start("w:tr", &[])?;
            if header {
                self.start("w:trPr", &[])?;
                self.empty("w:tblHeader", &[])?;
                self.end("w:trPr")?;
            }

            for cell in row {
                self.start("w:tc", &[])?;
                self.start("w:tcPr", &[])?;
                self.empty("w:tcW", &[("w:w", col_width.as_str()), ("w:type", "dxa")])?;
                self.end("w:tcPr")?;

                let props = ParagraphProps {
                    bold: header,
                    ..Default::default()
                };
                self.write_paragraph(&props, &format_inline(cell.trim()))?;
                self.end("w:tc")?;
            }

            self.end("w:tr")?;
        }

        self.end("w:tbl")?;

        // Keeps adjacent tables from merging.
        self.write_paragraph(&ParagraphProps::spaced(None, Some(200)), &[])
    }

    fn visit_signature(&mut self, runs: &[StyledRun]) -> Result<()> {
        self.write_paragraph(&ParagraphProps::spaced(Some(360), Some(360)), runs)
    }

    fn visit_section_error(&mut self, section: &DocumentSection, first: bool) -> Result<()> {
        self.write_section_heading(section, first)?;
        self.write_plain(&ParagraphProps::spaced(None, Some(200)), SECTION_ERROR_TEXT)
    }

    fn checkpoint(&self) -> usize {
        self.body.get_ref().len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.body.get_mut().truncate(checkpoint);
    }

    fn finish(self) -> Result<Vec<u8>> {
        let document_xml = self.document_xml()?;
        let bytes = self.package(&document_xml)?;
        debug!(
            document_xml = document_xml.len(),
            package = bytes.len(),
            "docx package written"
        );
        Ok(bytes)
    }
}

const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const WORD_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

/// Heading sizes in half-points, Heading1 first.
const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 22];

fn core_xml(title: &str, creator: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>{}</dc:creator></cp:coreProperties>"#,
        escape(xml_safe(title)),
        escape(xml_safe(creator))
    )
}

/// Drops characters that may not appear in an XML 1.0 document.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_invisible_char) {
        Cow::Owned(text.chars().filter(|&c| !is_invisible_char(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

fn styles_xml(options: &RenderOptions) -> String {
    let font = escape(options.font.as_str());
    let fonts = format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}" w:eastAsia="{0}"/>"#,
        font
    );

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );

    xml.push_str(&format!(
        r#"<w:docDefaults><w:rPrDefault><w:rPr>{fonts}<w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
        fonts = fonts,
        size = options.font_size
    ));

    xml.push_str(&format!(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr>{}<w:sz w:val="{}"/></w:rPr></w:style>"#,
        fonts, options.font_size
    ));

    for (i, size) in HEADING_SIZES.iter().enumerate() {
        let level = i + 1;
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr>{fonts}<w:b/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:style>"#,
            level = level,
            outline = i,
            fonts = fonts,
            size = size
        ));
    }

    xml.push_str(
        r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="720"/></w:pPr></w:style>"#,
    );
    xml.push_str("</w:styles>");
    xml
}

fn numbering_xml() -> String {
    const BULLETS: [&str; 3] = ["\u{2022}", "\u{25E6}", "\u{25AA}"];

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="hybridMultilevel"/>"#,
    );

    for level in 0..=MAX_LIST_LEVEL {
        xml.push_str(&format!(
            r#"<w:lvl w:ilvl="{level}"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="{bullet}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{left}" w:hanging="360"/></w:pPr></w:lvl>"#,
            level = level,
            bullet = BULLETS[level % BULLETS.len()],
            left = 720 * (level + 1)
        ));
    }

    xml.push_str(r#"</w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#);
    xml
}
