//! Assembles the `.docx` package: content-type manifest, relationship lists,
//! styles and the document body, zipped into one archive.

use std::io::{Cursor, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::block::Body;
use crate::error::{Error, Result};
use crate::options::{inches_to_twips, ConvertOptions};
use crate::xml::Element;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub const STYLES_PART: &str = "word/styles.xml";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_XML: &str = "application/xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

/// Parts that need an explicit content-type override. Everything else is
/// covered by the `rels` and `xml` extension defaults.
const OVERRIDES: [(&str, &str); 2] = [(DOCUMENT_PART, CT_DOCUMENT), (STYLES_PART, CT_STYLES)];

/// Builds the complete archive in memory.
pub fn assemble(body: &Body, options: &ConvertOptions) -> Result<Vec<u8>> {
    let parts = [
        (CONTENT_TYPES_PART, content_types_xml()),
        (ROOT_RELS_PART, root_rels_xml()),
        (DOCUMENT_RELS_PART, document_rels_xml(body)),
        (STYLES_PART, styles_xml(options)),
        (DOCUMENT_PART, document_xml(body, options)),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for &(name, ref element) in &parts {
        let bytes = element
            .to_part()
            .map_err(|source| Error::Xml { part: name, source })?;
        zip.start_file(name, opts)?;
        zip.write_all(&bytes).map_err(|e| Error::Archive(e.into()))?;
    }
    let archive = zip.finish()?.into_inner();

    debug!(
        "assembled {} parts, {} fragments, {} hyperlinks into {} bytes",
        parts.len(),
        body.fragments().len(),
        body.hyperlinks().len(),
        archive.len()
    );
    Ok(archive)
}

fn content_types_xml() -> Element {
    let overrides = OVERRIDES.iter().map(|(part, content_type)| {
        Element::new("Override")
            .attr("PartName", format!("/{part}"))
            .attr("ContentType", *content_type)
    });
    Element::new("Types")
        .attr("xmlns", NS_CT)
        .child(
            Element::new("Default")
                .attr("Extension", "rels")
                .attr("ContentType", CT_RELS),
        )
        .child(
            Element::new("Default")
                .attr("Extension", "xml")
                .attr("ContentType", CT_XML),
        )
        .children(overrides)
}

fn relationship(id: &str, kind: &str, target: &str) -> Element {
    Element::new("Relationship")
        .attr("Id", id)
        .attr("Type", kind)
        .attr("Target", target)
}

fn root_rels_xml() -> Element {
    Element::new("Relationships")
        .attr("xmlns", NS_RELS)
        .child(relationship("rId1", REL_OFFICE_DOCUMENT, DOCUMENT_PART))
}

/// Targets here are relative to `word/`.
fn document_rels_xml(body: &Body) -> Element {
    let links = body.hyperlinks().iter().map(|(id, target)| {
        relationship(id, REL_HYPERLINK, target).attr("TargetMode", "External")
    });
    Element::new("Relationships")
        .attr("xmlns", NS_RELS)
        .child(relationship("rId1", REL_STYLES, "styles.xml"))
        .children(links)
}

fn styles_xml(options: &ConvertOptions) -> Element {
    let size = options.body_half_points();
    Element::new("w:styles").attr("xmlns:w", NS_W).child(
        Element::new("w:docDefaults").child(
            Element::new("w:rPrDefault").child(
                Element::new("w:rPr")
                    .child(
                        Element::new("w:rFonts")
                            .attr("w:ascii", &options.font_family)
                            .attr("w:hAnsi", &options.font_family),
                    )
                    .child(Element::new("w:sz").attr("w:val", size))
                    .child(Element::new("w:szCs").attr("w:val", size)),
            ),
        ),
    )
}

fn document_xml(body: &Body, options: &ConvertOptions) -> Element {
    let mut doc_body = Element::new("w:body");
    for fragment in body.fragments() {
        doc_body = doc_body.raw(fragment.as_xml());
    }
    doc_body.push(section_properties(options));

    Element::new("w:document")
        .attr("xmlns:w", NS_W)
        .attr("xmlns:r", NS_R)
        .child(doc_body)
}

/// Page size and margins, in twips.
fn section_properties(options: &ConvertOptions) -> Element {
    let (width, height) = options.page_size.dimensions();
    Element::new("w:sectPr")
        .child(Element::new("w:pgSz").attr("w:w", width).attr("w:h", height))
        .child(
            Element::new("w:pgMar")
                .attr("w:top", inches_to_twips(options.margin_top))
                .attr("w:right", inches_to_twips(options.margin_right))
                .attr("w:bottom", inches_to_twips(options.margin_bottom))
                .attr("w:left", inches_to_twips(options.margin_left))
                .attr("w:header", 720)
                .attr("w:footer", 720)
                .attr("w:gutter", 0),
        )
}
