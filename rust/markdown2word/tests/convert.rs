use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};

use markdown2word::package::{
    CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, ROOT_RELS_PART, STYLES_PART,
};
use markdown2word::{ConvertOptions, Converter, Error, PageSize};
use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

const ALL_PARTS: [&str; 5] = [
    CONTENT_TYPES_PART,
    ROOT_RELS_PART,
    DOCUMENT_PART,
    DOCUMENT_RELS_PART,
    STYLES_PART,
];

fn convert(markdown: &str) -> Vec<u8> {
    Converter::default().convert(markdown.as_bytes()).unwrap()
}

fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Unescaped contents of every `w:t` element, one entry per element.
fn texts(document_xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(document_xml);
    let mut out = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:t" => {
                in_text = true;
                out.push(String::new());
            }
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => {
                if let Some(last) = out.last_mut() {
                    last.push_str(&t.unescape().unwrap());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

fn is_well_formed(xml: &str) -> bool {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

#[test]
fn empty_input_still_produces_every_part() {
    let docx = convert("");
    let archive = ZipArchive::new(Cursor::new(&docx)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    let mut expected = ALL_PARTS.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);

    for part in ALL_PARTS {
        let xml = read_part(&docx, part);
        assert!(is_well_formed(&xml), "{part} is not well-formed");
    }
    let document = read_part(&docx, DOCUMENT_PART);
    assert!(document.contains("<w:sectPr>"));
    assert!(texts(&document).is_empty());
}

/// Attribute maps of every element named `name`, in document order.
fn elements(xml: &str, name: &str) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == name.as_bytes() => {
                let attrs = e
                    .attributes()
                    .map(|attr| {
                        let attr = attr.unwrap();
                        let key = String::from_utf8(attr.key.as_ref().to_vec()).unwrap();
                        (key, attr.unescape_value().unwrap().into_owned())
                    })
                    .collect();
                out.push(attrs);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

#[test]
fn manifest_and_relationships_point_at_existing_parts() {
    let docx = convert("# Hi\n\nSee [docs](https://example.com) and <me@example.com>.");
    let archive = ZipArchive::new(Cursor::new(&docx)).unwrap();
    let entries: HashSet<&str> = archive.file_names().collect();

    let overrides = elements(&read_part(&docx, CONTENT_TYPES_PART), "Override");
    assert!(!overrides.is_empty());
    for attrs in &overrides {
        let part = attrs["PartName"].trim_start_matches('/');
        assert!(entries.contains(part), "manifest names missing part {part}");
    }

    // Relationship targets resolve against the directory of the source part.
    let mut internal = 0;
    let mut external = 0;
    for (rels_part, base) in [(ROOT_RELS_PART, ""), (DOCUMENT_RELS_PART, "word/")] {
        for attrs in elements(&read_part(&docx, rels_part), "Relationship") {
            if attrs.get("TargetMode").map(String::as_str) == Some("External") {
                external += 1;
                continue;
            }
            let target = format!("{base}{}", attrs["Target"]);
            assert!(
                entries.contains(target.as_str()),
                "{rels_part} points at missing part {target}"
            );
            internal += 1;
        }
    }
    assert_eq!(internal, 2);
    assert_eq!(external, 2);
}

#[test]
fn reserved_characters_survive_a_round_trip() {
    let markdown = "Tom & Jerry say \"hi\" to <em>'you'</em> & `a < b > c`";
    let docx = convert(markdown);
    let document = read_part(&docx, DOCUMENT_PART);
    assert!(is_well_formed(&document));
    assert_eq!(
        texts(&document).concat(),
        "Tom & Jerry say \"hi\" to 'you' & a < b > c"
    );
}

#[test]
fn title_and_paragraph_scenario() {
    let docx = convert("# Title\n\nSome **bold** and *italic* text.");
    let document = read_part(&docx, DOCUMENT_PART);
    assert_eq!(
        texts(&document),
        vec!["Title", "Some ", "bold", " and ", "italic", " text."]
    );
    assert!(document.contains(r#"<w:sz w:val="48"/>"#));
}

#[test]
fn code_block_lines_are_preserved() {
    let docx = convert("```rust\nfn main() {\n    let x = 1 < 2;\n}\n```\n");
    let document = read_part(&docx, DOCUMENT_PART);
    assert_eq!(
        texts(&document),
        vec!["fn main() {", "    let x = 1 < 2;", "}"]
    );
}

#[test]
fn hyperlinks_are_external_relationships() {
    let docx = convert("See [docs](https://example.com/a?b=1&c=2) and <https://example.org>.");
    let doc_rels = read_part(&docx, DOCUMENT_RELS_PART);
    assert!(doc_rels.contains(r#"Target="https://example.com/a?b=1&amp;c=2""#));
    assert!(doc_rels.contains(r#"Target="https://example.org""#));
    assert_eq!(doc_rels.matches(r#"TargetMode="External""#).count(), 2);

    let document = read_part(&docx, DOCUMENT_PART);
    assert_eq!(document.matches("<w:hyperlink r:id=").count(), 2);
    assert!(document.contains(r#"xmlns:r="#));
}

#[test]
fn a4_page_with_default_margins() {
    let options = ConvertOptions {
        page_size: PageSize::A4,
        ..ConvertOptions::default()
    };
    let docx = Converter::new(options).convert(b"hello").unwrap();
    let document = read_part(&docx, DOCUMENT_PART);
    assert!(document.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
    assert!(document.contains(r#"w:top="1440""#));
    assert!(document.contains(r#"w:left="1440""#));
}

#[test]
fn body_font_lands_in_styles() {
    let options = ConvertOptions {
        font_family: "Georgia".to_string(),
        font_size: 12.0,
        ..ConvertOptions::default()
    };
    let docx = Converter::new(options).convert(b"text").unwrap();
    let styles = read_part(&docx, STYLES_PART);
    assert!(styles.contains(r#"w:ascii="Georgia""#));
    assert!(styles.contains(r#"<w:sz w:val="24"/>"#));
}

#[test]
fn latin1_input_is_converted_lossily() {
    let docx = Converter::default().convert(b"# caf\xe9\n").unwrap();
    let document = read_part(&docx, DOCUMENT_PART);
    assert_eq!(texts(&document), vec!["caf\u{FFFD}"]);
}

#[test]
fn xml_illegal_control_characters_are_replaced() {
    let docx = convert("```\n\x1b[31mred\x1b[0m\n```\n\ntext\x01here\n");
    let document = read_part(&docx, DOCUMENT_PART);
    let illegal: Vec<u8> = document
        .bytes()
        .filter(|b| *b < 0x20 && !matches!(*b, b'\t' | b'\n' | b'\r'))
        .collect();
    assert_eq!(illegal, Vec::<u8>::new());
    assert!(is_well_formed(&document));
    assert_eq!(
        texts(&document),
        vec!["\u{FFFD}[31mred\u{FFFD}[0m", "text\u{FFFD}here"]
    );
}

#[test]
fn convert_to_writer_matches_convert() {
    let converter = Converter::default();
    let mut out = Vec::new();
    converter.convert_to_writer(b"- a\n- b\n", &mut out).unwrap();
    let document = read_part(&out, DOCUMENT_PART);
    assert_eq!(texts(&document), vec!["• ", "a", "• ", "b"]);
}

#[test]
fn convert_file_writes_archive() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.md");
    let output = dir.path().join("notes.docx");
    std::fs::write(&input, "> quoted\n").unwrap();

    Converter::default().convert_file(&input, &output).unwrap();
    let docx = std::fs::read(&output).unwrap();
    let document = read_part(&docx, DOCUMENT_PART);
    assert_eq!(texts(&document), vec!["quoted"]);
}

#[test]
fn missing_input_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.docx");
    let err = Converter::default()
        .convert_file(&dir.path().join("absent.md"), &output)
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
    assert!(!output.exists());
}
