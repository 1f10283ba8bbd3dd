//! Walks block nodes and emits one serialized `w:p` fragment per output
//! paragraph.

use std::collections::BTreeMap;

use log::trace;

use crate::ast::{Block, Document, Inline};
use crate::error::{Error, Result};
use crate::inline::{plain_text, runs};
use crate::options::ConvertOptions;
use crate::package::DOCUMENT_PART;
use crate::style::{text_element, Run, RunProps};
use crate::xml::Element;

/// Heading sizes in half-points, level 1 first.
pub const HEADING_SIZES: [u32; 6] = [48, 40, 32, 28, 24, 22];

const QUOTE_COLOR: &str = "6A737D";
const QUOTE_BORDER_COLOR: &str = "DFE2E5";
const RULE_COLOR: &str = "E1E4E8";
const CODE_FILL: &str = "F6F8FA";
const LIST_INDENT: usize = 360;
const CODE_INDENT: u32 = 360;

/// Size for a heading level; levels outside 1..=6 are clamped.
pub fn heading_size(level: u8) -> u32 {
    HEADING_SIZES[usize::from(level.clamp(1, 6)) - 1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Heading,
    Paragraph,
    CodeLine,
    Spacer,
    ListItem,
    Quote,
    Rule,
}

/// One serialized paragraph of the document body.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    kind: FragmentKind,
    xml: String,
}

impl Fragment {
    fn new(kind: FragmentKind, element: &Element) -> Result<Self> {
        let xml = element.to_xml().map_err(|source| Error::Xml {
            part: DOCUMENT_PART,
            source,
        })?;
        Ok(Self { kind, xml })
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn as_xml(&self) -> &str {
        &self.xml
    }
}

/// External hyperlink targets keyed to relationship ids.
#[derive(Debug, Clone, Default)]
pub struct Hyperlinks {
    ids: BTreeMap<String, String>,
}

impl Hyperlinks {
    /// `rId1` belongs to the styles part.
    const FIRST_ID: usize = 2;

    /// Returns the relationship id for `target`, allocating one on first use.
    pub fn id_for(&mut self, target: &str) -> String {
        if let Some(id) = self.ids.get(target) {
            return id.clone();
        }
        let id = format!("rId{}", Self::FIRST_ID + self.ids.len());
        self.ids.insert(target.to_string(), id.clone());
        id
    }

    /// `(id, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids
            .iter()
            .map(|(target, id)| (id.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Output of one translation: fragments in document order plus the
/// hyperlinks they reference.
#[derive(Debug, Clone, Default)]
pub struct Body {
    fragments: Vec<Fragment>,
    links: Hyperlinks,
}

impl Body {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn hyperlinks(&self) -> &Hyperlinks {
        &self.links
    }

    fn push(&mut self, kind: FragmentKind, element: Element) -> Result<()> {
        self.fragments.push(Fragment::new(kind, &element)?);
        Ok(())
    }
}

pub struct BlockTranslator<'a> {
    options: &'a ConvertOptions,
}

impl<'a> BlockTranslator<'a> {
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    pub fn translate(&self, doc: &Document) -> Result<Body> {
        let mut body = Body::default();
        self.blocks(&doc.blocks, &mut body)?;
        Ok(body)
    }

    fn blocks(&self, blocks: &[Block], body: &mut Body) -> Result<()> {
        for block in blocks {
            self.block(block, body)?;
        }
        Ok(())
    }

    fn block(&self, block: &Block, body: &mut Body) -> Result<()> {
        match block {
            Block::Heading { level, content } => self.heading(*level, content, body),
            Block::Paragraph { content, .. } => self.paragraph(content, body),
            Block::CodeBlock { literal } => self.code_block(literal, body),
            Block::List { ordered, items } => self.list(*ordered, items, 0, body),
            Block::BlockQuote { children } => self.blockquote(children, body),
            Block::ThematicBreak => self.rule(body),
            Block::Html => {
                trace!("skipping raw HTML block");
                Ok(())
            }
            Block::Item { children } | Block::Other { children } => self.blocks(children, body),
        }
    }

    fn heading(&self, level: u8, content: &[Inline], body: &mut Body) -> Result<()> {
        let size = heading_size(level);
        let p = Element::new("w:p")
            .child(
                Element::new("w:pPr").child(
                    Element::new("w:spacing")
                        .attr("w:before", 240)
                        .attr("w:after", 120),
                ),
            )
            .child(
                Element::new("w:r")
                    .child(
                        Element::new("w:rPr")
                            .child(Element::new("w:b"))
                            .child(Element::new("w:sz").attr("w:val", size))
                            .child(Element::new("w:szCs").attr("w:val", size)),
                    )
                    .child(text_element(&plain_text(content))),
            );
        body.push(FragmentKind::Heading, p)
    }

    fn paragraph(&self, content: &[Inline], body: &mut Body) -> Result<()> {
        let runs = runs(content);
        let p = Element::new("w:p")
            .child(Element::new("w:pPr").child(Element::new("w:spacing").attr("w:after", 160)))
            .children(self.run_elements(&runs, self.options.body_half_points(), body));
        body.push(FragmentKind::Paragraph, p)
    }

    fn code_block(&self, literal: &str, body: &mut Body) -> Result<()> {
        let props = self.run_props(self.options.body_half_points());
        for line in literal.trim_end_matches('\n').split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let line = if line.is_empty() { " " } else { line };
            let run = Run {
                monospace: true,
                ..Run::plain(line)
            };
            let p = Element::new("w:p")
                .child(
                    Element::new("w:pPr")
                        .child(
                            Element::new("w:shd")
                                .attr("w:val", "clear")
                                .attr("w:color", "auto")
                                .attr("w:fill", CODE_FILL),
                        )
                        .child(Element::new("w:spacing").attr("w:after", 0))
                        .child(Element::new("w:ind").attr("w:left", CODE_INDENT)),
                )
                .child(run.to_element(&props));
            body.push(FragmentKind::CodeLine, p)?;
        }

        let spacer = Element::new("w:p")
            .child(Element::new("w:pPr").child(Element::new("w:spacing").attr("w:after", 160)));
        body.push(FragmentKind::Spacer, spacer)
    }

    /// Numbering restarts at 1 for every list, nested or not.
    fn list(&self, ordered: bool, items: &[Block], level: usize, body: &mut Body) -> Result<()> {
        let mut number = 1;
        for item in items {
            if let Block::Item { children } = item {
                let prefix = if ordered {
                    format!("{number}. ")
                } else {
                    "• ".to_string()
                };
                self.list_item(children, &prefix, level, body)?;
                number += 1;
            }
        }
        Ok(())
    }

    /// The item's text comes from the paragraphs before its first nested
    /// list. That list is emitted right after the item and ends the item;
    /// anything following it is not rendered.
    fn list_item(
        &self,
        children: &[Block],
        prefix: &str,
        level: usize,
        body: &mut Body,
    ) -> Result<()> {
        let mut content = Vec::new();
        for child in children {
            match child {
                Block::Paragraph { content: inlines, .. } => content.extend(runs(inlines)),
                Block::List { ordered, items } => {
                    self.push_list_item(prefix, &content, level, body)?;
                    return self.list(*ordered, items, level + 1, body);
                }
                other => trace!("skipping list item child {other:?}"),
            }
        }
        self.push_list_item(prefix, &content, level, body)
    }

    fn push_list_item(
        &self,
        prefix: &str,
        content: &[Run],
        level: usize,
        body: &mut Body,
    ) -> Result<()> {
        let size = self.options.body_half_points();
        let p = Element::new("w:p")
            .child(
                Element::new("w:pPr")
                    .child(Element::new("w:spacing").attr("w:after", 80))
                    .child(Element::new("w:ind").attr("w:left", LIST_INDENT * (level + 1))),
            )
            .child(Run::plain(prefix).to_element(&self.run_props(size)))
            .children(self.run_elements(content, size, body));
        body.push(FragmentKind::ListItem, p)
    }

    fn blockquote(&self, children: &[Block], body: &mut Body) -> Result<()> {
        for child in children {
            let Block::Paragraph { content, .. } = child else {
                trace!("skipping blockquote child {child:?}");
                continue;
            };
            let mut runs = runs(content);
            for run in &mut runs {
                run.italic = true;
                run.color = Some(QUOTE_COLOR.to_string());
            }
            let p = Element::new("w:p")
                .child(
                    Element::new("w:pPr")
                        .child(
                            Element::new("w:pBdr").child(
                                Element::new("w:left")
                                    .attr("w:val", "single")
                                    .attr("w:sz", 24)
                                    .attr("w:space", 4)
                                    .attr("w:color", QUOTE_BORDER_COLOR),
                            ),
                        )
                        .child(Element::new("w:spacing").attr("w:after", 160))
                        .child(Element::new("w:ind").attr("w:left", 720)),
                )
                .children(self.run_elements(&runs, self.options.body_half_points(), body));
            body.push(FragmentKind::Quote, p)?;
        }
        Ok(())
    }

    fn rule(&self, body: &mut Body) -> Result<()> {
        let p = Element::new("w:p").child(
            Element::new("w:pPr")
                .child(
                    Element::new("w:pBdr").child(
                        Element::new("w:bottom")
                            .attr("w:val", "single")
                            .attr("w:sz", 6)
                            .attr("w:space", 1)
                            .attr("w:color", RULE_COLOR),
                    ),
                )
                .child(
                    Element::new("w:spacing")
                        .attr("w:before", 240)
                        .attr("w:after", 240),
                ),
        );
        body.push(FragmentKind::Rule, p)
    }

    fn run_props(&self, size: u32) -> RunProps<'_> {
        RunProps {
            size,
            code_size: self.options.code_half_points(),
            code_font: &self.options.code_font_family,
        }
    }

    /// Link runs are wrapped in `w:hyperlink` pointing at an external
    /// relationship.
    fn run_elements(&self, runs: &[Run], size: u32, body: &mut Body) -> Vec<Element> {
        let props = self.run_props(size);
        let mut out = Vec::with_capacity(runs.len());
        for run in runs {
            let element = run.to_element(&props);
            match run.link.as_deref() {
                Some(target) if !target.is_empty() => out.push(
                    Element::new("w:hyperlink")
                        .attr("r:id", body.links.id_for(target))
                        .child(element),
                ),
                _ => out.push(element),
            }
        }
        out
    }
}
