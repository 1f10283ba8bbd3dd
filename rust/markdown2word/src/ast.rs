//! Markdown syntax tree.
//!
//! `pulldown-cmark` hands out a flat event stream; [`parse`] folds it into a
//! closed tree of [`Block`] and [`Inline`] nodes so the translators can
//! recurse with exhaustive matches.

use log::trace;
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TextMergeStream};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    /// `tight` marks the bare text of a tight list item.
    Paragraph {
        content: Vec<Inline>,
        tight: bool,
    },
    /// Fenced or indented code, kept as the literal source text.
    CodeBlock {
        literal: String,
    },
    List {
        ordered: bool,
        items: Vec<Block>,
    },
    Item {
        children: Vec<Block>,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    ThematicBreak,
    Html,
    /// Any container the translators do not know (tables, ...).
    Other {
        children: Vec<Block>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    /// Level 1 is `*em*`, level 2 is `**strong**`.
    Emphasis {
        level: u8,
        children: Vec<Inline>,
    },
    Link {
        dest: String,
        children: Vec<Inline>,
    },
    AutoLink {
        url: String,
        email: bool,
    },
    Image {
        dest: String,
        alt: Vec<Inline>,
    },
    SoftBreak,
    HardBreak,
    Html(String),
    TaskMarker(bool),
    /// Any inline wrapper the translators do not know (strikethrough, ...).
    Other {
        children: Vec<Inline>,
    },
}

/// Parses Markdown with the GitHub extensions (tables, strikethrough, task
/// lists) enabled.
pub fn parse(source: &str) -> Result<Document> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    fold(TextMergeStream::new(Parser::new_ext(source, opts)))
}

/// Folds an event stream into a [`Document`].
pub fn fold<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Result<Document> {
    let mut builder = TreeBuilder::new();
    for event in events {
        builder.event(event)?;
    }
    builder.finish()
}

#[derive(Debug)]
enum FrameKind {
    Document,
    Heading(u8),
    Paragraph,
    CodeBlock,
    List { ordered: bool },
    Item,
    BlockQuote,
    Html,
    OtherBlock,
    Emphasis(u8),
    Link { dest: String },
    AutoLink { url: String, email: bool },
    Image { dest: String },
    OtherInline,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    literal: String,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
            inlines: Vec::new(),
            literal: String::new(),
        }
    }

    /// Moves pending inline content into a tight paragraph so it keeps its
    /// place before the next child block.
    fn flush_inlines(&mut self) {
        if self.inlines.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.inlines);
        if matches!(self.kind, FrameKind::OtherBlock) {
            trace!("dropping inline content of unsupported block");
            return;
        }
        self.blocks.push(Block::Paragraph {
            content,
            tight: true,
        });
    }
}

enum Built {
    Block(Block),
    Inline(Inline),
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Document)],
        }
    }

    fn top(&mut self) -> Result<&mut Frame> {
        self.stack
            .last_mut()
            .ok_or_else(|| Error::Parse("event outside of document".to_string()))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(tag) => self.stack.push(Frame::new(frame_kind(tag))),
            Event::End(_) => {
                let frame = match self.stack.pop() {
                    Some(frame) if !self.stack.is_empty() => frame,
                    _ => return Err(Error::Parse("end tag without matching start".to_string())),
                };
                self.attach(close(frame))?;
            }
            Event::Text(text) => {
                let top = self.top()?;
                match top.kind {
                    FrameKind::CodeBlock | FrameKind::Html => top.literal.push_str(&text),
                    _ => top.inlines.push(Inline::Text(text.into_string())),
                }
            }
            Event::Code(code) => self.top()?.inlines.push(Inline::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                let top = self.top()?;
                match top.kind {
                    FrameKind::Html => top.literal.push_str(&html),
                    _ => top.inlines.push(Inline::Html(html.into_string())),
                }
            }
            Event::SoftBreak => self.top()?.inlines.push(Inline::SoftBreak),
            Event::HardBreak => self.top()?.inlines.push(Inline::HardBreak),
            Event::Rule => self.attach(Built::Block(Block::ThematicBreak))?,
            Event::TaskListMarker(checked) => {
                self.top()?.inlines.push(Inline::TaskMarker(checked))
            }
            Event::FootnoteReference(_) => self
                .top()?
                .inlines
                .push(Inline::Other { children: Vec::new() }),
            other => trace!("ignoring markdown event {other:?}"),
        }
        Ok(())
    }

    fn attach(&mut self, built: Built) -> Result<()> {
        let parent = self.top()?;
        match built {
            Built::Block(block) => {
                parent.flush_inlines();
                parent.blocks.push(block);
            }
            Built::Inline(inline) => parent.inlines.push(inline),
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Document> {
        if self.stack.len() != 1 {
            return Err(Error::Parse(format!(
                "{} unclosed node(s) at end of input",
                self.stack.len() - 1
            )));
        }
        let mut root = self.stack.remove(0);
        root.flush_inlines();
        Ok(Document { blocks: root.blocks })
    }
}

fn frame_kind(tag: Tag<'_>) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Heading(level as u8),
        Tag::BlockQuote(_) => FrameKind::BlockQuote,
        Tag::CodeBlock(_) => FrameKind::CodeBlock,
        Tag::HtmlBlock => FrameKind::Html,
        Tag::List(start) => FrameKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => FrameKind::Item,
        Tag::Emphasis => FrameKind::Emphasis(1),
        Tag::Strong => FrameKind::Emphasis(2),
        Tag::Strikethrough => FrameKind::OtherInline,
        Tag::Link {
            link_type, dest_url, ..
        } => match link_type {
            LinkType::Autolink => FrameKind::AutoLink {
                url: dest_url.into_string(),
                email: false,
            },
            LinkType::Email => FrameKind::AutoLink {
                url: dest_url.into_string(),
                email: true,
            },
            _ => FrameKind::Link {
                dest: dest_url.into_string(),
            },
        },
        Tag::Image { dest_url, .. } => FrameKind::Image {
            dest: dest_url.into_string(),
        },
        _ => FrameKind::OtherBlock,
    }
}

fn close(mut frame: Frame) -> Built {
    match frame.kind {
        FrameKind::Document => Built::Block(Block::Other {
            children: frame.blocks,
        }),
        FrameKind::Heading(level) => Built::Block(Block::Heading {
            level,
            content: frame.inlines,
        }),
        FrameKind::Paragraph => Built::Block(Block::Paragraph {
            content: frame.inlines,
            tight: false,
        }),
        FrameKind::CodeBlock => Built::Block(Block::CodeBlock {
            literal: frame.literal,
        }),
        FrameKind::Html => Built::Block(Block::Html),
        FrameKind::List { ordered } => Built::Block(Block::List {
            ordered,
            items: frame.blocks,
        }),
        FrameKind::Item => {
            frame.flush_inlines();
            Built::Block(Block::Item {
                children: frame.blocks,
            })
        }
        FrameKind::BlockQuote => {
            frame.flush_inlines();
            Built::Block(Block::BlockQuote {
                children: frame.blocks,
            })
        }
        FrameKind::OtherBlock => {
            frame.flush_inlines();
            Built::Block(Block::Other {
                children: frame.blocks,
            })
        }
        FrameKind::Emphasis(level) => Built::Inline(Inline::Emphasis {
            level,
            children: frame.inlines,
        }),
        FrameKind::Link { dest } => Built::Inline(Inline::Link {
            dest,
            children: frame.inlines,
        }),
        FrameKind::AutoLink { url, email } => Built::Inline(Inline::AutoLink { url, email }),
        FrameKind::Image { dest } => Built::Inline(Inline::Image {
            dest,
            alt: frame.inlines,
        }),
        FrameKind::OtherInline => Built::Inline(Inline::Other {
            children: frame.inlines,
        }),
    }
}
