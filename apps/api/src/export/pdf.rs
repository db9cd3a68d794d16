//! PDF backend built directly on `lopdf`.
//!
//! The layout is turned into a story of flowables (paragraphs, bullet lists,
//! spacers), wrapped greedily against the Helvetica width tables and drawn
//! top-down onto US Letter pages. Text uses the standard Type1 fonts with
//! WinAnsi encoding, so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::export::font_metrics::PdfFont;
use crate::export::plan::{Block, ResumeLayout, Span};
use crate::export::ExportError;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const SECTION_SPACER: f32 = 10.8;
const BULLET_INDENT: f32 = 14.4;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug)]
struct ParagraphStyle {
    font_size: f32,
    leading: f32,
    space_before: f32,
    space_after: f32,
    align: Align,
}

static NAME_STYLE: ParagraphStyle = ParagraphStyle {
    font_size: 20.0,
    leading: 24.0,
    space_before: 0.0,
    space_after: 0.0,
    align: Align::Center,
};

static CONTACT_STYLE: ParagraphStyle = ParagraphStyle {
    font_size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 0.0,
    align: Align::Center,
};

static HEADING_STYLE: ParagraphStyle = ParagraphStyle {
    font_size: 14.0,
    leading: 16.0,
    space_before: 12.0,
    space_after: 8.0,
    align: Align::Left,
};

static BODY_STYLE: ParagraphStyle = ParagraphStyle {
    font_size: 10.0,
    leading: 12.0,
    space_before: 0.0,
    space_after: 6.0,
    align: Align::Left,
};

enum Flowable {
    Paragraph {
        spans: Vec<Span>,
        style: &'static ParagraphStyle,
    },
    BulletList(Vec<String>),
    Spacer(f32),
}

fn story(layout: &ResumeLayout) -> Vec<Flowable> {
    let mut story = vec![Flowable::Paragraph {
        spans: vec![Span::bold(layout.name.as_str())],
        style: &NAME_STYLE,
    }];
    if let Some(contact) = &layout.contact_line {
        story.push(Flowable::Paragraph {
            spans: vec![Span::plain(contact.as_str())],
            style: &CONTACT_STYLE,
        });
    }
    story.push(Flowable::Spacer(SECTION_SPACER));

    for section in &layout.sections {
        story.push(Flowable::Paragraph {
            spans: vec![Span::bold(section.title.to_uppercase())],
            style: &HEADING_STYLE,
        });
        for block in &section.blocks {
            story.push(match block {
                Block::Paragraph(spans) => Flowable::Paragraph {
                    spans: spans.clone(),
                    style: &BODY_STYLE,
                },
                Block::Bullets(items) => Flowable::BulletList(items.clone()),
            });
        }
        story.push(Flowable::Spacer(SECTION_SPACER));
    }
    story
}

/// One wrapped line: runs of text that share a font, plus the total width in points.
#[derive(Debug, Default, PartialEq)]
struct Line {
    segments: Vec<(PdfFont, String)>,
    width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, font: PdfFont, word: &str, spaced: bool, width: f32) {
        let text = if spaced { format!(" {word}") } else { word.to_string() };
        match self.segments.last_mut() {
            Some((last_font, last)) if *last_font == font => last.push_str(&text),
            _ => self.segments.push((font, text)),
        }
        self.width += width;
    }
}

/// Greedy word wrap over mixed-weight spans. A word wider than the line gets a
/// line of its own.
fn wrap_spans(spans: &[Span], font_size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();

    for span in spans {
        let font = PdfFont::for_weight(span.bold);
        let metrics = font.metrics();
        let mut glued = span.text.starts_with(char::is_whitespace);

        for word in span.text.split_whitespace() {
            let word_width = metrics.measure_pt(word, font_size);
            let spaced = glued && !current.is_empty();
            let space_width = if spaced { metrics.measure_pt(" ", font_size) } else { 0.0 };

            if !current.is_empty() && current.width + space_width + word_width > max_width {
                lines.push(std::mem::take(&mut current));
                current.push(font, word, false, word_width);
            } else {
                current.push(font, word, spaced, space_width + word_width);
            }
            glued = true;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maps text onto WinAnsiEncoding bytes; anything outside it becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Accumulates drawing operations page by page, tracking the cursor from the top.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= PAGE_HEIGHT - MARGIN
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Moves down by `amount`; vertical space is dropped at the top of a page.
    fn skip(&mut self, amount: f32) {
        if !self.at_page_top() {
            self.y = (self.y - amount).max(MARGIN);
        }
    }

    fn draw_line(&mut self, line: &Line, x: f32, font_size: f32, leading: f32) {
        if self.y - leading < MARGIN && !self.at_page_top() {
            self.break_page();
        }
        let baseline = self.y - font_size;
        let mut x = x;
        for (font, text) in &line.segments {
            self.draw_text(*font, font_size, x, baseline, text);
            x += font.metrics().measure_pt(text, font_size);
        }
        self.y -= leading;
    }

    fn draw_text(&mut self, font: PdfFont, font_size: f32, x: f32, y: f32, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), font_size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn paragraph(&mut self, spans: &[Span], style: &ParagraphStyle) {
        self.skip(style.space_before);
        for line in wrap_spans(spans, style.font_size, TEXT_WIDTH) {
            let x = match style.align {
                Align::Left => MARGIN,
                Align::Center => MARGIN + ((TEXT_WIDTH - line.width) / 2.0).max(0.0),
            };
            self.draw_line(&line, x, style.font_size, style.leading);
        }
        self.skip(style.space_after);
    }

    fn bullet_list(&mut self, items: &[String]) {
        let style = &BODY_STYLE;
        for item in items {
            let lines = wrap_spans(
                &[Span::plain(item.as_str())],
                style.font_size,
                TEXT_WIDTH - BULLET_INDENT,
            );
            for (i, line) in lines.iter().enumerate() {
                if i == 0 {
                    // Drawn first so a page break moves the bullet along with its text.
                    if self.y - style.leading < MARGIN && !self.at_page_top() {
                        self.break_page();
                    }
                    let baseline = self.y - style.font_size;
                    self.draw_text(PdfFont::Helvetica, style.font_size, MARGIN, baseline, "\u{2022}");
                }
                self.draw_line(line, MARGIN + BULLET_INDENT, style.font_size, style.leading);
            }
        }
        self.skip(style.space_after);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

fn lay_out(story: &[Flowable]) -> Vec<Vec<Operation>> {
    let mut writer = PageWriter::new();
    for flowable in story {
        match flowable {
            Flowable::Paragraph { spans, style } => writer.paragraph(spans, style),
            Flowable::BulletList(items) => writer.bullet_list(items),
            Flowable::Spacer(height) => writer.skip(*height),
        }
    }
    writer.finish()
}

fn font_dictionary(doc: &mut Document, font: PdfFont) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Renders the layout to PDF bytes.
pub fn render(layout: &ResumeLayout) -> Result<Vec<u8>, ExportError> {
    let pages = lay_out(&story(layout));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font_dictionary(&mut doc, PdfFont::Helvetica);
    let bold = font_dictionary(&mut doc, PdfFont::HelveticaBold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            PdfFont::Helvetica.resource_name() => regular,
            PdfFont::HelveticaBold.resource_name() => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buf)
}
