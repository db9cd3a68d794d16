//! DOCX backend built with the `docx-rs` builder.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, PageMargin, Paragraph, Run, SpecialIndentType, Start, Style,
    StyleType,
};

use crate::export::plan::{Block, ResumeLayout, Span};
use crate::export::ExportError;

// Sizes are in twips (1/1440 inch) and half-points, as Word stores them.
const LETTER_WIDTH: u32 = 12_240;
const LETTER_HEIGHT: u32 = 15_840;
const MARGIN: i32 = 1_080;
const NAME_SIZE: usize = 40;
const HEADING_SIZE: usize = 28;
const BODY_SIZE: usize = 20;

const HEADING_STYLE: &str = "Heading2";
const BULLET_STYLE: &str = "ListBullet";
const BULLET_NUMBERING: usize = 1;

fn body_run(span: &Span) -> Run {
    let run = Run::new().add_text(span.text.as_str()).size(BODY_SIZE);
    if span.bold {
        run.bold()
    } else {
        run
    }
}

fn bullet_paragraph(text: &str) -> Paragraph {
    Paragraph::new()
        .style(BULLET_STYLE)
        .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0))
        .add_run(Run::new().add_text(text).size(BODY_SIZE))
}

fn base_document() -> Docx {
    Docx::new()
        .page_size(LETTER_WIDTH, LETTER_HEIGHT)
        .page_margin(
            PageMargin::new()
                .top(MARGIN)
                .bottom(MARGIN)
                .left(MARGIN)
                .right(MARGIN),
        )
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 2")
                .size(HEADING_SIZE)
                .bold(),
        )
        .add_style(
            Style::new(BULLET_STYLE, StyleType::Paragraph)
                .name("List Bullet")
                .size(BODY_SIZE),
        )
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("\u{2022}"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

/// Renders the layout to DOCX bytes. The document is packed in one step, so a
/// failure never yields a partial file.
pub fn render(layout: &ResumeLayout) -> Result<Vec<u8>, ExportError> {
    let mut docx = base_document().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(layout.name.as_str()).size(NAME_SIZE).bold()),
    );

    if let Some(contact) = &layout.contact_line {
        docx = docx.add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(contact.as_str()).size(BODY_SIZE)),
        );
    }
    docx = docx.add_paragraph(Paragraph::new());

    for section in &layout.sections {
        docx = docx.add_paragraph(
            Paragraph::new()
                .style(HEADING_STYLE)
                .add_run(Run::new().add_text(section.title).size(HEADING_SIZE).bold()),
        );
        for block in &section.blocks {
            match block {
                Block::Paragraph(spans) => {
                    let paragraph = spans
                        .iter()
                        .fold(Paragraph::new(), |p, span| p.add_run(body_run(span)));
                    docx = docx.add_paragraph(paragraph);
                }
                Block::Bullets(items) => {
                    for item in items {
                        docx = docx.add_paragraph(bullet_paragraph(item));
                    }
                }
            }
        }
        docx = docx.add_paragraph(Paragraph::new());
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buf.into_inner())
}
