use crate::theme::Theme;
use eframe::egui::{self, RichText};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    CodeBlock { language: Option<String>, code: String },
    ListItem { depth: usize, text: String },
    Rule,
}

/// Markdown source for a multi-agent answer: the value pretty-printed as JSON
/// with two-space indentation, or nothing when there is no answer.
pub fn response_markdown(response: Option<&Value>) -> String {
    match response {
        None => String::new(),
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    }
}

pub fn parse_blocks(markdown: &str) -> Vec<MarkdownBlock> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut heading: Option<u8> = None;
    let mut code_language: Option<Option<String>> = None;
    let mut list_depth = 0usize;

    let flush_item = |text: &mut String, blocks: &mut Vec<MarkdownBlock>, depth: usize| {
        let item = text.trim();
        if depth > 0 && !item.is_empty() {
            blocks.push(MarkdownBlock::ListItem {
                depth,
                text: item.to_string(),
            });
        }
        text.clear();
    };

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(level as u8);
            }
            Event::End(TagEnd::Heading(_)) => {
                blocks.push(MarkdownBlock::Heading {
                    level: heading.take().unwrap_or(1),
                    text: std::mem::take(&mut text),
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                flush_item(&mut text, &mut blocks, list_depth);
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                code_language = Some(language);
            }
            Event::End(TagEnd::CodeBlock) => {
                blocks.push(MarkdownBlock::CodeBlock {
                    language: code_language.take().flatten(),
                    code: std::mem::take(&mut text),
                });
            }
            Event::Start(Tag::List(_)) => {
                flush_item(&mut text, &mut blocks, list_depth);
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                flush_item(&mut text, &mut blocks, list_depth);
                list_depth = list_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Item) => {
                flush_item(&mut text, &mut blocks, list_depth);
            }
            Event::End(TagEnd::Paragraph) if list_depth == 0 => {
                if !text.is_empty() {
                    blocks.push(MarkdownBlock::Paragraph(std::mem::take(&mut text)));
                }
            }
            Event::End(TagEnd::Paragraph) => text.push('\n'),
            Event::Text(chunk) => text.push_str(&chunk),
            Event::Code(code) => {
                text.push('`');
                text.push_str(&code);
                text.push('`');
            }
            Event::SoftBreak => {
                if code_language.is_some() {
                    text.push('\n');
                } else {
                    text.push(' ');
                }
            }
            Event::HardBreak => text.push('\n'),
            Event::Rule => blocks.push(MarkdownBlock::Rule),
            _ => {}
        }
    }

    if !text.trim().is_empty() {
        blocks.push(MarkdownBlock::Paragraph(text));
    }
    blocks
}

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 20.0,
        2 => 18.0,
        3 => 16.0,
        _ => 15.0,
    }
}

pub fn render_blocks(ui: &mut egui::Ui, theme: &Theme, blocks: &[MarkdownBlock]) {
    for block in blocks {
        match block {
            MarkdownBlock::Heading { level, text } => {
                ui.label(
                    RichText::new(text)
                        .strong()
                        .size(heading_size(*level))
                        .color(theme.text_primary),
                );
            }
            MarkdownBlock::Paragraph(text) => {
                ui.label(RichText::new(text).color(theme.text_primary));
            }
            MarkdownBlock::CodeBlock { language, code } => {
                theme.code_frame().show(ui, |ui| {
                    if let Some(language) = language {
                        ui.label(RichText::new(language).color(theme.text_muted).size(12.0));
                    }
                    ui.label(
                        RichText::new(code.trim_end())
                            .monospace()
                            .color(theme.text_primary),
                    );
                });
            }
            MarkdownBlock::ListItem { depth, text } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(theme.spacing_12 * depth.saturating_sub(1) as f32);
                    ui.label(RichText::new("•").color(theme.text_muted));
                    ui.label(RichText::new(text).color(theme.text_primary));
                });
            }
            MarkdownBlock::Rule => {
                ui.separator();
            }
        }
    }
}
