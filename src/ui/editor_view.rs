use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, ListState, Paragraph},
    Frame,
};
use spotdiff::game_config::Field;
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use super::{found_style, layout::editor_layout, render_image_panel, render_message};
use crate::App;

const FIELDS: [(Field, &str, &str); 3] = [
    (Field::Title, "Game Title", "Enter game title..."),
    (Field::ImageA, "Image 1 URL", "https://example.com/image1.jpg"),
    (Field::ImageB, "Image 2 URL", "https://example.com/image2.jpg"),
];

pub fn render_editor(app: &App, f: &mut Frame) {
    let Some(state) = app.editor.as_ref() else {
        return;
    };
    let editor = &state.editor;
    let layout = editor_layout(f.area(), editor.regions().len());
    let error_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Game Configuration",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        layout.header,
    );
    render_message(app, layout.header, f);

    for ((field, label, placeholder), area) in FIELDS.iter().zip(layout.fields) {
        let focused = state.focus == *field;
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" {label} "));
        if let Some(err) = editor.errors().get(*field) {
            block = block
                .border_style(error_style)
                .title_bottom(Span::styled(format!(" {err} "), error_style));
        } else if focused {
            block = block.border_style(Style::default().fg(Color::Magenta));
        }

        let value = editor.field(*field);
        let text = if value.is_empty() {
            Span::styled(*placeholder, Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::raw(value)
        };
        f.render_widget(Paragraph::new(text).block(block), area);

        if focused && area.width > 2 {
            let x = area.x + 1 + (value.width() as u16).min(area.width - 3);
            f.set_cursor_position((x, area.y + 1));
        }
    }

    let help = if !editor.has_images() {
        Span::styled("Fill in both image URLs to draw difference areas.", italic_style)
    } else if editor.is_editing() {
        Span::styled(
            "Click and drag on images to create difference areas. (ctrl+e) stop editing",
            Style::default().fg(Color::Blue),
        )
    } else {
        Span::styled("(ctrl+e) edit differences", italic_style)
    };
    f.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        layout.help,
    );

    if editor.has_images() {
        let draft_style = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
        let images = [editor.field(Field::ImageA), editor.field(Field::ImageB)];
        for (idx, panel) in layout.panels.iter().enumerate() {
            let committed = editor
                .regions()
                .iter()
                .map(|r| (r.region.percent_rect(), found_style()));
            let draft = editor.draft().map(|d| (d.percent_rect(), draft_style));
            render_image_panel(f, *panel, idx, images[idx], committed.chain(draft));
        }
    }

    render_region_list(app, layout.regions, f);

    let legend = if Browser::is_available() {
        "(tab) next field / (del) delete area / (ctrl+o) open images / (ctrl+s) save / (esc) cancel"
    } else {
        "(tab) next field / (del) delete area / (ctrl+s) save / (esc) cancel"
    };
    f.render_widget(
        Paragraph::new(Span::styled(legend, italic_style)),
        layout.legend,
    );
}

fn render_region_list(app: &App, area: Rect, f: &mut Frame) {
    let Some(state) = app.editor.as_ref() else {
        return;
    };
    let editor = &state.editor;
    let focused = state.focus == Field::Regions;

    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(format!(" Difference Areas ({}) ", editor.regions().len()));
    if let Some(err) = editor.errors().get(Field::Regions) {
        let error_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        block = block
            .border_style(error_style)
            .title_bottom(Span::styled(format!(" {err} "), error_style));
    } else if focused {
        block = block.border_style(Style::default().fg(Color::Magenta));
    }

    let items: Vec<ListItem> = editor
        .regions()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let region = r.region;
            ListItem::new(Line::from(format!(
                "Area {}: ({}, {}) - {}×{}",
                i + 1,
                region.x,
                region.y,
                region.width,
                region.height
            )))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default();
    if focused && !editor.regions().is_empty() {
        list_state.select(Some(state.selected.min(editor.regions().len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
