pub mod editor_view;
pub mod layout;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
    Frame,
};
use spotdiff::{celebration::Celebration, game::Phase, region::PercentRect};

use crate::{App, MessageKind};
use layout::{canvas_in, game_layout, rendered_box, to_cells};

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app).render(app, f);
}

fn message_style(kind: MessageKind) -> Style {
    let bg = match kind {
        MessageKind::Success => Color::Green,
        MessageKind::Error => Color::Red,
        MessageKind::Info => Color::Blue,
        MessageKind::Warning => Color::Yellow,
    };
    Style::default()
        .fg(Color::White)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn render_message(app: &App, area: Rect, f: &mut Frame) {
    if let Some(message) = &app.message {
        let widget = Paragraph::new(Span::styled(
            format!(" {} ", message.text),
            message_style(message.kind),
        ))
        .alignment(Alignment::Center);
        f.render_widget(widget, area);
    }
}

pub(crate) fn render_start(app: &App, f: &mut Frame) {
    let area = f.area();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to SpotDiff!",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Find all the differences between two seemingly identical images.",
            italic_style,
        )),
        Line::from(""),
    ];

    if app.game.phase() == Phase::Loading {
        let name = app.loader.as_ref().map_or("game", |l| l.reference());
        lines.push(Line::from(Span::styled(
            format!("Loading {name}..."),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
    }

    for (i, name) in app.samples.iter().enumerate().take(9) {
        lines.push(Line::from(vec![
            Span::styled(format!("({}) ", i + 1), bold_style),
            Span::raw(format!("play sample: {name}")),
        ]));
    }
    if let Some(custom) = &app.custom {
        lines.push(Line::from(vec![
            Span::styled("(c) ", bold_style),
            Span::raw(format!("start custom game: {}", custom.title)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("(e) ", bold_style),
        Span::raw(if app.custom.is_some() {
            "configure game"
        } else {
            "create/configure game"
        }),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("(esc)ape to quit", italic_style)));

    let body_height = lines.len() as u16;
    let top = area.height.saturating_sub(body_height) / 2;
    let body = Rect {
        y: area.y + top,
        height: body_height.min(area.height),
        ..area
    };
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        body,
    );

    render_message(app, Rect { height: 1, ..area }, f);
}

pub(crate) fn render_game(app: &App, f: &mut Frame) {
    let area = f.area();
    let layout = game_layout(area);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let Some(config) = app.game.config() else {
        return;
    };

    render_message(app, layout.message, f);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            config.title.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Find all {} differences", config.regions.len())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, layout.title);

    let images = [&config.images.image_a, &config.images.image_b];
    for (idx, panel) in layout.panels.iter().enumerate() {
        let found = config
            .regions
            .iter()
            .enumerate()
            .filter(|(i, _)| app.game.is_found(*i))
            .map(|(_, r)| (r.percent_rect(), found_style()));
        render_image_panel(f, *panel, idx, images[idx], found);
    }

    let mut status = vec![Line::from(vec![
        Span::raw("Differences Found: "),
        Span::styled(
            app.game.found_count().to_string(),
            bold_style.fg(Color::Magenta),
        ),
        Span::raw(format!(" / {}", app.game.total())),
        Span::raw("   Time: "),
        Span::styled(
            format!("{}", app.game.elapsed_seconds()),
            bold_style.fg(Color::Cyan),
        ),
        Span::raw(" seconds"),
    ])];
    if let Some(best) = app.best_time {
        status.push(Line::from(Span::styled(
            format!("best: {best} seconds"),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        layout.status,
    );

    let legend = Paragraph::new(Span::styled(
        "click a difference on either image / (n)ew game / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(legend, layout.legend);

    if app.celebration.is_active {
        render_celebration(&app.celebration, area, f.buffer_mut());
    }
}

pub(crate) fn found_style() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

/// A bordered stand-in for one image with the given regions outlined on top
pub(crate) fn render_image_panel<I>(f: &mut Frame, panel: Rect, idx: usize, image: &str, regions: I)
where
    I: IntoIterator<Item = (PercentRect, Style)>,
{
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(format!(" Image {} ", idx + 1));
    f.render_widget(block, panel);

    let canvas = canvas_in(panel);
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }
    f.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(30, 30, 40))),
        canvas,
    );
    let caption = Paragraph::new(Span::styled(
        image,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(
        caption,
        Rect {
            y: canvas.y + canvas.height / 2,
            height: 1.max(canvas.height - canvas.height / 2),
            ..canvas
        },
    );

    let rendered = rendered_box(canvas);
    for (pct, style) in regions {
        let cells = to_cells(&pct.project(&rendered), canvas);
        if cells.width == 0 || cells.height == 0 {
            continue;
        }
        f.render_widget(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(style),
            cells,
        );
    }
}

/// Render confetti on top of the current screen
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for piece in &celebration.pieces {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let (x, y) = (piece.x as u16, piece.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let color = colors[piece.color_index % colors.len()];
        let fading = piece.age / piece.max_age > 0.6;
        let style = if fading {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        };
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&piece.symbol.to_string()).set_style(style);
        }
    }
}
