use ratatui::layout::{Constraint, Direction, Layout, Rect};
use spotdiff::region::{Point, RenderedBox};

const HORIZONTAL_MARGIN: u16 = 2;

/// Images are 3:2; terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f64 = 3.0;

pub struct GameLayout {
    pub message: Rect,
    pub title: Rect,
    pub panels: [Rect; 2],
    pub status: Rect,
    pub legend: Rect,
}

pub fn game_layout(area: Rect) -> GameLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // message
            Constraint::Length(2), // title
            Constraint::Min(5),    // images
            Constraint::Length(2), // found / time
            Constraint::Length(1), // legend
        ])
        .split(area);

    GameLayout {
        message: chunks[0],
        title: chunks[1],
        panels: side_by_side(chunks[2]),
        status: chunks[3],
        legend: chunks[4],
    }
}

pub struct EditorLayout {
    pub header: Rect,
    pub fields: [Rect; 3],
    pub help: Rect,
    pub panels: [Rect; 2],
    pub regions: Rect,
    pub legend: Rect,
}

pub fn editor_layout(area: Rect, region_count: usize) -> EditorLayout {
    let list_height = (region_count as u16).clamp(1, 6) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // title
            Constraint::Length(3), // image urls
            Constraint::Length(1), // help
            Constraint::Min(5),    // images
            Constraint::Length(list_height),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let urls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    EditorLayout {
        header: chunks[0],
        fields: [chunks[1], urls[0], urls[1]],
        help: chunks[3],
        panels: side_by_side(chunks[4]),
        regions: chunks[5],
        legend: chunks[6],
    }
}

fn side_by_side(area: Rect) -> [Rect; 2] {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    [halves[0], halves[1]]
}

/// The drawable canvas inside a bordered panel, shrunk to the image aspect ratio and centred
pub fn canvas_in(panel: Rect) -> Rect {
    let inner = Rect {
        x: panel.x.saturating_add(1),
        y: panel.y.saturating_add(1),
        width: panel.width.saturating_sub(2),
        height: panel.height.saturating_sub(2),
    };
    if inner.width == 0 || inner.height == 0 {
        return inner;
    }

    let mut width = inner.width;
    let mut height = ((width as f64) / CELL_ASPECT).round() as u16;
    if height > inner.height {
        height = inner.height;
        width = ((height as f64) * CELL_ASPECT).round() as u16;
    }
    let width = width.clamp(1, inner.width);
    let height = height.clamp(1, inner.height);

    Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    }
}

pub fn rendered_box(canvas: Rect) -> RenderedBox {
    RenderedBox::new(
        canvas.x as f64,
        canvas.y as f64,
        canvas.width as f64,
        canvas.height as f64,
    )
}

/// Pointer position of a terminal cell: its centre
pub fn pointer(column: u16, row: u16) -> Point {
    Point::new(column as f64 + 0.5, row as f64 + 0.5)
}

/// Which canvas (if any) contains the cell
pub fn canvas_at(canvases: &[Rect; 2], column: u16, row: u16) -> Option<usize> {
    canvases.iter().position(|c| {
        column >= c.x && column < c.x + c.width && row >= c.y && row < c.y + c.height
    })
}

/// Map a rendered-space rectangle onto whole cells, clipped to `bounds`
pub fn to_cells(rect: &RenderedBox, bounds: Rect) -> Rect {
    let x = rect.left.floor().max(0.0) as u16;
    let y = rect.top.floor().max(0.0) as u16;
    let right = (rect.left + rect.width).ceil().max(0.0) as u16;
    let bottom = (rect.top + rect.height).ceil().max(0.0) as u16;
    Rect {
        x,
        y,
        width: right.saturating_sub(x).max(1),
        height: bottom.saturating_sub(y).max(1),
    }
    .intersection(bounds)
}
