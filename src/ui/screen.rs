use ratatui::Frame;
use spotdiff::game::Phase;

use crate::{
    ui::{editor_view::render_editor, render_game, render_start},
    App,
};

/// A UI Screen boundary: responsible for rendering one mode of the app
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Sample picker and entry to the editor; also shown while a sample loads
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_start(app, f);
    }
}

/// Both images, progress and timer
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_game(app, f);
    }
}

pub struct EditorScreen;

impl Screen for EditorScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_editor(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    if app.editor.is_some() {
        return Box::new(EditorScreen);
    }
    match app.game.phase() {
        Phase::Idle | Phase::Loading => Box::new(StartScreen),
        Phase::Playing | Phase::Complete => Box::new(GameScreen),
    }
}
