//! Component trait: the interface every UI panel implements.
//!
//! - Components own their view state (cursor, scroll) and render themselves.
//! - Components receive `AppState` read-only for the collection they show.
//! - Components produce `Vec<Action>`; the App event loop applies them.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called while this component is on screen.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Receive an action dispatched by the App, whether or not on screen.
    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
