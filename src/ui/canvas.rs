use iced::keyboard::{self, Modifiers};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::{Point, Rectangle, Renderer, Theme};

use crate::{Message, ViewerMessage};

/// Degrees applied by a modifier-click
const CLICK_ROTATION: f32 = 90.0;

/// Input layer stacked over the viewer frame.
///
/// Draws nothing; it turns pointer events into viewer messages:
/// - wheel: zoom in/out by `zoom_step`
/// - Ctrl/Cmd + left click: rotate 90°
/// - left drag: pan by the delta between consecutive pointer positions
pub struct ViewportInput {
    pub zoom_step: f32,
}

impl Program<Message> for ViewportInput {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        _renderer: &Renderer,
        _theme: &Theme,
        _bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        // The composed frame underneath is an image widget
        vec![]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = modifiers;
            }

            // Mouse wheel for zooming
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if !cursor.is_over(bounds) {
                    return (canvas::event::Status::Ignored, None);
                }
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                let step = f64::from(self.zoom_step);
                let factor = if y > 0.0 {
                    step
                } else if y < 0.0 {
                    1.0 / step
                } else {
                    return (canvas::event::Status::Ignored, None);
                };
                return (
                    canvas::event::Status::Captured,
                    Some(Message::Viewer(ViewerMessage::Zoom(factor))),
                );
            }

            // Modifier click rotates, plain press starts a drag
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    if state.modifiers.command() {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::Viewer(ViewerMessage::Rotate(CLICK_ROTATION))),
                        );
                    }
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    state.last_position = None;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Pan while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_dragging {
                    if let Some(last_pos) = state.last_position {
                        state.last_position = Some(position);
                        let message = ViewerMessage::Pan(position.x - last_pos.x, position.y - last_pos.y);
                        return (canvas::event::Status::Captured, Some(Message::Viewer(message)));
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
    pub modifiers: Modifiers,
}
