//! Pointer input device fed by the touch controller.

use drivers::gt911::{TouchPoint, TouchState};
use slint::platform::{PointerEventButton, WindowEvent};
use slint::{LogicalPosition, PhysicalPosition};

/// Turns polled touch samples into Slint pointer events.
#[derive(Debug)]
pub struct PointerInput {
    scale_factor: f32,
    last: Option<LogicalPosition>,
}

impl PointerInput {
    pub fn new(scale_factor: f32) -> Self {
        Self {
            scale_factor,
            last: None,
        }
    }

    /// Events to dispatch for one sample, at most two.
    pub fn update(&mut self, state: TouchState) -> impl Iterator<Item = WindowEvent> {
        let button = PointerEventButton::Left;
        let events = match state {
            TouchState::NotReady => [None, None],
            TouchState::Pressed(point) => {
                let position = self.position(point);
                match self.last.replace(position) {
                    None => [Some(WindowEvent::PointerPressed { position, button }), None],
                    Some(last) if last != position => {
                        [Some(WindowEvent::PointerMoved { position }), None]
                    }
                    Some(_) => [None, None],
                }
            }
            TouchState::Released => match self.last.take() {
                // release where the finger was last seen, then leave so hover
                // effects don't stick to the spot
                Some(position) => [
                    Some(WindowEvent::PointerReleased { position, button }),
                    Some(WindowEvent::PointerExited),
                ],
                None => [None, None],
            },
        };
        events.into_iter().flatten()
    }

    fn position(&self, point: TouchPoint) -> LogicalPosition {
        PhysicalPosition::new(i32::from(point.x), i32::from(point.y)).to_logical(self.scale_factor)
    }
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new(1.0)
    }
}
