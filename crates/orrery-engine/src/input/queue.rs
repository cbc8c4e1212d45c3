use crate::api::types::TextureId;

/// Input event types the engine understands.
/// Generic: no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A drag/click began at canvas coordinates (x, y) in CSS pixels.
    PointerDown { x: f32, y: f32 },
    /// A drag/click ended at canvas coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// The cursor moved to canvas coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// Mouse wheel or pinch. Positive `delta` zooms out.
    Wheel { delta: f32 },
    /// A tweak-panel control was written.
    Control { index: usize, value: f32 },
    /// A texture fetch completed.
    TextureLoaded { texture: TextureId },
    /// A texture fetch failed (404, decode error, ...).
    TextureFailed { texture: TextureId },
    /// A custom event from the UI layer.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Wheel { delta: 1.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn texture_events_carry_ids() {
        let mut q = InputQueue::new();
        q.push(InputEvent::TextureFailed { texture: TextureId(3) });
        match q.drain()[0] {
            InputEvent::TextureFailed { texture } => assert_eq!(texture, TextureId(3)),
            other => panic!("Expected TextureFailed, got {:?}", other),
        }
    }
}
