use minifb::{Key, Window, WindowOptions};

use super::DisplaySink;
use crate::compositor::CompositeGrid;
use crate::error::DisplayError;
use crate::models::Frame;

/// Desktop window showing each grid; the quit key or closing the window
/// raises the cancellation signal.
pub struct WindowSink {
    title: String,
    quit_key: Key,
    window: Option<Window>,
    argb: Vec<u32>,
}

impl std::fmt::Debug for WindowSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSink")
            .field("title", &self.title)
            .field("quit_key", &self.quit_key)
            .field("open", &self.window.is_some())
            .finish()
    }
}

impl WindowSink {
    /// Sink for a window titled `title`. The window opens on the first grid,
    /// sized to it.
    pub fn new(title: impl Into<String>, quit_key: Key) -> Self {
        Self {
            title: title.into(),
            quit_key,
            window: None,
            argb: Vec::new(),
        }
    }

    fn ensure_window(&mut self, width: usize, height: usize) -> Result<&mut Window, DisplayError> {
        let reopen = match &self.window {
            Some(window) => window.get_size() != (width, height),
            None => true,
        };
        if reopen {
            let window = Window::new(&self.title, width, height, WindowOptions::default())
                .map_err(|e| DisplayError::Window(e.to_string()))?;
            self.window = Some(window);
        }
        self.window
            .as_mut()
            .ok_or_else(|| DisplayError::Window("window not initialized".to_string()))
    }
}

/// Pack a frame into 0RGB u32 words for minifb
fn frame_to_argb(frame: &Frame, out: &mut Vec<u32>) {
    out.clear();
    match frame {
        Frame::Rgb(img) => out.extend(
            img.pixels()
                .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32),
        ),
        Frame::Luma(img) => out.extend(img.pixels().map(|p| {
            let v = p[0] as u32;
            (v << 16) | (v << 8) | v
        })),
    }
}

impl DisplaySink for WindowSink {
    fn show(&mut self, grid: &CompositeGrid) -> Result<(), DisplayError> {
        let (width, height) = (grid.width() as usize, grid.height() as usize);
        let mut argb = std::mem::take(&mut self.argb);
        frame_to_argb(grid.frame(), &mut argb);
        let result = self
            .ensure_window(width, height)?
            .update_with_buffer(&argb, width, height)
            .map_err(|e| DisplayError::Window(e.to_string()));
        self.argb = argb;
        result
    }

    fn cancel_requested(&mut self) -> bool {
        match &self.window {
            Some(window) => !window.is_open() || window.is_key_down(self.quit_key),
            None => false,
        }
    }
}
