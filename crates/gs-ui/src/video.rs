//! Live video surface
//!
//! Holds the last frame presented by the session. The app uploads it into a
//! texture whenever it changes.

use gs_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use gs_integration::GameHandle;

const FRAME_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

/// Surface the emulated screen is drawn into
#[derive(Debug)]
pub struct VideoSurface {
    /// Game being drawn, if any
    drawing: Option<GameHandle>,
    /// Last presented frame, 0x00RRGGBB
    pixels: Vec<u32>,
    /// Set when `pixels` changed since the last upload
    dirty: bool,
    frames_presented: u64,
}

impl VideoSurface {
    pub fn new() -> Self {
        Self {
            drawing: None,
            pixels: vec![0; FRAME_PIXELS],
            dirty: true,
            frames_presented: 0,
        }
    }

    pub fn start_drawing(&mut self, handle: GameHandle) {
        tracing::debug!("Drawing {}", handle);
        self.drawing = Some(handle);
        self.frames_presented = 0;
    }

    /// Stop accepting frames and blank the screen
    pub fn stop_drawing(&mut self) {
        if let Some(handle) = self.drawing.take() {
            tracing::debug!("Stopped drawing {} after {} frames", handle, self.frames_presented);
        }
        self.pixels.fill(0);
        self.dirty = true;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn handle(&self) -> Option<&GameHandle> {
        self.drawing.as_ref()
    }

    /// Present a finished frame
    pub fn present(&mut self, frame: &[u32]) {
        if self.drawing.is_none() || frame.len() != FRAME_PIXELS {
            return;
        }
        self.pixels.copy_from_slice(frame);
        self.dirty = true;
        self.frames_presented += 1;
    }

    /// Redraw immediately, even while emulation is halted
    pub fn force_draw(&mut self, frame: &[u32]) {
        self.present(frame);
        self.dirty = true;
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Whether the frame changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Convert the current frame for upload
    pub fn to_color_image(&self) -> egui::ColorImage {
        let pixels = self
            .pixels
            .iter()
            .map(|&p| egui::Color32::from_rgb((p >> 16) as u8, (p >> 8) as u8, p as u8))
            .collect();
        egui::ColorImage {
            size: [SCREEN_WIDTH as usize, SCREEN_HEIGHT as usize],
            pixels,
        }
    }
}

impl Default for VideoSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> GameHandle {
        GameHandle::new(1, "TEST", "test.gba")
    }

    #[test]
    fn test_frames_ignored_until_drawing() {
        let mut surface = VideoSurface::new();
        surface.take_dirty();
        surface.present(&vec![0x00FF_0000; FRAME_PIXELS]);
        assert!(!surface.take_dirty());
        assert_eq!(surface.pixels()[0], 0);

        surface.start_drawing(handle());
        surface.present(&vec![0x00FF_0000; FRAME_PIXELS]);
        assert!(surface.take_dirty());
        assert_eq!(surface.pixels()[0], 0x00FF_0000);
        assert_eq!(surface.frames_presented(), 1);
    }

    #[test]
    fn test_stop_drawing_blanks() {
        let mut surface = VideoSurface::new();
        surface.start_drawing(handle());
        surface.present(&vec![0x0012_3456; FRAME_PIXELS]);
        surface.stop_drawing();
        assert!(!surface.is_drawing());
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_color_conversion() {
        let mut surface = VideoSurface::new();
        surface.start_drawing(handle());
        surface.force_draw(&vec![0x0011_2233; FRAME_PIXELS]);
        let image = surface.to_color_image();
        assert_eq!(image.size, [240, 160]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(0x11, 0x22, 0x33));
    }
}
