//! Image file panel backend
//!
//! Stands in for the SPI e-ink driver on hosts without one. Every refresh
//! replaces a binary PBM image holding exactly what the panel would
//! receive: the native 122x250 portrait frame.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error};

use homagotchi_display::{Panel, PanelBuffer, PanelError, HEIGHT, PANEL_BUFFER_LEN, WIDTH};

/// Bytes per portrait row
const ROW_BYTES: usize = PANEL_BUFFER_LEN / WIDTH;

/// Panel that writes each frame to a PBM file
pub struct PbmPanel {
    path: PathBuf,
    awake: bool,
}

impl PbmPanel {
    /// Write frames to `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            awake: false,
        }
    }

    /// Image file written on each refresh
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_awake(&self) -> Result<(), PanelError> {
        if self.awake {
            Ok(())
        } else {
            Err(PanelError::NotInitialized)
        }
    }

    fn write_image(&self, buffer: &PanelBuffer) -> Result<(), PanelError> {
        // PBM sets a bit for black; the panel sets one for white
        let mut image = Vec::with_capacity(16 + PANEL_BUFFER_LEN);
        let _ = write!(image, "P4\n{} {}\n", HEIGHT, WIDTH);
        debug_assert_eq!(ROW_BYTES, HEIGHT.div_ceil(8));
        image.extend(buffer.iter().map(|b| !b));

        let staging = self.path.with_extension("pbm.tmp");
        fs::write(&staging, &image)
            .and_then(|()| fs::rename(&staging, &self.path))
            .map_err(|e| {
                error!("Writing {} failed: {}", self.path.display(), e);
                PanelError::Io
            })
    }
}

impl Panel for PbmPanel {
    async fn init(&mut self) -> Result<(), PanelError> {
        self.awake = true;
        debug!("Panel initialized");
        Ok(())
    }

    async fn clear(&mut self, fill: u8) -> Result<(), PanelError> {
        self.ensure_awake()?;
        self.write_image(&[fill; PANEL_BUFFER_LEN])
    }

    async fn sleep(&mut self) -> Result<(), PanelError> {
        self.ensure_awake()?;
        self.awake = false;
        debug!("Panel asleep");
        Ok(())
    }

    async fn display_full(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError> {
        self.ensure_awake()?;
        self.write_image(buffer)
    }

    async fn display_partial(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError> {
        self.ensure_awake()?;
        self.write_image(buffer)
    }

    fn release(&mut self) {
        self.awake = false;
        debug!("Panel released");
    }
}
