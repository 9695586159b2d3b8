//! Frames produced by the engine and their preprocessing.
//!
//! The preprocessing resembles the one of Atari wrappers: the frame is resized
//! to a small grid, converted to grayscale and scaled into `[0, 1]`.
use crate::error::VizdqnError;
use anyhow::Result;
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    GrayImage, ImageBuffer, Luma, RgbImage,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A raw frame in engine-native resolution.
#[derive(Debug, Clone)]
pub enum Frame {
    /// 8-bit grayscale screen buffer.
    Gray(GrayImage),

    /// 8-bit RGB screen buffer.
    Rgb(RgbImage),
}

impl Frame {
    /// Returns `(width, height)` of the frame.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Gray(img) => img.dimensions(),
            Self::Rgb(img) => img.dimensions(),
        }
    }
}

/// A preprocessed frame, `(height, width)` intensities in `[0, 1]`.
pub type ProcessedFrame = Array2<f32>;

/// Configuration of [`FramePreprocessor`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PreprocessConfig {
    /// Width of frames given by the engine.
    pub in_width: u32,

    /// Height of frames given by the engine.
    pub in_height: u32,

    /// Width after resizing.
    pub out_width: u32,

    /// Height after resizing.
    pub out_height: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            in_width: 320,
            in_height: 240,
            out_width: 80,
            out_height: 60,
        }
    }
}

/// Converts raw frames into [`ProcessedFrame`]s.
#[derive(Debug, Clone)]
pub struct FramePreprocessor {
    config: PreprocessConfig,
}

impl FramePreprocessor {
    /// Constructs a preprocessor.
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// `(height, width)` of processed frames.
    pub fn output_shape(&self) -> (usize, usize) {
        (self.config.out_height as _, self.config.out_width as _)
    }

    /// Resizes, grayscales and normalizes a frame.
    ///
    /// Fails with [`VizdqnError::FrameShape`] if the frame is not in the configured
    /// input resolution.
    pub fn preprocess(&self, frame: &Frame) -> Result<ProcessedFrame> {
        let expected = (self.config.in_width, self.config.in_height);
        let actual = frame.dimensions();
        if actual != expected {
            return Err(VizdqnError::FrameShape { expected, actual }.into());
        }

        let (w, h) = (self.config.out_width, self.config.out_height);
        let img: ImageBuffer<Luma<u8>, _> = match frame {
            Frame::Gray(img) => resize(img, w, h, Triangle),
            Frame::Rgb(img) => grayscale(&resize(img, w, h, Triangle)),
        };
        let buf = img
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect::<Vec<_>>();

        Ok(Array2::from_shape_vec((h as usize, w as usize), buf)?)
    }
}
