//! Error types for emberfield.
//!
//! This module provides error types for parsing configuration strings,
//! loading scene presets, and exporting rendered frames. Stepping and
//! drawing never fail: visual layers degrade (skip a draw, fall back
//! to a default) instead of surfacing errors mid-frame.

use std::fmt;

/// Errors that can occur when parsing configuration strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The string does not name a known field mode.
    UnknownMode(String),
    /// The string does not name a known geometry pattern.
    UnknownPattern(String),
    /// The string does not name a known complexity tier.
    UnknownComplexity(String),
    /// The string does not name a known scene variant.
    UnknownVariant(String),
    /// The string does not name a known intensity level.
    UnknownIntensity(String),
    /// The string is not a recognizable color (hex, rgb() or hsl()).
    InvalidColor(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownMode(s) => write!(f, "Unknown field mode '{}'. Expected one of: constellation, cosmic, phoenix, quantum.", s),
            ParseError::UnknownPattern(s) => write!(f, "Unknown geometry pattern '{}'. Expected one of: flower-of-life, metatrons-cube, golden-spiral, platonic-solids, vesica-piscis, sri-yantra.", s),
            ParseError::UnknownComplexity(s) => write!(f, "Unknown complexity '{}'. Expected one of: simple, medium, complex.", s),
            ParseError::UnknownVariant(s) => write!(f, "Unknown scene variant '{}'. Expected one of: hero, philosophy, timeline, vision, education, disruption, cta.", s),
            ParseError::UnknownIntensity(s) => write!(f, "Unknown intensity '{}'. Expected one of: subtle, medium, intense.", s),
            ParseError::InvalidColor(s) => write!(f, "Invalid color '{}'. Expected #rgb/#rrggbb hex, rgb(...) or hsl(...).", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur when loading a scene preset file.
#[derive(Debug)]
pub enum PresetError {
    /// Failed to read the preset file from disk.
    Io(std::io::Error),
    /// The preset file is not valid TOML.
    Toml(toml::de::Error),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::Io(e) => write!(f, "Failed to read preset file: {}", e),
            PresetError::Toml(e) => write!(f, "Failed to parse preset: {}", e),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetError::Io(e) => Some(e),
            PresetError::Toml(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PresetError {
    fn from(e: std::io::Error) -> Self {
        PresetError::Io(e)
    }
}

impl From<toml::de::Error> for PresetError {
    fn from(e: toml::de::Error) -> Self {
        PresetError::Toml(e)
    }
}

/// Errors that can occur when exporting a rendered frame.
#[derive(Debug)]
pub enum ExportError {
    /// Failed to encode the image.
    Image(image::ImageError),
    /// Failed to write the file to disk.
    Io(std::io::Error),
    /// The canvas has zero width or height, so there is nothing to export.
    EmptyCanvas,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Image(e) => write!(f, "Failed to encode frame: {}", e),
            ExportError::Io(e) => write!(f, "Failed to write frame file: {}", e),
            ExportError::EmptyCanvas => write!(f, "Cannot export a zero-sized canvas."),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
            ExportError::Io(e) => Some(e),
            ExportError::EmptyCanvas => None,
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}
