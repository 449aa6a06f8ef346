//! Annotator Server Library
//!
//! Upload a PDF, rasterize its pages, and annotate them from the browser.
//! The server binary is in main.rs; everything it serves lives here so the
//! benchmarks and tests can reach it.
//!
//! # Modules
//!
//! - `imaging`: Raster primitives over `image` buffers
//! - `preprocess`: Page recentering and inpainting
//! - `composite`: Color-key compositing of drawing layers
//! - `annotate`: Stroke, erase, text, highlight and night-mode operations
//! - `pdf`: PDF rasterization via MuPDF
//! - `storage`: Flat-file page store
//! - `session`: The active upload and its pages
//! - `routes`: HTTP surface

pub mod annotate;
pub mod composite;
pub mod config;
pub mod error;
pub mod imaging;
pub mod pdf;
pub mod preprocess;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
