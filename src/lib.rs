#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! contentmonetizer - turns technical YouTube videos into knowledge bases
//! and monetization plans
//!
//! Given a video or channel id, the pipeline fetches metadata and the
//! transcript, detects technologies and linked GitHub repositories, inspects
//! (and optionally builds) those repositories, and writes Markdown and JSON
//! reports with monetization strategies and market trends.
//!
//! ## Usage
//! ```rust,ignore
//! use contentmonetizer::{Config, Pipeline};
//! use std::path::Path;
//!
//! async fn example() -> contentmonetizer::Result<()> {
//!     let pipeline = Pipeline::new(Config::load()?)?;
//!     let outcome = pipeline.run_video("dQw4w9WgXcQ", Path::new("output")).await?;
//!     println!("{}", outcome.output_dir.display());
//!     Ok(())
//! }
//! ```

/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// YouTube, GitHub and community statistics clients
pub mod clients;
/// Transcript retrieval and analysis
pub mod transcript;
/// Repository cloning, inspection and technology detection
pub mod repository;
/// Install, build and run phases for detected applications
pub mod builder;
/// Technology trend and market analysis
pub mod trends;
/// Monetization strategies, evaluations and plans
pub mod strategy;
/// Markdown, social and summary output
pub mod report;
/// End-to-end video, channel and repository processing
pub mod pipeline;

// Re-export common types
pub use config::Config;
pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;
