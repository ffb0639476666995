//! OpenShot Cloud API client and tracking editing backend.
//!
//! This crate provides:
//! - A REST client for projects, files, clips and exports
//! - Typed keyframe editing of clip properties
//! - `OpenShotBackend`, which turns tracking keyframes into one project with
//!   one animated clip per person and exports it

pub mod backend;
pub mod client;
pub mod clips;
pub mod config;
pub mod error;
pub mod types;

pub use backend::OpenShotBackend;
pub use client::OpenShotClient;
pub use config::{OpenShotConfig, TrackingFraming};
pub use error::{OpenShotError, OpenShotResult};
pub use types::{Clip, Export, File, NewExport, NewFile, NewProject, Project};
