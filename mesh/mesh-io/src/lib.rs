//! Mesh file I/O for NeuroSim.
//!
//! Per-region surfaces extracted from a segmented volume are written as STL
//! artifacts so external viewers can list and load them individually.
//!
//! - **STL** (Stereolithography) - Binary and ASCII, read and write
//!
//! STL stores positions only; tissue labels and colours are not persisted.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_stl, save_stl};
//!
//! let mesh = load_stl("Grey_Matter.stl").unwrap();
//! save_stl(&mesh, "copy.stl", true).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{load_stl, save_stl, write_stl};
