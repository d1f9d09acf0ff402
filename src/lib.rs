//! # jplephem
//!
//! Read JPL planetary ephemeris kernels (NAIF DAF/SPK files such as
//! `de421.bsp` or `de440.bsp`) and evaluate them into Cartesian positions
//! and velocities of solar-system bodies.
//!
//! ## Layers
//!
//! * [`daf`] – the binary container: file record, summary list, comment area,
//!   lazy word access over a memory map.
//! * [`spk`] – SPK segments of Chebyshev records (types 2 and 3), record
//!   location, listing, writing and excerpts.
//! * [`pck`] – binary PCK segments giving body orientation angles.
//! * [`chebyshev`] – polynomial evaluation and derivative.
//! * [`resolver`] / [`kernel`] – map a body to the series that make up its
//!   barycentric state, and the query API on top of it.
//!
//! ## Quick start
//! ```rust,no_run
//! use jplephem::Kernel;
//!
//! let kernel = Kernel::open("de421.bsp")?;
//! let mars = kernel.position_and_velocity("mars", 0.0)?.to_au();
//! println!("{:?}", mars.position);
//! # Ok::<(), jplephem::EphemError>(())
//! ```

pub mod chebyshev;
pub mod constants;
pub mod daf;
pub mod ephem_errors;
pub mod kernel;
pub mod kernel_source;
pub mod naif_ids;
pub mod pck;
pub mod resolver;
pub mod spk;
pub mod state_vector;
pub mod time;

pub use ephem_errors::{EphemError, Result};
pub use kernel::Kernel;
pub use kernel_source::{KernelSource, NaifVersion};
pub use naif_ids::NaifIds;
pub use pck::Pck;
pub use resolver::{BodyResolver, Combination, TargetId};
pub use spk::SeriesKey;
pub use state_vector::StateVector;
