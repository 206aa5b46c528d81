//! Static and time-dependent runtime parameters for transport simulations.
//!
//! A [`Config`] holds every user-authored section. Once a [`Grid`] is
//! attached, two products are built from it:
//!
//! - [`StaticParamsSlice`], once, holding everything that changes the
//!   structure of the downstream solver. Compare or hash it to decide whether
//!   the solver must be rebuilt.
//! - [`DynamicParamsSlice`], per query time, produced by a
//!   [`DynamicRuntimeParamsSliceProvider`] and holding only resolved numbers.
//!
//! ```
//! use rampup_core::Component;
//! use rampup_params::{Config, ConfigInput, DynamicRuntimeParamsSliceProvider, Grid,
//!     build_static_params_from_config};
//!
//! let mut config = Config::from_input(ConfigInput::default()).unwrap();
//! config.set_grid(&Grid::uniform(4).unwrap()).unwrap();
//!
//! let static_params = build_static_params_from_config(&config).unwrap();
//! assert_eq!(static_params.grid_size, 4);
//!
//! let provider = DynamicRuntimeParamsSliceProvider::from_config(&config).unwrap();
//! let slice = provider.call(0.0).unwrap();
//! assert_eq!(slice.profile_conditions.t_i.len(), 4);
//! ```

mod config;
mod error;
mod grid;
mod provider;
mod sample;
mod section;
mod spatial_field;
mod static_params;

pub mod numerics;
pub mod pedestal;
pub mod profile_conditions;
pub mod resolver;
pub mod sources;

pub use config::{Config, ConfigInput};
pub use error::{ConfigError, ParamsError, ValidationError};
pub use grid::Grid;
pub use provider::{DynamicParamsSlice, DynamicRuntimeParamsSliceProvider};
pub use section::Section;
pub use spatial_field::{ProfileError, ProfileInput, SpatialField};
pub use static_params::{StaticParamsSlice, build_static_params_from_config};
