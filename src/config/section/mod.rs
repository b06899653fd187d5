//! Configuration section definitions.
//!
//! | Module  | TOML Section          | Purpose                                |
//! |---------|-----------------------|----------------------------------------|
//! | `site`  | `[site]`              | Identity, locales, template revision   |
//! | `build` | `[build]`             | Asset paths, manifest, worker pool     |
//! | `serve` | `[serve]`             | On-demand render server                |
//! | `maps`  | `[maps]`, `[trips]`   | Map APIs and trip collaborators        |

pub mod build;
mod maps;
mod serve;
mod site;

pub use build::{BuildSection, CompositorKind};
pub use maps::{MapsConfig, TripsConfig};
pub use serve::ServeConfig;
pub use site::SiteSection;
