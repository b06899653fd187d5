//! HTTP plumbing shared by `serve` and batch builds.

mod assets;
mod lifecycle;
mod path;
mod response;

pub use assets::AssetServer;
pub use lifecycle::bind_with_retry;
pub use path::resolve_path;
pub use response::{
    respond_file, respond_json, respond_not_found, respond_pipeline_error, respond_png,
    respond_unavailable,
};
