//! App runtime glue: manifests, entry sources, home directories.
//!
//! Apps live in the VFS under `/system/apps/<dir>/`, each with an
//! `app.json` manifest and an entry-point source file. The registry scans
//! and validates manifests; the loader reads entry sources; home seeding
//! gives each app a `/home/<id>` the first time it boots.

pub mod home;
pub mod loader;
pub mod registry;

pub use home::seed_home;
pub use loader::load_entry_source;
pub use registry::AppRegistry;

/// Where app bundles live in the composed filesystem.
pub const APPS_DIR: &str = "/system/apps";

/// Manifest file name inside each app directory.
pub const MANIFEST_NAME: &str = "app.json";
