//! Host application integration for modforge.
//!
//! After a module is generated it is wired into the surrounding Laravel
//! application: composer autoload mappings, the provider list, Filament
//! resource discovery and the module status registry. Migrations and cache
//! clearing run through an [`ArtisanRunner`], permissions through a
//! [`PermissionStore`], and the lifecycle of every project is kept in a
//! [`ProjectStore`].

mod artisan;
mod error;
mod install;
mod manifest;
mod module;
mod permissions;
mod projects;

pub use artisan::{ArtisanRunner, CommandOutput, DryRunner, ProcessRunner, Program};
pub use error::HostError;
pub use install::{HostChange, HostIntegration, InstallOptions, InstallReport};
pub use manifest::{
    Change, ComposerAutoload, HostManifest, PanelDiscovery, ProviderList, StatusRegistry,
};
pub use module::HostModule;
pub use permissions::{PermissionStore, SeederPermissionStore};
pub use projects::{ProjectRecord, ProjectStatus, ProjectStore};
