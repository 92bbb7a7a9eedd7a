// server/src/models/mod.rs

//! Data structures representing database entities.

pub mod domain;
pub mod hosting;
pub mod menu;
pub mod permission;
pub mod pricing;
pub mod service;
pub mod transaction;
pub mod user;

pub use domain::{Domain, DomainStatus};
pub use hosting::HostingPackage;
pub use menu::{Menu, SubMenu};
pub use permission::{MenuGrant, RolePermission, SubMenuGrant};
pub use pricing::DomainPrice;
pub use service::{Service, ServicePackage};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use user::{Role, RoleName, User};
