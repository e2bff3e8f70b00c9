//! Cisco IOS-XE NED configuration to OpenConfig translation.
//!
//! The orchestration server exposes device configuration as NED JSON
//! (`tailf-ned-cisco-ios:*`). This library maps the ACL, OSPFv2 and BGP
//! parts of that tree onto the vendor-neutral OpenConfig models and keeps
//! track of everything it could not map.
//!
//! # Architecture
//!
//! ## Translation
//!
//! - [`acl`]: Standard and extended access lists, plus their interface,
//!   NTP and VTY line bindings
//! - [`network_instances`]: The default instance and one L3VRF per VRF
//!   definition, carrying the routing protocols
//! - [`ospf`]: OSPFv2 processes: global settings, areas, interface
//!   binding through network statements
//! - [`bgp`]: The BGP process: global settings, neighbors, peer-groups
//! - [`translate`]: Device-level orchestration over feature families
//!
//! ## Supporting pieces
//!
//! - [`context`]: Per-device translation state (mapping tables, notes)
//! - [`mappings`]: IOS keyword tables loaded from TOML
//! - [`interfaces`]: Walking the NED interface container
//! - [`notes`]: Human-readable records of what was left behind
//! - [`error`]: Fatal translation errors
//! - [`xr`]: Refuses OpenConfig families not yet supported on IOS-XR
//!
//! ## Reporting
//!
//! - [`report`]: Terminal rendering of coverage and notes
//! - [`summary`]: Post-translation counts
//!
//! # Leftover tracking
//!
//! Every translator receives the source tree and a
//! [`Leftover`](config_tree_core::Leftover) copy of it. Whatever it maps is
//! consumed from the leftover, so the leftover ends up holding exactly the
//! configuration OpenConfig does not yet represent.
//!
//! # Examples
//!
//! ```ignore
//! use config_tree_core::parse_file;
//! use ned2oc::context::TranslationContext;
//! use ned2oc::translate::{translate_device, Feature};
//!
//! let before = parse_file("router1.json")?;
//! let mut ctx = TranslationContext::default();
//! let device = translate_device(&before, &Feature::ALL, &mut ctx)?;
//! for feature in &device.features {
//!     println!("{}: {}", feature.feature, feature.leftover.compact());
//! }
//! print!("{}", ctx.notes.render());
//! ```
//!
//! # Built on config-tree-core
//!
//! Path addressing, tree building, leftover tracking and coverage come from
//! `config-tree-core`. Everything IOS-XE or OpenConfig specific lives here.

pub mod acl;
pub mod bgp;
pub mod context;
pub mod error;
pub mod interfaces;
pub mod mappings;
pub mod network_instances;
pub mod notes;
pub mod ospf;
pub mod report;
pub mod summary;
pub mod translate;
pub mod xr;
