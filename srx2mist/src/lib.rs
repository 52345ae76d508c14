//! Junos SRX to Juniper Mist security configuration translation.
//!
//! An SRX configuration exported in "set" format is a flat list of
//! `set ...` statements. This library rebuilds the device's applications,
//! address book, zones, interfaces and policies from those statements, and
//! compiles them into the three object kinds a Mist organization uses for the
//! same job: custom applications (services), networks and service policies.
//!
//! # Pipeline
//!
//! 1. [`classify`] maps each statement onto a known SRX shape.
//! 2. [`extract`] builds the raw device model, one collection per entity kind.
//! 3. [`resolve`] turns application names into protocol/port specs, using the
//!    predefined `junos-*` lookup table and the device's own definitions.
//! 4. [`compile`] derives Mist applications, networks and service policies,
//!    with [`registry`] handling application name collisions.
//! 5. [`documents`] persists every stage as JSON; [`push`] submits compiled
//!    objects to the Mist API.
//!
//! Anything that cannot be translated is recorded in the [`ledger`] rather
//! than failing the run. [`pipeline::translate`] runs steps 1 to 4.
//!
//! # Reporting
//!
//! - [`summary`]: per-stage object counts
//! - [`inspect`]: statement classification inventory
//! - [`report`]: colored terminal rendering
//!
//! ```ignore
//! use set_config_core::parse_file;
//! use srx2mist::pipeline::translate;
//! use srx2mist::resolve::AppDefinitions;
//!
//! let statements = parse_file("srx.conf".as_ref())?;
//! let defs = AppDefinitions::load_or_empty("JunosAppDefinitions.json".as_ref());
//! let translation = translate(&statements, &defs);
//! translation.write_documents("out".as_ref())?;
//! ```

pub mod classify;
pub mod compile;
pub mod config;
pub mod documents;
pub mod extract;
pub mod inspect;
pub mod ledger;
pub mod pipeline;
pub mod push;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod summary;
