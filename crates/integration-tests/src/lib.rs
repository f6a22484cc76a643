//! Internal test crate: end-to-end coverage of the dossier workflow over an
//! in-process stand-in for the dossier API.

pub mod fake_api;
