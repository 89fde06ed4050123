//! Synchronization core of the motif editor.
//!
//! Everything in here is free of browser and network access: remote calls,
//! storage and the address bar are reached only through the effects returned
//! by [`controller::EditorState::update`] and the [`store::KeyValueBackend`] /
//! [`location::AddressBar`] seams.

pub mod controller;
pub mod error;
pub mod location;
pub mod model;
pub mod projection;
pub mod results;
pub mod store;
pub mod throttle;

pub use controller::{Effect, EditorState, Event};
pub use model::{GraphModel, NodeId};
