//! Hooks around the evaluation of every keyword, active during [`crate::Validator::walk`].
use serde_json::Value;

use crate::{
    error::ValidationError,
    paths::{Location, SchemaLocation},
};

/// Whether the keyword announced by [`KeywordWalkListener::on_walk_start`] is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFlow {
    Continue,
    /// Do not evaluate the keyword. `on_walk_end` is not called for it.
    Skip,
}

/// The keyword about to be, or just, evaluated.
#[derive(Debug, Clone, Copy)]
pub struct WalkEvent<'a> {
    pub keyword: &'a str,
    pub instance: &'a Value,
    pub schema: &'a Value,
    pub instance_location: &'a Location,
    pub evaluation_path: &'a Location,
    pub schema_location: &'a SchemaLocation,
}

/// Observes keyword evaluations.
///
/// ```rust
/// use jsonschema_engine::{KeywordWalkListener, WalkEvent, WalkFlow};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Defaults(Mutex<Vec<String>>);
///
/// impl KeywordWalkListener for Defaults {
///     fn on_walk_start(&self, event: &WalkEvent<'_>) -> WalkFlow {
///         if event.keyword == "properties" {
///             if let (Some(properties), Some(object)) =
///                 (event.schema.as_object(), event.instance.as_object())
///             {
///                 for (name, subschema) in properties {
///                     if !object.contains_key(name) && subschema.get("default").is_some() {
///                         self.0.lock().expect("Lock is poisoned").push(name.clone());
///                     }
///                 }
///             }
///         }
///         WalkFlow::Continue
///     }
/// }
/// ```
pub trait KeywordWalkListener: Send + Sync {
    fn on_walk_start(&self, event: &WalkEvent<'_>) -> WalkFlow {
        let _ = event;
        WalkFlow::Continue
    }
    /// Called with the errors the keyword produced.
    fn on_walk_end(&self, event: &WalkEvent<'_>, errors: &[ValidationError<'_>]) {
        let _ = (event, errors);
    }
}
