//! Interactable objects: levers, shrines, chests and the like.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{InteractableId, ParamValue};
use crate::behavior::Behavior;

/// A non-character room occupant the exploration menu can inspect or
/// interact with.
///
/// The `state` map persists across interactions; its initial contents were
/// validated against the behavior's required-parameter contract when the
/// template was built.
pub struct Interactable {
    pub id: InteractableId,
    pub name: String,
    pub state: BTreeMap<String, ParamValue>,
    pub behavior: Arc<dyn Behavior>,
}

impl std::fmt::Debug for Interactable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactable")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}
