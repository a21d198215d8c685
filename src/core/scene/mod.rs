//=========================================================================
// Scene System
//=========================================================================
//
// Owns every entity once and references them from two ordered lists.
//
// Architecture:
//   Scene
//     ├─ entities: Vec<Box<dyn Entity>>   (arena, EntityId = index)
//     ├─ listeners: Vec<EntityId>         (dispatch priority)
//     └─ widgets: Vec<EntityId>           (render order, later on top)
//
// Flow:
//   dispatch_events() → per event, first claiming listener wins
//   render_all()      → clear → Widget::render (in order) → present
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetStore;
use crate::core::error::{RenderError, SceneError};
use crate::core::input::{DispatchContext, InputEvent, InputListener, QuitOnEscape};
use crate::core::render::{RenderSurface, Rgba};
use crate::core::widget::Widget;

//=== EntityId ============================================================

/// Index of an entity in its scene's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_raw(index: usize) -> Self {
        Self(index)
    }
}

//=== Entity ==============================================================

/// An object stored in the scene, exposing zero or more capabilities.
///
/// A dual-role object (e.g. [`Button`](crate::core::widget::Button))
/// returns itself from both accessors; the scene stores it once.
///
/// # Minimal Implementation
///
/// ```rust
/// use lumen_shell::prelude::*;
///
/// struct Logger;
///
/// impl InputListener for Logger {
///     fn accepted_kinds(&self) -> EventKinds {
///         EventKinds::only(EventKind::KeyUp)
///     }
///
///     fn consume(&mut self, _event: &InputEvent, _ctx: &mut DispatchContext) -> bool {
///         false
///     }
/// }
///
/// impl Entity for Logger {
///     fn listener(&mut self) -> Option<&mut dyn InputListener> {
///         Some(self)
///     }
/// }
/// ```
pub trait Entity: Send {
    fn listener(&mut self) -> Option<&mut dyn InputListener> {
        None
    }

    fn widget(&self) -> Option<&dyn Widget> {
        None
    }
}

impl Entity for QuitOnEscape {
    fn listener(&mut self) -> Option<&mut dyn InputListener> {
        Some(self)
    }
}

//=== Scene ===============================================================

#[derive(Default)]
pub struct Scene {
    entities: Vec<Box<dyn Entity>>,
    listeners: Vec<EntityId>,
    widgets: Vec<EntityId>,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Moves `entity` into the arena without registering it anywhere.
    pub fn spawn(&mut self, entity: impl Entity + 'static) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(Box::new(entity));
        trace!(target: "scene", "Spawned entity {:?}", id);
        id
    }

    /// Appends `id` to the listener chain (lowest priority so far).
    pub fn listen(&mut self, id: EntityId) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(id.0)
            .ok_or(SceneError::UnknownEntity(id))?;

        if entity.listener().is_none() {
            return Err(SceneError::MissingCapability {
                id,
                capability: "listener",
            });
        }
        if self.listeners.contains(&id) {
            return Err(SceneError::AlreadyRegistered {
                id,
                list: "listener chain",
            });
        }

        self.listeners.push(id);
        debug!(target: "scene", "Entity {:?} listening (priority {})", id, self.listeners.len() - 1);
        Ok(())
    }

    /// Appends `id` to the widget list (drawn on top of earlier widgets).
    pub fn show(&mut self, id: EntityId) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get(id.0)
            .ok_or(SceneError::UnknownEntity(id))?;

        if entity.widget().is_none() {
            return Err(SceneError::MissingCapability {
                id,
                capability: "widget",
            });
        }
        if self.widgets.contains(&id) {
            return Err(SceneError::AlreadyRegistered {
                id,
                list: "widget list",
            });
        }

        self.widgets.push(id);
        debug!(target: "scene", "Entity {:?} shown (layer {})", id, self.widgets.len() - 1);
        Ok(())
    }

    /// Spawns `entity` and registers it in every list its capabilities
    /// allow.
    pub fn add(&mut self, entity: impl Entity + 'static) -> EntityId {
        let id = self.spawn(entity);
        let entity = &mut self.entities[id.0];

        if entity.listener().is_some() {
            self.listeners.push(id);
        }
        if entity.widget().is_some() {
            self.widgets.push(id);
        }
        id
    }

    //--- Dispatch ---------------------------------------------------------

    /// Walks the listener chain for each event in order.
    ///
    /// A listener only sees kinds it accepts; the first one to claim an
    /// event stops it. Unclaimed events are dropped. Returns the number
    /// of claimed events.
    pub fn dispatch_events(&mut self, events: &[InputEvent], ctx: &mut DispatchContext) -> usize {
        let mut claimed = 0;

        for event in events {
            let kind = event.kind();
            let mut claimant = None;

            for &id in &self.listeners {
                let Some(listener) = self.entities[id.0].listener() else {
                    continue;
                };
                if !listener.accepts(kind) {
                    continue;
                }

                ctx.set_current(Some(id));
                let consumed = listener.consume(event, ctx);
                ctx.set_current(None);

                if consumed {
                    claimant = Some(id);
                    break;
                }
            }

            match claimant {
                Some(id) => {
                    trace!(target: "scene", "{:?} claimed by {:?}", kind, id);
                    claimed += 1;
                }
                None => trace!(target: "scene", "{:?} unclaimed, dropped", kind),
            }
        }

        claimed
    }

    //--- Rendering --------------------------------------------------------

    /// Clears to `background`, renders every widget in order, presents.
    pub fn render_all(
        &self,
        surface: &mut dyn RenderSurface,
        assets: &AssetStore,
        background: Rgba,
    ) -> Result<(), RenderError> {
        surface.clear(background);
        for id in &self.widgets {
            if let Some(widget) = self.entities[id.0].widget() {
                widget.render(surface, assets);
            }
        }
        surface.present()
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn listeners(&self) -> &[EntityId] {
        &self.listeners
    }

    pub fn widgets(&self) -> &[EntityId] {
        &self.widgets
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.entities.len())
            .field("listeners", &self.listeners)
            .field("widgets", &self.widgets)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
