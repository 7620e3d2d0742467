//! Session-scoped scene store holding the active drawing surface.
//!
//! The editor page mounts the stage when it appears and unmounts it when it
//! goes away. Components that need page coordinates (the inline text editor)
//! read the stage through a shared [`SceneStore`] handle.

use kurbo::{Point, Size, Vec2};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Scene store errors.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("No stage is mounted")]
    NotMounted,
    #[error("Scene store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// The drawing surface as placed on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// Offset of the stage container from the page origin.
    pub container_offset: Point,
    /// Stage size in page pixels.
    pub size: Size,
    /// Stage pan in page pixels.
    pub pan: Vec2,
    /// Stage zoom factor.
    pub scale: f64,
}

impl Stage {
    pub fn new(container_offset: Point, size: Size) -> Self {
        Self {
            container_offset,
            size,
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }

    /// Position of a stage point relative to the stage container.
    pub fn to_container(&self, point: Point) -> Point {
        Point::new(point.x * self.scale, point.y * self.scale) + self.pan
    }

    /// Position of a stage point on the page.
    pub fn to_page(&self, point: Point) -> Point {
        self.to_container(point) + self.container_offset.to_vec2()
    }
}

/// Cloneable handle to the session's stage.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    stage: Arc<RwLock<Option<Stage>>>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a stage, replacing any previous one.
    pub fn mount(&self, stage: Stage) -> Result<(), SceneError> {
        let mut slot = self
            .stage
            .write()
            .map_err(|e| SceneError::LockPoisoned(e.to_string()))?;
        if slot.is_some() {
            log::debug!("Replacing mounted stage");
        }
        *slot = Some(stage);
        log::debug!("Stage mounted at {:?} ({}x{})", stage.container_offset, stage.size.width, stage.size.height);
        Ok(())
    }

    /// Tear down the stage. Returns the stage that was mounted, if any.
    pub fn unmount(&self) -> Result<Option<Stage>, SceneError> {
        let mut slot = self
            .stage
            .write()
            .map_err(|e| SceneError::LockPoisoned(e.to_string()))?;
        Ok(slot.take())
    }

    /// The mounted stage.
    pub fn stage(&self) -> Result<Stage, SceneError> {
        let slot = self
            .stage
            .read()
            .map_err(|e| SceneError::LockPoisoned(e.to_string()))?;
        (*slot).ok_or(SceneError::NotMounted)
    }

    pub fn is_mounted(&self) -> bool {
        self.stage().is_ok()
    }

    /// Update the mounted stage in place.
    pub fn update(&self, f: impl FnOnce(&mut Stage)) -> Result<(), SceneError> {
        let mut slot = self
            .stage
            .write()
            .map_err(|e| SceneError::LockPoisoned(e.to_string()))?;
        let stage = slot.as_mut().ok_or(SceneError::NotMounted)?;
        f(stage);
        Ok(())
    }
}
