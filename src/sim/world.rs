//! Table state: chips, walls, their colliders and contact bookkeeping
//!
//! Entities are stored sorted by id (ids are allocated monotonically), so
//! iteration order is stable and lookups are binary searches.

use std::collections::BTreeMap;

use glam::DVec2;

use super::collider::{Collider, ColliderId};
use super::collision::overlaps;
use super::contact::ContactTracker;
use super::entity::{Chip, EntityId, EntityInfo, Wall};
use super::shape::OrientedRectangle;
use crate::error::ConfigurationError;
use crate::settings::PhysicsSettings;

/// Everything the physics core simulates for one table
#[derive(Debug, Clone)]
pub struct World {
    pub settings: PhysicsSettings,
    /// Playing surface; a chip whose centre leaves it is knocked out
    pub surface: OrientedRectangle,
    /// Chips (sorted by id)
    pub chips: Vec<Chip>,
    /// Walls (sorted by id)
    pub walls: Vec<Wall>,
    /// Collider table, indexed by `ColliderId`
    pub colliders: Vec<Collider>,
    /// Onset gating for chip-wall contacts
    pub contacts: ContactTracker,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Whether any chip was moving at the end of the last tick
    pub(crate) was_moving: bool,
    by_owner: BTreeMap<EntityId, ColliderId>,
    next_id: u32,
}

impl World {
    pub fn new(settings: PhysicsSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let surface = OrientedRectangle::axis_aligned(
            DVec2::ZERO,
            settings.table_half_width,
            settings.table_half_depth,
        )?;
        Ok(Self {
            settings,
            surface,
            chips: Vec::new(),
            walls: Vec::new(),
            colliders: Vec::new(),
            contacts: ContactTracker::new(),
            time_ticks: 0,
            was_moving: false,
            by_owner: BTreeMap::new(),
            next_id: 1,
        })
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn attach_collider(&mut self, owner: EntityId, info: &EntityInfo) -> Result<ColliderId, ConfigurationError> {
        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(Collider::new(id, owner, info)?);
        self.by_owner.insert(owner, id);
        Ok(id)
    }

    /// Place a new chip at rest on the table
    pub fn spawn_chip(&mut self, x: f64, z: f64, radius: f64) -> Result<u32, ConfigurationError> {
        let id = self.next_entity_id();
        let chip = Chip::new(id, x, z, radius)?;
        self.attach_collider(chip.entity_id(), &chip.info())?;
        self.chips.push(chip);
        Ok(id)
    }

    /// Place a new static wall
    pub fn spawn_wall(
        &mut self,
        x: f64,
        z: f64,
        angle: f64,
        half_width: f64,
        half_depth: f64,
    ) -> Result<u32, ConfigurationError> {
        let id = self.next_entity_id();
        let wall = Wall::new(id, x, z, angle, half_width, half_depth)?;
        self.attach_collider(wall.entity_id(), &wall.info())?;
        self.walls.push(wall);
        Ok(id)
    }

    pub fn chip(&self, id: u32) -> Option<&Chip> {
        self.chips
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.chips[i])
    }

    pub fn chip_mut(&mut self, id: u32) -> Option<&mut Chip> {
        match self.chips.binary_search_by_key(&id, |c| c.id) {
            Ok(i) => Some(&mut self.chips[i]),
            Err(_) => None,
        }
    }

    pub fn wall(&self, id: u32) -> Option<&Wall> {
        self.walls
            .binary_search_by_key(&id, |w| w.id)
            .ok()
            .map(|i| &self.walls[i])
    }

    pub fn collider_id(&self, owner: EntityId) -> Option<ColliderId> {
        self.by_owner.get(&owner).copied()
    }

    pub fn collider(&self, owner: EntityId) -> Option<&Collider> {
        self.collider_id(owner)
            .map(|id| &self.colliders[id.0 as usize])
    }

    /// Current pose of an entity
    pub fn info(&self, owner: EntityId) -> Option<EntityInfo> {
        match owner {
            EntityId::Chip(id) => self.chip(id).map(Chip::info),
            EntityId::Wall(id) => self.wall(id).map(Wall::info),
        }
    }

    /// Re-read every active collider's geometry from its owner
    pub fn refresh_colliders(&mut self) {
        for i in 0..self.colliders.len() {
            if !self.colliders[i].active {
                continue;
            }
            let owner = self.colliders[i].owner;
            match self.info(owner) {
                Some(info) => self.colliders[i].refresh(&info),
                None => log::warn!("collider {i} has no owner {owner:?}"),
            }
        }
    }

    /// Give a chip its starting velocity, capped to the launch limit.
    ///
    /// Returns the velocity actually applied, or `None` for an unknown or
    /// knocked-out chip.
    pub fn launch(&mut self, id: u32, velocity: DVec2) -> Option<DVec2> {
        if !velocity.is_finite() {
            log::warn!("ignoring non-finite launch for chip {id}");
            return None;
        }
        let capped = velocity.clamp_length_max(self.settings.max_launch_speed);
        let chip = self.chip_mut(id).filter(|c| c.in_play)?;
        chip.set_velocity(capped);
        log::debug!("chip {id} launched at {capped}");
        Some(capped)
    }

    /// Remove a chip from play and drop every contact that mentions it
    pub fn knock_out(&mut self, id: u32) -> bool {
        let Some(chip) = self.chip_mut(id).filter(|c| c.in_play) else {
            return false;
        };
        chip.in_play = false;
        chip.vel = None;
        if let Some(cid) = self.collider_id(EntityId::Chip(id)) {
            self.colliders[cid.0 as usize].active = false;
            self.contacts.purge(cid);
        }
        log::info!("chip {id} knocked out");
        true
    }

    /// Whether any chip in play still has a non-zero velocity
    pub fn any_moving(&self) -> bool {
        self.chips.iter().any(Chip::is_moving)
    }

    pub fn chips_in_play(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter().filter(|c| c.in_play)
    }

    /// Boolean overlap of two entities' geometry as of their current poses
    pub fn overlapping(&self, a: EntityId, b: EntityId) -> bool {
        let (Some(ca), Some(cb)) = (self.collider(a), self.collider(b)) else {
            return false;
        };
        if !ca.active || !cb.active {
            return false;
        }
        let (Some(ia), Some(ib)) = (self.info(a), self.info(b)) else {
            return false;
        };
        let mut ca = ca.clone();
        let mut cb = cb.clone();
        ca.refresh(&ia);
        cb.refresh(&ib);
        overlaps(&ca.shape, &cb.shape)
    }
}
