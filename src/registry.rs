use std::collections::BTreeSet;

use crate::model::LineId;
use crate::region::{Region, RegionKey, RegionShape};

/// Handle of a hidden construction point owned by a region.
///
/// A rendering layer can map these to its own invisible primitives. Every handle is released
/// exactly once, when its region is removed or reshaped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuxPointId(u32);

#[derive(Debug, Default)]
struct AuxPool {
    next: u32,
    live: BTreeSet<AuxPointId>,
}

impl AuxPool {
    fn alloc(&mut self) -> AuxPointId {
        let id = AuxPointId(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(id);
        id
    }

    fn release(&mut self, id: AuxPointId) -> bool {
        let released = self.live.remove(&id);
        if !released {
            log::warn!("auxiliary point {:?} released twice", id);
        }
        released
    }
}

/// All live regions, in creation order.
///
/// ## Invariants:
/// - No two regions share a key
/// - Every handle in a region's `aux_points` is live in the pool, and no other handle is
#[derive(Debug, Default)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    pool: AuxPool,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn find(&self, key: &RegionKey) -> Option<&Region> {
        self.regions.iter().find(|r| &r.key == key)
    }

    /// Number of auxiliary points currently handed out.
    pub fn live_aux_points(&self) -> usize {
        self.pool.live.len()
    }

    /// Adds a region, allocating one auxiliary point per polygon vertex.
    ///
    /// The caller checks for an existing region with the same key first; a duplicate replaces the
    /// old region.
    pub fn add(&mut self, mut region: Region) -> &Region {
        if self.remove_by_key(&region.key).is_some() {
            log::warn!("replaced existing region {:?}", region.key);
        }

        self.release_region(&mut region);
        region.aux_points = self.alloc_for(&region.shape);

        log::debug!("added region {:?} with {} auxiliary points", region.key, region.aux_points.len());
        self.regions.push(region);
        &self.regions[self.regions.len() - 1]
    }

    pub fn remove_by_key(&mut self, key: &RegionKey) -> Option<Region> {
        let i = self.regions.iter().position(|r| &r.key == key)?;
        let mut region = self.regions.remove(i);
        self.release_region(&mut region);
        log::debug!("removed region {:?}", region.key);
        Some(region)
    }

    /// Removes every region whose key has a side assignment for `line`.
    pub fn remove_all_for_line(&mut self, line: LineId) -> Vec<Region> {
        let (mut removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.regions)
            .into_iter()
            .partition(|r| r.key.references(line));
        self.regions = kept;

        for region in &mut removed {
            self.release_region(region);
        }

        if !removed.is_empty() {
            log::debug!("removed {} regions of {}", removed.len(), line);
        }
        removed
    }

    /// Rebuilds every region referencing `line` with `f`.
    ///
    /// Regions for which `f` returns `None` are removed. Returns `(reshaped, removed)` counts.
    pub fn reshape_for_line<F>(&mut self, line: LineId, mut f: F) -> (usize, usize)
    where
        F: FnMut(&RegionKey) -> Option<RegionShape>,
    {
        let mut reshaped = 0;
        let mut removed = 0;

        let regions = std::mem::take(&mut self.regions);
        for mut region in regions {
            if !region.key.references(line) {
                self.regions.push(region);
                continue
            }

            self.release_region(&mut region);
            match f(&region.key) {
                Some(shape) => {
                    region.aux_points = self.alloc_for(&shape);
                    region.shape = shape;
                    self.regions.push(region);
                    reshaped += 1;
                }
                None => {
                    log::debug!("region {:?} no longer constructible", region.key);
                    removed += 1;
                }
            }
        }

        (reshaped, removed)
    }

    /// Removes every region, returning how many there were.
    pub fn clear_all(&mut self) -> usize {
        let mut regions = std::mem::take(&mut self.regions);
        for region in &mut regions {
            self.release_region(region);
        }
        regions.len()
    }

    fn alloc_for(&mut self, shape: &RegionShape) -> Vec<AuxPointId> {
        shape.vertices().iter().map(|_| self.pool.alloc()).collect()
    }

    /// Releases and forgets the auxiliary points of `region`, so they cannot be released again.
    fn release_region(&mut self, region: &mut Region) {
        for id in std::mem::take(&mut region.aux_points) {
            self.pool.release(id);
        }
    }
}
