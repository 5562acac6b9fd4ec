//! Numeric local-to-world mapping over a chain of nested frames.

use crate::expression::address::FrameAddr;
use crate::foundation::core::{Affine, AffineFrame, Point, Vec2};

/// Apply `chain` (innermost first) and then `owner` to a local point.
///
/// An empty chain applies only the owner frame.
pub fn to_world(p: Point, chain: &[AffineFrame], owner: AffineFrame) -> Point {
    let local = chain.iter().fold(p, |acc, f| f.apply(acc));
    owner.apply(local)
}

/// Inverse of [`to_world`]; `None` when any frame collapses the plane.
pub fn to_local(p: Point, chain: &[AffineFrame], owner: AffineFrame) -> Option<Point> {
    let mut acc = owner.invert(p)?;
    for f in chain.iter().rev() {
        acc = f.invert(acc)?;
    }
    Some(acc)
}

/// Map a tangent handle through the linear part of the chain.
pub fn vector_to_world(v: Vec2, chain: &[AffineFrame], owner: AffineFrame) -> Vec2 {
    let local = chain.iter().fold(v, |acc, f| f.apply_vector(acc));
    owner.apply_vector(local)
}

/// Combined matrix of the chain and owner.
pub fn world_affine(chain: &[AffineFrame], owner: AffineFrame) -> Affine {
    let inner = chain
        .iter()
        .fold(Affine::IDENTITY, |acc, f| f.to_affine() * acc);
    owner.to_affine() * inner
}

/// Index of a frame inside a [`FrameArena`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameId(pub u32);

/// One addressable frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameEntry {
    pub addr: FrameAddr,
    pub frame: AffineFrame,
}

/// Flat storage for every frame seen during discovery; paths refer to frames by id.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameArena {
    entries: Vec<FrameEntry>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: FrameAddr, frame: AffineFrame) -> FrameId {
        let id = FrameId(self.entries.len() as u32);
        self.entries.push(FrameEntry { addr, frame });
        id
    }

    pub fn get(&self, id: FrameId) -> Option<&FrameEntry> {
        self.entries.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `ids` to frames, skipping ids the arena does not hold.
    pub fn frames(&self, ids: &[FrameId]) -> Vec<AffineFrame> {
        ids.iter()
            .filter_map(|id| self.get(*id).map(|e| e.frame))
            .collect()
    }

    pub fn entries(&self, ids: &[FrameId]) -> impl Iterator<Item = &FrameEntry> {
        ids.iter().filter_map(|id| self.get(*id))
    }

    pub fn find(&self, addr: &FrameAddr) -> Option<&FrameEntry> {
        self.entries.iter().find(|e| &e.addr == addr)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
