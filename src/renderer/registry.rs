//! Frame-scoped registry of presented objects
//!
//! Every entry carries the frame it was last presented in. Anything not
//! presented during the current frame is purged at `end_frame` and handed back
//! so the platform can tear down its element.

use std::collections::HashMap;

use super::RenderId;

#[derive(Debug)]
struct Entry<T> {
    presented: T,
    last_frame: u64,
}

#[derive(Debug)]
pub struct RenderRegistry<T> {
    entries: HashMap<RenderId, Entry<T>>,
    frame: u64,
}

impl<T> Default for RenderRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RenderRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            frame: 0,
        }
    }

    /// Start a new presentation frame
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Mark `id` as presented this frame, creating its backing object on first sight
    pub fn present(&mut self, id: RenderId, create: impl FnOnce() -> T) -> &mut T {
        let frame = self.frame;
        let entry = self.entries.entry(id).or_insert_with(|| Entry {
            presented: create(),
            last_frame: frame,
        });
        entry.last_frame = frame;
        &mut entry.presented
    }

    /// Drop and return every entry that was not presented this frame
    pub fn end_frame(&mut self) -> Vec<T> {
        let frame = self.frame;
        let stale: Vec<RenderId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.last_frame != frame)
            .map(|(id, _)| *id)
            .collect();
        stale
            .into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .map(|e| e.presented)
            .collect()
    }

    pub fn contains(&self, id: RenderId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderLayer;

    #[test]
    fn test_present_creates_once() {
        let mut registry = RenderRegistry::new();
        let id = RenderId::new(RenderLayer::Ship, 1);
        let mut created = 0;

        registry.begin_frame();
        *registry.present(id, || {
            created += 1;
            0u32
        }) += 1;
        assert!(registry.end_frame().is_empty());

        registry.begin_frame();
        *registry.present(id, || {
            created += 1;
            0u32
        }) += 1;
        assert!(registry.end_frame().is_empty());

        assert_eq!(created, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_absent_entries_are_purged() {
        let mut registry = RenderRegistry::new();
        let kept = RenderId::new(RenderLayer::Asteroid, 1);
        let dropped = RenderId::new(RenderLayer::Asteroid, 2);

        registry.begin_frame();
        registry.present(kept, || "kept");
        registry.present(dropped, || "dropped");
        assert!(registry.end_frame().is_empty());

        registry.begin_frame();
        registry.present(kept, || "kept");
        let purged = registry.end_frame();
        assert_eq!(purged, vec!["dropped"]);
        assert!(registry.contains(kept));
        assert!(!registry.contains(dropped));
    }
}
