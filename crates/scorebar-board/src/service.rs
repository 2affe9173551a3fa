//! Viewer-keyed sidebar registry
//!
//! One service per live session: the era is detected once, the protocol
//! registry is built once, and every viewer's sidebar hangs off the map
//! until the host disconnects them through `remove`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use scorebar_core::{ProtocolEra, ScorebarResult, ViewerId};
use scorebar_wire::{PacketIdSource, ProtocolRegistry};
use tracing::debug;

use crate::sidebar::Sidebar;
use crate::sink::{EraDetector, PacketSink};

/// Creates and tracks one sidebar per viewer.
pub struct SidebarService {
    registry: Arc<ProtocolRegistry>,
    sidebars: Mutex<HashMap<ViewerId, Arc<Sidebar>>>,
}

impl SidebarService {
    pub fn new(detector: &dyn EraDetector, ids: &dyn PacketIdSource) -> ScorebarResult<Self> {
        let era = detector.detect();
        let registry = Arc::new(ProtocolRegistry::build(era, ids)?);
        debug!(%era, "sidebar service started");
        Ok(SidebarService {
            registry,
            sidebars: Mutex::new(HashMap::new()),
        })
    }

    pub fn era(&self) -> ProtocolEra {
        self.registry.era()
    }

    /// Returns the viewer's sidebar, creating one when none exists. A
    /// destroyed sidebar still sitting in the map is replaced by a fresh
    /// one.
    pub fn get_or_create(
        &self,
        viewer: ViewerId,
        sink: Arc<dyn PacketSink>,
    ) -> ScorebarResult<Arc<Sidebar>> {
        let mut sidebars = self.sidebars.lock();

        if let Some(existing) = sidebars.get(&viewer) {
            if !existing.is_destroyed() {
                return Ok(existing.clone());
            }
        }

        let sidebar = Arc::new(Sidebar::create(viewer, self.registry.clone(), sink)?);
        sidebars.insert(viewer, sidebar.clone());
        Ok(sidebar)
    }

    pub fn get(&self, viewer: ViewerId) -> Option<Arc<Sidebar>> {
        self.sidebars.lock().get(&viewer).cloned()
    }

    /// Disconnect hook: destroys the viewer's sidebar (if still alive) and
    /// drops it from the map.
    pub fn remove(&self, viewer: ViewerId) -> ScorebarResult<()> {
        let removed = self.sidebars.lock().remove(&viewer);
        if let Some(sidebar) = removed {
            if !sidebar.is_destroyed() {
                sidebar.destroy()?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sidebars.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sidebars.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use scorebar_wire::PacketKind;

    struct FixedEra(ProtocolEra);

    impl EraDetector for FixedEra {
        fn detect(&self) -> ProtocolEra {
            self.0
        }
    }

    struct TestIds;

    impl PacketIdSource for TestIds {
        fn packet_id(&self, kind: PacketKind) -> ScorebarResult<i32> {
            Ok(match kind {
                PacketKind::DisplayObjective => 1,
                PacketKind::Objective => 2,
                PacketKind::Team => 3,
                PacketKind::Score => 4,
                PacketKind::ResetScore => 5,
            })
        }
    }

    fn null_sink() -> Arc<dyn PacketSink> {
        Arc::new(|_: Bytes| {})
    }

    fn service(era: ProtocolEra) -> SidebarService {
        SidebarService::new(&FixedEra(era), &TestIds).unwrap()
    }

    #[test]
    fn test_get_or_create_reuses_live_sidebar() {
        let service = service(ProtocolEra::Component);
        let viewer = ViewerId::new(42);

        let first = service.get_or_create(viewer, null_sink()).unwrap();
        let second = service.get_or_create(viewer, null_sink()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_destroyed_sidebar_is_replaced() {
        let service = service(ProtocolEra::Modern);
        let viewer = ViewerId::new(3);

        let first = service.get_or_create(viewer, null_sink()).unwrap();
        first.destroy().unwrap();

        let second = service.get_or_create(viewer, null_sink()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.is_destroyed());
    }

    #[test]
    fn test_remove_destroys_and_unregisters() {
        let service = service(ProtocolEra::Legacy);
        let viewer = ViewerId::new(9);

        let sidebar = service.get_or_create(viewer, null_sink()).unwrap();
        service.remove(viewer).unwrap();

        assert!(sidebar.is_destroyed());
        assert!(service.get(viewer).is_none());
        assert!(service.is_empty());
    }

    #[test]
    fn test_remove_unknown_viewer_is_noop() {
        let service = service(ProtocolEra::Legacy);
        service.remove(ViewerId::new(404)).unwrap();
    }

    #[test]
    fn test_independent_viewers() {
        let service = service(ProtocolEra::Component);
        let a = service.get_or_create(ViewerId::new(1), null_sink()).unwrap();
        let b = service.get_or_create(ViewerId::new(2), null_sink()).unwrap();

        a.set_line(0, "only a").unwrap();
        assert_eq!(a.line(0).unwrap().as_deref(), Some("only a"));
        assert_eq!(b.line(0).unwrap(), None);
        assert_eq!(service.len(), 2);
    }
}
