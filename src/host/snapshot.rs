use crate::geometry::Rect;

use super::{WindowHandle, WindowTree};

#[derive(Debug, Clone)]
struct SnapshotNode {
    title: String,
    rect: Rect,
    children: Vec<WindowHandle>,
}

/// An owned copy of a window hierarchy.
///
/// Front ends capture the host layout into one of these once per tick, so
/// the locator searches a stable tree instead of live foreign windows that
/// may move mid-search. Handles are indices; the root is always handle 0.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    nodes: Vec<SnapshotNode>,
}

impl WindowSnapshot {
    pub fn new(title: impl Into<String>, rect: Rect) -> Self {
        Self {
            nodes: vec![SnapshotNode {
                title: title.into(),
                rect,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> WindowHandle {
        WindowHandle(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child window under `parent` and return its handle.
    ///
    /// # Panics
    /// If `parent` is not a handle of this snapshot.
    pub fn add_child(
        &mut self,
        parent: WindowHandle,
        title: impl Into<String>,
        rect: Rect,
    ) -> WindowHandle {
        let handle = WindowHandle(self.nodes.len() as u64);
        self.nodes.push(SnapshotNode {
            title: title.into(),
            rect,
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(handle);
        handle
    }

    /// Record `child` as an extra child of `parent`. Foreign trees are not
    /// guaranteed to be trees; this lets callers mirror what they observe.
    pub fn link(&mut self, parent: WindowHandle, child: WindowHandle) {
        if let Some(node) = self.nodes.get_mut(parent.0 as usize) {
            node.children.push(child);
        }
    }

    fn node(&self, handle: WindowHandle) -> Option<&SnapshotNode> {
        self.nodes.get(usize::try_from(handle.0).ok()?)
    }
}

impl WindowTree for WindowSnapshot {
    fn root_window(&self) -> Option<WindowHandle> {
        (!self.nodes.is_empty()).then(|| self.root())
    }

    fn child_windows(&self, handle: WindowHandle) -> Vec<WindowHandle> {
        self.node(handle)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.node(handle).map(|n| n.rect)
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        self.node(handle)
            .map(|n| n.title.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_handles_are_empty() {
        let tree = WindowSnapshot::new("host", Rect::new(0, 0, 10, 10));
        let missing = WindowHandle(42);
        assert!(tree.child_windows(missing).is_empty());
        assert!(tree.window_rect(missing).is_none());
        assert_eq!(tree.window_title(missing), "");
    }

    #[test]
    fn test_add_child_records_geometry() {
        let mut tree = WindowSnapshot::new("host", Rect::new(0, 0, 1000, 800));
        let panel = tree.add_child(tree.root(), "Project Browser", Rect::new(700, 0, 1000, 800));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.child_windows(tree.root()), vec![panel]);
        assert_eq!(tree.window_title(panel), "Project Browser");
        assert_eq!(tree.window_rect(panel), Some(Rect::new(700, 0, 1000, 800)));
    }
}
