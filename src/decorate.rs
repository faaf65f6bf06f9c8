//! Applying region maps to editors
//!
//! Keeps the last region map seen by each editor and only touches colors
//! whose spans changed. Decoration handles are created once per color and
//! reused for the lifetime of the [`Decorator`].

use std::collections::HashMap;

use crate::color::CanonicalColor;
use crate::region::{RegionMap, RegionSpan};

/// Something that can draw whole-line backgrounds
pub trait DecorationSink {
    /// Opaque per-color decoration handle
    type Handle: Clone;

    /// Create the decoration used for every span of a color
    fn create_handle(&mut self, color: &CanonicalColor) -> Self::Handle;

    /// Replace all spans drawn with a handle; an empty slice clears it
    fn set_decorations(&mut self, handle: &Self::Handle, spans: &[RegionSpan]);
}

/// What an [`Decorator::update`] call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    /// Colors that disappeared and were cleared
    pub cleared: Vec<CanonicalColor>,
    /// Colors whose spans were (re)drawn
    pub applied: Vec<CanonicalColor>,
}

impl RenderPlan {
    /// Check if nothing had to be redrawn
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty() && self.applied.is_empty()
    }
}

/// Diff two region maps by composite key
pub fn plan(previous: &RegionMap, next: &RegionMap) -> RenderPlan {
    let cleared = previous
        .colors()
        .filter(|color| !next.contains_color(color))
        .cloned()
        .collect();
    let applied = next
        .iter()
        .filter(|(color, group)| {
            previous
                .get(color.as_str())
                .map_or(true, |old| old.composite_key() != group.composite_key())
        })
        .map(|(color, _)| color.clone())
        .collect();
    RenderPlan { cleared, applied }
}

/// Per-editor decoration state on top of a sink
pub struct Decorator<S: DecorationSink> {
    sink: S,
    /// Handle cache (color -> handle)
    handles: HashMap<CanonicalColor, S::Handle>,
    /// Last map applied per editor key
    editors: HashMap<String, RegionMap>,
}

impl<S: DecorationSink> Decorator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            handles: HashMap::new(),
            editors: HashMap::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Get or create the handle for a color
    fn handle(&mut self, color: &CanonicalColor) -> S::Handle {
        if let Some(handle) = self.handles.get(color) {
            return handle.clone();
        }
        let handle = self.sink.create_handle(color);
        self.handles.insert(color.clone(), handle.clone());
        handle
    }

    /// Apply a freshly scanned map to an editor
    pub fn update(&mut self, editor_key: &str, next: RegionMap) -> RenderPlan {
        let previous = self.editors.remove(editor_key).unwrap_or_default();
        let plan = plan(&previous, &next);

        for color in &plan.cleared {
            let handle = self.handle(color);
            self.sink.set_decorations(&handle, &[]);
        }
        for color in &plan.applied {
            let handle = self.handle(color);
            if let Some(group) = next.get(color.as_str()) {
                self.sink.set_decorations(&handle, group.spans());
            }
        }

        tracing::debug!(
            editor = editor_key,
            cleared = plan.cleared.len(),
            applied = plan.applied.len(),
            "Updated decorations"
        );
        self.editors.insert(editor_key.to_string(), next);
        plan
    }

    /// Last map applied to an editor
    pub fn current(&self, editor_key: &str) -> Option<&RegionMap> {
        self.editors.get(editor_key)
    }

    /// Forget editors that are no longer open
    pub fn retain_editors<F>(&mut self, mut is_open: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.editors.retain(|key, _| is_open(key));
    }

    pub fn editor_count(&self) -> usize {
        self.editors.len()
    }
}
