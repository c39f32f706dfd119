// In crates/charts/src/registry.rs

use std::collections::BTreeMap;

use crate::error::RenderError;
use crate::kind::ChartKind;
use crate::projection::ChartData;
use crate::style::{ChartStyle, style};
use crate::theme::ThemeMode;

/// Opaque id of a chart instance created by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(pub u64);

/// A surface that can draw charts into named viewports.
pub trait ChartBackend {
    fn create(
        &mut self,
        viewport: &str,
        data: &ChartData,
        style: &ChartStyle,
    ) -> Result<ChartHandle, RenderError>;

    /// Disposes a chart instance. Unknown handles are ignored.
    fn destroy(&mut self, handle: ChartHandle);

    fn reset_zoom(&mut self, _handle: ChartHandle) {}
}

impl<B: ChartBackend + ?Sized> ChartBackend for Box<B> {
    fn create(
        &mut self,
        viewport: &str,
        data: &ChartData,
        style: &ChartStyle,
    ) -> Result<ChartHandle, RenderError> {
        (**self).create(viewport, data, style)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        (**self).destroy(handle)
    }

    fn reset_zoom(&mut self, handle: ChartHandle) {
        (**self).reset_zoom(handle)
    }
}

struct Mounted {
    handle: ChartHandle,
    data: ChartData,
}

/// Owns every live chart, at most one per viewport.
pub struct ChartRegistry<B> {
    backend: B,
    mode: ThemeMode,
    mounted: BTreeMap<ChartKind, Mounted>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B, mode: ThemeMode) -> Self {
        Self {
            backend,
            mode,
            mounted: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Styles `data` for the current mode and draws it into its viewport.
    ///
    /// Any chart already on that viewport is destroyed before the new one is
    /// created, so a failed create leaves the viewport empty, never stale.
    pub fn mount(&mut self, data: ChartData) -> Result<ChartHandle, RenderError> {
        let kind = data.kind;
        self.unmount(kind);

        let styled = style(&data, self.mode);
        let handle = self.backend.create(kind.viewport_id(), &data, &styled)?;
        tracing::debug!(chart = %kind, handle = handle.0, points = data.point_count(), "Chart mounted.");

        self.mounted.insert(kind, Mounted { handle, data });
        Ok(handle)
    }

    /// Destroys the chart on `kind`'s viewport. Returns whether one was mounted.
    pub fn unmount(&mut self, kind: ChartKind) -> bool {
        match self.mounted.remove(&kind) {
            Some(existing) => {
                self.backend.destroy(existing.handle);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        let kinds: Vec<ChartKind> = self.mounted.keys().copied().collect();
        for kind in kinds {
            self.unmount(kind);
        }
    }

    /// Switches mode and redraws every mounted chart from its stored data.
    ///
    /// Charts that fail to redraw are left unmounted and returned.
    pub fn retheme(&mut self, mode: ThemeMode) -> Vec<(ChartKind, RenderError)> {
        self.mode = mode;
        let stored: Vec<ChartData> = std::mem::take(&mut self.mounted)
            .into_values()
            .map(|mounted| {
                self.backend.destroy(mounted.handle);
                mounted.data
            })
            .collect();

        let mut failures = Vec::new();
        for data in stored {
            let kind = data.kind;
            if let Err(err) = self.mount(data) {
                tracing::warn!(chart = %kind, error = %err, "Chart failed to redraw after theme change.");
                failures.push((kind, err));
            }
        }
        failures
    }

    /// Forwards a zoom reset to the chart on `kind`'s viewport, if any.
    pub fn reset_zoom(&mut self, kind: ChartKind) -> bool {
        match self.mounted.get(&kind) {
            Some(mounted) => {
                self.backend.reset_zoom(mounted.handle);
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self, kind: ChartKind) -> bool {
        self.mounted.contains_key(&kind)
    }

    pub fn mounted_kinds(&self) -> Vec<ChartKind> {
        self.mounted.keys().copied().collect()
    }

    pub fn data(&self, kind: ChartKind) -> Option<&ChartData> {
        self.mounted.get(&kind).map(|m| &m.data)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
