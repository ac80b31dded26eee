//! Compile-only compatibility crate.
//!
//! This crate exists to ensure the public SDK surface remains usable by third-party
//! consumers. It is not shipped or run; it must only build.

use roiwall_compositor::{plan_composite, RegionCompositor, RenderBackend};
use roiwall_core::{NormalizedRect, RegionList, RegionTable, SourceImage, TexCoordMax};
use roiwall_plugins::{registry, Plugin, PluginEntry};

#[allow(dead_code)]
pub fn _compile_witness() {
    // Region tables and rects build from public constructors only.
    let table = RegionTable::edge_nightclub();
    let rect = NormalizedRect::new(0.0, 0.0, 1.0, 0.5);
    let _ = plan_composite(TexCoordMax::default(), &rect, &table.regions, table.mirror.unwrap_or(true));
    let _ = RegionList::full();

    // Registry enumeration and instantiation stay object-safe.
    let entries: &[PluginEntry] = registry();
    let _plugins: Vec<Box<dyn Plugin>> = entries.iter().map(|e| (e.create)()).collect();
}

/// Any third-party backend must be able to drive the compositor generically.
#[allow(dead_code)]
pub fn _backend_witness<B: RenderBackend>(backend: &mut B, source: &SourceImage<B::Texture>) {
    let mut c: RegionCompositor<B::Texture, B::Framebuffer> = RegionCompositor::new();
    let _ = c.composite(
        backend,
        source,
        &NormalizedRect::FULL,
        &RegionList::full(),
        false,
    );
    c.release(backend);
}
