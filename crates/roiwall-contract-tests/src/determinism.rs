use roiwall_compositor::plan_composite;
use roiwall_core::{NormalizedRect, RegionTable, TexCoordMax};

/// Determinism contract:
/// planning the same frame twice yields identical geometry.
#[test]
fn plan_is_deterministic_for_same_inputs() {
    let table = RegionTable::edge_nightclub();
    let src = NormalizedRect::new(0.1, 0.25, 0.8, 0.75);
    let max = TexCoordMax { s: 0.9375, t: 0.5 };

    let p1 = plan_composite(max, &src, &table.regions, true);
    let p2 = plan_composite(max, &src, &table.regions, true);

    assert_eq!(p1, p2, "plan must be stable");
}

/// The built-in table is rebuilt identically on every call.
#[test]
fn builtin_table_is_stable() {
    assert_eq!(RegionTable::edge_nightclub(), RegionTable::edge_nightclub());
}
