#![forbid(unsafe_code)]

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use roiwall_compositor::plan_composite;
    use roiwall_core::{load_region_table_from, EngineError, NormalizedRect, RegionTable};
    use roiwall_plugins::{create_plugin, registry, PluginKind};

    // ---- Golden fixtures (JSON contracts) ----
    const EDGE_NIGHTCLUB_JSON: &str = include_str!("../fixtures/edge_nightclub.json");
    const REGIONS_NORMALIZED_JSON: &str = include_str!("../fixtures/regions_normalized.json");
    const REGIONS_INVERTED_JSON: &str = include_str!("../fixtures/regions_inverted.json");
    const REGIONS_EMPTY_JSON: &str = include_str!("../fixtures/regions_empty.json");
    const REGIONS_MISSING_KEY_JSON: &str = include_str!("../fixtures/regions_missing_key.json");
    const REGIONS_NO_CANVAS_JSON: &str = include_str!("../fixtures/regions_pixels_no_canvas.json");

    fn write_temp_fixture(name: &str, contents: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("roiwall_contract_tests_{name}_{ts}.json"));
        fs::write(&p, contents).expect("write fixture");
        p
    }

    fn load_err(name: &str, contents: &str) -> EngineError {
        let path = write_temp_fixture(name, contents);
        let err = load_region_table_from(&path).expect_err("fixture must be rejected");
        let _ = fs::remove_file(path);
        err
    }

    #[test]
    fn golden_edge_nightclub_json_matches_builtin_table() {
        let path = write_temp_fixture("edge_nightclub", EDGE_NIGHTCLUB_JSON);

        let table = load_region_table_from(&path).expect("edge_nightclub.json should parse");
        assert_eq!(table, RegionTable::edge_nightclub());
        assert_eq!(table.regions.len(), 7);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_normalized_regions_keep_file_order() {
        let path = write_temp_fixture("regions_normalized", REGIONS_NORMALIZED_JSON);

        let table = load_region_table_from(&path).expect("regions_normalized.json should parse");
        assert_eq!(table.mirror, Some(false));
        let names: Vec<_> = table
            .regions
            .iter()
            .map(|r| r.name.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(names, ["left", "right"]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_inverted_region_is_rejected() {
        let err = load_err("regions_inverted", REGIONS_INVERTED_JSON);

        // Keep this stable but not overly strict.
        let msg = err.to_string().to_lowercase();
        assert!(matches!(err, EngineError::InvalidConfig { .. }), "{err}");
        assert!(
            msg.contains("region 1") && msg.contains("backward"),
            "expected error to name the offending region, got: {msg}"
        );
    }

    #[test]
    fn golden_empty_regions_is_rejected() {
        let err = load_err("regions_empty", REGIONS_EMPTY_JSON);

        let msg = err.to_string().to_lowercase();
        assert!(
            msg.contains("no regions") || msg.contains("empty"),
            "expected error to mention regions/empty, got: {msg}"
        );
    }

    #[test]
    fn golden_missing_key_is_rejected() {
        let err = load_err("regions_missing_key", REGIONS_MISSING_KEY_JSON);

        let msg = err.to_string().to_lowercase();
        assert!(matches!(err, EngineError::Json { .. }), "{err}");
        assert!(
            msg.contains("missing") && msg.contains("name"),
            "expected error to mention the missing key, got: {msg}"
        );
    }

    #[test]
    fn golden_pixels_without_canvas_is_rejected() {
        let err = load_err("regions_pixels_no_canvas", REGIONS_NO_CANVAS_JSON);

        let msg = err.to_string().to_lowercase();
        assert!(
            msg.contains("canvas"),
            "expected error to mention canvas, got: {msg}"
        );
    }

    #[test]
    fn missing_file_reports_its_path() {
        let mut p = std::env::temp_dir();
        p.push("roiwall_contract_tests_does_not_exist.json");
        let err = load_region_table_from(&p).expect_err("missing file");
        assert!(matches!(err, EngineError::Io { .. }));
        assert!(err.to_string().contains("roiwall_contract_tests_does_not_exist"));
    }

    // ---- Geometry contract ----

    #[test]
    fn mirrored_wall_plan_never_samples_right_half_of_source() {
        let table = RegionTable::edge_nightclub();
        let src = NormalizedRect::new(0.0, 0.2, 1.0, 0.6);
        let cmds = plan_composite(Default::default(), &src, &table.regions, true);

        assert_eq!(cmds.len(), 2 * table.regions.len());
        let mid_s = 0.4;
        for q in &cmds.quads {
            for s in q.s_coords() {
                assert!((0.2 - 1e-6..=mid_s + 1e-6).contains(&s), "s={s}");
            }
        }
        for pair in cmds.quads.chunks(2) {
            let mut reversed = pair[0].s_coords();
            reversed.reverse();
            assert_eq!(pair[1].s_coords(), reversed);
        }
    }

    #[test]
    fn wall_plan_positions_are_clip_mapped_regions() {
        let table = RegionTable::edge_nightclub();
        let cmds = plan_composite(Default::default(), &NormalizedRect::FULL, &table.regions, false);

        for (q, region) in cmds.quads.iter().zip(table.regions.iter()) {
            let clip = region.rect.to_clip();
            assert_eq!(q.corners[0].pos, [clip.left, clip.bottom]);
            assert_eq!(q.corners[2].pos, [clip.right, clip.top]);
        }
    }

    // ---- Plugin registry contract ----

    #[test]
    fn registry_ids_are_unique_four_char_codes() {
        let mut seen = HashSet::new();
        for e in registry() {
            assert!(e.info.unique_id.iter().all(u8::is_ascii_alphanumeric));
            assert!(seen.insert(e.info.unique_id), "duplicate id {:?}", e.info.id_str());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn registry_declares_expected_plugins() {
        let expect = [
            (*b"MRNA", PluginKind::Effect, 4),
            (*b"HDNA", PluginKind::Effect, 4),
            (*b"LMKY", PluginKind::Effect, 2),
            (*b"EGTR", PluginKind::Effect, 0),
        ];
        for (id, kind, params) in expect {
            let p = create_plugin(id).expect("registered");
            assert_eq!(p.info().kind, kind);
            assert_eq!(p.params().len(), params);
            assert_eq!(p.info().api_version, (1, 6));
        }
    }
}

#[cfg(test)]
mod determinism;
