//! Unit and integration tests for cf-trace.

#[cfg(test)]
mod helpers {
    use cf_core::{AgentId, Cell, Frame};

    use crate::SimulationMeta;

    pub fn meta() -> SimulationMeta {
        SimulationMeta {
            screen_size:    (500, 500),
            grid_size:      (50, 50),
            cell_size:      10,
            model_scale:    1.0,
            model_delta:    (0, 0),
            model_filename: "plan.svg".into(),
            font_name:      "Arial".into(),
        }
    }

    /// Frame `t` of a fake run: agents `0..n` on row `t`.
    pub fn frame(t: u32, n: u32) -> Frame {
        let mut f = Frame::default();
        for i in 0..n {
            f.push(AgentId(i), Cell::new(i, t));
        }
        f
    }

    pub fn tmp() -> tempfile::TempDir {
        tempfile::tempdir().expect("create temp dir")
    }
}

// ── Document format ───────────────────────────────────────────────────────────

#[cfg(test)]
mod document_tests {
    use std::fs;

    use cf_core::{AgentId, Cell};

    use super::helpers::{frame, meta, tmp};
    use crate::{Durability, JsonTraceWriter, TraceError, TraceWriter, load};

    #[test]
    fn round_trip_n_frames() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        for t in 0..7 {
            w.append(&frame(t, 3)).unwrap();
        }
        w.finish().unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace.meta, meta());
        assert_eq!(trace.frame_count(), 7);
        for (t, f) in trace.frames.iter().enumerate() {
            assert_eq!(*f, frame(t as u32, 3));
        }
    }

    #[test]
    fn schema_keys_on_disk() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        w.append(&frame(0, 2)).unwrap();

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for key in ["SCREEN_SIZE", "GRID_SIZE", "GRID_CELL_SIZE", "SVG_SCALE", "SVG_DELTA", "MODEL_FILENAME", "FONT_NAME"] {
            assert!(v["meta"].get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["paths"], serde_json::json!([[[0, 0], [1, 0]]]));
        assert_eq!(v["ids"], serde_json::json!([[0, 1]]));
    }

    #[test]
    fn first_flush_replaces_existing_file() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"meta": null, "paths": [[[9, 9]], [[9, 9]]]}"#).unwrap();
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        w.append(&frame(0, 1)).unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 1);
    }

    #[test]
    fn corrupt_document_recovers_as_zero_prior_frames() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        w.append(&frame(0, 2)).unwrap();
        fs::write(&path, "{ not json").unwrap();
        w.append(&frame(1, 2)).unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace.frames, vec![frame(1, 2)]);
    }

    #[test]
    fn document_without_paths_recovers() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        w.append(&frame(0, 1)).unwrap();
        fs::write(&path, r#"{"meta": {}}"#).unwrap();
        w.append(&frame(1, 1)).unwrap();
        assert_eq!(load(&path).unwrap().frames, vec![frame(1, 1)]);
    }

    #[test]
    fn batched_defers_rewrite() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::Batched(3));
        w.append(&frame(0, 1)).unwrap();
        w.append(&frame(1, 1)).unwrap();
        assert!(!path.exists());
        w.append(&frame(2, 1)).unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 3);
        w.append(&frame(3, 1)).unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 3);
        w.finish().unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 4);
        assert_eq!(w.frames_appended(), 4);
    }

    #[test]
    fn failed_rewrite_keeps_pending_frames() {
        let dir = tmp();
        let sub = dir.path().join("later");
        let path = sub.join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);

        assert!(matches!(w.append(&frame(0, 2)), Err(TraceError::Io { .. })));
        fs::create_dir(&sub).unwrap();
        w.append(&frame(1, 2)).unwrap();
        w.finish().unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace.frames, vec![frame(0, 2), frame(1, 2)]);
        assert_eq!(w.frames_appended(), 2);
    }

    #[test]
    fn finish_without_frames_writes_meta() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let mut w = JsonTraceWriter::new(&path, meta(), Durability::PerTick);
        w.finish().unwrap();
        w.finish().unwrap();
        let trace = load(&path).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn legacy_document_gets_slot_ids() {
        let dir = tmp();
        let path = dir.path().join("old.json");
        let meta_json = serde_json::to_string(&meta()).unwrap();
        fs::write(&path, format!(r#"{{"meta": {meta_json}, "paths": [[[1, 2], [3, 4]], [[5, 6]]]}}"#)).unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace.frames[0].ids, vec![AgentId(0), AgentId(1)]);
        assert_eq!(trace.frames[1].ids, vec![AgentId(0)]);
        assert_eq!(trace.frames[1].cells, vec![Cell::new(5, 6)]);
        assert!(trace.frames[0].has_slot_ids());
    }

    #[test]
    fn load_is_strict() {
        let dir = tmp();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load(&missing), Err(TraceError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[1, 2").unwrap();
        assert!(matches!(load(&bad), Err(TraceError::Json { .. })));

        let no_meta = dir.path().join("no_meta.json");
        fs::write(&no_meta, r#"{"paths": []}"#).unwrap();
        assert!(matches!(load(&no_meta), Err(TraceError::MissingMeta(_))));

        let meta_json = serde_json::to_string(&meta()).unwrap();
        let skew = dir.path().join("skew.json");
        fs::write(&skew, format!(r#"{{"meta": {meta_json}, "paths": [[[1, 1]]], "ids": []}}"#)).unwrap();
        assert!(matches!(load(&skew), Err(TraceError::IdsMismatch { .. })));

        let shape = dir.path().join("shape.json");
        fs::write(&shape, format!(r#"{{"meta": {meta_json}, "paths": [[[1, 1]]], "ids": [[0, 1]]}}"#)).unwrap();
        assert!(matches!(load(&shape), Err(TraceError::Frame { index: 0, .. })));
    }
}

// ── Line format ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod lines_tests {
    use std::fs;
    use std::io::Write;

    use super::helpers::{frame, meta, tmp};
    use crate::{Durability, JsonLinesTraceWriter, TraceError, TraceWriter, load};

    #[test]
    fn round_trip_n_frames() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let mut w = JsonLinesTraceWriter::new(&path, meta(), Durability::PerTick);
        for t in 0..12 {
            w.append(&frame(t, (t % 4) + 1)).unwrap();
        }
        w.finish().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 13, "meta line plus one line per frame");
        assert!(text.lines().next().unwrap().starts_with(r#"{"meta":"#));

        let trace = load(&path).unwrap();
        assert_eq!(trace.meta, meta());
        assert_eq!(trace.frame_count(), 12);
        assert_eq!(trace.frames[5], frame(5, 2));
    }

    #[test]
    fn per_tick_is_readable_without_finish() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let mut w = JsonLinesTraceWriter::new(&path, meta(), Durability::PerTick);
        w.append(&frame(0, 2)).unwrap();
        w.append(&frame(1, 2)).unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 2);
    }

    #[test]
    fn truncated_final_line_is_dropped() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let mut w = JsonLinesTraceWriter::new(&path, meta(), Durability::PerTick);
        for t in 0..3 {
            w.append(&frame(t, 2)).unwrap();
        }
        w.finish().unwrap();
        drop(w);
        let mut f = fs::OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"ids":[0,1],"cells":[[0,3],[1"#).unwrap();

        let trace = load(&path).unwrap();
        assert_eq!(trace.frame_count(), 3);
    }

    #[test]
    fn corrupt_middle_line_is_an_error() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let meta_json = serde_json::to_string(&meta()).unwrap();
        fs::write(
            &path,
            format!("{{\"meta\":{meta_json}}}\n{{\"cells\":[[0,0]]}}\ngarbage\n{{\"cells\":[[0,1]]}}\n"),
        )
        .unwrap();
        assert!(matches!(load(&path), Err(TraceError::Json { .. })));
    }

    #[test]
    fn frames_without_ids_get_slot_ids() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let meta_json = serde_json::to_string(&meta()).unwrap();
        fs::write(&path, format!("{{\"meta\":{meta_json}}}\n{{\"cells\":[[4,4],[5,5]]}}\n")).unwrap();
        let trace = load(&path).unwrap();
        assert!(trace.frames[0].has_slot_ids());
        assert_eq!(trace.frames[0].len(), 2);
    }

    #[test]
    fn missing_meta_line() {
        let dir = tmp();
        let empty = dir.path().join("empty.jsonl");
        fs::write(&empty, "").unwrap();
        assert!(matches!(load(&empty), Err(TraceError::MissingMeta(_))));

        let headless = dir.path().join("headless.jsonl");
        fs::write(&headless, "{\"cells\":[[0,0]]}\n").unwrap();
        assert!(matches!(load(&headless), Err(TraceError::MissingMeta(_))));
    }

    #[test]
    fn batched_flushes_on_finish() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let mut w = JsonLinesTraceWriter::new(&path, meta(), Durability::Batched(100));
        for t in 0..5 {
            w.append(&frame(t, 1)).unwrap();
        }
        w.finish().unwrap();
        assert_eq!(load(&path).unwrap().frame_count(), 5);
    }

    #[test]
    fn finish_without_frames_writes_header() {
        let dir = tmp();
        let path = dir.path().join("run.jsonl");
        let mut w = JsonLinesTraceWriter::new(&path, meta(), Durability::PerTick);
        w.finish().unwrap();
        assert!(load(&path).unwrap().is_empty());
    }
}

// ── Dispatch and recorder ─────────────────────────────────────────────────────

#[cfg(test)]
mod recorder_tests {
    use std::path::Path;

    use cf_core::{Cell, Frame, SimConfig, SpawnRect, Tick};
    use cf_geometry::TileMap;
    use cf_planner::AStarPlanner;
    use cf_sim::{SimBuilder, SimObserver, SimState};

    use super::helpers::{frame, meta, tmp};
    use crate::{
        Durability, TraceError, TraceFormat, TraceOptions, TraceRecorder, TraceResult, TraceWriter,
        create, load,
    };

    /// Fails every append after the first `ok` ones.
    struct Flaky {
        ok:       usize,
        appended: usize,
        calls:    usize,
        finished: bool,
    }

    impl TraceWriter for Flaky {
        fn append(&mut self, _frame: &Frame) -> TraceResult<()> {
            self.calls += 1;
            if self.appended == self.ok {
                return Err(TraceError::Config("disk full".into()));
            }
            self.appended += 1;
            Ok(())
        }
        fn finish(&mut self) -> TraceResult<()> {
            self.finished = true;
            Ok(())
        }
        fn frames_appended(&self) -> usize {
            self.appended
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(TraceFormat::from_path(Path::new("a/b.jsonl")), TraceFormat::Lines);
        assert_eq!(TraceFormat::from_path(Path::new("a/b.JSONL")), TraceFormat::Lines);
        assert_eq!(TraceFormat::from_path(Path::new("a/b.json")), TraceFormat::Document);
        assert_eq!(TraceFormat::from_path(Path::new("a/b")), TraceFormat::Document);
    }

    #[test]
    fn zero_batch_rejected() {
        let dir = tmp();
        let opts = TraceOptions { durability: Durability::Batched(0) };
        assert!(create(&dir.path().join("x.json"), meta(), opts).is_err());
    }

    #[test]
    fn recorder_stops_after_first_error() {
        let mut rec = TraceRecorder::new(Flaky { ok: 2, appended: 0, calls: 0, finished: false });
        for t in 0..5 {
            rec.on_frame(Tick(t as u64), &frame(t, 1));
        }
        rec.on_sim_end(Tick(5), SimState::Running);
        assert!(rec.has_error());
        assert!(rec.take_error().is_some());
        assert!(rec.take_error().is_none());
        let w = rec.into_writer();
        assert_eq!(w.calls, 3);
        assert_eq!(w.frames_appended(), 2);
        assert!(!w.finished);
    }

    #[test]
    fn unwritable_path_surfaces_error() {
        let dir = tmp();
        let path = dir.path().join("no_such_dir").join("run.jsonl");
        let mut rec = TraceRecorder::new(create(&path, meta(), TraceOptions::default()).unwrap());
        rec.on_frame(Tick(0), &frame(0, 1));
        assert!(matches!(rec.take_error(), Some(TraceError::Io { .. })));
    }

    /// Records frames in memory alongside the trace writer.
    struct Both<W: TraceWriter> {
        trace:  TraceRecorder<W>,
        frames: Vec<Frame>,
    }

    impl<W: TraceWriter> SimObserver for Both<W> {
        fn on_frame(&mut self, tick: Tick, frame: &Frame) {
            self.frames.push(frame.clone());
            self.trace.on_frame(tick, frame);
        }
        fn on_sim_end(&mut self, tick: Tick, state: SimState) {
            self.trace.on_sim_end(tick, state);
        }
    }

    #[test]
    fn simulation_round_trips_through_both_formats() {
        for (name, durability) in [("run.json", Durability::PerTick), ("run.jsonl", Durability::Batched(4))] {
            let dir = tmp();
            let path = dir.path().join(name);
            let grid = TileMap::from_ascii(&["..........", "....#.....", "....#.....", ".........."], 10).unwrap();
            let mut sim = SimBuilder::new(SimConfig::default(), grid, Cell::new(9, 3), AStarPlanner::default())
                .spawn(vec![SpawnRect::new(0, 0, 2, 3)], 6)
                .build()
                .unwrap();

            let writer = create(&path, meta(), TraceOptions { durability }).unwrap();
            let mut obs = Both { trace: TraceRecorder::new(writer), frames: Vec::new() };
            assert_eq!(sim.run(&mut obs).unwrap(), SimState::Completed);
            assert!(obs.trace.take_error().is_none());

            let trace = load(&path).unwrap();
            assert_eq!(trace.frames, obs.frames, "{name}");
            assert!(!trace.frames.is_empty());
        }
    }
}
