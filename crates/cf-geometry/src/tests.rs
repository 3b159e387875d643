//! Unit tests for cf-geometry.
//!
//! All fixtures are built in memory or in a temp dir; no model files ship
//! with the crate.

#[cfg(test)]
mod rect {
    use crate::Rect;

    #[test]
    fn overlap_is_half_open() {
        let a = Rect::new(0, 0, 10, 10);
        // Shares the x = 10 edge only.
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(a.overlaps(&Rect::new(9, 9, 10, 10)));
    }

    #[test]
    fn zero_size_never_overlaps() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.overlaps(&Rect::new(5, 5, 0, 0)));
    }

    #[test]
    fn extreme_coordinates_do_not_wrap() {
        let a = Rect::new(i32::MAX - 1, 0, i32::MAX, 10);
        let b = Rect::new(i32::MIN, 0, 10, 10);
        assert!(!a.overlaps(&b));
    }
}

#[cfg(test)]
mod color {
    use crate::Rgb;

    #[test]
    fn hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb(255, 128, 0)));
        assert_eq!(Rgb::from_hex("00FF10"), Some(Rgb(0, 255, 16)));
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(Rgb::from_hex("red"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Rgb(1, 2, 255).to_string(), "#0102ff");
    }
}

#[cfg(test)]
mod svg {
    use crate::{GeometryError, ModelTransform, Rect, Rgb, parse_svg};

    const PLAN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="500">
        <rect width="500" height="10" fill="#000000"/>
        <rect x="100" y="40" width="20" height="300" fill="#336699"/>
        <g><rect x="7.9" y="3" width="10" height="10" fill="ABCDEF"/></g>
        <circle cx="1" cy="1" r="1"/>
    </svg>"##;

    #[test]
    fn reads_rects_in_document_order() {
        let obs = parse_svg(PLAN, ModelTransform::default()).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].rect, Rect::new(0, 0, 500, 10));
        assert_eq!(obs[1].rect, Rect::new(100, 40, 20, 300));
        assert_eq!(obs[1].color, Rgb(0x33, 0x66, 0x99));
        assert_eq!(obs[2].rect.x, 7, "decimal coordinates truncate");
    }

    #[test]
    fn delta_then_scale() {
        let t = ModelTransform::new(0.5, (10, -20));
        let obs = parse_svg(PLAN, t).unwrap();
        // (100 + 10) * 0.5 = 55, (40 - 20) * 0.5 = 10, sizes only scaled.
        assert_eq!(obs[1].rect, Rect::new(55, 10, 10, 150));
    }

    #[test]
    fn missing_fill_is_black() {
        let obs = parse_svg(r#"<svg><rect width="1" height="1"/></svg>"#, ModelTransform::default())
            .unwrap();
        assert_eq!(obs[0].color, Rgb::BLACK);
    }

    #[test]
    fn missing_width_is_an_error() {
        let err = parse_svg(r#"<svg><rect height="1"/></svg>"#, ModelTransform::default())
            .unwrap_err();
        assert!(matches!(err, GeometryError::MissingAttribute { name: "width", .. }));
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = parse_svg(
            r#"<svg><rect width="1" height="1" fill="none"/></svg>"#,
            ModelTransform::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::BadColor { .. }));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            parse_svg("<svg><rect", ModelTransform::default()),
            Err(GeometryError::Xml(_))
        ));
    }
}

#[cfg(test)]
mod tile_map {
    use cf_core::Cell;

    use crate::{Obstacle, Rect, Rgb, TileMap, TileMapBuilder};

    fn wall(x: i32, y: i32, w: i32, h: i32) -> Obstacle {
        Obstacle { rect: Rect::new(x, y, w, h), color: Rgb::BLACK }
    }

    /// Reference implementation: test every obstacle for every cell.
    fn brute_force(obstacles: &[Obstacle], w: u32, h: u32, cell: u32) -> Vec<Cell> {
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let probe = Rect::new((x * cell) as i32 - 5, (y * cell) as i32 - 5, 10, 10);
                if obstacles.iter().any(|o| probe.overlaps(&o.rect)) {
                    out.push(Cell::new(x, y));
                }
            }
        }
        out
    }

    #[test]
    fn empty_geometry_is_all_free() {
        let map = TileMapBuilder::new((5, 5), 10).unwrap().build(&[]);
        assert_eq!(map.blocked_count(), 0);
        assert_eq!(map.size(), (5, 5));
    }

    #[test]
    fn probe_marks_cells_touching_obstacle() {
        // Wall covering x in [20, 30), full height.
        let map = TileMapBuilder::new((5, 5), 10).unwrap().build(&[wall(20, 0, 10, 50)]);
        for y in 0..5 {
            assert!(map.is_free(Cell::new(1, y)));
            assert!(map.is_blocked(Cell::new(2, y)));
            assert!(map.is_blocked(Cell::new(3, y)), "probe at x=30 spans [25, 35)");
            assert!(map.is_free(Cell::new(4, y)));
        }
    }

    #[test]
    fn matches_brute_force_scan() {
        let obstacles = vec![
            wall(0, 0, 500, 10),
            wall(95, 40, 20, 300),
            wall(240, 240, 3, 3),
            wall(-50, 300, 60, 7),
            wall(400, 0, 0, 500),
        ];
        let map = TileMapBuilder::new((50, 50), 10).unwrap().build(&obstacles);
        let indexed: Vec<Cell> = map.blocked_cells().collect();
        assert_eq!(indexed, brute_force(&obstacles, 50, 50, 10));
    }

    #[test]
    fn build_is_deterministic() {
        let obstacles = vec![wall(13, 17, 40, 9), wall(60, 5, 11, 80)];
        let b = TileMapBuilder::new((12, 12), 10).unwrap();
        assert_eq!(b.build(&obstacles), b.build(&obstacles));
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(TileMapBuilder::new((0, 5), 10).is_err());
        assert!(TileMapBuilder::new((5, 5), 0).is_err());
        assert!(TileMapBuilder::new((5, 5), 10).unwrap().probe_size(0).is_err());
        assert!(TileMap::new(3, 0, 10).is_err());
    }

    #[test]
    fn ascii_fixture_and_bounds() {
        let map = TileMap::from_ascii(&["..#", "...", "#.."], 10).unwrap();
        assert!(map.is_blocked(Cell::new(2, 0)));
        assert!(map.is_blocked(Cell::new(0, 2)));
        assert!(map.is_free(Cell::new(1, 1)));
        assert!(map.is_blocked(Cell::new(3, 0)), "out of bounds counts as blocked");
        assert!(!map.in_bounds(Cell::new(0, 3)));
        assert!(TileMap::from_ascii(&["..", "..."], 10).is_err());
    }

    #[test]
    fn with_blocked_leaves_original_untouched() {
        let map = TileMap::new(3, 3, 10).unwrap();
        let snap = map.with_blocked([Cell::new(1, 1), Cell::new(9, 9)]);
        assert!(snap.is_blocked(Cell::new(1, 1)));
        assert!(map.is_free(Cell::new(1, 1)));
        assert_eq!(snap.blocked_count(), 1);
    }

    #[test]
    fn index_round_trip() {
        let map = TileMap::new(7, 4, 10).unwrap();
        let c = Cell::new(5, 3);
        assert_eq!(map.cell_at(map.index_of(c).unwrap()), c);
        assert_eq!(map.cell_rect(c), Rect::new(50, 30, 10, 10));
    }
}

#[cfg(test)]
mod raster {
    use cf_core::Cell;
    use image::{GrayImage, Luma};

    use crate::{
        Geometry, ModelKind, ModelTransform, Polarity, RasterOptions, TileMap, load_model,
    };

    /// 4x3 image: a dark column at x = 1, a near-threshold pixel at (3, 0).
    fn plan() -> GrayImage {
        let mut img = GrayImage::from_pixel(4, 3, Luma([255]));
        for y in 0..3 {
            img.put_pixel(1, y, Luma([0]));
        }
        img.put_pixel(3, 0, Luma([10]));
        img
    }

    #[test]
    fn dark_pixels_block_and_shape_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        plan().save(&path).unwrap();

        let geometry = load_model(&path, ModelTransform::default(), (50, 50), &RasterOptions::default())
            .unwrap();
        assert_eq!(geometry.grid_size((50, 50)), (4, 3));

        let map = geometry.build_tile_map((50, 50), 10).unwrap();
        assert_eq!(map.size(), (4, 3));
        assert!(map.is_blocked(Cell::new(1, 2)));
        assert!(map.is_blocked(Cell::new(3, 0)), "threshold is inclusive");
        assert!(map.is_free(Cell::new(0, 0)));
        assert_eq!(map.blocked_count(), 4);
    }

    #[test]
    fn inverted_polarity() {
        let opts = RasterOptions { polarity: Polarity::BrightIsBlocked, ..RasterOptions::default() };
        let mask = crate::RasterMask::from_luma(&plan(), &opts);
        let map = TileMap::from_mask(mask, 10).unwrap();
        assert_eq!(map.blocked_count(), 12 - 4);
    }

    #[test]
    fn resize_targets_grid_times_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        plan().save(&path).unwrap();
        let opts = RasterOptions { resize: true, ..RasterOptions::default() };
        let g = load_model(&path, ModelTransform::new(2.0, (0, 0)), (8, 6), &opts).unwrap();
        assert_eq!(g.grid_size((8, 6)), (16, 12));
    }

    #[test]
    fn model_kind_dispatch() {
        use std::path::Path;
        assert_eq!(ModelKind::from_path(Path::new("a/plan.SVG")).unwrap(), ModelKind::Vector);
        assert_eq!(ModelKind::from_path(Path::new("plan.png")).unwrap(), ModelKind::Raster);
        assert!(ModelKind::from_path(Path::new("plan.dwg")).is_err());
        assert!(ModelKind::from_path(Path::new("plan")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let r = load_model(
            std::path::Path::new("/definitely/not/here.svg"),
            ModelTransform::default(),
            (5, 5),
            &RasterOptions::default(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn vector_geometry_keeps_configured_size() {
        let g = Geometry::Vector(vec![]);
        assert_eq!(g.grid_size((30, 20)), (30, 20));
        assert!(g.obstacles().is_empty());
    }
}
