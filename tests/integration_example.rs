// tests/integration_example.rs

use std::path::PathBuf;
use tiled_tileset::{load_tileset, Orientation, TileId, TileSet};

fn mr_matt_path() -> PathBuf {
    let mut assets = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    assets.push("assets");
    assets.push("MrMatt.tsj");
    assets
}

#[test]
fn example_load_assets() {
    let tiles = load_tileset(&mr_matt_path()).expect("Example assets should load");

    assert_eq!(tiles.name(), "Mr Matt");
    assert_eq!((tiles.tile_width(), tiles.tile_height()), (32, 32));
    assert_eq!(tiles.len(), 10);
    assert_eq!(tiles.ids().collect::<Vec<_>>(), (0..10).map(TileId).collect::<Vec<_>>());
}

#[test]
fn hero_is_tile_nine() {
    let tiles = TileSet::load_from_file(mr_matt_path()).expect("load");

    assert_eq!(tiles[9u32].kind, "hero");
    assert_eq!(tiles[9u32].image.source, "Hero.png");
    assert_eq!(tiles.tile_by_type("hero").map(|t| t.id), Some(TileId(9)));
}

#[test]
fn every_type_is_present_once() {
    let tiles = TileSet::load_from_file(mr_matt_path()).expect("load");
    let types = [
        "empty", "grass", "brick", "stone", "food", "box1", "box2", "box3", "bomb", "hero",
    ];

    for (id, kind) in types.iter().enumerate() {
        let tile = tiles.tile(id as u32).expect("tile");
        assert_eq!(tile.kind, *kind);
        assert_eq!(tiles.tiles_of_type(kind).count(), 1);
    }
    assert_eq!(tiles[2u32].image.source, "2-wall.png");
}

#[test]
fn grid_settings_are_kept() {
    let tiles = TileSet::load_from_file(mr_matt_path()).expect("load");
    let grid = tiles.grid().expect("grid");

    assert_eq!(grid.orientation, Orientation::Orthogonal);
    assert_eq!((grid.width, grid.height), (1, 1));
    assert_eq!(tiles.columns(), 0);
}

#[test]
fn image_paths_resolve_next_to_descriptor() {
    let path = mr_matt_path();
    let dir = path.parent().expect("assets dir");
    let tiles = TileSet::load_from_file(&path).expect("load");

    assert_eq!(tiles.image_path(9u32, dir), Some(dir.join("Hero.png")));
}
