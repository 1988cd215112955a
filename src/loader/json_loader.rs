// src/loader/json_loader.rs
use crate::config::{LoadOptions, TypePolicy};
use crate::error::TileSetError;
use crate::properties::{Properties, PropertyValue};
use crate::raw::descriptor::{RawGrid, RawProperty, RawTile, RawTileSet};
use crate::tileset::{Grid, Size, Tile, TileId, TileImage, TileSet};
use serde_json::Value as JsonValue;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// File extensions Tiled uses for JSON tilesets.
const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "tsj"];

fn property_from_raw(
    prop: RawProperty,
    opts: &LoadOptions,
) -> Result<Option<(String, PropertyValue)>, TileSetError> {
    let RawProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::Int),
        Some("float") => value.as_f64().map(PropertyValue::Float),
        Some("string") => value.as_str().map(|s| PropertyValue::String(s.to_owned())),
        Some("file") => value.as_str().map(|s| PropertyValue::File(s.to_owned())),
        Some("color") => value.as_str().map(|s| PropertyValue::Color(s.to_owned())),
        // class values are nested objects; nothing maps onto them
        Some("class") => None,
        Some(other) => {
            if !opts.skip_unknown_property_types {
                return Err(TileSetError::UnsupportedPropertyType {
                    name,
                    kind: other.to_owned(),
                });
            }
            None
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::Int(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::Float(v))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    if parsed.is_none() {
        warn!(property = %name, kind = ?kind, value = %value, "dropping property");
    }
    Ok(parsed.map(|value| (name, value)))
}

fn properties_from_raw(
    props: Vec<RawProperty>,
    opts: &LoadOptions,
) -> Result<Properties, TileSetError> {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = property_from_raw(p, opts)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

fn properties_to_raw(props: &Properties) -> Vec<RawProperty> {
    props
        .iter()
        .map(|(name, value)| RawProperty {
            name: name.to_owned(),
            kind: Some(value.type_name().to_owned()),
            value: match value {
                PropertyValue::Bool(v) => JsonValue::from(*v),
                PropertyValue::Int(v) => JsonValue::from(*v),
                PropertyValue::Float(v) => JsonValue::from(*v),
                PropertyValue::String(s) | PropertyValue::File(s) | PropertyValue::Color(s) => {
                    JsonValue::from(s.as_str())
                }
            },
        })
        .collect()
}

/// The semantic type of a tile: `class` wins over the legacy `type` field.
fn tile_kind(tile: &RawTile) -> &str {
    if !tile.class.is_empty() {
        &tile.class
    } else {
        &tile.kind
    }
}

fn is_relative_source(source: &str) -> bool {
    let bytes = source.as_bytes();
    let drive_prefix = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    !source.is_empty()
        && !drive_prefix
        && !source.starts_with(['/', '\\'])
        && Path::new(source).is_relative()
}

fn check_schema(raw: &RawTileSet) -> Result<(), TileSetError> {
    if let Some(kind) = raw.kind.as_deref() {
        if kind != "tileset" {
            return Err(TileSetError::Schema(format!(
                "descriptor type is '{kind}', expected 'tileset'"
            )));
        }
    }
    if raw.tilewidth == 0 || raw.tileheight == 0 {
        return Err(TileSetError::Schema(format!(
            "tile size must be positive, got {}x{}",
            raw.tilewidth, raw.tileheight
        )));
    }
    if raw.tilecount as usize != raw.tiles.len() {
        return Err(TileSetError::Schema(format!(
            "tilecount is {} but {} tiles are defined",
            raw.tilecount,
            raw.tiles.len()
        )));
    }
    if let Some(tile) = raw.tiles.iter().find(|t| tile_kind(t).is_empty()) {
        return Err(TileSetError::Schema(format!("tile {} has no type", tile.id)));
    }
    Ok(())
}

fn check_unique_ids(tiles: &[RawTile]) -> Result<(), TileSetError> {
    let mut seen = HashSet::with_capacity(tiles.len());
    for tile in tiles {
        if !seen.insert(tile.id) {
            return Err(TileSetError::DuplicateId(TileId(tile.id)));
        }
    }
    Ok(())
}

fn check_dimensions(tiles: &[RawTile], grid: Size) -> Result<(), TileSetError> {
    for tile in tiles {
        let found = Size::new(tile.imagewidth, tile.imageheight);
        if found != grid {
            return Err(TileSetError::DimensionMismatch {
                id: TileId(tile.id),
                expected: grid,
                found,
            });
        }
    }
    Ok(())
}

fn check_sources(tiles: &[RawTile]) -> Result<(), TileSetError> {
    match tiles.iter().find(|t| !is_relative_source(&t.image)) {
        Some(tile) => Err(TileSetError::Schema(format!(
            "tile {} image source '{}' must be a non-empty relative path",
            tile.id, tile.image
        ))),
        None => Ok(()),
    }
}

fn check_types(tiles: &[RawTile], policy: TypePolicy) -> Result<(), TileSetError> {
    if policy == TypePolicy::Ignore {
        return Ok(());
    }
    let mut first_use: HashMap<&str, u32> = HashMap::with_capacity(tiles.len());
    for tile in tiles {
        let kind = tile_kind(tile);
        let first = match first_use.entry(kind) {
            Entry::Vacant(slot) => {
                slot.insert(tile.id);
                continue;
            }
            Entry::Occupied(slot) => *slot.get(),
        };
        match policy {
            TypePolicy::Deny => {
                return Err(TileSetError::DuplicateType {
                    kind: kind.to_owned(),
                    first: TileId(first),
                    second: TileId(tile.id),
                });
            }
            _ => warn!(kind, first, second = tile.id, "tile type is shared by several tiles"),
        }
    }
    Ok(())
}

fn tileset_from_raw(raw: RawTileSet, opts: &LoadOptions) -> Result<TileSet, TileSetError> {
    let grid_size = Size::new(raw.tilewidth, raw.tileheight);

    check_schema(&raw)?;
    check_unique_ids(&raw.tiles)?;
    check_dimensions(&raw.tiles, grid_size)?;
    check_sources(&raw.tiles)?;
    check_types(&raw.tiles, opts.duplicate_types)?;

    let mut tiles = BTreeMap::new();
    for tile in raw.tiles {
        let kind = tile_kind(&tile).to_owned();
        let id = TileId(tile.id);
        tiles.insert(
            id,
            Tile {
                id,
                kind,
                image: TileImage {
                    source: tile.image,
                    width: tile.imagewidth,
                    height: tile.imageheight,
                },
                properties: properties_from_raw(tile.properties, opts)?,
            },
        );
    }

    Ok(TileSet {
        name: raw.name,
        tile_size: grid_size,
        columns: raw.columns,
        grid: raw.grid.map(|g| Grid {
            orientation: g.orientation,
            width: g.width,
            height: g.height,
        }),
        properties: properties_from_raw(raw.properties, opts)?,
        tiles,
    })
}

/// Parse and validate a descriptor held in memory.
pub fn decode_tileset_slice(bytes: &[u8], opts: &LoadOptions) -> Result<TileSet, TileSetError> {
    let raw: RawTileSet = serde_json::from_slice(bytes)?;
    let tileset = tileset_from_raw(raw, opts)?;
    debug!(name = %tileset.name, tiles = tileset.len(), "tileset loaded");
    Ok(tileset)
}

/// Read and decode a descriptor file. The extension is checked before any I/O.
pub fn decode_tileset_file(path: &Path, opts: &LoadOptions) -> Result<TileSet, TileSetError> {
    let ext = path.extension().and_then(|e| e.to_str());
    if !ext.is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e)) {
        return Err(TileSetError::UnsupportedFormat(path.display().to_string()));
    }

    let bytes = std::fs::read(path).map_err(|source| TileSetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_tileset_slice(&bytes, opts)
}

/// Inverse of [`decode_tileset_slice`], minus the JSON text step.
pub fn encode_tileset(tileset: &TileSet) -> RawTileSet {
    RawTileSet {
        kind: Some("tileset".to_owned()),
        name: tileset.name.clone(),
        tilewidth: tileset.tile_size.width,
        tileheight: tileset.tile_size.height,
        tilecount: tileset.tiles.len() as u32,
        columns: tileset.columns,
        grid: tileset.grid.map(|g| RawGrid {
            orientation: g.orientation,
            width: g.width,
            height: g.height,
        }),
        properties: properties_to_raw(&tileset.properties),
        tiles: tileset
            .tiles
            .values()
            .map(|t| RawTile {
                id: t.id.0,
                kind: t.kind.clone(),
                class: String::new(),
                image: t.image.source.clone(),
                imagewidth: t.image.width,
                imageheight: t.image.height,
                properties: properties_to_raw(&t.properties),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_descriptor(dir: &tempfile::TempDir, file: &str, json: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, json).expect("failed to write descriptor");
        path
    }

    #[test]
    fn parses_properties_for_tileset_and_tile() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_descriptor(
            &dir,
            "tiles.tsj",
            r#"{
              "type": "tileset",
              "name": "props",
              "tilewidth": 16,
              "tileheight": 16,
              "tilecount": 1,
              "properties": [
                {"name":"is_night","type":"bool","value":true},
                {"name":"gravity","type":"float","value":9.8},
                {"name":"theme","type":"string","value":"forest"}
              ],
              "tiles": [
                {
                  "id": 0,
                  "type": "stone",
                  "image": "stone.png",
                  "imagewidth": 16,
                  "imageheight": 16,
                  "properties": [
                    {"name":"pushable","type":"bool","value":true},
                    {"name":"damage","type":"int","value":10},
                    {"name":"sound","type":"file","value":"mm_ston.wav"},
                    {"name":"untyped","value":"plain"}
                  ]
                }
              ]
            }"#,
        );

        let ts = decode_tileset_file(&path, &LoadOptions::default()).expect("decode");

        assert_eq!(ts.properties().get_bool("is_night"), Some(true));
        assert_eq!(ts.properties().get_f32("gravity"), Some(9.8));
        assert_eq!(ts.properties().get_string("theme"), Some("forest"));

        let tile = ts.tile(0u32).expect("tile 0");
        assert_eq!(tile.properties.get_bool("pushable"), Some(true));
        assert_eq!(tile.properties.get_i32("damage"), Some(10));
        assert_eq!(
            tile.properties.get("sound"),
            Some(&PropertyValue::File("mm_ston.wav".into()))
        );
        assert_eq!(tile.properties.get_string("untyped"), Some("plain"));
    }

    #[test]
    fn keeps_large_int_property_values() {
        let json = r#"{
          "name": "big",
          "tilewidth": 16,
          "tileheight": 16,
          "tilecount": 0,
          "properties": [
            {"name":"big_id","type":"object","value":5000000000}
          ]
        }"#;

        let ts = decode_tileset_slice(json.as_bytes(), &LoadOptions::default()).expect("decode");
        assert_eq!(ts.properties().get_i64("big_id"), Some(5_000_000_000));
        assert_eq!(ts.properties().get_i32("big_id"), None);
        assert!(ts.is_empty());
    }

    #[test]
    fn drops_values_that_do_not_match_their_type() {
        let json = r#"{
          "name": "mismatch",
          "tilewidth": 16,
          "tileheight": 16,
          "tilecount": 0,
          "properties": [
            {"name":"flag","type":"bool","value":"yes"},
            {"name":"shape","type":"class","value":{"w":1}}
          ]
        }"#;

        let ts = decode_tileset_slice(json.as_bytes(), &LoadOptions::default()).expect("decode");
        assert!(ts.properties().is_empty());
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_descriptor(&dir, "tiles.json", "{ not json");

        let err = decode_tileset_file(&path, &LoadOptions::default())
            .err()
            .expect("expected decode error");
        assert!(matches!(err, TileSetError::Parse(_)));
    }

    #[test]
    fn returns_typed_error_for_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.tsj");

        let err = decode_tileset_file(&path, &LoadOptions::default())
            .err()
            .expect("expected decode error");
        assert!(matches!(err, TileSetError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn returns_typed_error_for_unknown_property_type() {
        let json = r#"{
          "name": "mystery",
          "tilewidth": 16,
          "tileheight": 16,
          "tilecount": 0,
          "properties": [
            {"name":"mystery","type":"not_supported","value":"x"}
          ]
        }"#;

        let err = decode_tileset_slice(json.as_bytes(), &LoadOptions::default())
            .err()
            .expect("expected decode error");
        assert!(matches!(
            err,
            TileSetError::UnsupportedPropertyType { ref name, ref kind }
                if name == "mystery" && kind == "not_supported"
        ));

        let lenient = LoadOptions {
            skip_unknown_property_types: true,
            ..LoadOptions::default()
        };
        let ts = decode_tileset_slice(json.as_bytes(), &lenient).expect("lenient decode");
        assert!(ts.properties().is_empty());
    }

    #[test]
    fn class_field_takes_precedence_over_type() {
        let json = r#"{
          "name": "classes",
          "tilewidth": 8,
          "tileheight": 8,
          "tilecount": 2,
          "tiles": [
            {"id":0,"class":"bomb","image":"bomb.png","imagewidth":8,"imageheight":8},
            {"id":1,"type":"old","class":"box1","image":"box.png","imagewidth":8,"imageheight":8}
          ]
        }"#;

        let ts = decode_tileset_slice(json.as_bytes(), &LoadOptions::default()).expect("decode");
        assert_eq!(ts.tile(0u32).map(|t| t.kind.as_str()), Some("bomb"));
        assert_eq!(ts.tile(1u32).map(|t| t.kind.as_str()), Some("box1"));
    }

    #[test]
    fn relative_source_detection() {
        assert!(is_relative_source("Hero.png"));
        assert!(is_relative_source("../art/tiles/0-empty.png"));
        assert!(!is_relative_source(""));
        assert!(!is_relative_source("/usr/share/hero.png"));
        assert!(!is_relative_source("\\\\server\\hero.png"));
        assert!(!is_relative_source("C:\\art\\hero.png"));
    }

    #[test]
    fn encode_writes_legacy_type_field() {
        let json = r#"{
          "name": "one",
          "tilewidth": 8,
          "tileheight": 8,
          "tilecount": 1,
          "tiles": [
            {"id":3,"class":"hero","image":"Hero.png","imagewidth":8,"imageheight":8}
          ]
        }"#;

        let ts = decode_tileset_slice(json.as_bytes(), &LoadOptions::default()).expect("decode");
        let raw = encode_tileset(&ts);
        assert_eq!(raw.kind.as_deref(), Some("tileset"));
        assert_eq!(raw.tilecount, 1);
        assert_eq!(raw.tiles[0].kind, "hero");
        assert!(raw.tiles[0].class.is_empty());
    }
}
