// Wire shape of a Tiled JSON tileset (`.tsj` / `.json`).
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::tileset::Orientation;

#[derive(Debug, Deserialize, Serialize)]
pub struct RawTileSet {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>, // "tileset" expected here
    pub name: String,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<RawGrid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub tiles: Vec<RawTile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RawGrid {
    #[serde(default)]
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RawTile {
    pub id: u32,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    // Tiled >= 1.9 writes the type as "class"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub image: String,
    pub imagewidth: u32,
    pub imageheight: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: JsonValue,
}
