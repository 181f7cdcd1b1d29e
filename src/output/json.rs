use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::atlas::Packer;
use crate::error::PackerError;
use crate::output::page_png_filename;
use crate::sprite::Entry;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    pages: Vec<JsonPage>,
    /// Sprites without visible pixels, not placed on any page
    empty: Vec<JsonEmpty>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
    padding: u32,
    spacing: u32,
}

#[derive(Serialize)]
struct JsonPage {
    image: String,
    size: Size,
    sprites: Vec<JsonSprite>,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSprite {
    name: String,
    id: u64,
    frame: Frame,
    trimmed: bool,
    sprite_source_size: Frame,
    source_size: Size,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEmpty {
    name: String,
    id: u64,
    source_size: Size,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write `<base_name>.json` describing the packed pages.
///
/// `names[i]` labels the i-th registered entry; missing names fall back to
/// the entry id.
pub fn write_json(
    packer: &Packer,
    names: &[String],
    output_dir: &Path,
    base_name: &str,
) -> Result<()> {
    let content = render_json(packer, names, base_name)?;

    let json_path = output_dir.join(format!("{}.json", base_name));
    fs::write(&json_path, content).map_err(|e| PackerError::OutputWrite {
        path: json_path,
        source: e,
    })?;

    Ok(())
}

fn render_json(packer: &Packer, names: &[String], base_name: &str) -> Result<String> {
    let total = packer.pages().len();
    let name_of = |index: usize, entry: &Entry| {
        names
            .get(index)
            .cloned()
            .unwrap_or_else(|| entry.id.to_string())
    };

    let pages = packer
        .pages()
        .iter()
        .map(|page| {
            let sprites = packer
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, e)| !e.empty && e.page == Some(page.index))
                .map(|(i, e)| sprite_to_json(name_of(i, e), e))
                .collect();

            JsonPage {
                image: page_png_filename(base_name, page.index, total),
                size: Size {
                    w: page.width,
                    h: page.height,
                },
                sprites,
            }
        })
        .collect();

    let empty = packer
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.empty)
        .map(|(i, e)| JsonEmpty {
            name: name_of(i, e),
            id: e.id,
            source_size: Size {
                w: e.frame.width,
                h: e.frame.height,
            },
        })
        .collect();

    let config = packer.config();
    let output = JsonOutput {
        meta: Meta {
            app: "atlaspack",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
            padding: config.padding,
            spacing: config.spacing,
        },
        pages,
        empty,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn sprite_to_json(name: String, entry: &Entry) -> JsonSprite {
    JsonSprite {
        name,
        id: entry.id,
        frame: Frame {
            x: entry.packed.x,
            y: entry.packed.y,
            w: entry.packed.width,
            h: entry.packed.height,
        },
        trimmed: entry.is_trimmed(),
        sprite_source_size: Frame {
            x: entry.frame.x,
            y: entry.frame.y,
            w: entry.packed.width,
            h: entry.packed.height,
        },
        source_size: Size {
            w: entry.frame.width,
            h: entry.frame.height,
        },
    }
}
