//! Shared fixtures for the pipeline integration tests.
//!
//! Builds dump trees shaped the way the export command writes them:
//! one JSON file per record under `dump/entries/{kind}/{site}-{id}.json`.

use std::path::Path;

use migration::layout::{write_json, DataDir};
use migration::{EntryKind, Settings, Site};
use serde_json::{json, Value};

pub fn write_dump(layout: &DataDir, kind: EntryKind, site: Site, id: u32, value: &Value) {
    write_json(&layout.dump_file(kind, site, u64::from(id)), value).unwrap();
}

/// Blog category 2, the term the baseline posts hang off.
pub fn training_category() -> Value {
    json!({
        "id": 2,
        "name": "Training",
        "slug": "training",
        "description": "All about training",
        "link": "https://www.example.com/en/blog/category/training/",
        "mlp_translations": [{"lang": "en", "category_id": 2}]
    })
}

/// A blog post in category 2 with no tags and a plain body.
pub fn blog_post(id: u32, slug: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "link": format!("https://www.example.com/en/blog/{slug}/"),
        "date_gmt": "2018-01-12T09:30:00",
        "title": {"rendered": "Deep Squats"},
        "content": {"rendered": "<p>Go deep.</p>"},
        "categories": [2],
        "tags": [],
        "yoast_meta": {"yoast_wpseo_metadesc": "About depth"},
        "mlp_translations": [{"lang": "en", "post_id": id}]
    })
}

/// The entries step insists on both asset map files being present.
pub fn empty_asset_files(layout: &DataDir) {
    write_json(&layout.assets_file(), &Vec::<Value>::new()).unwrap();
    write_json(&layout.exported_assets_file(), &Vec::<Value>::new()).unwrap();
}

pub fn base_settings() -> Settings {
    serde_json::from_value(json!({
        "source": {"lang": "en"},
        "prepare": {
            "spaces": {"codes": {"en": 3, "de": 5}},
            "authors": ["Robin Mark"]
        }
    }))
    .unwrap()
}

/// A ready-to-run `en` tree: one category, one post, empty asset maps.
pub fn seed_minimal(dir: &Path) -> DataDir {
    let layout = DataDir::new(dir, "en");
    layout.setup().unwrap();
    write_dump(
        &layout,
        EntryKind::Category,
        Site::Blog,
        2,
        &training_category(),
    );
    write_dump(
        &layout,
        EntryKind::Post,
        Site::Blog,
        42,
        &blog_post(42, "deep-squats"),
    );
    empty_asset_files(&layout);
    layout
}
