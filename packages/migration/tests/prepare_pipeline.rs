//! End-to-end prepare runs over on-disk fixture trees.
//!
//! Drives the real file handoffs: dumped records through `prepare
//! assets`, a simulated asset import, then `prepare entries`.

mod common;

use common::*;
use migration::layout::{read_json, write_json, DataDir};
use migration::{asset_id, prepare_assets, prepare_entries, EntryKind, Settings, Site};
use serde_json::{json, Value};

#[test]
fn full_prepare_round_compiles_both_sites() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataDir::new(dir.path(), "en");
    layout.setup().unwrap();

    let settings_file = dir.path().join("settings.json");
    write_json(
        &settings_file,
        &json!({
            "source": {"lang": "en"},
            "prepare": {
                "spaces": {"codes": {"en": 3, "de": 5}},
                "remap": {"categories": {"80": 2}, "tags": {"9": 4}},
                "authors": ["Robin Mark"]
            }
        }),
    )
    .unwrap();
    let settings = Settings::load(&settings_file).unwrap();

    write_dump(
        &layout,
        EntryKind::Category,
        Site::Blog,
        2,
        &training_category(),
    );
    write_dump(
        &layout,
        EntryKind::Category,
        Site::Knowledge,
        80,
        &json!({
            "id": 80,
            "name": "Nutrition",
            "slug": "nutrition",
            "link": "https://www.example.com/en/knowledge/category/nutrition/",
            "mlp_translations": [{"lang": "en", "category_id": 80}]
        }),
    );
    write_dump(
        &layout,
        EntryKind::Tag,
        Site::Blog,
        4,
        &json!({
            "id": 4,
            "name": "Squats",
            "slug": "squats",
            "mlp_translations": [{"lang": "en", "tag_id": 4}]
        }),
    );
    write_dump(
        &layout,
        EntryKind::Tag,
        Site::Knowledge,
        9,
        &json!({
            "id": 9,
            "name": "Protein",
            "slug": "protein",
            "mlp_translations": [{"lang": "en", "tag_id": 9}]
        }),
    );

    let mut squats = blog_post(42, "deep-squats");
    squats["tags"] = json!([4]);
    squats["content"]["rendered"] = json!(
        "<p><img src=\"https://www.example.com/en/wp-content/uploads/sites/9/squat.jpg\"> Go deep.</p>"
    );
    squats["featured_media_url"] =
        json!("https://www.example.com/en/wp-content/uploads/sites/9/squat.jpg");
    write_dump(&layout, EntryKind::Post, Site::Blog, 42, &squats);

    write_dump(
        &layout,
        EntryKind::Post,
        Site::Knowledge,
        91,
        &json!({
            "id": 91,
            "slug": "whey-guide",
            "link": "https://www.example.com/en/knowledge/whey-guide/",
            "date_gmt": "2018-02-03T10:00:00",
            "title": {"rendered": "The Whey Guide"},
            "content": {"rendered": ""},
            "custom_fields_content":
                "<p><img src=\"https://www.example.com/en/wp-content/uploads/sites/2/whey.png\"></p>",
            "categories": [80],
            "tags": [9],
            "yoast_meta": {"yoast_wpseo_metadesc": "All about whey"},
            "mlp_translations": [{"lang": "en", "post_id": 91}]
        }),
    );

    let asset_summary = prepare_assets(&layout, "en", "https://www.example.com").unwrap();
    assert_eq!(asset_summary.posts, 2);
    assert_eq!(asset_summary.assets, 2);

    // Pretend the assets were imported: same ids, destination URLs.
    let mut exported: Vec<Value> = read_json(&layout.assets_file()).unwrap();
    for asset in &mut exported {
        let name = asset["fields"]["file"]["en"]["fileName"]
            .as_str()
            .unwrap()
            .to_string();
        asset["fields"]["file"]["en"]["url"] =
            json!(format!("//images.ctfassets.net/sp4c3/{name}"));
    }
    write_json(&layout.exported_assets_file(), &exported).unwrap();

    let summary = prepare_entries(&settings, &layout, "en", "https://www.example.com").unwrap();
    assert_eq!(summary.authors, 1);
    assert_eq!(summary.categories, 1);
    assert_eq!(summary.tags, 1);
    assert_eq!(summary.posts, 2);
    assert_eq!(summary.orphaned, 0);
    assert!(summary.unresolved_assets.is_empty());

    let entries: Vec<Value> = read_json(&layout.entries_file()).unwrap();
    let content_types: Vec<&str> = entries
        .iter()
        .map(|e| e["sys"]["contentType"]["sys"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        content_types,
        vec!["author", "category", "tag", "post", "post"]
    );

    let category_sys_id = &entries[1]["sys"]["id"];
    let tag_sys_id = &entries[2]["sys"]["id"];
    let squats_entry = &entries[3];
    let whey_entry = &entries[4];

    assert_eq!(squats_entry["fields"]["postId"]["en"], "03100042");
    assert_eq!(whey_entry["fields"]["postId"]["en"], "03000091");

    // Both sites link the same compiled blog taxonomy.
    assert_eq!(
        &squats_entry["fields"]["category"]["en"]["sys"]["id"],
        category_sys_id
    );
    assert_eq!(
        &whey_entry["fields"]["category"]["en"]["sys"]["id"],
        category_sys_id
    );
    assert_eq!(
        &squats_entry["fields"]["tags"]["en"][0]["sys"]["id"],
        tag_sys_id
    );
    assert_eq!(
        &whey_entry["fields"]["tags"]["en"][0]["sys"]["id"],
        tag_sys_id
    );

    // Bodies point at the destination CDN, with the resize suffix.
    let body = squats_entry["fields"]["body"]["en"].as_str().unwrap();
    assert!(
        body.contains("//images.ctfassets.net/sp4c3/squat.jpg?w=1232&fm=jpg&q=76&fl=progressive")
    );
    let body = whey_entry["fields"]["body"]["en"].as_str().unwrap();
    assert!(
        body.contains("//images.ctfassets.net/sp4c3/whey.png?w=1232&fm=jpg&q=76&fl=progressive")
    );

    assert_eq!(
        squats_entry["fields"]["featuredImage"]["en"]["sys"]["id"],
        asset_id("//cdn.example.com/en/wp-content/uploads/sites/9/squat.jpg")
    );

    let csv = std::fs::read_to_string(layout.rewrite_file()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "old,new",
            "https://www.example.com/en/blog/category/training/,\
             https://www.example.com/en/blog/categories/training/",
            "https://www.example.com/en/blog/deep-squats/,\
             https://www.example.com/en/blog/posts/deep-squats/",
            "https://www.example.com/en/knowledge/whey-guide/,\
             https://www.example.com/en/blog/posts/whey-guide/",
        ]
    );
}

#[test]
fn excluded_category_and_its_posts_never_reach_the_payload() {
    let dir = tempfile::tempdir().unwrap();
    let layout = seed_minimal(dir.path());

    write_dump(
        &layout,
        EntryKind::Category,
        Site::Blog,
        19,
        &json!({
            "id": 19,
            "name": "Internal",
            "slug": "internal",
            "link": "https://www.example.com/en/blog/category/internal/",
            "mlp_translations": [{"lang": "en", "category_id": 19}]
        }),
    );
    let mut hidden = blog_post(50, "quarterly-report");
    hidden["categories"] = json!([19]);
    write_dump(&layout, EntryKind::Post, Site::Blog, 50, &hidden);

    let settings: Settings = serde_json::from_value(json!({
        "source": {"lang": "en"},
        "prepare": {
            "spaces": {"codes": {"en": 3}},
            "exclude": {"categories": {"blog": {"en": [19]}}},
            "authors": ["Robin Mark"]
        }
    }))
    .unwrap();

    let summary = prepare_entries(&settings, &layout, "en", "https://www.example.com").unwrap();
    assert_eq!(summary.categories, 1);
    assert_eq!(summary.posts, 1);

    let entries: Vec<Value> = read_json(&layout.entries_file()).unwrap();
    let names: Vec<&str> = entries
        .iter()
        .filter(|e| e["sys"]["contentType"]["sys"]["id"] == "category")
        .map(|e| e["fields"]["name"]["en"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Training"]);

    // Zero tags still serialize as an empty list.
    let post = entries.last().unwrap();
    assert_eq!(post["fields"]["tags"]["en"], json!([]));

    let csv = std::fs::read_to_string(layout.rewrite_file()).unwrap();
    assert!(!csv.contains("internal"));
    assert!(!csv.contains("quarterly-report"));
}

#[test]
fn translated_and_orphaned_posts_mix_in_one_run() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataDir::new(dir.path(), "de");
    layout.setup().unwrap();

    write_dump(
        &layout,
        EntryKind::Category,
        Site::Blog,
        12,
        &json!({
            "id": 12,
            "name": "Training",
            "slug": "training-de",
            "link": "https://www.example.com/de/blog/category/training-de/",
            "mlp_translations": [
                {"lang": "en", "category_id": 2},
                {"lang": "de", "category_id": 12}
            ]
        }),
    );

    let mut linked = blog_post(77, "tiefe-kniebeugen");
    linked["categories"] = json!([12]);
    linked["mlp_translations"] = json!([{"lang": "en", "post_id": 42}]);
    write_dump(&layout, EntryKind::Post, Site::Blog, 77, &linked);

    let mut orphan = blog_post(78, "nur-deutsch");
    orphan["categories"] = json!([12]);
    orphan["mlp_translations"] = json!([]);
    write_dump(&layout, EntryKind::Post, Site::Blog, 78, &orphan);

    empty_asset_files(&layout);

    let summary =
        prepare_entries(&base_settings(), &layout, "de", "https://www.example.com").unwrap();
    assert_eq!(summary.posts, 2);
    assert_eq!(summary.orphaned, 1);

    let entries: Vec<Value> = read_json(&layout.entries_file()).unwrap();
    let post_ids: Vec<&str> = entries
        .iter()
        .filter(|e| e["sys"]["contentType"]["sys"]["id"] == "post")
        .map(|e| e["fields"]["postId"]["de"].as_str().unwrap())
        .collect();
    // The linked post adopts the en id, the orphan keeps its own.
    assert_eq!(post_ids, vec!["03100042", "05100078"]);
}
