//! Content model pushed into a freshly created space.

use serde_json::{json, Value};

fn symbol_field(id: &str, name: &str, required: bool, unique: bool) -> Value {
    let validations = if unique {
        json!([{"unique": true}])
    } else {
        json!([])
    };
    json!({
        "id": id,
        "name": name,
        "type": "Symbol",
        "localized": false,
        "required": required,
        "validations": validations,
        "disabled": false,
        "omitted": false
    })
}

fn text_field(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Text",
        "localized": false,
        "required": true,
        "validations": [],
        "disabled": false,
        "omitted": false
    })
}

fn date_field(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Date",
        "localized": false,
        "required": true,
        "validations": [],
        "disabled": false,
        "omitted": false
    })
}

fn entry_link_field(id: &str, name: &str, target: &str, required: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Link",
        "localized": false,
        "required": required,
        "validations": [{"linkContentType": [target]}],
        "disabled": false,
        "omitted": false,
        "linkType": "Entry"
    })
}

fn asset_link_field(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Link",
        "localized": false,
        "required": false,
        "validations": [{"linkMimetypeGroup": ["image"]}],
        "disabled": false,
        "omitted": false,
        "linkType": "Asset"
    })
}

fn entry_links_field(id: &str, name: &str, target: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Array",
        "localized": false,
        "required": false,
        "validations": [],
        "disabled": false,
        "omitted": false,
        "items": {
            "type": "Link",
            "linkType": "Entry",
            "validations": [{"linkContentType": [target]}]
        }
    })
}

fn content_type(space_id: &str, id: &str, name: &str, display: &str, fields: Value) -> Value {
    json!({
        "sys": {
            "space": {
                "sys": {"type": "Link", "linkType": "Space", "id": space_id}
            },
            "id": id,
            "type": "ContentType",
            "publishedVersion": 1
        },
        "displayField": display,
        "name": name,
        "description": "",
        "fields": fields
    })
}

/// The four content types every space gets on creation.
pub fn content_types(space_id: &str) -> Vec<Value> {
    vec![
        content_type(
            space_id,
            "post",
            "Post",
            "title",
            json!([
                symbol_field("postId", "ID", true, true),
                symbol_field("title", "Title", true, false),
                symbol_field("slug", "Slug", true, false),
                symbol_field("description", "Description", false, false),
                asset_link_field("featuredImage", "Featured Image"),
                text_field("body", "Body"),
                entry_link_field("author", "Author", "author", true),
                entry_link_field("category", "Category", "category", false),
                entry_links_field("tags", "Tags", "tag"),
                date_field("publishedOn", "Published On"),
            ]),
        ),
        content_type(
            space_id,
            "category",
            "Category",
            "name",
            json!([
                symbol_field("categoryId", "ID", true, true),
                symbol_field("name", "Name", false, false),
                symbol_field("slug", "Slug", false, false),
                symbol_field("description", "Description", false, false),
            ]),
        ),
        content_type(
            space_id,
            "tag",
            "Tag",
            "name",
            json!([
                symbol_field("tagId", "ID", true, true),
                symbol_field("name", "Name", false, false),
                symbol_field("slug", "Slug", false, false),
            ]),
        ),
        content_type(
            space_id,
            "author",
            "Author",
            "name",
            json!([
                symbol_field("authorId", "ID", true, true),
                symbol_field("name", "Name", true, false),
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_all_four_types() {
        let types = content_types("space-1");
        let ids: Vec<&str> = types
            .iter()
            .map(|t| t["sys"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["post", "category", "tag", "author"]);
    }

    #[test]
    fn post_fields_match_the_compiled_payloads() {
        let types = content_types("space-1");
        let post = &types[0];
        let field_ids: Vec<&str> = post["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_str().unwrap())
            .collect();
        assert_eq!(
            field_ids,
            vec![
                "postId",
                "title",
                "slug",
                "description",
                "featuredImage",
                "body",
                "author",
                "category",
                "tags",
                "publishedOn"
            ]
        );
        assert_eq!(post["sys"]["space"]["sys"]["id"], "space-1");
        assert_eq!(post["displayField"], "title");
    }

    #[test]
    fn post_id_is_unique_validated() {
        let types = content_types("space-1");
        let post_id = &types[0]["fields"][0];
        assert_eq!(post_id["validations"][0]["unique"], true);
    }
}
