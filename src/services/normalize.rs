use serde_json::Value;

use crate::models::{EntityKind, EntityProperties, ExternalEntity, ExternalRefs, ImageRef};

/// Candidate locations per logical attribute, tried in order. Each path
/// is a key chain walked from the record root; the first present,
/// non-null value wins.
const IMAGE_PATHS: &[&[&str]] = &[
    &["image_url"],
    &["image"],
    &["cover_image"],
    &["properties", "image", "url"],
];
const SHORT_DESCRIPTION_PATHS: &[&[&str]] =
    &[&["short_description"], &["properties", "short_description"]];
const DESCRIPTION_PATHS: &[&[&str]] = &[&["description"], &["properties", "description"]];
const PUBLICATION_YEAR_PATHS: &[&[&str]] =
    &[&["publication_year"], &["properties", "publication_year"]];
const PUBLICATION_DATE_PATHS: &[&[&str]] =
    &[&["publication_date"], &["properties", "publication_date"]];
const GENRE_PATHS: &[&[&str]] = &[&["genre"], &["properties", "genre"]];
const PAGE_COUNT_PATHS: &[&[&str]] = &[&["page_count"], &["properties", "page_count"]];
const LANGUAGE_PATHS: &[&[&str]] = &[&["language"], &["properties", "language"]];
const PUBLISHER_PATHS: &[&[&str]] = &[&["publisher"], &["properties", "publisher"]];
const ISBN13_PATHS: &[&[&str]] = &[&["isbn13"], &["properties", "isbn13"]];
const FORMAT_PATHS: &[&[&str]] = &[&["format"], &["properties", "format"]];
const GOODREADS_PATHS: &[&[&str]] = &[&["goodreads_id"], &["external", "goodreads"]];

/// Walk `paths` in order, returning the first present, non-null value
fn lookup(record: &Value, paths: &[&[&str]]) -> Option<Value> {
    for path in paths {
        let mut cursor = record;
        let mut found = true;
        for key in *path {
            match cursor.get(key) {
                Some(next) => cursor = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found && !cursor.is_null() {
            return Some(cursor.clone());
        }
    }
    None
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|value| !value.is_null()).cloned()
}

/// Flatten one upstream record into the canonical entity shape.
///
/// Total over arbitrary input: a record missing every field still
/// produces a full entity with null attributes and `fallback_name` as
/// its name.
pub fn normalize(record: &Value, kind: EntityKind, fallback_name: &str) -> ExternalEntity {
    let image = lookup(record, IMAGE_PATHS);
    let goodreads = lookup(record, GOODREADS_PATHS);

    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(fallback_name)
        .to_string();

    ExternalEntity {
        entity_id: record
            .get("entity_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        name,
        kind,
        image: image.clone(),
        image_url: image.clone(),
        rating: non_null(record.get("rating")),
        rating_count: non_null(record.get("rating_count")),
        author: non_null(record.get("author")),
        properties: EntityProperties {
            short_description: lookup(record, SHORT_DESCRIPTION_PATHS),
            description: lookup(record, DESCRIPTION_PATHS),
            publication_year: lookup(record, PUBLICATION_YEAR_PATHS),
            publication_date: lookup(record, PUBLICATION_DATE_PATHS),
            genre: lookup(record, GENRE_PATHS),
            page_count: lookup(record, PAGE_COUNT_PATHS),
            language: lookup(record, LANGUAGE_PATHS),
            publisher: lookup(record, PUBLISHER_PATHS),
            isbn13: lookup(record, ISBN13_PATHS),
            format: lookup(record, FORMAT_PATHS),
            image: image.map(|url| ImageRef { url }),
        },
        external: goodreads.map(|goodreads| ExternalRefs { goodreads }),
    }
}

/// Normalize a batch of records, keeping input order.
///
/// The output shape always carries a name, and batches have no query
/// string to fall back on, so a record lacking one gets the empty
/// string.
pub fn normalize_all(records: &[Value], kind: EntityKind) -> Vec<ExternalEntity> {
    records
        .iter()
        .map(|record| normalize(record, kind, ""))
        .collect()
}
