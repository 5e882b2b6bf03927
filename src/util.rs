use geo::{geometry::Coord, Rect};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;

use crate::GeocodeResult;

/// Merge an iterator of bboxes to a single bbox.
pub fn merge_bbox_iter<I>(iter: I) -> Option<Rect<f64>>
where
    I: Iterator<Item = Rect<f64>>,
{
    fold_first(iter, merge_bboxes)
}

/// Perform a fold over an iterator, where the initial accumulator value is equal to the first
/// iterator value.
///
/// May yield a `None` when the iterator yields no value.
pub fn fold_first<I, X, F>(mut iter: I, func: F) -> Option<X>
where
    I: Iterator<Item = X>,
    F: FnMut(X, X) -> X,
{
    let first = iter.next()?;
    Some(iter.fold(first, func))
}

/// Merge two bboxes to a single bbox.
pub fn merge_bboxes(acc: Rect<f64>, r: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: acc.min().x.min(r.min().x),
            y: acc.min().y.min(r.min().y),
        },
        Coord {
            x: acc.max().x.max(r.max().x),
            y: acc.max().y.max(r.max().y),
        },
    )
}

/// The common extent of all results that carry a usable bounding box.
pub fn results_bbox(results: &[GeocodeResult]) -> Option<Rect<f64>> {
    merge_bbox_iter(results.iter().filter_map(GeocodeResult::bounding_rect))
}

/// Turn results into a feature collection of points, keeping the descriptive
/// fields as properties. Results without usable coordinates are skipped.
pub fn results_to_geojson(results: &[GeocodeResult]) -> geojson::GeoJson {
    let features = results
        .iter()
        .filter_map(|result| {
            let point = result.point()?;
            let geometry = Geometry::new(geojson::Value::from(&point));

            let mut properties = JsonObject::new();
            properties.insert("place_id".to_string(), json!(result.place_id));
            properties.insert("display_name".to_string(), json!(result.display_name));
            properties.insert("class".to_string(), json!(result.class));
            properties.insert("type".to_string(), json!(result.place_type));
            properties.insert("importance".to_string(), json!(result.importance));

            Some(Feature {
                bbox: result
                    .bounding_rect()
                    .map(|r| vec![r.min().x, r.min().y, r.max().x, r.max().y]),
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: results_bbox(results).map(|r| vec![r.min().x, r.min().y, r.max().x, r.max().y]),
        features,
        foreign_members: None,
    }
    .into()
}
