use geo::{geometry::Coord, Point, Rect};
use serde::{Deserialize, Deserializer, Serialize};

/// One match as returned by the service.
///
/// Coordinates and bounds are kept as the strings the service sends, so no
/// precision is lost; use [`GeocodeResult::point`] and
/// [`GeocodeResult::bounding_rect`] to get numeric values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GeocodeResult {
    #[serde(deserialize_with = "null_default")]
    pub place_id: u64,
    #[serde(deserialize_with = "null_default")]
    pub licence: String,
    #[serde(deserialize_with = "null_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_default")]
    pub osm_id: u64,
    /// South, north, west and east bounds
    #[serde(deserialize_with = "null_default")]
    pub boundingbox: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_default")]
    pub lon: String,
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub class: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub place_type: String,
    #[serde(deserialize_with = "null_default")]
    pub importance: f64,
    /// Only filled in by reverse lookups
    #[serde(deserialize_with = "null_default")]
    pub address: Address,
}

impl GeocodeResult {
    /// The location as a point with the longitude in x and the latitude in y.
    pub fn point(&self) -> Option<Point<f64>> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lon = self.lon.parse::<f64>().ok()?;
        Some(Point::new(lon, lat))
    }

    /// The bounding box, with the longitude in x and the latitude in y.
    ///
    /// `None` unless all four bounds are present and numeric.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let bounds = self
            .boundingbox
            .iter()
            .map(|b| b.parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()?;

        match bounds[..] {
            [south, north, west, east] => Some(Rect::new(
                Coord { x: west, y: south },
                Coord { x: east, y: north },
            )),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "null_default")]
    pub house_number: String,
    #[serde(deserialize_with = "null_default")]
    pub road: String,
    #[serde(deserialize_with = "null_default")]
    pub neighbourhood: String,
    #[serde(deserialize_with = "null_default")]
    pub suburb: String,
    #[serde(deserialize_with = "null_default")]
    pub county: String,
    #[serde(deserialize_with = "null_default")]
    pub city: String,
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    #[serde(rename = "ISO3166-2-lvl4", deserialize_with = "null_default")]
    pub iso3166_2_lvl4: String,
    #[serde(deserialize_with = "null_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_default")]
    pub country: String,
    #[serde(deserialize_with = "null_default")]
    pub country_code: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        *self == Address::default()
    }
}

/// Read an explicit `null` as the default value, like a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod test {
    use super::*;

    const FORWARD_BODY: &str = r#"[{"place_id":319634989,"licence":"Data © OpenStreetMap contributors, ODbL 1.0. https://osm.org/copyright","osm_type":"node","osm_id":1000793154,"boundingbox":["40.7557728","40.7558728","-73.9788465","-73.9787465"],"lat":"40.7558228","lon":"-73.9787965","display_name":"Barnes & Noble, 555, 5th Avenue, Midtown East, Manhattan, New York County, New York, 10017, United States","class":"shop","type":"books","importance":0.62001},{"place_id":319634907,"licence":"Data © OpenStreetMap contributors, ODbL 1.0. https://osm.org/copyright","osm_type":"node","osm_id":2716012085,"boundingbox":["40.7557517","40.7558517","-73.9787914","-73.9786914"],"lat":"40.7558017","lon":"-73.9787414","display_name":"555, 5th Avenue, Midtown East, Manhattan, New York County, New York, 10017, United States","class":"place","type":"house","importance":0.62001}]"#;

    const REVERSE_BODY: &str = r#"{"place_id":2716012085,"licence":"Data © OpenStreetMap contributors, ODbL 1.0. https://osm.org/copyright","osm_type":"node","osm_id":2716012085,"lat":"40.7558017","lon":"-73.9787414","display_name":"555, 5th Avenue, Midtown East, Manhattan, New York County, New York, 10017, United States","address":{"house_number":"555","road":"5th Avenue","neighbourhood":"Midtown East","suburb":"Manhattan","county":"New York County","city":"New York","state":"New York","ISO3166-2-lvl4":"US-NY","postcode":"10017","country":"United States","country_code":"us"},"boundingbox":["40.7557517","40.7558517","-73.9787914","-73.9786914"]}"#;

    #[test]
    fn test_decode_forward() {
        let results: Vec<GeocodeResult> = serde_json::from_str(FORWARD_BODY).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].place_id, 319634989);
        assert_eq!(results[0].place_type, "books");
        assert_eq!(results[1].osm_id, 2716012085);
        assert_eq!(results[1].lat, "40.7558017");
        assert!(results.iter().all(|r| r.address.is_empty()));
    }

    #[test]
    fn test_decode_reverse() {
        let result: GeocodeResult = serde_json::from_str(REVERSE_BODY).unwrap();

        assert_eq!(result.place_id, 2716012085);
        assert!(result.display_name.contains("5th Avenue"));
        assert_eq!(result.address.postcode, "10017");
        assert_eq!(result.address.iso3166_2_lvl4, "US-NY");
        assert_eq!(result.address.country_code, "us");
        // reverse bodies carry no classification
        assert_eq!(result.class, "");
        assert_eq!(result.importance, 0.0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let body = r#"{"place_id":1,"lat":"1.0","lon":"2.0","extratags":{"surface":"asphalt"},"address":{"road":"A","town":"B"}}"#;
        let result: GeocodeResult = serde_json::from_str(body).unwrap();

        assert_eq!(result.place_id, 1);
        assert_eq!(result.address.road, "A");
        assert_eq!(result.address.city, "");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let body = r#"{"place_id":1,"licence":null,"osm_id":null,"boundingbox":null,"lat":"1","lon":"2","type":null,"importance":null,"address":{"road":null,"ISO3166-2-lvl4":null,"postcode":"10017"}}"#;
        let result: GeocodeResult = serde_json::from_str(body).unwrap();

        assert_eq!(result.place_id, 1);
        assert_eq!(result.licence, "");
        assert_eq!(result.osm_id, 0);
        assert!(result.boundingbox.is_empty());
        assert_eq!(result.place_type, "");
        assert_eq!(result.importance, 0.0);
        assert_eq!(result.address.road, "");
        assert_eq!(result.address.iso3166_2_lvl4, "");
        assert_eq!(result.address.postcode, "10017");
    }

    #[test]
    fn test_null_address_is_empty() {
        let result: GeocodeResult =
            serde_json::from_str(r#"{"place_id":3,"address":null}"#).unwrap();

        assert!(result.address.is_empty());
    }

    #[test]
    fn test_roundtrip_preserves_string_coordinates() {
        let body = r#"{"place_id":7,"lat":"40.75580170000000001","lon":"-73.978741400","boundingbox":["1.10","2.20","3.30","4.40"],"importance":0.1234567890123,"address":{"ISO3166-2-lvl4":"US-NY"}}"#;
        let decoded: GeocodeResult = serde_json::from_str(body).unwrap();

        let encoded = serde_json::to_string(&decoded).unwrap();
        assert!(encoded.contains(r#""lat":"40.75580170000000001""#));
        assert!(encoded.contains(r#""lon":"-73.978741400""#));
        assert!(encoded.contains(r#""ISO3166-2-lvl4":"US-NY""#));
        assert!(encoded.contains(r#""type":"""#));

        let again: GeocodeResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(again, decoded);
    }

    #[test]
    fn test_roundtrip_reverse() {
        let decoded: GeocodeResult = serde_json::from_str(REVERSE_BODY).unwrap();
        let again: GeocodeResult =
            serde_json::from_str(&serde_json::to_string(&decoded).unwrap()).unwrap();

        assert_eq!(again, decoded);
    }

    #[test]
    fn test_point_and_bounds() {
        let results: Vec<GeocodeResult> = serde_json::from_str(FORWARD_BODY).unwrap();
        let point = results[1].point().unwrap();
        assert_eq!(point.x(), -73.9787414);
        assert_eq!(point.y(), 40.7558017);

        let rect = results[1].bounding_rect().unwrap();
        assert_eq!(rect.min(), Coord { x: -73.9787914, y: 40.7557517 });
        assert_eq!(rect.max(), Coord { x: -73.9786914, y: 40.7558517 });
    }

    #[test]
    fn test_unparseable_geometry() {
        let result = GeocodeResult {
            lat: "north".to_string(),
            lon: "1".to_string(),
            boundingbox: vec!["1".to_string(), "2".to_string()],
            ..Default::default()
        };

        assert!(result.point().is_none());
        assert!(result.bounding_rect().is_none());
    }
}
