//! DTOs for decoding provider reverse-geocoding responses.
//!
//! Each adapter decodes into its transport DTO first, then maps into a
//! domain [`GeocodeResult`] in one pass.

use serde::Deserialize;

use super::lenient::{object_or_default, string_or_first};
use crate::domain::infer_road_category;
use crate::domain::highway::GENERIC_ROAD_CATEGORY;
use crate::domain::ports::{GeocodeResult, GeocoderError};

const AMAP_SUCCESS_STATUS: &str = "1";

#[derive(Debug, Deserialize)]
pub(super) struct NominatimReverseDto {
    #[serde(default)]
    pub(super) address: NominatimAddressDto,
    pub(super) category: Option<String>,
    #[serde(rename = "type")]
    pub(super) place_type: Option<String>,
    pub(super) error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct NominatimAddressDto {
    pub(super) city: Option<String>,
    pub(super) county: Option<String>,
    pub(super) state: Option<String>,
    pub(super) road: Option<String>,
}

impl NominatimReverseDto {
    pub(super) fn into_domain(self) -> Result<GeocodeResult, GeocoderError> {
        if let Some(message) = self.error {
            return Err(GeocoderError::provider(format!("nominatim error: {message}")));
        }
        let NominatimAddressDto {
            city,
            county,
            state,
            road,
        } = self.address;

        let city = [city, county, state]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default();
        let category = self
            .place_type
            .filter(|value| !value.is_empty())
            .or(self.category)
            .unwrap_or_default();

        Ok(GeocodeResult {
            city,
            road: road.unwrap_or_default(),
            category,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AMapRegeoDto {
    #[serde(default)]
    pub(super) status: String,
    #[serde(default)]
    pub(super) info: String,
    #[serde(default, deserialize_with = "object_or_default")]
    pub(super) regeocode: AMapRegeocodeDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AMapRegeocodeDto {
    #[serde(
        rename = "addressComponent",
        default,
        deserialize_with = "object_or_default"
    )]
    pub(super) address_component: AMapAddressComponentDto,
    #[serde(default)]
    pub(super) roads: Vec<AMapRoadDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AMapAddressComponentDto {
    #[serde(default, deserialize_with = "string_or_first")]
    pub(super) province: String,
    #[serde(default, deserialize_with = "string_or_first")]
    pub(super) city: String,
    #[serde(
        rename = "streetNumber",
        default,
        deserialize_with = "object_or_default"
    )]
    pub(super) street_number: AMapStreetNumberDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AMapStreetNumberDto {
    #[serde(default, deserialize_with = "string_or_first")]
    pub(super) street: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AMapRoadDto {
    #[serde(default, deserialize_with = "string_or_first")]
    pub(super) name: String,
}

impl AMapRegeoDto {
    pub(super) fn into_domain(self) -> Result<GeocodeResult, GeocoderError> {
        if self.status != AMAP_SUCCESS_STATUS {
            return Err(GeocoderError::provider(format!("amap api error: {}", self.info)));
        }
        let AMapRegeocodeDto {
            address_component,
            roads,
        } = self.regeocode;

        let city = if address_component.city.is_empty() {
            address_component.province
        } else {
            address_component.city
        };

        let nearest_road = roads.into_iter().next().map(|road| road.name);
        let has_roads = nearest_road.is_some();
        let road = nearest_road
            .filter(|name| !name.is_empty())
            .unwrap_or(address_component.street_number.street);

        // Category is only inferred when AMap returned road records.
        let category = if has_roads {
            infer_road_category(&road)
        } else {
            GENERIC_ROAD_CATEGORY
        };

        Ok(GeocodeResult {
            city,
            road,
            category: category.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage for provider DTOs.

    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn nominatim(payload: Value) -> Result<GeocodeResult, GeocoderError> {
        serde_json::from_value::<NominatimReverseDto>(payload)
            .expect("nominatim DTO decodes")
            .into_domain()
    }

    fn amap(payload: Value) -> Result<GeocodeResult, GeocoderError> {
        serde_json::from_value::<AMapRegeoDto>(payload)
            .expect("amap DTO decodes")
            .into_domain()
    }

    #[rstest]
    #[case::city(json!({"city": "Edinburgh", "county": "Lothian", "state": "Scotland"}), "Edinburgh")]
    #[case::county(json!({"city": "", "county": "Lothian", "state": "Scotland"}), "Lothian")]
    #[case::state(json!({"state": "Scotland"}), "Scotland")]
    #[case::none(json!({}), "")]
    fn nominatim_city_falls_back_through_county_and_state(
        #[case] address: Value,
        #[case] expected: &str,
    ) {
        let result = nominatim(json!({"address": address})).expect("mapped");
        assert_eq!(result.city, expected);
    }

    #[rstest]
    fn nominatim_prefers_type_over_category() {
        let result = nominatim(json!({
            "category": "highway",
            "type": "motorway",
            "address": {"road": "M8"}
        }))
        .expect("mapped");
        assert_eq!(result.category, "motorway");
        assert_eq!(result.road, "M8");
    }

    #[rstest]
    fn nominatim_uses_category_when_type_is_empty() {
        let result = nominatim(json!({"category": "highway", "type": ""})).expect("mapped");
        assert_eq!(result.category, "highway");
    }

    #[rstest]
    fn nominatim_error_field_is_a_provider_failure() {
        let error = nominatim(json!({"error": "Unable to geocode"})).expect_err("provider error");
        assert!(matches!(error, GeocoderError::Provider { .. }));
    }

    #[rstest]
    fn amap_non_success_status_carries_info() {
        let error = amap(json!({"status": "0", "info": "INVALID_USER_KEY"}))
            .expect_err("provider error");
        assert_eq!(
            error,
            GeocoderError::provider("amap api error: INVALID_USER_KEY")
        );
    }

    #[rstest]
    fn amap_maps_city_road_and_inferred_category() {
        let result = amap(json!({
            "status": "1",
            "info": "OK",
            "regeocode": {
                "addressComponent": {
                    "province": "江苏省",
                    "city": "苏州市",
                    "streetNumber": {"street": "干将路"}
                },
                "roads": [{"name": "沪宁高速公路", "distance": "12.5"}]
            }
        }))
        .expect("mapped");
        assert_eq!(result.city, "苏州市");
        assert_eq!(result.road, "沪宁高速公路");
        assert_eq!(result.category, "motorway");
    }

    #[rstest]
    fn amap_municipality_with_array_city_uses_province() {
        let result = amap(json!({
            "status": "1",
            "regeocode": {
                "addressComponent": {
                    "province": "上海市",
                    "city": [],
                    "streetNumber": {"street": "南京东路"}
                },
                "roads": []
            }
        }))
        .expect("mapped");
        assert_eq!(result.city, "上海市");
        assert_eq!(result.road, "南京东路");
        assert_eq!(result.category, "road");
    }

    #[rstest]
    fn amap_tolerates_empty_street_number_array() {
        let result = amap(json!({
            "status": "1",
            "regeocode": {
                "addressComponent": {"province": "浙江省", "city": "杭州市", "streetNumber": []},
                "roads": [{"name": "S13省道"}]
            }
        }))
        .expect("mapped");
        assert_eq!(result.road, "S13省道");
        assert_eq!(result.category, "trunk");
    }
}
