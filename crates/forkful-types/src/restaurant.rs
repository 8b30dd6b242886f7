//! Restaurant data as returned by the recommendation backend.
//!
//! These structures are display data only: the client never mutates them.
//! Almost every field is optional because upstream listings are sparse.

use serde::{Deserialize, Serialize};

/// Default search radius in meters for nearby lookups.
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

/// Default number of results for nearby lookups.
pub const DEFAULT_RESULT_LIMIT: u32 = 20;

/// A cuisine/category tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub alias: String,
    pub title: String,
}

/// Postal location of a restaurant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_address: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Author of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A review excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub rating: f64,
    pub text: String,
    /// Upstream timestamp, kept verbatim (formats vary by source).
    #[serde(default)]
    pub time_created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ReviewUser>,
    /// Flattened author name some backends send instead of `user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl Review {
    /// Author name from either representation.
    pub fn author(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .or(self.user_name.as_deref())
    }
}

/// A restaurant listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// Price tier, e.g. "$$".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<RestaurantLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    /// Distance from the search point, in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_summary: Option<String>,
}

/// Treat an explicit JSON `null` list as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured restaurant search parameters.
///
/// Unset fields are omitted so the backend applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Comma-separated category aliases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    /// Comma-separated price tiers ("1,2").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// best_match, rating, review_count, or distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

/// A page of restaurants from search or nearby lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantList {
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_restaurant_deserializes() {
        let r: Restaurant = serde_json::from_str(r#"{"id": "r1", "name": "Noodle Bar"}"#).unwrap();
        assert!(r.rating.is_none());
        assert!(r.phone.is_none());
        assert!(r.image_url.is_none());
        assert!(r.categories.is_empty());
        assert!(r.reviews.is_empty());
        assert!(!r.is_closed);
    }

    #[test]
    fn test_null_lists_become_empty() {
        let r: Restaurant = serde_json::from_str(
            r#"{"id": "r1", "name": "Noodle Bar", "categories": null, "reviews": null}"#,
        )
        .unwrap();
        assert!(r.categories.is_empty());
        assert!(r.reviews.is_empty());
    }

    #[test]
    fn test_review_author_prefers_user_object() {
        let review: Review = serde_json::from_value(serde_json::json!({
            "id": "v1", "rating": 4, "text": "Great", "time_created": "2024-01-01 10:00:00",
            "user": {"name": "Sam"}, "user_name": "ignored"
        }))
        .unwrap();
        assert_eq!(review.author(), Some("Sam"));

        let flat: Review = serde_json::from_value(serde_json::json!({
            "id": "v2", "rating": 3.5, "text": "Fine", "user_name": "Alex"
        }))
        .unwrap();
        assert_eq!(flat.author(), Some("Alex"));
    }

    #[test]
    fn test_search_params_omit_unset() {
        let params = RestaurantSearchParams {
            query: Some("tacos".to_string()),
            limit: Some(5),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"query": "tacos", "limit": 5}));
    }

    #[test]
    fn test_restaurant_list_keeps_order() {
        let list: RestaurantList = serde_json::from_value(serde_json::json!({
            "restaurants": [{"id": "b", "name": "B"}, {"id": "a", "name": "A"}],
            "total": 2
        }))
        .unwrap();
        let ids: Vec<_> = list.restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(list.total, 2);
    }
}
