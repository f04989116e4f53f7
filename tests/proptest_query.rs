//! Property-based tests using proptest
//!
//! These tests verify query option encoding and URL construction
//! using randomized inputs.

use ccloud_client::confluent::api_keys::ApiKeyListOptions;
use ccloud_client::confluent::clusters::KafkaClusterListOptions;
use ccloud_client::confluent::common::PaginationOptions;
use ccloud_client::confluent::http::{build_url, query_pairs, segment};
use proptest::prelude::*;

const HOST: &str = "https://api.confluent.cloud";

/// Optional query value: absent, empty, or a printable token
fn arb_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z0-9_=+/-]{1,24}".prop_map(Some),
    ]
}

fn arb_cluster_options() -> impl Strategy<Value = KafkaClusterListOptions> {
    (proptest::option::of(1u32..=100), arb_value(), arb_value()).prop_map(
        |(page_size, page_token, environment)| KafkaClusterListOptions {
            pagination: PaginationOptions {
                page_size,
                page_token,
            },
            environment,
        },
    )
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

proptest! {
    /// One query parameter per non-empty field, never more
    #[test]
    fn one_parameter_per_set_field(opts in arb_cluster_options()) {
        let pairs = query_pairs(&opts).unwrap();
        let expected = usize::from(opts.pagination.page_size.is_some())
            + usize::from(is_set(&opts.pagination.page_token))
            + usize::from(is_set(&opts.environment));
        prop_assert_eq!(pairs.len(), expected);
        prop_assert!(pairs.iter().all(|(_, value)| !value.is_empty()));
    }

    /// Query values survive URL encoding unchanged
    #[test]
    fn query_values_round_trip_through_url(opts in arb_cluster_options()) {
        let url = build_url(HOST, "/cmk/v2/clusters", Some(&opts)).unwrap();

        let decoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        prop_assert_eq!(decoded, query_pairs(&opts).unwrap());

        if query_pairs(&opts).unwrap().is_empty() {
            prop_assert!(url.query().is_none());
        }
    }

    /// Interpolated ids stay inside their own path segment
    #[test]
    fn ids_stay_in_one_segment(
        id in "\\PC{1,32}".prop_filter("dot segments are normalized away", |s| s != "." && s != "..")
    ) {
        let path = format!("/cmk/v2/clusters/{}", segment(&id));
        let url = build_url::<()>(HOST, &path, None).unwrap();

        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        prop_assert_eq!(segments.len(), 4);
        prop_assert!(url.query().is_none());
        prop_assert!(url.fragment().is_none());
    }

    /// API key filters use their dotted parameter names
    #[test]
    fn api_key_filters_named(owner in arb_value(), resource in arb_value()) {
        let opts = ApiKeyListOptions {
            owner: owner.clone(),
            resource: resource.clone(),
            ..Default::default()
        };
        let pairs = query_pairs(&opts).unwrap();

        prop_assert_eq!(
            pairs.iter().any(|(name, _)| name == "spec.owner"),
            is_set(&owner)
        );
        prop_assert_eq!(
            pairs.iter().any(|(name, _)| name == "spec.resource"),
            is_set(&resource)
        );
    }
}
