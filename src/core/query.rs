//! GraphQL / REST query string builders.
//!
//! Caller-supplied values are interpolated verbatim. Nothing here escapes
//! quotes, braces or `&`.

use crate::domain::model::{EntitiesQuery, FilterValue};

const SOURCE_FIELDS: &str = "
        {
            id,
            created_at,
            source_type_id,
            name,
            tenant,
            uid,
            updated_at,
            imported,
            applications { application_type_id, id },
            endpoints { id, scheme, host, port, path }
        }";

pub fn pagination(page_size: i64, page_number: i64) -> String {
    format!("limit:{}, offset:{}", page_size, (page_number - 1) * page_size)
}

pub fn sorting(sort_by: Option<&str>, sort_direction: &str) -> String {
    match sort_by {
        Some(field) if !field.is_empty() => format!(", sort_by:\"{}:{}\"", field, sort_direction),
        _ => String::new(),
    }
}

/// GraphQL 方言的過濾片段
pub fn filtering(filter_value: &FilterValue) -> String {
    let mut filter_queries = Vec::new();

    if let Some(name) = filter_value.name.as_deref().filter(|n| !n.is_empty()) {
        filter_queries.push(format!("name: {{ contains_i: \"{}\" }}", name));
    }

    if !filter_value.source_type_id.is_empty() {
        let ids = filter_value
            .source_type_id
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(",");
        filter_queries.push(format!("source_type_id: {{ eq: [{}] }}", ids));
    }

    if filter_queries.is_empty() {
        return String::new();
    }

    format!(", filter: {{ {} }}", filter_queries.join(", "))
}

/// REST 方言：`filter[name][contains_i]=..&filter[source_type_id][]=..`
pub fn rest_filter_generator(filter_value: &FilterValue) -> String {
    let mut filter_queries = Vec::new();

    if let Some(name) = filter_value.name.as_deref().filter(|n| !n.is_empty()) {
        filter_queries.push(format!("filter[name][contains_i]={}", name));
    }

    for id in &filter_value.source_type_id {
        filter_queries.push(format!("filter[source_type_id][]={}", id));
    }

    filter_queries.join("&")
}

pub fn entities_query(query: &EntitiesQuery) -> String {
    format!(
        "{{ sources({}{}{}){}\n    }}",
        pagination(query.page_size, query.page_number),
        sorting(query.sort_by.as_deref(), &query.sort_direction),
        filtering(&query.filter_value),
        SOURCE_FIELDS
    )
}

pub fn source_query(id: &str) -> String {
    format!(
        "{{ sources(filter: {{ id: {{ eq: {}}}}}){}\n    }}",
        id, SOURCE_FIELDS
    )
}
