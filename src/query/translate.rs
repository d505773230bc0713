use super::clause::SortClause;
use super::operator::map_condition;
use super::QueryParameters;
use crate::error::{AdapterError, TranslationError};
use crate::request::ReadRequest;

/// Turn a grid read request into query parameters.
///
/// Paging values are carried through as-is, sorts and filters keep the
/// request's order. No I/O; any failure happens here, before a query is sent.
pub fn translate(request: &ReadRequest) -> Result<QueryParameters, AdapterError> {
    let sorts = request
        .sort
        .iter()
        .enumerate()
        .map(|(index, sort)| {
            let field_id = sort
                .field
                .as_deref()
                .filter(|field| !field.is_empty())
                .ok_or(TranslationError::MissingSortField { index })?;
            Ok(SortClause {
                field_id: field_id.to_string(),
                ascending: sort.is_ascending(),
            })
        })
        .collect::<Result<Vec<_>, TranslationError>>()?;

    let filters = match &request.filter {
        Some(tree) => tree
            .conditions()?
            .into_iter()
            .enumerate()
            .map(|(index, condition)| map_condition(index, condition))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(QueryParameters {
        start: request.skip,
        size: request.take,
        sorts,
        filters,
    })
}
