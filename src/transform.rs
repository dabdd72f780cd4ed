use url::Url;

use crate::error::KiraError;

pub fn last_path_segment(value: &str) -> Result<String, KiraError> {
    let url = Url::parse(value.trim()).map_err(|_| KiraError::MalformedUri(value.to_string()))?;
    url.path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| KiraError::MalformedUri(value.to_string()))
}

// `['a b', 'c']` splits on commas outside quotes; a bare `a b` is a
// GROUP_CONCAT and splits on whitespace.
pub fn first_element(value: &str) -> Result<String, KiraError> {
    let trimmed = value.trim();
    let first = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => split_top_level(inner)
            .into_iter()
            .map(|item| unquote(item.trim()))
            .find(|item| !item.is_empty()),
        None => trimmed
            .split_whitespace()
            .map(unquote)
            .find(|item| !item.is_empty()),
    };
    first
        .map(str::to_string)
        .ok_or_else(|| KiraError::EmptyList(value.to_string()))
}

fn split_top_level(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (pos, ch) in inner.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(open), _) if open == ch => quote = None,
            (None, ',') => {
                items.push(&inner[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    items.push(&inner[start..]);
    items
}

fn unquote(item: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = item
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    item
}

pub fn as_text(value: &str) -> Result<String, KiraError> {
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn extracts_last_segment() {
        assert_eq!(
            last_path_segment("http://example.org/resource/ABC123").unwrap(),
            "ABC123"
        );
        assert_eq!(
            last_path_segment("http://rdf.rhea-db.org/10000").unwrap(),
            "10000"
        );
        assert_eq!(
            last_path_segment("http://purl.obolibrary.org/obo/CHEBI_15377/").unwrap(),
            "CHEBI_15377"
        );
    }

    #[test]
    fn rejects_malformed_uris() {
        assert_matches!(last_path_segment("not a uri"), Err(KiraError::MalformedUri(_)));
        assert_matches!(last_path_segment("http://example.org/"), Err(KiraError::MalformedUri(_)));
        assert_matches!(last_path_segment(""), Err(KiraError::MalformedUri(_)));
    }

    #[test]
    fn first_element_of_list_cells() {
        assert_eq!(first_element("['L']").unwrap(), "L");
        assert_eq!(first_element("[1, 2]").unwrap(), "1");
        assert_eq!(first_element("2 1").unwrap(), "2");
        assert_eq!(first_element("1").unwrap(), "1");
    }

    #[test]
    fn bracketed_elements_keep_inner_spaces() {
        assert_eq!(first_element("['Homo sapiens']").unwrap(), "Homo sapiens");
        assert_eq!(
            first_element("[\"Mus musculus, strain C57BL\", 'Rattus']").unwrap(),
            "Mus musculus, strain C57BL"
        );
        assert_eq!(first_element("[ , 'L']").unwrap(), "L");
    }

    #[test]
    fn empty_list_fails_loudly() {
        assert_matches!(first_element("[]"), Err(KiraError::EmptyList(_)));
        assert_matches!(first_element("  "), Err(KiraError::EmptyList(_)));
        assert_matches!(first_element("['']"), Err(KiraError::EmptyList(_)));
    }
}
