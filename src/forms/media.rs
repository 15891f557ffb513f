//! Actions of the client-side media table, sent as link query strings.

use serde::Deserialize;

use crate::forms::FormError;
use crate::query::MAX_PAGE_SIZE;
use crate::table::ClientTableAction;

#[derive(Debug, Default, Deserialize)]
pub struct MediaTableQuery {
    #[serde(default, rename = "toggleSort")]
    pub toggle_sort: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<String>,
}

impl TryFrom<MediaTableQuery> for ClientTableAction {
    type Error = FormError;

    fn try_from(query: MediaTableQuery) -> Result<Self, Self::Error> {
        if let Some(column) = query.toggle_sort.filter(|column| !column.is_empty()) {
            return Ok(ClientTableAction::ToggleSort(column));
        }
        if let Some(page) = query.page {
            return page
                .trim()
                .parse()
                .map(ClientTableAction::SetPage)
                .map_err(|_| FormError::InvalidAction);
        }
        if let Some(size) = query.page_size {
            return match size.trim().parse::<usize>() {
                Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => {
                    Ok(ClientTableAction::SetPageSize(size))
                }
                _ => Err(FormError::InvalidPageSize),
            };
        }
        Err(FormError::InvalidAction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_to_single_action() {
        let sort = MediaTableQuery {
            toggle_sort: Some("fileName".to_string()),
            ..MediaTableQuery::default()
        };
        let page = MediaTableQuery {
            page: Some("2".to_string()),
            ..MediaTableQuery::default()
        };
        let size = MediaTableQuery {
            page_size: Some("25".to_string()),
            ..MediaTableQuery::default()
        };

        assert_eq!(
            ClientTableAction::try_from(sort).unwrap(),
            ClientTableAction::ToggleSort("fileName".to_string())
        );
        assert_eq!(
            ClientTableAction::try_from(page).unwrap(),
            ClientTableAction::SetPage(2)
        );
        assert_eq!(
            ClientTableAction::try_from(size).unwrap(),
            ClientTableAction::SetPageSize(25)
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let size = MediaTableQuery {
            page_size: Some("1000".to_string()),
            ..MediaTableQuery::default()
        };
        let page = MediaTableQuery {
            page: Some("-1".to_string()),
            ..MediaTableQuery::default()
        };

        assert!(matches!(
            ClientTableAction::try_from(size),
            Err(FormError::InvalidPageSize)
        ));
        assert!(ClientTableAction::try_from(page).is_err());
        assert!(ClientTableAction::try_from(MediaTableQuery::default()).is_err());
    }
}
