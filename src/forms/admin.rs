//! Forms posted from the admin listing pages.

use serde::Deserialize;
use validator::Validate;

use crate::forms::FormError;

/// Filter form of a server-side table.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchForm {
    /// Value typed or selected for the chosen field.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub search: String,
    /// Field the search applies to.
    #[serde(default, rename = "filterBy")]
    pub filter_by: Option<String>,
    /// Query string of the page the form was submitted from.
    #[serde(default)]
    pub query: String,
}

/// Normalized filter submission.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchPayload {
    pub search: String,
    pub filter_by: Option<String>,
    pub query: String,
}

impl TryFrom<SearchForm> for SearchPayload {
    type Error = FormError;

    fn try_from(form: SearchForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            search: form.search.trim().to_string(),
            filter_by: form
                .filter_by
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty()),
            query: form.query,
        })
    }
}

/// Confirmation dialog of a destructive action.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    /// `confirm` or `cancel`.
    pub action: String,
    /// Listing URL to return to, including its query string.
    #[serde(default)]
    pub return_to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteDecision {
    Confirm,
    Cancel,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeletePayload {
    pub decision: DeleteDecision,
    /// Only local admin paths are kept.
    pub return_to: Option<String>,
}

impl TryFrom<DeleteForm> for DeletePayload {
    type Error = FormError;

    fn try_from(form: DeleteForm) -> Result<Self, Self::Error> {
        let decision = match form.action.as_str() {
            "confirm" => DeleteDecision::Confirm,
            "cancel" => DeleteDecision::Cancel,
            _ => return Err(FormError::InvalidAction),
        };
        Ok(Self {
            decision,
            return_to: local_admin_path(&form.return_to),
        })
    }
}

/// Keeps `path` only when it points into the admin console of this host.
pub fn local_admin_path(path: &str) -> Option<String> {
    let path = path.trim();
    (path.starts_with("/admin/") && !path.contains("//") && !path.contains('\\'))
        .then(|| path.to_string())
}
